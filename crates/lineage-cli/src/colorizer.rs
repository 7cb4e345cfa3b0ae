//! Terminal colorization for previews and validation reports
//!
//! Applies ANSI escape codes using crossterm.

use crossterm::style::{Color, Stylize};

/// Severity of a validation report line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReportLevel {
    Ok,
    Warning,
    Problem,
}

impl ReportLevel {
    pub fn symbol(&self) -> &'static str {
        match self {
            ReportLevel::Ok => "✓",
            ReportLevel::Warning => "⚠",
            ReportLevel::Problem => "✗",
        }
    }

    fn color(&self) -> Color {
        match self {
            ReportLevel::Ok => Color::Green,
            ReportLevel::Warning => Color::Yellow,
            ReportLevel::Problem => Color::Red,
        }
    }
}

/// Color a whole report line by severity
pub fn paint_report_line(line: &str, level: ReportLevel, enabled: bool) -> String {
    if enabled {
        format!("{}", line.with(level.color()))
    } else {
        line.to_string()
    }
}

/// Colorize a tree preview
///
/// - Box-drawing borders: Cyan
/// - Connector lines and junctions: Blue
/// - Spouse markers: Magenta
/// - Names and dates: Default (terminal color)
pub fn colorize_preview(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2);

    for line in input.lines() {
        for c in line.chars() {
            let colored = match c {
                '┌' | '┐' | '└' | '┘' | '╔' | '╗' | '╚' | '╝' | '║' => {
                    format!("{}", c.to_string().with(Color::Cyan))
                }
                '─' | '│' | '┼' | '═' => format!("{}", c.to_string().with(Color::Blue)),
                '♥' => format!("{}", c.to_string().with(Color::Magenta)),
                // ASCII previews share glyphs with labels; only obvious runs are colored
                '+' | '-' | '|' | '=' if is_line_context(line, c) => {
                    format!("{}", c.to_string().with(Color::Cyan))
                }
                _ => c.to_string(),
            };
            result.push_str(&colored);
        }
        result.push('\n');
    }

    // Remove trailing newline to match input format
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

/// Check if a character is likely part of a box or connector vs text content
fn is_line_context(line: &str, c: char) -> bool {
    match c {
        '+' => line.contains("+-") || line.contains("-+") || line.contains("+|"),
        '-' => line.contains("---") || line.contains("+--") || line.contains("--+"),
        '|' => {
            let trimmed = line.trim_start();
            trimmed.starts_with('|') || line.contains("| ") || line.contains(" |")
        }
        '=' => line.contains("=="),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_preserves_content() {
        let input = "┌───┐\n│ A │\n└───┘";
        let output = colorize_preview(input);

        assert!(output.contains("\x1b["));
        assert!(output.contains('A'));
    }

    #[test]
    fn test_plain_labels_untouched() {
        let input = "Mary-Ann";
        assert_eq!(colorize_preview(input), input);
    }

    #[test]
    fn test_no_trailing_newline() {
        let output = colorize_preview("test");
        assert!(!output.ends_with('\n'));
    }

    #[test]
    fn test_report_line_disabled() {
        assert_eq!(paint_report_line("✓ fine", ReportLevel::Ok, false), "✓ fine");
        assert!(paint_report_line("✗ bad", ReportLevel::Problem, true).contains("\x1b["));
    }
}
