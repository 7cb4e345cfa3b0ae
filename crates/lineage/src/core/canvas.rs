//! Character canvas for the text preview surface
//!
//! A growable grid of characters. Line drawing merges crossings into a
//! junction glyph so buses and drops read as one connected shape.

use super::{BoxChars, LineChars};

/// Character grid used by text renderers
#[derive(Debug, Clone)]
pub struct CharCanvas {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<char>>,
}

impl CharCanvas {
    /// Create a new canvas with the specified dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let grid = vec![vec![' '; width.max(1)]; height.max(1)];
        Self {
            width: width.max(1),
            height: height.max(1),
            grid,
        }
    }

    /// Ensure the canvas is at least the specified size, expanding if needed
    pub fn ensure_size(&mut self, min_width: usize, min_height: usize) {
        if min_width > self.width {
            for row in &mut self.grid {
                row.resize(min_width, ' ');
            }
            self.width = min_width;
        }
        if min_height > self.height {
            let extra_rows = min_height - self.height;
            self.grid
                .extend((0..extra_rows).map(|_| vec![' '; self.width]));
            self.height = min_height;
        }
    }

    pub fn set_char(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        self.grid[y][x] = c;
    }

    pub fn get_char(&self, x: usize, y: usize) -> char {
        if y < self.height && x < self.width {
            self.grid[y][x]
        } else {
            ' '
        }
    }

    /// Draw text starting at `x`, clipped to `max_chars` characters
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, max_chars: usize) {
        for (i, c) in text.chars().take(max_chars).enumerate() {
            self.set_char(x + i, y, c);
        }
    }

    /// Draw a horizontal run between two columns (inclusive, any order)
    pub fn draw_hline(&mut self, x1: usize, x2: usize, y: usize, c: char, lines: &LineChars) {
        let (start, end) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        for x in start..=end {
            let existing = self.get_char(x, y);
            let next = if existing == lines.vertical || existing == lines.junction {
                lines.junction
            } else {
                c
            };
            self.set_char(x, y, next);
        }
    }

    /// Draw a vertical run between two rows (inclusive, any order)
    pub fn draw_vline(&mut self, x: usize, y1: usize, y2: usize, lines: &LineChars) {
        let (start, end) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        for y in start..=end {
            let existing = self.get_char(x, y);
            let next = if existing == lines.horizontal || existing == lines.junction {
                lines.junction
            } else {
                lines.vertical
            };
            self.set_char(x, y, next);
        }
    }

    /// Draw a box outline and clear its interior
    pub fn draw_box(&mut self, x: usize, y: usize, width: usize, height: usize, chars: &BoxChars) {
        if width < 2 || height < 2 {
            return;
        }
        let right = x + width - 1;
        let bottom = y + height - 1;
        for cy in y..=bottom {
            for cx in x..=right {
                let c = match (cy == y, cy == bottom, cx == x, cx == right) {
                    (true, _, true, _) => chars.top_left,
                    (true, _, _, true) => chars.top_right,
                    (_, true, true, _) => chars.bottom_left,
                    (_, true, _, true) => chars.bottom_right,
                    (true, _, _, _) | (_, true, _, _) => chars.horizontal,
                    (_, _, true, _) | (_, _, _, true) => chars.vertical,
                    _ => ' ',
                };
                self.set_char(cx, cy, c);
            }
        }
    }
}

impl std::fmt::Display for CharCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let s: String = row.iter().collect();
                s.trim_end().to_string()
            })
            .collect();

        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        write!(f, "{}", rows.join("\n"))
    }
}
