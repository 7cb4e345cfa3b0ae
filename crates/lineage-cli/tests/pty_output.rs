//! PTY-based output verification tests
//!
//! These tests use expectrl to spawn the CLI in a pseudo-terminal,
//! capturing exact terminal output to verify alignment of the preview.

use expectrl::{spawn, Expect, Regex};
use std::time::Duration;

const COUPLE: &str = r#"[
    {"id": "a", "name": "Ada", "spouseIds": ["b"], "childrenIds": ["c"]},
    {"id": "b", "name": "Ben", "spouseIds": ["a"], "childrenIds": ["c"]},
    {"id": "c", "name": "Cy", "parentIds": ["a", "b"], "childrenIds": ["d"]},
    {"id": "d", "name": "Dee", "parentIds": ["c"]}
]"#;

/// Helper to build the CLI binary path
fn cli_binary() -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());

    // Go up to workspace root
    let workspace_root = manifest_dir.parent().unwrap().parent().unwrap();

    workspace_root.join("target/debug/lineage")
}

/// Spawn the CLI with a subcommand, extra args and input, return output
fn run_cli(command: &str, args: &[&str], input: &str) -> Result<String, Box<dyn std::error::Error>> {
    let temp_dir = tempfile::tempdir()?;
    let input_path = temp_dir.path().join("people.json");
    std::fs::write(&input_path, input)?;

    let bin = cli_binary();
    if !bin.exists() {
        return Err(format!(
            "Binary not found at {:?}. Run `cargo build -p lineage-cli` first.",
            bin
        )
        .into());
    }

    let mut cmd_args = vec![command, "-i", input_path.to_str().unwrap()];
    cmd_args.extend(args);

    // Wrapper script so the log level can be forced off
    let script_path = temp_dir.path().join("run.sh");
    let script_content = format!(
        "#!/bin/sh\nexport LINEAGE_LOG_LEVEL=off\nexec {} {}\n",
        bin.display(),
        cmd_args.join(" ")
    );
    std::fs::write(&script_path, &script_content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))?;
    }

    let mut session = spawn(script_path.to_str().unwrap())?;
    session.set_expect_timeout(Some(Duration::from_secs(10)));

    let mut output = String::new();
    loop {
        match session.expect(expectrl::Eof) {
            Ok(found) => {
                output.push_str(&String::from_utf8_lossy(found.as_bytes()));
                break;
            }
            Err(expectrl::Error::ExpectTimeout) => {
                if let Ok(found) = session.expect(Regex(".+")) {
                    output.push_str(&String::from_utf8_lossy(found.as_bytes()));
                }
            }
            Err(_) => break,
        }
    }

    Ok(output)
}

fn preview(args: &[&str]) -> String {
    let mut all = vec!["--color", "never"];
    all.extend(args);
    run_cli("preview", &all, COUPLE).expect("CLI should succeed")
}

/// Spouses share a row, so their top corners are on one line
#[test]
fn test_spouse_boxes_share_a_row() {
    let output = preview(&["--style", "unicode"]);
    let lines: Vec<&str> = output.lines().collect();

    let first_top = lines
        .iter()
        .position(|l| l.contains('┌'))
        .expect("no boxes in output");
    assert_eq!(
        lines[first_top].matches('┌').count(),
        2,
        "Expected both partners on the first row\nOutput:\n{}",
        output
    );
}

/// Top and bottom corners of every box line up column for column
#[test]
fn test_box_vertical_alignment() {
    let output = preview(&["--style", "unicode"]);
    let lines: Vec<&str> = output.lines().collect();

    let top_line = lines.iter().find(|l| l.contains('┌')).unwrap();
    let bottom_line = lines.iter().find(|l| l.contains('└')).unwrap();

    let corners = |line: &str, a: char, b: char| -> Vec<usize> {
        line.chars()
            .enumerate()
            .filter(|(_, c)| *c == a || *c == b)
            .map(|(i, _)| i)
            .collect()
    };

    assert_eq!(
        corners(top_line, '┌', '┐'),
        corners(bottom_line, '└', '┘'),
        "Corner positions should match\nOutput:\n{}",
        output
    );
}

/// Names sit inside their box borders
#[test]
fn test_label_containment() {
    let output = preview(&["--style", "unicode"]);
    for name in ["Ada", "Ben", "Cy", "Dee"] {
        let line = output
            .lines()
            .find(|l| l.contains(name))
            .unwrap_or_else(|| panic!("{name} missing\nOutput:\n{output}"));
        assert!(line.contains(&format!("│{name}")), "Label line should have borders: {line}");
    }
}

/// The spouse link carries its midpoint marker
#[test]
fn test_spouse_marker() {
    let output = preview(&["--style", "unicode"]);
    assert!(output.contains('♥'), "Missing spouse marker\nOutput:\n{}", output);
    assert!(output.contains('═'), "Missing spouse link\nOutput:\n{}", output);
}

/// ASCII previews stay pure ASCII
#[test]
fn test_ascii_preview() {
    let output = preview(&["--style", "ascii"]);
    assert!(output.contains("|Ada"));
    assert!(output.trim().is_ascii(), "Non-ASCII in output:\n{}", output);
}

/// Collapsing a person hides its descendants from the preview
#[test]
fn test_collapse_flag() {
    let output = preview(&["--style", "unicode", "--collapse", "c"]);
    assert!(output.contains("Cy"));
    assert!(!output.contains("Dee"), "Dee should be hidden\nOutput:\n{}", output);
}

/// Validation lists dangling references
#[test]
fn test_validate_reports_problems() {
    let input = r#"[{"id": "a", "name": "Ada", "childrenIds": ["ghost"]}]"#;
    let output = run_cli("validate", &["--color", "never"], input).expect("CLI should run");
    assert!(
        output.contains("'a' lists unknown child 'ghost'"),
        "Output:\n{}",
        output
    );
}

/// Validation catches loops that exist only through parent lists
#[test]
fn test_validate_reports_parent_loop() {
    let input = r#"[
        {"id": "X", "name": "Xan", "parentIds": ["Y"]},
        {"id": "Y", "name": "Yul", "parentIds": ["X"]}
    ]"#;
    let output = run_cli("validate", &["--color", "never"], input).expect("CLI should run");
    assert!(
        output.contains("'Y' lists its own descendant 'X' as a parent"),
        "Output:\n{}",
        output
    );
    assert!(!output.contains("no problems found"));
}

/// Rendering to stdout emits an SVG document
#[test]
fn test_render_to_stdout() {
    let output = run_cli("render", &[], COUPLE).expect("CLI should succeed");
    assert!(output.contains("<svg xmlns"), "Output:\n{}", output);
    assert!(output.contains("</svg>"));
}
