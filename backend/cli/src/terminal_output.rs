//! Terminal output utilities: transcript lines, ANSI formatting, tables.

use groqchat_core::Role;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            // Skip until 'm'
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// `You: ...` / `Chatbot: ...`
pub fn speaker_line(role: Role, content: &str, color: bool) -> String {
    let style = match role {
        Role::Human => BOLD,
        Role::Assistant => GREEN,
    };
    format!("{} {content}", paint(&format!("{}:", role.label()), style, color))
}

pub fn error_line(msg: &str, color: bool) -> String {
    paint(&format!("An error occurred: {msg}"), RED, color)
}

pub fn info_line(msg: &str, color: bool) -> String {
    if color {
        format!("{CYAN}{BOLD}ℹ{RESET} {msg}")
    } else {
        format!("INFO: {msg}")
    }
}

pub fn warn_line(msg: &str, color: bool) -> String {
    if color {
        format!("{YELLOW}{BOLD}⚠{RESET} {msg}")
    } else {
        format!("WARN: {msg}")
    }
}

pub fn title_line(title: &str, color: bool) -> String {
    paint(title, BOLD, color)
}

pub fn dim(text: &str, color: bool) -> String {
    paint(text, DIM, color)
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Column alignment.
pub enum Align {
    Left,
    Right,
}

/// A table column definition.
pub struct Column {
    pub header: String,
    pub align: Align,
}

impl Column {
    pub fn left(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Left }
    }
    pub fn right(header: impl Into<String>) -> Self {
        Self { header: header.into(), align: Align::Right }
    }
}

/// Render a table with given columns and rows.
pub fn render_table(columns: &[Column], rows: &[Vec<String>], color: bool) -> String {
    let num_cols = columns.len();
    let mut widths: Vec<usize> = columns.iter().map(|c| strip_ansi(&c.header).chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(num_cols) {
            widths[i] = widths[i].max(strip_ansi(cell).chars().count());
        }
    }

    let mut out = String::new();

    let header_cells: Vec<String> = columns
        .iter()
        .enumerate()
        .map(|(i, col)| pad_cell(&col.header, widths[i], &col.align))
        .collect();
    out.push_str(&paint(&format!("  {}  ", header_cells.join("  ")), BOLD, color));
    out.push('\n');

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}  \n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = (0..num_cols)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                pad_cell(cell, widths[i], &columns[i].align)
            })
            .collect();
        out.push_str(&format!("  {}  \n", cells.join("  ")));
    }

    out
}

fn pad_cell(s: &str, width: usize, align: &Align) -> String {
    let pad = width.saturating_sub(strip_ansi(s).chars().count());
    match align {
        Align::Left => format!("{s}{}", " ".repeat(pad)),
        Align::Right => format!("{}{s}", " ".repeat(pad)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(strip_ansi(&colored), "hello");
    }

    #[test]
    fn speaker_lines_use_labels() {
        assert_eq!(speaker_line(Role::Human, "Hello", false), "You: Hello");
        assert_eq!(speaker_line(Role::Assistant, "Hi there", false), "Chatbot: Hi there");
        assert_eq!(
            strip_ansi(&speaker_line(Role::Assistant, "Hi", true)),
            "Chatbot: Hi"
        );
    }

    #[test]
    fn error_line_has_prefix() {
        assert_eq!(error_line("timeout", false), "An error occurred: timeout");
    }

    #[test]
    fn renders_aligned_table() {
        let cols = vec![Column::left("Model"), Column::right("Context")];
        let rows = vec![
            vec!["llama2-70b-4096".to_string(), "4096".to_string()],
            vec!["x".to_string(), "32768".to_string()],
        ];
        let table = render_table(&cols, &rows, false);
        let lines: Vec<_> = table.lines().map(str::trim_end).collect();
        assert_eq!(lines.len(), 4);
        // Right-aligned cells share an end column.
        assert_eq!(lines[2].len(), lines[3].len());
        assert_eq!(lines[0].len(), lines[2].len());
        assert!(lines[2].ends_with(" 4096"));
        assert!(lines[3].ends_with("32768"));
        assert!(lines[3].starts_with("  x "));
    }
}
