/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Left-align `value` in `width` columns; empty fields print as a grey `--`.
pub fn pad_optional(value: &str, width: usize) -> String {
    if value.trim().is_empty() {
        format!("{GREY}{:<width$}{RESET}", "--")
    } else {
        format!("{value:<width$}")
    }
}
