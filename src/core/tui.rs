//! Terminal output helpers for CLI surfaces.
//!
//! All user-facing output goes through these helpers so generation code can
//! stay silent and return data. Warnings go to stdout in yellow; errors are
//! rendered red by the binary on stderr.

use colored::Colorize;

/// Per-file outcome reported while a feature is generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ItemStatus {
    Created,
    Updated,
    Unchanged,
    Skipped,
}

impl ItemStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            ItemStatus::Created => "✨",
            ItemStatus::Updated => "🔄",
            ItemStatus::Unchanged => "➖",
            ItemStatus::Skipped => "⏭",
        }
    }
}

pub fn print_section(title: &str) {
    println!();
    println!("{}", title.bold());
}

pub fn print_status_line(message: &str, status: ItemStatus) {
    let icon = status.icon();
    match status {
        ItemStatus::Created => {
            println!("  {} {}", icon.bright_green(), message);
        }
        ItemStatus::Updated => {
            println!("  {} {}", icon.bright_yellow(), message);
        }
        ItemStatus::Unchanged | ItemStatus::Skipped => {
            println!("  {} {}", icon.bright_black(), message.bright_black());
        }
    }
}

pub fn warn(message: &str) {
    println!("{} {}", "warning:".bright_yellow().bold(), message);
}

pub fn success(message: &str) {
    println!("{} {}", "✅".bright_green(), message.bold());
}

/// Rendered by the binary for fatal errors, on stderr.
pub fn error_line(message: &str) -> String {
    format!("{} {}", "error:".bright_red().bold(), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_are_distinct() {
        let icons = [
            ItemStatus::Created.icon(),
            ItemStatus::Updated.icon(),
            ItemStatus::Unchanged.icon(),
            ItemStatus::Skipped.icon(),
        ];
        for (i, a) in icons.iter().enumerate() {
            for b in icons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_error_line_contains_message() {
        assert!(error_line("boom").contains("boom"));
    }
}
