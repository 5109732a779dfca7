//! Terminal styling helpers.

use owo_colors::OwoColorize;

use crate::cli::StyleMode;

/// Format a title header.
pub fn format_title(title: &str, no_color: bool) -> String {
    if no_color {
        format!("{}\n{}", title, "=".repeat(title.chars().count()))
    } else {
        format!(
            "{}\n{}",
            title.bold(),
            "━".repeat(title.chars().count()).dimmed()
        )
    }
}

/// Format a secondary line of text (counts, hints).
pub fn format_note(message: &str, no_color: bool) -> String {
    if no_color {
        message.to_string()
    } else {
        format!("{}", message.dimmed())
    }
}

/// Format a warning message.
pub fn format_warning(message: &str, no_color: bool) -> String {
    if no_color {
        format!("! {}", message)
    } else {
        format!("{} {}", "!".yellow().bold(), message.yellow())
    }
}

/// Apply table style based on StyleMode.
pub fn apply_table_style(table: &mut tabled::Table, style: StyleMode) {
    use tabled::settings::Style;
    match style {
        StyleMode::Rich => {
            table.with(Style::rounded());
        }
        StyleMode::Minimal => {
            table.with(Style::psql());
        }
        StyleMode::Plain => {
            table.with(Style::blank());
        }
    }
}
