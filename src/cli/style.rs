//! Terminal styling helpers
//!
//! Output is written through `anstream`, which strips the escape codes when
//! stdout is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::Style;
use std::fmt::Display;

/// Check mark used in summaries
pub const CHECK: &str = "✓";

/// Styling shortcuts for anything displayable
pub trait Stylize: Display {
    /// Bold
    fn emphasis(&self) -> String {
        Style::new().bold().style(self).to_string()
    }

    /// Dimmed, for secondary information
    fn muted(&self) -> String {
        Style::new().dimmed().style(self).to_string()
    }

    /// Cyan, for names the user typed or will type
    fn accent(&self) -> String {
        Style::new().cyan().style(self).to_string()
    }

    /// Green
    fn success(&self) -> String {
        Style::new().green().style(self).to_string()
    }

    /// Yellow
    fn warn(&self) -> String {
        Style::new().yellow().style(self).to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Dimmed arrow for list items
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner used around network calls
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
}

/// `#<number>`, linked to `url` when the terminal supports hyperlinks
pub fn pr_link(number: u64, url: &str) -> String {
    let text = format!("#{number}");
    if !url.is_empty() && supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(&text, url).to_string()
    } else {
        text
    }
}
