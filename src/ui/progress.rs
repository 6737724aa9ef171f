use console::style;
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use std::time::Duration;

use super::output;

/// Spinner shown while a long step runs.
pub struct ProgressBar {
    bar: IndicatifBar,
}

impl ProgressBar {
    /// Creates a spinner for indeterminate progress.
    pub fn spinner(label: &str) -> Self {
        let bar = IndicatifBar::new_spinner();
        let template = format!("{{spinner:.cyan}} {}", style(label).dim());
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(&template)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Clears the spinner and prints a success line.
    pub fn finish(&self, message: &str) {
        self.bar.finish_and_clear();
        output::success(message);
    }

    /// Clears the spinner and prints an error line.
    pub fn finish_error(&self, message: &str) {
        self.bar.finish_and_clear();
        output::error(message);
    }
}
