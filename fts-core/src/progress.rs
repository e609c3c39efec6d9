//! Cosmetic spinner shown while a load or build phase runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Start a steady-tick spinner. The returned handle's `finish_and_clear`
/// stops the background tick; dropping it never blocks shutdown.
pub fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
