use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright_green, bright_yellow};

/// In-place progress line for a paginated fetch.
///
/// Each fetched page updates the same stderr line, so long fetches do not
/// flood the console.
pub struct FetchProgress {
    pb: ProgressBar,
    what: String,
}

impl FetchProgress {
    pub fn start(what: &str) -> Self {
        let pb = create_spinner(bright_yellow(format!("{what}...")).to_string());
        Self {
            pb,
            what: what.to_string(),
        }
    }

    /// Updates the progress line after a page has been fetched.
    pub fn page(&self, page: usize, records: usize) {
        self.pb.set_message(
            bright_yellow(format!("{}: page {page}, {records} records", self.what)).to_string(),
        );
    }

    pub fn finish(self, records: usize, noun: &str) {
        self.pb.finish_with_message(
            bright_green(format!("{}: {records} {noun} ✓", self.what)).to_string(),
        );
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {msg} {spinner}")
            .unwrap(),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
