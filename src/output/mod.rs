mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::FetchProgress;
pub use styling::{dim, magenta_bold};
pub use summary::{print_backport_summary, print_flake_summary};

/// Prints the `repoaudit` banner to stderr.
///
/// Displays the tool name, version, and description at the start of execution.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🔍 repoaudit"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitHub Repository Audit Tool")
    );
}
