use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;

use super::audit::MissingBackport;

pub const DEFAULT_REPORT_PATH: &str = "data/missing_backport_log.md";

/// Renders the missing-backport records as a Markdown bulleted list.
///
/// One entry per pull request: title, JSON-encoded missing label names,
/// number, and the verification search link.
pub fn render_report<'a>(records: impl IntoIterator<Item = &'a MissingBackport>) -> Result<String> {
    let mut output = String::new();

    for record in records {
        let labels = serde_json::to_string(&record.labels)?;
        let _ = writeln!(
            output,
            "- {} {} #{} [verify]({})",
            record.title, labels, record.number, record.search_url
        );
    }

    Ok(output)
}

/// Writes the rendered report, creating the parent directory when needed.
/// The file is overwritten entirely on each run.
pub fn write_report<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a MissingBackport>,
) -> Result<()> {
    let report = render_report(records)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, report)?;

    info!("Missing backport report written to: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_record(number: u64, title: &str, labels: &[&str]) -> MissingBackport {
        MissingBackport {
            number,
            title: title.to_string(),
            labels: labels.iter().map(|label| (*label).to_string()).collect(),
            url: format!("https://github.com/acme/widgets/pull/{number}"),
            search_url: format!("https://github.com/acme/widgets/pulls?q=is%3Apr+{number}"),
        }
    }

    #[test]
    fn renders_one_list_item_per_record() {
        let records = vec![
            create_record(50, "Add feature X", &["backport main"]),
            create_record(51, "Fix crash", &["backport 2.x", "backport main"]),
        ];

        let report = render_report(&records).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "- Add feature X [\"backport main\"] #50 [verify](https://github.com/acme/widgets/pulls?q=is%3Apr+50)"
        );
        assert!(lines[1].contains("[\"backport 2.x\",\"backport main\"]"));
    }

    #[test]
    fn renders_nothing_for_no_records() {
        let records: Vec<MissingBackport> = vec![];
        let report = render_report(&records).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn writes_the_report_creating_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("missing_backport_log.md");

        let records = vec![create_record(50, "Add feature X", &["backport main"])];
        write_report(&path, &records).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("- Add feature X"));
    }
}
