use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

const BANNER_WIDTH: usize = 60;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Counters and per-file results for one run over the configured tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub dry_run: bool,
    pub files_processed: usize,
    /// In dry-run mode: files that would be modified.
    pub files_modified: usize,
    pub files_errored: usize,
    pub calls_rewritten: usize,
    /// Root-relative paths of modified files, in visiting order.
    pub modified: Vec<PathBuf>,
    pub errors: Vec<FileError>,
    pub missing_dirs: Vec<PathBuf>,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn render_text(&self, out: &mut dyn Write) -> Result<()> {
        let banner = "-".repeat(BANNER_WIDTH);
        let modified_label = if self.dry_run {
            "Files to modify"
        } else {
            "Files modified"
        };
        writeln!(out, "\n{}", banner)?;
        writeln!(out, "Files processed: {}", self.files_processed)?;
        writeln!(out, "{}: {}", modified_label, self.files_modified)?;
        writeln!(out, "Files with errors: {}", self.files_errored)?;
        writeln!(out, "{}", banner)?;
        Ok(())
    }

    pub fn render_json(&self, out: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *out, self).context("failed to serialize summary")?;
        writeln!(out)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunSummary {
        RunSummary {
            files_processed: 3,
            files_modified: 1,
            files_errored: 1,
            calls_rewritten: 2,
            modified: vec![PathBuf::from("services/api.ts")],
            errors: vec![FileError {
                path: PathBuf::from("app/services/bad.ts"),
                message: "failed to read".into(),
            }],
            missing_dirs: vec![PathBuf::from("app/context")],
            ..RunSummary::new(false)
        }
    }

    #[test]
    fn text_summary_block() {
        let mut buf = Vec::new();
        sample().render_text(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let banner = "-".repeat(60);
        assert_eq!(
            text,
            format!(
                "\n{banner}\nFiles processed: 3\nFiles modified: 1\nFiles with errors: 1\n{banner}\n"
            )
        );
    }

    #[test]
    fn dry_run_label() {
        let mut buf = Vec::new();
        RunSummary::new(true).render_text(&mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("Files to modify: 0"));
    }

    #[test]
    fn json_summary_fields() {
        let mut buf = Vec::new();
        sample().render_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["files_processed"], 3);
        assert_eq!(value["files_modified"], 1);
        assert_eq!(value["files_errored"], 1);
        assert_eq!(value["modified"][0], "services/api.ts");
        assert_eq!(value["errors"][0]["message"], "failed to read");
        assert_eq!(value["missing_dirs"][0], "app/context");
        assert_eq!(value["dry_run"], false);
    }
}
