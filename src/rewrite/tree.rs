use crate::config::AppConfig;
use crate::report::{FileError, RunSummary};
use crate::rewrite::apply::{FileOutcome, WriteMode, process_file};
use anyhow::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Candidate source files under one configured directory, sorted by name.
fn candidate_files(dir: &Path, cfg: &AppConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("skipping unreadable entry under {}: {}", dir.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| cfg.has_extension(e));
        if matches_ext {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Walk every configured directory in order and rewrite each candidate file.
/// Per-file failures are recorded in the summary; the `Err` case is only for
/// failures writing to `out`.
pub fn fix_tree(cfg: &AppConfig, mode: WriteMode, out: &mut dyn Write) -> Result<RunSummary> {
    let mut summary = RunSummary::new(mode == WriteMode::DryRun);
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for dir in &cfg.dirs {
        let dir_path = cfg.root.join(dir);
        if !dir_path.is_dir() {
            writeln!(out, "Directory not found: {}", dir_path.display())?;
            tracing::warn!(dir=%dir_path.display(), "configured directory missing");
            summary.missing_dirs.push(dir_path);
            continue;
        }
        tracing::debug!(dir=%dir_path.display(), "scanning");

        for path in candidate_files(&dir_path, cfg) {
            let rel = path.strip_prefix(&cfg.root).unwrap_or(path.as_path()).to_path_buf();
            if cfg.is_excluded(&rel) {
                tracing::trace!(file=%rel.display(), "excluded");
                continue;
            }
            if cfg.is_safety_module_file(&rel) {
                tracing::debug!(file=%rel.display(), "skipping the safety module itself");
                continue;
            }
            if !seen.insert(path.clone()) {
                continue;
            }

            summary.files_processed += 1;
            match process_file(&path, cfg, mode) {
                FileOutcome::Modified { calls, import } => {
                    let label = match mode {
                        WriteMode::InPlace => "[OK] Modified",
                        WriteMode::DryRun => "[DRY-RUN] Would modify",
                    };
                    writeln!(out, "{}: {}", label, rel.display())?;
                    tracing::debug!(file=%rel.display(), calls, ?import, "rewritten");
                    summary.files_modified += 1;
                    summary.calls_rewritten += calls;
                    summary.modified.push(rel);
                }
                FileOutcome::Clean | FileOutcome::Unchanged => {}
                FileOutcome::Errored(err) => {
                    writeln!(out, "Error processing {}: {:#}", path.display(), err)?;
                    tracing::warn!(file=%path.display(), "{:#}", err);
                    summary.files_errored += 1;
                    summary.errors.push(FileError {
                        path,
                        message: format!("{:#}", err),
                    });
                }
            }
        }
    }

    tracing::info!(
        "processed={}, modified={}, errored={}",
        summary.files_processed,
        summary.files_modified,
        summary.files_errored
    );
    Ok(summary)
}
