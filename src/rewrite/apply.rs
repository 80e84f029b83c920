use crate::config::AppConfig;
use crate::rewrite::imports::ImportResolver;
use crate::rewrite::patterns::{
    has_safe_import, has_unsafe_call, import_insertion_point, replace_unsafe_calls, unsafe_calls,
};
use crate::utils::write_atomic;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    InPlace,
    DryRun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportEdit {
    AlreadyPresent,
    Inserted,
    /// The file has no import to anchor on; calls are still rewritten.
    NoAnchor,
}

#[derive(Debug)]
pub enum FileOutcome {
    Modified { calls: usize, import: ImportEdit },
    /// No unsafe call in the file.
    Clean,
    /// Unsafe calls were found but rewriting produced identical text.
    Unchanged,
    Errored(anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    pub calls: usize,
    pub import: ImportEdit,
}

/// Insert `declaration` on its own line after the last import. Keeps CRLF
/// files CRLF.
pub fn insert_import(text: &str, declaration: &str) -> Option<String> {
    let mut pos = import_insertion_point(text)?;
    let newline = if pos > 0 && text.as_bytes()[pos - 1] == b'\r' {
        pos -= 1;
        "\r\n"
    } else {
        "\n"
    };
    let mut out = String::with_capacity(text.len() + declaration.len() + 2);
    out.push_str(&text[..pos]);
    out.push_str(newline);
    out.push_str(declaration);
    out.push_str(&text[pos..]);
    Some(out)
}

/// Pure text transformation for a file known to contain unsafe calls. The
/// declaration is only computed when an import has to be added.
pub fn rewrite_source<F>(original: &str, module_name: &str, declaration: F) -> Result<Rewritten>
where
    F: FnOnce() -> Result<String>,
{
    let (text, import) = if has_safe_import(original, module_name) {
        (original.to_string(), ImportEdit::AlreadyPresent)
    } else {
        match insert_import(original, &declaration()?) {
            Some(text) => (text, ImportEdit::Inserted),
            None => (original.to_string(), ImportEdit::NoAnchor),
        }
    };
    let calls = unsafe_calls(&text).count();
    let text = replace_unsafe_calls(&text).into_owned();
    Ok(Rewritten {
        text,
        calls,
        import,
    })
}

/// Read, transform and (unless dry-running) write back one file. Never
/// returns an error: failures become [`FileOutcome::Errored`].
pub fn process_file(path: &Path, cfg: &AppConfig, mode: WriteMode) -> FileOutcome {
    match try_process_file(path, cfg, mode) {
        Ok(outcome) => outcome,
        Err(err) => FileOutcome::Errored(err),
    }
}

fn try_process_file(path: &Path, cfg: &AppConfig, mode: WriteMode) -> Result<FileOutcome> {
    let original =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    if !has_unsafe_call(&original) {
        tracing::trace!(file=%path.display(), "no unsafe logging calls");
        return Ok(FileOutcome::Clean);
    }

    let resolver = ImportResolver::new(cfg);
    let rewritten = rewrite_source(&original, cfg.safety_module_name(), || {
        resolver.declaration_for(path)
    })?;

    if rewritten.text == original {
        tracing::debug!(file=%path.display(), "rewrite produced identical text");
        return Ok(FileOutcome::Unchanged);
    }
    if rewritten.import == ImportEdit::NoAnchor {
        tracing::debug!(file=%path.display(), "no import declaration found, import not added");
    }

    match mode {
        WriteMode::InPlace => write_atomic(path, &rewritten.text)?,
        WriteMode::DryRun => tracing::debug!(file=%path.display(), "dry-run: not writing"),
    }
    Ok(FileOutcome::Modified {
        calls: rewritten.calls,
        import: rewritten.import,
    })
}
