use crate::config::AppConfig;
use crate::rewrite::WriteMode;
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;

/// Execute the fix command
pub fn fix(config: Option<&str>, strict: bool, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    fix_to(config, strict, json, &mut stdout.lock())
}

pub(crate) fn fix_to(
    config: Option<&str>,
    strict: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new)).context("failed to load config")?;
    tracing::info!(root=%cfg.root.display(), dirs=cfg.dirs.len(), "fix start");

    let summary = super::run(&cfg, WriteMode::InPlace, json, out)?;

    if strict && summary.files_errored > 0 {
        bail!(
            "{} of {} files could not be processed",
            summary.files_errored,
            summary.files_processed
        );
    }
    Ok(())
}
