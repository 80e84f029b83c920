mod check;
mod fix;

pub use check::check;
pub use fix::fix;

use crate::config::AppConfig;
use crate::report::RunSummary;
use crate::rewrite::{WriteMode, fix_tree};
use anyhow::Result;
use std::io::Write;

/// Run the pipeline and print either the text report or the JSON summary.
fn run(cfg: &AppConfig, mode: WriteMode, json: bool, out: &mut dyn Write) -> Result<RunSummary> {
    let summary = if json {
        fix_tree(cfg, mode, &mut std::io::sink())?
    } else {
        fix_tree(cfg, mode, out)?
    };
    if json {
        summary.render_json(out)?;
    } else {
        summary.render_text(out)?;
    }
    Ok(summary)
}
