use crate::config::AppConfig;
use crate::rewrite::WriteMode;
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::Path;

/// Execute the check command: report what `fix` would change without writing
pub fn check(config: Option<&str>, strict: bool, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    check_to(config, strict, json, &mut stdout.lock())
}

pub(crate) fn check_to(
    config: Option<&str>,
    strict: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new)).context("failed to load config")?;
    tracing::info!(root=%cfg.root.display(), "check start (dry-run)");

    let summary = super::run(&cfg, WriteMode::DryRun, json, out)?;

    if strict && (summary.files_modified > 0 || summary.files_errored > 0) {
        bail!(
            "unsafe logging calls remain in {} files ({} errored)",
            summary.files_modified,
            summary.files_errored
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config_file(dir: &Path) -> String {
        let config_file = dir.join("safe-log-fixer.toml");
        fs::write(
            &config_file,
            "[safe_log_fixer]\nroot = \"app\"\ndirs = [\"screens\"]\n",
        )
        .unwrap();
        config_file.to_string_lossy().to_string()
    }

    #[test]
    fn test_check_invalid_config() {
        let result = check_to(Some("nonexistent_config.toml"), false, false, &mut Vec::new());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("failed to load config")
        );
    }

    #[test]
    fn test_check_with_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = create_test_config_file(temp_dir.path());

        // missing directories are reported, not fatal
        let mut out = Vec::new();
        let result = check_to(Some(&config_file), true, false, &mut out);
        assert!(result.is_ok());
        assert!(String::from_utf8(out).unwrap().contains("Directory not found:"));
    }

    #[test]
    fn test_check_strict_fails_on_pending_rewrites() {
        let temp_dir = TempDir::new().unwrap();
        let screens = temp_dir.path().join("app").join("screens");
        fs::create_dir_all(&screens).unwrap();
        let screen = screens.join("Home.tsx");
        fs::write(&screen, "import React from 'react';\nconsole.error(e);\n").unwrap();
        let config_file = create_test_config_file(temp_dir.path());

        let mut out = Vec::new();
        assert!(check_to(Some(&config_file), false, false, &mut out).is_ok());
        assert!(String::from_utf8(out).unwrap().contains("Files to modify: 1"));
        assert!(check_to(Some(&config_file), true, false, &mut Vec::new()).is_err());
        assert_eq!(
            fs::read_to_string(&screen).unwrap(),
            "import React from 'react';\nconsole.error(e);\n"
        );
    }
}
