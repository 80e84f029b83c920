use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "safe-log-fixer.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory that import depth is measured from.
    pub root: PathBuf,
    /// Root-relative directories to scan, in order.
    pub dirs: Vec<PathBuf>,
    /// File extensions (without the dot) that are candidates for rewriting.
    pub extensions: Vec<String>,
    /// Root-relative module path of the sanitizing logger, without extension.
    pub safety_module: String,
    pub exclude: Vec<Pattern>,
}

// --- Raw TOML structures ---
#[derive(Deserialize)]
struct ConfigFile {
    safe_log_fixer: Option<FixerToml>,
}

#[derive(Deserialize, Default)]
struct FixerToml {
    root: Option<String>,
    dirs: Option<Vec<String>>,
    extensions: Option<Vec<String>>,
    safety_module: Option<String>,
    exclude: Option<Vec<String>>,
}

impl AppConfig {
    /// Load configuration from `path`, or from `safe-log-fixer.toml` in the
    /// working directory. Only an explicitly requested file has to exist.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match config_path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            tracing::debug!("{} not found, using built-in defaults", path.display());
            return Self::from_raw(FixerToml::default(), Path::new(""));
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        let Some(raw) = file.safe_log_fixer else {
            bail!("[safe_log_fixer] not found in {}", path.display());
        };
        let base = path.parent().unwrap_or(Path::new(""));
        Self::from_raw(raw, base)
    }

    fn from_raw(raw: FixerToml, base: &Path) -> Result<Self> {
        let root = PathBuf::from(raw.root.as_deref().unwrap_or("saknew_frontend"));
        let root = if root.is_absolute() {
            root
        } else {
            base.join(root)
        };

        let dirs = raw
            .dirs
            .unwrap_or_else(|| {
                ["services", "screens", "components", "utils", "context"]
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .into_iter()
            .map(PathBuf::from)
            .collect::<Vec<_>>();

        let extensions = raw
            .extensions
            .unwrap_or_else(|| vec!["ts".into(), "tsx".into()])
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if extensions.is_empty() {
            bail!("extensions must name at least one file extension");
        }

        let safety_module = raw
            .safety_module
            .unwrap_or_else(|| "utils/securityUtils".to_string());
        validate_module_path(&safety_module)?;

        let exclude = raw
            .exclude
            .unwrap_or_default()
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern: {}", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            root,
            dirs,
            extensions,
            safety_module,
            exclude,
        })
    }

    /// Name that marks a file as already importing the safety module.
    pub fn safety_module_name(&self) -> &str {
        self.safety_module
            .rsplit('/')
            .next()
            .unwrap_or(&self.safety_module)
    }

    /// True when `rel` (root-relative) is the safety module's own source file.
    pub fn is_safety_module_file(&self, rel: &Path) -> bool {
        let stem = rel.with_extension("");
        stem.as_path() == Path::new(&self.safety_module)
            && rel
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| self.has_extension(e))
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext)
    }

    pub fn is_excluded(&self, rel: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches_path(rel))
    }
}

fn validate_module_path(module: &str) -> Result<()> {
    let path = Path::new(module);
    if module.is_empty() || path.is_absolute() {
        bail!("safety_module must be a root-relative path: {:?}", module);
    }
    if path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("safety_module must not contain '.' or '..' segments: {:?}", module);
    }
    Ok(())
}
