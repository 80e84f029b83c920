use crate::config::AppConfig;
use crate::rewrite::patterns::CallKind;
use anyhow::{Result, bail};
use std::path::{Component, Path};

/// Number of directories between the scan root and the file itself.
pub fn depth_below_root(rel: &Path) -> Result<usize> {
    let mut segments = 0usize;
    for comp in rel.components() {
        match comp {
            Component::Normal(_) => segments += 1,
            Component::CurDir => {}
            _ => bail!("not a root-relative path: {}", rel.display()),
        }
    }
    if segments == 0 {
        bail!("empty relative path");
    }
    Ok(segments - 1)
}

/// Module specifier reaching `module` from a file `depth` levels below the root.
pub fn import_specifier(depth: usize, module: &str) -> String {
    if depth == 0 {
        format!("./{}", module)
    } else {
        format!("{}{}", "../".repeat(depth), module)
    }
}

pub fn import_declaration(specifier: &str) -> String {
    let names = CallKind::ALL.map(CallKind::safe_name).join(", ");
    format!("import {{ {} }} from '{}';", names, specifier)
}

/// Computes the import line to add for files below the configured root.
pub struct ImportResolver<'a> {
    cfg: &'a AppConfig,
}

impl<'a> ImportResolver<'a> {
    pub fn new(cfg: &'a AppConfig) -> Self {
        Self { cfg }
    }

    /// Depth comes from the file's path segments only, never from its content.
    pub fn declaration_for(&self, file: &Path) -> Result<String> {
        let rel = match file.strip_prefix(&self.cfg.root) {
            Ok(rel) => rel,
            Err(_) => bail!(
                "{} is outside of root {}",
                file.display(),
                self.cfg.root.display()
            ),
        };
        let depth = depth_below_root(rel)?;
        tracing::trace!(file=%rel.display(), depth, "resolved import depth");
        Ok(import_declaration(&import_specifier(
            depth,
            &self.cfg.safety_module,
        )))
    }
}
