use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write `output` when it resolves to the same file as `input`.
pub fn ensure_output_differs(output: &Path, input: &Path) -> Result<()> {
    let resolved_output = resolve(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let resolved_input = resolve(input)
        .with_context(|| format!("failed to resolve input path {}", input.display()))?;

    if resolved_output == resolved_input {
        bail!(
            "refusing to overwrite source file {}; use `apply` to rewrite it in place",
            input.display()
        );
    }
    Ok(())
}

fn resolve(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: `..` segments stay unresolved.
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir().context("current_dir")?.join(path))
    }
}
