use std::path::Path;

use anyhow::Context as _;

/// Reads the `If-Modified-Since` value left by the previous run. A missing
/// file is the normal first-run case, not an error.
pub fn load(path: &Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            Ok(Some(trimmed.to_owned()))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no previous marker file");
            Ok(None)
        }
        Err(err) => {
            Err(err).with_context(|| format!("read marker file: {}", path.display()))
        }
    }
}

pub fn store(path: &Path, raw: &str) -> anyhow::Result<()> {
    std::fs::write(path, raw)
        .with_context(|| format!("write marker file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), marker = raw, "stored marker");
    Ok(())
}
