use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::formats::ConvertedDocument;

/// Writes the document to `path` and a gzip copy of the exact same bytes to
/// `<path>.gz`. Both files land via a temp-file rename in the destination
/// directory, so an aborted run never leaves a partial or stale-mixed output.
pub fn write_document(path: &Path, document: &ConvertedDocument) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec(document).context("serialize converted document")?;

    let dir = parent_dir(path)?;
    let gz_path = gz_sibling(path);

    let mut plain = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in: {}", dir.display()))?;
    plain
        .write_all(&bytes)
        .context("write converted document")?;

    let mut gz = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in: {}", dir.display()))?;
    let mut encoder = GzEncoder::new(&mut gz, Compression::default());
    encoder
        .write_all(&bytes)
        .context("write gzip converted document")?;
    encoder.finish().context("finish gzip stream")?;

    plain
        .persist(path)
        .with_context(|| format!("replace output: {}", path.display()))?;
    gz.persist(&gz_path)
        .with_context(|| format!("replace output: {}", gz_path.display()))?;

    tracing::info!(path = %path.display(), gz = %gz_path.display(), "wrote node files");
    Ok(())
}

fn parent_dir(path: &Path) -> anyhow::Result<&Path> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("output path has no parent: {}", path.display()))?;
    // A bare file name like "nodes.json" has an empty parent.
    if dir.as_os_str().is_empty() {
        return Ok(Path::new("."));
    }
    Ok(dir)
}

fn gz_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Read as _;

    use flate2::read::GzDecoder;

    use super::*;
    use crate::formats::ConvertedNode;

    fn document() -> ConvertedDocument {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "a".to_owned(),
            ConvertedNode {
                online: true,
                lat: 52.5,
                lon: 13.4,
                name: "A".to_owned(),
            },
        );
        ConvertedDocument {
            timestamp: 1_704_067_200,
            nodes,
        }
    }

    #[test]
    fn gzip_copy_matches_plain_file_byte_for_byte() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let out = temp.path().join("nodes.json");

        write_document(&out, &document())?;

        let plain = std::fs::read(&out)?;
        let mut decompressed = Vec::new();
        GzDecoder::new(std::fs::File::open(temp.path().join("nodes.json.gz"))?)
            .read_to_end(&mut decompressed)?;
        assert_eq!(plain, decompressed);

        let parsed: ConvertedDocument = serde_json::from_slice(&plain)?;
        assert_eq!(parsed.timestamp, 1_704_067_200);
        assert_eq!(parsed.nodes["a"].name, "A");
        Ok(())
    }

    #[test]
    fn rewrite_replaces_previous_contents() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let out = temp.path().join("nodes.json");

        write_document(&out, &document())?;
        let mut updated = document();
        updated.timestamp = 1_704_153_600;
        write_document(&out, &updated)?;

        let parsed: ConvertedDocument = serde_json::from_slice(&std::fs::read(&out)?)?;
        assert_eq!(parsed.timestamp, 1_704_153_600);
        Ok(())
    }
}
