use std::path::PathBuf;

use anyhow::Context as _;
use url::Url;

use crate::cli::SyncArgs;
use crate::fetch::FetchOutcome;

/// The full pipeline: conditional fetch, convert, write, persist the marker.
/// Strictly sequential; a stop at any stage leaves everything on disk as the
/// previous run left it.
pub async fn run(args: SyncArgs) -> anyhow::Result<()> {
    let url = Url::parse(&args.url).context("parse --url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {url}");
    }

    let marker_path = PathBuf::from(&args.marker_file);
    let out_path = PathBuf::from(&args.out);

    let previous_marker =
        crate::marker_store::load(&marker_path).context("load previous marker")?;
    tracing::debug!(?previous_marker, "conditional fetch");

    let client = crate::fetch::build_client(args.timeout_secs)?;
    let outcome = crate::fetch::fetch(&client, &url, previous_marker.as_deref())
        .await
        .context("fetch feed")?;

    let (feed, marker) = match outcome {
        FetchOutcome::NewData { feed, marker } => (feed, marker),
        FetchOutcome::Unchanged { status } => {
            anyhow::bail!("no new feed data (HTTP {status}); nothing written");
        }
    };

    let document = crate::convert::convert(&feed, &marker);
    crate::output::write_document(&out_path, &document).context("write converted nodes")?;

    // Only after both output files landed; a failed write must not advance the
    // marker or the next run would skip the re-fetch.
    crate::marker_store::store(&marker_path, &marker.raw).context("store marker")?;

    Ok(())
}
