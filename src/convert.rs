use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::ConvertArgs;
use crate::fetch::FreshnessMarker;
use crate::formats::{ConvertedDocument, ConvertedNode, RawFeed, RawRouter};

/// One pass over the feed's router list, in feed order. Records that cannot be
/// converted are dropped with a diagnostic; one bad record never aborts the run.
pub fn convert(feed: &RawFeed, marker: &FreshnessMarker) -> ConvertedDocument {
    let mut nodes: BTreeMap<String, ConvertedNode> = BTreeMap::new();

    for (index, router) in feed.routers.iter().enumerate() {
        let community = router.community.as_deref().unwrap_or("<unknown>");

        let Some(id) = router.id.as_deref() else {
            tracing::warn!("router record #{index} in community {community} has no id; skipped");
            continue;
        };
        let Some(name) = router.name.as_deref() else {
            tracing::warn!("router {id} in community {community} has no name; skipped");
            continue;
        };

        let (Some(lat), Some(lon)) = (
            parse_coordinate(router.lat.as_ref()),
            parse_coordinate(router.long.as_ref()),
        ) else {
            tracing::warn!("router {id} in community {community} has invalid lat or lon; skipped");
            continue;
        };

        let online = router.status.as_deref() == Some("online");
        nodes.insert(
            id.to_owned(),
            ConvertedNode {
                online,
                lat,
                lon,
                name: name.to_owned(),
            },
        );
    }

    tracing::info!(count = nodes.len(), "converted nodes");

    ConvertedDocument {
        timestamp: marker.epoch,
        nodes,
    }
}

/// Accepts both JSON numbers and numeric strings; anything else (or a
/// non-finite value) is a parse failure.
fn parse_coordinate(value: Option<&serde_json::Value>) -> Option<f64> {
    let parsed = match value? {
        serde_json::Value::Number(number) => number.as_f64()?,
        serde_json::Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Offline variant of the convert+write stages: reads a saved feed file
/// instead of hitting the network. Useful when debugging a feed snapshot.
pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let feed_path = PathBuf::from(&args.feed);
    let contents = std::fs::read(&feed_path)
        .with_context(|| format!("read feed file: {}", feed_path.display()))?;
    let feed: RawFeed = serde_json::from_slice(&contents)
        .with_context(|| format!("decode feed file: {}", feed_path.display()))?;

    let marker = FreshnessMarker::parse(&args.last_modified).context("parse --last-modified")?;

    let document = convert(&feed, &marker);
    crate::output::write_document(&PathBuf::from(&args.out), &document)
        .context("write converted nodes")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> FreshnessMarker {
        FreshnessMarker {
            raw: "Mon, 01 Jan 2024 00:00:00 GMT".to_owned(),
            epoch: 1_704_067_200,
        }
    }

    fn router(id: &str, status: &str, lat: serde_json::Value, long: serde_json::Value) -> RawRouter {
        RawRouter {
            id: Some(id.to_owned()),
            status: Some(status.to_owned()),
            lat: Some(lat),
            long: Some(long),
            name: Some(id.to_uppercase()),
            community: Some("c1".to_owned()),
        }
    }

    #[test]
    fn string_and_number_coordinates_both_convert() {
        let feed = RawFeed {
            routers: vec![
                router("a", "online", "52.5".into(), "13.4".into()),
                router("b", "offline", serde_json::json!(48.1), serde_json::json!(11.6)),
            ],
        };

        let document = convert(&feed, &marker());

        assert_eq!(document.nodes.len(), 2);
        assert_eq!(
            document.nodes["a"],
            ConvertedNode {
                online: true,
                lat: 52.5,
                lon: 13.4,
                name: "A".to_owned(),
            }
        );
        assert_eq!(document.nodes["b"].lat, 48.1);
        assert_eq!(document.nodes["b"].lon, 11.6);
    }

    #[test]
    fn online_requires_exact_status_match() {
        let feed = RawFeed {
            routers: vec![
                router("a", "online", "1.0".into(), "2.0".into()),
                router("b", "Online", "1.0".into(), "2.0".into()),
                router("c", "offline", "1.0".into(), "2.0".into()),
                RawRouter {
                    status: None,
                    ..router("d", "", "1.0".into(), "2.0".into())
                },
            ],
        };

        let document = convert(&feed, &marker());

        assert!(document.nodes["a"].online);
        assert!(!document.nodes["b"].online);
        assert!(!document.nodes["c"].online);
        assert!(!document.nodes["d"].online);
    }

    #[test]
    fn bad_coordinates_drop_only_the_offending_record() {
        let feed = RawFeed {
            routers: vec![
                router("a", "online", "52.5".into(), "13.4".into()),
                router("b", "offline", "bad".into(), "13.0".into()),
                RawRouter {
                    lat: None,
                    ..router("c", "online", "0.0".into(), "9.9".into())
                },
                router("d", "online", serde_json::Value::Bool(true), "9.9".into()),
            ],
        };

        let document = convert(&feed, &marker());

        assert_eq!(document.nodes.len(), 1);
        assert!(document.nodes.contains_key("a"));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let feed = RawFeed {
            routers: vec![
                router("a", "online", "inf".into(), "13.4".into()),
                router("b", "online", "52.5".into(), "NaN".into()),
            ],
        };

        assert!(convert(&feed, &marker()).nodes.is_empty());
    }

    #[test]
    fn records_missing_id_or_name_are_skipped() {
        let feed = RawFeed {
            routers: vec![
                RawRouter {
                    id: None,
                    ..router("x", "online", "1.0".into(), "2.0".into())
                },
                RawRouter {
                    name: None,
                    ..router("y", "online", "1.0".into(), "2.0".into())
                },
                router("z", "online", "1.0".into(), "2.0".into()),
            ],
        };

        let document = convert(&feed, &marker());

        assert_eq!(document.nodes.len(), 1);
        assert!(document.nodes.contains_key("z"));
    }

    #[test]
    fn timestamp_comes_from_the_marker() {
        let feed = RawFeed { routers: vec![] };
        let document = convert(&feed, &marker());
        assert_eq!(document.timestamp, 1_704_067_200);
        assert!(document.nodes.is_empty());
    }
}
