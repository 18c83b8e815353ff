use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The feed as published by api.freifunk.net. Read once, dropped after conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeed {
    #[serde(rename = "allTheRouters")]
    pub routers: Vec<RawRouter>,
}

/// One router record from the feed. Every field is optional at the serde level
/// so a single malformed record reaches the converter (which skips it with a
/// diagnostic) instead of failing the whole body parse.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRouter {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// The feed sends coordinates both as JSON numbers and as numeric strings.
    #[serde(default)]
    pub lat: Option<serde_json::Value>,
    #[serde(default, rename = "long")]
    pub long: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub community: Option<String>,
}

/// Output schema consumed by the Auto Connect app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedDocument {
    /// Epoch seconds of the feed's `Last-Modified` date, not wall-clock run time.
    pub timestamp: i64,
    pub nodes: BTreeMap<String, ConvertedNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertedNode {
    pub online: bool,
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}
