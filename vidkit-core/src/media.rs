// ============================================================================
// vidkit-core/src/media.rs
// ============================================================================
//
// MEDIA DETAILS: Probe Result Parsing, Merging and Per-Asset Caching
//
// Media details are built from two probe results: the size/dimension query
// (small JSON document, numbers often encoded as strings) and the full
// media-information document. The size query wins for `size`, `width` and
// `height`; everything else comes from the full document.
//
// The cache holds at most one `MediaDetails` per asset and only ever for the
// asset's current path. Entries are replaced wholesale, never patched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// Details about one media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    /// Container size in bytes
    pub size: u64,
    /// Width of the first video stream in pixels
    pub width: u64,
    /// Height of the first video stream in pixels
    pub height: u64,
    /// Extension resolved from the asset path
    pub extension: String,
    /// Every other field of the full media-information result
    #[serde(flatten)]
    pub raw: Map<String, Value>,
}

/// Size and dimensions extracted from the size probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeProbe {
    pub size: u64,
    pub width: u64,
    pub height: u64,
}

#[derive(Debug, Deserialize)]
struct SizeProbeDocument {
    #[serde(default)]
    streams: Vec<Map<String, Value>>,
    format: Option<Map<String, Value>>,
}

/// Parses the JSON printed by the size probe.
///
/// Expected shape: `{"streams": [{"width": 640, "height": 360}], "format": {"size": "15804433"}}`.
pub fn parse_size_probe(raw: &str) -> CoreResult<SizeProbe> {
    let doc: SizeProbeDocument = serde_json::from_str(raw)?;

    let format = doc
        .format
        .ok_or_else(|| CoreError::ProbeParse("missing 'format' section".to_string()))?;
    let stream = doc
        .streams
        .first()
        .ok_or_else(|| CoreError::ProbeParse("no video stream reported".to_string()))?;

    Ok(SizeProbe {
        size: numeric_field(&format, "size")?,
        width: numeric_field(stream, "width")?,
        height: numeric_field(stream, "height")?,
    })
}

fn numeric_field(section: &Map<String, Value>, key: &str) -> CoreResult<u64> {
    let value = section
        .get(key)
        .ok_or_else(|| CoreError::ProbeParse(format!("missing field '{key}'")))?;
    coerce_u64(value)
        .ok_or_else(|| CoreError::ProbeParse(format!("field '{key}' is not numeric: {value}")))
}

/// Coerces a JSON number or numeric string into `u64`.
fn coerce_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}

/// Merges the size probe into the full media-information result.
pub fn merge_details(
    media_information: Value,
    sizes: SizeProbe,
    extension: &str,
) -> CoreResult<MediaDetails> {
    let mut raw = match media_information {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(CoreError::ProbeParse(format!(
                "media information is not an object: {other}"
            )));
        }
    };
    for key in ["size", "width", "height", "extension"] {
        raw.remove(key);
    }

    Ok(MediaDetails {
        size: sizes.size,
        width: sizes.width,
        height: sizes.height,
        extension: extension.to_string(),
        raw,
    })
}

// ============================================================================
// CACHE
// ============================================================================

/// Per-asset probe cache: empty, or populated for the current path.
#[derive(Debug, Default, Clone)]
pub struct DetailsCache {
    entry: Option<Arc<MediaDetails>>,
}

impl DetailsCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Option<Arc<MediaDetails>> {
        self.entry.clone()
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }

    /// Replaces the cached value and returns the shared handle to it.
    pub fn store(&mut self, details: MediaDetails) -> Arc<MediaDetails> {
        let details = Arc::new(details);
        self.entry = Some(Arc::clone(&details));
        details
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }
}
