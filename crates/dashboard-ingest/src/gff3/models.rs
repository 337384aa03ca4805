//! Record and envelope types stored for each feature type
//!
//! Every feature type is written as its own envelope:
//!
//! ```json
//! {"data": [{"type": "genes", "id": "DDB_G0267178", "attributes": {...}}]}
//! ```

use serde::{Deserialize, Serialize};

/// Feature types extracted with the region layout.
pub const REGION_TYPES: [&str; 2] = ["chromosome", "supercontig"];

/// How a requested feature type is turned into records.
///
/// The set of layouts is closed; any type name not listed in
/// [`REGION_TYPES`] is extracted with the generic layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Sequence regions: coordinates, length and a display name
    Region,
    /// Located features such as genes and pseudogenes
    Generic,
}

impl FeatureKind {
    pub fn for_type(feature_type: &str) -> Self {
        if REGION_TYPES.contains(&feature_type) {
            FeatureKind::Region
        } else {
            FeatureKind::Generic
        }
    }
}

/// Store field and envelope `type` for a feature type ("gene" -> "genes")
pub fn field_name(feature_type: &str) -> String {
    format!("{}s", feature_type)
}

/// A chromosome or supercontig
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub id: String,
    /// `end - start`; negative for inverted coordinates
    pub length: i64,
    pub start: i64,
    pub end: i64,
}

/// A gene, pseudogene or any other located feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub seqid: String,
    pub block_id: String,
    /// Empty when the source column is blank
    #[serde(default)]
    pub source: String,
    pub start: i64,
    pub end: i64,
    pub strand: String,
}

/// One entry of an envelope's `data` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource<A> {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub attributes: A,
}

/// Top-level document written per feature type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<A> {
    pub data: Vec<Resource<A>>,
}

impl<A> Default for Envelope<A> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}
