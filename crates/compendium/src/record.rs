//! Observation records and where they come from.
//!
//! Records are owned by an external CRUD service; this crate only reads them.
//! Every field is optional on input so a partially filled or malformed record
//! still exports.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::artifact::Artifact;
use crate::error::{Error, Result};

/// A stored field observation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// Identifier assigned by the persistence layer.
    #[serde(rename = "_id", default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    /// Who made the observation.
    #[serde(default, deserialize_with = "lenient_string")]
    pub researcher_name: Option<String>,
    /// Common name of the species.
    #[serde(default, deserialize_with = "lenient_string")]
    pub common_name: Option<String>,
    /// Scientific name of the species.
    #[serde(default, deserialize_with = "lenient_string")]
    pub scientific_name: Option<String>,
    /// Where it was found.
    #[serde(default, deserialize_with = "lenient_string")]
    pub habitat: Option<String>,
    /// Free-text notes.
    #[serde(default, deserialize_with = "lenient_string")]
    pub field_notes: Option<String>,
    /// Sketch or photo artifact.
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_data: Option<String>,
    /// Creation timestamp.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(default, deserialize_with = "lenient_string")]
    pub updated_at: Option<String>,
}

impl ObservationRecord {
    /// The record's image as an artifact.
    #[must_use]
    pub fn artifact(&self) -> Artifact {
        Artifact::from(self.image_data.clone())
    }
}

/// Accept any JSON scalar where a string is expected; `null` becomes `None`.
///
/// Stored records are not schema-checked, so timestamps and ids sometimes
/// arrive as numbers.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}

/// Supplies the complete, unfiltered record set.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch every record, in storage order.
    async fn fetch_all(&self) -> Result<Vec<ObservationRecord>>;
}

#[async_trait]
impl RecordSource for Vec<ObservationRecord> {
    async fn fetch_all(&self) -> Result<Vec<ObservationRecord>> {
        Ok(self.clone())
    }
}

/// Records read from a JSON array dump of the list endpoint.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The dump file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_all(&self) -> Result<Vec<ObservationRecord>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            Error::record_source(format!("cannot read {}: {e}", self.path.display()))
        })?;

        let records: Vec<ObservationRecord> = serde_json::from_str(&text).map_err(|e| {
            Error::record_source(format!("{} is not a record array: {e}", self.path.display()))
        })?;

        debug!(count = records.len(), path = %self.path.display(), "loaded records");
        Ok(records)
    }
}
