//! Wire types for uploaded and exported tracklet files.
//!
//! Upload records are checked strictly at this boundary and converted to
//! the store's [`Tracklet`] model. Export records carry only ids and image
//! names; aliases and any display metadata are dropped.

use serde::{Deserialize, Deserializer, Serialize};
use tb_app_state::Tracklet;

/// An image entry as it appears in a file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub name: String,
}

/// A tracklet as uploaded. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TrackletRecord {
    #[serde(deserialize_with = "deserialize_tracklet_id")]
    pub tracklet_id: String,
    /// Missing or `null` both mean no alias.
    #[serde(default)]
    pub tracklet_alias: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
}

impl From<TrackletRecord> for Tracklet {
    fn from(record: TrackletRecord) -> Self {
        let tracklet = Tracklet::with_images(
            record.tracklet_id,
            record.images.into_iter().map(|img| img.name),
        );
        match record.tracklet_alias {
            Some(alias) => tracklet.alias(alias),
            None => tracklet,
        }
    }
}

/// Tracklet ids are strings, but integer ids are accepted and rendered in
/// decimal. Anything else is rejected.
fn deserialize_tracklet_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Text(id) => Ok(id),
        RawId::Number(n) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        RawId::Number(n) => Err(serde::de::Error::custom(format!(
            "tracklet_id must be a string or an integer, got {n}"
        ))),
    }
}

/// One tracklet in an export file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTracklet {
    pub tracklet_id: String,
    pub images: Vec<ImageRecord>,
}

/// Top-level export document: `{ "tracklets": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub tracklets: Vec<ExportTracklet>,
}

impl ExportDocument {
    pub fn total_images(&self) -> usize {
        self.tracklets.iter().map(|t| t.images.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_with_all_fields() {
        let record: TrackletRecord = serde_json::from_str(
            r#"{"tracklet_id":"3","tracklet_alias":"bike","images":[{"name":"3_a.jpg","path":"x","color":"red"}]}"#,
        )
        .unwrap();
        assert_eq!(record.tracklet_id, "3");
        assert_eq!(record.tracklet_alias.as_deref(), Some("bike"));
        assert_eq!(record.images, vec![ImageRecord { name: "3_a.jpg".into() }]);

        let tracklet = Tracklet::from(record);
        assert_eq!(tracklet.display_name(), "bike");
        assert_eq!(tracklet.image_names().collect::<Vec<_>>(), ["3_a.jpg"]);
    }

    #[test]
    fn missing_or_null_alias_is_absent() {
        let a: TrackletRecord =
            serde_json::from_str(r#"{"tracklet_id":"1","images":[]}"#).unwrap();
        let b: TrackletRecord =
            serde_json::from_str(r#"{"tracklet_id":"1","tracklet_alias":null,"images":[]}"#)
                .unwrap();
        assert!(a.tracklet_alias.is_none());
        assert!(b.tracklet_alias.is_none());
        assert!(Tracklet::from(a).alias.is_none());
    }

    #[test]
    fn missing_images_default_to_empty() {
        let record: TrackletRecord = serde_json::from_str(r#"{"tracklet_id":"1"}"#).unwrap();
        assert!(record.images.is_empty());
    }

    #[test]
    fn integer_ids_are_accepted() {
        let record: TrackletRecord = serde_json::from_str(r#"{"tracklet_id":12}"#).unwrap();
        assert_eq!(record.tracklet_id, "12");
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(serde_json::from_str::<TrackletRecord>(r#"{"tracklet_id":1.5}"#).is_err());
        assert!(serde_json::from_str::<TrackletRecord>(r#"{"tracklet_id":true}"#).is_err());
        assert!(serde_json::from_str::<TrackletRecord>(r#"{"images":[]}"#).is_err());
        assert!(serde_json::from_str::<TrackletRecord>(
            r#"{"tracklet_id":"1","images":[{"path":"x"}]}"#
        )
        .is_err());
    }

    #[test]
    fn export_document_shape() {
        let doc = ExportDocument {
            tracklets: vec![ExportTracklet {
                tracklet_id: "0".into(),
                images: vec![ImageRecord { name: "0_a".into() }],
            }],
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["tracklets"][0]["tracklet_id"], "0");
        assert_eq!(json["tracklets"][0]["images"][0]["name"], "0_a");
        assert_eq!(doc.total_images(), 1);
    }
}
