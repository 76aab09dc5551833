//! Serde types for xBD annotation documents.
//!
//! One document exists per disaster image. Pre-disaster documents carry
//! building geometry as WKT strings; post-disaster documents carry damage
//! subtypes. Both share the same `features.xy` list structure and join on
//! `properties.uid`.

use serde::Deserialize;

/// A full annotation document (`*_pre_disaster.json` or
/// `*_post_disaster.json`).
#[derive(Debug, Default, Deserialize)]
pub struct AnnotationDocument {
    #[serde(default)]
    pub features: FeatureSets,
}

/// The feature lists inside a document. Only the pixel-space (`xy`) list is
/// used for mask generation; the lng/lat list is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct FeatureSets {
    #[serde(default)]
    pub xy: Vec<Feature>,
}

/// One building entry.
#[derive(Debug, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
    /// Polygon boundary as well-known text. Present in pre-disaster
    /// documents; post-disaster geometry is ignored even when present.
    #[serde(default)]
    pub wkt: Option<String>,
}

/// Building metadata. `uid` is the join key between the pre and post
/// documents of a scene.
#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    pub uid: String,
    /// Damage subtype string, only meaningful in post-disaster documents.
    #[serde(default)]
    pub subtype: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pre_disaster_document() {
        let json = r#"{
            "features": {
                "xy": [
                    {
                        "properties": { "feature_type": "building", "uid": "a1" },
                        "wkt": "POLYGON ((10 10, 20 10, 20 20, 10 20, 10 10))"
                    }
                ]
            },
            "metadata": { "disaster": "guatemala-volcano" }
        }"#;

        let doc: AnnotationDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.features.xy.len(), 1);
        assert_eq!(doc.features.xy[0].properties.uid, "a1");
        assert!(doc.features.xy[0].wkt.as_deref().unwrap().starts_with("POLYGON"));
        assert!(doc.features.xy[0].properties.subtype.is_none());
    }

    #[test]
    fn parses_post_disaster_document() {
        let json = r#"{
            "features": {
                "xy": [
                    { "properties": { "uid": "a1", "subtype": "destroyed" } }
                ]
            }
        }"#;

        let doc: AnnotationDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.features.xy[0].properties.subtype.as_deref(), Some("destroyed"));
        assert!(doc.features.xy[0].wkt.is_none());
    }

    #[test]
    fn missing_features_treated_as_empty() {
        let doc: AnnotationDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.features.xy.is_empty());
    }
}
