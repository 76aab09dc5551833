//! Annotation join and polygon rasterization.
//!
//! Geometry is trusted from the pre-disaster document (the "where");
//! damage classification is trusted from the post-disaster document (the
//! "what happened"). The two are joined on the building `uid`.

use std::collections::BTreeMap;

use damage_map_masks_models::annotation::AnnotationDocument;
use damage_map_masks_models::damage::{DamageClass, DamageClassTable};
use geo::Polygon;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use wkt::TryFromWkt as _;

use crate::MaskJobConfig;

/// Extracts `(uid, polygon)` pairs from a pre-disaster document, in
/// document order. Document order matters: overlapping buildings are
/// painted in this order, later entries obscuring earlier ones.
///
/// Geometry strings that fail to parse are dropped (that building simply
/// contributes no pixels); this mirrors the dataset's tolerance for the
/// occasional malformed footprint.
#[must_use]
pub fn geometry_from_pre(doc: &AnnotationDocument) -> Vec<(String, Polygon<f64>)> {
    let mut geometry = Vec::with_capacity(doc.features.xy.len());

    for feature in &doc.features.xy {
        let Some(wkt_str) = feature.wkt.as_deref() else {
            log::debug!("Building {} has no geometry, dropping", feature.properties.uid);
            continue;
        };

        match Polygon::<f64>::try_from_wkt_str(wkt_str) {
            Ok(polygon) => geometry.push((feature.properties.uid.clone(), polygon)),
            Err(e) => {
                log::debug!(
                    "Dropping building {} with invalid geometry: {e}",
                    feature.properties.uid
                );
            }
        }
    }

    geometry
}

/// Extracts a `uid -> damage class` lookup from a post-disaster document.
#[must_use]
pub fn damage_from_post(
    doc: &AnnotationDocument,
    table: &DamageClassTable,
) -> BTreeMap<String, DamageClass> {
    doc.features
        .xy
        .iter()
        .map(|feature| {
            let class = table.class_for(feature.properties.subtype.as_deref());
            (feature.properties.uid.clone(), class)
        })
        .collect()
}

/// Renders a scene's class-index mask.
///
/// Every building with valid pre-disaster geometry is filled with its
/// post-disaster damage class; buildings absent from the post document
/// default to no-damage rather than background (they existed, they just
/// were not re-annotated). Pixels outside all buildings stay 0.
#[must_use]
pub fn render_mask(
    pre: &AnnotationDocument,
    post: &AnnotationDocument,
    config: &MaskJobConfig,
) -> GrayImage {
    let geometry = geometry_from_pre(pre);
    let damage = damage_from_post(post, &config.classes);

    let mut mask = GrayImage::new(config.width, config.height);

    for (uid, polygon) in &geometry {
        let class = damage.get(uid).copied().unwrap_or(DamageClass::NoDamage);

        let points = polygon_points(polygon);
        if points.len() < 3 {
            log::debug!("Building {uid} has a degenerate footprint, dropping");
            continue;
        }

        draw_polygon_mut(&mut mask, &points, Luma([class.as_u8()]));
    }

    mask
}

/// Converts a polygon exterior to integer pixel points.
///
/// WKT rings repeat the first coordinate at the end; `draw_polygon_mut`
/// closes the ring implicitly and rejects repeated endpoints, so trailing
/// duplicates are stripped here.
#[allow(clippy::cast_possible_truncation)]
fn polygon_points(polygon: &Polygon<f64>) -> Vec<Point<i32>> {
    let mut points: Vec<Point<i32>> = polygon
        .exterior()
        .coords()
        .map(|c| Point::new(c.x as i32, c.y as i32))
        .collect();

    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AnnotationDocument {
        serde_json::from_str(json).unwrap()
    }

    fn test_config() -> MaskJobConfig {
        let mut config = MaskJobConfig::new("unused", "unused");
        config.width = 32;
        config.height = 32;
        config
    }

    const PRE_SINGLE_SQUARE: &str = r#"{
        "features": { "xy": [
            {
                "properties": { "uid": "A" },
                "wkt": "POLYGON ((4 4, 20 4, 20 20, 4 20, 4 4))"
            }
        ] }
    }"#;

    #[test]
    fn destroyed_square_fills_interior_with_class_four() {
        let pre = parse(PRE_SINGLE_SQUARE);
        let post = parse(
            r#"{ "features": { "xy": [
                { "properties": { "uid": "A", "subtype": "destroyed" } }
            ] } }"#,
        );

        let mask = render_mask(&pre, &post, &test_config());

        assert_eq!(mask.get_pixel(10, 10)[0], 4);
        assert_eq!(mask.get_pixel(5, 5)[0], 4);
        // Outside the square stays background.
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(30, 30)[0], 0);
        assert!(mask.pixels().all(|p| p[0] == 0 || p[0] == 4));
    }

    #[test]
    fn building_missing_from_post_defaults_to_no_damage() {
        let pre = parse(PRE_SINGLE_SQUARE);
        let post = parse(r#"{ "features": { "xy": [] } }"#);

        let mask = render_mask(&pre, &post, &test_config());

        assert_eq!(mask.get_pixel(10, 10)[0], 1);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn later_building_paints_over_earlier_overlap() {
        let pre = parse(
            r#"{ "features": { "xy": [
                {
                    "properties": { "uid": "A" },
                    "wkt": "POLYGON ((2 2, 16 2, 16 16, 2 16, 2 2))"
                },
                {
                    "properties": { "uid": "B" },
                    "wkt": "POLYGON ((10 10, 24 10, 24 24, 10 24, 10 10))"
                }
            ] } }"#,
        );
        let post = parse(
            r#"{ "features": { "xy": [
                { "properties": { "uid": "A", "subtype": "destroyed" } },
                { "properties": { "uid": "B", "subtype": "minor-damage" } }
            ] } }"#,
        );

        let mask = render_mask(&pre, &post, &test_config());

        // Overlap region takes B's class (last drawn wins).
        assert_eq!(mask.get_pixel(12, 12)[0], 2);
        // Non-overlapping parts keep their own classes.
        assert_eq!(mask.get_pixel(4, 4)[0], 4);
        assert_eq!(mask.get_pixel(20, 20)[0], 2);
    }

    #[test]
    fn invalid_wkt_drops_only_that_building() {
        let pre = parse(
            r#"{ "features": { "xy": [
                { "properties": { "uid": "bad" }, "wkt": "POLYGON ((oops" },
                {
                    "properties": { "uid": "good" },
                    "wkt": "POLYGON ((4 4, 12 4, 12 12, 4 12, 4 4))"
                }
            ] } }"#,
        );
        let post = parse(
            r#"{ "features": { "xy": [
                { "properties": { "uid": "good", "subtype": "major-damage" } }
            ] } }"#,
        );

        let geometry = geometry_from_pre(&pre);
        assert_eq!(geometry.len(), 1);
        assert_eq!(geometry[0].0, "good");

        let mask = render_mask(&pre, &post, &test_config());
        assert_eq!(mask.get_pixel(8, 8)[0], 3);
    }

    #[test]
    fn empty_documents_yield_all_background() {
        let pre = parse("{}");
        let post = parse("{}");

        let mask = render_mask(&pre, &post, &test_config());
        assert_eq!(mask.dimensions(), (32, 32));
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn damage_lookup_translates_subtypes() {
        let post = parse(
            r#"{ "features": { "xy": [
                { "properties": { "uid": "a", "subtype": "un-classified" } },
                { "properties": { "uid": "b", "subtype": "not-a-real-label" } },
                { "properties": { "uid": "c" } }
            ] } }"#,
        );

        let damage = damage_from_post(&post, &DamageClassTable::default());
        assert_eq!(damage["a"], DamageClass::NoDamage);
        assert_eq!(damage["b"], DamageClass::Background);
        assert_eq!(damage["c"], DamageClass::NoDamage);
    }
}
