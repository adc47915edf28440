//! GeoJSON export of persisted structure sets

use geojson::{feature::Id, Feature, FeatureCollection, Geometry, Value};
use roofline_core::models::{GeoPoint, StructureRecord};
use serde_json::{Map, Value as JsonValue};

fn ring_positions(ring: &[GeoPoint]) -> Vec<Vec<f64>> {
    let mut positions: Vec<Vec<f64>> = ring.iter().map(|p| vec![p.lng, p.lat]).collect();
    // GeoJSON linear rings must be explicitly closed
    if let (Some(first), Some(last)) = (positions.first().cloned(), positions.last()) {
        if &first != last {
            positions.push(first);
        }
    }
    positions
}

pub fn structure_to_feature(record: &StructureRecord) -> Feature {
    let mut properties = Map::new();
    properties.insert("site_id".to_string(), JsonValue::from(record.site_id.as_str()));
    properties.insert("area_sq_ft".to_string(), JsonValue::from(record.area_sq_ft));
    properties.insert("perimeter_ft".to_string(), JsonValue::from(record.perimeter_ft));
    properties.insert("confidence".to_string(), JsonValue::from(record.confidence));
    properties.insert("included".to_string(), JsonValue::from(record.included));

    Feature {
        geometry: Some(Geometry::new(Value::Polygon(vec![ring_positions(&record.ring)]))),
        properties: Some(properties),
        id: Some(Id::String(record.structure_id.0.clone())),
        bbox: None,
        foreign_members: None,
    }
}

/// One Polygon feature per structure, in record order
pub fn structures_to_feature_collection(records: &[StructureRecord]) -> FeatureCollection {
    FeatureCollection {
        features: records.iter().map(structure_to_feature).collect(),
        bbox: None,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roofline_core::models::{SiteId, StructureId};

    fn record(closed: bool) -> StructureRecord {
        let mut ring = vec![
            GeoPoint::new(-97.0, 32.0),
            GeoPoint::new(-96.9998, 32.0),
            GeoPoint::new(-96.9998, 32.0002),
        ];
        if closed {
            ring.push(ring[0]);
        }
        StructureRecord {
            site_id: SiteId::new("site-9"),
            structure_id: StructureId::numbered(0),
            ring,
            area_sq_ft: 1234.5,
            perimeter_ft: 160.0,
            confidence: 0.81,
            included: true,
        }
    }

    #[test]
    fn test_feature_properties_and_id() {
        let feature = structure_to_feature(&record(true));

        assert_eq!(feature.id, Some(Id::String("structure-1".to_string())));
        let props = feature.properties.unwrap();
        assert_eq!(props["site_id"], "site-9");
        assert_eq!(props["included"], true);
        assert_eq!(props["area_sq_ft"], 1234.5);
    }

    #[test]
    fn test_open_ring_is_closed_on_export() {
        let feature = structure_to_feature(&record(false));
        match feature.geometry.unwrap().value {
            Value::Polygon(rings) => {
                assert_eq!(rings[0].len(), 4);
                assert_eq!(rings[0].first(), rings[0].last());
            }
            other => panic!("expected polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_collection_serializes_as_feature_collection() {
        let collection = structures_to_feature_collection(&[record(true), record(true)]);
        let json = serde_json::to_value(&collection).unwrap();

        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().unwrap().len(), 2);
        assert_eq!(json["features"][0]["geometry"]["type"], "Polygon");
    }
}
