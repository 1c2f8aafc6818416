use std::collections::HashMap;

use indexmap::IndexSet;
use quick_xml::escape::escape;

use crate::data::geometry::{PathGeometries, Placemark};
use crate::data::osm::{MarkedRelation, NodeCoord, NodeIndex, OsmId, RetainedWay};
use crate::data::ExtractedPaths;
use crate::errors::{Error, Result};

/// Joins the output of the three passes into grouped and split placemarks, in pass-2 way order.
pub fn assemble(paths: &ExtractedPaths, icon_base_path: &str) -> Result<PathGeometries> {
    let markers_by_way = markers_by_way(&paths.relations);
    let mut geometries = PathGeometries::default();

    for way in &paths.ways {
        let coordinates = resolve_coordinates(way, &paths.nodes)?;
        // Pass 2 only keeps ways that some marked relation lists.
        let Some(markers) = markers_by_way.get(&way.id) else {
            debug_assert!(false, "retained way {} has no marked relation", way.id);
            continue;
        };

        geometries.grouped.push(Placemark {
            label: markers.iter().copied().collect::<Vec<_>>().join(","),
            description: markers
                .iter()
                .map(|marker| icon_html(icon_base_path, marker))
                .collect(),
            coordinates: coordinates.clone(),
        });

        for marker in markers {
            geometries.split.push(Placemark {
                label: marker.to_string(),
                description: icon_html(icon_base_path, marker),
                coordinates: coordinates.clone(),
            });
        }
    }

    Ok(geometries)
}

/// Distinct markers per way, in the order the relations carrying them were found.
fn markers_by_way(relations: &[MarkedRelation]) -> HashMap<OsmId, IndexSet<&str>> {
    let mut markers: HashMap<OsmId, IndexSet<&str>> = HashMap::new();
    for relation in relations {
        for way_id in &relation.way_ids {
            markers
                .entry(*way_id)
                .or_default()
                .insert(relation.marker.as_str());
        }
    }
    markers
}

fn resolve_coordinates(way: &RetainedWay, nodes: &NodeIndex) -> Result<Vec<NodeCoord>> {
    way.node_ids
        .iter()
        .map(|node_id| {
            nodes.get(node_id).cloned().ok_or(Error::DanglingReference {
                way: way.id,
                node: *node_id,
            })
        })
        .collect()
}

fn icon_html(icon_base_path: &str, marker: &str) -> String {
    let src = format!("{}{}.png", icon_base_path, marker);
    format!("<img src=\"{}\" /> ", escape(&src))
}
