use self::osm::{MarkedRelation, NodeIndex, RetainedWay};

pub mod element;
pub mod geometry;
pub mod osm;

/// Everything the three passes kept from the .osm file, ready to be joined into geometries.
#[derive(Debug, Default, Clone)]
pub struct ExtractedPaths {
    pub relations: Vec<MarkedRelation>,
    pub ways: Vec<RetainedWay>,
    pub nodes: NodeIndex,
}
