use std::collections::{HashMap, HashSet};

pub type OsmId = i64;

/// Ids retained by one pass; the selection predicate of the next one.
pub type Membership = HashSet<OsmId>;

pub type NodeIndex = HashMap<OsmId, NodeCoord>;

/// A relation carrying the marker tag, with its way members in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedRelation {
    pub marker: String,
    pub way_ids: Vec<OsmId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedWay {
    pub id: OsmId,
    pub node_ids: Vec<OsmId>,
}

/// Coordinates are kept as the source text so they are written back out without any
/// precision loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCoord {
    pub lon: String,
    pub lat: String,
}

#[derive(Debug, Default)]
pub struct RelationScan {
    pub relations: Vec<MarkedRelation>,
    pub way_membership: Membership,
}

#[derive(Debug, Default)]
pub struct WayScan {
    pub ways: Vec<RetainedWay>,
    pub node_membership: Membership,
}

#[derive(Debug, Default)]
pub struct NodeScan {
    pub nodes: NodeIndex,
}
