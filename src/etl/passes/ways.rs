use std::collections::HashSet;

use log::warn;

use crate::data::element::ElementNode;
use crate::data::osm::{Membership, OsmId, RetainedWay, WayScan};
use crate::errors::Result;

use super::Pass;

pub const PASS_NAME: &str = "ways";

/// Pass 2: keeps the ways named by marked relations and collects the nodes they reference.
pub struct WayPass {
    way_membership: Membership,
    retained_ids: HashSet<OsmId>,
    ways: Vec<RetainedWay>,
    node_membership: Membership,
    scanned: usize,
}

impl WayPass {
    pub fn new(way_membership: Membership) -> WayPass {
        WayPass {
            way_membership,
            retained_ids: HashSet::new(),
            ways: Vec::new(),
            node_membership: Membership::new(),
            scanned: 0,
        }
    }
}

impl Pass for WayPass {
    type Output = WayScan;

    fn pass_name(&self) -> &str {
        PASS_NAME
    }

    fn target_element(&self) -> &str {
        "way"
    }

    fn accept(&mut self, way: ElementNode) -> Result<()> {
        self.scanned += 1;

        let id = way.id_attr("id")?;
        if !self.way_membership.contains(&id) {
            return Ok(());
        }
        if !self.retained_ids.insert(id) {
            warn!(way_id = id; "Skipping duplicate way declaration");
            return Ok(());
        }

        let mut node_ids = Vec::new();
        for nd in way.children_named("nd") {
            let node_id = nd.id_attr("ref")?;
            self.node_membership.insert(node_id);
            node_ids.push(node_id);
        }

        self.ways.push(RetainedWay { id, node_ids });
        Ok(())
    }

    fn counts(&self) -> (usize, usize) {
        (self.scanned, self.ways.len())
    }

    fn referenced(&self) -> Option<usize> {
        Some(self.node_membership.len())
    }

    fn finish(self) -> WayScan {
        let missing = self.way_membership.len() - self.retained_ids.len();
        if missing > 0 {
            warn!(missing_ways = missing; "Some ways referenced by marked relations are absent from the source");
        }

        WayScan {
            ways: self.ways,
            node_membership: self.node_membership,
        }
    }
}
