use log::trace;

use crate::data::element::ElementNode;
use crate::data::osm::{MarkedRelation, Membership, RelationScan};
use crate::errors::Result;

use super::Pass;

pub const PASS_NAME: &str = "relations";

/// Pass 1: finds relations carrying the marker tag and collects their way members.
pub struct RelationPass {
    marker_key: String,
    relations: Vec<MarkedRelation>,
    way_membership: Membership,
    scanned: usize,
}

impl RelationPass {
    pub fn new(marker_key: &str) -> RelationPass {
        RelationPass {
            marker_key: marker_key.to_string(),
            relations: Vec::new(),
            way_membership: Membership::new(),
            scanned: 0,
        }
    }
}

impl Pass for RelationPass {
    type Output = RelationScan;

    fn pass_name(&self) -> &str {
        PASS_NAME
    }

    fn target_element(&self) -> &str {
        "relation"
    }

    fn accept(&mut self, relation: ElementNode) -> Result<()> {
        self.scanned += 1;

        // First matching tag wins; any later tag with the same key is ignored.
        let marker_tag = relation
            .children_named("tag")
            .find(|tag| tag.attr("k") == Some(self.marker_key.as_str()));
        let Some(marker_tag) = marker_tag else {
            trace!(relation = relation.to_string().as_str(); "Skipping unmarked relation");
            return Ok(());
        };
        let marker = marker_tag.required_attr("v")?.to_string();

        let mut way_ids = Vec::new();
        for member in relation
            .children_named("member")
            .filter(|member| member.attr("type") == Some("way"))
        {
            let way_id = member.id_attr("ref")?;
            self.way_membership.insert(way_id);
            way_ids.push(way_id);
        }

        self.relations.push(MarkedRelation { marker, way_ids });
        Ok(())
    }

    fn counts(&self) -> (usize, usize) {
        (self.scanned, self.relations.len())
    }

    fn finish(self) -> RelationScan {
        RelationScan {
            relations: self.relations,
            way_membership: self.way_membership,
        }
    }
}
