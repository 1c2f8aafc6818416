use std::collections::hash_map::Entry;

use log::warn;

use crate::data::element::ElementNode;
use crate::data::osm::{Membership, NodeCoord, NodeIndex, NodeScan};
use crate::errors::Result;

use super::Pass;

pub const PASS_NAME: &str = "nodes";

/// Pass 3: indexes the coordinates of every node a retained way references.
pub struct NodePass {
    node_membership: Membership,
    nodes: NodeIndex,
    scanned: usize,
}

impl NodePass {
    pub fn new(node_membership: Membership) -> NodePass {
        NodePass {
            node_membership,
            nodes: NodeIndex::new(),
            scanned: 0,
        }
    }
}

impl Pass for NodePass {
    type Output = NodeScan;

    fn pass_name(&self) -> &str {
        PASS_NAME
    }

    fn target_element(&self) -> &str {
        "node"
    }

    fn accept(&mut self, node: ElementNode) -> Result<()> {
        self.scanned += 1;

        let id = node.id_attr("id")?;
        if !self.node_membership.contains(&id) {
            return Ok(());
        }

        match self.nodes.entry(id) {
            Entry::Occupied(_) => {
                warn!(node_id = id; "Skipping duplicate node declaration");
            }
            Entry::Vacant(entry) => {
                entry.insert(NodeCoord {
                    lon: node.required_attr("lon")?.to_string(),
                    lat: node.required_attr("lat")?.to_string(),
                });
            }
        }
        Ok(())
    }

    fn counts(&self) -> (usize, usize) {
        (self.scanned, self.nodes.len())
    }

    fn finish(self) -> NodeScan {
        NodeScan { nodes: self.nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::osm::OsmId;
    use crate::errors::Error;
    use crate::reader::ElementReader;
    use pretty_assertions::assert_eq;

    fn run(xml: &str, nodes: &[OsmId]) -> Result<NodeScan> {
        let mut pass = NodePass::new(nodes.iter().copied().collect());
        pass.scan(&mut ElementReader::from_reader(xml.as_bytes()))?;
        Ok(pass.finish())
    }

    fn coord(lon: &str, lat: &str) -> NodeCoord {
        NodeCoord { lon: lon.into(), lat: lat.into() }
    }

    #[test]
    fn indexes_member_nodes_with_verbatim_coordinates() {
        let xml = r#"<osm>
  <node id="1" lat="47.4979000" lon="19.0402350" version="3"/>
  <node id="2" lat="47.5" lon="19.1"><tag k="natural" v="peak"/></node>
  <node id="3" lat="-0.0000001" lon="1e-7"/>
  <way id="9"><nd ref="1"/></way>
</osm>"#;
        let scan = run(xml, &[1, 3]).unwrap();

        assert_eq!(scan.nodes.len(), 2);
        assert_eq!(scan.nodes[&1], coord("19.0402350", "47.4979000"));
        assert_eq!(scan.nodes[&3], coord("1e-7", "-0.0000001"));
        assert!(!scan.nodes.contains_key(&2));
    }

    #[test]
    fn first_declaration_of_a_node_wins() {
        let xml = r#"<osm><node id="1" lat="1" lon="2"/><node id="1" lat="3" lon="4"/></osm>"#;
        let scan = run(xml, &[1]).unwrap();
        assert_eq!(scan.nodes[&1], coord("2", "1"));
    }

    #[test]
    fn member_node_without_coordinates_is_fatal() {
        let xml = r#"<osm><node id="1" lat="1"/></osm>"#;
        assert!(matches!(run(xml, &[1]), Err(Error::MissingAttribute { .. })));
    }

    #[test]
    fn non_member_nodes_are_still_validated() {
        let xml = r#"<osm><node id="n1" lat="1" lon="1"/></osm>"#;
        assert!(matches!(run(xml, &[1]), Err(Error::AttributeUnparseable { .. })));
    }
}
