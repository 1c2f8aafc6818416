use std::fmt;

use crate::data::osm::OsmId;
use crate::errors::{Error, Result};

/// One element captured from the stream, together with everything nested inside it.
///
/// Children are owned by their parent. There is no link back up the tree: the reader
/// keeps its own stack of open elements while capturing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub name: String,
    /// In document order. Names are not guaranteed to be unique.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<ElementNode>,
    /// 0 for the captured root.
    pub depth: usize,
}

impl ElementNode {
    pub fn new(name: String, attributes: Vec<(String, String)>, depth: usize) -> Self {
        ElementNode {
            name,
            attributes,
            children: Vec::new(),
            depth,
        }
    }

    /// Value of the first attribute called `name`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str> {
        self.attr(name).ok_or_else(|| Error::MissingAttribute {
            element: self.name.clone(),
            attribute: name.to_string(),
        })
    }

    /// Parses an `id`/`ref` style attribute. Missing or non-numeric values are errors.
    pub fn id_attr(&self, name: &str) -> Result<OsmId> {
        let value = self.required_attr(name)?;
        value.trim().parse().map_err(|source| Error::AttributeUnparseable {
            element: self.name.clone(),
            attribute: name.to_string(),
            value: value.to_string(),
            source,
        })
    }

    /// Direct children called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ElementNode> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

impl fmt::Display for ElementNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:indent$}{}:", "", self.name, indent = self.depth)?;
        for (key, value) in &self.attributes {
            write!(f, " {}={}", key, value)?;
        }
        writeln!(f)?;
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn way() -> ElementNode {
        let mut way = ElementNode::new("way".into(), vec![("id".into(), "7".into())], 0);
        way.children.push(ElementNode::new("nd".into(), vec![("ref".into(), "1".into())], 1));
        way.children.push(ElementNode::new(
            "tag".into(),
            vec![("k".into(), "highway".into()), ("v".into(), "path".into())],
            1,
        ));
        way.children.push(ElementNode::new("nd".into(), vec![("ref".into(), "2".into())], 1));
        way
    }

    #[test]
    fn attr_returns_first_of_duplicates() {
        let tag = ElementNode::new(
            "tag".into(),
            vec![("k".into(), "jel".into()), ("k".into(), "other".into())],
            1,
        );
        assert_eq!(tag.attr("k"), Some("jel"));
        assert_eq!(tag.attr("v"), None);
    }

    #[test]
    fn id_attr_parses_and_reports_failures() {
        let way = way();
        assert_eq!(way.id_attr("id").unwrap(), 7);

        let bad = ElementNode::new("nd".into(), vec![("ref".into(), "12a".into())], 1);
        assert!(matches!(
            bad.id_attr("ref"),
            Err(Error::AttributeUnparseable { ref value, .. }) if value == "12a"
        ));
        assert!(matches!(
            bad.id_attr("id"),
            Err(Error::MissingAttribute { ref attribute, .. }) if attribute == "id"
        ));
    }

    #[test]
    fn children_named_keeps_document_order() {
        let way = way();
        let refs: Vec<&str> = way
            .children_named("nd")
            .filter_map(|nd| nd.attr("ref"))
            .collect();
        assert_eq!(refs, vec!["1", "2"]);
    }

    #[test]
    fn display_indents_by_depth() {
        let expected = "way: id=7\n nd: ref=1\n tag: k=highway v=path\n nd: ref=2\n";
        assert_eq!(way().to_string(), expected);
    }
}
