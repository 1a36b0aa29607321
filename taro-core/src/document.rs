//! Document object model.
//!
//! A [`Document`] owns its nodes in a single arena. Nodes refer to each
//! other by [`NodeId`], which makes cycles through aliases representable
//! without reference counting.

use alloc::string::String;
use alloc::vec::Vec;

use taro_common::{
    MappingStyle, ScalarStyle, SequenceStyle, Span, TagDirective, VersionDirective,
    DEFAULT_MAPPING_TAG, DEFAULT_SCALAR_TAG, DEFAULT_SEQUENCE_TAG,
};

/// One-based index into [`Document::nodes`]. Zero is never a valid id.
pub type NodeId = usize;

/// A key/value entry of a mapping node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodePair {
    pub key: NodeId,
    pub value: NodeId,
}

#[derive(Clone, PartialEq, Debug)]
pub enum NodeData {
    Scalar {
        value: String,
        style: ScalarStyle,
    },
    Sequence {
        items: Vec<NodeId>,
        style: SequenceStyle,
    },
    Mapping {
        pairs: Vec<NodePair>,
        style: MappingStyle,
    },
}

/// A node of the document graph. The tag is always resolved, nodes built
/// without one get the default tag of their kind.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    pub data: NodeData,
    pub tag: String,
    pub span: Span,
}

impl Node {
    pub fn new(data: NodeData, tag: String, span: Span) -> Self {
        Node { data, tag, span }
    }
}

/// A complete document, either composed from events or built by hand and
/// handed to the dumper.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Document {
    /// Node arena. The root, if any, is the first node.
    pub nodes: Vec<Node>,
    pub version_directive: Option<VersionDirective>,
    pub tag_directives: Vec<TagDirective>,
    /// The document has no explicit `---`.
    pub start_implicit: bool,
    /// The document has no explicit `...`.
    pub end_implicit: bool,
    pub span: Span,
}

impl Document {
    pub fn new(
        version_directive: Option<VersionDirective>,
        tag_directives: Vec<TagDirective>,
        start_implicit: bool,
        end_implicit: bool,
    ) -> Document {
        Document {
            nodes: Vec::new(),
            version_directive,
            tag_directives,
            start_implicit,
            end_implicit,
            span: Span::default(),
        }
    }

    /// Looks a node up by id. Returns `None` for zero and out-of-range ids.
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        if id == 0 {
            return None;
        }
        self.nodes.get(id - 1)
    }

    /// The root of the document graph, if the document is not empty.
    pub fn get_root_node(&self) -> Option<&Node> {
        self.nodes.first()
    }

    fn push_node(&mut self, data: NodeData, tag: Option<&str>, default_tag: &str) -> NodeId {
        let tag = String::from(tag.unwrap_or(default_tag));
        self.nodes.push(Node::new(data, tag, Span::default()));
        self.nodes.len()
    }

    /// Adds a scalar node and returns its id. A missing tag defaults to
    /// `tag:yaml.org,2002:str`.
    pub fn add_scalar(&mut self, tag: Option<&str>, value: &str, style: ScalarStyle) -> NodeId {
        self.push_node(
            NodeData::Scalar {
                value: String::from(value),
                style,
            },
            tag,
            DEFAULT_SCALAR_TAG,
        )
    }

    /// Adds an empty sequence node and returns its id. A missing tag defaults
    /// to `tag:yaml.org,2002:seq`.
    pub fn add_sequence(&mut self, tag: Option<&str>, style: SequenceStyle) -> NodeId {
        self.push_node(
            NodeData::Sequence {
                items: Vec::new(),
                style,
            },
            tag,
            DEFAULT_SEQUENCE_TAG,
        )
    }

    /// Adds an empty mapping node and returns its id. A missing tag defaults
    /// to `tag:yaml.org,2002:map`.
    pub fn add_mapping(&mut self, tag: Option<&str>, style: MappingStyle) -> NodeId {
        self.push_node(
            NodeData::Mapping {
                pairs: Vec::new(),
                style,
            },
            tag,
            DEFAULT_MAPPING_TAG,
        )
    }

    /// Appends `item` to the sequence node `sequence`.
    ///
    /// # Panics
    ///
    /// Panics if either id is out of range or `sequence` is not a sequence.
    pub fn append_sequence_item(&mut self, sequence: NodeId, item: NodeId) {
        assert!(sequence > 0 && sequence <= self.nodes.len());
        assert!(item > 0 && item <= self.nodes.len());
        match &mut self.nodes[sequence - 1].data {
            NodeData::Sequence { items, .. } => items.push(item),
            _ => panic!("not a sequence node"),
        }
    }

    /// Appends the pair `key`/`value` to the mapping node `mapping`.
    ///
    /// # Panics
    ///
    /// Panics if any id is out of range or `mapping` is not a mapping.
    pub fn append_mapping_pair(&mut self, mapping: NodeId, key: NodeId, value: NodeId) {
        assert!(mapping > 0 && mapping <= self.nodes.len());
        assert!(key > 0 && key <= self.nodes.len());
        assert!(value > 0 && value <= self.nodes.len());
        match &mut self.nodes[mapping - 1].data {
            NodeData::Mapping { pairs, .. } => pairs.push(NodePair { key, value }),
            _ => panic!("not a mapping node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based() {
        let mut document = Document::new(None, Vec::new(), true, true);
        let id = document.add_scalar(None, "x", ScalarStyle::Plain);
        assert_eq!(id, 1);
        assert!(document.get_node(0).is_none());
        assert!(document.get_node(1).is_some());
        assert!(document.get_node(2).is_none());
    }

    #[test]
    fn default_tags_fill_in() {
        let mut document = Document::new(None, Vec::new(), true, true);
        let scalar = document.add_scalar(None, "x", ScalarStyle::Plain);
        let sequence = document.add_sequence(None, SequenceStyle::Block);
        let mapping = document.add_mapping(None, MappingStyle::Block);
        assert_eq!(document.get_node(scalar).unwrap().tag, DEFAULT_SCALAR_TAG);
        assert_eq!(
            document.get_node(sequence).unwrap().tag,
            DEFAULT_SEQUENCE_TAG
        );
        assert_eq!(document.get_node(mapping).unwrap().tag, DEFAULT_MAPPING_TAG);
    }

    #[test]
    fn build_a_small_tree() {
        let mut document = Document::new(None, Vec::new(), true, true);
        let mapping = document.add_mapping(None, MappingStyle::Block);
        let key = document.add_scalar(None, "items", ScalarStyle::Plain);
        let sequence = document.add_sequence(None, SequenceStyle::Flow);
        let a = document.add_scalar(None, "a", ScalarStyle::Plain);
        let b = document.add_scalar(None, "b", ScalarStyle::Plain);
        document.append_sequence_item(sequence, a);
        document.append_sequence_item(sequence, b);
        document.append_mapping_pair(mapping, key, sequence);

        let root = document.get_root_node().unwrap();
        match &root.data {
            NodeData::Mapping { pairs, .. } => {
                assert_eq!(pairs.len(), 1);
                assert_eq!(pairs[0].key, key);
                assert_eq!(pairs[0].value, sequence);
            }
            _ => panic!("expected the mapping at the root"),
        }
        match &document.get_node(sequence).unwrap().data {
            NodeData::Sequence { items, .. } => assert_eq!(items, &[a, b]),
            _ => panic!("expected a sequence"),
        }
    }

    #[test]
    #[should_panic]
    fn appending_to_a_scalar_panics() {
        let mut document = Document::new(None, Vec::new(), true, true);
        let scalar = document.add_scalar(None, "x", ScalarStyle::Plain);
        let item = document.add_scalar(None, "y", ScalarStyle::Plain);
        document.append_sequence_item(scalar, item);
    }
}
