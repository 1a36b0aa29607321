//! Composer building documents from events.
//!
//! Consumes the parser's event stream and assembles one [`Document`] per
//! document in the stream. Aliases are resolved here, so the result can
//! share nodes and even contain cycles.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use taro_common::{
    Encoding, EventData, Mark, Span, YamlError, YamlResult, DEFAULT_MAPPING_TAG,
    DEFAULT_SCALAR_TAG, DEFAULT_SEQUENCE_TAG,
};

use crate::document::{Document, Node, NodeData, NodeId, NodePair};
use crate::parser::Parser;
use crate::reader::Input;

#[derive(Clone, Copy)]
struct AliasData {
    index: NodeId,
    mark: Mark,
}

/// Builds [`Document`]s out of a character stream.
pub struct Composer<I> {
    parser: Parser<I>,
    /// Anchors seen in the current document.
    anchors: HashMap<String, AliasData>,
    stream_started: bool,
    stream_ended: bool,
}

impl<I: Input> Composer<I> {
    pub fn new(input: I) -> Composer<I> {
        Composer {
            parser: Parser::new(input),
            anchors: HashMap::new(),
            stream_started: false,
            stream_ended: false,
        }
    }

    /// Overrides encoding auto-detection. Only valid before composing starts.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.parser.set_encoding(encoding);
    }

    pub fn mark(&self) -> Mark {
        self.parser.mark()
    }

    /// Composes the next document of the stream. Returns `Ok(None)` once the
    /// stream is exhausted, on this and every later call.
    pub fn compose(&mut self) -> YamlResult<Option<Document>> {
        if self.stream_ended {
            return Ok(None);
        }
        if !self.stream_started {
            let event = self.parser.parse()?;
            debug_assert!(matches!(event.data, EventData::StreamStart { .. }));
            self.stream_started = true;
        }
        let event = self.parser.parse()?;
        match event.data {
            EventData::StreamEnd => {
                self.stream_ended = true;
                Ok(None)
            }
            EventData::DocumentStart {
                version_directive,
                tag_directives,
                implicit,
            } => {
                self.anchors.clear();
                let mut document = Document::new(version_directive, tag_directives, implicit, true);
                document.span = Span::empty(event.span.start);
                self.load_nodes(&mut document)?;
                Ok(Some(document))
            }
            _ => unreachable!("the parser begins every document with <document-start>"),
        }
    }

    fn load_nodes(&mut self, document: &mut Document) -> YamlResult<()> {
        let mut stack: Vec<NodeId> = Vec::new();
        loop {
            let event = self.parser.parse()?;
            match event.data {
                EventData::Alias { anchor } => {
                    let index = match self.anchors.get(&anchor) {
                        Some(data) => data.index,
                        None => {
                            return Err(YamlError::composer_problem(
                                "found undefined alias",
                                event.span.start,
                            ));
                        }
                    };
                    Self::add_to_parent(document, &stack, index);
                }
                EventData::Scalar {
                    anchor,
                    tag,
                    value,
                    style,
                    ..
                } => {
                    let tag = Self::resolved_tag(tag, DEFAULT_SCALAR_TAG);
                    let index = Self::push_node(
                        document,
                        Node::new(NodeData::Scalar { value, style }, tag, event.span),
                    );
                    self.register_anchor(anchor, index, event.span.start)?;
                    Self::add_to_parent(document, &stack, index);
                }
                EventData::SequenceStart {
                    anchor, tag, style, ..
                } => {
                    let tag = Self::resolved_tag(tag, DEFAULT_SEQUENCE_TAG);
                    let data = NodeData::Sequence {
                        items: Vec::new(),
                        style,
                    };
                    let index = Self::push_node(document, Node::new(data, tag, event.span));
                    self.register_anchor(anchor, index, event.span.start)?;
                    Self::add_to_parent(document, &stack, index);
                    stack.push(index);
                }
                EventData::MappingStart {
                    anchor, tag, style, ..
                } => {
                    let tag = Self::resolved_tag(tag, DEFAULT_MAPPING_TAG);
                    let data = NodeData::Mapping {
                        pairs: Vec::new(),
                        style,
                    };
                    let index = Self::push_node(document, Node::new(data, tag, event.span));
                    self.register_anchor(anchor, index, event.span.start)?;
                    Self::add_to_parent(document, &stack, index);
                    stack.push(index);
                }
                EventData::SequenceEnd | EventData::MappingEnd => {
                    // The span of a collection closes with its end event.
                    let index = stack.pop().unwrap_or_default();
                    if index > 0 {
                        document.nodes[index - 1].span.end = event.span.end;
                    }
                }
                EventData::DocumentEnd { implicit } => {
                    document.end_implicit = implicit;
                    document.span.end = event.span.end;
                    return Ok(());
                }
                _ => unreachable!("the parser keeps document and stream events balanced"),
            }
        }
    }

    fn push_node(document: &mut Document, node: Node) -> NodeId {
        document.nodes.push(node);
        document.nodes.len()
    }

    /// Nodes built from events carry a resolved tag. A missing or
    /// non-specific tag becomes the default tag of the node kind.
    fn resolved_tag(tag: Option<String>, default_tag: &str) -> String {
        match tag {
            Some(tag) if tag != "!" => tag,
            _ => String::from(default_tag),
        }
    }

    fn register_anchor(
        &mut self,
        anchor: Option<String>,
        index: NodeId,
        mark: Mark,
    ) -> YamlResult<()> {
        let anchor = match anchor {
            Some(anchor) => anchor,
            None => return Ok(()),
        };
        match self.anchors.entry(anchor) {
            Entry::Occupied(entry) => Err(YamlError::composer(
                "found duplicate anchor; first occurrence here",
                entry.get().mark,
                "second occurrence",
                mark,
            )),
            Entry::Vacant(entry) => {
                entry.insert(AliasData { index, mark });
                Ok(())
            }
        }
    }

    /// Attaches a finished node to the collection under construction. With
    /// an empty stack the node is the document root and stands alone.
    fn add_to_parent(document: &mut Document, stack: &[NodeId], index: NodeId) {
        let parent = match stack.last() {
            Some(&parent) => parent,
            None => return,
        };
        match &mut document.nodes[parent - 1].data {
            NodeData::Sequence { items, .. } => items.push(index),
            NodeData::Mapping { pairs, .. } => {
                if let Some(pair) = pairs.last_mut() {
                    if pair.value == 0 {
                        pair.value = index;
                        return;
                    }
                }
                pairs.push(NodePair {
                    key: index,
                    value: 0,
                });
            }
            NodeData::Scalar { .. } => unreachable!("scalars are never left open"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use taro_common::ScalarStyle;

    fn compose_all(input: &str) -> Vec<Document> {
        let mut composer = Composer::new(input.as_bytes());
        let mut documents = Vec::new();
        while let Some(document) = composer.compose().expect("compose failed") {
            documents.push(document);
        }
        documents
    }

    fn compose_error(input: &str) -> String {
        let mut composer = Composer::new(input.as_bytes());
        loop {
            match composer.compose() {
                Ok(Some(_)) => {}
                Ok(None) => panic!("expected a compose error"),
                Err(err) => return err.to_string(),
            }
        }
    }

    fn scalar_value(document: &Document, id: NodeId) -> &str {
        match &document.get_node(id).expect("node missing").data {
            NodeData::Scalar { value, .. } => value,
            _ => panic!("expected a scalar"),
        }
    }

    #[test]
    fn scalar_document() {
        let documents = compose_all("a\n");
        assert_eq!(documents.len(), 1);
        let root = documents[0].get_root_node().unwrap();
        assert_eq!(root.tag, DEFAULT_SCALAR_TAG);
        assert_eq!(
            root.data,
            NodeData::Scalar {
                value: "a".into(),
                style: ScalarStyle::Plain
            }
        );
    }

    #[test]
    fn mapping_pairs_resolve() {
        let documents = compose_all("a: 1\nb: 2\n");
        let document = &documents[0];
        let pairs = match &document.get_root_node().unwrap().data {
            NodeData::Mapping { pairs, .. } => pairs.clone(),
            _ => panic!("expected a mapping root"),
        };
        assert_eq!(pairs.len(), 2);
        assert_eq!(scalar_value(document, pairs[0].key), "a");
        assert_eq!(scalar_value(document, pairs[0].value), "1");
        assert_eq!(scalar_value(document, pairs[1].key), "b");
        assert_eq!(scalar_value(document, pairs[1].value), "2");
    }

    #[test]
    fn alias_shares_the_node() {
        let documents = compose_all("- &x a\n- *x\n");
        let document = &documents[0];
        let items = match &document.get_root_node().unwrap().data {
            NodeData::Sequence { items, .. } => items.clone(),
            _ => panic!("expected a sequence root"),
        };
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], items[1]);
        assert_eq!(scalar_value(document, items[0]), "a");
    }

    #[test]
    fn alias_can_close_a_cycle() {
        let documents = compose_all("&a [*a]\n");
        let document = &documents[0];
        match &document.get_root_node().unwrap().data {
            NodeData::Sequence { items, .. } => assert_eq!(items, &[1]),
            _ => panic!("expected a sequence root"),
        }
    }

    #[test]
    fn explicit_tag_wins_over_default() {
        let documents = compose_all("!!int 5\n");
        let root = documents[0].get_root_node().unwrap();
        assert_eq!(root.tag, "tag:yaml.org,2002:int");
    }

    #[test]
    fn non_specific_tag_falls_back_to_default() {
        let documents = compose_all("! x\n");
        let root = documents[0].get_root_node().unwrap();
        assert_eq!(root.tag, DEFAULT_SCALAR_TAG);
    }

    #[test]
    fn one_document_per_marker() {
        let documents = compose_all("---\na\n---\nb\n");
        assert_eq!(documents.len(), 2);
        assert_eq!(scalar_value(&documents[0], 1), "a");
        assert_eq!(scalar_value(&documents[1], 1), "b");
        assert!(!documents[0].start_implicit);
    }

    #[test]
    fn empty_stream_has_no_documents() {
        let mut composer = Composer::new("".as_bytes());
        assert!(composer.compose().unwrap().is_none());
        assert!(composer.compose().unwrap().is_none());
    }

    #[test]
    fn undefined_alias() {
        let message = compose_error("*missing\n");
        assert!(message.contains("found undefined alias"), "{message}");
    }

    #[test]
    fn duplicate_anchor() {
        let message = compose_error("- &a 1\n- &a 2\n");
        assert!(message.contains("found duplicate anchor"), "{message}");
    }
}
