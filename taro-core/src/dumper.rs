//! Document dumper.
//!
//! Walks a finished [`Document`] and feeds the matching event sequence to
//! an [`Emitter`]. Nodes referenced more than once get a synthetic anchor
//! at their first occurrence and an alias everywhere after it, so shared
//! subtrees and cycles serialize without duplication.

use alloc::format;
use alloc::string::String;
use alloc::vec;

use taro_common::{
    Encoding, Event, EventData, ScalarStyle, Span, YamlError, YamlResult, DEFAULT_MAPPING_TAG,
    DEFAULT_SCALAR_TAG, DEFAULT_SEQUENCE_TAG,
};

use crate::document::{Document, NodeData, NodeId};
use crate::emitter::Emitter;
use crate::writer::Output;

#[derive(Clone, Copy, Default)]
struct AnchorEntry {
    /// How often the node occurs in the document graph.
    references: u32,
    /// The synthetic anchor number, zero when the node needs none.
    anchor: u32,
    serialized: bool,
}

/// Serializes whole documents through an [`Emitter`].
///
/// The emitter is configured up front and handed over; [`Dumper::dump`]
/// then emits one document per call, bracketed by a stream that
/// [`Dumper::open`] starts and [`Dumper::close`] ends.
pub struct Dumper<O> {
    emitter: Emitter<O>,
    opened: bool,
    closed: bool,
}

impl<O: Output> Dumper<O> {
    pub fn new(emitter: Emitter<O>) -> Dumper<O> {
        Dumper {
            emitter,
            opened: false,
            closed: false,
        }
    }

    /// Starts the output stream. Called by [`Dumper::dump`] when needed,
    /// so explicit use is only required for an empty stream.
    pub fn open(&mut self) -> YamlResult<()> {
        if self.closed {
            return Err(YamlError::emitter("cannot open after the stream was closed"));
        }
        if self.opened {
            return Ok(());
        }
        self.opened = true;
        self.emit(EventData::StreamStart {
            encoding: Encoding::Any,
        })
    }

    /// Ends the output stream and flushes the sink. Idempotent.
    pub fn close(&mut self) -> YamlResult<()> {
        if !self.opened {
            return Err(YamlError::emitter("cannot close an unopened stream"));
        }
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.emit(EventData::StreamEnd)?;
        self.emitter.flush()
    }

    /// Hands the emitter back, dropping anything left unflushed.
    pub fn into_inner(self) -> Emitter<O> {
        self.emitter
    }

    /// Serializes one document. A document without a root node ends the
    /// stream instead, mirroring an empty input.
    ///
    /// # Panics
    ///
    /// Panics if the document contains a child or pair id that is out of
    /// range for its node arena.
    pub fn dump(&mut self, document: &Document) -> YamlResult<()> {
        self.open()?;
        if self.closed {
            return Err(YamlError::emitter("cannot dump after the stream was closed"));
        }
        let root = match document.get_root_node() {
            Some(_) => 1,
            None => return self.close(),
        };

        let mut anchors = vec![AnchorEntry::default(); document.nodes.len()];
        let mut last_anchor_id = 0;
        Self::anchor_node(document, &mut anchors, &mut last_anchor_id, root);

        self.emit(EventData::DocumentStart {
            version_directive: document.version_directive,
            tag_directives: document.tag_directives.clone(),
            implicit: document.start_implicit,
        })?;
        self.dump_node(document, &mut anchors, root)?;
        self.emit(EventData::DocumentEnd {
            implicit: document.end_implicit,
        })
    }

    /// First pass: count references and hand out anchor numbers to every
    /// node that is reachable along more than one path.
    fn anchor_node(
        document: &Document,
        anchors: &mut [AnchorEntry],
        last_anchor_id: &mut u32,
        id: NodeId,
    ) {
        let entry = &mut anchors[id - 1];
        entry.references += 1;
        match entry.references {
            1 => match &document.nodes[id - 1].data {
                NodeData::Scalar { .. } => {}
                NodeData::Sequence { items, .. } => {
                    for &item in items {
                        Self::anchor_node(document, anchors, last_anchor_id, item);
                    }
                }
                NodeData::Mapping { pairs, .. } => {
                    for pair in pairs {
                        Self::anchor_node(document, anchors, last_anchor_id, pair.key);
                        Self::anchor_node(document, anchors, last_anchor_id, pair.value);
                    }
                }
            },
            2 => {
                *last_anchor_id += 1;
                anchors[id - 1].anchor = *last_anchor_id;
            }
            _ => {}
        }
    }

    fn synthetic_anchor(anchor_id: u32) -> Option<String> {
        if anchor_id == 0 {
            None
        } else {
            Some(format!("id{:03}", anchor_id))
        }
    }

    fn dump_node(
        &mut self,
        document: &Document,
        anchors: &mut [AnchorEntry],
        id: NodeId,
    ) -> YamlResult<()> {
        let anchor_id = anchors[id - 1].anchor;
        let anchor = Self::synthetic_anchor(anchor_id);
        if anchors[id - 1].serialized {
            return self.emit(EventData::Alias {
                anchor: anchor.unwrap_or_default(),
            });
        }
        anchors[id - 1].serialized = true;

        let node = &document.nodes[id - 1];
        let tag = node.tag.clone();
        match node.data.clone() {
            NodeData::Scalar { value, style } => self.dump_scalar(anchor, tag, value, style),
            NodeData::Sequence { items, style } => {
                let implicit = tag == DEFAULT_SEQUENCE_TAG;
                self.emit(EventData::SequenceStart {
                    anchor,
                    tag: Some(tag),
                    implicit,
                    style,
                })?;
                for item in items {
                    self.dump_node(document, anchors, item)?;
                }
                self.emit(EventData::SequenceEnd)
            }
            NodeData::Mapping { pairs, style } => {
                let implicit = tag == DEFAULT_MAPPING_TAG;
                self.emit(EventData::MappingStart {
                    anchor,
                    tag: Some(tag),
                    implicit,
                    style,
                })?;
                for pair in pairs {
                    self.dump_node(document, anchors, pair.key)?;
                    self.dump_node(document, anchors, pair.value)?;
                }
                self.emit(EventData::MappingEnd)
            }
        }
    }

    /// A `!!str` node may drop its tag, but only claim the plain form when
    /// plain rendering would still read back as a string. `"null"` or
    /// `"3"` with a string tag must come out quoted.
    fn dump_scalar(
        &mut self,
        anchor: Option<String>,
        tag: String,
        value: String,
        style: ScalarStyle,
    ) -> YamlResult<()> {
        let string_tag = tag == DEFAULT_SCALAR_TAG;
        let plain_implicit = string_tag && !resolves_to_special(&value);
        self.emit(EventData::Scalar {
            anchor,
            tag: Some(tag),
            value,
            plain_implicit,
            quoted_implicit: string_tag,
            style,
        })
    }

    fn emit(&mut self, data: EventData) -> YamlResult<()> {
        self.emitter.emit(Event::new(data, Span::default()))
    }
}

/// Whether the untagged plain form of `value` resolves to something other
/// than `!!str`.
fn resolves_to_special(value: &str) -> bool {
    value.is_empty()
        || [
            // http://yaml.org/type/bool.html, without the bare y/n pair
            // that mainstream implementations read as strings.
            "yes", "Yes", "YES", "no", "No", "NO", "true", "True", "TRUE", "false", "False",
            "FALSE", "on", "On", "ON", "off", "Off", "OFF",
            // http://yaml.org/type/null.html
            "null", "Null", "NULL", "~",
        ]
        .contains(&value)
        || value.starts_with('.')
        || value.starts_with("0x")
        || value.parse::<i64>().is_ok()
        || value.parse::<f64>().is_ok()
}
