//! Facade over the taro YAML engine.
//!
//! Re-exports the engine types and packs the common call patterns into
//! one-liners: [`load_all`]/[`load_first`] for the decode direction,
//! [`dump_all`] for the encode direction, and [`binary`] for `!!binary`
//! scalar content.

#![no_std]

extern crate alloc;
extern crate taro_b64;
extern crate taro_common;
extern crate taro_core;

use alloc::string::String;
use alloc::vec::Vec;

pub use taro_common::{
    Encoding, Event, EventData, LineBreak, MappingStyle, Mark, ScalarStyle, SequenceStyle, Span,
    TagDirective, VersionDirective, YamlError, YamlResult,
};
pub use taro_core::{
    Composer, Document, Dumper, Emitter, Input, Node, NodeData, NodeId, NodePair, Output, Parser,
};

#[cfg(feature = "std")]
pub use taro_core::{IoInput, IoOutput};

/// Decodes every document of the stream.
pub fn load_all<I: Input>(input: I) -> YamlResult<Vec<Document>> {
    let mut composer = Composer::new(input);
    let mut documents = Vec::new();
    while let Some(document) = composer.compose()? {
        documents.push(document);
    }
    Ok(documents)
}

/// Decodes the first document of the stream, if there is one. The rest of
/// the input stays unread.
pub fn load_first<I: Input>(input: I) -> YamlResult<Option<Document>> {
    Composer::new(input).compose()
}

/// Encodes the documents into one UTF-8 stream.
pub fn dump_all(documents: &[Document]) -> YamlResult<String> {
    let mut dumper = Dumper::new(Emitter::new(Vec::new()));
    dumper.open()?;
    for document in documents {
        dumper.dump(document)?;
    }
    dumper.close()?;
    let bytes = dumper.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|_| YamlError::emitter("emitter produced invalid UTF-8"))
}

/// Helpers for `tag:yaml.org,2002:binary` scalar content.
pub mod binary {
    use alloc::string::String;
    use alloc::vec::Vec;

    use taro_core::{Document, NodeId};

    pub use taro_b64::DecodeError;
    pub use taro_common::BINARY_TAG;

    /// Encodes raw bytes into the scalar form of a `!!binary` node.
    pub fn encode(data: &[u8]) -> String {
        taro_b64::encode(data)
    }

    /// Decodes `!!binary` scalar content. YAML allows the base64 text to
    /// be broken across lines, so whitespace is dropped first.
    pub fn decode(content: &str) -> Result<Vec<u8>, DecodeError> {
        let packed: Vec<u8> = content
            .bytes()
            .filter(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            .collect();
        taro_b64::decode(&packed)
    }

    /// Adds a `!!binary` scalar node holding `data` to the document.
    pub fn add_scalar(document: &mut Document, data: &[u8]) -> NodeId {
        use taro_common::ScalarStyle;
        document.add_scalar(Some(BINARY_TAG), &encode(data), ScalarStyle::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taro_core::NodeData;

    #[test]
    fn load_all_reads_every_document() {
        let documents = load_all("a: 1\n---\n- x\n".as_bytes()).expect("valid input");
        assert_eq!(documents.len(), 2);
        assert!(matches!(
            documents[0].get_root_node().unwrap().data,
            NodeData::Mapping { .. }
        ));
        assert!(matches!(
            documents[1].get_root_node().unwrap().data,
            NodeData::Sequence { .. }
        ));
    }

    #[test]
    fn load_first_stops_after_one() {
        let document = load_first("a\n---\nb\n".as_bytes())
            .expect("valid input")
            .expect("stream has a document");
        match &document.get_root_node().unwrap().data {
            NodeData::Scalar { value, .. } => assert_eq!(value, "a"),
            _ => panic!("expected the scalar root"),
        }
    }

    #[test]
    fn loaded_stream_dumps_back() {
        let input = "a: x\nb:\n- y\n- z\n";
        let documents = load_all(input.as_bytes()).expect("valid input");
        let output = dump_all(&documents).expect("dump failed");
        assert_eq!(output, "a: x\nb:\n- y\n- z\n");
    }

    #[test]
    fn binary_scalar_round_trips() {
        let data = b"\x00\x01binary\xFF";
        let mut document = Document::new(None, Vec::new(), true, true);
        binary::add_scalar(&mut document, data);
        let node = document.get_root_node().unwrap();
        assert_eq!(node.tag, binary::BINARY_TAG);
        match &node.data {
            NodeData::Scalar { value, .. } => {
                assert_eq!(binary::decode(value).unwrap(), data);
            }
            _ => panic!("expected the scalar root"),
        }
    }

    #[test]
    fn binary_decode_skips_folded_whitespace() {
        assert_eq!(binary::decode("Zm9v\n YmFy").unwrap(), b"foobar");
    }
}
