#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;
extern crate core;
extern crate taro_common;

pub use composer::Composer;
pub use document::{Document, Node, NodeData, NodeId, NodePair};
pub use dumper::Dumper;
pub use emitter::Emitter;
pub use parser::Parser;
pub use reader::{Input, Reader};
pub use writer::Output;

#[cfg(feature = "std")]
pub use reader::IoInput;
#[cfg(feature = "std")]
pub use writer::IoOutput;

/// Size of the raw input chunk pulled from the source in one call.
pub(crate) const INPUT_RAW_BUFFER_SIZE: usize = 16384;
/// Size of the decoded window. Three times the raw chunk covers the
/// UTF-16 to UTF-8 worst case.
pub(crate) const INPUT_BUFFER_SIZE: usize = INPUT_RAW_BUFFER_SIZE * 3;
/// Emitter text held back before a push to the sink.
pub(crate) const OUTPUT_BUFFER_SIZE: usize = 16384;
/// Size of the encoded output chunk. Twice the text size covers UTF-16.
pub(crate) const OUTPUT_RAW_BUFFER_SIZE: usize = OUTPUT_BUFFER_SIZE * 2;

mod char_utils;
pub mod composer;
pub mod document;
pub mod dumper;
pub mod emitter;
pub mod parser;
pub mod reader;
pub mod scanner;
pub mod writer;
