#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

/// The tag `!!null` with the only possible value: `null`.
pub const NULL_TAG: &str = "tag:yaml.org,2002:null";
/// The tag `!!bool` with the values: `true` and `false`.
pub const BOOL_TAG: &str = "tag:yaml.org,2002:bool";
/// The tag `!!str` for string values.
pub const STR_TAG: &str = "tag:yaml.org,2002:str";
/// The tag `!!int` for integer values.
pub const INT_TAG: &str = "tag:yaml.org,2002:int";
/// The tag `!!float` for float values.
pub const FLOAT_TAG: &str = "tag:yaml.org,2002:float";
/// The tag `!!timestamp` for date and time values.
pub const TIMESTAMP_TAG: &str = "tag:yaml.org,2002:timestamp";
/// The tag `!!binary` for base64-encoded byte strings.
pub const BINARY_TAG: &str = "tag:yaml.org,2002:binary";
/// The tag `!!seq` is used to denote sequences.
pub const SEQ_TAG: &str = "tag:yaml.org,2002:seq";
/// The tag `!!map` is used to denote mappings.
pub const MAP_TAG: &str = "tag:yaml.org,2002:map";

/// The default scalar tag is `!!str`.
pub const DEFAULT_SCALAR_TAG: &str = STR_TAG;
/// The default sequence tag is `!!seq`.
pub const DEFAULT_SEQUENCE_TAG: &str = SEQ_TAG;
/// The default mapping tag is `!!map`.
pub const DEFAULT_MAPPING_TAG: &str = MAP_TAG;

/// Position in the input or output stream.
///
/// `index` counts code points, not bytes, so it is the same for a given
/// text regardless of the stream encoding.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct Mark {
    /// Code point index in the stream. Zero indexed.
    pub index: usize,
    /// Line of the mark. Zero indexed.
    pub line: u32,
    /// Column of the mark. Zero indexed.
    pub col: u32,
}

#[derive(Clone, Copy, PartialEq, Debug, Eq, Default)]
pub struct Span {
    pub start: Mark,
    pub end: Mark,
}

impl Span {
    pub fn new(start: Mark, end: Mark) -> Self {
        Span { start, end }
    }

    pub fn empty(mark: Mark) -> Self {
        Span {
            start: mark,
            end: mark,
        }
    }
}

/// The stream encoding.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum Encoding {
    /// Let the reader or emitter choose the encoding.
    #[default]
    Any,
    /// The default UTF-8 encoding.
    Utf8,
    /// The UTF-16-LE encoding with BOM.
    Utf16Le,
    /// The UTF-16-BE encoding with BOM.
    Utf16Be,
}

/// Line break style used by the emitter.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum LineBreak {
    /// Let the emitter choose the break.
    #[default]
    Any,
    /// Mac style, `\r` only.
    Cr,
    /// Unix style, `\n` only.
    Ln,
    /// DOS style, `\r\n`.
    CrLn,
}

impl LineBreak {
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Cr => "\r",
            LineBreak::Any | LineBreak::Ln => "\n",
            LineBreak::CrLn => "\r\n",
        }
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum ScalarStyle {
    /// Let the emitter choose the style.
    #[default]
    Any,
    /// Unquoted string type like:
    /// ```yaml
    ///   multiline
    ///   string
    /// ```
    Plain,
    /// Single quoted string which permits any symbol inside.
    /// E.g. :
    /// ```yaml
    /// ' This is a quoted string
    ///    with ''quoted'' string within.'
    /// ```
    SingleQuoted,
    /// Double quoted string with escape sequences.
    /// E.g. :
    /// ```yaml
    /// "This is a quoted string
    ///    with \"double quoted\" string within."
    /// ```
    DoubleQuoted,
    /// Literal block type like:
    /// ```yaml
    ///   |
    ///     literal
    ///     string
    /// ```
    Literal,
    /// Folded block type like:
    /// ```yaml
    ///   >
    ///     folded
    ///     string
    /// ```
    Folded,
}

impl Display for ScalarStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScalarStyle::Any | ScalarStyle::Plain => write!(f, ":"),
            ScalarStyle::SingleQuoted => write!(f, "'"),
            ScalarStyle::DoubleQuoted => write!(f, "\""),
            ScalarStyle::Literal => write!(f, "|"),
            ScalarStyle::Folded => write!(f, ">"),
        }
    }
}

/// Sequence styles.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum SequenceStyle {
    /// Let the emitter choose the style.
    #[default]
    Any,
    /// The indentation based style.
    Block,
    /// The `[a, b]` style.
    Flow,
}

/// Mapping styles.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub enum MappingStyle {
    /// Let the emitter choose the style.
    #[default]
    Any,
    /// The indentation based style.
    Block,
    /// The `{a: b}` style.
    Flow,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ChompIndicator {
    /// `-` final line break and any trailing empty lines are excluded from the scalar’s content
    Strip,
    ///  ` ` final line break character is preserved in the scalar’s content
    Clip,
    /// `+` final line break and any trailing empty lines are considered to be part of the scalar’s content
    Keep,
}

/// The `%YAML` directive data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VersionDirective {
    pub major: u8,
    pub minor: u8,
}

/// The `%TAG` directive data.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TagDirective {
    /// The tag handle, `!` included.
    pub handle: String,
    /// The prefix the handle expands to.
    pub prefix: String,
}

/// The two handles every document starts with: `!` expanding to itself and
/// `!!` expanding to the `tag:yaml.org,2002:` prefix.
pub fn default_tag_directives() -> [TagDirective; 2] {
    [
        TagDirective {
            handle: String::from("!"),
            prefix: String::from("!"),
        },
        TagDirective {
            handle: String::from("!!"),
            prefix: String::from("tag:yaml.org,2002:"),
        },
    ]
}

#[derive(Clone, PartialEq, Debug)]
pub enum TokenType {
    StreamStart {
        encoding: Encoding,
    },
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    Alias(String),
    Anchor(String),
    VersionDirective {
        major: u8,
        minor: u8,
    },
    TagDirective {
        handle: String,
        prefix: String,
    },
    Tag {
        handle: String,
        suffix: String,
    },
    Scalar {
        value: String,
        style: ScalarStyle,
    },
}

impl TokenType {
    pub fn is_stream_end(&self) -> bool {
        matches!(self, TokenType::StreamEnd)
    }

    pub fn is_version_directive(&self) -> bool {
        matches!(self, TokenType::VersionDirective { .. })
    }

    pub fn is_tag_directive(&self) -> bool {
        matches!(self, TokenType::TagDirective { .. })
    }

    pub fn is_document_start(&self) -> bool {
        matches!(self, TokenType::DocumentStart)
    }

    pub fn is_document_end(&self) -> bool {
        matches!(self, TokenType::DocumentEnd)
    }

    pub fn is_block_sequence_start(&self) -> bool {
        matches!(self, TokenType::BlockSequenceStart)
    }

    pub fn is_block_mapping_start(&self) -> bool {
        matches!(self, TokenType::BlockMappingStart)
    }

    pub fn is_block_end(&self) -> bool {
        matches!(self, TokenType::BlockEnd)
    }

    pub fn is_block_entry(&self) -> bool {
        matches!(self, TokenType::BlockEntry)
    }

    pub fn is_flow_entry(&self) -> bool {
        matches!(self, TokenType::FlowEntry)
    }

    pub fn is_key(&self) -> bool {
        matches!(self, TokenType::Key)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, TokenType::Value)
    }

    pub fn is_flow_sequence_end(&self) -> bool {
        matches!(self, TokenType::FlowSequenceEnd)
    }

    pub fn is_flow_mapping_end(&self) -> bool {
        matches!(self, TokenType::FlowMappingEnd)
    }

    pub fn is_flow_sequence_start(&self) -> bool {
        matches!(self, TokenType::FlowSequenceStart)
    }

    pub fn is_flow_mapping_start(&self) -> bool {
        matches!(self, TokenType::FlowMappingStart)
    }

    pub fn is_alias(&self) -> bool {
        matches!(self, TokenType::Alias(_))
    }

    pub fn is_anchor(&self) -> bool {
        matches!(self, TokenType::Anchor(_))
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, TokenType::Tag { .. })
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, TokenType::Scalar { .. })
    }
}

/// A single lexical unit with the input range it was scanned from.
#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    pub data: TokenType,
    pub span: Span,
}

impl Token {
    pub fn new(data: TokenType, span: Span) -> Self {
        Token { data, span }
    }
}

/// Event types produced by the parser and consumed by the emitter.
///
/// A well-formed event stream is `StreamStart`, a sequence of documents,
/// `StreamEnd`. Each document is `DocumentStart`, exactly one node,
/// `DocumentEnd`, where a node is a scalar, an alias, or a sequence or
/// mapping with its nested nodes.
#[derive(Clone, PartialEq, Debug)]
pub enum EventData {
    StreamStart {
        encoding: Encoding,
    },
    StreamEnd,
    DocumentStart {
        version_directive: Option<VersionDirective>,
        tag_directives: Vec<TagDirective>,
        /// Set when no `---` marker was present in the input, or when the
        /// emitter may omit one.
        implicit: bool,
    },
    DocumentEnd {
        implicit: bool,
    },
    Alias {
        anchor: String,
    },
    Scalar {
        anchor: Option<String>,
        tag: Option<String>,
        value: String,
        /// The tag is optional when the scalar is emitted plain.
        plain_implicit: bool,
        /// The tag is optional when the scalar is emitted quoted.
        quoted_implicit: bool,
        style: ScalarStyle,
    },
    SequenceStart {
        anchor: Option<String>,
        tag: Option<String>,
        implicit: bool,
        style: SequenceStyle,
    },
    SequenceEnd,
    MappingStart {
        anchor: Option<String>,
        tag: Option<String>,
        implicit: bool,
        style: MappingStyle,
    },
    MappingEnd,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Event {
    pub data: EventData,
    pub span: Span,
}

impl Event {
    pub fn new(data: EventData, span: Span) -> Self {
        Event { data, span }
    }
}

/// A specialized `Result` type where the error is hard-wired to [`YamlError`].
pub type YamlResult<T> = Result<T, YamlError>;
pub type ScanResult = Result<(), YamlError>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum YamlError {
    /// Failure reported by the input source or output sink.
    Io(String),
    /// Raw bytes violate the stream encoding. Carries the byte offset of the
    /// offending input, since line and column are unknown before decoding.
    Reader {
        problem: &'static str,
        offset: usize,
    },
    Scanner {
        context: Option<&'static str>,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    },
    Parser {
        context: Option<&'static str>,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    },
    Composer {
        context: Option<&'static str>,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    },
    Emitter {
        problem: &'static str,
    },
    Writer {
        problem: &'static str,
    },
}

impl YamlError {
    pub fn reader(problem: &'static str, offset: usize) -> Self {
        YamlError::Reader { problem, offset }
    }

    pub fn scanner(
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    ) -> Self {
        YamlError::Scanner {
            context: Some(context),
            context_mark,
            problem,
            mark,
        }
    }

    pub fn scanner_problem(problem: &'static str, mark: Mark) -> Self {
        YamlError::Scanner {
            context: None,
            context_mark: Mark::default(),
            problem,
            mark,
        }
    }

    pub fn parser(
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    ) -> Self {
        YamlError::Parser {
            context: Some(context),
            context_mark,
            problem,
            mark,
        }
    }

    pub fn parser_problem(problem: &'static str, mark: Mark) -> Self {
        YamlError::Parser {
            context: None,
            context_mark: Mark::default(),
            problem,
            mark,
        }
    }

    pub fn composer(
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    ) -> Self {
        YamlError::Composer {
            context: Some(context),
            context_mark,
            problem,
            mark,
        }
    }

    pub fn composer_problem(problem: &'static str, mark: Mark) -> Self {
        YamlError::Composer {
            context: None,
            context_mark: Mark::default(),
            problem,
            mark,
        }
    }

    pub fn emitter(problem: &'static str) -> Self {
        YamlError::Emitter { problem }
    }

    pub fn writer(problem: &'static str) -> Self {
        YamlError::Writer { problem }
    }
}

fn fmt_at(f: &mut Formatter<'_>, problem: &str, mark: Mark) -> fmt::Result {
    write!(
        f,
        "{} at line {} column {}",
        problem,
        mark.line + 1,
        mark.col + 1
    )
}

fn fmt_staged(
    f: &mut Formatter<'_>,
    stage: &str,
    context: Option<&'static str>,
    context_mark: Mark,
    problem: &'static str,
    mark: Mark,
) -> fmt::Result {
    write!(f, "{} error: ", stage)?;
    if let Some(context) = context {
        fmt_at(f, context, context_mark)?;
        write!(f, ": ")?;
    }
    fmt_at(f, problem, mark)
}

impl Display for YamlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            YamlError::Io(info) => write!(f, "io error: {}", info),
            YamlError::Reader { problem, offset } => {
                write!(f, "reader error: {} at position {}", problem, offset)
            }
            YamlError::Scanner {
                context,
                context_mark,
                problem,
                mark,
            } => fmt_staged(f, "scanner", *context, *context_mark, problem, *mark),
            YamlError::Parser {
                context,
                context_mark,
                problem,
                mark,
            } => fmt_staged(f, "parser", *context, *context_mark, problem, *mark),
            YamlError::Composer {
                context,
                context_mark,
                problem,
                mark,
            } => fmt_staged(f, "composer", *context, *context_mark, problem, *mark),
            YamlError::Emitter { problem } => write!(f, "emitter error: {}", problem),
            YamlError::Writer { problem } => write!(f, "writer error: {}", problem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn error_display_with_context() {
        let err = YamlError::scanner(
            "while scanning a block scalar",
            Mark {
                index: 4,
                line: 1,
                col: 2,
            },
            "did not find expected comment or line break",
            Mark {
                index: 9,
                line: 2,
                col: 0,
            },
        );
        assert_eq!(
            format!("{err}"),
            "scanner error: while scanning a block scalar at line 2 column 3: \
             did not find expected comment or line break at line 3 column 1"
        );
    }

    #[test]
    fn error_display_without_context() {
        let err = YamlError::scanner_problem("found character that cannot start any token", Mark::default());
        assert_eq!(
            format!("{err}"),
            "scanner error: found character that cannot start any token at line 1 column 1"
        );
    }

    #[test]
    fn style_event_prefix() {
        assert_eq!(format!("{}", ScalarStyle::Plain), ":");
        assert_eq!(format!("{}", ScalarStyle::Folded), ">");
        assert_eq!(format!("{}", ScalarStyle::Literal), "|");
        assert_eq!(format!("{}", ScalarStyle::SingleQuoted), "'");
        assert_eq!(format!("{}", ScalarStyle::DoubleQuoted), "\"");
    }

    #[test]
    fn default_tags_share_prefix() {
        for tag in [NULL_TAG, BOOL_TAG, STR_TAG, INT_TAG, FLOAT_TAG, TIMESTAMP_TAG, BINARY_TAG, SEQ_TAG, MAP_TAG] {
            assert!(tag.starts_with("tag:yaml.org,2002:"));
        }
    }
}
