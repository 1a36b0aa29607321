//! Event parser on top of the token stream.
//!
//! A pushdown automaton over the scanner tokens. Each call to
//! [`Parser::parse`] returns the next event of the stream grammar, with
//! composite nodes handled through a stack of return states.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use taro_common::{
    default_tag_directives, Encoding, Event, EventData, MappingStyle, Mark, ScalarStyle,
    ScanResult, SequenceStyle, Span, TagDirective, TokenType, VersionDirective, YamlError,
    YamlResult,
};

use crate::reader::Input;
use crate::scanner::Scanner;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ParserState {
    StreamStart,
    ImplicitDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    BlockNode,
    BlockNodeOrIndentlessSequence,
    FlowNode,
    BlockSequenceFirstEntry,
    BlockSequenceEntry,
    IndentlessSequenceEntry,
    BlockMappingFirstKey,
    BlockMappingKey,
    BlockMappingValue,
    FlowSequenceFirstEntry,
    FlowSequenceEntry,
    FlowSequenceEntryMappingKey,
    FlowSequenceEntryMappingValue,
    FlowSequenceEntryMappingEnd,
    FlowMappingFirstKey,
    FlowMappingKey,
    FlowMappingValue,
    FlowMappingEmptyValue,
    End,
}

/// Turns a character stream into a stream of [`Event`]s.
///
/// Tag shorthands are resolved against the `%TAG` directives of the current
/// document here, so events always carry full tags.
pub struct Parser<I> {
    scanner: Scanner<I>,
    state: ParserState,
    states: Vec<ParserState>,
    marks: Vec<Mark>,
    /// Directives in effect for the current document, explicit ones first,
    /// then the defaults for `!` and `!!`.
    tag_directives: Vec<TagDirective>,
}

impl<I: Input> Parser<I> {
    pub fn new(input: I) -> Parser<I> {
        Parser {
            scanner: Scanner::new(input),
            state: ParserState::StreamStart,
            states: Vec::new(),
            marks: Vec::new(),
            tag_directives: Vec::new(),
        }
    }

    /// Overrides encoding auto-detection. Only valid before parsing starts.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.scanner.set_encoding(encoding);
    }

    pub fn mark(&self) -> Mark {
        self.scanner.mark()
    }

    /// Returns the next event. After `StreamEnd` was returned once, further
    /// calls are an error.
    pub fn parse(&mut self) -> YamlResult<Event> {
        match self.state {
            ParserState::StreamStart => self.parse_stream_start(),
            ParserState::ImplicitDocumentStart => self.parse_document_start(true),
            ParserState::DocumentStart => self.parse_document_start(false),
            ParserState::DocumentContent => self.parse_document_content(),
            ParserState::DocumentEnd => self.parse_document_end(),
            ParserState::BlockNode => self.parse_node(true, false),
            ParserState::BlockNodeOrIndentlessSequence => self.parse_node(true, true),
            ParserState::FlowNode => self.parse_node(false, false),
            ParserState::BlockSequenceFirstEntry => self.parse_block_sequence_entry(true),
            ParserState::BlockSequenceEntry => self.parse_block_sequence_entry(false),
            ParserState::IndentlessSequenceEntry => self.parse_indentless_sequence_entry(),
            ParserState::BlockMappingFirstKey => self.parse_block_mapping_key(true),
            ParserState::BlockMappingKey => self.parse_block_mapping_key(false),
            ParserState::BlockMappingValue => self.parse_block_mapping_value(),
            ParserState::FlowSequenceFirstEntry => self.parse_flow_sequence_entry(true),
            ParserState::FlowSequenceEntry => self.parse_flow_sequence_entry(false),
            ParserState::FlowSequenceEntryMappingKey => {
                self.parse_flow_sequence_entry_mapping_key()
            }
            ParserState::FlowSequenceEntryMappingValue => {
                self.parse_flow_sequence_entry_mapping_value()
            }
            ParserState::FlowSequenceEntryMappingEnd => self.parse_flow_sequence_entry_mapping_end(),
            ParserState::FlowMappingFirstKey => self.parse_flow_mapping_key(true),
            ParserState::FlowMappingKey => self.parse_flow_mapping_key(false),
            ParserState::FlowMappingValue => self.parse_flow_mapping_value(false),
            ParserState::FlowMappingEmptyValue => self.parse_flow_mapping_value(true),
            ParserState::End => Err(YamlError::parser_problem(
                "did not expect more events after the stream end",
                self.scanner.mark(),
            )),
        }
    }

    fn pop_state(&mut self) -> ParserState {
        self.states.pop().unwrap_or(ParserState::End)
    }

    fn process_empty_scalar(mark: Mark) -> Event {
        Event::new(
            EventData::Scalar {
                anchor: None,
                tag: None,
                value: String::new(),
                plain_implicit: true,
                quoted_implicit: false,
                style: ScalarStyle::Plain,
            },
            Span::empty(mark),
        )
    }

    fn parse_stream_start(&mut self) -> YamlResult<Event> {
        let token = self.scanner.next_token()?;
        match token.data {
            TokenType::StreamStart { encoding } => {
                self.state = ParserState::ImplicitDocumentStart;
                Ok(Event::new(EventData::StreamStart { encoding }, token.span))
            }
            _ => Err(YamlError::parser_problem(
                "did not find expected <stream-start>",
                token.span.start,
            )),
        }
    }

    fn parse_document_start(&mut self, implicit: bool) -> YamlResult<Event> {
        if !implicit {
            // Skip stray `...` indicators between documents.
            while self.scanner.peek_token()?.data.is_document_end() {
                self.scanner.next_token()?;
            }
        }

        let (starts_content, is_stream_end, token_span) = {
            let token = self.scanner.peek_token()?;
            (
                !(token.data.is_version_directive()
                    || token.data.is_tag_directive()
                    || token.data.is_document_start()
                    || token.data.is_stream_end()),
                token.data.is_stream_end(),
                token.span,
            )
        };

        if implicit && starts_content {
            // The content starts right away, without directives or `---`.
            self.process_directives()?;
            self.states.push(ParserState::DocumentEnd);
            self.state = ParserState::BlockNode;
            return Ok(Event::new(
                EventData::DocumentStart {
                    version_directive: None,
                    tag_directives: Vec::new(),
                    implicit: true,
                },
                Span::empty(token_span.start),
            ));
        }

        if !is_stream_end {
            let start_mark = token_span.start;
            let (version_directive, tag_directives) = self.process_directives()?;
            if !self.scanner.peek_token()?.data.is_document_start() {
                let mark = self.scanner.peek_token()?.span.start;
                return Err(YamlError::parser_problem(
                    "did not find expected <document start>",
                    mark,
                ));
            }
            let token = self.scanner.next_token()?;
            self.states.push(ParserState::DocumentEnd);
            self.state = ParserState::DocumentContent;
            return Ok(Event::new(
                EventData::DocumentStart {
                    version_directive,
                    tag_directives,
                    implicit: false,
                },
                Span::new(start_mark, token.span.end),
            ));
        }

        let token = self.scanner.next_token()?;
        self.state = ParserState::End;
        Ok(Event::new(EventData::StreamEnd, token.span))
    }

    fn parse_document_content(&mut self) -> YamlResult<Event> {
        let (is_empty, mark) = {
            let token = self.scanner.peek_token()?;
            (
                token.data.is_version_directive()
                    || token.data.is_tag_directive()
                    || token.data.is_document_start()
                    || token.data.is_document_end()
                    || token.data.is_stream_end(),
                token.span.start,
            )
        };
        if is_empty {
            self.state = self.pop_state();
            Ok(Self::process_empty_scalar(mark))
        } else {
            self.parse_node(true, false)
        }
    }

    fn parse_document_end(&mut self) -> YamlResult<Event> {
        let (explicit, start_mark) = {
            let token = self.scanner.peek_token()?;
            (token.data.is_document_end(), token.span.start)
        };
        let mut span = Span::empty(start_mark);
        let mut implicit = true;
        if explicit {
            let token = self.scanner.next_token()?;
            span = token.span;
            implicit = false;
        }
        self.tag_directives.clear();
        self.state = ParserState::DocumentStart;
        Ok(Event::new(EventData::DocumentEnd { implicit }, span))
    }

    fn process_directives(&mut self) -> YamlResult<(Option<VersionDirective>, Vec<TagDirective>)> {
        let mut version_directive: Option<VersionDirective> = None;
        let mut tag_directives: Vec<TagDirective> = Vec::new();

        loop {
            let is_directive = {
                let token = self.scanner.peek_token()?;
                token.data.is_version_directive() || token.data.is_tag_directive()
            };
            if !is_directive {
                break;
            }
            let token = self.scanner.next_token()?;
            match token.data {
                TokenType::VersionDirective { major, minor } => {
                    if version_directive.is_some() {
                        return Err(YamlError::parser_problem(
                            "found duplicate %YAML directive",
                            token.span.start,
                        ));
                    }
                    if major != 1 || (minor != 1 && minor != 2) {
                        return Err(YamlError::parser_problem(
                            "found incompatible YAML document",
                            token.span.start,
                        ));
                    }
                    version_directive = Some(VersionDirective { major, minor });
                }
                TokenType::TagDirective { handle, prefix } => {
                    let value = TagDirective { handle, prefix };
                    self.append_tag_directive(value.clone(), false, token.span.start)?;
                    tag_directives.push(value);
                }
                _ => {}
            }
        }

        let mark = self.scanner.mark();
        for directive in default_tag_directives() {
            self.append_tag_directive(directive, true, mark)?;
        }
        Ok((version_directive, tag_directives))
    }

    fn append_tag_directive(
        &mut self,
        value: TagDirective,
        allow_duplicates: bool,
        mark: Mark,
    ) -> ScanResult {
        if self
            .tag_directives
            .iter()
            .any(|directive| directive.handle == value.handle)
        {
            if allow_duplicates {
                return Ok(());
            }
            return Err(YamlError::parser_problem(
                "found duplicate %TAG directive",
                mark,
            ));
        }
        self.tag_directives.push(value);
        Ok(())
    }

    /// Parses a complete node, including its anchor and tag properties.
    /// `block` allows block collections, `indentless_sequence` additionally
    /// allows a `- ` sequence at the indentation of the surrounding mapping.
    fn parse_node(&mut self, block: bool, indentless_sequence: bool) -> YamlResult<Event> {
        if matches!(self.scanner.peek_token()?.data, TokenType::Alias(_)) {
            let token = self.scanner.next_token()?;
            self.state = self.pop_state();
            if let TokenType::Alias(anchor) = token.data {
                return Ok(Event::new(EventData::Alias { anchor }, token.span));
            }
        }

        let mut anchor: Option<String> = None;
        let mut tag_token: Option<(String, String)> = None;
        let head_span = self.scanner.peek_token()?.span;
        let mut start_mark = head_span.start;
        let mut end_mark = head_span.start;
        let mut tag_mark = head_span.start;

        // The anchor and the tag can be in either order.
        if matches!(self.scanner.peek_token()?.data, TokenType::Anchor(_)) {
            let token = self.scanner.next_token()?;
            start_mark = token.span.start;
            end_mark = token.span.end;
            if let TokenType::Anchor(value) = token.data {
                anchor = Some(value);
            }
            if matches!(self.scanner.peek_token()?.data, TokenType::Tag { .. }) {
                let token = self.scanner.next_token()?;
                tag_mark = token.span.start;
                end_mark = token.span.end;
                if let TokenType::Tag { handle, suffix } = token.data {
                    tag_token = Some((handle, suffix));
                }
            }
        } else if matches!(self.scanner.peek_token()?.data, TokenType::Tag { .. }) {
            let token = self.scanner.next_token()?;
            start_mark = token.span.start;
            tag_mark = token.span.start;
            end_mark = token.span.end;
            if let TokenType::Tag { handle, suffix } = token.data {
                tag_token = Some((handle, suffix));
            }
            if matches!(self.scanner.peek_token()?.data, TokenType::Anchor(_)) {
                let token = self.scanner.next_token()?;
                end_mark = token.span.end;
                if let TokenType::Anchor(value) = token.data {
                    anchor = Some(value);
                }
            }
        }

        let tag = match tag_token {
            Some((handle, suffix)) => {
                if handle.is_empty() {
                    // A verbatim tag needs no resolution.
                    Some(suffix)
                } else {
                    match self
                        .tag_directives
                        .iter()
                        .find(|directive| directive.handle == handle)
                    {
                        Some(directive) => Some(format!("{}{}", directive.prefix, suffix)),
                        None => {
                            return Err(YamlError::parser(
                                "while parsing a node",
                                start_mark,
                                "found undefined tag handle",
                                tag_mark,
                            ));
                        }
                    }
                }
            }
            None => None,
        };
        let implicit = tag.is_none() || tag.as_deref() == Some("");

        let token_span = self.scanner.peek_token()?.span;

        if indentless_sequence && self.scanner.peek_token()?.data.is_block_entry() {
            self.state = ParserState::IndentlessSequenceEntry;
            return Ok(Event::new(
                EventData::SequenceStart {
                    anchor,
                    tag,
                    implicit,
                    style: SequenceStyle::Block,
                },
                Span::new(start_mark, token_span.start),
            ));
        }

        if self.scanner.peek_token()?.data.is_scalar() {
            let token = self.scanner.next_token()?;
            self.state = self.pop_state();
            if let TokenType::Scalar { value, style } = token.data {
                let mut plain_implicit = false;
                let mut quoted_implicit = false;
                if (style == ScalarStyle::Plain && tag.is_none()) || tag.as_deref() == Some("!") {
                    plain_implicit = true;
                } else if tag.is_none() {
                    quoted_implicit = true;
                }
                return Ok(Event::new(
                    EventData::Scalar {
                        anchor,
                        tag,
                        value,
                        plain_implicit,
                        quoted_implicit,
                        style,
                    },
                    Span::new(start_mark, token.span.end),
                ));
            }
        }

        if self.scanner.peek_token()?.data.is_flow_sequence_start() {
            self.state = ParserState::FlowSequenceFirstEntry;
            return Ok(Event::new(
                EventData::SequenceStart {
                    anchor,
                    tag,
                    implicit,
                    style: SequenceStyle::Flow,
                },
                Span::new(start_mark, token_span.end),
            ));
        }
        if self.scanner.peek_token()?.data.is_flow_mapping_start() {
            self.state = ParserState::FlowMappingFirstKey;
            return Ok(Event::new(
                EventData::MappingStart {
                    anchor,
                    tag,
                    implicit,
                    style: MappingStyle::Flow,
                },
                Span::new(start_mark, token_span.end),
            ));
        }
        if block && self.scanner.peek_token()?.data.is_block_sequence_start() {
            self.state = ParserState::BlockSequenceFirstEntry;
            return Ok(Event::new(
                EventData::SequenceStart {
                    anchor,
                    tag,
                    implicit,
                    style: SequenceStyle::Block,
                },
                Span::new(start_mark, token_span.end),
            ));
        }
        if block && self.scanner.peek_token()?.data.is_block_mapping_start() {
            self.state = ParserState::BlockMappingFirstKey;
            return Ok(Event::new(
                EventData::MappingStart {
                    anchor,
                    tag,
                    implicit,
                    style: MappingStyle::Block,
                },
                Span::new(start_mark, token_span.end),
            ));
        }

        if anchor.is_some() || tag.is_some() {
            // A node with properties but no content stands for an empty
            // scalar.
            self.state = self.pop_state();
            return Ok(Event::new(
                EventData::Scalar {
                    anchor,
                    tag,
                    value: String::new(),
                    plain_implicit: implicit,
                    quoted_implicit: false,
                    style: ScalarStyle::Plain,
                },
                Span::new(start_mark, end_mark),
            ));
        }

        Err(YamlError::parser(
            if block {
                "while parsing a block node"
            } else {
                "while parsing a flow node"
            },
            start_mark,
            "did not find expected node content",
            token_span.start,
        ))
    }

    fn parse_block_sequence_entry(&mut self, first: bool) -> YamlResult<Event> {
        if first {
            let token = self.scanner.next_token()?;
            self.marks.push(token.span.start);
        }
        let (is_entry, is_end, token_span) = {
            let token = self.scanner.peek_token()?;
            (
                token.data.is_block_entry(),
                token.data.is_block_end(),
                token.span,
            )
        };
        if is_entry {
            self.scanner.next_token()?;
            let follows_empty = {
                let next = self.scanner.peek_token()?;
                next.data.is_block_entry() || next.data.is_block_end()
            };
            if follows_empty {
                self.state = ParserState::BlockSequenceEntry;
                Ok(Self::process_empty_scalar(token_span.end))
            } else {
                self.states.push(ParserState::BlockSequenceEntry);
                self.parse_node(true, false)
            }
        } else if is_end {
            let token = self.scanner.next_token()?;
            self.state = self.pop_state();
            self.marks.pop();
            Ok(Event::new(EventData::SequenceEnd, token.span))
        } else {
            let mark = self.marks.pop().unwrap_or_default();
            Err(YamlError::parser(
                "while parsing a block collection",
                mark,
                "did not find expected '-' indicator",
                token_span.start,
            ))
        }
    }

    fn parse_indentless_sequence_entry(&mut self) -> YamlResult<Event> {
        let (is_entry, token_span) = {
            let token = self.scanner.peek_token()?;
            (token.data.is_block_entry(), token.span)
        };
        if is_entry {
            self.scanner.next_token()?;
            let follows_empty = {
                let next = self.scanner.peek_token()?;
                next.data.is_block_entry()
                    || next.data.is_key()
                    || next.data.is_value()
                    || next.data.is_block_end()
            };
            if follows_empty {
                self.state = ParserState::IndentlessSequenceEntry;
                Ok(Self::process_empty_scalar(token_span.end))
            } else {
                self.states.push(ParserState::IndentlessSequenceEntry);
                self.parse_node(true, false)
            }
        } else {
            // The sequence ends where the surrounding mapping continues,
            // there is no `BlockEnd` token to consume.
            self.state = self.pop_state();
            Ok(Event::new(
                EventData::SequenceEnd,
                Span::empty(token_span.start),
            ))
        }
    }

    fn parse_block_mapping_key(&mut self, first: bool) -> YamlResult<Event> {
        if first {
            let token = self.scanner.next_token()?;
            self.marks.push(token.span.start);
        }
        let (is_key, is_value, is_end, token_span) = {
            let token = self.scanner.peek_token()?;
            (
                token.data.is_key(),
                token.data.is_value(),
                token.data.is_block_end(),
                token.span,
            )
        };
        if is_key {
            self.scanner.next_token()?;
            let follows_empty = {
                let next = self.scanner.peek_token()?;
                next.data.is_key() || next.data.is_value() || next.data.is_block_end()
            };
            if follows_empty {
                self.state = ParserState::BlockMappingValue;
                Ok(Self::process_empty_scalar(token_span.end))
            } else {
                self.states.push(ParserState::BlockMappingValue);
                self.parse_node(true, true)
            }
        } else if is_value {
            // An empty key, as in `: value`.
            self.state = ParserState::BlockMappingValue;
            Ok(Self::process_empty_scalar(token_span.start))
        } else if is_end {
            let token = self.scanner.next_token()?;
            self.state = self.pop_state();
            self.marks.pop();
            Ok(Event::new(EventData::MappingEnd, token.span))
        } else {
            let mark = self.marks.pop().unwrap_or_default();
            Err(YamlError::parser(
                "while parsing a block mapping",
                mark,
                "did not find expected key",
                token_span.start,
            ))
        }
    }

    fn parse_block_mapping_value(&mut self) -> YamlResult<Event> {
        let (is_value, token_span) = {
            let token = self.scanner.peek_token()?;
            (token.data.is_value(), token.span)
        };
        if is_value {
            self.scanner.next_token()?;
            let follows_empty = {
                let next = self.scanner.peek_token()?;
                next.data.is_key() || next.data.is_value() || next.data.is_block_end()
            };
            if follows_empty {
                self.state = ParserState::BlockMappingKey;
                Ok(Self::process_empty_scalar(token_span.end))
            } else {
                self.states.push(ParserState::BlockMappingKey);
                self.parse_node(true, true)
            }
        } else {
            self.state = ParserState::BlockMappingKey;
            Ok(Self::process_empty_scalar(token_span.start))
        }
    }

    fn parse_flow_sequence_entry(&mut self, first: bool) -> YamlResult<Event> {
        if first {
            let token = self.scanner.next_token()?;
            self.marks.push(token.span.start);
        }
        if !self.scanner.peek_token()?.data.is_flow_sequence_end() {
            if !first {
                let (is_entry, problem_mark) = {
                    let token = self.scanner.peek_token()?;
                    (token.data.is_flow_entry(), token.span.start)
                };
                if is_entry {
                    self.scanner.next_token()?;
                } else {
                    let mark = self.marks.pop().unwrap_or_default();
                    return Err(YamlError::parser(
                        "while parsing a flow sequence",
                        mark,
                        "did not find expected ',' or ']'",
                        problem_mark,
                    ));
                }
            }
            let (is_key, is_end, token_span) = {
                let token = self.scanner.peek_token()?;
                (
                    token.data.is_key(),
                    token.data.is_flow_sequence_end(),
                    token.span,
                )
            };
            if is_key {
                // A single pair inside the sequence, `[a: b]`.
                self.scanner.next_token()?;
                self.state = ParserState::FlowSequenceEntryMappingKey;
                return Ok(Event::new(
                    EventData::MappingStart {
                        anchor: None,
                        tag: None,
                        implicit: true,
                        style: MappingStyle::Flow,
                    },
                    token_span,
                ));
            }
            if !is_end {
                self.states.push(ParserState::FlowSequenceEntry);
                return self.parse_node(false, false);
            }
        }
        let token = self.scanner.next_token()?;
        self.state = self.pop_state();
        self.marks.pop();
        Ok(Event::new(EventData::SequenceEnd, token.span))
    }

    fn parse_flow_sequence_entry_mapping_key(&mut self) -> YamlResult<Event> {
        let (is_empty, mark) = {
            let token = self.scanner.peek_token()?;
            (
                token.data.is_value()
                    || token.data.is_flow_entry()
                    || token.data.is_flow_sequence_end(),
                token.span.start,
            )
        };
        if is_empty {
            self.state = ParserState::FlowSequenceEntryMappingValue;
            Ok(Self::process_empty_scalar(mark))
        } else {
            self.states.push(ParserState::FlowSequenceEntryMappingValue);
            self.parse_node(false, false)
        }
    }

    fn parse_flow_sequence_entry_mapping_value(&mut self) -> YamlResult<Event> {
        if self.scanner.peek_token()?.data.is_value() {
            self.scanner.next_token()?;
            let is_content = {
                let next = self.scanner.peek_token()?;
                !(next.data.is_flow_entry() || next.data.is_flow_sequence_end())
            };
            if is_content {
                self.states.push(ParserState::FlowSequenceEntryMappingEnd);
                return self.parse_node(false, false);
            }
        }
        let mark = self.scanner.peek_token()?.span.start;
        self.state = ParserState::FlowSequenceEntryMappingEnd;
        Ok(Self::process_empty_scalar(mark))
    }

    fn parse_flow_sequence_entry_mapping_end(&mut self) -> YamlResult<Event> {
        let mark = self.scanner.peek_token()?.span.start;
        self.state = ParserState::FlowSequenceEntry;
        Ok(Event::new(EventData::MappingEnd, Span::empty(mark)))
    }

    fn parse_flow_mapping_key(&mut self, first: bool) -> YamlResult<Event> {
        if first {
            let token = self.scanner.next_token()?;
            self.marks.push(token.span.start);
        }
        if !self.scanner.peek_token()?.data.is_flow_mapping_end() {
            if !first {
                let (is_entry, problem_mark) = {
                    let token = self.scanner.peek_token()?;
                    (token.data.is_flow_entry(), token.span.start)
                };
                if is_entry {
                    self.scanner.next_token()?;
                } else {
                    let mark = self.marks.pop().unwrap_or_default();
                    return Err(YamlError::parser(
                        "while parsing a flow mapping",
                        mark,
                        "did not find expected ',' or '}'",
                        problem_mark,
                    ));
                }
            }
            if self.scanner.peek_token()?.data.is_key() {
                self.scanner.next_token()?;
                let (follows_empty, next_start) = {
                    let next = self.scanner.peek_token()?;
                    (
                        next.data.is_value()
                            || next.data.is_flow_entry()
                            || next.data.is_flow_mapping_end(),
                        next.span.start,
                    )
                };
                if follows_empty {
                    self.state = ParserState::FlowMappingValue;
                    return Ok(Self::process_empty_scalar(next_start));
                }
                self.states.push(ParserState::FlowMappingValue);
                return self.parse_node(false, false);
            }
            if !self.scanner.peek_token()?.data.is_flow_mapping_end() {
                // A value with no `?` or key before it.
                self.states.push(ParserState::FlowMappingEmptyValue);
                return self.parse_node(false, false);
            }
        }
        let token = self.scanner.next_token()?;
        self.state = self.pop_state();
        self.marks.pop();
        Ok(Event::new(EventData::MappingEnd, token.span))
    }

    fn parse_flow_mapping_value(&mut self, empty: bool) -> YamlResult<Event> {
        if empty {
            let mark = self.scanner.peek_token()?.span.start;
            self.state = ParserState::FlowMappingKey;
            return Ok(Self::process_empty_scalar(mark));
        }
        if self.scanner.peek_token()?.data.is_value() {
            self.scanner.next_token()?;
            let is_content = {
                let next = self.scanner.peek_token()?;
                !(next.data.is_flow_entry() || next.data.is_flow_mapping_end())
            };
            if is_content {
                self.states.push(ParserState::FlowMappingKey);
                return self.parse_node(false, false);
            }
        }
        let mark = self.scanner.peek_token()?.span.start;
        self.state = ParserState::FlowMappingKey;
        Ok(Self::process_empty_scalar(mark))
    }
}

impl<I: Input> Iterator for Parser<I> {
    type Item = YamlResult<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ParserState::End {
            return None;
        }
        let event = self.parse();
        if event.is_err() {
            self.state = ParserState::End;
        }
        Some(event)
    }
}
