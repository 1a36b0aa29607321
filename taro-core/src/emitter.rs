//! Event emitter producing YAML text.
//!
//! The mirror image of the parser: a state machine that consumes events
//! and writes the document stream, choosing node styles where the events
//! leave the choice open. Events are queued briefly so that an empty
//! collection can be compacted to `[]` or `{}` before anything of it is
//! written.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use taro_common::{
    default_tag_directives, Encoding, Event, EventData, LineBreak, ScalarStyle, SequenceStyle,
    TagDirective, VersionDirective, YamlError, YamlResult,
};

use crate::char_utils::{is_alpha, is_printable, is_uri_char};
use crate::writer::{Output, Writer};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum EmitterState {
    StreamStart,
    FirstDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    FlowSequenceFirstItem,
    FlowSequenceItem,
    FlowMappingFirstKey,
    FlowMappingKey,
    FlowMappingSimpleValue,
    FlowMappingValue,
    BlockSequenceFirstItem,
    BlockSequenceItem,
    BlockMappingFirstKey,
    BlockMappingKey,
    BlockMappingSimpleValue,
    BlockMappingValue,
    End,
}

struct AnchorAnalysis {
    anchor: String,
    alias: bool,
}

struct TagAnalysis {
    handle: Option<String>,
    suffix: Option<String>,
}

struct ScalarAnalysis {
    value: String,
    multiline: bool,
    flow_plain_allowed: bool,
    block_plain_allowed: bool,
    single_quoted_allowed: bool,
    block_allowed: bool,
    style: ScalarStyle,
}

fn is_space(ch: char) -> bool {
    ch == ' '
}

fn is_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

fn is_blankz_at(chars: &[char], index: usize) -> bool {
    match chars.get(index) {
        None => true,
        Some(&ch) => ch == ' ' || ch == '\t' || is_break(ch),
    }
}

/// Serializes a stream of [`Event`]s.
///
/// The event order must describe a well-formed stream, the same shape the
/// parser produces. Output appears at the sink in document-sized chunks,
/// or earlier when the internal buffer runs full.
pub struct Emitter<O> {
    writer: Writer<O>,
    state: EmitterState,
    states: Vec<EmitterState>,
    events: VecDeque<Event>,
    indents: Vec<i32>,
    tag_directives: Vec<TagDirective>,

    encoding: Encoding,
    canonical: bool,
    best_indent: i32,
    best_width: i32,
    unicode: bool,
    line_break: LineBreak,

    indent: i32,
    flow_level: usize,
    root_context: bool,
    mapping_context: bool,
    simple_key_context: bool,
    column: i32,
    whitespace: bool,
    indention: bool,
    /// 0 closed, 1 a plain root scalar may swallow a following `---`,
    /// 2 a keep-chomped block scalar needs `...` even at the stream end.
    open_ended: u8,

    anchor_data: Option<AnchorAnalysis>,
    tag_data: Option<TagAnalysis>,
    scalar_data: Option<ScalarAnalysis>,
}

impl<O: Output> Emitter<O> {
    pub fn new(output: O) -> Emitter<O> {
        Emitter {
            writer: Writer::new(output),
            state: EmitterState::StreamStart,
            states: Vec::new(),
            events: VecDeque::new(),
            indents: Vec::new(),
            tag_directives: Vec::new(),
            encoding: Encoding::Any,
            canonical: false,
            best_indent: 0,
            best_width: 0,
            unicode: false,
            line_break: LineBreak::Any,
            indent: -1,
            flow_level: 0,
            root_context: false,
            mapping_context: false,
            simple_key_context: false,
            column: 0,
            whitespace: true,
            indention: true,
            open_ended: 0,
            anchor_data: None,
            tag_data: None,
            scalar_data: None,
        }
    }

    /// Forces double-quoted scalars, explicit `---` and unrolled `?`/`:`
    /// mapping entries.
    pub fn set_canonical(&mut self, canonical: bool) {
        self.canonical = canonical;
    }

    /// Sets the indentation step. Values outside `1..=9` fall back to 2.
    pub fn set_indent(&mut self, indent: i32) {
        self.best_indent = if (1..=9).contains(&indent) { indent } else { 0 };
    }

    /// Sets the preferred line width. A negative width disables wrapping.
    pub fn set_width(&mut self, width: i32) {
        self.best_width = if width >= 0 { width } else { -1 };
    }

    /// Allows non-ASCII characters to pass through unescaped.
    pub fn set_unicode(&mut self, unicode: bool) {
        self.unicode = unicode;
    }

    pub fn set_break(&mut self, line_break: LineBreak) {
        self.line_break = line_break;
    }

    /// Picks the stream encoding. Overrides whatever the stream start
    /// event carries.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    pub fn flush(&mut self) -> YamlResult<()> {
        self.writer.flush()
    }

    /// Hands the sink back, dropping anything left unflushed.
    pub fn into_inner(self) -> O {
        self.writer.into_inner()
    }

    /// Takes the next event of the stream. The event may be held back
    /// until enough lookahead accumulated to pick a compact style.
    pub fn emit(&mut self, event: Event) -> YamlResult<()> {
        self.events.push_back(event);
        while !self.need_more_events() {
            let event = match self.events.pop_front() {
                Some(event) => event,
                None => break,
            };
            self.analyze_event(&event)?;
            self.state_machine(&event)?;
        }
        Ok(())
    }

    /// A DOCUMENT-START, SEQUENCE-START or MAPPING-START at the queue head
    /// waits for 1, 2 or 3 more events, or fewer when its collection
    /// closes earlier.
    fn need_more_events(&self) -> bool {
        let accumulate = match self.events.front().map(|event| &event.data) {
            None => return true,
            Some(EventData::DocumentStart { .. }) => 1,
            Some(EventData::SequenceStart { .. }) => 2,
            Some(EventData::MappingStart { .. }) => 3,
            Some(_) => return false,
        };
        if self.events.len() > accumulate {
            return false;
        }
        let mut level = 0_i32;
        for event in &self.events {
            match event.data {
                EventData::StreamStart { .. }
                | EventData::DocumentStart { .. }
                | EventData::SequenceStart { .. }
                | EventData::MappingStart { .. } => level += 1,
                EventData::StreamEnd
                | EventData::DocumentEnd { .. }
                | EventData::SequenceEnd
                | EventData::MappingEnd => level -= 1,
                _ => {}
            }
            if level == 0 {
                return false;
            }
        }
        true
    }

    fn analyze_event(&mut self, event: &Event) -> YamlResult<()> {
        self.anchor_data = None;
        self.tag_data = None;
        self.scalar_data = None;
        match &event.data {
            EventData::Alias { anchor } => {
                self.anchor_data = Some(Self::analyze_anchor(anchor, true)?);
            }
            EventData::Scalar {
                anchor,
                tag,
                value,
                plain_implicit,
                quoted_implicit,
                ..
            } => {
                if let Some(anchor) = anchor {
                    self.anchor_data = Some(Self::analyze_anchor(anchor, false)?);
                }
                if let Some(tag) = tag {
                    if self.canonical || (!*plain_implicit && !*quoted_implicit) {
                        self.tag_data = Some(self.analyze_tag(tag)?);
                    }
                }
                self.scalar_data = Some(self.analyze_scalar(value));
            }
            EventData::SequenceStart {
                anchor,
                tag,
                implicit,
                ..
            }
            | EventData::MappingStart {
                anchor,
                tag,
                implicit,
                ..
            } => {
                if let Some(anchor) = anchor {
                    self.anchor_data = Some(Self::analyze_anchor(anchor, false)?);
                }
                if let Some(tag) = tag {
                    if self.canonical || !*implicit {
                        self.tag_data = Some(self.analyze_tag(tag)?);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn state_machine(&mut self, event: &Event) -> YamlResult<()> {
        match self.state {
            EmitterState::StreamStart => self.emit_stream_start(event),
            EmitterState::FirstDocumentStart => self.emit_document_start(event, true),
            EmitterState::DocumentStart => self.emit_document_start(event, false),
            EmitterState::DocumentContent => self.emit_document_content(event),
            EmitterState::DocumentEnd => self.emit_document_end(event),
            EmitterState::FlowSequenceFirstItem => self.emit_flow_sequence_item(event, true),
            EmitterState::FlowSequenceItem => self.emit_flow_sequence_item(event, false),
            EmitterState::FlowMappingFirstKey => self.emit_flow_mapping_key(event, true),
            EmitterState::FlowMappingKey => self.emit_flow_mapping_key(event, false),
            EmitterState::FlowMappingSimpleValue => self.emit_flow_mapping_value(event, true),
            EmitterState::FlowMappingValue => self.emit_flow_mapping_value(event, false),
            EmitterState::BlockSequenceFirstItem => self.emit_block_sequence_item(event, true),
            EmitterState::BlockSequenceItem => self.emit_block_sequence_item(event, false),
            EmitterState::BlockMappingFirstKey => self.emit_block_mapping_key(event, true),
            EmitterState::BlockMappingKey => self.emit_block_mapping_key(event, false),
            EmitterState::BlockMappingSimpleValue => self.emit_block_mapping_value(event, true),
            EmitterState::BlockMappingValue => self.emit_block_mapping_value(event, false),
            EmitterState::End => Err(YamlError::emitter("expected nothing after STREAM-END")),
        }
    }

    fn pop_state(&mut self) -> EmitterState {
        self.states.pop().unwrap_or(EmitterState::End)
    }

    fn emit_stream_start(&mut self, event: &Event) -> YamlResult<()> {
        self.open_ended = 0;
        if let EventData::StreamStart { encoding } = event.data {
            if self.encoding == Encoding::Any {
                self.encoding = encoding;
            }
            if self.encoding == Encoding::Any {
                self.encoding = Encoding::Utf8;
            }
            if self.best_indent == 0 {
                self.best_indent = 2;
            }
            if self.best_width >= 0 && self.best_width <= self.best_indent * 2 {
                self.best_width = 80;
            }
            if self.best_width < 0 {
                self.best_width = i32::MAX;
            }
            if self.line_break == LineBreak::Any {
                self.line_break = LineBreak::Ln;
            }
            self.indent = -1;
            self.column = 0;
            self.whitespace = true;
            self.indention = true;
            self.writer.set_encoding(self.encoding);
            if self.encoding != Encoding::Utf8 {
                self.writer.put('\u{FEFF}')?;
            }
            self.state = EmitterState::FirstDocumentStart;
            return Ok(());
        }
        Err(YamlError::emitter("expected STREAM-START"))
    }

    fn emit_document_start(&mut self, event: &Event, first: bool) -> YamlResult<()> {
        match &event.data {
            EventData::DocumentStart {
                version_directive,
                tag_directives,
                implicit,
            } => {
                if let Some(version) = version_directive {
                    Self::analyze_version_directive(*version)?;
                }
                for directive in tag_directives {
                    Self::analyze_tag_directive(directive)?;
                    self.append_tag_directive(directive.clone(), false)?;
                }
                for directive in default_tag_directives() {
                    self.append_tag_directive(directive, true)?;
                }
                let mut implicit = *implicit;
                if !first || self.canonical {
                    implicit = false;
                }
                if (version_directive.is_some() || !tag_directives.is_empty())
                    && self.open_ended != 0
                {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                self.open_ended = 0;
                if let Some(version) = version_directive {
                    implicit = false;
                    self.write_indicator("%YAML", true, false, false)?;
                    if version.minor == 1 {
                        self.write_indicator("1.1", true, false, false)?;
                    } else {
                        self.write_indicator("1.2", true, false, false)?;
                    }
                    self.write_indent()?;
                }
                if !tag_directives.is_empty() {
                    implicit = false;
                    for directive in tag_directives {
                        self.write_indicator("%TAG", true, false, false)?;
                        self.write_tag_handle(&directive.handle)?;
                        self.write_tag_content(&directive.prefix, true)?;
                        self.write_indent()?;
                    }
                }
                if !implicit {
                    self.write_indent()?;
                    self.write_indicator("---", true, false, false)?;
                    if self.canonical {
                        self.write_indent()?;
                    }
                }
                self.state = EmitterState::DocumentContent;
                Ok(())
            }
            EventData::StreamEnd => {
                // A keep-chomped block scalar at the very end of the stream
                // still owns its trailing breaks, mark the end explicitly.
                if self.open_ended == 2 {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                self.writer.flush()?;
                self.state = EmitterState::End;
                Ok(())
            }
            _ => Err(YamlError::emitter("expected DOCUMENT-START or STREAM-END")),
        }
    }

    fn emit_document_content(&mut self, event: &Event) -> YamlResult<()> {
        self.states.push(EmitterState::DocumentEnd);
        self.emit_node(event, true, false, false)
    }

    fn emit_document_end(&mut self, event: &Event) -> YamlResult<()> {
        if let EventData::DocumentEnd { implicit } = event.data {
            self.write_indent()?;
            if !implicit {
                self.write_indicator("...", true, false, false)?;
                self.write_indent()?;
            } else if self.open_ended == 0 {
                self.open_ended = 1;
            }
            self.writer.flush()?;
            self.state = EmitterState::DocumentStart;
            self.tag_directives.clear();
            return Ok(());
        }
        Err(YamlError::emitter("expected DOCUMENT-END"))
    }

    fn emit_node(
        &mut self,
        event: &Event,
        root: bool,
        mapping: bool,
        simple_key: bool,
    ) -> YamlResult<()> {
        self.root_context = root;
        self.mapping_context = mapping;
        self.simple_key_context = simple_key;
        match &event.data {
            EventData::Alias { .. } => self.emit_alias(),
            EventData::Scalar { .. } => self.emit_scalar(event),
            EventData::SequenceStart { .. } => self.emit_sequence_start(event),
            EventData::MappingStart { .. } => self.emit_mapping_start(event),
            _ => Err(YamlError::emitter(
                "expected SCALAR, SEQUENCE-START, MAPPING-START, or ALIAS",
            )),
        }
    }

    fn emit_alias(&mut self) -> YamlResult<()> {
        self.process_anchor()?;
        if self.simple_key_context {
            self.put(' ')?;
        }
        self.state = self.pop_state();
        Ok(())
    }

    fn emit_scalar(&mut self, event: &Event) -> YamlResult<()> {
        self.select_scalar_style(event)?;
        self.process_anchor()?;
        self.process_tag()?;
        self.increase_indent(true, false);
        self.process_scalar()?;
        self.indent = self.indents.pop().unwrap_or(-1);
        self.state = self.pop_state();
        Ok(())
    }

    fn emit_sequence_start(&mut self, event: &Event) -> YamlResult<()> {
        self.process_anchor()?;
        self.process_tag()?;
        let flow = matches!(
            event.data,
            EventData::SequenceStart {
                style: SequenceStyle::Flow,
                ..
            }
        );
        if self.flow_level > 0 || self.canonical || flow || self.check_empty_sequence(event) {
            self.state = EmitterState::FlowSequenceFirstItem;
        } else {
            self.state = EmitterState::BlockSequenceFirstItem;
        }
        Ok(())
    }

    fn emit_mapping_start(&mut self, event: &Event) -> YamlResult<()> {
        self.process_anchor()?;
        self.process_tag()?;
        let flow = matches!(
            event.data,
            EventData::MappingStart {
                style: taro_common::MappingStyle::Flow,
                ..
            }
        );
        if self.flow_level > 0 || self.canonical || flow || self.check_empty_mapping(event) {
            self.state = EmitterState::FlowMappingFirstKey;
        } else {
            self.state = EmitterState::BlockMappingFirstKey;
        }
        Ok(())
    }

    fn emit_flow_sequence_item(&mut self, event: &Event, first: bool) -> YamlResult<()> {
        if first {
            self.write_indicator("[", true, true, false)?;
            self.increase_indent(true, false);
            self.flow_level += 1;
        }
        if let EventData::SequenceEnd = event.data {
            self.flow_level -= 1;
            self.indent = self.indents.pop().unwrap_or(-1);
            if self.canonical && !first {
                self.write_indicator(",", false, false, false)?;
                self.write_indent()?;
            }
            self.write_indicator("]", false, false, false)?;
            self.state = self.pop_state();
            return Ok(());
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.canonical || self.column > self.best_width {
            self.write_indent()?;
        }
        self.states.push(EmitterState::FlowSequenceItem);
        self.emit_node(event, false, false, false)
    }

    fn emit_flow_mapping_key(&mut self, event: &Event, first: bool) -> YamlResult<()> {
        if first {
            self.write_indicator("{", true, true, false)?;
            self.increase_indent(true, false);
            self.flow_level += 1;
        }
        if let EventData::MappingEnd = event.data {
            self.flow_level -= 1;
            self.indent = self.indents.pop().unwrap_or(-1);
            if self.canonical && !first {
                self.write_indicator(",", false, false, false)?;
                self.write_indent()?;
            }
            self.write_indicator("}", false, false, false)?;
            self.state = self.pop_state();
            return Ok(());
        }
        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.canonical || self.column > self.best_width {
            self.write_indent()?;
        }
        if !self.canonical && self.check_simple_key(event) {
            self.states.push(EmitterState::FlowMappingSimpleValue);
            self.emit_node(event, false, true, true)
        } else {
            self.write_indicator("?", true, false, false)?;
            self.states.push(EmitterState::FlowMappingValue);
            self.emit_node(event, false, true, false)
        }
    }

    fn emit_flow_mapping_value(&mut self, event: &Event, simple: bool) -> YamlResult<()> {
        if simple {
            self.write_indicator(":", false, false, false)?;
        } else {
            if self.canonical || self.column > self.best_width {
                self.write_indent()?;
            }
            self.write_indicator(":", true, false, false)?;
        }
        self.states.push(EmitterState::FlowMappingKey);
        self.emit_node(event, false, true, false)
    }

    fn emit_block_sequence_item(&mut self, event: &Event, first: bool) -> YamlResult<()> {
        if first {
            // A sequence right under a mapping key shares the key's
            // indentation level.
            let indentless = self.mapping_context && !self.indention;
            self.increase_indent(false, indentless);
        }
        if let EventData::SequenceEnd = event.data {
            self.indent = self.indents.pop().unwrap_or(-1);
            self.state = self.pop_state();
            return Ok(());
        }
        self.write_indent()?;
        self.write_indicator("-", true, false, true)?;
        self.states.push(EmitterState::BlockSequenceItem);
        self.emit_node(event, false, false, false)
    }

    fn emit_block_mapping_key(&mut self, event: &Event, first: bool) -> YamlResult<()> {
        if first {
            self.increase_indent(false, false);
        }
        if let EventData::MappingEnd = event.data {
            self.indent = self.indents.pop().unwrap_or(-1);
            self.state = self.pop_state();
            return Ok(());
        }
        self.write_indent()?;
        if self.check_simple_key(event) {
            self.states.push(EmitterState::BlockMappingSimpleValue);
            self.emit_node(event, false, true, true)
        } else {
            self.write_indicator("?", true, false, true)?;
            self.states.push(EmitterState::BlockMappingValue);
            self.emit_node(event, false, true, false)
        }
    }

    fn emit_block_mapping_value(&mut self, event: &Event, simple: bool) -> YamlResult<()> {
        if simple {
            self.write_indicator(":", false, false, false)?;
        } else {
            self.write_indent()?;
            self.write_indicator(":", true, false, true)?;
        }
        self.states.push(EmitterState::BlockMappingKey);
        self.emit_node(event, false, true, false)
    }

    fn check_empty_sequence(&self, event: &Event) -> bool {
        matches!(event.data, EventData::SequenceStart { .. })
            && matches!(
                self.events.front().map(|next| &next.data),
                Some(EventData::SequenceEnd)
            )
    }

    fn check_empty_mapping(&self, event: &Event) -> bool {
        matches!(event.data, EventData::MappingStart { .. })
            && matches!(
                self.events.front().map(|next| &next.data),
                Some(EventData::MappingEnd)
            )
    }

    /// A node can be written in the simple `key: value` form when its
    /// one-line rendering stays short.
    fn check_simple_key(&self, event: &Event) -> bool {
        let anchor_length = self
            .anchor_data
            .as_ref()
            .map_or(0, |anchor| anchor.anchor.len());
        let tag_length = self.tag_data.as_ref().map_or(0, |tag| {
            tag.handle.as_ref().map_or(0, String::len) + tag.suffix.as_ref().map_or(0, String::len)
        });
        let length = match &event.data {
            EventData::Alias { .. } => anchor_length,
            EventData::Scalar { .. } => {
                let scalar = match self.scalar_data.as_ref() {
                    Some(scalar) => scalar,
                    None => return false,
                };
                if scalar.multiline {
                    return false;
                }
                anchor_length + tag_length + scalar.value.len()
            }
            EventData::SequenceStart { .. } => {
                if !self.check_empty_sequence(event) {
                    return false;
                }
                anchor_length + tag_length
            }
            EventData::MappingStart { .. } => {
                if !self.check_empty_mapping(event) {
                    return false;
                }
                anchor_length + tag_length
            }
            _ => return false,
        };
        length <= 128
    }

    fn select_scalar_style(&mut self, event: &Event) -> YamlResult<()> {
        let (plain_implicit, quoted_implicit, event_style) = match &event.data {
            EventData::Scalar {
                plain_implicit,
                quoted_implicit,
                style,
                ..
            } => (*plain_implicit, *quoted_implicit, *style),
            _ => return Ok(()),
        };
        let scalar = match self.scalar_data.as_mut() {
            Some(scalar) => scalar,
            None => return Ok(()),
        };
        let no_tag = self.tag_data.is_none();
        if no_tag && !plain_implicit && !quoted_implicit {
            return Err(YamlError::emitter(
                "neither tag nor implicit flags are specified",
            ));
        }

        let mut style = event_style;
        if style == ScalarStyle::Any {
            style = ScalarStyle::Plain;
        }
        if self.canonical {
            style = ScalarStyle::DoubleQuoted;
        }
        if self.simple_key_context && scalar.multiline {
            style = ScalarStyle::DoubleQuoted;
        }
        if style == ScalarStyle::Plain {
            if (self.flow_level > 0 && !scalar.flow_plain_allowed)
                || (self.flow_level == 0 && !scalar.block_plain_allowed)
            {
                style = ScalarStyle::SingleQuoted;
            }
            if scalar.value.is_empty() && (self.flow_level > 0 || self.simple_key_context) {
                style = ScalarStyle::SingleQuoted;
            }
            if no_tag && !plain_implicit {
                style = ScalarStyle::SingleQuoted;
            }
        }
        if style == ScalarStyle::SingleQuoted && !scalar.single_quoted_allowed {
            style = ScalarStyle::DoubleQuoted;
        }
        if (style == ScalarStyle::Literal || style == ScalarStyle::Folded)
            && (!scalar.block_allowed || self.flow_level > 0 || self.simple_key_context)
        {
            style = ScalarStyle::DoubleQuoted;
        }
        if no_tag && !quoted_implicit && style != ScalarStyle::Plain {
            // The style change must not alter how the value resolves,
            // restore the non-specific tag.
            self.tag_data = Some(TagAnalysis {
                handle: Some(String::from("!")),
                suffix: None,
            });
        }
        scalar.style = style;
        Ok(())
    }

    fn analyze_version_directive(version: VersionDirective) -> YamlResult<()> {
        if version.major != 1 || (version.minor != 1 && version.minor != 2) {
            return Err(YamlError::emitter("incompatible %YAML directive"));
        }
        Ok(())
    }

    fn analyze_tag_directive(directive: &TagDirective) -> YamlResult<()> {
        let handle = directive.handle.as_bytes();
        if handle.is_empty() {
            return Err(YamlError::emitter("tag handle must not be empty"));
        }
        if handle[0] != b'!' {
            return Err(YamlError::emitter("tag handle must start with '!'"));
        }
        if handle[handle.len() - 1] != b'!' {
            return Err(YamlError::emitter("tag handle must end with '!'"));
        }
        if handle.len() > 1 && !handle[1..handle.len() - 1].iter().copied().all(is_alpha) {
            return Err(YamlError::emitter(
                "tag handle must contain alphanumerical characters only",
            ));
        }
        if directive.prefix.is_empty() {
            return Err(YamlError::emitter("tag prefix must not be empty"));
        }
        Ok(())
    }

    fn append_tag_directive(&mut self, value: TagDirective, allow_duplicates: bool) -> YamlResult<()> {
        if self
            .tag_directives
            .iter()
            .any(|directive| directive.handle == value.handle)
        {
            if allow_duplicates {
                return Ok(());
            }
            return Err(YamlError::emitter("duplicate %TAG directive"));
        }
        self.tag_directives.push(value);
        Ok(())
    }

    fn analyze_anchor(anchor: &str, alias: bool) -> YamlResult<AnchorAnalysis> {
        if anchor.is_empty() {
            return Err(YamlError::emitter(if alias {
                "alias value must not be empty"
            } else {
                "anchor value must not be empty"
            }));
        }
        if !anchor.bytes().all(is_alpha) {
            return Err(YamlError::emitter(if alias {
                "alias value must contain alphanumerical characters only"
            } else {
                "anchor value must contain alphanumerical characters only"
            }));
        }
        Ok(AnchorAnalysis {
            anchor: String::from(anchor),
            alias,
        })
    }

    fn analyze_tag(&self, tag: &str) -> YamlResult<TagAnalysis> {
        if tag.is_empty() {
            return Err(YamlError::emitter("tag value must not be empty"));
        }
        for directive in &self.tag_directives {
            if tag.len() > directive.prefix.len() && tag.starts_with(directive.prefix.as_str()) {
                return Ok(TagAnalysis {
                    handle: Some(directive.handle.clone()),
                    suffix: Some(String::from(&tag[directive.prefix.len()..])),
                });
            }
        }
        Ok(TagAnalysis {
            handle: None,
            suffix: Some(String::from(tag)),
        })
    }

    fn analyze_scalar(&self, value: &str) -> ScalarAnalysis {
        let chars: Vec<char> = value.chars().collect();
        if chars.is_empty() {
            return ScalarAnalysis {
                value: String::new(),
                multiline: false,
                flow_plain_allowed: false,
                block_plain_allowed: true,
                single_quoted_allowed: true,
                block_allowed: false,
                style: ScalarStyle::Any,
            };
        }

        let mut block_indicators = false;
        let mut flow_indicators = false;
        let mut line_breaks = false;
        let mut special_characters = false;

        let mut leading_space = false;
        let mut leading_break = false;
        let mut trailing_space = false;
        let mut trailing_break = false;
        let mut break_space = false;
        let mut space_break = false;

        let mut preceded_by_whitespace = true;
        let mut followed_by_whitespace = is_blankz_at(&chars, 1);
        let mut previous_space = false;
        let mut previous_break = false;

        if chars.starts_with(&['-', '-', '-']) || chars.starts_with(&['.', '.', '.']) {
            block_indicators = true;
            flow_indicators = true;
        }

        for (i, &ch) in chars.iter().enumerate() {
            let first = i == 0;
            let last = i + 1 == chars.len();
            if first {
                if matches!(
                    ch,
                    '#' | ',' | '[' | ']' | '{' | '}' | '&' | '*' | '!' | '|' | '>' | '\'' | '"'
                        | '%' | '@' | '`'
                ) {
                    flow_indicators = true;
                    block_indicators = true;
                }
                if ch == '?' || ch == ':' {
                    flow_indicators = true;
                    if followed_by_whitespace {
                        block_indicators = true;
                    }
                }
                if ch == '-' && followed_by_whitespace {
                    flow_indicators = true;
                    block_indicators = true;
                }
            } else {
                if matches!(ch, ',' | '?' | '[' | ']' | '{' | '}') {
                    flow_indicators = true;
                }
                if ch == ':' {
                    flow_indicators = true;
                    if followed_by_whitespace {
                        block_indicators = true;
                    }
                }
                if ch == '#' && preceded_by_whitespace {
                    flow_indicators = true;
                    block_indicators = true;
                }
            }

            if !is_printable(ch) || (!ch.is_ascii() && !self.unicode) {
                special_characters = true;
            }
            if is_break(ch) {
                line_breaks = true;
            }

            if is_space(ch) {
                if first {
                    leading_space = true;
                }
                if last {
                    trailing_space = true;
                }
                if previous_break {
                    break_space = true;
                }
                previous_space = true;
                previous_break = false;
            } else if is_break(ch) {
                if first {
                    leading_break = true;
                }
                if last {
                    trailing_break = true;
                }
                if previous_space {
                    space_break = true;
                }
                previous_space = false;
                previous_break = true;
            } else {
                previous_space = false;
                previous_break = false;
            }

            preceded_by_whitespace = ch == ' ' || ch == '\t' || is_break(ch);
            followed_by_whitespace = is_blankz_at(&chars, i + 2);
        }

        let mut analysis = ScalarAnalysis {
            value: String::from(value),
            multiline: line_breaks,
            flow_plain_allowed: true,
            block_plain_allowed: true,
            single_quoted_allowed: true,
            block_allowed: true,
            style: ScalarStyle::Any,
        };
        if leading_space || leading_break || trailing_space || trailing_break {
            analysis.flow_plain_allowed = false;
            analysis.block_plain_allowed = false;
        }
        if trailing_space {
            analysis.block_allowed = false;
        }
        if break_space {
            analysis.flow_plain_allowed = false;
            analysis.block_plain_allowed = false;
            analysis.single_quoted_allowed = false;
        }
        if space_break || special_characters {
            analysis.flow_plain_allowed = false;
            analysis.block_plain_allowed = false;
            analysis.single_quoted_allowed = false;
            analysis.block_allowed = false;
        }
        if line_breaks {
            analysis.flow_plain_allowed = false;
            analysis.block_plain_allowed = false;
        }
        if flow_indicators {
            analysis.flow_plain_allowed = false;
        }
        if block_indicators {
            analysis.block_plain_allowed = false;
        }
        analysis
    }

    fn process_anchor(&mut self) -> YamlResult<()> {
        let anchor = match self.anchor_data.take() {
            Some(anchor) => anchor,
            None => return Ok(()),
        };
        self.write_indicator(if anchor.alias { "*" } else { "&" }, true, false, false)?;
        self.write_anchor(&anchor.anchor)
    }

    fn process_tag(&mut self) -> YamlResult<()> {
        let tag = match self.tag_data.take() {
            Some(tag) => tag,
            None => return Ok(()),
        };
        if let Some(handle) = tag.handle {
            self.write_tag_handle(&handle)?;
            if let Some(suffix) = tag.suffix {
                self.write_tag_content(&suffix, false)?;
            }
        } else if let Some(suffix) = tag.suffix {
            self.write_indicator("!<", true, false, false)?;
            self.write_tag_content(&suffix, false)?;
            self.write_indicator(">", false, false, false)?;
        }
        Ok(())
    }

    fn process_scalar(&mut self) -> YamlResult<()> {
        let scalar = match self.scalar_data.take() {
            Some(scalar) => scalar,
            None => return Ok(()),
        };
        let allow_breaks = !self.simple_key_context;
        match scalar.style {
            ScalarStyle::Plain => self.write_plain_scalar(&scalar.value, allow_breaks),
            ScalarStyle::SingleQuoted => self.write_single_quoted_scalar(&scalar.value, allow_breaks),
            ScalarStyle::DoubleQuoted => self.write_double_quoted_scalar(&scalar.value, allow_breaks),
            ScalarStyle::Literal => self.write_literal_scalar(&scalar.value),
            ScalarStyle::Folded => self.write_folded_scalar(&scalar.value),
            ScalarStyle::Any => unreachable!("the style was selected before writing"),
        }
    }

    fn increase_indent(&mut self, flow: bool, indentless: bool) {
        self.indents.push(self.indent);
        if self.indent < 0 {
            self.indent = if flow { self.best_indent } else { 0 };
        } else if !indentless {
            self.indent += self.best_indent;
        }
    }

    fn put(&mut self, ch: char) -> YamlResult<()> {
        self.writer.put(ch)?;
        self.column += 1;
        Ok(())
    }

    fn write_str(&mut self, string: &str) -> YamlResult<()> {
        self.writer.put_str(string)?;
        self.column += string.chars().count() as i32;
        Ok(())
    }

    fn put_break(&mut self) -> YamlResult<()> {
        self.writer.put_str(self.line_break.as_str())?;
        self.column = 0;
        Ok(())
    }

    /// Writes a break from scalar content. `\n` becomes the configured
    /// break, the exotic breaks keep themselves.
    fn write_break(&mut self, ch: char) -> YamlResult<()> {
        if ch == '\n' {
            self.put_break()
        } else {
            self.writer.put(ch)?;
            self.column = 0;
            Ok(())
        }
    }

    fn write_indicator(
        &mut self,
        indicator: &str,
        need_whitespace: bool,
        is_whitespace: bool,
        is_indention: bool,
    ) -> YamlResult<()> {
        if need_whitespace && !self.whitespace {
            self.put(' ')?;
        }
        self.write_str(indicator)?;
        self.whitespace = is_whitespace;
        self.indention = self.indention && is_indention;
        self.open_ended = 0;
        Ok(())
    }

    fn write_indent(&mut self) -> YamlResult<()> {
        let indent = if self.indent >= 0 { self.indent } else { 0 };
        if !self.indention
            || self.column > indent
            || (self.column == indent && !self.whitespace)
        {
            self.put_break()?;
        }
        while self.column < indent {
            self.put(' ')?;
        }
        self.whitespace = true;
        self.indention = true;
        Ok(())
    }

    fn write_anchor(&mut self, value: &str) -> YamlResult<()> {
        self.write_str(value)?;
        self.whitespace = false;
        self.indention = false;
        Ok(())
    }

    fn write_tag_handle(&mut self, value: &str) -> YamlResult<()> {
        if !self.whitespace {
            self.put(' ')?;
        }
        self.write_str(value)?;
        self.whitespace = false;
        self.indention = false;
        Ok(())
    }

    fn write_tag_content(&mut self, value: &str, need_whitespace: bool) -> YamlResult<()> {
        if need_whitespace && !self.whitespace {
            self.put(' ')?;
        }
        for byte in value.bytes() {
            if is_uri_char(byte) && byte != b'!' && byte != b'%' {
                self.put(byte as char)?;
            } else {
                self.write_str(&format!("%{byte:02X}"))?;
            }
        }
        self.whitespace = false;
        self.indention = false;
        Ok(())
    }

    fn write_plain_scalar(&mut self, value: &str, allow_breaks: bool) -> YamlResult<()> {
        // An empty value still needs a separating space in flow context
        // to keep things like `{a: }` unambiguous.
        if !self.whitespace && (!value.is_empty() || self.flow_level > 0) {
            self.put(' ')?;
        }
        let chars: Vec<char> = value.chars().collect();
        let mut spaces = false;
        let mut breaks = false;
        for (i, &ch) in chars.iter().enumerate() {
            if is_space(ch) {
                if allow_breaks
                    && !spaces
                    && self.column > self.best_width
                    && chars.get(i + 1).copied() != Some(' ')
                {
                    self.write_indent()?;
                } else {
                    self.put(ch)?;
                }
                spaces = true;
            } else if is_break(ch) {
                if !breaks && ch == '\n' {
                    self.put_break()?;
                }
                self.write_break(ch)?;
                self.indention = true;
                breaks = true;
            } else {
                if breaks {
                    self.write_indent()?;
                }
                self.put(ch)?;
                self.indention = false;
                spaces = false;
                breaks = false;
            }
        }
        self.whitespace = false;
        self.indention = false;
        if self.root_context {
            self.open_ended = 1;
        }
        Ok(())
    }

    fn write_single_quoted_scalar(&mut self, value: &str, allow_breaks: bool) -> YamlResult<()> {
        self.write_indicator("'", true, false, false)?;
        let chars: Vec<char> = value.chars().collect();
        let mut spaces = false;
        let mut breaks = false;
        for (i, &ch) in chars.iter().enumerate() {
            if is_space(ch) {
                if allow_breaks
                    && !spaces
                    && self.column > self.best_width
                    && i > 0
                    && i + 1 < chars.len()
                    && chars[i + 1] != ' '
                {
                    self.write_indent()?;
                } else {
                    self.put(ch)?;
                }
                spaces = true;
            } else if is_break(ch) {
                if !breaks && ch == '\n' {
                    self.put_break()?;
                }
                self.write_break(ch)?;
                self.indention = true;
                breaks = true;
            } else {
                if breaks {
                    self.write_indent()?;
                }
                if ch == '\'' {
                    self.put('\'')?;
                }
                self.put(ch)?;
                self.indention = false;
                spaces = false;
                breaks = false;
            }
        }
        self.write_indicator("'", false, false, false)?;
        self.whitespace = false;
        self.indention = false;
        Ok(())
    }

    fn write_double_quoted_scalar(&mut self, value: &str, allow_breaks: bool) -> YamlResult<()> {
        self.write_indicator("\"", true, false, false)?;
        let chars: Vec<char> = value.chars().collect();
        let mut spaces = false;
        for (i, &ch) in chars.iter().enumerate() {
            let must_escape = !is_printable(ch)
                || (!ch.is_ascii() && !self.unicode)
                || ch == '\u{FEFF}'
                || is_break(ch)
                || ch == '"'
                || ch == '\\';
            if must_escape {
                self.write_escaped_char(ch)?;
                spaces = false;
            } else if is_space(ch) {
                if allow_breaks
                    && !spaces
                    && self.column > self.best_width
                    && i > 0
                    && i + 1 < chars.len()
                {
                    self.write_indent()?;
                    if chars[i + 1] == ' ' {
                        self.put('\\')?;
                    }
                } else {
                    self.put(ch)?;
                }
                spaces = true;
            } else {
                self.put(ch)?;
                spaces = false;
            }
        }
        self.write_indicator("\"", false, false, false)?;
        self.whitespace = false;
        self.indention = false;
        Ok(())
    }

    fn write_escaped_char(&mut self, ch: char) -> YamlResult<()> {
        self.put('\\')?;
        match ch {
            '\0' => self.put('0'),
            '\u{07}' => self.put('a'),
            '\u{08}' => self.put('b'),
            '\t' => self.put('t'),
            '\n' => self.put('n'),
            '\u{0B}' => self.put('v'),
            '\u{0C}' => self.put('f'),
            '\r' => self.put('r'),
            '\u{1B}' => self.put('e'),
            '"' => self.put('"'),
            '\\' => self.put('\\'),
            '\u{85}' => self.put('N'),
            '\u{A0}' => self.put('_'),
            '\u{2028}' => self.put('L'),
            '\u{2029}' => self.put('P'),
            _ => {
                let code = ch as u32;
                if code <= 0xFF {
                    self.put('x')?;
                    self.write_str(&format!("{code:02X}"))
                } else if code <= 0xFFFF {
                    self.put('u')?;
                    self.write_str(&format!("{code:04X}"))
                } else {
                    self.put('U')?;
                    self.write_str(&format!("{code:08X}"))
                }
            }
        }
    }

    fn write_block_scalar_hints(&mut self, chars: &[char]) -> YamlResult<()> {
        if matches!(chars.first(), Some(&ch) if ch == ' ' || is_break(ch)) {
            let hint = format!("{}", self.best_indent);
            self.write_indicator(&hint, false, false, false)?;
        }
        let chomp_hint = if chars.last().copied().map_or(true, |ch| !is_break(ch)) {
            Some("-")
        } else if chars.len() == 1 || is_break(chars[chars.len() - 2]) {
            Some("+")
        } else {
            None
        };
        let keeps_trailing_breaks = chomp_hint == Some("+");
        if let Some(hint) = chomp_hint {
            self.write_indicator(hint, false, false, false)?;
        }
        self.open_ended = if keeps_trailing_breaks { 2 } else { 0 };
        Ok(())
    }

    fn write_literal_scalar(&mut self, value: &str) -> YamlResult<()> {
        self.write_indicator("|", true, false, false)?;
        let chars: Vec<char> = value.chars().collect();
        self.write_block_scalar_hints(&chars)?;
        self.put_break()?;
        self.indention = true;
        self.whitespace = true;
        let mut breaks = true;
        for &ch in &chars {
            if is_break(ch) {
                self.write_break(ch)?;
                self.indention = true;
                breaks = true;
            } else {
                if breaks {
                    self.write_indent()?;
                }
                self.put(ch)?;
                self.indention = false;
                breaks = false;
            }
        }
        Ok(())
    }

    fn write_folded_scalar(&mut self, value: &str) -> YamlResult<()> {
        self.write_indicator(">", true, false, false)?;
        let chars: Vec<char> = value.chars().collect();
        self.write_block_scalar_hints(&chars)?;
        self.put_break()?;
        self.indention = true;
        self.whitespace = true;
        let mut breaks = true;
        let mut leading_spaces = true;
        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];
            if is_break(ch) {
                if !breaks && !leading_spaces && ch == '\n' {
                    let mut k = i;
                    while k < chars.len() && is_break(chars[k]) {
                        k += 1;
                    }
                    if !is_blankz_at(&chars, k) {
                        self.put_break()?;
                    }
                }
                self.write_break(ch)?;
                self.indention = true;
                breaks = true;
                i += 1;
            } else {
                if breaks {
                    self.write_indent()?;
                    leading_spaces = ch == ' ' || ch == '\t';
                }
                if !breaks
                    && is_space(ch)
                    && chars.get(i + 1).copied() != Some(' ')
                    && self.column > self.best_width
                {
                    self.write_indent()?;
                } else {
                    self.put(ch)?;
                }
                self.indention = false;
                breaks = false;
                i += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taro_common::{MappingStyle, Span};

    fn emit_to_string(events: Vec<EventData>) -> String {
        let mut emitter = Emitter::new(Vec::new());
        for data in events {
            emitter
                .emit(Event::new(data, Span::default()))
                .expect("emit failed");
        }
        String::from_utf8(emitter.into_inner()).expect("emitter produced invalid UTF-8")
    }

    fn stream(content: Vec<EventData>) -> Vec<EventData> {
        let mut events = alloc::vec![
            EventData::StreamStart {
                encoding: Encoding::Utf8
            },
            EventData::DocumentStart {
                version_directive: None,
                tag_directives: Vec::new(),
                implicit: true
            },
        ];
        events.extend(content);
        events.push(EventData::DocumentEnd { implicit: true });
        events.push(EventData::StreamEnd);
        events
    }

    fn plain(value: &str) -> EventData {
        EventData::Scalar {
            anchor: None,
            tag: None,
            value: value.into(),
            plain_implicit: true,
            quoted_implicit: true,
            style: ScalarStyle::Any,
        }
    }

    #[test]
    fn block_mapping() {
        let text = emit_to_string(stream(alloc::vec![
            EventData::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: MappingStyle::Any
            },
            plain("a"),
            plain("1"),
            EventData::MappingEnd,
        ]));
        assert_eq!(text, "a: 1\n");
    }

    #[test]
    fn block_sequence() {
        let text = emit_to_string(stream(alloc::vec![
            EventData::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: SequenceStyle::Any
            },
            plain("a"),
            plain("b"),
            EventData::SequenceEnd,
        ]));
        assert_eq!(text, "- a\n- b\n");
    }

    #[test]
    fn flow_sequence_on_request() {
        let text = emit_to_string(stream(alloc::vec![
            EventData::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: SequenceStyle::Flow
            },
            plain("a"),
            plain("b"),
            EventData::SequenceEnd,
        ]));
        assert_eq!(text, "[a, b]\n");
    }

    #[test]
    fn empty_collections_compact() {
        let text = emit_to_string(stream(alloc::vec![
            EventData::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: MappingStyle::Any
            },
            plain("a"),
            EventData::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: SequenceStyle::Any
            },
            EventData::SequenceEnd,
            plain("b"),
            EventData::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: MappingStyle::Any
            },
            EventData::MappingEnd,
            EventData::MappingEnd,
        ]));
        assert_eq!(text, "a: []\nb: {}\n");
    }

    #[test]
    fn indicators_force_quoting() {
        let text = emit_to_string(stream(alloc::vec![plain("a: b")]));
        assert_eq!(text, "'a: b'\n");
    }

    #[test]
    fn untagged_quoting_without_implicit_emits_nonspecific_tag() {
        let text = emit_to_string(stream(alloc::vec![EventData::Scalar {
            anchor: None,
            tag: None,
            value: "a: b".into(),
            plain_implicit: false,
            quoted_implicit: false,
            style: ScalarStyle::Any,
        }]));
        assert_eq!(text, "! 'a: b'\n");
    }

    #[test]
    fn single_quotes_double_up() {
        let text = emit_to_string(stream(alloc::vec![EventData::Scalar {
            anchor: None,
            tag: None,
            value: "it's".into(),
            plain_implicit: false,
            quoted_implicit: true,
            style: ScalarStyle::SingleQuoted,
        }]));
        assert_eq!(text, "'it''s'\n");
    }

    #[test]
    fn control_characters_escape_double_quoted() {
        let text = emit_to_string(stream(alloc::vec![EventData::Scalar {
            anchor: None,
            tag: None,
            value: "a\u{7}b".into(),
            plain_implicit: true,
            quoted_implicit: true,
            style: ScalarStyle::Any,
        }]));
        assert_eq!(text, "\"a\\ab\"\n");
    }

    #[test]
    fn literal_scalar_block() {
        let text = emit_to_string(stream(alloc::vec![EventData::Scalar {
            anchor: None,
            tag: None,
            value: "a\nb\n".into(),
            plain_implicit: true,
            quoted_implicit: true,
            style: ScalarStyle::Literal,
        }]));
        assert_eq!(text, "|\n  a\n  b\n");
    }

    #[test]
    fn keep_chomping_marks_stream_end() {
        let text = emit_to_string(stream(alloc::vec![EventData::Scalar {
            anchor: None,
            tag: None,
            value: "a\n\n".into(),
            plain_implicit: true,
            quoted_implicit: true,
            style: ScalarStyle::Literal,
        }]));
        assert_eq!(text, "|+\n  a\n\n...\n");
    }

    #[test]
    fn anchors_and_aliases_round() {
        let text = emit_to_string(stream(alloc::vec![
            EventData::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: SequenceStyle::Any
            },
            EventData::Scalar {
                anchor: Some("a".into()),
                tag: None,
                value: "x".into(),
                plain_implicit: true,
                quoted_implicit: false,
                style: ScalarStyle::Any,
            },
            EventData::Alias { anchor: "a".into() },
            EventData::SequenceEnd,
        ]));
        assert_eq!(text, "- &a x\n- *a\n");
    }

    #[test]
    fn tags_use_shorthand_form() {
        let text = emit_to_string(stream(alloc::vec![EventData::Scalar {
            anchor: None,
            tag: Some("tag:yaml.org,2002:str".into()),
            value: "5".into(),
            plain_implicit: false,
            quoted_implicit: false,
            style: ScalarStyle::Any,
        }]));
        assert_eq!(text, "!!str 5\n");
    }

    #[test]
    fn canonical_layout() {
        let mut emitter = Emitter::new(Vec::new());
        emitter.set_canonical(true);
        for data in stream(alloc::vec![
            EventData::MappingStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: MappingStyle::Any
            },
            plain("a"),
            plain("1"),
            EventData::MappingEnd,
        ]) {
            emitter.emit(Event::new(data, Span::default())).unwrap();
        }
        let text = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(text, "---\n{\n  ? \"a\"\n  : \"1\",\n}\n");
    }

    #[test]
    fn directives_after_open_root_scalar() {
        let text = emit_to_string(alloc::vec![
            EventData::StreamStart {
                encoding: Encoding::Utf8
            },
            EventData::DocumentStart {
                version_directive: None,
                tag_directives: Vec::new(),
                implicit: true
            },
            plain("a"),
            EventData::DocumentEnd { implicit: true },
            EventData::DocumentStart {
                version_directive: Some(VersionDirective { major: 1, minor: 2 }),
                tag_directives: Vec::new(),
                implicit: false
            },
            plain("b"),
            EventData::DocumentEnd { implicit: true },
            EventData::StreamEnd,
        ]);
        assert_eq!(text, "a\n...\n%YAML 1.2\n--- b\n");
    }

    #[test]
    fn width_wraps_flow_items() {
        let mut emitter = Emitter::new(Vec::new());
        emitter.set_width(8);
        for data in stream(alloc::vec![
            EventData::SequenceStart {
                anchor: None,
                tag: None,
                implicit: true,
                style: SequenceStyle::Flow
            },
            plain("aaaa"),
            plain("bbbb"),
            plain("cccc"),
            EventData::SequenceEnd,
        ]) {
            emitter.emit(Event::new(data, Span::default())).unwrap();
        }
        let text = String::from_utf8(emitter.into_inner()).unwrap();
        assert_eq!(text, "[aaaa, bbbb,\n  cccc]\n");
    }

    #[test]
    fn utf16le_output_starts_with_bom() {
        let mut emitter = Emitter::new(Vec::new());
        emitter.set_encoding(Encoding::Utf16Le);
        for data in stream(alloc::vec![plain("a")]) {
            emitter.emit(Event::new(data, Span::default())).unwrap();
        }
        assert_eq!(
            emitter.into_inner(),
            [0xFF, 0xFE, 0x61, 0x00, 0x0A, 0x00]
        );
    }

    #[test]
    fn bad_anchor_name_is_refused() {
        let mut emitter = Emitter::new(Vec::new());
        let mut failed = false;
        for data in stream(alloc::vec![EventData::Scalar {
            anchor: Some("not legal".into()),
            tag: None,
            value: "x".into(),
            plain_implicit: true,
            quoted_implicit: false,
            style: ScalarStyle::Any,
        }]) {
            if let Err(err) = emitter.emit(Event::new(data, Span::default())) {
                use alloc::string::ToString;
                assert!(
                    err.to_string()
                        .contains("anchor value must contain alphanumerical characters only"),
                    "{err}"
                );
                failed = true;
                break;
            }
        }
        assert!(failed);
    }
}
