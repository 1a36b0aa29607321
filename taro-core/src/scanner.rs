//! Tokenizer for the block and flow syntax.
//!
//! Produces the token stream the parser consumes. Tokens are queued rather
//! than returned one by one because block collection starts and `Key` tokens
//! are only known in retrospect, once the `:` of a simple key shows up.

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use taro_common::{
    ChompIndicator, Encoding, Mark, ScalarStyle, ScanResult, Span, Token, TokenType, YamlError,
    YamlResult,
};

use crate::char_utils::{as_hex, is_alpha, is_blank, is_hex, is_uri_char};
use crate::reader::{Input, Reader};

/// A potential simple key, one per flow level plus one for the block context.
///
/// `token_number` remembers where the `Key` token has to be inserted if a `:`
/// confirms the key. `required` marks keys that cannot legally be abandoned,
/// like a key at the indentation level of its block mapping.
#[derive(Clone, Copy)]
struct SimpleKey {
    possible: bool,
    required: bool,
    token_number: usize,
    mark: Mark,
}

impl SimpleKey {
    fn new(mark: Mark) -> SimpleKey {
        SimpleKey {
            possible: false,
            required: false,
            token_number: 0,
            mark,
        }
    }
}

/// Translates a decoded character stream into [`Token`]s.
pub struct Scanner<I> {
    reader: Reader<I>,
    tokens: VecDeque<Token>,

    simple_keys: Vec<SimpleKey>,
    indents: Vec<i32>,
    indent: i32,
    flow_level: usize,
    /// Number of tokens handed out so far. Together with the queue length
    /// this yields the absolute number of the next token.
    tokens_parsed: usize,

    token_available: bool,
    simple_key_allowed: bool,
    stream_start_produced: bool,
    stream_end_produced: bool,
}

impl<I: Input> Scanner<I> {
    pub fn new(input: I) -> Scanner<I> {
        Scanner {
            reader: Reader::new(input),
            tokens: VecDeque::new(),
            simple_keys: Vec::new(),
            indents: Vec::new(),
            indent: -1,
            flow_level: 0,
            tokens_parsed: 0,
            token_available: false,
            simple_key_allowed: false,
            stream_start_produced: false,
            stream_end_produced: false,
        }
    }

    /// Overrides encoding auto-detection. Only valid before scanning starts.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.reader.set_encoding(encoding);
    }

    pub fn mark(&self) -> Mark {
        self.reader.mark()
    }

    /// Returns the next token without consuming it.
    pub fn peek_token(&mut self) -> YamlResult<&Token> {
        if !self.token_available {
            self.fetch_more_tokens()?;
        }
        let mark = self.reader.mark();
        self.tokens
            .front()
            .ok_or_else(|| YamlError::scanner_problem("unexpected end of token stream", mark))
    }

    /// Returns the next token and removes it from the queue.
    pub fn next_token(&mut self) -> YamlResult<Token> {
        if !self.token_available {
            self.fetch_more_tokens()?;
        }
        match self.tokens.pop_front() {
            Some(token) => {
                self.token_available = false;
                self.tokens_parsed += 1;
                Ok(token)
            }
            None => {
                let mark = self.reader.mark();
                Err(YamlError::scanner_problem(
                    "unexpected end of token stream",
                    mark,
                ))
            }
        }
    }

    /// Keeps fetching until the head of the queue is no longer a potential
    /// simple key, so that the caller never sees a scalar that might still
    /// turn into a `Key`.
    fn fetch_more_tokens(&mut self) -> ScanResult {
        loop {
            let mut need_more = false;
            if self.tokens.is_empty() {
                need_more = true;
            } else {
                self.stale_simple_keys()?;
                for key in &self.simple_keys {
                    if key.possible && key.token_number == self.tokens_parsed {
                        need_more = true;
                        break;
                    }
                }
            }
            if !need_more || self.stream_end_produced {
                break;
            }
            self.fetch_next_token()?;
        }
        self.token_available = true;
        Ok(())
    }

    fn fetch_next_token(&mut self) -> ScanResult {
        self.reader.cache(1)?;

        if !self.stream_start_produced {
            self.fetch_stream_start();
            return Ok(());
        }

        self.scan_to_next_token()?;
        self.stale_simple_keys()?;
        self.unroll_indent(self.reader.mark().col as i32);

        self.reader.cache(4)?;

        if self.reader.peek() == b'\0' {
            return self.fetch_stream_end();
        }

        if self.reader.mark().col == 0 && self.reader.peek() == b'%' {
            return self.fetch_directive();
        }

        if self.reader.next_is_document_indicator(b"---") {
            return self.fetch_document_indicator(TokenType::DocumentStart);
        }
        if self.reader.next_is_document_indicator(b"...") {
            return self.fetch_document_indicator(TokenType::DocumentEnd);
        }

        match self.reader.peek() {
            b'[' => return self.fetch_flow_collection_start(TokenType::FlowSequenceStart),
            b'{' => return self.fetch_flow_collection_start(TokenType::FlowMappingStart),
            b']' => return self.fetch_flow_collection_end(TokenType::FlowSequenceEnd),
            b'}' => return self.fetch_flow_collection_end(TokenType::FlowMappingEnd),
            b',' => return self.fetch_flow_entry(),
            b'-' if self.reader.blankz_at(1) => return self.fetch_block_entry(),
            b'?' if self.flow_level > 0 || self.reader.blankz_at(1) => return self.fetch_key(),
            b':' if self.flow_level > 0 || self.reader.blankz_at(1) => return self.fetch_value(),
            b'*' => return self.fetch_anchor(true),
            b'&' => return self.fetch_anchor(false),
            b'!' => return self.fetch_tag(),
            b'|' if self.flow_level == 0 => return self.fetch_block_scalar(true),
            b'>' if self.flow_level == 0 => return self.fetch_block_scalar(false),
            b'\'' => return self.fetch_flow_scalar(true),
            b'"' => return self.fetch_flow_scalar(false),
            _ => {}
        }

        // A plain scalar starts with any character that is not an indicator.
        // A `-`, `?` or `:` may still open one if no blank follows.
        let is_plain = !(self.reader.next_is_blankz()
            || matches!(
                self.reader.peek(),
                b'-' | b'?'
                    | b':'
                    | b','
                    | b'['
                    | b']'
                    | b'{'
                    | b'}'
                    | b'#'
                    | b'&'
                    | b'*'
                    | b'!'
                    | b'|'
                    | b'>'
                    | b'\''
                    | b'"'
                    | b'%'
                    | b'@'
                    | b'`'
            ))
            || (self.reader.peek() == b'-' && !is_blank(self.reader.peek_at(1)))
            || (self.flow_level > 0
                && matches!(self.reader.peek(), b'?' | b':')
                && !self.reader.blankz_at(1));
        if is_plain {
            return self.fetch_plain_scalar();
        }

        let mark = self.reader.mark();
        Err(YamlError::scanner(
            "while scanning for the next token",
            mark,
            "found character that cannot start any token",
            mark,
        ))
    }

    fn fetch_stream_start(&mut self) {
        let mark = self.reader.mark();
        self.simple_keys.push(SimpleKey::new(mark));
        self.simple_key_allowed = true;
        self.stream_start_produced = true;
        self.tokens.push_back(Token::new(
            TokenType::StreamStart {
                encoding: self.reader.encoding(),
            },
            Span::empty(mark),
        ));
    }

    fn fetch_stream_end(&mut self) -> ScanResult {
        // The stream may end without a trailing break.
        self.reader.force_new_line();

        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        self.stream_end_produced = true;
        let mark = self.reader.mark();
        self.tokens
            .push_back(Token::new(TokenType::StreamEnd, Span::empty(mark)));
        Ok(())
    }

    fn fetch_directive(&mut self) -> ScanResult {
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_directive()?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_document_indicator(&mut self, data: TokenType) -> ScanResult {
        self.unroll_indent(-1);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;
        let start_mark = self.reader.mark();
        self.reader.skip_n(3);
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens.push_back(Token::new(data, span));
        Ok(())
    }

    fn fetch_flow_collection_start(&mut self, data: TokenType) -> ScanResult {
        // The indicator itself may start a simple key, e.g. `[a]: b`.
        self.save_simple_key()?;
        self.increase_flow_level();
        self.simple_key_allowed = true;
        let start_mark = self.reader.mark();
        self.reader.skip();
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens.push_back(Token::new(data, span));
        Ok(())
    }

    fn fetch_flow_collection_end(&mut self, data: TokenType) -> ScanResult {
        self.remove_simple_key()?;
        self.decrease_flow_level();
        self.simple_key_allowed = false;
        let start_mark = self.reader.mark();
        self.reader.skip();
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens.push_back(Token::new(data, span));
        Ok(())
    }

    fn fetch_flow_entry(&mut self) -> ScanResult {
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let start_mark = self.reader.mark();
        self.reader.skip();
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens.push_back(Token::new(TokenType::FlowEntry, span));
        Ok(())
    }

    fn fetch_block_entry(&mut self) -> ScanResult {
        if self.flow_level == 0 {
            if !self.simple_key_allowed {
                let mark = self.reader.mark();
                return Err(YamlError::scanner_problem(
                    "block sequence entries are not allowed in this context",
                    mark,
                ));
            }
            let mark = self.reader.mark();
            self.roll_indent(mark.col as i32, None, TokenType::BlockSequenceStart, mark);
        }
        // In the flow context a `-` is an error, but the parser can point at
        // the surrounding collection, so let it report the problem.
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let start_mark = self.reader.mark();
        self.reader.skip();
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens
            .push_back(Token::new(TokenType::BlockEntry, span));
        Ok(())
    }

    fn fetch_key(&mut self) -> ScanResult {
        if self.flow_level == 0 {
            if !self.simple_key_allowed {
                let mark = self.reader.mark();
                return Err(YamlError::scanner_problem(
                    "mapping keys are not allowed in this context",
                    mark,
                ));
            }
            let mark = self.reader.mark();
            self.roll_indent(mark.col as i32, None, TokenType::BlockMappingStart, mark);
        }
        self.remove_simple_key()?;
        self.simple_key_allowed = self.flow_level == 0;
        let start_mark = self.reader.mark();
        self.reader.skip();
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens.push_back(Token::new(TokenType::Key, span));
        Ok(())
    }

    fn fetch_value(&mut self) -> ScanResult {
        let key = match self.simple_keys.last() {
            Some(key) if key.possible => Some(*key),
            _ => None,
        };
        if let Some(key) = key {
            // The `:` confirms the pending simple key. Put the `Key` token
            // in front of it, together with the block mapping start if this
            // is the first key of the mapping.
            let token = Token::new(TokenType::Key, Span::empty(key.mark));
            self.insert_token(key.token_number - self.tokens_parsed, token);
            self.roll_indent(
                key.mark.col as i32,
                Some(key.token_number),
                TokenType::BlockMappingStart,
                key.mark,
            );
            if let Some(last) = self.simple_keys.last_mut() {
                last.possible = false;
            }
            self.simple_key_allowed = false;
        } else {
            if self.flow_level == 0 {
                if !self.simple_key_allowed {
                    let mark = self.reader.mark();
                    return Err(YamlError::scanner_problem(
                        "mapping values are not allowed in this context",
                        mark,
                    ));
                }
                let mark = self.reader.mark();
                self.roll_indent(mark.col as i32, None, TokenType::BlockMappingStart, mark);
            }
            self.simple_key_allowed = self.flow_level == 0;
        }
        let start_mark = self.reader.mark();
        self.reader.skip();
        let span = Span::new(start_mark, self.reader.mark());
        self.tokens.push_back(Token::new(TokenType::Value, span));
        Ok(())
    }

    fn fetch_anchor(&mut self, alias: bool) -> ScanResult {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_anchor(alias)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_tag(&mut self) -> ScanResult {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_tag()?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_block_scalar(&mut self, literal: bool) -> ScanResult {
        // A block scalar is never a key, but a simple key may follow it.
        self.remove_simple_key()?;
        self.simple_key_allowed = true;
        let token = self.scan_block_scalar(literal)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_flow_scalar(&mut self, single: bool) -> ScanResult {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_flow_scalar(single)?;
        self.tokens.push_back(token);
        Ok(())
    }

    fn fetch_plain_scalar(&mut self) -> ScanResult {
        self.save_simple_key()?;
        self.simple_key_allowed = false;
        let token = self.scan_plain_scalar()?;
        self.tokens.push_back(token);
        Ok(())
    }

    /// Eats whitespace, line breaks and comments up to the next token.
    ///
    /// Tabs are only whitespace where a simple key can no longer start, so in
    /// the block context a tab before a key stays put and the token
    /// dispatcher rejects it.
    fn scan_to_next_token(&mut self) -> ScanResult {
        loop {
            self.reader.cache(1)?;

            if self.reader.mark().col == 0 && self.reader.next_is_bom() {
                self.reader.skip();
            }

            while self.reader.peek() == b' '
                || ((self.flow_level > 0 || !self.simple_key_allowed)
                    && self.reader.peek() == b'\t')
            {
                self.reader.skip();
                self.reader.cache(1)?;
            }

            if self.reader.peek() == b'#' {
                self.reader.skip_to_break()?;
            }

            if self.reader.next_is_break() {
                self.reader.cache(2)?;
                self.reader.skip_line_break();
                if self.flow_level == 0 {
                    self.simple_key_allowed = true;
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn scan_directive(&mut self) -> YamlResult<Token> {
        let start_mark = self.reader.mark();

        // Skip over the `%`.
        self.reader.skip();

        let name = self.scan_directive_name(start_mark)?;
        let token = if name == "YAML" {
            let (major, minor) = self.scan_version_directive_value(start_mark)?;
            let end_mark = self.reader.mark();
            Token::new(
                TokenType::VersionDirective { major, minor },
                Span::new(start_mark, end_mark),
            )
        } else if name == "TAG" {
            let (handle, prefix) = self.scan_tag_directive_value(start_mark)?;
            let end_mark = self.reader.mark();
            Token::new(
                TokenType::TagDirective { handle, prefix },
                Span::new(start_mark, end_mark),
            )
        } else {
            return Err(YamlError::scanner(
                "while scanning a directive",
                start_mark,
                "found unknown directive name",
                self.reader.mark(),
            ));
        };

        // Only a comment may follow the directive value.
        self.reader.cache(1)?;
        while is_blank(self.reader.peek()) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        if self.reader.peek() == b'#' {
            self.reader.skip_to_break()?;
        }
        if !self.reader.next_is_breakz() {
            return Err(YamlError::scanner(
                "while scanning a directive",
                start_mark,
                "did not find expected comment or line break",
                self.reader.mark(),
            ));
        }
        if self.reader.next_is_break() {
            self.reader.cache(2)?;
            self.reader.skip_line_break();
        }

        Ok(token)
    }

    fn scan_directive_name(&mut self, start_mark: Mark) -> YamlResult<String> {
        let mut string = String::new();
        self.reader.cache(1)?;
        while is_alpha(self.reader.peek()) {
            self.reader.read_char(&mut string);
            self.reader.cache(1)?;
        }
        if string.is_empty() {
            return Err(YamlError::scanner(
                "while scanning a directive",
                start_mark,
                "could not find expected directive name",
                self.reader.mark(),
            ));
        }
        if !self.reader.next_is_blankz() {
            return Err(YamlError::scanner(
                "while scanning a directive",
                start_mark,
                "found unexpected non-alphabetical character",
                self.reader.mark(),
            ));
        }
        Ok(string)
    }

    fn scan_version_directive_value(&mut self, start_mark: Mark) -> YamlResult<(u8, u8)> {
        self.reader.cache(1)?;
        while is_blank(self.reader.peek()) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        let major = self.scan_version_directive_number(start_mark)?;
        if self.reader.peek() != b'.' {
            return Err(YamlError::scanner(
                "while scanning a %YAML directive",
                start_mark,
                "did not find expected digit or '.' character",
                self.reader.mark(),
            ));
        }
        self.reader.skip();
        let minor = self.scan_version_directive_number(start_mark)?;
        Ok((major, minor))
    }

    fn scan_version_directive_number(&mut self, start_mark: Mark) -> YamlResult<u8> {
        let mut value: u32 = 0;
        let mut length = 0;
        self.reader.cache(1)?;
        while self.reader.peek().is_ascii_digit() {
            length += 1;
            if length > 9 {
                return Err(YamlError::scanner(
                    "while scanning a %YAML directive",
                    start_mark,
                    "found extremely long version number",
                    self.reader.mark(),
                ));
            }
            value = value * 10 + u32::from(self.reader.peek() - b'0');
            self.reader.skip();
            self.reader.cache(1)?;
        }
        if length == 0 {
            return Err(YamlError::scanner(
                "while scanning a %YAML directive",
                start_mark,
                "did not find expected version number",
                self.reader.mark(),
            ));
        }
        u8::try_from(value).map_err(|_| {
            YamlError::scanner(
                "while scanning a %YAML directive",
                start_mark,
                "found extremely long version number",
                self.reader.mark(),
            )
        })
    }

    fn scan_tag_directive_value(&mut self, start_mark: Mark) -> YamlResult<(String, String)> {
        self.reader.cache(1)?;
        while is_blank(self.reader.peek()) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        let handle = self.scan_tag_handle(true, start_mark)?;
        self.reader.cache(1)?;
        if !is_blank(self.reader.peek()) {
            return Err(YamlError::scanner(
                "while scanning a %TAG directive",
                start_mark,
                "did not find expected whitespace",
                self.reader.mark(),
            ));
        }
        while is_blank(self.reader.peek()) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        let prefix = self.scan_tag_uri(true, None, start_mark)?;
        if !self.reader.next_is_blankz() {
            return Err(YamlError::scanner(
                "while scanning a %TAG directive",
                start_mark,
                "did not find expected whitespace or line break",
                self.reader.mark(),
            ));
        }
        Ok((handle, prefix))
    }

    fn scan_anchor(&mut self, alias: bool) -> YamlResult<Token> {
        let start_mark = self.reader.mark();

        // Skip over the `*` or `&`.
        self.reader.skip();

        let mut string = String::new();
        self.reader.cache(1)?;
        while is_alpha(self.reader.peek()) {
            self.reader.read_char(&mut string);
            self.reader.cache(1)?;
        }
        let end_mark = self.reader.mark();
        if string.is_empty()
            || !(self.reader.next_is_blankz()
                || matches!(
                    self.reader.peek(),
                    b'?' | b':' | b',' | b']' | b'}' | b'%' | b'@' | b'`'
                ))
        {
            return Err(YamlError::scanner(
                if alias {
                    "while scanning an alias"
                } else {
                    "while scanning an anchor"
                },
                start_mark,
                "did not find expected alphabetic or numeric character",
                self.reader.mark(),
            ));
        }
        let data = if alias {
            TokenType::Alias(string)
        } else {
            TokenType::Anchor(string)
        };
        Ok(Token::new(data, Span::new(start_mark, end_mark)))
    }

    fn scan_tag(&mut self) -> YamlResult<Token> {
        let start_mark = self.reader.mark();
        let mut handle;
        let suffix;

        self.reader.cache(2)?;
        if self.reader.peek_at(1) == b'<' {
            // Verbatim tag, keep the URI as is.
            handle = String::new();
            self.reader.skip_n(2);
            suffix = self.scan_tag_uri(false, None, start_mark)?;
            if self.reader.peek() != b'>' {
                return Err(YamlError::scanner(
                    "while scanning a tag",
                    start_mark,
                    "did not find the expected '>'",
                    self.reader.mark(),
                ));
            }
            self.reader.skip();
        } else {
            handle = self.scan_tag_handle(false, start_mark)?;
            if handle.len() > 1 && handle.starts_with('!') && handle.ends_with('!') {
                suffix = self.scan_tag_uri(false, None, start_mark)?;
            } else {
                // What looked like a handle was the start of the suffix.
                let rest = self.scan_tag_uri(false, Some(handle.as_str()), start_mark)?;
                if rest.is_empty() {
                    // The tag was a lone `!`, the non-specific tag.
                    handle = String::new();
                    suffix = String::from("!");
                } else {
                    handle = String::from("!");
                    suffix = rest;
                }
            }
        }

        let end_mark = self.reader.mark();
        self.reader.cache(1)?;
        if !self.reader.next_is_blankz() && !(self.flow_level > 0 && self.reader.peek() == b',') {
            return Err(YamlError::scanner(
                "while scanning a tag",
                start_mark,
                "did not find expected whitespace or line break",
                self.reader.mark(),
            ));
        }

        Ok(Token::new(
            TokenType::Tag { handle, suffix },
            Span::new(start_mark, end_mark),
        ))
    }

    fn scan_tag_handle(&mut self, directive: bool, start_mark: Mark) -> YamlResult<String> {
        self.reader.cache(1)?;
        if self.reader.peek() != b'!' {
            return Err(YamlError::scanner(
                if directive {
                    "while scanning a tag directive"
                } else {
                    "while scanning a tag"
                },
                start_mark,
                "did not find expected '!'",
                self.reader.mark(),
            ));
        }
        let mut string = String::new();
        self.reader.read_char(&mut string);
        self.reader.cache(1)?;
        while is_alpha(self.reader.peek()) {
            self.reader.read_char(&mut string);
            self.reader.cache(1)?;
        }
        if self.reader.peek() == b'!' {
            self.reader.read_char(&mut string);
        } else if directive && string != "!" {
            // A %TAG directive requires the full `!handle!` form.
            return Err(YamlError::scanner(
                "while parsing a tag directive",
                start_mark,
                "did not find expected '!'",
                self.reader.mark(),
            ));
        }
        Ok(string)
    }

    /// Scans a tag URI. `head` is the part already consumed as a would-be
    /// handle; everything past its leading `!` belongs to the URI.
    fn scan_tag_uri(
        &mut self,
        directive: bool,
        head: Option<&str>,
        start_mark: Mark,
    ) -> YamlResult<String> {
        let head = head.unwrap_or("");
        let mut length = head.len();
        let mut string = String::new();
        if length > 1 {
            string.push_str(&head[1..]);
        }
        self.reader.cache(1)?;
        while is_uri_char(self.reader.peek()) {
            if self.reader.peek() == b'%' {
                self.scan_uri_escapes(directive, start_mark, &mut string)?;
            } else {
                self.reader.read_char(&mut string);
            }
            length += 1;
            self.reader.cache(1)?;
        }
        if length == 0 {
            return Err(YamlError::scanner(
                if directive {
                    "while parsing a %TAG directive"
                } else {
                    "while parsing a tag"
                },
                start_mark,
                "did not find expected tag URI",
                self.reader.mark(),
            ));
        }
        Ok(string)
    }

    /// Decodes one `%XX` escaped character, which may span several octets.
    fn scan_uri_escapes(
        &mut self,
        directive: bool,
        start_mark: Mark,
        string: &mut String,
    ) -> ScanResult {
        let context = if directive {
            "while parsing a %TAG directive"
        } else {
            "while parsing a tag"
        };
        let mut width = 0usize;
        let mut escaped = String::new();
        loop {
            self.reader.cache(3)?;
            if !(self.reader.peek() == b'%'
                && is_hex(self.reader.peek_at(1))
                && is_hex(self.reader.peek_at(2)))
            {
                return Err(YamlError::scanner(
                    context,
                    start_mark,
                    "did not find URI escaped octet",
                    self.reader.mark(),
                ));
            }
            let octet =
                ((as_hex(self.reader.peek_at(1)) << 4) + as_hex(self.reader.peek_at(2))) as u8;
            if width == 0 {
                width = if octet & 0x80 == 0x00 {
                    1
                } else if octet & 0xE0 == 0xC0 {
                    2
                } else if octet & 0xF0 == 0xE0 {
                    3
                } else if octet & 0xF8 == 0xF0 {
                    4
                } else {
                    return Err(YamlError::scanner(
                        context,
                        start_mark,
                        "found an incorrect leading UTF-8 octet",
                        self.reader.mark(),
                    ));
                };
            } else if octet & 0xC0 != 0x80 {
                return Err(YamlError::scanner(
                    context,
                    start_mark,
                    "found an incorrect trailing UTF-8 octet",
                    self.reader.mark(),
                ));
            }
            escaped.push('%');
            escaped.push(char::from(self.reader.peek_at(1)));
            escaped.push(char::from(self.reader.peek_at(2)));
            self.reader.skip_n(3);
            width -= 1;
            if width == 0 {
                break;
            }
        }
        let bytes = urlencoding::decode_binary(escaped.as_bytes());
        match core::str::from_utf8(&bytes) {
            Ok(decoded) => string.push_str(decoded),
            Err(_) => {
                return Err(YamlError::scanner(
                    context,
                    start_mark,
                    "found an incorrect trailing UTF-8 octet",
                    self.reader.mark(),
                ));
            }
        }
        Ok(())
    }

    fn scan_block_scalar(&mut self, literal: bool) -> YamlResult<Token> {
        let start_mark = self.reader.mark();

        // Skip over the `|` or `>`.
        self.reader.skip();

        // The chomping indicator and the indentation indicator may come in
        // either order.
        let mut chomping = ChompIndicator::Clip;
        let mut increment: i32 = 0;
        self.reader.cache(1)?;
        if matches!(self.reader.peek(), b'+' | b'-') {
            chomping = if self.reader.peek() == b'+' {
                ChompIndicator::Keep
            } else {
                ChompIndicator::Strip
            };
            self.reader.skip();
            self.reader.cache(1)?;
            if self.reader.peek().is_ascii_digit() {
                if self.reader.peek() == b'0' {
                    return Err(YamlError::scanner(
                        "while scanning a block scalar",
                        start_mark,
                        "found an indentation indicator equal to 0",
                        self.reader.mark(),
                    ));
                }
                increment = i32::from(self.reader.peek() - b'0');
                self.reader.skip();
            }
        } else if self.reader.peek().is_ascii_digit() {
            if self.reader.peek() == b'0' {
                return Err(YamlError::scanner(
                    "while scanning a block scalar",
                    start_mark,
                    "found an indentation indicator equal to 0",
                    self.reader.mark(),
                ));
            }
            increment = i32::from(self.reader.peek() - b'0');
            self.reader.skip();
            self.reader.cache(1)?;
            if matches!(self.reader.peek(), b'+' | b'-') {
                chomping = if self.reader.peek() == b'+' {
                    ChompIndicator::Keep
                } else {
                    ChompIndicator::Strip
                };
                self.reader.skip();
            }
        }

        self.reader.cache(1)?;
        while is_blank(self.reader.peek()) {
            self.reader.skip();
            self.reader.cache(1)?;
        }
        if self.reader.peek() == b'#' {
            self.reader.skip_to_break()?;
        }
        if !self.reader.next_is_breakz() {
            return Err(YamlError::scanner(
                "while scanning a block scalar",
                start_mark,
                "did not find expected comment or line break",
                self.reader.mark(),
            ));
        }
        if self.reader.next_is_break() {
            self.reader.cache(2)?;
            self.reader.skip_line_break();
        }

        let mut end_mark = self.reader.mark();
        let mut indent: i32 = if increment > 0 {
            if self.indent >= 0 {
                self.indent + increment
            } else {
                increment
            }
        } else {
            0
        };

        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();

        self.scan_block_scalar_breaks(&mut indent, &mut trailing_breaks, start_mark, &mut end_mark)?;

        self.reader.cache(1)?;
        let mut leading_blank = false;
        while self.reader.mark().col as i32 == indent && self.reader.peek() != b'\0' {
            // Fold the previous break unless either the previous or the
            // current line is more indented than the scalar.
            let trailing_blank = is_blank(self.reader.peek());
            if !literal && leading_break.starts_with('\n') && !leading_blank && !trailing_blank {
                if trailing_breaks.is_empty() {
                    string.push(' ');
                }
                leading_break.clear();
            } else {
                string.push_str(&leading_break);
                leading_break.clear();
            }
            string.push_str(&trailing_breaks);
            trailing_breaks.clear();

            leading_blank = is_blank(self.reader.peek());
            while !self.reader.next_is_breakz() {
                self.reader.read_char(&mut string);
                self.reader.cache(1)?;
            }
            self.reader.cache(2)?;
            if self.reader.next_is_break() {
                self.reader.read_line_break(&mut leading_break);
            }
            self.scan_block_scalar_breaks(
                &mut indent,
                &mut trailing_breaks,
                start_mark,
                &mut end_mark,
            )?;
        }

        if chomping != ChompIndicator::Strip {
            string.push_str(&leading_break);
        }
        if chomping == ChompIndicator::Keep {
            string.push_str(&trailing_breaks);
        }

        Ok(Token::new(
            TokenType::Scalar {
                value: string,
                style: if literal {
                    ScalarStyle::Literal
                } else {
                    ScalarStyle::Folded
                },
            },
            Span::new(start_mark, end_mark),
        ))
    }

    /// Eats the indentation and breaks between block scalar lines. Settles
    /// the scalar indentation on the first call if no indicator gave one.
    fn scan_block_scalar_breaks(
        &mut self,
        indent: &mut i32,
        breaks: &mut String,
        start_mark: Mark,
        end_mark: &mut Mark,
    ) -> ScanResult {
        let mut max_indent: i32 = 0;
        *end_mark = self.reader.mark();
        loop {
            self.reader.cache(1)?;
            while (*indent == 0 || (self.reader.mark().col as i32) < *indent)
                && self.reader.peek() == b' '
            {
                self.reader.skip();
                self.reader.cache(1)?;
            }
            if (self.reader.mark().col as i32) > max_indent {
                max_indent = self.reader.mark().col as i32;
            }
            if (*indent == 0 || (self.reader.mark().col as i32) < *indent)
                && self.reader.peek() == b'\t'
            {
                return Err(YamlError::scanner(
                    "while scanning a block scalar",
                    start_mark,
                    "found a tab character where an indentation space is expected",
                    self.reader.mark(),
                ));
            }
            if !self.reader.next_is_break() {
                break;
            }
            self.reader.cache(2)?;
            self.reader.read_line_break(breaks);
            *end_mark = self.reader.mark();
        }
        if *indent == 0 {
            *indent = max_indent;
            if *indent < self.indent + 1 {
                *indent = self.indent + 1;
            }
            if *indent < 1 {
                *indent = 1;
            }
        }
        Ok(())
    }

    fn scan_flow_scalar(&mut self, single: bool) -> YamlResult<Token> {
        let start_mark = self.reader.mark();

        // Skip over the opening quote.
        self.reader.skip();

        let quote = if single { b'\'' } else { b'"' };
        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        loop {
            self.reader.cache(4)?;
            if self.reader.next_is_document_indicator(b"---")
                || self.reader.next_is_document_indicator(b"...")
            {
                return Err(YamlError::scanner(
                    "while scanning a quoted scalar",
                    start_mark,
                    "found unexpected document indicator",
                    self.reader.mark(),
                ));
            }
            if self.reader.peek() == b'\0' {
                return Err(YamlError::scanner(
                    "while scanning a quoted scalar",
                    start_mark,
                    "found unexpected end of stream",
                    self.reader.mark(),
                ));
            }

            let mut leading_blanks = false;
            while !self.reader.next_is_blankz() {
                if single && self.reader.peek() == b'\'' && self.reader.peek_at(1) == b'\'' {
                    // An escaped single quote.
                    string.push('\'');
                    self.reader.skip_n(2);
                } else if self.reader.peek() == quote {
                    break;
                } else if !single && self.reader.peek() == b'\\' && self.reader.break_at(1) {
                    // An escaped line break joins the lines without a space.
                    self.reader.cache(3)?;
                    self.reader.skip();
                    self.reader.skip_line_break();
                    leading_blanks = true;
                    break;
                } else if !single && self.reader.peek() == b'\\' {
                    self.scan_flow_scalar_escape(start_mark, &mut string)?;
                } else {
                    self.reader.read_char(&mut string);
                }
                self.reader.cache(2)?;
            }

            if self.reader.peek() == quote {
                break;
            }

            self.reader.cache(1)?;
            while is_blank(self.reader.peek()) || self.reader.next_is_break() {
                if is_blank(self.reader.peek()) {
                    if leading_blanks {
                        self.reader.skip();
                    } else {
                        self.reader.read_char(&mut whitespaces);
                    }
                } else {
                    self.reader.cache(2)?;
                    if leading_blanks {
                        self.reader.read_line_break(&mut trailing_breaks);
                    } else {
                        whitespaces.clear();
                        self.reader.read_line_break(&mut leading_break);
                        leading_blanks = true;
                    }
                }
                self.reader.cache(1)?;
            }

            if leading_blanks {
                // Fold the breaks: a single break becomes a space, further
                // empty lines survive as breaks.
                if leading_break.starts_with('\n') {
                    if trailing_breaks.is_empty() {
                        string.push(' ');
                    } else {
                        string.push_str(&trailing_breaks);
                        trailing_breaks.clear();
                    }
                    leading_break.clear();
                } else {
                    string.push_str(&leading_break);
                    string.push_str(&trailing_breaks);
                    leading_break.clear();
                    trailing_breaks.clear();
                }
            } else {
                string.push_str(&whitespaces);
                whitespaces.clear();
            }
        }

        // Skip over the closing quote.
        self.reader.skip();

        let end_mark = self.reader.mark();
        Ok(Token::new(
            TokenType::Scalar {
                value: string,
                style: if single {
                    ScalarStyle::SingleQuoted
                } else {
                    ScalarStyle::DoubleQuoted
                },
            },
            Span::new(start_mark, end_mark),
        ))
    }

    fn scan_flow_scalar_escape(&mut self, start_mark: Mark, string: &mut String) -> ScanResult {
        let mut code_length = 0usize;
        match self.reader.peek_at(1) {
            b'0' => string.push('\0'),
            b'a' => string.push('\x07'),
            b'b' => string.push('\x08'),
            b't' | b'\t' => string.push('\t'),
            b'n' => string.push('\n'),
            b'v' => string.push('\x0b'),
            b'f' => string.push('\x0c'),
            b'r' => string.push('\r'),
            b'e' => string.push('\x1b'),
            b' ' => string.push(' '),
            b'"' => string.push('"'),
            b'\'' => string.push('\''),
            b'\\' => string.push('\\'),
            b'/' => string.push('/'),
            // Next line (NEL).
            b'N' => string.push('\u{85}'),
            // Non-breaking space.
            b'_' => string.push('\u{a0}'),
            // Line separator.
            b'L' => string.push('\u{2028}'),
            // Paragraph separator.
            b'P' => string.push('\u{2029}'),
            b'x' => code_length = 2,
            b'u' => code_length = 4,
            b'U' => code_length = 8,
            _ => {
                return Err(YamlError::scanner(
                    "while parsing a quoted scalar",
                    start_mark,
                    "found unknown escape character",
                    self.reader.mark(),
                ));
            }
        }
        self.reader.skip_n(2);

        if code_length > 0 {
            self.reader.cache(code_length)?;
            let mut value: u32 = 0;
            for at in 0..code_length {
                if !is_hex(self.reader.peek_at(at)) {
                    return Err(YamlError::scanner(
                        "while parsing a quoted scalar",
                        start_mark,
                        "did not find expected hexadecimal number",
                        self.reader.mark(),
                    ));
                }
                value = (value << 4) + as_hex(self.reader.peek_at(at));
            }
            if (0xD800..0xE000).contains(&value) || value > 0x0010_FFFF {
                return Err(YamlError::scanner(
                    "while parsing a quoted scalar",
                    start_mark,
                    "found invalid Unicode character escape code",
                    self.reader.mark(),
                ));
            }
            if let Some(ch) = char::from_u32(value) {
                string.push(ch);
            }
            self.reader.skip_n(code_length);
        }
        Ok(())
    }

    fn scan_plain_scalar(&mut self) -> YamlResult<Token> {
        let indent = self.indent + 1;
        let start_mark = self.reader.mark();
        let mut end_mark = start_mark;

        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks = false;
        loop {
            self.reader.cache(4)?;
            if self.reader.next_is_document_indicator(b"---")
                || self.reader.next_is_document_indicator(b"...")
            {
                break;
            }
            if self.reader.peek() == b'#' {
                break;
            }

            while !self.reader.next_is_blankz() {
                if self.flow_level > 0
                    && self.reader.peek() == b':'
                    && matches!(
                        self.reader.peek_at(1),
                        b',' | b'?' | b'[' | b']' | b'{' | b'}'
                    )
                {
                    return Err(YamlError::scanner(
                        "while scanning a plain scalar",
                        start_mark,
                        "found unexpected ':'",
                        self.reader.mark(),
                    ));
                }
                if (self.reader.peek() == b':' && self.reader.blankz_at(1))
                    || (self.flow_level > 0
                        && matches!(self.reader.peek(), b',' | b'[' | b']' | b'{' | b'}'))
                {
                    break;
                }

                if leading_blanks || !whitespaces.is_empty() {
                    if leading_blanks {
                        if leading_break.starts_with('\n') {
                            if trailing_breaks.is_empty() {
                                string.push(' ');
                            } else {
                                string.push_str(&trailing_breaks);
                                trailing_breaks.clear();
                            }
                            leading_break.clear();
                        } else {
                            string.push_str(&leading_break);
                            string.push_str(&trailing_breaks);
                            leading_break.clear();
                            trailing_breaks.clear();
                        }
                        leading_blanks = false;
                    } else {
                        string.push_str(&whitespaces);
                        whitespaces.clear();
                    }
                }

                self.reader.read_char(&mut string);
                end_mark = self.reader.mark();
                self.reader.cache(2)?;
            }

            if !(is_blank(self.reader.peek()) || self.reader.next_is_break()) {
                break;
            }

            self.reader.cache(1)?;
            while is_blank(self.reader.peek()) || self.reader.next_is_break() {
                if is_blank(self.reader.peek()) {
                    // Tabs may not be used for the indentation of a
                    // continuation line.
                    if leading_blanks
                        && (self.reader.mark().col as i32) < indent
                        && self.reader.peek() == b'\t'
                    {
                        return Err(YamlError::scanner(
                            "while scanning a plain scalar",
                            start_mark,
                            "found a tab character that violates indentation",
                            self.reader.mark(),
                        ));
                    }
                    if leading_blanks {
                        self.reader.skip();
                    } else {
                        self.reader.read_char(&mut whitespaces);
                    }
                } else {
                    self.reader.cache(2)?;
                    if leading_blanks {
                        self.reader.read_line_break(&mut trailing_breaks);
                    } else {
                        whitespaces.clear();
                        self.reader.read_line_break(&mut leading_break);
                        leading_blanks = true;
                    }
                }
                self.reader.cache(1)?;
            }

            if self.flow_level == 0 && (self.reader.mark().col as i32) < indent {
                break;
            }
        }

        // A multiline plain scalar ends one line up, which re-enables simple
        // keys.
        if leading_blanks {
            self.simple_key_allowed = true;
        }

        Ok(Token::new(
            TokenType::Scalar {
                value: string,
                style: ScalarStyle::Plain,
            },
            Span::new(start_mark, end_mark),
        ))
    }

    fn stale_simple_keys(&mut self) -> ScanResult {
        let mark = self.reader.mark();
        for key in &mut self.simple_keys {
            // A simple key may not span more than one line or 1024
            // characters.
            if key.possible && (key.mark.line < mark.line || key.mark.index + 1024 < mark.index) {
                if key.required {
                    return Err(YamlError::scanner(
                        "while scanning a simple key",
                        key.mark,
                        "could not find expected ':'",
                        mark,
                    ));
                }
                key.possible = false;
            }
        }
        Ok(())
    }

    fn save_simple_key(&mut self) -> ScanResult {
        let mark = self.reader.mark();
        let required = self.flow_level == 0 && self.indent == mark.col as i32;
        if self.simple_key_allowed {
            let key = SimpleKey {
                possible: true,
                required,
                token_number: self.tokens_parsed + self.tokens.len(),
                mark,
            };
            self.remove_simple_key()?;
            if let Some(last) = self.simple_keys.last_mut() {
                *last = key;
            }
        }
        Ok(())
    }

    fn remove_simple_key(&mut self) -> ScanResult {
        let mark = self.reader.mark();
        if let Some(key) = self.simple_keys.last_mut() {
            if key.possible && key.required {
                return Err(YamlError::scanner(
                    "while scanning a simple key",
                    key.mark,
                    "could not find expected ':'",
                    mark,
                ));
            }
            key.possible = false;
        }
        Ok(())
    }

    fn increase_flow_level(&mut self) {
        self.simple_keys.push(SimpleKey::new(Mark::default()));
        self.flow_level += 1;
    }

    fn decrease_flow_level(&mut self) {
        if self.flow_level > 0 {
            self.flow_level -= 1;
            self.simple_keys.pop();
        }
    }

    /// Enters a block collection if `column` is deeper than the current
    /// indentation. Inserts the collection start token at `number` when the
    /// collection was opened by a simple key seen earlier.
    fn roll_indent(&mut self, column: i32, number: Option<usize>, data: TokenType, mark: Mark) {
        if self.flow_level > 0 {
            return;
        }
        if self.indent < column {
            self.indents.push(self.indent);
            self.indent = column;
            let token = Token::new(data, Span::empty(mark));
            match number {
                Some(n) => self.insert_token(n - self.tokens_parsed, token),
                None => self.tokens.push_back(token),
            }
        }
    }

    /// Closes block collections deeper than `column`, producing a `BlockEnd`
    /// for each.
    fn unroll_indent(&mut self, column: i32) {
        if self.flow_level > 0 {
            return;
        }
        while self.indent > column {
            let mark = self.reader.mark();
            self.tokens
                .push_back(Token::new(TokenType::BlockEnd, Span::empty(mark)));
            self.indent = self.indents.pop().unwrap_or(-1);
        }
    }

    fn insert_token(&mut self, pos: usize, token: Token) {
        self.tokens.insert(pos, token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    fn tokens_of(input: &str) -> Vec<TokenType> {
        let mut scanner = Scanner::new(input.as_bytes());
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token().expect("scan failed");
            let done = token.data.is_stream_end();
            tokens.push(token.data);
            if done {
                break;
            }
        }
        tokens
    }

    fn scan_error(input: &str) -> String {
        let mut scanner = Scanner::new(input.as_bytes());
        loop {
            match scanner.next_token() {
                Ok(token) if token.data.is_stream_end() => panic!("expected a scan error"),
                Ok(_) => {}
                Err(err) => return format!("{err}"),
            }
        }
    }

    #[test]
    fn implicit_block_mapping() {
        assert_eq!(
            tokens_of("a: 1"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::BlockMappingStart,
                TokenType::Key,
                TokenType::Scalar {
                    value: "a".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::Value,
                TokenType::Scalar {
                    value: "1".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::BlockEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn key_token_reuses_the_key_mark() {
        let mut scanner = Scanner::new("a: 1".as_bytes());
        let mut tokens = Vec::new();
        loop {
            let token = scanner.next_token().expect("scan failed");
            let done = token.data.is_stream_end();
            tokens.push(token);
            if done {
                break;
            }
        }
        assert!(matches!(tokens[1].data, TokenType::BlockMappingStart));
        assert_eq!(
            tokens[1].span.start,
            Mark {
                index: 0,
                line: 0,
                col: 0
            }
        );
        assert!(matches!(tokens[2].data, TokenType::Key));
        assert_eq!(
            tokens[2].span.start,
            Mark {
                index: 0,
                line: 0,
                col: 0
            }
        );
        assert_eq!(
            tokens[3].span.end,
            Mark {
                index: 1,
                line: 0,
                col: 1
            }
        );
    }

    #[test]
    fn block_sequence() {
        assert_eq!(
            tokens_of("- a\n- b\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::BlockSequenceStart,
                TokenType::BlockEntry,
                TokenType::Scalar {
                    value: "a".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::BlockEntry,
                TokenType::Scalar {
                    value: "b".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::BlockEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn flow_sequence() {
        assert_eq!(
            tokens_of("[a, b]"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::FlowSequenceStart,
                TokenType::Scalar {
                    value: "a".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::FlowEntry,
                TokenType::Scalar {
                    value: "b".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::FlowSequenceEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn flow_mapping_simple_key() {
        assert_eq!(
            tokens_of("{a: 1}"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::FlowMappingStart,
                TokenType::Key,
                TokenType::Scalar {
                    value: "a".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::Value,
                TokenType::Scalar {
                    value: "1".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::FlowMappingEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn document_indicators() {
        assert_eq!(
            tokens_of("---\na\n...\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::DocumentStart,
                TokenType::Scalar {
                    value: "a".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::DocumentEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn unindented_lines_join_one_plain_scalar() {
        assert_eq!(
            tokens_of("a\nb"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "a b".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn multiline_plain_scalar_folds() {
        assert_eq!(
            tokens_of("a\n b\n\n c"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "a b\nc".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn literal_scalar_clip() {
        assert_eq!(
            tokens_of("|\n  a\n  b\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "a\nb\n".into(),
                    style: ScalarStyle::Literal
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn literal_scalar_strip() {
        assert_eq!(
            tokens_of("|-\n  a\n  b\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "a\nb".into(),
                    style: ScalarStyle::Literal
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn literal_scalar_keep() {
        assert_eq!(
            tokens_of("|+\n  a\n\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "a\n\n".into(),
                    style: ScalarStyle::Literal
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn folded_scalar_joins_lines() {
        assert_eq!(
            tokens_of(">\n a\n b\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "a b\n".into(),
                    style: ScalarStyle::Folded
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn single_quote_doubling() {
        assert_eq!(
            tokens_of("'it''s'"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "it's".into(),
                    style: ScalarStyle::SingleQuoted
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn double_quote_escapes() {
        assert_eq!(
            tokens_of("\"\\u0041\\n\\t\\\\\""),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Scalar {
                    value: "A\n\t\\".into(),
                    style: ScalarStyle::DoubleQuoted
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn yaml_directive() {
        assert_eq!(
            tokens_of("%YAML 1.2\n---\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::VersionDirective { major: 1, minor: 2 },
                TokenType::DocumentStart,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn tag_directive_and_shorthand() {
        assert_eq!(
            tokens_of("%TAG !e! tag:example.com,2000:\n---\n!e!foo x\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::TagDirective {
                    handle: "!e!".into(),
                    prefix: "tag:example.com,2000:".into()
                },
                TokenType::DocumentStart,
                TokenType::Tag {
                    handle: "!e!".into(),
                    suffix: "foo".into()
                },
                TokenType::Scalar {
                    value: "x".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn secondary_tag_shorthand() {
        assert_eq!(
            tokens_of("!!str x"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Tag {
                    handle: "!!".into(),
                    suffix: "str".into()
                },
                TokenType::Scalar {
                    value: "x".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn non_specific_tag() {
        assert_eq!(
            tokens_of("! x"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Tag {
                    handle: "".into(),
                    suffix: "!".into()
                },
                TokenType::Scalar {
                    value: "x".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn tag_with_uri_escape() {
        assert_eq!(
            tokens_of("!e%C3%A9 x"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::Tag {
                    handle: "!".into(),
                    suffix: "e\u{e9}".into()
                },
                TokenType::Scalar {
                    value: "x".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn anchor_and_alias() {
        assert_eq!(
            tokens_of("- &a x\n- *a\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::BlockSequenceStart,
                TokenType::BlockEntry,
                TokenType::Anchor("a".into()),
                TokenType::Scalar {
                    value: "x".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::BlockEntry,
                TokenType::Alias("a".into()),
                TokenType::BlockEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn nested_block_collections_unroll() {
        assert_eq!(
            tokens_of("a:\n  b: c\n"),
            [
                TokenType::StreamStart {
                    encoding: Encoding::Utf8
                },
                TokenType::BlockMappingStart,
                TokenType::Key,
                TokenType::Scalar {
                    value: "a".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::Value,
                TokenType::BlockMappingStart,
                TokenType::Key,
                TokenType::Scalar {
                    value: "b".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::Value,
                TokenType::Scalar {
                    value: "c".into(),
                    style: ScalarStyle::Plain
                },
                TokenType::BlockEnd,
                TokenType::BlockEnd,
                TokenType::StreamEnd,
            ]
        );
    }

    #[test]
    fn tab_cannot_start_a_token() {
        let message = scan_error("\tx: 1");
        assert!(
            message.contains("found character that cannot start any token"),
            "{message}"
        );
    }

    #[test]
    fn value_without_key_after_document_start() {
        let message = scan_error("--- : x");
        assert!(
            message.contains("mapping values are not allowed in this context"),
            "{message}"
        );
    }

    #[test]
    fn required_key_must_stay_on_its_line() {
        let message = scan_error("a: 1\nb\n: 2\n");
        assert!(message.contains("while scanning a simple key"), "{message}");
        assert!(message.contains("could not find expected ':'"), "{message}");
    }

    #[test]
    fn chomping_indicator_zero_is_rejected() {
        let message = scan_error("|0\n  a\n");
        assert!(
            message.contains("found an indentation indicator equal to 0"),
            "{message}"
        );
    }

    #[test]
    fn unclosed_quoted_scalar() {
        let message = scan_error("'abc");
        assert!(message.contains("found unexpected end of stream"), "{message}");
    }

    #[test]
    fn version_component_above_255_is_rejected() {
        let message = scan_error("%YAML 1.300\n---\na\n");
        assert!(
            message.contains("found extremely long version number"),
            "{message}"
        );
    }
}
