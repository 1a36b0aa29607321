pub mod consts;

use std::fmt::Write;

use taro_common::EventData;
use taro_core::{Input, Parser};

/// Renders the event stream of `input` in the test notation, one event
/// per line. An error cuts the stream short with a final `ERR` line.
pub fn events_of_str(input: &str) -> String {
    let mut out = String::new();
    write_events(&mut out, Parser::new(input.as_bytes()), false);
    out
}

/// Asserts that parsing `input` produces exactly `events`.
///
/// # Panics
///
/// Panics when the generated event string differs, naming the input.
pub fn assert_eq_event(input: &str, events: &str) {
    let actual = events_of_str(input);
    assert_eq!(actual, events, "error in case: {input}");
}

pub fn write_events<I: Input>(out: &mut String, parser: Parser<I>, stream_tokens: bool) {
    for event in parser {
        let event = match event {
            Ok(event) => event,
            Err(_) => {
                out.push_str("\nERR");
                break;
            }
        };
        let _ = match event.data {
            EventData::StreamStart { .. } => {
                if stream_tokens {
                    out.push_str("+STR");
                }
                Ok(())
            }
            EventData::StreamEnd => {
                if stream_tokens {
                    out.push_str("\n-STR");
                }
                Ok(())
            }
            EventData::DocumentStart { .. } => write!(out, "\n+DOC"),
            EventData::DocumentEnd { .. } => write!(out, "\n-DOC"),
            EventData::Alias { anchor } => write!(out, "\n=ALI *{anchor}"),
            EventData::Scalar {
                anchor,
                tag,
                value,
                style,
                ..
            } => {
                out.push_str("\n=VAL");
                push_anchor(out, anchor);
                push_tag(out, tag);
                write!(out, " {style}{}", escape_value(&value))
            }
            EventData::SequenceStart { anchor, tag, .. } => {
                out.push_str("\n+SEQ");
                push_anchor(out, anchor);
                push_tag(out, tag);
                Ok(())
            }
            EventData::SequenceEnd => write!(out, "\n-SEQ"),
            EventData::MappingStart { anchor, tag, .. } => {
                out.push_str("\n+MAP");
                push_anchor(out, anchor);
                push_tag(out, tag);
                Ok(())
            }
            EventData::MappingEnd => write!(out, "\n-MAP"),
        };
    }
    if stream_tokens {
        out.push('\n');
    }
}

fn push_anchor(out: &mut String, anchor: Option<String>) {
    if let Some(anchor) = anchor {
        let _ = write!(out, " &{anchor}");
    }
}

fn push_tag(out: &mut String, tag: Option<String>) {
    if let Some(tag) = tag {
        let _ = write!(out, " <{tag}>");
    }
}

/// Line breaks and tabs inside scalar values appear escaped, so every
/// event stays on one line.
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_escapes() {
        assert_eq!(escape_value("a\nb\tc\\d"), "a\\nb\\tc\\\\d");
    }

    #[test]
    fn stream_tokens_bracket_the_output() {
        let mut out = String::new();
        write_events(&mut out, Parser::new("a\n".as_bytes()), true);
        assert_eq!(out, "+STR\n+DOC\n=VAL :a\n-DOC\n-STR\n");
    }
}
