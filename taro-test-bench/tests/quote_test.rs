use taro_test_bench::assert_eq_event;
use taro_test_bench::consts::*;

#[test]
fn single_quoted() {
    assert_eq_event(SQUOTE_INPUT, SQUOTE_EVENTS);
    assert_eq_event(SQUOTE_ESCAPED_INPUT, SQUOTE_ESCAPED_EVENTS);
    assert_eq_event(SQUOTE_KEY_INPUT, SQUOTE_KEY_EVENTS);
}

#[test]
fn double_quoted_escapes() {
    assert_eq_event(DQUOTE_ESCAPES_INPUT, DQUOTE_ESCAPES_EVENTS);
    assert_eq_event(DQUOTE_UNICODE_INPUT, DQUOTE_UNICODE_EVENTS);
}

#[test]
fn double_quoted_folds_line_breaks() {
    assert_eq_event(DQUOTE_FOLD_INPUT, DQUOTE_FOLD_EVENTS);
}

#[test]
fn quote_errors() {
    assert_eq_event(BAD_ESCAPE_ERR_INPUT, BAD_ESCAPE_ERR_EVENTS);
}
