//! Shared test cases, one `*_INPUT`/`*_EVENTS` pair per case.

pub const MAP2_INPUT: &str = "a: 1\nb: 2\n";
pub const MAP2_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
=VAL :1
=VAL :b
=VAL :2
-MAP
-DOC";

pub const SEQ3_INPUT: &str = "- 1\n- 2\n- 3\n";
pub const SEQ3_EVENTS: &str = r"
+DOC
+SEQ
=VAL :1
=VAL :2
=VAL :3
-SEQ
-DOC";

pub const NESTED_MAP_INPUT: &str = "a:\n  b: c\n";
pub const NESTED_MAP_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
+MAP
=VAL :b
=VAL :c
-MAP
-MAP
-DOC";

pub const INDENTLESS_SEQ_INPUT: &str = "a:\n- x\n- y\n";
pub const INDENTLESS_SEQ_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
+SEQ
=VAL :x
=VAL :y
-SEQ
-MAP
-DOC";

pub const SEQ_IN_SEQ_INPUT: &str = "- - a\n  - b\n";
pub const SEQ_IN_SEQ_EVENTS: &str = r"
+DOC
+SEQ
+SEQ
=VAL :a
=VAL :b
-SEQ
-SEQ
-DOC";

pub const ANCHOR_ALIAS_INPUT: &str = "- &x foo\n- *x\n";
pub const ANCHOR_ALIAS_EVENTS: &str = r"
+DOC
+SEQ
=VAL &x :foo
=ALI *x
-SEQ
-DOC";

pub const MULTILINE_PLAIN_INPUT: &str = "k: a\n  b\n";
pub const MULTILINE_PLAIN_EVENTS: &str = r"
+DOC
+MAP
=VAL :k
=VAL :a b
-MAP
-DOC";

pub const LITERAL_INPUT: &str = "--- |\n  text\n";
pub const LITERAL_EVENTS: &str = r"
+DOC
=VAL |text\n
-DOC";

pub const FOLDED_INPUT: &str = "--- >\n  folded\n  line\n";
pub const FOLDED_EVENTS: &str = r"
+DOC
=VAL >folded line\n
-DOC";

pub const LITERAL_STRIP_INPUT: &str = "--- |-\n  a\n";
pub const LITERAL_STRIP_EVENTS: &str = r"
+DOC
=VAL |a
-DOC";

pub const LITERAL_KEEP_INPUT: &str = "--- |+\n  a\n\n";
pub const LITERAL_KEEP_EVENTS: &str = r"
+DOC
=VAL |a\n\n
-DOC";

pub const DEDENT_ERR_INPUT: &str = "  - x\n - y\n";
pub const DEDENT_ERR_EVENTS: &str = r"
+DOC
+SEQ
=VAL :x
-SEQ
-DOC
ERR";

pub const TAB_ERR_INPUT: &str = "\t- x\n";
pub const TAB_ERR_EVENTS: &str = "\nERR";

pub const TAB_IN_MAP_ERR_INPUT: &str = "a:\n\t- b\n";
pub const TAB_IN_MAP_ERR_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
ERR";

pub const FLOW_SEQ_INPUT: &str = "[a, b]\n";
pub const FLOW_SEQ_EVENTS: &str = r"
+DOC
+SEQ
=VAL :a
=VAL :b
-SEQ
-DOC";

pub const FLOW_MAP_INPUT: &str = "{x: 1}\n";
pub const FLOW_MAP_EVENTS: &str = r"
+DOC
+MAP
=VAL :x
=VAL :1
-MAP
-DOC";

pub const FLOW_NESTED_INPUT: &str = "[a, [b, c]]\n";
pub const FLOW_NESTED_EVENTS: &str = r"
+DOC
+SEQ
=VAL :a
+SEQ
=VAL :b
=VAL :c
-SEQ
-SEQ
-DOC";

pub const FLOW_PAIR_INPUT: &str = "[x: y]\n";
pub const FLOW_PAIR_EVENTS: &str = r"
+DOC
+SEQ
+MAP
=VAL :x
=VAL :y
-MAP
-SEQ
-DOC";

pub const FLOW_EMPTY_VALUE_INPUT: &str = "{a: , b: c}\n";
pub const FLOW_EMPTY_VALUE_EVENTS: &str = r"
+DOC
+MAP
=VAL :a
=VAL :
=VAL :b
=VAL :c
-MAP
-DOC";

pub const FLOW_UNCLOSED_INPUT: &str = "[a, b\n";
pub const FLOW_UNCLOSED_EVENTS: &str = r"
+DOC
+SEQ
=VAL :a
=VAL :b
ERR";

pub const SQUOTE_INPUT: &str = "'a b'\n";
pub const SQUOTE_EVENTS: &str = r"
+DOC
=VAL 'a b
-DOC";

pub const SQUOTE_ESCAPED_INPUT: &str = "'it''s'\n";
pub const SQUOTE_ESCAPED_EVENTS: &str = r"
+DOC
=VAL 'it's
-DOC";

pub const DQUOTE_ESCAPES_INPUT: &str = "\"a\\tb\\nc\"\n";
pub const DQUOTE_ESCAPES_EVENTS: &str = r#"
+DOC
=VAL "a\tb\nc
-DOC"#;

pub const DQUOTE_UNICODE_INPUT: &str = "\"\\u0041\\x42\"\n";
pub const DQUOTE_UNICODE_EVENTS: &str = r#"
+DOC
=VAL "AB
-DOC"#;

pub const DQUOTE_FOLD_INPUT: &str = "\"a\n  b\"\n";
pub const DQUOTE_FOLD_EVENTS: &str = r#"
+DOC
=VAL "a b
-DOC"#;

pub const SQUOTE_KEY_INPUT: &str = "'k': v\n";
pub const SQUOTE_KEY_EVENTS: &str = r"
+DOC
+MAP
=VAL 'k
=VAL :v
-MAP
-DOC";

pub const BAD_ESCAPE_ERR_INPUT: &str = "\"\\q\"\n";
pub const BAD_ESCAPE_ERR_EVENTS: &str = "\nERR";

pub const TWO_DOCS_INPUT: &str = "---\na\n---\nb\n";
pub const TWO_DOCS_EVENTS: &str = r"
+DOC
=VAL :a
-DOC
+DOC
=VAL :b
-DOC";

pub const DOC_END_INPUT: &str = "a\n...\n";
pub const DOC_END_EVENTS: &str = r"
+DOC
=VAL :a
-DOC";

pub const YAML_DIRECTIVE_INPUT: &str = "%YAML 1.2\n---\na\n";
pub const YAML_DIRECTIVE_EVENTS: &str = r"
+DOC
=VAL :a
-DOC";

pub const DUP_YAML_DIRECTIVE_ERR_INPUT: &str = "%YAML 1.1\n%YAML 1.1\n---\na\n";
pub const DUP_YAML_DIRECTIVE_ERR_EVENTS: &str = "\nERR";

pub const TAG_DIRECTIVE_INPUT: &str = "%TAG !e! tag:example.com,2000:app/\n---\n!e!foo bar\n";
pub const TAG_DIRECTIVE_EVENTS: &str = r"
+DOC
=VAL <tag:example.com,2000:app/foo> :bar
-DOC";

pub const TAG_SHORTHAND_INPUT: &str = "!!int 3\n";
pub const TAG_SHORTHAND_EVENTS: &str = r"
+DOC
=VAL <tag:yaml.org,2002:int> :3
-DOC";

pub const VERBATIM_TAG_INPUT: &str = "!<tag:example.org,2002:x> a\n";
pub const VERBATIM_TAG_EVENTS: &str = r"
+DOC
=VAL <tag:example.org,2002:x> :a
-DOC";

pub const ANCHOR_THEN_TAG_INPUT: &str = "&a !!str x\n";
pub const TAG_THEN_ANCHOR_INPUT: &str = "!!str &a x\n";
pub const ANCHOR_TAG_EVENTS: &str = r"
+DOC
=VAL &a <tag:yaml.org,2002:str> :x
-DOC";

pub const UNDEF_HANDLE_ERR_INPUT: &str = "!e!x y\n";
pub const UNDEF_HANDLE_ERR_EVENTS: &str = r"
+DOC
ERR";
