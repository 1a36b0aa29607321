use taro_rs::{dump_all, load_all, Document, Dumper, Emitter, NodeData};

fn dump_canonical(documents: &[Document]) -> String {
    let mut emitter = Emitter::new(Vec::new());
    emitter.set_canonical(true);
    let mut dumper = Dumper::new(emitter);
    for document in documents {
        dumper.dump(document).unwrap();
    }
    dumper.close().unwrap();
    String::from_utf8(dumper.into_inner().into_inner()).unwrap()
}

/// Node topology and scalar content, ignoring styles and spans.
fn shape(document: &Document, id: usize, out: &mut String) {
    match &document.get_node(id).unwrap().data {
        NodeData::Scalar { value, .. } => {
            out.push('(');
            out.push_str(value);
            out.push(')');
        }
        NodeData::Sequence { items, .. } => {
            out.push('[');
            for &item in items {
                shape(document, item, out);
            }
            out.push(']');
        }
        NodeData::Mapping { pairs, .. } => {
            out.push('{');
            for pair in pairs {
                shape(document, pair.key, out);
                out.push(':');
                shape(document, pair.value, out);
            }
            out.push('}');
        }
    }
}

fn shapes(documents: &[Document]) -> Vec<String> {
    documents
        .iter()
        .map(|document| {
            let mut out = String::new();
            shape(document, 1, &mut out);
            out
        })
        .collect()
}

#[test]
fn round_trip_preserves_topology_and_content() {
    let input = "a: x\nb:\n- 'y y'\n- [p, q]\nc: &s shared\nd: *s\n";
    let documents = load_all(input.as_bytes()).unwrap();
    let reloaded = load_all(dump_all(&documents).unwrap().as_bytes()).unwrap();
    assert_eq!(shapes(&documents), shapes(&reloaded));
    for (before, after) in documents.iter().zip(&reloaded) {
        for (node, renode) in before.nodes.iter().zip(&after.nodes) {
            assert_eq!(node.tag, renode.tag);
        }
    }
}

#[test]
fn canonical_dump_is_idempotent() {
    let documents = load_all("a: x\nb: [y, z]\n".as_bytes()).unwrap();
    let first = dump_canonical(&documents);
    let second = dump_canonical(&documents);
    assert_eq!(first, second);

    let reloaded = load_all(first.as_bytes()).unwrap();
    assert_eq!(shapes(&documents), shapes(&reloaded));
    assert_eq!(dump_canonical(&reloaded), first);
}

#[test]
fn ambiguous_plain_strings_come_out_quoted() {
    let mut document = Document::new(None, Vec::new(), true, true);
    document.add_scalar(None, "null", taro_rs::ScalarStyle::Plain);
    let output = dump_all(core::slice::from_ref(&document)).unwrap();
    assert_eq!(output, "'null'\n");
}

#[test]
fn shared_nodes_round_trip_through_synthetic_anchors() {
    let documents = load_all("- &x foo\n- *x\n".as_bytes()).unwrap();
    let output = dump_all(&documents).unwrap();
    assert_eq!(output, "- &id001 foo\n- *id001\n");
    let reloaded = load_all(output.as_bytes()).unwrap();
    match &reloaded[0].get_root_node().unwrap().data {
        NodeData::Sequence { items, .. } => assert_eq!(items[0], items[1]),
        _ => panic!("expected a sequence root"),
    }
}
