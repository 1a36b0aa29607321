use taro_rs::{load_all, load_first, NodeData};

#[test]
fn mapping_keeps_insertion_order() {
    let documents = load_all("a: 1\nb: 2\n".as_bytes()).unwrap();
    let document = &documents[0];
    let pairs = match &document.get_root_node().unwrap().data {
        NodeData::Mapping { pairs, .. } => pairs.clone(),
        _ => panic!("expected a mapping root"),
    };
    let keys: Vec<&str> = pairs
        .iter()
        .map(|pair| match &document.get_node(pair.key).unwrap().data {
            NodeData::Scalar { value, .. } => value.as_str(),
            _ => panic!("expected scalar keys"),
        })
        .collect();
    assert_eq!(keys, ["a", "b"]);
}

#[test]
fn sequence_of_three() {
    let documents = load_all("- 1\n- 2\n- 3\n".as_bytes()).unwrap();
    match &documents[0].get_root_node().unwrap().data {
        NodeData::Sequence { items, .. } => assert_eq!(items.len(), 3),
        _ => panic!("expected a sequence root"),
    }
}

#[test]
fn alias_resolves_to_the_anchored_node() {
    let documents = load_all("- &x foo\n- *x\n".as_bytes()).unwrap();
    match &documents[0].get_root_node().unwrap().data {
        NodeData::Sequence { items, .. } => assert_eq!(items[0], items[1]),
        _ => panic!("expected a sequence root"),
    }
}

#[test]
fn anchors_reset_between_documents() {
    let err = load_all("&x a\n---\n*x\n".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("found undefined alias"), "{err}");
}

#[test]
fn load_first_leaves_the_rest() {
    let document = load_first("a\n---\nb\n".as_bytes()).unwrap().unwrap();
    match &document.get_root_node().unwrap().data {
        NodeData::Scalar { value, .. } => assert_eq!(value, "a"),
        _ => panic!("expected the scalar root"),
    }
}

#[test]
fn node_ids_stay_in_range() {
    let documents = load_all("a:\n- [x, {y: z}]\n".as_bytes()).unwrap();
    let document = &documents[0];
    for node in &document.nodes {
        match &node.data {
            NodeData::Scalar { .. } => {}
            NodeData::Sequence { items, .. } => {
                for &item in items {
                    assert!(document.get_node(item).is_some());
                }
            }
            NodeData::Mapping { pairs, .. } => {
                for pair in pairs {
                    assert!(document.get_node(pair.key).is_some());
                    assert!(document.get_node(pair.value).is_some());
                }
            }
        }
    }
}
