use super::scratch;
use std::sync::Arc;
use wt5::{ApiError, AttrValue, Attributes, Collection, CollectionOptions, Item};

#[test]
fn new_collection_has_defaults() {
    let root = Collection::create(scratch()).unwrap();
    assert_eq!(root.natural_name().unwrap(), "collection");
    assert_eq!(root.path(), "/");
    assert!(root.is_empty().unwrap());
    assert_eq!(root.attr("class").unwrap(), Some(AttrValue::from("Collection")));
    assert!(root.attr("created").unwrap().is_some());
    assert!(!root.version().unwrap().is_empty());
}

#[test]
fn add_children_in_order_and_at_positions() {
    let root = Collection::create(scratch()).unwrap();
    root.add_collection("b", None, Attributes::new()).unwrap();
    root.add_data(Some("c"), None, Attributes::new()).unwrap();
    root.add_collection("a", Some(0), Attributes::new()).unwrap();
    root.add_data(Some("mid"), Some(2), Attributes::new()).unwrap();
    assert_eq!(root.item_names().unwrap(), vec!["a", "b", "mid", "c"]);
    assert_eq!(root.len().unwrap(), 4);

    assert!(root.get(0).unwrap().is_collection());
    assert!(root.get(2).unwrap().is_data());
    assert_eq!(root.get_by_name("c").unwrap().path(), "/c");
    assert!(matches!(
        root.get(4),
        Err(ApiError::IndexOutOfRange { index: 4, len: 4 })
    ));
}

#[test]
fn out_of_range_and_duplicate_inserts_leave_index_untouched() {
    let root = Collection::create(scratch()).unwrap();
    root.add_collection("a", None, Attributes::new()).unwrap();
    assert!(matches!(
        root.add_collection("x", Some(5), Attributes::new()),
        Err(ApiError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        root.add_data(Some("a"), None, Attributes::new()),
        Err(ApiError::DuplicateName { .. })
    ));
    assert_eq!(root.item_names().unwrap(), vec!["a"]);
    assert!(!root.group().contains("x").unwrap());
}

#[test]
fn nested_collections_share_one_file() {
    let root = Collection::create(scratch()).unwrap();
    let a = root.add_collection("a", None, Attributes::new()).unwrap();
    let b = a.add_collection("b", None, Attributes::new()).unwrap();
    let d = b.add_data(None, None, Attributes::new()).unwrap();
    assert_eq!(d.path(), "/a/b/data");
    assert_eq!(d.filepath(), root.filepath());
    assert_eq!(b.fullpath(), format!("{}::/a/b", root.filepath().display()));

    match root.get_path("a/b/data").unwrap() {
        Item::Data(found) => assert_eq!(found, d),
        other => panic!("expected data, got {}", other),
    }
}

#[test]
fn copying_a_collection_from_another_file() {
    let temps = scratch();
    let source = Collection::create(Arc::clone(&temps)).unwrap();
    let src_child = source.add_collection("spectra", None, Attributes::new()).unwrap();
    src_child.add_data(Some("d0"), None, Attributes::new()).unwrap();

    let target = Collection::create(temps).unwrap();
    let copied = target.add_collection(&src_child, None, Attributes::new()).unwrap();
    assert_eq!(copied.filepath(), target.filepath());
    assert_eq!(copied.path(), "/spectra");
    assert_eq!(copied.item_names().unwrap(), vec!["d0"]);
    assert!(copied.get(0).unwrap().is_data());

    copied.add_data(Some("d1"), None, Attributes::new()).unwrap();
    assert_eq!(src_child.item_names().unwrap(), vec!["d0"]);
}

#[test]
fn constructor_attributes_and_reserved_keys() {
    let mut attrs = Attributes::new();
    attrs.insert("sample".to_string(), AttrValue::from("MoS2"));
    let root = Collection::open(CollectionOptions {
        name: Some("run".to_string()),
        attrs,
        temp_files: Some(scratch()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(root.natural_name().unwrap(), "run");
    assert_eq!(root.attr("sample").unwrap(), Some(AttrValue::from("MoS2")));

    assert!(matches!(
        root.set_attr("item_names", vec!["x".to_string()]),
        Err(ApiError::InvalidArgument(_))
    ));
    let mut bad = Attributes::new();
    bad.insert("class".to_string(), AttrValue::from("Data"));
    assert!(matches!(
        root.add_collection("c", None, bad),
        Err(ApiError::InvalidArgument(_))
    ));
}

#[test]
fn display_lists_children() {
    let root = Collection::create(scratch()).unwrap();
    root.add_collection("a", None, Attributes::new()).unwrap();
    root.add_data(Some("b"), None, Attributes::new()).unwrap();
    let shown = root.to_string();
    assert!(shown.starts_with("<Collection 'collection' [a, b] at "));
    assert!(shown.ends_with("::/>"));
}

#[test]
fn existing_unindexed_groups_are_never_adopted_or_replaced() {
    let temps = scratch();
    let root = Collection::create(Arc::clone(&temps)).unwrap();
    let (raw, _) = root.group().require_group("raw").unwrap();
    raw.set_attr("payload", 42i64).unwrap();
    let (tagged, _) = root.group().require_group("spectrum").unwrap();
    tagged.set_attr("class", "Data").unwrap();

    assert!(matches!(
        root.add_collection("raw", None, Attributes::new()),
        Err(ApiError::DuplicateName { .. })
    ));
    assert!(matches!(
        root.add_data(Some("raw"), None, Attributes::new()),
        Err(ApiError::DuplicateName { .. })
    ));
    assert!(matches!(
        root.add_collection("spectrum", None, Attributes::new()),
        Err(ApiError::DuplicateName { .. })
    ));

    let other = Collection::create(temps).unwrap();
    let source = other.add_collection("raw", None, Attributes::new()).unwrap();
    assert!(matches!(
        root.add_collection(&source, None, Attributes::new()),
        Err(ApiError::DuplicateName { .. })
    ));

    assert!(root.item_names().unwrap().is_empty());
    assert_eq!(raw.attr_keys().unwrap(), vec!["payload".to_string()]);
    assert_eq!(tagged.get_attr("class").unwrap(), Some(AttrValue::from("Data")));
}
