use super::scratch;
use std::sync::Arc;
use tempfile::TempDir;
use wt5::{
    ApiError, Attributes, ClassRegistry, Collection, CollectionOptions, Item, COLLECTION_CLASS,
};

/// Local root collection with one child group whose class tag is `class`
fn with_tagged_child(path: &std::path::Path, class: Option<&str>) -> Collection {
    let root = Collection::open_local(path).unwrap();
    let child = root.add_collection("child", None, Attributes::new()).unwrap();
    match class {
        Some(class) => child.group().set_attr("class", class).unwrap(),
        None => {
            child.group().remove_attr("class").unwrap();
        }
    }
    root.flush().unwrap();
    root
}

#[test]
fn untagged_child_is_a_plain_group() {
    let dir = TempDir::new().unwrap();
    let root = with_tagged_child(&dir.path().join("g.wt5"), None);
    let item = root.get(0).unwrap();
    assert!(matches!(item, Item::Group(_)));
    assert_eq!(item.class_name(), "Group");
    assert_eq!(item.natural_name().unwrap(), "child");
}

#[test]
fn empty_tag_is_a_plain_group() {
    let dir = TempDir::new().unwrap();
    let root = with_tagged_child(&dir.path().join("e.wt5"), Some(""));
    assert!(matches!(root.get_by_name("child").unwrap(), Item::Group(_)));
}

#[test]
fn unknown_tag_fails_lookup_and_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("u.wt5");
    let root = with_tagged_child(&path, Some("Spectrum"));
    match root.get(0) {
        Err(ApiError::UnknownEntityClass { path, class }) => {
            assert_eq!(path, "/child");
            assert_eq!(class, "Spectrum");
        }
        other => panic!("expected UnknownEntityClass, got {:?}", other),
    }
    drop(root);
    assert!(matches!(
        Collection::open_local(&path),
        Err(ApiError::UnknownEntityClass { .. })
    ));
}

fn open_as_group(parent: &Collection, name: &str) -> Result<Item, ApiError> {
    Ok(Item::Group(parent.group().child(name)?))
}

#[test]
fn custom_registry_resolves_extra_classes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("r.wt5");
    drop(with_tagged_child(&path, Some("Spectrum")));

    let mut registry = ClassRegistry::standard();
    registry.register("Spectrum", open_as_group);
    assert_eq!(registry.classes(), vec![COLLECTION_CLASS, "Data", "Spectrum"]);

    let root = Collection::open(CollectionOptions {
        filepath: Some(path),
        edit_local: true,
        classes: Some(Arc::new(registry)),
        temp_files: Some(scratch()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(root.get(0).unwrap().path(), "/child");
}

#[test]
fn children_resolve_to_their_own_types() {
    let root = Collection::create(scratch()).unwrap();
    root.add_collection("c", None, Attributes::new()).unwrap();
    root.add_data(Some("d"), None, Attributes::new()).unwrap();
    let items = root.items().unwrap();
    assert!(items[0].as_collection().is_some());
    assert!(items[1].as_data().is_some());
    assert_eq!(items[1].class_name(), "Data");
    assert!(items[1].to_string().starts_with("<Data 'd' at "));
    assert_eq!(root.get(1).unwrap(), root.get_by_name("d").unwrap());
}
