use super::scratch;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wt5::collection::persist::resolve_destination;
use wt5::{AttrValue, Attributes, Collection, CollectionOptions, Item};

fn build_local(path: &Path) -> Collection {
    let root = Collection::open_local(path).unwrap();
    let a = root.add_collection("a", None, Attributes::new()).unwrap();
    a.add_data(Some("d"), None, Attributes::new()).unwrap();
    root.set_attr("operator", "ksunden").unwrap();
    root.flush().unwrap();
    root
}

#[test]
fn fork_never_touches_the_original_file() {
    let dir = TempDir::new().unwrap();
    let origin = dir.path().join("origin.wt5");
    drop(build_local(&origin));
    let before = std::fs::read(&origin).unwrap();

    let fork = Collection::open(CollectionOptions {
        filepath: Some(origin.clone()),
        temp_files: Some(scratch()),
        ..Default::default()
    })
    .unwrap();
    assert_ne!(fork.filepath(), origin.as_path());
    assert_eq!(fork.item_names().unwrap(), vec!["a"]);
    fork.add_collection("b", None, Attributes::new()).unwrap();
    fork.set_attr("operator", "someone else").unwrap();
    fork.flush().unwrap();

    assert_eq!(std::fs::read(&origin).unwrap(), before);
}

#[test]
fn edit_local_writes_through_on_flush() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local.wt5");
    drop(build_local(&path));

    let reopened = Collection::open_local(&path).unwrap();
    assert_eq!(reopened.item_names().unwrap(), vec!["a"]);
    assert_eq!(
        reopened.attr("operator").unwrap(),
        Some(AttrValue::from("ksunden"))
    );
    match reopened.get(0).unwrap() {
        Item::Collection(a) => {
            assert_eq!(a.item_names().unwrap(), vec!["d"]);
            assert!(a.get(0).unwrap().is_data());
        }
        other => panic!("expected collection, got {}", other),
    }
}

#[test]
fn save_copies_whole_store_and_reloads() {
    let temps = scratch();
    let dir = TempDir::new().unwrap();
    let root = Collection::create(Arc::clone(&temps)).unwrap();
    let a = root.add_collection("a", None, Attributes::new()).unwrap();
    a.add_data(Some("d1"), None, Attributes::new()).unwrap();
    root.add_data(Some("d2"), Some(0), Attributes::new()).unwrap();

    // saving a child still writes the entire file
    let dest = a.save(Some(&dir.path().join("whole")), false).unwrap();
    assert_eq!(dest, dir.path().join("whole.wt5"));
    assert_eq!(
        std::fs::read(&dest).unwrap(),
        std::fs::read(root.filepath()).unwrap()
    );

    let loaded = wt5::open(&dest, false, Some(temps)).unwrap();
    let loaded = loaded.as_collection().unwrap();
    assert_eq!(loaded.item_names().unwrap(), vec!["d2", "a"]);
    assert_eq!(
        loaded.format_tree(false, 9).unwrap().lines().skip(1).collect::<Vec<_>>(),
        root.format_tree(false, 9).unwrap().lines().skip(1).collect::<Vec<_>>()
    );
}

#[test]
fn save_default_and_relative_destinations() {
    let dir = TempDir::new().unwrap();
    let root = Collection::open(CollectionOptions {
        name: Some("foo".to_string()),
        temp_files: Some(scratch()),
        ..Default::default()
    })
    .unwrap();
    root.add_collection("group1", None, Attributes::new()).unwrap();

    let default_dest = resolve_destination(None, "foo", dir.path(), None);
    let named_dest = resolve_destination(Some(Path::new("bar")), "foo", dir.path(), None);
    assert_eq!(default_dest, dir.path().join("foo.wt5"));
    assert_eq!(named_dest, dir.path().join("bar.wt5"));

    for dest in [default_dest, named_dest] {
        assert_eq!(root.save(Some(&dest), false).unwrap(), dest);
        assert_eq!(
            std::fs::read(&dest).unwrap(),
            std::fs::read(root.filepath()).unwrap()
        );
    }
}

#[test]
fn save_onto_own_backing_file_keeps_it_intact() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("own.wt5");
    let root = Collection::open_local(&path).unwrap();
    root.add_collection("a", None, Attributes::new()).unwrap();
    root.flush().unwrap();
    let before = std::fs::read(&path).unwrap();

    let dest = root.save(Some(&path), false).unwrap();
    assert_eq!(dest, path);
    assert_eq!(std::fs::read(&path).unwrap(), before);

    // unflushed changes are written by the save itself
    root.add_data(Some("d"), None, Attributes::new()).unwrap();
    root.save(Some(&path), false).unwrap();
    drop(root);
    let reopened = Collection::open_local(&path).unwrap();
    assert_eq!(reopened.item_names().unwrap(), vec!["a", "d"]);
}
