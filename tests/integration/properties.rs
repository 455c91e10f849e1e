use super::scratch;
use proptest::prelude::*;
use tempfile::TempDir;
use wt5::{Attributes, Collection};

#[derive(Debug, Clone)]
enum Op {
    Collection(Option<usize>),
    Data(Option<usize>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0usize..6).prop_map(Op::Collection),
        proptest::option::of(0usize..6).prop_map(Op::Data),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Valid inserts grow the index by one and land at the requested slot;
    /// invalid ones change nothing.
    #[test]
    fn index_tracks_inserts(ops in proptest::collection::vec(op(), 1..12)) {
        let root = Collection::create(scratch()).unwrap();
        let mut model: Vec<String> = Vec::new();
        for (i, op) in ops.iter().enumerate() {
            let name = format!("item{}", i);
            let (result, position) = match op {
                Op::Collection(p) => (root.add_collection(name.as_str(), *p, Attributes::new()).map(|_| ()), *p),
                Op::Data(p) => (root.add_data(Some(&name), *p, Attributes::new()).map(|_| ()), *p),
            };
            match position {
                Some(p) if p > model.len() => prop_assert!(result.is_err()),
                Some(p) => {
                    prop_assert!(result.is_ok());
                    model.insert(p, name);
                }
                None => {
                    prop_assert!(result.is_ok());
                    model.push(name);
                }
            }
            prop_assert_eq!(root.len().unwrap(), model.len());
        }
        prop_assert_eq!(root.item_names().unwrap(), model);
    }

    /// Whatever was built survives a save and reload unchanged.
    #[test]
    fn reload_preserves_order(names in proptest::collection::btree_set("[a-z]{1,8}", 1..8)) {
        let dir = TempDir::new().unwrap();
        let root = Collection::create(scratch()).unwrap();
        for (i, name) in names.iter().enumerate() {
            if i % 2 == 0 {
                root.add_collection(name.as_str(), Some(0), Attributes::new()).unwrap();
            } else {
                root.add_data(Some(name), Some(0), Attributes::new()).unwrap();
            }
        }
        let saved = root.save(Some(&dir.path().join("p.wt5")), false).unwrap();
        let reloaded = Collection::open_local(&saved).unwrap();
        prop_assert_eq!(reloaded.item_names().unwrap(), root.item_names().unwrap());
        for (a, b) in reloaded.items().unwrap().iter().zip(root.items().unwrap().iter()) {
            prop_assert_eq!(a.class_name(), b.class_name());
        }
    }
}
