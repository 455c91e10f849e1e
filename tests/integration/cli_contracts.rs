use super::scratch;
use std::path::Path;
use tempfile::TempDir;
use wt5::config::Wt5Config;
use wt5::tooling::cli::{CliContext, Commands, OutputFormat};
use wt5::{Attributes, Collection};

fn sample_file(dir: &Path) -> std::path::PathBuf {
    let root = Collection::create(scratch()).unwrap();
    let a = root.add_collection("a", None, Attributes::new()).unwrap();
    let b = a.add_collection("b", None, Attributes::new()).unwrap();
    b.add_data(Some("deep"), None, Attributes::new()).unwrap();
    root.add_data(Some("d"), None, Attributes::new()).unwrap();
    root.save(Some(&dir.join("sample.wt5")), false).unwrap()
}

fn tree(path: &Path, internal_path: &str, depth: Option<usize>, format: OutputFormat) -> Commands {
    Commands::Tree {
        path: path.to_path_buf(),
        internal_path: internal_path.to_string(),
        verbose: false,
        depth,
        format,
    }
}

#[test]
fn tree_text_prints_every_level_by_default() {
    let dir = TempDir::new().unwrap();
    let file = sample_file(dir.path());
    let context = CliContext::with_config(Wt5Config::default());
    let out = context.execute(&tree(&file, "/", None, OutputFormat::Text)).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("collection ("));
    assert!(out.contains("0: a (Collection)"));
    assert!(out.contains("0: deep (Data)"));
    assert!(out.contains("1: d (Data)"));
}

#[test]
fn tree_depth_limits_output() {
    let dir = TempDir::new().unwrap();
    let file = sample_file(dir.path());
    let context = CliContext::with_config(Wt5Config::default());
    let out = context.execute(&tree(&file, "/", Some(1), OutputFormat::Text)).unwrap();
    assert!(!out.contains("b (Collection)"));
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn tree_internal_path_and_data_target() {
    let dir = TempDir::new().unwrap();
    let file = sample_file(dir.path());
    let context = CliContext::with_config(Wt5Config::default());
    let out = context.execute(&tree(&file, "a/b", None, OutputFormat::Text)).unwrap();
    assert!(out.starts_with("b ("));
    assert!(out.contains("0: deep (Data)"));

    // depth is ignored for data objects
    let out = context.execute(&tree(&file, "/a/b/deep", Some(0), OutputFormat::Text)).unwrap();
    assert!(out.starts_with("deep ("));
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn tree_json_contract_has_required_fields() {
    let dir = TempDir::new().unwrap();
    let file = sample_file(dir.path());
    let context = CliContext::with_config(Wt5Config::default());
    let out = context.execute(&tree(&file, "/", None, OutputFormat::Json)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["class"], "Collection");
    assert_eq!(parsed["path"], "/");
    assert_eq!(parsed["children"][0]["name"], "a");
    assert_eq!(parsed["children"][0]["children"][0]["children"][0]["path"], "/a/b/deep");
}

#[test]
fn tree_leaves_the_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let file = sample_file(dir.path());
    let before = std::fs::read(&file).unwrap();
    let context = CliContext::with_config(Wt5Config::default());
    context.execute(&tree(&file, "/", None, OutputFormat::Text)).unwrap();
    assert_eq!(std::fs::read(&file).unwrap(), before);
}

#[test]
fn tree_errors_on_missing_targets() {
    let dir = TempDir::new().unwrap();
    let file = sample_file(dir.path());
    let context = CliContext::with_config(Wt5Config::default());
    assert!(context.execute(&tree(&file, "/nope", None, OutputFormat::Text)).is_err());
    assert!(context
        .execute(&tree(&dir.path().join("missing.wt5"), "/", None, OutputFormat::Text))
        .is_err());
}

#[test]
fn convert_prints_one_line_per_value() {
    let context = CliContext::with_config(Wt5Config::default());
    let out = context
        .execute(&Commands::Convert {
            args: vec!["1".into(), "2".into(), "THz".into(), "GHz".into()],
        })
        .unwrap();
    let values: Vec<f64> = out.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(values.len(), 2);
    assert!((values[0] - 1000.0).abs() < 1e-9);
    assert!((values[1] - 2000.0).abs() < 1e-9);
}
