use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tfinv::{Aggregator, InventoryError, StateSource};

/// In-memory directory tree: directories with state return it, others fail
/// the pull and expose their children.
#[derive(Default)]
struct FakeSource {
    states: HashMap<PathBuf, Vec<u8>>,
    children: HashMap<PathBuf, Vec<PathBuf>>,
    unreadable: Vec<PathBuf>,
    pulls: RefCell<Vec<PathBuf>>,
}

impl FakeSource {
    fn with_state(mut self, dir: &str, json: &str) -> Self {
        self.states.insert(PathBuf::from(dir), json.as_bytes().to_vec());
        self
    }

    fn with_children(mut self, dir: &str, children: &[&str]) -> Self {
        self.children.insert(
            PathBuf::from(dir),
            children.iter().map(PathBuf::from).collect(),
        );
        self
    }

    fn with_unreadable(mut self, dir: &str) -> Self {
        self.unreadable.push(PathBuf::from(dir));
        self
    }
}

impl StateSource for FakeSource {
    fn pull(&self, dir: &Path) -> Result<Vec<u8>, InventoryError> {
        self.pulls.borrow_mut().push(dir.to_path_buf());
        self.states
            .get(dir)
            .cloned()
            .ok_or_else(|| InventoryError::StateSource {
                dir: dir.to_path_buf(),
                message: "not a state root".to_string(),
            })
    }

    fn subdirectories(&self, dir: &Path) -> Result<Vec<PathBuf>, InventoryError> {
        if self.unreadable.iter().any(|d| d == dir) {
            return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into());
        }
        Ok(self.children.get(dir).cloned().unwrap_or_default())
    }
}

fn module(key: &str, ip: &str) -> String {
    format!(
        r#"{{"modules": [{{"resources": {{"{key}": {{"primary": {{"attributes": {{"public_ip": "{ip}"}}}}}}}}}}]}}"#
    )
}

#[test]
fn test_root_state_is_returned_without_recursion() {
    let source = FakeSource::default()
        .with_state("/infra", &module("aws_instance.a", "1.1.1.1"))
        .with_children("/infra", &["/infra/app"]);
    let aggregator = Aggregator::new(source);

    let doc = aggregator.resolve(Path::new("/infra"));

    assert_eq!(doc.modules.len(), 1);
    assert_eq!(*aggregator.source().pulls.borrow(), vec![PathBuf::from("/infra")]);
}

#[test]
fn test_failed_pull_merges_subdirectories() {
    let source = FakeSource::default()
        .with_children("/infra", &["/infra/app", "/infra/db", "/infra/empty"])
        .with_state("/infra/app", &module("aws_instance.app", "10.0.0.1"))
        .with_children("/infra/db", &["/infra/db/primary"])
        .with_state("/infra/db/primary", &module("aws_instance.db", "10.0.0.2"))
        .with_state("/infra/empty", r#"{"modules": []}"#);
    let aggregator = Aggregator::new(source);

    let doc = aggregator.resolve(Path::new("/infra"));

    assert_eq!(doc.modules.len(), 2);
    assert!(doc.modules[0].resources.contains_key("aws_instance.app"));
    assert!(doc.modules[1].resources.contains_key("aws_instance.db"));
}

#[test]
fn test_failing_subtree_does_not_abort_siblings() {
    let source = FakeSource::default()
        .with_children("/infra", &["/infra/broken", "/infra/garbage", "/infra/locked", "/infra/ok"])
        .with_state("/infra/garbage", "Error: backend not initialized")
        .with_unreadable("/infra/locked")
        .with_state("/infra/ok", &module("aws_instance.ok", "10.0.0.3"));
    let aggregator = Aggregator::new(source);

    let doc = aggregator.resolve(Path::new("/infra"));

    assert_eq!(doc.modules.len(), 1);
    assert_eq!(doc.resource_count(), 1);
    assert!(doc.modules[0].resources.contains_key("aws_instance.ok"));
}

#[test]
fn test_nothing_found_is_empty_document() {
    let source = FakeSource::default().with_children("/infra", &["/infra/a", "/infra/b"]);
    let aggregator = Aggregator::new(source);

    let doc = aggregator.resolve(Path::new("/infra"));

    assert!(doc.is_empty());
    assert_eq!(
        *aggregator.source().pulls.borrow(),
        vec![
            PathBuf::from("/infra"),
            PathBuf::from("/infra/a"),
            PathBuf::from("/infra/b")
        ]
    );
}

#[test]
fn test_real_directories_with_default_listing() {
    struct PullFile;

    impl StateSource for PullFile {
        fn pull(&self, dir: &Path) -> Result<Vec<u8>, InventoryError> {
            Ok(std::fs::read(dir.join("terraform.tfstate"))?)
        }
    }

    let tmp = tempfile::tempdir().unwrap();
    let web = tmp.path().join("web");
    let nested = tmp.path().join("services").join("db");
    std::fs::create_dir_all(&web).unwrap();
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(web.join("terraform.tfstate"), module("aws_instance.web", "10.1.0.1")).unwrap();
    std::fs::write(nested.join("terraform.tfstate"), module("aws_instance.db", "10.1.0.2")).unwrap();

    let doc = Aggregator::new(PullFile).resolve(tmp.path());

    assert_eq!(doc.modules.len(), 2);
    // "services" sorts before "web"
    assert!(doc.modules[0].resources.contains_key("aws_instance.db"));
    assert!(doc.modules[1].resources.contains_key("aws_instance.web"));
}
