//! Engine sessions opened through the factory, driven as trait objects

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;
use tocc_engine::{
    memory_engine_factory, Engine, FileInfoCollection, FileSelection, TagsCollection,
};

fn session() -> Box<dyn Engine> {
    let factory = memory_engine_factory();
    let mut engine = factory(Path::new("/srv/tocc")).unwrap();
    engine.initialize().unwrap();
    engine
}

fn tags(items: &[&str]) -> TagsCollection {
    items.iter().copied().collect()
}

#[test]
fn test_factory_opens_uninitialized_session() {
    let factory = memory_engine_factory();
    let engine = factory(Path::new("/srv/tocc")).unwrap();
    assert_eq!(engine.base_path(), Path::new("/srv/tocc"));
    let err = engine.get_tags_statistics(FileSelection::All).unwrap_err();
    assert_eq!(err.class_name(), "DatabaseInitializationError");
}

#[test]
fn test_import_and_lookup() {
    let mut engine = session();
    let file = engine
        .import_file("/tmp/a.txt", "A", "/home/a.txt", Some(tags(&["x"])))
        .unwrap();

    let by_id = engine.get_file_info(file.id()).unwrap();
    let by_path = engine.get_file_by_traditional_path("/home/a.txt").unwrap();
    assert_eq!(by_id, file);
    assert_eq!(by_path, file);
}

#[rstest]
#[case("")]
#[case("/home/missing.txt")]
fn test_unknown_traditional_path(#[case] path: &str) {
    let mut engine = session();
    engine.import_file("/tmp/a.txt", "", "", None).unwrap();
    let err = engine.get_file_by_traditional_path(path).unwrap_err();
    assert_eq!(err.class_name(), "DatabaseScriptLogicalError");
}

#[test]
fn test_empty_source_path() {
    let mut engine = session();
    let err = engine.import_file("", "", "", None).unwrap_err();
    assert_eq!(err.class_name(), "InvalidArgumentError");
}

#[test]
fn test_unassign_unknown_file_changes_nothing() {
    let mut engine = session();
    let file = engine.import_file("/tmp/a.txt", "", "", Some(tags(&["x"]))).unwrap();
    let files = FileInfoCollection::from_ids(&[file.id(), "0ffffff"]);

    assert!(engine.unassign_tags(&files, tags(&["x"])).is_err());
    assert_eq!(engine.get_file_info(file.id()).unwrap().tags(), &tags(&["x"]));
}

#[test]
fn test_set_titles_unknown_file() {
    let mut engine = session();
    let file = engine.import_file("/tmp/a.txt", "old", "", None).unwrap();
    let ids = vec![file.id().to_string(), "0ffffff".to_string()];

    assert!(engine.set_titles(FileSelection::Only(&ids), "new").is_err());
    assert_eq!(engine.get_file_info(file.id()).unwrap().title(), "old");
}
