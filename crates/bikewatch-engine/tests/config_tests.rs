#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;

use bikewatch_core::logging_facility::Profile;
use bikewatch_engine::{open_store, Config};

#[test]
fn test_load_explicit_file_and_open_store() {
    // GIVEN a config file pointing at a database inside a temp dir
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("data").join("store.db");
    let config_path = dir.path().join("bikewatch.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(
        file,
        "db_path = {:?}\nmax_conflict_retries = 4\nlog_profile = \"production\"",
        db_path.display().to_string()
    )
    .unwrap();

    // WHEN it is loaded from file only
    let config = Config::from_file(&config_path).unwrap();

    // THEN every value comes from the file
    assert_eq!(config.db_path, db_path);
    assert_eq!(config.max_conflict_retries, 4);
    assert_eq!(config.log_profile, Profile::Production);

    // AND the store opens, creating the parent directory
    let store = open_store(&config).unwrap();
    assert!(store.list_officers().unwrap().is_empty());
    assert!(db_path.exists());
}

#[test]
fn test_malformed_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("bad.toml");
    std::fs::write(&config_path, "max_conflict_retries = \"three\"").unwrap();

    let err = Config::from_file(&config_path).unwrap_err();

    assert_eq!(err.code(), "ERR_CONFIG");
    assert!(err.entity_id().unwrap().ends_with("bad.toml"));
}
