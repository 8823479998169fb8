//! Loading scenario documents from disk

use anyhow::Result;
use osalgo_rs::{EngineError, Outcome, Scenario};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_toml_paging_scenario() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("paging.toml");
    fs::write(
        &path,
        r#"
engine = "paging"
policy = "optimal"
capacity = 3
reference = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1]
"#,
    )?;

    let scenario = Scenario::from_path(&path)?;
    match scenario.run()? {
        Outcome::Paging(replay) => {
            assert_eq!(replay.faults(), 9);
            assert_eq!(replay.hits(), 11);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    Ok(())
}

#[test]
fn test_json_fit_scenario() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("fit.json");
    fs::write(
        &path,
        r#"{
            "engine": "fit",
            "policy": "best-fit",
            "blocks": [
                {"id": 1, "size": 100}, {"id": 2, "size": 500}, {"id": 3, "size": 200},
                {"id": 4, "size": 300}, {"id": 5, "size": 600}
            ],
            "requests": [
                {"id": 1, "size": 212}, {"id": 2, "size": 417},
                {"id": 3, "size": 112}, {"id": 4, "size": 426}
            ]
        }"#,
    )?;

    let scenario = Scenario::from_path(&path)?;
    match scenario.run()? {
        Outcome::Fit(outcome) => {
            let placed: Vec<Option<u32>> =
                outcome.requests.iter().map(|r| r.block_id).collect();
            assert_eq!(placed, vec![Some(4), Some(2), Some(3), Some(5)]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    Ok(())
}

#[test]
fn test_outcome_round_trips_through_json() -> Result<()> {
    let scenario = Scenario::from_toml_str(
        r#"
engine = "disk"
policy = "c-look"
head = 50
requests = [82, 170, 43, 140, 24, 16, 190]
"#,
    )?;
    let outcome = scenario.run()?;

    let json = serde_json::to_string(&outcome)?;
    let back: Outcome = serde_json::from_str(&json)?;
    assert_eq!(back, outcome);
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Scenario::from_path(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, EngineError::Io(_)));
}

#[test]
fn test_malformed_toml_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "engine = \"cpu\"\npolicy = [")?;

    let err = Scenario::from_path(&path).unwrap_err();
    assert!(matches!(err, EngineError::Toml(_)));
    Ok(())
}

#[test]
fn test_invalid_matrix_surfaces_on_run() -> Result<()> {
    let scenario = Scenario::from_json_str(
        r#"{
            "engine": "deadlock",
            "allocation": [[2, 0]],
            "max": [[1, 0]],
            "available": [1, 1]
        }"#,
    )?;
    assert!(matches!(
        scenario.run(),
        Err(EngineError::NegativeNeed { process: 0, resource: 0, .. })
    ));
    Ok(())
}
