//! CLI route tests against a real repository directory

use pinseed::cli::{Commands, PinCommands, RunContext};
use pinseed::seed::bundled::{DIR_INDEX, INIT_DOCS};
use tempfile::TempDir;

fn run_context(temp_dir: &TempDir, extra_config: &str) -> RunContext {
    let config_file = temp_dir.path().join("pinseed.toml");
    std::fs::write(&config_file, extra_config).unwrap();
    RunContext::new(Some(temp_dir.path().join("repo")), Some(config_file)).unwrap()
}

#[test]
fn test_init_makes_bundles_live() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = run_context(&temp_dir, "");
    ctx.execute(&Commands::Init).unwrap();

    let live = ctx
        .node()
        .pins()
        .live_set(ctx.node().store())
        .unwrap();
    // Two roots plus every bundled file
    assert_eq!(live.len(), 2 + INIT_DOCS.len() + DIR_INDEX.len());
}

#[test]
fn test_concurrent_init_matches_sequential() {
    let sequential_dir = TempDir::new().unwrap();
    let sequential = run_context(&sequential_dir, "");
    sequential.execute(&Commands::Init).unwrap();

    let concurrent_dir = TempDir::new().unwrap();
    let concurrent = run_context(
        &concurrent_dir,
        "[seed]\nconcurrent_adds = true\nflush_timeout_ms = 5000\n",
    );
    concurrent.execute(&Commands::Init).unwrap();

    assert_eq!(sequential.node().pins().list(), concurrent.node().pins().list());
}

#[test]
fn test_pin_ls_json_after_init() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = run_context(&temp_dir, "");
    ctx.execute(&Commands::Init).unwrap();

    let output = ctx
        .execute(&Commands::Pin {
            command: PinCommands::Ls {
                format: "json".to_string(),
            },
        })
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    let pins = value["pins"].as_array().unwrap();
    assert_eq!(pins.len(), 2);
    assert!(pins.iter().all(|p| p["mode"] == "recursive"));
}

#[test]
fn test_pins_persist_across_contexts() {
    let temp_dir = TempDir::new().unwrap();
    let pinned = {
        let ctx = run_context(&temp_dir, "");
        ctx.execute(&Commands::Init).unwrap();
        ctx.node().pins().list()
    };

    let ctx = run_context(&temp_dir, "");
    assert_eq!(ctx.node().pins().list(), pinned);
    assert!(ctx.repo_root().join("pins.bin").is_file());
}
