//! Integration tests for loading configuration from disk

use std::fs;
use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use schelling_voices::core::config::SimulationConfig;
use schelling_voices::core::error::SchellingError;
use schelling_voices::core::types::CellPos;
use schelling_voices::simulation::world::SchellingGrid;

fn write_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "schelling-voices-{}-{}.toml",
        name,
        std::process::id()
    ));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_config_and_build_grid() {
    let path = write_config(
        "valid",
        r#"
        grid_size = 6
        empty_ratio = 0.5
        threshold = 0.3
        dynamic_thresholds = true
        seed = 1234

        [[personalities]]
        label = "gregarious"
        threshold = 0.0

        [[personalities]]
        label = "reclusive"
        threshold = 1.0

        [llm]
        model = "claude-3-haiku-20240307"
        api_url = "https://api.anthropic.com/v1/messages"
        api_key_env = "ANTHROPIC_API_KEY"
        "#,
    );
    let config = SimulationConfig::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.seed, Some(1234));
    assert_eq!(config.llm.api_key_env, "ANTHROPIC_API_KEY");

    let grid = SchellingGrid::generate(&config, &mut ChaCha8Rng::seed_from_u64(1234)).unwrap();
    let census = grid.census();
    assert_eq!(census.empty, 18);
    assert_eq!(census.red + census.blue, 18);

    for (pos, _) in grid.agents() {
        let threshold = grid.threshold_for(pos).unwrap();
        match grid.personality_for(pos).unwrap() {
            "gregarious" => {
                assert_eq!(threshold, 0.0);
                assert!(grid.is_satisfied(pos).unwrap());
            }
            "reclusive" => assert_eq!(threshold, 1.0),
            other => panic!("unexpected personality {}", other),
        }
    }
}

#[test]
fn test_invalid_config_stops_before_grid() {
    let path = write_config(
        "unmapped",
        r#"
        [[personalities]]
        label = "mapped"
        threshold = 0.2

        [[personalities]]
        label = "forgotten"
        "#,
    );
    let config = SimulationConfig::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let result = SchellingGrid::generate(&config, &mut ChaCha8Rng::seed_from_u64(0));
    match result {
        Err(SchellingError::InvalidConfig(msg)) => assert!(msg.contains("forgotten")),
        other => panic!("expected InvalidConfig, got {:?}", other.map(|g| g.size())),
    }
}

#[test]
fn test_oversized_grid_rejected_at_startup() {
    let path = write_config("oversized", "grid_size = 5000000000\n");
    let config = SimulationConfig::load(&path).unwrap();
    fs::remove_file(&path).ok();

    match SchellingGrid::generate(&config, &mut ChaCha8Rng::seed_from_u64(0)) {
        Err(SchellingError::InvalidConfig(msg)) => assert!(msg.contains("grid_size")),
        other => panic!("expected InvalidConfig, got {:?}", other.map(|g| g.size())),
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("schelling-voices-definitely-missing.toml");
    assert!(matches!(
        SimulationConfig::load(&path),
        Err(SchellingError::IoError(_))
    ));
}

#[test]
fn test_static_mode_uses_global_threshold_everywhere() {
    let config = SimulationConfig {
        grid_size: 9,
        threshold: 0.45,
        dynamic_thresholds: false,
        ..Default::default()
    };
    let grid = SchellingGrid::generate(&config, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
    let first = grid.agents().next().map(|(p, _)| p).unwrap_or(CellPos::new(0, 0));
    assert_eq!(grid.threshold_for(first).unwrap(), 0.45);
    assert!(grid
        .agents()
        .all(|(p, _)| grid.threshold_for(p).unwrap() == 0.45));
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/schelling.toml");
    let shipped = SimulationConfig::load(&path).unwrap();
    let defaults = SimulationConfig::default();

    assert!(shipped.validate().is_ok());
    assert_eq!(shipped.grid_size, defaults.grid_size);
    assert_eq!(shipped.empty_ratio, defaults.empty_ratio);
    assert_eq!(shipped.threshold, defaults.threshold);
    assert_eq!(shipped.personalities, defaults.personalities);
    assert_eq!(shipped.llm.model, defaults.llm.model);
    assert_eq!(shipped.llm.max_tokens, defaults.llm.max_tokens);
}
