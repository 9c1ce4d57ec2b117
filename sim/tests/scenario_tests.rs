use pretty_assertions::assert_eq;
use relay_host::HostConfig;
use relay_sim::{run_scenario, ScenarioParams};
use std::io::Write;

#[test]
fn default_scenario_passes() {
    let report = run_scenario(HostConfig::default(), &ScenarioParams::default()).unwrap();
    assert!(report.passed(), "{}", report.generate_text());
    assert_eq!(report.final_value, 42);
    assert_eq!(report.final_message, "hello from v2");
    assert_ne!(report.backend_before, report.backend_after);
}

#[test]
fn scenario_uses_supplied_values() {
    let params = ScenarioParams {
        initial_value: 7,
        message: "custom".to_string(),
    };
    let report = run_scenario(HostConfig::default(), &params).unwrap();
    assert!(report.passed());
    assert_eq!(report.final_value, 7);
    assert_eq!(report.final_message, "custom");
}

#[test]
fn scenario_runs_with_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "max_call_depth = 16\ngenesis_balance = 1000").unwrap();
    let config = HostConfig::load(file.path()).unwrap();

    let report = run_scenario(config, &ScenarioParams::default()).unwrap();
    assert!(report.passed());
}

#[test]
fn host_without_nested_frames_cannot_run_the_scenario() {
    // Every forwarded call needs one nested frame.
    let config = HostConfig {
        max_call_depth: 0,
        ..HostConfig::default()
    };
    assert!(run_scenario(config, &ScenarioParams::default()).is_err());
}

#[test]
fn shipped_example_config_loads_and_runs() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/relay-sim.example.toml");
    let config = HostConfig::load(path).unwrap();
    assert_eq!(config, HostConfig::default());

    let report = run_scenario(config, &ScenarioParams::default()).unwrap();
    assert!(report.passed());
}
