//! Scenario configuration
//!
//! The expectations live in `scenarios.toml` at the workspace root: one entry per scenario,
//! mapping it to a probe crate and the process-level outcome expected on the configured
//! target. A machine-mode probe that passes on a bring-up emulator is expected to fault under
//! user-mode QEMU, so the expectation is per-target data, not code.

use indexmap::IndexMap;
use serde::Deserialize;

/// The scenarios configuration file
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub scenario: IndexMap<String, ScenarioEntry>,
}

/// One configured scenario
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEntry {
    /// Probe crate to build and run; defaults to the scenario name.
    pub probe: Option<String>,
    pub description: Option<String>,
    /// Expected process-level outcome on the configured target.
    #[serde(default)]
    pub expect: ExpectedOutcome,
}

/// The process-level outcome a scenario is expected to report.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedOutcome {
    #[default]
    Pass,
    Fail,
    Fault,
}

impl ScenarioEntry {
    /// The probe crate backing this scenario.
    pub fn probe_name<'a>(&'a self, scenario_name: &'a str) -> &'a str {
        self.probe.as_deref().unwrap_or(scenario_name)
    }
}

// ————————————————————————————————— Tests —————————————————————————————————— //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scenarios_config() {
        let raw = r#"
            [scenario.map_unmap]
            description = "map then release a page"
            expect = "pass"

            [scenario.counters]
            probe = "perf_counters"
            expect = "fault"

            [scenario.bare]
        "#;
        let config = toml::from_str::<ProjectConfig>(raw).expect("valid config");
        assert_eq!(config.scenario.len(), 3);

        let map_unmap = &config.scenario["map_unmap"];
        assert_eq!(map_unmap.expect, ExpectedOutcome::Pass);
        assert_eq!(map_unmap.probe_name("map_unmap"), "map_unmap");

        let counters = &config.scenario["counters"];
        assert_eq!(counters.expect, ExpectedOutcome::Fault);
        assert_eq!(counters.probe_name("counters"), "perf_counters");

        // Expectation defaults to pass.
        assert_eq!(config.scenario["bare"].expect, ExpectedOutcome::Pass);

        // Entries keep their file order.
        let names: Vec<_> = config.scenario.keys().collect();
        assert_eq!(names, ["map_unmap", "counters", "bare"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"
            [scenario.typo]
            expectation = "pass"
        "#;
        assert!(toml::from_str::<ProjectConfig>(raw).is_err());
    }
}
