use anyhow::Result;
use std::time::Instant;

use crate::harness::Harness;
use crate::reports::ScenarioResult;

pub mod catalog;

pub use catalog::catalog_scenarios;

/// A named flow replayed against fresh memory stores.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    check: fn(&Harness) -> Result<()>,
}

impl Scenario {
    pub const fn new(
        key: &'static str,
        name: &'static str,
        description: &'static str,
        check: fn(&Harness) -> Result<()>,
    ) -> Self {
        Self {
            key,
            name,
            description,
            check,
        }
    }

    /// Run against a fresh harness and time it.
    #[must_use]
    pub fn run(&self, verbose: bool) -> ScenarioResult {
        let harness = Harness::new();
        let started = Instant::now();
        let outcome = (self.check)(&harness);
        let duration = started.elapsed();
        if verbose {
            log::info!("{} finished in {duration:?}", self.name);
        }
        ScenarioResult {
            scenario_key: self.key.to_string(),
            scenario_name: self.name.to_string(),
            passed: outcome.is_ok(),
            duration,
            failure: outcome.err().map(|err| format!("{err:#}")),
        }
    }
}

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    let mut seen: Vec<(&'static str, &'static str)> = Vec::new();
    for scenario in catalog_scenarios() {
        if !seen.iter().any(|(key, _)| *key == scenario.key) {
            seen.push((scenario.key, scenario.description));
        }
    }
    seen.push(("all", "Every scenario in the catalog"));
    seen
}

/// Scenarios registered under `key`, or `None` when the key is unknown.
#[must_use]
pub fn get_scenarios(key: &str) -> Option<Vec<Scenario>> {
    let all = catalog_scenarios();
    if key == "all" {
        return Some(all);
    }
    let matching: Vec<Scenario> = all.into_iter().filter(|s| s.key == key).collect();
    (!matching.is_empty()).then_some(matching)
}
