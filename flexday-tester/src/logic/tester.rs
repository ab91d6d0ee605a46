use chrono::NaiveDate;
use colored::Colorize;
use flexday_core::{MissionCatalog, derive_stream_seed};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::{ScenarioCtx, TestScenario};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "micros_serde")]
    pub average_duration: Duration,
    #[serde(with = "micros_vec_serde")]
    pub performance_data: Vec<Duration>,
}

impl ScenarioResult {
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.iterations_run == 0 {
            return 0.0;
        }
        let ok = u32::try_from(self.successful_iterations).unwrap_or(u32::MAX);
        let run = u32::try_from(self.iterations_run).unwrap_or(u32::MAX);
        f64::from(ok) / f64::from(run) * 100.0
    }
}

pub struct LogicTester {
    verbose: bool,
    catalog: MissionCatalog,
    start: NaiveDate,
}

impl LogicTester {
    pub const fn new(verbose: bool, catalog: MissionCatalog, start: NaiveDate) -> Self {
        Self {
            verbose,
            catalog,
            start,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed}, start: {})",
                        scenario.name.bright_white(),
                        self.start
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let mut ctx = ScenarioCtx {
                seed: iteration_seed,
                start: self.start,
                catalog: self.catalog.clone(),
                rng: ChaCha20Rng::seed_from_u64(derive_stream_seed(
                    iteration_seed,
                    scenario.name.as_bytes(),
                )),
                verbose: self.verbose,
            };

            let started = Instant::now();
            match (scenario.check)(&mut ctx) {
                Ok(note) => {
                    successes += 1;
                    let duration = started.elapsed();
                    performance_data.push(duration);
                    log::debug!("{} iteration {} ok: {note}", scenario.name, i + 1);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({duration:?}) {note}",
                            i + 1
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    log::warn!("{}: {message}", scenario.name);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            i + 1,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

mod micros_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_micros())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}

mod micros_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u64> = durations
            .iter()
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u64>::deserialize(deserializer)?;
        Ok(micros.into_iter().map(Duration::from_micros).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::get_scenario;

    fn tester() -> LogicTester {
        LogicTester::new(
            false,
            MissionCatalog::builtin(),
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        )
    }

    #[test]
    fn one_result_per_seed() {
        let scenario = get_scenario("smoke").unwrap();
        let results = tester().run_scenario(&scenario, &[1, 2, 3], 2);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed && r.iterations_run == 2));
        assert_eq!(results[1].seed, 2);
    }

    #[test]
    fn failing_check_records_seed_and_message() {
        fn always_fails(_: &mut ScenarioCtx) -> anyhow::Result<String> {
            anyhow::bail!("nope")
        }
        let scenario = TestScenario::new("Broken", always_fails);
        let result = &tester().run_scenario(&scenario, &[10], 3)[0];
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 3);
        assert!(result.failures[2].contains("seed 12"));
        assert!(result.failures[0].ends_with("nope"));
        assert_eq!(result.success_rate(), 0.0);
    }

    #[test]
    fn durations_serialize_as_micros() {
        let result = ScenarioResult {
            scenario_name: "x".into(),
            seed: 0,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_micros(1500),
            performance_data: vec![Duration::from_micros(1500)],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_duration"], 1500);
        assert_eq!(value["performance_data"][0], 1500);
        let back: ScenarioResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.average_duration, result.average_duration);
    }
}
