pub mod annealing;
pub mod genetic;
pub mod hill_climb;
pub mod pool;
pub mod priority;
pub mod traits;

use annealing::{Annealer, AnnealingParams};
use genetic::{GeneticParams, GeneticSearch};
use hill_climb::{HillClimbParams, HillClimber};
use priority::{PriorityParams, PrioritySearch};
use traits::Optimizer;
use wifiplan_common::util::config::Config;

/// Driver named by `config.search.driver`, configured from its section.
pub fn build_optimizer(config: &Config) -> anyhow::Result<Box<dyn Optimizer>> {
    let initial = config.search.initial_routers;
    let optimizer: Box<dyn Optimizer> = match config.search.driver.as_str() {
        "hill_climb" | "hill_climbing" => Box::new(HillClimber::new(HillClimbParams::from_config(
            &config.hill_climb,
            initial,
        )?)),
        "annealing" | "simulated_annealing" => Box::new(Annealer::new(AnnealingParams::from_config(
            &config.annealing,
            initial,
        ))),
        "genetic" => Box::new(GeneticSearch::new(GeneticParams::from_config(&config.genetic, initial))),
        "priority" => Box::new(PrioritySearch::new(PriorityParams::from_config(&config.priority, initial))),
        other => anyhow::bail!(
            "unknown driver '{}' (expected hill_climb, annealing, genetic or priority)",
            other
        ),
    };
    Ok(optimizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_names_resolve() {
        let mut config = Config::default();
        for (name, expected) in [
            ("hill_climb", "hill_climb"),
            ("simulated_annealing", "annealing"),
            ("genetic", "genetic"),
            ("priority", "priority"),
        ] {
            config.search.driver = name.to_string();
            assert_eq!(build_optimizer(&config).unwrap().name(), expected);
        }
        config.search.driver = "tabu".to_string();
        assert!(build_optimizer(&config).is_err());
    }

    #[test]
    fn bad_policy_is_reported() {
        let mut config = Config::default();
        config.hill_climb.policy = "steepest".to_string();
        assert!(build_optimizer(&config).is_err());
    }
}
