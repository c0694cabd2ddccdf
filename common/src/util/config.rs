use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub hill_climb: HillClimbConfig,
    #[serde(default)]
    pub annealing: AnnealingConfig,
    #[serde(default)]
    pub genetic: GeneticConfig,
    #[serde(default)]
    pub priority: PriorityConfig,
    #[serde(default)]
    pub input: InputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            hill_climb: HillClimbConfig::default(),
            annealing: AnnealingConfig::default(),
            genetic: GeneticConfig::default(),
            priority: PriorityConfig::default(),
            input: InputConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub initial_routers: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            seed: None,
            initial_routers: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HillClimbConfig {
    #[serde(default = "default_policy")]
    pub policy: String,
    #[serde(default = "default_restarts")]
    pub restarts: usize,
    #[serde(default = "default_hc_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_hc_patience")]
    pub patience: usize,
    #[serde(default = "default_add_patience")]
    pub add_patience: usize,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            restarts: default_restarts(),
            max_iterations: default_hc_max_iterations(),
            patience: default_hc_patience(),
            add_patience: default_add_patience(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnnealingConfig {
    #[serde(default = "default_sa_iterations")]
    pub iterations: usize,
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
    #[serde(default = "default_cooling_rate")]
    pub cooling_rate: f64,
    #[serde(default = "default_min_temperature")]
    pub min_temperature: f64,
    #[serde(default = "default_sigma")]
    pub sigma: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            iterations: default_sa_iterations(),
            initial_temperature: default_initial_temperature(),
            cooling_rate: default_cooling_rate(),
            min_temperature: default_min_temperature(),
            sigma: default_sigma(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneticConfig {
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    #[serde(default = "default_generations")]
    pub generations: usize,
    #[serde(default = "default_mutation_probability")]
    pub mutation_probability: f64,
    #[serde(default = "default_tournament_size")]
    pub tournament_size: usize,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            mutation_probability: default_mutation_probability(),
            tournament_size: default_tournament_size(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriorityConfig {
    #[serde(default = "default_pr_iterations")]
    pub iterations: usize,
    #[serde(default = "default_evaluation_delay")]
    pub evaluation_delay: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            iterations: default_pr_iterations(),
            evaluation_delay: default_evaluation_delay(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_instance_file")]
    pub instance_file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            instance_file: default_instance_file(),
        }
    }
}

fn default_driver() -> String {
    "hill_climb".to_string()
}

fn default_policy() -> String {
    "best".to_string()
}

fn default_restarts() -> usize {
    10
}

fn default_hc_max_iterations() -> usize {
    10_000
}

fn default_hc_patience() -> usize {
    50
}

fn default_add_patience() -> usize {
    200
}

fn default_sa_iterations() -> usize {
    5_000
}

fn default_initial_temperature() -> f64 {
    5_000.0
}

fn default_cooling_rate() -> f64 {
    0.999
}

fn default_min_temperature() -> f64 {
    1e-3
}

fn default_sigma() -> f64 {
    1.0
}

fn default_population_size() -> usize {
    20
}

fn default_generations() -> usize {
    100
}

fn default_mutation_probability() -> f64 {
    0.2
}

fn default_tournament_size() -> usize {
    3
}

fn default_parallel() -> bool {
    true
}

fn default_pr_iterations() -> usize {
    1_000
}

fn default_evaluation_delay() -> usize {
    10
}

fn default_instance_file() -> String {
    "inputs/building.in".to_string()
}
