mod loader;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use wifiplan_backbone::check::verify_tree;
use wifiplan_common::util::config::Config;
use wifiplan_common::util::generator::{BuildingParams, generate_random_instance};
use wifiplan_common::util::profiler::ScopedTimer;
use wifiplan_common::util::{check, logger};
use wifiplan_common::{Coord, Instance, RouterSet};
use wifiplan_placer::FitnessEvaluator;
use wifiplan_placer::coverage::geometry::uncovered_targets;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Place routers and backbone for an instance.
    Solve {
        /// Instance file; defaults to `input.instance_file` from the config.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// hill_climb, annealing, genetic or priority.
        #[arg(short, long)]
        driver: Option<String>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Score an existing placement given as `row col` lines.
    Score {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        routers: PathBuf,
    },
    /// Write a random building instance.
    Generate {
        #[arg(long, default_value_t = 60)]
        height: u32,
        #[arg(long, default_value_t = 90)]
        width: u32,
        #[arg(long, default_value_t = 5)]
        range: u32,
        #[arg(long, default_value_t = 12)]
        walls: usize,
        #[arg(long, default_value_t = 0.15)]
        void_fraction: f64,
        #[arg(long, default_value_t = 1000)]
        router_cost: i64,
        #[arg(long, default_value_t = 10)]
        backbone_cost: i64,
        #[arg(long, default_value_t = 25_000)]
        budget: i64,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "inputs/random.in")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let mut config: Config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };

    let command = args.command.unwrap_or(Commands::Solve {
        input: None,
        driver: None,
        seed: None,
    });

    match command {
        Commands::Solve { input, driver, seed } => {
            if let Some(driver) = driver {
                config.search.driver = driver;
            }
            if seed.is_some() {
                config.search.seed = seed;
            }
            let path = input.unwrap_or_else(|| PathBuf::from(&config.input.instance_file));
            let instance = loader::load_instance(&path)?;

            if run_search(&config, &instance).is_err() {
                std::process::exit(1);
            }
        }
        Commands::Score { input, routers } => {
            let path = input.unwrap_or_else(|| PathBuf::from(&config.input.instance_file));
            let instance = loader::load_instance(&path)?;
            let routers = loader::load_routers(&routers)?;
            RouterSet::from_coords(&instance.grid, routers.iter().copied())
                .context("Placement cannot be scored")?;

            if report(&instance, &routers).is_err() {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            height,
            width,
            range,
            walls,
            void_fraction,
            router_cost,
            backbone_cost,
            budget,
            seed,
            output,
        } => {
            let safe_void = void_fraction.clamp(0.0, 0.9);
            if (safe_void - void_fraction).abs() > f64::EPSILON {
                log::warn!(
                    "Requested void fraction {:.2} is unsafe. Clamped to {:.2}",
                    void_fraction,
                    safe_void
                );
            }

            if let Some(parent) = Path::new(&output).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }

            let seed = seed.unwrap_or_else(rand::random);
            log::info!(
                "Generating random building ({}x{}, {} walls, range {}, seed {})...",
                height,
                width,
                walls,
                range,
                seed
            );
            let params = BuildingParams {
                height,
                width,
                router_range: range,
                walls,
                void_fraction: safe_void,
                router_cost,
                backbone_cost,
                budget,
            };
            let instance = generate_random_instance(&params, &mut StdRng::seed_from_u64(seed));
            loader::save_instance(Path::new(&output), &instance)?;
            log::info!("Generated: {}", output);
        }
    }

    Ok(())
}

fn run_search(config: &Config, instance: &Instance) -> anyhow::Result<()> {
    let seed = config.search.seed.unwrap_or_else(rand::random);
    log::info!("Driver: {} (seed {})", config.search.driver, seed);

    let mut optimizer = wifiplan_placer::build_optimizer(config)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let outcome = {
        let _timer = ScopedTimer::new("Search");
        optimizer.optimize(instance, &mut rng)
    };
    log::info!(
        "{} finished after {} iterations",
        optimizer.name(),
        outcome.iterations
    );

    report(instance, outcome.routers.as_slice())
}

/// Rebuilds the backbone for `routers`, verifies everything and logs a summary.
fn report(instance: &Instance, routers: &[Coord]) -> anyhow::Result<()> {
    let mut evaluator = FitnessEvaluator::new(instance);
    let fitness = evaluator.evaluate(routers);
    let backbone = evaluator.backbone(routers);

    check::run_placement_check(instance, routers, backbone.len()).map_err(|e| anyhow::anyhow!(e))?;
    verify_tree(&backbone, routers).map_err(|e| anyhow::anyhow!("Verification Failed: {}", e))?;

    let uncovered = uncovered_targets(routers, &instance.grid, instance.router_range).len();
    let target = instance.grid.target_count().max(1);

    log::info!("Routers: {}", routers.len());
    for (i, c) in routers.iter().enumerate() {
        log::debug!("  router {}: {}", i, c);
    }
    log::info!(
        "Backbone: {} segments from {}",
        backbone.len(),
        backbone.origin()
    );
    log::info!(
        "Coverage: {}/{} targets ({:.2}%), {} uncovered",
        fitness.covered,
        instance.grid.target_count(),
        100.0 * fitness.covered as f64 / target as f64,
        uncovered
    );
    log::info!(
        "Cost: {} of {} budget{}",
        fitness.cost,
        instance.budget,
        if fitness.over_budget { " (OVER BUDGET)" } else { "" }
    );
    log::info!("Score: {}", fitness.score);
    Ok(())
}
