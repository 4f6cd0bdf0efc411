//! CLI command implementations

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use cohort_simulator_core_rs::{
    EligibilityResolver, ReplicateRecord, SimulationRun, Simulator, SimulatorConfig,
};
use tracing::info;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run replicates and write the results as JSON
    Run {
        /// JSON config file; flags below override its fields
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// "no-restrictions" or "core-first"
        #[arg(short, long)]
        policy: Option<String>,
        #[arg(long)]
        core_capacity: Option<usize>,
        #[arg(long)]
        elective_capacity: Option<usize>,
        /// Students admitted each term
        #[arg(long)]
        enrollment_rate: Option<usize>,
        #[arg(short, long)]
        terms: Option<usize>,
        #[arg(short, long)]
        replicates: Option<usize>,
        /// Chance of stopping after each successful registration
        #[arg(long)]
        single_course_probability: Option<f64>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Print the courses a student may register for next
    Eligible {
        #[arg(short, long, default_value = "no-restrictions")]
        policy: String,
        /// Comma-separated codes already completed
        #[arg(short, long, value_delimiter = ',')]
        taken: Vec<String>,
    },
    /// Print a policy's prerequisite graph as JSON adjacency
    Graph {
        #[arg(short, long, default_value = "no-restrictions")]
        policy: String,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns the first configuration, simulation or I/O failure
pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            config,
            policy,
            core_capacity,
            elective_capacity,
            enrollment_rate,
            terms,
            replicates,
            single_course_probability,
            seed,
            output,
            pretty,
        } => {
            let mut config = match config {
                Some(path) => SimulatorConfig::from_json_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => SimulatorConfig::default(),
            };
            if let Some(policy) = policy {
                config.policy = policy;
            }
            if let Some(v) = core_capacity {
                config.core_capacity = v;
            }
            if let Some(v) = elective_capacity {
                config.elective_capacity = v;
            }
            if let Some(v) = enrollment_rate {
                config.enrollment_rate = v;
            }
            if let Some(v) = terms {
                config.num_terms = v;
            }
            if let Some(v) = replicates {
                config.num_replicates = v;
            }
            if let Some(v) = single_course_probability {
                config.single_course_probability = v;
            }
            if let Some(v) = seed {
                config.rng_seed = v;
            }
            run_simulation(config, output, pretty)
        }
        Commands::Eligible { policy, taken } => show_eligible(&policy, taken),
        Commands::Graph { policy } => show_graph(&policy),
    }
}

/// Run all configured replicates
///
/// # Errors
/// - invalid configuration
/// - a replicate failing its invariant check
/// - output file not writable
pub fn run_simulation(config: SimulatorConfig, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    info!(
        policy = %config.policy,
        replicates = config.num_replicates,
        terms = config.num_terms,
        enrollment_rate = config.enrollment_rate,
        "starting simulation"
    );

    let mut simulator = Simulator::new(config).context("building simulator")?;
    let run = simulator.run().context("running simulation")?;
    for record in &run.replicates {
        simulator
            .validate(record)
            .with_context(|| format!("replicate {} failed validation", record.replicate))?;
        log_summary(record);
    }

    write_run(&run, output, pretty)
}

fn log_summary(record: &ReplicateRecord) {
    let durations: Vec<usize> = record
        .students
        .iter()
        .filter(|s| s.is_graduated())
        .map(|s| s.terms_attended())
        .collect();
    let mean_terms = if durations.is_empty() {
        0.0
    } else {
        durations.iter().sum::<usize>() as f64 / durations.len() as f64
    };
    let failed: usize = record.students.iter().map(|s| s.total_failed_attempts()).sum();

    info!(
        replicate = record.replicate,
        students = record.num_students(),
        graduated = record.graduated_count(),
        mean_terms_to_graduate = mean_terms,
        failed_attempts = failed,
        "replicate summary"
    );
}

fn write_run(run: &SimulationRun, output: Option<PathBuf>, pretty: bool) -> Result<()> {
    let json = run.to_json(pretty)?;
    match output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), run_id = %run.run_id, "results written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Print eligible courses for a completed-course set
///
/// # Errors
/// Unknown policy name
pub fn show_eligible(policy: &str, taken: Vec<String>) -> Result<()> {
    let resolver = EligibilityResolver::new(policy)?;
    let taken: BTreeSet<String> = taken
        .into_iter()
        .map(|code| code.trim().to_string())
        .filter(|code| !code.is_empty())
        .collect();

    let options = resolver.eligible_courses(&taken);
    println!("{}", serde_json::to_string_pretty(&options)?);
    Ok(())
}

/// Print the adjacency of a policy's built-in graph
///
/// # Errors
/// Unknown policy name
pub fn show_graph(policy: &str) -> Result<()> {
    let resolver = EligibilityResolver::new(policy)?;
    println!("{}", serde_json::to_string_pretty(&resolver.adjacency())?);
    Ok(())
}
