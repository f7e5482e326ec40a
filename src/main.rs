use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use settle::io::{load_graph, load_options, load_script, to_json};
use settle::{Canvas, PhysicsOptions, ScriptedEvent, Simulation};

/// Force-directed layout for node-link diagrams.
#[derive(Parser)]
#[command(name = "settle")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a graph and print the final node positions as JSON
    Run {
        /// Input graph (.json, .yaml)
        #[arg(short, long)]
        input: PathBuf,

        /// Physics options (.json, .yaml); defaults apply to anything missing
        #[arg(long)]
        options: Option<PathBuf>,

        /// Pointer-event script replayed during the run
        #[arg(long)]
        script: Option<PathBuf>,

        /// Viewport width in pixels
        #[arg(long, default_value = "800")]
        width: f64,

        /// Viewport height in pixels
        #[arg(long, default_value = "600")]
        height: f64,

        /// Maximum number of ticks (overrides simulation.max_iterations)
        #[arg(long)]
        iterations: Option<usize>,

        /// Write positions here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective physics options as JSON
    Options {
        /// Physics options (.json, .yaml) to merge over the defaults
        #[arg(long)]
        options: Option<PathBuf>,
    },
}

fn resolve_options(path: Option<&Path>) -> anyhow::Result<PhysicsOptions> {
    match path {
        Some(path) => load_options(path)
            .with_context(|| format!("failed to load options from {}", path.display())),
        None => Ok(PhysicsOptions::default()),
    }
}

/// Tick the simulation, delivering scripted events before their tick
///
/// Stops early once the layout is stable and no scripted events remain.
fn drive(simulation: &mut Simulation, script: &[ScriptedEvent], max_ticks: usize) -> usize {
    let mut pending = script.iter().peekable();
    let mut ticks = 0;

    while ticks < max_ticks {
        while let Some(step) = pending.next_if(|s| s.tick <= ticks) {
            simulation.emit(step.to_event());
        }
        simulation.tick();
        ticks += 1;

        if pending.peek().is_none() && simulation.is_stable() {
            break;
        }
    }
    ticks
}

fn run(
    input: &Path,
    options: Option<&Path>,
    script: Option<&Path>,
    width: f64,
    height: f64,
    iterations: Option<usize>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let graph =
        load_graph(input).with_context(|| format!("failed to load graph {}", input.display()))?;
    let options = resolve_options(options)?;
    let script = match script {
        Some(path) => load_script(path)
            .with_context(|| format!("failed to load script {}", path.display()))?,
        None => Vec::new(),
    };

    let max_ticks = iterations.unwrap_or(options.simulation.max_iterations);
    let mut simulation = Simulation::from_graph_data(&graph, options, Canvas::new(width, height));
    let ticks = drive(&mut simulation, &script, max_ticks);
    info!(
        ticks,
        stable = simulation.is_stable(),
        nodes = graph.nodes.len(),
        "layout finished"
    );

    let json = to_json(&simulation.positions())?;
    match output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} positions to {}", graph.nodes.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("settle=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            options,
            script,
            width,
            height,
            iterations,
            output,
        } => run(
            &input,
            options.as_deref(),
            script.as_deref(),
            width,
            height,
            iterations,
            output.as_deref(),
        )?,
        Commands::Options { options } => {
            let options = resolve_options(options.as_deref())?;
            println!("{}", to_json(&options)?);
        }
    }

    Ok(())
}
