use anyhow::{Context, Result};
use asdm_core::{Engine, EngineState, RunSummary, SimConfig};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "asdm")]
#[command(about = "AI-automation labor-collapse simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a JSON config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory for results (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write a grid-snapshot frame every N ticks (heatmap input)
        #[arg(long)]
        snapshot_every: Option<usize>,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn write_timeseries_csv(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path).context("failed to create timeseries file")?;
    let mut out = BufWriter::new(file);
    writeln!(
        out,
        "step,employment_rate,total_consumption,tax_revenue,stimulus_paid,ai_profit,non_ai_revenue,treasury"
    )?;
    for s in &summary.samples {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            s.step,
            s.employment_rate,
            s.total_consumption,
            s.tax_revenue,
            s.stimulus_paid,
            s.ai_profit,
            s.non_ai_revenue,
            s.treasury
        )?;
    }
    Ok(())
}

fn run_from_config(
    config_path: &Path,
    out: Option<PathBuf>,
    snapshot_every: Option<usize>,
) -> Result<()> {
    let file = File::open(config_path).context("failed to open config file")?;
    let reader = BufReader::new(file);
    let sim_config: SimConfig =
        serde_json::from_reader(reader).context("failed to parse config")?;

    let mut engine = Engine::new(sim_config).context("config validation error")?;
    println!(
        "Loaded config from {:?}; simulating up to {} ticks...",
        config_path,
        engine.config().max_steps
    );

    // Stream ticks so grid frames can be captured as the run progresses;
    // the summary is rebuilt from the engine's own series afterwards.
    let mut frames = Vec::new();
    loop {
        if let EngineState::Terminal(_) = engine.state() {
            break;
        }
        let snapshot = engine.step().context("tick aborted")?;
        if let Some(every) = snapshot_every {
            if every > 0 && snapshot.step % every == 0 {
                frames.push(engine.grid_snapshot());
            }
        }
    }
    let terminal = engine
        .terminal_reason()
        .context("run ended without a terminal reason")?;
    let summary = RunSummary {
        schema_version: 1,
        steps: engine.series().len(),
        terminal,
        final_employment_rate: engine.employment_rate(),
        samples: engine.series().to_vec(),
    };

    println!(
        "Run complete after {} ticks ({}); final employment rate {:.3}",
        summary.steps, summary.terminal, summary.final_employment_rate
    );

    if let Some(out_dir) = out {
        std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;

        let summary_file =
            File::create(out_dir.join("summary.json")).context("failed to create summary file")?;
        serde_json::to_writer_pretty(summary_file, &summary).context("failed to write summary")?;

        write_timeseries_csv(&out_dir.join("timeseries.csv"), &summary)?;

        if !frames.is_empty() {
            let frames_file = File::create(out_dir.join("frames.jsonl"))
                .context("failed to create frames file")?;
            let mut out = BufWriter::new(frames_file);
            for frame in &frames {
                serde_json::to_writer(&mut out, frame).context("failed to write frame")?;
                writeln!(out)?;
            }
        }
        println!("Results saved to {:?}", out_dir);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            config,
            out,
            snapshot_every,
        } => run_from_config(&config, out, snapshot_every)?,
    }
    Ok(())
}
