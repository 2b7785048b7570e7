//! 场景仿真
//!
//! 读取 scenario.json，依次执行各阶段，把测量结果以 JSON 输出。

use clap::Parser;
use schon_rs::measure::MeasureResult;
use schon_rs::sim::ScenarioSpec;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "schon-sim",
    about = "Run a scenario.json on the group SIS simulation engine"
)]
struct Args {
    /// Path to scenario.json
    #[arg(long)]
    scenario: PathBuf,

    /// Override the RNG seed from the scenario
    #[arg(long)]
    seed: Option<u64>,

    /// Write measurement results as JSON to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print one `name mean=.. len=..` line per measure
    #[arg(long)]
    summary: bool,
}

#[derive(Debug, Serialize)]
struct MeasureOutput<'a> {
    name: &'a str,
    result: MeasureResult,
}

fn main() {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> schon_rs::Result<()> {
    let raw = fs::read_to_string(&args.scenario)?;
    let spec = ScenarioSpec::from_json(&raw)?;
    let sim = spec.run(args.seed)?;

    let outputs: Vec<MeasureOutput<'_>> = sim
        .measures()
        .iter()
        .map(|m| MeasureOutput {
            name: m.name(),
            result: m.result(),
        })
        .collect();

    if args.summary {
        for out in &outputs {
            match &out.result {
                MeasureResult::Series(values) => {
                    let mean = if values.is_empty() {
                        0.0
                    } else {
                        values.iter().sum::<f64>() / values.len() as f64
                    };
                    println!("{} mean={mean:.6} len={}", out.name, values.len());
                }
                MeasureResult::Sets(sets) => {
                    println!("{} len={}", out.name, sets.len());
                }
            }
        }
        println!(
            "done @ t={}, infected={}",
            sim.current_time(),
            sim.number_of_infected_nodes()
        );
    }

    let json = serde_json::to_string_pretty(&outputs)?;
    match &args.output {
        Some(path) => fs::write(path, json)?,
        None if !args.summary => println!("{json}"),
        None => {}
    }
    Ok(())
}
