use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wildfire::{SweepParam, manager::Manager};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one simulation and print the fraction of houses burned.
    Run {
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Average the fraction of houses burned over a range of one parameter.
    Sweep {
        #[arg(value_enum)]
        param: SweepParam,

        #[arg(long, default_value_t = 50)]
        runs: usize,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the effective configuration.
    Config,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.config).context("failed to construct mgr")?;

    match args.command {
        Command::Run { seed } => {
            let outcome = mgr.run_simulation(seed)?;
            println!("{:.6}", outcome.fraction_burned);
        }
        Command::Sweep { param, runs, seed } => {
            let points = mgr.run_sweep(param, runs, seed)?;
            println!(
                "{:>18} {:>10} {:>10} {:>6} {:>9}",
                param.name(),
                "mean",
                "std_dev",
                "runs",
                "skipped"
            );
            for point in points {
                println!(
                    "{:>18.1} {:>10.6} {:>10.6} {:>6} {:>9}",
                    point.val,
                    point.report.mean,
                    point.report.std_dev,
                    point.report.n_vals,
                    point.n_skipped
                );
            }
        }
        Command::Config => print!("{}", mgr.cfg().to_toml()?),
    }

    Ok(())
}
