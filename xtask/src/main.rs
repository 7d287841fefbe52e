use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the ride flow workspace",
    long_about = "A unified CLI for running the demo flow, benchmarks,\n\
                  and CI checks in the ride flow workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the CLI demo against the built-in New York places
    Demo {
        /// Destination search text
        #[arg(long, default_value = "Starbucks")]
        query: String,
        /// Routing backend passed to the CLI
        #[arg(long, default_value = "h3-grid")]
        provider: String,
    },
    /// Run Criterion benchmarks, optionally saving or comparing a named baseline
    Bench {
        /// Save results under this baseline name
        #[arg(long, conflicts_with = "baseline")]
        save_baseline: Option<String>,
        /// Compare against a previously saved baseline
        #[arg(long)]
        baseline: Option<String>,
    },
    /// Run CI checks (fmt, clippy, tests, demo, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run the demo for every routing backend
    Demo,
    /// Run benchmarks
    Bench,
    /// Run check + demo + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn run_demo(query: &str, provider: &str) {
    run_cargo(&[
        "run",
        "-p",
        "ride_flow_cli",
        "--",
        "--query",
        query,
        "--provider",
        provider,
    ]);
}

fn bench(extra: &[&str]) {
    let mut args = vec!["bench", "--package", "ride_flow_core", "--bench", "performance"];
    if !extra.is_empty() {
        args.push("--");
        args.extend_from_slice(extra);
    }
    run_cargo(&args);
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Run clippy");
    run_cargo(&[
        "clippy",
        "--workspace",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Run tests (ride_flow_core)");
    run_cargo(&["test", "-p", "ride_flow_core"]);

    step("Build ride_flow_core without default features");
    run_cargo(&["build", "-p", "ride_flow_core", "--no-default-features"]);

    step("Run tests (ride_flow_cli)");
    run_cargo(&["test", "-p", "ride_flow_cli"]);
}

fn ci_demo() {
    for provider in ["straight-line", "h3-grid"] {
        step(&format!("Run demo ({provider})"));
        run_demo("Starbucks", provider);
    }

    step("Run demo with the legacy mile divisor");
    run_cargo(&["run", "-p", "ride_flow_cli", "--", "--legacy-miles"]);
}

fn ci_bench() {
    step("Run benchmarks");
    bench(&[]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo { query, provider } => run_demo(&query, &provider),
        Commands::Bench {
            save_baseline,
            baseline,
        } => match (save_baseline, baseline) {
            (Some(name), _) => bench(&["--save-baseline", &name]),
            (None, Some(name)) => bench(&["--baseline", &name]),
            (None, None) => bench(&[]),
        },
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Demo => ci_demo(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_demo();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bench_baseline_flags_are_exclusive() {
        let cli = Cli::try_parse_from(["xtask", "bench", "--baseline", "main"]).expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Bench { save_baseline: None, baseline: Some(ref name) } if name == "main"
        ));
        assert!(Cli::try_parse_from([
            "xtask",
            "bench",
            "--baseline",
            "a",
            "--save-baseline",
            "b",
        ])
        .is_err());
        assert!(Cli::try_parse_from(["xtask", "bench-compare"]).is_err());
    }
}
