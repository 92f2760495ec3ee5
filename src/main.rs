use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod fixtures;
mod layout;
mod runner;

use layout::TestLayout;
use runner::Harness;

#[derive(Parser, Debug)]
#[command(author, version, about = "tfc regression harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate fixtures, run the regression suite and report (default)
    Tests {
        /// Only run tests whose name contains this filter
        #[arg(short, long)]
        filter: Option<String>,
        /// Print per-test execution details
        #[arg(short = 'V', long, default_value_t = false)]
        verbose: bool,
        /// Directory holding the input/output/expected tree
        #[arg(long, default_value = "testdata")]
        root: PathBuf,
        /// Path to the tfc binary (defaults to PATH lookup)
        #[arg(long)]
        tool: Option<PathBuf>,
        /// Export the executed commands as a shell script after the run
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Rebuild the fixture tree without running anything
    Generate {
        /// Directory holding the input/output/expected tree
        #[arg(long, default_value = "testdata")]
        root: PathBuf,
        /// Print each generated file
        #[arg(short = 'V', long, default_value_t = false)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tests {
        filter: None,
        verbose: false,
        root: PathBuf::from("testdata"),
        tool: None,
        script: None,
    });

    let outcome = match command {
        Commands::Tests {
            filter,
            verbose,
            root,
            tool,
            script,
        } => run_tests(filter, verbose, root, tool, script),
        Commands::Generate { root, verbose } => {
            fixtures::generate(&TestLayout::new(root), verbose).map(|()| 0)
        }
    };

    match outcome {
        // The failure count is the exit code, clamped to the u8 range the
        // process status can carry.
        Ok(failures) => ExitCode::from(failures.min(u8::MAX as usize) as u8),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_tests(
    filter: Option<String>,
    verbose: bool,
    root: PathBuf,
    tool: Option<PathBuf>,
    script: Option<PathBuf>,
) -> Result<usize> {
    let layout = TestLayout::new(root);
    fixtures::generate(&layout, verbose)?;
    let mut harness = Harness::new(layout, tool, verbose)?;

    println!("\nExecuting all tests.");
    let outcome = runner::run_suite(&mut harness, filter.as_deref());

    if let Some(path) = script {
        runner::write_replay_script(&path, harness.commands())?;
        println!("Replay script written to {}.", path.display());
    }

    println!(
        "\n{}/{} tests passed{}.",
        outcome.executed - outcome.failures,
        outcome.executed,
        if filter.is_some() { " (filtered)" } else { "" }
    );
    if outcome.failures == 0 {
        println!("\nCommands executed:");
        for command in harness.commands() {
            println!("{command}");
        }
        println!("\nAll tests passed.");
        return Ok(0);
    }
    println!("\n{} ERROR(S) encountered.", outcome.failures);
    // Filtered runs are exploratory; only a full run fails the process.
    if filter.is_some() {
        return Ok(0);
    }
    Ok(outcome.failures)
}
