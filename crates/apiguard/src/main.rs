use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use apiguard_diff::CheckMode;
use apiguard_export::ExporterConfig;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use mimalloc::MiMalloc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

mod engine;

// Use mimalloc for better performance on allocation-heavy runs (large
// exports parse into many small strings).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Guard a module's public API surface against unreviewed breaking changes.
///
/// apiguard snapshots the externally visible symbols of each target via the
/// configured exporter, stores per-target baselines, and fails the build
/// when a newer surface removes or changes symbols the baseline promised.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Directory holding one baseline file per target
    #[arg(long, global = true, default_value = "api-baselines")]
    baseline_dir: PathBuf,

    /// Upper bound in seconds for one exporter invocation
    #[arg(long, global = true, default_value_t = 600)]
    export_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record the current API surface as the baseline for each target
    ///
    /// Overwrites any prior baseline. Run this when an intentional API
    /// change has been reviewed and accepted.
    Update {
        /// Targets to snapshot
        #[arg(required = true)]
        targets: Vec<String>,

        /// Exporter command template; `{target}` and `{output}` are
        /// substituted, or appended when absent
        #[arg(long)]
        exporter: String,
    },

    /// Compare the current API surface of each target against its baseline
    ///
    /// Prints a report per target whether or not it passes; exits non-zero
    /// if any target fails or errors.
    Check {
        /// Targets to check
        #[arg(required = true)]
        targets: Vec<String>,

        /// Exporter command template; `{target}` and `{output}` are
        /// substituted, or appended when absent
        #[arg(long)]
        exporter: String,

        /// Comparison mode
        #[arg(long, value_enum, default_value = "semver")]
        mode: ModeArg,

        /// Fail when symbols were added, even in semver mode
        #[arg(long)]
        fail_on_additions: bool,
    },

    /// Print the current canonical snapshot of each target to stdout
    ///
    /// Does not read or write baselines; useful for inspecting what an
    /// update would record.
    Snapshot {
        /// Targets to snapshot
        #[arg(required = true)]
        targets: Vec<String>,

        /// Exporter command template; `{target}` and `{output}` are
        /// substituted, or appended when absent
        #[arg(long)]
        exporter: String,
    },
}

/// CLI-facing comparison mode, mapped onto the policy evaluator's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Additive changes pass unless --fail-on-additions is set
    Semver,
    /// Any surface change fails, additions included
    Strict,
}

impl From<ModeArg> for CheckMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Semver => CheckMode::Semver,
            ModeArg::Strict => CheckMode::Strict,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize structured logging. Output goes to stderr so reports and
    // snapshots on stdout remain clean for piping. Default to warn,
    // allowlist our crates.
    const CRATES: &[&str] = &[
        "apiguard",
        "apiguard_export",
        "apiguard_store",
        "apiguard_diff",
        "apiguard_schemas",
    ];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::ENTER | FmtSpan::CLOSE)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the subcommand. Returns `Ok(false)` when every target was
/// processed but at least one failed its check or errored; `Err` is
/// reserved for failures outside the per-target loop.
fn run(cli: Cli) -> Result<bool> {
    let timeout = Duration::from_secs(cli.export_timeout);
    match cli.command {
        Commands::Update { targets, exporter } => {
            let config = ExporterConfig::from_template(&exporter, timeout);
            let mut all_ok = true;
            for target in &targets {
                match engine::update_baseline(
                    &config,
                    &cli.baseline_dir,
                    target,
                ) {
                    Ok(()) => println!("{target}: baseline updated"),
                    Err(err) => {
                        eprintln!("error: {err:#}");
                        all_ok = false;
                    }
                }
            }
            Ok(all_ok)
        }
        Commands::Check {
            targets,
            exporter,
            mode,
            fail_on_additions,
        } => {
            let config = ExporterConfig::from_template(&exporter, timeout);
            let mut all_passed = true;
            for target in &targets {
                match engine::check_target(
                    &config,
                    &cli.baseline_dir,
                    target,
                    mode.into(),
                    fail_on_additions,
                ) {
                    Ok(decision) => {
                        let verdict =
                            if decision.passed { "pass" } else { "FAIL" };
                        println!("{target}: {verdict}");
                        for line in decision.report.lines() {
                            println!("  {line}");
                        }
                        all_passed &= decision.passed;
                    }
                    Err(err) => {
                        println!("{target}: error");
                        eprintln!("error: {err:#}");
                        all_passed = false;
                    }
                }
            }
            Ok(all_passed)
        }
        Commands::Snapshot { targets, exporter } => {
            let config = ExporterConfig::from_template(&exporter, timeout);
            // Lock stdout once up front rather than on each write call.
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            let mut all_ok = true;
            for target in &targets {
                match engine::current_snapshot(&config, target) {
                    Ok(snapshot) => {
                        let bytes = snapshot.to_canonical_bytes()?;
                        out.write_all(&bytes)?;
                        writeln!(out)?;
                    }
                    Err(err) => {
                        eprintln!("error: {err:#}");
                        all_ok = false;
                    }
                }
            }
            Ok(all_ok)
        }
    }
}
