//! Top-level application orchestration.
//!
//! `src/main.rs` is a thin wrapper; this module is the real main. It:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the approximation pipeline
//! - prints weights, error summaries and plots

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, RunArgs, ShowArgs};
use crate::domain::{FitMethod, GridConfig, RunConfig, SolverOptions, TargetSpec};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `replicate` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    // `replicate` and `replicate --gamma 0.2` behave like `replicate compare ...`.
    // Clap requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Fit(args) => handle_run(&args.run, vec![args.method]),
        Command::Compare(args) => handle_run(&args, FitMethod::ALL.to_vec()),
        Command::Show(args) => handle_show(args),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(args: &RunArgs, methods: Vec<FitMethod>) -> Result<(), AppError> {
    let config = run_config_from_args(args, methods);
    let run = pipeline::run_approximation(&config)?;

    println!("{}", crate::report::format_run_summary(&config));
    for fit in &run.fits {
        println!("{}", crate::report::format_weights(&config.strikes, config.parity, fit));
    }
    println!("{}", crate::report::format_error_summary(&run.table));
    print_plot_and_artifacts(&config, &run);
    Ok(())
}

fn print_plot_and_artifacts(config: &RunConfig, run: &pipeline::RunOutput) {
    if config.plot {
        let plot = crate::plot::render_comparison_plot(&run.table, config.plot_width, config.plot_height);
        println!("{plot}");
    }
    if let Some(path) = &config.export_json {
        println!("Report written to {}", path.display());
    }
    for path in &run.artifacts {
        println!("Wrote {}", path.display());
    }
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let report = crate::io::read_fit_json(&args.report)?;

    println!(
        "Report from {} ({}) | spot={:.2} | strikes={}",
        report.tool,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.spot,
        report.strikes.len()
    );
    println!();
    for fit in &report.fits {
        println!("{}", crate::report::format_method_report(fit));
    }

    if args.plot {
        let grid = GridConfig::default();
        let plot = crate::plot::render_report_plot(
            &report,
            grid.lower_mult * report.spot,
            grid.upper_mult * report.spot,
            args.width_cols,
            args.height_rows,
        );
        println!("{plot}");
    }
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs, methods: Vec<FitMethod>) -> RunConfig {
    let target = match &args.target_csv {
        Some(path) => TargetSpec::Table(path.clone()),
        None => TargetSpec::Catalog {
            kind: args.target,
            center: args.center,
            width: args.width,
        },
    };

    let grid = GridConfig {
        points: args.grid_points,
        lower_mult: args.grid_lower,
        upper_mult: args.grid_upper,
    };

    RunConfig {
        strikes: args.strikes.clone(),
        spot: args.spot,
        methods,
        regularization: args.gamma,
        parity: args.parity.into(),
        target,
        grid,
        solver: SolverOptions {
            l1_max_iter: args.l1_max_iter,
            weighted_max_iter: args.weighted_max_iter,
            ..SolverOptions::default()
        },
        eval_grid: GridConfig {
            points: args.eval_points,
            ..grid
        },
        plot: args.plot && !args.no_plot,
        plot_width: args.width_cols,
        plot_height: args.height_rows,
        export_json: args.export_json.clone(),
        out_dir: args.out_dir.clone(),
    }
}

/// Rewrite argv so `replicate` defaults to `replicate compare`.
///
/// Rules:
/// - `replicate`                         -> `replicate compare`
/// - `replicate --gamma 0.2 ...`         -> `replicate compare --gamma 0.2 ...`
/// - `replicate --help/--version/-h`     -> unchanged (top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("compare".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "compare" | "show");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "compare".to_string());
    }
    argv
}
