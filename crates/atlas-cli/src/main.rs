//! Atlas CLI entry point.

use std::{fmt, process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use atlas_cli::{Args, error_adapter::to_reportable};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    if let Err(err) = atlas_cli::run(&args) {
        match render(&to_reportable(&err)) {
            Ok(report) => error!("{report}"),
            Err(_) => error!("{err}"),
        }
        process::exit(1);
    }

    info!("Done");
}

/// Unknown level names fall back to `warn`.
fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level '{level}', falling back to 'warn'");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();

    info!(log_level:? = filter; "Starting Atlas");
}

fn render(diagnostic: &dyn miette::Diagnostic) -> Result<String, fmt::Error> {
    let mut report = String::new();
    miette::GraphicalReportHandler::new().render_report(&mut report, diagnostic)?;
    Ok(report)
}
