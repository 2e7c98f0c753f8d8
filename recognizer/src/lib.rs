pub mod audio;
pub mod config;
pub mod params;
pub mod paths;
pub mod pipeline;
pub mod recognize;
pub mod report;
pub mod staging;
pub mod tier;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Application-specific environment variable for log filtering (overrides config).
const LOG_ENV_VAR: &str = "PERSEPHONE_ELAN_LOG";

/// Entry point for the recognizer process: configures logging, reads the
/// ELAN parameters from stdin, and runs the pipeline.
///
/// Logging goes to a file under the XDG state directory because stdout
/// carries the `PROGRESS:`/`RESULT:` lines ELAN watches for.
pub async fn run() -> Result<()> {
    let config = config::Config::load().unwrap_or_default();

    let log_path = paths::log_path().context("Failed to determine log path")?;
    let log_dir = log_path.parent().context("Log path has no parent")?;
    let log_filename = log_path.file_name().context("Log path has no file name")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // PERSEPHONE_ELAN_LOG env var overrides the config file level
    let filter = EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(config.logging.level.as_directive().parse()?)
        .from_env()?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(filter)
        .init();

    let params = params::Params::read(std::io::stdin().lock())
        .context("Failed to read ELAN parameters from stdin")?;

    let mut reporter = report::Reporter::new(std::io::stdout());
    let result = async {
        let python = config
            .tools
            .python
            .clone()
            .unwrap_or_else(|| "python3".into());
        let exp_dir = params.require_path("exp_dir")?;
        let mut recognizer = recognize::PersephoneRecognizer::new(python, exp_dir)?;
        pipeline::run(&params, &config, &mut recognizer, &mut reporter).await
    }
    .await;

    match result {
        Ok(()) => {
            reporter.done()?;
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = ?e, "Recognition failed");
            let _ = reporter.failed();
            Err(e)
        }
    }
}
