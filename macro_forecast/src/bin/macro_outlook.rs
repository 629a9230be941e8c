use anyhow::{bail, Context, Result};
use macro_forecast::config::OutlookConfig;
use macro_forecast::export;
use macro_forecast::pipeline::Pipeline;
use macro_forecast::source::{DataSource, SampleSource, WorldBankSource};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage: macro_outlook [--config FILE] [--source sample|worldbank] [--horizon N] [--out DIR]";

struct Args {
    config: Option<PathBuf>,
    source: String,
    horizon: Option<usize>,
    out: PathBuf,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        config: None,
        source: "sample".to_string(),
        horizon: None,
        out: PathBuf::from("outlook"),
    };

    let mut it = env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || it.next().with_context(|| format!("{} needs a value\n{}", flag, USAGE));
        match flag.as_str() {
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--source" => args.source = value()?,
            "--horizon" => {
                args.horizon = Some(value()?.parse().context("--horizon must be a positive integer")?)
            }
            "--out" => args.out = PathBuf::from(value()?),
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }

    Ok(args)
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = parse_args()?;

    let mut config = match &args.config {
        Some(path) => OutlookConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OutlookConfig::default(),
    };
    if let Some(horizon) = args.horizon {
        config = config.with_horizon(horizon);
    }

    let world_bank;
    let source: &dyn DataSource = match args.source.as_str() {
        "sample" => &SampleSource,
        "worldbank" => {
            world_bank = WorldBankSource::new(Duration::from_secs(config.request_timeout_secs))?;
            &world_bank
        }
        other => bail!("unknown source '{}'\n{}", other, USAGE),
    };

    let report = Pipeline::new(config, source)?.run()?;

    for failure in &report.fetch_failures {
        warn!(indicator = %failure.name, error = %failure.error, "indicator skipped");
    }
    for outlook in &report.indicators {
        match &outlook.forecast_error {
            None => info!(indicator = %outlook.name, rows = outlook.series.len(), "forecast ready"),
            Some(error) => warn!(indicator = %outlook.name, %error, "history only"),
        }
    }

    let written = export::write_outputs(&report, &args.out)?;
    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}
