use std::{collections::HashMap, net::SocketAddr, time::Duration};

use anyhow::Context;
use config::{ConfigError, Environment, File, FileFormat, builder::DefaultState};
use dotenvy::vars;
use sanitation_core::{DEFAULT_PENALTY, PenaltyTable};

const DEFAULT_DATABASE_URL: &str = "sqlite://smart_san.db?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_MODEL_PATH: &str = "models/yolov8n.onnx";
const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.3;
const DEFAULT_DETECTION_TIMEOUT_SECS: i64 = 30;

pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub model_path: String,
    pub confidence_threshold: f32,
    pub detection_timeout: Duration,
    pub penalties: PenaltyTable,
}

/// Read the configuration from `SANITATION_*` variables, `.env` and
/// `config.toml`, in that order of precedence (last wins).
pub fn parse_config() -> anyhow::Result<Config> {
    let dotenv_variables = HashMap::from_iter(vars());

    let builder = with_defaults(config::ConfigBuilder::<DefaultState>::default())?
        .add_source(Environment::default().prefix("SANITATION"))
        .add_source(Environment::default().source(Some(dotenv_variables)))
        .add_source(File::new("config.toml", FileFormat::Toml).required(false));

    let config = builder.build().context("Failed to build configuration")?;

    from_config(&config)
}

fn with_defaults(
    builder: config::ConfigBuilder<DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<DefaultState>> {
    let builder = builder
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("bind_addr", DEFAULT_BIND_ADDR)?
        .set_default("model_path", DEFAULT_MODEL_PATH)?
        .set_default("confidence_threshold", DEFAULT_CONFIDENCE_THRESHOLD)?
        .set_default("detection_timeout_secs", DEFAULT_DETECTION_TIMEOUT_SECS)?
        .set_default("default_penalty", i64::from(DEFAULT_PENALTY))?;

    Ok(builder)
}

fn from_config(config: &config::Config) -> anyhow::Result<Config> {
    let database_url = config
        .get_string("database_url")
        .context("You should define the DATABASE_URL.")?;

    let bind_addr = config
        .get_string("bind_addr")?
        .parse::<SocketAddr>()
        .context("Invalid BIND_ADDR")?;

    let model_path = config.get_string("model_path")?;

    let confidence_threshold = config
        .get_float("confidence_threshold")
        .context("CONFIDENCE_THRESHOLD should be a number between 0 and 1.")?;
    if !(0.0..=1.0).contains(&confidence_threshold) {
        anyhow::bail!("CONFIDENCE_THRESHOLD should be between 0 and 1, got {confidence_threshold}");
    }

    let detection_timeout_secs = config
        .get_int("detection_timeout_secs")
        .context("DETECTION_TIMEOUT_SECS should be an integer.")?;
    let detection_timeout = Duration::from_secs(
        u64::try_from(detection_timeout_secs).context("DETECTION_TIMEOUT_SECS can't be negative")?,
    );

    let default_penalty = u32::try_from(config.get_int("default_penalty")?)
        .context("DEFAULT_PENALTY can't be negative")?;

    let overrides = match config.get::<HashMap<String, u32>>("penalties") {
        Ok(overrides) => overrides,
        Err(ConfigError::NotFound(_)) => HashMap::new(),
        Err(e) => return Err(e).context("`penalties` should map labels to deductions"),
    };

    let penalties = PenaltyTable::default()
        .with_overrides(overrides)
        .with_default_penalty(default_penalty);

    Ok(Config {
        database_url,
        bind_addr,
        model_path,
        confidence_threshold: confidence_threshold as f32,
        detection_timeout,
        penalties,
    })
}
