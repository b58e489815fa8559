use std::path::Path;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Settings loaded from an optional config file overlaid with `APP_*`
/// environment variables (`APP_DATABASE__URL` sets `database.url`).
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    /// Names a TOML/YAML/JSON file read before the environment. Kept outside
    /// the `APP_` namespace so it never lands in the deserialized settings.
    const FILE_VAR: &'static str = "TODO_CONFIG_FILE";

    fn load_dotenv() {
        let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
        let _ = dotenvy::from_filename(manifest_dir.join(".env")).or_else(|_| dotenvy::dotenv());
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn builder() -> Result<config_rs::ConfigBuilder<config_rs::builder::DefaultState>> {
        let mut builder = config_rs::Config::builder();

        if let Ok(path) = std::env::var(Self::FILE_VAR) {
            let path = path.trim();
            if !path.is_empty() {
                builder = builder.add_source(config_rs::File::with_name(path).required(true));
            }
        }

        Ok(builder.add_source(
            config_rs::Environment::with_prefix(Self::PREFIX)
                .prefix_separator("_")
                .separator(Self::SEPARATOR)
                .try_parsing(true),
        ))
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();

        let settings = Self::builder()?
            .build()
            .context("failed to read config sources")?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
