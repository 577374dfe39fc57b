use serde::Deserialize;
use std::fs;
use time::{macros::format_description, Date};
use uuid::{uuid, Uuid};

pub const CONFIG_ENV: &str = "SEED_CONFIG";
pub const DEFAULT_USER_ID: Uuid = uuid!("0337bc65-4e22-4233-8f71-ce1855154b11");

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Owner of every generated row.
    pub user_id: Uuid,
    /// Named in the script header when set.
    pub student_name: Option<String>,
    /// First simulated day, `YYYY-MM-DD`.
    pub start_date: String,
    pub target_records: usize,
    /// Fixed seed for reproducible output; entropy when absent.
    pub seed: Option<u64>,
    pub country: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID,
            student_name: None,
            start_date: "2023-12-01".to_string(),
            target_records: 1000,
            seed: None,
            country: footprint_client::domain::DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn start_date(&self) -> anyhow::Result<Date> {
        Date::parse(&self.start_date, format_description!("[year]-[month]-[day]"))
            .map_err(|e| anyhow::anyhow!("invalid generator.start_date '{}': {e}", self.start_date))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Rows buffered before each write to stdout.
    pub batch_size: usize,
    /// Emit a progress comment every this many rows.
    pub progress_interval: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            progress_interval: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generator: GeneratorConfig,
    pub sink: SinkConfig,
}

impl AppConfig {
    /// Read the TOML file named by `SEED_CONFIG`, or use the built-in
    /// defaults when the variable is unset.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        match env::var(CONFIG_ENV) {
            Ok(path) => {
                let contents = fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("failed to read config '{path}': {e}"))?;
                Self::from_toml_str(&contents)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.generator.start_date()?;
        if cfg.sink.progress_interval == 0 || cfg.sink.batch_size == 0 {
            anyhow::bail!("sink.batch_size and sink.progress_interval must be positive");
        }
        Ok(cfg)
    }
}
