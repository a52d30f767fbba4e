use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Days after arrival during which per-booking ledger actions stay open.
    #[serde(default = "default_post_arrival_action_days")]
    pub post_arrival_action_days: i64,
    /// Load the built-in sample inventory at startup.
    #[serde(default = "default_seed_on_startup")]
    pub seed_on_startup: bool,
}

fn default_post_arrival_action_days() -> i64 {
    5
}

fn default_seed_on_startup() -> bool {
    true
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            post_arrival_action_days: default_post_arrival_action_days(),
            seed_on_startup: default_seed_on_startup(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Base file, then the per-environment file, then an uncommitted
            // local override. All optional; the serde defaults cover missing
            // keys, so the binary boots with no config directory at all.
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Environment wins over files: TREKFLOW_SERVER__PORT=9000 etc.
            .add_source(config::Environment::with_prefix("TREKFLOW").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
