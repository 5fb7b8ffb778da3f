use std::env;

pub const LAUNCHER_ENV: &str = "WSL_DELEGATE_BIN";
pub const DISTRO_ENV: &str = "WSL_DELEGATE_DISTRO";
pub const LOG_ENV: &str = "WSL_DELEGATE_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program that enters the subsystem (`wsl`).
    pub launcher: String,
    /// Distribution whose root is mapped; queried from the launcher when unset.
    pub distro: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config { launcher: "wsl".to_string(), distro: None }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Config::default();
        Config {
            launcher: env::var(LAUNCHER_ENV).ok().filter(|v| !v.is_empty()).unwrap_or(defaults.launcher),
            distro: env::var(DISTRO_ENV).ok().filter(|v| !v.trim().is_empty()),
        }
    }
}
