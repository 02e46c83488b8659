use std::env;

/// Environment variable holding a `tracing` filter directive
pub const LOG_ENV: &str = "TSCAT_LOG";

/// Runtime settings resolved from CLI flags and the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub color: bool,
}

impl Settings {
    /// `TSCAT_LOG` wins over `--verbose`; `NO_COLOR` (any value) disables colors
    pub fn from_env(verbose: bool, no_color: bool) -> Self {
        let log_filter = env::var(LOG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::default_filter(verbose).to_string());
        let color = !no_color && env::var_os("NO_COLOR").is_none();
        Self { log_filter, color }
    }

    pub fn default_filter(verbose: bool) -> &'static str {
        if verbose {
            "tscat=debug"
        } else {
            "warn"
        }
    }
}
