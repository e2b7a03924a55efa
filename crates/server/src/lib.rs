//! District Matcher Server
//!
//! HTTP boundary for the district matcher, plus the shared setup used by the
//! server and load-generator binaries.
//!
//! # Example
//!
//! ```ignore
//! use district_matcher_server::run_server;
//!
//! run_server(listener, matcher, shutdown).await?;
//! ```

pub mod handler;
pub mod protocol;
pub mod transport;

pub use protocol::{MatchParams, MatchResponse, ParamsError, Perf};
pub use transport::http::{router, run_server};

use district_matcher::MatcherConfig;
use std::path::Path;

/// Read a TOML config file, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MatcherConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(MatcherConfig::from_toml(&text)?)
        }
        None => Ok(MatcherConfig::default()),
    }
}

/// Install the tracing subscriber used by the binaries. `log` records from
/// the matcher are forwarded through `tracing-log`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "district_matcher_server=info,district_matcher=info,info".into()
            }),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_config_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), MatcherConfig::default());
    }

    #[test]
    fn test_load_config_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_capacity = 32\nroots = [\"states\"]").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.cache_capacity, 32);
        assert_eq!(config.roots, vec!["states"]);
    }

    #[test]
    fn test_load_config_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache_capacity = 0").unwrap();

        assert!(load_config(Some(file.path())).is_err());
    }
}
