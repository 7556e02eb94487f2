//! Runtime settings from the environment, plus log setup.
//!
//! - `LESSPASS_LOG`: tracing filter (e.g. `debug`). Unset means no logging,
//!   so stderr carries nothing but the error line.
//! - `LESSPASS_CLIPBOARD_TIMEOUT`: seconds the clipboard is held on Linux.

use std::time::Duration;

use tracing::warn;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_ENV: &str = "LESSPASS_LOG";
pub const CLIPBOARD_TIMEOUT_ENV: &str = "LESSPASS_CLIPBOARD_TIMEOUT";
pub const DEFAULT_CLIPBOARD_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: Option<String>,
    pub clipboard_timeout: Duration,
    /// Raw timeout value that could not be parsed; reported once logging is up.
    rejected_timeout: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = lookup(LOG_ENV).filter(|v| !v.trim().is_empty());
        let (clipboard_timeout, rejected_timeout) = match lookup(CLIPBOARD_TIMEOUT_ENV) {
            None => (DEFAULT_CLIPBOARD_TIMEOUT, None),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => (Duration::from_secs(secs), None),
                Err(_) => (DEFAULT_CLIPBOARD_TIMEOUT, Some(raw)),
            },
        };
        Self {
            log_filter,
            clipboard_timeout,
            rejected_timeout,
        }
    }

    /// Installs the stderr subscriber when `LESSPASS_LOG` is set.
    pub fn init_tracing(&self) {
        let Some(directives) = self.log_filter.as_deref() else {
            return;
        };

        let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(true);

        let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();

        if let Some(raw) = &self.rejected_timeout {
            warn!(value = %raw, default = ?DEFAULT_CLIPBOARD_TIMEOUT, "ignoring {}", CLIPBOARD_TIMEOUT_ENV);
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: None,
            clipboard_timeout: DEFAULT_CLIPBOARD_TIMEOUT,
            rejected_timeout: None,
        }
    }
}


// end of source
