//! Editor configuration.
//!
//! A few knobs can be overridden through environment variables.

use std::env;
use std::time::Duration;

/// Default column width tabs expand to.
pub const DEFAULT_TAB_STOP: usize = 8;

/// Ctrl-Q presses needed to quit with unsaved changes.
pub const DEFAULT_QUIT_TIMES: u8 = 2;

/// How long a status message stays on the message bar.
pub const DEFAULT_MESSAGE_TIMEOUT_SECS: u64 = 5;

/// Raw-read poll interval in milliseconds.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 100;

/// Runtime configuration shared by the core and the terminal front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Tabs expand to the next multiple of this column.
    pub tab_stop: usize,
    /// Ctrl-Q presses required to discard unsaved changes.
    pub quit_times: u8,
    /// Display lifetime of a status message.
    pub message_timeout: Duration,
    /// Timeout for a single raw byte read.
    pub poll_timeout: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: DEFAULT_TAB_STOP,
            quit_times: DEFAULT_QUIT_TIMES,
            message_timeout: Duration::from_secs(DEFAULT_MESSAGE_TIMEOUT_SECS),
            poll_timeout: Duration::from_millis(DEFAULT_POLL_TIMEOUT_MS),
        }
    }
}

impl EditorConfig {
    /// Builds the default config, then applies `KESTREL_TAB_STOP` and
    /// `KESTREL_QUIT_TIMES` if they hold valid values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(
            env::var("KESTREL_TAB_STOP").ok().as_deref(),
            env::var("KESTREL_QUIT_TIMES").ok().as_deref(),
        );
        config
    }

    fn apply_overrides(&mut self, tab_stop: Option<&str>, quit_times: Option<&str>) {
        if let Some(raw) = tab_stop {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.tab_stop = n,
                _ => log::warn!("Ignoring invalid KESTREL_TAB_STOP={:?}", raw),
            }
        }
        if let Some(raw) = quit_times {
            match raw.trim().parse::<u8>() {
                Ok(n) if n > 0 => self.quit_times = n,
                _ => log::warn!("Ignoring invalid KESTREL_QUIT_TIMES={:?}", raw),
            }
        }
    }

    /// Returns a copy with a different tab stop. Zero is treated as one.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.tab_stop, 8);
        assert_eq!(config.quit_times, 2);
        assert_eq!(config.message_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let mut config = EditorConfig::default();
        config.apply_overrides(Some("4"), Some("3"));
        assert_eq!(config.tab_stop, 4);
        assert_eq!(config.quit_times, 3);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let mut config = EditorConfig::default();
        config.apply_overrides(Some("0"), Some("many"));
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_with_tab_stop_clamps_zero() {
        assert_eq!(EditorConfig::default().with_tab_stop(0).tab_stop, 1);
    }
}
