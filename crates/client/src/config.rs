//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration required to bootstrap the withdraw client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub content: ContentConfig,
    pub dry_run: DryRunConfig,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            dry_run: DryRunConfig::default(),
            session_id: None,
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `WITHDRAW_CATALOG` - Item catalog RON file (default: content/items.ron)
    /// - `WITHDRAW_GAME_STATE` - Game-state RON file (default: content/game_state.ron)
    /// - `WITHDRAW_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `WITHDRAW_LOG_DIR` - Directory for log files (default: platform-specific)
    /// - `WITHDRAW_DRY_RUN_FAIL` - Make the dry-run backend reject transfers (default: false)
    /// - `WITHDRAW_DRY_RUN_DELAY_MS` - Simulated settlement latency (default: 250)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(path) = env::var_os("WITHDRAW_CATALOG") {
            config.content.catalog = PathBuf::from(path);
        }
        if let Some(path) = env::var_os("WITHDRAW_GAME_STATE") {
            config.content.game_state = PathBuf::from(path);
        }

        config.session_id = env::var("WITHDRAW_SESSION_ID").ok();
        config.log_dir = env::var_os("WITHDRAW_LOG_DIR").map(PathBuf::from);

        if let Some(fail) = read_env_bool("WITHDRAW_DRY_RUN_FAIL") {
            config.dry_run.fail = fail;
        }
        if let Some(delay) = read_env::<u64>("WITHDRAW_DRY_RUN_DELAY_MS") {
            config.dry_run.delay = Duration::from_millis(delay);
        }

        config
    }
}

/// Content file locations.
#[derive(Clone, Debug)]
pub struct ContentConfig {
    pub catalog: PathBuf,
    pub game_state: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from("content/items.ron"),
            game_state: PathBuf::from("content/game_state.ron"),
        }
    }
}

/// Behaviour of the dry-run transfer backend.
#[derive(Clone, Debug)]
pub struct DryRunConfig {
    pub fail: bool,
    pub delay: Duration,
}

impl Default for DryRunConfig {
    fn default() -> Self {
        Self {
            fail: false,
            delay: Duration::from_millis(250),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    parse_bool(&env::var(key).ok()?)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
