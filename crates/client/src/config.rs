//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use arise_content::Language;
use arise_runtime::RuntimeConfig;

/// Everything the `arise` binary needs before the runtime starts.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Directory with `config.toml`, catalogs and `i18n/`; bundled content
    /// when unset.
    pub content_dir: Option<PathBuf>,
    pub language: Option<Language>,
    pub session_id: Option<String>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARISE_API_BASE_URL` - Progress API base URL, also the cache origin
    /// - `ARISE_DATA_DIR` - Durable storage root (default: platform data dir)
    /// - `ARISE_CONTENT_DIR` - Content data directory (default: bundled)
    /// - `ARISE_SYNC_INTERVAL_SECS` - Background sync period (default: 30)
    /// - `ARISE_SYNC_TIMEOUT_SECS` - Per-request timeout (default: 10)
    /// - `ARISE_MAX_RETRIES` - Attempts before an action is abandoned (default: 3)
    /// - `ARISE_SNAPSHOT_CAP` - Snapshots kept per kind (default: 50)
    /// - `ARISE_GROWTH_INTERVAL_SECS` - Crop growth tick period (default: 900)
    /// - `ARISE_EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    /// - `ARISE_COMMAND_BUFFER` - Worker command queue size (default: 32)
    /// - `ARISE_OFFLINE` - Start offline (default: false)
    /// - `ARISE_LANGUAGE` - Interface language code such as `hi`
    /// - `ARISE_SESSION_ID` - Log session name (default: timestamp based)
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let runtime = &mut config.runtime;

        if let Ok(url) = env::var("ARISE_API_BASE_URL") {
            runtime.api_base_url = url.clone();
            runtime.origin = url;
        }

        runtime.data_dir = env::var_os("ARISE_DATA_DIR")
            .map(PathBuf::from)
            .or_else(RuntimeConfig::default_data_dir);

        if let Some(secs) = read_env::<u64>("ARISE_SYNC_INTERVAL_SECS") {
            runtime.sync_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = read_env::<u64>("ARISE_SYNC_TIMEOUT_SECS") {
            runtime.sync_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(retries) = read_env::<u32>("ARISE_MAX_RETRIES") {
            runtime.max_retries = retries.max(1);
        }
        if let Some(cap) = read_env::<usize>("ARISE_SNAPSHOT_CAP") {
            runtime.snapshot_cap = cap.max(1);
        }
        if let Some(secs) = read_env::<u64>("ARISE_GROWTH_INTERVAL_SECS") {
            runtime.growth_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(capacity) = read_env::<usize>("ARISE_EVENT_BUFFER") {
            runtime.event_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("ARISE_COMMAND_BUFFER") {
            runtime.command_buffer_size = capacity.max(1);
        }

        if let Some(offline) = read_env::<bool>("ARISE_OFFLINE") {
            runtime.start_online = !offline;
        }

        config.content_dir = env::var_os("ARISE_CONTENT_DIR").map(PathBuf::from);
        config.language = read_env::<Language>("ARISE_LANGUAGE");
        config.session_id = env::var("ARISE_SESSION_ID").ok();

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
