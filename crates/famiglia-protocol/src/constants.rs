/// Maximum number of journal entries a hierarchy retains by default.
/// Older events are evicted first once the limit is reached.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1024;

/// Default configuration file name, looked up under the user config dir.
pub const DEFAULT_CONFIG_FILE: &str = "famiglia.toml";

/// Application directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "famiglia";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "FAMIGLIA_";

/// Default log level filter.
pub const DEFAULT_LOG_LEVEL: &str = "info";
