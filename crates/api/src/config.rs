use helpdesk_events::RunnerConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for queued notifications to drain on shutdown
    /// (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Notification runner sizing and message links.
    pub notify: NotifyConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`      |
    ///
    /// See [`NotifyConfig::from_env`] for the notification variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            request_timeout_secs,
            shutdown_timeout_secs,
            notify: NotifyConfig::from_env(),
        }
    }
}

/// Notification delivery configuration.
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    /// Worker pool and queue sizing for background sends.
    pub runner: RunnerConfig,
    /// Base URL of the web UI; enables the `View:` link in messages.
    pub public_base_url: Option<String>,
}

impl NotifyConfig {
    /// | Env Var                 | Default |
    /// |-------------------------|---------|
    /// | `NOTIFY_WORKERS`        | `8`     |
    /// | `NOTIFY_QUEUE_CAPACITY` | `256`   |
    /// | `PUBLIC_BASE_URL`       | unset   |
    pub fn from_env() -> Self {
        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            runner: RunnerConfig::from_env(),
            public_base_url,
        }
    }
}
