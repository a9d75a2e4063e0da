//! Configuration types for the dashboard server and the offline cache worker.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default listening port when neither the config file nor `PORT` set one.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable that overrides the listening port.
pub const PORT_ENV: &str = "PORT";

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Listening port.
    pub port: u16,
    /// Directory served as the document root.
    pub web_root: PathBuf,
}

impl ServerConfig {
    /// Base URL the server answers on, with a trailing slash.
    #[must_use]
    pub fn origin(&self) -> String {
        if self.host.contains(':') {
            format!("http://[{}]:{}/", self.host, self.port)
        } else {
            format!("http://{}:{}/", self.host, self.port)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            web_root: PathBuf::from("web"),
        }
    }
}

/// Offline cache worker configuration.
///
/// The cache name is the only invalidation mechanism: bump it whenever the
/// precache list or the assets behind it change, and the next activation
/// deletes every bucket with a different name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Version string naming the current cache bucket.
    pub cache_name: String,
    /// URLs fetched and stored at install time, relative to `scope`.
    pub precache: Vec<String>,
    /// Base URL the worker controls; relative URLs resolve against it.
    ///
    /// Unset means the origin of the server this worker is shipped with,
    /// see [`AppConfig::worker_config`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_name: "20201215.1".to_string(),
            precache: vec![
                "./".to_string(),
                "resources/site.css".to_string(),
                "resources/app.js".to_string(),
            ],
            scope: None,
        }
    }
}

impl WorkerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache bucket name.
    #[must_use]
    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    /// Replaces the precache list.
    #[must_use]
    pub fn with_precache<I, T>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.precache = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the worker scope.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Offline cache worker settings.
    pub worker: WorkerConfig,
}

impl AppConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bind address.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.server.host = host.into();
        self
    }

    /// Sets the listening port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.server.port = port;
        self
    }

    /// Sets the document root.
    #[must_use]
    pub fn with_web_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.server.web_root = root.into();
        self
    }

    /// Sets the worker configuration.
    #[must_use]
    pub fn with_worker(mut self, worker: WorkerConfig) -> Self {
        self.worker = worker;
        self
    }

    /// Returns the worker settings, with an unset scope filled in from the
    /// server's current host and port.
    #[must_use]
    pub fn worker_config(&self) -> WorkerConfig {
        let mut worker = self.worker.clone();
        if worker.scope.is_none() {
            worker.scope = Some(self.server.origin());
        }
        worker
    }

    /// Default location of the configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hgdash").join("hgdash.toml"))
    }

    /// Loads configuration from a TOML file, then applies the `PORT` override.
    ///
    /// With `path` set, the file must exist. Without it, the default location
    /// is tried and silently skipped when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        if let Some(port) = port_override(std::env::var(PORT_ENV).ok().as_deref()) {
            config.server.port = port;
        }
        Ok(config)
    }

    /// Parses configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

/// Interprets the value of the `PORT` environment variable.
///
/// Unset or empty means no override. A value that is not a port number is
/// logged and ignored.
#[must_use]
pub fn port_override(value: Option<&str>) -> Option<u16> {
    let value = value.map(str::trim).filter(|v| !v.is_empty())?;
    match value.parse() {
        Ok(port) => Some(port),
        Err(e) => {
            log::warn!("Ignoring {PORT_ENV}={value:?}: {e}");
            None
        }
    }
}
