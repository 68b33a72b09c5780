use serde::Deserialize;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use url::Url;

/// Environment variable that overrides the primary archive address.
pub const ORTHANC_URL_ENV: &str = "ORTHANC_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
	pub telemetry: TelemetryConfig,
	pub server: ServerConfig,
	pub archive: ArchiveConfig,
	pub records: RecordsConfig,
}

impl AppConfig {
	pub fn new() -> Result<Self, config::ConfigError> {
		Self::from_sources(None, std::env::var(ORTHANC_URL_ENV).ok())
	}

	/// Builds the configuration. `env` replaces the process environment if given.
	fn from_sources(
		env: Option<config::Map<String, String>>,
		orthanc_url: Option<String>,
	) -> Result<Self, config::ConfigError> {
		use config::Config;
		let s = Config::builder()
			.add_source(config::File::from_str(
				include_str!("defaults.toml"),
				config::FileFormat::Toml,
			))
			.add_source(config::File::with_name("config.toml").required(false))
			.add_source(
				config::Environment::with_prefix("VETCASE")
					.prefix_separator("_")
					.separator("__")
					.try_parsing(true)
					.source(env),
			)
			.set_override_option("archive.primary", orthanc_url)?
			.build()?;

		s.try_deserialize()
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
	/// Default log level. `RUST_LOG` takes precedence when set.
	pub level: LogLevel,
	/// Sentry DSN. Sentry stays disabled if absent.
	pub sentry: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl From<LogLevel> for Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Trace => Self::TRACE,
			LogLevel::Debug => Self::DEBUG,
			LogLevel::Info => Self::INFO,
			LogLevel::Warn => Self::WARN,
			LogLevel::Error => Self::ERROR,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
	pub http: HttpServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
	/// The interface the HTTP server will be listening on
	pub interface: IpAddr,
	/// The port for the HTTP server
	pub port: u16,
	/// Path prefix under which all routes are mounted
	pub base_path: String,
	/// Request timeout in seconds
	pub request_timeout: u64,
	pub graceful_shutdown: bool,
}

/// Addresses of the image archives that are queried for series.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
	/// Base URL of the archive that is queried first.
	pub primary: Url,
	/// Base URL of the archive that is queried if the primary is unavailable.
	pub fallback: Url,
	/// Timeout for a single archive request in milliseconds.
	pub timeout: u64,
}

impl ArchiveConfig {
	pub const fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout)
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum RecordsConfig {
	/// Built-in table of demo cases.
	Memory,
	/// JSON file containing an array of patient records.
	File { path: PathBuf },
}
