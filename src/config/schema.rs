//! Configuration schema and environment loading.
//!
//! All settings come from environment variables with defaults; there is no
//! config file. Parsing distinguishes fatal errors (bad port, bad target
//! URL) from best-effort warnings (bad health-check URL, bad durations),
//! which fall back to defaults and are logged by the caller.

use std::collections::BTreeSet;
use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_TARGET_URL: &str = "https://example.com";
pub const DEFAULT_HEALTH_CHECK_URL: &str = "https://example.com/healthz";
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SUCCESS_CODE: u16 = 200;

/// Fatal configuration errors. These abort startup before any socket is
/// bound; everything else degrades to a default with a warning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid SERVER_PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        source: std::num::ParseIntError,
    },

    #[error("invalid TARGET_URL {value:?}: {source}")]
    InvalidTargetUrl {
        value: String,
        source: url::ParseError,
    },
}

/// Non-fatal findings produced while loading; the caller decides how to
/// present them (logged at startup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// HEALTH_CHECK_URL did not parse; the default is used instead.
    InvalidHealthCheckUrl { value: String, error: String },
    /// A duration variable did not parse; the default is used instead.
    InvalidDuration { name: &'static str, value: String },
    /// An entry in HEALTH_CHECK_SUCCESS_CODE did not parse and was skipped.
    InvalidSuccessCode { value: String },
    /// Target and health-check URLs point at different hosts.
    HostnameMismatch { target: String, health: String },
}

/// Immutable runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Port the gate listens on.
    pub server_port: u16,

    /// Destination for redirects while the target is healthy.
    pub target_url: Url,

    /// Endpoint probed by the monitor loop.
    pub health_check_url: Url,

    /// Time between probes.
    pub interval: Duration,

    /// Per-probe timeout.
    pub timeout: Duration,

    /// Status codes accepted as a passing probe.
    pub accepted_statuses: BTreeSet<u16>,

    /// Expected probe response body, compared after outer trimming.
    /// `None` means the body is never inspected.
    pub expected_body: Option<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            target_url: Url::parse(DEFAULT_TARGET_URL).unwrap(),
            health_check_url: Url::parse(DEFAULT_HEALTH_CHECK_URL).unwrap(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accepted_statuses: BTreeSet::from([DEFAULT_SUCCESS_CODE]),
            expected_body: None,
        }
    }
}

impl GateConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    /// Tests inject variables here without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<(Self, Vec<ConfigWarning>), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = GateConfig::default();
        let mut warnings = Vec::new();

        if let Some(value) = lookup("SERVER_PORT") {
            config.server_port = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort {
                    value: value.clone(),
                    source,
                })?;
        }

        if let Some(value) = lookup("TARGET_URL") {
            config.target_url =
                Url::parse(&value).map_err(|source| ConfigError::InvalidTargetUrl {
                    value: value.clone(),
                    source,
                })?;
        }

        if let Some(value) = lookup("HEALTH_CHECK_URL") {
            match Url::parse(&value) {
                Ok(u) => config.health_check_url = u,
                Err(e) => warnings.push(ConfigWarning::InvalidHealthCheckUrl {
                    value,
                    error: e.to_string(),
                }),
            }
        }

        config.interval = parse_duration(&lookup, "HEALTH_CHECK_INTERVAL", config.interval, &mut warnings);
        config.timeout = parse_duration(&lookup, "HEALTH_CHECK_TIMEOUT", config.timeout, &mut warnings);

        if let Some(value) = lookup("HEALTH_CHECK_SUCCESS_CODE") {
            let mut codes = BTreeSet::new();
            for entry in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                match entry.parse::<u16>() {
                    Ok(code) => {
                        codes.insert(code);
                    }
                    Err(_) => warnings.push(ConfigWarning::InvalidSuccessCode {
                        value: entry.to_string(),
                    }),
                }
            }
            if !codes.is_empty() {
                config.accepted_statuses = codes;
            }
        }

        if let Some(value) = lookup("HEALTH_CHECK_BODY") {
            if !value.is_empty() {
                config.expected_body = Some(value);
            }
        }

        if let Some(mismatch) = config.hostname_mismatch() {
            warnings.push(mismatch);
        }

        Ok((config, warnings))
    }

    /// Report when the target and health-check URLs are not the same host.
    /// Usually a misconfiguration: the probe would gate traffic on the
    /// health of an unrelated service.
    pub fn hostname_mismatch(&self) -> Option<ConfigWarning> {
        let target = self.target_url.host_str().unwrap_or_default();
        let health = self.health_check_url.host_str().unwrap_or_default();
        if target != health {
            Some(ConfigWarning::HostnameMismatch {
                target: target.to_string(),
                health: health.to_string(),
            })
        } else {
            None
        }
    }
}

fn parse_duration<F>(
    lookup: &F,
    name: &'static str,
    default: Duration,
    warnings: &mut Vec<ConfigWarning>,
) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => match value.trim().parse::<u64>() {
            // Zero is rejected like garbage: a zero interval would make the
            // ticker panic and a zero timeout fails every probe.
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warnings.push(ConfigWarning::InvalidDuration { name, value });
                default
            }
        },
        None => default,
    }
}
