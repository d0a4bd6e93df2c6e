use std::env;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;

static DEFAULT_API_URL: &str = "https://mate.academy/students-api";
static ENV_API_URL: &str = "TODO_SYNC_API_URL";
static ENV_USER_ID: &str = "TODO_SYNC_USER_ID";
static ENV_NOTIFICATION_TTL_MS: &str = "TODO_SYNC_NOTIFICATION_TTL_MS";
static ENV_TIMEOUT_SECS: &str = "TODO_SYNC_TIMEOUT_SECS";
static ENV_RELEASE_LOCK_ON_DELETE_FAILURE: &str = "TODO_SYNC_RELEASE_LOCK_ON_DELETE_FAILURE";

const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Values supplied on the command line; anything left unset falls back to the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub owner_id: Option<u64>,
    pub release_lock_on_delete_failure: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    api_url: String,
    owner_id: u64,
    notification_ttl: Duration,
    request_timeout: Duration,
    release_lock_on_delete_failure: bool,
}

impl AppConfig {
    /// Construct [`AppConfig`] from the provided overrides, environment variables, and defaults.
    pub fn discover(overrides: ConfigOverrides) -> Result<Self> {
        Self::resolve(overrides, |key| env::var(key).ok())
    }

    fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = overrides
            .api_url
            .or_else(|| lookup(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let owner_id = match overrides.owner_id {
            Some(id) => id,
            None => {
                let raw = lookup(ENV_USER_ID).ok_or_else(|| {
                    anyhow!("No user id configured: pass --user-id or set {ENV_USER_ID}")
                })?;
                raw.trim()
                    .parse()
                    .with_context(|| format!("{ENV_USER_ID} must be a positive integer"))?
            }
        };

        let mut config = Self::new(api_url, owner_id)?;
        if let Some(ms) = parse_u64(&lookup, ENV_NOTIFICATION_TTL_MS)? {
            config.notification_ttl = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_u64(&lookup, ENV_TIMEOUT_SECS)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        let release = match overrides.release_lock_on_delete_failure {
            Some(flag) => Some(flag),
            None => parse_flag(&lookup, ENV_RELEASE_LOCK_ON_DELETE_FAILURE)?,
        };
        if let Some(flag) = release {
            config.release_lock_on_delete_failure = flag;
        }
        Ok(config)
    }

    /// Construct [`AppConfig`] directly, keeping default timings.
    ///
    /// The base url must be an absolute http(s) url without a query or fragment; resource
    /// paths are appended to it.
    pub fn new(api_url: impl Into<String>, owner_id: u64) -> Result<Self> {
        if owner_id == 0 {
            bail!("A non-zero user id is required to talk to the todo service");
        }
        let api_url = api_url.into().trim().trim_end_matches('/').to_string();
        if api_url.is_empty() {
            bail!("API url cannot be empty");
        }
        let parsed =
            Url::parse(&api_url).with_context(|| format!("API url '{api_url}' is not valid"))?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            bail!("API url '{api_url}' must be an http(s) base url");
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            bail!("API url '{api_url}' must not carry a query or fragment");
        }
        Ok(Self {
            api_url,
            owner_id,
            notification_ttl: DEFAULT_NOTIFICATION_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            release_lock_on_delete_failure: false,
        })
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_release_lock_on_delete_failure(mut self, release: bool) -> Self {
        self.release_lock_on_delete_failure = release;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn owner_id(&self) -> u64 {
        self.owner_id
    }

    pub fn notification_ttl(&self) -> Duration {
        self.notification_ttl
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Whether a failed single delete unlocks input instead of keeping the row marked busy.
    pub fn release_lock_on_delete_failure(&self) -> bool {
        self.release_lock_on_delete_failure
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be an integer")),
        None => Ok(None),
    }
}

fn parse_flag<F>(lookup: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            other => Err(anyhow!("{key} must be true or false, got '{other}'")),
        },
        None => Ok(None),
    }
}
