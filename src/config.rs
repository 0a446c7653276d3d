use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_VERSION: &str = "1.1";

/// OAuth endpoints and the REST API root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub api_base: String,
    pub request_token: String,
    pub access_token: String,
    pub authorize: String,
    pub oauth2_token: String,
    pub oauth2_invalidate_token: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            api_base: "https://api.twitter.com".to_string(),
            request_token: "https://api.twitter.com/oauth/request_token".to_string(),
            access_token: "https://api.twitter.com/oauth/access_token".to_string(),
            authorize: "https://api.twitter.com/oauth/authorize".to_string(),
            oauth2_token: "https://api.twitter.com/oauth2/token".to_string(),
            oauth2_invalidate_token: "https://api.twitter.com/oauth2/invalidate_token".to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at `base`, keeping the standard paths.
    ///
    /// Handy for staging hosts and local mock servers.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Endpoints {
            api_base: base.to_string(),
            request_token: format!("{}/oauth/request_token", base),
            access_token: format!("{}/oauth/access_token", base),
            authorize: format!("{}/oauth/authorize", base),
            oauth2_token: format!("{}/oauth2/token", base),
            oauth2_invalidate_token: format!("{}/oauth2/invalidate_token", base),
        }
    }
}

/// Settings shared by every request a [`crate::Client`] sends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Version segment of REST API urls.
    pub api_version: String,
    pub endpoints: Endpoints,
    /// Send `Expect: 100-continue` with request bodies. Off by default since
    /// the API does not answer the interim response.
    pub expect_continue: bool,
    /// Skip TLS certificate validation. Never enable this outside of testing.
    pub danger_accept_invalid_certs: bool,
    /// Client wide timeout, in seconds.
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_version: DEFAULT_API_VERSION.to_string(),
            endpoints: Endpoints::default(),
            expect_continue: false,
            danger_accept_invalid_certs: false,
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_expect_continue(mut self, enabled: bool) -> Self {
        self.expect_continue = enabled;
        self
    }

    pub fn with_danger_accept_invalid_certs(mut self, enabled: bool) -> Self {
        self.danger_accept_invalid_certs = enabled;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// `<api_base>/<api_version>/<resource>.json`
    pub fn api_url(&self, resource: &str) -> String {
        format!(
            "{}/{}/{}.json",
            self.endpoints.api_base.trim_end_matches('/'),
            self.api_version,
            resource.trim_start_matches('/')
        )
    }
}
