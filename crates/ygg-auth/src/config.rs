use std::time::Duration;
use url::Url;

use crate::errors::Result;

/// Mojang's Yggdrasil auth server
pub const MOJANG_AUTH_SERVER: &str = "https://authserver.mojang.com";

/// Yggdrasil endpoint paths, relative to the server base URL
pub mod endpoints {
    pub const AUTHENTICATE: &str = "authenticate";
    pub const REFRESH: &str = "refresh";
    pub const VALIDATE: &str = "validate";
    pub const SIGNOUT: &str = "signout";
    pub const INVALIDATE: &str = "invalidate";
}

/// Agent sent with authenticate requests for the Java edition
pub const MINECRAFT_AGENT: &str = "Minecraft";
pub const MINECRAFT_AGENT_VERSION: u32 = 1;

/// Client identifier sent as User-Agent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(15),
            request: Duration::from_secs(30),
        }
    }
}

/// Configuration for YggdrasilClient
#[derive(Debug, Clone)]
pub struct YggdrasilConfig {
    /// Auth server base URL (Mojang, or any Yggdrasil-compatible server)
    pub base_url: Url,

    /// HTTP client timeouts
    pub http_timeouts: HttpTimeouts,

    /// Custom user agent (optional)
    pub user_agent: Option<String>,
}

impl YggdrasilConfig {
    /// Create config for Mojang's auth server
    pub fn mojang() -> Self {
        Self::custom(Url::parse(MOJANG_AUTH_SERVER).expect("valid auth server URL"))
    }

    /// Create config for a third-party Yggdrasil server
    ///
    /// A path prefix such as `https://example.com/api/yggdrasil/authserver` is kept.
    pub fn custom(base_url: Url) -> Self {
        Self {
            base_url,
            http_timeouts: HttpTimeouts::default(),
            user_agent: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeouts(mut self, http_timeouts: HttpTimeouts) -> Self {
        self.http_timeouts = http_timeouts;
        self
    }

    /// User agent sent on every request
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path)?)
    }
}

impl Default for YggdrasilConfig {
    fn default() -> Self {
        Self::mojang()
    }
}
