use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::{YggdrasilConfig, endpoints};
use crate::errors::{LocalFailure, Result, YggdrasilError};
use crate::models::*;
use crate::session::Session;

/// Client for a Yggdrasil auth server
///
/// Owns the current [`Session`]. Operations that change it take `&mut self`,
/// so a client serves one caller at a time; use separate clients for
/// separate accounts.
#[derive(Debug, Clone)]
pub struct YggdrasilClient {
    config: YggdrasilConfig,
    http: Client,
    session: Session,
}

impl YggdrasilClient {
    /// Create a new client for an installation's client token
    pub fn new(config: YggdrasilConfig, client_token: impl Into<String>) -> Result<Self> {
        Self::with_session(config, Session::new(client_token))
    }

    /// Create a new client with a freshly generated client token
    pub fn with_random_client_token(config: YggdrasilConfig) -> Result<Self> {
        Self::new(config, Uuid::new_v4().simple().to_string())
    }

    /// Resume a session the caller persisted earlier
    pub fn with_session(config: YggdrasilConfig, session: Session) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(config.http_timeouts.connect)
            .timeout(config.http_timeouts.request)
            .user_agent(config.user_agent())
            .build()
            .map_err(LocalFailure::HttpClient)?;

        Ok(Self {
            config,
            http,
            session,
        })
    }

    pub fn config(&self) -> &YggdrasilConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn access_token(&self) -> &str {
        &self.session.access_token
    }

    pub fn client_token(&self) -> &str {
        &self.session.client_token
    }

    pub fn selected_profile(&self) -> Option<&Profile> {
        self.session.selected_profile.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    /// Log in with account credentials
    ///
    /// On success the session holds the returned access token, profile and user.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        agent_name: &str,
        agent_version: u32,
    ) -> Result<AuthenticateResponse> {
        let request = AuthenticateRequest {
            agent: Agent::new(agent_name, agent_version),
            username: username.to_string(),
            password: password.to_string(),
            client_token: self.session.client_token.clone(),
            request_user: true,
        };

        debug!("Authenticating with Yggdrasil");
        let (status, body) = self.post(endpoints::AUTHENTICATE, &request).await?;
        if status != StatusCode::OK {
            return Err(remote_error(status, &body));
        }

        let response: AuthenticateResponse = decode(&body)?;
        self.session = self.session.after_authenticate(&response);
        debug!(profiles = response.available_profiles.len(), "Authenticated");
        Ok(response)
    }

    /// Exchange the current token pair for a new access token
    #[instrument(skip(self))]
    pub async fn refresh(&mut self) -> Result<RefreshResponse> {
        self.send_refresh(None).await
    }

    /// Refresh and switch the session to another profile of the account
    #[instrument(skip(self, profile), fields(profile_name = %profile.name))]
    pub async fn refresh_with_profile(&mut self, profile: Profile) -> Result<RefreshResponse> {
        self.send_refresh(Some(profile)).await
    }

    async fn send_refresh(&mut self, selected_profile: Option<Profile>) -> Result<RefreshResponse> {
        let request = RefreshRequest {
            access_token: self.session.access_token.clone(),
            client_token: self.session.client_token.clone(),
            selected_profile,
            request_user: true,
        };

        debug!("Refreshing access token");
        let (status, body) = self.post(endpoints::REFRESH, &request).await?;
        if status != StatusCode::OK {
            return Err(remote_error(status, &body));
        }

        let response: RefreshResponse = decode(&body)?;
        self.session = self.session.after_refresh(&response);
        Ok(response)
    }

    /// Check whether the current token pair is still usable
    ///
    /// `Ok(true)` on 204. A 403 surfaces the server's error envelope as
    /// [`YggdrasilError::Remote`]. Any other status is `Ok(false)`.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> Result<bool> {
        let request = self.token_pair();

        let (status, body) = self.post(endpoints::VALIDATE, &request).await?;
        match status {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::FORBIDDEN => {
                let error: ApiError = decode(&body)?;
                debug!(error = %error.error, "Token pair rejected");
                Err(YggdrasilError::Remote { status, error })
            }
            _ => {
                debug!(%status, "Token pair not valid");
                Ok(false)
            }
        }
    }

    /// Invalidate every access token of an account
    #[instrument(skip(self, password))]
    pub async fn signout(&self, username: &str, password: &str) -> Result<()> {
        let request = SignoutRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let (status, body) = self.post(endpoints::SIGNOUT, &request).await?;
        expect_empty(status, &body)
    }

    /// Invalidate the current token pair
    #[instrument(skip(self))]
    pub async fn invalidate(&self) -> Result<()> {
        let request = self.token_pair();

        let (status, body) = self.post(endpoints::INVALIDATE, &request).await?;
        expect_empty(status, &body)
    }

    fn token_pair(&self) -> TokenPairRequest {
        TokenPairRequest {
            access_token: self.session.access_token.clone(),
            client_token: self.session.client_token.clone(),
        }
    }

    /// POST a JSON body and return the status with the full response body
    async fn post<T: Serialize>(&self, endpoint: &str, request: &T) -> Result<(StatusCode, Vec<u8>)> {
        let url = self.config.endpoint(endpoint)?;
        let payload = serde_json::to_vec(request)?;

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(%status, endpoint, len = body.len(), "Yggdrasil response");
        Ok((status, body))
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(body)?)
}

/// Decode an error envelope, falling back to a local failure when it isn't one
fn remote_error(status: StatusCode, body: &[u8]) -> YggdrasilError {
    match decode::<ApiError>(body) {
        Ok(error) => {
            warn!(%status, error = %error.error, "Yggdrasil request failed");
            YggdrasilError::Remote { status, error }
        }
        Err(err) => err,
    }
}

/// Signout and invalidate answer with an empty body on success, whatever the status
fn expect_empty(status: StatusCode, body: &[u8]) -> Result<()> {
    if body.is_empty() {
        return Ok(());
    }
    Err(remote_error(status, body))
}
