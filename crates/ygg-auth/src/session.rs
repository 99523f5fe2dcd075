use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{AuthenticateResponse, Profile, RefreshResponse, User};

/// Tokens and identity held by a client between calls
///
/// Only replaced as a whole after a successful authenticate or refresh.
/// Serializable so callers can persist it; nothing here touches the disk.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub client_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl Session {
    /// Fresh session for an installation, with no access token yet
    pub fn new(client_token: impl Into<String>) -> Self {
        Self {
            client_token: client_token.into(),
            ..Default::default()
        }
    }

    /// Whether an access token has been obtained
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Name of the selected profile, if any
    pub fn player_name(&self) -> Option<&str> {
        self.selected_profile.as_ref().map(|p| p.name.as_str())
    }

    /// Session after a successful authenticate
    ///
    /// Access token, selected profile and user come from the response; the
    /// client token stays the installation's own.
    pub fn after_authenticate(&self, response: &AuthenticateResponse) -> Self {
        Self {
            access_token: response.access_token.clone(),
            client_token: self.client_token.clone(),
            selected_profile: response.selected_profile.clone(),
            user: response.user.clone(),
        }
    }

    /// Session after a successful refresh, keeping the client token
    pub fn after_refresh(&self, response: &RefreshResponse) -> Self {
        Self {
            access_token: response.access_token.clone(),
            client_token: self.client_token.clone(),
            selected_profile: response.selected_profile.clone(),
            user: response.user.clone(),
        }
    }
}

// Tokens must never end up in logs
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &redact(&self.access_token))
            .field("client_token", &self.client_token)
            .field("selected_profile", &self.selected_profile)
            .field("user", &self.user)
            .finish()
    }
}

fn redact(token: &str) -> &'static str {
    if token.is_empty() { "<none>" } else { "<redacted>" }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steve() -> Profile {
        Profile {
            id: "P1".to_string(),
            name: "Steve".to_string(),
            legacy: false,
        }
    }

    #[test]
    fn test_new_session_is_unauthenticated() {
        let session = Session::new("CT1");
        assert_eq!(session.client_token, "CT1");
        assert!(!session.is_authenticated());
        assert!(session.player_name().is_none());
    }

    #[test]
    fn test_after_authenticate_keeps_client_token() {
        let response = AuthenticateResponse {
            access_token: "AT1".to_string(),
            client_token: "SERVER".to_string(),
            available_profiles: vec![steve()],
            selected_profile: Some(steve()),
            user: Some(User {
                id: "U1".to_string(),
                properties: vec![],
            }),
        };

        let session = Session::new("CT1").after_authenticate(&response);
        assert!(session.is_authenticated());
        assert_eq!(session.access_token, "AT1");
        assert_eq!(session.client_token, "CT1");
        assert_eq!(session.player_name(), Some("Steve"));
        assert_eq!(session.user.as_ref().map(|u| u.id.as_str()), Some("U1"));
    }

    #[test]
    fn test_after_refresh_replaces_profile_and_user() {
        let before = Session {
            access_token: "AT1".to_string(),
            client_token: "CT1".to_string(),
            selected_profile: Some(steve()),
            user: Some(User {
                id: "U1".to_string(),
                properties: vec![],
            }),
        };
        let response = RefreshResponse {
            access_token: "AT2".to_string(),
            client_token: "SERVER".to_string(),
            selected_profile: None,
            user: None,
        };

        let session = before.after_refresh(&response);
        assert_eq!(session.access_token, "AT2");
        assert_eq!(session.client_token, "CT1");
        assert!(session.selected_profile.is_none());
        assert!(session.user.is_none());
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let mut session = Session::new("CT1");
        assert!(format!("{:?}", session).contains("<none>"));

        session.access_token = "secret-access-token".to_string();
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-access-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_serde_persistence() {
        let session = Session {
            access_token: "AT1".to_string(),
            client_token: "CT1".to_string(),
            selected_profile: Some(steve()),
            user: None,
        };

        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("\"user\""));
        let loaded: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, session);
    }
}
