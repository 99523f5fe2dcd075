use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::config::{MINECRAFT_AGENT, MINECRAFT_AGENT_VERSION};
use crate::errors::ApiErrorKind;

/// Game the login is for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Agent {
    pub name: String,
    pub version: u32,
}

impl Agent {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }

    pub fn minecraft() -> Self {
        Self::new(MINECRAFT_AGENT, MINECRAFT_AGENT_VERSION)
    }
}

/// Game profile tied to an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// UUID without dashes
    pub id: String,
    /// Player name
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub legacy: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Account owning the profiles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<Property>,
}

impl User {
    /// First property with the given name, e.g. `preferredLanguage`
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

/// `/authenticate` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub agent: Agent,
    pub username: String,
    pub password: String,
    pub client_token: String,
    pub request_user: bool,
}

/// `/authenticate` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available_profiles: Vec<Profile>,
    #[serde(default)]
    pub selected_profile: Option<Profile>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `/refresh` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub access_token: String,
    pub client_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_profile: Option<Profile>,
    pub request_user: bool,
}

/// `/refresh` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub client_token: String,
    #[serde(default)]
    pub selected_profile: Option<Profile>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `/validate` and `/invalidate` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairRequest {
    pub access_token: String,
    pub client_token: String,
}

pub type ValidateRequest = TokenPairRequest;
pub type InvalidateRequest = TokenPairRequest;

/// `/signout` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignoutRequest {
    pub username: String,
    pub password: String,
}

/// Error envelope returned by the auth server
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[error("{error}: {error_message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Short error code, e.g. `ForbiddenOperationException`
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        ApiErrorKind::from_code(&self.error, self.cause.as_deref())
    }
}

/// Missing or `null` fields decode to the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authenticate_request_wire_names() {
        let request = AuthenticateRequest {
            agent: Agent::minecraft(),
            username: "steve@example.com".to_string(),
            password: "hunter2".to_string(),
            client_token: "CT1".to_string(),
            request_user: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "agent": { "name": "Minecraft", "version": 1 },
                "username": "steve@example.com",
                "password": "hunter2",
                "clientToken": "CT1",
                "requestUser": true
            })
        );

        let decoded: AuthenticateRequest = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_refresh_request_omits_unselected_profile() {
        let request = RefreshRequest {
            access_token: "AT1".to_string(),
            client_token: "CT1".to_string(),
            selected_profile: None,
            request_user: true,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "accessToken": "AT1", "clientToken": "CT1", "requestUser": true })
        );

        let selecting = RefreshRequest {
            selected_profile: Some(Profile {
                id: "P2".to_string(),
                name: "Alex".to_string(),
                legacy: false,
            }),
            ..request
        };
        let decoded: RefreshRequest =
            serde_json::from_str(&serde_json::to_string(&selecting).unwrap()).unwrap();
        assert_eq!(decoded, selecting);
    }

    #[test]
    fn test_token_pair_and_signout_wire_names() {
        let pair = TokenPairRequest {
            access_token: "AT1".to_string(),
            client_token: "CT1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            json!({ "accessToken": "AT1", "clientToken": "CT1" })
        );

        let signout = SignoutRequest {
            username: "steve".to_string(),
            password: "hunter2".to_string(),
        };
        let decoded: SignoutRequest =
            serde_json::from_str(&serde_json::to_string(&signout).unwrap()).unwrap();
        assert_eq!(decoded, signout);
    }

    #[test]
    fn test_authenticate_response_without_profile() {
        // Accounts that don't own the game have no selected profile
        let body = r#"{"accessToken":"AT1","clientToken":"CT1","availableProfiles":[]}"#;
        let response: AuthenticateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token, "AT1");
        assert!(response.available_profiles.is_empty());
        assert!(response.selected_profile.is_none());
        assert!(response.user.is_none());
    }

    #[test]
    fn test_profile_legacy_defaults_to_false() {
        let profile: Profile = serde_json::from_str(r#"{"id":"P1","name":"Steve"}"#).unwrap();
        assert!(!profile.legacy);
    }

    #[test]
    fn test_user_properties_keep_order() {
        let body = r#"{"id":"U1","properties":[
            {"name":"preferredLanguage","value":"en"},
            {"name":"twitch_access_token","value":"abc"},
            {"name":"preferredLanguage","value":"de"}
        ]}"#;
        let user: User = serde_json::from_str(body).unwrap();
        let names: Vec<_> = user.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["preferredLanguage", "twitch_access_token", "preferredLanguage"]);
        assert_eq!(user.property("preferredLanguage"), Some("en"));
        assert_eq!(user.property("missing"), None);
    }

    #[test]
    fn test_api_error_decoding() {
        let body = r#"{"error":"ForbiddenOperationException","errorMessage":"Invalid token.","cause":"UserMigratedException"}"#;
        let error: ApiError = serde_json::from_str(body).unwrap();
        assert_eq!(error.error_message, "Invalid token.");
        assert_eq!(error.cause.as_deref(), Some("UserMigratedException"));
        assert_eq!(error.kind(), ApiErrorKind::UserMigrated);
        assert_eq!(error.to_string(), "ForbiddenOperationException: Invalid token.");
    }

    #[test]
    fn test_authenticate_response_tolerates_missing_and_null_fields() {
        let body = r#"{
            "accessToken": "AT1",
            "availableProfiles": null,
            "selectedProfile": { "id": "P1", "name": "Steve", "legacy": null },
            "user": { "id": "U1", "properties": null }
        }"#;
        let response: AuthenticateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token, "AT1");
        assert_eq!(response.client_token, "");
        assert!(response.available_profiles.is_empty());
        assert!(!response.selected_profile.unwrap().legacy);
        assert!(response.user.unwrap().properties.is_empty());
    }

    #[test]
    fn test_refresh_response_without_client_token() {
        let body = r#"{"accessToken":"AT2","clientToken":null,"user":{"id":"U1"}}"#;
        let response: RefreshResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token, "AT2");
        assert_eq!(response.client_token, "");
        assert!(response.selected_profile.is_none());
        assert!(response.user.unwrap().properties.is_empty());
    }

    #[test]
    fn test_api_error_from_any_object() {
        let error: ApiError = serde_json::from_str(r#"{"status":"Forbidden"}"#).unwrap();
        assert_eq!(error.error, "");
        assert_eq!(error.error_message, "");
        assert!(error.cause.is_none());
        assert_eq!(error.kind(), ApiErrorKind::Unknown(String::new()));

        let error: ApiError =
            serde_json::from_str(r#"{"error":null,"errorMessage":null,"cause":null}"#).unwrap();
        assert_eq!(error.error, "");
        assert!(error.cause.is_none());
    }

    #[test]
    fn test_api_error_rejects_non_objects() {
        assert!(serde_json::from_str::<ApiError>("OK").is_err());
        assert!(serde_json::from_str::<ApiError>("").is_err());
    }
}
