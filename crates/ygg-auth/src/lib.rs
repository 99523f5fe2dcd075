//! Yggdrasil authentication client for Minecraft launchers
//!
//! This crate implements the legacy Yggdrasil authentication scheme served by
//! `authserver.mojang.com` and by compatible third-party auth servers.
//!
//! # Operations
//!
//! Every operation is a single JSON POST:
//!
//! 1. `authenticate` - log in with credentials, obtain an access token
//! 2. `refresh` - exchange a token pair for a new access token
//! 3. `validate` - check whether a token pair is still usable
//! 4. `signout` - invalidate every token of an account
//! 5. `invalidate` - invalidate the current token pair
//!
//! # Example
//!
//! ```no_run
//! use ygg_auth::{YggdrasilClient, YggdrasilConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = YggdrasilConfig::mojang().with_user_agent("my-launcher/1.0");
//!     let mut client = YggdrasilClient::with_random_client_token(config)?;
//!
//!     client.authenticate("steve@example.com", "password", "Minecraft", 1).await?;
//!     println!("Logged in as: {:?}", client.session().player_name());
//!
//!     // Later, before launching the game
//!     if !client.validate().await.unwrap_or(false) {
//!         client.refresh().await?;
//!     }
//!
//!     client.invalidate().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Session Persistence
//!
//! The client keeps its [`Session`] in memory only. Callers that want to
//! resume later serialize it themselves:
//!
//! ```
//! use ygg_auth::{Session, YggdrasilClient, YggdrasilConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let session = Session::new("client-token");
//! let saved = serde_json::to_string(&session)?;
//!
//! let restored: Session = serde_json::from_str(&saved)?;
//! let client = YggdrasilClient::with_session(YggdrasilConfig::default(), restored)?;
//! assert_eq!(client.client_token(), "client-token");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! # Errors
//!
//! Failures are either [`YggdrasilError::Local`] (serialization, network,
//! decoding) or [`YggdrasilError::Remote`] (an error envelope from the server
//! with its HTTP status). [`ApiError::kind`] tells whether logging in again
//! can help.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod session;

// Re-export main types
pub use client::YggdrasilClient;
pub use config::{HttpTimeouts, YggdrasilConfig};
pub use errors::{ApiErrorKind, LocalFailure, Result, YggdrasilError};
pub use models::{Agent, ApiError, AuthenticateResponse, Profile, Property, RefreshResponse, User};
pub use session::Session;
