//! Authentication session holder.
//!
//! Wraps the `/auth/*` endpoints, persists the resulting identity and bearer
//! token, and exposes the current identity to the rest of the application.
//! The session starts `Unknown`, resolves to `Anonymous` or `Authenticated`
//! once the persisted credentials have been checked, and cycles between
//! those two for the life of the process: login/registration move it to
//! `Authenticated`, logout or a 401 from any protected call move it back.

pub mod store;

use std::error::Error;

use tracing::warn;

use crate::api::error::ApiError;
use crate::api::models::{AuthResponse, Identity, LoginRequest, RegisterRequest};
use crate::api::ApiClient;
use crate::session::store::CredentialStore;

#[derive(Debug, Clone)]
pub enum SessionState {
    /// Persisted-session check has not run yet.
    Unknown,
    /// No valid session.
    Anonymous,
    /// Logged in as the carried identity.
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}

pub struct SessionManager {
    client: ApiClient,
    store: Box<dyn CredentialStore>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(client: ApiClient, store: Box<dyn CredentialStore>) -> Self {
        Self {
            client,
            store,
            state: SessionState::Unknown,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Resolve the initial `Unknown` state from persisted credentials.
    /// A token without an identity (or vice versa) counts as no session.
    pub fn restore(&mut self) -> Result<&SessionState, Box<dyn Error>> {
        let token = self.store.get_token()?;
        let identity = self.store.get_identity()?;
        self.state = match (token, identity) {
            (Some(token), Some(identity)) => {
                self.client.set_token(token);
                SessionState::Authenticated(identity)
            }
            _ => SessionState::Anonymous,
        };
        Ok(&self.state)
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.client.post_json("/auth/login", &request).await?;
        self.establish(response)
    }

    pub async fn register(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, ApiError> {
        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.client.post_json("/auth/register", &request).await?;
        self.establish(response)
    }

    /// Fetch the identity behind the current token and refresh the stored
    /// copy. A 401 drops the session to `Anonymous` before propagating.
    pub async fn me(&mut self) -> Result<Identity, ApiError> {
        match self.client.get_json::<Identity>("/auth/me").await {
            Ok(identity) => {
                if let Err(e) = self.store.store_identity(&identity) {
                    warn!("could not refresh stored identity: {e}");
                }
                self.state = SessionState::Authenticated(identity.clone());
                Ok(identity)
            }
            Err(err) => {
                self.handle_unauthorized(&err);
                Err(err)
            }
        }
    }

    /// Client-side credential wipe. The backend has no logout endpoint;
    /// dropping the token is the whole operation.
    pub fn logout(&mut self) -> Result<(), Box<dyn Error>> {
        self.store.clear_token()?;
        self.store.clear_identity()?;
        self.client.clear_token();
        self.state = SessionState::Anonymous;
        Ok(())
    }

    /// Call after any protected request fails: a 401 means the token is no
    /// longer valid, so the session drops to `Anonymous` and the persisted
    /// credentials are cleared. Any other error leaves the session alone.
    pub fn handle_unauthorized(&mut self, err: &ApiError) {
        if !err.is_unauthorized() {
            return;
        }
        if let Err(e) = self.store.clear_token() {
            warn!("could not clear stored token: {e}");
        }
        if let Err(e) = self.store.clear_identity() {
            warn!("could not clear stored identity: {e}");
        }
        self.client.clear_token();
        self.state = SessionState::Anonymous;
    }

    fn establish(&mut self, response: AuthResponse) -> Result<Identity, ApiError> {
        // Persist first; a session that does not survive the process is
        // worse than a failed login.
        if let Err(e) = self.store.store_token(&response.token) {
            return Err(ApiError::Network {
                message: format!("Could not persist credentials: {e}"),
            });
        }
        if let Err(e) = self.store.store_identity(&response.user) {
            warn!("could not persist identity: {e}");
        }
        self.client.set_token(response.token);
        self.state = SessionState::Authenticated(response.user.clone());
        Ok(response.user)
    }
}
