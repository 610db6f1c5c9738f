//! Authentication endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use backoffice_core::Role;
use backoffice_session::SessionStore;

use crate::client::ApiClient;
use crate::error::ApiError;

pub const LOGIN_URL: &str = "/api/auth/login";
pub const LOGOUT_URL: &str = "/api/auth/logout";
pub const ME_URL: &str = "/api/auth/me";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "access_token")]
    pub token: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// `POST /api/auth/login`. A 401 here means "invalid credentials".
pub async fn login(client: &ApiClient, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
    client.post_json(LOGIN_URL, credentials, None).await
}

pub async fn logout(client: &ApiClient, token: &str) -> Result<(), ApiError> {
    let _: Value = client.post_json(LOGOUT_URL, &serde_json::json!({}), Some(token)).await?;
    Ok(())
}

pub async fn me(client: &ApiClient, token: &str) -> Result<Profile, ApiError> {
    client.get_json(ME_URL, Vec::new(), Some(token)).await
}

/// Log in and record the credential in the session store.
pub async fn sign_in(
    client: &ApiClient,
    session: &SessionStore,
    credentials: &Credentials,
    remember: bool,
) -> Result<Role, ApiError> {
    let response = login(client, credentials).await?;
    session.set_credential(response.token, remember, response.role);
    Ok(response.role)
}

/// Best-effort server logout; the local session is cleared regardless.
pub async fn sign_out(client: &ApiClient, session: &SessionStore) {
    if let Some(token) = session.token() {
        if let Err(err) = logout(client, &token).await {
            tracing::warn!(%err, "server-side logout failed; clearing local session anyway");
        }
    }
    session.clear();
}
