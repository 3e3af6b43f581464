use crate::config::{AuthMode, Backend, EnvConfig};
use crate::gateway::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SessionKind {
    /// No identity; requests go out without credentials.
    Open,
    Anonymous,
    /// Signed in with an externally supplied token.
    Token,
}

/// Established identity. Created once per application lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Session {
    pub kind: SessionKind,
    pub uid: Option<String>,
    id_token: Option<String>,
}

impl Session {
    pub fn open() -> Self {
        Self {
            kind: SessionKind::Open,
            uid: None,
            id_token: None,
        }
    }

    pub fn bearer(&self) -> Option<String> {
        self.id_token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct AnonymousSignUpRequest {
    return_secure_token: bool,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct CustomTokenRequest {
    token: String,
    return_secure_token: bool,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    local_id: String,
}

/// Establishes the session the data layer waits on.
///
/// The in-memory backend and `AuthMode::Open` resolve immediately. Anonymous
/// mode signs in with the supplied token when there is one and falls back to
/// an anonymous account otherwise. Failures are returned, never retried.
pub(crate) async fn establish(config: &EnvConfig) -> GatewayResult<Session> {
    if config.backend == Backend::Memory || config.auth_mode == AuthMode::Open {
        return Ok(Session::open());
    }

    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| GatewayError::config("API_KEY is required for anonymous sign-in"))?;

    match &config.initial_auth_token {
        Some(token) => {
            let res = sign_in(
                "accounts:signInWithCustomToken",
                &api_key,
                &CustomTokenRequest {
                    token: token.clone(),
                    return_secure_token: true,
                },
            )
            .await?;
            Ok(session_from(SessionKind::Token, res))
        }
        None => {
            let res = sign_in(
                "accounts:signUp",
                &api_key,
                &AnonymousSignUpRequest {
                    return_secure_token: true,
                },
            )
            .await?;
            Ok(session_from(SessionKind::Anonymous, res))
        }
    }
}

fn session_from(kind: SessionKind, res: SignInResponse) -> Session {
    Session {
        kind,
        uid: Some(res.local_id),
        id_token: Some(res.id_token),
    }
}

async fn sign_in(
    endpoint: &str,
    api_key: &str,
    body: &impl Serialize,
) -> GatewayResult<SignInResponse> {
    let url = format!(
        "{}/{}?key={}",
        IDENTITY_TOOLKIT_URL,
        endpoint,
        urlencoding::encode(api_key)
    );

    let res = reqwest::Client::new()
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(GatewayError::network)?;

    if res.status().is_success() {
        res.json().await.map_err(GatewayError::parse)
    } else {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        Err(GatewayError::http(status, body, "Sign-in failed"))
    }
}
