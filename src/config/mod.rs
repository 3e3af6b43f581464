use serde::{Deserialize, Serialize};

/// Application identifier baked into the collection path.
pub(crate) const APP_ID: &str = "bpsc-vault-v3";

const DEFAULT_PROJECT_ID: &str = "exam-vault";
const DEFAULT_POLL_INTERVAL_MS: u32 = 4_000;
const MIN_POLL_INTERVAL_MS: u32 = 500;

/// Hierarchical path of the topics collection, relative to the database root.
pub(crate) fn topics_collection_path() -> String {
    format!("artifacts/{APP_ID}/public/data/topics")
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Backend {
    Firestore,
    Memory,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AuthMode {
    /// No identity; relies on open access rules.
    Open,
    Anonymous,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    pub backend: Backend,
    pub project_id: String,
    pub api_key: Option<String>,
    pub auth_mode: AuthMode,
    pub initial_auth_token: Option<String>,
    pub poll_interval_ms: u32,
}

impl EnvConfig {
    /// Reads `window.ENV`, falling back to defaults for anything missing.
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        let Some(env) = env else {
            return Self::from_lookup(|_| None);
        };

        Self::from_lookup(|key| {
            js_sys::Reflect::get(&env, &key.into())
                .ok()
                .and_then(|v| v.as_string())
        })
    }

    /// Builds a config from a key lookup.
    ///
    /// Every setting is looked up as `UPPER_CASE` first (documented style) and
    /// `lower_case` second, matching how deployments have historically written
    /// `window.ENV`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .or_else(|| lookup(&key.to_lowercase()))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match get("BACKEND").as_deref().map(str::to_lowercase).as_deref() {
            Some("firestore") => Backend::Firestore,
            _ => Backend::Memory,
        };

        let auth_mode = match get("AUTH_MODE").as_deref().map(str::to_lowercase).as_deref() {
            Some("anonymous") => AuthMode::Anonymous,
            _ => AuthMode::Open,
        };

        let poll_interval_ms = get("POLL_INTERVAL_MS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .max(MIN_POLL_INTERVAL_MS);

        Self {
            backend,
            project_id: get("PROJECT_ID").unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string()),
            api_key: get("API_KEY"),
            auth_mode,
            initial_auth_token: get("AUTH_TOKEN"),
            poll_interval_ms,
        }
    }
}

/// Built-in defaults only; `window.ENV` is not consulted.
impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
