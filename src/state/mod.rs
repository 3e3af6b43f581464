mod deletion;
mod topic_editor;
mod topic_store;

pub(crate) use deletion::DeleteFlow;
pub(crate) use topic_editor::TopicEditor;
pub(crate) use topic_store::{LoadState, TopicStore};

use crate::config::EnvConfig;
use crate::gateway::{connect, SharedGateway};
use crate::models::Question;
use crate::session::establish;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Content shown in the read-only dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Reading {
    Trend { title: String, trend: String },
    Solution { topic_title: String, question: Question },
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: EnvConfig,

    /// Set once the session resolves. Nothing touches the collection before.
    pub gateway: RwSignal<Option<SharedGateway>>,
    pub session_error: RwSignal<Option<String>>,

    pub store: TopicStore,
    pub editor: TopicEditor,
    pub deletion: DeleteFlow,

    /// Global UI state.
    pub search_term: RwSignal<String>,
    pub admin_mode: RwSignal<bool>,
    pub mobile_menu_open: RwSignal<bool>,
    pub reading: RwSignal<Option<Reading>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(EnvConfig::new())
    }

    pub fn with_config(config: EnvConfig) -> Self {
        Self {
            config,
            gateway: RwSignal::new(None),
            session_error: RwSignal::new(None),
            store: TopicStore::new(),
            editor: TopicEditor::new(),
            deletion: DeleteFlow::new(),
            search_term: RwSignal::new(String::new()),
            admin_mode: RwSignal::new(false),
            mobile_menu_open: RwSignal::new(false),
            reading: RwSignal::new(None),
        }
    }

    /// Establishes the session, then publishes the gateway.
    ///
    /// On failure the gateway stays unset: the store never subscribes and
    /// writes report "not connected".
    pub fn start_session(&self) {
        let config = self.config.clone();
        let gateway = self.gateway;
        let session_error = self.session_error;

        spawn_local(async move {
            match establish(&config).await {
                Ok(session) => {
                    tracing::info!(kind = ?session.kind, uid = ?session.uid, backend = ?config.backend, "session established");
                    gateway.set(Some(connect(&config, session)));
                }
                Err(e) => {
                    tracing::error!(kind = ?e.kind, error = %e, "session bootstrap failed");
                    session_error.set(Some(e.to_string()));
                }
            }
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
