use crate::gateway::{CollectionGateway, GatewayResult, SharedGateway};
use crate::models::{DocumentId, Topic};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// A delete the user has asked for but not yet confirmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingDelete {
    id: DocumentId,
    title: String,
}

impl PendingDelete {
    pub fn new(topic: &Topic) -> Self {
        Self {
            id: topic.id.clone(),
            title: topic.title().to_string(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Only obtainable through [`PendingDelete::confirm`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ConfirmedDelete {
    id: DocumentId,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &DocumentId {
        &self.id
    }
}

pub(crate) async fn delete_topic(
    gateway: &dyn CollectionGateway,
    confirmed: ConfirmedDelete,
) -> GatewayResult<()> {
    gateway.delete(confirmed.id()).await
}

/// Confirm-before-delete dialog state.
#[derive(Clone, Copy)]
pub(crate) struct DeleteFlow {
    pending: RwSignal<Option<PendingDelete>>,
    deleting: RwSignal<bool>,
    error: RwSignal<Option<String>>,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self {
            pending: RwSignal::new(None),
            deleting: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn pending(&self) -> Option<PendingDelete> {
        self.pending.get()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    pub fn request(&self, topic: &Topic) {
        self.error.set(None);
        self.pending.set(Some(PendingDelete::new(topic)));
    }

    pub fn cancel(&self) {
        if self.deleting.get_untracked() {
            return;
        }
        self.pending.set(None);
        self.error.set(None);
    }

    pub fn confirm(&self, gateway: Option<SharedGateway>) {
        if self.deleting.get_untracked() {
            return;
        }
        let Some(pending) = self.pending.get_untracked() else {
            return;
        };
        let Some(gateway) = gateway else {
            self.error
                .set(Some("Not connected to the vault yet. Try again shortly.".to_string()));
            return;
        };

        self.deleting.set(true);
        self.error.set(None);

        let flow = *self;
        spawn_local(async move {
            let result = delete_topic(gateway.as_ref(), pending.confirm()).await;
            flow.finish(result);
        });
    }

    fn finish(&self, result: GatewayResult<()>) {
        match result {
            Ok(()) => {
                tracing::info!("topic deleted");
                self.pending.set(None);
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind, error = %e, "deleting topic failed");
                self.error.set(Some(format!("Error deleting: {e}")));
            }
        }
        self.deleting.set(false);
    }
}

impl Default for DeleteFlow {
    fn default() -> Self {
        Self::new()
    }
}
