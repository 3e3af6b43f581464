use crate::gateway::{GatewayError, SharedGateway, SnapshotEvent, SnapshotSink, Subscription};
use crate::models::Topic;
use leptos::prelude::*;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoadState {
    /// No subscription (never opened, or closed).
    Idle,
    /// Subscribed, waiting for the first delivery.
    Loading,
    Loaded,
}

/// The signals a subscription writes into. Kept separate from the
/// subscription handle so the push sink only captures thread-safe handles.
#[derive(Clone, Copy)]
struct StoreSignals {
    topics: RwSignal<Vec<Topic>>,
    load_state: RwSignal<LoadState>,
    last_error: RwSignal<Option<String>>,

    /// Bumped on every open/close; pushes tagged with an older generation are
    /// ignored.
    generation: RwSignal<u64>,
}

impl StoreSignals {
    fn apply(&self, generation: u64, event: SnapshotEvent) {
        if self.generation.try_get_untracked() != Some(generation) {
            return;
        }

        match event {
            Ok(topics) => {
                tracing::debug!(count = topics.len(), "topic snapshot received");
                self.topics.set(topics);
                self.last_error.set(None);
                self.load_state.set(LoadState::Loaded);
            }
            Err(e) => self.apply_error(e),
        }
    }

    // Contents stay as they were (stale beats empty); only a pending first
    // load settles.
    fn apply_error(&self, e: GatewayError) {
        tracing::error!(kind = ?e.kind, error = %e, "topic subscription error");
        self.last_error.set(Some(e.to_string()));
        if self.load_state.get_untracked() == LoadState::Loading {
            self.load_state.set(LoadState::Loaded);
        }
    }
}

/// Client-side cache of the whole topics collection.
///
/// The subscription push handler is the only writer of the contents; each push
/// replaces them wholesale, so the store always equals the latest snapshot.
#[derive(Clone, Copy)]
pub(crate) struct TopicStore {
    signals: StoreSignals,
    subscription: StoredValue<Option<Subscription>, LocalStorage>,
}

impl TopicStore {
    pub fn new() -> Self {
        Self {
            signals: StoreSignals {
                topics: RwSignal::new(vec![]),
                load_state: RwSignal::new(LoadState::Idle),
                last_error: RwSignal::new(None),
                generation: RwSignal::new(0),
            },
            subscription: StoredValue::new_local(None),
        }
    }

    /// Tracked read of the current contents, in snapshot order.
    pub fn with_topics<R>(&self, f: impl FnOnce(&[Topic]) -> R) -> R {
        self.signals.topics.with(|t| f(t))
    }

    #[cfg(test)]
    pub fn topics_untracked(&self) -> Vec<Topic> {
        self.signals.topics.get_untracked()
    }

    pub fn load_state(&self) -> LoadState {
        self.signals.load_state.get()
    }

    #[cfg(test)]
    pub fn load_state_untracked(&self) -> LoadState {
        self.signals.load_state.get_untracked()
    }

    pub fn last_error(&self) -> Option<String> {
        self.signals.last_error.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .try_with_value(|s| s.is_some())
            .unwrap_or(false)
    }

    /// Subscribes through `gateway` once the session is ready.
    ///
    /// `None` means the session has not resolved: nothing happens. Calling it
    /// again while subscribed is a no-op. Returns whether a subscription was
    /// opened.
    pub fn open(&self, gateway: Option<&SharedGateway>) -> bool {
        let Some(gateway) = gateway else {
            return false;
        };
        if self.is_subscribed() {
            return false;
        }

        let generation = self.signals.generation.get_untracked().wrapping_add(1);
        self.signals.generation.set(generation);
        self.signals.load_state.set(LoadState::Loading);

        let signals = self.signals;
        let sink: SnapshotSink = Arc::new(move |event| signals.apply(generation, event));
        let subscription = gateway.subscribe(sink);
        self.subscription.set_value(Some(subscription));

        tracing::info!(generation, "topic store opened");
        true
    }

    /// Releases the subscription. No push is applied after this returns.
    pub fn close(&self) {
        let mut taken: Option<Subscription> = None;
        self.subscription.try_update_value(|s| taken = s.take());
        let Some(subscription) = taken else {
            return;
        };

        self.signals.generation.try_update(|g| *g = g.wrapping_add(1));
        self.signals.load_state.try_set(LoadState::Idle);
        subscription.cancel();
        tracing::info!("topic store closed");
    }
}

impl Default for TopicStore {
    fn default() -> Self {
        Self::new()
    }
}
