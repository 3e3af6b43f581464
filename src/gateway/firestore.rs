use super::codec::{decode_document, encode_document, id_from_name, ListDocumentsResponse, RestDocument};
use super::{
    CollectionGateway, GatewayError, GatewayResult, SnapshotEvent, SnapshotSink, Subscription,
};
use crate::config::{topics_collection_path, EnvConfig};
use crate::models::{DocumentId, Topic, TopicDocument};
use crate::session::Session;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_timers::callback::Interval;
use leptos::task::spawn_local;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";
const PAGE_SIZE: &str = "300";

struct Inner {
    collection_url: String,
    api_key: Option<String>,
    bearer: Option<String>,
    poll_interval_ms: u32,

    sinks: Mutex<BTreeMap<u64, SnapshotSink>>,
    next_sink_id: AtomicU64,

    /// Fetch ordering guards: only a result newer than the last delivered one
    /// reaches subscribers.
    fetch_seq: AtomicU64,
    delivered_seq: AtomicU64,
    poll_in_flight: AtomicBool,
}

/// Firestore REST adapter.
///
/// The live subscription is an interval poll of the whole collection; each
/// successful write triggers an immediate extra poll so the writer's own change
/// comes back through the subscription quickly. Update is a whole-document
/// PATCH (no field mask) guarded by `currentDocument.exists`.
#[derive(Clone)]
pub(crate) struct FirestoreGateway {
    inner: Arc<Inner>,
}

impl FirestoreGateway {
    pub fn new(config: &EnvConfig, session: Session) -> Self {
        let collection_url = format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            FIRESTORE_URL,
            config.project_id,
            topics_collection_path()
        );

        Self {
            inner: Arc::new(Inner {
                collection_url,
                api_key: config.api_key.clone(),
                bearer: session.bearer(),
                poll_interval_ms: config.poll_interval_ms,
                sinks: Mutex::new(BTreeMap::new()),
                next_sink_id: AtomicU64::new(0),
                fetch_seq: AtomicU64::new(0),
                delivered_seq: AtomicU64::new(0),
                poll_in_flight: AtomicBool::new(false),
            }),
        }
    }
}

impl Inner {
    fn url(&self, doc_id: Option<&DocumentId>, params: &[(&str, &str)]) -> String {
        let mut url = match doc_id {
            Some(id) => format!("{}/{}", self.collection_url, urlencoding::encode(id.as_str())),
            None => self.collection_url.clone(),
        };

        let mut query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        if let Some(key) = &self.api_key {
            query.push(format!("key={}", urlencoding::encode(key)));
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    fn with_auth_headers(&self, mut req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(bearer) = &self.bearer {
            req = req.header("Authorization", bearer.clone());
        }
        req
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
        ctx: &str,
    ) -> GatewayResult<T> {
        let res = self
            .with_auth_headers(req)
            .send()
            .await
            .map_err(GatewayError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(GatewayError::parse)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(GatewayError::http(status, body, ctx))
        }
    }

    async fn list_all(&self) -> GatewayResult<Vec<Topic>> {
        let client = reqwest::Client::new();
        let mut out: Vec<Topic> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![("pageSize", PAGE_SIZE)];
            if let Some(t) = page_token.as_deref() {
                params.push(("pageToken", t));
            }

            let page: ListDocumentsResponse = self
                .send(client.get(self.url(None, &params)), "List topics")
                .await?;

            for doc in page.documents {
                match decode_document(doc) {
                    Ok(topic) => out.push(topic),
                    Err(e) => tracing::warn!(error = %e, "skipping undecodable topic document"),
                }
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(t) => page_token = Some(t),
                None => break,
            }
        }

        Ok(out)
    }

    fn deliver(&self, seq: u64, event: SnapshotEvent) {
        if self.delivered_seq.fetch_max(seq, Ordering::SeqCst) >= seq {
            tracing::debug!(seq, "dropping stale topic snapshot");
            return;
        }

        let sinks: Vec<SnapshotSink> = match self.sinks.lock() {
            Ok(s) => s.values().cloned().collect(),
            Err(_) => return,
        };
        for sink in sinks {
            sink(event.clone());
        }
    }

    fn has_subscribers(&self) -> bool {
        self.sinks.lock().map(|s| !s.is_empty()).unwrap_or(false)
    }
}

async fn refresh(inner: Arc<Inner>) {
    let seq = inner.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
    let result = inner.list_all().await;
    if let Err(e) = &result {
        tracing::error!(kind = ?e.kind, error = %e, "topic snapshot fetch failed");
    }
    inner.deliver(seq, result);
}

fn poll_tick(inner: Arc<Inner>) {
    if inner.poll_in_flight.swap(true, Ordering::SeqCst) {
        return;
    }
    spawn_local(async move {
        refresh(inner.clone()).await;
        inner.poll_in_flight.store(false, Ordering::SeqCst);
    });
}

fn refresh_after_write(inner: &Arc<Inner>) {
    if inner.has_subscribers() {
        spawn_local(refresh(inner.clone()));
    }
}

impl CollectionGateway for FirestoreGateway {
    fn subscribe(&self, sink: SnapshotSink) -> Subscription {
        let id = self.inner.next_sink_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut s) = self.inner.sinks.lock() {
            s.insert(id, sink);
        }
        tracing::info!(collection = %self.inner.collection_url, "topic subscription opened");

        poll_tick(self.inner.clone());
        let tick_inner = self.inner.clone();
        let interval = Interval::new(self.inner.poll_interval_ms, move || {
            poll_tick(tick_inner.clone());
        });

        let inner = self.inner.clone();
        Subscription::new(move || {
            drop(interval);
            if let Ok(mut s) = inner.sinks.lock() {
                s.remove(&id);
            }
            tracing::info!("topic subscription closed");
        })
    }

    fn add(&self, doc: TopicDocument) -> LocalBoxFuture<'_, GatewayResult<DocumentId>> {
        async move {
            let body = encode_document(&doc)?;
            let client = reqwest::Client::new();
            let created: RestDocument = self
                .inner
                .send(client.post(self.inner.url(None, &[])).json(&body), "Add topic")
                .await?;

            let id = created
                .name
                .as_deref()
                .and_then(id_from_name)
                .ok_or_else(|| GatewayError::parse("created document has no name"))?;

            tracing::info!(id = %id, "topic added");
            refresh_after_write(&self.inner);
            Ok(id)
        }
        .boxed_local()
    }

    fn update(&self, id: &DocumentId, doc: TopicDocument) -> LocalBoxFuture<'_, GatewayResult<()>> {
        let id = id.clone();
        async move {
            let body = encode_document(&doc)?;
            let client = reqwest::Client::new();
            let url = self
                .inner
                .url(Some(&id), &[("currentDocument.exists", "true")]);
            let _: RestDocument = self
                .inner
                .send(client.patch(url).json(&body), "Update topic")
                .await?;

            tracing::info!(id = %id, "topic updated");
            refresh_after_write(&self.inner);
            Ok(())
        }
        .boxed_local()
    }

    fn delete(&self, id: &DocumentId) -> LocalBoxFuture<'_, GatewayResult<()>> {
        let id = id.clone();
        async move {
            let client = reqwest::Client::new();
            let _: serde_json::Value = self
                .inner
                .send(client.delete(self.inner.url(Some(&id), &[])), "Delete topic")
                .await?;

            tracing::info!(id = %id, "topic deleted");
            refresh_after_write(&self.inner);
            Ok(())
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMode, Backend};
    use crate::gateway::ErrorKind;
    use crate::models::Section;

    fn gateway(api_key: Option<&str>) -> FirestoreGateway {
        let config = EnvConfig {
            backend: Backend::Firestore,
            project_id: "proj".to_string(),
            api_key: api_key.map(str::to_string),
            auth_mode: AuthMode::Open,
            initial_auth_token: None,
            poll_interval_ms: 1_000,
        };
        FirestoreGateway::new(&config, Session::open())
    }

    fn topic(id: &str) -> Topic {
        Topic {
            id: DocumentId::new(id).expect("id"),
            doc: TopicDocument::empty_in(Section::Interview),
        }
    }

    #[test]
    fn test_collection_url_targets_fixed_path() {
        let g = gateway(None);
        assert_eq!(
            g.inner.url(None, &[]),
            "https://firestore.googleapis.com/v1/projects/proj/databases/(default)/documents/artifacts/bpsc-vault-v3/public/data/topics"
        );
    }

    #[test]
    fn test_document_url_carries_precondition_and_key() {
        let g = gateway(Some("k 1"));
        let id = DocumentId::new("abc").expect("id");
        let url = g.inner.url(Some(&id), &[("currentDocument.exists", "true")]);
        assert!(url.ends_with("/topics/abc?currentDocument.exists=true&key=k%201"));
    }

    #[test]
    fn test_stale_snapshots_are_not_delivered() {
        let g = gateway(None);
        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(vec![]));
        let s2 = seen.clone();
        if let Ok(mut sinks) = g.inner.sinks.lock() {
            sinks.insert(
                0,
                Arc::new(move |ev: SnapshotEvent| {
                    s2.lock().expect("lock").push(ev.map(|v| v.len()).unwrap_or(usize::MAX));
                }),
            );
        }

        g.inner.deliver(2, Ok(vec![topic("a"), topic("b")]));
        // An older fetch finishing late must not overwrite the newer snapshot.
        g.inner.deliver(1, Ok(vec![]));
        g.inner.deliver(3, Err(GatewayError::new(ErrorKind::Network, "offline")));

        assert_eq!(*seen.lock().expect("lock"), vec![2, usize::MAX]);
    }

    #[test]
    fn test_unsubscribed_sinks_receive_nothing() {
        let g = gateway(None);
        assert!(!g.inner.has_subscribers());
        // No panics and no receivers.
        g.inner.deliver(1, Ok(vec![topic("a")]));
        assert_eq!(g.inner.delivered_seq.load(Ordering::SeqCst), 1);
    }
}
