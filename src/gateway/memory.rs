use super::{
    CollectionGateway, ErrorKind, GatewayError, GatewayResult, SnapshotEvent, SnapshotSink,
    Subscription,
};
use crate::models::{DocumentId, Topic, TopicDocument};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A write received by the in-memory gateway. Test builds also log them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum WriteCall {
    Add(TopicDocument),
    Update(DocumentId, TopicDocument),
    Delete(DocumentId),
}

#[derive(Default)]
struct MemoryState {
    /// Documents in insertion order.
    docs: Vec<Topic>,
    sinks: BTreeMap<u64, SnapshotSink>,
    next_sink_id: u64,
    #[cfg(test)]
    writes: Vec<WriteCall>,
    #[cfg(test)]
    fail_next_write: Option<GatewayError>,
}

/// Process-local collection with live pushes.
///
/// Behaves like the hosted store from the client's point of view: new
/// subscribers get the current snapshot immediately, every successful write
/// pushes a fresh snapshot to all subscribers. Used when no cloud project is
/// configured and as the gateway behind the core tests.
#[derive(Clone, Default)]
pub(crate) struct MemoryGateway {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_topics(topics: Vec<Topic>) -> Self {
        let g = Self::new();
        if let Ok(mut s) = g.state.lock() {
            s.docs = topics;
        }
        g
    }

    /// Replaces the collection as if changed by another client and pushes it.
    #[cfg(test)]
    pub fn replace_remote(&self, topics: Vec<Topic>) {
        if let Ok(mut s) = self.state.lock() {
            s.docs = topics;
        }
        self.broadcast();
    }

    /// Delivers a subscription error to every subscriber.
    #[cfg(test)]
    pub fn push_error(&self, error: GatewayError) {
        for sink in self.sinks() {
            sink(Err(error.clone()));
        }
    }

    /// Makes the next add/update/delete fail with `error`.
    #[cfg(test)]
    pub fn fail_next_write(&self, error: GatewayError) {
        if let Ok(mut s) = self.state.lock() {
            s.fail_next_write = Some(error);
        }
    }

    #[cfg(test)]
    pub fn writes(&self) -> Vec<WriteCall> {
        self.state.lock().map(|s| s.writes.clone()).unwrap_or_default()
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().map(|s| s.sinks.len()).unwrap_or_default()
    }

    fn sinks(&self) -> Vec<SnapshotSink> {
        self.state
            .lock()
            .map(|s| s.sinks.values().cloned().collect())
            .unwrap_or_default()
    }

    fn snapshot(&self) -> SnapshotEvent {
        self.state
            .lock()
            .map(|s| s.docs.clone())
            .map_err(|_| GatewayError::new(ErrorKind::Network, "memory store poisoned"))
    }

    // Sinks run outside the lock so they may call back into the gateway.
    fn broadcast(&self) {
        let sinks = self.sinks();
        let snap = self.snapshot();
        for sink in sinks {
            sink(snap.clone());
        }
    }

    fn write(&self, call: WriteCall) -> GatewayResult<Option<DocumentId>> {
        let assigned = {
            let mut s = self
                .state
                .lock()
                .map_err(|_| GatewayError::new(ErrorKind::Network, "memory store poisoned"))?;

            #[cfg(test)]
            {
                s.writes.push(call.clone());
                if let Some(e) = s.fail_next_write.take() {
                    return Err(e);
                }
            }

            match call {
                WriteCall::Add(doc) => {
                    let id = new_document_id(|id| s.docs.iter().any(|t| t.id.as_str() == id));
                    s.docs.push(Topic {
                        id: id.clone(),
                        doc,
                    });
                    Some(id)
                }
                WriteCall::Update(id, doc) => {
                    let Some(t) = s.docs.iter_mut().find(|t| t.id == id) else {
                        return Err(GatewayError::new(
                            ErrorKind::NotFound,
                            format!("Update topic: no document {id}"),
                        ));
                    };
                    t.doc = doc;
                    None
                }
                WriteCall::Delete(id) => {
                    // Deleting a missing document succeeds, as in the hosted store.
                    s.docs.retain(|t| t.id != id);
                    None
                }
            }
        };

        self.broadcast();
        Ok(assigned)
    }
}

impl CollectionGateway for MemoryGateway {
    fn subscribe(&self, sink: SnapshotSink) -> Subscription {
        let id = match self.state.lock() {
            Ok(mut s) => {
                let id = s.next_sink_id;
                s.next_sink_id += 1;
                s.sinks.insert(id, sink.clone());
                id
            }
            Err(_) => {
                sink(Err(GatewayError::new(ErrorKind::Network, "memory store poisoned")));
                return Subscription::new(|| {});
            }
        };

        sink(self.snapshot());

        let state = self.state.clone();
        Subscription::new(move || {
            if let Ok(mut s) = state.lock() {
                s.sinks.remove(&id);
            }
        })
    }

    fn add(&self, doc: TopicDocument) -> LocalBoxFuture<'_, GatewayResult<DocumentId>> {
        let res = self.write(WriteCall::Add(doc)).and_then(|id| {
            id.ok_or_else(|| GatewayError::new(ErrorKind::Parse, "no id assigned"))
        });
        future::ready(res).boxed_local()
    }

    fn update(&self, id: &DocumentId, doc: TopicDocument) -> LocalBoxFuture<'_, GatewayResult<()>> {
        let res = self.write(WriteCall::Update(id.clone(), doc)).map(|_| ());
        future::ready(res).boxed_local()
    }

    fn delete(&self, id: &DocumentId) -> LocalBoxFuture<'_, GatewayResult<()>> {
        let res = self.write(WriteCall::Delete(id.clone())).map(|_| ());
        future::ready(res).boxed_local()
    }
}

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 20-character alphanumeric id in the hosted store's format.
fn new_document_id(taken: impl Fn(&str) -> bool) -> DocumentId {
    let mut counter: u64 = 0;
    loop {
        let mut buf = [0u8; 20];
        let id: String = if getrandom::getrandom(&mut buf).is_ok() {
            buf.iter()
                .map(|b| ID_ALPHABET[*b as usize % ID_ALPHABET.len()] as char)
                .collect()
        } else {
            counter += 1;
            format!("local{counter:015}")
        };

        if !taken(&id) {
            if let Some(id) = DocumentId::new(id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;
    use futures::executor::block_on;

    fn recorder() -> (SnapshotSink, Arc<Mutex<Vec<SnapshotEvent>>>) {
        let seen: Arc<Mutex<Vec<SnapshotEvent>>> = Arc::new(Mutex::new(vec![]));
        let s2 = seen.clone();
        let sink: SnapshotSink = Arc::new(move |ev| s2.lock().expect("lock").push(ev));
        (sink, seen)
    }

    fn doc(title: &str) -> TopicDocument {
        TopicDocument {
            title: title.to_string(),
            ..TopicDocument::empty_in(Section::MainsGs2)
        }
    }

    #[test]
    fn test_subscribe_pushes_current_snapshot_immediately() {
        let g = MemoryGateway::new();
        let (sink, seen) = recorder();
        let _sub = g.subscribe(sink);

        let seen = seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_ref().map(|v| v.len()), Ok(0));
    }

    #[test]
    fn test_add_assigns_a_twenty_char_id_and_pushes() {
        let g = MemoryGateway::new();
        let (sink, seen) = recorder();
        let _sub = g.subscribe(sink);

        let id = block_on(g.add(doc("Ethics"))).expect("add should succeed");
        assert_eq!(id.as_str().len(), 20);

        let seen = seen.lock().expect("lock");
        let last = seen.last().expect("push after add").clone().expect("snapshot");
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].id, id);
        assert_eq!(last[0].doc.title, "Ethics");
    }

    #[test]
    fn test_update_of_missing_document_is_not_found() {
        let g = MemoryGateway::new();
        let missing = DocumentId::new("nope").expect("id");
        let err = block_on(g.update(&missing, doc("x"))).expect_err("missing doc");
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_cancelled_subscription_receives_nothing_more() {
        let g = MemoryGateway::new();
        let (sink, seen) = recorder();
        let sub = g.subscribe(sink);
        assert_eq!(g.subscriber_count(), 1);

        sub.cancel();
        assert_eq!(g.subscriber_count(), 0);

        block_on(g.add(doc("after close"))).expect("add");
        g.push_error(GatewayError::new(ErrorKind::Network, "offline"));
        assert_eq!(seen.lock().expect("lock").len(), 1);
    }

    #[test]
    fn test_failed_write_is_recorded_but_not_applied() {
        let g = MemoryGateway::new();
        g.fail_next_write(GatewayError::new(ErrorKind::Unauthorized, "denied"));

        let err = block_on(g.add(doc("blocked"))).expect_err("should fail");
        assert_eq!(err.kind, ErrorKind::Unauthorized);
        assert_eq!(g.writes().len(), 1);
        assert_eq!(g.snapshot().map(|v| v.len()), Ok(0));

        // Only the next write fails.
        assert!(block_on(g.add(doc("ok"))).is_ok());
    }

    #[test]
    fn test_write_log_keeps_call_order() {
        let g = MemoryGateway::new();
        let id = block_on(g.add(doc("Modern India"))).expect("add");
        block_on(g.update(&id, doc("Modern India v2"))).expect("update");
        block_on(g.delete(&id)).expect("delete");

        assert_eq!(
            g.writes(),
            vec![
                WriteCall::Add(doc("Modern India")),
                WriteCall::Update(id.clone(), doc("Modern India v2")),
                WriteCall::Delete(id),
            ]
        );
        assert_eq!(g.snapshot().map(|v| v.len()), Ok(0));
    }
}
