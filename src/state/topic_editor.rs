use crate::drafts::{QuestionField, TopicDraft, TopicField};
use crate::gateway::{CollectionGateway, GatewayResult, SharedGateway};
use crate::models::{DocumentId, Section, Topic};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CommitOutcome {
    Added(DocumentId),
    Updated(DocumentId),
}

/// Sends a draft to the gateway: update-by-id when it has an id, add otherwise.
///
/// Exactly one write is issued. The id only addresses the update; the payload
/// is the whole document and overwrites whatever is stored.
pub(crate) async fn commit_draft(
    gateway: &dyn CollectionGateway,
    draft: &TopicDraft,
) -> GatewayResult<CommitOutcome> {
    match &draft.id {
        Some(id) => {
            gateway.update(id, draft.doc.clone()).await?;
            Ok(CommitOutcome::Updated(id.clone()))
        }
        None => gateway.add(draft.doc.clone()).await.map(CommitOutcome::Added),
    }
}

/// Editing session for one topic. The editor is open while a draft exists.
#[derive(Clone, Copy)]
pub(crate) struct TopicEditor {
    draft: RwSignal<Option<TopicDraft>>,
    saving: RwSignal<bool>,
    error: RwSignal<Option<String>>,
}

impl TopicEditor {
    pub fn new() -> Self {
        Self {
            draft: RwSignal::new(None),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn is_open(&self) -> bool {
        self.draft.with(|d| d.is_some())
    }

    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    pub fn error(&self) -> Option<String> {
        self.error.get()
    }

    /// Tracked read of the open draft.
    pub fn with_draft<R>(&self, f: impl FnOnce(&TopicDraft) -> R) -> Option<R> {
        self.draft.with(|d| d.as_ref().map(f))
    }

    #[cfg(test)]
    pub fn draft_untracked(&self) -> Option<TopicDraft> {
        self.draft.get_untracked()
    }

    pub fn start_create(&self, section: Section) {
        self.open(TopicDraft::new_in(section));
    }

    pub fn start_edit(&self, topic: &Topic) {
        self.open(TopicDraft::from_topic(topic));
    }

    fn open(&self, draft: TopicDraft) {
        self.error.set(None);
        self.saving.set(false);
        self.draft.set(Some(draft));
    }

    pub fn cancel(&self) {
        if self.saving.get_untracked() {
            return;
        }
        self.draft.set(None);
        self.error.set(None);
    }

    pub fn add_question(&self) {
        self.draft.update(|d| {
            if let Some(d) = d {
                d.add_question();
            }
        });
    }

    pub fn remove_question(&self, index: usize) {
        self.edit(|d| d.remove_question(index).map(|_| ()));
    }

    pub fn update_question_field(&self, index: usize, field: QuestionField, value: String) {
        self.edit(|d| d.update_question_field(index, field, value));
    }

    pub fn update_topic_field(&self, field: TopicField) {
        self.draft.update(|d| {
            if let Some(d) = d {
                d.update_topic_field(field);
            }
        });
    }

    fn edit(&self, f: impl FnOnce(&mut TopicDraft) -> Result<(), crate::drafts::DraftError>) {
        self.draft.update(|d| {
            if let Some(d) = d {
                if let Err(e) = f(d) {
                    tracing::warn!(error = %e, "ignoring draft edit");
                }
            }
        });
    }

    /// Writes the draft through `gateway`.
    ///
    /// Success closes the editor; the store picks the change up from the next
    /// push. Failure keeps the editor open with the draft untouched.
    pub fn commit(&self, gateway: Option<SharedGateway>) {
        if self.saving.get_untracked() {
            return;
        }
        let Some(draft) = self.draft.get_untracked() else {
            return;
        };
        let Some(gateway) = gateway else {
            self.error
                .set(Some("Not connected to the vault yet. Try again shortly.".to_string()));
            return;
        };

        self.saving.set(true);
        self.error.set(None);

        let editor = *self;
        spawn_local(async move {
            let result = commit_draft(gateway.as_ref(), &draft).await;
            editor.finish_commit(result);
        });
    }

    fn finish_commit(&self, result: GatewayResult<CommitOutcome>) {
        match result {
            Ok(outcome) => {
                tracing::info!(?outcome, "topic saved");
                self.draft.set(None);
            }
            Err(e) => {
                tracing::error!(kind = ?e.kind, error = %e, "saving topic failed");
                self.error.set(Some(format!("Error saving: {e}")));
            }
        }
        self.saving.set(false);
    }
}

impl Default for TopicEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{ErrorKind, GatewayError, MemoryGateway, WriteCall};
    use crate::models::TopicDocument;
    use futures::executor::block_on;
    use std::sync::Arc;

    fn saved_topic(memory: &MemoryGateway, title: &str) -> Topic {
        let doc = TopicDocument {
            title: title.to_string(),
            ..TopicDocument::empty_in(Section::MainsGs1)
        };
        let id = block_on(memory.add(doc.clone())).expect("seed");
        Topic { id, doc }
    }

    /// Runs a commit to completion the way `commit` does, minus the spawn.
    fn commit_now(editor: &TopicEditor, memory: &MemoryGateway) {
        let draft = editor.draft_untracked().expect("open draft");
        editor.saving.set(true);
        let result = block_on(commit_draft(memory, &draft));
        editor.finish_commit(result);
    }

    #[test]
    fn test_commit_new_draft_adds_exactly_once_without_id() {
        let memory = MemoryGateway::new();
        let draft = TopicDraft::new_in(Section::MainsEssay);

        let outcome = block_on(commit_draft(&memory, &draft)).expect("add");
        assert!(matches!(outcome, CommitOutcome::Added(_)));

        let writes = memory.writes();
        assert_eq!(writes, vec![WriteCall::Add(draft.doc.clone())]);
        let WriteCall::Add(payload) = &writes[0] else {
            unreachable!()
        };
        let json = serde_json::to_value(payload).expect("serialize");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_commit_existing_draft_updates_by_id_exactly_once() {
        let memory = MemoryGateway::new();
        let topic = saved_topic(&memory, "Polity");
        let mut draft = TopicDraft::from_topic(&topic);
        draft.update_topic_field(TopicField::Title("Polity v2".to_string()));

        let outcome = block_on(commit_draft(&memory, &draft)).expect("update");
        assert_eq!(outcome, CommitOutcome::Updated(topic.id.clone()));

        let writes = memory.writes();
        assert_eq!(writes.len(), 2); // seed add + this update
        assert_eq!(writes[1], WriteCall::Update(topic.id.clone(), draft.doc.clone()));
    }

    #[test]
    fn test_editor_closes_after_successful_create() {
        let memory = MemoryGateway::new();
        let editor = TopicEditor::new();
        editor.start_create(Section::MainsEssay);
        editor.update_topic_field(TopicField::Title("X".to_string()));
        assert!(editor.draft.get_untracked().is_some());

        commit_now(&editor, &memory);

        assert!(editor.draft.get_untracked().is_none());
        assert!(!editor.saving.get_untracked());
        assert_eq!(memory.writes().len(), 1);
    }

    #[test]
    fn test_failed_commit_keeps_draft_and_reports() {
        let memory = MemoryGateway::new();
        memory.fail_next_write(GatewayError::new(ErrorKind::Unauthorized, "permission denied"));

        let editor = TopicEditor::new();
        editor.start_create(Section::Optional);
        editor.add_question();
        editor.update_question_field(0, QuestionField::Prompt, "Q1".to_string());
        let before = editor.draft_untracked();

        commit_now(&editor, &memory);

        assert_eq!(editor.draft_untracked(), before);
        assert_eq!(
            editor.error.get_untracked().as_deref(),
            Some("Error saving: permission denied")
        );
        assert!(!editor.saving.get_untracked());
    }

    #[test]
    fn test_nested_edits_flow_through_signal() {
        let editor = TopicEditor::new();
        editor.start_create(Section::MainsEssay);
        editor.add_question();
        editor.add_question();
        editor.update_question_field(1, QuestionField::Year, "2022".to_string());
        editor.remove_question(0);
        // Out of range is ignored, not a panic.
        editor.remove_question(7);

        let d = editor.draft_untracked().expect("draft");
        assert_eq!(d.questions().len(), 1);
        assert_eq!(d.questions()[0].year, "2022");
    }

    #[test]
    fn test_edits_without_open_draft_are_ignored() {
        let editor = TopicEditor::new();
        editor.add_question();
        editor.update_topic_field(TopicField::Title("x".to_string()));
        assert!(editor.draft_untracked().is_none());
    }

    #[test]
    fn test_commit_without_gateway_reports_and_keeps_draft() {
        let editor = TopicEditor::new();
        editor.start_create(Section::Interview);
        editor.commit(None);
        assert!(editor.draft_untracked().is_some());
        assert!(editor.error.get_untracked().is_some());
        assert!(!editor.saving.get_untracked());
    }

    #[test]
    fn test_commit_while_saving_is_ignored() {
        let memory = MemoryGateway::new();
        let editor = TopicEditor::new();
        editor.start_create(Section::MainsGs2);
        editor.update_topic_field(TopicField::Title("Agriculture".to_string()));
        let before = editor.draft_untracked();
        editor.saving.set(true);

        let gateway: SharedGateway = Arc::new(memory.clone());
        editor.commit(Some(gateway));

        assert!(memory.writes().is_empty());
        assert_eq!(editor.draft_untracked(), before);
        assert!(editor.saving.get_untracked());
        assert!(editor.error.get_untracked().is_none());

        // Cancel is refused mid-save as well.
        editor.cancel();
        assert!(editor.draft_untracked().is_some());
    }

    #[test]
    fn test_start_edit_copies_and_cancel_discards() {
        let memory = MemoryGateway::new();
        let topic = saved_topic(&memory, "Economy");
        let editor = TopicEditor::new();
        editor.start_edit(&topic);
        editor.update_topic_field(TopicField::Trend("rising".to_string()));
        assert_eq!(editor.draft_untracked().and_then(|d| d.id), Some(topic.id.clone()));

        editor.cancel();
        assert!(editor.draft_untracked().is_none());
        assert_eq!(memory.writes().len(), 1);
    }
}
