mod topic;

pub(crate) use topic::{DraftError, QuestionField, TopicDraft, TopicField};
