use crate::models::{DocumentId, Question, Section, Topic, TopicDocument};
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub(crate) enum DraftError {
    #[error("question {index} does not exist ({len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum QuestionField {
    Prompt,
    Year,
    Solution,
}

/// Replacement for one top-level field of a draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TopicField {
    Title(String),
    Section(Section),
    Trend(String),
    StudyLink(String),
}

/// Working copy of a topic being created or edited.
///
/// Owns its question list outright: every nested mutation replaces by index
/// and never aliases the store's data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TopicDraft {
    /// `None` until the topic has been committed once.
    pub id: Option<DocumentId>,
    pub doc: TopicDocument,
}

impl TopicDraft {
    pub fn new_in(section: Section) -> Self {
        Self {
            id: None,
            doc: TopicDocument::empty_in(section),
        }
    }

    pub fn from_topic(topic: &Topic) -> Self {
        Self {
            id: Some(topic.id.clone()),
            doc: topic.doc.clone(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn questions(&self) -> &[Question] {
        &self.doc.questions
    }

    pub fn add_question(&mut self) {
        self.doc.questions.push(Question::default());
    }

    pub fn remove_question(&mut self, index: usize) -> Result<Question, DraftError> {
        self.check_index(index)?;
        Ok(self.doc.questions.remove(index))
    }

    pub fn update_question_field(
        &mut self,
        index: usize,
        field: QuestionField,
        value: String,
    ) -> Result<(), DraftError> {
        self.check_index(index)?;
        let q = &mut self.doc.questions[index];
        match field {
            QuestionField::Prompt => q.q = value,
            QuestionField::Year => q.year = value,
            QuestionField::Solution => q.solution = value,
        }
        Ok(())
    }

    pub fn update_topic_field(&mut self, field: TopicField) {
        match field {
            TopicField::Title(v) => self.doc.title = v,
            TopicField::Section(s) => self.doc.section = s,
            TopicField::Trend(v) => self.doc.trend = v,
            TopicField::StudyLink(v) => self.doc.study_link = v,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), DraftError> {
        let len = self.doc.questions.len();
        if index < len {
            Ok(())
        } else {
            Err(DraftError::QuestionOutOfRange { index, len })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(prompt: &str, year: &str) -> Question {
        Question {
            q: prompt.to_string(),
            year: year.to_string(),
            solution: String::new(),
        }
    }

    fn draft_with(questions: Vec<Question>) -> TopicDraft {
        let mut d = TopicDraft::new_in(Section::MainsEssay);
        d.doc.title = "X".to_string();
        d.doc.questions = questions;
        d
    }

    #[test]
    fn test_new_draft_is_empty_in_section() {
        let d = TopicDraft::new_in(Section::PrelimsCsat);
        assert!(d.is_new());
        assert_eq!(d.doc.section, Section::PrelimsCsat);
        assert!(d.questions().is_empty());
        assert_eq!(d.doc.title, "");
    }

    #[test]
    fn test_edit_draft_copies_topic_including_id() {
        let topic = Topic {
            id: DocumentId::new("t-1").expect("id"),
            doc: draft_with(vec![q("a", "2020")]).doc,
        };
        let mut d = TopicDraft::from_topic(&topic);
        assert_eq!(d.id, Some(topic.id.clone()));
        assert_eq!(d.doc, topic.doc);

        d.update_topic_field(TopicField::Title("changed".to_string()));
        assert_eq!(topic.doc.title, "X");
    }

    #[test]
    fn test_add_then_remove_restores_questions() {
        let starts = vec![
            vec![],
            vec![q("a", "2019")],
            vec![q("a", "2019"), q("b", "2020"), q("c", "2021")],
        ];
        for start in starts {
            let mut d = draft_with(start.clone());
            d.add_question();
            let added = d.questions().len() - 1;
            let removed = d.remove_question(added).expect("in range");
            assert_eq!(removed, Question::default());
            assert_eq!(d.questions(), start.as_slice());
        }
    }

    #[test]
    fn test_two_adds_then_remove_first_leaves_second() {
        let mut d = draft_with(vec![]);
        d.add_question();
        d.add_question();
        d.update_question_field(1, QuestionField::Year, "2024".to_string())
            .expect("in range");
        d.remove_question(0).expect("in range");
        assert_eq!(d.questions().len(), 1);
        assert_eq!(d.questions()[0].year, "2024");
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut d = draft_with(vec![q("a", "1"), q("b", "2"), q("c", "3")]);
        d.remove_question(1).expect("in range");
        let prompts: Vec<&str> = d.questions().iter().map(|q| q.q.as_str()).collect();
        assert_eq!(prompts, vec!["a", "c"]);
    }

    #[test]
    fn test_update_question_field_touches_only_that_field() {
        let mut d = draft_with(vec![q("a", "1"), q("b", "2")]);
        d.update_question_field(0, QuestionField::Solution, "answer".to_string())
            .expect("in range");
        assert_eq!(d.questions()[0], Question {
            q: "a".to_string(),
            year: "1".to_string(),
            solution: "answer".to_string(),
        });
        assert_eq!(d.questions()[1], q("b", "2"));

        d.update_question_field(1, QuestionField::Prompt, "b2".to_string())
            .expect("in range");
        assert_eq!(d.questions()[1].q, "b2");
    }

    #[test]
    fn test_out_of_range_index_is_rejected_without_change() {
        let mut d = draft_with(vec![q("a", "1")]);
        let before = d.clone();
        assert_eq!(
            d.remove_question(1),
            Err(DraftError::QuestionOutOfRange { index: 1, len: 1 })
        );
        assert!(d
            .update_question_field(5, QuestionField::Year, "x".to_string())
            .is_err());
        assert_eq!(d, before);
    }

    #[test]
    fn test_update_topic_fields() {
        let mut d = TopicDraft::new_in(Section::MainsGs1);
        d.update_topic_field(TopicField::Title("Ethics".to_string()));
        d.update_topic_field(TopicField::Section(Section::Interview));
        d.update_topic_field(TopicField::Trend("Case studies".to_string()));
        d.update_topic_field(TopicField::StudyLink("https://notes".to_string()));
        assert_eq!(d.doc.title, "Ethics");
        assert_eq!(d.doc.section, Section::Interview);
        assert_eq!(d.doc.trend, "Case studies");
        assert_eq!(d.doc.study_link, "https://notes");
        assert!(d.questions().is_empty());
    }
}
