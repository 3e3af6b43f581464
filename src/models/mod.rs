use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Remote document identifier.
///
/// Assigned by the storage layer on create and carried next to the document,
/// never inside it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub(crate) struct DocumentId(String);

impl DocumentId {
    /// Returns `None` for blank ids; persisted topics always carry a non-empty id.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Curriculum sections, in navigation order.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
pub(crate) enum Section {
    #[serde(rename = "prelims-gs")]
    #[strum(serialize = "prelims-gs")]
    PrelimsGs,
    #[serde(rename = "prelims-csat")]
    #[strum(serialize = "prelims-csat")]
    PrelimsCsat,
    #[serde(rename = "mains-hindi")]
    #[strum(serialize = "mains-hindi")]
    MainsHindi,
    #[default]
    #[serde(rename = "mains-gs1")]
    #[strum(serialize = "mains-gs1")]
    MainsGs1,
    #[serde(rename = "mains-gs2")]
    #[strum(serialize = "mains-gs2")]
    MainsGs2,
    #[serde(rename = "mains-essay")]
    #[strum(serialize = "mains-essay")]
    MainsEssay,
    #[serde(rename = "optional")]
    #[strum(serialize = "optional")]
    Optional,
    #[serde(rename = "interview")]
    #[strum(serialize = "interview")]
    Interview,
}

impl Section {
    pub fn all() -> impl Iterator<Item = Section> {
        Section::iter()
    }

    /// Wire id, also used in routes.
    pub fn id(self) -> &'static str {
        match self {
            Section::PrelimsGs => "prelims-gs",
            Section::PrelimsCsat => "prelims-csat",
            Section::MainsHindi => "mains-hindi",
            Section::MainsGs1 => "mains-gs1",
            Section::MainsGs2 => "mains-gs2",
            Section::MainsEssay => "mains-essay",
            Section::Optional => "optional",
            Section::Interview => "interview",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::PrelimsGs => "Prelims GS",
            Section::PrelimsCsat => "Prelims CSAT",
            Section::MainsHindi => "General Hindi",
            Section::MainsGs1 => "GS Paper 1",
            Section::MainsGs2 => "GS Paper 2",
            Section::MainsEssay => "Essay",
            Section::Optional => "Optional",
            Section::Interview => "Interview",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }
}

/// A prior exam question embedded in a topic.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Question {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub solution: String,
}

/// Topic body as stored remotely. The id is deliberately not part of it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TopicDocument {
    #[serde(default)]
    pub title: String,
    /// Required on the wire: a document without a section is undecodable,
    /// the same as one with an unknown section.
    pub section: Section,
    #[serde(default)]
    pub trend: String,
    #[serde(default, rename = "studyLink")]
    pub study_link: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl TopicDocument {
    pub fn empty_in(section: Section) -> Self {
        Self {
            section,
            ..Default::default()
        }
    }
}

/// A persisted topic: remote id plus document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Topic {
    pub id: DocumentId,
    pub doc: TopicDocument,
}

impl Topic {
    pub fn title(&self) -> &str {
        &self.doc.title
    }

    pub fn section(&self) -> Section {
        self.doc.section
    }

    pub fn has_study_link(&self) -> bool {
        !self.doc.study_link.trim().is_empty()
    }
}
