//! Typed content model: entries, categories, and catalogs.
//!
//! Field names follow the camelCase keys used by authored content. Required
//! text fields default to empty when missing so that a malformed entry still
//! deserializes and shows up in the validation report next to every other
//! problem, instead of aborting the whole part file.

use crate::catalog::identity::{
    CatalogId, CatalogKind, CategoryId, CrossLanguageId, Difficulty, EntryId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One teachable unit: a documentation lesson or an interview question.
pub struct Entry {
    #[serde(default)]
    pub id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_language_id: Option<CrossLanguageId>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<Challenge>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Ordered content block inside an entry.
pub struct Section {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram: Option<Diagram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Diagram descriptor handed to the renderer untouched (e.g. `kind: "mermaid"`).
pub struct Diagram {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Multiple-choice question.
///
/// `correct_index` is signed so that negative authored values survive
/// deserialization and get reported by validation.
pub struct QuizQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    /// The correct option, when `correct_index` is in range.
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_index)
            .ok()
            .and_then(|idx| self.options.get(idx))
            .map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Coding exercise attached to an entry.
pub struct Challenge {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub starter_code: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub hints: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Labeled group of entries: a docs category or an interview topic.
pub struct Category {
    #[serde(default)]
    pub id: CategoryId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "questions")]
    pub entries: Vec<Entry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Display metadata for a catalog, as declared in its manifest.
pub struct CatalogMetadata {
    #[serde(default)]
    pub id: CatalogId,
    #[serde(default)]
    pub kind: CatalogKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Published content for one language or role.
pub struct Catalog {
    #[serde(flatten)]
    pub metadata: CatalogMetadata,
    #[serde(default, alias = "topics")]
    pub categories: Vec<Category>,
}

impl Catalog {
    pub fn new(metadata: CatalogMetadata, categories: Vec<Category>) -> Self {
        Self {
            metadata,
            categories,
        }
    }

    pub fn id(&self) -> &CatalogId {
        &self.metadata.id
    }

    /// All entries in aggregated order, paired with their category.
    pub fn entries(&self) -> impl Iterator<Item = (&Category, &Entry)> {
        self.categories
            .iter()
            .flat_map(|category| category.entries.iter().map(move |entry| (category, entry)))
    }

    pub fn entry_count(&self) -> usize {
        self.categories.iter().map(|c| c.entries.len()).sum()
    }
}

impl Entry {
    /// Normalized cross-language key; blank ids count as absent.
    pub fn cross_language_key(&self) -> Option<CrossLanguageId> {
        self.cross_language_id
            .as_ref()
            .and_then(CrossLanguageId::normalized)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn quiz_len(&self) -> usize {
        self.quiz.as_ref().map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entry_parses_authored_camel_case() {
        let entry: Entry = serde_json::from_value(json!({
            "id": "hello-world-ts",
            "crossLanguageId": "hello-world",
            "title": "Hello, World",
            "difficulty": "beginner",
            "tags": ["basics"],
            "sections": [{
                "heading": "Printing",
                "content": "Use console.log.",
                "code": "console.log('hi');",
                "codeLanguage": "typescript",
                "output": "hi",
                "diagram": {"kind": "mermaid", "source": "graph TD; A-->B"}
            }],
            "quiz": [{"question": "Which prints?", "options": ["log", "echo"], "correctIndex": 0}],
            "challenge": {"prompt": "Greet", "starterCode": "", "solution": "console.log('hi')", "hints": ["use log"]}
        }))
        .unwrap();

        assert_eq!(entry.id.as_str(), "hello-world-ts");
        assert_eq!(
            entry.cross_language_key(),
            Some(CrossLanguageId("hello-world".into()))
        );
        assert_eq!(entry.difficulty, Some(Difficulty::Beginner));
        assert_eq!(entry.sections[0].code_language.as_deref(), Some("typescript"));
        assert_eq!(entry.quiz.as_ref().unwrap()[0].correct_option(), Some("log"));
        assert_eq!(entry.challenge.as_ref().unwrap().hints.len(), 1);
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let entry: Entry = serde_json::from_value(json!({"tags": []})).unwrap();
        assert!(entry.id.as_str().is_empty());
        assert!(entry.title.is_empty());
        assert!(entry.difficulty.is_none());
        assert!(entry.sections.is_empty());
    }

    #[test]
    fn topics_and_questions_aliases_load_role_content() {
        let catalog: Catalog = serde_json::from_value(json!({
            "id": "sdet",
            "kind": "role",
            "label": "SDET",
            "topics": [{"id": "automation", "label": "Automation", "questions": [{"id": "q1"}]}]
        }))
        .unwrap();
        assert_eq!(catalog.metadata.kind, CatalogKind::Role);
        assert_eq!(catalog.categories[0].entries[0].id.as_str(), "q1");
        assert_eq!(catalog.entry_count(), 1);
    }

    #[test]
    fn correct_option_rejects_negative_index() {
        let question = QuizQuestion {
            question: "q".into(),
            options: vec!["a".into()],
            correct_index: -1,
            explanation: None,
        };
        assert_eq!(question.correct_option(), None);
    }
}
