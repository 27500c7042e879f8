//! Schema validation for entries, categories, and catalogs.
//!
//! Validators never stop at the first problem: every violation is collected
//! with a path (catalog, category, entry, field) so authors can fix a batch
//! of issues in one pass. Nothing here panics on malformed content.

use crate::catalog::identity::{
    CatalogId, CategoryId, CrossLanguageId, Difficulty, EntryId, is_url_safe,
};
use crate::catalog::model::{Catalog, Category, Challenge, Entry, QuizQuestion};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Location of a violation inside the content tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViolationPath {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryId>,
    /// Field within the innermost object, e.g. `quiz[0].correctIndex`.
    pub field: String,
}

impl ViolationPath {
    fn field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Default::default()
        }
    }
}

impl fmt::Display for ViolationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = Vec::new();
        if let Some(catalog) = &self.catalog {
            segments.push(display_id(catalog.as_str()));
        }
        if let Some(category) = &self.category {
            segments.push(display_id(category.as_str()));
        }
        if let Some(entry) = &self.entry {
            segments.push(display_id(entry.as_str()));
        }
        let prefix = segments.join("/");
        match (prefix.is_empty(), self.field.is_empty()) {
            (true, _) => f.write_str(&self.field),
            (false, true) => f.write_str(&prefix),
            (false, false) => write!(f, "{prefix}: {}", self.field),
        }
    }
}

fn display_id(id: &str) -> String {
    if id.is_empty() {
        "<unnamed>".to_string()
    } else {
        id.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("required field is missing or empty")]
    MissingField,
    #[error("difficulty '{value}' is not one of beginner, intermediate, advanced")]
    InvalidDifficulty { value: String },
    #[error("correctIndex {index} out of range for {options} options")]
    CorrectIndexOutOfRange { index: i64, options: usize },
    #[error("question has no options")]
    NoOptions,
    #[error("challenge must provide at least one hint")]
    NoHints,
    #[error("tags must not contain empty values")]
    EmptyTag,
    #[error("identifier '{value}' must match ^[A-Za-z0-9_.-]+$")]
    UnsafeIdentifier { value: String },
    #[error("duplicate id '{id}'")]
    DuplicateId { id: String },
    #[error("crossLanguageId '{id}' already used by entry '{first_entry}'")]
    DuplicateCrossLanguageId { id: String, first_entry: String },
}

/// One problem found in authored content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub path: ViolationPath,
    #[serde(flatten)]
    pub kind: ViolationKind,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: ViolationPath, kind: ViolationKind) -> Self {
        let message = kind.to_string();
        Self {
            path,
            kind,
            message,
        }
    }

    fn in_entry(mut self, entry: &EntryId) -> Self {
        self.path.entry = Some(entry.clone());
        self
    }

    fn in_category(mut self, category: &CategoryId) -> Self {
        self.path.category = Some(category.clone());
        self
    }

    fn in_catalog(mut self, catalog: &CatalogId) -> Self {
        self.path.catalog = Some(catalog.clone());
        self
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found across a set of catalogs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_result(self) -> Result<(), Vec<SchemaViolation>> {
        into_result(self.violations)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, violation) in self.violations.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

fn into_result(violations: Vec<SchemaViolation>) -> Result<(), Vec<SchemaViolation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// Validate one entry independently of the catalog that holds it.
///
/// Returned paths carry the entry id and field; category and catalog are
/// filled in by the enclosing validators.
pub fn validate_entry(entry: &Entry) -> Result<(), Vec<SchemaViolation>> {
    let mut violations = Vec::new();
    check_entry(entry, &mut violations);
    into_result(
        violations
            .into_iter()
            .map(|v| v.in_entry(&entry.id))
            .collect(),
    )
}

fn check_entry(entry: &Entry, out: &mut Vec<SchemaViolation>) {
    check_identifier(entry.id.as_str(), "id", out);

    if entry.title.trim().is_empty() {
        out.push(violation("title", ViolationKind::MissingField));
    }

    match &entry.difficulty {
        None => out.push(violation("difficulty", ViolationKind::MissingField)),
        Some(Difficulty::Other(value)) if value.trim().is_empty() => {
            out.push(violation("difficulty", ViolationKind::MissingField))
        }
        Some(difficulty) if !difficulty.is_known() => out.push(violation(
            "difficulty",
            ViolationKind::InvalidDifficulty {
                value: difficulty.as_str().to_string(),
            },
        )),
        Some(_) => {}
    }

    // Checked on the raw value; blank ids count as absent.
    if let Some(raw) = &entry.cross_language_id {
        if entry.cross_language_key().is_some() && !is_url_safe(raw.as_str()) {
            out.push(violation(
                "crossLanguageId",
                ViolationKind::UnsafeIdentifier {
                    value: raw.0.clone(),
                },
            ));
        }
    }

    for (idx, tag) in entry.tags.iter().enumerate() {
        if tag.trim().is_empty() {
            out.push(violation(format!("tags[{idx}]"), ViolationKind::EmptyTag));
        }
    }

    if entry.sections.is_empty() {
        out.push(violation("sections", ViolationKind::MissingField));
    }
    for (idx, section) in entry.sections.iter().enumerate() {
        if section.heading.trim().is_empty() {
            out.push(violation(
                format!("sections[{idx}].heading"),
                ViolationKind::MissingField,
            ));
        }
        if let Some(diagram) = &section.diagram {
            if diagram.source.trim().is_empty() {
                out.push(violation(
                    format!("sections[{idx}].diagram.source"),
                    ViolationKind::MissingField,
                ));
            }
        }
    }

    if let Some(quiz) = &entry.quiz {
        for (idx, question) in quiz.iter().enumerate() {
            check_question(idx, question, out);
        }
    }

    if let Some(challenge) = &entry.challenge {
        check_challenge(challenge, out);
    }
}

fn check_question(idx: usize, question: &QuizQuestion, out: &mut Vec<SchemaViolation>) {
    if question.question.trim().is_empty() {
        out.push(violation(
            format!("quiz[{idx}].question"),
            ViolationKind::MissingField,
        ));
    }
    if question.options.is_empty() {
        out.push(violation(
            format!("quiz[{idx}].options"),
            ViolationKind::NoOptions,
        ));
    }
    let in_range = usize::try_from(question.correct_index)
        .map(|index| index < question.options.len())
        .unwrap_or(false);
    if !in_range {
        out.push(violation(
            format!("quiz[{idx}].correctIndex"),
            ViolationKind::CorrectIndexOutOfRange {
                index: question.correct_index,
                options: question.options.len(),
            },
        ));
    }
}

fn check_challenge(challenge: &Challenge, out: &mut Vec<SchemaViolation>) {
    if challenge.prompt.trim().is_empty() {
        out.push(violation("challenge.prompt", ViolationKind::MissingField));
    }
    if challenge.solution.trim().is_empty() {
        out.push(violation("challenge.solution", ViolationKind::MissingField));
    }
    if challenge.hints.is_empty() {
        out.push(violation("challenge.hints", ViolationKind::NoHints));
    }
}

/// Validate category metadata and every entry it contains.
///
/// `id` and `label` are required. `icon` and `description` are optional
/// display hints and may be blank.
pub fn validate_category(category: &Category) -> Result<(), Vec<SchemaViolation>> {
    into_result(category_violations(category))
}

fn category_violations(category: &Category) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    check_identifier(category.id.as_str(), "id", &mut violations);
    if category.label.trim().is_empty() {
        violations.push(violation("label", ViolationKind::MissingField));
    }
    for entry in &category.entries {
        if let Err(entry_violations) = validate_entry(entry) {
            violations.extend(entry_violations);
        }
    }
    violations
        .into_iter()
        .map(|v| v.in_category(&category.id))
        .collect()
}

/// Validate a whole catalog, including id uniqueness across its categories.
///
/// Of the catalog metadata only `id` and `label` are required; `icon`,
/// `color` and `tagline` are optional display hints, and every declared
/// link must carry a URL.
///
/// Entry ids and cross-language ids are scoped per catalog: the same id may
/// appear in another catalog without conflict.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), Vec<SchemaViolation>> {
    into_result(catalog_violations(catalog))
}

fn catalog_violations(catalog: &Catalog) -> Vec<SchemaViolation> {
    let meta = &catalog.metadata;
    let mut violations = Vec::new();
    check_identifier(meta.id.as_str(), "id", &mut violations);
    if meta.label.trim().is_empty() {
        violations.push(violation("label", ViolationKind::MissingField));
    }
    for (name, url) in &meta.links {
        if url.trim().is_empty() {
            violations.push(violation(
                format!("links.{name}"),
                ViolationKind::MissingField,
            ));
        }
    }

    let mut category_ids: BTreeSet<&str> = BTreeSet::new();
    let mut entry_ids: BTreeSet<&str> = BTreeSet::new();
    let mut cross_ids: BTreeMap<CrossLanguageId, &EntryId> = BTreeMap::new();

    for category in &catalog.categories {
        violations.extend(category_violations(category));

        let category_id = category.id.as_str();
        if !category_id.is_empty() && !category_ids.insert(category_id) {
            violations.push(
                violation(
                    "id",
                    ViolationKind::DuplicateId {
                        id: category_id.to_string(),
                    },
                )
                .in_category(&category.id),
            );
        }

        for entry in &category.entries {
            let entry_id = entry.id.as_str();
            if !entry_id.is_empty() && !entry_ids.insert(entry_id) {
                violations.push(
                    violation(
                        "id",
                        ViolationKind::DuplicateId {
                            id: entry_id.to_string(),
                        },
                    )
                    .in_entry(&entry.id)
                    .in_category(&category.id),
                );
            }

            if let Some(cross) = entry.cross_language_key() {
                if let Some(first) = cross_ids.get(&cross) {
                    violations.push(
                        violation(
                            "crossLanguageId",
                            ViolationKind::DuplicateCrossLanguageId {
                                id: cross.0.clone(),
                                first_entry: first.0.clone(),
                            },
                        )
                        .in_entry(&entry.id)
                        .in_category(&category.id),
                    );
                } else {
                    cross_ids.insert(cross, &entry.id);
                }
            }
        }
    }

    violations
        .into_iter()
        .map(|v| v.in_catalog(&meta.id))
        .collect()
}

/// Validate every catalog plus catalog-id uniqueness across the set.
pub fn validate_registry(catalogs: &[Catalog]) -> ValidationReport {
    let mut violations = Vec::new();
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for catalog in catalogs {
        violations.extend(catalog_violations(catalog));
        let id = catalog.id().as_str();
        if !id.is_empty() && !seen.insert(id) {
            violations.push(
                violation("id", ViolationKind::DuplicateId { id: id.to_string() })
                    .in_catalog(catalog.id()),
            );
        }
    }
    ValidationReport { violations }
}

fn check_identifier(value: &str, field: &str, out: &mut Vec<SchemaViolation>) {
    if value.trim().is_empty() {
        out.push(violation(field, ViolationKind::MissingField));
    } else if !is_url_safe(value) {
        out.push(violation(
            field,
            ViolationKind::UnsafeIdentifier {
                value: value.to_string(),
            },
        ));
    }
}

fn violation(field: impl Into<String>, kind: ViolationKind) -> SchemaViolation {
    SchemaViolation::new(ViolationPath::field(field), kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::identity::CatalogKind;
    use crate::catalog::model::{CatalogMetadata, Section};

    fn entry(id: &str) -> Entry {
        Entry {
            id: EntryId(id.to_string()),
            title: format!("Title for {id}"),
            difficulty: Some(Difficulty::Beginner),
            sections: vec![Section {
                heading: "Intro".into(),
                content: "Prose".into(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn quiz_entry(options: usize, correct_index: i64) -> Entry {
        Entry {
            quiz: Some(vec![QuizQuestion {
                question: "Pick one".into(),
                options: (0..options).map(|i| format!("option {i}")).collect(),
                correct_index,
                explanation: None,
            }]),
            ..entry("quiz-entry")
        }
    }

    fn catalog(id: &str, categories: Vec<Category>) -> Catalog {
        Catalog::new(
            CatalogMetadata {
                id: CatalogId(id.to_string()),
                kind: CatalogKind::Language,
                label: id.to_uppercase(),
                ..Default::default()
            },
            categories,
        )
    }

    fn category(id: &str, entries: Vec<Entry>) -> Category {
        Category {
            id: CategoryId(id.to_string()),
            label: id.to_uppercase(),
            icon: "book".into(),
            description: None,
            entries,
        }
    }

    #[test]
    fn valid_entry_passes() {
        assert_eq!(validate_entry(&entry("hello-world-ts")), Ok(()));
    }

    #[test]
    fn correct_index_equal_to_len_is_rejected() {
        let violations = validate_entry(&quiz_entry(4, 4)).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.field, "quiz[0].correctIndex");
        assert_eq!(
            violations[0].path.entry.as_ref().map(EntryId::as_str),
            Some("quiz-entry")
        );
        assert_eq!(
            violations[0].kind,
            ViolationKind::CorrectIndexOutOfRange {
                index: 4,
                options: 4
            }
        );
        assert_eq!(validate_entry(&quiz_entry(4, 3)), Ok(()));
    }

    #[test]
    fn negative_correct_index_is_rejected() {
        let violations = validate_entry(&quiz_entry(2, -1)).unwrap_err();
        assert!(matches!(
            violations[0].kind,
            ViolationKind::CorrectIndexOutOfRange { index: -1, .. }
        ));
    }

    #[test]
    fn reports_every_violation_at_once() {
        let broken = Entry {
            difficulty: Some(Difficulty::Other("expert".into())),
            challenge: Some(Challenge {
                prompt: "Do it".into(),
                solution: "done".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let violations = validate_entry(&broken).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.path.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["id", "title", "difficulty", "sections", "challenge.hints"]
        );
        assert!(matches!(
            violations[2].kind,
            ViolationKind::InvalidDifficulty { ref value } if value == "expert"
        ));
    }

    #[test]
    fn category_prefixes_entry_paths() {
        let cat = category("basics", vec![entry("ok"), quiz_entry(1, 5)]);
        let violations = validate_category(&cat).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "basics/quiz-entry: quiz[0].correctIndex: correctIndex 5 out of range for 1 options"
        );
    }

    #[test]
    fn empty_category_is_allowed() {
        assert_eq!(validate_category(&category("later", vec![])), Ok(()));
    }

    #[test]
    fn catalog_detects_duplicate_entry_ids_across_categories() {
        let cat = catalog(
            "typescript",
            vec![
                category("basics", vec![entry("intro")]),
                category("types", vec![entry("intro")]),
            ],
        );
        let violations = validate_catalog(&cat).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].kind,
            ViolationKind::DuplicateId {
                id: "intro".into()
            }
        );
        assert_eq!(
            violations[0].path.category.as_ref().map(CategoryId::as_str),
            Some("types")
        );
    }

    #[test]
    fn catalog_detects_duplicate_cross_language_ids() {
        let mut first = entry("hello-a");
        first.cross_language_id = Some(CrossLanguageId("hello-world".into()));
        let mut second = entry("hello-b");
        second.cross_language_id = Some(CrossLanguageId(" hello-world".into()));
        let mut blank_a = entry("blank-a");
        blank_a.cross_language_id = Some(CrossLanguageId("".into()));
        let mut blank_b = entry("blank-b");
        blank_b.cross_language_id = Some(CrossLanguageId("  ".into()));

        let cat = catalog(
            "python",
            vec![category("basics", vec![first, second, blank_a, blank_b])],
        );
        let violations = validate_catalog(&cat).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].kind,
            ViolationKind::UnsafeIdentifier {
                value: " hello-world".into()
            }
        );
        assert_eq!(
            violations[1].kind,
            ViolationKind::DuplicateCrossLanguageId {
                id: "hello-world".into(),
                first_entry: "hello-a".into()
            }
        );
    }

    #[test]
    fn registry_allows_same_entry_id_in_different_catalogs() {
        let report = validate_registry(&[
            catalog("typescript", vec![category("basics", vec![entry("intro")])]),
            catalog("python", vec![category("basics", vec![entry("intro")])]),
        ]);
        assert!(report.is_clean(), "{report}");
    }

    #[test]
    fn registry_rejects_duplicate_catalog_ids() {
        let report = validate_registry(&[catalog("go", vec![]), catalog("go", vec![])]);
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].to_string(), "go: id: duplicate id 'go'");
    }

    #[test]
    fn unsafe_identifiers_are_reported() {
        let cat = category("has space", vec![entry("a/b")]);
        let violations = validate_category(&cat).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(
            violations
                .iter()
                .all(|v| matches!(v.kind, ViolationKind::UnsafeIdentifier { .. }))
        );
    }

    #[test]
    fn padded_cross_language_id_is_unsafe() {
        let mut padded = entry("hello-py");
        padded.cross_language_id = Some(CrossLanguageId(" hello-world ".into()));
        let violations = validate_entry(&padded).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.field, "crossLanguageId");
        assert_eq!(
            violations[0].kind,
            ViolationKind::UnsafeIdentifier {
                value: " hello-world ".into()
            }
        );

        let mut blank = entry("blank");
        blank.cross_language_id = Some(CrossLanguageId("   ".into()));
        assert_eq!(validate_entry(&blank), Ok(()));
    }

    #[test]
    fn blank_difficulty_is_missing() {
        for value in ["", "  "] {
            let blank = Entry {
                difficulty: Some(Difficulty::Other(value.into())),
                ..entry("blank-difficulty")
            };
            let violations = validate_entry(&blank).unwrap_err();
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].path.field, "difficulty");
            assert_eq!(violations[0].kind, ViolationKind::MissingField);
        }
    }

    #[test]
    fn blank_display_hints_are_optional() {
        let mut cat = category("basics", vec![entry("intro")]);
        cat.icon.clear();
        let mut lang = catalog("go", vec![cat]);
        lang.metadata.icon.clear();
        lang.metadata.color.clear();
        lang.metadata.tagline.clear();
        assert_eq!(validate_catalog(&lang), Ok(()));

        lang.metadata.label.clear();
        let violations = validate_catalog(&lang).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path.field, "label");
    }

    #[test]
    fn violation_serializes_with_kind_tag() {
        let violations = validate_entry(&quiz_entry(2, 2)).unwrap_err();
        let json = serde_json::to_value(&violations[0]).unwrap();
        assert_eq!(json["kind"], "correct_index_out_of_range");
        assert_eq!(json["path"]["field"], "quiz[0].correctIndex");
        assert_eq!(json["options"], 2);
    }
}
