use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Registry key for one language or role catalog (e.g., `typescript`, `sdet`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(pub String);

/// Identifier of a category (docs) or topic (interview prep), unique per catalog.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

/// Identifier of a single entry, unique within its owning catalog.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

/// Concept key shared by equivalent entries in different catalogs
/// (e.g., `hello-world`).
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossLanguageId(pub String);

macro_rules! id_impls {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $ty {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

id_impls!(CatalogId, CategoryId, EntryId, CrossLanguageId);

impl CrossLanguageId {
    /// Trimmed key used for indexing, or `None` when the id is blank.
    ///
    /// Blank ids are treated as absent so entries that left the field empty
    /// never group together.
    pub fn normalized(&self) -> Option<CrossLanguageId> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(CrossLanguageId(trimmed.to_string()))
        }
    }
}

/// Returns true when `value` is non-empty and matches `^[A-Za-z0-9_.-]+$`.
///
/// Catalog, category, entry and cross-language ids appear in links, so they
/// share the same character set.
pub fn is_url_safe(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Lesson difficulty on a three-step scale.
///
/// Interview banks author `easy`/`medium`/`hard`; those map onto the same
/// levels. `Other` keeps unknown values so validation can report them
/// instead of failing the whole part file.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Other(value) => value.as_str(),
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "beginner" | "easy" => Difficulty::Beginner,
            "intermediate" | "medium" => Difficulty::Intermediate,
            "advanced" | "hard" => Difficulty::Advanced,
            _ => Difficulty::Other(value.to_string()),
        }
    }

    /// Position on the scale; `None` for values outside the closed set.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Difficulty::Beginner => Some(0),
            Difficulty::Intermediate => Some(1),
            Difficulty::Advanced => Some(2),
            Difficulty::Other(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.rank().is_some()
    }

    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// Whether a catalog documents a programming language or a job role.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    #[default]
    Language,
    Role,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Language => "language",
            CatalogKind::Role => "role",
        }
    }
}
