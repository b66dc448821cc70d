//! Core data models for optionhub.
//!
//! These types are shared across all optionhub crates: storage rows, the
//! vocabulary selector, and the response shapes built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// VOCABULARY TYPES
// =============================================================================

/// A flat reference vocabulary.
///
/// Every vocabulary is backed by a table with the same `(id, name)` shape, so
/// the variant is the only thing that differs between them. Table names are
/// derived from this closed set and never from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    Os,
    Workplace,
    StudyPlace,
    Hobby,
    Skill,
    City,
    SocietyDirection,
}

impl Vocabulary {
    /// Every vocabulary, in registration order.
    pub const ALL: [Vocabulary; 7] = [
        Vocabulary::Os,
        Vocabulary::Workplace,
        Vocabulary::StudyPlace,
        Vocabulary::Hobby,
        Vocabulary::Skill,
        Vocabulary::City,
        Vocabulary::SocietyDirection,
    ];

    /// URL slug, also used as the structured log value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vocabulary::Os => "os",
            Vocabulary::Workplace => "workplace",
            Vocabulary::StudyPlace => "study_place",
            Vocabulary::Hobby => "hobby",
            Vocabulary::Skill => "skill",
            Vocabulary::City => "city",
            Vocabulary::SocietyDirection => "society_direction",
        }
    }

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        self.as_str()
    }

    pub fn parse(s: &str) -> Option<Self> {
        Vocabulary::ALL.into_iter().find(|v| v.as_str() == s)
    }
}

impl std::fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Vocabulary {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vocabulary::parse(s).ok_or_else(|| crate::Error::NotFound(format!("vocabulary '{}'", s)))
    }
}

/// One row of a flat vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryItem {
    pub id: i64,
    #[sqlx(rename = "name")]
    pub label: String,
}

/// A vocabulary entry as returned by get-by-id and add operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRecord {
    pub id: i64,
    pub value: String,
}

// =============================================================================
// ATTRIBUTE TYPES
// =============================================================================

/// A named classification dimension (e.g. "City") owning a forest of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attribute {
    pub id: i64,
    pub name: String,
}

/// One stored node of an attribute's value hierarchy.
///
/// `parent_id` of `None` marks a root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttributeValue {
    pub id: i64,
    pub attribute_id: i64,
    pub value: String,
    pub parent_id: Option<i64>,
}

/// Insert payload for a new attribute value; the store allocates the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttributeValue {
    pub attribute_id: i64,
    pub value: String,
    pub parent_id: Option<i64>,
}

/// Response-shaped node of an attribute value tree.
///
/// `children` is always present, empty for leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionNode {
    pub option_id: i64,
    pub option_value: String,
    pub children: Vec<OptionNode>,
}

// =============================================================================
// MODERATION TYPES
// =============================================================================

/// A pending user-submitted value awaiting moderation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OptionRequest {
    pub id: i64,
    pub attribute_id: i64,
    pub value: String,
    pub user_uuid: String,
    pub created_at: DateTime<Utc>,
}

/// An [`OptionRequest`] annotated with the name of the attribute it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRequestItem {
    pub option_request_id: i64,
    pub attribute_id: i64,
    /// Empty when the attribute no longer resolves.
    pub attribute_name: String,
    pub option_request_value: String,
    pub user_uuid: String,
    pub created_at: DateTime<Utc>,
}
