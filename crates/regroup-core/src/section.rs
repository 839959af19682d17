#![forbid(unsafe_code)]

//! The section model supplied by the host editor.
//!
//! A [`Section`] is one addressable, typed, orderable unit of a résumé. The
//! engine never inspects `data`; its shape belongs to the per-type editors.
//!
//! # Invariants
//! 1. Section ids are unique within one list (duplicates are dropped on
//!    ingest, see [`dedup_sections`]).
//! 2. Parsing a [`SectionType`] never fails: unknown or empty strings map to
//!    [`SectionType::Unrecognized`].

use std::fmt;

use ahash::AHashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Unique identifier of a section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SectionId(String);

impl SectionId {
    /// Create a section id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identifier of the résumé a section list belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ResumeId(String);

impl ResumeId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResumeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// ---------------------------------------------------------------------------
// SectionType
// ---------------------------------------------------------------------------

/// The kind of a résumé section.
///
/// Sections of equal kind that sit next to each other form one group.
/// [`SectionType::Unrecognized`] carries whatever raw string the backend sent
/// (possibly empty) and never coalesces with a neighbour.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionType {
    Summary,
    Experience,
    Education,
    Skill,
    Project,
    Certification,
    Award,
    Language,
    Volunteer,
    Publication,
    Interest,
    Reference,
    Custom,
    /// Missing or unknown type string.
    Unrecognized(String),
}

impl SectionType {
    /// Parse a wire type string. Case-insensitive; surrounding whitespace and
    /// a trailing plural `s` are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        match singular {
            "summary" | "summarie" => Self::Summary,
            "experience" | "work" => Self::Experience,
            "education" => Self::Education,
            "skill" => Self::Skill,
            "project" => Self::Project,
            "certification" => Self::Certification,
            "award" => Self::Award,
            "language" => Self::Language,
            "volunteer" => Self::Volunteer,
            "publication" => Self::Publication,
            "interest" => Self::Interest,
            "reference" => Self::Reference,
            "custom" => Self::Custom,
            _ => Self::Unrecognized(raw.to_string()),
        }
    }

    /// Stable lowercase label, used in group keys and logs.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Summary => "summary",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skill => "skill",
            Self::Project => "project",
            Self::Certification => "certification",
            Self::Award => "award",
            Self::Language => "language",
            Self::Volunteer => "volunteer",
            Self::Publication => "publication",
            Self::Interest => "interest",
            Self::Reference => "reference",
            Self::Custom => "custom",
            Self::Unrecognized(_) => "unrecognized",
        }
    }

    /// Whether adjacent sections of this kind merge into one group.
    #[inline]
    #[must_use]
    pub fn coalesces(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// Whether two adjacent sections belong to the same group.
    #[inline]
    #[must_use]
    pub fn coalesces_with(&self, next: &Self) -> bool {
        self.coalesces() && self == next
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for SectionType {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Default for SectionType {
    /// A missing type.
    fn default() -> Self {
        Self::Unrecognized(String::new())
    }
}

/// Serialized as the wire string: the label, or the raw string the backend
/// sent for [`SectionType::Unrecognized`].
#[cfg(feature = "serde")]
impl Serialize for SectionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unrecognized(raw) => serializer.serialize_str(raw),
            known => serializer.serialize_str(known.label()),
        }
    }
}

/// Accepts any string or `null`; never fails on an unknown kind.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SectionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::parse(raw.as_deref().unwrap_or_default()))
    }
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// One section of a résumé.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Section<D = ()> {
    pub id: SectionId,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub kind: SectionType,
    /// Dense rank among all sections of the résumé. Advisory only: the
    /// position in the list is authoritative during a drag session.
    pub index: usize,
    pub data: D,
}

impl Section<()> {
    /// Create a section without payload.
    #[must_use]
    pub fn bare(id: impl Into<SectionId>, kind: impl Into<SectionType>, index: usize) -> Self {
        Self::new(id, kind, index, ())
    }
}

impl<D> Section<D> {
    #[must_use]
    pub fn new(
        id: impl Into<SectionId>,
        kind: impl Into<SectionType>,
        index: usize,
        data: D,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            index,
            data,
        }
    }
}

/// Drop later duplicates of an id, keeping the first occurrence.
///
/// Returns the number of sections removed.
pub fn dedup_sections<D>(sections: &mut Vec<Section<D>>) -> usize {
    let before = sections.len();
    let mut seen = AHashSet::with_capacity(before);
    sections.retain(|section| {
        let fresh = seen.insert(section.id.clone());
        if !fresh {
            tracing::warn!(
                target: "regroup.order",
                section_id = %section.id,
                "duplicate section id dropped"
            );
        }
        fresh
    });
    before - sections.len()
}
