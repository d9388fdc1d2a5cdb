//! Entity kinds and kind-level metadata

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::descriptor::{self, KindDescriptor};
use crate::core::id::strip_base_url;

/// The six OpenAlex entity kinds this cache handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Author,
    Concept,
    Funder,
    Institution,
    Publisher,
    Topic,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Author => "author",
            EntityKind::Concept => "concept",
            EntityKind::Funder => "funder",
            EntityKind::Institution => "institution",
            EntityKind::Publisher => "publisher",
            EntityKind::Topic => "topic",
        }
    }

    /// Plural form, which is also the parent table name and the API path
    /// segment (`https://api.openalex.org/<plural>/<id>`).
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Author => "authors",
            EntityKind::Concept => "concepts",
            EntityKind::Funder => "funders",
            EntityKind::Institution => "institutions",
            EntityKind::Publisher => "publishers",
            EntityKind::Topic => "topics",
        }
    }

    pub fn all() -> &'static [EntityKind] {
        &[
            EntityKind::Author,
            EntityKind::Concept,
            EntityKind::Funder,
            EntityKind::Institution,
            EntityKind::Publisher,
            EntityKind::Topic,
        ]
    }

    /// Infer the kind from an OpenAlex ID (bare or prefixed).
    ///
    /// Short IDs are one kind letter followed by digits, e.g. `A5023888391`
    /// or `T11636`. Anything else (subfield/field/domain paths included)
    /// yields `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        let stripped = strip_base_url(id);
        let mut chars = stripped.chars();
        let head = chars.next()?;
        let rest = chars.as_str();
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match head.to_ascii_uppercase() {
            'A' => Some(EntityKind::Author),
            'C' => Some(EntityKind::Concept),
            'F' => Some(EntityKind::Funder),
            'I' => Some(EntityKind::Institution),
            'P' => Some(EntityKind::Publisher),
            'T' => Some(EntityKind::Topic),
            _ => None,
        }
    }

    /// The relational mapping for this kind.
    pub fn descriptor(&self) -> &'static KindDescriptor {
        descriptor::for_kind(*self)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "author" | "authors" => Ok(EntityKind::Author),
            "concept" | "concepts" => Ok(EntityKind::Concept),
            "funder" | "funders" => Ok(EntityKind::Funder),
            "institution" | "institutions" => Ok(EntityKind::Institution),
            "publisher" | "publishers" => Ok(EntityKind::Publisher),
            "topic" | "topics" => Ok(EntityKind::Topic),
            _ => Err(format!("Unknown entity kind: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_kind_from_bare_and_prefixed_ids() {
        assert_eq!(EntityKind::from_id("A5023888391"), Some(EntityKind::Author));
        assert_eq!(
            EntityKind::from_id("https://openalex.org/C2778407487"),
            Some(EntityKind::Concept)
        );
        assert_eq!(EntityKind::from_id("T11636"), Some(EntityKind::Topic));
        assert_eq!(EntityKind::from_id("i4200000001"), Some(EntityKind::Institution));
    }

    #[test]
    fn rejects_ids_without_a_kind_letter() {
        assert_eq!(EntityKind::from_id("X999"), None);
        assert_eq!(EntityKind::from_id("subfields/1804"), None);
        assert_eq!(EntityKind::from_id("A"), None);
        assert_eq!(EntityKind::from_id(""), None);
    }

    #[test]
    fn all_kinds_parse_from_singular_and_plural() {
        for kind in EntityKind::all() {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), *kind);
            assert_eq!(kind.plural().parse::<EntityKind>().unwrap(), *kind);
        }
    }
}
