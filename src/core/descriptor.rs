//! Declarative table-to-field mapping, one descriptor per entity kind
//!
//! Each kind is described by a static [`KindDescriptor`]: which document
//! fields land in which parent-table columns, and which repeating
//! sub-structures land in which child tables. The mapper engine and the
//! schema bootstrap are both driven by these tables, so no kind carries
//! hand-written read/write/delete code and the DDL cannot drift from the
//! mapping.

use crate::core::kind::EntityKind;

/// Storage class of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Scalar text stored as-is.
    Text,
    /// Integer scalar.
    Integer,
    /// Float scalar.
    Real,
    /// Structured value JSON-serialized into one TEXT column. Not queryable,
    /// but cheap to round-trip.
    Json,
    /// OpenAlex identifier: base URL stripped on write, prepended on read.
    EntityId,
}

/// One column of a parent or child table.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    /// Column name in the table.
    pub name: &'static str,
    /// Path of the source field within the document (parent columns) or
    /// within one child record. Multi-segment paths flatten nested objects,
    /// e.g. `["subfield", "id"]` -> `subfield_id`.
    pub path: &'static [&'static str],
    pub kind: ColumnKind,
}

/// Shape of a child table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildShape {
    /// One row per element of a list-of-records field. Rows carry an
    /// explicit `seq` column so reconstruction preserves list order.
    RecordList,
    /// Exactly one row per parent, from a one-to-one sub-object.
    SingleRecord {
        /// Drop NULL columns when rebuilding the sub-object. Identifier
        /// bags omit absent keys upstream; geographic records do not.
        omit_null_fields: bool,
    },
}

/// A child table owned by a parent entity. Child rows are replaced wholesale
/// on every store and deleted with the parent.
#[derive(Debug, Clone, Copy)]
pub struct ChildTable {
    pub table: &'static str,
    /// Foreign-key column holding the parent's stripped ID.
    pub parent_key: &'static str,
    /// Document field the rows come from.
    pub field: &'static str,
    pub shape: ChildShape,
    /// Columns excluding the parent key (and `seq` for record lists).
    pub columns: &'static [Column],
}

/// Full relational mapping for one entity kind.
#[derive(Debug, Clone, Copy)]
pub struct KindDescriptor {
    pub parent_table: &'static str,
    /// Parent columns; the first is always the stripped-ID primary key.
    pub parent_columns: &'static [Column],
    pub children: &'static [ChildTable],
}

pub fn for_kind(kind: EntityKind) -> &'static KindDescriptor {
    match kind {
        EntityKind::Author => &AUTHOR,
        EntityKind::Concept => &CONCEPT,
        EntityKind::Funder => &FUNDER,
        EntityKind::Institution => &INSTITUTION,
        EntityKind::Publisher => &PUBLISHER,
        EntityKind::Topic => &TOPIC,
    }
}

/// Every kind tracks works/citations per year with the same three columns.
static COUNTS_BY_YEAR: [Column; 3] = [
    Column { name: "year", path: &["year"], kind: ColumnKind::Integer },
    Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
    Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
];

static AUTHOR: KindDescriptor = KindDescriptor {
    parent_table: "authors",
    parent_columns: &[
        Column { name: "id", path: &["id"], kind: ColumnKind::EntityId },
        Column { name: "orcid", path: &["orcid"], kind: ColumnKind::Text },
        Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
        Column { name: "display_name_alternatives", path: &["display_name_alternatives"], kind: ColumnKind::Json },
        Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
        Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
        Column { name: "last_known_institutions", path: &["last_known_institutions"], kind: ColumnKind::Json },
        Column { name: "works_api_url", path: &["works_api_url"], kind: ColumnKind::Text },
        Column { name: "updated_date", path: &["updated_date"], kind: ColumnKind::Text },
    ],
    children: &[
        ChildTable {
            table: "authors_counts_by_year",
            parent_key: "author_id",
            field: "counts_by_year",
            shape: ChildShape::RecordList,
            columns: &COUNTS_BY_YEAR,
        },
        ChildTable {
            table: "authors_ids",
            parent_key: "author_id",
            field: "ids",
            shape: ChildShape::SingleRecord { omit_null_fields: true },
            columns: &[
                Column { name: "openalex", path: &["openalex"], kind: ColumnKind::EntityId },
                Column { name: "orcid", path: &["orcid"], kind: ColumnKind::Text },
                Column { name: "scopus", path: &["scopus"], kind: ColumnKind::Text },
                Column { name: "twitter", path: &["twitter"], kind: ColumnKind::Text },
                Column { name: "wikipedia", path: &["wikipedia"], kind: ColumnKind::Text },
                Column { name: "mag", path: &["mag"], kind: ColumnKind::Integer },
            ],
        },
    ],
};

static CONCEPT: KindDescriptor = KindDescriptor {
    parent_table: "concepts",
    parent_columns: &[
        Column { name: "id", path: &["id"], kind: ColumnKind::EntityId },
        Column { name: "wikidata", path: &["wikidata"], kind: ColumnKind::Text },
        Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
        Column { name: "level", path: &["level"], kind: ColumnKind::Integer },
        Column { name: "description", path: &["description"], kind: ColumnKind::Text },
        Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
        Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
        Column { name: "image_url", path: &["image_url"], kind: ColumnKind::Text },
        Column { name: "image_thumbnail_url", path: &["image_thumbnail_url"], kind: ColumnKind::Text },
        Column { name: "works_api_url", path: &["works_api_url"], kind: ColumnKind::Text },
        Column { name: "updated_date", path: &["updated_date"], kind: ColumnKind::Text },
    ],
    children: &[
        ChildTable {
            table: "concepts_ancestors",
            parent_key: "concept_id",
            field: "ancestors",
            shape: ChildShape::RecordList,
            columns: &[
                Column { name: "ancestor_id", path: &["id"], kind: ColumnKind::EntityId },
                Column { name: "wikidata", path: &["wikidata"], kind: ColumnKind::Text },
                Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
                Column { name: "level", path: &["level"], kind: ColumnKind::Integer },
            ],
        },
        ChildTable {
            table: "concepts_counts_by_year",
            parent_key: "concept_id",
            field: "counts_by_year",
            shape: ChildShape::RecordList,
            columns: &COUNTS_BY_YEAR,
        },
        ChildTable {
            table: "concepts_ids",
            parent_key: "concept_id",
            field: "ids",
            shape: ChildShape::SingleRecord { omit_null_fields: true },
            columns: &[
                Column { name: "openalex", path: &["openalex"], kind: ColumnKind::EntityId },
                Column { name: "wikidata", path: &["wikidata"], kind: ColumnKind::Text },
                Column { name: "wikipedia", path: &["wikipedia"], kind: ColumnKind::Text },
                Column { name: "umls_cui", path: &["umls_cui"], kind: ColumnKind::Json },
                Column { name: "mag", path: &["mag"], kind: ColumnKind::Integer },
            ],
        },
        ChildTable {
            table: "concepts_related_concepts",
            parent_key: "concept_id",
            field: "related_concepts",
            shape: ChildShape::RecordList,
            columns: &[
                Column { name: "related_concept_id", path: &["id"], kind: ColumnKind::EntityId },
                Column { name: "wikidata", path: &["wikidata"], kind: ColumnKind::Text },
                Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
                Column { name: "level", path: &["level"], kind: ColumnKind::Integer },
                Column { name: "score", path: &["score"], kind: ColumnKind::Real },
            ],
        },
    ],
};

static FUNDER: KindDescriptor = KindDescriptor {
    parent_table: "funders",
    parent_columns: &[
        Column { name: "id", path: &["id"], kind: ColumnKind::EntityId },
        Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
        Column { name: "alternate_names", path: &["alternate_names"], kind: ColumnKind::Json },
        Column { name: "country_codes", path: &["country_codes"], kind: ColumnKind::Json },
        Column { name: "types", path: &["types"], kind: ColumnKind::Json },
        Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
        Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
        Column { name: "sources_api_url", path: &["sources_api_url"], kind: ColumnKind::Text },
        Column { name: "updated_date", path: &["updated_date"], kind: ColumnKind::Text },
    ],
    children: &[
        ChildTable {
            table: "funders_counts_by_year",
            parent_key: "funder_id",
            field: "counts_by_year",
            shape: ChildShape::RecordList,
            columns: &COUNTS_BY_YEAR,
        },
        ChildTable {
            table: "funders_ids",
            parent_key: "funder_id",
            field: "ids",
            shape: ChildShape::SingleRecord { omit_null_fields: true },
            columns: &[
                Column { name: "openalex", path: &["openalex"], kind: ColumnKind::EntityId },
            ],
        },
    ],
};

static INSTITUTION: KindDescriptor = KindDescriptor {
    parent_table: "institutions",
    parent_columns: &[
        Column { name: "id", path: &["id"], kind: ColumnKind::EntityId },
        Column { name: "ror", path: &["ror"], kind: ColumnKind::Text },
        Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
        Column { name: "country_code", path: &["country_code"], kind: ColumnKind::Text },
        Column { name: "type", path: &["type"], kind: ColumnKind::Text },
        Column { name: "homepage_url", path: &["homepage_url"], kind: ColumnKind::Text },
        Column { name: "image_url", path: &["image_url"], kind: ColumnKind::Text },
        Column { name: "image_thumbnail_url", path: &["image_thumbnail_url"], kind: ColumnKind::Text },
        Column { name: "display_name_acronyms", path: &["display_name_acronyms"], kind: ColumnKind::Json },
        Column { name: "display_name_alternatives", path: &["display_name_alternatives"], kind: ColumnKind::Json },
        Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
        Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
        Column { name: "works_api_url", path: &["works_api_url"], kind: ColumnKind::Text },
        Column { name: "updated_date", path: &["updated_date"], kind: ColumnKind::Text },
    ],
    children: &[
        ChildTable {
            table: "institutions_associated_institutions",
            parent_key: "institution_id",
            field: "associated_institutions",
            shape: ChildShape::RecordList,
            columns: &[
                Column { name: "associated_institution_id", path: &["id"], kind: ColumnKind::EntityId },
                Column { name: "ror", path: &["ror"], kind: ColumnKind::Text },
                Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
                Column { name: "country_code", path: &["country_code"], kind: ColumnKind::Text },
                Column { name: "type", path: &["type"], kind: ColumnKind::Text },
                Column { name: "relationship", path: &["relationship"], kind: ColumnKind::Text },
            ],
        },
        ChildTable {
            table: "institutions_counts_by_year",
            parent_key: "institution_id",
            field: "counts_by_year",
            shape: ChildShape::RecordList,
            columns: &COUNTS_BY_YEAR,
        },
        ChildTable {
            table: "institutions_geo",
            parent_key: "institution_id",
            field: "geo",
            shape: ChildShape::SingleRecord { omit_null_fields: false },
            columns: &[
                Column { name: "city", path: &["city"], kind: ColumnKind::Text },
                Column { name: "geonames_city_id", path: &["geonames_city_id"], kind: ColumnKind::Integer },
                Column { name: "region", path: &["region"], kind: ColumnKind::Text },
                Column { name: "country_code", path: &["country_code"], kind: ColumnKind::Text },
                Column { name: "country", path: &["country"], kind: ColumnKind::Text },
                Column { name: "latitude", path: &["latitude"], kind: ColumnKind::Real },
                Column { name: "longitude", path: &["longitude"], kind: ColumnKind::Real },
            ],
        },
        ChildTable {
            table: "institutions_ids",
            parent_key: "institution_id",
            field: "ids",
            shape: ChildShape::SingleRecord { omit_null_fields: true },
            columns: &[
                Column { name: "openalex", path: &["openalex"], kind: ColumnKind::EntityId },
                Column { name: "ror", path: &["ror"], kind: ColumnKind::Text },
                Column { name: "grid", path: &["grid"], kind: ColumnKind::Text },
                Column { name: "wikipedia", path: &["wikipedia"], kind: ColumnKind::Text },
                Column { name: "wikidata", path: &["wikidata"], kind: ColumnKind::Text },
                Column { name: "mag", path: &["mag"], kind: ColumnKind::Integer },
            ],
        },
    ],
};

static PUBLISHER: KindDescriptor = KindDescriptor {
    parent_table: "publishers",
    parent_columns: &[
        Column { name: "id", path: &["id"], kind: ColumnKind::EntityId },
        Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
        Column { name: "alternate_titles", path: &["alternate_titles"], kind: ColumnKind::Json },
        Column { name: "country_codes", path: &["country_codes"], kind: ColumnKind::Json },
        Column { name: "hierarchy_level", path: &["hierarchy_level"], kind: ColumnKind::Integer },
        Column { name: "parent_publisher", path: &["parent_publisher"], kind: ColumnKind::EntityId },
        Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
        Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
        Column { name: "sources_api_url", path: &["sources_api_url"], kind: ColumnKind::Text },
        Column { name: "updated_date", path: &["updated_date"], kind: ColumnKind::Text },
    ],
    children: &[
        ChildTable {
            table: "publishers_counts_by_year",
            parent_key: "publisher_id",
            field: "counts_by_year",
            shape: ChildShape::RecordList,
            columns: &COUNTS_BY_YEAR,
        },
        ChildTable {
            table: "publishers_ids",
            parent_key: "publisher_id",
            field: "ids",
            shape: ChildShape::SingleRecord { omit_null_fields: true },
            columns: &[
                Column { name: "openalex", path: &["openalex"], kind: ColumnKind::EntityId },
                Column { name: "ror", path: &["ror"], kind: ColumnKind::Text },
                Column { name: "wikidata", path: &["wikidata"], kind: ColumnKind::Text },
            ],
        },
    ],
};

static TOPIC: KindDescriptor = KindDescriptor {
    parent_table: "topics",
    parent_columns: &[
        Column { name: "id", path: &["id"], kind: ColumnKind::EntityId },
        Column { name: "display_name", path: &["display_name"], kind: ColumnKind::Text },
        Column { name: "subfield_id", path: &["subfield", "id"], kind: ColumnKind::EntityId },
        Column { name: "subfield_display_name", path: &["subfield", "display_name"], kind: ColumnKind::Text },
        Column { name: "field_id", path: &["field", "id"], kind: ColumnKind::EntityId },
        Column { name: "field_display_name", path: &["field", "display_name"], kind: ColumnKind::Text },
        Column { name: "domain_id", path: &["domain", "id"], kind: ColumnKind::EntityId },
        Column { name: "domain_display_name", path: &["domain", "display_name"], kind: ColumnKind::Text },
        Column { name: "description", path: &["description"], kind: ColumnKind::Text },
        Column { name: "keywords", path: &["keywords"], kind: ColumnKind::Json },
        Column { name: "works_count", path: &["works_count"], kind: ColumnKind::Integer },
        Column { name: "cited_by_count", path: &["cited_by_count"], kind: ColumnKind::Integer },
        Column { name: "updated_date", path: &["updated_date"], kind: ColumnKind::Text },
    ],
    children: &[
        ChildTable {
            table: "topics_ids",
            parent_key: "topic_id",
            field: "ids",
            shape: ChildShape::SingleRecord { omit_null_fields: true },
            columns: &[
                Column { name: "openalex", path: &["openalex"], kind: ColumnKind::EntityId },
                Column { name: "wikipedia", path: &["wikipedia"], kind: ColumnKind::Text },
            ],
        },
    ],
};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_kind_keys_on_a_stripped_id() {
        for kind in EntityKind::all() {
            let desc = kind.descriptor();
            let id = &desc.parent_columns[0];
            assert_eq!(id.name, "id");
            assert_eq!(id.path, ["id"]);
            assert_eq!(id.kind, ColumnKind::EntityId);
        }
    }

    #[test]
    fn table_names_are_unique_and_derived_from_the_parent() {
        let mut seen = HashSet::new();
        for kind in EntityKind::all() {
            let desc = kind.descriptor();
            assert_eq!(desc.parent_table, kind.plural());
            assert!(seen.insert(desc.parent_table));
            for child in desc.children {
                assert!(child.table.starts_with(desc.parent_table));
                assert!(seen.insert(child.table));
            }
        }
    }

    #[test]
    fn every_kind_has_an_ids_child_table() {
        for kind in EntityKind::all() {
            let desc = kind.descriptor();
            let ids = desc
                .children
                .iter()
                .find(|child| child.field == "ids")
                .unwrap_or_else(|| panic!("{kind} has no _ids child table"));
            assert!(matches!(ids.shape, ChildShape::SingleRecord { omit_null_fields: true }));
            assert_eq!(ids.columns[0].name, "openalex");
            assert_eq!(ids.columns[0].kind, ColumnKind::EntityId);
        }
    }

    #[test]
    fn column_names_are_unique_within_each_table() {
        for kind in EntityKind::all() {
            let desc = kind.descriptor();
            let mut names = HashSet::new();
            for column in desc.parent_columns {
                assert!(names.insert(column.name), "duplicate {} in {}", column.name, desc.parent_table);
            }
            for child in desc.children {
                let mut names = HashSet::new();
                names.insert(child.parent_key);
                for column in child.columns {
                    assert!(names.insert(column.name), "duplicate {} in {}", column.name, child.table);
                }
            }
        }
    }
}
