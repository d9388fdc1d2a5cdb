//! Store round-trip tests against an in-memory database

use serde_json::json;

use super::*;
use crate::core::mapper::Document;

fn store() -> EntityStore {
    EntityStore::open_in_memory().unwrap()
}

fn table_count(store: &EntityStore, table: &str) -> i64 {
    store
        .conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

fn author_doc() -> Document {
    json!({
        "id": "https://openalex.org/A5023888391",
        "orcid": "https://orcid.org/0000-0001-6187-6610",
        "display_name": "Jason Priem",
        "display_name_alternatives": ["Jason R. Priem"],
        "works_count": 53,
        "cited_by_count": 2937,
        "last_known_institutions": [
            {"id": "https://openalex.org/I4210166736", "display_name": "OurResearch", "country_code": "CA"}
        ],
        "works_api_url": "https://api.openalex.org/works?filter=author.id:A5023888391",
        "updated_date": "2024-01-02T00:27:23.088909",
        "ids": {
            "openalex": "https://openalex.org/A5023888391",
            "orcid": "https://orcid.org/0000-0001-6187-6610",
            "scopus": "http://www.scopus.com/inward/authorDetails.url?authorID=36455008000&partnerID=MN8TOARS"
        },
        "counts_by_year": [
            {"year": 2023, "works_count": 1, "cited_by_count": 672},
            {"year": 2022, "works_count": 2, "cited_by_count": 611},
            {"year": 2021, "works_count": 3, "cited_by_count": 490}
        ]
    })
}

fn concept_doc() -> Document {
    json!({
        "id": "https://openalex.org/C2778407487",
        "wikidata": "https://www.wikidata.org/wiki/Q14565201",
        "display_name": "Altmetrics",
        "level": 2,
        "description": "research impact metrics based on activity in online tools and environments",
        "works_count": 3078,
        "cited_by_count": 36508,
        "image_url": "https://upload.wikimedia.org/wikipedia/commons/f/f1/Altmetrics.svg",
        "image_thumbnail_url": "https://upload.wikimedia.org/wikipedia/commons/thumb/f/f1/Altmetrics.svg/100px-Altmetrics.svg.png",
        "works_api_url": "https://api.openalex.org/works?filter=concepts.id:C2778407487",
        "updated_date": "2024-01-21T20:59:20.531221",
        "ancestors": [
            {
                "id": "https://openalex.org/C161191863",
                "wikidata": "https://www.wikidata.org/wiki/Q199655",
                "display_name": "Library science",
                "level": 1
            },
            {
                "id": "https://openalex.org/C41008148",
                "wikidata": "https://www.wikidata.org/wiki/Q21198",
                "display_name": "Computer science",
                "level": 0
            }
        ],
        "counts_by_year": [
            {"year": 2023, "works_count": 109, "cited_by_count": 3784}
        ],
        "ids": {
            "openalex": "https://openalex.org/C2778407487",
            "wikidata": "https://www.wikidata.org/wiki/Q14565201",
            "wikipedia": "https://en.wikipedia.org/wiki/Altmetrics",
            "umls_cui": [],
            "mag": 2778407487i64
        },
        "related_concepts": [
            {
                "id": "https://openalex.org/C2779455604",
                "wikidata": "https://www.wikidata.org/wiki/Q1713537",
                "display_name": "Impact factor",
                "level": 2,
                "score": 89.1264
            }
        ]
    })
}

fn funder_doc() -> Document {
    json!({
        "id": "https://openalex.org/F4320332161",
        "display_name": "National Institutes of Health",
        "alternate_names": ["US National Institutes of Health", "Institutos Nacionales de la Salud", "NIH"],
        "country_codes": ["US"],
        "types": ["government"],
        "works_count": 262849,
        "cited_by_count": 7723301,
        "sources_api_url": "https://api.openalex.org/sources?filter=funder:F4320332161",
        "updated_date": "2024-01-23T12:54:21.780751",
        "counts_by_year": [
            {"year": 2023, "works_count": 21806, "cited_by_count": 563207},
            {"year": 2022, "works_count": 25201, "cited_by_count": 611176}
        ],
        "ids": {
            "openalex": "https://openalex.org/F4320332161"
        }
    })
}

fn institution_doc() -> Document {
    json!({
        "id": "https://openalex.org/I114027177",
        "ror": "https://ror.org/0130frc33",
        "display_name": "University of North Carolina at Chapel Hill",
        "country_code": "US",
        "type": "education",
        "homepage_url": "http://www.unc.edu/",
        "image_url": "https://upload.wikimedia.org/wikipedia/en/d/d5/UNC_Tar_Heels_logo.svg",
        "image_thumbnail_url": "https://upload.wikimedia.org/wikipedia/en/thumb/d/d5/UNC_Tar_Heels_logo.svg/100px-UNC_Tar_Heels_logo.svg.png",
        "display_name_acronyms": ["UNC"],
        "display_name_alternatives": ["UNC-Chapel Hill"],
        "works_count": 240740,
        "cited_by_count": 13886548,
        "works_api_url": "https://api.openalex.org/works?filter=institutions.id:I114027177",
        "updated_date": "2024-01-22T13:17:18.972717",
        "associated_institutions": [
            {
                "id": "https://openalex.org/I4210112124",
                "ror": "https://ror.org/04chrp450",
                "display_name": "UNC Lineberger Comprehensive Cancer Center",
                "country_code": "US",
                "type": "healthcare",
                "relationship": "related"
            },
            {
                "id": "https://openalex.org/I4210098173",
                "ror": "https://ror.org/0384j8v64",
                "display_name": "UNC Health Care",
                "country_code": "US",
                "type": "healthcare",
                "relationship": "child"
            }
        ],
        "counts_by_year": [
            {"year": 2023, "works_count": 12108, "cited_by_count": 726111}
        ],
        "geo": {
            "city": "Chapel Hill",
            "geonames_city_id": 4460162,
            "region": null,
            "country_code": "US",
            "country": "United States",
            "latitude": 35.9132,
            "longitude": -79.0558
        },
        "ids": {
            "openalex": "https://openalex.org/I114027177",
            "ror": "https://ror.org/0130frc33",
            "grid": "grid.10698.36",
            "wikipedia": "https://en.wikipedia.org/wiki/University%20of%20North%20Carolina%20at%20Chapel%20Hill",
            "wikidata": "https://www.wikidata.org/wiki/Q192334",
            "mag": 114027177i64
        }
    })
}

fn publisher_doc() -> Document {
    json!({
        "id": "https://openalex.org/P4310320990",
        "display_name": "Elsevier BV",
        "alternate_titles": ["Elsevier", "elsevier.com"],
        "country_codes": ["NL"],
        "hierarchy_level": 0,
        "parent_publisher": null,
        "works_count": 20311868,
        "cited_by_count": 407508754,
        "sources_api_url": "https://api.openalex.org/sources?filter=host_organization.id:P4310320990",
        "updated_date": "2024-01-23T14:00:22.502905",
        "counts_by_year": [
            {"year": 2023, "works_count": 1038289, "cited_by_count": 37429009}
        ],
        "ids": {
            "openalex": "https://openalex.org/P4310320990",
            "ror": "https://ror.org/02scfj030",
            "wikidata": "https://www.wikidata.org/entity/Q746413"
        }
    })
}

fn topic_doc() -> Document {
    json!({
        "id": "https://openalex.org/T11636",
        "display_name": "Scholarly Communication and Bibliometrics",
        "subfield": {
            "id": "https://openalex.org/subfields/1804",
            "display_name": "Statistics, Probability and Uncertainty"
        },
        "field": {
            "id": "https://openalex.org/fields/18",
            "display_name": "Decision Sciences"
        },
        "domain": {
            "id": "https://openalex.org/domains/2",
            "display_name": "Social Sciences"
        },
        "description": "the study of scholarly publishing, research evaluation and citation patterns",
        "keywords": ["Altmetrics", "Citation analysis", "Open access"],
        "works_count": 23441,
        "cited_by_count": 605289,
        "updated_date": "2025-01-21T09:47:30.319618",
        "ids": {
            "openalex": "https://openalex.org/T11636",
            "wikipedia": "https://en.wikipedia.org/wiki/Scholarly_communication"
        }
    })
}

fn all_fixtures() -> Vec<(EntityKind, Document)> {
    vec![
        (EntityKind::Author, author_doc()),
        (EntityKind::Concept, concept_doc()),
        (EntityKind::Funder, funder_doc()),
        (EntityKind::Institution, institution_doc()),
        (EntityKind::Publisher, publisher_doc()),
        (EntityKind::Topic, topic_doc()),
    ]
}

#[test]
fn every_kind_round_trips_through_the_store() {
    let mut store = store();
    for (kind, doc) in all_fixtures() {
        let entity = Entity::new(kind, doc.clone()).unwrap();
        let full_id = entity.full_id();
        store.insert(&entity).unwrap();

        let loaded = store.load_by_ids(kind, &[full_id.as_str()]).unwrap();
        assert_eq!(loaded.len(), 1, "{kind}");
        assert_eq!(*loaded[0].data(), doc, "{kind} document changed in the store");
    }
}

#[test]
fn author_reconstruction_matches_the_fetched_document() {
    let mut store = store();
    let doc = author_doc();
    store.insert(&Entity::new(EntityKind::Author, doc.clone()).unwrap()).unwrap();

    let loaded = store
        .load_by_ids(EntityKind::Author, &["A5023888391"])
        .unwrap();
    let author = loaded[0].data();

    assert_eq!(author["id"], json!("https://openalex.org/A5023888391"));
    assert_eq!(author["counts_by_year"], doc["counts_by_year"]);
    assert_eq!(author["counts_by_year"][0]["year"], json!(2023));
    assert_eq!(author["ids"]["orcid"], doc["ids"]["orcid"]);
}

#[test]
fn concept_edges_reconstruct_with_parent_linkage_and_score() {
    let mut store = store();
    let doc = concept_doc();
    store.insert(&Entity::new(EntityKind::Concept, doc.clone()).unwrap()).unwrap();

    let loaded = store
        .load_by_ids(EntityKind::Concept, &["https://openalex.org/C2778407487"])
        .unwrap();
    let concept = loaded[0].data();

    let ancestors = concept["ancestors"].as_array().unwrap();
    assert_eq!(ancestors.len(), 2);
    assert_eq!(ancestors[0]["id"], json!("https://openalex.org/C161191863"));
    assert_eq!(ancestors[1]["display_name"], json!("Computer science"));

    let related = concept["related_concepts"].as_array().unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related[0]["id"], json!("https://openalex.org/C2779455604"));
    assert_eq!(related[0]["score"], json!(89.1264));
}

#[test]
fn insert_of_a_cached_id_is_a_conflict() {
    let mut store = store();
    let entity = Entity::new(EntityKind::Author, author_doc()).unwrap();
    store.insert(&entity).unwrap();

    let err = store.insert(&entity).unwrap_err();
    assert!(matches!(err, CacheError::AlreadyExists(id) if id == "A5023888391"));
    assert_eq!(store.count(EntityKind::Author).unwrap(), 1);
}

#[test]
fn replace_is_idempotent() {
    let mut store = store();
    let entity = Entity::new(EntityKind::Author, author_doc()).unwrap();
    store.replace(&entity).unwrap();
    store.replace(&entity).unwrap();

    assert_eq!(table_count(&store, "authors"), 1);
    assert_eq!(table_count(&store, "authors_counts_by_year"), 3);
    assert_eq!(table_count(&store, "authors_ids"), 1);
}

#[test]
fn replace_clears_stale_child_rows() {
    let mut store = store();
    store.replace(&Entity::new(EntityKind::Author, author_doc()).unwrap()).unwrap();
    assert_eq!(table_count(&store, "authors_counts_by_year"), 3);

    let mut shrunk = author_doc();
    shrunk["counts_by_year"] = json!([{"year": 2023, "works_count": 1, "cited_by_count": 672}]);
    store.replace(&Entity::new(EntityKind::Author, shrunk.clone()).unwrap()).unwrap();

    assert_eq!(table_count(&store, "authors_counts_by_year"), 1);
    let loaded = store.load_by_ids(EntityKind::Author, &["A5023888391"]).unwrap();
    assert_eq!(*loaded[0].data(), shrunk);
}

#[test]
fn delete_removes_the_parent_and_every_child_row() {
    let mut store = store();
    store.insert(&Entity::new(EntityKind::Concept, concept_doc()).unwrap()).unwrap();
    store.delete(EntityKind::Concept, "https://openalex.org/C2778407487").unwrap();

    let desc = EntityKind::Concept.descriptor();
    assert_eq!(table_count(&store, desc.parent_table), 0);
    for child in desc.children {
        assert_eq!(table_count(&store, child.table), 0, "{}", child.table);
    }
    assert!(!store.contains(EntityKind::Concept, "C2778407487").unwrap());
}

#[test]
fn delete_leaves_other_entities_alone() {
    let mut store = store();
    let mut other = author_doc();
    other["id"] = json!("https://openalex.org/A4000000001");
    other["ids"]["openalex"] = json!("https://openalex.org/A4000000001");
    store.insert(&Entity::new(EntityKind::Author, author_doc()).unwrap()).unwrap();
    store.insert(&Entity::new(EntityKind::Author, other).unwrap()).unwrap();

    store.delete(EntityKind::Author, "A5023888391").unwrap();

    assert_eq!(table_count(&store, "authors"), 1);
    assert_eq!(table_count(&store, "authors_counts_by_year"), 3);
    assert!(store.contains(EntityKind::Author, "A4000000001").unwrap());
}

#[test]
fn load_of_an_uncached_id_is_an_integrity_error() {
    let store = store();
    let err = store
        .load_by_ids(EntityKind::Author, &["A5023888391"])
        .unwrap_err();
    assert!(matches!(err, CacheError::IntegrityMismatch { table: "authors", .. }));
}

#[test]
fn load_with_one_missing_id_fails_instead_of_returning_short() {
    let mut store = store();
    store.insert(&Entity::new(EntityKind::Author, author_doc()).unwrap()).unwrap();

    let err = store
        .load_by_ids(EntityKind::Author, &["A5023888391", "A4000000001"])
        .unwrap_err();
    assert!(matches!(err, CacheError::IntegrityMismatch { .. }));
}

#[test]
fn load_preserves_input_order() {
    let mut store = store();
    let mut second = author_doc();
    second["id"] = json!("https://openalex.org/A4000000001");
    second["ids"]["openalex"] = json!("https://openalex.org/A4000000001");
    store.insert(&Entity::new(EntityKind::Author, author_doc()).unwrap()).unwrap();
    store.insert(&Entity::new(EntityKind::Author, second).unwrap()).unwrap();

    let loaded = store
        .load_by_ids(EntityKind::Author, &["A4000000001", "A5023888391"])
        .unwrap();
    assert_eq!(loaded[0].id(), "A4000000001");
    assert_eq!(loaded[1].id(), "A5023888391");
}

#[test]
fn init_wipes_a_prior_database_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cache.db");

    {
        let mut store = EntityStore::init(&path).unwrap();
        store.insert(&Entity::new(EntityKind::Author, author_doc()).unwrap()).unwrap();
        assert_eq!(store.count(EntityKind::Author).unwrap(), 1);
    }

    let store = EntityStore::init(&path).unwrap();
    assert_eq!(store.count(EntityKind::Author).unwrap(), 0);
}

#[test]
fn open_preserves_an_existing_database() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cache.db");

    {
        let mut store = EntityStore::open(&path).unwrap();
        store.insert(&Entity::new(EntityKind::Author, author_doc()).unwrap()).unwrap();
    }

    let store = EntityStore::open(&path).unwrap();
    assert_eq!(store.count(EntityKind::Author).unwrap(), 1);
}
