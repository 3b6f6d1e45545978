//! Schema bootstrap against a real MongoDB server.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::{Client, Collection};
use schemaboot_domain::{CollectionName, SchemaCatalog};

use super::{archetype_catalog, MongoTestHarness};
use crate::infrastructure::mongo::{check_document, validator_document, MongoSchemaAdmin};
use crate::use_cases::{CollectionOutcome, SchemaBootstrapper};

const DOCUMENT_VALIDATION_FAILURE: i32 = 121;
const DUPLICATE_KEY: i32 = 11000;

fn bootstrapper(client: &Client, catalog: &SchemaCatalog) -> SchemaBootstrapper {
    SchemaBootstrapper::new(Arc::new(MongoSchemaAdmin::new(client, catalog.database())))
}

fn pokemons(client: &Client, catalog: &SchemaCatalog) -> Collection<Document> {
    client
        .database(catalog.database().as_str())
        .collection::<Document>("pokemons")
}

fn write_error_code(err: &MongoError) -> Option<i32> {
    match *err.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) => Some(write_error.code),
        _ => None,
    }
}

async fn stored_validator(
    client: &Client,
    catalog: &SchemaCatalog,
    name: &str,
) -> Option<Document> {
    let specs: Vec<_> = client
        .database(catalog.database().as_str())
        .list_collections()
        .filter(doc! { "name": name })
        .await
        .expect("list collections")
        .try_collect()
        .await
        .expect("collect collection specs");
    specs.into_iter().next().and_then(|spec| spec.options.validator)
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn creates_collection_validator_and_unique_index() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();

    let report = bootstrapper(harness.client(), &catalog)
        .run(&catalog)
        .await
        .expect("bootstrap");
    assert_eq!(report.collections[0].1, CollectionOutcome::Created);

    let spec = &catalog.collections()[0].collection;
    assert_eq!(
        stored_validator(harness.client(), &catalog, "pokemons").await,
        Some(validator_document(spec))
    );

    let index_names = pokemons(harness.client(), &catalog)
        .list_index_names()
        .await
        .expect("list indexes");
    assert!(index_names.contains(&"name_1".to_string()));
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn bootstrapping_twice_matches_bootstrapping_once() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();
    let bootstrapper = bootstrapper(harness.client(), &catalog);

    let first = bootstrapper.run(&catalog).await.expect("first run");
    let validator_after_first = stored_validator(harness.client(), &catalog, "pokemons").await;
    let indexes_after_first = pokemons(harness.client(), &catalog)
        .list_index_names()
        .await
        .expect("list indexes");

    let second = bootstrapper.run(&catalog).await.expect("second run is not a failure");
    assert_eq!(first.collections[0].1, CollectionOutcome::Created);
    assert_eq!(second.collections[0].1, CollectionOutcome::AlreadyExists);

    assert_eq!(
        stored_validator(harness.client(), &catalog, "pokemons").await,
        validator_after_first
    );
    assert_eq!(
        pokemons(harness.client(), &catalog)
            .list_index_names()
            .await
            .expect("list indexes"),
        indexes_after_first
    );
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn validator_rejects_documents_missing_name() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();
    bootstrapper(harness.client(), &catalog)
        .run(&catalog)
        .await
        .expect("bootstrap");
    let collection = pokemons(harness.client(), &catalog);

    for document in [
        doc! {},
        doc! { "types": ["Electric"] },
        doc! { "name": 25 },
        doc! { "name": "Pikachu", "types": "Electric" },
        doc! { "name": "Pikachu", "types": ["Electric", 1] },
    ] {
        let spec = &catalog.collections()[0].collection;
        assert!(check_document(spec, &document).is_err(), "{document}");

        let err = collection
            .insert_one(document.clone())
            .await
            .expect_err("validator should reject");
        assert_eq!(write_error_code(&err), Some(DOCUMENT_VALIDATION_FAILURE), "{document}");
    }
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn validator_accepts_conforming_documents() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();
    bootstrapper(harness.client(), &catalog)
        .run(&catalog)
        .await
        .expect("bootstrap");
    let collection = pokemons(harness.client(), &catalog);

    for document in [
        doc! { "name": "Pikachu" },
        doc! { "name": "Bulbasaur", "types": ["Grass", "Poison"] },
        doc! { "name": "Eevee", "types": [], "level": 5, "shiny": true, "nationalId": 133 },
    ] {
        let spec = &catalog.collections()[0].collection;
        assert_eq!(check_document(spec, &document), Ok(()), "{document}");

        collection
            .insert_one(document.clone())
            .await
            .unwrap_or_else(|e| panic!("{document} should be accepted: {e}"));
    }
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn unique_index_rejects_duplicate_names() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();
    bootstrapper(harness.client(), &catalog)
        .run(&catalog)
        .await
        .expect("bootstrap");
    let collection = pokemons(harness.client(), &catalog);

    collection
        .insert_one(doc! { "name": "Mew", "types": ["Psychic"] })
        .await
        .expect("first insert");
    let err = collection
        .insert_one(doc! { "name": "Mew" })
        .await
        .expect_err("duplicate name should be rejected");

    assert_eq!(write_error_code(&err), Some(DUPLICATE_KEY));
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn refresh_replaces_validator_on_existing_collection() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();
    let db = harness.client().database(catalog.database().as_str());

    // Pre-existing collection without any validator.
    db.create_collection("pokemons").await.expect("plain create");

    let report = bootstrapper(harness.client(), &catalog)
        .with_refresh_validators(true)
        .run(&catalog)
        .await
        .expect("bootstrap");
    assert_eq!(report.collections[0].1, CollectionOutcome::ValidatorRefreshed);

    let err = pokemons(harness.client(), &catalog)
        .insert_one(doc! { "types": ["Ghost"] })
        .await
        .expect_err("refreshed validator should reject");
    assert_eq!(write_error_code(&err), Some(DOCUMENT_VALIDATION_FAILURE));
}

#[tokio::test]
#[ignore = "requires docker (testcontainers)"]
async fn existing_collection_keeps_validator_without_refresh() {
    let harness = MongoTestHarness::start()
        .await
        .expect("Failed to start MongoDB harness");
    let catalog = archetype_catalog();
    let db = harness.client().database(catalog.database().as_str());
    db.create_collection("pokemons").await.expect("plain create");

    let report = bootstrapper(harness.client(), &catalog)
        .run(&catalog)
        .await
        .expect("already existing collection is non-fatal");

    assert_eq!(report.collections[0].1, CollectionOutcome::AlreadyExists);
    assert_eq!(stored_validator(harness.client(), &catalog, "pokemons").await, None);
    assert_eq!(
        report.indexes[0].0,
        CollectionName::new("pokemons").expect("collection")
    );
}
