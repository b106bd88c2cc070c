use pets_core::{
    Gender, Pet, PetColumn, PetDbHelper, PetField, PetProvider, PetUri, PetValues, ProviderError,
    RepoError, Selection, SortOrder, ValidationError,
};
use pets_core::db::open_db;
use rusqlite::types::Value;

fn provider() -> PetProvider {
    PetProvider::new(PetDbHelper::in_memory())
}

fn toto() -> PetValues {
    PetValues::new()
        .name("Toto")
        .breed("Terrier")
        .gender(Gender::Male)
        .weight(7)
}

fn all_pets(provider: &PetProvider) -> Vec<Pet> {
    provider
        .query(
            &provider.content_uri(),
            &[],
            &Selection::all(),
            &SortOrder::none().asc(PetColumn::Id),
        )
        .unwrap()
        .collect_pets()
        .unwrap()
}

#[test]
fn insert_then_query_item_returns_the_record() {
    let provider = provider();
    let uri = provider.content_uri();

    let inserted = provider.insert(&uri, &toto()).unwrap();
    let PetUri::Item(id) = inserted else {
        panic!("insert should return an item uri, got {inserted:?}");
    };

    let mut cursor = provider
        .query(&provider.uri_for(inserted), &[], &Selection::all(), &SortOrder::none())
        .unwrap();
    let pets = cursor.collect_pets().unwrap();
    assert_eq!(
        pets,
        vec![Pet {
            id,
            name: "Toto".to_string(),
            breed: "Terrier".to_string(),
            gender: 1,
            weight: 7,
        }]
    );
    assert_eq!(pets[0].gender_kind(), Some(Gender::Male));
}

#[test]
fn inserted_ids_are_never_reused() {
    let provider = provider();
    let uri = provider.content_uri();

    let first = provider.insert(&uri, &toto()).unwrap();
    provider.delete(&provider.uri_for(first), &Selection::all()).unwrap();
    let second = provider.insert(&uri, &toto()).unwrap();

    match (first, second) {
        (PetUri::Item(a), PetUri::Item(b)) => assert!(b > a),
        other => panic!("unexpected uris {other:?}"),
    }
}

#[test]
fn insert_with_empty_name_is_rejected_and_adds_nothing() {
    let provider = provider();
    let uri = provider.content_uri();

    let values = PetValues::new()
        .name("")
        .breed("X")
        .gender(Gender::Male)
        .weight(5);
    match provider.insert(&uri, &values) {
        Err(ProviderError::InvalidArgument(err)) => {
            assert_eq!(err, ValidationError::NameRequired);
            assert_eq!(err.field(), PetField::Name);
        }
        other => panic!("expected name validation error, got {other:?}"),
    }
    assert!(all_pets(&provider).is_empty());
}

#[test]
fn insert_without_weight_uses_storage_default() {
    let provider = provider();
    let values = PetValues::new()
        .name("Mittens")
        .breed("Tabby")
        .gender(Gender::Female);

    provider.insert(&provider.content_uri(), &values).unwrap();

    let pets = all_pets(&provider);
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].weight, 0);
}

#[test]
fn insert_rejects_invalid_gender_and_weight() {
    let provider = provider();
    let uri = provider.content_uri();

    let err = provider.insert(&uri, &toto().gender_raw(5)).unwrap_err();
    assert!(matches!(
        err,
        ProviderError::InvalidArgument(ValidationError::InvalidGender(Some(5)))
    ));

    let err = provider.insert(&uri, &toto().weight(0)).unwrap_err();
    assert!(matches!(
        err,
        ProviderError::InvalidArgument(ValidationError::InvalidWeight(0))
    ));
}

#[test]
fn insert_on_item_uri_is_unsupported() {
    let provider = provider();
    let err = provider
        .insert(&provider.uri_for(PetUri::Item(1)), &toto())
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnsupportedResource {
            operation: "insert",
            ..
        }
    ));
}

#[test]
fn unknown_uris_are_unsupported_for_every_operation() {
    let provider = provider();
    let bad = "content://com.example.android.pets/owners";

    assert!(matches!(
        provider.query(bad, &[], &Selection::all(), &SortOrder::none()),
        Err(ProviderError::UnsupportedResource { .. })
    ));
    assert!(matches!(
        provider.insert(bad, &toto()),
        Err(ProviderError::UnsupportedResource { .. })
    ));
    assert!(matches!(
        provider.delete(bad, &Selection::all()),
        Err(ProviderError::UnsupportedResource { .. })
    ));
    assert!(matches!(
        provider.update(bad, &PetValues::new().weight(3), &Selection::all()),
        Err(ProviderError::UnsupportedResource { .. })
    ));
}

#[test]
fn query_item_on_empty_table_returns_no_rows() {
    let provider = provider();
    let mut cursor = provider
        .query(
            &provider.uri_for(PetUri::Item(9999)),
            &[],
            &Selection::all(),
            &SortOrder::none(),
        )
        .unwrap();
    assert_eq!(cursor.rows().unwrap().count(), 0);
}

#[test]
fn query_applies_projection_selection_and_sort() {
    let provider = provider();
    let uri = provider.content_uri();
    provider.insert(&uri, &toto()).unwrap();
    provider
        .insert(
            &uri,
            &PetValues::new()
                .name("Binky")
                .breed("Terrier")
                .gender(Gender::Female)
                .weight(4),
        )
        .unwrap();
    provider
        .insert(
            &uri,
            &PetValues::new()
                .name("Rex")
                .breed("Boxer")
                .gender(Gender::Male)
                .weight(30),
        )
        .unwrap();

    let mut cursor = provider
        .query(
            &uri,
            &[PetColumn::Name, PetColumn::Weight],
            &Selection::new("breed = ?", [Value::Text("Terrier".to_string())]),
            &SortOrder::none().asc(PetColumn::Name),
        )
        .unwrap();
    assert_eq!(cursor.projection(), &[PetColumn::Name, PetColumn::Weight]);

    let rows = cursor.collect_rows().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name.as_deref(), Some("Binky"));
    assert_eq!(rows[0].weight, Some(4));
    assert_eq!(rows[0].id, None);
    assert_eq!(rows[0].breed, None);
    assert_eq!(rows[1].name.as_deref(), Some("Toto"));

    assert!(matches!(
        cursor.collect_pets(),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn item_query_ignores_caller_selection() {
    let provider = provider();
    let inserted = provider.insert(&provider.content_uri(), &toto()).unwrap();

    let mut cursor = provider
        .query(
            &provider.uri_for(inserted),
            &[],
            &Selection::new("name = ?", [Value::Text("nobody".to_string())]),
            &SortOrder::none(),
        )
        .unwrap();
    assert_eq!(cursor.collect_rows().unwrap().len(), 1);
}

#[test]
fn cursor_is_lazy_and_can_be_rerun() {
    let provider = provider();
    let uri = provider.content_uri();

    let mut cursor = provider
        .query(&uri, &[], &Selection::all(), &SortOrder::none())
        .unwrap();
    provider.insert(&uri, &toto()).unwrap();

    assert_eq!(cursor.collect_rows().unwrap().len(), 1);
    provider.insert(&uri, &toto()).unwrap();
    assert_eq!(cursor.collect_rows().unwrap().len(), 2);
}

#[test]
fn malformed_selection_surfaces_storage_error() {
    let provider = provider();
    let result = provider.query(
        &provider.content_uri(),
        &[],
        &Selection::new("no_such_column = ?", [Value::Integer(1)]),
        &SortOrder::none(),
    );
    assert!(matches!(result, Err(ProviderError::Storage(_))));
}

#[test]
fn delete_collection_without_selection_empties_the_table() {
    let provider = provider();
    let uri = provider.content_uri();
    for _ in 0..3 {
        provider.insert(&uri, &toto()).unwrap();
    }

    assert_eq!(provider.delete(&uri, &Selection::all()).unwrap(), 3);
    assert!(all_pets(&provider).is_empty());
}

#[test]
fn delete_collection_honours_selection() {
    let provider = provider();
    let uri = provider.content_uri();
    provider.insert(&uri, &toto()).unwrap();
    provider.insert(&uri, &toto().weight(12)).unwrap();

    let deleted = provider
        .delete(&uri, &Selection::new("weight > ?", [Value::Integer(10)]))
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(all_pets(&provider).len(), 1);
}

#[test]
fn delete_item_ignores_caller_selection() {
    let provider = provider();
    let uri = provider.content_uri();
    let first = provider.insert(&uri, &toto()).unwrap();
    provider.insert(&uri, &toto()).unwrap();

    let deleted = provider
        .delete(&provider.uri_for(first), &Selection::new("1 = 1", []))
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(all_pets(&provider).len(), 1);
}

#[test]
fn deleting_a_missing_item_returns_zero() {
    let provider = provider();
    let deleted = provider
        .delete(&provider.uri_for(PetUri::Item(42)), &Selection::all())
        .unwrap();
    assert_eq!(deleted, 0);
}

#[test]
fn update_item_changes_only_supplied_fields() {
    let provider = provider();
    let inserted = provider.insert(&provider.content_uri(), &toto()).unwrap();

    let updated = provider
        .update(
            &provider.uri_for(inserted),
            &PetValues::new().weight(9),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let pets = all_pets(&provider);
    assert_eq!(pets[0].name, "Toto");
    assert_eq!(pets[0].weight, 9);
}

#[test]
fn update_collection_honours_selection() {
    let provider = provider();
    let uri = provider.content_uri();
    provider.insert(&uri, &toto()).unwrap();
    provider
        .insert(&uri, &toto().name("Rex").breed("Boxer"))
        .unwrap();

    let updated = provider
        .update(
            &uri,
            &PetValues::new().gender(Gender::Unknown),
            &Selection::new("breed = ?", [Value::Text("Boxer".to_string())]),
        )
        .unwrap();
    assert_eq!(updated, 1);

    let pets = all_pets(&provider);
    assert_eq!(pets[0].gender, 1);
    assert_eq!(pets[1].gender, 0);
}

#[test]
fn update_with_empty_values_is_a_noop() {
    let provider = provider();
    let inserted = provider.insert(&provider.content_uri(), &toto()).unwrap();
    let before = all_pets(&provider);

    let updated = provider
        .update(&provider.uri_for(inserted), &PetValues::new(), &Selection::all())
        .unwrap();
    assert_eq!(updated, 0);
    assert_eq!(all_pets(&provider), before);
}

#[test]
fn update_rejects_invalid_supplied_fields_without_writing() {
    let provider = provider();
    let inserted = provider.insert(&provider.content_uri(), &toto()).unwrap();

    let err = provider
        .update(
            &provider.uri_for(inserted),
            &PetValues::new().breed(" ").weight(3),
            &Selection::all(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::InvalidArgument(ValidationError::BreedRequired)
    ));
    assert_eq!(all_pets(&provider)[0].weight, 7);
}

#[test]
fn update_of_missing_item_returns_zero() {
    let provider = provider();
    let updated = provider
        .update(
            &provider.uri_for(PetUri::Item(7)),
            &PetValues::new().weight(3),
            &Selection::all(),
        )
        .unwrap();
    assert_eq!(updated, 0);
}

#[test]
fn pet_serializes_with_stable_field_names() {
    let pet = Pet {
        id: 3,
        name: "Toto".to_string(),
        breed: "Terrier".to_string(),
        gender: 1,
        weight: 7,
    };
    let json = serde_json::to_value(&pet).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": 3,
            "name": "Toto",
            "breed": "Terrier",
            "gender": 1,
            "weight": 7
        })
    );

    let partial: PetValues = serde_json::from_str(r#"{"weight": 4}"#).unwrap();
    assert_eq!(partial, PetValues::new().weight(4));
}

#[test]
fn rejected_insert_is_reported_and_not_notified() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pets.sqlite3");
    open_db(&path)
        .unwrap()
        .execute_batch(
            "CREATE TRIGGER reject_pets BEFORE INSERT ON pets
             BEGIN SELECT RAISE(ABORT, 'shelter full'); END;",
        )
        .unwrap();

    let provider = PetProvider::new(PetDbHelper::file(&path));
    let uri = provider.content_uri();
    let subscription = provider.subscribe(&uri).unwrap();

    match provider.insert(&uri, &toto()) {
        Err(ProviderError::InsertFailed {
            uri: failed_uri,
            source: RepoError::Db(_),
        }) => assert_eq!(failed_uri, uri),
        other => panic!("expected insert failure, got {other:?}"),
    }
    assert!(!subscription.take_changed());
    assert!(all_pets(&provider).is_empty());
}
