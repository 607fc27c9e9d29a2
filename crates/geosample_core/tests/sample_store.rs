use geosample_core::db::{open_db, open_db_in_memory};
use geosample_core::{
    LocalStorage, MemoryLocalStorage, SampleField, SampleFields, SampleId, SampleStore,
    SampleValidationError, SqliteLocalStorage, StoreError, SAMPLES_STORAGE_KEY,
};
use std::collections::HashSet;

fn scenario_fields() -> SampleFields {
    SampleFields {
        numero_muestra: "S1".to_string(),
        localidad: "X".to_string(),
        pais: "Y".to_string(),
        latitud: "10".to_string(),
        longitud: "20".to_string(),
        mineralogia: "Quartz".to_string(),
        paleontologia: "None".to_string(),
    }
}

fn numbered(numero: &str) -> SampleFields {
    SampleFields {
        numero_muestra: numero.to_string(),
        ..scenario_fields()
    }
}

#[test]
fn add_then_list_returns_submitted_fields_with_generated_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SampleStore::new(SqliteLocalStorage::new(&conn));
    assert!(store.list().unwrap().is_empty());

    let created = store.add(scenario_fields()).unwrap();
    let samples = store.list().unwrap();

    assert_eq!(samples.len(), 1);
    assert!(!samples[0].id.as_str().is_empty());
    assert_eq!(samples[0].id, created.id);
    assert_eq!(samples[0].fields, scenario_fields());
}

#[test]
fn add_rejects_empty_field_without_writing() {
    let store = SampleStore::new(MemoryLocalStorage::new());
    let mut fields = scenario_fields();
    fields.longitud.clear();

    let err = store.add(fields).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(SampleValidationError::EmptyField(SampleField::Longitud))
    ));
    assert!(store.storage().is_empty());
}

#[test]
fn persisted_layout_is_flat_json_array_of_strings() {
    let storage = MemoryLocalStorage::new();
    let store = SampleStore::new(&storage);
    let created = store.add(scenario_fields()).unwrap();

    let raw = storage.get_item(SAMPLES_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let items = value.as_array().expect("stored value is an array");
    assert_eq!(items.len(), 1);

    let object = items[0].as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "id",
            "latitud",
            "localidad",
            "longitud",
            "mineralogia",
            "numeroMuestra",
            "pais",
            "paleontologia"
        ]
    );
    assert!(object.values().all(serde_json::Value::is_string));
    assert_eq!(object["id"], created.id.as_str());
}

#[test]
fn reads_collections_written_by_older_clients() {
    let storage = MemoryLocalStorage::new();
    storage
        .set_item(
            SAMPLES_STORAGE_KEY,
            r#"[{"id":"1700000000000k3j9x2a","numeroMuestra":"M-7","localidad":"Cusco","pais":"Perú","latitud":"-13.5","longitud":"-71.9","mineralogia":"Pirita","paleontologia":"Amonites"}]"#,
        )
        .unwrap();
    let store = SampleStore::new(&storage);

    let samples = store.list().unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].id, SampleId::from("1700000000000k3j9x2a"));
    assert_eq!(samples[0].fields.pais, "Perú");
}

#[test]
fn corrupt_storage_fails_instead_of_listing_empty() {
    let storage = MemoryLocalStorage::new();
    let store = SampleStore::new(&storage);

    for raw in ["not json", r#"{"id":"x"}"#, r#"[{"id":"x","numeroMuestra":1}]"#] {
        storage.set_item(SAMPLES_STORAGE_KEY, raw).unwrap();
        let err = store.list().unwrap_err();
        assert!(matches!(err, StoreError::CorruptStorage(_)), "raw={raw}");
    }

    let err = store.add(scenario_fields()).unwrap_err();
    assert!(matches!(err, StoreError::CorruptStorage(_)));
    assert_eq!(
        storage.get_item(SAMPLES_STORAGE_KEY).unwrap().as_deref(),
        Some(r#"[{"id":"x","numeroMuestra":1}]"#)
    );
}

#[test]
fn update_replaces_fields_in_place_and_keeps_id() {
    let store = SampleStore::new(MemoryLocalStorage::new());
    let first = store.add(numbered("A")).unwrap();
    let second = store.add(numbered("B")).unwrap();
    let third = store.add(numbered("C")).unwrap();

    let mut replacement = numbered("B2");
    replacement.mineralogia = "Feldspar".to_string();
    assert!(store.update(&second.id, replacement.clone()).unwrap());

    let samples = store.list().unwrap();
    let ids: Vec<&SampleId> = samples.iter().map(|sample| &sample.id).collect();
    assert_eq!(ids, vec![&first.id, &second.id, &third.id]);
    assert_eq!(samples[1].fields, replacement);
}

#[test]
fn update_with_empty_field_never_mutates_persisted_state() {
    let storage = MemoryLocalStorage::new();
    let store = SampleStore::new(&storage);
    let created = store.add(scenario_fields()).unwrap();
    let before = storage.get_item(SAMPLES_STORAGE_KEY).unwrap();

    for field in SampleField::ALL {
        let mut fields = numbered("changed");
        fields.set(field, "");
        let err = store.update(&created.id, fields).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(storage.get_item(SAMPLES_STORAGE_KEY).unwrap(), before);
    }
}

#[test]
fn update_and_remove_report_unknown_ids() {
    let store = SampleStore::new(MemoryLocalStorage::new());
    store.add(scenario_fields()).unwrap();
    let missing = SampleId::from("missing");

    assert!(!store.update(&missing, scenario_fields()).unwrap());
    assert!(!store.remove(&missing).unwrap());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn remove_deletes_only_matching_sample() {
    let store = SampleStore::new(MemoryLocalStorage::new());
    let first = store.add(numbered("A")).unwrap();
    let second = store.add(numbered("B")).unwrap();

    assert!(store.remove(&first.id).unwrap());
    let samples = store.list().unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].id, second.id);
    assert!(store.get(&first.id).unwrap().is_none());
}

#[test]
fn clear_drops_storage_key() {
    let storage = MemoryLocalStorage::new();
    let store = SampleStore::new(&storage);
    store.add(numbered("A")).unwrap();
    store.add(numbered("B")).unwrap();

    store.clear().unwrap();
    assert!(store.list().unwrap().is_empty());
    assert_eq!(storage.get_item(SAMPLES_STORAGE_KEY).unwrap(), None);
}

#[test]
fn save_overwrites_whole_collection() {
    let store = SampleStore::new(MemoryLocalStorage::new());
    let kept = store.add(numbered("A")).unwrap();
    store.add(numbered("B")).unwrap();

    store.save(std::slice::from_ref(&kept)).unwrap();
    assert_eq!(store.list().unwrap(), vec![kept]);
}

#[test]
fn samples_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.db");

    let created = {
        let conn = open_db(&path).unwrap();
        let store = SampleStore::new(SqliteLocalStorage::new(&conn));
        store.add(scenario_fields()).unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = SampleStore::new(SqliteLocalStorage::new(&conn));
    assert_eq!(store.list().unwrap(), vec![created]);
}

#[test]
fn many_adds_mint_distinct_ids() {
    let store = SampleStore::new(MemoryLocalStorage::new());
    for index in 0..200 {
        store.add(numbered(&format!("S{index}"))).unwrap();
    }

    let samples = store.list().unwrap();
    let ids: HashSet<&str> = samples.iter().map(|sample| sample.id.as_str()).collect();
    assert_eq!(ids.len(), 200);
}
