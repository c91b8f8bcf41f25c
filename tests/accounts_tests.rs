use tempfile::TempDir;

use plantinfo::accounts::{AccountRegistry, AuthError, LOGGED_IN_KEY, USERS_KEY, USER_KEY};
use plantinfo::Storage;

#[test]
fn test_accounts_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plantinfo.db").to_string_lossy().into_owned();

    {
        let accounts = AccountRegistry::new(Storage::open(&path).unwrap());
        accounts.sign_up("alice", "secret1", "secret1").unwrap();
    }

    let accounts = AccountRegistry::new(Storage::open(&path).unwrap());
    // The registry is no longer empty, so the demo fallback is gone and
    // credentials are checked for real.
    assert!(matches!(
        accounts.log_in("alice", "wrong"),
        Err(AuthError::WrongPassword)
    ));
    accounts.log_in("alice", "secret1").unwrap();
    assert_eq!(accounts.current_user().as_deref(), Some("alice"));
}

#[test]
fn test_session_flags_use_frontend_keys() {
    let storage = Storage::in_memory().unwrap();
    let accounts = AccountRegistry::new(storage.clone());

    accounts.sign_up("alice", "secret1", "secret1").unwrap();
    assert_eq!(storage.get(LOGGED_IN_KEY).unwrap().as_deref(), Some("true"));
    assert_eq!(storage.get(USER_KEY).unwrap().as_deref(), Some("alice"));

    accounts.log_out().unwrap();
    assert!(storage.get(LOGGED_IN_KEY).unwrap().is_none());
    assert!(storage.get(USER_KEY).unwrap().is_none());
}

#[test]
fn test_users_key_is_a_plain_json_object() {
    let storage = Storage::in_memory().unwrap();
    let accounts = AccountRegistry::new(storage.clone());

    accounts.sign_up("alice", "secret1", "secret1").unwrap();
    accounts.log_out().unwrap();
    accounts.sign_up("bob", "hunter22", "hunter22").unwrap();

    let users: serde_json::Value =
        serde_json::from_str(&storage.get(USERS_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(users["alice"], "secret1");
    assert_eq!(users["bob"], "hunter22");
}

#[test]
fn test_accounts_and_plants_share_a_namespace() {
    // Both collaborators write the same storage, different keys.
    let storage = Storage::in_memory().unwrap();
    let accounts = AccountRegistry::new(storage.clone());
    let mut store = plantinfo::PlantStore::load(storage.clone());

    accounts.sign_up("alice", "secret1", "secret1").unwrap();
    store
        .add(
            plantinfo::NewPlant {
                name: "Monstera".to_string(),
                plant_type: "Monstera".to_string(),
                watering_notes: String::new(),
                image: "data:image/png;base64,AAAA".to_string(),
                watering_interval_days: None,
                fertilize_interval_days: None,
            },
            chrono::Utc::now(),
        )
        .unwrap();

    assert!(storage.get(USERS_KEY).unwrap().is_some());
    assert!(storage.get(plantinfo::store::PLANTS_KEY).unwrap().is_some());
    assert_eq!(accounts.current_user().as_deref(), Some("alice"));
}
