//! Tests for the FFI desk handle over a scripted backend.
//!
//! The desk owns its runtime, so these are plain tests, not async ones.

use std::sync::Arc;

use clinic_desk_core::api::{Method, ScriptedTransport};
use clinic_desk_core::session::REJECTED_MESSAGE;
use clinic_desk_core::store::StorageKey;
use clinic_desk_core::{ClinicDesk, ClinicDeskError, DeskConfig, LocalStore};
use serde_json::json;

fn desk_with_store(store: LocalStore) -> (Arc<ScriptedTransport>, ClinicDesk) {
    let transport = Arc::new(ScriptedTransport::new());
    let desk = ClinicDesk::new(DeskConfig::default(), store, transport.clone()).unwrap();
    (transport, desk)
}

fn desk() -> (Arc<ScriptedTransport>, ClinicDesk) {
    desk_with_store(LocalStore::open_in_memory().unwrap())
}

fn admin_login(transport: &ScriptedTransport) {
    transport.on(
        Method::Post,
        "/login",
        200,
        json!({"token": "jwt-1", "user": {"id": 1, "username": "owner", "role": "ADMIN"}}),
    );
}

#[test]
fn test_login_sets_role_and_menu() {
    let (transport, desk) = desk();
    admin_login(&transport);

    let session = desk.login("owner".into(), "secret123".into()).unwrap();
    assert!(session.authenticated);
    assert_eq!(session.role.as_deref(), Some("admin"));
    assert_eq!(desk.role().as_deref(), Some("admin"));

    let paths: Vec<String> = desk.visible_menu().into_iter().map(|m| m.path).collect();
    assert!(paths.contains(&"/reports".to_string()));
    assert!(paths.contains(&"/account/branch".to_string()));

    let navigation = desk.resolve_route("/login".into());
    assert!(!navigation.allowed);
    assert_eq!(navigation.path, "/home");
}

#[test]
fn test_rejected_login_stays_signed_out() {
    let (transport, desk) = desk();
    transport.on_text(Method::Post, "/login", 401, "");

    match desk.login("owner".into(), "wrongpass".into()) {
        Err(ClinicDeskError::InvalidInput(message)) => assert_eq!(message, REJECTED_MESSAGE),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!desk.current_session().authenticated);
    assert!(desk.visible_menu().is_empty());
}

#[test]
fn test_blank_login_makes_no_call() {
    let (transport, desk) = desk();

    assert!(matches!(
        desk.login("".into(), "".into()),
        Err(ClinicDeskError::InvalidInput(_))
    ));
    assert!(transport.calls().is_empty());
}

#[test]
fn test_logout_returns_login_path() {
    let store = LocalStore::open_in_memory().unwrap();
    let (transport, desk) = desk_with_store(store.clone());
    admin_login(&transport);
    desk.login("owner".into(), "secret123".into()).unwrap();
    assert_eq!(store.get(StorageKey::Token).unwrap().as_deref(), Some("jwt-1"));

    assert_eq!(desk.logout().unwrap(), "/login");
    assert!(!desk.current_session().authenticated);
    assert_eq!(store.get(StorageKey::Token).unwrap(), None);
}

#[test]
fn test_stored_session_restored_on_open() {
    let store = LocalStore::open_in_memory().unwrap();
    store.set(StorageKey::Token, "jwt-9").unwrap();
    store.set(StorageKey::UserRole, "employee").unwrap();
    store.set(StorageKey::Username, "nurse1").unwrap();

    let (_, desk) = desk_with_store(store);
    let session = desk.current_session();
    assert!(session.authenticated);
    assert_eq!(session.username.as_deref(), Some("nurse1"));
    assert!(!desk.resolve_route("/reports".into()).allowed);
    assert!(desk.resolve_route("/inventory".into()).allowed);
}

#[test]
fn test_list_inventory_derives_status() {
    let (transport, desk) = desk();
    admin_login(&transport);
    desk.login("owner".into(), "secret123".into()).unwrap();
    transport.on(
        Method::Get,
        "/items",
        200,
        json!([
            {"itemID": 1, "itemName": "Gauze", "itemQuantity": 0, "itemPrice": 2},
            {"itemID": 2, "itemName": "Saline", "itemQuantity": 8, "itemPrice": 30,
             "expDate": "2001-01-01"},
            {"itemID": 3, "itemName": "Gloves", "itemQuantity": 200, "itemPrice": 5,
             "branch": {"branchID": 1, "branchName": "Main"}}
        ]),
    );

    let rows = desk.list_inventory().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].status, "Out of Stock");
    assert_eq!(rows[0].status_color, "red");
    assert_eq!(rows[1].status, "Expired");
    assert_eq!(rows[1].expiry.as_deref(), Some("2001-01-01"));
    assert_eq!(rows[2].status, "In Stock");
    assert_eq!(rows[2].branch.as_deref(), Some("Main"));
}

#[test]
fn test_list_patients_uses_search() {
    let (transport, desk) = desk();
    admin_login(&transport);
    desk.login("owner".into(), "secret123".into()).unwrap();
    transport.on(
        Method::Get,
        "/searchPatients",
        200,
        json!([{"clientID": 4, "givenName": "Jane", "middleInitial": "R", "lastName": "Smith"}]),
    );

    let rows = desk.list_patients(Some("smith".into())).unwrap();
    assert_eq!(rows[0].full_name, "Jane R. Smith");
    assert!(!rows[0].archived);
    assert_eq!(transport.calls_to(Method::Get, "/searchPatients").len(), 1);
}

#[test]
fn test_expired_token_maps_to_unauthorized() {
    let (transport, desk) = desk();
    admin_login(&transport);
    desk.login("owner".into(), "secret123".into()).unwrap();
    transport.on_text(Method::Get, "/items", 401, "");

    assert!(matches!(
        desk.list_inventory(),
        Err(ClinicDeskError::Unauthorized)
    ));
    assert!(!desk.current_session().authenticated);
}

#[test]
fn test_offline_maps_to_network_error() {
    let (transport, desk) = desk();
    transport.offline(Method::Get, "/getPatient");

    assert!(matches!(
        desk.list_patients(None),
        Err(ClinicDeskError::NetworkError(_))
    ));
}

#[test]
fn test_report_summary() {
    let (transport, desk) = desk();
    transport
        .on(
            Method::Get,
            "/service/getRenderedServices",
            200,
            json!([{"services": [{"serviceName": "Checkup"}], "items": [], "totalCost": 250}]),
        )
        .on(Method::Get, "/items", 200, json!([]));

    let summary = desk.report_summary().unwrap();
    assert_eq!(summary.total_revenue, 250.0);
    assert_eq!(summary.services.len(), 1);
    assert_eq!(summary.services[0].end_percent, 100.0);
    assert!(summary.stock.is_empty());
}
