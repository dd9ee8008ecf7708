//! Screen workflow integration tests: archiving, billing, session lifecycle.

use std::sync::Arc;

use clinic_desk_core::api::{AccountsApi, ApiClient, Credentials, Method, ResourceService, ScriptedTransport};
use clinic_desk_core::models::{Patient, Role};
use clinic_desk_core::nav::{self, Navigation, Route};
use clinic_desk_core::page::{PageError, PatientsPage, RenderServicesPage, NO_SERVICE_MESSAGE};
use clinic_desk_core::session::{self, Session};
use clinic_desk_core::store::{LocalStore, StorageKey};
use serde_json::json;

fn client(transport: &Arc<ScriptedTransport>) -> ApiClient {
    let session = Session::new(LocalStore::open_in_memory().unwrap());
    session
        .begin("tok".into(), Role::Employee, "nurse1".into())
        .unwrap();
    ApiClient::new(transport.clone(), session)
}

// =========================================================================
// Archiving
// =========================================================================

#[tokio::test]
async fn test_archive_and_unarchive_round_trip() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .on(
            Method::Get,
            "/getPatient",
            200,
            json!([
                {"clientID": 1, "givenName": "Jane", "lastName": "Smith"},
                {"clientID": 2, "givenName": "John", "lastName": "Doe"}
            ]),
        )
        .on_text(Method::Patch, "/archivePatient/1", 200, "Patient archived")
        .on_text(Method::Patch, "/unarchivePatient/1", 200, "Patient restored");
    let mut page = PatientsPage::new(ResourceService::new(client(&transport)), 10);
    page.mount().await.unwrap();
    assert_eq!(page.page().list().visible().len(), 2);

    page.archive(1).await.unwrap();
    assert!(page.page().list().find(1).unwrap().is_archived());
    let visible: Vec<_> = page
        .page()
        .list()
        .visible()
        .iter()
        .filter_map(|p| p.client_id)
        .collect();
    assert_eq!(visible, vec![2]);

    page.set_show_archived(true);
    page.unarchive(1).await.unwrap();
    page.set_show_archived(false);
    assert!(!page.page().list().find(1).unwrap().is_archived());
    assert_eq!(page.page().list().visible().len(), 2);
}

// =========================================================================
// Render services
// =========================================================================

fn billing_backend() -> Arc<ScriptedTransport> {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .on(
            Method::Get,
            "/service/getServices",
            200,
            json!([
                {"serviceID": 1, "service_name": "Prenatal Checkup", "service_price": 300},
                {"serviceID": 2, "service_name": "Ultrasound", "service_price": 900}
            ]),
        )
        .on(
            Method::Get,
            "/items",
            200,
            json!([
                {"itemID": 10, "itemName": "Ferrous Sulfate", "itemQuantity": 5, "itemPrice": 2},
                {"itemID": 11, "itemName": "Folic Acid", "itemQuantity": 20, "itemPrice": 1.5}
            ]),
        )
        .on_text(Method::Post, "/service/renderService", 200, "Service rendered");
    transport
}

fn patient() -> Patient {
    Patient {
        client_id: Some(7),
        patient_code: "PT-0007".into(),
        ..Patient::new("Ana".into(), "Cruz".into())
    }
}

#[tokio::test]
async fn test_render_decrements_local_stock() {
    let transport = billing_backend();
    let mut page = RenderServicesPage::new(ResourceService::new(client(&transport)));
    page.mount().await.unwrap();
    page.set_patient(patient());

    assert!(page.add_service(1).unwrap());
    assert!(!page.add_service(1).unwrap());
    assert!(page.add_item(10).unwrap());
    assert!(!page.add_item(10).unwrap());
    page.set_quantity(10, 3);
    assert_eq!(page.total_cost(), 306.0);

    let sent = page.submit().await.unwrap();
    assert_eq!(sent.items[0].item_quantity, 3);

    let body = transport.calls_to(Method::Post, "/service/renderService")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["patient"]["clientID"], 7);
    assert_eq!(body["services"], json!([{"serviceID": 1}]));
    assert_eq!(body["items"], json!([{"itemID": 10, "itemQuantity": 3}]));
    assert_eq!(body["totalCost"], 306.0);

    let stock = page
        .item_catalog()
        .iter()
        .find(|i| i.item_id == Some(10))
        .unwrap();
    assert_eq!(stock.item_quantity, 2);
    assert!(page.cart().is_empty());
}

#[tokio::test]
async fn test_render_rejects_quantity_above_stock_without_call() {
    let transport = billing_backend();
    let mut page = RenderServicesPage::new(ResourceService::new(client(&transport)));
    page.mount().await.unwrap();
    page.set_patient(patient());
    page.add_service(2).unwrap();
    page.add_item(10).unwrap();
    page.set_quantity(10, 6);

    let err = page.submit().await.unwrap_err();
    assert_eq!(err.user_message(), "Only 5 Ferrous Sulfate left in stock.");
    assert!(transport
        .calls_to(Method::Post, "/service/renderService")
        .is_empty());
    assert_eq!(page.item_catalog()[0].item_quantity, 5);
}

#[tokio::test]
async fn test_render_requires_a_service() {
    let transport = billing_backend();
    let mut page = RenderServicesPage::new(ResourceService::new(client(&transport)));
    page.mount().await.unwrap();
    page.set_patient(patient());
    page.add_item(11).unwrap();

    match page.submit().await {
        Err(PageError::Invalid(message)) => assert_eq!(message, NO_SERVICE_MESSAGE),
        other => panic!("unexpected result: {:?}", other.map(|r| r.total_cost)),
    }
}

#[tokio::test]
async fn test_quantity_never_below_one() {
    let transport = billing_backend();
    let mut page = RenderServicesPage::new(ResourceService::new(client(&transport)));
    page.mount().await.unwrap();
    page.add_item(11).unwrap();

    page.set_quantity(11, 0);
    assert_eq!(page.cart().items[0].quantity, 1);
    page.set_quantity(11, -4);
    assert_eq!(page.cart().items[0].quantity, 1);

    page.remove_item(11);
    assert!(page.cart().is_empty());
}

#[tokio::test]
async fn test_suggestions_from_catalog() {
    let transport = billing_backend();
    let mut page = RenderServicesPage::new(ResourceService::new(client(&transport)));
    page.mount().await.unwrap();

    let names: Vec<_> = page
        .item_suggestions("fo")
        .iter()
        .map(|i| i.item_name.clone())
        .collect();
    assert_eq!(names, vec!["Folic Acid"]);
    assert_eq!(page.service_suggestions("sound").len(), 1);
}

// =========================================================================
// Session lifecycle
// =========================================================================

#[tokio::test]
async fn test_session_restores_and_logout_clears_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("desk.db");

    {
        let transport = Arc::new(ScriptedTransport::new());
        transport.on(
            Method::Post,
            "/login",
            200,
            json!({"token": "jwt-1", "user": {"id": 4, "username": "owner", "role": "ROLE_ADMIN"}}),
        );
        let session = Session::new(LocalStore::open(&path).unwrap());
        let accounts = AccountsApi::new(ApiClient::new(transport.clone(), session.clone()));
        let credentials = Credentials {
            username: "owner".into(),
            password: "secret123".into(),
        };
        session::login(&accounts, &session, &credentials).await.unwrap();
    }

    let store = LocalStore::open(&path).unwrap();
    let restored = Session::restore(store.clone()).unwrap();
    assert_eq!(restored.role(), Some(Role::Admin));
    assert_eq!(restored.username().as_deref(), Some("owner"));
    assert_eq!(
        nav::resolve("/reports", &restored.snapshot()),
        Navigation::Allow(Route::Reports)
    );

    assert_eq!(restored.end().unwrap(), Route::Login);
    for key in StorageKey::SESSION {
        assert_eq!(store.get(key).unwrap(), None);
    }
    assert!(!Session::restore(store).unwrap().is_authenticated());
}
