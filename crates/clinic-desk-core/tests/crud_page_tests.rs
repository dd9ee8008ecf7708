//! CRUD page integration tests against a scripted backend.

use std::sync::Arc;

use clinic_desk_core::api::{ApiClient, Method, ResourceService, ScriptedTransport};
use clinic_desk_core::form::{FormError, ModalIntent};
use clinic_desk_core::models::{InventoryItem, Patient, Role};
use clinic_desk_core::page::{BannerKind, PageController, PageError};
use clinic_desk_core::session::Session;
use clinic_desk_core::store::LocalStore;
use serde_json::json;

fn signed_in_client(transport: &Arc<ScriptedTransport>) -> ApiClient {
    let session = Session::new(LocalStore::open_in_memory().unwrap());
    session
        .begin("jwt-abc".into(), Role::Admin, "owner".into())
        .unwrap();
    ApiClient::new(transport.clone(), session)
}

fn patient_page(transport: &Arc<ScriptedTransport>) -> PageController<Patient> {
    PageController::new(ResourceService::new(signed_in_client(transport)), 10)
}

fn item_page(transport: &Arc<ScriptedTransport>) -> PageController<InventoryItem> {
    PageController::new(ResourceService::new(signed_in_client(transport)), 10)
}

fn patients() -> serde_json::Value {
    json!([
        {"clientID": 1, "patientID": "PT-0001", "givenName": "Jane", "lastName": "Smith",
         "sex": "F", "birthday": "1995-04-02", "address": "Cebu City"},
        {"clientID": 2, "patientID": "PT-0002", "givenName": "John", "lastName": "Doe",
         "sex": "M", "birthday": "1990-01-15"}
    ])
}

#[tokio::test]
async fn test_create_sends_entered_values_and_patches_list() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .on(Method::Get, "/getPatient", 200, patients())
        .on(Method::Post, "/addPatient", 200, json!(3));
    let mut page = patient_page(&transport);
    page.mount().await.unwrap();

    page.open_create();
    let modal = page.modal_mut().unwrap();
    modal.set("givenName", "Maria").unwrap();
    modal.set("lastName", "Santos").unwrap();
    modal.set("sex", "F").unwrap();
    modal.set("birthday", "1998-07-21").unwrap();
    let saved = page.submit_modal().await.unwrap();

    let creates = transport.calls_to(Method::Post, "/addPatient");
    assert_eq!(creates.len(), 1);
    let body = creates[0].body.clone().unwrap();
    assert_eq!(body["givenName"], "Maria");
    assert_eq!(body["lastName"], "Santos");
    assert_eq!(body["sex"], "F");
    assert_eq!(body["birthday"], "1998-07-21");
    assert_eq!(creates[0].bearer.as_deref(), Some("jwt-abc"));

    assert_eq!(saved.client_id, Some(3));
    assert_eq!(page.list().find(3).unwrap().full_name(), "Maria Santos");
    // Only the mount fetched the list
    assert_eq!(transport.calls_to(Method::Get, "/getPatient").len(), 1);
    assert!(page.modal().is_none());
    assert_eq!(page.banner().unwrap().message, "Patient added successfully.");
}

#[tokio::test]
async fn test_missing_required_field_makes_no_call() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(Method::Get, "/getPatient", 200, patients());
    let mut page = patient_page(&transport);
    page.mount().await.unwrap();
    transport.clear_calls();

    page.open_create();
    let modal = page.modal_mut().unwrap();
    modal.set("givenName", "Maria").unwrap();
    modal.set("sex", "F").unwrap();
    modal.set("birthday", "1998-07-21").unwrap();

    let err = page.submit_modal().await.unwrap_err();
    assert!(matches!(err, PageError::Form(FormError::Invalid(_))));
    assert!(transport.calls().is_empty());

    let modal = page.modal().unwrap();
    assert_eq!(modal.errors().get("lastName"), Some("Last Name is required."));
    assert_eq!(modal.value("givenName"), Some("Maria"));
}

#[tokio::test]
async fn test_edit_prefills_and_sends_full_record() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .on(Method::Get, "/getPatient", 200, patients())
        .on_text(Method::Patch, "/updatePatient/1", 200, "Patient updated");
    let mut page = patient_page(&transport);
    page.mount().await.unwrap();

    page.list_mut().toggle_select(1);
    page.open_edit().unwrap();
    let modal = page.modal_mut().unwrap();
    assert!(matches!(modal.intent(), ModalIntent::Edit(_)));
    assert_eq!(modal.value("givenName"), Some("Jane"));
    assert_eq!(modal.value("lastName"), Some("Smith"));
    assert_eq!(modal.value("birthday"), Some("1995-04-02"));
    assert_eq!(modal.value("address"), Some("Cebu City"));

    modal.set("address", "Mandaue City").unwrap();
    page.submit_modal().await.unwrap();

    let body = transport.calls_to(Method::Patch, "/updatePatient/1")[0]
        .body
        .clone()
        .unwrap();
    assert_eq!(body["clientID"], 1);
    assert_eq!(body["patientID"], "PT-0001");
    assert_eq!(body["givenName"], "Jane");
    assert_eq!(body["lastName"], "Smith");
    assert_eq!(body["sex"], "F");
    assert_eq!(body["address"], "Mandaue City");

    assert_eq!(
        page.list().find(1).unwrap().address.as_deref(),
        Some("Mandaue City")
    );
    assert_eq!(page.banner().unwrap().message, "Patient updated successfully.");
}

#[tokio::test]
async fn test_search_matches_by_name() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on(Method::Get, "/getPatient", 200, patients());
    let mut page = patient_page(&transport);
    page.mount().await.unwrap();

    page.list_mut().set_query("jane");
    let names: Vec<String> = page
        .list()
        .page_items()
        .iter()
        .map(|p| p.full_name())
        .collect();
    assert_eq!(names, vec!["Jane Smith"]);
}

#[tokio::test]
async fn test_bulk_delete_one_call_with_both_ids() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .on(
            Method::Get,
            "/items",
            200,
            json!([
                {"itemID": 1, "itemName": "Paracetamol", "itemQuantity": 10, "itemPrice": 4.5},
                {"itemID": 2, "itemName": "Amoxicillin", "itemQuantity": 5, "itemPrice": 12},
                {"itemID": 3, "itemName": "Gauze", "itemQuantity": 50, "itemPrice": 2}
            ]),
        )
        .on_text(Method::Delete, "/deleteItems", 200, "Items deleted");
    let mut page = item_page(&transport);
    page.mount().await.unwrap();

    page.list_mut().toggle_select(1);
    page.list_mut().toggle_select(3);
    assert_eq!(page.delete_selected().await.unwrap(), 2);

    let deletes: Vec<_> = transport
        .calls()
        .into_iter()
        .filter(|call| call.method == Method::Delete)
        .collect();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].query_value("ids"), Some("1,3"));

    let remaining: Vec<_> = page.list().items().iter().filter_map(|i| i.item_id).collect();
    assert_eq!(remaining, vec![2]);
    assert!(page.list().selected_ids().is_empty());
}

#[tokio::test]
async fn test_failed_delete_keeps_rows() {
    let transport = Arc::new(ScriptedTransport::new());
    transport
        .on(
            Method::Get,
            "/items",
            200,
            json!([{"itemID": 1, "itemName": "Paracetamol", "itemQuantity": 10}]),
        )
        .on(
            Method::Delete,
            "/deleteItems/1",
            409,
            json!({"message": "Item is referenced by a rendered service"}),
        );
    let mut page = item_page(&transport);
    page.mount().await.unwrap();

    let err = page.delete(1).await.unwrap_err();
    assert_eq!(err.user_message(), "Item is referenced by a rendered service");
    assert_eq!(page.list().items().len(), 1);

    let banner = page.banner().unwrap();
    assert_eq!(banner.kind, BannerKind::Error);
}

#[tokio::test]
async fn test_unauthorized_ends_session() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.on_text(Method::Get, "/items", 401, "");
    let client = signed_in_client(&transport);
    let session = client.session().clone();
    let mut page: PageController<InventoryItem> =
        PageController::new(ResourceService::new(client), 10);

    assert!(page.mount().await.is_err());
    assert!(!session.is_authenticated());
    assert_eq!(
        page.banner().unwrap().message,
        "Your session has ended. Please log in again."
    );
}
