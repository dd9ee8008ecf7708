//! Clinic Desk Core Library
//!
//! Headless front-end core for a clinic management desk: typed REST
//! resources, searchable paginated lists, schema-driven modal forms, a shared
//! session with role-gated navigation, and the render-services, attendance
//! and reports screens.
//!
//! # Architecture
//!
//! ```text
//!   UI shell (native / web)
//!          │  FFI (ClinicDesk)
//!          ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │ page: PageController<R> + screen controllers             │
//!   │   ListView (search → page)    ModalForm (schema → R)     │
//!   └───────────────┬──────────────────────────┬───────────────┘
//!                   │                          │
//!          ResourceService<R>            Session ── nav guard
//!                   │                          │
//!               ApiClient ── bearer token ─────┤
//!                   │                          │
//!           Transport (reqwest)         LocalStore (SQLite)
//!                   │
//!              Backend REST API
//! ```
//!
//! # Core Principle
//!
//! **A failed action never disturbs unrelated state.** Lists, open forms and
//! the session stay as they were; the failure is reported in the banner.
//!
//! # Modules
//!
//! - [`api`]: HTTP transport, client and per-resource services
//! - [`config`]: Layered configuration
//! - [`form`]: Form schemas, validation and modal state
//! - [`models`]: Domain types (Patient, InventoryItem, Service, etc.)
//! - [`nav`]: Routes, menu and guards
//! - [`page`]: Page containers for each screen
//! - [`session`]: Session state and login
//! - [`store`]: Persisted local state
//! - [`view`]: List filtering, selection and pagination

pub mod api;
pub mod config;
pub mod form;
pub mod models;
pub mod nav;
pub mod page;
pub mod session;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, HttpTransport, Resource, ResourceService, Transport};
pub use config::DeskConfig;
pub use form::{FormRecord, FormSchema, ModalForm};
pub use models::{
    Account, Branch, ClockRecord, Employee, InventoryItem, Patient, Record, RecordId, Role,
    Service, StockStatus,
};
pub use nav::{Navigation, Route};
pub use page::{PageController, PageError};
pub use session::{Session, SessionSnapshot};
pub use store::LocalStore;
pub use view::ListView;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::Path;
use std::sync::Arc;

use chrono::Local;

use api::{AccountsApi, Credentials};
use page::{
    AccountPage, AttendancePage, InventoryPage, PatientsPage, RenderServicesPage, ReportsPage,
};
use session::LoginError;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicDeskError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("{0}")]
    NetworkError(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Your session has ended. Please log in again.")]
    Unauthorized,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Report error: {0}")]
    ReportError(String),
}

impl From<config::ConfigError> for ClinicDeskError {
    fn from(e: config::ConfigError) -> Self {
        ClinicDeskError::ConfigError(e.to_string())
    }
}

impl From<store::StoreError> for ClinicDeskError {
    fn from(e: store::StoreError) -> Self {
        ClinicDeskError::StorageError(e.to_string())
    }
}

impl From<ApiError> for ClinicDeskError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Network(_) => ClinicDeskError::NetworkError(e.user_message()),
            ApiError::Unauthorized => ClinicDeskError::Unauthorized,
            ApiError::InvalidRequest(_) => ClinicDeskError::InvalidInput(e.user_message()),
            ApiError::Api { .. } | ApiError::Decode(_) => ClinicDeskError::ApiError(e.user_message()),
        }
    }
}

impl From<LoginError> for ClinicDeskError {
    fn from(e: LoginError) -> Self {
        match e {
            LoginError::Api(api) => api.into(),
            LoginError::Store(store) => store.into(),
            other => ClinicDeskError::InvalidInput(other.user_message()),
        }
    }
}

impl From<PageError> for ClinicDeskError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::Api(api) => api.into(),
            PageError::Store(store) => store.into(),
            PageError::Report(report) => ClinicDeskError::ReportError(report.to_string()),
            other => ClinicDeskError::InvalidInput(other.user_message()),
        }
    }
}

impl From<std::io::Error> for ClinicDeskError {
    fn from(e: std::io::Error) -> Self {
        ClinicDeskError::ConfigError(format!("Failed to start runtime: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a desk, loading configuration from an optional TOML file.
#[uniffi::export]
pub fn open_desk(config_path: Option<String>) -> Result<Arc<ClinicDesk>, ClinicDeskError> {
    let config = DeskConfig::load(config_path.as_deref().map(Path::new))?;
    let store = match &config.store_path {
        Some(path) => LocalStore::open(path)?,
        None => LocalStore::open_in_memory()?,
    };
    let transport = Arc::new(HttpTransport::new(&config)?);
    Ok(Arc::new(ClinicDesk::new(config, store, transport)?))
}

/// Open a desk against `base_url` with an in-memory store (for testing).
#[uniffi::export]
pub fn open_desk_in_memory(base_url: String) -> Result<Arc<ClinicDesk>, ClinicDeskError> {
    let config = DeskConfig {
        api_base_url: base_url,
        ..DeskConfig::default()
    }
    .validated()?;
    let transport = Arc::new(HttpTransport::new(&config)?);
    Ok(Arc::new(ClinicDesk::new(
        config,
        LocalStore::open_in_memory()?,
        transport,
    )?))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Desk handle for FFI. Async calls run on an owned runtime.
#[derive(uniffi::Object)]
pub struct ClinicDesk {
    runtime: tokio::runtime::Runtime,
    client: ApiClient,
    config: DeskConfig,
}

impl ClinicDesk {
    /// Build a desk over any transport, restoring the stored session.
    pub fn new(
        config: DeskConfig,
        store: LocalStore,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ClinicDeskError> {
        let session = Session::restore(store)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        Ok(Self {
            runtime,
            client: ApiClient::new(transport, session),
            config,
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    pub fn service<R: Resource>(&self) -> ResourceService<R> {
        ResourceService::new(self.client.clone())
    }

    /// Generic CRUD page for services, employees or branches.
    pub fn crud_page<R: Resource + FormRecord>(&self) -> PageController<R> {
        PageController::new(self.service(), self.config.page_size)
    }

    pub fn patients_page(&self) -> PatientsPage {
        PatientsPage::new(self.service(), self.config.page_size)
    }

    pub fn inventory_page(&self) -> InventoryPage {
        InventoryPage::new(
            self.service(),
            self.config.page_size,
            self.config.stock_thresholds(),
        )
    }

    pub fn render_page(&self) -> RenderServicesPage {
        RenderServicesPage::new(self.service())
    }

    pub fn attendance_page(&self) -> AttendancePage {
        AttendancePage::new(self.client.clone())
    }

    pub fn reports_page(&self) -> ReportsPage {
        ReportsPage::new(self.service())
    }

    pub fn account_page(&self) -> AccountPage {
        AccountPage::new(
            AccountsApi::new(self.client.clone()),
            self.client.session().clone(),
        )
    }
}

#[uniffi::export]
impl ClinicDesk {
    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Log in and start a session.
    pub fn login(&self, username: String, password: String) -> Result<FfiSession, ClinicDeskError> {
        let accounts = AccountsApi::new(self.client.clone());
        let credentials = Credentials { username, password };
        let snapshot = self.runtime.block_on(session::login(
            &accounts,
            self.client.session(),
            &credentials,
        ))?;
        Ok(snapshot.into())
    }

    /// Log out. Returns the path to show next.
    pub fn logout(&self) -> Result<String, ClinicDeskError> {
        Ok(self.client.session().end()?.path())
    }

    /// Current session state.
    pub fn current_session(&self) -> FfiSession {
        self.client.session().snapshot().into()
    }

    /// Current role, `None` when signed out.
    pub fn role(&self) -> Option<String> {
        self.client.session().role().map(|role| role.to_string())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Menu entries for the current role.
    pub fn visible_menu(&self) -> Vec<FfiMenuItem> {
        nav::visible_menu(self.client.session().role())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    /// Decide what to show for a requested path.
    pub fn resolve_route(&self, path: String) -> FfiNavigation {
        nav::resolve(&path, &self.client.session().snapshot()).into()
    }

    // =========================================================================
    // Listing Operations
    // =========================================================================

    /// List patients, optionally searched.
    pub fn list_patients(&self, query: Option<String>) -> Result<Vec<FfiPatient>, ClinicDeskError> {
        let service: ResourceService<Patient> = self.service();
        let patients = self.runtime.block_on(service.list(query.as_deref()))?;
        let today = Local::now().date_naive();
        Ok(patients
            .into_iter()
            .map(|patient| FfiPatient {
                client_id: patient.client_id,
                patient_code: patient.patient_code.clone(),
                full_name: patient.full_name(),
                sex: patient.sex.clone(),
                age: patient.display_age(today),
                archived: patient.is_archived(),
            })
            .collect())
    }

    /// List inventory with derived stock statuses.
    pub fn list_inventory(&self) -> Result<Vec<FfiInventoryItem>, ClinicDeskError> {
        let service: ResourceService<InventoryItem> = self.service();
        let items = self.runtime.block_on(service.list(None))?;
        let today = Local::now().date_naive();
        let thresholds = self.config.stock_thresholds();
        Ok(items
            .into_iter()
            .map(|item| {
                let status = item.status_on(today, thresholds);
                FfiInventoryItem {
                    item_id: item.item_id,
                    name: item.item_name.clone(),
                    quantity: item.item_quantity,
                    price: item.item_price,
                    expiry: item.exp_date.map(|d| d.format("%Y-%m-%d").to_string()),
                    branch: item.branch_name().map(String::from),
                    status: status.label().to_string(),
                    status_color: status.color().to_string(),
                }
            })
            .collect())
    }

    // =========================================================================
    // Reports
    // =========================================================================

    /// Build the reports dashboard.
    pub fn report_summary(&self) -> Result<FfiReportSummary, ClinicDeskError> {
        let mut page = self.reports_page();
        let total_revenue = self.runtime.block_on(page.mount())?.total_revenue;
        Ok(FfiReportSummary {
            services: page.service_segments().into_iter().map(Into::into).collect(),
            medicines: page.medicine_segments().into_iter().map(Into::into).collect(),
            stock: page.stock_segments().into_iter().map(Into::into).collect(),
            total_revenue,
        })
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe session snapshot.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiSession {
    pub authenticated: bool,
    pub role: Option<String>,
    pub username: Option<String>,
}

impl From<SessionSnapshot> for FfiSession {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            authenticated: snapshot.is_authenticated(),
            role: snapshot.role.map(|role| role.to_string()),
            username: snapshot.username,
        }
    }
}

/// FFI-safe menu entry.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiMenuItem {
    pub label: String,
    pub path: String,
}

impl From<nav::MenuItem> for FfiMenuItem {
    fn from(item: nav::MenuItem) -> Self {
        Self {
            label: item.label.to_string(),
            path: item.route.path(),
        }
    }
}

/// FFI-safe navigation outcome.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiNavigation {
    /// False when the shell must redirect to `path`
    pub allowed: bool,
    pub path: String,
}

impl From<Navigation> for FfiNavigation {
    fn from(navigation: Navigation) -> Self {
        match navigation {
            Navigation::Allow(route) => Self {
                allowed: true,
                path: route.path(),
            },
            Navigation::Redirect(route) => Self {
                allowed: false,
                path: route.path(),
            },
        }
    }
}

/// FFI-safe patient row.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiPatient {
    pub client_id: Option<i64>,
    pub patient_code: String,
    pub full_name: String,
    pub sex: Option<String>,
    pub age: Option<u32>,
    pub archived: bool,
}

/// FFI-safe inventory row.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiInventoryItem {
    pub item_id: Option<i64>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub expiry: Option<String>,
    pub branch: Option<String>,
    pub status: String,
    pub status_color: String,
}

/// FFI-safe pie segment.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiChartSegment {
    pub name: String,
    pub value: f64,
    pub start_percent: f64,
    pub end_percent: f64,
    pub color: String,
}

impl From<clinic_desk_reports::PieSegment> for FfiChartSegment {
    fn from(segment: clinic_desk_reports::PieSegment) -> Self {
        Self {
            name: segment.name,
            value: segment.value,
            start_percent: segment.start_percent,
            end_percent: segment.end_percent,
            color: segment.color,
        }
    }
}

/// FFI-safe reports dashboard.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiReportSummary {
    pub services: Vec<FfiChartSegment>,
    pub medicines: Vec<FfiChartSegment>,
    pub stock: Vec<FfiChartSegment>,
    pub total_revenue: f64,
}
