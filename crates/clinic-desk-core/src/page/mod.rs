//! Page containers: one list, its modal and the fetch/mutate/refresh cycle.
//!
//! Failures are reported through the banner. The list only changes for what
//! the backend accepted.

mod account;
mod attendance;
mod inventory;
mod patients;
mod render;
mod reports;

pub use account::*;
pub use attendance::*;
pub use inventory::*;
pub use patients::*;
pub use render::*;
pub use reports::*;

use std::time::{Duration, Instant};

use clinic_desk_reports::ReportError;
use thiserror::Error;

use crate::api::{ApiError, Resource, ResourceService};
use crate::form::{FormError, FormRecord, ModalForm, Submission};
use crate::models::RecordId;
use crate::store::StoreError;
use crate::view::ListView;

/// How long a banner stays up.
pub const BANNER_TTL: Duration = Duration::from_secs(4);

/// Page errors.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Select exactly one row to edit.")]
    SelectionRequired,

    #[error("Select at least one row to delete.")]
    NothingSelected,

    #[error("No form is open.")]
    NoModal,

    #[error("{0}")]
    Invalid(String),
}

impl PageError {
    pub fn user_message(&self) -> String {
        match self {
            PageError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type PageResult<T> = Result<T, PageError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// Transient success/error message.
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
    shown_at: Instant,
}

impl Banner {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= BANNER_TTL
    }
}

/// What to do with the list after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Patch the saved record into the list; refetch only when the backend
    /// did not return an id
    #[default]
    LocalPatch,
    /// Always refetch the collection
    Refetch,
}

/// Generic CRUD screen for resource `R`.
pub struct PageController<R: Resource + FormRecord> {
    service: ResourceService<R>,
    list: ListView<R>,
    modal: Option<ModalForm<R>>,
    banner: Option<Banner>,
    refresh: RefreshPolicy,
}

impl<R: Resource + FormRecord> PageController<R> {
    pub fn new(service: ResourceService<R>, page_size: usize) -> Self {
        Self {
            service,
            list: ListView::new(page_size),
            modal: None,
            banner: None,
            refresh: RefreshPolicy::default(),
        }
    }

    pub fn with_refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    pub fn list(&self) -> &ListView<R> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListView<R> {
        &mut self.list
    }

    pub fn modal(&self) -> Option<&ModalForm<R>> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut ModalForm<R>> {
        self.modal.as_mut()
    }

    /// Current banner, dropping it once expired.
    pub fn banner(&mut self) -> Option<&Banner> {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn show(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }

    /// Show `error` in the banner and return it.
    pub(super) fn fail<T>(&mut self, error: PageError) -> PageResult<T> {
        self.banner = Some(Banner::error(error.user_message()));
        Err(error)
    }

    /// First load of the page.
    pub async fn mount(&mut self) -> PageResult<()> {
        self.refresh().await
    }

    /// Refetch the collection. On failure the previous rows stay.
    pub async fn refresh(&mut self) -> PageResult<()> {
        match self.service.list(None).await {
            Ok(records) => {
                self.list.replace_items(records);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load {} list: {}", R::NOUN, e);
                self.fail(e.into())
            }
        }
    }

    pub fn open_create(&mut self) {
        self.modal = Some(ModalForm::create());
    }

    /// Open the edit modal for the single selected row.
    pub fn open_edit(&mut self) -> PageResult<()> {
        let record = self
            .list
            .selected_record()
            .cloned()
            .ok_or(PageError::SelectionRequired)?;
        self.modal = Some(ModalForm::edit(record)?);
        Ok(())
    }

    /// Open the edit modal for a specific row.
    pub fn open_edit_id(&mut self, id: RecordId) -> PageResult<()> {
        let record = self
            .list
            .find(id)
            .cloned()
            .ok_or_else(|| PageError::Invalid(format!("{} not found.", R::NOUN)))?;
        self.modal = Some(ModalForm::edit(record)?);
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// Validate the open modal and save through the resource service.
    ///
    /// Validation errors keep the modal open with per-field messages and
    /// make no network call. Backend failures keep it open too.
    pub async fn submit_modal(&mut self) -> PageResult<R> {
        let modal = self.modal.as_mut().ok_or(PageError::NoModal)?;
        let submission = modal.submit()?;

        let result = match &submission {
            Submission::Create(record) => self.service.create(record).await,
            Submission::Update { id, record } => self.service.update(*id, record).await,
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => return self.fail(e.into()),
        };

        let verb = match submission {
            Submission::Create(_) => "added",
            Submission::Update { .. } => "updated",
        };
        self.modal = None;
        self.banner = Some(Banner::success(format!("{} {} successfully.", R::NOUN, verb)));

        match (self.refresh, saved.id()) {
            (RefreshPolicy::LocalPatch, Some(_)) => self.list.upsert(saved.clone()),
            // A failed refetch leaves stale rows under the success banner
            _ => match self.service.list(None).await {
                Ok(records) => self.list.replace_items(records),
                Err(e) => tracing::warn!("Refetch after save failed: {}", e),
            },
        }
        Ok(saved)
    }

    pub async fn delete(&mut self, id: RecordId) -> PageResult<()> {
        if let Err(e) = self.service.delete(id).await {
            return self.fail(e.into());
        }
        self.list.remove_ids(&[id]);
        self.banner = Some(Banner::success(format!("{} deleted successfully.", R::NOUN)));
        Ok(())
    }

    /// Delete every selected row. Returns how many were removed.
    pub async fn delete_selected(&mut self) -> PageResult<usize> {
        let ids = self.list.selected_ids();
        if ids.is_empty() {
            return Err(PageError::NothingSelected);
        }
        let outcome = self.service.delete_many(&ids).await;
        // Rows the backend already accepted go even when a later id failed
        self.list.remove_ids(&outcome.deleted);
        if let Some(e) = outcome.error {
            return self.fail(e.into());
        }
        self.banner = Some(Banner::success(format!(
            "{} {}(s) deleted successfully.",
            outcome.deleted.len(),
            R::NOUN
        )));
        Ok(outcome.deleted.len())
    }
}
