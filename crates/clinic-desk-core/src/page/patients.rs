//! Patient list with archive handling and visit logging.

use super::{Banner, PageController, PageError, PageResult};
use crate::api::{ResourceService, VisitsApi};
use crate::models::{Lifecycle, Patient, RecordId, VisitLog};

/// The `/patient` screen.
pub struct PatientsPage {
    page: PageController<Patient>,
    visits: VisitsApi,
    show_archived: bool,
}

impl PatientsPage {
    pub fn new(service: ResourceService<Patient>, page_size: usize) -> Self {
        let visits = VisitsApi::new(service.client().clone());
        let mut page = PageController::new(service, page_size);
        page.list_mut().set_filter(|patient: &Patient| !patient.is_archived());
        Self {
            page,
            visits,
            show_archived: false,
        }
    }

    pub fn page(&self) -> &PageController<Patient> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PageController<Patient> {
        &mut self.page
    }

    pub async fn mount(&mut self) -> PageResult<()> {
        self.page.mount().await
    }

    pub fn show_archived(&self) -> bool {
        self.show_archived
    }

    /// Switch between active patients only and every patient.
    pub fn set_show_archived(&mut self, show: bool) {
        self.show_archived = show;
        let list = self.page.list_mut();
        if show {
            list.clear_filter();
        } else {
            list.set_filter(|patient: &Patient| !patient.is_archived());
        }
    }

    pub async fn archive(&mut self, id: RecordId) -> PageResult<()> {
        self.set_status(id, Lifecycle::Archived).await
    }

    pub async fn unarchive(&mut self, id: RecordId) -> PageResult<()> {
        self.set_status(id, Lifecycle::Active).await
    }

    async fn set_status(&mut self, id: RecordId, status: Lifecycle) -> PageResult<()> {
        let service = self.page.service();
        let result = match status {
            Lifecycle::Archived => service.archive(id).await,
            Lifecycle::Active => service.unarchive(id).await,
        };
        if let Err(e) = result {
            return self.page.fail(e.into());
        }

        self.page
            .list_mut()
            .update_where(id, |patient| patient.status = status);
        let verb = match status {
            Lifecycle::Archived => "archived",
            Lifecycle::Active => "restored",
        };
        self.page
            .show(Banner::success(format!("Patient {} successfully.", verb)));
        Ok(())
    }

    /// Resolve a scanned QR code to a patient.
    pub async fn scan(&mut self, code: &str) -> PageResult<Patient> {
        match self.page.service().find_by_code(code).await {
            Ok(Some(patient)) => Ok(patient),
            Ok(None) => Err(PageError::Invalid("No patient matches that code.".into())),
            Err(e) => Err(e.into()),
        }
    }

    /// Log a visit for a patient.
    pub async fn log_visit(&mut self, id: RecordId, purpose: &str) -> PageResult<()> {
        let purpose = purpose.trim();
        if purpose.is_empty() {
            return Err(PageError::Invalid("Purpose of visit is required.".into()));
        }
        let visit = VisitLog {
            patient_id: id,
            purpose: purpose.to_string(),
        };
        if let Err(e) = self.visits.log(&visit).await {
            return self.page.fail(e.into());
        }
        self.page.show(Banner::success("Visit logged successfully."));
        Ok(())
    }
}
