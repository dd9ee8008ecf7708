//! Clock-in/clock-out screen.

use super::{Banner, PageError, PageResult};
use crate::api::{ApiClient, AttendanceApi, ResourceService};
use crate::models::{dedupe_by_id, Branch, ClockKind, ClockRecord, ClockRequest, RecordId};
use crate::store::{LocalStore, StorageKey};

pub const NO_BRANCH_MESSAGE: &str = "Please select a branch to clock in.";
pub const NO_BRANCH_OUT_MESSAGE: &str = "Please select a branch to clock out.";
pub const NO_USER_MESSAGE: &str = "You must be logged in to clock in.";

/// The `/clock-in` screen.
pub struct AttendancePage {
    client: ApiClient,
    api: AttendanceApi,
    branches: ResourceService<Branch>,
    branch_options: Vec<Branch>,
    selected_branch: Option<RecordId>,
    clock_ins: Vec<ClockRecord>,
    clock_outs: Vec<ClockRecord>,
    has_clocked_in: bool,
    banner: Option<Banner>,
}

impl AttendancePage {
    pub fn new(client: ApiClient) -> Self {
        Self {
            api: AttendanceApi::new(client.clone()),
            branches: ResourceService::new(client.clone()),
            client,
            branch_options: Vec::new(),
            selected_branch: None,
            clock_ins: Vec::new(),
            clock_outs: Vec::new(),
            has_clocked_in: false,
            banner: None,
        }
    }

    fn store(&self) -> &LocalStore {
        self.client.session().store()
    }

    /// Load branches and both histories.
    ///
    /// A history that cannot be fetched falls back to the stored copy.
    pub async fn mount(&mut self) -> PageResult<()> {
        self.has_clocked_in = self
            .store()
            .get(StorageKey::HasClockedIn)?
            .is_some_and(|flag| flag == "true");

        let mut failure = None;
        match self.branches.list(None).await {
            Ok(branches) => self.branch_options = branches,
            Err(e) => failure = Some(PageError::from(e)),
        }

        for kind in [ClockKind::In, ClockKind::Out] {
            let key = history_key(kind);
            let records = match self.api.history(kind).await {
                Ok(records) => {
                    let records = dedupe_by_id(records);
                    self.store().set_json(key, &records)?;
                    records
                }
                Err(e) => {
                    tracing::warn!("Using cached {} history: {}", kind.path(), e);
                    failure.get_or_insert(PageError::from(e));
                    dedupe_by_id(self.store().get_json(key)?.unwrap_or_default())
                }
            };
            *self.history_mut(kind) = records;
        }

        match failure {
            Some(error) => {
                self.banner = Some(Banner::error(error.user_message()));
                Err(error)
            }
            None => Ok(()),
        }
    }

    pub fn branch_options(&self) -> &[Branch] {
        &self.branch_options
    }

    pub fn select_branch(&mut self, branch_id: Option<RecordId>) {
        self.selected_branch = branch_id;
    }

    pub fn selected_branch(&self) -> Option<RecordId> {
        self.selected_branch
    }

    pub fn has_clocked_in(&self) -> bool {
        self.has_clocked_in
    }

    pub fn history(&self, kind: ClockKind) -> &[ClockRecord] {
        match kind {
            ClockKind::In => &self.clock_ins,
            ClockKind::Out => &self.clock_outs,
        }
    }

    fn history_mut(&mut self, kind: ClockKind) -> &mut Vec<ClockRecord> {
        match kind {
            ClockKind::In => &mut self.clock_ins,
            ClockKind::Out => &mut self.clock_outs,
        }
    }

    pub fn banner(&mut self) -> Option<&Banner> {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
        self.banner.as_ref()
    }

    pub async fn clock_in(&mut self) -> PageResult<ClockRecord> {
        self.clock(ClockKind::In).await
    }

    pub async fn clock_out(&mut self) -> PageResult<ClockRecord> {
        self.clock(ClockKind::Out).await
    }

    async fn clock(&mut self, kind: ClockKind) -> PageResult<ClockRecord> {
        let request = match self.clock_request(kind) {
            Ok(request) => request,
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
                return Err(e);
            }
        };

        let id = match self.api.clock(kind, &request).await {
            Ok(id) => id,
            Err(e) => {
                let error = PageError::from(e);
                self.banner = Some(Banner::error(error.user_message()));
                return Err(error);
            }
        };

        let record = ClockRecord::now(id, request.employee_id, request.branch_id);
        let mut history = self.history(kind).to_vec();
        history.push(record.clone());
        let history = dedupe_by_id(history);
        self.store().set_json(history_key(kind), &history)?;
        *self.history_mut(kind) = history;

        self.has_clocked_in = kind == ClockKind::In;
        self.store().set(
            StorageKey::HasClockedIn,
            if self.has_clocked_in { "true" } else { "false" },
        )?;

        let message = match kind {
            ClockKind::In => "Clocked in successfully.",
            ClockKind::Out => "Clocked out successfully.",
        };
        tracing::info!(employee = %record.employee_id, branch = record.branch_id, "{}", message);
        self.banner = Some(Banner::success(message));
        Ok(record)
    }

    fn clock_request(&self, kind: ClockKind) -> PageResult<ClockRequest> {
        let branch_id = self.selected_branch.ok_or_else(|| {
            PageError::Invalid(match kind {
                ClockKind::In => NO_BRANCH_MESSAGE.into(),
                ClockKind::Out => NO_BRANCH_OUT_MESSAGE.into(),
            })
        })?;
        let employee_id = self
            .client
            .session()
            .username()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| PageError::Invalid(NO_USER_MESSAGE.into()))?;
        Ok(ClockRequest {
            branch_id,
            employee_id,
        })
    }
}

fn history_key(kind: ClockKind) -> StorageKey {
    match kind {
        ClockKind::In => StorageKey::ClockIns,
        ClockKind::Out => StorageKey::ClockOuts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, ScriptedTransport};
    use crate::models::Role;
    use crate::session::Session;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<ScriptedTransport>, AttendancePage, LocalStore) {
        let transport = Arc::new(ScriptedTransport::new());
        let store = LocalStore::open_in_memory().unwrap();
        let session = Session::new(store.clone());
        session
            .begin("tok".into(), Role::Employee, "nurse1".into())
            .unwrap();
        let page = AttendancePage::new(ApiClient::new(transport.clone(), session));
        (transport, page, store)
    }

    fn record(id: i64) -> serde_json::Value {
        json!({"id": id, "employeeId": "nurse1", "branchId": 1, "timestamp": "2024-05-01T08:00:00Z"})
    }

    #[tokio::test]
    async fn test_clock_in_requires_branch() {
        let (transport, mut page, _) = setup();

        let err = page.clock_in().await.unwrap_err();
        assert_eq!(err.user_message(), NO_BRANCH_MESSAGE);
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_clock_in_appends_and_mirrors() {
        let (transport, mut page, store) = setup();
        transport.on(Method::Post, "/clock-in", 200, json!({"id": 7}));

        page.select_branch(Some(2));
        let record = page.clock_in().await.unwrap();
        assert_eq!(record.id, Some(7));
        assert_eq!(record.employee_id, "nurse1");

        let body = transport.calls()[0].body.clone().unwrap();
        assert_eq!(body, json!({"branchId": 2, "employeeId": "nurse1"}));

        assert!(page.has_clocked_in());
        assert_eq!(store.get(StorageKey::HasClockedIn).unwrap().as_deref(), Some("true"));
        let cached: Vec<ClockRecord> = store.get_json(StorageKey::ClockIns).unwrap().unwrap();
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn test_server_history_replaces_cache() {
        let (transport, mut page, store) = setup();
        store
            .set_json(StorageKey::ClockIns, &vec![ClockRecord::now(Some(99), "old".into(), 1)])
            .unwrap();
        transport
            .on(Method::Get, "/branches", 200, json!([{"branchID": 1, "branchName": "Main"}]))
            .on(Method::Get, "/clock-in", 200, json!([record(1), record(1), record(2)]))
            .on(Method::Get, "/clock-out", 200, json!([]));

        page.mount().await.unwrap();
        let ids: Vec<_> = page.history(ClockKind::In).iter().filter_map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_cache_used_when_fetch_fails() {
        let (transport, mut page, store) = setup();
        store
            .set_json(StorageKey::ClockIns, &vec![ClockRecord::now(Some(5), "nurse1".into(), 1)])
            .unwrap();
        store.set(StorageKey::HasClockedIn, "true").unwrap();
        transport
            .on(Method::Get, "/branches", 200, json!([]))
            .offline(Method::Get, "/clock-in")
            .on(Method::Get, "/clock-out", 200, json!([]));

        assert!(page.mount().await.is_err());
        assert_eq!(page.history(ClockKind::In)[0].id, Some(5));
        assert!(page.has_clocked_in());
    }

    #[tokio::test]
    async fn test_clock_out_clears_flag() {
        let (transport, mut page, store) = setup();
        transport.on_text(Method::Post, "/clock-out", 200, "Clocked out");

        page.select_branch(Some(1));
        let record = page.clock_out().await.unwrap();
        assert_eq!(record.id, None);
        assert!(!page.has_clocked_in());
        assert_eq!(store.get(StorageKey::HasClockedIn).unwrap().as_deref(), Some("false"));
    }
}
