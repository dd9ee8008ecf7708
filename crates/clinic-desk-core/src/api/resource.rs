//! Generic CRUD over one backend resource.

use std::marker::PhantomData;

use serde_json::Value;

use super::{ApiClient, ApiError, ApiRequest, ApiResult, Method};
use crate::models::{Record, RecordId};

/// One method and path. `{id}` in the path is replaced by the record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub path: &'static str,
}

impl Endpoint {
    pub const fn new(method: Method, path: &'static str) -> Self {
        Self { method, path }
    }

    /// Build a request, substituting `id` when the path has a placeholder.
    pub fn request(&self, id: Option<RecordId>) -> ApiRequest {
        let path = match id {
            Some(id) => self.path.replace("{id}", &id.to_string()),
            None => self.path.to_string(),
        };
        ApiRequest::new(self.method, path)
    }
}

/// The endpoints one resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceEndpoints {
    pub list: Endpoint,
    /// Server-side search taking `?query=`
    pub search: Option<Endpoint>,
    pub create: Endpoint,
    pub update: Endpoint,
    pub delete: Endpoint,
    /// Bulk delete taking `?ids=1,2`
    pub delete_many: Option<Endpoint>,
}

/// A record type served by the backend.
pub trait Resource: Record {
    const ENDPOINTS: ResourceEndpoints;
}

/// Typed CRUD calls for resource `R`.
pub struct ResourceService<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Fetch the collection, optionally filtered by free text.
    ///
    /// Filtering uses the server search endpoint when the resource has one,
    /// otherwise the records' own search fields.
    pub async fn list(&self, filter: Option<&str>) -> ApiResult<Vec<R>> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        let endpoints = R::ENDPOINTS;

        match (filter, endpoints.search) {
            (Some(query), Some(search)) => {
                self.client
                    .fetch_list(search.request(None).query("query", query))
                    .await
            }
            (Some(query), None) => {
                let records: Vec<R> = self.client.fetch_list(endpoints.list.request(None)).await?;
                Ok(records.into_iter().filter(|r| r.matches_query(query)).collect())
            }
            (None, _) => self.client.fetch_list(endpoints.list.request(None)).await,
        }
    }

    /// Create a record and return it as saved.
    ///
    /// The backend may answer with the record, a bare id, or only a message.
    /// In the latter two cases the submitted record is returned, carrying the
    /// id when one was given.
    pub async fn create(&self, record: &R) -> ApiResult<R> {
        let body = serde_json::to_value(record)?;
        let response = self
            .client
            .execute(R::ENDPOINTS.create.request(None).json(body))
            .await?;
        Ok(saved_record(record, None, response.value()))
    }

    /// Replace a record by id and return it as saved.
    pub async fn update(&self, id: RecordId, record: &R) -> ApiResult<R> {
        let mut record = record.clone();
        record.set_id(id);
        let body = serde_json::to_value(&record)?;
        let response = self
            .client
            .execute(R::ENDPOINTS.update.request(Some(id)).json(body))
            .await?;
        Ok(saved_record(&record, Some(id), response.value()))
    }

    pub async fn delete(&self, id: RecordId) -> ApiResult<()> {
        self.client
            .send(R::ENDPOINTS.delete.request(Some(id)))
            .await
    }

    /// Delete several records: one bulk call when supported, else one call
    /// per id. The per-id path stops on the first failure.
    pub async fn delete_many(&self, ids: &[RecordId]) -> BulkDelete {
        if ids.is_empty() {
            return BulkDelete::default();
        }

        match R::ENDPOINTS.delete_many {
            Some(bulk) => {
                let joined = ids
                    .iter()
                    .map(RecordId::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                match self.client.send(bulk.request(None).query("ids", joined)).await {
                    Ok(()) => BulkDelete {
                        deleted: ids.to_vec(),
                        error: None,
                    },
                    Err(e) => BulkDelete {
                        deleted: Vec::new(),
                        error: Some(e),
                    },
                }
            }
            None => {
                let mut outcome = BulkDelete::default();
                for id in ids {
                    match self.delete(*id).await {
                        Ok(()) => outcome.deleted.push(*id),
                        Err(e) => {
                            outcome.error = Some(e);
                            break;
                        }
                    }
                }
                outcome
            }
        }
    }
}

/// Result of [`ResourceService::delete_many`].
#[derive(Debug, Default)]
pub struct BulkDelete {
    /// Ids the backend accepted
    pub deleted: Vec<RecordId>,
    /// First failure; ids after it were not attempted
    pub error: Option<ApiError>,
}

fn saved_record<R: Record>(submitted: &R, id: Option<RecordId>, body: Option<Value>) -> R {
    match body {
        Some(value @ Value::Object(_)) => match serde_json::from_value::<R>(value) {
            Ok(saved) => return saved,
            Err(e) => tracing::debug!("{} response is not a record: {}", R::NOUN, e),
        },
        Some(Value::Number(n)) => {
            if let Some(new_id) = n.as_i64() {
                let mut saved = submitted.clone();
                saved.set_id(new_id);
                return saved;
            }
        }
        _ => {}
    }

    let mut saved = submitted.clone();
    if let Some(id) = id {
        saved.set_id(id);
    }
    saved
}
