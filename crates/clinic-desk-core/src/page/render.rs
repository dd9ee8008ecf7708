//! Render-services cart: bill services and medicines to one patient.

use std::cmp::Ordering;

use super::{Banner, PageError, PageResult};
use crate::api::ResourceService;
use crate::models::{
    InventoryItem, ItemLine, Patient, PatientRef, RecordId, RenderServiceRequest, Service,
    ServiceRef,
};

pub const NO_SERVICE_MESSAGE: &str = "At least one service must be selected.";
pub const NO_PATIENT_MESSAGE: &str = "Please select a patient.";

/// A medicine line in the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub item: InventoryItem,
    /// Always at least 1
    pub quantity: i64,
}

impl CartItem {
    pub fn subtotal(&self) -> f64 {
        self.item.item_price * self.quantity as f64
    }
}

/// Lines selected for billing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub services: Vec<Service>,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.items.is_empty()
    }

    pub fn total_cost(&self) -> f64 {
        let services: f64 = self.services.iter().map(|s| s.service_price).sum();
        let items: f64 = self.items.iter().map(CartItem::subtotal).sum();
        services + items
    }
}

/// Catalog entries containing `query`, most similar first.
///
/// Blank queries suggest nothing.
pub fn suggest<'a, T>(catalog: &'a [T], query: &str, name: impl Fn(&T) -> &str) -> Vec<&'a T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f64, String, &T)> = catalog
        .iter()
        .filter_map(|entry| {
            let lowered = name(entry).to_lowercase();
            lowered.contains(&needle).then(|| {
                (strsim::jaro_winkler(&needle, &lowered), lowered, entry)
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });
    scored.into_iter().map(|(_, _, entry)| entry).collect()
}

/// The render-services screen for one patient.
pub struct RenderServicesPage {
    services: ResourceService<Service>,
    items: ResourceService<InventoryItem>,
    patient: Option<Patient>,
    service_catalog: Vec<Service>,
    item_catalog: Vec<InventoryItem>,
    cart: Cart,
    notes: String,
    banner: Option<Banner>,
}

impl RenderServicesPage {
    pub fn new(services: ResourceService<Service>) -> Self {
        let items = ResourceService::new(services.client().clone());
        Self {
            services,
            items,
            patient: None,
            service_catalog: Vec::new(),
            item_catalog: Vec::new(),
            cart: Cart::default(),
            notes: String::new(),
            banner: None,
        }
    }

    /// Load the service and medicine catalogs.
    pub async fn mount(&mut self) -> PageResult<()> {
        let loaded = async {
            let services = self.services.list(None).await?;
            let items = self.items.list(None).await?;
            Ok::<_, crate::api::ApiError>((services, items))
        }
        .await;

        match loaded {
            Ok((services, items)) => {
                self.service_catalog = services;
                self.item_catalog = items;
                Ok(())
            }
            Err(e) => {
                let error = PageError::from(e);
                self.banner = Some(Banner::error(error.user_message()));
                Err(error)
            }
        }
    }

    pub fn set_patient(&mut self, patient: Patient) {
        self.patient = Some(patient);
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.patient.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn item_catalog(&self) -> &[InventoryItem] {
        &self.item_catalog
    }

    pub fn banner(&mut self) -> Option<&Banner> {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
        self.banner.as_ref()
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn service_suggestions(&self, query: &str) -> Vec<&Service> {
        suggest(&self.service_catalog, query, |s| s.service_name.as_str())
    }

    pub fn item_suggestions(&self, query: &str) -> Vec<&InventoryItem> {
        suggest(&self.item_catalog, query, |i| i.item_name.as_str())
    }

    /// Add a catalog service. Returns false when it is already in the cart.
    pub fn add_service(&mut self, id: RecordId) -> PageResult<bool> {
        if self.cart.services.iter().any(|s| s.service_id == Some(id)) {
            return Ok(false);
        }
        let service = self
            .service_catalog
            .iter()
            .find(|s| s.service_id == Some(id))
            .cloned()
            .ok_or_else(|| PageError::Invalid("Service not found.".into()))?;
        self.cart.services.push(service);
        Ok(true)
    }

    /// Add a catalog medicine with quantity 1. Returns false when it is
    /// already in the cart.
    pub fn add_item(&mut self, id: RecordId) -> PageResult<bool> {
        if self.cart.items.iter().any(|line| line.item.item_id == Some(id)) {
            return Ok(false);
        }
        let item = self
            .item_catalog
            .iter()
            .find(|i| i.item_id == Some(id))
            .cloned()
            .ok_or_else(|| PageError::Invalid("Item not found.".into()))?;
        self.cart.items.push(CartItem { item, quantity: 1 });
        Ok(true)
    }

    /// Set a medicine's quantity, never below 1.
    pub fn set_quantity(&mut self, id: RecordId, quantity: i64) {
        if let Some(line) = self.cart.items.iter_mut().find(|l| l.item.item_id == Some(id)) {
            line.quantity = quantity.max(1);
        }
    }

    pub fn remove_service(&mut self, id: RecordId) {
        self.cart.services.retain(|s| s.service_id != Some(id));
    }

    pub fn remove_item(&mut self, id: RecordId) {
        self.cart.items.retain(|line| line.item.item_id != Some(id));
    }

    pub fn total_cost(&self) -> f64 {
        self.cart.total_cost()
    }

    fn stock_of(&self, id: Option<RecordId>) -> i64 {
        self.item_catalog
            .iter()
            .find(|i| i.item_id == id)
            .map_or(0, |i| i.item_quantity)
    }

    /// Check the cart and build the backend request.
    pub fn build_request(&self) -> PageResult<RenderServiceRequest> {
        let patient = self
            .patient
            .as_ref()
            .ok_or_else(|| PageError::Invalid(NO_PATIENT_MESSAGE.into()))?;
        let client_id = patient
            .client_id
            .ok_or_else(|| PageError::Invalid(NO_PATIENT_MESSAGE.into()))?;
        if self.cart.services.is_empty() {
            return Err(PageError::Invalid(NO_SERVICE_MESSAGE.into()));
        }

        let mut items = Vec::with_capacity(self.cart.items.len());
        for line in &self.cart.items {
            let stock = self.stock_of(line.item.item_id);
            let item_id = match line.item.item_id {
                Some(id) if line.quantity <= stock => id,
                _ => {
                    return Err(PageError::Invalid(format!(
                        "Only {} {} left in stock.",
                        stock.max(0),
                        line.item.item_name
                    )))
                }
            };
            items.push(ItemLine {
                item_id,
                item_quantity: line.quantity,
            });
        }

        let notes = self.notes.trim();
        Ok(RenderServiceRequest {
            patient: PatientRef {
                client_id,
                patient_code: Some(patient.patient_code.clone()).filter(|c| !c.is_empty()),
            },
            services: self
                .cart
                .services
                .iter()
                .filter_map(|s| s.service_id)
                .map(|service_id| ServiceRef { service_id })
                .collect(),
            items,
            total_cost: self.cart.total_cost(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }

    /// Bill the cart. Validation failures make no network call.
    ///
    /// On success the local stock is decremented, the cart is emptied and
    /// the sent request is returned.
    pub async fn submit(&mut self) -> PageResult<RenderServiceRequest> {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                self.banner = Some(Banner::error(e.user_message()));
                return Err(e);
            }
        };

        if let Err(e) = self.services.render(&request).await {
            let error = PageError::from(e);
            self.banner = Some(Banner::error(error.user_message()));
            return Err(error);
        }

        for line in &request.items {
            if let Some(item) = self
                .item_catalog
                .iter_mut()
                .find(|i| i.item_id == Some(line.item_id))
            {
                item.item_quantity -= line.item_quantity;
            }
        }
        tracing::info!(
            services = request.services.len(),
            items = request.items.len(),
            "Rendered services"
        );
        self.cart = Cart::default();
        self.notes.clear();
        self.banner = Some(Banner::success("Services rendered successfully."));
        Ok(request)
    }
}
