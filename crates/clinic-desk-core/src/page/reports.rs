//! Reports dashboard.

use clinic_desk_reports::{
    parse_rendered_services, parse_stock, pie_segments, ChartDatum, Dashboard, PieSegment,
    ReportError,
};

use super::{Banner, PageResult};
use crate::api::ResourceService;
use crate::models::{InventoryItem, Service};

/// The `/reports` screen.
pub struct ReportsPage {
    services: ResourceService<Service>,
    items: ResourceService<InventoryItem>,
    dashboard: Option<Dashboard>,
    banner: Option<Banner>,
}

impl ReportsPage {
    pub fn new(services: ResourceService<Service>) -> Self {
        let items = ResourceService::new(services.client().clone());
        Self {
            services,
            items,
            dashboard: None,
            banner: None,
        }
    }

    /// Fetch rendered services and stock, then aggregate.
    ///
    /// On failure the previous dashboard stays.
    pub async fn mount(&mut self) -> PageResult<&Dashboard> {
        match self.load().await {
            Ok(dashboard) => Ok(self.dashboard.insert(dashboard)),
            Err(error) => {
                tracing::warn!("Failed to build reports: {}", error);
                self.banner = Some(Banner::error(error.user_message()));
                Err(error)
            }
        }
    }

    async fn load(&self) -> PageResult<Dashboard> {
        let rendered_json = self.services.rendered_services_json().await?;
        let items = self.items.list(None).await?;

        let rendered = parse_rendered_services(&rendered_json)?;
        let stock = parse_stock(&serde_json::to_string(&items).map_err(ReportError::from)?)?;
        Ok(Dashboard::from_records(&rendered, &stock))
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn banner(&mut self) -> Option<&Banner> {
        if self.banner.as_ref().is_some_and(Banner::is_expired) {
            self.banner = None;
        }
        self.banner.as_ref()
    }

    pub fn service_segments(&self) -> Vec<PieSegment> {
        self.segments(|d| d.services.as_slice())
    }

    pub fn medicine_segments(&self) -> Vec<PieSegment> {
        self.segments(|d| d.medicines.as_slice())
    }

    pub fn stock_segments(&self) -> Vec<PieSegment> {
        self.segments(|d| d.stock.as_slice())
    }

    fn segments(&self, series: impl Fn(&Dashboard) -> &[ChartDatum]) -> Vec<PieSegment> {
        self.dashboard
            .as_ref()
            .map(|d| pie_segments(series(d)))
            .unwrap_or_default()
    }
}
