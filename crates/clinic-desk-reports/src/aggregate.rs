//! Aggregation of rendered services and stock into chart series.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::chart::ChartDatum;
use crate::input::{RenderedServiceRecord, StockRecord};

/// Series backing the reports dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dashboard {
    /// Number of times each service was rendered
    pub services: Vec<ChartDatum>,
    /// Total quantity sold per medicine
    pub medicines: Vec<ChartDatum>,
    /// Current quantity per inventory item
    pub stock: Vec<ChartDatum>,
    /// Sum of all rendered service totals
    pub total_revenue: f64,
}

impl Dashboard {
    pub fn from_records(rendered: &[RenderedServiceRecord], stock: &[StockRecord]) -> Self {
        Self {
            services: service_usage(rendered),
            medicines: medicine_usage(rendered),
            stock: stock_levels(stock),
            total_revenue: rendered.iter().map(|r| r.total_cost).sum(),
        }
    }
}

/// Count renders per service name, in first-seen order.
pub fn service_usage(rendered: &[RenderedServiceRecord]) -> Vec<ChartDatum> {
    let mut tally = Tally::default();
    for record in rendered {
        for service in &record.services {
            tally.add(&service.service_name, 1.0);
        }
    }
    tally.into_data()
}

/// Sum sold quantities per item name, in first-seen order.
pub fn medicine_usage(rendered: &[RenderedServiceRecord]) -> Vec<ChartDatum> {
    let mut tally = Tally::default();
    for record in rendered {
        for item in &record.items {
            tally.add(&item.item_name, item.item_quantity as f64);
        }
    }
    tally.into_data()
}

/// One datum per stock record, unmerged.
pub fn stock_levels(stock: &[StockRecord]) -> Vec<ChartDatum> {
    stock
        .iter()
        .map(|s| ChartDatum::new(s.item_name.clone(), s.item_quantity as f64))
        .collect()
}

#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    data: Vec<ChartDatum>,
}

impl Tally {
    fn add(&mut self, name: &str, amount: f64) {
        match self.index.get(name) {
            Some(&i) => self.data[i].value += amount,
            None => {
                self.index.insert(name.to_string(), self.data.len());
                self.data.push(ChartDatum::new(name.to_string(), amount));
            }
        }
    }

    fn into_data(self) -> Vec<ChartDatum> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ServiceLine, SoldItemLine};

    fn service(name: &str) -> ServiceLine {
        ServiceLine {
            service_id: None,
            service_name: name.into(),
            service_price: 50.0,
        }
    }

    fn sold(name: &str, quantity: i64) -> SoldItemLine {
        SoldItemLine {
            item_id: None,
            item_name: name.into(),
            item_quantity: quantity,
            item_price: 10.0,
        }
    }

    fn record(services: Vec<ServiceLine>, items: Vec<SoldItemLine>, total: f64) -> RenderedServiceRecord {
        RenderedServiceRecord {
            id: None,
            patient_id: Some(1),
            services,
            items,
            total_cost: total,
            notes: None,
        }
    }

    #[test]
    fn test_service_usage_counts_in_order() {
        let rendered = vec![
            record(vec![service("X-Ray"), service("ECG")], vec![], 180.0),
            record(vec![service("ECG")], vec![], 80.0),
        ];

        let usage = service_usage(&rendered);
        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0], ChartDatum::new("X-Ray".into(), 1.0));
        assert_eq!(usage[1], ChartDatum::new("ECG".into(), 2.0));
    }

    #[test]
    fn test_medicine_usage_sums_quantities() {
        let rendered = vec![
            record(vec![], vec![sold("Paracetamol", 2), sold("Vitamin C", 1)], 35.0),
            record(vec![], vec![sold("Paracetamol", 3)], 30.0),
        ];

        let usage = medicine_usage(&rendered);
        assert_eq!(usage[0].name, "Paracetamol");
        assert_eq!(usage[0].value, 5.0);
        assert_eq!(usage[1].value, 1.0);
    }

    #[test]
    fn test_dashboard_totals() {
        let rendered = vec![
            record(vec![service("ECG")], vec![], 80.0),
            record(vec![service("X-Ray")], vec![], 100.0),
        ];
        let stock = vec![StockRecord {
            item_name: "Antibiotic".into(),
            item_quantity: 15,
        }];

        let dashboard = Dashboard::from_records(&rendered, &stock);
        assert_eq!(dashboard.total_revenue, 180.0);
        assert_eq!(dashboard.stock, vec![ChartDatum::new("Antibiotic".into(), 15.0)]);
        assert!(dashboard.medicines.is_empty());
    }
}
