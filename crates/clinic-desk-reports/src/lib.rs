//! Report aggregation for the clinic desk dashboards.
//!
//! Turns the rendered-services and inventory listings into chart series:
//! service usage, medicine usage and stock levels.

pub mod aggregate;
pub mod chart;
pub mod input;

pub use aggregate::*;
pub use chart::*;
pub use input::*;

use anyhow::Context;

/// Build the dashboard straight from the two raw listings.
pub fn build_dashboard(rendered_json: &str, items_json: &str) -> anyhow::Result<Dashboard> {
    let rendered =
        parse_rendered_services(rendered_json).context("parsing rendered services listing")?;
    let stock = parse_stock(items_json).context("parsing inventory listing")?;
    Ok(Dashboard::from_records(&rendered, &stock))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_dashboard() {
        let rendered = r#"[{"services": [{"serviceName": "ECG"}], "items": [], "totalCost": 80}]"#;
        let items = r#"[{"itemName": "Paracetamol", "itemQuantity": 50}]"#;

        let dashboard = build_dashboard(rendered, items).unwrap();
        assert_eq!(dashboard.services[0].name, "ECG");
        assert_eq!(dashboard.stock[0].value, 50.0);
    }

    #[test]
    fn test_build_dashboard_reports_context() {
        let err = build_dashboard("{}", "[]").unwrap_err();
        assert!(err.to_string().contains("rendered services"));
    }
}
