use crate::core::price::parse_price;
use crate::domain::model::{AggregatedView, AveragePrice, PriceListing};
use crate::domain::ports::Storage;
use crate::utils::error::{LookupError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

pub const CSV_REPORT: &str = "price_report.csv";
pub const JSON_REPORT: &str = "price_report.json";

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    currency: &'a str,
    vehicles: Vec<VehicleSummary<'a>>,
}

#[derive(Debug, Serialize)]
struct VehicleSummary<'a> {
    signature: &'a str,
    make: &'a str,
    model: &'a str,
    average: AveragePrice,
    sample_count: usize,
    domains: &'a IndexMap<String, Vec<PriceListing>>,
}

/// Writes the aggregated view as CSV (one row per listing) and JSON
/// (one object per vehicle).
pub struct ReportExporter<S: Storage> {
    storage: S,
    currency: String,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S, currency: impl Into<String>) -> Self {
        Self {
            storage,
            currency: currency.into(),
        }
    }

    pub async fn export(&self, view: &AggregatedView) -> Result<Vec<String>> {
        let csv_data = self.render_csv(view)?;
        self.storage.write_file(CSV_REPORT, &csv_data).await?;

        let json_data = self.render_json(view, Utc::now())?;
        self.storage.write_file(JSON_REPORT, &json_data).await?;

        tracing::debug!(
            "Report written ({} bytes csv, {} bytes json)",
            csv_data.len(),
            json_data.len()
        );
        Ok(vec![CSV_REPORT.to_string(), JSON_REPORT.to_string()])
    }

    fn render_csv(&self, view: &AggregatedView) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "signature",
            "make",
            "model",
            "source",
            "price",
            "parsed_price",
            "url",
        ])?;

        for (signature, vehicle) in view.iter() {
            for (source, listings) in &vehicle.domains {
                for listing in listings {
                    let parsed = parse_price(&listing.price)
                        .map(|p| p.to_string())
                        .unwrap_or_default();
                    writer.write_record([
                        signature.as_str(),
                        vehicle.make.as_str(),
                        vehicle.model.as_str(),
                        source.as_str(),
                        listing.price.as_str(),
                        parsed.as_str(),
                        listing.url.as_str(),
                    ])?;
                }
            }
        }

        writer
            .into_inner()
            .map_err(|e| LookupError::IoError(e.into_error()))
    }

    fn render_json(&self, view: &AggregatedView, generated_at: DateTime<Utc>) -> Result<Vec<u8>> {
        let report = JsonReport {
            generated_at,
            currency: &self.currency,
            vehicles: view
                .iter()
                .map(|(signature, vehicle)| VehicleSummary {
                    signature,
                    make: &vehicle.make,
                    model: &vehicle.model,
                    average: vehicle.average_price(),
                    sample_count: vehicle.sample_count(),
                    domains: &vehicle.domains,
                })
                .collect(),
        };
        Ok(serde_json::to_vec_pretty(&report)?)
    }
}
