use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A lookup target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub make: String,
    pub model: String,
}

impl Vehicle {
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
        }
    }
}

/// A row of the persisted vehicle list. `selected` never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedVehicle {
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub selected: bool,
}

impl ListedVehicle {
    pub fn vehicle(&self) -> Vehicle {
        Vehicle::new(self.make.clone(), self.model.clone())
    }
}

/// Body of the submit call: `{"cars": [{"make", "model"}, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    cars: Vec<Vehicle>,
}

impl BatchRequest {
    pub fn new(cars: Vec<Vehicle>) -> Self {
        Self { cars }
    }

    pub fn cars(&self) -> &[Vehicle] {
        &self.cars
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

/// Opaque job identifier handed out by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One scraped match as reported by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub make: String,
    pub model: String,
    pub url: String,
    #[serde(deserialize_with = "deserialize_price_tokens")]
    pub prices: Vec<String>,
}

/// Source identifier -> entries, in the order the backend reported them.
pub type RawResultPayload = IndexMap<String, Vec<RawEntry>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceToken {
    Text(String),
    Number(serde_json::Number),
}

// Numbers are kept in their textual form so they display exactly as sent.
fn deserialize_price_tokens<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tokens = Vec::<PriceToken>::deserialize(deserializer)?;
    Ok(tokens
        .into_iter()
        .map(|token| match token {
            PriceToken::Text(text) => text,
            PriceToken::Number(number) => number.to_string(),
        })
        .collect())
}

/// Status reported for a job, already lifted out of the wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    Pending,
    Done(RawResultPayload),
    Error(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Error(_))
    }
}

/// A price token as it appeared on a source, with the page it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceListing {
    pub price: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedVehicle {
    pub make: String,
    pub model: String,
    pub domains: IndexMap<String, Vec<PriceListing>>,
    pub all_prices: Vec<f64>,
}

impl AggregatedVehicle {
    pub fn new(make: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            domains: IndexMap::new(),
            all_prices: Vec::new(),
        }
    }

    pub fn average_price(&self) -> AveragePrice {
        AveragePrice::from_samples(&self.all_prices)
    }

    pub fn sample_count(&self) -> usize {
        self.all_prices.len()
    }
}

/// Rounded mean of the parsed prices, or `N/A` without samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AveragePrice {
    Value(i64),
    NotAvailable,
}

impl AveragePrice {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::NotAvailable;
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        // half-way values round towards positive infinity
        Self::Value((mean + 0.5).floor() as i64)
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for AveragePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", v),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for AveragePrice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_i64(*v),
            Self::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Signature -> aggregated vehicle, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedView {
    vehicles: IndexMap<String, AggregatedVehicle>,
}

impl AggregatedView {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn entry(
        &mut self,
        signature: String,
        make: &str,
        model: &str,
    ) -> &mut AggregatedVehicle {
        self.vehicles
            .entry(signature)
            .or_insert_with(|| AggregatedVehicle::new(make, model))
    }

    pub fn get(&self, signature: &str) -> Option<&AggregatedVehicle> {
        self.vehicles.get(signature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AggregatedVehicle)> {
        self.vehicles.iter()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}
