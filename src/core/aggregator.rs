use crate::core::price::parse_price;
use crate::domain::model::{AggregatedView, PriceListing, RawResultPayload};

/// How entry signatures are compared when grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// `make + " " + model`, byte for byte.
    #[default]
    Exact,
    /// Same signature, lowercased before comparison.
    CaseInsensitive,
}

impl GroupingMode {
    pub fn signature(&self, make: &str, model: &str) -> String {
        let signature = format!("{} {}", make, model);
        match self {
            Self::Exact => signature,
            Self::CaseInsensitive => signature.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    mode: GroupingMode,
}

impl ResultAggregator {
    pub fn new(mode: GroupingMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// Groups every entry of every source by signature. Tokens that do not
    /// parse stay in the listings but are left out of the price samples.
    pub fn aggregate(&self, payload: &RawResultPayload) -> AggregatedView {
        let mut view = AggregatedView::new();

        for (source, entries) in payload {
            for entry in entries {
                let signature = self.mode.signature(&entry.make, &entry.model);
                let vehicle = view.entry(signature, &entry.make, &entry.model);
                let listings = vehicle.domains.entry(source.clone()).or_default();

                for token in &entry.prices {
                    listings.push(PriceListing {
                        price: token.clone(),
                        url: entry.url.clone(),
                    });
                    if let Some(price) = parse_price(token) {
                        vehicle.all_prices.push(price);
                    }
                }
            }
        }

        tracing::debug!(
            "Aggregated {} sources into {} vehicles",
            payload.len(),
            view.len()
        );
        view
    }
}
