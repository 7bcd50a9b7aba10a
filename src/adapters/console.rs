use crate::domain::model::AggregatedView;
use crate::domain::ports::Presenter;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Mutex;

/// Renders the lookup lifecycle on a terminal (or any writer).
pub struct ConsolePresenter<W: Write + Send> {
    out: Mutex<W>,
    currency: String,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout(currency: impl Into<String>) -> Self {
        Self::new(std::io::stdout(), currency)
    }
}

impl<W: Write + Send> ConsolePresenter<W> {
    pub fn new(out: W, currency: impl Into<String>) -> Self {
        Self {
            out: Mutex::new(out),
            currency: currency.into(),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

/// One block per vehicle: a summary line, then every listing grouped by source.
pub fn render_view(view: &AggregatedView, currency: &str) -> String {
    let mut text = String::from("Pricing Results\n");

    if view.is_empty() {
        text.push_str("No prices found.\n");
        return text;
    }

    for (_, vehicle) in view.iter() {
        let _ = writeln!(
            text,
            "\n{} {} ({} {} Average, {} prices found)",
            vehicle.make,
            vehicle.model,
            vehicle.average_price(),
            currency,
            vehicle.sample_count()
        );
        for (source, listings) in &vehicle.domains {
            let _ = writeln!(text, "  {}", source);
            for listing in listings {
                let _ = writeln!(text, "    - {} {} - {}", listing.price, currency, listing.url);
            }
        }
    }

    text
}

impl<W: Write + Send> Presenter for ConsolePresenter<W> {
    fn show_waiting(&self) {
        self.emit("⏳ Fetching prices, please wait...\n");
    }

    fn show_results(&self, view: &AggregatedView) {
        self.emit(&render_view(view, &self.currency));
    }

    fn reset(&self) {
        self.emit("Lookup cancelled, vehicle list unchanged.\n");
    }

    fn notify(&self, message: &str) {
        self.emit(&format!("❌ {}\n", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::ResultAggregator;
    use crate::domain::model::RawResultPayload;

    fn view() -> AggregatedView {
        let payload: RawResultPayload = serde_json::from_value(serde_json::json!({
            "siteA": [{"make": "BMW", "model": "X5", "url": "u1", "prices": ["100000", "bad"]}],
            "siteB": [{"make": "Kia", "model": "Rio", "url": "u2", "prices": []}]
        }))
        .unwrap();
        ResultAggregator::default().aggregate(&payload)
    }

    #[test]
    fn test_render_summary_lines() {
        let text = render_view(&view(), "AED");

        assert!(text.contains("BMW X5 (100000 AED Average, 1 prices found)"));
        assert!(text.contains("    - 100000 AED - u1"));
        assert!(text.contains("    - bad AED - u1"));
        assert!(text.contains("Kia Rio (N/A AED Average, 0 prices found)"));
        assert!(text.contains("  siteB\n"));
    }

    #[test]
    fn test_render_empty_view() {
        let text = render_view(&AggregatedView::new(), "AED");
        assert!(text.contains("No prices found."));
    }

    #[test]
    fn test_presenter_writes_callbacks() {
        let presenter = ConsolePresenter::new(Vec::new(), "AED");
        presenter.show_waiting();
        presenter.notify("Price lookup failed.");
        presenter.reset();

        let output = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("Price lookup failed."));
    }
}
