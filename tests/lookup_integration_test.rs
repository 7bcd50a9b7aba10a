use car_price_lookup::{
    AveragePrice, ConsolePresenter, HttpJobBackend, LookupEngine, LookupError, Vehicle,
};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Writer whose contents stay readable after the presenter is moved into the engine.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn engine_for(
    server: &MockServer,
    output: SharedBuffer,
) -> LookupEngine<HttpJobBackend, ConsolePresenter<SharedBuffer>> {
    let backend = HttpJobBackend::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    LookupEngine::new(backend, ConsolePresenter::new(output, "AED"))
        .poll_interval(Duration::from_millis(20))
}

#[tokio::test]
async fn test_submit_poll_and_aggregate() {
    let server = MockServer::start();

    let submit_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/scrape")
            .json_body(json!({"cars": [
                {"make": "BMW", "model": "X5"},
                {"make": "Audi", "model": "R8"}
            ]}));
        then.status(202)
            .header("Content-Type", "application/json")
            .json_body(json!({"job_id": "job-42"}));
    });

    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/scrape-status/job-42");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "status": "done",
                "result": {
                    "https://siteA.example/": [
                        {"make": "BMW", "model": "X5", "url": "u1", "prices": ["100000", "bad"]}
                    ],
                    "https://siteB.example/": [
                        {"make": "BMW", "model": "X5", "url": "u2", "prices": ["90000 AED"]},
                        {"make": "Audi", "model": "R8", "url": "u3", "prices": ["N/A"]}
                    ]
                }
            }));
    });

    let output = SharedBuffer::default();
    let engine = engine_for(&server, output.clone());

    let view = engine
        .run(&[Vehicle::new("BMW", "X5"), Vehicle::new("Audi", "R8")])
        .await
        .unwrap();

    submit_mock.assert();
    status_mock.assert();

    assert_eq!(view.len(), 2);
    let bmw = view.get("BMW X5").unwrap();
    assert_eq!(bmw.domains.len(), 2);
    assert_eq!(bmw.all_prices, vec![100000.0, 90000.0]);
    assert_eq!(bmw.average_price(), AveragePrice::Value(95000));

    let audi = view.get("Audi R8").unwrap();
    assert_eq!(audi.average_price(), AveragePrice::NotAvailable);
    assert_eq!(audi.domains["https://siteB.example/"].len(), 1);

    let text = output.text();
    assert!(text.contains("BMW X5 (95000 AED Average, 2 prices found)"));
    assert!(text.contains("Audi R8 (N/A AED Average, 0 prices found)"));
}

#[tokio::test]
async fn test_submit_failure_never_polls() {
    let server = MockServer::start();

    let submit_mock = server.mock(|when, then| {
        when.method(POST).path("/scrape");
        then.status(500);
    });
    let status_mock = server.mock(|when, then| {
        when.method(GET).path_contains("/scrape-status/");
        then.status(200).json_body(json!({"status": "pending"}));
    });

    let output = SharedBuffer::default();
    let engine = engine_for(&server, output.clone());

    let err = engine.run(&[Vehicle::new("BMW", "X5")]).await.unwrap_err();

    assert!(matches!(err, LookupError::SubmissionError { .. }));
    submit_mock.assert();
    assert_eq!(status_mock.hits(), 0);
    assert!(output.text().contains("Failed to start price lookup. Try again."));
    assert!(output.text().contains("Lookup cancelled"));
}

#[tokio::test]
async fn test_empty_selection_makes_no_request() {
    let server = MockServer::start();
    let submit_mock = server.mock(|when, then| {
        when.method(POST).path("/scrape");
        then.status(202).json_body(json!({"job_id": "never"}));
    });

    let engine = engine_for(&server, SharedBuffer::default());
    let err = engine.run(&[]).await.unwrap_err();

    assert!(matches!(err, LookupError::ValidationError { .. }));
    assert_eq!(submit_mock.hits(), 0);
}

#[tokio::test]
async fn test_backend_error_status_is_terminal() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/scrape");
        then.status(202).json_body(json!({"job_id": "job-7"}));
    });
    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/scrape-status/job-7");
        then.status(200)
            .json_body(json!({"status": "error", "result": "All domains timed out"}));
    });

    let output = SharedBuffer::default();
    let engine = engine_for(&server, output.clone());

    let err = engine.run(&[Vehicle::new("BMW", "X5")]).await.unwrap_err();

    match err {
        LookupError::BackendJobError { message } => assert_eq!(message, "All domains timed out"),
        other => panic!("unexpected error: {other}"),
    }
    status_mock.assert_hits(1);
    assert_eq!(output.text().matches("Lookup cancelled").count(), 1);
}

#[tokio::test]
async fn test_malformed_status_body_fails_the_job() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/scrape");
        then.status(202).json_body(json!({"job_id": "job-8"}));
    });
    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/scrape-status/job-8");
        then.status(200)
            .header("Content-Type", "application/json")
            .body("<html>gateway error</html>");
    });

    let engine = engine_for(&server, SharedBuffer::default());
    let err = engine.run(&[Vehicle::new("BMW", "X5")]).await.unwrap_err();

    assert!(matches!(err, LookupError::PollTransportError { .. }));
    status_mock.assert_hits(1);
}

#[tokio::test]
async fn test_status_endpoint_http_error_fails_the_job() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/scrape");
        then.status(202).json_body(json!({"job_id": "job-9"}));
    });
    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/scrape-status/job-9");
        then.status(503);
    });

    let engine = engine_for(&server, SharedBuffer::default());
    let err = engine.run(&[Vehicle::new("BMW", "X5")]).await.unwrap_err();

    assert!(matches!(err, LookupError::PollTransportError { .. }));
    status_mock.assert_hits(1);
}

#[tokio::test]
async fn test_pending_job_keeps_polling_sequentially() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(POST).path("/scrape");
        then.status(202).json_body(json!({"job_id": "slow"}));
    });
    let status_mock = server.mock(|when, then| {
        when.method(GET).path("/scrape-status/slow");
        then.status(200).json_body(json!({"status": "STARTED"}));
    });

    let engine = engine_for(&server, SharedBuffer::default());

    let outcome = tokio::time::timeout(
        Duration::from_millis(500),
        engine.run(&[Vehicle::new("BMW", "X5")]),
    )
    .await;

    // a job that never finishes is polled until the caller gives up
    assert!(outcome.is_err());
    assert!(status_mock.hits() >= 2);
}
