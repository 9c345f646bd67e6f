//! End-to-end exercises of the HTTP surface over an in-memory stream.

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use distributions::Registry;
use server::Settings;

struct Reply {
    status: u16,
    headers: Vec<String>,
    body: Value,
}

impl Reply {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|h| {
            let (n, v) = h.split_once(':')?;
            n.eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

/// Feeds raw HTTP bytes through the connection handler and parses what
/// comes back.
async fn exchange(raw: String) -> Reply {
    let registry = Registry::new().unwrap();
    let settings = Settings::default();
    let (client, server_end) = tokio::io::duplex(1 << 20);

    let (_, bytes) = tokio::join!(
        async {
            server::handle_connection(server_end, &registry, &settings)
                .await
                .unwrap();
        },
        async {
            let (mut rx, mut tx) = tokio::io::split(client);
            tx.write_all(raw.as_bytes()).await.unwrap();
            let mut buf = Vec::new();
            rx.read_to_end(&mut buf).await.unwrap();
            buf
        }
    );

    let text = String::from_utf8(bytes).unwrap();
    let (head, body) = text.split_once("\r\n\r\n").unwrap();
    let mut lines = head.lines();
    let status: u16 = lines
        .next()
        .unwrap()
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    let headers = lines.map(str::to_string).collect();
    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap()
    };

    Reply {
        status,
        headers,
        body,
    }
}

fn get(path: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nhost: test\r\n\r\n")
}

fn get_with_origin(path: &str, origin: &str) -> String {
    format!("GET {path} HTTP/1.1\r\nhost: test\r\norigin: {origin}\r\n\r\n")
}

fn post(path: &str, body: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\nhost: test\r\ncontent-length: {}\r\n\r\n{body}",
        body.len()
    )
}

#[tokio::test]
async fn health_probe_reports_healthy() {
    let reply = exchange(get("/api/v1/health")).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["status"], "healthy");
}

#[tokio::test]
async fn root_points_at_the_health_probe() {
    let reply = exchange(get("/")).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["health"], "/api/v1/health");
}

#[tokio::test]
async fn lists_all_models_in_order() {
    let reply = exchange(get("/api/v1/distributions")).await;
    assert_eq!(reply.status, 200);
    let types: Vec<&str> = reply
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, ["uniform", "exponential", "linear_regression"]);
}

#[tokio::test]
async fn describes_a_single_model() {
    let reply = exchange(get("/api/v1/distributions/exponential")).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["type"], "exponential");
    assert_eq!(reply.body["parameters"][0]["name"], "lambda_");
}

#[tokio::test]
async fn unknown_model_is_a_404() {
    let reply = exchange(get("/api/v1/distributions/gaussian")).await;
    assert_eq!(reply.status, 404);
    assert!(reply.body["detail"].as_str().unwrap().contains("gaussian"));
}

#[tokio::test]
async fn unknown_path_is_a_404() {
    let reply = exchange(get("/api/v2/nonsense")).await;
    assert_eq!(reply.status, 404);
}

#[tokio::test]
async fn calculates_a_uniform_curve() {
    let body = r#"{"distribution_type":"uniform","parameters":{"a":0.0,"b":1.0},"num_points":100}"#;
    let reply = exchange(post("/api/v1/calculate", body)).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["x_values"].as_array().unwrap().len(), 100);
    assert!((reply.body["mean"].as_f64().unwrap() - 0.5).abs() < 1e-10);
    assert!(reply.body.get("y_fitted").is_none());
}

#[tokio::test]
async fn calculates_a_regression_curve() {
    let body = r#"{"distribution_type":"linear_regression","parameters":{"slope":2.0,"noise_std":0.5,"pattern_id":0.0},"num_points":50}"#;
    let reply = exchange(post("/api/v1/calculate", body)).await;
    assert_eq!(reply.status, 200);
    assert_eq!(reply.body["y_fitted"].as_array().unwrap().len(), 50);
    assert!(reply.body["r_squared"].as_f64().is_some());
    assert!(reply.body.get("pdf_values").is_none());
}

#[tokio::test]
async fn missing_parameter_is_a_400_naming_the_key() {
    let body = r#"{"distribution_type":"uniform","parameters":{"a":0.0}}"#;
    let reply = exchange(post("/api/v1/calculate", body)).await;
    assert_eq!(reply.status, 400);
    assert!(reply.body["detail"].as_str().unwrap().contains("b"));
}

#[tokio::test]
async fn out_of_range_parameter_is_a_400() {
    let body = r#"{"distribution_type":"uniform","parameters":{"a":-42.0,"b":1.0}}"#;
    let reply = exchange(post("/api/v1/calculate", body)).await;
    assert_eq!(reply.status, 400);
    assert!(reply.body["detail"].as_str().unwrap().contains("-42"));
}

#[tokio::test]
async fn inverted_uniform_bounds_are_a_400() {
    let body = r#"{"distribution_type":"uniform","parameters":{"a":5.0,"b":-5.0}}"#;
    let reply = exchange(post("/api/v1/calculate", body)).await;
    assert_eq!(reply.status, 400);
}

#[tokio::test]
async fn excessive_num_points_is_a_400() {
    let body =
        r#"{"distribution_type":"uniform","parameters":{"a":0.0,"b":1.0},"num_points":20000}"#;
    let reply = exchange(post("/api/v1/calculate", body)).await;
    assert_eq!(reply.status, 400);
}

#[tokio::test]
async fn malformed_json_is_a_400() {
    let reply = exchange(post("/api/v1/calculate", "{not json")).await;
    assert_eq!(reply.status, 400);
}

#[tokio::test]
async fn allowed_origin_gets_cors_headers() {
    let reply = exchange(get_with_origin("/api/v1/health", "http://localhost:3000")).await;
    assert_eq!(
        reply.header("access-control-allow-origin"),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn unlisted_origin_gets_no_cors_headers() {
    let reply = exchange(get_with_origin("/api/v1/health", "http://evil.example")).await;
    assert!(reply.header("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn preflight_is_answered_with_no_content() {
    let raw = "OPTIONS /api/v1/calculate HTTP/1.1\r\nhost: test\r\norigin: http://localhost:3000\r\n\r\n";
    let reply = exchange(raw.to_string()).await;
    assert_eq!(reply.status, 204);
    assert_eq!(reply.body, Value::Null);
}

#[tokio::test]
async fn responses_carry_a_process_time_header() {
    let reply = exchange(get("/api/v1/health")).await;
    let value: f64 = reply.header("x-process-time").unwrap().parse().unwrap();
    assert!(value >= 0.0);
}
