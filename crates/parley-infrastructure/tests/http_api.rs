//! Exercises the HTTP adapters against a one-shot local HTTP server.

use std::time::Duration;

use chrono::Utc;
use parley_core::ParleyError;
use parley_core::persona::{CreatePersonaRequest, Gender, PersonaRepository};
use parley_core::scenario::ScenarioRepository;
use parley_core::token::{TokenMinter, UsageToken};
use parley_core::voice::VoiceRepository;
use parley_infrastructure::{HttpApiClient, HttpTokenMinter};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A captured HTTP request: the head (request line + headers) and the body.
struct Captured {
    head: String,
    body: String,
}

impl Captured {
    fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case(name) {
                Some(value.trim().to_string())
            } else {
                None
            }
        })
    }
}

/// Serves a single canned response and hands back what the client sent.
async fn serve_once(
    status: &'static str,
    content_type: &'static str,
    response_body: &'static str,
) -> (String, oneshot::Receiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
            if n == 0 {
                break buf.len();
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            content_type,
            response_body.len(),
            response_body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(Captured { head, body });
    });

    (base_url, rx)
}

fn token() -> UsageToken {
    UsageToken::new("usage-tok", Utc::now() + chrono::Duration::hours(1))
}

fn client(base_url: &str) -> HttpApiClient {
    HttpApiClient::new(base_url, token(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_personas_preserves_order_and_sends_bearer() {
    let (base_url, captured) = serve_once(
        "200 OK",
        "application/json",
        r#"{"values":[{"id":"p2","name":"Zed","voice":"v2"},{"id":"p1","name":"Ava","gender":"male","voice":"v1"}]}"#,
    )
    .await;

    let personas = PersonaRepository::list(&client(&base_url)).await.unwrap();
    let ids: Vec<&str> = personas.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);
    assert_eq!(personas[0].gender, Gender::Female);
    assert_eq!(personas[1].gender, Gender::Male);

    let request = captured.await.unwrap();
    assert!(request.request_line().starts_with("GET /api/v1/persona/list"));
    assert_eq!(
        request.header("authorization").as_deref(),
        Some("Bearer usage-tok")
    );
}

#[tokio::test]
async fn test_create_persona_posts_wire_body() {
    let (base_url, captured) = serve_once(
        "200 OK",
        "application/json",
        r#"{"id":"new-1","name":"Ava","description":"","gender":"female","voice":"v1"}"#,
    )
    .await;

    let request = CreatePersonaRequest {
        name: "Ava".into(),
        description: String::new(),
        gender: Gender::Female,
        voice_id: "v1".into(),
    };
    let persona = client(&base_url).create(&request).await.unwrap();
    assert_eq!(persona.id, "new-1");
    assert_eq!(persona.voice_id, "v1");

    let sent = captured.await.unwrap();
    assert!(sent.request_line().starts_with("POST /api/v1/persona "));
    let body: serde_json::Value = serde_json::from_str(&sent.body).unwrap();
    assert_eq!(body["voice"], "v1");
    assert_eq!(body["description"], "");
}

#[tokio::test]
async fn test_scenarios_are_queried_with_persona_context() {
    let (base_url, captured) = serve_once(
        "200 OK",
        "application/json",
        r#"{"values":[{"id":"s1","name":"Job interview","description":"Practice"}]}"#,
    )
    .await;

    let scenarios = ScenarioRepository::list(&client(&base_url), "p1")
        .await
        .unwrap();
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].description.as_deref(), Some("Practice"));

    let sent = captured.await.unwrap();
    assert!(
        sent.request_line()
            .starts_with("GET /api/v1/scenario/list?persona=p1")
    );
}

#[tokio::test]
async fn test_non_success_status_maps_to_api_error() {
    let (base_url, _captured) =
        serve_once("500 Internal Server Error", "text/plain", "boom").await;

    let err = VoiceRepository::list(&client(&base_url)).await.unwrap_err();
    assert_eq!(err, ParleyError::api(500, "boom"));
}

#[tokio::test]
async fn test_voice_sample_keeps_content_type() {
    let (base_url, captured) = serve_once("200 OK", "audio/wav", "RIFFdata").await;

    let sample = client(&base_url)
        .generate_sample("v1", "hello")
        .await
        .unwrap();
    assert_eq!(sample.content_type, "audio/wav");
    assert_eq!(sample.audio, b"RIFFdata".to_vec());

    let sent = captured.await.unwrap();
    let body: serde_json::Value = serde_json::from_str(&sent.body).unwrap();
    assert_eq!(body["voice_id"], "v1");
    assert_eq!(body["text"], "hello");
}

#[tokio::test]
async fn test_minter_sends_api_key() {
    let (base_url, captured) = serve_once(
        "200 OK",
        "application/json",
        r#"{"token":"minted","ttl_seconds":120}"#,
    )
    .await;

    let minter = HttpTokenMinter::new(&base_url, "server-key", Duration::from_secs(5)).unwrap();
    let token = minter.mint().await.unwrap();
    assert_eq!(token.token, "minted");
    assert!(!token.is_expired());

    let sent = captured.await.unwrap();
    assert!(sent.request_line().starts_with("POST /api/v1/usage/token"));
    assert_eq!(sent.header("x-api-key").as_deref(), Some("server-key"));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = PersonaRepository::list(&client(&base_url)).await.unwrap_err();
    assert!(matches!(err, ParleyError::Network(_)));
}
