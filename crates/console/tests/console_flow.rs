//! End-to-end: console commands against a real HTTP server, durable tier on disk.

use std::collections::HashMap;
use std::io::Cursor;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;
use serde_json::{Value, json};

use backoffice_console::{Cli, Console, ConsoleConfig};
use backoffice_core::Navigator;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/logout", post(logout))
            .route("/api/auth/me", get(me))
            .route("/api/tickets", get(tickets))
            .route("/api/payments", get(payments));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn unauthenticated() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthenticated." })))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })));
    }
    let (token, role) = match body["email"].as_str() {
        Some("admin@example.com") => ("admin-token", "admin"),
        Some("staff@example.com") => ("staff-token", "employee"),
        Some("revoked@example.com") => ("revoked-token", "admin"),
        _ => return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" }))),
    };
    (StatusCode::OK, Json(json!({ "token": token, "role": role })))
}

async fn logout() -> Json<Value> {
    Json(json!({}))
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers).as_deref() {
        Some("admin-token") => (
            StatusCode::OK,
            Json(json!({ "id": 1, "name": "Ada", "email": "admin@example.com", "role": "admin" })),
        ),
        Some("staff-token") => (
            StatusCode::OK,
            Json(json!({ "id": 2, "name": "Sam", "email": "staff@example.com", "role": "employee" })),
        ),
        _ => unauthenticated(),
    }
}

async fn tickets(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    if !matches!(bearer(&headers).as_deref(), Some("admin-token" | "staff-token")) {
        return unauthenticated();
    }
    if query.get("user_id").is_some_and(|id| id == "999") {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "invalid", "errors": { "user_id": ["The selected user id is invalid."] } })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "data": [
                { "id": 1, "subject": "Refund request", "status": "open", "priority": "high" },
                { "id": 2, "subject": "Login issue", "status": "resolved", "priority": "low", "user_id": 4 }
            ],
            "total": 12
        })),
    )
}

async fn payments(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers).as_deref() {
        Some("admin-token") => (
            StatusCode::OK,
            Json(json!({ "data": [{ "id": 9, "amount": "12.50", "status": "paid", "method": "card" }], "total": 1 })),
        ),
        Some(_) => (StatusCode::FORBIDDEN, Json(json!({ "message": "Forbidden" }))),
        None => unauthenticated(),
    }
}

struct Harness {
    server: TestServer,
    data_dir: tempfile::TempDir,
}

impl Harness {
    async fn new() -> Self {
        Self {
            server: TestServer::spawn().await,
            data_dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A fresh console process sharing the same data directory.
    fn console(&self) -> Console {
        let config = ConsoleConfig {
            api_url: self.server.base_url.clone(),
            data_dir: Some(self.data_dir.path().to_path_buf()),
            ..ConsoleConfig::default()
        };
        Console::new(config).unwrap()
    }

    fn session_file(&self) -> String {
        std::fs::read_to_string(self.data_dir.path().join("session.json")).unwrap_or_default()
    }
}

async fn run(console: &Console, args: &[&str]) -> anyhow::Result<Value> {
    let cli = Cli::try_parse_from(std::iter::once("backoffice").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    console.run(cli.command, &mut out).await?;
    Ok(serde_json::from_slice(&out)?)
}

#[tokio::test]
async fn remembered_login_survives_a_new_process() {
    let h = Harness::new().await;

    let first = h.console();
    let login = run(&first, &["login", "-e", "admin@example.com", "--password", "secret", "--remember"])
        .await
        .unwrap();
    assert_eq!(login["role"], "admin");
    assert!(h.session_file().contains("admin-token"));

    let second = h.console();
    let whoami = run(&second, &["whoami", "--require", "admin"]).await.unwrap();
    assert_eq!(whoami["authenticated"], true);
    assert_eq!(whoami["remember"], true);
    assert_eq!(whoami["access"]["granted"], true);
    assert_eq!(whoami["profile"]["name"], "Ada");

    let tickets = run(&second, &["tickets", "--per-page", "5"]).await.unwrap();
    assert_eq!(tickets["total"], 12);
    assert_eq!(tickets["page_count"], 3);
    assert_eq!(tickets["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn session_only_login_ends_with_the_process() {
    let h = Harness::new().await;

    let first = h.console();
    run(&first, &["login", "-e", "admin@example.com", "--password", "secret"])
        .await
        .unwrap();
    assert!(run(&first, &["tickets"]).await.is_ok());
    assert!(!h.session_file().contains("admin-token"));

    let second = h.console();
    let err = run(&second, &["tickets"]).await.unwrap_err();
    assert!(err.to_string().contains("redirected to /login"), "{err}");
    assert_eq!(second.navigator().current_path(), "/login");
}

#[tokio::test]
async fn wrong_password_is_reported_without_a_session() {
    let h = Harness::new().await;
    let console = h.console();

    let err = run(&console, &["login", "-e", "admin@example.com", "--password", "nope"])
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "invalid credentials");
    assert!(!console.session().is_authenticated());
    assert!(console.navigator().redirects().is_empty());
}

#[tokio::test]
async fn rejected_filter_is_reset_and_reported() {
    let h = Harness::new().await;
    let console = h.console();
    run(&console, &["login", "-e", "staff@example.com", "--password", "secret"])
        .await
        .unwrap();

    let tickets = run(&console, &["tickets", "--user-id", "999", "--search", "refund"])
        .await
        .unwrap();

    assert_eq!(tickets["items"].as_array().unwrap().len(), 2);
    assert_eq!(tickets["reset_filters"]["user_id"][0], "The selected user id is invalid.");
}

#[tokio::test]
async fn payments_require_the_admin_role() {
    let h = Harness::new().await;
    let console = h.console();
    run(&console, &["login", "-e", "staff@example.com", "--password", "secret"])
        .await
        .unwrap();

    let err = run(&console, &["payments"]).await.unwrap_err();

    assert!(err.to_string().contains("redirected to /unauthorized"), "{err}");
    assert!(console.session().is_authenticated());
}

#[tokio::test]
async fn admin_lists_payments_with_decimal_amounts() {
    let h = Harness::new().await;
    let console = h.console();
    run(&console, &["login", "-e", "admin@example.com", "--password", "secret"])
        .await
        .unwrap();

    let payments = run(&console, &["payments", "--status", "paid"]).await.unwrap();

    assert_eq!(payments["total"], 1);
    assert_eq!(payments["items"][0]["amount"], 12.5);
}

#[tokio::test]
async fn revoked_token_clears_the_remembered_session() {
    let h = Harness::new().await;
    let console = h.console();
    run(&console, &["login", "-e", "revoked@example.com", "--password", "secret", "--remember"])
        .await
        .unwrap();
    assert!(h.session_file().contains("revoked-token"));

    let err = run(&console, &["tickets"]).await.unwrap_err();

    assert!(err.to_string().contains("redirected to /login"), "{err}");
    assert!(!console.session().is_authenticated());
    assert!(!h.session_file().contains("revoked-token"));
}

#[tokio::test]
async fn logout_forgets_the_remembered_credential() {
    let h = Harness::new().await;
    let console = h.console();
    run(&console, &["login", "-e", "admin@example.com", "--password", "secret", "--remember"])
        .await
        .unwrap();

    let out = run(&console, &["logout"]).await.unwrap();

    assert_eq!(out["signed_out"], true);
    assert!(!h.session_file().contains("admin-token"));
    assert!(!h.console().session().is_authenticated());
}

#[tokio::test]
async fn shell_keeps_a_session_only_login_between_commands() {
    let h = Harness::new().await;
    let console = h.console();
    let script = "login -e admin@example.com --password secret\n\nbogus-command\ntickets --page 0\nexit\ntickets\n";
    let mut out = Vec::new();

    console.shell(Cursor::new(script), &mut out).await.unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("\"role\": \"admin\""), "{out}");
    assert!(out.contains("unrecognized subcommand"), "{out}");
    assert_eq!(out.matches("\"resource\": \"tickets\"").count(), 1, "{out}");
    assert!(out.contains("\"page\": 1"), "{out}");
}
