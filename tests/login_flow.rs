//! End-to-end login flow tests against a mock portal server.

use std::path::Path;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portal_tui::app::{App, FormFocus, MSG_CREDENTIAL_MISMATCH, MSG_MALFORMED_RESPONSE};
use portal_tui::auth::session::SESSION_FILE;
use portal_tui::config::Config;
use portal_tui::ui::input::handle_key;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn app_for(server: &MockServer, dir: &Path) -> App {
    let config = Config {
        server_url: server.uri(),
        cache_dir: Some(dir.to_path_buf()),
        config_path: Some(dir.join("config.json")),
        ..Config::default()
    };
    App::with_config(config).expect("Failed to build app")
}

fn type_credentials(app: &mut App, identifier: &str, password: &str) {
    for c in identifier.chars() {
        app.push_identifier_char(c);
    }
    for c in password.chars() {
        app.push_password_char(c);
    }
}

/// Drive the event loop's result polling until the login outcome lands.
async fn wait_for_notice(app: &mut App) {
    for _ in 0..200 {
        app.check_login_results();
        if app.notice.is_open() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("No login outcome arrived in time");
}

async fn mock_login_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn remembered_login_stores_token_in_memory_and_on_disk() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .and(body_json(json!({ "id": "alice01", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc123" })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path());

    type_credentials(&mut app, "alice01", "hunter2");
    app.toggle_remember();
    app.submit();
    wait_for_notice(&mut app).await;

    assert!(app.logged_in);
    assert_eq!(app.session.token(), Some("abc123"));
    assert!(app.notice.message().contains("Welcome"));
    assert!(app.password.is_empty());

    let contents = std::fs::read_to_string(dir.path().join(SESSION_FILE)).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(stored["token"], "abc123");
    assert_eq!(stored["identifier"], "alice01");
    assert_eq!(stored["persistent"], true);
}

#[tokio::test]
async fn unremembered_login_keeps_token_in_memory_only() {
    let server = MockServer::start().await;
    mock_login_success(&server).await;

    let dir = tempfile::tempdir().unwrap();
    // A stale remembered session from an earlier opt-in
    std::fs::write(
        dir.path().join(SESSION_FILE),
        serde_json::to_string(&json!({
            "token": "stale",
            "identifier": "alice01",
            "persistent": true,
            "created_at": chrono::Utc::now(),
        }))
        .unwrap(),
    )
    .unwrap();

    let mut app = app_for(&server, dir.path());
    type_credentials(&mut app, "alice01", "hunter2");
    assert!(!app.remember);
    app.submit();
    wait_for_notice(&mut app).await;

    assert_eq!(app.session.token(), Some("abc123"));
    assert!(
        !dir.path().join(SESSION_FILE).exists(),
        "opting out must remove the remembered file"
    );
}

#[tokio::test]
async fn rejected_credentials_store_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path());
    type_credentials(&mut app, "alice01", "wrongpw");
    app.remember = true;
    app.submit();
    wait_for_notice(&mut app).await;

    assert!(!app.logged_in);
    assert!(app.session.token().is_none());
    assert!(!dir.path().join(SESSION_FILE).exists());
    assert_eq!(app.notice.message(), MSG_CREDENTIAL_MISMATCH);
}

#[tokio::test]
async fn server_message_is_shown_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "server exploded" })),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path());
    type_credentials(&mut app, "alice01", "hunter2");
    app.submit();
    wait_for_notice(&mut app).await;

    assert_eq!(app.notice.message(), "server exploded");
    assert!(app.session.token().is_none());
}

#[tokio::test]
async fn success_without_token_establishes_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, dir.path());
    type_credentials(&mut app, "alice01", "hunter2");
    app.submit();
    wait_for_notice(&mut app).await;

    assert!(!app.logged_in);
    assert!(app.session.token().is_none());
    assert_eq!(app.notice.message(), MSG_MALFORMED_RESPONSE);
}

#[tokio::test]
async fn enter_in_password_field_matches_button_activation() {
    let server = MockServer::start().await;
    mock_login_success(&server).await;

    let via_enter = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, via_enter.path());
    type_credentials(&mut app, "alice01", "hunter2");
    app.focus = FormFocus::Password;
    handle_key(&mut app, key(KeyCode::Enter)).unwrap();
    wait_for_notice(&mut app).await;
    let enter_outcome = (app.logged_in, app.session.token().map(str::to_owned));

    let via_button = tempfile::tempdir().unwrap();
    let mut app = app_for(&server, via_button.path());
    type_credentials(&mut app, "alice01", "hunter2");
    app.focus = FormFocus::Button;
    handle_key(&mut app, key(KeyCode::Enter)).unwrap();
    wait_for_notice(&mut app).await;
    let button_outcome = (app.logged_in, app.session.token().map(str::to_owned));

    assert_eq!(enter_outcome, button_outcome);
    assert_eq!(enter_outcome, (true, Some("abc123".to_string())));
}

#[tokio::test]
async fn network_failure_reports_request_problem() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        // Nothing listens on the discard port
        server_url: "http://127.0.0.1:9".to_string(),
        cache_dir: Some(dir.path().to_path_buf()),
        config_path: Some(dir.path().join("config.json")),
        ..Config::default()
    };
    let mut app = App::with_config(config).expect("Failed to build app");
    type_credentials(&mut app, "alice01", "hunter2");
    app.submit();
    wait_for_notice(&mut app).await;

    assert!(!app.logged_in);
    assert_eq!(
        app.notice.message(),
        portal_tui::app::MSG_REQUEST_FAILED
    );
}
