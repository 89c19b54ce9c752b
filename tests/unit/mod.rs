use bytebodh_client::application::models::blog::BlogPayload;
use bytebodh_client::application::models::contact::ContactPayload;
use bytebodh_client::session::auth::HttpAuthenticator;
use bytebodh_client::session::interface::AuthSession;
use bytebodh_client::storage::file_store::FileTokenStore;
use bytebodh_client::storage::memory_store::MemoryTokenStore;
use bytebodh_client::transport::model::Attachment;
use bytebodh_client::utils::logger::setup_logger;
use bytebodh_client::{BlogService, ByteBodhClient, Config, ContactService, JobNotificationService};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn config_for(server: &Server) -> Config {
    let mut config = Config::with_base_url(&server.url());
    config.token_storage.path = None;
    config
}

fn client_with_session(server: &Server, session: AuthSession) -> ByteBodhClient {
    let config = config_for(server);
    let store = Arc::new(MemoryTokenStore::with_session(session));
    let authenticator = Arc::new(HttpAuthenticator::new(&config).unwrap());
    ByteBodhClient::with_parts(config, store, authenticator).unwrap()
}

#[tokio::test]
async fn test_update_blog_with_image_after_token_expiry() {
    setup_logger();
    let mut server = Server::new_async().await;

    let expired = server
        .mock("PUT", "/api/blogs/42")
        .match_header("authorization", "Bearer A")
        .with_status(401)
        .with_body(r#"{"message": "Token expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh-token")
        .match_body(Matcher::Json(json!({"refreshToken": "R"})))
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"accessToken": "B"}}"#)
        .expect(1)
        .create_async()
        .await;
    let retried = server
        .mock("PUT", "/api/blogs/42")
        .match_header("authorization", "Bearer B")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"\{"title":"X"\}"#.to_string()),
            Matcher::Regex(r#"filename="cover.jpg""#.to_string()),
            Matcher::Regex("jpeg-bytes".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"id": 42, "title": "X"}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client_with_session(&server, AuthSession::new("A", "R"));
    let image = Attachment::new("cover.jpg", "image/jpeg", b"jpeg-bytes".to_vec());

    let blog = client
        .blogs()
        .update("42", &BlogPayload::new("X"), Some(image))
        .await
        .unwrap();

    assert_eq!(blog.id, "42");
    assert_eq!(blog.title, "X");
    assert_eq!(
        client.session().await.unwrap(),
        Some(AuthSession::new("B", "R"))
    );
    expired.assert_async().await;
    refresh.assert_async().await;
    retried.assert_async().await;
}

#[tokio::test]
async fn test_rejected_refresh_logs_out_and_surfaces_401() {
    setup_logger();
    let mut server = Server::new_async().await;

    let _jobs = server
        .mock("PATCH", "/api/job-notifications/3/active")
        .match_query(Matcher::UrlEncoded("isActive".into(), "true".into()))
        .with_status(401)
        .with_body("expired")
        .expect(1)
        .create_async()
        .await;
    let refresh = server
        .mock("POST", "/auth/refresh-token")
        .with_status(403)
        .expect(1)
        .create_async()
        .await;

    let client = client_with_session(&server, AuthSession::new("A", "R"));
    let err = client
        .jobs()
        .update_active_status("3", true)
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(client.session().await.unwrap(), None);
    refresh.assert_async().await;
}

#[tokio::test]
async fn test_login_then_call_with_fresh_token() {
    setup_logger();
    let mut server = Server::new_async().await;

    let _login = server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"accessToken": "L", "refreshToken": "LR"}}"#)
        .create_async()
        .await;
    let blogs = server
        .mock("GET", "/api/blogs")
        .match_header("authorization", "Bearer L")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let config = config_for(&server);
    let credentials = config.credentials.clone();
    let client = ByteBodhClient::new(config).await.unwrap();

    client.login(&credentials).await.unwrap();
    assert!(client.blogs().list().await.unwrap().is_empty());
    blogs.assert_async().await;
}

#[tokio::test]
async fn test_public_contact_submit_without_login() {
    setup_logger();
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/contacts")
        .match_header("authorization", Matcher::Missing)
        .with_status(201)
        .with_body(r#"{"id": "c-1", "name": "Meera", "email": "meera@example.com", "message": "Hello"}"#)
        .create_async()
        .await;

    let client = ByteBodhClient::new(config_for(&server)).await.unwrap();
    let payload = ContactPayload {
        name: "Meera".to_string(),
        email: "meera@example.com".to_string(),
        message: "Hello".to_string(),
        ..Default::default()
    };

    let contact = client.contacts().submit(&payload).await.unwrap();

    assert_eq!(contact.id, "c-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_file_store_session_survives_client_restart() {
    setup_logger();
    let mut server = Server::new_async().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let _login = server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_body(r#"{"success": true, "data": {"accessToken": "P", "refreshToken": "PR"}}"#)
        .create_async()
        .await;

    let mut config = config_for(&server);
    config.token_storage.path = Some(path.to_string_lossy().to_string());
    let credentials = config.credentials.clone();

    let first = ByteBodhClient::new(config.clone()).await.unwrap();
    first.login(&credentials).await.unwrap();
    drop(first);

    let second = ByteBodhClient::new(config).await.unwrap();
    assert_eq!(
        second.session().await.unwrap(),
        Some(AuthSession::new("P", "PR"))
    );

    second.logout().await.unwrap();
    assert!(!path.exists());
    let reopened = FileTokenStore::open(&path).await.unwrap();
    assert_eq!(reopened.path(), path.as_path());
}
