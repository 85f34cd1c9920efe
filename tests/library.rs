#![allow(clippy::unwrap_used)]

use anyhow::Result;
use bookdesk::{
    gateway::{Gateway, GatewayConfig, GatewayError},
    library::{
        Book, BookCriteria, LibraryClient, LibraryError, NewBook, Registration, UserCriteria,
    },
    navigation::Screen,
    session::{FileSessionStore, MemorySessionStore, Role, SessionStore},
};
use chrono::{Local, Months, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use std::{io::Write, net::TcpListener, sync::Arc};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client(server: &MockServer, store: Arc<dyn SessionStore>) -> LibraryClient {
    let config = GatewayConfig::new(&format!("{}/svc/library", server.uri())).unwrap();
    LibraryClient::new(Gateway::new(&config, store).unwrap())
}

fn session(role: Option<Role>) -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::with_session("tok-123", role))
}

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

fn new_book() -> NewBook {
    NewBook {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        isbn: "9780441013593".to_string(),
        price: 9.99,
        stock: 3,
        stock_available: 3,
        publish_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
    }
}

async fn mount_role(server: &MockServer, role: &str) {
    Mock::given(method("GET"))
        .and(path("/svc/library/user"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "firstName": "Ana",
            "email": "ana@example.com",
            "role": role
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_stores_raw_token_and_role() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/login"))
        .and(header("Authorization", "Basic YW5hOnNlY3JldA=="))
        .and(body_json(json!({"username": "ana", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-123"))
        .mount(&server)
        .await;
    mount_role(&server, "ADMIN").await;

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let client = client(&server, Arc::clone(&store));

    let role = client.login("ana", &password("secret")).await?;
    assert_eq!(role, Some(Role::Admin));

    let snapshot = store.snapshot();
    assert_eq!(
        snapshot.token.as_ref().map(|t| t.expose_secret().to_string()),
        Some("tok-123".to_string())
    );
    assert_eq!(snapshot.role, Some(Role::Admin));
    Ok(())
}

#[tokio::test]
async fn login_accepts_json_token() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "tok-123"})))
        .mount(&server)
        .await;
    mount_role(&server, "USER").await;

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let client = client(&server, Arc::clone(&store));

    assert_eq!(client.login("ana", &password("secret")).await?, Some(Role::User));
    assert!(store.snapshot().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn login_survives_role_lookup_failure() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("tok-123"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/svc/library/user"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let client = client(&server, Arc::clone(&store));

    assert_eq!(client.login("ana", &password("secret")).await?, None);
    assert!(store.snapshot().is_authenticated());
    assert_eq!(store.role(), None);
    Ok(())
}

#[tokio::test]
async fn login_rejection_keeps_session_empty() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let client = client(&server, Arc::clone(&store));

    let err = client.login("ana", &password("wrong")).await.unwrap_err();
    assert_eq!(err.to_string(), "Bad credentials");
    assert!(!store.snapshot().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn login_persists_to_session_file() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("tok-123")))
        .mount(&server)
        .await;
    mount_role(&server, "USER").await;

    let dir = tempfile::tempdir()?;
    let file = dir.path().join("session.json");
    let client = client(&server, Arc::new(FileSessionStore::open(&file)?));
    client.login("ana", &password("secret")).await?;

    let reopened = FileSessionStore::open(&file)?;
    assert_eq!(reopened.role(), Some(Role::User));
    assert_eq!(
        reopened.token().map(|t| t.expose_secret().to_string()),
        Some("tok-123".to_string())
    );

    client.logout()?;
    assert!(!file.exists());
    Ok(())
}

#[tokio::test]
async fn logged_out_calls_never_reach_the_service() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let client = client(&server, Arc::new(MemorySessionStore::new()));

    let err = client.my_books().await.unwrap_err();
    assert!(err.needs_login());
    assert!(matches!(
        client.search_books(BookCriteria::default()).await,
        Err(LibraryError::Gateway(GatewayError::NoSession))
    ));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn register_runs_without_session() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/user"))
        .and(body_json(json!({
            "firstName": null,
            "secondName": null,
            "thirdName": null,
            "email": "ana@example.com",
            "password": "pw",
            "passwordConfirmation": "pw",
            "mainAddress": "Sofia",
            "age": null,
            "roleName": "USER"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, Arc::new(MemorySessionStore::new()));
    client
        .register(Registration {
            email: Some("ana@example.com".to_string()),
            password: Some(password("pw")),
            password_confirmation: Some(password("pw")),
            main_address: Some("Sofia".to_string()),
            ..Registration::default()
        })
        .await?;
    Ok(())
}

#[tokio::test]
async fn register_validates_before_sending() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let client = client(&server, Arc::new(MemorySessionStore::new()));

    let err = client
        .register(Registration {
            email: Some("ana@example.com".to_string()),
            ..Registration::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LibraryError::Validation(_)));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn search_sends_blank_criteria_as_null() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book/search"))
        .and(body_json(json!({
            "title": null,
            "author": "Herbert",
            "isbn": null,
            "priceFrom": null,
            "priceTo": 20.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "title": "Dune", "author": "Frank Herbert", "stock": 2}
        ])))
        .mount(&server)
        .await;

    let client = client(&server, session(Some(Role::User)));
    let books = client
        .search_books(BookCriteria {
            title: Some(String::new()),
            author: Some("Herbert".to_string()),
            price_to: Some(20.0),
            ..BookCriteria::default()
        })
        .await?;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].stock, Some(2));
    Ok(())
}

#[tokio::test]
async fn restock_patches_new_total() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/svc/library/book/5"))
        .and(query_param("stock", "7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, session(Some(Role::Admin)));
    let book = Book {
        id: Some(5),
        stock: Some(4),
        ..Book::default()
    };
    assert_eq!(client.restock(&book, 3).await?, 7);
    Ok(())
}

#[tokio::test]
async fn rent_sets_return_date_six_months_ahead() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book-rent"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client(&server, session(Some(Role::Admin)));
    let due = client.rent_book(3, 7).await?;

    let expected = Local::now()
        .date_naive()
        .checked_add_months(Months::new(6))
        .unwrap();
    assert_eq!(due, expected);

    let received = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body)?;
    assert_eq!(
        body,
        json!({
            "userId": 3,
            "bookId": 7,
            "returnDate": expected.format("%Y-%m-%d").to_string()
        })
    );
    Ok(())
}

#[tokio::test]
async fn admin_actions_are_gated_locally() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let client = client(&server, session(Some(Role::User)));

    let err = client
        .search_users(UserCriteria::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LibraryError::Forbidden {
            screen: Screen::UserSearch,
            required: Role::Admin
        }
    ));
    assert!(client.set_stock(1, 2).await.is_err());

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_role_is_refreshed_before_gating() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_role(&server, "USER").await;
    Mock::given(method("GET"))
        .and(path("/svc/library/comment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"rentId": 1, "bookTitle": "Dune", "comment": "Loved it"},
            {"rentId": 2, "bookTitle": "Emma", "comment": null}
        ])))
        .mount(&server)
        .await;

    let store = session(None);
    let client = client(&server, Arc::clone(&store));

    let comments = client.my_comments().await?;
    assert_eq!(comments.len(), 2);
    assert_eq!(store.role(), Some(Role::User));
    Ok(())
}

#[tokio::test]
async fn delete_comment_sends_null() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book-comment"))
        .and(body_json(json!({"rentId": 9, "comment": null})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, session(Some(Role::User)));
    client.delete_comment(9).await?;
    assert!(matches!(
        client.comment(9, "   ").await,
        Err(LibraryError::Validation(_))
    ));
    Ok(())
}

#[tokio::test]
async fn add_book_uploads_cover_as_multipart() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/svc/library/file"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let cover = dir.path().join("cover.jpg");
    std::fs::File::create(&cover)?.write_all(b"\xFF\xD8\xFFjpeg")?;

    let client = client(&server, session(Some(Role::Admin)));
    let id = client.add_book_with_cover(new_book(), Some(&cover)).await?;
    assert_eq!(id, 42);

    let received = server.received_requests().await.unwrap();
    let upload = received
        .iter()
        .find(|request| request.url.path() == "/svc/library/file")
        .unwrap();
    let content_type = upload
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&upload.body);
    assert!(body.contains("name=\"bookId\""));
    assert!(body.contains("42"));
    assert!(body.contains("filename=\"cover.jpg\""));
    Ok(())
}

#[tokio::test]
async fn failed_add_skips_upload() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "ISBN already exists"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let cover = dir.path().join("cover.jpeg");
    std::fs::write(&cover, b"jpeg")?;

    let client = client(&server, session(Some(Role::Admin)));
    let err = client
        .add_book_with_cover(new_book(), Some(&cover))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "ISBN already exists");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].url.path(), "/svc/library/book");
    Ok(())
}

#[tokio::test]
async fn unreadable_cover_adds_nothing() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("cover.jpg");

    let client = client(&server, session(Some(Role::Admin)));
    let err = client
        .add_book_with_cover(new_book(), Some(&missing))
        .await
        .unwrap_err();
    assert!(matches!(err, LibraryError::Validation(message) if message.starts_with("Cannot read")));

    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_upload_keeps_new_book_id() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/svc/library/book"))
        .respond_with(ResponseTemplate::new(200).set_body_string("42"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/svc/library/file"))
        .respond_with(
            ResponseTemplate::new(413).set_body_json(json!({"message": "File too large"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir()?;
    let cover = dir.path().join("cover.jpg");
    std::fs::write(&cover, b"\xFF\xD8\xFFjpeg")?;

    let client = client(&server, session(Some(Role::Admin)));
    let err = client
        .add_book_with_cover(new_book(), Some(&cover))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        LibraryError::CoverNotUploaded { book_id: 42, source }
            if *source == GatewayError::RequestFailed("File too large".to_string())
    ));
    assert!(err.to_string().contains("Book 42"));
    assert!(!err.needs_login());
    Ok(())
}

#[tokio::test]
async fn logged_out_blank_comment_asks_for_login() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    let client = client(&server, Arc::new(MemorySessionStore::new()));
    let err = client.comment(9, "   ").await.unwrap_err();
    assert!(err.needs_login());

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
    Ok(())
}

#[tokio::test]
async fn update_profile_returns_fresh_profile() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_role(&server, "USER").await;
    Mock::given(method("PUT"))
        .and(path("/svc/library/user"))
        .and(body_json(json!({
            "firstName": "Ana",
            "secondName": null,
            "thirdName": null,
            "mainAddress": "Plovdiv",
            "age": null
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server, session(Some(Role::User)));
    let profile = client
        .update_profile(bookdesk::library::ProfileUpdate {
            main_address: Some("Plovdiv".to_string()),
            ..Default::default()
        })
        .await?;
    assert_eq!(profile.first_name.as_deref(), Some("Ana"));
    Ok(())
}
