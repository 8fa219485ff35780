use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use livemovies::config::Config;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

const ADMIN_EMAIL: &str = "admin@movieapp.com";
const ADMIN_PASSWORD: &str = "admin123";
const BOUNDARY: &str = "livemovies-test-boundary";

struct TestApp {
    router: Router,
    uploads_dir: PathBuf,
}

fn test_config() -> (Config, PathBuf) {
    let id = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("livemovies-api-test-{id}.db"));
    let uploads_dir = std::env::temp_dir().join(format!("livemovies-api-uploads-{id}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.uploads.uploads_path = uploads_dir.display().to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    config.legacy.data_path = String::new();
    config.legacy.fallback_path = String::new();

    (config, uploads_dir)
}

async fn spawn_with(config: Config, uploads_dir: PathBuf) -> TestApp {
    let state = livemovies::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");

    TestApp {
        router: livemovies::api::router(state).await,
        uploads_dir,
    }
}

async fn spawn_app() -> TestApp {
    let (config, uploads_dir) = test_config();
    spawn_with(config, uploads_dir).await
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn inception() -> Value {
    json!({
        "name": "Inception",
        "release_year": "2010",
        "language": "English",
        "genre": ["Sci-Fi", "Action"],
        "rating": "8.8",
        "description": "A thief who steals corporate secrets through dream-sharing.",
        "cast": ["Leonardo DiCaprio"],
        "image_url": "https://example.com/inception.jpg",
        "watch_url": "https://example.com/watch/inception"
    })
}

/// (field name, optional file name, content)
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn session_cookie(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("missing session cookie")
        .to_string()
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let response = app.router.clone().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/auth/check-auth"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["isAdmin"], false);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"email": ADMIN_EMAIL, "password": "wrong-password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["success"], false);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("LMDB.Session="));
    assert_eq!(body_json(response).await["success"], true);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check-auth")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["isAdmin"], true);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/check-auth")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["isAdmin"], false);
}

#[tokio::test]
async fn test_login_input_validation() {
    let app = spawn_app().await;

    for payload in [
        json!({"email": "not-an-email", "password": "secret123"}),
        json!({"email": ADMIN_EMAIL, "password": "12345"}),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/auth/login", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_register_twice() {
    let app = spawn_app().await;
    let payload = json!({"email": "critic@example.com", "password": "popcorn"});

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User already exists");

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/auth/login", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_movie_crud() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/movies", &inception()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Movie added successfully");
    let id = body["movie"]["id"].as_i64().unwrap();
    assert_eq!(body["movie"]["genre"], json!(["Sci-Fi", "Action"]));

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/api/movies/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let movie = body_json(response).await;
    assert_eq!(movie["name"], "Inception");
    assert_eq!(movie["release_year"], "2010");
    assert_eq!(movie["release_Year"], "2010");
    assert_eq!(movie["cast"], json!(["Leonardo DiCaprio"]));

    let mut updated = inception();
    updated["genre"] = json!(["Thriller"]);
    updated["cast"] = json!(["Elliot Page", "Tom Hardy"]);
    let response = app
        .router
        .clone()
        .oneshot(json_request("PUT", &format!("/api/movies/{id}"), &updated))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/api/movies/{id}")))
        .await
        .unwrap();
    let movie = body_json(response).await;
    assert_eq!(movie["genre"], json!(["Thriller"]));
    assert_eq!(movie["cast"], json!(["Elliot Page", "Tom Hardy"]));

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/movies/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/api/movies/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.router.clone().oneshot(get("/api/movies")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn test_movie_validation_and_missing_ids() {
    let app = spawn_app().await;

    let mut bad = inception();
    bad["release_year"] = json!("3010");
    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/movies", &bad))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);

    let response = app
        .router
        .clone()
        .oneshot(json_request("PUT", "/api/movies/9999", &inception()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/movies/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_search() {
    let app = spawn_app().await;

    let mut heat = inception();
    heat["name"] = json!("Heat");
    heat["release_year"] = json!("1995");
    heat["genre"] = json!(["Crime"]);
    heat["cast"] = json!(["Al Pacino"]);

    for movie in [inception(), heat] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/api/movies", &movie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let cases = [
        ("/api/movies/search?q=201", vec!["Inception"]),
        ("/api/movies/search?q=sci", vec!["Inception"]),
        ("/api/movies/search?q=PACINO", vec!["Heat"]),
        ("/api/movies/search?q=english", vec!["Inception", "Heat"]),
        ("/api/movies/search", vec!["Inception", "Heat"]),
        ("/api/movies/search?q=zzz", vec![]),
    ];

    for (uri, expected) in cases {
        let response = app.router.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let names: Vec<String> = body_json(response)
            .await
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, expected, "search {uri}");
    }
}

#[tokio::test]
async fn test_upload_and_delete_image() {
    let app = spawn_app().await;

    let body = multipart_body(&[("file", Some("poster.png"), b"\x89PNG fake image")]);
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("POST", "/api/upload/image", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let image_path = body["imagePath"].as_str().unwrap().to_string();
    assert!(image_path.starts_with("/uploads/movies/"));

    let response = app.router.clone().oneshot(get(&image_path)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let delete_uri = format!("/api/upload/image?imagePath={image_path}");
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&delete_uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&delete_uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let _ = std::fs::remove_dir_all(&app.uploads_dir);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = spawn_app().await;

    let cases = [
        multipart_body(&[("file", Some("script.exe"), b"MZ")]),
        multipart_body(&[("other", None, b"value")]),
    ];

    for body in cases {
        let response = app
            .router
            .clone()
            .oneshot(multipart_request("POST", "/api/upload/image", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    let too_big = vec![b'x'; 5 * 1024 * 1024 + 16];
    let body = multipart_body(&[("file", Some("huge.jpg"), &too_big)]);
    let response = app
        .router
        .clone()
        .oneshot(multipart_request("POST", "/api/upload/image", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_movie_with_image() {
    let app = spawn_app().await;

    let body = multipart_body(&[
        ("Name", None, b"Coco"),
        ("Release_Year", None, b"2017"),
        ("Language", None, b"English"),
        ("Genre", None, b"Family"),
        ("Genre", None, b"Musical"),
        ("Rating", None, b"8.4"),
        ("Description", None, b"A boy and the Land of the Dead."),
        ("Cast", None, b"Anthony Gonzalez"),
        ("Watch_url", None, b"https://example.com/watch/coco"),
        ("imageFile", Some("coco.JPG"), b"fake jpeg bytes"),
    ]);

    let response = app
        .router
        .clone()
        .oneshot(multipart_request("POST", "/api/movies/with-image", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let movie = body_json(response).await["movie"].clone();
    assert_eq!(movie["genre"], json!(["Family", "Musical"]));
    assert_eq!(movie["cast"], json!(["Anthony Gonzalez"]));
    let image_url = movie["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/movies/"));
    assert!(image_url.ends_with(".jpg"));

    let _ = std::fs::remove_dir_all(&app.uploads_dir);
}

#[tokio::test]
async fn test_writes_require_login_when_configured() {
    let (mut config, uploads_dir) = test_config();
    config.security.require_admin_for_writes = true;
    let app = spawn_with(config, uploads_dir).await;

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/movies", &inception()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.router.clone().oneshot(get("/api/movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}),
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    let mut request = json_request("POST", "/api/movies", &inception());
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
