//! Product image upload (multipart) over the memory and local-disk image stores.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};

use storefront_api::config::ApiConfig;
use storefront_core::images::{LocalImageStore, MemoryImageStore, image_key};
use uuid::Uuid;

use common::{
    SECRET, app, app_with, app_with_images, create_product, fetch, register, request, send,
};

const BOUNDARY: &str = "storefront-test-boundary";
const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

fn multipart(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"photo\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload(uri: &str, token: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_sets_image_url() {
    let (app, _) = app();
    let (token, _) = register(&app, "img@example.com").await;
    let product = create_product(&app, &token, "Poster", 9.0).await;
    let id = product["id"].as_str().unwrap();
    let uri = format!("/api/products/{id}/image");

    let (status, body) = send(&app, upload(&uri, &token, multipart("image", "image/png", PNG))).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.starts_with(&format!("/uploads/{id}/")), "{url}");
    assert!(url.ends_with(".png"), "{url}");

    let (_, fetched) = send(
        &app,
        request(Method::GET, &format!("/api/products/{id}"), None, None),
    )
    .await;
    assert_eq!(fetched["imageUrl"], url);
}

#[tokio::test]
async fn non_image_content_is_rejected() {
    let (app, _) = app();
    let (token, _) = register(&app, "pdf@example.com").await;
    let product = create_product(&app, &token, "Manual", 3.0).await;
    let uri = format!("/api/products/{}/image", product["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        upload(&uri, &token, multipart("image", "application/pdf", b"%PDF-1.7")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unsupported image type: application/pdf");
}

#[tokio::test]
async fn missing_image_field_is_rejected() {
    let (app, _) = app();
    let (token, _) = register(&app, "nofield@example.com").await;
    let product = create_product(&app, &token, "Frame", 12.0).await;
    let uri = format!("/api/products/{}/image", product["id"].as_str().unwrap());

    let (status, body) = send(&app, upload(&uri, &token, multipart("photo", "image/png", PNG))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No 'image' file provided");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let (app, _) = app();
    let (token, _) = register(&app, "ghost@example.com").await;

    let (status, body) = send(
        &app,
        upload(
            "/api/products/0195f0a4-5c1e-7d3a-9a0b-3f2d6c1e8b77/image",
            &token,
            multipart("image", "image/png", PNG),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn oversized_image_is_rejected() {
    let mut config = ApiConfig::for_tests(SECRET);
    config.max_upload_bytes = 16;
    let (app, _) = app_with(config);
    let (token, _) = register(&app, "big@example.com").await;
    let product = create_product(&app, &token, "Mural", 999.0).await;
    let uri = format!("/api/products/{}/image", product["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        upload(&uri, &token, multipart("image", "image/png", &[0u8; 64])),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn bytes_land_under_content_addressed_key() {
    let images = Arc::new(MemoryImageStore::new());
    let (app, _) = app_with_images(ApiConfig::for_tests(SECRET), images.clone());
    let (token, _) = register(&app, "keyed@example.com").await;
    let product = create_product(&app, &token, "Print", 15.0).await;
    let id = product["id"].as_str().unwrap();
    assert!(images.is_empty());

    let (status, body) = send(
        &app,
        upload(
            &format!("/api/products/{id}/image"),
            &token,
            multipart("image", "image/png", PNG),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let key = image_key(Uuid::parse_str(id).unwrap(), "image/png", PNG).unwrap();
    assert_eq!(body["imageUrl"], format!("/uploads/{key}"));
    assert_eq!(images.len(), 1);
    let (content_type, bytes) = images.get(&key).expect("stored image");
    assert_eq!(content_type, "image/png");
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn memory_store_is_not_served() {
    let (app, _) = app();
    let (status, _, _) = fetch(
        &app,
        request(Method::GET, "/uploads/any/thing.png", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn local_store_serves_uploaded_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ApiConfig::for_tests(SECRET);
    config.upload_dir = dir.path().to_path_buf();
    let images = Arc::new(LocalImageStore::new(dir.path(), ""));
    let (app, _) = app_with_images(config, images);
    let (token, _) = register(&app, "disk@example.com").await;
    let product = create_product(&app, &token, "Canvas", 40.0).await;
    let id = product["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        upload(
            &format!("/api/products/{id}/image"),
            &token,
            multipart("image", "image/png", PNG),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let key = image_key(Uuid::parse_str(id).unwrap(), "image/png", PNG).unwrap();
    assert_eq!(std::fs::read(dir.path().join(&key)).unwrap(), PNG);

    let url = body["imageUrl"].as_str().unwrap();
    let (status, content_type, bytes) = fetch(&app, request(Method::GET, url, None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, PNG);
}
