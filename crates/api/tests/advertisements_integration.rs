//! Integration tests for the advertisement admin API.

mod common;

use axum::http::{Method, StatusCode};
use common::{admin_request, body_json, failing_app, get, new_advertisement, test_context};
use persistence::AdvertisementStore;
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_body(title: &str) -> Value {
    json!({
        "title": title,
        "imageRef": "/files/advertisement_images/summer.jpg",
        "targetUrl": "/summer-sale"
    })
}

#[tokio::test]
async fn test_admin_requires_api_key() {
    let ctx = test_context();

    let response = ctx
        .app
        .clone()
        .oneshot(get("/api/v1/advertisements"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "unauthorized");

    let request = axum::http::Request::builder()
        .uri("/api/v1/advertisements")
        .header("X-API-Key", "wrong-key")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = ctx.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_defaults_owner_and_published() {
    let ctx = test_context();
    let response = ctx
        .app
        .oneshot(admin_request(
            Method::POST,
            "/api/v1/advertisements",
            Some(create_body("Summer Sale")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["title"], "Summer Sale");
    assert_eq!(body["ownerId"], 0);
    assert_eq!(body["published"], true);
    assert_eq!(body["targetUrl"], "/summer-sale");
    assert!(body.get("imageAlt").is_none());
    assert!(body["uuid"].as_str().is_some());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn test_create_duplicate_title_conflicts() {
    let ctx = test_context();
    let first = ctx
        .app
        .clone()
        .oneshot(admin_request(
            Method::POST,
            "/api/v1/advertisements",
            Some(create_body("Summer Sale")),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = ctx
        .app
        .oneshot(admin_request(
            Method::POST,
            "/api/v1/advertisements",
            Some(create_body("summer sale")),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let ctx = test_context();
    let cases = [
        json!({"title": "", "imageRef": "a.png", "targetUrl": "/x"}),
        json!({"title": "Bad image", "imageRef": "a.gif", "targetUrl": "/x"}),
        json!({"title": "Bad url", "imageRef": "a.png", "targetUrl": "javascript:alert(1)"}),
        json!({"title": "Bad owner", "imageRef": "a.png", "targetUrl": "/x", "ownerId": -1}),
    ];

    for body in cases {
        let response = ctx
            .app
            .clone()
            .oneshot(admin_request(
                Method::POST,
                "/api/v1/advertisements",
                Some(body.clone()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
        let json = body_json(response).await;
        assert_eq!(json["error"], "validation_error");
        assert!(json["details"].as_array().is_some());
    }
}

#[tokio::test]
async fn test_get_and_missing_advertisement() {
    let ctx = test_context();
    let ad = ctx.ads.create(new_advertisement(true)).await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(admin_request(
            Method::GET,
            &format!("/api/v1/advertisements/{}", ad.id),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], ad.id);
    assert_eq!(body["title"], ad.title);

    let response = ctx
        .app
        .oneshot(admin_request(Method::GET, "/api/v1/advertisements/999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_is_partial_and_advances_updated_at() {
    let ctx = test_context();
    let ad = ctx.ads.create(new_advertisement(true)).await.unwrap();

    let response = ctx
        .app
        .oneshot(admin_request(
            Method::PATCH,
            &format!("/api/v1/advertisements/{}", ad.id),
            Some(json!({"published": false, "imageAlt": "Beach banner"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["published"], false);
    assert_eq!(body["imageAlt"], "Beach banner");
    assert_eq!(body["title"], ad.title);
    assert_eq!(body["targetUrl"], ad.target_url);

    let updated_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(body["updatedAt"].clone()).unwrap();
    let created_at: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(body["createdAt"].clone()).unwrap();
    assert!(updated_at > ad.updated_at);
    assert_eq!(created_at, ad.created_at);
}

#[tokio::test]
async fn test_update_rejects_empty_and_unknown() {
    let ctx = test_context();
    let ad = ctx.ads.create(new_advertisement(true)).await.unwrap();

    let response = ctx
        .app
        .clone()
        .oneshot(admin_request(
            Method::PATCH,
            &format!("/api/v1/advertisements/{}", ad.id),
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .app
        .oneshot(admin_request(
            Method::PATCH,
            "/api/v1/advertisements/999",
            Some(json!({"published": true})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_title_conflict() {
    let ctx = test_context();
    let first = ctx.ads.create(new_advertisement(true)).await.unwrap();
    let second = ctx.ads.create(new_advertisement(true)).await.unwrap();

    let response = ctx
        .app
        .oneshot(admin_request(
            Method::PATCH,
            &format!("/api/v1/advertisements/{}", second.id),
            Some(json!({"title": first.title.to_uppercase()})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_advertisement() {
    let ctx = test_context();
    let ad = ctx.ads.create(new_advertisement(true)).await.unwrap();
    let uri = format!("/api/v1/advertisements/{}", ad.id);

    let response = ctx
        .app
        .clone()
        .oneshot(admin_request(Method::DELETE, &uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(ctx.ads.find_by_id(ad.id).await.unwrap().is_none());

    let response = ctx
        .app
        .oneshot(admin_request(Method::DELETE, &uri, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_pages_and_status_labels() {
    let ctx = test_context();
    for published in [true, false, true] {
        ctx.ads.create(new_advertisement(published)).await.unwrap();
    }

    let response = ctx
        .app
        .clone()
        .oneshot(admin_request(
            Method::GET,
            "/api/v1/advertisements?limit=2",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["advertisements"].as_array().unwrap().len(), 2);
    let cursor = body["nextCursor"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .clone()
        .oneshot(admin_request(
            Method::GET,
            &format!("/api/v1/advertisements?limit=2&cursor={}", cursor),
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["advertisements"].as_array().unwrap().len(), 1);
    assert!(body.get("nextCursor").is_none());

    let response = ctx
        .app
        .oneshot(admin_request(
            Method::GET,
            "/api/v1/advertisements?status=unpublished",
            None,
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["advertisements"][0]["status"], "not published");
    assert_eq!(body["advertisements"][0]["ownerId"], 0);
}

#[tokio::test]
async fn test_list_rejects_bad_cursor() {
    let ctx = test_context();
    let response = ctx
        .app
        .oneshot(admin_request(
            Method::GET,
            "/api/v1/advertisements?cursor=not-a-cursor!",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_store_unavailable_is_503() {
    let response = failing_app()
        .oneshot(admin_request(Method::GET, "/api/v1/advertisements", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["error"], "service_unavailable");
}
