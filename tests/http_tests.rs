mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use common::{FaultyRepository, FaultyStore};
use daily_copy::{
    adapters::inbound::http::{
        router::create_router, EntryDeletionDto, EntryDetailDto, EntryDto, EntryUpdateDto,
        ErrorResponseDto, ListingResponseDto,
    },
    AppBuilder,
};
use serde_json::json;

async fn setup_test_server() -> TestServer {
    let app = AppBuilder::new().build().await.unwrap();
    TestServer::new(create_router(app.state())).unwrap()
}

fn image(name: &str) -> Part {
    Part::bytes(format!("image data of {}", name).into_bytes())
        .file_name(name)
        .mime_type("image/png")
}

fn entry_form(headline: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("headline", headline)
        .add_text("copy_text", "Copy that sells")
        .add_text("explanation", "Why it works")
        .add_text("advertiser", "Acme")
}

fn published_form(
    headline: &str,
    publish_at: &str,
    industry: &str,
    category: &str,
) -> MultipartForm {
    entry_form(headline)
        .add_text("status", "published")
        .add_text("publish_at", publish_at)
        .add_text("industry_tags", industry)
        .add_text("category_tags", category)
}

async fn create(server: &TestServer, form: MultipartForm) -> EntryDto {
    let response = server.post("/admin/entries").multipart(form).await;
    response.assert_status(StatusCode::CREATED);
    response.json::<EntryDto>()
}

#[tokio::test]
async fn test_create_entry_with_two_files() {
    let server = setup_test_server().await;

    let form = entry_form("Test")
        .add_text("year_created", "2024")
        .add_part("files", image("front.png"))
        .add_part("files", image("back.png"));
    let entry = create(&server, form).await;

    assert_eq!(entry.headline, "Test");
    assert_eq!(entry.status, "draft");
    assert_eq!(entry.year_created, Some(2024));
    assert_eq!(entry.key_visual_urls.len(), 2);
    assert!(entry.key_visual_urls.iter().all(|p| p.ends_with(".png")));
    assert!(entry.key_visual_urls.iter().all(|p| !p.contains("://")));

    let listed = server.get("/admin/entries").await.json::<Vec<EntryDto>>();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, entry.id);
}

#[tokio::test]
async fn test_update_drops_deleted_image_and_appends_new_one() {
    let server = setup_test_server().await;
    let entry = create(
        &server,
        entry_form("Before")
            .add_part("files", image("a.png"))
            .add_part("files", image("b.png")),
    )
    .await;
    let a = entry.key_visual_urls[0].clone();
    let b = entry.key_visual_urls[1].clone();

    let response = server
        .put(&format!("/admin/entries/{}", entry.id))
        .multipart(
            entry_form("After")
                .add_text("delete_images", format!("/public/key-visuals/{}", a))
                .add_part("files", image("c.png")),
        )
        .await;

    response.assert_status_ok();
    let updated = response.json::<EntryUpdateDto>();
    assert_eq!(updated.entry.headline, "After");
    assert_eq!(updated.entry.key_visual_urls.len(), 2);
    assert_eq!(updated.entry.key_visual_urls[0], b);
    assert_ne!(updated.entry.key_visual_urls[1], a);
    assert!(updated.warnings.is_empty());
}

#[tokio::test]
async fn test_invalid_year_is_rejected_before_upload() {
    let server = setup_test_server().await;

    let response = server
        .post("/admin/entries")
        .multipart(
            entry_form("Bad year")
                .add_text("year_created", "nineteen")
                .add_part("files", image("a.png")),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let listed = server.get("/admin/entries").await.json::<Vec<EntryDto>>();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_upload_failure_reports_class_and_compensation() {
    let store = FaultyStore::new();
    store.fail_upload_number(1);
    let app = AppBuilder::new()
        .with_store(Arc::new(store))
        .build()
        .await
        .unwrap();
    let server = TestServer::new(create_router(app.state())).unwrap();

    let response = server
        .post("/admin/entries")
        .multipart(entry_form("Unlucky").add_part("files", image("a.png")))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let error = response.json::<ErrorResponseDto>();
    let details = error.details.unwrap();
    assert_eq!(details["failure_classes"], json!(["upload"]));
    assert_eq!(details["compensated"], json!(true));
}

#[tokio::test]
async fn test_malformed_id_never_reaches_the_repository() {
    let repository = FaultyRepository::new();
    let app = AppBuilder::new()
        .with_entry_repository(Arc::new(repository.clone()))
        .build()
        .await
        .unwrap();
    let server = TestServer::new(create_router(app.state())).unwrap();

    server.get("/copy/not-a-uuid").await.assert_status_not_found();
    server
        .get("/copy/123e4567e89b12d3a456426614174000")
        .await
        .assert_status_not_found();
    server
        .delete("/admin/entries/12345")
        .await
        .assert_status_not_found();

    assert_eq!(repository.calls(), 0);
}

#[tokio::test]
async fn test_public_listing_filters_and_paginates() {
    let server = setup_test_server().await;
    create(&server, published_form("A", "2024-01-01", "飲料", "TVCM")).await;
    create(&server, published_form("B", "2024-01-02", "飲料", "ポスター")).await;
    create(&server, published_form("C", "2024-01-03", "自動車", "TVCM")).await;
    create(&server, entry_form("Draft")).await;

    let all = server.get("/copy").await.json::<ListingResponseDto>();
    assert_eq!(all.total, 3);
    assert_eq!(all.industry_tags, vec!["自動車", "飲料"]);

    let response = server
        .get("/copy")
        .add_query_param("industry", "飲料")
        .add_query_param("per_page", 1)
        .add_query_param("page", 2)
        .await;
    let page = response.json::<ListingResponseDto>();
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.entries.len(), 1);
    assert_eq!(page.entries[0].headline, "A");
    // Facets still cover every published entry
    assert_eq!(page.category_tags.len(), 2);

    let latest = server
        .get("/copy/latest")
        .add_query_param("limit", 2)
        .await
        .json::<Vec<EntryDto>>();
    let headlines: Vec<&str> = latest.iter().map(|e| e.headline.as_str()).collect();
    assert_eq!(headlines, vec!["C", "B"]);
}

#[tokio::test]
async fn test_detail_serves_signed_images() {
    let server = setup_test_server().await;
    let entry = create(
        &server,
        published_form("Gallery", "2024-02-01", "", "").add_part("files", image("kv.png")),
    )
    .await;

    let detail = server
        .get(&format!("/copy/{}", entry.id))
        .await
        .json::<EntryDetailDto>();
    assert_eq!(detail.image_urls.len(), 1);

    let local = detail.image_urls[0].trim_start_matches("http://localhost:3000");
    let response = server.get(local).await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().as_ref(), b"image data of kv.png");

    let tampered = format!("{}0", local);
    server.get(&tampered).await.assert_status(StatusCode::FORBIDDEN);

    let unsigned = format!("/media/{}", entry.key_visual_urls[0]);
    server.get(&unsigned).await.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_draft_detail_is_readable_until_deleted() {
    let server = setup_test_server().await;
    let entry = create(&server, entry_form("Test")).await;
    assert_eq!(entry.status, "draft");

    server
        .get(&format!("/copy/{}", entry.id))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/admin/entries/{}", entry.id))
        .await
        .assert_status_ok();
    server
        .get(&format!("/copy/{}", entry.id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_entry() {
    let server = setup_test_server().await;
    let entry = create(&server, entry_form("Bye").add_part("files", image("a.png"))).await;

    let response = server.delete(&format!("/admin/entries/{}", entry.id)).await;

    response.assert_status_ok();
    let deletion = response.json::<EntryDeletionDto>();
    assert_eq!(deletion.id, entry.id);
    assert!(deletion.orphaned_images.is_empty());
    server
        .get(&format!("/admin/entries/{}", entry.id))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delivery_without_published_entry_is_not_found() {
    let server = setup_test_server().await;

    server.post("/jobs/deliver").await.assert_status_not_found();
}

#[tokio::test]
async fn test_webhook_always_acknowledges() {
    let server = setup_test_server().await;

    server
        .post("/webhooks/line")
        .text("not json")
        .await
        .assert_status_ok();

    let response = server
        .post("/webhooks/line")
        .json(&json!({
            "events": [{ "type": "follow", "replyToken": "r-1" }]
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["data"]["replies"], json!(1));
}
