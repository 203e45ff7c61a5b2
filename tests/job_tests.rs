mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::{content, published};
use daily_copy::{
    adapters::outbound::{
        generation::UnconfiguredGenerator,
        messaging::{RecordedMessage, RecordingMessenger},
        persistence::{InMemoryEntryRepository, InMemoryProfileRepository},
        storage::ObjectStoreAdapter,
    },
    app::default_delivery_offset,
    domain::{
        errors::{DeliveryError, GenerationError},
        models::GeneratedCopy,
        DeliveryFrequency, DeliveryTime, EntryStatus, SourceLink,
    },
    ports::{
        external::{CopyGenerator, GeneratorError},
        services::WebhookEvent,
    },
    DeliveryProfile, DeliveryService, DeliveryServiceImpl, EntryLifecycleService,
    EntryLifecycleServiceImpl, GenerationService, GenerationServiceImpl, ProfileRepository,
    WebhookService, WebhookServiceImpl,
};
use uuid::Uuid;

struct DeliveryFixture {
    service: DeliveryServiceImpl,
    lifecycle: EntryLifecycleServiceImpl,
    profiles: InMemoryProfileRepository,
    messenger: RecordingMessenger,
}

fn delivery_fixture() -> DeliveryFixture {
    let entries = Arc::new(InMemoryEntryRepository::new());
    let profiles = InMemoryProfileRepository::new();
    let messenger = RecordingMessenger::new();
    DeliveryFixture {
        service: DeliveryServiceImpl::new(
            entries.clone(),
            Arc::new(profiles.clone()),
            Arc::new(messenger.clone()),
            default_delivery_offset(),
        ),
        lifecycle: EntryLifecycleServiceImpl::new(
            entries,
            Arc::new(ObjectStoreAdapter::in_memory()),
        ),
        profiles,
        messenger,
    }
}

async fn subscriber(
    fixture: &DeliveryFixture,
    line_user_id: &str,
    frequency: DeliveryFrequency,
    due_in: Duration,
) -> Uuid {
    let profile = DeliveryProfile {
        id: Uuid::new_v4(),
        line_user_id: line_user_id.to_string(),
        frequency,
        delivery_time: DeliveryTime::new(8, 0).unwrap(),
        next_scheduled_at: Utc::now() + due_in,
    };
    fixture.profiles.save(&profile).await.unwrap();
    profile.id
}

#[tokio::test]
async fn test_delivery_pushes_latest_entry_and_reschedules() {
    let fixture = delivery_fixture();
    fixture
        .lifecycle
        .create(published("Older", 1, "", ""), vec![])
        .await
        .unwrap();
    let latest = fixture
        .lifecycle
        .create(published("Newest", 2, "", ""), vec![])
        .await
        .unwrap();
    let due = subscriber(&fixture, "U-due", DeliveryFrequency::Daily, Duration::minutes(-5)).await;
    let later = subscriber(&fixture, "U-later", DeliveryFrequency::Daily, Duration::hours(3)).await;

    let report = fixture.service.deliver_due().await.unwrap();

    assert_eq!(report.entry_id, latest.id);
    assert_eq!(report.delivered, vec![due]);
    assert!(report.failed.is_empty());
    assert_eq!(
        fixture.messenger.sent().await,
        vec![RecordedMessage::Push {
            to: "U-due".to_string(),
            entry_id: latest.id,
        }]
    );

    let rescheduled = fixture.profiles.get(&due).await.unwrap();
    // Tomorrow at 08:00 in the delivery offset
    assert!(rescheduled.next_scheduled_at > Utc::now() + Duration::hours(7));
    assert!(rescheduled.next_scheduled_at <= Utc::now() + Duration::hours(33));
    let untouched = fixture.profiles.get(&later).await.unwrap();
    assert!(untouched.next_scheduled_at > Utc::now());
}

#[tokio::test]
async fn test_failed_push_leaves_profile_due() {
    let fixture = delivery_fixture();
    fixture
        .lifecycle
        .create(published("Only", 1, "", ""), vec![])
        .await
        .unwrap();
    let blocked = subscriber(
        &fixture,
        "U-blocked",
        DeliveryFrequency::Daily,
        Duration::minutes(-1),
    )
    .await;
    let ok = subscriber(&fixture, "U-ok", DeliveryFrequency::Daily, Duration::minutes(-1)).await;
    fixture.messenger.mark_unreachable("U-blocked").await;

    let report = fixture.service.deliver_due().await.unwrap();

    assert_eq!(report.delivered, vec![ok]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].profile_id, blocked);
    assert!(fixture.profiles.get(&blocked).await.unwrap().next_scheduled_at <= Utc::now());
}

#[tokio::test]
async fn test_delivery_skips_non_daily_profiles() {
    let fixture = delivery_fixture();
    fixture
        .lifecycle
        .create(published("Only", 1, "", ""), vec![])
        .await
        .unwrap();
    subscriber(
        &fixture,
        "U-weekly",
        DeliveryFrequency::parse("weekly"),
        Duration::minutes(-1),
    )
    .await;

    let report = fixture.service.deliver_due().await.unwrap();

    assert!(report.delivered.is_empty());
    assert!(fixture.messenger.sent().await.is_empty());
}

#[tokio::test]
async fn test_delivery_without_published_entry() {
    let fixture = delivery_fixture();
    fixture
        .lifecycle
        .create(content("Draft only", EntryStatus::Draft), vec![])
        .await
        .unwrap();
    subscriber(&fixture, "U-due", DeliveryFrequency::Daily, Duration::minutes(-1)).await;

    let err = fixture.service.deliver_due().await.unwrap_err();

    assert!(matches!(err, DeliveryError::NoPublishedEntry));
    assert!(fixture.messenger.sent().await.is_empty());
}

struct FixedGenerator(GeneratedCopy);

#[async_trait]
impl CopyGenerator for FixedGenerator {
    async fn generate(&self) -> Result<GeneratedCopy, GeneratorError> {
        Ok(self.0.clone())
    }
}

fn generation_service(
    generator: Arc<dyn CopyGenerator>,
) -> (GenerationServiceImpl, Arc<EntryLifecycleServiceImpl>) {
    let lifecycle = Arc::new(EntryLifecycleServiceImpl::new(
        Arc::new(InMemoryEntryRepository::new()),
        Arc::new(ObjectStoreAdapter::in_memory()),
    ));
    (GenerationServiceImpl::new(generator, lifecycle.clone()), lifecycle)
}

#[tokio::test]
async fn test_generation_stores_a_draft_without_foreign_images() {
    let generated = GeneratedCopy {
        headline: "そうだ 京都、行こう。".to_string(),
        copy_text: "そうだ 京都、行こう。".to_string(),
        explanation: "A campaign that made a season a destination.".to_string(),
        advertiser: Some("JR東海".to_string()),
        year_created: Some(1993),
        tags: vec!["鉄道".to_string(), "旅行".to_string()],
        sources: vec![SourceLink {
            title: "Archive".to_string(),
            url: "https://example.com/kyoto".to_string(),
        }],
        key_visual_urls: vec!["https://images.example.com/kyoto.jpg".to_string()],
        ..Default::default()
    };
    let (service, lifecycle) = generation_service(Arc::new(FixedGenerator(generated)));

    let draft = service.generate_draft().await.unwrap();

    assert_eq!(draft.entry.content.status, EntryStatus::Draft);
    assert!(draft.entry.key_visual_urls.is_empty());
    assert_eq!(draft.skipped_image_urls, vec!["https://images.example.com/kyoto.jpg"]);
    assert_eq!(draft.entry.content.industry_tags.as_slice(), &["鉄道", "旅行"]);
    assert!(draft.entry.content.publish_at.is_some());
    assert_eq!(lifecycle.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_generation_without_credentials_fails_cleanly() {
    let (service, lifecycle) = generation_service(Arc::new(UnconfiguredGenerator));

    let err = service.generate_draft().await.unwrap_err();

    assert!(matches!(err, GenerationError::Generator { .. }));
    assert!(lifecycle.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_webhook_replies_to_follow_events_only() {
    let messenger = RecordingMessenger::new();
    let service = WebhookServiceImpl::new(Arc::new(messenger.clone()));

    let replies = service
        .handle_events(vec![
            WebhookEvent {
                kind: "follow".to_string(),
                reply_token: Some("reply-1".to_string()),
            },
            WebhookEvent {
                kind: "message".to_string(),
                reply_token: Some("reply-2".to_string()),
            },
            WebhookEvent {
                kind: "follow".to_string(),
                reply_token: None,
            },
        ])
        .await;

    assert_eq!(replies, 1);
    match messenger.sent().await.as_slice() {
        [RecordedMessage::Reply { reply_token, text }] => {
            assert_eq!(reply_token, "reply-1");
            assert_eq!(text, daily_copy::services::WELCOME_MESSAGE);
        }
        other => panic!("unexpected messages: {:?}", other),
    }
}
