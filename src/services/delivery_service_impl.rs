use std::sync::Arc;

use async_trait::async_trait;
use chrono::{FixedOffset, Utc};
use tracing::{error, info, warn};

use crate::{
    domain::{
        errors::DeliveryError,
        models::{
            DeliveryFrequency, DeliveryReport, EntryOrder, EntryQuery, EntryStatus,
            FailedDelivery, OrderField,
        },
    },
    ports::{
        external::MessagingClient,
        repositories::{EntryRepository, ProfileRepository},
        services::DeliveryService,
    },
};

/// Pushes the most recently published entry to every due daily subscriber
#[derive(Clone)]
pub struct DeliveryServiceImpl {
    entries: Arc<dyn EntryRepository>,
    profiles: Arc<dyn ProfileRepository>,
    messenger: Arc<dyn MessagingClient>,
    /// Offset subscribers' delivery times are expressed in
    offset: FixedOffset,
}

impl DeliveryServiceImpl {
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        profiles: Arc<dyn ProfileRepository>,
        messenger: Arc<dyn MessagingClient>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            entries,
            profiles,
            messenger,
            offset,
        }
    }
}

#[async_trait]
impl DeliveryService for DeliveryServiceImpl {
    async fn deliver_due(&self) -> Result<DeliveryReport, DeliveryError> {
        let now = Utc::now();
        let profiles = self.profiles.due_for_delivery(now).await?;

        let latest = EntryQuery::builder()
            .status(EntryStatus::Published)
            .order(EntryOrder::desc(OrderField::PublishAt))
            .limit(1)
            .build();
        let entry = self
            .entries
            .select(&latest)
            .await?
            .into_iter()
            .next()
            .ok_or(DeliveryError::NoPublishedEntry)?;

        let mut report = DeliveryReport {
            entry_id: entry.id,
            delivered: Vec::new(),
            failed: Vec::new(),
        };

        for profile in profiles {
            if profile.frequency != DeliveryFrequency::Daily {
                continue;
            }

            if let Err(e) = self.messenger.push_entry(&profile.line_user_id, &entry).await {
                warn!(profile = %profile.id, error = %e, "Push failed, profile stays due");
                report.failed.push(FailedDelivery {
                    profile_id: profile.id,
                    reason: e.to_string(),
                });
                continue;
            }

            let next = profile.delivery_time.next_after(now, self.offset);
            if let Err(e) = self.profiles.set_next_scheduled(&profile.id, next).await {
                error!(profile = %profile.id, error = %e, "Delivered but rescheduling failed");
                report.failed.push(FailedDelivery {
                    profile_id: profile.id,
                    reason: format!("delivered, but rescheduling failed: {}", e),
                });
                continue;
            }

            report.delivered.push(profile.id);
        }

        info!(
            entry = %report.entry_id,
            delivered = report.delivered.len(),
            failed = report.failed.len(),
            "Delivery run finished"
        );
        Ok(report)
    }
}
