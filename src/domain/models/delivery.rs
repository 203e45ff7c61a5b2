use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{errors::ValidationError, value_objects::EntryId};

/// How often a subscriber wants a copy pushed.
///
/// Only `daily` is delivered; other stored values are kept but skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryFrequency {
    Daily,
    Other(String),
}

impl DeliveryFrequency {
    pub fn as_str(&self) -> &str {
        match self {
            DeliveryFrequency::Daily => "daily",
            DeliveryFrequency::Other(value) => value,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "daily" => DeliveryFrequency::Daily,
            other => DeliveryFrequency::Other(other.to_string()),
        }
    }
}

/// Wall-clock time of day a subscriber receives the copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryTime(NaiveTime);

impl DeliveryTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, ValidationError> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(DeliveryTime)
            .ok_or_else(|| {
                ValidationError::invalid_field(
                    "delivery_time",
                    &format!("{}:{}", hour, minute),
                    "a time of day",
                )
            })
    }

    /// Accepts `HH:MM` or `HH:MM:SS`; seconds are dropped.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        let mut parts = raw.split(':');
        let invalid = || ValidationError::invalid_field("delivery_time", raw, "HH:MM");

        let hour = parts
            .next()
            .and_then(|h| h.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        let minute = parts
            .next()
            .and_then(|m| m.parse::<u32>().ok())
            .ok_or_else(invalid)?;
        if let Some(seconds) = parts.next() {
            seconds.parse::<u32>().map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Self::new(hour, minute).map_err(|_| invalid())
    }

    /// Tomorrow (relative to `now` in `offset`) at this time of day.
    pub fn next_after(&self, now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
        let local = now.with_timezone(&offset) + Duration::days(1);
        let scheduled = local.date_naive().and_time(self.0);

        offset
            .from_local_datetime(&scheduled)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now + Duration::days(1))
    }
}

impl std::fmt::Display for DeliveryTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// A messaging subscriber and their delivery schedule
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryProfile {
    pub id: Uuid,
    pub line_user_id: String,
    pub frequency: DeliveryFrequency,
    pub delivery_time: DeliveryTime,
    pub next_scheduled_at: DateTime<Utc>,
}

/// A profile the run could not reach
#[derive(Debug, Clone, PartialEq)]
pub struct FailedDelivery {
    pub profile_id: Uuid,
    pub reason: String,
}

/// Summary of one delivery run
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub entry_id: EntryId,
    /// Profiles that received the entry and were rescheduled
    pub delivered: Vec<Uuid>,
    /// Profiles left due; they are picked up again on the next run
    pub failed: Vec<FailedDelivery>,
}
