use serde::Deserialize;

use crate::domain::{
    models::{CopyEntry, EntryStatus},
    value_objects::EntryId,
};

/// Tag filter for the public listing.
///
/// At most one industry and one category tag; an absent tag matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TagFilter {
    pub industry: Option<String>,
    pub category: Option<String>,
}

impl TagFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_industry(mut self, tag: impl Into<String>) -> Self {
        self.industry = Some(tag.into());
        self
    }

    pub fn with_category(mut self, tag: impl Into<String>) -> Self {
        self.category = Some(tag.into());
        self
    }

    /// Check if this filter matches an entry
    pub fn matches(&self, entry: &CopyEntry) -> bool {
        if let Some(industry) = active(&self.industry) {
            if !entry.content.industry_tags.contains(industry) {
                return false;
            }
        }

        if let Some(category) = active(&self.category) {
            if !entry.content.category_tags.contains(category) {
                return false;
            }
        }

        true
    }

    /// Check if filter is empty (matches everything)
    pub fn is_empty(&self) -> bool {
        active(&self.industry).is_none() && active(&self.category).is_none()
    }
}

// Blank query parameters count as "no filter".
fn active(tag: &Option<String>) -> Option<&str> {
    tag.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

/// Column an entry query is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    SerialNumber,
    PublishAt,
    CreatedAt,
}

impl OrderField {
    pub fn column(&self) -> &'static str {
        match self {
            OrderField::SerialNumber => "serial_number",
            OrderField::PublishAt => "publish_at",
            OrderField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryOrder {
    pub field: OrderField,
    pub direction: Direction,
}

impl EntryOrder {
    pub fn asc(field: OrderField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: OrderField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Compare two entries in this order. Missing `publish_at` sorts last.
    pub fn compare(&self, a: &CopyEntry, b: &CopyEntry) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        let ordering = match self.field {
            OrderField::SerialNumber => a.serial_number.cmp(&b.serial_number),
            OrderField::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderField::PublishAt => match (a.content.publish_at, b.content.publish_at) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
        // Ties fall back to insertion order
        .then(a.serial_number.cmp(&b.serial_number));

        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// Equality and range filters, ordering and limit for reading entries
#[derive(Debug, Clone, PartialEq, bon::Builder)]
pub struct EntryQuery {
    pub status: Option<EntryStatus>,
    pub id: Option<EntryId>,
    /// Only entries with a serial number strictly below this one
    pub serial_before: Option<i64>,
    /// Only entries with a serial number strictly above this one
    pub serial_after: Option<i64>,
    pub order: Option<EntryOrder>,
    pub limit: Option<usize>,
}

impl EntryQuery {
    /// Every published entry, newest volume first
    pub fn published() -> Self {
        Self::builder()
            .status(EntryStatus::Published)
            .order(EntryOrder::desc(OrderField::SerialNumber))
            .build()
    }

    /// Check if a stored entry passes the equality and range filters
    pub fn matches(&self, entry: &CopyEntry) -> bool {
        if let Some(status) = self.status {
            if entry.content.status != status {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if &entry.id != id {
                return false;
            }
        }

        if let Some(before) = self.serial_before {
            if entry.serial_number >= before {
                return false;
            }
        }

        if let Some(after) = self.serial_after {
            if entry.serial_number <= after {
                return false;
            }
        }

        true
    }
}
