use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::datetime::calendar_date;

/// A single to-do item. Serialized in camelCase to match the persisted
/// blob format (`dueDate`, `createdAt`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    pub title: String,

    pub description: String,

    #[serde(with = "calendar_date")]
    pub due_date: NaiveDate,

    #[serde(default)]
    pub completed: bool,

    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: Uuid,
        title: String,
        description: String,
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            due_date,
            completed: false,
            created_at: now,
        }
    }
}
