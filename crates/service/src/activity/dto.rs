use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::activity;

/// Wire representation of an activity. The storage row never leaves the
/// service crate; this is what gets serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<activity::Model> for ActivityDto {
    fn from(m: activity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            timestamp: m.timestamp.with_timezone(&Utc),
        }
    }
}
