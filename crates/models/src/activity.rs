use chrono::{DateTime, SubsecRound, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{ModelError, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    /// `fold_title(title)`, maintained on every write. Title search runs
    /// against this column so it does not depend on the backend's `LOWER()`.
    #[sea_orm(column_type = "Text")]
    pub title_search: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Stored timestamps keep microsecond precision so a record reads back
/// exactly as it was written, whatever the backend.
pub fn normalize_timestamp(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// Case folding used for title search. SQLite's `LOWER()` only folds ASCII,
/// so the folded form is computed here and stored next to the title.
pub fn fold_title(s: &str) -> String {
    s.to_lowercase()
}

/// Create payload as sent by callers. Accepts the legacy Portuguese names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewActivity {
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "data")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A create payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDraft {
    pub title: String,
    pub description: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewActivity {
    pub fn validate(self) -> Result<ActivityDraft, ValidationError> {
        match self.title {
            Some(title) if !title.trim().is_empty() => Ok(ActivityDraft {
                title,
                description: self.description,
                timestamp: self.timestamp,
            }),
            _ => Err(ValidationError::missing(&["title"])),
        }
    }
}

impl ActivityDraft {
    /// Assign a fresh id and default the timestamp to now.
    pub fn into_model(self) -> Model {
        let timestamp = normalize_timestamp(self.timestamp.unwrap_or_else(Utc::now));
        Model {
            id: Uuid::new_v4(),
            title_search: fold_title(&self.title),
            title: self.title,
            description: self.description,
            timestamp: timestamp.into(),
        }
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActivityPatch {
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,
    #[serde(default, alias = "descricao")]
    pub description: Option<String>,
    #[serde(default, alias = "data")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ActivityPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.title {
            Some(title) if title.trim().is_empty() => {
                Err(ValidationError::field("title", "title must not be empty"))
            }
            _ => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.timestamp.is_none()
    }

    pub fn apply(&self, model: &mut Model) {
        if let Some(t) = &self.title {
            model.title = t.clone();
            model.title_search = fold_title(t);
        }
        if let Some(d) = &self.description { model.description = Some(d.clone()); }
        if let Some(ts) = self.timestamp { model.timestamp = normalize_timestamp(ts).into(); }
    }

    pub fn apply_active(&self, am: &mut ActiveModel) {
        if let Some(t) = &self.title {
            am.title = Set(t.clone());
            am.title_search = Set(fold_title(t));
        }
        if let Some(d) = &self.description { am.description = Set(Some(d.clone())); }
        if let Some(ts) = self.timestamp { am.timestamp = Set(normalize_timestamp(ts).into()); }
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, draft: ActivityDraft) -> Result<Model, ModelError> {
    let m = draft.into_model();
    let am = ActiveModel {
        id: Set(m.id),
        title: Set(m.title),
        title_search: Set(m.title_search),
        description: Set(m.description),
        timestamp: Set(m.timestamp),
    };
    Ok(am.insert(db).await?)
}
