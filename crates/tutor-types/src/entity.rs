//! Curriculum entities.
//!
//! Shared identity and timestamps live in [`EntityMeta`], embedded by value in
//! each entity rather than inherited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and audit timestamps shared by every stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntityMeta {
    /// Fresh metadata with a time-sortable id and both timestamps set to now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at` to now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

/// A lesson within a chapter; the unit of curriculum content searched by
/// the tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub chapter_id: String,
    pub grade_level: i32,
    pub title: String,
    pub title_ar: String,
    /// Lesson body (markdown), Arabic first.
    pub content: String,
    pub order: i32,
}

/// Lesson fields as supplied by an import file, before ids are assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLesson {
    pub chapter_id: String,
    pub grade_level: i32,
    #[serde(default)]
    pub title: String,
    pub title_ar: String,
    pub content: String,
    #[serde(default)]
    pub order: i32,
}

impl From<NewLesson> for Lesson {
    fn from(new: NewLesson) -> Self {
        Self {
            meta: EntityMeta::new(),
            chapter_id: new.chapter_id,
            grade_level: new.grade_level,
            title: new.title,
            title_ar: new.title_ar,
            content: new.content,
            order: new.order,
        }
    }
}
