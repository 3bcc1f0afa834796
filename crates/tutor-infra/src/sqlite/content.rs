//! SQLite curriculum store.
//!
//! Implements `ContentStore` from `tutor-core` with keyword search over the
//! `lessons` table. Candidates are filtered in SQL and ranked in Rust by
//! the number of query terms they contain, title hits counting double.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use tutor_core::content::store::ContentStore;
use tutor_types::content::ContentItem;
use tutor_types::entity::{EntityMeta, Lesson, NewLesson};
use tutor_types::error::StoreError;

use super::pool::DatabasePool;

/// Upper bound on rows pulled from SQLite before ranking.
const MAX_CANDIDATES: i64 = 500;

/// SQLite-backed implementation of `ContentStore`.
#[derive(Clone)]
pub struct SqliteContentStore {
    pool: DatabasePool,
}

impl SqliteContentStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert a single lesson.
    pub async fn insert_lesson(&self, lesson: &Lesson) -> Result<(), StoreError> {
        insert(&self.pool.writer, lesson).await
    }

    /// Insert a batch of lessons in one transaction; returns the count.
    pub async fn import_lessons(&self, lessons: Vec<NewLesson>) -> Result<usize, StoreError> {
        let mut tx = self.pool.writer.begin().await.map_err(store_error)?;

        let mut count = 0;
        for new in lessons {
            let lesson = Lesson::from(new);
            insert(&mut *tx, &lesson).await?;
            count += 1;
        }

        tx.commit().await.map_err(store_error)?;
        Ok(count)
    }

    pub async fn count_lessons(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM lessons")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(store_error)?;
        row.try_get("n").map_err(store_error)
    }

    pub async fn get_lesson(&self, id: &Uuid) -> Result<Option<Lesson>, StoreError> {
        let row = sqlx::query(
            "SELECT id, chapter_id, grade_level, title, title_ar, content, lesson_order, created_at, updated_at
             FROM lessons WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(store_error)?;

        match row {
            Some(row) => {
                let row = LessonRow::from_row(&row).map_err(store_error)?;
                Ok(Some(row.into_lesson()?))
            }
            None => Ok(None),
        }
    }
}

async fn insert<'e, E>(executor: E, lesson: &Lesson) -> Result<(), StoreError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        "INSERT INTO lessons (id, chapter_id, grade_level, title, title_ar, content, lesson_order, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(lesson.meta.id.to_string())
    .bind(&lesson.chapter_id)
    .bind(lesson.grade_level)
    .bind(&lesson.title)
    .bind(&lesson.title_ar)
    .bind(&lesson.content)
    .bind(lesson.order)
    .bind(format_datetime(&lesson.meta.created_at))
    .bind(format_datetime(&lesson.meta.updated_at))
    .execute(executor)
    .await
    .map_err(store_error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct LessonRow {
    id: String,
    chapter_id: String,
    grade_level: i32,
    title: String,
    title_ar: String,
    content: String,
    lesson_order: i32,
    created_at: String,
    updated_at: String,
}

impl LessonRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chapter_id: row.try_get("chapter_id")?,
            grade_level: row.try_get("grade_level")?,
            title: row.try_get("title")?,
            title_ar: row.try_get("title_ar")?,
            content: row.try_get("content")?,
            lesson_order: row.try_get("lesson_order")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_lesson(self) -> Result<Lesson, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::Query(format!("invalid lesson id: {e}")))?;
        Ok(Lesson {
            meta: EntityMeta {
                id,
                created_at: parse_datetime(&self.created_at)?,
                updated_at: parse_datetime(&self.updated_at)?,
            },
            chapter_id: self.chapter_id,
            grade_level: self.grade_level,
            title: self.title,
            title_ar: self.title_ar,
            content: self.content,
            order: self.lesson_order,
        })
    }

    /// Relevance of this lesson for `terms`: +2 per term in a title, +1 per
    /// term in the body.
    fn score(&self, terms: &[String]) -> usize {
        let title = format!("{} {}", self.title_ar, self.title).to_lowercase();
        let content = self.content.to_lowercase();
        terms
            .iter()
            .map(|term| {
                let mut s = 0;
                if title.contains(term.as_str()) {
                    s += 2;
                }
                if content.contains(term.as_str()) {
                    s += 1;
                }
                s
            })
            .sum()
    }

    fn into_item(self) -> ContentItem {
        let title = if self.title_ar.is_empty() {
            self.title
        } else {
            self.title_ar
        };
        ContentItem {
            content: self.content,
            title: (!title.is_empty()).then_some(title),
            grade_level: Some(self.grade_level),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn store_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Split `query` into distinct lowercase terms on anything that is not a
/// letter or digit. Terms never contain `%` or `_`, so they are safe inside
/// LIKE patterns.
fn tokenize(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// ContentStore implementation
// ---------------------------------------------------------------------------

impl ContentStore for SqliteContentStore {
    async fn search(
        &self,
        query: &str,
        grade_level: Option<i32>,
        limit: usize,
    ) -> Result<Vec<ContentItem>, StoreError> {
        let terms = tokenize(query);
        if terms.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        // Score in SQL so the candidate cap keeps the best matches, not the
        // earliest lessons.
        let term_score =
            "(CASE WHEN title LIKE ? OR title_ar LIKE ? THEN 2 ELSE 0 END + CASE WHEN content LIKE ? THEN 1 ELSE 0 END)";
        let clause = "(title LIKE ? OR title_ar LIKE ? OR content LIKE ?)";
        let mut sql = String::from(
            "SELECT id, chapter_id, grade_level, title, title_ar, content, lesson_order, created_at, updated_at, (",
        );
        sql.push_str(&vec![term_score; terms.len()].join(" + "));
        sql.push_str(") AS score FROM lessons WHERE (");
        sql.push_str(&vec![clause; terms.len()].join(" OR "));
        sql.push(')');
        if grade_level.is_some() {
            sql.push_str(" AND grade_level = ?");
        }
        sql.push_str(" ORDER BY score DESC, lesson_order ASC, created_at ASC LIMIT ?");

        let patterns: Vec<String> = terms.iter().map(|term| format!("%{term}%")).collect();
        let mut q = sqlx::query(&sql);
        // Placeholders appear twice per term: once in the score, once in WHERE.
        for _ in 0..2 {
            for pattern in &patterns {
                q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern.clone());
            }
        }
        if let Some(grade) = grade_level {
            q = q.bind(grade);
        }
        q = q.bind(MAX_CANDIDATES);

        let rows = q.fetch_all(&self.pool.reader).await.map_err(store_error)?;

        let mut ranked = Vec::with_capacity(rows.len());
        for row in &rows {
            let lesson = LessonRow::from_row(row).map_err(store_error)?;
            let score = lesson.score(&terms);
            // SQL LIKE folds ASCII case only; drop rows the ranker disagrees on.
            if score > 0 {
                ranked.push((score, lesson));
            }
        }
        // Stable sort keeps lesson order among equal scores.
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        tracing::debug!(
            terms = terms.len(),
            candidates = rows.len(),
            matched = ranked.len(),
            "Curriculum search"
        );

        Ok(ranked
            .into_iter()
            .take(limit)
            .map(|(_, lesson)| lesson.into_item())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;

    async fn store() -> (tempfile::TempDir, SqliteContentStore) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url(dir.path())).await.unwrap();
        (dir, SqliteContentStore::new(pool))
    }

    fn lesson(grade: i32, order: i32, title_ar: &str, content: &str) -> NewLesson {
        NewLesson {
            chapter_id: format!("grade-{grade}"),
            grade_level: grade,
            title: String::new(),
            title_ar: title_ar.to_string(),
            content: content.to_string(),
            order,
        }
    }

    #[test]
    fn test_tokenize_splits_on_punctuation_and_dedupes() {
        assert_eq!(
            tokenize("اشرح لي الجمع، الجمع!"),
            vec!["اشرح".to_string(), "لي".to_string(), "الجمع".to_string()]
        );
        assert_eq!(tokenize("Addition + Sum"), vec!["addition", "sum"]);
        assert!(tokenize("?!").is_empty());
    }

    #[tokio::test]
    async fn test_import_and_count() {
        let (_dir, store) = store().await;
        let n = store
            .import_lessons(vec![
                lesson(2, 1, "الجمع", "الجمع يعني وضع الأشياء معاً"),
                lesson(2, 2, "الطرح", "الطرح يعني أخذ جزء من الأشياء"),
            ])
            .await
            .unwrap();

        assert_eq!(n, 2);
        assert_eq!(store.count_lessons().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_and_get_lesson() {
        let (_dir, store) = store().await;
        let lesson: Lesson = lesson(4, 3, "الضرب", "الضرب جمع متكرر").into();
        store.insert_lesson(&lesson).await.unwrap();

        let loaded = store.get_lesson(&lesson.meta.id).await.unwrap().unwrap();
        assert_eq!(loaded.title_ar, "الضرب");
        assert_eq!(loaded.order, 3);
        assert!(store.get_lesson(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_filters_by_grade() {
        let (_dir, store) = store().await;
        store
            .import_lessons(vec![
                lesson(2, 1, "الجمع", "الجمع يعني وضع الأشياء معاً"),
                lesson(5, 1, "جمع الكسور", "الجمع في الكسور يتطلب مقامًا موحدًا"),
            ])
            .await
            .unwrap();

        let hits = store.search("الجمع", Some(2), 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "الجمع يعني وضع الأشياء معاً");
        assert_eq!(hits[0].grade_level, Some(2));
        assert_eq!(hits[0].title.as_deref(), Some("الجمع"));

        let all = store.search("الجمع", None, 5).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_search_ranks_title_hits_first_then_order() {
        let (_dir, store) = store().await;
        store
            .import_lessons(vec![
                lesson(3, 1, "مقدمة", "في هذا الدرس نتعلم الضرب"),
                lesson(3, 2, "الضرب", "الضرب جمع متكرر"),
                lesson(3, 3, "تمارين", "تمارين على الضرب"),
            ])
            .await
            .unwrap();

        let hits = store.search("الضرب", Some(3), 5).await.unwrap();
        let titles: Vec<_> = hits.iter().map(|h| h.title.clone().unwrap()).collect();
        assert_eq!(titles, vec!["الضرب", "مقدمة", "تمارين"]);
    }

    #[tokio::test]
    async fn test_search_keeps_late_title_hit_past_candidate_cap() {
        let (_dir, store) = store().await;
        let filler = MAX_CANDIDATES as i32 + 20;
        let mut lessons: Vec<NewLesson> = (1..=filler)
            .map(|i| lesson(6, i, "مراجعة", "تمرين يذكر النسبة في آخره"))
            .collect();
        lessons.push(lesson(6, filler + 100, "النسبة", "النسبة مقارنة بين كميتين"));
        store.import_lessons(lessons).await.unwrap();

        let hits = store.search("النسبة", Some(6), 3).await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].title.as_deref(), Some("النسبة"));
        assert_eq!(hits[1].title.as_deref(), Some("مراجعة"));
    }

    #[tokio::test]
    async fn test_search_respects_limit_and_empty_results() {
        let (_dir, store) = store().await;
        store
            .import_lessons((1..=4).map(|i| lesson(1, i, "العد", "العد حتى عشرة")).collect())
            .await
            .unwrap();

        assert_eq!(store.search("العد", Some(1), 2).await.unwrap().len(), 2);
        assert!(store.search("الهندسة", Some(1), 5).await.unwrap().is_empty());
        assert!(store.search("   ", Some(1), 5).await.unwrap().is_empty());
    }
}
