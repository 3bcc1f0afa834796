//! Curriculum `import` and `search` commands.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use tutor_core::content::store::ContentStore;
use tutor_types::entity::NewLesson;

use crate::state::AppState;

/// Parse a lessons file: a JSON array of lesson objects.
fn parse_lessons(raw: &str) -> Result<Vec<NewLesson>> {
    serde_json::from_str(raw).context("lessons file must be a JSON array of lessons")
}

/// Import lessons from a JSON file in a single transaction.
pub async fn import(state: &AppState, path: &Path, json: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let lessons = parse_lessons(&raw)?;

    let imported = state.store.import_lessons(lessons).await?;
    let total = state.store.count_lessons().await?;
    tracing::info!(imported, total, path = %path.display(), "Imported lessons");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "imported": imported,
                "total": total,
                "data_dir": state.data_dir.display().to_string(),
            }))?
        );
        return Ok(());
    }

    println!(
        "  {} Imported {} lessons ({} total) into {}",
        style("✓").green().bold(),
        style(imported).cyan(),
        total,
        style(state.data_dir.display()).dim()
    );
    Ok(())
}

/// Keyword search over imported lessons.
pub async fn search(
    state: &AppState,
    query: &str,
    grade: Option<i32>,
    limit: usize,
    json: bool,
) -> Result<()> {
    if let Some(grade) = grade {
        super::ask::check_grade(grade)?;
    }
    let items = state.store.search(query, grade, limit.max(1)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("  {}", style("No matching lessons.").dim());
        return Ok(());
    }

    println!();
    for (i, item) in items.iter().enumerate() {
        let title = item.title.as_deref().unwrap_or("-");
        let grade = item
            .grade_level
            .map(|g| format!(" (grade {g})"))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            style(format!("{}.", i + 1)).dim(),
            style(title).bold(),
            style(grade).dim()
        );
        println!("     {}", preview(&item.content, 120));
    }
    println!();
    Ok(())
}

/// First `max_chars` characters on one line.
fn preview(content: &str, max_chars: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{cut}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lessons() {
        let lessons = parse_lessons(
            r#"[
                {"chapter_id":"g1-c1","grade_level":1,"title_ar":"الجمع","content":"١ + ١ = ٢","order":1},
                {"chapter_id":"g1-c1","grade_level":1,"title":"Subtraction","title_ar":"الطرح","content":"٢ - ١ = ١"}
            ]"#,
        )
        .unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].order, 1);
        assert_eq!(lessons[1].order, 0);
        assert_eq!(lessons[1].title, "Subtraction");
    }

    #[test]
    fn test_parse_lessons_rejects_object() {
        assert!(parse_lessons(r#"{"grade_level":1}"#).is_err());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("سطر\nثاني", 20), "سطر ثاني");
        assert_eq!(preview("abcdef", 3), "abc…");
    }

    #[tokio::test]
    async fn test_import_then_search() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = AppState::build(tutor_types::config::AppConfig::default(), tmp.path())
            .await
            .unwrap();
        let file = tmp.path().join("lessons.json");
        tokio::fs::write(
            &file,
            r#"[{"chapter_id":"g2","grade_level":2,"title_ar":"الضرب","content":"الضرب جمع متكرر"}]"#,
        )
        .await
        .unwrap();

        import(&state, &file, true).await.unwrap();
        assert_eq!(state.store.count_lessons().await.unwrap(), 1);

        let items = state.store.search("الضرب", Some(2), 5).await.unwrap();
        assert_eq!(items.len(), 1);
        search(&state, "الضرب", Some(2), 5, true).await.unwrap();
    }
}
