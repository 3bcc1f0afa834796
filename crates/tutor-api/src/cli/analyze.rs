//! `analyze-image` command.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use tutor_types::llm::ImageInput;

use super::ask::cancel_on_ctrl_c;
use crate::state::AppState;

/// Media type from `--media-type`, else from the file extension.
fn media_type(path: &Path, explicit: Option<String>) -> Result<String> {
    if let Some(media_type) = explicit {
        return Ok(media_type);
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageInput::media_type_for_extension)
        .map(str::to_string)
        .with_context(|| {
            format!(
                "cannot infer image type of {}; pass --media-type",
                path.display()
            )
        })
}

pub async fn analyze_image(
    state: &AppState,
    path: &Path,
    explicit_media_type: Option<String>,
    json: bool,
) -> Result<()> {
    let media_type = media_type(path, explicit_media_type)?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let image = ImageInput::new(media_type, data);

    let (cancel, ctrl_c) = cancel_on_ctrl_c();
    let outcome = state.tutor.analyze_math_image(&image, &cancel).await;
    ctrl_c.abort();
    let analysis = outcome.into_result()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Problem:").bold(), analysis.problem_text);
    println!("  {} {}", style("Type:").bold(), analysis.problem_type);
    for equation in &analysis.equations {
        println!("  {} {}", style("=").cyan(), equation);
    }
    if !analysis.given.is_empty() {
        println!("  {} {}", style("Given:").bold(), analysis.given.join("، "));
    }
    if !analysis.required.is_empty() {
        println!("  {} {}", style("Required:").bold(), analysis.required);
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(
            media_type(Path::new("homework.JPG"), None).unwrap(),
            "image/jpeg"
        );
        assert_eq!(media_type(Path::new("a.png"), None).unwrap(), "image/png");
    }

    #[test]
    fn test_explicit_media_type_wins() {
        assert_eq!(
            media_type(Path::new("scan.bin"), Some("image/webp".into())).unwrap(),
            "image/webp"
        );
    }

    #[test]
    fn test_unknown_extension_is_error() {
        assert!(media_type(Path::new("notes.txt"), None).is_err());
        assert!(media_type(Path::new("no_extension"), None).is_err());
    }
}
