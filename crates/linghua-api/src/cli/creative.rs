//! Content and image pages: template-filled generation panels.

use anyhow::Result;
use console::style;

use linghua_core::creative::{self, notice_for};
use linghua_types::error::CreativeError;

/// Generate copy for `theme` and print the result panel.
///
/// An empty theme prints the validation notice and is not an error.
pub fn generate_copy(theme: &str, json: bool) -> Result<()> {
    match creative::generate_copy(theme) {
        Ok(draft) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&draft)?);
            } else {
                println!();
                for line in draft.to_text().lines() {
                    println!("  {line}");
                }
                println!();
            }
            Ok(())
        }
        Err(err) => print_notice(&err, json),
    }
}

/// Accept an image request and print the placeholder panel.
pub fn request_image(description: &str, json: bool) -> Result<()> {
    match creative::request_image(description) {
        Ok(request) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&request)?);
            } else {
                println!();
                println!(
                    "  {} {}",
                    style("描述:").bold(),
                    style(&request.description).cyan()
                );
                println!(
                    "  {}",
                    style("图片生成示例：对接真实图片生成 API 后将在此显示结果。").dim()
                );
                println!();
            }
            Ok(())
        }
        Err(err) => print_notice(&err, json),
    }
}

fn print_notice(err: &CreativeError, json: bool) -> Result<()> {
    tracing::debug!(error = %err, "Creative panel input rejected");
    if json {
        let result = serde_json::json!({ "error": notice_for(err) });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        eprintln!("\n  {} {}\n", style("!").yellow().bold(), notice_for(err));
    }
    Ok(())
}
