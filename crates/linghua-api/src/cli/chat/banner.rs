//! Welcome banner display for chat sessions.

use console::style;

use super::renderer::ASSISTANT_NAME;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the assistant name, how many messages are stored, and the
/// numbered quick replies that `/quick N` sends.
pub fn print_welcome_banner(stored: usize, limit: usize, quick_replies: &[String]) {
    println!();
    println!(
        "  {} {}",
        style("🤖").bold(),
        style(format!("{ASSISTANT_NAME}全能助手")).red().bold()
    );
    println!("  {}", style("洗车行业营销 · 数据分析 · 文案创作").dim());
    println!();
    println!(
        "  {}  {}",
        style("History:").bold(),
        style(format!("{stored}/{limit} messages")).dim()
    );

    if !quick_replies.is_empty() {
        println!("  {}", style("Quick replies:").bold());
        for (i, text) in quick_replies.iter().enumerate() {
            println!("    {} {}", style(format!("[{}]", i + 1)).cyan(), style(text).dim());
        }
    }

    println!();
    println!(
        "  {}",
        style("Type /help for commands, /quick N to ask a quick question, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
}
