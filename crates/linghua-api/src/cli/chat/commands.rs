//! Slash commands understood by the chat prompt.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    Help,
    /// `None` lists the quick replies; `Some(n)` sends the n-th, counting from 1.
    Quick(Option<usize>),
    /// Clear the persisted history after confirmation.
    ClearHistory,
    ClearScreen,
    /// Report how many messages are stored.
    History,
    Exit,
    /// Unrecognised command, or a bad argument; carries the message to show.
    Unknown(String),
}

/// Usage line and description for each command, in help order.
const HELP: &[(&str, &str)] = &[
    ("/help", "显示命令列表"),
    ("/quick [N]", "列出快捷提问，或发送第 N 条"),
    ("/clear", "清空对话记录（需确认）"),
    ("/cls", "清屏"),
    ("/history", "查看已保存的消息数"),
    ("/exit", "结束对话"),
];

/// Parse a prompt line as a slash command.
///
/// Returns `None` for anything that isn't one, so the caller sends it as a
/// message.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let line = input.trim().strip_prefix('/')?;
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "h" | "?" => ChatCommand::Help,
        "quick" | "qr" if arg.is_empty() => ChatCommand::Quick(None),
        "quick" | "qr" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => ChatCommand::Quick(Some(n)),
            _ => ChatCommand::Unknown(format!("/quick expects a number from 1, got '{arg}'")),
        },
        "clear" => ChatCommand::ClearHistory,
        "cls" => ChatCommand::ClearScreen,
        "history" => ChatCommand::History,
        "exit" | "quit" | "q" => ChatCommand::Exit,
        _ => ChatCommand::Unknown(format!("/{name}")),
    };
    Some(command)
}

pub fn print_help() {
    let width = HELP.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);

    println!();
    println!("  {}", style("可用命令:").bold());
    println!();
    for (usage, description) in HELP {
        println!("  {}  {}", style(format!("{usage:<width$}")).cyan(), description);
    }
    println!();
    println!("  {}", style("Ctrl+D 退出（等待回复完成），Ctrl+C 不会丢失消息").dim());
    println!();
}

/// Print the numbered quick replies.
pub fn print_quick_replies(quick_replies: &[String]) {
    println!();
    println!("  {}", style("快捷提问:").bold());
    for (i, text) in quick_replies.iter().enumerate() {
        println!("  {} {}", style(format!("[{}]", i + 1)).cyan(), text);
    }
    println!();
}
