//! In-memory HTML rendering of the chat panel.
//!
//! `HtmlTranscript` is a [`ChatView`] that builds the message-list markup of
//! the assistant page: one bubble per message, user bubbles right-aligned
//! with a person avatar, assistant bubbles left-aligned with a robot avatar.
//! It also records the send-control state and notices so the controller can
//! be exercised without a terminal, and exports a standalone page.

use std::sync::{Mutex, MutexGuard};

use linghua_types::chat::ChatRole;

use super::view::ChatView;

const USER_AVATAR: &str = r#"<div class="w-8 h-8 rounded-full bg-gray-300 flex items-center justify-center flex-shrink-0 ml-3"><i class="fa fa-user text-gray-600 text-sm"></i></div>"#;
const ASSISTANT_AVATAR: &str = r#"<div class="w-8 h-8 rounded-full bg-red-100 flex items-center justify-center flex-shrink-0 mr-3"><i class="fa fa-robot text-red-600 text-sm"></i></div>"#;

/// One rendered message bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub role: ChatRole,
    pub content: String,
}

impl Bubble {
    /// Markup for this bubble. `content` is inserted as-is.
    pub fn to_html(&self) -> String {
        match self.role {
            ChatRole::User => format!(
                r#"<div class="flex mb-4 user-msg"><div class="msg-content rounded-lg p-3 max-w-[80%]"><p>{}</p></div>{}</div>"#,
                self.content, USER_AVATAR
            ),
            ChatRole::Assistant => format!(
                r#"<div class="flex mb-4 ai-msg">{}<div class="msg-content rounded-lg p-3 max-w-[80%]"><p>{}</p></div></div>"#,
                ASSISTANT_AVATAR, self.content
            ),
        }
    }
}

#[derive(Debug, Default)]
struct TranscriptState {
    bubbles: Vec<Bubble>,
    /// Index of the bubble scrolled into view.
    scroll_to: Option<usize>,
    busy: bool,
    notices: Vec<String>,
    inputs_cleared: usize,
}

/// A [`ChatView`] backed by an in-memory bubble list.
#[derive(Debug)]
pub struct HtmlTranscript {
    state: Mutex<TranscriptState>,
    confirm_answer: bool,
}

impl HtmlTranscript {
    /// A transcript that answers every confirmation with "yes".
    pub fn new() -> Self {
        Self::with_confirm(true)
    }

    /// A transcript that answers every confirmation with `answer`.
    pub fn with_confirm(answer: bool) -> Self {
        Self {
            state: Mutex::new(TranscriptState::default()),
            confirm_answer: answer,
        }
    }

    fn state(&self) -> MutexGuard<'_, TranscriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn bubbles(&self) -> Vec<Bubble> {
        self.state().bubbles.clone()
    }

    pub fn len(&self) -> usize {
        self.state().bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the bubble currently scrolled into view.
    pub fn scroll_position(&self) -> Option<usize> {
        self.state().scroll_to
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    pub fn notices(&self) -> Vec<String> {
        self.state().notices.clone()
    }

    pub fn inputs_cleared(&self) -> usize {
        self.state().inputs_cleared
    }

    /// Markup of the message-list container.
    pub fn to_html(&self) -> String {
        let state = self.state();
        let mut out = String::from(r#"<div id="chat-container" class="chat-container">"#);
        for bubble in &state.bubbles {
            out.push('\n');
            out.push_str(&bubble.to_html());
        }
        out.push_str("\n</div>");
        out
    }

    /// A standalone HTML page containing the transcript.
    ///
    /// `title` is trusted text (it comes from configuration, not users).
    pub fn to_page(&self, title: &str) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="zh-CN">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>{title}</title>
<style>
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;background:#f9fafb;margin:0;padding:24px}}
.chat-container{{max-width:720px;margin:0 auto;display:flex;flex-direction:column}}
.flex{{display:flex}}.mb-4{{margin-bottom:16px}}
.user-msg{{justify-content:flex-end}}
.msg-content{{padding:12px;border-radius:8px;max-width:80%;white-space:pre-wrap}}
.user-msg .msg-content{{background:#dc2626;color:#fff}}
.ai-msg .msg-content{{background:#f3f4f6;color:#1f2937}}
.msg-content p{{margin:0}}
.w-8{{width:32px;height:32px;border-radius:50%;flex-shrink:0}}
.ml-3{{margin-left:12px;background:#d1d5db}}.mr-3{{margin-right:12px;background:#fee2e2}}
</style>
</head>
<body>
<h1>{title}</h1>
{body}
</body>
</html>
"##,
            body = self.to_html()
        )
    }
}

impl Default for HtmlTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for HtmlTranscript {
    fn reset(&self) {
        let mut state = self.state();
        state.bubbles.clear();
        state.scroll_to = None;
    }

    fn render(&self, role: ChatRole, content: &str) {
        let mut state = self.state();
        state.bubbles.push(Bubble {
            role,
            content: content.to_string(),
        });
        state.scroll_to = Some(state.bubbles.len() - 1);
    }

    fn notify(&self, message: &str) {
        self.state().notices.push(message.to_string());
    }

    fn confirm(&self, _prompt: &str) -> bool {
        self.confirm_answer
    }

    fn set_busy(&self, busy: bool) {
        self.state().busy = busy;
    }

    fn clear_input(&self) {
        self.state().inputs_cleared += 1;
    }
}
