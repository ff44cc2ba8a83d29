//! Results of the two creative panels.

use serde::{Deserialize, Serialize};

/// Generated marketing copy for a theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyDraft {
    pub theme: String,
    pub title: String,
    pub body: String,
    pub call_to_action: String,
}

impl CopyDraft {
    /// Render as the numbered block shown in the result panel.
    pub fn to_text(&self) -> String {
        format!(
            "【{}】\n1. 标题：{}\n2. 内容：{}\n3. 结尾：{}",
            self.theme, self.title, self.body, self.call_to_action
        )
    }
}

/// Progress of an image request. Only the placeholder state exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    Placeholder,
}

/// An accepted image-generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub description: String,
    pub status: ImageStatus,
}
