//! Global configuration types.
//!
//! `LinghuaConfig` represents the `config.toml` in the data directory.
//! Every field has a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

/// Storage key of the persisted chat history record.
pub const DEFAULT_STORAGE_KEY: &str = "linghuaqian-chat";

/// Maximum number of persisted chat messages.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Simulated reply latency in milliseconds.
pub const DEFAULT_REPLY_DELAY_MS: u64 = 800;

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinghuaConfig {
    /// Delay before the canned reply is produced.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Cap on persisted chat messages; oldest are evicted first.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Key under which the chat history record is stored.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Fixed assistant greeting shown above the history.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Preset questions offered as quick replies.
    #[serde(default = "default_quick_replies")]
    pub quick_replies: Vec<String>,
}

fn default_reply_delay_ms() -> u64 {
    DEFAULT_REPLY_DELAY_MS
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_greeting() -> String {
    "您好！我是零花黔全能助手，有什么可以帮助您的吗？".to_string()
}

fn default_quick_replies() -> Vec<String> {
    vec![
        "自助洗车店怎么做营销？".to_string(),
        "洗车行业数据分析".to_string(),
        "帮我写一段洗车店引流文案".to_string(),
    ]
}

impl Default for LinghuaConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            history_limit: default_history_limit(),
            storage_key: default_storage_key(),
            greeting: default_greeting(),
            quick_replies: default_quick_replies(),
        }
    }
}
