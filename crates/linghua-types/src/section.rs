//! Page sections reachable from the navigation bar.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A top-level page section. Exactly one is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Home,
    Chat,
    Data,
    Content,
    Image,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Home,
        Section::Chat,
        Section::Data,
        Section::Content,
        Section::Image,
    ];

    /// Navigation label as shown in the page header.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Home => "首页",
            Section::Chat => "智能对话",
            Section::Data => "数据分析",
            Section::Content => "内容创作",
            Section::Image => "图片生成",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Home => write!(f, "home"),
            Section::Chat => write!(f, "chat"),
            Section::Data => write!(f, "data"),
            Section::Content => write!(f, "content"),
            Section::Image => write!(f, "image"),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Section::Home),
            "chat" => Ok(Section::Chat),
            "data" => Ok(Section::Data),
            "content" | "copy" => Ok(Section::Content),
            "image" => Ok(Section::Image),
            other => Err(format!("invalid section: '{other}'")),
        }
    }
}
