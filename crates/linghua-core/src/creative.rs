//! Copy-generation and image-generation panels.
//!
//! Both panels validate their single text input and fill a fixed template.
//! Nothing is generated by a model.

use linghua_types::creative::{CopyDraft, ImageRequest, ImageStatus};
use linghua_types::error::CreativeError;

/// Notice shown when the copy theme is empty.
pub const EMPTY_THEME_NOTICE: &str = "请输入创作主题！";

/// Notice shown when the image description is empty.
pub const EMPTY_DESCRIPTION_NOTICE: &str = "请输入图片描述！";

/// Fill the copy template for `theme`.
///
/// The theme is trimmed and inserted as plain text; callers displaying it as
/// markup must escape it.
pub fn generate_copy(theme: &str) -> Result<CopyDraft, CreativeError> {
    let theme = theme.trim();
    if theme.is_empty() {
        return Err(CreativeError::EmptyTheme);
    }

    Ok(CopyDraft {
        theme: theme.to_string(),
        title: format!("{theme}这样做，效果提升80%"),
        body: format!(
            "结合本地流量特点，{theme}的核心是抓住用户痛点，用低价体验吸引到店，用会员锁客长期消费。"
        ),
        call_to_action: "点击评论区链接，领取专属优惠！".to_string(),
    })
}

/// Accept an image request for `description`. No image is produced; the
/// request comes back in the placeholder state.
pub fn request_image(description: &str) -> Result<ImageRequest, CreativeError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(CreativeError::EmptyDescription);
    }

    Ok(ImageRequest {
        description: description.to_string(),
        status: ImageStatus::Placeholder,
    })
}

/// User-facing notice for a validation failure.
pub fn notice_for(err: &CreativeError) -> &'static str {
    match err {
        CreativeError::EmptyTheme => EMPTY_THEME_NOTICE,
        CreativeError::EmptyDescription => EMPTY_DESCRIPTION_NOTICE,
    }
}
