//! Prompt text for scripts and hooks.

use suggestor_common::Platform;

pub const SYSTEM_PREAMBLE: &str = "You are a helpful assistant.";

const SCRIPT_STYLE: &str = "\
- Simple, human language for a wide audience
- Copy the general language style of the original {source}
- Keep it engaging and natural";

const NO_EMOJIS: &str = "- Dont add emojis or other non-text elements";

const HOOK_TAIL: &str = "\
- Don't add emojis unless they're in the original
- Don't add hashtags unless they're in the original
- Dont make a hook that's too long
- Dont add a hook that's too wordy";

/// Brand spelling used inside prompts.
pub fn brand_name(platform: Platform) -> &'static str {
    match platform {
        Platform::Twitter => "Twitter",
        Platform::Instagram => "Instagram",
        Platform::Linkedin => "LinkedIn",
        Platform::Youtube => "YouTube",
        Platform::Tiktok => "TikTok",
    }
}

fn style(source: &str) -> String {
    SCRIPT_STYLE.replace("{source}", source)
}

/// Rewrite a thread. `tweets` is already laid out as `Tweet N: text` blocks.
pub fn script_thread(tweets: &str) -> String {
    format!(
        "You are an expert copywriter creating a Twitter thread. \n\
I'll give you an original thread as inspiration. Please rewrite it for me using:\n\
{style}\n\
- Format it clearly as a thread with numbered steps\n\
- Each tweet should be concise and impactful\n\
- Maintain the core message and flow of the original\n\
- Ensure proper spacing and formatting for readability\n\
{NO_EMOJIS}\n\
\n\
Original thread:\n\
{tweets}\n\
\n\
Please create a new version based on this content, formatted as a proper Twitter thread with numbered tweets.",
        style = style("thread"),
    )
}

/// Rewrite a text post (single tweet, LinkedIn post).
pub fn script_text(platform: Platform, text: &str) -> String {
    format!(
        "You are an expert copywriter creating content for {platform}. \n\
I'll give you a post as inspiration. Please rewrite it for me using:\n\
{style}\n\
- Format the content well with proper spacing\n\
- Maintain the core message and tone\n\
{NO_EMOJIS}\n\
\n\
Original post:\n\
{text}\n\
\n\
Please create a new version based on this content with improved formatting.",
        platform = platform.as_str(),
        style = style("text"),
    )
}

/// Rewrite a video from its transcript.
pub fn script_video(platform: Platform, transcript: &str) -> String {
    format!(
        "You are an expert copywriter creating content for {platform}. \n\
I'll give you a video transcript as inspiration. Please rewrite it for me using:\n\
{style}\n\
- Format the content well with proper spacing\n\
- Maintain the core message and tone\n\
{NO_EMOJIS}\n\
\n\
Video transcript:\n\
{transcript}\n\
\n\
Please create a new version based on this content with improved formatting.",
        platform = platform.as_str(),
        style = style("content"),
    )
}

/// Attention-grabbing opener for a post, tuned per platform.
pub fn hook(platform: Platform, content: &str) -> String {
    let (goal, rules) = match platform {
        Platform::Twitter => (
            "grabs attention and encourages engagement",
            "- Keep it short and impactful (under 280 characters)\n\
- Use curiosity or emotion to draw readers in\n\
- Make it relevant to the content",
        ),
        Platform::Instagram => (
            "grabs attention and encourages engagement",
            "- Keep it engaging and conversational\n\
- Use curiosity or emotion to draw readers in\n\
- Make it relevant to the content\n\
- Consider using questions or statements that encourage comments",
        ),
        Platform::Linkedin => (
            "grabs attention and encourages professional engagement",
            "- Keep it professional but engaging\n\
- Use curiosity or value proposition to draw readers in\n\
- Make it relevant to professionals and career-focused audience\n\
- Consider using questions or statements that encourage thoughtful comments",
        ),
        Platform::Youtube => (
            "grabs attention and encourages clicks",
            "- Keep it engaging and curiosity-driven\n\
- Make it relevant to the video content\n\
- Encourage viewers to watch the video",
        ),
        Platform::Tiktok => (
            "grabs attention and encourages engagement",
            "- Keep it short, snappy, and attention-grabbing\n\
- Use trending language or slang if appropriate\n\
- Make it relevant to the content\n\
- Encourage users to engage (like, comment, share)",
        ),
    };

    format!(
        "You are a professional hook writer who makes catchy hooks for {brand} content.\n\
Based on this data, what would be a good hook that {goal}?\n\
\n\
Content data:\n\
{content}\n\
\n\
Rules:\n\
{rules}\n\
{HOOK_TAIL}",
        brand = brand_name(platform),
    )
}
