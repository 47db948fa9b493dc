//! Prompt templates sent to the generation provider

use super::input::{DescriptionInput, HashtagInput, ScriptInput, TitleInput};

pub fn title_prompt(input: &TitleInput) -> String {
    format!(
        "Generate 15 high-CTR YouTube titles. Niche: {}. Tone: {}. Keep titles SEO friendly and emotional. Format as numbered list.",
        input.keywords, input.tone
    )
}

pub fn description_prompt(input: &DescriptionInput) -> String {
    let details = input
        .details
        .as_ref()
        .map(|details| format!("Additional details: {details}"))
        .unwrap_or_default();
    format!(
        "Write a keyword-rich YouTube description. Video Title: {}. Keywords: {}. {details} Include SEO keywords, timestamps, and call to action. Make it engaging and professional.",
        input.title, input.keywords
    )
}

pub fn shorts_script_prompt(input: &ScriptInput) -> String {
    format!(
        "Create a 45-60 second YouTube Shorts script. Topic: {}. Style: {}. Make it fast paced, hook in first 3 seconds. Include timing cues [0-3s], [3-10s], etc.",
        input.topic, input.style
    )
}

pub fn thumbnail_prompt(input: &ScriptInput) -> String {
    format!(
        "Generate 10 high-CTR thumbnail ideas for YouTube. Topic: {}. Style: {}. Include color suggestions and emotional triggers. Format as numbered list.",
        input.topic, input.style
    )
}

pub fn hashtag_prompt(input: &HashtagInput) -> String {
    let competitors = input
        .competitors
        .as_ref()
        .map(|competitors| format!("Consider competitors: {competitors}."))
        .unwrap_or_default();
    format!(
        "Generate the 30 best YouTube hashtags. Topic: {}. {competitors} Include SEO variations and trending hashtags.",
        input.topic
    )
}

pub fn video_tags_prompt(title: &str) -> String {
    format!(
        "Generate 20 relevant YouTube tags for a video titled: \"{title}\". Make them SEO-friendly and related to the content."
    )
}
