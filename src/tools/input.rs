//! `input` micro-format parsing
//!
//! Clients send every field of a tool in one string, joined by fixed
//! delimiters and sometimes prefixed with a label:
//!
//! | tool              | format                                                         |
//! |-------------------|----------------------------------------------------------------|
//! | title-generator   | `<keywords> \| Tone: <tone>`                                   |
//! | description-maker | `Title: <title> \| Keywords: <keywords> \| Details: <details>` |
//! | shorts-script     | `<topic> \| Style: <style>`                                    |
//! | thumbnail-ideas   | `<topic> \| Style: <style>`                                    |
//! | hashtag-finder    | `<topic> \| Competitors: <competitors>`                        |
//!
//! Parsing never fails. A missing required piece becomes an empty string and
//! a missing optional piece is treated like the `None` sentinel.

const TONE_DELIMITER: &str = " | Tone: ";
const STYLE_DELIMITER: &str = " | Style: ";
const COMPETITORS_DELIMITER: &str = " | Competitors: ";
const FIELD_DELIMITER: &str = " | ";

const TITLE_LABEL: &str = "Title: ";
const KEYWORDS_LABEL: &str = "Keywords: ";
const DETAILS_LABEL: &str = "Details: ";

/// Placeholder meaning "leave this detail out of the prompt"
pub const NONE_SENTINEL: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleInput {
    pub keywords: String,
    pub tone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionInput {
    pub title: String,
    pub keywords: String,
    pub details: Option<String>,
}

/// Shared by shorts-script and thumbnail-ideas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptInput {
    pub topic: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashtagInput {
    pub topic: String,
    pub competitors: Option<String>,
}

/// Split on every occurrence of `delimiter` and keep the first `N` pieces.
fn split_fields<'a, const N: usize>(input: &'a str, delimiter: &str) -> [Option<&'a str>; N] {
    let mut pieces = input.split(delimiter);
    std::array::from_fn(|_| pieces.next())
}

/// Remove the first occurrence of `label`, wherever it appears.
fn strip_label(piece: &str, label: &str) -> String {
    piece.replacen(label, "", 1)
}

fn optional(piece: Option<String>) -> Option<String> {
    piece.filter(|value| value != NONE_SENTINEL)
}

pub fn parse_title(input: &str) -> TitleInput {
    let [keywords, tone] = split_fields::<2>(input, TONE_DELIMITER);
    TitleInput {
        keywords: keywords.unwrap_or_default().to_string(),
        tone: tone.unwrap_or_default().to_string(),
    }
}

pub fn parse_description(input: &str) -> DescriptionInput {
    let [title, keywords, details] = split_fields::<3>(input, FIELD_DELIMITER);
    DescriptionInput {
        title: strip_label(title.unwrap_or_default(), TITLE_LABEL),
        keywords: strip_label(keywords.unwrap_or_default(), KEYWORDS_LABEL),
        details: optional(details.map(|d| strip_label(d, DETAILS_LABEL))),
    }
}

pub fn parse_script(input: &str) -> ScriptInput {
    let [topic, style] = split_fields::<2>(input, STYLE_DELIMITER);
    ScriptInput {
        topic: topic.unwrap_or_default().to_string(),
        style: style.unwrap_or_default().to_string(),
    }
}

pub fn parse_hashtag(input: &str) -> HashtagInput {
    let [topic, competitors] = split_fields::<2>(input, COMPETITORS_DELIMITER);
    HashtagInput {
        topic: topic.unwrap_or_default().to_string(),
        competitors: optional(competitors.map(ToString::to_string)),
    }
}
