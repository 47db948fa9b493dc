//! Content-creation tools
//!
//! Each request names one tool; the dispatcher turns the request into a
//! prompt, calls the generation provider and shapes the result.

mod dispatcher;
mod error;
pub mod input;
pub mod prompt;
pub mod tags;

pub use dispatcher::Dispatcher;
#[cfg(test)]
pub(crate) use dispatcher::testing;
pub use error::{DispatchError, TagExtractionError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of supported tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    TitleGenerator,
    DescriptionMaker,
    ShortsScript,
    ThumbnailIdeas,
    HashtagFinder,
    TagExtractor,
}

impl Tool {
    pub const ALL: [Self; 6] = [
        Self::TitleGenerator,
        Self::DescriptionMaker,
        Self::ShortsScript,
        Self::ThumbnailIdeas,
        Self::HashtagFinder,
        Self::TagExtractor,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TitleGenerator => "title-generator",
            Self::DescriptionMaker => "description-maker",
            Self::ShortsScript => "shorts-script",
            Self::ThumbnailIdeas => "thumbnail-ideas",
            Self::HashtagFinder => "hashtag-finder",
            Self::TagExtractor => "tag-extractor",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| DispatchError::InvalidTool(s.to_string()))
    }
}

/// JSON body accepted by the tool endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ToolRequest {
    #[serde(default, deserialize_with = "deserialize_tool")]
    pub tool: Option<String>,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Accept any JSON value for `tool` so a wrong type is reported as an
/// invalid tool rather than invalid JSON. Falsy values count as missing.
#[allow(clippy::float_cmp)]
fn deserialize_tool<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(name) => Some(name),
        serde_json::Value::Number(ref n) if n.as_f64().is_some_and(|f| f == 0.0) => None,
        other => Some(other.to_string()),
    })
}

/// Generated result, serialized under the `result` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Text(String),
    Tags(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(tool.as_str().parse::<Tool>().unwrap(), tool);
        }
    }

    #[test]
    fn test_tool_field_accepts_any_json_type() {
        let parse = |body: &str| serde_json::from_str::<ToolRequest>(body).unwrap().tool;
        assert_eq!(parse(r#"{"tool":"shorts-script"}"#).as_deref(), Some("shorts-script"));
        assert_eq!(parse(r#"{"tool":42}"#).as_deref(), Some("42"));
        assert_eq!(parse(r#"{"tool":["title-generator"]}"#).as_deref(), Some(r#"["title-generator"]"#));
        assert_eq!(parse(r#"{"tool":null}"#), None);
        assert_eq!(parse(r#"{"tool":false}"#), None);
        assert_eq!(parse(r#"{"tool":0}"#), None);
        assert_eq!(parse(r#"{"input":"x"}"#), None);
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let err = "video-editor".parse::<Tool>().unwrap_err();
        assert!(matches!(err, DispatchError::InvalidTool(ref name) if name == "video-editor"));
        assert!("Title-Generator".parse::<Tool>().is_err());
    }

    #[test]
    fn test_tool_request_fields_are_optional() {
        let req: ToolRequest = serde_json::from_str(r#"{"tool":"tag-extractor"}"#).unwrap();
        assert_eq!(req.tool.as_deref(), Some("tag-extractor"));
        assert!(req.input.is_none());
        assert!(req.url.is_none());

        let empty: ToolRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ToolRequest::default());
    }

    #[test]
    fn test_output_serialization() {
        let text = serde_json::json!({ "result": ToolOutput::Text("hi".to_string()) });
        assert_eq!(text.to_string(), r#"{"result":"hi"}"#);

        let tags = serde_json::json!({
            "result": ToolOutput::Tags(vec!["a".to_string(), "b".to_string()])
        });
        assert_eq!(tags.to_string(), r#"{"result":["a","b"]}"#);
    }
}
