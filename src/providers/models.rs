// Chat-completions wire types shared by both providers
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};

/// Chat-completions request with a single user turn.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    /// Target model identifier (e.g., "gpt-4o").
    pub model: String,

    pub messages: Vec<ChatMessage>,

    /// Output cap; omitted when the provider default should apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// One part of a multimodal user message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatCompletionRequest {
    /// Build the text-prompt-plus-inline-image request used by every provider.
    pub fn with_image(
        model: impl Into<String>,
        prompt: impl Into<String>,
        data_url: impl Into<String>,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: prompt.into(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: data_url.into(),
                        },
                    },
                ],
            }],
            max_tokens,
        }
    }
}

/// Only the fields needed to reach `choices[0].message.content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Generated text, or an empty string when the provider returned none.
    pub fn content(&self) -> String {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .unwrap_or_default()
    }
}
