use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use lesson_core::model::{AudioData, GeneratedLesson, ImageData, Topic};

use super::ContentProvider;
use crate::error::ProviderError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub text_model: String,
    pub image_model: String,
    pub tts_model: String,
    pub voice: String,
}

impl GeminiConfig {
    /// Read the backend configuration from `LEARN_AI_*` variables.
    ///
    /// Returns `None` when no API key is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("LEARN_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let var_or = |name: &str, default: &str| env::var(name).unwrap_or_else(|_| default.into());
        Some(Self {
            base_url: var_or("LEARN_AI_BASE_URL", DEFAULT_BASE_URL),
            api_key,
            text_model: var_or("LEARN_AI_TEXT_MODEL", "gemini-2.5-flash"),
            image_model: var_or("LEARN_AI_IMAGE_MODEL", "gemini-2.5-flash-image"),
            tts_model: var_or("LEARN_AI_TTS_MODEL", "gemini-2.5-flash-preview-tts"),
            voice: var_or("LEARN_AI_VOICE", "Kore"),
        })
    }
}

/// `ContentProvider` backed by the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: Option<GeminiConfig>,
}

impl GeminiProvider {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeminiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeminiConfig>) -> Self {
        // Generation itself has no deadline; only connecting does.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn generate(
        &self,
        model: impl Fn(&GeminiConfig) -> &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let config = self.config.as_ref().ok_or(ProviderError::Disabled)?;
        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            model(config)
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::HttpStatus(response.status()));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn generate_lesson_content(
        &self,
        topic: Topic,
        concept: &str,
    ) -> Result<GeneratedLesson, ProviderError> {
        let request = GenerateRequest {
            system_instruction: Some(Content::text(lesson_instruction(topic, concept))),
            contents: vec![Content::text(format!("Generate lesson for: {concept}"))],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(lesson_schema()),
                ..GenerationConfig::default()
            },
        };

        let response = self.generate(|c| c.text_model.as_str(), &request).await?;
        let text = response
            .parts()
            .find_map(|part| part.text.as_deref())
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)?;

        Ok(serde_json::from_str(text)?)
    }

    async fn generate_image(&self, prompt: &str, topic: Topic) -> Option<ImageData> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(image_prompt(prompt, topic))],
            generation_config: GenerationConfig {
                image_config: Some(json!({ "aspectRatio": "1:1" })),
                ..GenerationConfig::default()
            },
        };

        match self.generate(|c| c.image_model.as_str(), &request).await {
            Ok(response) => {
                let image = response.parts().find_map(|part| part.inline_data.as_ref()).map(
                    |data| {
                        ImageData::new(
                            data.mime_type.as_deref().unwrap_or("image/png"),
                            data.data.clone(),
                        )
                    },
                );
                if image.is_none() {
                    warn!(%topic, "image generation returned no image part");
                }
                image
            }
            Err(err) => {
                warn!(%topic, error = %err, "image generation failed; continuing without image");
                None
            }
        }
    }

    async fn generate_speech(&self, text: &str) -> Option<AudioData> {
        let request = GenerateRequest {
            system_instruction: None,
            contents: vec![Content::text(text.to_string())],
            generation_config: GenerationConfig {
                response_modalities: Some(vec!["AUDIO"]),
                speech_config: self.config.as_ref().map(|c| {
                    json!({ "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": c.voice } } })
                }),
                ..GenerationConfig::default()
            },
        };

        match self.generate(|c| c.tts_model.as_str(), &request).await {
            Ok(response) => {
                let audio = response
                    .parts()
                    .find_map(|part| part.inline_data.as_ref())
                    .map(|data| AudioData::new(data.data.clone()));
                debug!(found = audio.is_some(), "speech generated");
                audio
            }
            Err(err) => {
                warn!(error = %err, "speech generation failed; continuing silently");
                None
            }
        }
    }
}

fn lesson_instruction(topic: Topic, concept: &str) -> String {
    format!(
        r#"You are a gentle Montessori teacher for a 2-year-old.
I have selected a specific concept for you to teach: "{concept}".
The general topic is: "{topic}".

Rules for JSON Output:
1. 'concept': This is the text displayed to the child and the expected answer.
   - It MUST be the SIMPLEST form.
   - If topic is Animals, Objects, Fruit, Vegetables: Use ONLY the noun (e.g. "Horse", NOT "Baby Horse"; "Apple", NOT "Red Apple").
   - If topic is Numbers: Use the digit (e.g. "5").
   - If topic is Colors: Use the color name (e.g. "Green").
   - If topic is Alphabet: Use the format "Letter for Object" (e.g. "S for Sun").

2. 'question': Keep it under 5 words.
   - "What is this?"
   - "What animal is this?"
   - "How many?"
   - "What color?"

3. 'imagePrompt':
   - PHOTOREALISTIC, REAL PHOTOGRAPHY ONLY.
   - Soft natural lighting or studio lighting.
   - White or soft cream background.
   - NO CARTOONS, NO ILLUSTRATIONS, NO 3D RENDERS, NO HIGH CONTRAST.
   - If topic is Numbers (e.g. "Number 5"): The prompt MUST specify "5 distinct objects arranged in a flat lay grid or line, totally separated, non-overlapping, seen from top-down". Do NOT stack objects.
   - If topic is Alphabet: Show "the real Object and a wooden block with the Letter"."#
    )
}

fn lesson_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "concept": {
                "type": "STRING",
                "description": "The simple word to teach (e.g. 'Horse', '5', 'Red', 'A for Apple')"
            },
            "question": { "type": "STRING", "description": "The simple question to ask" },
            "imagePrompt": {
                "type": "STRING",
                "description": "Prompt for generating a realistic image"
            }
        },
        "required": ["concept", "question", "imagePrompt"]
    })
}

fn image_prompt(prompt: &str, topic: Topic) -> String {
    let mut full = format!(
        "{prompt}. Photorealistic, 8k, highly detailed, soft studio lighting, isolated on white \
         background. Real photography. NOT cartoon, NOT illustration, NOT drawing, NOT cgi."
    );
    if topic == Topic::Alphabet {
        full.push_str(" Show the real object next to a wooden letter block.");
    }
    if topic == Topic::Numbers {
        full.push_str(
            " Objects must be completely separate, distinct, and countable. No stacks. Flat lay.",
        );
    } else {
        full.push_str(" Show only ONE single isolated object. Center frame.");
    }
    full
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

impl Content {
    fn text(text: String) -> Self {
        Self {
            parts: vec![TextPart { text }],
        }
    }
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Parts of the first candidate, the only one requested.
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|content| content.parts.iter())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}
