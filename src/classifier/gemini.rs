use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use log::{debug, error};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ClassifierError;
use crate::models::ClassificationResult;
use crate::settings::ClassifierSettings;

use super::{parse_classification, Classifier};

const API_KEY_HEADER: &str = "x-goog-api-key";

const PROMPT: &str = "Analyze the object in this image. Identify the item, determine if it's \
recyclable, and classify its category (Recyclable, Organic, Hazardous, or General Waste). \
Provide a recyclability score. Give instructions for disposal, suggest eco-friendly \
alternatives, and offer a relevant eco-tip. Respond in JSON format according to the provided \
schema.";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Classifier backed by Gemini's `generateContent` endpoint with a JSON
/// response schema.
pub struct GeminiClassifier {
    client: Client,
    settings: ClassifierSettings,
    api_key: Option<String>,
}

impl GeminiClassifier {
    /// Accepts a shared HTTP client so connections are pooled.
    pub fn new(client: Client, settings: ClassifierSettings, api_key: Option<String>) -> Self {
        Self {
            client,
            settings,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// The key travels in a header so it never shows up in the URL that
    /// reqwest errors print.
    fn request(&self, api_key: &str, image: &[u8], media_type: &str) -> RequestBuilder {
        self.client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&self.build_request_body(image, media_type))
    }

    fn build_request_body(&self, image: &[u8], media_type: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    {
                        "inlineData": {
                            "mimeType": media_type,
                            "data": general_purpose::STANDARD.encode(image),
                        }
                    },
                    { "text": PROMPT }
                ]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
                "temperature": self.settings.temperature,
            }
        })
    }
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "itemName": {
                "type": "STRING",
                "description": "The name of the item identified in the image."
            },
            "recyclable": {
                "type": "STRING",
                "enum": ["Yes", "No", "Uncertain"],
                "description": "Whether the item is recyclable."
            },
            "category": {
                "type": "STRING",
                "enum": ["Recyclable", "Organic", "Hazardous", "General Waste"],
                "description": "Classify the item into one of the categories: Recyclable, Organic, Hazardous, or General Waste."
            },
            "recyclabilityScore": {
                "type": "NUMBER",
                "description": "A score from 0 to 100 indicating how recyclable the item is. Higher is better."
            },
            "instructions": {
                "type": "STRING",
                "description": "Detailed recycling instructions if applicable, or proper disposal instructions if not."
            },
            "alternatives": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of eco-friendly alternatives to the item."
            },
            "ecoFriendlyTip": {
                "type": "STRING",
                "description": "A relevant eco-friendly tip related to the item or its category."
            }
        },
        "required": [
            "itemName",
            "recyclable",
            "category",
            "recyclabilityScore",
            "instructions",
            "alternatives",
            "ecoFriendlyTip"
        ]
    })
}

/// Joins the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, ClassifierError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ClassifierError::Malformed(
            "response contained no text candidate".into(),
        ));
    }
    Ok(text)
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn classify(
        &self,
        image: &[u8],
        media_type: &str,
    ) -> Result<ClassificationResult, ClassifierError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(ClassifierError::NotConfigured)?;

        debug!(
            "Sending {} byte {} image to {}",
            image.len(),
            media_type,
            self.settings.model
        );

        let response = self
            .request(api_key, image, media_type)
            .send()
            .await
            .map_err(|err| {
                let err = err.without_url();
                error!("Error analyzing image with Gemini API: {err}");
                ClassifierError::Transport(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API returned {status}: {body}");
            return Err(ClassifierError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| ClassifierError::Malformed(err.without_url().to_string()))?;

        parse_classification(&extract_text(payload)?)
    }
}
