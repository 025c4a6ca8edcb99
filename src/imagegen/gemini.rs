use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent";

#[derive(Debug)]
pub enum ImageError {
    Http(reqwest::Error),
    Api(String),
    Decode(base64::DecodeError),
    NoImage,
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Api(e) => write!(f, "API error: {e}"),
            Self::Decode(e) => write!(f, "could not decode image: {e}"),
            Self::NoImage => write!(f, "the model did not return an image"),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<reqwest::Error> for ImageError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<base64::DecodeError> for ImageError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Decode(e)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct Request {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
}

// --- Response types ---

#[derive(Deserialize)]
struct Response {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

fn extract_image(response: Response) -> Result<Vec<u8>, ImageError> {
    if let Some(err) = response.error {
        return Err(ImageError::Api(err.message));
    }

    let data = response
        .candidates
        .into_iter()
        .flatten()
        .filter_map(|c| c.content)
        .filter_map(|c| c.parts)
        .flatten()
        .find_map(|p| p.inline_data)
        .ok_or(ImageError::NoImage)?;

    Ok(base64::engine::general_purpose::STANDARD.decode(data.data)?)
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Text-to-image client for the Gemini image model.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Generates one PNG for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<Vec<u8>, ImageError> {
        info!("generating image: {prompt}");

        let request = Request {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        };

        let resp = self
            .client
            .post(format!("{API_URL}?key={}", self.api_key))
            .json(&request)
            .send()
            .await?;

        debug!("image backend status: {}", resp.status());
        let response: Response = resp.json().await?;

        let image = extract_image(response)?;
        info!("image generated: {} bytes", image.len());
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Response {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_extract_image_decodes_inline_data() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"here"},{"inlineData":{"mimeType":"image/png","data":"aGVsbG8="}}]}}]}"#,
        );
        assert_eq!(extract_image(response).unwrap(), b"hello");
    }

    #[test]
    fn test_extract_image_reports_api_error() {
        let response = parse(r#"{"error":{"message":"quota exceeded"}}"#);
        let err = extract_image(response).unwrap_err();
        assert_eq!(err.to_string(), "API error: quota exceeded");
    }

    #[test]
    fn test_extract_image_without_image() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#);
        assert!(matches!(extract_image(response), Err(ImageError::NoImage)));
    }
}
