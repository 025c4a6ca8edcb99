pub mod gemini;

pub use gemini::{GeminiClient, ImageError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageStyle {
    Plain,
    /// Anime illustration, the old waifu-diffusion look.
    Waifu,
}

#[derive(Clone, Debug)]
pub struct ImageRequest {
    pub prompt: String,
    pub style: ImageStyle,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>, style: ImageStyle) -> Self {
        Self {
            prompt: prompt.into(),
            style,
        }
    }

    /// Prompt text sent to the backend, with the style hint applied.
    pub fn backend_prompt(&self) -> String {
        match self.style {
            ImageStyle::Plain => self.prompt.clone(),
            ImageStyle::Waifu => format!(
                "Anime style illustration, detailed character art, vibrant colors: {}",
                self.prompt
            ),
        }
    }

    /// Attachment name for the generated picture.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .prompt
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .take(64)
            .collect();
        let stem = stem.trim_matches('_');
        if stem.is_empty() {
            "image.png".to_string()
        } else {
            format!("{stem}.png")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_prompt_untouched() {
        let req = ImageRequest::new("a dog scooping", ImageStyle::Plain);
        assert_eq!(req.backend_prompt(), "a dog scooping");
    }

    #[test]
    fn test_waifu_prompt_has_style_hint() {
        let req = ImageRequest::new("a dog scooping", ImageStyle::Waifu);
        assert!(req.backend_prompt().starts_with("Anime style"));
        assert!(req.backend_prompt().ends_with("a dog scooping"));
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let req = ImageRequest::new("a cat/dog?", ImageStyle::Plain);
        assert_eq!(req.file_name(), "a_cat_dog.png");
        let req = ImageRequest::new("???", ImageStyle::Plain);
        assert_eq!(req.file_name(), "image.png");
    }
}
