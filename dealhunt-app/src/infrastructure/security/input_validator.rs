use crate::domain::DealDraft;
use crate::infrastructure::api::ImageUpload;
use dealhunt_errors::AppError;

const MAX_URL_LENGTH: usize = 2048;
const MAX_TITLE_LENGTH: usize = 120;
const MAX_DESCRIPTION_LENGTH: usize = 2000;
const MAX_IMAGES_PER_DEAL: usize = 5;

const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

const USERNAME_PATTERN: &str = r"^[A-Za-z0-9_]{3,20}$";
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub struct InputValidator;

impl InputValidator {
    /// Validate and normalize a deal link before it is submitted.
    pub fn validate_deal_url(url: &str) -> Result<String, AppError> {
        let url = url.trim();

        if url.is_empty() {
            return Err(AppError::InvalidInput("Deal link is required".to_string()));
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(AppError::InvalidInput("Deal link is too long".to_string()));
        }

        let parsed = url::Url::parse(url)
            .map_err(|_| AppError::InvalidInput("Deal link is not a valid URL".to_string()))?;

        let scheme = parsed.scheme().to_lowercase();
        if !ALLOWED_SCHEMES.contains(&scheme.as_str()) {
            return Err(AppError::InvalidInput(
                "Only HTTP and HTTPS links are allowed".to_string(),
            ));
        }

        let Some(host) = parsed.host_str() else {
            return Err(AppError::InvalidInput(
                "Deal link must have a host".to_string(),
            ));
        };

        if host == "localhost" || host.starts_with("127.") || host.starts_with("192.168.") {
            tracing::warn!("rejected local deal link: {}", url);
            return Err(AppError::InvalidInput(
                "Local links are not allowed".to_string(),
            ));
        }

        Ok(parsed.to_string())
    }

    pub fn validate_draft(draft: &DealDraft) -> Result<(), AppError> {
        Self::validate_deal_url(&draft.deal_url)?;

        if draft.title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title is required".to_string()));
        }
        if draft.title.len() > MAX_TITLE_LENGTH {
            return Err(AppError::InvalidInput("Title is too long".to_string()));
        }

        if let Some(description) = &draft.description {
            if description.len() > MAX_DESCRIPTION_LENGTH {
                return Err(AppError::InvalidInput(
                    "Description is too long".to_string(),
                ));
            }
        }

        for price in [draft.price, draft.original_price].into_iter().flatten() {
            if !price.is_finite() || price < 0.0 {
                return Err(AppError::InvalidInput(
                    "Prices must be non-negative".to_string(),
                ));
            }
        }

        if draft
            .category_name
            .as_deref()
            .is_none_or(|c| c.trim().is_empty())
        {
            return Err(AppError::InvalidInput("Category is required".to_string()));
        }

        Ok(())
    }

    pub fn validate_username(username: &str) -> Result<(), AppError> {
        if !matches_pattern(USERNAME_PATTERN, username) {
            return Err(AppError::InvalidInput(
                "Usernames are 3-20 letters, digits or underscores".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_email(email: &str) -> Result<(), AppError> {
        if !matches_pattern(EMAIL_PATTERN, email.trim()) {
            return Err(AppError::InvalidInput(
                "Enter a valid email address".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_images(images: &[ImageUpload]) -> Result<(), AppError> {
        if images.len() > MAX_IMAGES_PER_DEAL {
            return Err(AppError::InvalidInput(format!(
                "At most {MAX_IMAGES_PER_DEAL} images per deal"
            )));
        }
        for image in images {
            if image.bytes.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "Image {} is empty",
                    image.file_name
                )));
            }
            if !image.content_type.starts_with("image/") {
                return Err(AppError::InvalidInput(format!(
                    "{} is not an image",
                    image.file_name
                )));
            }
        }
        Ok(())
    }
}

fn matches_pattern(pattern: &str, input: &str) -> bool {
    regex_lite::Regex::new(pattern)
        .map(|re| re.is_match(input))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_url() {
        assert!(InputValidator::validate_deal_url("https://shopee.com.my/deal/1").is_ok());
        assert!(InputValidator::validate_deal_url("http://example.com/path").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        assert!(InputValidator::validate_deal_url("").is_err());
        assert!(InputValidator::validate_deal_url("not-a-url").is_err());
        assert!(InputValidator::validate_deal_url("ftp://example.com").is_err());
        assert!(InputValidator::validate_deal_url("http://localhost/deal").is_err());
    }

    #[test]
    fn test_draft_requires_title_and_category() {
        let draft = DealDraft::new(
            "https://example.com/deal".to_string(),
            "Half-price blender".to_string(),
        )
        .with_category(Some("Home & Living".to_string()));
        assert!(InputValidator::validate_draft(&draft).is_ok());

        let untitled = DealDraft::new("https://example.com/deal".to_string(), "  ".to_string())
            .with_category(Some("Other".to_string()));
        assert!(InputValidator::validate_draft(&untitled).is_err());

        let uncategorized = DealDraft::new(
            "https://example.com/deal".to_string(),
            "Half-price blender".to_string(),
        );
        assert!(InputValidator::validate_draft(&uncategorized).is_err());
    }

    #[test]
    fn test_negative_prices_rejected() {
        let draft = DealDraft::new(
            "https://example.com/deal".to_string(),
            "Blender".to_string(),
        )
        .with_category(Some("Other".to_string()))
        .with_price(Some(-5.0));
        assert!(InputValidator::validate_draft(&draft).is_err());
    }

    #[test]
    fn test_username_format() {
        assert!(InputValidator::validate_username("deal_hunter99").is_ok());
        assert!(InputValidator::validate_username("ab").is_err());
        assert!(InputValidator::validate_username("has spaces").is_err());
    }

    #[test]
    fn test_email_format() {
        assert!(InputValidator::validate_email("user@example.com").is_ok());
        assert!(InputValidator::validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_image_batch_limits() {
        let image = |name: &str| ImageUpload {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0u8; 4],
        };

        let five: Vec<_> = (0..5).map(|i| image(&format!("{i}.png"))).collect();
        assert!(InputValidator::validate_images(&five).is_ok());

        let six: Vec<_> = (0..6).map(|i| image(&format!("{i}.png"))).collect();
        assert!(InputValidator::validate_images(&six).is_err());

        let mut not_image = image("doc.pdf");
        not_image.content_type = "application/pdf".to_string();
        assert!(InputValidator::validate_images(&[not_image]).is_err());
    }
}
