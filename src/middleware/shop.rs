use crate::error::ApiError;

/// Validates a shop domain such as `demo-shop.myshopify.com`: lowercase ASCII
/// letters, digits, hyphens and dots, at least two labels, no empty label and no
/// label starting or ending with a hyphen.
pub fn is_valid_shop(s: &str) -> bool {
    let len = s.len();
    if !(3..=255).contains(&len) {
        return false;
    }
    let labels: Vec<&str> = s.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-')
        })
}

/// Lowercases and validates a shop identifier coming from outside the process.
pub fn normalize_shop(raw: &str) -> Result<String, ApiError> {
    let shop = raw.trim().to_lowercase();
    if shop.is_empty() {
        return Err(ApiError::Validation("Missing shop parameter".into()));
    }
    if !is_valid_shop(&shop) {
        return Err(ApiError::Validation("Invalid shop identifier".into()));
    }
    Ok(shop)
}
