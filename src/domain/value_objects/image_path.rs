use crate::domain::errors::ValidationError;

/// Legacy prefixes that older rows carry in front of the bucket-relative path.
const LEGACY_PREFIXES: [&str; 3] = ["/", "public/", "key-visuals/"];

const MAX_PATH_LEN: usize = 1024;

const MAX_EXTENSION_LEN: usize = 8;

/// A validated, bucket-relative path of a stored key visual.
///
/// Never an absolute or signed URL: signing happens at read time only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePath(String);

impl ImagePath {
    /// Create a new ImagePath with validation
    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::EmptyImagePath);
        }

        if value.len() > MAX_PATH_LEN {
            return Err(ValidationError::ImagePathTooLong {
                actual: value.len(),
                max: MAX_PATH_LEN,
            });
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(ValidationError::InvalidImagePathCharacter(c));
        }

        if value.starts_with('/') {
            return Err(ValidationError::ImagePathStartsWithSlash);
        }

        if value.contains("//") {
            return Err(ValidationError::ImagePathContainsDoubleSlash);
        }

        if value.contains("://") || value.split('/').any(|segment| segment == "..") {
            return Err(ValidationError::ImagePathNotRelative(value));
        }

        Ok(Self(value))
    }

    /// Parse a stored path, stripping the legacy `/`, `public/` and
    /// `key-visuals/` prefixes some rows still carry.
    pub fn normalize(raw: &str) -> Result<Self, ValidationError> {
        let mut rest = raw.trim();
        for prefix in LEGACY_PREFIXES {
            if let Some(stripped) = rest.strip_prefix(prefix) {
                rest = stripped;
            }
        }
        Self::new(rest.to_string())
    }

    /// Generate a fresh, collision-free storage path for an uploaded file.
    ///
    /// The original file name is only consulted for its extension; when it has
    /// none the content type decides, falling back to `bin`.
    pub fn generate(original_name: Option<&str>, content_type: Option<&str>) -> Self {
        let extension = original_name
            .and_then(extension_of)
            .or_else(|| content_type.and_then(extension_for_content_type))
            .unwrap_or_else(|| "bin".to_string());

        Self(format!("{}.{}", uuid::Uuid::new_v4(), extension))
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return None;
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

fn extension_for_content_type(content_type: &str) -> Option<String> {
    let ext = match content_type.split(';').next()?.trim() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "image/svg+xml" => "svg",
        _ => return None,
    };
    Some(ext.to_string())
}

impl TryFrom<String> for ImagePath {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ImagePath::new(value)
    }
}

impl From<ImagePath> for String {
    fn from(path: ImagePath) -> Self {
        path.0
    }
}

impl std::fmt::Display for ImagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_image_path() {
        assert!(ImagePath::new("a1b2.jpg".to_string()).is_ok());
        assert!(ImagePath::new("2024/05/visual.png".to_string()).is_ok());
    }

    #[test]
    fn test_invalid_image_path() {
        assert!(ImagePath::new("".to_string()).is_err());
        assert!(ImagePath::new("/leading-slash.png".to_string()).is_err());
        assert!(ImagePath::new("double//slash.png".to_string()).is_err());
        assert!(ImagePath::new("null\0byte".to_string()).is_err());
        assert!(ImagePath::new("../escape.png".to_string()).is_err());
        assert!(ImagePath::new("https://cdn.example.com/a.png".to_string()).is_err());
        assert!(ImagePath::new("x".repeat(1025)).is_err());
    }

    #[test]
    fn test_normalize_strips_legacy_prefixes() {
        let path = ImagePath::normalize("key-visuals/abc.png").unwrap();
        assert_eq!(path.as_str(), "abc.png");

        let path = ImagePath::normalize("/public/key-visuals/abc.png").unwrap();
        assert_eq!(path.as_str(), "abc.png");

        let path = ImagePath::normalize("abc.png").unwrap();
        assert_eq!(path.as_str(), "abc.png");
    }

    #[test]
    fn test_generate_never_reuses_file_name() {
        let first = ImagePath::generate(Some("poster.PNG"), Some("image/png"));
        let second = ImagePath::generate(Some("poster.PNG"), Some("image/png"));

        assert_ne!(first, second);
        assert!(first.as_str().ends_with(".png"));
        assert!(!first.as_str().contains("poster"));
    }

    #[test]
    fn test_generate_extension_fallbacks() {
        let from_type = ImagePath::generate(Some("noextension"), Some("image/webp"));
        assert!(from_type.as_str().ends_with(".webp"));

        let unknown = ImagePath::generate(None, None);
        assert!(unknown.as_str().ends_with(".bin"));

        let hostile = ImagePath::generate(Some("evil.p/h?p"), Some("image/jpeg"));
        assert!(hostile.as_str().ends_with(".jpg"));
    }
}
