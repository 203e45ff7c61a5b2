/// Validation errors for domain value objects and admin form input
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // ImagePath validation errors
    EmptyImagePath,
    ImagePathTooLong {
        actual: usize,
        max: usize,
    },
    InvalidImagePathCharacter(char),
    ImagePathStartsWithSlash,
    ImagePathContainsDoubleSlash,
    ImagePathNotRelative(String),

    // BucketName validation errors
    BucketNameTooShort {
        actual: usize,
        min: usize,
    },
    BucketNameTooLong {
        actual: usize,
        max: usize,
    },
    BucketNameInvalidEdge,
    BucketNameInvalidCharacter(char),
    BucketNameConsecutiveHyphens,

    // EntryId validation errors
    MalformedEntryId(String),

    // Form field errors
    InvalidField {
        field: String,
        value: String,
        expected: String,
    },
}

impl ValidationError {
    pub(crate) fn invalid_field(field: &str, value: &str, expected: &str) -> Self {
        ValidationError::InvalidField {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ImagePath errors
            ValidationError::EmptyImagePath => write!(f, "Image path cannot be empty"),
            ValidationError::ImagePathTooLong { actual, max } => {
                write!(f, "Image path too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidImagePathCharacter(c) => {
                write!(f, "Invalid character in image path: {:?}", c)
            }
            ValidationError::ImagePathStartsWithSlash => {
                write!(f, "Image path cannot start with '/'")
            }
            ValidationError::ImagePathContainsDoubleSlash => {
                write!(f, "Image path cannot contain '//'")
            }
            ValidationError::ImagePathNotRelative(path) => {
                write!(f, "Image path must be relative to the bucket: {}", path)
            }

            // BucketName errors
            ValidationError::BucketNameTooShort { actual, min } => {
                write!(
                    f,
                    "Bucket name too short: {} characters (min: {})",
                    actual, min
                )
            }
            ValidationError::BucketNameTooLong { actual, max } => {
                write!(
                    f,
                    "Bucket name too long: {} characters (max: {})",
                    actual, max
                )
            }
            ValidationError::BucketNameInvalidEdge => {
                write!(
                    f,
                    "Bucket name must start and end with lowercase letter or number"
                )
            }
            ValidationError::BucketNameInvalidCharacter(c) => {
                write!(
                    f,
                    "Invalid character in bucket name: '{}'. Only lowercase letters, numbers, and hyphens allowed",
                    c
                )
            }
            ValidationError::BucketNameConsecutiveHyphens => {
                write!(f, "Bucket name cannot contain consecutive hyphens")
            }

            ValidationError::MalformedEntryId(value) => {
                write!(f, "Malformed entry id: {}", value)
            }

            ValidationError::InvalidField {
                field,
                value,
                expected,
            } => {
                write!(
                    f,
                    "Invalid value for field '{}': '{}' (expected: {})",
                    field, value, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
