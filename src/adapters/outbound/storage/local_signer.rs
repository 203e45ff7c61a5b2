use chrono::{DateTime, Utc};

use crate::domain::value_objects::ImagePath;

/// Why a media request was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    Expired,
    Mismatch,
}

impl std::fmt::Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureError::Expired => write!(f, "Signed URL has expired"),
            SignatureError::Mismatch => write!(f, "Signature does not match"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Signs media URLs served by this application's own `/media` route.
///
/// Used when the backing store has no presigner of its own (in-memory).
/// The token is `md5(secret:path:expires)` in hex. That is a salted hash,
/// not a keyed MAC: good enough for development media, but it must not
/// guard production media. Use the store's native presigner there.
#[derive(Debug, Clone)]
pub struct LocalUrlSigner {
    secret: String,
    base_url: String,
}

impl LocalUrlSigner {
    pub fn new(secret: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn token(&self, path: &ImagePath, expires: i64) -> String {
        let input = format!("{}:{}:{}", self.secret, path, expires);
        format!("{:x}", md5::compute(input.as_bytes()))
    }

    pub fn sign(&self, path: &ImagePath, expires_at: DateTime<Utc>) -> String {
        let expires = expires_at.timestamp();
        let encoded: Vec<String> = path
            .as_str()
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        format!(
            "{}/media/{}?expires={}&signature={}",
            self.base_url,
            encoded.join("/"),
            expires,
            self.token(path, expires)
        )
    }

    pub fn verify(
        &self,
        path: &ImagePath,
        expires: i64,
        signature: &str,
        now: DateTime<Utc>,
    ) -> Result<(), SignatureError> {
        if !tokens_match(&self.token(path, expires), &signature.to_ascii_lowercase()) {
            return Err(SignatureError::Mismatch);
        }
        if now.timestamp() > expires {
            return Err(SignatureError::Expired);
        }
        Ok(())
    }
}

/// Compares every byte regardless of where the first difference is
fn tokens_match(expected: &str, given: &str) -> bool {
    expected.len() == given.len()
        && expected
            .bytes()
            .zip(given.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signature_of(url: &str) -> (i64, String) {
        let query = url.split_once('?').unwrap().1;
        let mut expires = 0;
        let mut signature = String::new();
        for pair in query.split('&') {
            match pair.split_once('=').unwrap() {
                ("expires", v) => expires = v.parse().unwrap(),
                ("signature", v) => signature = v.to_string(),
                _ => {}
            }
        }
        (expires, signature)
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = LocalUrlSigner::new("secret", "http://localhost:3000/");
        let path = ImagePath::new("kv/summer campaign.png".to_string()).unwrap();
        let now = Utc::now();

        let url = signer.sign(&path, now + Duration::seconds(300));
        assert!(url.starts_with("http://localhost:3000/media/kv/summer%20campaign.png?expires="));

        let (expires, signature) = signature_of(&url);
        assert_eq!(signer.verify(&path, expires, &signature, now), Ok(()));
        assert_eq!(
            signer.verify(&path, expires, &signature, now + Duration::seconds(301)),
            Err(SignatureError::Expired)
        );
        assert_eq!(
            signer.verify(&path, expires + 1, &signature, now),
            Err(SignatureError::Mismatch)
        );

        let other = LocalUrlSigner::new("other", "http://localhost:3000");
        assert_eq!(
            other.verify(&path, expires, &signature, now),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("0a1b", "0a1b"));
        assert!(!tokens_match("0a1b", "0a1c"));
        assert!(!tokens_match("0a1b", "0a1"));
        assert!(!tokens_match("", "0"));
    }
}
