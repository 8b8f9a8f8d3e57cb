use std::error::Error;
use std::fmt;

pub const API_KEY_ENV: &str = "API_KEY";
pub const API_KEY_PREFIX: &str = "sk-or-";

const QUICK_FIXES: &[&str] = &[
    "export API_KEY=sk-or-...        # Set the key in your shell",
    "echo 'API_KEY=sk-or-...' > .env # Or keep it in a local .env file",
];

/// Bearer token for the completion endpoint.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate a raw key: it must be present, non-blank and carry the
    /// provider prefix.
    pub fn parse(raw: Option<&str>) -> Result<Self, CredentialError> {
        let key = raw
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(CredentialError::missing)?;
        if !key.starts_with(API_KEY_PREFIX) {
            return Err(CredentialError::malformed());
        }
        Ok(Self(key.to_string()))
    }

    /// Read the key from the process environment.
    pub fn from_env() -> Result<Self, CredentialError> {
        let raw = std::env::var(API_KEY_ENV).ok();
        Self::parse(raw.as_deref())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug)]
pub struct CredentialError {
    message: String,
    quick_fixes: &'static [&'static str],
}

impl CredentialError {
    pub fn missing() -> Self {
        Self::new(format!(
            "Missing API key: the {API_KEY_ENV} environment variable is not set."
        ))
    }

    pub fn malformed() -> Self {
        Self::new(format!(
            "Invalid API key: {API_KEY_ENV} must start with '{API_KEY_PREFIX}'."
        ))
    }

    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            quick_fixes: QUICK_FIXES,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CredentialError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prefixed_key() {
        let key = ApiKey::parse(Some("  sk-or-v1-abc \n")).expect("valid key");
        assert_eq!(key.expose(), "sk-or-v1-abc");
    }

    #[test]
    fn rejects_missing_or_blank_key() {
        let err = ApiKey::parse(None).expect_err("missing key");
        assert!(err.to_string().starts_with("Missing API key"));
        assert!(ApiKey::parse(Some("   ")).is_err());
    }

    #[test]
    fn rejects_key_without_prefix() {
        let err = ApiKey::parse(Some("sk-proj-123")).expect_err("wrong prefix");
        assert!(err.to_string().contains(API_KEY_PREFIX));
        assert!(!err.quick_fixes().is_empty());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let key = ApiKey::parse(Some("sk-or-secret")).expect("valid key");
        assert!(!format!("{key:?}").contains("secret"));
    }
}
