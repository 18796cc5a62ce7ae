use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),
}

/// Settings shared by every email: where links and images point to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    server_url: String,
}

impl EmailSettings {
    /// `server_url` must be an absolute http(s) URL; a trailing `/` is dropped.
    pub fn new(server_url: impl Into<String>) -> Result<Self, EmailError> {
        let raw = server_url.into();
        let trimmed = raw.trim().trim_end_matches('/');

        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .ok_or_else(|| EmailError::InvalidServerUrl(raw.clone()))?;

        if host.is_empty() || host.starts_with('/') || host.chars().any(char::is_whitespace) {
            return Err(EmailError::InvalidServerUrl(raw));
        }

        Ok(Self {
            server_url: trimmed.to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Absolute URL for a server-relative `path`.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.server_url, path)
        } else {
            format!("{}/{}", self.server_url, path)
        }
    }
}
