/// Configuration for connecting to a PostgREST-compatible API.
///
/// Read-only after construction; a client built from this never mutates it.
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Project base URL (e.g. `https://example.supabase.co`). Trailing
    /// slashes are stripped and `/rest/v1` is appended at client build time.
    pub base_url: String,
    /// API key, sent as the `apikey` header on every request.
    pub api_key: String,
    /// Optional bearer token. When set, it replaces the API key in the
    /// `Authorization` header; the `apikey` header is sent regardless.
    pub bearer_token: Option<String>,
}

impl RestConfig {
    /// Create a new config from a base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            bearer_token: None,
        }
    }

    /// Set a bearer token for the `Authorization` header.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// The value sent in the `Authorization` header.
    pub fn authorization(&self) -> String {
        let token = self.bearer_token.as_deref().unwrap_or(&self.api_key);
        format!("Bearer {}", token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = RestConfig::new("https://example.supabase.co", "anon-key");
        assert_eq!(config.base_url, "https://example.supabase.co");
        assert_eq!(config.api_key, "anon-key");
        assert!(config.bearer_token.is_none());
    }

    #[test]
    fn authorization_falls_back_to_api_key() {
        let config = RestConfig::new("https://example.supabase.co", "anon-key");
        assert_eq!(config.authorization(), "Bearer anon-key");
    }

    #[test]
    fn authorization_prefers_bearer_token() {
        let config =
            RestConfig::new("https://example.supabase.co", "anon-key").bearer_token("user-jwt");
        assert_eq!(config.authorization(), "Bearer user-jwt");
        assert_eq!(config.api_key, "anon-key");
    }
}
