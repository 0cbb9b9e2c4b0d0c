use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub keywords_path: PathBuf,
    pub notification_path: PathBuf,
    pub topics_cache_path: Option<PathBuf>,
    pub registry_path: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
    pub per_source_limit: usize,
    pub max_keywords: usize,
    pub trends_seeds_per_category: usize,
    pub news_api_key: Option<String>,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
}

impl AppConfig {
    /// Reddit client credentials, when both halves are configured.
    #[must_use]
    pub fn reddit_credentials(&self) -> Option<(&str, &str)> {
        match (&self.reddit_client_id, &self.reddit_client_secret) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("keywords_path", &self.keywords_path)
            .field("notification_path", &self.notification_path)
            .field("topics_cache_path", &self.topics_cache_path)
            .field("registry_path", &self.registry_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .field("per_source_limit", &self.per_source_limit)
            .field("max_keywords", &self.max_keywords)
            .field("trends_seeds_per_category", &self.trends_seeds_per_category)
            .field(
                "news_api_key",
                &self.news_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("reddit_client_id", &self.reddit_client_id)
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("reddit_user_agent", &self.reddit_user_agent)
            .finish()
    }
}
