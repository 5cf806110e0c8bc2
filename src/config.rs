/// Session cookie/TTL settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    /// When false (default) a user gets one review per course and
    /// resubmission replaces it; when true every submission is a new row.
    pub allow_multiple_reviews: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            ttl_minutes: std::env::var("SESSION_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 7),
            cookie_secure: std::env::var("SESSION_COOKIE_SECURE")
                .map(|v| v == "true")
                .unwrap_or(false),
        };
        let allow_multiple_reviews = std::env::var("ALLOW_MULTIPLE_REVIEWS")
            .map(|v| v == "true")
            .unwrap_or(false);
        Ok(Self {
            database_url,
            session,
            allow_multiple_reviews,
        })
    }
}
