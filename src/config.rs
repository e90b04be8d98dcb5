use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Site root; kept apart from the working directory, which holds `.env`.
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Per-IP quota for the lead endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Seconds after which one request of the quota is replenished.
    pub replenish_secs: u64,
    /// Requests a single client may send in a burst.
    pub burst_size: u32,
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    pub telegram_api_url: String,
    pub telegram_timeout_secs: Option<u64>,
    pub static_dir: PathBuf,
    pub rate_limit: Option<RateLimit>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("telegram_bot_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("telegram_timeout_secs", &self.telegram_timeout_secs)
            .field("static_dir", &self.static_dir)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Telegram API URL: {}", config.telegram_api_url);
        tracing::debug!("Telegram chat: {}", config.telegram_chat_id);
        tracing::debug!("Static directory: {}", config.static_dir.display());
        match config.rate_limit {
            Some(limit) => tracing::debug!(
                "Lead rate limit: burst {}, one request per {}s",
                limit.burst_size,
                limit.replenish_secs
            ),
            None => tracing::warn!("Lead rate limiting disabled"),
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match non_blank("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            None => DEFAULT_PORT,
        };

        let telegram_bot_token = non_blank("TELEGRAM_BOT_TOKEN")
            .map(|token| token.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("TELEGRAM_BOT_TOKEN environment variable required"))?;

        let telegram_chat_id = non_blank("TELEGRAM_CHAT_ID")
            .map(|chat| chat.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("TELEGRAM_CHAT_ID environment variable required"))?;

        let telegram_api_url = non_blank("TELEGRAM_API_URL")
            .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string());
        let parsed = url::Url::parse(telegram_api_url.trim())
            .map_err(|e| anyhow::anyhow!("TELEGRAM_API_URL is not a valid URL: {}", e))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("TELEGRAM_API_URL must start with http:// or https://");
        }
        let telegram_api_url = telegram_api_url.trim().trim_end_matches('/').to_string();

        let telegram_timeout_secs = non_blank("TELEGRAM_TIMEOUT_SECS")
            .map(|secs| parse_positive(&secs, "TELEGRAM_TIMEOUT_SECS"))
            .transpose()?;

        let static_dir = non_blank("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let replenish_secs: u64 = match non_blank("LEAD_RATE_LIMIT_REPLENISH_SECS") {
            Some(secs) => secs.trim().parse().map_err(|_| {
                anyhow::anyhow!("LEAD_RATE_LIMIT_REPLENISH_SECS must be a non-negative integer")
            })?,
            None => 2,
        };
        let burst_size = match non_blank("LEAD_RATE_LIMIT_BURST") {
            Some(burst) => u32::try_from(parse_positive(&burst, "LEAD_RATE_LIMIT_BURST")?)
                .map_err(|_| anyhow::anyhow!("LEAD_RATE_LIMIT_BURST is too large"))?,
            None => 10,
        };
        // Zero replenish interval switches the limiter off
        let rate_limit = (replenish_secs > 0).then_some(RateLimit {
            replenish_secs,
            burst_size,
        });

        Ok(Self {
            port,
            telegram_bot_token,
            telegram_chat_id,
            telegram_api_url,
            telegram_timeout_secs,
            static_dir,
            rate_limit,
        })
    }
}

fn parse_positive(value: &str, key: &str) -> anyhow::Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => anyhow::bail!("{} must be a positive integer", key),
    }
}
