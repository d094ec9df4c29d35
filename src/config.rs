//! Configuration types.
//!
//! Everything is read from the process environment once at startup and is
//! immutable afterwards.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::Weekday;
use chrono_tz::Tz;
use secrecy::SecretString;

use crate::error::ConfigError;

/// Default GroupMe API base URL.
pub const DEFAULT_API_URL: &str = "https://api.groupme.com";

/// Default GroupMe image service base URL.
pub const DEFAULT_IMAGE_URL: &str = "https://image.groupme.com";

/// Where the bingo terms come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSource {
    /// Terms inline in one string, separated by `;;;`.
    Inline(String),
    /// A file with one term per line.
    File(PathBuf),
}

/// GroupMe credentials and endpoints.
#[derive(Debug, Clone)]
pub struct GroupMeConfig {
    pub access_token: SecretString,
    pub bot_id: String,
    pub api_url: String,
    pub image_url: String,
}

/// Headless Chrome settings.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub chrome_bin: PathBuf,
    pub window_size: (u32, u32),
    pub timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chrome_bin: PathBuf::from("google-chrome"),
            window_size: (600, 600),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RenderConfig {
    /// Read `GOOGLE_CHROME_BIN`, `RENDER_WINDOW_SIZE` and `RENDER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let chrome_bin = std::env::var("GOOGLE_CHROME_BIN")
            .map(PathBuf::from)
            .unwrap_or(defaults.chrome_bin);

        let window_size = match std::env::var("RENDER_WINDOW_SIZE") {
            Ok(raw) => parse_window_size(&raw)?,
            Err(_) => defaults.window_size,
        };

        let timeout = match std::env::var("RENDER_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(parse_value("RENDER_TIMEOUT_SECS", &raw)?),
            Err(_) => defaults.timeout,
        };

        Ok(Self {
            chrome_bin,
            window_size,
            timeout,
        })
    }
}

/// Trigger configuration for the request classifier.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    /// Phrase that requests a bingo card.
    pub call_phrase: String,
    /// Sender allowed to trigger the link response.
    pub link_user_id: String,
    /// Words that trigger the link response, already lowercased.
    pub link_callwords: Vec<String>,
    /// Day of the week the link response is active.
    pub link_weekday: Weekday,
    /// Zone used to compute the local weekday of a message.
    pub timezone: Tz,
    /// Phrase that requests the keepers response; `None` disables it.
    pub keeper_call_phrase: Option<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            call_phrase: "Bingo me".to_string(),
            link_user_id: "-1".to_string(),
            link_callwords: vec!["send".to_string()],
            link_weekday: Weekday::Wed,
            timezone: chrono_tz::America::Chicago,
            keeper_call_phrase: None,
        }
    }
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub groupme: GroupMeConfig,
    pub triggers: TriggerConfig,
    /// Candidate replies for the link response.
    pub link_responses: Vec<String>,
    /// Reply for the keepers response.
    pub keeper_response: String,
    pub term_source: TermSource,
    /// Label of the center cell.
    pub free_space: String,
    pub render: RenderConfig,
    pub port: u16,
}

impl BotConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = require_env("API_KEY")?;
        let bot_id = require_env("BOT_ID")?.trim().to_string();

        let groupme = GroupMeConfig {
            access_token: SecretString::from(access_token),
            bot_id,
            api_url: env_or("GROUPME_API_URL", DEFAULT_API_URL),
            image_url: env_or("GROUPME_IMAGE_URL", DEFAULT_IMAGE_URL),
        };

        let defaults = TriggerConfig::default();

        let link_weekday = match std::env::var("GROUP_CALL_DAY_OF_THE_WEEK") {
            Ok(raw) => parse_weekday(&raw)?,
            Err(_) => defaults.link_weekday,
        };

        let timezone = match std::env::var("BOT_TIMEZONE") {
            Ok(raw) => Tz::from_str(raw.trim()).map_err(|_| ConfigError::InvalidValue {
                key: "BOT_TIMEZONE".into(),
                message: format!("{raw} (expected IANA zone like America/Chicago)"),
            })?,
            Err(_) => defaults.timezone,
        };

        let keeper_call_phrase = std::env::var("KEEPER_CALL_PHRASE")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let triggers = TriggerConfig {
            call_phrase: env_or("CALL_PHRASE", &defaults.call_phrase),
            link_user_id: env_or("USER_LINK_ID", &defaults.link_user_id),
            link_callwords: split_list(&env_or("LINK_CALLWORDS", "send"), ",")
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect(),
            link_weekday,
            timezone,
            keeper_call_phrase,
        };

        let term_source = match std::env::var("BINGO_TEXT") {
            Ok(inline) => TermSource::Inline(inline),
            Err(_) => TermSource::File(PathBuf::from(env_or(
                "BINGO_TERMS_FILE",
                "sample_terms.txt",
            ))),
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => parse_value("PORT", &raw)?,
            Err(_) => 5000,
        };

        Ok(Self {
            groupme,
            triggers,
            link_responses: split_list(&std::env::var("LINK_RESPONSE_TEXT").unwrap_or_default(), ";"),
            keeper_response: std::env::var("KEEPER_RESPONSE_TEXT").unwrap_or_default(),
            term_source,
            free_space: env_or("FREE_SPACE_TEXT", crate::cards::model::DEFAULT_FREE_SPACE),
            render: RenderConfig::from_env()?,
            port,
        })
    }
}

fn require_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

/// Split a delimited list, trimming entries and dropping empty ones.
pub fn split_list(raw: &str, delimiter: &str) -> Vec<String> {
    raw.split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a weekday number where 0 is Monday and 6 is Sunday.
pub fn parse_weekday(raw: &str) -> Result<Weekday, ConfigError> {
    const WEEK: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    let n: usize = parse_value("GROUP_CALL_DAY_OF_THE_WEEK", raw)?;
    WEEK.get(n).copied().ok_or_else(|| ConfigError::InvalidValue {
        key: "GROUP_CALL_DAY_OF_THE_WEEK".into(),
        message: format!("{n} is out of range 0 (Monday) to 6 (Sunday)"),
    })
}

/// Parse `W,H` (or `WxH`) into a window size.
pub fn parse_window_size(raw: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        key: "RENDER_WINDOW_SIZE".into(),
        message: format!("{raw} (expected WIDTH,HEIGHT)"),
    };
    let (w, h) = raw
        .split_once(',')
        .or_else(|| raw.split_once('x'))
        .ok_or_else(invalid)?;
    let w = w.trim().parse().map_err(|_| invalid())?;
    let h = h.trim().parse().map_err(|_| invalid())?;
    Ok((w, h))
}
