// src/config/mod.rs
// Service configuration loaded from the environment (and .env), with defaults
// for everything except the API credential.

use once_cell::sync::Lazy;
use std::str::FromStr;
use std::time::Duration;

use crate::llm::GenerationSettings;
use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_SECRET_KEY: &str = "echo-muse-therapeutic-storytelling-2024";

#[derive(Debug, Clone)]
pub struct EchoMuseConfig {
    // ── Gemini
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,

    // ── Story generation
    pub story_max_tokens: u32,
    pub story_temperature: f32,
    pub story_top_p: f32,

    // ── Sessions
    pub secret_key: String,

    // ── Database
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Server
    pub debug: bool,
    pub host: String,
    pub port: u16,

    // ── Logging
    pub log_level: String,
}

// Values may carry trailing comments and whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl EchoMuseConfig {
    pub fn from_env() -> Self {
        // A missing .env is normal in production
        let _ = dotenvy::dotenv();

        Self {
            gemini_api_key: env_var_opt("GEMINI_API_KEY"),
            gemini_model: env_var_or("GEMINI_MODEL", DEFAULT_MODEL.to_string()),
            gemini_base_url: env_var_or("GEMINI_BASE_URL", DEFAULT_BASE_URL.to_string()),
            gemini_timeout_secs: env_var_or("GEMINI_TIMEOUT_SECS", 120),
            story_max_tokens: env_var_or("ECHO_MUSE_STORY_MAX_TOKENS", 1000),
            story_temperature: env_var_or("ECHO_MUSE_STORY_TEMPERATURE", 0.7),
            story_top_p: env_var_or("ECHO_MUSE_STORY_TOP_P", 0.9),
            secret_key: env_var_opt("SECRET_KEY").unwrap_or_else(|| DEFAULT_SECRET_KEY.to_string()),
            database_url: env_var_or("DATABASE_URL", "sqlite:echo_muse.db".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 5),
            debug: env_var_or("ECHO_MUSE_DEBUG", true),
            host: env_var_or("ECHO_MUSE_HOST", "0.0.0.0".to_string()),
            port: env_var_or("ECHO_MUSE_PORT", 5000),
            log_level: env_var_or("ECHO_MUSE_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn gemini_timeout(&self) -> Duration {
        Duration::from_secs(self.gemini_timeout_secs)
    }

    /// Sampling settings with the standard safety filters.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            max_output_tokens: self.story_max_tokens,
            temperature: self.story_temperature,
            top_p: self.story_top_p,
            ..GenerationSettings::default()
        }
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    /// Filter directive for the tracing subscriber.
    pub fn log_filter(&self) -> String {
        if self.debug && self.log_level.eq_ignore_ascii_case("info") {
            "echo_muse=debug,tower_http=debug,info".to_string()
        } else {
            self.log_level.clone()
        }
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<EchoMuseConfig> = Lazy::new(EchoMuseConfig::from_env);
