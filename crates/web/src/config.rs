use anyhow::{Context, Result};
use storage::services::{
    DEFAULT_LEADERBOARD_LIMIT, DEFAULT_LISTING_PAGE_CAP, DEFAULT_MIN_VOTES, RankingSettings,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub min_votes: u32,
    pub leaderboard_limit: usize,
    pub listing_page_cap: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            min_votes: env_or("MIN_VOTES", DEFAULT_MIN_VOTES)?,
            leaderboard_limit: env_or("LEADERBOARD_LIMIT", DEFAULT_LEADERBOARD_LIMIT)?,
            listing_page_cap: env_or("LISTING_PAGE_CAP", DEFAULT_LISTING_PAGE_CAP)?,
        })
    }

    /// Validated ranking configuration. Fails on `MIN_VOTES=0` or a limit above the cap.
    pub fn ranking_settings(&self) -> Result<RankingSettings> {
        RankingSettings::new(
            self.min_votes,
            self.leaderboard_limit,
            self.listing_page_cap,
        )
        .context("Invalid ranking configuration")
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer", name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min_votes: u32, leaderboard_limit: usize) -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "postgres://localhost/resorts".to_string(),
            api_keys: String::new(),
            min_votes,
            leaderboard_limit,
            listing_page_cap: DEFAULT_LISTING_PAGE_CAP,
        }
    }

    #[test]
    fn test_ranking_settings_from_config() {
        let settings = config(5, 10).ranking_settings().unwrap();
        assert_eq!(settings.min_votes(), 5);
        assert_eq!(settings.leaderboard_limit(), 10);
        assert_eq!(settings.listing_page_cap(), 72);
    }

    #[test]
    fn test_zero_min_votes_is_rejected() {
        assert!(config(0, 10).ranking_settings().is_err());
        assert!(config(5, 100).ranking_settings().is_err());
    }
}
