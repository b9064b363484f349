//! Command line and environment configuration

use std::path::PathBuf;

use clap::Parser;

use crate::model::SortOrder;

/// Terminal podcast player
#[derive(Debug, Clone, Parser)]
#[command(name = "podcastr", version, about)]
pub struct Config {
    /// Base URL of the episodes API
    #[arg(long, env = "PODCASTR_API_URL", default_value = "http://localhost:3333")]
    pub api_url: String,

    /// How many of the latest episodes to list
    #[arg(long, env = "PODCASTR_LIST_LIMIT", default_value_t = 12)]
    pub limit: usize,

    /// Listing order by publication date
    #[arg(long, env = "PODCASTR_ORDER", value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Directory for the rolling log files
    #[arg(long, env = "PODCASTR_LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_api() {
        let config = Config::try_parse_from(["podcastr"]).unwrap();
        assert_eq!(config.limit, 12);
        assert_eq!(config.log_dir, PathBuf::from(".logs"));
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "podcastr",
            "--api-url",
            "https://podcasts.example.com/api",
            "--limit",
            "2",
            "--order",
            "asc",
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://podcasts.example.com/api");
        assert_eq!(config.limit, 2);
        assert_eq!(config.order, SortOrder::Asc);
    }

    #[test]
    fn limit_must_be_a_number() {
        assert!(Config::try_parse_from(["podcastr", "--limit", "many"]).is_err());
    }
}
