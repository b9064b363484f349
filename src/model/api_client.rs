//! Episodes API client wrapper with the list and detail requests

use anyhow::{Context, Result};
use reqwest::{Client, Url};

use super::episode::{Episode, EpisodeRecord};

/// Sort order for the episode listing
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Thin wrapper around the episodes REST API
#[derive(Clone)]
pub struct EpisodesClient {
    http: Client,
    base_url: Url,
}

impl EpisodesClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).with_context(|| format!("invalid API base URL {base_url:?}"))?;
        // Url::join drops the last path segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(concat!("podcastr/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn episodes_url(&self) -> Result<Url> {
        Ok(self.base_url.join("episodes")?)
    }

    fn episode_url(&self, id: &str) -> Result<Url> {
        let mut url = self.episodes_url()?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("API base URL cannot have path segments"))?
            .push(id);
        Ok(url)
    }

    /// `GET /episodes?_limit&_sort&_order`
    pub async fn list_episodes(&self, limit: usize, sort: &str, order: SortOrder) -> Result<Vec<Episode>> {
        crate::log_api_request!("list_episodes", limit, sort, order = order.as_str());
        let result = self.fetch_episodes(limit, sort, order).await;
        crate::log_api_result!("list_episodes", result);
        result
    }

    /// `GET /episodes/{id}`
    pub async fn get_episode(&self, id: &str) -> Result<Episode> {
        crate::log_api_request!("get_episode", id);
        let result = self.fetch_episode(id).await;
        crate::log_api_result!("get_episode", result);
        result
    }

    async fn fetch_episodes(&self, limit: usize, sort: &str, order: SortOrder) -> Result<Vec<Episode>> {
        let records: Vec<EpisodeRecord> = self
            .http
            .get(self.episodes_url()?)
            .query(&[
                ("_limit", limit.to_string()),
                ("_sort", sort.to_string()),
                ("_order", order.as_str().to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .context("malformed episode list")?;

        records.into_iter().map(Episode::try_from).collect()
    }

    async fn fetch_episode(&self, id: &str) -> Result<Episode> {
        let record: EpisodeRecord = self
            .http
            .get(self.episode_url(id)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("malformed episode {id:?}"))?;

        Episode::try_from(record)
    }
}
