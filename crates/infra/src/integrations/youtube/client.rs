//! YouTube Data API client implementing the `VideoCatalog` port.

use std::collections::HashMap;

use async_trait::async_trait;
use learnarc_core::catalog::ports::VideoCatalog;
use learnarc_domain::constants::SEARCH_MAX_RESULTS;
use learnarc_domain::{LearnArcError, Result, Video};
use reqwest::Method;
use tracing::{debug, info};

use super::types::{format_duration, SearchResponse, Snippet, VideoListResponse};
use crate::http::HttpClient;

/// YouTube Data API v3 client.
pub struct YouTubeClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl YouTubeClient {
    /// Create a new client against the given API base URL.
    pub fn new(api_key: String, base_url: String, http_client: HttpClient) -> Self {
        Self { http_client, api_key, base_url: base_url.trim_end_matches('/').to_string() }
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        let request = self
            .http_client
            .request(Method::GET, &url)
            .query(query)
            .query(&[("key", self.api_key.as_str())]);

        let response = self.http_client.send(request).await?;
        let status = response.status();
        debug!(%status, path, "received catalog response");

        if !status.is_success() {
            return Err(catalog_error(status.as_u16(), response).await);
        }

        response.json::<T>().await.map_err(|err| {
            LearnArcError::Provider(format!("failed to parse catalog response: {err}"))
        })
    }

    /// Resolve human-readable durations for a set of video ids.
    async fn fetch_durations(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids.join(",");
        let response: VideoListResponse = self
            .get_json("videos", &[("part", "contentDetails"), ("id", joined.as_str())])
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let duration = item.content_details.and_then(|d| format_duration(&d.duration))?;
                Some((item.id, duration))
            })
            .collect())
    }
}

fn video_from_snippet(id: String, snippet: Snippet, duration: Option<String>) -> Video {
    Video {
        id,
        title: snippet.title,
        channel_title: snippet.channel_title,
        thumbnail: snippet.thumbnails.best_url(),
        description: snippet.description,
        published_at: snippet.published_at,
        duration,
    }
}

async fn catalog_error(status: u16, response: reqwest::Response) -> LearnArcError {
    let message = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
    match status {
        401 | 403 => LearnArcError::Auth(format!("catalog rejected credentials ({status})")),
        429 => LearnArcError::RateLimited(60),
        _ => LearnArcError::Provider(format!("catalog error {status}: {message}")),
    }
}

#[async_trait]
impl VideoCatalog for YouTubeClient {
    async fn search(&self, query: &str) -> Result<Vec<Video>> {
        let max_results = SEARCH_MAX_RESULTS.to_string();
        let response: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("maxResults", max_results.as_str()),
                    ("q", query),
                ],
            )
            .await?;

        let hits: Vec<(String, Snippet)> = response
            .items
            .into_iter()
            .filter_map(|item| Some((item.id.video_id?, item.snippet)))
            .collect();

        // Durations come from a second call; the search endpoint does not
        // return content details.
        let ids: Vec<String> = hits.iter().map(|(id, _)| id.clone()).collect();
        let mut durations = self.fetch_durations(&ids).await?;

        let videos = hits
            .into_iter()
            .map(|(id, snippet)| {
                let duration = durations.remove(&id);
                video_from_snippet(id, snippet, duration)
            })
            .collect::<Vec<_>>();

        info!(query, results = videos.len(), "catalog search complete");
        Ok(videos)
    }

    async fn video(&self, id: &str) -> Result<Option<Video>> {
        let response: VideoListResponse = self
            .get_json("videos", &[("part", "snippet,contentDetails"), ("id", id)])
            .await?;

        let Some(item) = response.items.into_iter().next() else {
            return Ok(None);
        };
        let Some(snippet) = item.snippet else {
            return Ok(None);
        };
        let duration = item.content_details.and_then(|d| format_duration(&d.duration));
        Ok(Some(video_from_snippet(item.id, snippet, duration)))
    }
}
