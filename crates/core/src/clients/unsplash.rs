//! Unsplash photo search.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use super::images::{ImageSearch, ImageSearchOptions};
use crate::schema::{ImageAttribution, ResolvedImage};

const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";

#[derive(Clone)]
pub struct UnsplashClient {
    access_key: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    width: u32,
    height: u32,
    urls: PhotoUrls,
    user: PhotoUser,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
    links: UserLinks,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    html: String,
}

impl From<Photo> for ResolvedImage {
    fn from(photo: Photo) -> Self {
        ResolvedImage {
            url: photo.urls.regular,
            width: photo.width,
            height: photo.height,
            attribution: ImageAttribution {
                photographer: photo.user.name,
                profile_url: photo.user.links.html,
            },
        }
    }
}

impl UnsplashClient {
    pub fn new(access_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            access_key: access_key.into(),
            base_url: UNSPLASH_API_BASE.to_string(),
            client,
        })
    }

    /// Read `UNSPLASH_ACCESS_KEY`
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("UNSPLASH_ACCESS_KEY")
            .map_err(|_| anyhow!("UNSPLASH_ACCESS_KEY is not set"))?;
        Self::new(key)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ImageSearch for UnsplashClient {
    async fn search(
        &self,
        keywords: &str,
        options: &ImageSearchOptions,
    ) -> Result<Vec<ResolvedImage>> {
        let per_page = options.count.to_string();
        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", keywords),
                ("per_page", per_page.as_str()),
                ("orientation", options.orientation.as_str()),
            ])
            .send()
            .await
            .context("Failed to send Unsplash search request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Unsplash search failed with status {}: {}",
                status,
                error_text
            ));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .context("Failed to parse Unsplash search response")?;

        Ok(parsed.results.into_iter().map(ResolvedImage::from).collect())
    }
}
