//! Reads top headlines from a NewsAPI-compatible service.

use async_trait::async_trait;
use serde::Deserialize;

use crate::Error;

/// A news headline shown in the news panel.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    /// The position of the article in the fetched list.
    ///
    /// Only unique within a single fetch.
    pub id: usize,
    pub title: String,
    /// A short summary of the article, empty if the API did not provide one.
    pub content: String,
    pub url: String,
    /// When the article was published as reported by the API, usually an
    /// RFC 3339 timestamp.
    pub published_at: String,
}

/// Provides the articles for the news panel.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch the current top headlines.
    async fn top_headlines(&self) -> Result<Vec<NewsArticle>, Error>;
}

/// The query that selects which headlines are fetched.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    /// Two letter country code, e.g. "us".
    pub country: String,
    /// e.g. "business".
    pub category: String,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            country: "us".to_owned(),
            category: "business".to_owned(),
        }
    }
}

/// Fetches headlines from `GET /v2/top-headlines`.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    query: NewsQuery,
}

#[derive(Debug, Deserialize)]
struct TopHeadlinesResponse {
    #[serde(default)]
    articles: Vec<ArticleRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRecord {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

impl ArticleRecord {
    fn into_article(self, id: usize) -> NewsArticle {
        NewsArticle {
            id,
            title: self.title.unwrap_or_default(),
            content: self.description.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
        }
    }
}

impl NewsApiClient {
    /// Create a client for the news API at `base_url`, e.g. "https://newsapi.org".
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, query: NewsQuery) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
            query,
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn top_headlines(&self) -> Result<Vec<NewsArticle>, Error> {
        let response = self
            .http
            .get(format!("{}/v2/top-headlines", self.base_url))
            .query(&[
                ("country", self.query.country.as_str()),
                ("category", self.query.category.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|error| Error::NewsRequest(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::NewsResponse(status.as_u16()));
        }

        let body = response
            .json::<TopHeadlinesResponse>()
            .await
            .map_err(|error| Error::NewsRequest(error.to_string()))?;

        Ok(body
            .articles
            .into_iter()
            .enumerate()
            .map(|(id, record)| record.into_article(id))
            .collect())
    }
}
