//! The news panel and the client for the news API that feeds it.

mod client;
mod panel;

pub use client::{NewsApiClient, NewsArticle, NewsQuery, NewsSource};
pub use panel::{NewsState, get_news_panel, news_placeholder};
