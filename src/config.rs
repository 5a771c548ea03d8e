//! Command line and environment configuration for the server.

use clap::Parser;

/// A personal finance tracker that records transactions in a hosted data
/// store and shows the latest business news.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// The base URL of the hosted data platform, e.g. "https://project.example.co".
    #[arg(long, env = "STORE_URL")]
    pub store_url: String,

    /// The public (anon) API key of the hosted data platform.
    #[arg(long, env = "STORE_ANON_KEY")]
    pub store_key: String,

    /// The API key for the news API.
    #[arg(long, env = "NEWS_API_KEY")]
    pub news_api_key: String,

    /// The base URL of the news API.
    #[arg(long, env = "NEWS_API_URL", default_value = "https://newsapi.org")]
    pub news_url: String,

    /// The country to fetch top headlines for.
    #[arg(long, env = "NEWS_COUNTRY", default_value = "us")]
    pub news_country: String,

    /// The category to fetch top headlines for.
    #[arg(long, env = "NEWS_CATEGORY", default_value = "business")]
    pub news_category: String,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, env = "LOCAL_TIMEZONE", default_value = "Etc/UTC")]
    pub timezone: String,

    /// The secret used to derive the key that encrypts session cookies.
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: String,

    /// How long to wait for an external service before giving up.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}
