use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    AppState,
    alert::Alert,
    endpoints,
    html::{CARD_STYLE, format_date, truncate},
    news::{NewsArticle, NewsSource},
};

const NEWS_PANEL_ID: &str = "news-panel";
const MAX_SUMMARY_GRAPHEMES: usize = 160;

/// The state needed to render the news panel.
#[derive(Clone)]
pub struct NewsState {
    pub news_source: Arc<dyn NewsSource>,
}

impl FromRef<AppState> for NewsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            news_source: state.news_source.clone(),
        }
    }
}

/// The panel shown on the dashboard until the articles have loaded.
pub fn news_placeholder() -> Markup {
    html! {
        section
            id=(NEWS_PANEL_ID)
            class=(CARD_STYLE)
            hx-get=(endpoints::NEWS_API)
            hx-trigger="load"
            hx-swap="outerHTML"
        {
            h2 class="text-xl font-semibold mb-4" { "News" }
            p class="text-gray-500 dark:text-gray-400" { "Loading news..." }
        }
    }
}

fn published_date(published_at: &str) -> String {
    OffsetDateTime::parse(published_at, &Rfc3339)
        .map(|timestamp| format_date(timestamp.date()))
        .unwrap_or_else(|_| published_at.to_owned())
}

fn article_card(article: &NewsArticle) -> Markup {
    html! {
        article
            class="flex flex-col gap-2 p-4 rounded border border-gray-200 dark:border-gray-700"
            data-article-id=(article.id)
        {
            a
                href=(article.url)
                target="_blank"
                rel="noopener noreferrer"
                class="font-semibold text-blue-600 hover:underline dark:text-blue-500"
            {
                (article.title)
            }

            @if !article.content.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-300" {
                    (truncate(&article.content, MAX_SUMMARY_GRAPHEMES))
                }
            }

            @if !article.published_at.is_empty() {
                time
                    datetime=(article.published_at)
                    class="text-xs text-gray-500 dark:text-gray-400"
                {
                    (published_date(&article.published_at))
                }
            }
        }
    }
}

fn news_panel(articles: &[NewsArticle]) -> Markup {
    html! {
        section id=(NEWS_PANEL_ID) class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold mb-4" { "News" }

            @if articles.is_empty() {
                p class="text-gray-500 dark:text-gray-400" { "No news to show." }
            } @else {
                div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3"
                {
                    @for article in articles {
                        (article_card(article))
                    }
                }
            }
        }
    }
}

/// Fetch the top headlines and render them as a grid of cards.
///
/// A failed fetch renders an empty panel along with an error alert.
pub async fn get_news_panel(State(state): State<NewsState>) -> Response {
    match state.news_source.top_headlines().await {
        Ok(articles) => news_panel(&articles).into_response(),
        Err(error) => {
            tracing::error!("Could not fetch news: {error}");
            let alert = Alert::ErrorSimple {
                message: "Failed to fetch news".to_owned(),
            };

            html! {
                (news_panel(&[]))
                (alert.into_oob_html())
            }
            .into_response()
        }
    }
}
