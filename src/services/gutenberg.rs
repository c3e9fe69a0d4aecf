//! Metadata scraping service for source book pages
//!
//! Given the URL of a Project Gutenberg book page, fetches the HTML and
//! extracts title, author, language and description from the bibliographic
//! table to prefill a create-book draft.

use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::{
    config::ScrapeConfig,
    error::{AppError, AppResult},
    models::book::BookDraft,
};

static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?si)<th>\s*Title\s*</th>\s*<td[^>]*>(.*?)</td>").unwrap()
});
static AUTHOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?si)<th>\s*Author\s*</th>\s*<td[^>]*>(.*?)</td>").unwrap()
});
static LANGUAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?si)<th>\s*Language\s*</th>\s*<td[^>]*>(.*?)</td>").unwrap()
});
static SUMMARY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?si)<div[^>]*class="[^"]*summary-text-container[^"]*"[^>]*>(.*?)</div>"#)
        .unwrap()
});
static META_DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?si)<meta\s+name="description"\s+content="([^"]*)""#).unwrap()
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

#[derive(Clone)]
pub struct GutenbergService {
    http: reqwest::Client,
}

impl GutenbergService {
    pub fn new(config: &ScrapeConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("failed to build scrape HTTP client, using defaults: {}", e);
                reqwest::Client::new()
            });
        Self { http }
    }

    /// Fetch a book page and extract a draft for the create-book form.
    /// Every extracted field is optional; the librarian completes the draft.
    pub async fn prefill(&self, url: &str) -> AppResult<BookDraft> {
        tracing::info!(%url, "fetching book metadata");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Scrape(format!("Failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Scrape(format!(
                "Source returned HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AppError::Scrape(format!("Failed to read {}: {}", url, e)))?;

        let draft = parse_book_page(url, &html);
        tracing::debug!(
            title = ?draft.title,
            author = ?draft.author,
            language = ?draft.language,
            "book metadata extracted"
        );
        Ok(draft)
    }
}

/// Extract a book draft from a bibliographic page
fn parse_book_page(url: &str, html: &str) -> BookDraft {
    let description = extract(&SUMMARY_RE, html).or_else(|| extract(&META_DESCRIPTION_RE, html));

    BookDraft {
        title: extract(&TITLE_RE, html),
        author: extract(&AUTHOR_RE, html),
        description,
        source_url: url.to_string(),
        language: extract(&LANGUAGE_RE, html),
    }
}

fn extract(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_fragment(m.as_str()))
        .filter(|s| !s.is_empty())
}

/// Strip tags, unescape common entities and collapse whitespace
fn clean_fragment(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, " ");
    let text = text
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html>
          <head><meta name="description" content="Free ebook page"></head>
          <body>
            <table class="bibrec">
              <tr>
                <th>Author</th>
                <td><a href="/ebooks/author/9">Melville, Herman, 1819-1891</a></td>
              </tr>
              <tr>
                <th>Title</th>
                <td>Moby Dick; Or, The Whale</td>
              </tr>
              <tr>
                <th>Language</th>
                <td>English</td>
              </tr>
            </table>
            <div class="summary-text-container">
              <p>&quot;Moby Dick&quot; is a novel about obsession &amp; the sea.</p>
            </div>
          </body>
        </html>
    "#;

    #[test]
    fn parses_bibliographic_fields() {
        let draft = parse_book_page("https://example.org/ebooks/2701", PAGE);
        assert_eq!(draft.title.as_deref(), Some("Moby Dick; Or, The Whale"));
        assert_eq!(draft.author.as_deref(), Some("Melville, Herman, 1819-1891"));
        assert_eq!(draft.language.as_deref(), Some("English"));
        assert_eq!(
            draft.description.as_deref(),
            Some("\"Moby Dick\" is a novel about obsession & the sea.")
        );
        assert_eq!(draft.source_url, "https://example.org/ebooks/2701");
    }

    #[test]
    fn missing_fields_stay_empty() {
        let draft = parse_book_page("https://example.org/x", "<html><body>nothing</body></html>");
        assert_eq!(draft.title, None);
        assert_eq!(draft.author, None);
        assert_eq!(draft.language, None);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn falls_back_to_meta_description() {
        let page = r#"<head><meta name="description" content="A fallback blurb"></head>"#;
        let draft = parse_book_page("https://example.org/x", page);
        assert_eq!(draft.description.as_deref(), Some("A fallback blurb"));
    }

    #[test]
    fn strips_markup_from_fields() {
        let page = r#"<th>Title</th><td><b>The</b> <i>Hobbit</i></td>"#;
        let draft = parse_book_page("https://example.org/x", page);
        assert_eq!(draft.title.as_deref(), Some("The Hobbit"));
    }
}
