//! Article resolution: turn raw grounded-search output into a validated
//! `(url, summary)` pair.
//!
//! The search model is asked for a strict two-field format (`URL: …` then
//! `SUMMARY: …`), but models drift — they wrap URLs in parentheses, skip
//! the summary marker, or hand back a homepage instead of an article. The
//! resolver is the defence line: line-anchored parsing, then allow-list and
//! path-depth validation against the configured sources.
//!
//! Resolution failure is a soft outcome (`None`), never an error. The quiz
//! pipeline decides what a missing article means; this module only decides
//! whether one was found.

use crate::config::{AppConfig, SourceDomain};
use crate::providers::GroundedSearchProvider;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// A validated article reference produced by the grounded search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateArticle {
    pub url: String,
    pub summary: String,
}

/// First `URL:` line in the response. Line-anchored so prose that merely
/// mentions "URL:" mid-sentence is not mistaken for the field.
static RE_URL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*URL:\s*(https?://\S+)").expect("valid regex"));

/// Everything after the `SUMMARY:` marker, across lines.
static RE_SUMMARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)SUMMARY:\s*(.*)").expect("valid regex"));

/// Is `url` an allow-listed article (not a bare domain or listing page)?
///
/// A URL qualifies when its host is one of the configured sources (or a
/// subdomain of one) AND its path extends beyond the source's required
/// prefix. `https://www.sciencedaily.com/` is a homepage;
/// `https://www.sciencedaily.com/releases/2024/01/240115153045.htm` is an
/// article.
pub fn is_allowed_article_url(url: &str, sources: &[SourceDomain]) -> bool {
    let parsed = match reqwest::Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }
    let host = match parsed.host_str() {
        Some(h) => h,
        None => return false,
    };

    sources.iter().any(|source| {
        let host_matches =
            host == source.host || host.ends_with(&format!(".{}", source.host));
        if !host_matches {
            return false;
        }
        let path = parsed.path();
        let prefix = if source.path_prefix.is_empty() {
            "/"
        } else {
            source.path_prefix.as_str()
        };
        path.starts_with(prefix) && path.len() > prefix.len()
    })
}

/// Parse raw search output into a validated candidate.
///
/// Returns `None` when no URL line is present or the URL fails validation.
/// A missing `SUMMARY:` marker falls back to the whole response text — the
/// model usually summarised anyway, just without the label.
pub fn parse_candidate(raw: &str, sources: &[SourceDomain]) -> Option<CandidateArticle> {
    let caps = RE_URL_LINE.captures(raw)?;
    // Models occasionally wrap the URL in markdown parentheses.
    let url = caps[1].trim_end_matches(')').to_string();

    if !is_allowed_article_url(&url, sources) {
        debug!("rejected article URL (not an allow-listed article): {}", url);
        return None;
    }

    let summary = RE_SUMMARY
        .captures(raw)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| raw.trim().to_string());

    Some(CandidateArticle { url, summary })
}

/// Find a news article related to the paper, or nothing.
///
/// Search errors are swallowed here — the article is optional enrichment,
/// and a Perplexity outage must not take down the required quiz stages.
pub async fn find_related_article(
    search: &dyn GroundedSearchProvider,
    paper_text: &str,
    config: &AppConfig,
) -> Option<CandidateArticle> {
    let excerpt = truncate_chars(paper_text, config.excerpt_limit);
    match search.find_article_text(excerpt).await {
        Ok(raw) => {
            let candidate = parse_candidate(&raw, &config.article.sources);
            match &candidate {
                Some(article) => debug!("resolved article: {}", article.url),
                None => warn!("article search returned no valid allow-listed URL"),
            }
            candidate
        }
        Err(e) => {
            warn!("article search failed, continuing without an article: {}", e);
            None
        }
    }
}

/// Truncate to at most `limit` characters without splitting a code point.
pub(crate) fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArticleConfig;

    fn sources() -> Vec<SourceDomain> {
        ArticleConfig::default().sources
    }

    #[test]
    fn homepage_urls_are_rejected() {
        assert!(!is_allowed_article_url(
            "https://www.sciencedaily.com",
            &sources()
        ));
        assert!(!is_allowed_article_url(
            "https://www.sciencedaily.com/",
            &sources()
        ));
    }

    #[test]
    fn release_url_is_accepted() {
        assert!(is_allowed_article_url(
            "https://www.sciencedaily.com/releases/2024/01/240115153045.htm",
            &sources()
        ));
    }

    #[test]
    fn listing_page_without_article_path_is_rejected() {
        assert!(!is_allowed_article_url(
            "https://www.sciencedaily.com/releases/",
            &sources()
        ));
        assert!(!is_allowed_article_url(
            "https://www.sciencedaily.com/news/top-science/",
            &sources()
        ));
    }

    #[test]
    fn foreign_domains_are_rejected() {
        assert!(!is_allowed_article_url(
            "https://evil.example.com/releases/2024/01/x.htm",
            &sources()
        ));
        // Suffix tricks must not pass the host check.
        assert!(!is_allowed_article_url(
            "https://notsciencedaily.com/releases/2024/01/x.htm",
            &sources()
        ));
    }

    #[test]
    fn bare_domain_and_subdomain_hosts_match() {
        assert!(is_allowed_article_url(
            "https://sciencedaily.com/releases/2024/01/x.htm",
            &sources()
        ));
        assert!(is_allowed_article_url(
            "https://www.sciencedaily.com/releases/2024/01/x.htm",
            &sources()
        ));
    }

    #[test]
    fn multi_domain_allow_list() {
        let many = vec![
            SourceDomain {
                host: "sciencedaily.com".into(),
                path_prefix: "/releases/".into(),
            },
            SourceDomain {
                host: "phys.org".into(),
                path_prefix: "/news/".into(),
            },
        ];
        assert!(is_allowed_article_url(
            "https://phys.org/news/2024-06-gene.html",
            &many
        ));
        assert!(!is_allowed_article_url("https://phys.org/", &many));
    }

    #[test]
    fn parses_strict_two_field_format() {
        let raw = "URL: https://www.sciencedaily.com/releases/2024/01/240115153045.htm\n\
                   SUMMARY: Researchers discovered that gut microbes alter insulin signalling.";
        let article = parse_candidate(raw, &sources()).unwrap();
        assert_eq!(
            article.url,
            "https://www.sciencedaily.com/releases/2024/01/240115153045.htm"
        );
        assert_eq!(
            article.summary,
            "Researchers discovered that gut microbes alter insulin signalling."
        );
    }

    #[test]
    fn strips_trailing_parenthesis_from_url() {
        let raw = "URL: https://www.sciencedaily.com/releases/2024/01/240115153045.htm)\n\
                   SUMMARY: Something.";
        let article = parse_candidate(raw, &sources()).unwrap();
        assert!(article.url.ends_with(".htm"));
    }

    #[test]
    fn missing_summary_marker_falls_back_to_whole_text() {
        let raw = "URL: https://www.sciencedaily.com/releases/2024/01/240115153045.htm\n\
                   The researchers found something interesting about metabolism.";
        let article = parse_candidate(raw, &sources()).unwrap();
        assert!(article.summary.contains("interesting about metabolism"));
    }

    #[test]
    fn url_mentioned_mid_sentence_is_not_a_field() {
        let raw = "I could not find a good match. The URL: https://www.sciencedaily.com/releases/2024/01/x.htm was close.";
        assert!(parse_candidate(raw, &sources()).is_none());
    }

    #[test]
    fn invalid_url_yields_none() {
        let raw = "URL: https://www.sciencedaily.com/\nSUMMARY: homepage only";
        assert!(parse_candidate(raw, &sources()).is_none());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "αβγδε";
        assert_eq!(truncate_chars(s, 3), "αβγ");
        assert_eq!(truncate_chars(s, 50), s);
    }
}
