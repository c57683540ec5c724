// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTML extraction for fetched pages
//!
//! Turns one raw HTML document into the engine's `PageContent` bundle:
//! title/description/keywords metadata, main content text, link counts
//! partitioned internal/external, and an image count.

use scraper::{Html, Selector};
use url::Url;

use super::engine::PageContent;

/// Extract a full `PageContent` from raw HTML.
///
/// Main-content strategies are tried in order: `<article>`, `<main>`,
/// `[role='main']`, common content class names, then `<body>` as a
/// fallback. The content is whitespace-normalized but not truncated;
/// length bounding happens at the fetcher where the limit is configured.
pub fn extract_page(html: &str, url: &str) -> PageContent {
    let document = Html::parse_document(html);

    let (internal_links, external_links) = count_links(&document, url);

    PageContent {
        success: true,
        error_message: None,
        title: extract_title(&document),
        description: extract_meta(&document, "description"),
        keywords: extract_meta(&document, "keywords"),
        content: extract_main_content(&document),
        internal_links,
        external_links,
        images: count_images(&document),
    }
}

/// Truncate content to `max_chars`, preserving word boundaries
pub fn truncate_content(text: &str, max_chars: usize) -> String {
    if text.len() <= max_chars {
        return text.to_string();
    }

    let mut cut = max_chars;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }

    let truncated = &text[..cut];
    if let Some(last_space) = truncated.rfind(' ') {
        format!("{}...", &text[..last_space])
    } else {
        format!("{}...", truncated)
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let title = document
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn extract_meta(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[name='{}']", name)).ok()?;
    let content = document
        .select(&selector)
        .next()?
        .value()
        .attr("content")?
        .trim()
        .to_string();

    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

fn extract_main_content(document: &Html) -> Option<String> {
    let selectors = [
        "article",
        "main",
        "[role='main']",
        ".post-content",
        ".article-content",
        ".entry-content",
        ".content-body",
        "#content",
    ];

    for selector_str in selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let cleaned = clean_text(&element.text().collect::<Vec<_>>().join(" "));
                if cleaned.len() > 200 {
                    // Found substantial content
                    return Some(cleaned);
                }
            }
        }
    }

    // Fallback: whole body text
    let body = Selector::parse("body").ok()?;
    let element = document.select(&body).next()?;
    let cleaned = clean_text(&element.text().collect::<Vec<_>>().join(" "));

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Count `<a href>` links, partitioned (internal, external) by host
fn count_links(document: &Html, base_url: &str) -> (usize, usize) {
    let base = match Url::parse(base_url) {
        Ok(u) => u,
        Err(_) => return (0, 0),
    };

    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return (0, 0),
    };

    let mut internal = 0;
    let mut external = 0;

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        if let Ok(resolved) = base.join(href) {
            if resolved.host_str() == base.host_str() {
                internal += 1;
            } else {
                external += 1;
            }
        }
    }

    (internal, external)
}

fn count_images(document: &Html) -> usize {
    match Selector::parse("img") {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

/// Normalize whitespace, collapsing runs and blank lines
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
