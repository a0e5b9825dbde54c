//! Parsers for writer pages: TV filmography and portrait/bio details

use crate::scrape::next_data::extract_next_data;
use crate::scrape::{ShowRef, WriterDetails};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// Title types that count as television series
const SERIES_TYPES: [&str; 2] = ["tvSeries", "tvMiniSeries"];

/// Parses the TV shows a writer is credited on from their page
///
/// Reads the embedded JSON credits first, falls back to scanning title
/// links in the markup, and deduplicates by show id preserving first
/// appearance order. Malformed data degrades to an empty list.
pub fn parse_writer_filmography(html: &str) -> Vec<ShowRef> {
    let document = Html::parse_document(html);

    let mut shows = Vec::new();
    if let Some(data) = extract_next_data(&document) {
        shows = filmography_from_payload(&data);
    }

    if shows.is_empty() {
        shows = filmography_from_html(&document);
    }

    let mut seen = std::collections::HashSet::new();
    shows.retain(|show| seen.insert(show.imdb_id.clone()));
    shows
}

fn filmography_from_payload(data: &Value) -> Vec<ShowRef> {
    let mut shows = Vec::new();

    let Some(categories) = data
        .pointer("/props/pageProps/mainColumnData/credits/edges")
        .and_then(Value::as_array)
    else {
        return shows;
    };

    for cat_edge in categories {
        let cat = &cat_edge["node"];
        let cat_name = cat
            .pointer("/category/text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_lowercase();
        if !cat_name.contains("writ") {
            continue;
        }

        let Some(edges) = cat.pointer("/credits/edges").and_then(Value::as_array) else {
            continue;
        };

        for credit_edge in edges {
            let title = &credit_edge["node"]["title"];

            let id = title["id"].as_str().unwrap_or("");
            let text = title
                .pointer("/titleText/text")
                .and_then(Value::as_str)
                .unwrap_or("");
            let kind = title
                .pointer("/titleType/id")
                .and_then(Value::as_str)
                .unwrap_or("");

            if id.is_empty() || text.is_empty() || !SERIES_TYPES.contains(&kind) {
                continue;
            }

            let year_start = title
                .pointer("/releaseYear/year")
                .and_then(Value::as_u64)
                .map(|y| y as u16);
            let year_end = title
                .pointer("/releaseYear/endYear")
                .and_then(Value::as_u64)
                .map(|y| y as u16);

            shows.push(ShowRef {
                imdb_id: id.to_string(),
                title: text.to_string(),
                year_start,
                year_end,
            });
        }
    }

    shows
}

/// Fallback: title links whose row text marks them as a TV series
fn filmography_from_html(document: &Html) -> Vec<ShowRef> {
    let Ok(selector) = Selector::parse(r#"a[href*="/title/tt"]"#) else {
        return Vec::new();
    };

    let mut shows = Vec::new();
    for link in document.select(&selector) {
        let Some(id) = link
            .value()
            .attr("href")
            .and_then(|href| title_id_from_href(href))
        else {
            continue;
        };

        let parent_text = link
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| parent.text().collect::<String>())
            .unwrap_or_default();
        if !parent_text.contains("TV Series") && !parent_text.contains("TV Mini") {
            continue;
        }

        let title: String = link.text().collect::<String>().trim().to_string();
        if title.is_empty() || title == id || title.len() <= 1 {
            continue;
        }

        shows.push(ShowRef {
            imdb_id: id,
            title,
            year_start: None,
            year_end: None,
        });
    }

    shows
}

/// Pulls `tt1234567` out of an href like `/title/tt1234567/?ref_=nm`
fn title_id_from_href(href: &str) -> Option<String> {
    let rest = href.split("/title/").nth(1)?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    (id.starts_with("tt") && id.len() > 2 && id[2..].chars().all(|c| c.is_ascii_digit()))
        .then_some(id)
}

/// Parses a writer's portrait URL and bio text from their page
///
/// Both fields are optional; a page with neither yields empty details
/// rather than an error.
pub fn parse_writer_details(html: &str, writer_id: &str) -> WriterDetails {
    let document = Html::parse_document(html);

    let mut image_url = None;
    let mut bio = None;

    if let Some(data) = extract_next_data(&document) {
        let above = data
            .pointer("/props/pageProps/aboveTheFold")
            .cloned()
            .unwrap_or(Value::Null);

        image_url = above
            .pointer("/primaryImage/url")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        bio = above
            .pointer("/bio/text/plainText")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
    }

    if image_url.is_none() {
        image_url = first_attr(&document, r#"img[class*="ipc-image"]"#, "src");
    }

    if bio.is_none() {
        if let Ok(selector) = Selector::parse(r#"[data-testid="mini-bio"]"#) {
            bio = document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty());
        }
    }

    WriterDetails {
        imdb_id: writer_id.to_string(),
        image_url,
        bio,
    }
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}
