//! Parsers for show pages: title/year detail and writing credits

use crate::scrape::next_data::extract_next_data;
use crate::scrape::{ShowRef, WriterCredit};
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

/// Parses title and year range from a show's main page
///
/// Reads the embedded JSON payload first and falls back to the document
/// `<title>` tag. Returns None when neither yields a usable title.
pub fn parse_show_detail(html: &str, show_id: &str) -> Option<ShowRef> {
    let document = Html::parse_document(html);

    if let Some(data) = extract_next_data(&document) {
        if let Some(show) = detail_from_payload(&data, show_id) {
            return Some(show);
        }
    }

    detail_from_title_tag(&document, show_id)
}

fn detail_from_payload(data: &Value, show_id: &str) -> Option<ShowRef> {
    let above = data.pointer("/props/pageProps/aboveTheFoldData")?;

    let title = above.pointer("/titleText/text")?.as_str()?;
    if title.is_empty() {
        return None;
    }

    let year_start = above
        .pointer("/releaseYear/year")
        .and_then(Value::as_u64)
        .map(|y| y as u16);
    let year_end = above
        .pointer("/releaseYear/endYear")
        .and_then(Value::as_u64)
        .map(|y| y as u16);

    Some(ShowRef {
        imdb_id: show_id.to_string(),
        title: title.to_string(),
        year_start,
        year_end,
    })
}

/// Fallback: `<title>My Show (TV Series 2008-2013) - IMDb</title>`
fn detail_from_title_tag(document: &Html, show_id: &str) -> Option<ShowRef> {
    let selector = Selector::parse("title").ok()?;
    let raw: String = document.select(&selector).next()?.text().collect();

    let raw = raw.trim();
    let raw = raw.strip_suffix("- IMDb").unwrap_or(raw).trim();

    let (title, rest) = match raw.split_once(" (") {
        Some((title, rest)) => (title.trim(), rest),
        None => (raw, ""),
    };
    if title.is_empty() {
        return None;
    }

    let (year_start, year_end) = years_in(rest);

    Some(ShowRef {
        imdb_id: show_id.to_string(),
        title: title.to_string(),
        year_start,
        year_end,
    })
}

/// Picks the first two four-digit years out of a text fragment
fn years_in(text: &str) -> (Option<u16>, Option<u16>) {
    let mut years = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else {
            if current.len() == 4 {
                years.push(current.parse::<u16>().ok());
            }
            current.clear();
        }
    }
    if current.len() == 4 {
        years.push(current.parse::<u16>().ok());
    }

    let mut years = years.into_iter().flatten();
    (years.next(), years.next())
}

/// Parses the writing credits from a show's full-credits page
///
/// Malformed or partial remote data degrades to an empty list.
pub fn parse_show_writers(html: &str) -> Vec<WriterCredit> {
    let document = Html::parse_document(html);

    let mut credits = Vec::new();
    if let Some(data) = extract_next_data(&document) {
        credits = writers_from_payload(&data);
    }

    if credits.is_empty() {
        credits = writers_from_html(&document);
    }

    credits
}

fn writers_from_payload(data: &Value) -> Vec<WriterCredit> {
    let mut credits = Vec::new();

    let Some(categories) = data
        .pointer("/props/pageProps/mainColumnData/credits/edges")
        .and_then(Value::as_array)
    else {
        return credits;
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
            let node = &credit_edge["node"];

            let id = node.pointer("/name/id").and_then(Value::as_str);
            let name = node.pointer("/name/nameText/text").and_then(Value::as_str);
            let (Some(id), Some(name)) = (id, name) else {
                continue;
            };
            if id.is_empty() || name.is_empty() {
                continue;
            }

            let role = node
                .pointer("/jobTitle/text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| (!cat_name.is_empty()).then(|| cat_name.clone()));
            let episode_count = node
                .pointer("/episodeCredits/total")
                .and_then(Value::as_u64)
                .map(|n| n as u32);

            credits.push(WriterCredit {
                imdb_id: id.to_string(),
                name: name.to_string(),
                role,
                episode_count,
            });
        }
    }

    credits
}

/// Fallback: scan name links and read an episode count off the row text
fn writers_from_html(document: &Html) -> Vec<WriterCredit> {
    let Ok(selector) = Selector::parse(r#"a[href*="/name/nm"]"#) else {
        return Vec::new();
    };

    let mut seen = std::collections::HashSet::new();
    let mut credits = Vec::new();

    for link in document.select(&selector) {
        let Some(id) = link
            .value()
            .attr("href")
            .and_then(|href| name_id_from_href(href))
        else {
            continue;
        };

        let name: String = link.text().collect::<String>().trim().to_string();
        if name.is_empty() || name == id {
            continue;
        }
        if !seen.insert(id.clone()) {
            continue;
        }

        let episode_count = link
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| parent.text().collect::<String>())
            .as_deref()
            .and_then(episode_count_from_text);

        credits.push(WriterCredit {
            imdb_id: id,
            name,
            role: None,
            episode_count,
        });
    }

    credits
}

/// Pulls `nm1234567` out of an href like `/name/nm1234567/?ref_=ttfc`
fn name_id_from_href(href: &str) -> Option<String> {
    let rest = href.split("/name/").nth(1)?;
    let id: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    (id.starts_with("nm") && id.len() > 2 && id[2..].chars().all(|c| c.is_ascii_digit()))
        .then_some(id)
}

/// Reads the number preceding the word "episode" in a text fragment
fn episode_count_from_text(text: &str) -> Option<u32> {
    let idx = text.find("episode")?;
    let digits: Vec<char> = text[..idx]
        .chars()
        .rev()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return None;
    }
    digits.iter().rev().collect::<String>().parse().ok()
}
