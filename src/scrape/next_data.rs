//! Extraction of the embedded `__NEXT_DATA__` JSON payload
//!
//! The site renders its pages from a JSON blob embedded in a script tag.
//! Reading that blob is far more reliable than scraping the surrounding
//! markup, so every parser tries it first and only falls back to HTML
//! when the blob is missing or malformed.

use scraper::{Html, Selector};
use serde_json::Value;

/// Extracts the page's embedded JSON payload, if present and well-formed
pub fn extract_next_data(document: &Html) -> Option<Value> {
    let selector = Selector::parse("script#__NEXT_DATA__").ok()?;

    let script = document.select(&selector).next()?;
    let raw: String = script.text().collect();

    serde_json::from_str(&raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_payload() {
        let html = r#"<html><head>
            <script id="__NEXT_DATA__" type="application/json">{"props":{"pageProps":{"x":1}}}</script>
            </head><body></body></html>"#;
        let document = Html::parse_document(html);

        let data = extract_next_data(&document).unwrap();
        assert_eq!(data.pointer("/props/pageProps/x").unwrap(), 1);
    }

    #[test]
    fn test_missing_script_yields_none() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(extract_next_data(&document).is_none());
    }

    #[test]
    fn test_malformed_json_yields_none() {
        let html = r#"<html><head>
            <script id="__NEXT_DATA__">{not json</script>
            </head><body></body></html>"#;
        let document = Html::parse_document(html);

        assert!(extract_next_data(&document).is_none());
    }
}
