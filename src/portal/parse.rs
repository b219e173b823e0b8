//! HTML fragment extraction for portal responses
//!
//! The panel's AJAX endpoints return server-rendered fragments, not JSON.
//! Selectors here mirror the panel's markup; they are boundary details
//! (see DESIGN.md) and everything is best-effort: unparseable counters
//! default to 0, missing nodes yield empty results rather than errors.

use crate::portal::types::RangeSnapshot;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static RANGE_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.item").expect("static selector"));
static RANGE_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".col-sm-4").expect("static selector"));
static RANGE_COUNT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".col-3:nth-child(2) p").expect("static selector"));
static NUMBER_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.card.card-body").expect("static selector"));
static MESSAGE_BODY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".col-9.col-sm-6 p").expect("static selector"));
static CSRF_INPUT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("input[name=\"_token\"]").expect("static selector"));

/// Collapse an element's text nodes into one trimmed string
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract the CSRF `_token` hidden input from the received-SMS page
pub fn csrf_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&CSRF_INPUT)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|v| v.to_string())
}

/// Extract per-range arrival counters from the `getsms` fragment
pub fn range_counters(html: &str) -> Vec<RangeSnapshot> {
    let fragment = Html::parse_fragment(html);
    let mut snapshots = Vec::new();

    for item in fragment.select(&RANGE_ITEM) {
        let range = match item.select(&RANGE_NAME).next() {
            Some(node) => element_text(node),
            None => continue,
        };
        if range.is_empty() {
            continue;
        }

        let count = item
            .select(&RANGE_COUNT)
            .next()
            .map(|node| element_text(node))
            .and_then(|text| text.parse::<u64>().ok())
            .unwrap_or(0);

        snapshots.push(RangeSnapshot { range, count });
    }

    snapshots
}

/// Extract the ordered phone-number list from the `getsms/number` fragment
pub fn phone_numbers(html: &str) -> Vec<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&NUMBER_CARD)
        .filter_map(|card| card.select(&RANGE_NAME).next())
        .map(element_text)
        .filter(|number| !number.is_empty())
        .collect()
}

/// Extract the message body from the `getsms/number/sms` fragment
pub fn message_body(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&MESSAGE_BODY)
        .next()
        .map(element_text)
        .filter(|body| !body.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_counters() {
        // The count paragraph sits in the col-3 directly after the range
        // name, i.e. the row's second child
        let html = r#"
            <div class="item">
                <div class="row">
                    <div class="col-sm-4"> Russian (+7) </div>
                    <div class="col-3"><p>12</p></div>
                    <div class="col-3"><p>ignored</p></div>
                </div>
            </div>
            <div class="item">
                <div class="row">
                    <div class="col-sm-4">Indonesia (+62)</div>
                    <div class="col-3"><p>bad</p></div>
                </div>
            </div>
        "#;
        let snapshots = range_counters(html);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].range, "Russian (+7)");
        assert_eq!(snapshots[0].count, 12);
        // Unparseable counter defaults to 0
        assert_eq!(snapshots[1].count, 0);
    }

    #[test]
    fn test_phone_numbers_ordered() {
        let html = r#"
            <div class="card card-body"><div class="col-sm-4">628111111</div></div>
            <div class="card card-body"><div class="col-sm-4">628222222</div></div>
        "#;
        let numbers = phone_numbers(html);
        assert_eq!(numbers, vec!["628111111", "628222222"]);
    }

    #[test]
    fn test_message_body() {
        let html = r#"<div class="col-9 col-sm-6"><p>Your WhatsApp code is 123456</p></div>"#;
        assert_eq!(
            message_body(html),
            Some("Your WhatsApp code is 123456".to_string())
        );
        assert_eq!(message_body("<div></div>"), None);
    }

    #[test]
    fn test_csrf_token() {
        let html = r#"<form><input type="hidden" name="_token" value="abc123"></form>"#;
        assert_eq!(csrf_token(html), Some("abc123".to_string()));
        assert_eq!(csrf_token("<form></form>"), None);
    }

    #[test]
    fn test_empty_fragment() {
        assert!(range_counters("").is_empty());
        assert!(phone_numbers("").is_empty());
    }
}
