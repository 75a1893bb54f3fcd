//! Structural extraction from rendered maps pages.
//!
//! The maps UI renders the same field differently across locales and markup
//! revisions. Each such field has an ordered list of extraction strategies;
//! the first one that yields a value wins.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::dates::parse_relative_date;
use crate::types::RawReview;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

static STORE_LINK: LazyLock<Selector> = LazyLock::new(|| selector(super::scripts::STORE_LINK));
static REVIEW_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| selector(super::scripts::REVIEW_BLOCK));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static ADDRESS_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"button[data-item-id="address"]"#));
static LABELLED_BUTTON: LazyLock<Selector> = LazyLock::new(|| selector("button[aria-label]"));
static REVIEWER: LazyLock<Selector> = LazyLock::new(|| selector("div.d4r55"));
static REVIEWER_BUTTON: LazyLock<Selector> =
    LazyLock::new(|| selector("button.al6Kxe div.d4r55, button[data-href*=contrib]"));
static RATING_TEXT: LazyLock<Selector> = LazyLock::new(|| selector("span.fzvQIb"));
static RATING_STARS: LazyLock<Selector> = LazyLock::new(|| selector("span.kvMYJc"));
static ANY_LABELLED: LazyLock<Selector> = LazyLock::new(|| selector("[aria-label]"));
static DATE: LazyLock<Selector> = LazyLock::new(|| selector("span.rsqaWe"));
static DATE_ALT: LazyLock<Selector> = LazyLock::new(|| selector("span.xRkPPb"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("span.wiI7pd"));
static BODY_ALT: LazyLock<Selector> = LazyLock::new(|| selector("div.MyEned span"));

static RATING_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([1-5])\s*/\s*5").expect("valid regex"));
static FIRST_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d)").expect("valid regex"));
static STAR_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d)\s*(?:star|étoile|toile|sur|/)").expect("valid regex")
});
static URL_COORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid regex"));

/// A result on the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLink {
    pub name: String,
    pub href: String,
}

/// Name and address shown at the top of a place page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaceHeader {
    pub name: Option<String>,
    pub address: Option<String>,
}

type Strategy<T> = fn(&ElementRef<'_>) -> Option<T>;

fn first_success<T>(el: &ElementRef<'_>, strategies: &[Strategy<T>]) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(el))
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn first_text(el: &ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().map(|e| text_of(&e)).and_then(non_empty)
}

/// Store links on a search results page, de-duplicated by href and kept in
/// page order. Links without a label or href are skipped.
#[must_use]
pub fn parse_store_links(html: &str) -> Vec<StoreLink> {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    doc.select(&STORE_LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim().to_string();
            let name = a.value().attr("aria-label")?.trim().to_string();
            (!href.is_empty() && !name.is_empty()).then_some(StoreLink { name, href })
        })
        .filter(|link| seen.insert(link.href.clone()))
        .collect()
}

fn address_from_button(root: &ElementRef<'_>) -> Option<String> {
    first_text(root, &ADDRESS_BUTTON)
}

fn address_from_label(root: &ElementRef<'_>) -> Option<String> {
    root.select(&LABELLED_BUTTON).find_map(|btn| {
        let label = btn.value().attr("aria-label")?;
        let lowered = label.to_lowercase();
        if !(lowered.contains("dresse") || lowered.contains("ddress")) {
            return None;
        }
        label.rsplit(':').next().map(str::trim).map(str::to_string).and_then(non_empty)
    })
}

const ADDRESS_STRATEGIES: &[Strategy<String>] = &[address_from_button, address_from_label];

/// Name and address from a place page.
#[must_use]
pub fn parse_place_header(html: &str) -> PlaceHeader {
    let doc = Html::parse_document(html);
    let root = doc.root_element();
    PlaceHeader {
        name: first_text(&root, &TITLE),
        address: first_success(&root, ADDRESS_STRATEGIES),
    }
}

/// Coordinates from the `@lat,lng` segment of a maps URL.
#[must_use]
pub fn parse_coordinates(url: &str) -> Option<(f64, f64)> {
    let caps = URL_COORDS.captures(url)?;
    let lat = caps.get(1)?.as_str().parse().ok()?;
    let lng = caps.get(2)?.as_str().parse().ok()?;
    Some((lat, lng))
}

fn digit(raw: &str, pattern: &Regex) -> Option<i64> {
    pattern
        .captures(raw)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|r: &i64| *r > 0)
}

fn rating_from_text_label(el: &ElementRef<'_>) -> Option<i64> {
    let text = first_text(el, &RATING_TEXT)?;
    digit(&text, &RATING_FRACTION)
}

fn rating_from_stars(el: &ElementRef<'_>) -> Option<i64> {
    let label = el.select(&RATING_STARS).next()?.value().attr("aria-label")?;
    digit(label, &FIRST_DIGIT)
}

fn rating_from_any_label(el: &ElementRef<'_>) -> Option<i64> {
    el.select(&ANY_LABELLED)
        .filter_map(|e| e.value().attr("aria-label"))
        .find_map(|label| digit(label, &STAR_LABEL))
}

const RATING_STRATEGIES: &[Strategy<i64>] =
    &[rating_from_text_label, rating_from_stars, rating_from_any_label];

fn body_primary(el: &ElementRef<'_>) -> Option<String> {
    first_text(el, &BODY)
}

fn body_alt(el: &ElementRef<'_>) -> Option<String> {
    first_text(el, &BODY_ALT)
}

const BODY_STRATEGIES: &[Strategy<String>] = &[body_primary, body_alt];

fn reviewer_primary(el: &ElementRef<'_>) -> Option<String> {
    first_text(el, &REVIEWER)
}

fn reviewer_from_button(el: &ElementRef<'_>) -> Option<String> {
    let btn = el.select(&REVIEWER_BUTTON).next()?;
    btn.value()
        .attr("aria-label")
        .map(str::trim)
        .map(str::to_string)
        .and_then(non_empty)
        .or_else(|| non_empty(text_of(&btn)))
}

const REVIEWER_STRATEGIES: &[Strategy<String>] = &[reviewer_primary, reviewer_from_button];

fn date_primary(el: &ElementRef<'_>) -> Option<String> {
    first_text(el, &DATE)
}

fn date_alt(el: &ElementRef<'_>) -> Option<String> {
    first_text(el, &DATE_ALT)
}

const DATE_STRATEGIES: &[Strategy<String>] = &[date_primary, date_alt];

/// Review blocks on a place page. Fields that could not be recovered are
/// left `None`; acceptance is decided by the caller.
#[must_use]
pub fn parse_reviews(html: &str, today: NaiveDate) -> Vec<RawReview> {
    let doc = Html::parse_document(html);
    doc.select(&REVIEW_BLOCK)
        .map(|block| RawReview {
            text: first_success(&block, BODY_STRATEGIES),
            rating: first_success(&block, RATING_STRATEGIES),
            date: first_success(&block, DATE_STRATEGIES)
                .map(|raw| parse_relative_date(&raw, today)),
            reviewer_name: first_success(&block, REVIEWER_STRATEGIES),
        })
        .collect()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
