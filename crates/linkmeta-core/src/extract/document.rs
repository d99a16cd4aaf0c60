//! Parsed HTML document with the lookups the extractors need.

use scraper::{Html, Selector};
use url::Url;

/// A rendered page, parsed once and queried by every extractor.
///
/// Not `Send`: build it, extract, and drop it without crossing an `.await`.
pub struct Document {
    html: Html,
    base: Option<Url>,
}

impl Document {
    /// Parse `html`, resolving relative URLs against `base_url`.
    pub fn parse(html: &str, base_url: &str) -> Self {
        Self {
            html: Html::parse_document(html),
            base: Url::parse(base_url).ok(),
        }
    }

    /// Content of the first `<meta property=key>` or `<meta name=key>` with a
    /// non-empty value.
    pub fn meta(&self, key: &str) -> Option<String> {
        self.first_attr(
            &format!(r#"meta[property="{key}"], meta[name="{key}"]"#),
            "content",
        )
    }

    /// First non-empty `attr` among elements matching `selector`, in document order.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        self.html
            .select(&selector)
            .find_map(|el| el.value().attr(attr).and_then(clean_attr))
    }

    /// `attr` of the first element matching `selector`, if that element has it.
    ///
    /// Unlike [`Document::first_attr`], later matches are never consulted.
    pub fn attr_of_first(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.html
            .select(selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .and_then(clean_attr)
    }

    /// Text of the first element matching `selector` with non-blank text.
    pub fn first_text(&self, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).ok()?;
        self.html
            .select(&selector)
            .find_map(|el| clean_text(&el.text().collect::<String>()))
    }

    /// Text of the first element matching `selector`.
    pub fn text_of_first(&self, selector: &Selector) -> Option<String> {
        self.html
            .select(selector)
            .next()
            .and_then(|el| clean_text(&el.text().collect::<String>()))
    }

    /// Resolve `raw` against the page URL, keeping only http(s) results.
    pub fn absolutize(&self, raw: &str) -> Option<String> {
        let resolved = match &self.base {
            Some(base) => base.join(raw).ok()?,
            None => Url::parse(raw).ok()?,
        };
        matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
    }
}

/// Trim an attribute value; blank values count as absent.
fn clean_attr(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Collapse runs of whitespace the way browsers do for `document.title`.
fn clean_text(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}
