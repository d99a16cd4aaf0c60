//! Structured extraction pass.
//!
//! Each [`FieldExtractor`] owns one record field and an ordered list of
//! [`Rule`]s. Extractors run independently of each other; the first rule that
//! yields a usable value wins for that field.

use crate::record::MetadataRecord;

use super::Document;

/// Record fields an extractor can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Url,
    Title,
    Description,
    Image,
    Logo,
}

impl Field {
    /// Fields whose values are URLs and get resolved against the page.
    pub fn is_url(self) -> bool {
        matches!(self, Self::Url | Self::Image | Self::Logo)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Title => "title",
            Self::Description => "description",
            Self::Image => "image",
            Self::Logo => "logo",
        }
    }
}

/// A single way of reading a value out of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `content` of `<meta property=KEY>` or `<meta name=KEY>`.
    Meta(&'static str),
    /// `content` of `<meta itemprop=KEY>`.
    Itemprop(&'static str),
    /// `href` of a `<link>` whose `rel` list contains KEY.
    Link(&'static str),
    /// Text of the first matching element with non-blank text.
    Text(&'static str),
    /// Attribute of the first matching element that carries it.
    Attr(&'static str, &'static str),
}

impl Rule {
    pub fn apply(&self, doc: &Document) -> Option<String> {
        match *self {
            Self::Meta(key) => doc.meta(key),
            Self::Itemprop(key) => doc.first_attr(&format!(r#"meta[itemprop="{key}"]"#), "content"),
            Self::Link(rel) => doc.first_attr(&format!(r#"link[rel~="{rel}"]"#), "href"),
            Self::Text(selector) => doc.first_text(selector),
            Self::Attr(selector, attr) => doc.first_attr(selector, attr),
        }
    }
}

/// Proposes a value for one field from an ordered rule list.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    field: Field,
    rules: Vec<Rule>,
}

impl FieldExtractor {
    pub fn new(field: Field, rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            field,
            rules: rules.into_iter().collect(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// First usable value. URL fields must resolve to an absolute http(s) URL,
    /// otherwise the next rule is tried.
    pub fn extract(&self, doc: &Document) -> Option<String> {
        self.rules.iter().find_map(|rule| {
            let value = rule.apply(doc)?;
            if self.field.is_url() {
                doc.absolutize(&value)
            } else {
                Some(value)
            }
        })
    }
}

/// The set of extractors making up the structured pass.
#[derive(Debug, Clone)]
pub struct Extraction {
    extractors: Vec<FieldExtractor>,
}

impl Default for Extraction {
    fn default() -> Self {
        Self::standard()
    }
}

impl Extraction {
    /// An empty pass; every field stays absent and `url` is the final URL.
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Open Graph, Twitter card, microdata and plain HTML conventions.
    pub fn standard() -> Self {
        use Rule::*;

        Self::empty()
            .with(FieldExtractor::new(
                Field::Url,
                [Meta("og:url"), Meta("twitter:url"), Link("canonical")],
            ))
            .with(FieldExtractor::new(
                Field::Title,
                [Meta("og:title"), Meta("twitter:title"), Text("title"), Text("h1")],
            ))
            .with(FieldExtractor::new(
                Field::Description,
                [
                    Meta("og:description"),
                    Meta("twitter:description"),
                    Meta("description"),
                    Itemprop("description"),
                ],
            ))
            .with(FieldExtractor::new(
                Field::Image,
                [
                    Meta("og:image:secure_url"),
                    Meta("og:image:url"),
                    Meta("og:image"),
                    Meta("twitter:image"),
                    Meta("twitter:image:src"),
                    Itemprop("image"),
                    Link("image_src"),
                ],
            ))
            .with(FieldExtractor::new(
                Field::Logo,
                [
                    Meta("og:logo"),
                    Itemprop("logo"),
                    Attr(r#"img[itemprop="logo"]"#, "src"),
                    Link("apple-touch-icon"),
                    Link("apple-touch-icon-precomposed"),
                    Link("icon"),
                ],
            ))
    }

    /// Add an extractor, replacing any existing one for the same field.
    pub fn with(mut self, extractor: FieldExtractor) -> Self {
        self.extractors.retain(|e| e.field() != extractor.field());
        self.extractors.push(extractor);
        self
    }

    /// Run every extractor and assemble the first-pass record.
    pub fn extract(&self, doc: &Document, final_url: &str) -> MetadataRecord {
        let mut record = MetadataRecord::new(final_url);
        for extractor in &self.extractors {
            let Some(value) = extractor.extract(doc) else {
                continue;
            };
            match extractor.field() {
                Field::Url => record.url = value,
                Field::Title => record.title = Some(value),
                Field::Description => record.description = Some(value),
                Field::Image => record.image = Some(value),
                Field::Logo => record.logo = Some(value),
            }
        }
        record
    }
}
