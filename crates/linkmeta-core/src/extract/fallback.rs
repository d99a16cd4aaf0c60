//! Per-field fallback chains applied after the structured pass.
//!
//! A chain only runs when its field is still empty. Resolvers are evaluated in
//! order and the first one returning a value wins; the rest are never called.
//! Each resolver looks at the first element its query matches, in document
//! order, and takes that element's value as-is.

use std::sync::LazyLock;

use scraper::Selector;

use crate::record::MetadataRecord;

use super::{Document, Field};

static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:image"]"#).expect("og:image selector should parse")
});
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:title"]"#).expect("og:title selector should parse")
});
static OG_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:description"]"#)
        .expect("og:description selector should parse")
});
static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("description selector should parse")
});
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("img selector should parse"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector should parse"));

/// A pure lookup of one candidate value.
pub type ResolveFn = fn(&Document) -> Option<String>;

/// A named resolver, so chains can be inspected and logged.
#[derive(Clone, Copy)]
pub struct Resolver {
    pub name: &'static str,
    resolve: ResolveFn,
}

impl Resolver {
    pub const fn new(name: &'static str, resolve: ResolveFn) -> Self {
        Self { name, resolve }
    }

    pub fn resolve(&self, doc: &Document) -> Option<String> {
        (self.resolve)(doc)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Resolver").field(&self.name).finish()
    }
}

pub const OG_IMAGE_CONTENT: Resolver = Resolver::new("og:image", |doc| {
    doc.attr_of_first(&OG_IMAGE, "content")
});
pub const FIRST_IMG_SRC: Resolver = Resolver::new("img[src]", |doc| doc.attr_of_first(&IMG, "src"));
pub const OG_TITLE_CONTENT: Resolver = Resolver::new("og:title", |doc| {
    doc.attr_of_first(&OG_TITLE, "content")
});
pub const DOCUMENT_TITLE: Resolver = Resolver::new("title", |doc| doc.text_of_first(&TITLE));
pub const OG_DESCRIPTION_CONTENT: Resolver = Resolver::new("og:description", |doc| {
    doc.attr_of_first(&OG_DESCRIPTION, "content")
});
pub const META_DESCRIPTION_CONTENT: Resolver = Resolver::new("meta[name=description]", |doc| {
    doc.attr_of_first(&META_DESCRIPTION, "content")
});

/// Ordered resolvers for one field.
#[derive(Debug, Clone)]
pub struct FallbackChain {
    field: Field,
    resolvers: Vec<Resolver>,
}

impl FallbackChain {
    pub fn new(field: Field, resolvers: impl IntoIterator<Item = Resolver>) -> Self {
        Self {
            field,
            resolvers: resolvers.into_iter().collect(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn resolvers(&self) -> &[Resolver] {
        &self.resolvers
    }

    pub fn resolve(&self, doc: &Document) -> Option<String> {
        self.resolvers.iter().find_map(|resolver| {
            let value = resolver.resolve(doc)?;
            tracing::trace!(
                field = self.field.as_str(),
                resolver = resolver.name,
                "fallback resolved"
            );
            Some(value)
        })
    }
}

/// The fallback chains applied to every scraped record.
#[derive(Debug, Clone)]
pub struct FallbackPolicy {
    chains: Vec<FallbackChain>,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

impl FallbackPolicy {
    /// image: og:image → first `<img>`; title: og:title → `<title>`;
    /// description: og:description → `meta[name=description]`.
    pub fn standard() -> Self {
        Self {
            chains: vec![
                FallbackChain::new(Field::Image, [OG_IMAGE_CONTENT, FIRST_IMG_SRC]),
                FallbackChain::new(Field::Title, [OG_TITLE_CONTENT, DOCUMENT_TITLE]),
                FallbackChain::new(
                    Field::Description,
                    [OG_DESCRIPTION_CONTENT, META_DESCRIPTION_CONTENT],
                ),
            ],
        }
    }

    /// Same as [`FallbackPolicy::standard`] but the image chain stops at og:image.
    pub fn og_image_only() -> Self {
        let mut policy = Self::standard();
        policy.chains[0] = FallbackChain::new(Field::Image, [OG_IMAGE_CONTENT]);
        policy
    }

    pub fn chains(&self) -> &[FallbackChain] {
        &self.chains
    }

    /// Fill empty fields of `record` from their chains.
    pub fn apply(&self, doc: &Document, record: &mut MetadataRecord) {
        for chain in &self.chains {
            let slot = match chain.field() {
                Field::Title => &mut record.title,
                Field::Description => &mut record.description,
                Field::Image => &mut record.image,
                Field::Logo => &mut record.logo,
                // The URL always has a value.
                Field::Url => continue,
            };
            if slot.is_none() {
                *slot = chain.resolve(doc);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/";

    fn doc(head: &str, body: &str) -> Document {
        Document::parse(
            &format!("<html><head>{head}</head><body>{body}</body></html>"),
            URL,
        )
    }

    fn apply(policy: &FallbackPolicy, doc: &Document) -> MetadataRecord {
        let mut record = MetadataRecord::new(URL);
        policy.apply(doc, &mut record);
        record
    }

    #[test]
    fn test_og_title_beats_document_title() {
        let page = doc(
            r#"<meta property="og:title" content="Acme"><title>Acme Corp — Home</title>"#,
            "",
        );
        let record = apply(&FallbackPolicy::standard(), &page);
        assert_eq!(record.title.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_document_title_when_og_title_missing() {
        let page = doc("<title>Acme Corp — Home</title>", "");
        let record = apply(&FallbackPolicy::standard(), &page);
        assert_eq!(record.title.as_deref(), Some("Acme Corp — Home"));
    }

    #[test]
    fn test_meta_description_when_og_description_missing() {
        let page = doc(r#"<meta name="description" content="Plain description">"#, "");
        let record = apply(&FallbackPolicy::standard(), &page);
        assert_eq!(record.description.as_deref(), Some("Plain description"));
    }

    #[test]
    fn test_og_description_beats_meta_description() {
        let page = doc(
            r#"<meta name="description" content="Plain"><meta property="og:description" content="OG">"#,
            "",
        );
        let record = apply(&FallbackPolicy::standard(), &page);
        assert_eq!(record.description.as_deref(), Some("OG"));
    }

    #[test]
    fn test_first_img_when_no_og_image() {
        let page = doc("", r#"<img src="/first.png"><img src="/second.png">"#);
        let record = apply(&FallbackPolicy::standard(), &page);
        assert_eq!(record.image.as_deref(), Some("/first.png"));
    }

    #[test]
    fn test_og_image_only_policy_skips_img() {
        let page = doc("", r#"<img src="/first.png">"#);
        let record = apply(&FallbackPolicy::og_image_only(), &page);
        assert!(record.image.is_none());
        assert_eq!(FallbackPolicy::og_image_only().chains()[0].resolvers().len(), 1);
    }

    #[test]
    fn test_existing_values_are_not_overwritten() {
        let page = doc(r#"<meta property="og:title" content="From page">"#, "");
        let mut record = MetadataRecord::new(URL);
        record.title = Some("From structured pass".to_string());
        FallbackPolicy::standard().apply(&page, &mut record);
        assert_eq!(record.title.as_deref(), Some("From structured pass"));
    }

    #[test]
    fn test_nothing_found_leaves_fields_absent() {
        let record = apply(&FallbackPolicy::standard(), &doc("", "<p>text</p>"));
        assert!(record.is_bare());
    }

    #[test]
    fn test_chain_never_consults_later_resolvers_after_a_hit() {
        static SECOND_CALLED: std::sync::atomic::AtomicBool =
            std::sync::atomic::AtomicBool::new(false);

        let chain = FallbackChain::new(
            Field::Title,
            [
                Resolver::new("first", |_| Some("first".to_string())),
                Resolver::new("second", |_| {
                    SECOND_CALLED.store(true, std::sync::atomic::Ordering::SeqCst);
                    Some("second".to_string())
                }),
            ],
        );

        assert_eq!(chain.resolve(&doc("", "")).as_deref(), Some("first"));
        assert!(!SECOND_CALLED.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_standard_chain_order() {
        let names: Vec<Vec<&str>> = FallbackPolicy::standard()
            .chains()
            .iter()
            .map(|c| c.resolvers().iter().map(|r| r.name).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["og:image", "img[src]"],
                vec!["og:title", "title"],
                vec!["og:description", "meta[name=description]"],
            ]
        );
    }
}
