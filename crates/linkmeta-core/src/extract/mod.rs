//! HTML metadata extraction.
//!
//! Two passes over the rendered document:
//!
//! 1. **Structured pass** ([`Extraction`]): independent per-field extractors
//!    reading Open Graph, Twitter card, microdata and plain HTML conventions.
//! 2. **Fallbacks** ([`FallbackPolicy`]): ordered resolver chains filling any
//!    field the structured pass left empty.

mod document;
mod fallback;
mod structured;

pub use document::Document;
pub use fallback::{
    DOCUMENT_TITLE, FIRST_IMG_SRC, FallbackChain, FallbackPolicy, META_DESCRIPTION_CONTENT,
    OG_DESCRIPTION_CONTENT, OG_IMAGE_CONTENT, OG_TITLE_CONTENT, ResolveFn, Resolver,
};
pub use structured::{Extraction, Field, FieldExtractor, Rule};

use crate::record::MetadataRecord;

/// Run both passes over `html` rendered at `final_url`.
pub fn extract_metadata(
    html: &str,
    final_url: &str,
    extraction: &Extraction,
    fallbacks: &FallbackPolicy,
) -> MetadataRecord {
    let doc = Document::parse(html, final_url);
    let mut record = extraction.extract(&doc, final_url);
    fallbacks.apply(&doc, &mut record);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> MetadataRecord {
        extract_metadata(
            html,
            "https://example.com/",
            &Extraction::standard(),
            &FallbackPolicy::standard(),
        )
    }

    #[test]
    fn test_acme_title_with_and_without_og_title() {
        let with_og = run(
            r#"<html><head><meta property="og:title" content="Acme"><title>Acme Corp — Home</title></head></html>"#,
        );
        assert_eq!(with_og.title.as_deref(), Some("Acme"));

        let without_og = run("<html><head><title>Acme Corp — Home</title></head></html>");
        assert_eq!(without_og.title.as_deref(), Some("Acme Corp — Home"));
    }

    #[test]
    fn test_description_from_plain_meta_only() {
        let record = run(
            r#"<html><head><meta name="description" content="Exactly this text."></head></html>"#,
        );
        assert_eq!(record.description.as_deref(), Some("Exactly this text."));
    }

    #[test]
    fn test_image_falls_back_to_first_img_when_structured_pass_is_empty() {
        let record = run(r#"<html><body><img src="/a.png"><img src="/b.png"></body></html>"#);
        assert_eq!(record.image.as_deref(), Some("/a.png"));
    }

    #[test]
    fn test_fallbacks_fill_gaps_left_by_a_narrow_structured_pass() {
        let record = extract_metadata(
            r#"<html><head><title>Only title</title><meta name="description" content="d"></head></html>"#,
            "https://example.com/",
            &Extraction::empty(),
            &FallbackPolicy::standard(),
        );
        assert_eq!(record.title.as_deref(), Some("Only title"));
        assert_eq!(record.description.as_deref(), Some("d"));
    }

    #[test]
    fn test_empty_document_is_valid_output() {
        let record = run("");
        assert_eq!(record.url, "https://example.com/");
        assert!(record.is_bare());
    }
}
