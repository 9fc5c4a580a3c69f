//! Rich-text rendering for KaiCanvas.
//!
//! A rich-text element arrives as markup plus side tables of images and
//! embedded items ([`RichTextDocument`]). Rendering runs in two stages:
//! 1. [`transform_to_portable`] parses the markup into a bounded-depth
//!    [`PortableNode`] tree
//! 2. [`RichTextRenderer`] resolves that tree bottom-up through an
//!    [`HtmlResolvers`] table, looking references up via [`ReferenceResolver`]
//!
//! [`RichTextRenderer::render`] never fails: parse and resolver failures come
//! back as a visible error fragment.

pub mod document;
pub mod portable;
pub mod references;
pub mod render;
pub mod resolvers;
pub mod transform;

pub use document::{ImageRef, ItemSystem, LinkTarget, LinkedItem, RichTextDocument};
pub use portable::{
    BlockKind, ImageReference, InlineRef, ItemRelation, LinkMarkValue, ListKind, MarkKind,
    PortableNode,
};
pub use references::ReferenceResolver;
pub use render::{RichTextRenderer, error_fragment};
pub use resolvers::{HtmlResolvers, KaiResolvers, assemble_table, classes, escape_html};
pub use transform::{transform_to_portable, transform_with_limit};

/// Render a document with the stock resolvers and default limits.
pub fn render(document: &RichTextDocument) -> String {
    RichTextRenderer::new().render(document)
}
