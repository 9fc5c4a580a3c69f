//! Side-table lookups for reference placeholders.
//!
//! A miss is `None`, never an error: callers render a visible placeholder.

use crate::document::{ImageRef, LinkTarget, LinkedItem, RichTextDocument};

/// Borrowed view over a document's side tables.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    document: &'a RichTextDocument,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(document: &'a RichTextDocument) -> Self {
        Self { document }
    }

    /// Look up an inline image by id.
    pub fn resolve_image(&self, id: &str) -> Option<&'a ImageRef> {
        self.document.images.get(id)
    }

    /// Look up an embedded item by codename.
    pub fn resolve_linked_item(&self, codename: &str) -> Option<&'a LinkedItem> {
        self.document.modular_content_items.get(codename)
    }

    /// Look up the target of a content-item link by item id.
    pub fn resolve_link(&self, item_id: &str) -> Option<&'a LinkTarget> {
        self.document.links.get(item_id)
    }
}
