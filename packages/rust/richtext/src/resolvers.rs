//! Per-construct HTML resolvers.
//!
//! Each method turns one portable node, whose children are already
//! rendered, into an HTML fragment. Every method has a default producing
//! the stock `kai-rich-text-*` markup; implementors override only the
//! constructs they want to change. Kinds without a dedicated resolver
//! (`BlockKind::Other`, `MarkKind::Other`) pass their children through.

use tracing::{debug, warn};

use crate::portable::{BlockKind, ImageReference, ItemRelation, ListKind, MarkKind};
use crate::references::ReferenceResolver;

/// Stable CSS class names emitted by the default resolvers.
pub mod classes {
    pub const CONTENT: &str = "kai-rich-text-content";
    pub const ERROR: &str = "kai-rich-text-error";
    pub const H1: &str = "kai-rich-text-h1";
    pub const H2: &str = "kai-rich-text-h2";
    pub const H3: &str = "kai-rich-text-h3";
    pub const H4: &str = "kai-rich-text-h4";
    pub const PARAGRAPH: &str = "kai-rich-text-p";
    pub const ORDERED_LIST: &str = "kai-rich-text-ol";
    pub const UNORDERED_LIST: &str = "kai-rich-text-ul";
    pub const LIST_ITEM: &str = "kai-rich-text-li";
    pub const TABLE_WRAPPER: &str = "kai-rich-text-table-wrapper";
    pub const TABLE: &str = "kai-rich-text-table";
    pub const TABLE_ROW: &str = "kai-rich-text-table-row";
    pub const TABLE_CELL: &str = "kai-rich-text-table-cell";
    pub const IMAGE: &str = "kai-rich-text-image";
    pub const LINKED_ITEM: &str = "linked-item";
    pub const CONTENT_ITEM_LINK: &str = "content-item-link";
}

/// Fallback heading for linked items without a `system.name`.
const LINKED_ITEM_FALLBACK_NAME: &str = "Linked Item";

/// Resolver table, dispatched by construct category.
pub trait HtmlResolvers {
    fn block(&self, kind: &BlockKind, children: &str) -> String {
        match kind {
            BlockKind::Heading1 => wrap("h1", classes::H1, children),
            BlockKind::Heading2 => wrap("h2", classes::H2, children),
            BlockKind::Heading3 => wrap("h3", classes::H3, children),
            BlockKind::Heading4 => wrap("h4", classes::H4, children),
            BlockKind::Paragraph => wrap("p", classes::PARAGRAPH, children),
            BlockKind::Table => assemble_table(children, classes::TABLE),
            BlockKind::TableRow => wrap("tr", classes::TABLE_ROW, children),
            BlockKind::TableCell => wrap("td", classes::TABLE_CELL, children),
            BlockKind::TableHeaderCell => wrap("th", classes::TABLE_CELL, children),
            BlockKind::Other(tag) => {
                debug!(tag = %tag, "no block resolver, passing children through");
                children.to_string()
            }
        }
    }

    fn list(&self, kind: ListKind, children: &str) -> String {
        match kind {
            ListKind::Number => wrap("ol", classes::ORDERED_LIST, children),
            ListKind::Bullet => wrap("ul", classes::UNORDERED_LIST, children),
        }
    }

    fn list_item(&self, _ordered: bool, children: &str) -> String {
        wrap("li", classes::LIST_ITEM, children)
    }

    fn mark(&self, kind: &MarkKind, children: &str, references: &ReferenceResolver<'_>) -> String {
        match kind {
            MarkKind::Strong => format!("<strong>{children}</strong>"),
            MarkKind::Emphasis => format!("<em>{children}</em>"),
            MarkKind::Subscript => format!("<sub>{children}</sub>"),
            MarkKind::Superscript => format!("<sup>{children}</sup>"),
            MarkKind::Code => format!("<code>{children}</code>"),
            MarkKind::Link(link) => {
                let target = if link.new_window { "_blank" } else { "_self" };
                format!(
                    r#"<a href="{}" target="{target}" rel="{}" title="{}">{children}</a>"#,
                    escape_html(&link.href),
                    escape_html(&link.rel),
                    escape_html(&link.title),
                )
            }
            MarkKind::ContentItemLink { item_id } => {
                if references.resolve_link(item_id).is_none() {
                    debug!(item_id = %item_id, "content item link target not in links table");
                }
                format!(
                    r##"<a href="#{}" class="{}">{children}</a>"##,
                    escape_html(item_id),
                    classes::CONTENT_ITEM_LINK,
                )
            }
            MarkKind::Other(tag) => {
                debug!(tag = %tag, "no mark resolver, passing children through");
                children.to_string()
            }
        }
    }

    fn image(&self, reference: &ImageReference, references: &ReferenceResolver<'_>) -> String {
        let id = reference.reference_id().unwrap_or_default();
        match references.resolve_image(id) {
            Some(image) => format!(
                r#"<img src="{}" alt="{}" width="{}" height="{}" class="{}" />"#,
                escape_html(&image.url),
                escape_html(image.description.as_deref().unwrap_or_default()),
                image.width,
                image.height,
                classes::IMAGE,
            ),
            None => {
                warn!(image_id = %id, "image reference not found");
                format!("<div>Image not found: {}</div>", escape_html(id))
            }
        }
    }

    fn component_or_item(
        &self,
        codename: &str,
        relation: ItemRelation,
        references: &ReferenceResolver<'_>,
    ) -> String {
        match references.resolve_linked_item(codename) {
            Some(item) => format!(
                r#"<div class="{}" data-rel="{}"><h3>{}</h3>{}</div>"#,
                classes::LINKED_ITEM,
                relation.as_str(),
                escape_html(item.name().unwrap_or(LINKED_ITEM_FALLBACK_NAME)),
                item.rich_text_body().unwrap_or_default(),
            ),
            None => {
                warn!(codename = %codename, relation = relation.as_str(), "linked item not found");
                format!("<div>Linked item not found: {}</div>", escape_html(codename))
            }
        }
    }

    fn hard_break(&self) -> String {
        "<br />".to_string()
    }

    fn text(&self, text: &str) -> String {
        escape_html(text)
    }
}

/// The stock resolver set.
#[derive(Debug, Clone, Copy, Default)]
pub struct KaiResolvers;

impl HtmlResolvers for KaiResolvers {}

fn wrap(tag: &str, class: &str, children: &str) -> String {
    format!(r#"<{tag} class="{class}">{children}</{tag}>"#)
}

/// Wrap rendered rows in a classed table inside the responsive wrapper.
pub fn assemble_table(rows: &str, table_class: &str) -> String {
    format!(
        r#"<div class="{}"><table class="{table_class}"><tbody>{rows}</tbody></table></div>"#,
        classes::TABLE_WRAPPER,
    )
}

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
