//! Rich-text markup → portable node tree.
//!
//! The markup is parsed with `scraper` (html5ever). Any syntax error the
//! parser reports rejects the whole document; there is no partial recovery.
//! Nesting is bounded: html5ever builds arbitrarily deep trees without
//! recursing, but the walk below does not.

use scraper::{ElementRef, Html, Node};
use tracing::{debug, instrument};

use kaicanvas_shared::{KaiCanvasError, RenderConfig, Result};

use crate::portable::{
    BlockKind, ImageReference, InlineRef, ItemRelation, LinkMarkValue, ListKind, MarkKind,
    PortableNode,
};

/// `type` attribute of linked-item placeholders.
const LINKED_ITEM_OBJECT_TYPE: &str = "application/kenticocloud";

/// Elements whose whitespace-only text children are layout noise.
const CONTAINER_TAGS: &[&str] = &["ul", "ol", "table", "thead", "tbody", "tfoot", "tr"];

/// Parse rich-text markup into a root-level sequence of portable nodes,
/// with the default nesting limit.
///
/// Fails with a parse error when the parser reports a syntax error, when a
/// reference placeholder has no id, or when text appears outside any block.
pub fn transform_to_portable(markup: &str) -> Result<Vec<PortableNode>> {
    transform_with_limit(markup, RenderConfig::default().max_depth)
}

/// Like [`transform_to_portable`], failing with a render error once
/// elements nest deeper than `max_depth` levels (root blocks are level 1).
#[instrument(skip(markup), fields(len = markup.len()))]
pub fn transform_with_limit(markup: &str, max_depth: usize) -> Result<Vec<PortableNode>> {
    if markup.trim().is_empty() {
        return Ok(Vec::new());
    }

    let fragment = Html::parse_fragment(markup);
    if let Some(first) = fragment.errors.first() {
        return Err(KaiCanvasError::parse(format!(
            "malformed rich-text markup: {first}"
        )));
    }

    let walker = Walker { max_depth };
    let mut nodes = Vec::new();
    for child in fragment.root_element().children() {
        match child.value() {
            Node::Text(text) => {
                let text: &str = text;
                if !text.trim().is_empty() {
                    return Err(KaiCanvasError::parse(format!(
                        "text outside of a block: {:?}",
                        text.trim()
                    )));
                }
            }
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    nodes.push(walker.element(element, 1)?);
                }
            }
            _ => {}
        }
    }

    debug!(blocks = nodes.len(), "markup transformed");
    Ok(nodes)
}

/// Error for a tree nested deeper than `max_depth`.
pub(crate) fn nesting_exceeded(max_depth: usize) -> KaiCanvasError {
    KaiCanvasError::Render(format!("document nesting exceeds {max_depth} levels"))
}

/// Recursive element walk; `depth` is the level of the element being built.
struct Walker {
    max_depth: usize,
}

impl Walker {
    fn element(&self, element: ElementRef<'_>, depth: usize) -> Result<PortableNode> {
        if depth > self.max_depth {
            return Err(nesting_exceeded(self.max_depth));
        }

        let name = element.value().name();
        let node = match name {
            "p" => self.block(BlockKind::Paragraph, element, depth)?,
            "h1" => self.block(BlockKind::Heading1, element, depth)?,
            "h2" => self.block(BlockKind::Heading2, element, depth)?,
            "h3" => self.block(BlockKind::Heading3, element, depth)?,
            "h4" => self.block(BlockKind::Heading4, element, depth)?,
            "ul" => PortableNode::List {
                kind: ListKind::Bullet,
                children: self.children(element, depth)?,
            },
            "ol" => PortableNode::List {
                kind: ListKind::Number,
                children: self.children(element, depth)?,
            },
            "li" => PortableNode::ListItem {
                ordered: parent_name(element) == Some("ol"),
                children: self.children(element, depth)?,
            },
            "table" => PortableNode::Block {
                kind: BlockKind::Table,
                children: self.rows(element, depth)?,
            },
            "tr" => self.block(BlockKind::TableRow, element, depth)?,
            "td" => self.block(BlockKind::TableCell, element, depth)?,
            "th" => self.block(BlockKind::TableHeaderCell, element, depth)?,
            "figure" | "img" => {
                PortableNode::InlineRef(InlineRef::Image(image_reference(element)?))
            }
            "object" if element.value().attr("type") == Some(LINKED_ITEM_OBJECT_TYPE) => {
                linked_item(element)?
            }
            "strong" | "b" => self.mark(MarkKind::Strong, element, depth)?,
            "em" | "i" => self.mark(MarkKind::Emphasis, element, depth)?,
            "sub" => self.mark(MarkKind::Subscript, element, depth)?,
            "sup" => self.mark(MarkKind::Superscript, element, depth)?,
            "code" => self.mark(MarkKind::Code, element, depth)?,
            "a" => self.mark(link_mark(element), element, depth)?,
            "br" => PortableNode::HardBreak,
            other => self.block(BlockKind::Other(other.to_string()), element, depth)?,
        };

        Ok(node)
    }

    fn children(&self, element: ElementRef<'_>, depth: usize) -> Result<Vec<PortableNode>> {
        let skip_blank = CONTAINER_TAGS.contains(&element.value().name());
        let mut nodes = Vec::new();

        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let text: &str = text;
                    if skip_blank && text.trim().is_empty() {
                        continue;
                    }
                    nodes.push(PortableNode::Text(text.to_string()));
                }
                Node::Element(_) => {
                    if let Some(child_el) = ElementRef::wrap(child) {
                        nodes.push(self.element(child_el, depth + 1)?);
                    }
                }
                _ => {}
            }
        }

        Ok(nodes)
    }

    fn block(&self, kind: BlockKind, element: ElementRef<'_>, depth: usize) -> Result<PortableNode> {
        Ok(PortableNode::Block {
            kind,
            children: self.children(element, depth)?,
        })
    }

    fn mark(&self, kind: MarkKind, element: ElementRef<'_>, depth: usize) -> Result<PortableNode> {
        Ok(PortableNode::Mark {
            kind,
            children: self.children(element, depth)?,
        })
    }

    /// Rows of a table, looking through `thead`/`tbody`/`tfoot` sections.
    /// Rows sit one level below the table whatever section holds them.
    fn rows(&self, table: ElementRef<'_>, depth: usize) -> Result<Vec<PortableNode>> {
        let mut rows = Vec::new();
        for child in table.children().filter_map(ElementRef::wrap) {
            match child.value().name() {
                "tr" => rows.push(self.element(child, depth + 1)?),
                "thead" | "tbody" | "tfoot" => rows.extend(self.rows(child, depth)?),
                other => debug!(tag = other, "skipping non-row table child"),
            }
        }
        Ok(rows)
    }
}

/// Build an image reference from the element, or from a nested `<img>`.
fn image_reference(element: ElementRef<'_>) -> Result<ImageReference> {
    let from_attrs = |el: ElementRef<'_>| ImageReference {
        image_id: non_empty_attr(el, "data-image-id"),
        asset_id: non_empty_attr(el, "data-asset-id"),
    };

    let mut reference = from_attrs(element);
    if reference.reference_id().is_none() {
        if let Some(img) = element
            .children()
            .filter_map(ElementRef::wrap)
            .find(|c| c.value().name() == "img")
        {
            reference = from_attrs(img);
        }
    }

    if reference.reference_id().is_none() {
        return Err(KaiCanvasError::parse(
            "image placeholder without data-image-id or data-asset-id",
        ));
    }
    Ok(reference)
}

fn linked_item(element: ElementRef<'_>) -> Result<PortableNode> {
    let codename = non_empty_attr(element, "data-codename").ok_or_else(|| {
        KaiCanvasError::parse("linked item placeholder without data-codename")
    })?;
    let relation = match element.value().attr("data-rel") {
        Some("component") => ItemRelation::Component,
        _ => ItemRelation::Link,
    };
    Ok(PortableNode::InlineRef(InlineRef::ComponentOrItem {
        codename,
        relation,
    }))
}

fn link_mark(element: ElementRef<'_>) -> MarkKind {
    let el = element.value();
    if let Some(item_id) = non_empty_attr(element, "data-item-id") {
        return MarkKind::ContentItemLink { item_id };
    }

    MarkKind::Link(LinkMarkValue {
        href: el.attr("href").unwrap_or_default().to_string(),
        new_window: matches!(el.attr("data-new-window"), Some(v) if !v.is_empty() && v != "false"),
        rel: el.attr("rel").unwrap_or_default().to_string(),
        title: el.attr("title").unwrap_or_default().to_string(),
    })
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parent_name<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .parent()
        .and_then(ElementRef::wrap)
        .map(|parent| parent.value().name())
}
