//! Portable tree → HTML, bottom-up, behind a failure boundary.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{error, instrument};

use kaicanvas_shared::{KaiCanvasError, RenderConfig, Result};

use crate::document::RichTextDocument;
use crate::portable::{InlineRef, PortableNode};
use crate::references::ReferenceResolver;
use crate::resolvers::{HtmlResolvers, KaiResolvers, classes, escape_html};
use crate::transform::{nesting_exceeded, transform_with_limit};

/// Shown when a component has no rich-text data at all.
const NO_CONTENT_HTML: &str = "<div>No rich text content available</div>";

/// Renders rich-text documents through a resolver table.
#[derive(Debug, Clone)]
pub struct RichTextRenderer<R = KaiResolvers> {
    resolvers: R,
    max_depth: usize,
}

impl RichTextRenderer<KaiResolvers> {
    /// Renderer with the stock resolvers and default limits.
    pub fn new() -> Self {
        Self::from_config(&RenderConfig::default())
    }

    /// Renderer with the stock resolvers and limits from config.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            resolvers: KaiResolvers,
            max_depth: config.max_depth,
        }
    }
}

impl Default for RichTextRenderer<KaiResolvers> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HtmlResolvers> RichTextRenderer<R> {
    /// Renderer with a custom resolver table.
    pub fn with_resolvers(resolvers: R) -> Self {
        Self {
            resolvers,
            max_depth: RenderConfig::default().max_depth,
        }
    }

    /// Override the maximum nesting depth.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Render a document to the content wrapper, or to the error wrapper
    /// when parsing or any resolver fails. Never fails, never panics.
    #[instrument(skip_all, fields(len = document.value.len()))]
    pub fn render(&self, document: &RichTextDocument) -> String {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.to_html(document)))
            .unwrap_or_else(|payload| Err(KaiCanvasError::Render(panic_message(&*payload))));

        match outcome {
            Ok(html) => format!(r#"<div class="{}">{html}</div>"#, classes::CONTENT),
            Err(e) => {
                error!(error = %e, "error parsing or rendering rich text");
                error_fragment(&e)
            }
        }
    }

    /// Like [`render`](Self::render), for a component whose rich-text
    /// parameter may be absent.
    pub fn render_component(&self, document: Option<&RichTextDocument>) -> String {
        match document {
            Some(document) => self.render(document),
            None => NO_CONTENT_HTML.to_string(),
        }
    }

    /// Transform and resolve without the failure boundary.
    pub fn to_html(&self, document: &RichTextDocument) -> Result<String> {
        let nodes = transform_with_limit(&document.value, self.max_depth)?;
        self.render_nodes(&nodes, &ReferenceResolver::new(document))
    }

    /// Resolve an already-transformed node sequence, concatenating siblings.
    ///
    /// Trees built by hand are held to the same nesting limit.
    pub fn render_nodes(
        &self,
        nodes: &[PortableNode],
        references: &ReferenceResolver<'_>,
    ) -> Result<String> {
        self.render_siblings(nodes, references, 1)
    }

    fn render_siblings(
        &self,
        nodes: &[PortableNode],
        references: &ReferenceResolver<'_>,
        depth: usize,
    ) -> Result<String> {
        let mut html = String::new();
        for node in nodes {
            html.push_str(&self.render_node(node, references, depth)?);
        }
        Ok(html)
    }

    fn render_node(
        &self,
        node: &PortableNode,
        references: &ReferenceResolver<'_>,
        depth: usize,
    ) -> Result<String> {
        if depth > self.max_depth {
            return Err(nesting_exceeded(self.max_depth));
        }

        let r = &self.resolvers;
        let html = match node {
            PortableNode::Block { kind, children } => {
                r.block(kind, &self.render_siblings(children, references, depth + 1)?)
            }
            PortableNode::List { kind, children } => {
                r.list(*kind, &self.render_siblings(children, references, depth + 1)?)
            }
            PortableNode::ListItem { ordered, children } => {
                r.list_item(*ordered, &self.render_siblings(children, references, depth + 1)?)
            }
            PortableNode::Mark { kind, children } => r.mark(
                kind,
                &self.render_siblings(children, references, depth + 1)?,
                references,
            ),
            PortableNode::InlineRef(InlineRef::Image(reference)) => r.image(reference, references),
            PortableNode::InlineRef(InlineRef::ComponentOrItem { codename, relation }) => {
                r.component_or_item(codename, *relation, references)
            }
            PortableNode::HardBreak => r.hard_break(),
            PortableNode::Text(text) => r.text(text),
        };
        Ok(html)
    }
}

/// Visible error wrapper carrying the stringified error.
pub fn error_fragment(error: &KaiCanvasError) -> String {
    format!(
        r#"<div class="{}">Error rendering rich text content: {}</div>"#,
        classes::ERROR,
        escape_html(&error.to_string()),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "resolver panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ImageRef, ItemSystem, LinkedItem};
    use crate::portable::MarkKind;
    use serde_json::json;

    fn doc(value: &str) -> RichTextDocument {
        RichTextDocument {
            value: value.into(),
            ..Default::default()
        }
    }

    fn load_fixture() -> RichTextDocument {
        let fixture = std::fs::read_to_string("../../../fixtures/json/rich-text.fixture.json")
            .expect("read fixture");
        serde_json::from_str(&fixture).expect("deserialize fixture")
    }

    #[test]
    fn renders_inside_content_wrapper() {
        let html = RichTextRenderer::new().render(&doc("<p>Hello <strong>world</strong></p>"));
        assert_eq!(
            html,
            r#"<div class="kai-rich-text-content"><p class="kai-rich-text-p">Hello <strong>world</strong></p></div>"#
        );
    }

    #[test]
    fn ordered_list_renders_two_items() {
        let html = RichTextRenderer::new()
            .to_html(&doc("<ol><li>One</li><li>Two</li></ol>"))
            .unwrap();
        assert_eq!(
            html,
            r#"<ol class="kai-rich-text-ol"><li class="kai-rich-text-li">One</li><li class="kai-rich-text-li">Two</li></ol>"#
        );
    }

    #[test]
    fn unordered_list_uses_ul_wrapper() {
        let html = RichTextRenderer::new()
            .to_html(&doc("<ul><li>a</li></ul>"))
            .unwrap();
        assert!(html.starts_with(r#"<ul class="kai-rich-text-ul">"#));
    }

    #[test]
    fn text_is_escaped() {
        let html = RichTextRenderer::new()
            .to_html(&doc("<p>1 &lt; 2 &amp; 3</p>"))
            .unwrap();
        assert_eq!(html, r#"<p class="kai-rich-text-p">1 &lt; 2 &amp; 3</p>"#);
    }

    #[test]
    fn image_in_table_resolves() {
        let mut document = doc(
            r#"<table><tbody><tr><td><figure data-image-id="i1"><img src="https://x/i.png" alt=""></figure></td></tr></tbody></table>"#,
        );
        document.images.insert(
            "i1".into(),
            ImageRef {
                url: "https://x/i.png".into(),
                width: 32,
                height: 16,
                image_id: "i1".into(),
                description: None,
            },
        );

        let html = RichTextRenderer::new().to_html(&document).unwrap();
        assert_eq!(
            html,
            r#"<div class="kai-rich-text-table-wrapper"><table class="kai-rich-text-table"><tbody><tr class="kai-rich-text-table-row"><td class="kai-rich-text-table-cell"><img src="https://x/i.png" alt="" width="32" height="16" class="kai-rich-text-image" /></td></tr></tbody></table></div>"#
        );
    }

    #[test]
    fn missing_references_render_placeholders() {
        let html = RichTextRenderer::new().render(&doc(
            r#"<figure data-image-id="lost-image"></figure><object type="application/kenticocloud" data-type="item" data-rel="link" data-codename="lost_item"></object>"#,
        ));
        assert!(html.contains("Image not found: lost-image"));
        assert!(html.contains("Linked item not found: lost_item"));
        assert!(html.starts_with(r#"<div class="kai-rich-text-content">"#));
    }

    #[test]
    fn linked_item_renders_name_and_body() {
        let mut document = doc(
            r#"<object type="application/kenticocloud" data-type="item" data-rel="component" data-codename="tip"></object>"#,
        );
        document.modular_content_items.insert(
            "tip".into(),
            LinkedItem {
                system: Some(ItemSystem {
                    name: Some("Pro tip".into()),
                    ..Default::default()
                }),
                elements: json!({ "richtext": { "value": "<p>Use the CLI</p>" } })
                    .as_object()
                    .cloned()
                    .unwrap(),
            },
        );

        let html = RichTextRenderer::new().to_html(&document).unwrap();
        assert_eq!(
            html,
            r#"<div class="linked-item" data-rel="component"><h3>Pro tip</h3><p>Use the CLI</p></div>"#
        );
    }

    #[test]
    fn malformed_markup_renders_error_fragment() {
        let html = RichTextRenderer::new().render(&doc("<p>broken</div>"));
        assert!(html.starts_with(r#"<div class="kai-rich-text-error">"#));
        assert!(html.contains("Error"));
        assert!(html.contains("parse error"));
    }

    #[test]
    fn depth_limit_is_contained() {
        let nested = format!("<p>{}x{}</p>", "<em>".repeat(8), "</em>".repeat(8));
        let renderer = RichTextRenderer::new().max_depth(4);
        assert!(renderer.to_html(&doc(&nested)).is_err());
        assert!(renderer.render(&doc(&nested)).contains("nesting exceeds 4 levels"));
    }

    #[test]
    fn thousands_of_nested_inlines_render_the_error_fragment() {
        let n = 10_000;
        let markup = format!("<p>{}x{}</p>", "<span>".repeat(n), "</span>".repeat(n));
        let html = RichTextRenderer::new().render(&doc(&markup));
        assert!(html.starts_with(r#"<div class="kai-rich-text-error">"#));
        assert!(html.contains("nesting exceeds 64 levels"));
    }

    #[test]
    fn hand_built_trees_are_held_to_the_limit() {
        let mut node = PortableNode::Text("x".into());
        for _ in 0..5 {
            node = PortableNode::Mark {
                kind: MarkKind::Emphasis,
                children: vec![node],
            };
        }
        let document = RichTextDocument::default();
        let references = ReferenceResolver::new(&document);
        let renderer = RichTextRenderer::new().max_depth(5);
        assert!(renderer.render_nodes(&[node.clone()], &references).is_err());
        assert!(renderer.max_depth(6).render_nodes(&[node], &references).is_ok());
    }

    #[test]
    fn header_cells_render_as_th() {
        let html = RichTextRenderer::new()
            .to_html(&doc("<table><tr><th>Key</th><td>Value</td></tr></table>"))
            .unwrap();
        assert!(html.contains(r#"<th class="kai-rich-text-table-cell">Key</th>"#));
        assert!(html.contains(r#"<td class="kai-rich-text-table-cell">Value</td>"#));
    }

    #[test]
    fn panicking_resolver_is_contained() {
        struct Exploding;
        impl HtmlResolvers for Exploding {
            fn hard_break(&self) -> String {
                panic!("boom")
            }
        }

        let html = RichTextRenderer::with_resolvers(Exploding).render(&doc("<p>a<br>b</p>"));
        assert!(html.contains("Error rendering rich text content"));
        assert!(html.contains("boom"));
    }

    #[test]
    fn custom_resolver_overrides_one_construct() {
        struct PlainBreaks;
        impl HtmlResolvers for PlainBreaks {
            fn hard_break(&self) -> String {
                "<br>".into()
            }
        }

        let html = RichTextRenderer::with_resolvers(PlainBreaks)
            .to_html(&doc("<p>a<br>b</p>"))
            .unwrap();
        assert_eq!(html, r#"<p class="kai-rich-text-p">a<br>b</p>"#);
    }

    #[test]
    fn absent_component_data() {
        assert_eq!(
            RichTextRenderer::new().render_component(None),
            "<div>No rich text content available</div>"
        );
    }

    #[test]
    fn fixture_renders_every_construct() {
        let html = RichTextRenderer::new().render(&load_fixture());

        assert!(html.contains(r#"<h1 class="kai-rich-text-h1">Release notes</h1>"#));
        assert!(html.contains(
            r#"<a href="https://example.com/docs" target="_blank" rel="" title="Docs">docs</a>"#
        ));
        assert!(html.contains(
            r##"<a href="#8c4b2b56-0a43-4d3c-9f5b-2a1b7c0d9e01" class="content-item-link">overview</a>"##
        ));
        assert!(html.contains(r#"<ul class="kai-rich-text-ul">"#));
        assert!(html.contains(r#"width="1200" height="630""#));
        assert!(html.contains(r#"alt="Architecture diagram""#));
        assert!(html.contains("<h3>Callout</h3><p>Embedded callout body</p>"));
        assert!(html.contains(r#"<table class="kai-rich-text-table">"#));
        assert!(!html.contains("not found"));
    }
}
