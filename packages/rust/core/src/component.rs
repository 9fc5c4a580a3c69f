//! Rendering of the display components a composition carries: rich text
//! and enhanced asset images.

use serde_json::Value;
use tracing::{debug, error};

use kaicanvas_richtext::{
    HtmlResolvers, RichTextDocument, RichTextRenderer, error_fragment, escape_html,
};
use kaicanvas_shared::{ComponentInstance, KaiCanvasError, Result};

/// Component type of rich-text components.
pub const RICH_TEXT_COMPONENT: &str = "kaiRichtext";

/// Component type of asset-picker image components.
pub const ASSET_IMAGE_COMPONENT: &str = "bynderimage";

/// Parameter name carrying the rich-text payload on a rich-text component.
pub const RICH_TEXT_PARAMETER: &str = "kairichtext";

/// `alt` text for asset images without a title.
const ASSET_IMAGE_FALLBACK_ALT: &str = "Bynder image";

/// Render a display component by its type.
///
/// `None` for component types with no HTML rendering here, and for asset
/// images that have nothing to show.
pub fn render_component<R: HtmlResolvers>(
    component: &ComponentInstance,
    renderer: &RichTextRenderer<R>,
) -> Option<String> {
    match component.component_type.as_str() {
        RICH_TEXT_COMPONENT => Some(render_rich_text_parameter(
            component,
            RICH_TEXT_PARAMETER,
            renderer,
        )),
        ASSET_IMAGE_COMPONENT => render_asset_image(component),
        other => {
            debug!(component = other, "no renderer for component type");
            None
        }
    }
}

/// Render an asset image from the `id`, `webUrl` and `title` parameters the
/// asset-picker enhancer writes.
///
/// `None` when there is no usable `webUrl`. A missing title falls back to a
/// generic `alt` and drops the `title` attribute; a missing id drops
/// `data-bynder-id`.
pub fn render_asset_image(component: &ComponentInstance) -> Option<String> {
    let text = |name: &str| {
        component
            .parameter(name)
            .and_then(|p| p.value.as_str())
            .filter(|s| !s.is_empty())
    };

    let Some(web_url) = text("webUrl") else {
        debug!(id = ?component.id, "asset image without webUrl, rendering nothing");
        return None;
    };
    let title = text("title");

    let mut html = format!(
        r#"<img src="{}" alt="{}""#,
        escape_html(web_url),
        escape_html(title.unwrap_or(ASSET_IMAGE_FALLBACK_ALT)),
    );
    if let Some(title) = title {
        html.push_str(&format!(r#" title="{}""#, escape_html(title)));
    }
    if let Some(id) = text("id") {
        html.push_str(&format!(r#" data-bynder-id="{}""#, escape_html(id)));
    }
    html.push_str(" />");
    Some(html)
}

/// Decode a rich-text parameter value.
///
/// The CMS delivers either the document object itself or the same object
/// serialized as a JSON string. `Ok(None)` means there is no content.
pub fn rich_text_document(value: &Value) -> Result<Option<RichTextDocument>> {
    let document = match value {
        Value::Null => return Ok(None),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => serde_json::from_str(s),
        other => serde_json::from_value(other.clone()),
    };
    document
        .map(Some)
        .map_err(|e| KaiCanvasError::parse(format!("invalid rich text payload: {e}")))
}

/// Render the named rich-text parameter of `component` to HTML.
///
/// Never fails: an absent parameter renders the no-content fragment and an
/// undecodable payload renders the error fragment.
pub fn render_rich_text_parameter<R: HtmlResolvers>(
    component: &ComponentInstance,
    parameter_name: &str,
    renderer: &RichTextRenderer<R>,
) -> String {
    let Some(parameter) = component.parameter(parameter_name) else {
        debug!(
            component = %component.component_type,
            parameter = parameter_name,
            "rich text parameter absent"
        );
        return renderer.render_component(None);
    };

    match rich_text_document(&parameter.value) {
        Ok(document) => renderer.render_component(document.as_ref()),
        Err(e) => {
            error!(
                component = %component.component_type,
                parameter = parameter_name,
                error = %e,
                "error decoding rich text parameter"
            );
            error_fragment(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaicanvas_shared::ComponentParameter;
    use serde_json::json;

    fn load_fixture() -> ComponentInstance {
        let fixture = std::fs::read_to_string("../../../fixtures/json/composition.fixture.json")
            .expect("read fixture");
        serde_json::from_str(&fixture).expect("deserialize fixture")
    }

    fn rich_text_component(value: Value) -> ComponentInstance {
        let mut component = ComponentInstance {
            component_type: "kaiRichtext".into(),
            ..Default::default()
        };
        component.set_parameter(RICH_TEXT_PARAMETER, ComponentParameter::from_value(value));
        component
    }

    #[test]
    fn fixture_component_renders_its_parameter() {
        let composition = load_fixture();
        let component = &composition.slots["pageContent"][1].slots["containerContent"][1];
        let html =
            render_rich_text_parameter(component, RICH_TEXT_PARAMETER, &RichTextRenderer::new());
        assert_eq!(
            html,
            r#"<div class="kai-rich-text-content"><p class="kai-rich-text-p">Hello <strong>world</strong></p></div>"#
        );
    }

    #[test]
    fn string_encoded_payload_is_accepted() {
        let payload = json!({ "value": "<h2>Title</h2>" }).to_string();
        let html = render_rich_text_parameter(
            &rich_text_component(Value::String(payload)),
            RICH_TEXT_PARAMETER,
            &RichTextRenderer::new(),
        );
        assert!(html.contains(r#"<h2 class="kai-rich-text-h2">Title</h2>"#));
    }

    #[test]
    fn absent_or_empty_parameter_renders_no_content() {
        let renderer = RichTextRenderer::new();
        let bare = ComponentInstance::default();
        assert_eq!(
            render_rich_text_parameter(&bare, RICH_TEXT_PARAMETER, &renderer),
            "<div>No rich text content available</div>"
        );
        assert_eq!(
            render_rich_text_parameter(&rich_text_component(Value::Null), RICH_TEXT_PARAMETER, &renderer),
            "<div>No rich text content available</div>"
        );
    }

    fn asset_component(parameters: &[(&str, Value)]) -> ComponentInstance {
        let mut component = ComponentInstance {
            component_type: ASSET_IMAGE_COMPONENT.into(),
            ..Default::default()
        };
        for (name, value) in parameters {
            component.set_parameter(*name, ComponentParameter::from_value(value.clone()));
        }
        component
    }

    #[test]
    fn asset_image_with_full_record() {
        let component = asset_component(&[
            ("id", json!("A1")),
            ("webUrl", json!("https://x/a.png?w=1&h=2")),
            ("title", json!("Team \"photo\"")),
        ]);
        assert_eq!(
            render_asset_image(&component).as_deref(),
            Some(
                r#"<img src="https://x/a.png?w=1&amp;h=2" alt="Team &quot;photo&quot;" title="Team &quot;photo&quot;" data-bynder-id="A1" />"#
            )
        );
    }

    #[test]
    fn asset_image_without_title_uses_generic_alt() {
        let component = asset_component(&[
            ("id", json!("A2")),
            ("webUrl", json!("https://x/b.png")),
            ("title", Value::Null),
        ]);
        assert_eq!(
            render_asset_image(&component).as_deref(),
            Some(r#"<img src="https://x/b.png" alt="Bynder image" data-bynder-id="A2" />"#)
        );
    }

    #[test]
    fn asset_image_without_web_url_renders_nothing() {
        assert_eq!(render_asset_image(&asset_component(&[("id", json!("A3"))])), None);
        assert_eq!(
            render_asset_image(&asset_component(&[("webUrl", Value::Null)])),
            None
        );
        assert_eq!(
            render_asset_image(&asset_component(&[("webUrl", json!(""))])),
            None
        );
    }

    #[test]
    fn enhanced_fixture_components_render_by_type() {
        use kaicanvas_enhancers::{EnhancementContext, EnhancerRegistry, enhance};

        let mut composition = load_fixture();
        enhance(
            &mut composition,
            &EnhancerRegistry::new(),
            &EnhancementContext::default(),
        );
        let renderer = RichTextRenderer::new();

        let hero = &composition.slots["pageContent"][0];
        assert_eq!(
            render_component(hero, &renderer).as_deref(),
            Some(
                r#"<img src="https://assets.example.com/m/hero.png" alt="Hero" title="Hero" data-bynder-id="A1B2C3" />"#
            )
        );

        let container = &composition.slots["pageContent"][1];
        assert_eq!(render_component(container, &renderer), None);

        let rich_text = &container.slots["containerContent"][1];
        assert!(
            render_component(rich_text, &renderer)
                .unwrap()
                .starts_with(r#"<div class="kai-rich-text-content">"#)
        );
    }

    #[test]
    fn undecodable_payload_renders_error_fragment() {
        let html = render_rich_text_parameter(
            &rich_text_component(json!(42)),
            RICH_TEXT_PARAMETER,
            &RichTextRenderer::new(),
        );
        assert!(html.starts_with(r#"<div class="kai-rich-text-error">"#));
        assert!(html.contains("invalid rich text payload"));
    }
}
