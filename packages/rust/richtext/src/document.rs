//! Rich-text payload as delivered by the content source.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rich-text element value with its side tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RichTextDocument {
    /// Serialized rich-text markup.
    pub value: String,
    /// Content items referenced by content-item links, keyed by item id.
    #[serde(default)]
    pub links: HashMap<String, LinkTarget>,
    /// Inline images keyed by image id.
    #[serde(default)]
    pub images: HashMap<String, ImageRef>,
    /// Codenames of embedded items, in document order.
    #[serde(default)]
    pub modular_content: Vec<String>,
    /// Embedded items keyed by codename.
    #[serde(default)]
    pub modular_content_items: HashMap<String, LinkedItem>,
}

/// An inline image asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Target of a content-item link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkTarget {
    #[serde(default)]
    pub codename: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub url_slug: String,
}

/// System metadata of an embedded item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemSystem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub codename: Option<String>,
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
}

/// An embedded content item. Only `system.name` and the `richtext`
/// element are interpreted; everything else is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedItem {
    #[serde(default)]
    pub system: Option<ItemSystem>,
    #[serde(default)]
    pub elements: Map<String, Value>,
}

impl LinkedItem {
    /// Display name from `system.name`.
    pub fn name(&self) -> Option<&str> {
        self.system.as_ref()?.name.as_deref()
    }

    /// Markup of the item's `richtext` element, when it has one.
    pub fn rich_text_body(&self) -> Option<&str> {
        self.elements.get("richtext")?.get("value")?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_deserializes() {
        let fixture = std::fs::read_to_string("../../../fixtures/json/rich-text.fixture.json")
            .expect("read fixture");
        let doc: RichTextDocument = serde_json::from_str(&fixture).expect("deserialize");
        assert_eq!(doc.images.len(), 1);
        assert_eq!(doc.links.len(), 1);
        assert_eq!(doc.modular_content.len(), 1);

        let item = doc
            .modular_content_items
            .get("n27ec1626_93ac_0129_64e5_1beeda45416c")
            .expect("linked item");
        assert_eq!(item.name(), Some("Callout"));
        assert_eq!(item.rich_text_body(), Some("<p>Embedded callout body</p>"));
    }

    #[test]
    fn side_tables_are_optional() {
        let doc: RichTextDocument =
            serde_json::from_str(r#"{"value":"<p>x</p>"}"#).expect("deserialize");
        assert!(doc.images.is_empty());
        assert!(doc.modular_content_items.is_empty());
    }

    #[test]
    fn linked_item_without_richtext_element() {
        let item: LinkedItem =
            serde_json::from_str(r#"{"elements":{"title":{"value":"x"}}}"#).expect("deserialize");
        assert_eq!(item.name(), None);
        assert_eq!(item.rich_text_body(), None);
    }

    #[test]
    fn image_description_may_be_null() {
        let image: ImageRef = serde_json::from_str(
            r#"{"url":"https://x/a.png","width":10,"height":20,"image_id":"a","description":null}"#,
        )
        .expect("deserialize");
        assert_eq!(image.width, 10);
        assert!(image.description.is_none());
    }
}
