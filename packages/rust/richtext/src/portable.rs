//! Portable node tree: the format-agnostic form of a rich-text document.
//!
//! Every construct kind is a closed enum with an `Other` arm for element
//! kinds the renderer has no dedicated resolver for.

/// Block-level construct kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Paragraph,
    Table,
    TableRow,
    TableCell,
    /// `th`, a table cell acting as a row or column header.
    TableHeaderCell,
    /// Any other element, named by its tag.
    Other(String),
}

/// List flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `ul`, rendered with bullets.
    Bullet,
    /// `ol`, rendered with numbers.
    Number,
}

/// Value carried by an external link mark.
///
/// Missing attributes are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMarkValue {
    pub href: String,
    pub new_window: bool,
    pub rel: String,
    pub title: String,
}

/// Inline mark kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkKind {
    Strong,
    Emphasis,
    Subscript,
    Superscript,
    Code,
    /// External hyperlink.
    Link(LinkMarkValue),
    /// Link to another content item, by item id.
    ContentItemLink { item_id: String },
    Other(String),
}

/// Reference to an image in the document's `images` table.
///
/// The markup may carry the id under either attribute; `image_id` wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageReference {
    pub image_id: Option<String>,
    pub asset_id: Option<String>,
}

impl ImageReference {
    /// The id to look up, if any attribute carried one.
    pub fn reference_id(&self) -> Option<&str> {
        self.image_id.as_deref().or(self.asset_id.as_deref())
    }
}

/// How a linked item is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRelation {
    /// Inline component owned by the rich-text element.
    Component,
    /// Standalone content item linked into the text.
    Link,
}

impl ItemRelation {
    /// The `data-rel` value this relation is written as in markup.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Link => "link",
        }
    }
}

/// Inline reference placeholders. They never carry children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineRef {
    Image(ImageReference),
    ComponentOrItem {
        codename: String,
        relation: ItemRelation,
    },
}

/// One node of the portable tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortableNode {
    Block {
        kind: BlockKind,
        children: Vec<PortableNode>,
    },
    List {
        kind: ListKind,
        children: Vec<PortableNode>,
    },
    ListItem {
        ordered: bool,
        children: Vec<PortableNode>,
    },
    Mark {
        kind: MarkKind,
        children: Vec<PortableNode>,
    },
    InlineRef(InlineRef),
    HardBreak,
    Text(String),
}

impl PortableNode {
    /// Children of this node; empty for leaves.
    pub fn children(&self) -> &[PortableNode] {
        match self {
            Self::Block { children, .. }
            | Self::List { children, .. }
            | Self::ListItem { children, .. }
            | Self::Mark { children, .. } => children,
            Self::InlineRef(_) | Self::HardBreak | Self::Text(_) => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_reference_prefers_image_id() {
        let both = ImageReference {
            image_id: Some("img".into()),
            asset_id: Some("asset".into()),
        };
        assert_eq!(both.reference_id(), Some("img"));

        let asset_only = ImageReference {
            image_id: None,
            asset_id: Some("asset".into()),
        };
        assert_eq!(asset_only.reference_id(), Some("asset"));
        assert_eq!(ImageReference::default().reference_id(), None);
    }

    #[test]
    fn children_of_containers_and_leaves() {
        let tree = PortableNode::Block {
            kind: BlockKind::Paragraph,
            children: vec![
                PortableNode::Text("a".into()),
                PortableNode::Mark {
                    kind: MarkKind::Strong,
                    children: vec![PortableNode::Text("b".into())],
                },
            ],
        };
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[1].children(), &[PortableNode::Text("b".into())]);
        assert!(PortableNode::HardBreak.children().is_empty());
    }

    #[test]
    fn item_relation_matches_markup_attribute() {
        assert_eq!(ItemRelation::Component.as_str(), "component");
        assert_eq!(ItemRelation::Link.as_str(), "link");
    }
}
