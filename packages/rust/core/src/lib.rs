//! Route retrieval and composition rendering for KaiCanvas.
//!
//! This crate ties the enhancement pass and the rich-text renderer to the
//! route API: [`RouteClient::retrieve_route`] fetches a route, enhances its
//! composition and hands it back ready to render; [`render_component`]
//! turns its display components into HTML.

pub mod component;
pub mod locale;
pub mod route;

pub use component::{
    ASSET_IMAGE_COMPONENT, RICH_TEXT_COMPONENT, RICH_TEXT_PARAMETER, render_asset_image,
    render_component, render_rich_text_parameter, rich_text_document,
};
pub use locale::{RoutePath, format_path, is_locale_in_path};
pub use route::{
    CompositionApiResponse, RetrievedRoute, RouteClient, RouteResponse, enrich_route,
};
