//! Route retrieval: fetch a route from the route API and enhance its
//! composition before handing it to the caller.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};
use url::Url;

use kaicanvas_enhancers::{EnhancementContext, EnhancementReport, EnhancerRegistry, enhance};
use kaicanvas_shared::{ComponentInstance, KaiCanvasError, Result, RouteConfig};

use crate::locale::{RoutePath, format_path};

/// Route API path, relative to the configured base URL.
const ROUTE_API_PATH: &str = "api/v1/route";

/// User-Agent string for route requests.
const USER_AGENT: &str = concat!("KaiCanvas/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Response model
// ---------------------------------------------------------------------------

/// A resolved route, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouteResponse {
    Composition {
        #[serde(
            rename = "compositionApiResponse",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        composition_api_response: Option<CompositionApiResponse>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    Redirect {
        #[serde(flatten)]
        details: Map<String, Value>,
    },
    NotFound,
}

/// Payload of a composition route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionApiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<ComponentInstance>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteResponse {
    /// The composition of a composition route, if it carries one.
    pub fn composition_mut(&mut self) -> Option<&mut ComponentInstance> {
        match self {
            Self::Composition {
                composition_api_response: Some(response),
                ..
            } => response.composition.as_mut(),
            _ => None,
        }
    }
}

/// A fetched route plus the outcome of enhancing it.
#[derive(Debug)]
pub struct RetrievedRoute {
    pub route: RouteResponse,
    /// `None` when the route had no composition to enhance.
    pub enhancement: Option<EnhancementReport>,
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// Run the enhancement pass on the route's composition, if any.
///
/// Enhancement failures are contained in the returned report; the route is
/// always left usable.
pub fn enrich_route(
    route: &mut RouteResponse,
    registry: &EnhancerRegistry,
    context: &EnhancementContext,
) -> Option<EnhancementReport> {
    let Some(composition) = route.composition_mut() else {
        debug!("route carries no composition, nothing to enhance");
        return None;
    };
    let report = enhance(composition, registry, context);
    if !report.is_clean() {
        warn!(
            failed = report.failures.len(),
            "error enhancing composition, returning it partially enhanced"
        );
    }
    Some(report)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Fetches routes and enhances their compositions.
#[derive(Debug)]
pub struct RouteClient {
    http: Client,
    endpoint: Url,
    project_id: String,
    locales: Vec<String>,
    default_locale: Option<String>,
    enhancers: EnhancerRegistry,
}

impl RouteClient {
    /// Build a client from route config and an enhancer registry.
    pub fn new(config: &RouteConfig, enhancers: EnhancerRegistry) -> Result<Self> {
        let endpoint = route_endpoint(&config.api_base_url)?;
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KaiCanvasError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            project_id: config.project_id.clone(),
            locales: config.locales.clone(),
            default_locale: config.default_locale.clone(),
            enhancers,
        })
    }

    /// Fetch the route for `path` (prefixed with `locale`, or the configured
    /// default locale) and enhance its composition.
    ///
    /// Fetch and decode failures are errors; enhancement failures are not.
    #[instrument(skip_all, fields(path = ?path, locale = ?locale))]
    pub async fn retrieve_route(
        &self,
        path: Option<RoutePath>,
        locale: Option<&str>,
    ) -> Result<RetrievedRoute> {
        let locale = locale.or(self.default_locale.as_deref());
        let path = format_path(path, locale, &self.locales)
            .map(|p| p.to_path_string())
            .unwrap_or_else(|| "/".to_string());

        info!(%path, "retrieving route");
        let mut route = self.fetch(&path).await?;

        let context = EnhancementContext { preview: false };
        let enhancement = enrich_route(&mut route, &self.enhancers, &context);

        Ok(RetrievedRoute { route, enhancement })
    }

    async fn fetch(&self, path: &str) -> Result<RouteResponse> {
        let url = self.endpoint.as_str();
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("projectId", self.project_id.as_str()), ("path", path)])
            .send()
            .await
            .map_err(|e| KaiCanvasError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%path, "route API returned 404");
            return Ok(RouteResponse::NotFound);
        }
        if !status.is_success() {
            return Err(KaiCanvasError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .json::<RouteResponse>()
            .await
            .map_err(|e| KaiCanvasError::validation(format!("{url}: invalid route response: {e}")))
    }
}

/// `{base}/api/v1/route`, tolerating a trailing slash on the base.
fn route_endpoint(base: &str) -> Result<Url> {
    let base = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|u| u.join(ROUTE_API_PATH))
        .map_err(|e| KaiCanvasError::config(format!("invalid route api_base_url '{base}': {e}")))
}
