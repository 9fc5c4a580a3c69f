//! Locale prefixing for route paths.

use serde::{Deserialize, Serialize};

/// A route path as callers pass it: one string or a list of segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePath {
    Single(String),
    Segments(Vec<String>),
}

impl RoutePath {
    /// Non-empty path segments, splitting a single string on `/`.
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Self::Single(path) => path.split('/').filter(|s| !s.is_empty()).collect(),
            Self::Segments(segments) => segments
                .iter()
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Absolute path string (`/a/b`) for the route API.
    pub fn to_path_string(&self) -> String {
        format!("/{}", self.segments().join("/"))
    }
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        Self::Single(path.to_string())
    }
}

/// Whether any segment of `path` is one of `locales`.
pub fn is_locale_in_path(path: &RoutePath, locales: &[String]) -> bool {
    path.segments()
        .iter()
        .any(|segment| locales.iter().any(|l| l.as_str() == *segment))
}

/// Prefix `path` with `locale` unless it already carries a known locale.
///
/// - no locale: path unchanged
/// - no path: the locale alone
/// - known locale already present: path unchanged
pub fn format_path(
    path: Option<RoutePath>,
    locale: Option<&str>,
    locales: &[String],
) -> Option<RoutePath> {
    let Some(locale) = locale.filter(|l| !l.is_empty()) else {
        return path;
    };

    let Some(path) = path else {
        return Some(RoutePath::Single(locale.to_string()));
    };

    if is_locale_in_path(&path, locales) {
        return Some(path);
    }

    Some(match path {
        RoutePath::Single(p) => RoutePath::Single(format!("{locale}/{}", p.trim_start_matches('/'))),
        RoutePath::Segments(segments) => {
            let mut prefixed = Vec::with_capacity(segments.len() + 1);
            prefixed.push(locale.to_string());
            prefixed.extend(segments);
            RoutePath::Segments(prefixed)
        }
    })
}
