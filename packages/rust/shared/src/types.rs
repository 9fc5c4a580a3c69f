//! Composition data model shared by the enhancement pass and route retrieval.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// ComponentParameter
// ---------------------------------------------------------------------------

/// A named parameter value on a component instance.
///
/// Derived parameters written by enhancers carry only `value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentParameter {
    /// Raw value as delivered by the CMS.
    #[serde(default)]
    pub value: Value,
    /// Parameter type identifier (e.g., `text`, `bynder-image`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Any other fields the CMS sends along.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentParameter {
    /// Wrap a value using the `{ value: .. }` parameter convention.
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// ComponentInstance
// ---------------------------------------------------------------------------

/// One node of a composition tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentInstance {
    /// Component type name, used to pick a renderer.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Instance identifier.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Parameters keyed by name; names are unique per component.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ComponentParameter>,
    /// Child components grouped by slot name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, Vec<ComponentInstance>>,
    /// Fields not modelled here, preserved on round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentInstance {
    /// Look up a parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&ComponentParameter> {
        self.parameters.get(name)
    }

    /// Insert or replace a parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, parameter: ComponentParameter) {
        self.parameters.insert(name.into(), parameter);
    }

    /// Count this component and all components nested in its slots.
    pub fn component_count(&self) -> usize {
        1 + self
            .slots
            .values()
            .flatten()
            .map(ComponentInstance::component_count)
            .sum::<usize>()
    }
}
