//! Asset-picker enhancer (Bynder image parameters).
//!
//! The picker stores its selection as a JSON string: either one asset
//! record or an array of them. The enhancer lifts `id`, `webUrl` and
//! `title` of the first record onto the owning component.

use serde_json::{Map, Value};
use tracing::debug;

use kaicanvas_shared::{ComponentInstance, ComponentParameter, KaiCanvasError, Result};

use crate::{EnhancerInput, ParameterEnhancer};

const FIELD_ID: &str = "id";
const FIELD_WEB_URL: &str = "webUrl";
const FIELD_PREVIEW_URL: &str = "previewUrl";
const FIELD_TITLE: &str = "title";

/// Expands a serialized asset selection into `id`, `webUrl` and `title`
/// parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetPickerEnhancer;

impl ParameterEnhancer for AssetPickerEnhancer {
    fn enhance(&self, input: EnhancerInput<'_>, component: &mut ComponentInstance) -> Result<()> {
        let Some(raw) = input.parameter.value.as_str().filter(|s| !s.is_empty()) else {
            debug!(parameter = input.parameter_name, "skipping asset parameter without a JSON string");
            return Ok(());
        };

        let parsed: Value = serde_json::from_str(raw).map_err(|e| {
            KaiCanvasError::enhancer_input(input.parameter_name, format!("invalid asset JSON: {e}"))
        })?;

        let Some(record) = first_record(parsed) else {
            debug!(parameter = input.parameter_name, "asset selection is empty");
            return Ok(());
        };

        let id = field(&record, FIELD_ID);
        let web_url = record
            .get(FIELD_WEB_URL)
            .filter(|v| is_truthy(v))
            .or_else(|| record.get(FIELD_PREVIEW_URL))
            .cloned()
            .unwrap_or(Value::Null);
        let title = field(&record, FIELD_TITLE);

        debug!(
            parameter = input.parameter_name,
            asset_id = %id,
            "asset parameter expanded"
        );

        component.set_parameter(FIELD_ID, ComponentParameter::from_value(id));
        component.set_parameter(FIELD_WEB_URL, ComponentParameter::from_value(web_url));
        component.set_parameter(FIELD_TITLE, ComponentParameter::from_value(title));
        Ok(())
    }

    fn name(&self) -> &str {
        "asset-picker"
    }
}

/// The source record: the value itself, or the first element of an array.
/// `None` for falsy or empty selections.
fn first_record(parsed: Value) -> Option<Map<String, Value>> {
    let record = match parsed {
        Value::Array(items) => items.into_iter().next()?,
        other => other,
    };

    match record {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

fn field(record: &Map<String, Value>, name: &str) -> Value {
    record.get(name).cloned().unwrap_or(Value::Null)
}

/// JavaScript-style truthiness.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
