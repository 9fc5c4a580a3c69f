//! Composition enhancement pass.
//!
//! Every component in the tree is visited once, depth-first. Each enhancer
//! call is isolated: a failing parameter is recorded and the pass moves on
//! to the next parameter and component.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, info, instrument, warn};

use kaicanvas_shared::{ComponentInstance, KaiCanvasError};

use crate::registry::EnhancerRegistry;
use crate::{EnhancementContext, EnhancerInput};

/// A parameter whose enhancer failed.
#[derive(Debug)]
pub struct EnhancementFailure {
    pub component_type: String,
    pub component_id: Option<String>,
    pub parameter: String,
    pub error: KaiCanvasError,
}

/// Outcome of one enhancement pass.
#[derive(Debug, Default)]
pub struct EnhancementReport {
    /// Components visited, root included.
    pub components_visited: usize,
    /// Enhancer calls that returned successfully.
    pub applied: usize,
    /// Enhancer calls that failed; their parameters are left as they were.
    pub failures: Vec<EnhancementFailure>,
}

impl EnhancementReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Apply registered enhancers to every matching parameter in the composition.
///
/// Each enhancer runs exactly once per matching parameter present when its
/// component is visited; parameters an enhancer adds are not enhanced in
/// the same pass.
#[instrument(skip_all, fields(root = %composition.component_type, preview = context.preview))]
pub fn enhance(
    composition: &mut ComponentInstance,
    registry: &EnhancerRegistry,
    context: &EnhancementContext,
) -> EnhancementReport {
    let mut report = EnhancementReport::default();

    if registry.is_empty() {
        debug!("no enhancers registered, skipping pass");
        return report;
    }

    visit(composition, registry, context, &mut report);

    if report.is_clean() {
        debug!(
            components = report.components_visited,
            applied = report.applied,
            "composition enhanced"
        );
    } else {
        info!(
            components = report.components_visited,
            applied = report.applied,
            failed = report.failures.len(),
            "composition enhanced with failures"
        );
    }

    report
}

fn visit(
    component: &mut ComponentInstance,
    registry: &EnhancerRegistry,
    context: &EnhancementContext,
    report: &mut EnhancementReport,
) {
    report.components_visited += 1;
    enhance_component(component, registry, context, report);

    for children in component.slots.values_mut() {
        for child in children.iter_mut() {
            visit(child, registry, context, report);
        }
    }
}

fn enhance_component(
    component: &mut ComponentInstance,
    registry: &EnhancerRegistry,
    context: &EnhancementContext,
    report: &mut EnhancementReport,
) {
    let names: Vec<String> = component
        .parameters
        .keys()
        .filter(|name| registry.contains(name))
        .cloned()
        .collect();

    for name in names {
        let (Some(enhancer), Some(parameter)) =
            (registry.get(&name), component.parameters.get(&name).cloned())
        else {
            continue;
        };

        let input = EnhancerInput {
            parameter: &parameter,
            parameter_name: &name,
            context,
        };

        let outcome = catch_unwind(AssertUnwindSafe(|| enhancer.enhance(input, component)))
            .unwrap_or_else(|_| {
                Err(KaiCanvasError::Enhancement(format!(
                    "enhancer `{}` panicked",
                    enhancer.name()
                )))
            });

        match outcome {
            Ok(()) => {
                report.applied += 1;
                debug!(
                    component = %component.component_type,
                    parameter = %name,
                    enhancer = enhancer.name(),
                    "parameter enhanced"
                );
            }
            Err(error) => {
                warn!(
                    component = %component.component_type,
                    parameter = %name,
                    enhancer = enhancer.name(),
                    error = %error,
                    "enhancer failed, keeping raw value"
                );
                report.failures.push(EnhancementFailure {
                    component_type: component.component_type.clone(),
                    component_id: component.id.clone(),
                    parameter: name,
                    error,
                });
            }
        }
    }
}
