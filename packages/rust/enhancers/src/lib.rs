//! Parameter enhancement for fetched compositions.
//!
//! An enhancer is bound to a parameter name and rewrites that parameter's
//! raw CMS value into the discrete parameters a component renders from.
//! [`EnhancerRegistry`] holds one enhancer per name; [`enhance`] walks a
//! composition and applies every registered enhancer, isolating failures
//! per parameter.

mod asset;
mod pass;
mod registry;

use kaicanvas_shared::{ComponentInstance, ComponentParameter, Result};

pub use asset::AssetPickerEnhancer;
pub use pass::{EnhancementFailure, EnhancementReport, enhance};
pub use registry::EnhancerRegistry;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Request-level context handed to every enhancer.
#[derive(Debug, Clone, Default)]
pub struct EnhancementContext {
    /// Whether the composition is being fetched for preview.
    pub preview: bool,
}

/// What an enhancer sees of the parameter it is bound to.
///
/// `parameter` is a snapshot taken before the call, so the enhancer is
/// free to mutate the owning component.
#[derive(Debug, Clone, Copy)]
pub struct EnhancerInput<'a> {
    pub parameter: &'a ComponentParameter,
    pub parameter_name: &'a str,
    pub context: &'a EnhancementContext,
}

/// A transformation bound to a parameter name.
pub trait ParameterEnhancer: Send + Sync {
    /// Read the parameter and write derived parameters onto `component`.
    fn enhance(&self, input: EnhancerInput<'_>, component: &mut ComponentInstance) -> Result<()>;

    /// Human-readable enhancer name for tracing.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> ParameterEnhancer for F
where
    F: Fn(EnhancerInput<'_>, &mut ComponentInstance) -> Result<()> + Send + Sync,
{
    fn enhance(&self, input: EnhancerInput<'_>, component: &mut ComponentInstance) -> Result<()> {
        self(input, component)
    }
}
