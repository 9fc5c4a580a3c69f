//! Name-keyed enhancer table.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use kaicanvas_shared::{ComponentInstance, EnhancersConfig, Result};

use crate::asset::AssetPickerEnhancer;
use crate::{EnhancerInput, ParameterEnhancer};

/// One enhancer per parameter name; registering a name again replaces
/// the previous enhancer.
pub struct EnhancerRegistry {
    enhancers: HashMap<String, Box<dyn ParameterEnhancer>>,
}

impl EnhancerRegistry {
    /// Create a registry with the built-in enhancers bound to their default names.
    pub fn new() -> Self {
        Self::from_config(&EnhancersConfig::default())
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            enhancers: HashMap::new(),
        }
    }

    /// Create a registry with built-in enhancers bound to the configured names.
    pub fn from_config(config: &EnhancersConfig) -> Self {
        let mut registry = Self::empty();
        for name in &config.asset_parameters {
            registry.register(name.clone(), AssetPickerEnhancer);
        }
        registry
    }

    /// Bind `enhancer` to `parameter_name`, replacing any existing binding.
    pub fn register(
        &mut self,
        parameter_name: impl Into<String>,
        enhancer: impl ParameterEnhancer + 'static,
    ) -> &mut Self {
        let parameter_name = parameter_name.into();
        let enhancer: Box<dyn ParameterEnhancer> = Box::new(enhancer);
        debug!(parameter = %parameter_name, enhancer = enhancer.name(), "registering enhancer");
        if let Some(previous) = self.enhancers.insert(parameter_name.clone(), enhancer) {
            debug!(parameter = %parameter_name, replaced = previous.name(), "enhancer replaced");
        }
        self
    }

    /// Bind a closure to `parameter_name`.
    pub fn register_fn<F>(&mut self, parameter_name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(EnhancerInput<'_>, &mut ComponentInstance) -> Result<()> + Send + Sync + 'static,
    {
        self.register(parameter_name, f)
    }

    /// The enhancer bound to `parameter_name`, if any.
    pub fn get(&self, parameter_name: &str) -> Option<&dyn ParameterEnhancer> {
        self.enhancers.get(parameter_name).map(|e| e.as_ref())
    }

    pub fn contains(&self, parameter_name: &str) -> bool {
        self.enhancers.contains_key(parameter_name)
    }

    pub fn len(&self) -> usize {
        self.enhancers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enhancers.is_empty()
    }

    /// Registered parameter names, sorted.
    pub fn parameter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.enhancers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EnhancerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EnhancerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnhancerRegistry")
            .field("parameters", &self.parameter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaicanvas_shared::ComponentParameter;

    use crate::EnhancementContext;

    struct Tag(&'static str);

    impl ParameterEnhancer for Tag {
        fn enhance(&self, _input: EnhancerInput<'_>, component: &mut ComponentInstance) -> Result<()> {
            component.set_parameter("tag", ComponentParameter::from_value(self.0));
            Ok(())
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn default_registry_binds_asset_picker() {
        let registry = EnhancerRegistry::new();
        assert!(registry.contains("bynderImage"));
        assert_eq!(registry.get("bynderImage").map(|e| e.name()), Some("asset-picker"));
    }

    #[test]
    fn config_controls_bound_names() {
        let config = EnhancersConfig {
            asset_parameters: vec!["heroAsset".into(), "logo".into()],
        };
        let registry = EnhancerRegistry::from_config(&config);
        assert_eq!(registry.parameter_names(), vec!["heroAsset", "logo"]);
        assert!(!registry.contains("bynderImage"));
    }

    #[test]
    fn re_registration_replaces() {
        let mut registry = EnhancerRegistry::empty();
        registry.register("p", Tag("first")).register("p", Tag("second"));
        assert_eq!(registry.len(), 1);

        let mut component = ComponentInstance::default();
        let parameter = ComponentParameter::default();
        let context = EnhancementContext::default();
        registry
            .get("p")
            .unwrap()
            .enhance(
                EnhancerInput {
                    parameter: &parameter,
                    parameter_name: "p",
                    context: &context,
                },
                &mut component,
            )
            .unwrap();
        assert_eq!(component.parameter("tag").unwrap().value, "second");
    }

    #[test]
    fn closures_register() {
        let mut registry = EnhancerRegistry::empty();
        registry.register_fn("count", |_input, component| {
            component.set_parameter("seen", ComponentParameter::from_value(true));
            Ok(())
        });
        assert_eq!(registry.get("count").map(|e| e.name()), Some("custom"));
    }
}
