//! The layout parameter registry: per-algorithm configurations seeded
//! with built-in defaults, validated writes, change notification.

use crate::error::{LayoutError, LayoutResult};
use crate::params::{LayoutConfiguration, LayoutParameter, ParamValue};
use std::collections::HashMap;

/// Built-in layout algorithm identifiers.
pub const RADIAL: &str = "radial";
pub const TREE: &str = "tree";
pub const FORCE: &str = "force";

/// Callback invoked after a parameter change is accepted, with the
/// layout id and parameter name.
pub type ChangeListener = Box<dyn Fn(&str, &str)>;

/// Holds the current parameter set for every known layout algorithm.
///
/// Configurations are seeded from built-in defaults on first access and
/// kept for the lifetime of the registry (typically one per document).
#[derive(Default)]
pub struct LayoutRegistry {
    configs: HashMap<String, LayoutConfiguration>,
    listeners: Vec<ChangeListener>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids this registry can configure: built-ins plus anything
    /// registered by the host.
    pub fn layout_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = [RADIAL, TREE, FORCE]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for id in self.configs.keys() {
            if !ids.iter().any(|known| known == id) {
                ids.push(id.clone());
            }
        }
        ids
    }

    /// Register a host-defined algorithm with its parameter set.
    /// Replaces any existing configuration under the same id.
    pub fn register(&mut self, config: LayoutConfiguration) {
        self.configs.insert(config.layout_id.clone(), config);
    }

    /// The current configuration for `layout_id`, seeded with defaults
    /// on first access.
    pub fn get_configuration(&mut self, layout_id: &str) -> LayoutResult<&LayoutConfiguration> {
        self.ensure_seeded(layout_id)?;
        Ok(&self.configs[layout_id])
    }

    /// Validate and store a parameter value. Rejection leaves the stored
    /// value unchanged; acceptance notifies change listeners.
    pub fn set_parameter(
        &mut self,
        layout_id: &str,
        name: &str,
        value: ParamValue,
    ) -> LayoutResult<()> {
        self.ensure_seeded(layout_id)?;
        let config = self
            .configs
            .get_mut(layout_id)
            .ok_or_else(|| LayoutError::UnknownLayout(layout_id.to_string()))?;

        config.set(name, value)?;
        log::debug!("layout {layout_id}: parameter {name} updated");
        for listener in &self.listeners {
            listener(layout_id, name);
        }
        Ok(())
    }

    /// Restore a layout's parameters to their defaults and notify.
    pub fn reset_configuration(&mut self, layout_id: &str) -> LayoutResult<()> {
        self.ensure_seeded(layout_id)?;
        if let Some(config) = self.configs.get_mut(layout_id) {
            config.reset_to_defaults();
        }
        for listener in &self.listeners {
            listener(layout_id, "");
        }
        Ok(())
    }

    /// Subscribe to accepted configuration changes.
    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    fn ensure_seeded(&mut self, layout_id: &str) -> LayoutResult<()> {
        if self.configs.contains_key(layout_id) {
            return Ok(());
        }
        let config = builtin_configuration(layout_id)
            .ok_or_else(|| LayoutError::UnknownLayout(layout_id.to_string()))?;
        self.configs.insert(layout_id.to_string(), config);
        Ok(())
    }
}

/// Default parameter sets for the built-in algorithms.
fn builtin_configuration(layout_id: &str) -> Option<LayoutConfiguration> {
    match layout_id {
        RADIAL => Some(LayoutConfiguration::new(
            RADIAL,
            vec![
                LayoutParameter::range("radius", "Ring radius", 50.0, 500.0, 10.0, 200.0),
                LayoutParameter::range("start_angle", "Start angle", 0.0, 360.0, 15.0, 0.0),
                LayoutParameter::choice("sweep", "Sweep", &["full", "half", "quarter"], "full"),
            ],
        )),
        TREE => Some(LayoutConfiguration::new(
            TREE,
            vec![
                LayoutParameter::range("level_separation", "Level separation", 40.0, 400.0, 10.0, 120.0),
                LayoutParameter::range("sibling_spacing", "Sibling spacing", 10.0, 200.0, 5.0, 40.0),
                LayoutParameter::choice(
                    "direction",
                    "Direction",
                    &["top-down", "bottom-up", "left-right", "right-left"],
                    "top-down",
                ),
            ],
        )),
        FORCE => Some(LayoutConfiguration::new(
            FORCE,
            vec![
                LayoutParameter::range("iterations", "Iterations", 50.0, 1000.0, 50.0, 300.0),
                LayoutParameter::range("spring_length", "Spring length", 20.0, 300.0, 10.0, 80.0),
                LayoutParameter::range("repulsion", "Repulsion", 50.0, 2000.0, 50.0, 600.0),
                LayoutParameter::flag("randomize", "Randomize start", false),
            ],
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_defaults_seeded_on_first_access() {
        let mut registry = LayoutRegistry::new();
        let config = registry.get_configuration(RADIAL).unwrap();
        assert_eq!(
            config.get("radius").map(|p| p.value().as_number()),
            Some(Some(200.0))
        );
        assert_eq!(config.params().len(), 3);
    }

    #[test]
    fn test_unknown_layout_rejected() {
        let mut registry = LayoutRegistry::new();
        assert_eq!(
            registry.get_configuration("spiral").unwrap_err(),
            LayoutError::UnknownLayout("spiral".to_string())
        );
    }

    #[test]
    fn test_set_parameter_persists_across_accesses() {
        let mut registry = LayoutRegistry::new();
        registry
            .set_parameter(RADIAL, "radius", ParamValue::Number(350.0))
            .unwrap();

        let config = registry.get_configuration(RADIAL).unwrap();
        assert_eq!(
            config.get("radius").map(|p| p.value().as_number()),
            Some(Some(350.0))
        );
    }

    #[test]
    fn test_out_of_range_set_leaves_value_unchanged() {
        let mut registry = LayoutRegistry::new();
        registry
            .set_parameter(RADIAL, "radius", ParamValue::Number(300.0))
            .unwrap();

        let err = registry
            .set_parameter(RADIAL, "radius", ParamValue::Number(1000.0))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { .. }));

        let config = registry.get_configuration(RADIAL).unwrap();
        assert_eq!(
            config.get("radius").map(|p| p.value().as_number()),
            Some(Some(300.0))
        );
    }

    #[test]
    fn test_listeners_fire_on_accepted_sets_only() {
        let mut registry = LayoutRegistry::new();
        let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        registry.subscribe(Box::new(move |layout, name| {
            sink.borrow_mut().push((layout.to_string(), name.to_string()));
        }));

        registry
            .set_parameter(TREE, "sibling_spacing", ParamValue::Number(60.0))
            .unwrap();
        let _ = registry.set_parameter(TREE, "sibling_spacing", ParamValue::Number(999.0));

        assert_eq!(
            seen.borrow().as_slice(),
            &[("tree".to_string(), "sibling_spacing".to_string())]
        );
    }

    #[test]
    fn test_registered_custom_layout() {
        let mut registry = LayoutRegistry::new();
        registry.register(LayoutConfiguration::new(
            "grid",
            vec![LayoutParameter::range("cell_size", "Cell size", 10.0, 400.0, 10.0, 100.0)],
        ));

        assert!(registry.get_configuration("grid").is_ok());
        assert!(registry.layout_ids().contains(&"grid".to_string()));
        registry
            .set_parameter("grid", "cell_size", ParamValue::Number(150.0))
            .unwrap();
    }

    #[test]
    fn test_reset_configuration() {
        let mut registry = LayoutRegistry::new();
        registry
            .set_parameter(FORCE, "iterations", ParamValue::Number(900.0))
            .unwrap();
        registry.reset_configuration(FORCE).unwrap();

        let config = registry.get_configuration(FORCE).unwrap();
        assert_eq!(
            config.get("iterations").map(|p| p.value().as_number()),
            Some(Some(300.0))
        );
    }
}
