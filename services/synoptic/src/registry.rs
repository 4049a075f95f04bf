//! Component registry loaded from the backend configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::Palette;

/// Wire form of one component in the configuration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub id: String,
    pub colors: Palette,
    #[serde(rename = "confirmToggle", default)]
    pub confirm_toggle: bool,
}

/// A toggleable component of the diagram
#[derive(Debug, Clone)]
pub struct Component {
    pub id: String,
    pub palette: Palette,
    pub confirm_toggle: bool,
}

/// Ordered set of diagram components with O(1) id lookup.
///
/// Loaded once per session and never mutated afterwards.
#[derive(Debug, Default)]
pub struct Registry {
    components: Vec<Component>,
    by_id: HashMap<String, usize>,
}

impl Registry {
    /// Build the registry from the configuration payload.
    ///
    /// Duplicate ids are a configuration error.
    pub fn from_specs(specs: Vec<ComponentSpec>) -> crate::Result<Self> {
        let mut components = Vec::with_capacity(specs.len());
        let mut by_id = HashMap::with_capacity(specs.len());

        for spec in specs {
            if by_id.contains_key(&spec.id) {
                return Err(crate::SynopticError::Config(format!(
                    "Duplicate component id '{}' in configuration",
                    spec.id
                )));
            }
            by_id.insert(spec.id.clone(), components.len());
            components.push(Component {
                id: spec.id,
                palette: spec.colors,
                confirm_toggle: spec.confirm_toggle,
            });
        }

        Ok(Self { components, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.by_id.get(id).map(|&i| &self.components[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Resolve a click to a component: the first id in the chain from the
    /// clicked node up to the diagram root that names a registered component.
    pub fn resolve_clicked<'a, I>(&self, ancestors: I) -> Option<&Component>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ancestors.into_iter().find_map(|id| self.get(id))
    }
}
