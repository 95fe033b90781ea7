//! Host dashboard registration.
//!
//! The host owns its extension registry; the panel only describes itself
//! once at startup through [`register_panel`].

use serde::Serialize;

use crate::config::LinkPanelConfig;

/// Component name the panel registers under.
pub const PANEL_COMPONENT: &str = "LinkPanel";
/// Resource group selector: every group.
pub const ANY_GROUP: &str = "*";
/// Resource kind the panel attaches to.
pub const APPLICATION_KIND: &str = "Application";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionOptions {
    pub icon: String,
}

/// One resource-extension registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceExtension {
    pub component: String,
    pub group: String,
    pub kind: String,
    pub display_name: String,
    pub options: ExtensionOptions,
}

/// The host's extension registry.
pub trait ExtensionRegistry {
    fn register(&mut self, extension: ResourceExtension);
}

/// Registry that keeps registrations in memory and can emit them as a manifest.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    extensions: Vec<ResourceExtension>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extensions(&self) -> &[ResourceExtension] {
        &self.extensions
    }

    pub fn to_manifest_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.extensions)
    }
}

impl ExtensionRegistry for InMemoryRegistry {
    fn register(&mut self, extension: ResourceExtension) {
        self.extensions.push(extension);
    }
}

/// The panel's registration for the configured display name and icon.
pub fn panel_extension(cfg: &LinkPanelConfig) -> ResourceExtension {
    ResourceExtension {
        component: PANEL_COMPONENT.to_string(),
        group: ANY_GROUP.to_string(),
        kind: APPLICATION_KIND.to_string(),
        display_name: cfg.display_name.clone(),
        options: ExtensionOptions {
            icon: cfg.icon.clone(),
        },
    }
}

pub fn register_panel(registry: &mut dyn ExtensionRegistry, cfg: &LinkPanelConfig) {
    let extension = panel_extension(cfg);
    tracing::info!(
        display_name = %extension.display_name,
        kind = %extension.kind,
        "registering resource extension"
    );
    registry.register(extension);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_application_extension_for_all_groups() {
        let mut registry = InMemoryRegistry::new();
        register_panel(&mut registry, &LinkPanelConfig::default());
        let [ext] = registry.extensions() else {
            panic!("expected one registration");
        };
        assert_eq!(ext.group, "*");
        assert_eq!(ext.kind, "Application");
        assert_eq!(ext.display_name, "GlueOps");
        assert_eq!(ext.options.icon, "fa fa-puzzle-piece");
    }

    #[test]
    fn manifest_uses_camel_case() {
        let mut registry = InMemoryRegistry::new();
        let mut cfg = LinkPanelConfig::default();
        cfg.display_name = "Acme".to_string();
        register_panel(&mut registry, &cfg);
        let json: serde_json::Value =
            serde_json::from_str(&registry.to_manifest_json().unwrap()).unwrap();
        assert_eq!(json[0]["displayName"], "Acme");
        assert_eq!(json[0]["options"]["icon"], "fa fa-puzzle-piece");
    }
}
