//! Builtin addon lookup.
//!
//! There is no dynamic loading: the builtin descriptors are listed here
//! and looked up by name.

use crate::config::RuntimeConfig;
use crate::extensions::{GracefulStopExtension, BRIDGE_ADDON, GRACEFUL_STOP_ADDON};
use tenx_extension::{Extension, ExtensionAddon};

/// Returns every builtin addon descriptor.
#[must_use]
pub fn builtin_addons() -> &'static [ExtensionAddon] {
    static ADDONS: [ExtensionAddon; 2] = [BRIDGE_ADDON, GRACEFUL_STOP_ADDON];
    &ADDONS
}

/// Finds a builtin addon by name.
#[must_use]
pub fn find_addon(name: &str) -> Option<&'static ExtensionAddon> {
    builtin_addons().iter().find(|addon| addon.name() == name)
}

/// Creates an instance of the named addon, applying `config` where the
/// extension takes settings.
///
/// Returns `None` for an unknown addon name.
#[must_use]
pub fn instantiate(
    addon: &str,
    instance: &str,
    config: &RuntimeConfig,
) -> Option<Box<dyn Extension>> {
    if addon == GRACEFUL_STOP_ADDON.name() {
        return Some(Box::new(GracefulStopExtension::with_settings(
            instance,
            config.stop_settings(),
        )));
    }
    find_addon(addon).map(|a| a.create(instance))
}
