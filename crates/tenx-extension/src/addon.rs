//! Addon descriptors.
//!
//! An extension module publishes one [`ExtensionAddon`]: a name plus a
//! factory. How the host discovers and loads addons is the host's
//! business; this type is only what a module hands over.

use crate::Extension;

/// Creates an extension instance with the given instance name.
pub type ExtensionFactory = fn(instance: &str) -> Box<dyn Extension>;

/// Name and factory for one kind of extension.
#[derive(Clone, Copy)]
pub struct ExtensionAddon {
    name: &'static str,
    factory: ExtensionFactory,
}

impl ExtensionAddon {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(name: &'static str, factory: ExtensionFactory) -> Self {
        Self { name, factory }
    }

    /// Returns the addon name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Creates a new instance named `instance`.
    #[must_use]
    pub fn create(&self, instance: &str) -> Box<dyn Extension> {
        (self.factory)(instance)
    }
}

impl std::fmt::Debug for ExtensionAddon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionAddon")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
