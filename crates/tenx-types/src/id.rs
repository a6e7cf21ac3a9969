//! Identifier types for tenx.
//!
//! All identifiers are UUID-based.

use serde::{Deserialize, Serialize};
use uuid::{uuid, Uuid};

/// Namespace UUID for deterministic UUID v5 generation of builtin
/// extension ids.
const TENX_NAMESPACE: Uuid = uuid!("6b1f0c1e-3a47-4f5e-9d2b-8c41a7e3d095");

/// Identifier for an extension instance.
///
/// An extension is created by an addon. The id carries the addon name
/// and the instance name given by the host.
///
/// # UUID Strategy
///
/// - **Builtin extensions**: UUID v5 (deterministic from name)
/// - **Other extensions**: UUID v4 (random per instance)
///
/// # Equality Semantics
///
/// `PartialEq` compares all fields including UUID. For name-only
/// comparison use [`fqn_eq`](Self::fqn_eq).
///
/// # Example
///
/// ```
/// use tenx_types::ExtensionId;
///
/// let a = ExtensionId::builtin("bridge");
/// let b = ExtensionId::builtin("bridge");
/// assert_eq!(a, b);
///
/// let p1 = ExtensionId::new("extension_a", "a1");
/// let p2 = ExtensionId::new("extension_a", "a1");
/// assert_ne!(p1, p2);
/// assert!(p1.fqn_eq(&p2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtensionId {
    /// Globally unique identifier.
    pub uuid: Uuid,
    /// Addon that created the extension (e.g. "builtin").
    pub addon: String,
    /// Instance name within the addon.
    pub name: String,
}

impl ExtensionId {
    /// Creates a new [`ExtensionId`] with a random UUID v4.
    #[must_use]
    pub fn new(addon: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            addon: addon.into(),
            name: name.into(),
        }
    }

    /// Creates a builtin extension id with a deterministic UUID v5.
    ///
    /// Same name always produces the same UUID.
    #[must_use]
    pub fn builtin(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uuid: Uuid::new_v5(&TENX_NAMESPACE, name.as_bytes()),
            addon: "builtin".to_string(),
            name,
        }
    }

    /// Returns the fully qualified name in `addon::name` format.
    #[must_use]
    pub fn fqn(&self) -> String {
        format!("{}::{}", self.addon, self.name)
    }

    /// Compares two ids by FQN only, ignoring UUID.
    #[must_use]
    pub fn fqn_eq(&self, other: &Self) -> bool {
        self.addon == other.addon && self.name == other.name
    }

    /// Returns `true` if this is a builtin extension.
    #[must_use]
    pub fn is_builtin(&self) -> bool {
        self.addon == "builtin"
    }
}

impl std::fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{}@{}", self.addon, self.name, self.uuid)
    }
}

/// Identifier for one issued command.
///
/// A command and its single result share the same [`CmdId`].
///
/// `Default` is intentionally not implemented: a fresh id must be an
/// explicit decision at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CmdId(pub Uuid);

impl CmdId {
    /// Creates a new random [`CmdId`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for CmdId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cmd:{}", self.0)
    }
}
