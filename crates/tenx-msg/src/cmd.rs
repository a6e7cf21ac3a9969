//! Commands and their results.
//!
//! A [`Cmd`] is answered by exactly one [`CmdResult`]. The result carries
//! the command's [`CmdId`] so the issuer can pair the two.

use crate::{property, MsgError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tenx_types::CmdId;

/// Outcome status of a command.
///
/// The host vocabulary may be richer; extensions only distinguish
/// success from everything else, so every non-`Ok` code is a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// The command succeeded.
    Ok,
    /// The command failed.
    Error,
}

impl StatusCode {
    /// Returns `true` for [`StatusCode::Ok`].
    #[must_use]
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A request/response message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cmd {
    id: CmdId,
    name: String,
    #[serde(default)]
    properties: Value,
}

impl Cmd {
    /// Creates a command with a fresh id and no properties.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CmdId::new(),
            name: name.into(),
            properties: Value::Null,
        }
    }

    /// Sets a top-level property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: Value) -> Self {
        property::insert(&mut self.properties, key, value);
        self
    }

    /// Returns the command id.
    #[must_use]
    pub fn id(&self) -> CmdId {
        self.id
    }

    /// Returns the command name.
    ///
    /// # Errors
    ///
    /// [`MsgError::MissingName`] when the name is empty, which happens for
    /// commands decoded from a malformed envelope.
    pub fn name(&self) -> Result<&str, MsgError> {
        if self.name.is_empty() {
            Err(MsgError::MissingName)
        } else {
            Ok(&self.name)
        }
    }

    /// Returns the property at a dotted `path`.
    ///
    /// # Errors
    ///
    /// [`MsgError::PropertyNotFound`] when nothing lives at `path`.
    pub fn property(&self, path: &str) -> Result<&Value, MsgError> {
        property::lookup(&self.properties, path)
    }

    /// Serializes the property subtree at `path` to JSON.
    ///
    /// # Errors
    ///
    /// See [`property`](Self::property).
    pub fn properties_json(&self, path: &str) -> Result<String, MsgError> {
        property::to_json(&self.properties, path)
    }

    /// Creates a copy of this command under a fresh id.
    ///
    /// Used when forwarding: the forwarded copy gets its own result, which
    /// the forwarder then maps back onto the original.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            id: CmdId::new(),
            name: self.name.clone(),
            properties: self.properties.clone(),
        }
    }
}

/// The single result of a [`Cmd`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmdResult {
    cmd_id: CmdId,
    cmd_name: String,
    status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default)]
    payload: Value,
    #[serde(default = "default_final")]
    is_final: bool,
}

fn default_final() -> bool {
    true
}

impl CmdResult {
    /// Creates a result for `cmd` with the given status.
    #[must_use]
    pub fn new(status: StatusCode, cmd: &Cmd) -> Self {
        Self {
            cmd_id: cmd.id,
            cmd_name: cmd.name.clone(),
            status,
            detail: None,
            payload: Value::Null,
            is_final: true,
        }
    }

    /// Creates a successful result for `cmd`.
    #[must_use]
    pub fn ok(cmd: &Cmd) -> Self {
        Self::new(StatusCode::Ok, cmd)
    }

    /// Creates a failed result for `cmd` with a detail message.
    #[must_use]
    pub fn error(cmd: &Cmd, detail: impl Into<String>) -> Self {
        Self::new(StatusCode::Error, cmd).with_detail(detail)
    }

    /// Attaches a detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Re-addresses this result to `cmd`, keeping status, detail and payload.
    #[must_use]
    pub fn answering(mut self, cmd: &Cmd) -> Self {
        self.cmd_id = cmd.id;
        self.cmd_name = cmd.name.clone();
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` if the status is [`StatusCode::Ok`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    /// Returns the id of the command this result answers.
    #[must_use]
    pub fn cmd_id(&self) -> CmdId {
        self.cmd_id
    }

    /// Returns the name of the command this result answers.
    #[must_use]
    pub fn cmd_name(&self) -> &str {
        &self.cmd_name
    }

    /// Returns the detail message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the payload.
    #[must_use]
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns `true` if this is the last result for its command.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.is_final
    }
}
