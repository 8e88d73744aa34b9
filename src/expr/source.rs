
use serde::{Serialize, Deserialize};

use std::fmt::{self, Formatter, Display};

/// What kind of diagram element a constraint came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceKind {
  Actor,
  Port,
  Wire,
  Annotation,
}

/// Opaque handle naming the diagram element that produced a
/// constraint. The solver only compares and prints these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceRef {
  kind: SourceKind,
  name: String,
}

impl SourceRef {
  pub fn new(kind: SourceKind, name: impl Into<String>) -> Self {
    Self { kind, name: name.into() }
  }

  pub fn actor(name: impl Into<String>) -> Self {
    Self::new(SourceKind::Actor, name)
  }

  /// A port is named relative to the actor that owns it, as
  /// `actor.port`.
  pub fn port(actor: &str, port: &str) -> Self {
    Self::new(SourceKind::Port, format!("{}.{}", actor, port))
  }

  pub fn wire(name: impl Into<String>) -> Self {
    Self::new(SourceKind::Wire, name)
  }

  pub fn annotation(name: impl Into<String>) -> Self {
    Self::new(SourceKind::Annotation, name)
  }

  pub fn kind(&self) -> SourceKind {
    self.kind
  }

  pub fn name(&self) -> &str {
    &self.name
  }
}

impl Display for SourceRef {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_port_name() {
    let source = SourceRef::port("Scale", "output");
    assert_eq!(source.kind(), SourceKind::Port);
    assert_eq!(source.to_string(), "Scale.output");
  }

  #[test]
  fn test_sources_compare_by_kind_and_name() {
    assert_eq!(SourceRef::wire("r1"), SourceRef::wire("r1"));
    assert_ne!(SourceRef::wire("r1"), SourceRef::actor("r1"));
  }
}
