//! Reconcilable Flux resource kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flux resources that `flux reconcile` accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReconcilableResource {
    /// `flux reconcile source <name>`
    Source,

    /// `flux reconcile kustomization <name>`
    Kustomization,
}

impl ReconcilableResource {
    /// Sub-command keyword as flux expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcilableResource::Source => "source",
            ReconcilableResource::Kustomization => "kustomization",
        }
    }
}

impl fmt::Display for ReconcilableResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReconcilableResource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("source") {
            Ok(ReconcilableResource::Source)
        } else if s.eq_ignore_ascii_case("kustomization") {
            Ok(ReconcilableResource::Kustomization)
        } else {
            Err(format!(
                "unknown resource `{s}` (expected `source` or `kustomization`)"
            ))
        }
    }
}
