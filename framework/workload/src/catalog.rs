use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::phase::{phase_ids, PhaseId, RATE_STEPS};

/// A report job name that no planned phase produces.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
#[display("Job name `{name}` does not match any planned phase")]
pub struct UnknownPhaseError {
    pub name: String,
}

/// Two phases render to the same job name, so report jobs could not be told apart.
#[derive(derive_more::Error, derive_more::Display, Debug, Clone, PartialEq, Eq)]
#[display("Job name `{name}` is produced by more than one phase")]
pub struct DuplicatePhaseError {
    pub name: String,
}

/// Maps rendered job names back to the [`PhaseId`] they were rendered from.
#[derive(Debug, Clone, Default)]
pub struct PhaseCatalog {
    by_name: HashMap<String, PhaseId>,
}

impl PhaseCatalog {
    /// Build a catalog, refusing ids whose rendered names collide.
    pub fn from_ids<I>(ids: I) -> Result<Self, DuplicatePhaseError>
    where
        I: IntoIterator<Item = PhaseId>,
    {
        let mut by_name = HashMap::new();
        for id in ids {
            match by_name.entry(id.to_string()) {
                Entry::Vacant(entry) => {
                    entry.insert(id);
                }
                Entry::Occupied(entry) => {
                    return Err(DuplicatePhaseError {
                        name: entry.key().clone(),
                    });
                }
            }
        }
        Ok(Self { by_name })
    }

    /// Catalog for the standard rate steps. Job names do not depend on the device or
    /// configuration, so this resolves any report produced from a default plan.
    pub fn standard() -> Self {
        // the standard steps are non-zero and distinct, so every name is unique
        Self {
            by_name: phase_ids(&RATE_STEPS)
                .into_iter()
                .map(|id| (id.to_string(), id))
                .collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Result<PhaseId, UnknownPhaseError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| UnknownPhaseError {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
