use std::collections::HashSet;
use std::rc::Rc;

use crate::collections::{Dictionary, DictionaryError};
use crate::resources::{
    KindKey, Matter, Modifier, PrimaryKey, ResourceKey, ResourceKind, ResourcesError, VOID,
};
use crate::storage::{CellKey, CellKind};
use crate::tunnel::{TunnelKey, TunnelKind};

/// Static registries of everything the fabric can know about, loaded once
/// from the knowledge asset. The resource registry is shared because tunnels
/// price their transfers by kind.
#[derive(Default)]
pub struct Knowledge {
    pub resources: Rc<Dictionary<KindKey, ResourceKind>>,
    pub cells: Dictionary<CellKey, CellKind>,
    pub tunnels: Dictionary<TunnelKey, TunnelKind>,
}

#[derive(Debug)]
pub enum DataError {
    Json(serde_json::Error),
    Dictionary(DictionaryError),
    Resources(ResourcesError),
}

impl From<serde_json::Error> for DataError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}

impl From<DictionaryError> for DataError {
    fn from(error: DictionaryError) -> Self {
        Self::Dictionary(error)
    }
}

impl From<ResourcesError> for DataError {
    fn from(error: ResourcesError) -> Self {
        Self::Resources(error)
    }
}

impl Knowledge {
    /// Pristine key of a named kind: full durability, no modifiers.
    pub fn key_of(&self, name: &str) -> Result<ResourceKey, DataError> {
        let kind = self.resources.find(name)?;
        let durability = match kind.matter {
            Matter::Item { max_durability, .. } => max_durability,
            Matter::Fluid { .. } => 0,
        };
        Ok(ResourceKey {
            kind: kind.id,
            durability,
            modifiers: vec![],
        })
    }

    /// Full key constructor. Modifiers are sorted here so every key built
    /// from the same attributes compares and hashes equal.
    pub fn key_with(
        &self,
        kind: KindKey,
        durability: u32,
        mut modifiers: Vec<Modifier>,
    ) -> Result<ResourceKey, DataError> {
        if kind == VOID {
            return Err(ResourcesError::VoidHasNoKey.into());
        }
        if self.resources.get(kind).is_err() {
            return Err(ResourcesError::KindNotFound { key: kind }.into());
        }
        modifiers.sort();
        Ok(ResourceKey {
            kind,
            durability,
            modifiers,
        })
    }

    /// Primary keys of every kind that opts into fuzzy matching, the
    /// candidate set for `contains_any_fuzzy` probes.
    pub fn fuzzy_primaries(&self) -> HashSet<PrimaryKey> {
        self.resources
            .values()
            .into_iter()
            .filter(|kind| kind.fuzzy)
            .map(|kind| PrimaryKey(kind.id))
            .collect()
    }

    pub fn load(text: &str) -> Result<Knowledge, DataError> {
        let asset: KnowledgeAsset = serde_json::from_str(text)?;
        let mut knowledge = Knowledge::default();
        let mut resources = Dictionary::default();
        for (index, resource) in asset.resources.into_iter().enumerate() {
            let id = KindKey(index + 1);
            resources.insert(
                id,
                resource.name.clone(),
                ResourceKind {
                    id,
                    name: resource.name,
                    matter: resource.matter,
                    fuzzy: resource.fuzzy,
                    craftable: resource.craftable,
                },
            );
        }
        knowledge.resources = Rc::new(resources);
        for (index, cell) in asset.cells.into_iter().enumerate() {
            let id = CellKey(index + 1);
            knowledge.cells.insert(
                id,
                cell.name.clone(),
                CellKind {
                    id,
                    name: cell.name,
                    capacity: cell.capacity,
                },
            );
        }
        for (index, tunnel) in asset.tunnels.into_iter().enumerate() {
            let id = TunnelKey(index + 1);
            knowledge.tunnels.insert(
                id,
                tunnel.name.clone(),
                TunnelKind {
                    id,
                    name: tunnel.name,
                    tax_per_unit: tunnel.tax_per_unit,
                },
            );
        }
        Ok(knowledge)
    }
}

#[derive(serde::Deserialize)]
struct KnowledgeAsset {
    resources: Vec<ResourceAsset>,
    #[serde(default)]
    cells: Vec<CellAsset>,
    #[serde(default)]
    tunnels: Vec<TunnelAsset>,
}

#[derive(serde::Deserialize)]
struct ResourceAsset {
    name: String,
    matter: Matter,
    #[serde(default)]
    fuzzy: bool,
    #[serde(default)]
    craftable: bool,
}

#[derive(serde::Deserialize)]
struct CellAsset {
    name: String,
    capacity: i64,
}

#[derive(serde::Deserialize)]
struct TunnelAsset {
    name: String,
    tax_per_unit: f64,
}
