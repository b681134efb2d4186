//! Declarations accumulated across discovery rounds

use crate::spec::{CustomEntryPoint, Declaration, EntryPointSpec, Side};
use ahash::AHashSet;
use std::collections::BTreeMap;
use tracing::debug;

/// Side → declarations plus custom descriptor → declarations
///
/// Both groups keep discovery order. A descriptor group is listed in the
/// order its first declaration arrived.
#[derive(Debug, Default)]
pub struct EntryPointCatalog {
    sides: BTreeMap<Side, Vec<Declaration>>,
    custom: Vec<(CustomEntryPoint, Vec<Declaration>)>,
    seen: AHashSet<(String, String)>,
}

impl EntryPointCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration under its spec; returns `false` for a repeat
    pub fn record(&mut self, declaration: Declaration) -> bool {
        let key = (declaration.owner.clone(), declaration.member.clone());
        if !self.seen.insert(key) {
            debug!(
                "Ignoring repeated declaration {}.{}",
                declaration.owner, declaration.member
            );
            return false;
        }

        match &declaration.spec {
            EntryPointSpec::Ordinary(side) => {
                self.sides.entry(*side).or_default().push(declaration);
            }
            EntryPointSpec::Custom(custom) => {
                match self.custom.iter_mut().find(|(c, _)| c == custom) {
                    Some((_, group)) => group.push(declaration),
                    None => {
                        let custom = custom.clone();
                        self.custom.push((custom, vec![declaration]));
                    }
                }
            }
        }
        true
    }

    /// Ordinary declarations for one side, excluding any with a descriptor
    pub fn ordinary(&self, side: Side) -> &[Declaration] {
        self.sides.get(&side).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty side groups in side order
    pub fn sides(&self) -> impl Iterator<Item = (Side, &[Declaration])> {
        Side::ALL
            .into_iter()
            .map(|side| (side, self.ordinary(side)))
            .filter(|(_, group)| !group.is_empty())
    }

    /// Custom descriptor groups in discovery order
    pub fn custom(&self) -> impl Iterator<Item = (&CustomEntryPoint, &[Declaration])> {
        self.custom
            .iter()
            .map(|(custom, group)| (custom, group.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
