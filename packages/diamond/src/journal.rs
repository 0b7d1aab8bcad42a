//! The diamond's persistent state and its undo journal.
//!
//! Every mutation pushes the inverse onto the journal. A checkpoint is the
//! journal length; rolling back pops and applies inverses until the journal
//! is back at the checkpoint. The outermost invocation clears the journal
//! when it succeeds.

use std::collections::{BTreeMap, BTreeSet};

use bytes::Bytes;
use diamond_core::Registry;

use crate::event::DiamondCutEvent;

enum Undo {
    Registry(Box<Registry>),
    Storage { key: Bytes, previous: Option<Bytes> },
    Interface { id: [u8; 4], previous: bool },
    Event,
}

#[derive(Default)]
pub(crate) struct State {
    registry: Registry,
    storage: BTreeMap<Bytes, Bytes>,
    interfaces: BTreeSet<[u8; 4]>,
    events: Vec<DiamondCutEvent>,
    journal: Vec<Undo>,
}

impl State {
    pub(crate) fn checkpoint(&self) -> usize {
        self.journal.len()
    }

    pub(crate) fn rollback(&mut self, mark: usize) {
        log::trace!("rolling back {} journal entries", self.journal.len().saturating_sub(mark));
        while self.journal.len() > mark {
            let Some(undo) = self.journal.pop() else {
                break;
            };
            match undo {
                Undo::Registry(previous) => self.registry = *previous,
                Undo::Storage { key, previous } => match previous {
                    Some(value) => {
                        self.storage.insert(key, value);
                    }
                    None => {
                        self.storage.remove(&key);
                    }
                },
                Undo::Interface { id, previous } => {
                    if previous {
                        self.interfaces.insert(id);
                    } else {
                        self.interfaces.remove(&id);
                    }
                }
                Undo::Event => {
                    self.events.pop();
                }
            }
        }
    }

    /// Forget the journal. Only the outermost invocation may do this.
    pub(crate) fn commit(&mut self) {
        self.journal.clear();
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Swap in a fully validated registry.
    pub(crate) fn install_registry(&mut self, next: Registry) {
        let previous = std::mem::replace(&mut self.registry, next);
        self.journal.push(Undo::Registry(Box::new(previous)));
    }

    pub(crate) fn load(&self, key: &[u8]) -> Option<&Bytes> {
        self.storage.get(key)
    }

    pub(crate) fn store(&mut self, key: Bytes, value: Bytes) {
        let previous = self.storage.insert(key.clone(), value);
        self.journal.push(Undo::Storage { key, previous });
    }

    pub(crate) fn remove(&mut self, key: &[u8]) -> Option<Bytes> {
        let (key, previous) = self.storage.remove_entry(key)?;
        self.journal.push(Undo::Storage {
            key,
            previous: Some(previous.clone()),
        });
        Some(previous)
    }

    pub(crate) fn supports_interface(&self, id: [u8; 4]) -> bool {
        self.interfaces.contains(&id)
    }

    pub(crate) fn set_interface(&mut self, id: [u8; 4], supported: bool) {
        let previous = if supported {
            !self.interfaces.insert(id)
        } else {
            self.interfaces.remove(&id)
        };
        self.journal.push(Undo::Interface { id, previous });
    }

    pub(crate) fn emit(&mut self, event: DiamondCutEvent) {
        self.events.push(event);
        self.journal.push(Undo::Event);
    }

    pub(crate) fn events(&self) -> &[DiamondCutEvent] {
        &self.events
    }

    pub(crate) fn take_events(&mut self) -> Vec<DiamondCutEvent> {
        std::mem::take(&mut self.events)
    }
}
