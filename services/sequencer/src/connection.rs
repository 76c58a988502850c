//! The Sequencer's connection table (spec §4, §8 property 4): every
//! currently-connected strategy's `ReqSocket`, in the insertion order
//! fan-out is required to preserve.

use indexmap::IndexMap;
use network::ReqSocket;

#[derive(Default)]
pub struct ConnectionTable {
    connections: IndexMap<String, ReqSocket>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connection_id: String, socket: ReqSocket) {
        self.connections.insert(connection_id, socket);
    }

    /// Preserves the relative order of the remaining entries.
    pub fn remove(&mut self, connection_id: &str) -> Option<ReqSocket> {
        self.connections.shift_remove(connection_id)
    }

    pub fn contains(&self, connection_id: &str) -> bool {
        self.connections.contains_key(connection_id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Mutable access to every connection in fixed, insertion order — the
    /// order the Sequencer's fan-out must process replies in regardless of
    /// which peer answers first (spec §8 property 4).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut ReqSocket)> {
        self.connections.iter_mut()
    }
}
