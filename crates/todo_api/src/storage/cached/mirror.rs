//! In-memory mirror of persisted entities.
//!
//! The mirror is a derived cache of the store: it is filled from read
//! misses and rebuilt from full list reads, and every mutation drops it.
//! It is never written on the write path, so it cannot drift from the store.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tokio::sync::RwLock;

use todo_api_core::todo::Entity;

#[derive(Debug)]
struct MirrorState<E> {
    by_id: BTreeMap<i64, E>,
    by_group: HashMap<i64, BTreeSet<i64>>,
    /// True once the table was loaded from an unfiltered list read.
    complete: bool,
}

impl<E> Default for MirrorState<E> {
    fn default() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_group: HashMap::new(),
            complete: false,
        }
    }
}

impl<E: Entity> MirrorState<E> {
    fn insert(&mut self, entity: E) {
        let id = entity.id();
        if let Some(previous) = self.by_id.insert(id, entity.clone()) {
            if let Some(group) = previous.group_key() {
                if let Some(ids) = self.by_group.get_mut(&group) {
                    ids.remove(&id);
                }
            }
        }
        if let Some(group) = entity.group_key() {
            self.by_group.entry(group).or_default().insert(id);
        }
    }
}

/// Indexed table keyed by ID with a secondary index on [`Entity::group_key`].
#[derive(Debug)]
pub struct MirrorTable<E: Entity> {
    state: RwLock<MirrorState<E>>,
}

impl<E: Entity> Default for MirrorTable<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MirrorTable<E> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MirrorState::default()),
        }
    }

    /// Looks up a single entity by ID.
    pub async fn get(&self, id: i64) -> Option<E> {
        let state = self.state.read().await;
        state.by_id.get(&id).cloned()
    }

    /// Lists entities ordered by ID, optionally through the group index.
    ///
    /// Returns `None` unless the table holds every row, since a partial
    /// table cannot prove that nothing is missing.
    pub async fn list(&self, group: Option<i64>) -> Option<Vec<E>> {
        let state = self.state.read().await;
        if !state.complete {
            return None;
        }
        let entities = match group {
            None => state.by_id.values().cloned().collect(),
            Some(group) => state
                .by_group
                .get(&group)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| state.by_id.get(id).cloned())
                        .collect()
                })
                .unwrap_or_default(),
        };
        Some(entities)
    }

    /// Adds a single entity read from the store.
    pub async fn put(&self, entity: E) {
        let mut state = self.state.write().await;
        state.insert(entity);
    }

    /// Rebuilds the table from a complete, unfiltered store read.
    pub async fn replace_all(&self, entities: Vec<E>) {
        let mut state = self.state.write().await;
        *state = MirrorState::default();
        for entity in entities {
            state.insert(entity);
        }
        state.complete = true;
    }

    /// Drops every row. The next reads rebuild the table.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        *state = MirrorState::default();
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.state.read().await.by_id.len()
    }
}
