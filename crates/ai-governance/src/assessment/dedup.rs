//! Keyed "keep the strongest" reduction shared by rule evaluation, control resolution
//! and crosswalk counting. Output order is first-seen order of each key.

use std::collections::HashMap;
use std::hash::Hash;

use super::domain::ControlSelection;

pub struct KeyedReducer<K, T, M> {
    positions: HashMap<K, usize>,
    items: Vec<T>,
    merge: M,
}

impl<K, T, M> KeyedReducer<K, T, M>
where
    K: Eq + Hash,
    M: FnMut(&mut T, T),
{
    pub fn new(merge: M) -> Self {
        Self {
            positions: HashMap::new(),
            items: Vec::new(),
            merge,
        }
    }

    pub fn push(&mut self, key: K, item: T) {
        match self.positions.get(&key) {
            Some(&position) => (self.merge)(&mut self.items[position], item),
            None => {
                self.positions.insert(key, self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

pub fn reduce_by_key<I, K, T, F, M>(items: I, key: F, merge: M) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: Fn(&T) -> K,
    M: FnMut(&mut T, T),
{
    let mut reducer = KeyedReducer::new(merge);
    for item in items {
        reducer.push(key(&item), item);
    }
    reducer.into_items()
}

/// Designation dominance: the stronger designation wins and every distinct reason is kept.
pub fn keep_strongest(kept: &mut ControlSelection, incoming: ControlSelection) {
    if incoming.designation.dominates(kept.designation) {
        kept.designation = incoming.designation;
    }
    for reason in incoming.reasoning {
        if !kept.reasoning.contains(&reason) {
            kept.reasoning.push(reason);
        }
    }
}

/// Simple presence: the first occurrence stands.
pub fn keep_first<T>(_kept: &mut T, _incoming: T) {}
