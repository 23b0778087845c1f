//! Keyed reconciliation of a container's children against a desired list.
//!
//! Every child carries a key attribute (the shape fingerprint). Children whose
//! key is still wanted are reused untouched; the rest are removed, and missing
//! keys are rendered and inserted at their desired position.

use crate::svg::SvgElement;
use std::collections::HashSet;

/// A parent node whose children can be reconciled by key.
pub trait KeyedContainer {
    /// Value of `attr` on each child, in document order.
    fn child_keys(&self, attr: &str) -> Vec<Option<String>>;

    /// Remove the child at `index`.
    fn remove_child(&mut self, index: usize);

    /// Move the child at `from` so it ends up at `to`.
    fn move_child(&mut self, from: usize, to: usize);

    /// Insert a new child built from `element` at `index`.
    fn insert_child(&mut self, index: usize, element: SvgElement);
}

/// Anything that can be identified by a stable key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// What a reconciliation pass did to the container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Existing children reused (moved ones included).
    pub kept: usize,
    pub inserted: usize,
    pub removed: usize,
    /// Reused children that changed position.
    pub moved: usize,
}

impl SyncStats {
    /// Number of mutations applied to the container.
    pub fn mutations(&self) -> usize {
        self.inserted + self.removed + self.moved
    }

    pub fn is_noop(&self) -> bool {
        self.mutations() == 0
    }
}

impl std::ops::Add for SyncStats {
    type Output = SyncStats;

    fn add(self, rhs: SyncStats) -> SyncStats {
        SyncStats {
            kept: self.kept + rhs.kept,
            inserted: self.inserted + rhs.inserted,
            removed: self.removed + rhs.removed,
            moved: self.moved + rhs.moved,
        }
    }
}

/// Make the children of `container` match `items`, keyed by `attr`.
///
/// Items sharing a key are rendered once, at the position of the first one.
/// `render` is only called for keys that are not already present.
pub fn sync_children<C, T, F>(container: &mut C, attr: &str, items: &[T], mut render: F) -> SyncStats
where
    C: KeyedContainer + ?Sized,
    T: Keyed,
    F: FnMut(&T) -> SvgElement,
{
    let mut stats = SyncStats::default();

    let mut seen = HashSet::with_capacity(items.len());
    let wanted: Vec<&T> = items
        .iter()
        .filter(|item| {
            let fresh = seen.insert(item.key());
            if !fresh {
                log::warn!("duplicate shape fingerprint {}, rendering once", item.key());
            }
            fresh
        })
        .collect();

    // Drop unkeyed, unwanted and duplicated children, back to front so indices hold.
    let existing = container.child_keys(attr);
    let mut kept_keys: HashSet<&str> = HashSet::with_capacity(existing.len());
    let mut doomed = Vec::new();
    for (index, key) in existing.iter().enumerate() {
        match key.as_deref() {
            Some(k) if seen.contains(k) && kept_keys.insert(k) => {}
            _ => doomed.push(index),
        }
    }
    for &index in doomed.iter().rev() {
        container.remove_child(index);
    }
    stats.removed = doomed.len();

    let mut current: Vec<String> = existing
        .into_iter()
        .enumerate()
        .filter(|(index, _)| doomed.binary_search(index).is_err())
        .filter_map(|(_, key)| key)
        .collect();

    for (index, item) in wanted.into_iter().enumerate() {
        let key = item.key();
        if current.get(index).is_some_and(|k| k == key) {
            stats.kept += 1;
            continue;
        }
        let found = current
            .iter()
            .skip(index + 1)
            .position(|k| k == key)
            .map(|offset| index + 1 + offset);
        match found {
            Some(from) => {
                container.move_child(from, index);
                let moved = current.remove(from);
                current.insert(index, moved);
                stats.kept += 1;
                stats.moved += 1;
            }
            None => {
                container.insert_child(index, render(item));
                current.insert(index, key.to_string());
                stats.inserted += 1;
            }
        }
    }

    stats
}

/// Remove, back to front, every child whose `attr` value satisfies `doomed`.
/// Returns the number of children removed.
pub fn remove_children<C, P>(container: &mut C, attr: &str, mut doomed: P) -> usize
where
    C: KeyedContainer + ?Sized,
    P: FnMut(Option<&str>) -> bool,
{
    let keys = container.child_keys(attr);
    let mut removed = 0;
    for (index, key) in keys.iter().enumerate().rev() {
        if doomed(key.as_deref()) {
            container.remove_child(index);
            removed += 1;
        }
    }
    removed
}

impl KeyedContainer for SvgElement {
    fn child_keys(&self, attr: &str) -> Vec<Option<String>> {
        self.children()
            .iter()
            .map(|c| c.get_attr(attr).map(str::to_string))
            .collect()
    }

    fn remove_child(&mut self, index: usize) {
        self.children_mut().remove(index);
    }

    fn move_child(&mut self, from: usize, to: usize) {
        let children = self.children_mut();
        let child = children.remove(from);
        children.insert(to, child);
    }

    fn insert_child(&mut self, index: usize, element: SvgElement) {
        self.children_mut().insert(index, element);
    }
}
