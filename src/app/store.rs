//! Ordered in-memory view of the current listing.
//!
//! `ids` and `metas` are parallel: index `i` in both always refers to the same
//! item, both have the same length and ids are unique.

use std::collections::HashSet;

use crate::mail::{Item, ItemFlags, Mutation};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStore {
    ids: Vec<String>,
    metas: Vec<Item>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a complete listing
    pub fn replace(&mut self, items: Vec<Item>) {
        self.ids.clear();
        self.metas.clear();
        self.append(items);
    }

    /// Extend the listing, skipping ids that are already present
    pub fn append(&mut self, items: Vec<Item>) {
        let mut known: HashSet<String> = self.ids.iter().cloned().collect();
        for item in items {
            if !known.insert(item.id.clone()) {
                tracing::debug!("Skipping duplicate item {}", item.id);
                continue;
            }
            self.ids.push(item.id.clone());
            self.metas.push(item);
        }
    }

    /// Remove the item at `position` and return the position to select next.
    ///
    /// The predecessor is preferred; removing the first item selects the new
    /// first item. Removing the last remaining item, or an out-of-range
    /// position, yields `None`.
    pub fn remove_at(&mut self, position: usize) -> Option<usize> {
        if position >= self.ids.len() {
            return None;
        }
        self.ids.remove(position);
        self.metas.remove(position);

        if self.ids.is_empty() {
            None
        } else {
            Some(position.saturating_sub(1))
        }
    }

    /// Remove every item in `ids` and re-pin the selection.
    ///
    /// If the selected item survives it stays selected. Otherwise the closest
    /// surviving predecessor is chosen, then the closest successor.
    pub fn remove_ids(&mut self, ids: &HashSet<String>, selected: Option<usize>) -> Option<usize> {
        let anchor = selected.filter(|&pos| pos < self.ids.len());

        let mut pinned: Option<String> = None;
        if let Some(pos) = anchor {
            let before = self.ids[..=pos].iter().rev();
            let after = self.ids[pos + 1..].iter();
            pinned = before
                .chain(after)
                .find(|id| !ids.contains(*id))
                .cloned();
        }

        let mut keep = self.ids.iter().map(|id| !ids.contains(id));
        self.metas.retain(|_| keep.next().unwrap_or(false));
        self.ids.retain(|id| !ids.contains(id));

        match pinned {
            Some(id) => self.position_of(&id),
            None if self.ids.is_empty() => None,
            None => anchor.map(|_| 0),
        }
    }

    /// Set or clear one flag on an item; unknown ids are ignored
    pub fn update_flag(&mut self, id: &str, flag: ItemFlags, present: bool) {
        if let Some(item) = self.item_mut(id) {
            item.set_flag(flag, present);
        }
    }

    pub fn set_labels(&mut self, id: &str, labels: Vec<String>) {
        if let Some(item) = self.item_mut(id) {
            item.labels = labels;
        }
    }

    /// Replace an item's metadata in place, keeping its position
    pub fn refresh(&mut self, item: Item) {
        if let Some(pos) = self.position_of(&item.id) {
            self.metas[pos] = item;
        }
    }

    /// Apply the local effect of a successful non-destructive mutation
    pub fn apply_mutation(&mut self, id: &str, mutation: &Mutation) {
        if let Some((flag, present)) = mutation.flag_change() {
            self.update_flag(id, flag, present);
        } else if let Mutation::Label(label) = mutation
            && let Some(item) = self.item_mut(id)
        {
            item.add_label(label);
        }
    }

    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|i| i == id)
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.metas.get(position)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.position_of(id).map(|pos| &self.metas[pos])
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        let pos = self.position_of(id)?;
        self.metas.get_mut(pos)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn items(&self) -> &[Item] {
        &self.metas
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.metas.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(ids: &[&str]) -> ListStore {
        let mut store = ListStore::new();
        store.replace(ids.iter().map(|id| Item::new(*id, *id)).collect());
        store
    }

    fn assert_consistent(store: &ListStore) {
        assert_eq!(store.ids.len(), store.metas.len());
        for (id, meta) in store.ids.iter().zip(&store.metas) {
            assert_eq!(id, &meta.id);
        }
        let unique: HashSet<&String> = store.ids.iter().collect();
        assert_eq!(unique.len(), store.ids.len());
    }

    #[test]
    fn test_remove_first_selects_new_first() {
        let mut s = store(&["a", "b", "c", "d", "e"]);
        assert_eq!(s.remove_at(0), Some(0));
        assert_eq!(s.ids(), ["b", "c", "d", "e"]);
        assert_consistent(&s);
    }

    #[test]
    fn test_remove_selects_predecessor() {
        let mut s = store(&["a", "b", "c"]);
        assert_eq!(s.remove_at(2), Some(1));
        assert_eq!(s.ids(), ["a", "b"]);
        assert_eq!(s.remove_at(1), Some(0));
        assert_consistent(&s);
    }

    #[test]
    fn test_remove_last_remaining_and_out_of_range() {
        let mut s = store(&["a"]);
        assert_eq!(s.remove_at(3), None);
        assert_eq!(s.len(), 1);
        assert_eq!(s.remove_at(0), None);
        assert!(s.is_empty());
        assert_eq!(s.remove_at(0), None);
    }

    #[test]
    fn test_remove_at_result_always_in_bounds() {
        for n in 2..8 {
            for pos in 0..n {
                let ids: Vec<String> = (0..n).map(|i| i.to_string()).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let mut s = store(&refs);
                let next = s.remove_at(pos).unwrap();
                assert!(next < s.len());
                assert_consistent(&s);
            }
        }
    }

    #[test]
    fn test_append_skips_duplicates() {
        let mut s = store(&["a", "b"]);
        s.append(vec![Item::new("b", "dup"), Item::new("c", "c"), Item::new("c", "again")]);
        assert_eq!(s.ids(), ["a", "b", "c"]);
        assert_eq!(s.item("b").unwrap().subject, "b");
        assert_consistent(&s);
    }

    #[test]
    fn test_update_flag() {
        let mut s = store(&["a", "b"]);
        s.update_flag("b", ItemFlags::UNREAD, true);
        assert!(s.item("b").unwrap().is_unread());
        assert!(!s.item("a").unwrap().is_unread());
        // Unknown id is a no-op
        s.update_flag("zzz", ItemFlags::UNREAD, true);
        assert_consistent(&s);
    }

    #[test]
    fn test_apply_mutation_label_and_flags() {
        let mut s = store(&["a"]);
        s.apply_mutation("a", &Mutation::Star);
        s.apply_mutation("a", &Mutation::Label("work".into()));
        let item = s.item("a").unwrap();
        assert!(item.is_starred());
        assert_eq!(item.labels, vec!["work".to_string()]);
    }

    #[test]
    fn test_remove_ids_keeps_selected_survivor() {
        let mut s = store(&["a", "b", "c", "d"]);
        let gone: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(s.remove_ids(&gone, Some(2)), Some(0));
        assert_eq!(s.ids(), ["c", "d"]);
        assert_consistent(&s);
    }

    #[test]
    fn test_remove_ids_repins_to_neighbour() {
        let mut s = store(&["a", "b", "c", "d", "e"]);
        let gone: HashSet<String> = ["c", "d"].iter().map(|s| s.to_string()).collect();
        // Selected "d" is removed; closest surviving predecessor is "b"
        assert_eq!(s.remove_ids(&gone, Some(3)), Some(1));

        let mut s = store(&["a", "b", "c"]);
        let gone: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        // No predecessor survives; successor "c" is picked
        assert_eq!(s.remove_ids(&gone, Some(0)), Some(0));
        assert_eq!(s.ids(), ["c"]);

        let mut s = store(&["a", "b"]);
        let gone: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(s.remove_ids(&gone, Some(1)), None);
        assert!(s.is_empty());
    }

    #[test]
    fn test_set_labels_replaces_list() {
        let mut s = store(&["a"]);
        s.set_labels("a", vec!["work".into(), "travel".into()]);
        assert_eq!(s.item("a").map(|i| i.labels.len()), Some(2));
        s.set_labels("missing", vec!["x".into()]);
        assert_eq!(s.len(), 1);
    }
}
