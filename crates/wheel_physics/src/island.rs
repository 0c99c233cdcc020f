//! Grouping of bodies connected by contacts
//!
//! Bodies in one island wake and sleep together.

use slotmap::SecondaryMap;

use crate::body::BodyKey;

/// Union-find over a fixed set of bodies
pub(crate) struct IslandBuilder {
    keys: Vec<BodyKey>,
    slots: SecondaryMap<BodyKey, usize>,
    parent: Vec<usize>,
}

impl IslandBuilder {
    pub fn new(keys: Vec<BodyKey>) -> Self {
        let mut slots = SecondaryMap::new();
        for (i, key) in keys.iter().enumerate() {
            slots.insert(*key, i);
        }
        let parent = (0..keys.len()).collect();
        Self {
            keys,
            slots,
            parent,
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Join the islands of two bodies; ignored if either is not tracked
    pub fn connect(&mut self, a: BodyKey, b: BodyKey) {
        let (Some(&ia), Some(&ib)) = (self.slots.get(a), self.slots.get(b)) else {
            return;
        };
        let ra = self.find(ia);
        let rb = self.find(ib);
        if ra != rb {
            self.parent[ra] = rb;
        }
    }

    /// Islands in order of their first body
    pub fn finish(mut self) -> Vec<Vec<BodyKey>> {
        let mut group_of_root = vec![usize::MAX; self.keys.len()];
        let mut islands: Vec<Vec<BodyKey>> = Vec::new();
        for i in 0..self.keys.len() {
            let root = self.find(i);
            if group_of_root[root] == usize::MAX {
                group_of_root[root] = islands.len();
                islands.push(Vec::new());
            }
            islands[group_of_root[root]].push(self.keys[i]);
        }
        islands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_islands_follow_connections() {
        let mut map: SlotMap<BodyKey, ()> = SlotMap::with_key();
        let keys: Vec<BodyKey> = (0..5).map(|_| map.insert(())).collect();

        let mut builder = IslandBuilder::new(keys.clone());
        builder.connect(keys[0], keys[2]);
        builder.connect(keys[2], keys[4]);
        let islands = builder.finish();

        assert_eq!(islands.len(), 3);
        assert_eq!(islands[0], vec![keys[0], keys[2], keys[4]]);
        assert_eq!(islands[1], vec![keys[1]]);
        assert_eq!(islands[2], vec![keys[3]]);
    }

    #[test]
    fn test_untracked_bodies_are_ignored() {
        let mut map: SlotMap<BodyKey, ()> = SlotMap::with_key();
        let tracked = map.insert(());
        let other = map.insert(());

        let mut builder = IslandBuilder::new(vec![tracked]);
        builder.connect(tracked, other);
        assert_eq!(builder.finish(), vec![vec![tracked]]);
    }
}
