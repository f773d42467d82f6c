//! Observable `{ad_code, fill}` collection driving region fills.
//!
//! Changes are pushed to subscribers over channels; a map drains its
//! receiver on its own thread.

use crate::layers::style::Color;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDataItem {
    pub ad_code: i64,
    pub fill: Color,
}

impl RegionDataItem {
    pub fn new(ad_code: i64, fill: Color) -> Self {
        Self { ad_code, fill }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionChange {
    Added(Vec<RegionDataItem>),
    Removed(Vec<RegionDataItem>),
    /// Whole content replaced
    Reset {
        old: Vec<RegionDataItem>,
        new: Vec<RegionDataItem>,
    },
}

#[derive(Debug, Default)]
pub struct RegionDataSource {
    items: Vec<RegionDataItem>,
    subscribers: Vec<Sender<CollectionChange>>,
}

impl RegionDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = RegionDataItem>) -> Self {
        Self {
            items: items.into_iter().collect(),
            subscribers: Vec::new(),
        }
    }

    pub fn items(&self) -> &[RegionDataItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// New receiver of all subsequent changes
    pub fn subscribe(&mut self) -> Receiver<CollectionChange> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn push(&mut self, item: RegionDataItem) {
        self.items.push(item);
        self.notify(CollectionChange::Added(vec![item]));
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = RegionDataItem>) {
        let added: Vec<_> = items.into_iter().collect();
        if added.is_empty() {
            return;
        }
        self.items.extend_from_slice(&added);
        self.notify(CollectionChange::Added(added));
    }

    /// Removes every item for `ad_code`
    pub fn remove(&mut self, ad_code: i64) -> Vec<RegionDataItem> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            self.items.drain(..).partition(|item| item.ad_code == ad_code);
        self.items = kept;
        if !removed.is_empty() {
            self.notify(CollectionChange::Removed(removed.clone()));
        }
        removed
    }

    pub fn remove_at(&mut self, index: usize) -> Option<RegionDataItem> {
        if index >= self.items.len() {
            return None;
        }
        let item = self.items.remove(index);
        self.notify(CollectionChange::Removed(vec![item]));
        Some(item)
    }

    pub fn clear(&mut self) {
        self.replace_all(Vec::new());
    }

    pub fn replace_all(&mut self, items: Vec<RegionDataItem>) {
        let old = std::mem::replace(&mut self.items, items);
        self.notify(CollectionChange::Reset {
            old,
            new: self.items.clone(),
        });
    }

    fn notify(&mut self, change: CollectionChange) {
        // dropped receivers unsubscribe
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
