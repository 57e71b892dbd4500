//! Follow-state overlay and the projected read view.

use std::collections::HashMap;
use std::collections::hash_map;

use serde::{Deserialize, Serialize};

use super::model::{FeaturedItem, SubjectId};

/// Locally known follow flags keyed by subject.
///
/// A missing key means the flag is not known yet, which is different from
/// an explicit `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayState(HashMap<SubjectId, bool>);

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, subject: &SubjectId) -> Option<bool> {
        self.0.get(subject).copied()
    }

    pub fn follow_state(&self, subject: &SubjectId) -> FollowState {
        FollowState::from(self.get(subject))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, SubjectId, bool> {
        self.0.iter()
    }

    /// Copy of this overlay with one flag set.
    ///
    /// Writes to the cache replace the whole overlay, so a single-key update
    /// is built here and then written back in full.
    pub fn with(&self, subject: SubjectId, followed: bool) -> Self {
        let mut next = self.clone();
        next.0.insert(subject, followed);
        next
    }
}

impl FromIterator<(SubjectId, bool)> for OverlayState {
    fn from_iter<I: IntoIterator<Item = (SubjectId, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<HashMap<SubjectId, bool>> for OverlayState {
    fn from(map: HashMap<SubjectId, bool>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a OverlayState {
    type Item = (&'a SubjectId, &'a bool);
    type IntoIter = hash_map::Iter<'a, SubjectId, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Effective follow state of an item's owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowState {
    Following,
    NotFollowing,
    /// No overlay entry, or the item has no owner.
    Unknown,
}

impl From<Option<bool>> for FollowState {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => FollowState::Following,
            Some(false) => FollowState::NotFollowing,
            None => FollowState::Unknown,
        }
    }
}

/// A cached record paired with its owner's follow state.
///
/// Borrows the record; the flag lives only in this view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectedItem<'a> {
    #[serde(flatten)]
    pub item: &'a FeaturedItem,
    pub follow: FollowState,
}

impl<'a> ProjectedItem<'a> {
    pub(crate) fn project(item: &'a FeaturedItem, overlay: &OverlayState) -> Self {
        let follow = item
            .owner
            .as_ref()
            .map_or(FollowState::Unknown, |owner| overlay.follow_state(owner));
        Self { item, follow }
    }
}
