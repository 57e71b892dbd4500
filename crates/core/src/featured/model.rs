//! Featured item records and their identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a featured item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

/// Identifier of a followable subject, such as an item's owner.
///
/// Kept distinct from [`ItemId`] so overlay keys can't be confused with
/// item keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(ItemId);
string_id!(SubjectId);

/// A piece of featured content as returned by the backend query.
///
/// Identity is `id`. The cache treats these as read-only: follow state is
/// never written onto the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub media_url: Option<String>,
    /// Subject whose follow flag annotates this item.
    #[serde(default, rename = "ownerId")]
    pub owner: Option<SubjectId>,
}

impl FeaturedItem {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), author: None, category: None, media_url: None, owner: None }
    }

    pub fn with_owner(mut self, owner: impl Into<SubjectId>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}
