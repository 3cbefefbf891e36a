// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the page model: identifiers, kinds, memos, and categories.

use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;

use kurbo::{Point, Rect, Size};
use mindboard_geometry::{DEFAULT_CATEGORY_SIZE, DEFAULT_MEMO_SIZE, block_rect};

/// Identifier of a memo or category.
///
/// Ids are opaque strings assigned by whoever created the item. They borrow as
/// `str`, so every lookup on [`Page`](crate::Page) accepts a plain `&str`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.into())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl PartialEq<str> for ItemId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ItemId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of item an id refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A note.
    Memo,
    /// A grouping container.
    Category,
}

impl ItemKind {
    /// Size substituted when an item of this kind has no explicit size.
    pub const fn default_size(self) -> Size {
        match self {
            Self::Memo => DEFAULT_MEMO_SIZE,
            Self::Category => DEFAULT_CATEGORY_SIZE,
        }
    }
}

/// A note placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Memo {
    /// Identifier.
    pub id: ItemId,
    /// Top-left corner in canvas space.
    pub position: Point,
    /// Explicit size; [`DEFAULT_MEMO_SIZE`] when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: Option<Size>,
    /// Containing category, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_id: Option<ItemId>,
}

impl Memo {
    /// Create a top-level memo with the default size.
    pub fn new(id: impl Into<ItemId>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
            size: None,
            parent_id: None,
        }
    }

    /// Set an explicit size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the containing category.
    pub fn with_parent(mut self, parent: impl Into<ItemId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// The memo's rectangle, with defaults substituted for missing geometry.
    pub fn rect(&self) -> Rect {
        block_rect(self.position, self.size, DEFAULT_MEMO_SIZE)
    }
}

/// A grouping container that can hold memos and other categories.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Category {
    /// Identifier.
    pub id: ItemId,
    /// Top-left corner of the category block in canvas space.
    pub position: Point,
    /// Explicit block size; [`DEFAULT_CATEGORY_SIZE`] when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: Option<Size>,
    /// Containing category, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent_id: Option<ItemId>,
    /// Direct children. Mirrors the children's `parent_id`; [`Page`](crate::Page)
    /// keeps the two in agreement.
    #[cfg_attr(feature = "serde", serde(default))]
    pub children: Vec<ItemId>,
    /// Whether the category shows its contents (and therefore has an area).
    #[cfg_attr(feature = "serde", serde(default = "expanded_by_default"))]
    pub is_expanded: bool,
}

#[cfg(feature = "serde")]
fn expanded_by_default() -> bool {
    true
}

impl Category {
    /// Create an expanded, empty, top-level category with the default size.
    pub fn new(id: impl Into<ItemId>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
            size: None,
            parent_id: None,
            children: Vec::new(),
            is_expanded: true,
        }
    }

    /// Set an explicit block size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the containing category.
    pub fn with_parent(mut self, parent: impl Into<ItemId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Set the expanded state.
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.is_expanded = expanded;
        self
    }

    /// The category's own block rectangle (not its containment area).
    pub fn rect(&self) -> Rect {
        block_rect(self.position, self.size, DEFAULT_CATEGORY_SIZE)
    }
}

/// All memos and categories of one workspace page, as handed over by collaborators.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSnapshot {
    /// Memos on the page.
    #[cfg_attr(feature = "serde", serde(default))]
    pub memos: Vec<Memo>,
    /// Categories on the page.
    #[cfg_attr(feature = "serde", serde(default))]
    pub categories: Vec<Category>,
}
