// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors for structural page mutations.

use crate::types::ItemId;

/// Why a structural change to a [`Page`](crate::Page) was refused.
///
/// A refused change leaves the page untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No item with this id exists on the page.
    #[error("unknown item `{0}`")]
    UnknownItem(ItemId),
    /// The id exists but refers to a memo where a category is required.
    #[error("item `{0}` is not a category")]
    NotACategory(ItemId),
    /// An item was asked to contain itself.
    #[error("item `{0}` cannot be its own parent")]
    SelfParent(ItemId),
    /// The target lies inside the item's own subtree.
    #[error("moving `{item}` under `{target}` would create a cycle")]
    Cycle {
        /// The item being moved.
        item: ItemId,
        /// The requested parent, a descendant of `item`.
        target: ItemId,
    },
    /// An item with this id already exists.
    #[error("duplicate item id `{0}`")]
    DuplicateId(ItemId),
}
