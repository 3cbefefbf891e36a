// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindboard Tree: the memo/category page model.
//!
//! A page is a forest of two item kinds placed on an unbounded canvas:
//!
//! - [`Memo`]: a note with an optional category parent.
//! - [`Category`]: a container with an optional category parent, a list of
//!   direct `children`, and an expanded/collapsed flag.
//!
//! Each containment edge is stored twice (the child's `parent_id` and the
//! parent's `children`). [`Page`] is the only writer of both and keeps them in
//! agreement; snapshots from outside are repaired on construction.
//!
//! ## Acyclicity
//!
//! No item may be its own ancestor. [`Page::reparent`] refuses to move a category
//! into its own subtree ([`TreeError::Cycle`]), and every traversal carries a
//! visited set so that a corrupted snapshot can never make a walk loop.
//!
//! ## API overview
//!
//! - Lookups: [`Page::memo`], [`Page::category`], [`Page::kind_of`],
//!   [`Page::position`], [`Page::block_rect`].
//! - Structure: [`Page::parent_of`], [`Page::children_of`], [`Page::siblings`],
//!   [`Page::ancestors`], [`Page::depth`], [`Page::is_ancestor`],
//!   [`Page::descendants`].
//! - Mutation: [`Page::insert_memo`], [`Page::insert_category`],
//!   [`Page::remove`], [`Page::reparent`], [`Page::set_expanded`],
//!   [`Page::set_position`], [`Page::translate_subtree`],
//!   [`Page::sync_children`].
//!
//! With the `serde` feature, [`Page`] (de)serializes through [`PageSnapshot`]
//! using camelCase field names (`parentId`, `isExpanded`).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod page;
mod types;

pub use error::TreeError;
pub use page::{Ancestors, Descendants, Page};
pub use types::{Category, ItemId, ItemKind, Memo, PageSnapshot};
