// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page container: lookups, cycle-safe traversal, and structural mutations.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect, Size, Vec2};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::error::TreeError;
use crate::types::{Category, ItemId, ItemKind, Memo, PageSnapshot};

/// Ancestor chain of an item, nearest parent first.
pub type Ancestors = SmallVec<[ItemId; 8]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Memo(usize),
    Category(usize),
}

/// Every direct and indirect descendant of an item, in depth-first pre-order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Descendants {
    /// Descendant memos.
    pub memos: Vec<ItemId>,
    /// Descendant categories.
    pub categories: Vec<ItemId>,
}

impl Descendants {
    /// Total number of descendants.
    pub fn len(&self) -> usize {
        self.memos.len() + self.categories.len()
    }

    /// Whether there are no descendants.
    pub fn is_empty(&self) -> bool {
        self.memos.is_empty() && self.categories.is_empty()
    }

    /// Whether `id` is among the descendants.
    pub fn contains(&self, id: &str) -> bool {
        self.memos.iter().chain(&self.categories).any(|d| d == id)
    }

    /// Iterate all descendant ids, categories first.
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.categories.iter().chain(&self.memos)
    }
}

/// All memos and categories of one page, kept as a consistent forest.
///
/// The page owns the two halves of every containment edge (`parent_id` on the
/// child, `children` on the category) and only changes them together, so code
/// outside this type can rely on them agreeing. Snapshots handed in by
/// collaborators are repaired on construction (see [`Page::sync_children`]).
///
/// Every traversal (ancestors, descendants, depth) carries a visited set, so a
/// corrupted parent chain degrades to a truncated walk instead of looping.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use mindboard_tree::{Category, Memo, Page};
///
/// let mut page = Page::new(
///     vec![Memo::new("m", Point::new(40.0, 120.0)).with_parent("a")],
///     vec![
///         Category::new("a", Point::ORIGIN),
///         Category::new("b", Point::new(400.0, 0.0)),
///     ],
/// );
/// assert_eq!(page.children_of("a"), ["m"]);
///
/// page.reparent("m", Some("b")).unwrap();
/// assert!(page.children_of("a").is_empty());
/// assert_eq!(page.parent_of("m").map(|p| p.as_str()), Some("b"));
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PageSnapshot", into = "PageSnapshot")
)]
pub struct Page {
    memos: Vec<Memo>,
    categories: Vec<Category>,
    lookup: HashMap<ItemId, Slot>,
}

impl From<PageSnapshot> for Page {
    fn from(snapshot: PageSnapshot) -> Self {
        Self::new(snapshot.memos, snapshot.categories)
    }
}

impl From<Page> for PageSnapshot {
    fn from(page: Page) -> Self {
        Self {
            memos: page.memos,
            categories: page.categories,
        }
    }
}

impl Page {
    /// Build a page from collaborator data.
    ///
    /// Items with an id that was already seen are dropped, then the links are
    /// repaired with [`Page::sync_children`].
    pub fn new(memos: Vec<Memo>, categories: Vec<Category>) -> Self {
        let mut page = Self::default();
        for category in categories {
            if page.lookup.contains_key(category.id.as_str()) {
                warn!(id = %category.id, "dropping category with duplicate id");
                continue;
            }
            page.lookup
                .insert(category.id.clone(), Slot::Category(page.categories.len()));
            page.categories.push(category);
        }
        for memo in memos {
            if page.lookup.contains_key(memo.id.as_str()) {
                warn!(id = %memo.id, "dropping memo with duplicate id");
                continue;
            }
            page.lookup.insert(memo.id.clone(), Slot::Memo(page.memos.len()));
            page.memos.push(memo);
        }
        let repairs = page.sync_children();
        if repairs > 0 {
            debug!(repairs, "repaired page links on load");
        }
        page
    }

    /// Copy the page out as plain data.
    pub fn to_snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            memos: self.memos.clone(),
            categories: self.categories.clone(),
        }
    }

    /// All memos, in insertion order.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    /// All categories, in insertion order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Number of items on the page.
    pub fn len(&self) -> usize {
        self.memos.len() + self.categories.len()
    }

    /// Whether the page has no items.
    pub fn is_empty(&self) -> bool {
        self.memos.is_empty() && self.categories.is_empty()
    }

    /// Whether an item with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.lookup.contains_key(id)
    }

    /// The kind of the item with this id.
    pub fn kind_of(&self, id: &str) -> Option<ItemKind> {
        match self.lookup.get(id)? {
            Slot::Memo(_) => Some(ItemKind::Memo),
            Slot::Category(_) => Some(ItemKind::Category),
        }
    }

    /// Look up a memo.
    pub fn memo(&self, id: &str) -> Option<&Memo> {
        match self.lookup.get(id)? {
            Slot::Memo(i) => self.memos.get(*i),
            Slot::Category(_) => None,
        }
    }

    /// Look up a category.
    pub fn category(&self, id: &str) -> Option<&Category> {
        match self.lookup.get(id)? {
            Slot::Category(i) => self.categories.get(*i),
            Slot::Memo(_) => None,
        }
    }

    fn memo_mut(&mut self, id: &str) -> Option<&mut Memo> {
        match self.lookup.get(id).copied()? {
            Slot::Memo(i) => self.memos.get_mut(i),
            Slot::Category(_) => None,
        }
    }

    fn category_mut(&mut self, id: &str) -> Option<&mut Category> {
        match self.lookup.get(id).copied()? {
            Slot::Category(i) => self.categories.get_mut(i),
            Slot::Memo(_) => None,
        }
    }

    /// Ids of every item, categories first.
    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.categories
            .iter()
            .map(|c| &c.id)
            .chain(self.memos.iter().map(|m| &m.id))
    }

    /// Position of an item.
    pub fn position(&self, id: &str) -> Option<Point> {
        match self.lookup.get(id)? {
            Slot::Memo(i) => self.memos.get(*i).map(|m| m.position),
            Slot::Category(i) => self.categories.get(*i).map(|c| c.position),
        }
    }

    /// Move a single item (not its descendants). Returns `false` for unknown ids.
    pub fn set_position(&mut self, id: &str, position: Point) -> bool {
        match self.lookup.get(id).copied() {
            Some(Slot::Memo(i)) => self.memos[i].position = position,
            Some(Slot::Category(i)) => self.categories[i].position = position,
            None => return false,
        }
        true
    }

    /// Write a batch of positions, skipping unknown ids.
    pub fn apply_positions<'a>(&mut self, positions: impl IntoIterator<Item = (&'a ItemId, &'a Point)>) {
        for (id, position) in positions {
            self.set_position(id.as_str(), *position);
        }
    }

    /// Translate a single item by `offset`.
    pub fn translate(&mut self, id: &str, offset: Vec2) -> bool {
        match self.position(id) {
            Some(p) => self.set_position(id, p + offset),
            None => false,
        }
    }

    /// Translate an item and all of its descendants rigidly by `offset`.
    ///
    /// Returns the number of items moved.
    pub fn translate_subtree(&mut self, id: &str, offset: Vec2) -> usize {
        if !self.translate(id, offset) {
            return 0;
        }
        let descendants = self.descendants(id);
        for d in descendants.iter() {
            self.translate(d.as_str(), offset);
        }
        descendants.len() + 1
    }

    /// The block rectangle of an item, with default sizes substituted.
    pub fn block_rect(&self, id: &str) -> Option<Rect> {
        match self.lookup.get(id)? {
            Slot::Memo(i) => self.memos.get(*i).map(Memo::rect),
            Slot::Category(i) => self.categories.get(*i).map(Category::rect),
        }
    }

    /// Parent category of an item, or `None` for top-level and unknown items.
    pub fn parent_of(&self, id: &str) -> Option<&ItemId> {
        match self.lookup.get(id)? {
            Slot::Memo(i) => self.memos.get(*i)?.parent_id.as_ref(),
            Slot::Category(i) => self.categories.get(*i)?.parent_id.as_ref(),
        }
    }

    /// Direct children of a category, or an empty slice.
    pub fn children_of(&self, id: &str) -> &[ItemId] {
        self.category(id).map_or(&[], |c| c.children.as_slice())
    }

    /// Direct child memos of a category.
    pub fn child_memos<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Memo> + 'a {
        self.children_of(id)
            .iter()
            .filter_map(|c| self.memo(c.as_str()))
    }

    /// Direct child categories of a category.
    pub fn child_categories<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Category> + 'a {
        self.children_of(id)
            .iter()
            .filter_map(|c| self.category(c.as_str()))
    }

    /// Items without a parent, categories first.
    pub fn top_level(&self) -> impl Iterator<Item = &ItemId> {
        self.categories
            .iter()
            .filter(|c| c.parent_id.is_none())
            .map(|c| &c.id)
            .chain(
                self.memos
                    .iter()
                    .filter(|m| m.parent_id.is_none())
                    .map(|m| &m.id),
            )
    }

    /// Items in the same sibling scope as `id` (same parent, or both top level),
    /// excluding `id` itself.
    pub fn siblings(&self, id: &str) -> Vec<&ItemId> {
        if !self.contains(id) {
            return Vec::new();
        }
        match self.parent_of(id) {
            Some(parent) => self
                .children_of(parent.as_str())
                .iter()
                .filter(|c| *c != id)
                .collect(),
            None => self.top_level().filter(|c| *c != id).collect(),
        }
    }

    /// Whether two items share a sibling scope.
    pub fn same_scope(&self, a: &str, b: &str) -> bool {
        self.contains(a) && self.contains(b) && self.parent_of(a) == self.parent_of(b)
    }

    /// The parent chain of an item, nearest first.
    ///
    /// Stops at the first repeated id if the chain loops.
    pub fn ancestors(&self, id: &str) -> Ancestors {
        let mut out = Ancestors::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(id);
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if !visited.insert(parent.as_str()) {
                warn!(id, at = %parent, "parent chain loops");
                break;
            }
            out.push(parent.clone());
            current = self.parent_of(parent.as_str());
        }
        out
    }

    /// Length of the ancestor chain; top-level items have depth 0.
    pub fn depth(&self, id: &str) -> usize {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(id);
        let mut depth = 0;
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if !visited.insert(parent.as_str()) {
                break;
            }
            depth += 1;
            current = self.parent_of(parent.as_str());
        }
        depth
    }

    /// Whether `ancestor` appears in the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(id);
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            if !visited.insert(parent.as_str()) {
                return false;
            }
            current = self.parent_of(parent.as_str());
        }
        false
    }

    /// Every descendant of an item in depth-first pre-order.
    pub fn descendants(&self, id: &str) -> Descendants {
        let mut out = Descendants::default();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(id);
        let mut stack: Vec<&ItemId> = self.children_of(id).iter().rev().collect();
        while let Some(child) = stack.pop() {
            if !visited.insert(child.as_str()) {
                warn!(id, child = %child, "descendant visited twice");
                continue;
            }
            match self.kind_of(child.as_str()) {
                Some(ItemKind::Memo) => out.memos.push(child.clone()),
                Some(ItemKind::Category) => {
                    out.categories.push(child.clone());
                    stack.extend(self.children_of(child.as_str()).iter().rev());
                }
                None => {}
            }
        }
        out
    }

    fn check_new_parent(&self, id: &ItemId, parent: Option<&ItemId>) -> Result<(), TreeError> {
        let Some(parent) = parent else {
            return Ok(());
        };
        if parent == id {
            return Err(TreeError::SelfParent(id.clone()));
        }
        match self.kind_of(parent.as_str()) {
            None => Err(TreeError::UnknownItem(parent.clone())),
            Some(ItemKind::Memo) => Err(TreeError::NotACategory(parent.clone())),
            Some(ItemKind::Category) => Ok(()),
        }
    }

    fn link_child(&mut self, id: &ItemId, parent: Option<&ItemId>) {
        if let Some(parent) = parent
            && let Some(category) = self.category_mut(parent.as_str())
            && !category.children.contains(id)
        {
            category.children.push(id.clone());
        }
    }

    fn unlink_child(&mut self, id: &str, parent: Option<&ItemId>) {
        if let Some(parent) = parent
            && let Some(category) = self.category_mut(parent.as_str())
        {
            category.children.retain(|c| c != id);
        }
    }

    fn set_parent_field(&mut self, id: &str, parent: Option<ItemId>) {
        match self.lookup.get(id).copied() {
            Some(Slot::Memo(i)) => self.memos[i].parent_id = parent,
            Some(Slot::Category(i)) => self.categories[i].parent_id = parent,
            None => {}
        }
    }

    /// Add a memo. Its `parent_id`, if set, must name an existing category.
    pub fn insert_memo(&mut self, memo: Memo) -> Result<(), TreeError> {
        if self.contains(memo.id.as_str()) {
            return Err(TreeError::DuplicateId(memo.id));
        }
        self.check_new_parent(&memo.id, memo.parent_id.as_ref())?;
        let id = memo.id.clone();
        let parent = memo.parent_id.clone();
        self.lookup.insert(id.clone(), Slot::Memo(self.memos.len()));
        self.memos.push(memo);
        self.link_child(&id, parent.as_ref());
        Ok(())
    }

    /// Add a category. Its `parent_id`, if set, must name an existing category;
    /// its `children` list is rebuilt from the page rather than trusted.
    pub fn insert_category(&mut self, mut category: Category) -> Result<(), TreeError> {
        if self.contains(category.id.as_str()) {
            return Err(TreeError::DuplicateId(category.id));
        }
        self.check_new_parent(&category.id, category.parent_id.as_ref())?;
        let id = category.id.clone();
        let parent = category.parent_id.clone();
        category.children = self
            .categories
            .iter()
            .filter(|c| c.parent_id.as_ref() == Some(&id))
            .map(|c| c.id.clone())
            .chain(
                self.memos
                    .iter()
                    .filter(|m| m.parent_id.as_ref() == Some(&id))
                    .map(|m| m.id.clone()),
            )
            .collect();
        self.lookup
            .insert(id.clone(), Slot::Category(self.categories.len()));
        self.categories.push(category);
        self.link_child(&id, parent.as_ref());
        Ok(())
    }

    /// Remove an item.
    ///
    /// Children of a removed category are lifted into the removed category's
    /// parent (or the top level), taking its place in the parent's child order.
    pub fn remove(&mut self, id: &str) -> Result<ItemKind, TreeError> {
        let slot = self
            .lookup
            .get(id)
            .copied()
            .ok_or_else(|| TreeError::UnknownItem(id.into()))?;
        let parent = self.parent_of(id).cloned();
        let children: Vec<ItemId> = self.children_of(id).to_vec();
        for child in &children {
            self.set_parent_field(child.as_str(), parent.clone());
        }
        if let Some(parent) = &parent
            && let Some(category) = self.category_mut(parent.as_str())
        {
            let at = category
                .children
                .iter()
                .position(|c| c == id)
                .unwrap_or(category.children.len());
            category.children.retain(|c| c != id);
            let at = at.min(category.children.len());
            category.children.splice(at..at, children);
        }
        let kind = match slot {
            Slot::Memo(i) => {
                let removed = self.memos.swap_remove(i);
                self.lookup.remove(removed.id.as_str());
                if let Some(moved) = self.memos.get(i) {
                    self.lookup.insert(moved.id.clone(), Slot::Memo(i));
                }
                ItemKind::Memo
            }
            Slot::Category(i) => {
                let removed = self.categories.swap_remove(i);
                self.lookup.remove(removed.id.as_str());
                if let Some(moved) = self.categories.get(i) {
                    self.lookup.insert(moved.id.clone(), Slot::Category(i));
                }
                ItemKind::Category
            }
        };
        debug!(id, ?kind, "removed item");
        Ok(kind)
    }

    /// Move `id` under `new_parent` (or to the top level for `None`).
    ///
    /// Detaches the item from its old parent's `children`, attaches it to the
    /// new parent's `children`, and expands the new parent. A category can never
    /// be moved into its own subtree. Returns the previous parent; reparenting to
    /// the current parent changes nothing.
    pub fn reparent(&mut self, id: &str, new_parent: Option<&str>) -> Result<Option<ItemId>, TreeError> {
        let kind = self
            .kind_of(id)
            .ok_or_else(|| TreeError::UnknownItem(id.into()))?;
        let item = ItemId::from(id);
        let target = new_parent.map(ItemId::from);
        self.check_new_parent(&item, target.as_ref())?;
        if let Some(target) = &target
            && kind == ItemKind::Category
            && self.is_ancestor(id, target.as_str())
        {
            return Err(TreeError::Cycle {
                item,
                target: target.clone(),
            });
        }

        let old = self.parent_of(id).cloned();
        if old == target {
            return Ok(old);
        }
        self.unlink_child(id, old.as_ref());
        self.set_parent_field(id, target.clone());
        self.link_child(&item, target.as_ref());
        if let Some(target) = &target
            && let Some(category) = self.category_mut(target.as_str())
        {
            category.is_expanded = true;
        }
        debug!(id, from = ?old, to = ?target, "reparented");
        Ok(old)
    }

    /// Expand or collapse a category.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) -> Result<(), TreeError> {
        if self.memo(id).is_some() {
            return Err(TreeError::NotACategory(id.into()));
        }
        let category = self
            .category_mut(id)
            .ok_or_else(|| TreeError::UnknownItem(id.into()))?;
        category.is_expanded = expanded;
        Ok(())
    }

    /// Set or clear the explicit size of an item.
    pub fn set_size(&mut self, id: &str, size: Option<Size>) -> bool {
        if let Some(memo) = self.memo_mut(id) {
            memo.size = size;
            return true;
        }
        if let Some(category) = self.category_mut(id) {
            category.size = size;
            return true;
        }
        false
    }

    /// Make every category's `children` agree with its members' `parent_id`.
    ///
    /// - Parent pointers to unknown ids, to memos, or to the item itself are cleared.
    /// - A category whose parent chain loops back to itself is detached, which
    ///   breaks the cycle.
    /// - Each `children` list is rebuilt from the parent pointers, keeping the
    ///   existing order for entries that survive and appending new members in
    ///   page order.
    ///
    /// Returns the number of repairs made.
    pub fn sync_children(&mut self) -> usize {
        let mut repairs = 0;

        for i in 0..self.memos.len() {
            let invalid = self.memos[i].parent_id.as_ref().is_some_and(|p| {
                !matches!(self.lookup.get(p.as_str()), Some(Slot::Category(_)))
            });
            if invalid {
                warn!(id = %self.memos[i].id, "clearing dangling memo parent");
                self.memos[i].parent_id = None;
                repairs += 1;
            }
        }
        for i in 0..self.categories.len() {
            let category = &self.categories[i];
            let invalid = category.parent_id.as_ref().is_some_and(|p| {
                p == &category.id || !matches!(self.lookup.get(p.as_str()), Some(Slot::Category(_)))
            });
            if invalid {
                warn!(id = %category.id, "clearing invalid category parent");
                self.categories[i].parent_id = None;
                repairs += 1;
            }
        }
        for i in 0..self.categories.len() {
            if self.parent_chain_returns_to(i) {
                warn!(id = %self.categories[i].id, "detaching category to break a parent cycle");
                self.categories[i].parent_id = None;
                repairs += 1;
            }
        }

        let mut members: HashMap<ItemId, Vec<ItemId>> = HashMap::new();
        for category in &self.categories {
            if let Some(parent) = &category.parent_id {
                members
                    .entry(parent.clone())
                    .or_default()
                    .push(category.id.clone());
            }
        }
        for memo in &self.memos {
            if let Some(parent) = &memo.parent_id {
                members.entry(parent.clone()).or_default().push(memo.id.clone());
            }
        }
        for category in &mut self.categories {
            let mut expected = members.remove(category.id.as_str()).unwrap_or_default();
            let mut rebuilt: Vec<ItemId> = Vec::with_capacity(expected.len());
            for child in &category.children {
                if let Some(pos) = expected.iter().position(|e| e == child) {
                    rebuilt.push(expected.remove(pos));
                }
            }
            rebuilt.extend(expected);
            if rebuilt != category.children {
                category.children = rebuilt;
                repairs += 1;
            }
        }
        repairs
    }

    fn parent_chain_returns_to(&self, index: usize) -> bool {
        let start = &self.categories[index];
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = start.parent_id.as_ref();
        while let Some(parent) = current {
            if parent == &start.id {
                return true;
            }
            if !visited.insert(parent.as_str()) {
                return false;
            }
            current = self.parent_of(parent.as_str());
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn nested() -> Page {
        // a ⊃ b ⊃ c, memo m1 in c, memo m2 in a, memo loose at top level.
        Page::new(
            vec![
                Memo::new("m1", Point::new(160.0, 260.0)).with_parent("c"),
                Memo::new("m2", Point::new(20.0, 400.0)).with_parent("a"),
                Memo::new("loose", Point::new(900.0, 900.0)),
            ],
            vec![
                Category::new("a", Point::new(0.0, 0.0)),
                Category::new("b", Point::new(100.0, 100.0)).with_parent("a"),
                Category::new("c", Point::new(150.0, 150.0)).with_parent("b"),
            ],
        )
    }

    #[test]
    fn construction_builds_children_lists() {
        let page = nested();
        assert_eq!(page.children_of("a"), ["b", "m2"]);
        assert_eq!(page.children_of("b"), ["c"]);
        assert_eq!(page.children_of("c"), ["m1"]);
        assert!(page.children_of("m1").is_empty());
        assert_eq!(page.len(), 6);
    }

    #[test]
    fn ancestors_depth_and_descendants() {
        let page = nested();
        assert_eq!(page.ancestors("m1").as_slice(), ["c", "b", "a"]);
        assert_eq!(page.depth("m1"), 3);
        assert_eq!(page.depth("a"), 0);
        assert!(page.is_ancestor("a", "m1"));
        assert!(!page.is_ancestor("m1", "a"));
        assert!(!page.is_ancestor("a", "loose"));

        let d = page.descendants("a");
        assert_eq!(d.categories, ["b", "c"]);
        assert_eq!(d.memos, ["m1", "m2"]);
        assert!(d.contains("m1"));
        assert!(!d.contains("loose"));
    }

    #[test]
    fn siblings_follow_scope() {
        let page = nested();
        assert_eq!(page.siblings("b"), ["m2"]);
        assert_eq!(page.siblings("a"), ["loose"]);
        assert!(page.same_scope("a", "loose"));
        assert!(!page.same_scope("a", "b"));
        assert!(page.siblings("missing").is_empty());
    }

    #[test]
    fn reparent_keeps_links_consistent() {
        let mut page = nested();
        page.set_expanded("c", false).unwrap();
        let old = page.reparent("m2", Some("c")).unwrap();
        assert_eq!(old.as_ref().map(ItemId::as_str), Some("a"));
        assert_eq!(page.children_of("a"), ["b"]);
        assert_eq!(page.children_of("c"), ["m1", "m2"]);
        assert!(page.category("c").unwrap().is_expanded, "target is expanded");

        page.reparent("m2", None).unwrap();
        assert!(page.parent_of("m2").is_none());
        assert_eq!(page.children_of("c"), ["m1"]);
    }

    #[test]
    fn reparent_rejects_cycles_and_bad_targets() {
        let mut page = nested();
        assert_eq!(
            page.reparent("a", Some("c")),
            Err(TreeError::Cycle {
                item: "a".into(),
                target: "c".into()
            })
        );
        assert_eq!(page.reparent("a", Some("a")), Err(TreeError::SelfParent("a".into())));
        assert_eq!(page.reparent("b", Some("m1")), Err(TreeError::NotACategory("m1".into())));
        assert_eq!(page.reparent("b", Some("zz")), Err(TreeError::UnknownItem("zz".into())));
        assert_eq!(page.reparent("zz", None), Err(TreeError::UnknownItem("zz".into())));
        // Nothing moved.
        assert_eq!(page.parent_of("a"), None);
        assert_eq!(page.children_of("c"), ["m1"]);
    }

    #[test]
    fn reparent_to_current_parent_is_noop() {
        let mut page = nested();
        page.set_expanded("a", false).unwrap();
        let old = page.reparent("b", Some("a")).unwrap();
        assert_eq!(old.as_ref().map(ItemId::as_str), Some("a"));
        assert!(!page.category("a").unwrap().is_expanded, "no-op leaves state alone");
    }

    #[test]
    fn sync_repairs_dangling_and_cyclic_links() {
        let mut x = Category::new("x", Point::ORIGIN).with_parent("y");
        x.children = vec!["ghost".into(), "y".into()];
        let y = Category::new("y", Point::ORIGIN).with_parent("x");
        let page = Page::new(
            vec![
                Memo::new("m", Point::ORIGIN).with_parent("nowhere"),
                Memo::new("n", Point::ORIGIN).with_parent("m"),
            ],
            vec![x, y],
        );
        assert!(page.parent_of("m").is_none());
        assert!(page.parent_of("n").is_none());
        // Exactly one of the two categories was detached to break the loop.
        let detached = [page.parent_of("x"), page.parent_of("y")]
            .iter()
            .filter(|p| p.is_none())
            .count();
        assert_eq!(detached, 1);
        assert!(!(page.is_ancestor("x", "y") && page.is_ancestor("y", "x")));
        for c in page.categories() {
            for child in &c.children {
                assert_eq!(page.parent_of(child.as_str()), Some(&c.id));
            }
        }
    }

    #[test]
    fn duplicates_are_dropped_and_rejected() {
        let mut page = Page::new(
            vec![Memo::new("a", Point::ORIGIN)],
            vec![Category::new("a", Point::ORIGIN)],
        );
        assert_eq!(page.kind_of("a"), Some(ItemKind::Category));
        assert_eq!(page.len(), 1);
        assert_eq!(
            page.insert_memo(Memo::new("a", Point::ORIGIN)),
            Err(TreeError::DuplicateId("a".into()))
        );
    }

    #[test]
    fn insert_links_into_parent() {
        let mut page = nested();
        page.insert_memo(Memo::new("m3", Point::ORIGIN).with_parent("b"))
            .unwrap();
        assert_eq!(page.children_of("b"), ["c", "m3"]);
        assert_eq!(
            page.insert_memo(Memo::new("m4", Point::ORIGIN).with_parent("m3")),
            Err(TreeError::NotACategory("m3".into()))
        );
        assert!(!page.contains("m4"));
        page.insert_category(Category::new("d", Point::ORIGIN).with_parent("a"))
            .unwrap();
        assert_eq!(page.children_of("a"), ["b", "m2", "d"]);
    }

    #[test]
    fn remove_lifts_children_into_parent() {
        let mut page = nested();
        assert_eq!(page.remove("b"), Ok(ItemKind::Category));
        assert!(!page.contains("b"));
        assert_eq!(page.parent_of("c").map(ItemId::as_str), Some("a"));
        assert_eq!(page.children_of("a"), ["c", "m2"]);
        // Lookup survived the swap-remove.
        assert_eq!(page.parent_of("c").map(ItemId::as_str), Some("a"));
        assert_eq!(page.children_of("c"), ["m1"]);

        assert_eq!(page.remove("loose"), Ok(ItemKind::Memo));
        assert_eq!(page.position("m1"), Some(Point::new(160.0, 260.0)));
        assert_eq!(page.remove("loose"), Err(TreeError::UnknownItem("loose".into())));
    }

    #[test]
    fn translate_subtree_moves_descendants_rigidly() {
        let mut page = nested();
        let moved = page.translate_subtree("b", Vec2::new(10.0, -5.0));
        assert_eq!(moved, 3);
        assert_eq!(page.position("b"), Some(Point::new(110.0, 95.0)));
        assert_eq!(page.position("c"), Some(Point::new(160.0, 145.0)));
        assert_eq!(page.position("m1"), Some(Point::new(170.0, 255.0)));
        assert_eq!(page.position("a"), Some(Point::ORIGIN));
        assert_eq!(page.position("m2"), Some(Point::new(20.0, 400.0)));
    }
}
