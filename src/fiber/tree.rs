//! Fiber arena: insertion, release, links, and walks.

use std::ops::{Index, IndexMut};

use slotmap::SlotMap;

use super::node::{Fiber, FiberId};

/// Arena holding every live fiber of the committed and work-in-progress trees.
///
/// Both trees share one `SlotMap`, so `alternate` links across trees are
/// plain ids. Removed ids are generational: a stale id reads as absent.
pub struct FiberTree<N> {
    fibers: SlotMap<FiberId, Fiber<N>>,
}

impl<N> FiberTree<N> {
    pub fn new() -> Self {
        Self {
            fibers: SlotMap::with_key(),
        }
    }

    pub fn insert(&mut self, fiber: Fiber<N>) -> FiberId {
        self.fibers.insert(fiber)
    }

    pub fn get(&self, id: FiberId) -> Option<&Fiber<N>> {
        self.fibers.get(id)
    }

    pub fn get_mut(&mut self, id: FiberId) -> Option<&mut Fiber<N>> {
        self.fibers.get_mut(id)
    }

    pub fn contains(&self, id: FiberId) -> bool {
        self.fibers.contains_key(id)
    }

    /// Number of live fibers across both trees.
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    /// Children of `id` in sibling order.
    pub fn children(&self, id: FiberId) -> Vec<FiberId> {
        let mut result = Vec::new();
        let mut current = self.fibers.get(id).and_then(|f| f.child);
        while let Some(child) = current {
            result.push(child);
            current = self.fibers.get(child).and_then(|f| f.sibling);
        }
        result
    }

    /// Ordinal of `id` among its parent's children.
    pub fn position(&self, id: FiberId) -> Option<usize> {
        let parent = self.fibers.get(id)?.parent?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// Ancestors of `id`, nearest first. Does not include `id`.
    pub fn ancestors(&self, id: FiberId) -> Vec<FiberId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.fibers.get(current).and_then(|f| f.parent) {
            result.push(p);
            current = p;
        }
        result
    }

    /// Nearest strict ancestor of `id` that owns a host node.
    pub fn host_ancestor(&self, id: FiberId) -> Option<FiberId> {
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.fibers.get(a).is_some_and(|f| f.host.is_some()))
    }

    /// Next fiber after `id` in pre-order: first child, else next sibling,
    /// else the next sibling of the nearest ancestor that has one.
    pub fn next_in_preorder(&self, id: FiberId) -> Option<FiberId> {
        let fiber = self.fibers.get(id)?;
        if let Some(child) = fiber.child {
            return Some(child);
        }
        let mut current = id;
        loop {
            let fiber = self.fibers.get(current)?;
            if let Some(sibling) = fiber.sibling {
                return Some(sibling);
            }
            current = fiber.parent?;
        }
    }

    /// Pre-order traversal of the subtree rooted at `start`.
    ///
    /// Siblings of `start` are not included.
    pub fn walk_depth_first(&self, start: FiberId) -> Vec<FiberId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.fibers.contains_key(current) {
                continue;
            }
            result.push(current);
            for child in self.children(current).into_iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Take `id` out of its parent's child chain. The subtree stays allocated.
    pub fn unlink(&mut self, id: FiberId) {
        let Some(fiber) = self.fibers.get(id) else {
            return;
        };
        let (parent, sibling) = (fiber.parent, fiber.sibling);
        let Some(parent) = parent else {
            return;
        };
        if self.fibers.get(parent).and_then(|p| p.child) == Some(id) {
            self.fibers[parent].child = sibling;
        } else {
            let prev = self
                .children(parent)
                .into_iter()
                .find(|&c| self.fibers.get(c).and_then(|f| f.sibling) == Some(id));
            if let Some(prev) = prev {
                self.fibers[prev].sibling = sibling;
            }
        }
        let fiber = &mut self.fibers[id];
        fiber.parent = None;
        fiber.sibling = None;
    }

    /// Release the subtree rooted at `start`. Returns how many fibers were freed.
    pub fn remove_subtree(&mut self, start: FiberId) -> usize {
        let ids = self.walk_depth_first(start);
        for &id in &ids {
            self.fibers.remove(id);
        }
        ids.len()
    }
}

impl<N> Default for FiberTree<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Index<FiberId> for FiberTree<N> {
    type Output = Fiber<N>;

    fn index(&self, id: FiberId) -> &Fiber<N> {
        &self.fibers[id]
    }
}

impl<N> IndexMut<FiberId> for FiberTree<N> {
    fn index_mut(&mut self, id: FiberId) -> &mut Fiber<N> {
        &mut self.fibers[id]
    }
}
