//! Ordered, doubly-linked list backed by an arena.
//!
//! Albums are kept in a [`NodeList`] so that page rendering can ask any album
//! for its previous and next sibling directly, without carrying index
//! arithmetic around. Nodes live in a contiguous `Vec` of slots and link to
//! each other by [`NodeId`] (a slot index), so there are no reference cycles
//! and no `Rc<RefCell<_>>`.
//!
//! ## Costs
//!
//! | Operation | Cost |
//! |---|---|
//! | [`append`](NodeList::append) | O(1) |
//! | [`insert`](NodeList::insert) | O(n) to find the position, O(1) to splice |
//! | [`get`](NodeList::get) / [`set`](NodeList::set) / [`remove`](NodeList::remove) | O(n), scanning from the end implied by the index sign |
//! | prev/next from an [`Entry`] | O(1) |
//! | [`len`](NodeList::len) | O(n), computed by traversal |
//!
//! Lists here hold tens to low hundreds of elements, so the linear scans and
//! the uncached length are fine.
//!
//! ## Indexing
//!
//! Positional operations take an `isize`: `0` is the head, `-1` is the tail.
//! Out-of-range positions and slicing are contract violations and come back
//! as [`ListError`], never as a silently clamped result.

use std::fmt;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange { index: isize, len: usize },
    #[error("slicing is not implemented for NodeList")]
    SliceUnsupported,
}

/// Handle to a node in a [`NodeList`].
///
/// Ids stay valid until the node is removed; a removed node's slot may be
/// reused by a later insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

pub struct NodeList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl<T> NodeList<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Add `value` after the current tail.
    pub fn append(&mut self, value: T) -> NodeId {
        let prev = self.tail;
        let id = self.alloc(Node {
            value,
            prev,
            next: None,
        });
        match prev {
            Some(p) => self.node_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Insert `value` before the element currently at `index`.
    ///
    /// An index at or past the end appends.
    pub fn insert(&mut self, index: usize, value: T) -> NodeId {
        let Some(at) = self.ids().nth(index) else {
            return self.append(value);
        };
        let prev = self.node(at).prev;
        let id = self.alloc(Node {
            value,
            prev,
            next: Some(at),
        });
        self.node_mut(at).prev = Some(id);
        match prev {
            Some(p) => self.node_mut(p).next = Some(id),
            None => self.head = Some(id),
        }
        id
    }

    pub fn get(&self, index: isize) -> Result<&T, ListError> {
        let id = self.locate(index)?;
        Ok(&self.node(id).value)
    }

    pub fn get_mut(&mut self, index: isize) -> Result<&mut T, ListError> {
        let id = self.locate(index)?;
        Ok(&mut self.node_mut(id).value)
    }

    /// Replace the value at `index`, keeping its links. Returns the old value.
    pub fn set(&mut self, index: isize, value: T) -> Result<T, ListError> {
        let slot = self.get_mut(index)?;
        Ok(std::mem::replace(slot, value))
    }

    /// Unlink the element at `index` and return it. Its neighbours are joined.
    pub fn remove(&mut self, index: isize) -> Result<T, ListError> {
        let id = self.locate(index)?;
        let node = self.slots[id.0]
            .take()
            .expect("located node must be live");
        self.free.push(id.0);

        match node.prev {
            Some(p) => self.node_mut(p).next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(n) => self.node_mut(n).prev = node.prev,
            None => self.tail = node.prev,
        }
        Ok(node.value)
    }

    /// Slices are not supported: positions are only meaningful one at a time.
    pub fn slice(&self, _range: Range<isize>) -> Result<Vec<&T>, ListError> {
        Err(ListError::SliceUnsupported)
    }

    /// Number of elements, counted by walking the links.
    pub fn len(&self) -> usize {
        self.ids().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter { ids: self.ids() }
    }

    /// Iterate over cursors that can reach their neighbours.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries { ids: self.ids() }
    }

    /// Cursor for a node id, if it is still live.
    pub fn entry(&self, id: NodeId) -> Option<Entry<'_, T>> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .map(|_| Entry { list: self, id })
    }

    pub fn first(&self) -> Option<Entry<'_, T>> {
        self.head.map(|id| Entry { list: self, id })
    }

    pub fn last(&self) -> Option<Entry<'_, T>> {
        self.tail.map(|id| Entry { list: self, id })
    }

    fn ids(&self) -> Ids<'_, T> {
        Ids {
            list: self,
            front: self.head,
            back: self.tail,
        }
    }

    fn locate(&self, index: isize) -> Result<NodeId, ListError> {
        let found = if index >= 0 {
            self.ids().nth(index as usize)
        } else {
            self.ids().rev().nth(index.unsigned_abs() - 1)
        };
        found.ok_or_else(|| ListError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        self.slots[id.0].as_ref().expect("linked node must be live")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.slots[id.0].as_mut().expect("linked node must be live")
    }
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for NodeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for NodeList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walks node ids along the links. Front and back stop when they meet.
struct Ids<'a, T> {
    list: &'a NodeList<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
}

impl<T> Iterator for Ids<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.front?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.front = self.list.node(id).next;
        }
        Some(id)
    }
}

impl<T> DoubleEndedIterator for Ids<'_, T> {
    fn next_back(&mut self) -> Option<NodeId> {
        let id = self.back?;
        if self.front == self.back {
            self.front = None;
            self.back = None;
        } else {
            self.back = self.list.node(id).prev;
        }
        Some(id)
    }
}

/// Lazy iterator over values; `.rev()` walks the `prev` links.
pub struct Iter<'a, T> {
    ids: Ids<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let list = self.ids.list;
        self.ids.next().map(|id| &list.node(id).value)
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        let list = self.ids.list;
        self.ids.next_back().map(|id| &list.node(id).value)
    }
}

pub struct Entries<'a, T> {
    ids: Ids<'a, T>,
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = Entry<'a, T>;

    fn next(&mut self) -> Option<Entry<'a, T>> {
        let list = self.ids.list;
        self.ids.next().map(|id| Entry { list, id })
    }
}

impl<'a, T> DoubleEndedIterator for Entries<'a, T> {
    fn next_back(&mut self) -> Option<Entry<'a, T>> {
        let list = self.ids.list;
        self.ids.next_back().map(|id| Entry { list, id })
    }
}

/// A cursor on one node: its value plus O(1) access to its neighbours.
pub struct Entry<'a, T> {
    list: &'a NodeList<T>,
    id: NodeId,
}

impl<'a, T> Entry<'a, T> {
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn value(&self) -> &'a T {
        &self.list.node(self.id).value
    }

    pub fn prev(&self) -> Option<Entry<'a, T>> {
        self.list.node(self.id).prev.map(|id| Entry {
            list: self.list,
            id,
        })
    }

    pub fn next(&self) -> Option<Entry<'a, T>> {
        self.list.node(self.id).next.map(|id| Entry {
            list: self.list,
            id,
        })
    }
}

impl<T> Clone for Entry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entry<'_, T> {}

impl<T> std::ops::Deref for Entry<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.value()
    }
}
