//! Bid list
//!
//! An insertion-ordered, singly linked list of [`Bid`]s with a permanent
//! sentinel node in front of the first real record. The sentinel makes the
//! empty list just another chain, so append, prepend and remove never need
//! to special-case it.
//!
//! Nodes are stored in a slot vector. Slot 0 is the sentinel and is never
//! released. Removed slots are pushed onto a free stack that is threaded
//! through their `next` links and handed out again by later inserts.
use crate::bid::{Bid, BidId, BidIdRef, RESERVED_BID_ID};
use parking_lot::Mutex;
use std::{fmt, iter::FusedIterator, mem, sync::Arc};
use thiserror::Error;
use tracing::debug;

type NodeIndex = usize;

const SENTINEL: NodeIndex = 0;

struct Node {
    bid: Bid,
    next: Option<NodeIndex>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    #[error("bid not found: {0}")]
    NotFound(BidId),
    #[error("the reserved bid id can not be removed")]
    Reserved,
}

/// A list that can be used from multiple threads
///
/// The list has no internal synchronization, so every operation goes
/// through the mutex.
pub type SharedBidList = Arc<Mutex<BidList>>;

pub struct BidList {
    nodes: Vec<Node>,
    /// Top of the stack of released slots
    free_top: Option<NodeIndex>,
    /// Last real node, or the sentinel when empty
    tail: NodeIndex,
    size: usize,
}

impl BidList {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                bid: Bid::absent(),
                next: None,
            }],
            free_top: None,
            tail: SENTINEL,
            size: 0,
        }
    }

    pub fn new_shared() -> SharedBidList {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Add a bid after the last one
    pub fn append(&mut self, bid: Bid) {
        debug!(bid_id = %bid.bid_id, "append");
        let index = self.alloc(bid);

        self.nodes[self.tail].next = Some(index);
        self.tail = index;
        self.size += 1;
    }

    /// Add a bid in front of the first one
    pub fn prepend(&mut self, bid: Bid) {
        debug!(bid_id = %bid.bid_id, "prepend");
        let index = self.alloc(bid);

        let first = self.nodes[SENTINEL].next;
        self.nodes[index].next = first;
        self.nodes[SENTINEL].next = Some(index);

        if self.tail == SENTINEL {
            self.tail = index;
        }
        self.size += 1;
    }

    /// Find the first bid with a given id
    pub fn find(&self, bid_id: BidIdRef) -> Option<&Bid> {
        self.iter().find(|bid| bid.bid_id == bid_id)
    }

    /// Find the first bid with a given id
    ///
    /// Returns [`Bid::absent`] when there is no such bid.
    pub fn search(&self, bid_id: BidIdRef) -> Bid {
        self.find(bid_id).cloned().unwrap_or_else(Bid::absent)
    }

    /// Unlink and return the first bid with a given id
    ///
    /// The reserved id is rejected with [`ListError::Reserved`] without
    /// touching the list.
    pub fn remove(&mut self, bid_id: BidIdRef) -> Result<Bid, ListError> {
        if bid_id == RESERVED_BID_ID {
            return Err(ListError::Reserved);
        }

        let mut prev = SENTINEL;
        // successor must exist before we look at its id
        while let Some(cur) = self.nodes[prev].next {
            if self.nodes[cur].bid.bid_id == bid_id {
                self.nodes[prev].next = self.nodes[cur].next;
                if self.tail == cur {
                    self.tail = prev;
                }
                self.size -= 1;

                debug!(%bid_id, "remove");
                return Ok(self.release(cur));
            }
            prev = cur;
        }

        Err(ListError::NotFound(bid_id.to_owned()))
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            nodes: &self.nodes,
            next: self.nodes[SENTINEL].next,
            remaining: self.size,
        }
    }

    fn alloc(&mut self, bid: Bid) -> NodeIndex {
        match self.free_top {
            Some(index) => {
                let node = &mut self.nodes[index];
                self.free_top = node.next;
                node.bid = bid;
                node.next = None;
                index
            }
            None => {
                self.nodes.push(Node { bid, next: None });
                self.nodes.len() - 1
            }
        }
    }

    /// Push an already unlinked slot onto the free stack, taking its bid out
    fn release(&mut self, index: NodeIndex) -> Bid {
        debug_assert_ne!(index, SENTINEL);
        let node = &mut self.nodes[index];
        node.next = self.free_top;
        self.free_top = Some(index);
        mem::take(&mut node.bid)
    }

    /// Walk the chain and the free stack and check every structural invariant
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.nodes[SENTINEL].bid.is_absent(), "sentinel was overwritten");

        let mut seen = vec![false; self.nodes.len()];
        seen[SENTINEL] = true;

        let mut last = SENTINEL;
        let mut reachable = 0;
        let mut cur = self.nodes[SENTINEL].next;
        while let Some(index) = cur {
            assert!(!seen[index], "slot {index} linked twice");
            seen[index] = true;
            reachable += 1;
            last = index;
            cur = self.nodes[index].next;
        }
        assert_eq!(reachable, self.size);
        assert_eq!(last, self.tail);
        assert_eq!(self.size == 0, self.tail == SENTINEL);
        assert_eq!(self.size == 0, self.nodes[SENTINEL].next.is_none());

        let mut cur = self.free_top;
        while let Some(index) = cur {
            assert!(!seen[index], "free slot {index} is also linked");
            seen[index] = true;
            cur = self.nodes[index].next;
        }
        assert!(seen.iter().all(|&s| s), "leaked slot");
    }
}

impl Default for BidList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BidList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Extend<Bid> for BidList {
    fn extend<I: IntoIterator<Item = Bid>>(&mut self, iter: I) {
        for bid in iter {
            self.append(bid);
        }
    }
}

impl FromIterator<Bid> for BidList {
    fn from_iter<I: IntoIterator<Item = Bid>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<'a> IntoIterator for &'a BidList {
    type Item = &'a Bid;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Bids in list order, starting after the sentinel
pub struct Iter<'a> {
    nodes: &'a [Node],
    next: Option<NodeIndex>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Bid;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes = self.nodes;
        let node = &nodes[self.next?];
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.bid)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
