//! Incremental rank/select index over contribution values.
//!
//! A size-augmented AVL tree keyed by `(value, seq)`, where `seq` is the
//! insertion sequence number. Equal values are therefore strictly ordered by
//! arrival, and a new value always ranks after every equal value inserted
//! before it. Both `insert` and `select` touch `O(log n)` nodes.
//!
//! Nodes live behind [`NodeStore`], so the same tree runs on pallet storage
//! (persisted between extrinsics, never rebuilt) and on an in-memory map in tests.

use codec::{Decode, Encode, MaxEncodedLen};
use core::{cmp::Ordering, marker::PhantomData};
use sp_runtime::RuntimeDebug;
use scale_info::TypeInfo;

use crate::pallet::{Config, RankLen, RankNodes, RankRoot};
use crate::types::Balance;

/// Node identifier; equal to the insertion sequence number of its value.
pub type NodeId = u32;

#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
pub struct RankNode<V> {
    pub value: V,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub height: u8,
    /// Number of nodes in the subtree rooted here.
    pub size: u32,
}

impl<V> RankNode<V> {
    fn leaf(value: V) -> Self {
        Self { value, left: None, right: None, height: 1, size: 1 }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, RuntimeDebug)]
pub enum IndexError {
    /// A child link points at a node the store does not hold.
    MissingNode(NodeId),
    /// The sequence space is exhausted.
    Full,
}

/// Backing storage of the tree.
pub trait NodeStore<V> {
    fn root(&self) -> Option<NodeId>;
    fn set_root(&mut self, root: NodeId);
    /// Number of inserted values, which is also the next free node id.
    fn len(&self) -> u32;
    fn set_len(&mut self, len: u32);
    fn node(&self, id: NodeId) -> Option<RankNode<V>>;
    fn put_node(&mut self, id: NodeId, node: RankNode<V>);
}

pub struct OrderStatisticsIndex<S, V> {
    store: S,
    _value: PhantomData<V>,
}

impl<S, V> OrderStatisticsIndex<S, V>
where
    S: NodeStore<V>,
    V: Ord + Copy,
{
    pub fn new(store: S) -> Self {
        Self { store, _value: PhantomData }
    }

    pub fn len(&self) -> u32 {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `value` and returns its 0-based rank among all values inserted
    /// so far, i.e. the number of keys ordered strictly before it.
    pub fn insert(&mut self, value: V) -> Result<u32, IndexError> {
        let id = self.store.len();
        let len = id.checked_add(1).ok_or(IndexError::Full)?;
        let (root, rank) = self.insert_at(self.store.root(), id, value)?;
        self.store.set_root(root);
        self.store.set_len(len);
        Ok(rank)
    }

    /// Returns the value holding 0-based `rank`, or `None` past the end.
    pub fn select(&self, rank: u32) -> Result<Option<V>, IndexError> {
        let mut remaining = rank;
        let mut cursor = self.store.root();
        while let Some(id) = cursor {
            let node = self.load(id)?;
            let (_, left_size) = self.dims(node.left)?;
            match remaining.cmp(&left_size) {
                Ordering::Less => cursor = node.left,
                Ordering::Equal => return Ok(Some(node.value)),
                Ordering::Greater => {
                    remaining -= left_size + 1;
                    cursor = node.right;
                },
            }
        }
        Ok(None)
    }

    /// Height of the tree; `0` when empty.
    pub fn height(&self) -> Result<u8, IndexError> {
        Ok(self.dims(self.store.root())?.0)
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn insert_at(
        &mut self,
        at: Option<NodeId>,
        id: NodeId,
        value: V,
    ) -> Result<(NodeId, u32), IndexError> {
        let Some(at) = at else {
            self.store.put_node(id, RankNode::leaf(value));
            return Ok((id, 0));
        };

        let mut node = self.load(at)?;
        // `id` is larger than every stored sequence number, so ties go right.
        let rank = if value < node.value {
            let (child, rank) = self.insert_at(node.left, id, value)?;
            node.left = Some(child);
            rank
        } else {
            let (_, left_size) = self.dims(node.left)?;
            let (child, rank) = self.insert_at(node.right, id, value)?;
            node.right = Some(child);
            rank + left_size + 1
        };

        Ok((self.rebalance(at, node)?, rank))
    }

    fn rebalance(&mut self, id: NodeId, mut node: RankNode<V>) -> Result<NodeId, IndexError> {
        self.refresh(&mut node)?;
        let (left_height, _) = self.dims(node.left)?;
        let (right_height, _) = self.dims(node.right)?;

        if left_height > right_height + 1 {
            let left_id = node.left.ok_or(IndexError::MissingNode(id))?;
            let left = self.load(left_id)?;
            if self.dims(left.right)?.0 > self.dims(left.left)?.0 {
                node.left = Some(self.rotate_left(left_id, left)?);
            }
            return self.rotate_right(id, node);
        }

        if right_height > left_height + 1 {
            let right_id = node.right.ok_or(IndexError::MissingNode(id))?;
            let right = self.load(right_id)?;
            if self.dims(right.left)?.0 > self.dims(right.right)?.0 {
                node.right = Some(self.rotate_right(right_id, right)?);
            }
            return self.rotate_left(id, node);
        }

        self.store.put_node(id, node);
        Ok(id)
    }

    fn rotate_left(&mut self, id: NodeId, mut node: RankNode<V>) -> Result<NodeId, IndexError> {
        let pivot_id = node.right.ok_or(IndexError::MissingNode(id))?;
        let mut pivot = self.load(pivot_id)?;
        node.right = pivot.left;
        self.refresh(&mut node)?;
        self.store.put_node(id, node);
        pivot.left = Some(id);
        self.refresh(&mut pivot)?;
        self.store.put_node(pivot_id, pivot);
        Ok(pivot_id)
    }

    fn rotate_right(&mut self, id: NodeId, mut node: RankNode<V>) -> Result<NodeId, IndexError> {
        let pivot_id = node.left.ok_or(IndexError::MissingNode(id))?;
        let mut pivot = self.load(pivot_id)?;
        node.left = pivot.right;
        self.refresh(&mut node)?;
        self.store.put_node(id, node);
        pivot.right = Some(id);
        self.refresh(&mut pivot)?;
        self.store.put_node(pivot_id, pivot);
        Ok(pivot_id)
    }

    /// Recomputes height and size from the (already stored) children.
    fn refresh(&self, node: &mut RankNode<V>) -> Result<(), IndexError> {
        let (left_height, left_size) = self.dims(node.left)?;
        let (right_height, right_size) = self.dims(node.right)?;
        node.height = 1 + left_height.max(right_height);
        node.size = 1 + left_size + right_size;
        Ok(())
    }

    fn dims(&self, id: Option<NodeId>) -> Result<(u8, u32), IndexError> {
        match id {
            None => Ok((0, 0)),
            Some(id) => self.load(id).map(|node| (node.height, node.size)),
        }
    }

    fn load(&self, id: NodeId) -> Result<RankNode<V>, IndexError> {
        self.store.node(id).ok_or(IndexError::MissingNode(id))
    }
}

/// Pallet storage backend: `RankRoot`, `RankLen` and `RankNodes`.
pub struct StorageNodes<T>(PhantomData<T>);

impl<T> Default for StorageNodes<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Config> NodeStore<Balance> for StorageNodes<T> {
    fn root(&self) -> Option<NodeId> {
        RankRoot::<T>::get()
    }

    fn set_root(&mut self, root: NodeId) {
        RankRoot::<T>::put(root);
    }

    fn len(&self) -> u32 {
        RankLen::<T>::get()
    }

    fn set_len(&mut self, len: u32) {
        RankLen::<T>::put(len);
    }

    fn node(&self, id: NodeId) -> Option<RankNode<Balance>> {
        RankNodes::<T>::get(id)
    }

    fn put_node(&mut self, id: NodeId, node: RankNode<Balance>) {
        RankNodes::<T>::insert(id, node);
    }
}

/// The contribution index of the pallet.
pub type ContributionIndex<T> = OrderStatisticsIndex<StorageNodes<T>, Balance>;
