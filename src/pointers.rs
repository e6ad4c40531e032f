//! Pointer Types
//!
//! Shared handles to a heap. Two handles may refer to the same heap, so merging through handles
//! must compare pointer identity before taking any lock.
//!

use crate::leftist_heap::*;
use crate::parking_lot::lock_api::{RwLockReadGuard, RwLockWriteGuard};
use crate::parking_lot::{RawRwLock, RwLock};
use crate::util::*;
use crate::visualize::*;
use std::sync::Arc;

pub trait RwLockPtr<ObjType> {
    fn new_ptr(ptr: Arc<RwLock<ObjType>>) -> Self;

    fn new_value(obj: ObjType) -> Self;

    fn ptr(&self) -> &Arc<RwLock<ObjType>>;

    #[inline(always)]
    fn read_recursive(&self) -> RwLockReadGuard<RawRwLock, ObjType> {
        self.ptr().read_recursive()
    }

    #[inline(always)]
    fn write(&self) -> RwLockWriteGuard<RawRwLock, ObjType> {
        self.ptr().write()
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self.ptr(), other.ptr())
    }
}

pub struct ArcRwLock<T> {
    ptr: Arc<RwLock<T>>,
}

impl<T: Send + Sync> Clone for ArcRwLock<T> {
    fn clone(&self) -> Self {
        Self::new_ptr(Arc::clone(self.ptr()))
    }
}

impl<T: Send + Sync> RwLockPtr<T> for ArcRwLock<T> {
    fn new_ptr(ptr: Arc<RwLock<T>>) -> Self {
        Self { ptr }
    }
    fn new_value(obj: T) -> Self {
        Self::new_ptr(Arc::new(RwLock::new(obj)))
    }
    #[inline(always)]
    fn ptr(&self) -> &Arc<RwLock<T>> {
        &self.ptr
    }
}

impl<T: Send + Sync> PartialEq for ArcRwLock<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: Send + Sync> Eq for ArcRwLock<T> {}

pub type LeftistHeapPtr = ArcRwLock<LeftistHeap>;

impl LeftistHeapPtr {
    pub fn new_empty() -> Self {
        Self::new_value(LeftistHeap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.read_recursive().is_empty()
    }

    pub fn insert(&self, key: Key) {
        self.write().insert(key);
    }

    pub fn peek_min(&self) -> HeapResult<Key> {
        self.read_recursive().peek_min()
    }

    pub fn extract_min(&self) -> HeapResult<Key> {
        self.write().extract_min()
    }

    /// move all keys of `other` into this heap; a no-op when both handles point to the same heap.
    /// Locks are always taken in address order, so opposite merges on two threads cannot deadlock.
    pub fn merge_with(&self, other: &Self) {
        if self.ptr_eq(other) {
            return;
        }
        let (mut self_heap, mut other_heap) = if Arc::as_ptr(self.ptr()) < Arc::as_ptr(other.ptr()) {
            let self_heap = self.write();
            (self_heap, other.write())
        } else {
            let other_heap = other.write();
            (self.write(), other_heap)
        };
        self_heap.merge_with(&mut other_heap);
    }
}

impl std::fmt::Debug for LeftistHeapPtr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let heap = self.read_recursive();
        write!(f, "{:?}", heap)
    }
}

impl HeapVisualizer for LeftistHeapPtr {
    fn snapshot(&self, abbrev: bool) -> serde_json::Value {
        self.read_recursive().snapshot(abbrev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointers_self_merge_is_noop() {
        // cargo test pointers_self_merge_is_noop -- --nocapture
        let heap_ptr = LeftistHeapPtr::new_empty();
        heap_ptr.insert(50);
        heap_ptr.insert(30);
        heap_ptr.insert(70);
        heap_ptr.merge_with(&heap_ptr);
        let alias = heap_ptr.clone();
        heap_ptr.merge_with(&alias);
        assert_eq!(heap_ptr.peek_min(), Ok(30));
        heap_ptr.read_recursive().sanity_check().unwrap();
        assert_eq!(heap_ptr.read_recursive().count_nodes(), 3);
        let mut extracted = vec![];
        while !heap_ptr.is_empty() {
            extracted.push(heap_ptr.extract_min().unwrap());
        }
        assert_eq!(extracted, vec![30, 50, 70]);
    }

    #[test]
    fn pointers_merge_transfers_ownership() {
        // cargo test pointers_merge_transfers_ownership -- --nocapture
        let heap_a = LeftistHeapPtr::new_value(LeftistHeap::from_keys(&[10, 20, 5]));
        let heap_b = LeftistHeapPtr::new_value(LeftistHeap::from_keys(&[15, 8, 25]));
        assert!(heap_a != heap_b);
        heap_a.merge_with(&heap_b);
        assert!(heap_b.is_empty());
        assert_eq!(heap_b.peek_min(), Err(EmptyHeapError::Peek));
        assert_eq!(heap_a.snapshot(true)["nodes"].as_array().unwrap().len(), 6);
        // the source stays usable and independent after the transfer
        heap_b.insert(1);
        assert_eq!(heap_a.peek_min(), Ok(5));
        assert_eq!(heap_b.peek_min(), Ok(1));
    }

    #[test]
    fn pointers_shared_across_threads() {
        // cargo test pointers_shared_across_threads -- --nocapture
        let heap_ptr = LeftistHeapPtr::new_empty();
        let handles: Vec<_> = (0..4)
            .map(|thread_index| {
                let heap_ptr = heap_ptr.clone();
                std::thread::spawn(move || {
                    for key in 0..100 {
                        heap_ptr.insert(thread_index * 100 + key);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let heap = heap_ptr.read_recursive();
        heap.sanity_check().unwrap();
        assert_eq!(heap.count_nodes(), 400);
        assert!(format!("{heap_ptr:?}").contains("LeftistHeap"));
    }

    #[test]
    fn pointers_opposite_merges_do_not_deadlock() {
        // cargo test pointers_opposite_merges_do_not_deadlock -- --nocapture
        let heap_a = LeftistHeapPtr::new_value(LeftistHeap::from_keys(&[1, 2, 3]));
        let heap_b = LeftistHeapPtr::new_value(LeftistHeap::from_keys(&[4, 5, 6]));
        let (sender, receiver) = std::sync::mpsc::channel();
        for (target, source) in [(heap_a.clone(), heap_b.clone()), (heap_b.clone(), heap_a.clone())] {
            let sender = sender.clone();
            std::thread::spawn(move || {
                for _ in 0..5000 {
                    target.merge_with(&source);
                }
                let _ = sender.send(());
            });
        }
        for _ in 0..2 {
            receiver
                .recv_timeout(std::time::Duration::from_secs(60))
                .expect("opposite merges must finish");
        }
        let (heap_a, heap_b) = (heap_a.read_recursive(), heap_b.read_recursive());
        heap_a.sanity_check().unwrap();
        heap_b.sanity_check().unwrap();
        assert_eq!(heap_a.count_nodes() + heap_b.count_nodes(), 6);
    }
}
