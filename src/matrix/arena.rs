//! Handle arena for live matrices
//!
//! Handles are slot-map keys exported as their 64-bit FFI form. Keys carry a
//! generation, so a freed or never-issued handle simply fails to resolve.

use slotmap::{DefaultKey, Key, KeyData, SlotMap};

/// Opaque matrix handle; `0` is the null handle
pub type MatrixHandle = u64;

pub const NULL_HANDLE: MatrixHandle = 0;

/// Create a `DefaultKey` from a 64-bit handle.
///
/// This is the reverse of `key.data().as_ffi()`.
#[inline]
fn key_from_handle(handle: MatrixHandle) -> Option<DefaultKey> {
    (handle != NULL_HANDLE).then(|| KeyData::from_ffi(handle).into())
}

#[derive(Debug)]
pub struct MatrixArena<M> {
    slots: SlotMap<DefaultKey, M>,
}

impl<M> Default for MatrixArena<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MatrixArena<M> {
    pub fn new() -> Self {
        MatrixArena {
            slots: SlotMap::with_key(),
        }
    }

    /// Store a matrix and return its handle (never `0`)
    pub fn insert(&mut self, matrix: M) -> MatrixHandle {
        self.slots.insert(matrix).data().as_ffi()
    }

    pub fn get(&self, handle: MatrixHandle) -> Option<&M> {
        self.slots.get(key_from_handle(handle)?)
    }

    pub fn get_mut(&mut self, handle: MatrixHandle) -> Option<&mut M> {
        self.slots.get_mut(key_from_handle(handle)?)
    }

    /// Release a handle; `None` if it was not live
    pub fn remove(&mut self, handle: MatrixHandle) -> Option<M> {
        self.slots.remove(key_from_handle(handle)?)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
