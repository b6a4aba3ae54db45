//! The back-reference handle table.
//!
//! Allocation and registration are kept as two distinct steps: `alloc`
//! reserves the next id without inserting anything, and `register`
//! inserts the finished content under a previously allocated id. This
//! matches the grammar's own two-step discipline, where a handle is
//! reserved before a node's body is fully parsed and only filled in once
//! construction completes.

use std::collections::HashMap;

use crate::content::{Content, Handle};
use crate::error::{Error, Result};
use crate::token::BASE_HANDLE;

#[derive(Debug, Default)]
pub struct HandleTable {
    next: u32,
    entries: HashMap<u32, Content>,
}

impl HandleTable {
    pub fn new() -> HandleTable {
        HandleTable {
            next: BASE_HANDLE,
            entries: HashMap::new(),
        }
    }

    /// Reserves and returns the next handle id without registering content
    /// for it yet.
    pub fn alloc(&mut self) -> Handle {
        let handle = Handle(self.next);
        self.next += 1;
        handle
    }

    /// Inserts `content` under a handle previously returned by `alloc`.
    pub fn register(&mut self, handle: Handle, content: Content) {
        self.entries.insert(handle.0, content);
    }

    pub fn get(&self, handle: Handle) -> Result<&Content> {
        self.entries.get(&handle.0).ok_or(Error::BadHandle(handle.0))
    }

    /// Clears the table and resets the next handle id to its initial
    /// value.
    pub fn reset(&mut self) {
        self.next = BASE_HANDLE;
        self.entries.clear();
    }

    pub fn next_handle(&self) -> u32 {
        self.next
    }
}
