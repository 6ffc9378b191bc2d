//! Pool of extra per-DC connections used for file transfer, plus the
//! cache of exported authorizations so each foreign DC is signed into at
//! most once.

use std::collections::HashMap;

use crate::connection::Connection;

#[derive(Default)]
pub(crate) struct DcPool {
    conns: HashMap<u16, Connection>,
    exported: HashMap<u16, (i32, Vec<u8>)>,
}

impl DcPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn has(&self, dc: u16) -> bool {
        self.conns.contains_key(&dc)
    }

    pub(crate) fn insert(&mut self, dc: u16, conn: Connection) {
        self.conns.insert(dc, conn);
    }

    pub(crate) fn get_mut(&mut self, dc: u16) -> Option<&mut Connection> {
        self.conns.get_mut(&dc)
    }

    pub(crate) fn remove(&mut self, dc: u16) -> Option<Connection> {
        self.conns.remove(&dc)
    }

    /// Remember an authorization exported for `dc`.
    pub(crate) fn note_exported(&mut self, dc: u16, id: i32, bytes: Vec<u8>) {
        self.exported.insert(dc, (id, bytes));
    }

    /// A previously exported authorization for `dc`, if any.
    pub(crate) fn exported_for(&self, dc: u16) -> Option<(i32, Vec<u8>)> {
        self.exported.get(&dc).cloned()
    }

    /// Drop every connection (the exported-auth cache survives; the
    /// server-side authorizations remain valid).
    pub(crate) fn clear_connections(&mut self) {
        self.conns.clear();
    }
}
