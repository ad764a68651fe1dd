//! Write-batch accumulation with before-image capture for undo.
//!
//! Instead of grouping puts/deletes by column family for a multi-CF atomic
//! commit, a single [`OpStack`] buffers ops against one column family and
//! additionally records what each mutated key held before the batch, so
//! [`crate::db::PrefixDb::rollback`] can invert it later.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rows::UNSAFE_PREFIXES;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl Op {
    fn key(&self) -> &[u8] {
        match self {
            Op::Put { key, .. } => key,
            Op::Delete { key } => key,
        }
    }
}

/// One entry of the undo log: what to do to `key` to restore the
/// pre-batch state. `None` before-image means the key did not exist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UndoOp {
    Restore { key: Vec<u8>, value: Vec<u8> },
    Remove { key: Vec<u8> },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UndoLog {
    pub ops: Vec<UndoOp>,
}

/// Accumulates ops for one block's worth of writes, tracking the first
/// before-image observed per key so the undo log reflects the state before
/// any op in this batch touched it — not the state after some earlier op
/// in the same batch (§4.2's conflict policy).
pub struct OpStack {
    ops: Vec<Op>,
    before_images: HashMap<Vec<u8>, Option<Vec<u8>>>,
    unsafe_prefixes: Vec<u8>,
}

impl OpStack {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            before_images: HashMap::new(),
            unsafe_prefixes: UNSAFE_PREFIXES.to_vec(),
        }
    }

    fn is_unsafe(&self, key: &[u8]) -> bool {
        key.first()
            .map(|tag| self.unsafe_prefixes.contains(tag))
            .unwrap_or(false)
    }

    /// Records `key`'s current value the first time this batch touches it.
    /// Subsequent writes to the same key within the batch do not overwrite
    /// the recorded before-image, per the "preserve first before-image"
    /// conflict policy.
    fn record_before_image(&mut self, key: &[u8], current: Option<Vec<u8>>) {
        if self.is_unsafe(key) {
            return;
        }
        self.before_images.entry(key.to_vec()).or_insert(current);
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>, current: impl FnOnce() -> Option<Vec<u8>>) {
        self.record_before_image(&key, current());
        self.ops.push(Op::Put { key, value });
    }

    pub fn delete(&mut self, key: Vec<u8>, current: impl FnOnce() -> Option<Vec<u8>>) {
        self.record_before_image(&key, current());
        self.ops.push(Op::Delete { key });
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Builds the undo log for this batch: for every key whose before-image
    /// was captured, emit the op that restores it. Keys written under an
    /// unsafe prefix never appear here and so are never rolled back.
    pub fn build_undo_log(&self) -> UndoLog {
        let mut ops = Vec::with_capacity(self.before_images.len());
        for (key, before) in &self.before_images {
            let op = match before {
                Some(value) => UndoOp::Restore {
                    key: key.clone(),
                    value: value.clone(),
                },
                None => UndoOp::Remove { key: key.clone() },
            };
            ops.push(op);
        }
        UndoLog { ops }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
        self.before_images.clear();
    }
}

impl Default for OpStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_first_before_image_on_repeated_writes() {
        let mut stack = OpStack::new();
        stack.put(b"k".to_vec(), b"v1".to_vec(), || None);
        stack.put(b"k".to_vec(), b"v2".to_vec(), || Some(b"v1".to_vec()));
        let undo = stack.build_undo_log();
        assert_eq!(undo.ops.len(), 1);
        assert_eq!(undo.ops[0], UndoOp::Remove { key: b"k".to_vec() });
    }

    #[test]
    fn unsafe_prefix_skips_before_image_capture() {
        let mut stack = OpStack::new();
        let undo_key = crate::rows::UndoRow::pack_key(1, &[0u8; 32]);
        stack.put(undo_key, b"payload".to_vec(), || None);
        assert!(stack.build_undo_log().ops.is_empty());
    }

    #[test]
    fn last_after_image_wins_in_the_op_list() {
        let mut stack = OpStack::new();
        stack.put(b"k".to_vec(), b"v1".to_vec(), || None);
        stack.put(b"k".to_vec(), b"v2".to_vec(), || Some(b"v1".to_vec()));
        let puts: Vec<_> = stack
            .ops()
            .iter()
            .filter_map(|op| match op {
                Op::Put { key, value } if key == b"k" => Some(value.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(puts.last().unwrap(), b"v2");
    }
}
