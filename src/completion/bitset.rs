//! Completion Bitmap
//!
//! A growable bitmap over page IDs. Bit `i` lives in byte `i / 8` at position `i % 8`
//! (least significant bit first), which is also the on-disk layout of the completion record.
//!
//! Reads (`has`, `len`, `min_not_exists_from`, `to_bytes`) take the shared lock, mutations take
//! the exclusive lock. No method holds this lock while acquiring another one.

use crate::types::ItemId;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct CompletionSet {
    bytes: RwLock<Vec<u8>>,
}

#[inline]
fn locate(id: ItemId) -> (usize, u32) {
    ((id / 8) as usize, (id % 8) as u32)
}

impl CompletionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from a persisted snapshot. The input is copied.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: RwLock::new(bytes.to_vec()),
        }
    }

    /// Copies the current bitmap, suitable for writing to disk.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.read().clone()
    }

    pub fn has(&self, id: ItemId) -> bool {
        let (unit, bit) = locate(id);
        let bytes = self.bytes.read();
        unit < bytes.len() && bytes[unit] & (1 << bit) != 0
    }

    /// Marks `id` as completed, growing the bitmap as needed.
    pub fn add(&self, id: ItemId) {
        let (unit, bit) = locate(id);
        let mut bytes = self.bytes.write();
        if unit >= bytes.len() {
            bytes.resize(unit + 1, 0);
        }
        bytes[unit] |= 1 << bit;
    }

    /// Clears `id`. IDs beyond the allocated length are already clear, so this is a no-op for them.
    /// Only used for administrative repair; normal operation never un-completes a page.
    pub fn delete(&self, id: ItemId) {
        let (unit, bit) = locate(id);
        let mut bytes = self.bytes.write();
        if let Some(byte) = bytes.get_mut(unit) {
            *byte &= !(1 << bit);
        }
    }

    /// Merges `other` into this set (bitwise OR).
    pub fn union(&self, other: &CompletionSet) {
        if std::ptr::eq(self, other) {
            return;
        }
        // Snapshot first so the two locks are never held together.
        let theirs = other.to_bytes();
        let mut bytes = self.bytes.write();
        if theirs.len() > bytes.len() {
            bytes.resize(theirs.len(), 0);
        }
        for (mine, their) in bytes.iter_mut().zip(theirs) {
            *mine |= their;
        }
    }

    /// Number of completed pages.
    pub fn len(&self) -> usize {
        self.bytes
            .read()
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.read().iter().all(|byte| *byte == 0)
    }

    /// Number of bytes currently allocated.
    pub fn byte_len(&self) -> usize {
        self.bytes.read().len()
    }

    /// Smallest ID `>= from` that is not completed.
    ///
    /// Scans byte by byte starting at the byte holding `from`, ignoring bits below `from` in that
    /// first byte. Everything past the allocated bytes is clear, so the scan stops there at the
    /// latest. Cost is proportional to the distance scanned.
    pub fn min_not_exists_from(&self, from: ItemId) -> ItemId {
        let (mut unit, mut offset) = locate(from);
        let bytes = self.bytes.read();

        while unit < bytes.len() {
            let shifted = bytes[unit] >> offset;
            if shifted != 0xff >> offset {
                return unit as ItemId * 8 + (offset + shifted.trailing_ones()) as ItemId;
            }
            unit += 1;
            offset = 0;
        }

        unit as ItemId * 8 + offset as ItemId
    }
}
