//! Identifier allocator for canvas items
//! Hands out ULIDs that sort strictly after every id issued before,
//! even when several are requested within the same millisecond

use std::collections::HashSet;
use ulid::Ulid;

/// Identifier shared by widgets, sections and areas
pub type ItemId = Ulid;

#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    /// Highest id issued or observed so far
    last: Option<Ulid>,
    /// Number of ids handed out by this allocator
    issued: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next id
    pub fn next_id(&mut self) -> ItemId {
        let fresh = Ulid::new();

        // A fresh ULID from the same millisecond can sort below the last one
        let id = match self.last.map(successor) {
            Some(bumped) if bumped > fresh => bumped,
            _ => fresh,
        };

        self.last = Some(id);
        self.issued += 1;
        id
    }

    /// Number of ids generated since construction
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Make sure every future id sorts after `id`
    pub fn observe(&mut self, id: ItemId) {
        if self.last.map_or(true, |last| id > last) {
            self.last = Some(id);
        }
    }

    /// Seed an allocator from ids already present in a canvas
    pub fn from_existing_ids(existing_ids: &HashSet<ItemId>) -> Self {
        let mut allocator = Self::new();
        for id in existing_ids {
            allocator.observe(*id);
        }
        allocator
    }
}

/// Smallest id sorting after `last`. When the random part is exhausted the
/// timestamp moves forward one millisecond. The 48-bit timestamp itself
/// only runs out in the year 10889; past that the id saturates at `last`.
fn successor(last: Ulid) -> Ulid {
    last.increment().unwrap_or_else(|| {
        let timestamp = last.timestamp_ms().saturating_add(1);
        if timestamp > MAX_TIMESTAMP_MS {
            last
        } else {
            Ulid::from_parts(timestamp, 0)
        }
    })
}

const MAX_TIMESTAMP_MS: u64 = (1 << 48) - 1;
