//! Identifier minting for freshly generated diagram entities.
//!
//! Node and edge identifiers are plain strings owned by the document store.
//! New ones are minted through an [`IdGenerator`] that the caller injects, so
//! concurrent ingestions never coordinate on a shared counter.
//!
//! # Examples
//!
//! ```
//! use atlas_core::identifier::{IdGenerator, UuidGenerator, is_draft};
//!
//! let ids = UuidGenerator;
//! let id = ids.mint(true);
//! assert!(is_draft(&id));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

/// Prefix marking identifiers of draft entities (generated, not yet confirmed).
pub const DRAFT_PREFIX: &str = "draft-";

/// Returns `true` if `id` was minted for a draft entity.
pub fn is_draft(id: &str) -> bool {
    id.starts_with(DRAFT_PREFIX)
}

/// Source of globally unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a new identifier, distinct from every identifier previously
    /// returned by any generator of the same kind.
    fn generate(&self) -> String;

    /// Returns a new identifier, prefixed with [`DRAFT_PREFIX`] when `draft` is set.
    fn mint(&self, draft: bool) -> String {
        let id = self.generate();
        if draft {
            format!("{DRAFT_PREFIX}{id}")
        } else {
            id
        }
    }
}

/// Random (version 4) UUID identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix><n>` identifiers.
///
/// The counter belongs to the generator instance, so two generators never
/// share state. Only unique within one instance; intended for reproducible
/// output in tests and fixtures.
#[derive(Debug)]
pub struct SequentialGenerator {
    prefix: String,
    next: AtomicUsize,
}

impl SequentialGenerator {
    /// Creates a generator producing `<prefix>1`, `<prefix>2`, ...
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(1),
        }
    }
}

impl IdGenerator for SequentialGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}{n}", self.prefix)
    }
}
