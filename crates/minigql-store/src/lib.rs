//! Record storage for minigql.
//!
//! Two layers live here:
//!
//! - the **record store**, an in-memory ordered sequence of records shared
//!   by every request a server handles ([`RecordStore`],
//!   [`InMemoryRecordStore`]);
//! - the **document collection**, a persistent bag of records that the store
//!   is hydrated from at startup ([`Collection`], [`JsonFileCollection`],
//!   [`MemoryCollection`]).
//!
//! # Design Rules
//!
//! 1. Record keys are unique within a store. `insert` rejects duplicates.
//! 2. Records are never deleted from a store; `create` appends.
//! 3. `create` assigns the key. Callers never choose it.
//! 4. Reads take a shared lock, writes an exclusive one.
//! 5. Collections are touched only by seeding and hydration.

pub mod collection;
pub mod error;
pub mod memory;
pub mod record;
pub mod traits;

pub use collection::{hydrate, seed, Collection, JsonFileCollection, MemoryCollection};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRecordStore;
pub use record::Record;
pub use traits::RecordStore;
