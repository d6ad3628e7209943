use minigql_types::RecordKey;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A storable record.
///
/// Records serialize to the same JSON shape the GraphQL layer reads fields
/// from, and deserialize back when a store is hydrated from a collection.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Name of the document collection these records are persisted in.
    const COLLECTION: &'static str;

    /// The record's identifier.
    fn key(&self) -> RecordKey;

    /// Overwrite the identifier with the store-assigned sequence number.
    fn assign_key(&mut self, seq: i64);
}
