use super::index::Index;

/// Trait for entities that project an index record for application-layer caching
pub trait IndexAware {
    /// The associated index type this entity can be converted to
    type IndexType: Index;

    /// Converts this entity to its index record
    fn to_index(&self) -> Self::IndexType;
}
