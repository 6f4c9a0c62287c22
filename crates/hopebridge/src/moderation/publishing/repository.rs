use super::domain::{ContentId, ContentItem};
use crate::moderation::store::StoreError;

/// Storage abstraction for publishable content.
pub trait ContentRepository: Send + Sync {
    fn insert(&self, item: ContentItem) -> Result<ContentItem, StoreError>;
    fn fetch(&self, id: &ContentId) -> Result<Option<ContentItem>, StoreError>;
    fn list(&self) -> Result<Vec<ContentItem>, StoreError>;

    /// Flip the publish flag in one step under the store's lock and return
    /// the updated record. No precondition: racing toggles interleave to
    /// some valid final state rather than erroring.
    fn toggle(&self, id: &ContentId) -> Result<ContentItem, StoreError>;
}
