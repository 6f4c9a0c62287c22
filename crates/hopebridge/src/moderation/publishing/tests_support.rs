use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::domain::{ContentId, ContentItem, Publishable};
use super::repository::ContentRepository;
use crate::moderation::store::StoreError;

#[derive(Default, Clone)]
pub(super) struct MemoryContentRepository {
    records: Arc<Mutex<HashMap<ContentId, ContentItem>>>,
}

impl ContentRepository for MemoryContentRepository {
    fn insert(&self, item: ContentItem) -> Result<ContentItem, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&item.id) {
            return Err(StoreError::Conflict);
        }
        guard.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<ContentItem>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ContentItem>, StoreError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn toggle(&self, id: &ContentId) -> Result<ContentItem, StoreError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(StoreError::NotFound)?;
        record.toggle_published();
        Ok(record.clone())
    }
}
