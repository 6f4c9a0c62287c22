use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    ContentDraft, ContentId, ContentItem, ContentListingFilter, InvalidContent,
};
use super::repository::ContentRepository;
use crate::moderation::identity::{CallerIdentity, UnauthorizedError};
use crate::moderation::store::StoreError;

static CONTENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_content_id() -> ContentId {
    let id = CONTENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ContentId(format!("cnt-{id:06}"))
}

/// Content authoring and publish-visibility operations.
pub struct PublishingService<R> {
    repository: Arc<R>,
}

impl<R> PublishingService<R>
where
    R: ContentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Admin: author a new item. Items start unpublished so nothing goes
    /// live without an explicit toggle.
    pub fn create(
        &self,
        draft: ContentDraft,
        caller: &CallerIdentity,
    ) -> Result<ContentItem, PublishingServiceError> {
        caller.require_admin()?;
        draft.validate()?;

        let ContentDraft {
            kind,
            title,
            summary,
            media_reference,
        } = draft;

        let item = ContentItem {
            id: next_content_id(),
            kind,
            title,
            summary,
            media_reference,
            author: Some(caller.id.clone()),
            is_published: false,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(item)?;
        info!(
            content_id = %stored.id.0,
            kind = stored.kind.label(),
            "content item created"
        );
        Ok(stored)
    }

    /// Admin: flip visibility. Both directions are always legal; the store
    /// performs the flip atomically.
    pub fn toggle_publish(
        &self,
        id: &ContentId,
        caller: &CallerIdentity,
    ) -> Result<ContentItem, PublishingServiceError> {
        caller.require_admin()?;

        let updated = self.repository.toggle(id)?;
        info!(
            content_id = %updated.id.0,
            published = updated.is_published,
            admin = %caller.id,
            "content visibility toggled"
        );
        Ok(updated)
    }

    /// Drafts read as missing for everyone but admins, so the publish flag
    /// is the single visibility gate.
    pub fn get(
        &self,
        id: &ContentId,
        caller: &CallerIdentity,
    ) -> Result<ContentItem, PublishingServiceError> {
        let item = self.repository.fetch(id)?.ok_or(StoreError::NotFound)?;
        if !item.is_published && !caller.is_admin() {
            return Err(StoreError::NotFound.into());
        }
        Ok(item)
    }

    /// Newest-first listing; including drafts requires the admin role.
    pub fn list(
        &self,
        filter: ContentListingFilter,
        caller: &CallerIdentity,
    ) -> Result<Vec<ContentItem>, PublishingServiceError> {
        if filter.include_drafts {
            caller.require_admin()?;
        }

        let mut items = self.repository.list()?;
        if !filter.include_drafts {
            items.retain(|item| item.is_published);
        }
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(items)
    }
}

/// Error raised by the publishing service.
#[derive(Debug, thiserror::Error)]
pub enum PublishingServiceError {
    #[error(transparent)]
    Unauthorized(#[from] UnauthorizedError),
    #[error(transparent)]
    Invalid(#[from] InvalidContent),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moderation::publishing::domain::{ContentKind, Publishable};
    use crate::moderation::publishing::tests_support::MemoryContentRepository;

    fn draft() -> ContentDraft {
        ContentDraft {
            kind: ContentKind::Post,
            title: "Community Garden Opens".to_string(),
            summary: "Volunteers break ground on the east lot.".to_string(),
            media_reference: None,
        }
    }

    fn build_service() -> (
        PublishingService<MemoryContentRepository>,
        Arc<MemoryContentRepository>,
    ) {
        let repository = Arc::new(MemoryContentRepository::default());
        let service = PublishingService::new(repository.clone());
        (service, repository)
    }

    #[test]
    fn items_start_as_drafts() {
        let (service, _) = build_service();
        let admin = CallerIdentity::admin("editor-1");

        let item = service.create(draft(), &admin).expect("creation succeeds");
        assert!(!item.is_published);
        assert_eq!(item.author.as_deref(), Some("editor-1"));
    }

    #[test]
    fn members_cannot_author_or_toggle() {
        let (service, _) = build_service();
        let admin = CallerIdentity::admin("editor-1");
        let member = CallerIdentity::member("user-7");

        assert!(matches!(
            service.create(draft(), &member),
            Err(PublishingServiceError::Unauthorized(_))
        ));

        let item = service.create(draft(), &admin).expect("creation succeeds");
        assert!(matches!(
            service.toggle_publish(&item.id, &member),
            Err(PublishingServiceError::Unauthorized(_))
        ));

        let stored = service.get(&item.id, &admin).expect("admin read succeeds");
        assert!(!stored.is_published, "state unchanged");
    }

    #[test]
    fn toggle_twice_restores_the_original_flag() {
        let (service, _) = build_service();
        let admin = CallerIdentity::admin("editor-1");

        let item = service.create(draft(), &admin).expect("creation succeeds");
        let published = service
            .toggle_publish(&item.id, &admin)
            .expect("toggle succeeds");
        assert!(published.is_published);

        let unpublished = service
            .toggle_publish(&item.id, &admin)
            .expect("toggle succeeds");
        assert!(!unpublished.is_published);
    }

    #[test]
    fn drafts_are_invisible_to_the_public() {
        let (service, _) = build_service();
        let admin = CallerIdentity::admin("editor-1");
        let anonymous = CallerIdentity::anonymous();

        let item = service.create(draft(), &admin).expect("creation succeeds");

        assert!(matches!(
            service.get(&item.id, &anonymous),
            Err(PublishingServiceError::Store(StoreError::NotFound))
        ));
        assert!(service.get(&item.id, &admin).is_ok());

        let listed = service
            .list(ContentListingFilter::default(), &anonymous)
            .expect("public listing succeeds");
        assert!(listed.is_empty());

        assert!(matches!(
            service.list(
                ContentListingFilter {
                    include_drafts: true
                },
                &anonymous
            ),
            Err(PublishingServiceError::Unauthorized(_))
        ));

        let drafts = service
            .list(
                ContentListingFilter {
                    include_drafts: true,
                },
                &admin,
            )
            .expect("admin listing succeeds");
        assert_eq!(drafts.len(), 1);

        service
            .toggle_publish(&item.id, &admin)
            .expect("toggle succeeds");
        let listed = service
            .list(ContentListingFilter::default(), &anonymous)
            .expect("public listing succeeds");
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn publishable_toggle_is_reusable_on_owned_records() {
        let (service, _) = build_service();
        let admin = CallerIdentity::admin("editor-1");

        let mut item = service.create(draft(), &admin).expect("creation succeeds");
        assert!(item.toggle_published());
        assert!(!item.toggle_published());
    }

    #[test]
    fn create_rejects_blank_titles() {
        let (service, _) = build_service();
        let admin = CallerIdentity::admin("editor-1");

        let bad = ContentDraft {
            title: " ".to_string(),
            ..draft()
        };
        assert!(matches!(
            service.create(bad, &admin),
            Err(PublishingServiceError::Invalid(InvalidContent::MissingTitle))
        ));
    }
}
