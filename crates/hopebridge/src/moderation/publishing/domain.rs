use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::moderation::lifecycle;

/// Identifier wrapper for publishable content items.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(pub String);

/// The content families sharing the publish toggle. They differ in layout
/// on the public site, not in lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Post,
    Podcast,
    AwarenessResource,
}

impl ContentKind {
    pub const fn label(self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Podcast => "podcast",
            ContentKind::AwarenessResource => "awareness_resource",
        }
    }
}

/// Capability of any record whose visibility is a reversible publish flag.
/// One trait instead of a boolean repeated across unrelated types, so the
/// toggle semantics live in exactly one place.
pub trait Publishable {
    fn is_published(&self) -> bool;
    fn set_published(&mut self, published: bool);

    /// Flip visibility and return the new flag. Always legal.
    fn toggle_published(&mut self) -> bool {
        let next = lifecycle::toggle_published(self.is_published());
        self.set_published(next);
        next
    }
}

/// Admin-provided payload for a new content item. Items start as drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub kind: ContentKind,
    pub title: String,
    pub summary: String,
    /// Audio file for podcasts, hero image elsewhere; storage is handled
    /// by the asset pipeline, this is only the reference.
    #[serde(default)]
    pub media_reference: Option<String>,
}

impl ContentDraft {
    pub fn validate(&self) -> Result<(), InvalidContent> {
        if self.title.trim().is_empty() {
            return Err(InvalidContent::MissingTitle);
        }
        Ok(())
    }
}

/// Constraint violations on a content draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidContent {
    #[error("content title is required")]
    MissingTitle,
}

/// A post, podcast episode, or awareness resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub kind: ContentKind,
    pub title: String,
    pub summary: String,
    pub media_reference: Option<String>,
    pub author: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn view(&self) -> ContentView {
        ContentView {
            content_id: self.id.clone(),
            kind: self.kind.label(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            media_reference: self.media_reference.clone(),
            author: self.author.clone(),
            is_published: self.is_published,
            created_at: self.created_at,
        }
    }
}

impl Publishable for ContentItem {
    fn is_published(&self) -> bool {
        self.is_published
    }

    fn set_published(&mut self, published: bool) {
        self.is_published = published;
    }
}

/// Listing options for content; drafts require the admin role.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ContentListingFilter {
    #[serde(default)]
    pub include_drafts: bool,
}

/// Serialized content shape for both the public site and the console.
#[derive(Debug, Clone, Serialize)]
pub struct ContentView {
    pub content_id: ContentId,
    pub kind: &'static str,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}
