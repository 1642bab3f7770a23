use crate::clock::Clock;
use crate::models::{NewPost, Post};
use crate::store::{PostStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Invalid post payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
}

/// What `create` does with a body that is not a valid post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadPolicy {
    /// Store a post with empty title, content and author.
    #[default]
    Lenient,
    Strict,
}

pub struct PostService {
    store: PostStore,
    clock: Arc<dyn Clock>,
    payloads: PayloadPolicy,
}

impl PostService {
    pub fn new(store: PostStore, clock: Arc<dyn Clock>) -> Self {
        PostService {
            store,
            clock,
            payloads: PayloadPolicy::default(),
        }
    }

    pub fn with_payload_policy(mut self, policy: PayloadPolicy) -> Self {
        self.payloads = policy;
        self
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Returns every post after counting this listing as a view of each one.
    /// Listing is never read-only: the bumped counters are saved before the
    /// posts are returned.
    pub fn enumerate(&self) -> Result<Vec<Post>, ServiceError> {
        let today = self.clock.today();

        let txn = self.store.begin();
        let mut posts = txn.load()?;
        for post in posts.iter_mut() {
            post.record_view(&today);
        }
        txn.save(&posts)?;

        Ok(posts)
    }

    /// Appends a post built from `payload` and returns it as stored.
    pub fn create(&self, payload: &[u8]) -> Result<Post, ServiceError> {
        let new_post = match serde_json::from_slice::<NewPost>(payload) {
            Ok(new_post) => new_post,
            Err(e) => match self.payloads {
                PayloadPolicy::Lenient => {
                    warn!(error = %e, "unparseable post payload, storing an empty post");
                    NewPost::default()
                }
                PayloadPolicy::Strict => return Err(ServiceError::InvalidPayload(e)),
            },
        };

        let post = Post::from_new(new_post, &self.clock.today());

        let txn = self.store.begin();
        let mut posts = txn.load()?;
        posts.push(post.clone());
        txn.save(&posts)?;

        info!(title = %post.title, total = posts.len(), "post created");
        Ok(post)
    }
}
