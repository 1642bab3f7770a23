use crate::service::PostService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    pub fn new(service: PostService) -> Self {
        AppState {
            posts: Arc::new(service),
        }
    }
}
