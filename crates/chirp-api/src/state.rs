//! Shared application state for the HTTP API.
//!
//! [`AppState`] holds one handle per service. All handles are cheap
//! clones over `Arc`'d stores; the state itself is cloned into every
//! handler by Axum. Which store realization backs the services is
//! decided once, at construction, and nothing downstream can tell the
//! difference.

use std::sync::Arc;

use chirp_core::store::{FollowStore, PostStore, UserDirectory};
use chirp_core::{FollowGraph, InMemoryFollowStore, InMemoryPostStore, Posts, TimelineAssembler};
use chirp_identity::store::UserStore;
use chirp_identity::{IdentityService, InMemoryUserStore, StoreDirectory, TokenService};

/// Service handles shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account registration, login, and token validation.
    pub identity: IdentityService,
    /// Read-only account lookup for response enrichment.
    pub directory: Arc<dyn UserDirectory>,
    /// Follow graph operations.
    pub graph: FollowGraph,
    /// Post operations.
    pub posts: Posts,
    /// Timeline assembly.
    pub timeline: TimelineAssembler,
}

impl AppState {
    /// Wire up the services over the given store realizations.
    pub fn new(
        user_store: Arc<dyn UserStore>,
        follow_store: Arc<dyn FollowStore>,
        post_store: Arc<dyn PostStore>,
        tokens: TokenService,
    ) -> Self {
        let directory: Arc<dyn UserDirectory> = Arc::new(StoreDirectory::new(user_store.clone()));
        let graph = FollowGraph::new(follow_store, directory.clone());
        let posts = Posts::new(post_store.clone(), directory.clone());
        let timeline = TimelineAssembler::new(graph.clone(), post_store, directory.clone());

        Self {
            identity: IdentityService::new(user_store, tokens),
            directory,
            graph,
            posts,
            timeline,
        }
    }

    /// State backed entirely by in-memory stores.
    ///
    /// Used by the `STORAGE=memory` server mode and by the API tests.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryFollowStore::new()),
            Arc::new(InMemoryPostStore::new()),
            TokenService::new(jwt_secret),
        )
    }
}
