//! In-process store
//!
//! A [`UnitOfWork`] backed by plain collections behind an async mutex. A
//! transaction holds the mutex for its whole lifetime, so transactions run
//! one at a time. Reads see the committed state directly; the first write
//! copies it and later calls work on the copy. Commit publishes the copy,
//! dropping or rolling back discards it.
//!
//! Selected with `database.backend = "memory"` for tests and local
//! development. It keeps nothing across restarts and serializes every
//! request, so production deployments use PostgreSQL.

mod repositories;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    Category, CategoryRepository, ChatRoom, ChatRoomParticipant, ChatRoomParticipantRepository,
    ChatRoomRepository, Follower, Host, HostFollowStatus, HostRepository, SocialProfile, Terms,
    TermsAgreement, TermsRepository, User, UserRepository,
};
use crate::infrastructure::database::{TransactionContext, UnitOfWork};
use crate::shared::error::AppError;

use repositories::MemoryRepository;

/// Every table of the schema as ordered maps keyed like their primary keys.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    users: BTreeMap<i64, User>,
    /// (provider, social_id) -> (user_id, profile)
    social_accounts: BTreeMap<(String, String), (i64, SocialProfile)>,
    terms: BTreeMap<i64, Terms>,
    /// (user_id, terms_id)
    terms_agreements: BTreeMap<(i64, i64), TermsAgreement>,
    categories: BTreeMap<String, Category>,
    chat_rooms: BTreeMap<i64, ChatRoom>,
    participants: BTreeMap<i64, ChatRoomParticipant>,
    hosts: BTreeMap<i64, Host>,
    followers: BTreeMap<i64, Follower>,
    follow_statuses: BTreeMap<i64, HostFollowStatus>,
}

impl MemoryState {
    /// State with the same seed rows the SQL migration inserts.
    pub fn seeded() -> Self {
        let mut state = Self::default();

        for (code, name, order) in [
            ("MOVIE", "Movie", 1),
            ("MUSIC", "Music", 2),
            ("GAME", "Game", 3),
            ("SPORTS", "Sports", 4),
            ("STUDY", "Study", 5),
            ("DAILY", "Daily Life", 6),
        ] {
            state
                .categories
                .insert(code.to_string(), Category::new(code, name, order));
        }

        for (id, code, title, required) in [
            (1, "SERVICE", "Terms of Service", true),
            (2, "PRIVACY", "Privacy Policy", true),
            (3, "MARKETING", "Marketing Notifications", false),
        ] {
            state.terms.insert(
                id,
                Terms {
                    id,
                    code: code.to_string(),
                    title: title.to_string(),
                    required,
                },
            );
        }

        state
    }
}

/// Unit of work over a shared [`MemoryState`].
#[derive(Clone)]
pub struct MemoryUnitOfWork {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryUnitOfWork {
    /// Store seeded with the default categories and terms.
    pub fn new() -> Self {
        Self::with_state(MemoryState::seeded())
    }

    pub fn with_state(state: MemoryState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }
}

impl Default for MemoryUnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn TransactionContext>, AppError> {
        let guard = self.state.clone().lock_owned().await;
        Ok(Box::new(MemoryTransactionContext {
            guard,
            working: None,
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Open transaction on the in-process store.
pub struct MemoryTransactionContext {
    guard: OwnedMutexGuard<MemoryState>,
    /// Copy taken on the first write
    working: Option<MemoryState>,
}

impl MemoryTransactionContext {
    fn repository(&mut self) -> MemoryRepository<'_> {
        MemoryRepository::new(&*self.guard, &mut self.working)
    }
}

#[async_trait]
impl TransactionContext for MemoryTransactionContext {
    fn users(&mut self) -> Box<dyn UserRepository + '_> {
        Box::new(self.repository())
    }

    fn categories(&mut self) -> Box<dyn CategoryRepository + '_> {
        Box::new(self.repository())
    }

    fn terms(&mut self) -> Box<dyn TermsRepository + '_> {
        Box::new(self.repository())
    }

    fn chat_rooms(&mut self) -> Box<dyn ChatRoomRepository + '_> {
        Box::new(self.repository())
    }

    fn participants(&mut self) -> Box<dyn ChatRoomParticipantRepository + '_> {
        Box::new(self.repository())
    }

    fn hosts(&mut self) -> Box<dyn HostRepository + '_> {
        Box::new(self.repository())
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryTransactionContext { mut guard, working } = *self;
        if let Some(working) = working {
            *guard = working;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        Ok(())
    }
}
