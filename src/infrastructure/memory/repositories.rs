//! Repository traits over a transaction's view of [`MemoryState`].
//!
//! Reads go to the committed state until the transaction first writes; the
//! first write takes a private copy that every later call sees.
//!
//! Constraint checks mirror the SQL schema: unique keys, foreign keys and the
//! occupancy CHECK produce the same `AppError` variants as the PostgreSQL
//! repositories.

use async_trait::async_trait;

use super::MemoryState;
use crate::domain::{
    Category, CategoryRepository, ChatRoom, ChatRoomFilter, ChatRoomListing, ChatRoomOrder,
    ChatRoomParticipant, ChatRoomParticipantRepository, ChatRoomRepository, Follower, Host,
    HostFollowStatus, HostRepository, SocialProfile, Terms, TermsAgreement, TermsRepository, User,
    UserRepository,
};
use crate::shared::error::AppError;

pub(super) struct MemoryRepository<'a> {
    committed: &'a MemoryState,
    working: &'a mut Option<MemoryState>,
}

impl<'a> MemoryRepository<'a> {
    pub(super) fn new(committed: &'a MemoryState, working: &'a mut Option<MemoryState>) -> Self {
        Self { committed, working }
    }

    fn state(&self) -> &MemoryState {
        self.working.as_ref().unwrap_or(self.committed)
    }

    fn state_mut(&mut self) -> &mut MemoryState {
        let committed = self.committed;
        self.working.get_or_insert_with(|| committed.clone())
    }

    fn room_mut(&mut self, id: i64) -> Result<&mut ChatRoom, AppError> {
        self.state_mut()
            .chat_rooms
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Chat room {} not found", id)))
    }

    fn is_participant(&self, user_id: i64, chat_room_id: i64) -> bool {
        self.state()
            .participants
            .values()
            .any(|p| p.user_id == user_id && p.chat_room_id == chat_room_id)
    }

    fn follow_status_with_users(&self, status: &HostFollowStatus) -> HostFollowStatus {
        let mut status = status.clone();
        if let Some(host) = self.state().hosts.get(&status.host_id) {
            status.host_user_id = host.user_id;
        }
        if let Some(follower) = self.state().followers.get(&status.follower_id) {
            status.follower_user_id = follower.user_id;
        }
        status
    }

    fn sorted_statuses<F>(&self, predicate: F) -> Vec<HostFollowStatus>
    where
        F: Fn(&HostFollowStatus) -> bool,
    {
        let mut statuses: Vec<HostFollowStatus> = self
            .state()
            .follow_statuses
            .values()
            .map(|s| self.follow_status_with_users(s))
            .filter(|s| predicate(s))
            .collect();
        statuses.sort_by(|a, b| b.followed_at.cmp(&a.followed_at).then(b.id.cmp(&a.id)));
        statuses
    }
}

#[async_trait]
impl UserRepository for MemoryRepository<'_> {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.state().users.get(&id).cloned())
    }

    async fn find_by_email(&mut self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.state().users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_nickname(&mut self, nickname: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|u| u.nickname == nickname)
            .cloned())
    }

    async fn find_by_refresh_token_hash(&mut self, hash: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|u| u.refresh_token_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn create(&mut self, user: &User) -> Result<User, AppError> {
        let taken = self.state().users.values().any(|u| {
            u.id == user.id || u.email == user.email || u.nickname == user.nickname
        });
        if taken {
            return Err(AppError::Conflict(
                "Email or nickname already in use".to_string(),
            ));
        }

        self.state_mut().users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn update_refresh_token_hash(
        &mut self,
        id: i64,
        hash: Option<&str>,
    ) -> Result<(), AppError> {
        let user = self
            .state_mut()
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        user.refresh_token_hash = hash.map(str::to_string);
        Ok(())
    }

    async fn link_social_profile(
        &mut self,
        user_id: i64,
        profile: &SocialProfile,
    ) -> Result<(), AppError> {
        if !self.state().users.contains_key(&user_id) {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        let key = (profile.provider.clone(), profile.social_id.clone());
        if self.state().social_accounts.contains_key(&key) {
            return Err(AppError::Conflict("Social account already linked".to_string()));
        }

        self.state_mut()
            .social_accounts
            .insert(key, (user_id, profile.clone()));
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MemoryRepository<'_> {
    async fn find_by_code(&mut self, code: &str) -> Result<Option<Category>, AppError> {
        Ok(self.state().categories.get(code).cloned())
    }

    async fn find_all(&mut self) -> Result<Vec<Category>, AppError> {
        let mut categories: Vec<Category> = self.state().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.order_num.cmp(&b.order_num).then(a.code.cmp(&b.code)));
        Ok(categories)
    }
}

#[async_trait]
impl TermsRepository for MemoryRepository<'_> {
    async fn find_all(&mut self) -> Result<Vec<Terms>, AppError> {
        Ok(self.state().terms.values().cloned().collect())
    }

    async fn save_agreements(&mut self, agreements: &[TermsAgreement]) -> Result<(), AppError> {
        for agreement in agreements {
            if !self.state().terms.contains_key(&agreement.terms_id) {
                return Err(AppError::NotFound(format!(
                    "Terms {} not found",
                    agreement.terms_id
                )));
            }
            self.state_mut()
                .terms_agreements
                .insert((agreement.user_id, agreement.terms_id), agreement.clone());
        }
        Ok(())
    }

    async fn find_agreements_by_user(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<TermsAgreement>, AppError> {
        Ok(self
            .state()
            .terms_agreements
            .range((user_id, i64::MIN)..=(user_id, i64::MAX))
            .map(|(_, a)| a.clone())
            .collect())
    }
}

#[async_trait]
impl ChatRoomRepository for MemoryRepository<'_> {
    async fn find_by_id(&mut self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        Ok(self.state().chat_rooms.get(&id).cloned())
    }

    async fn find_by_id_for_update(&mut self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        // Transactions already hold the store mutex
        ChatRoomRepository::find_by_id(self, id).await
    }

    async fn save(&mut self, room: &ChatRoom) -> Result<ChatRoom, AppError> {
        if !self.state().categories.contains_key(&room.category_code)
            || !self.state().users.contains_key(&room.room_manager_user_id)
        {
            return Err(AppError::NotFound(format!(
                "Category or user for chat room {} not found",
                room.id
            )));
        }
        if room.current_user_count < 0 || room.current_user_count > room.max_user_count {
            return Err(AppError::BadRequest(
                "Chat room occupancy out of range".to_string(),
            ));
        }
        if self.state().chat_rooms.contains_key(&room.id) {
            return Err(AppError::Conflict(format!("Chat room {} already exists", room.id)));
        }

        self.state_mut().chat_rooms.insert(room.id, room.clone());
        Ok(room.clone())
    }

    async fn increment_occupancy(&mut self, id: i64) -> Result<i32, AppError> {
        let room = self.room_mut(id)?;
        if room.current_user_count >= room.max_user_count {
            return Err(AppError::CapacityExceeded(id));
        }
        room.current_user_count += 1;
        Ok(room.current_user_count)
    }

    async fn decrement_occupancy(&mut self, id: i64) -> Result<i32, AppError> {
        let room = self.room_mut(id)?;
        if room.current_user_count <= 0 {
            return Err(AppError::InvariantViolation(format!(
                "Occupancy of chat room {} would drop below zero",
                id
            )));
        }
        room.current_user_count -= 1;
        Ok(room.current_user_count)
    }

    async fn search(
        &mut self,
        filter: &ChatRoomFilter,
        requester_user_id: i64,
    ) -> Result<Vec<ChatRoomListing>, AppError> {
        let mut rooms: Vec<&ChatRoom> = self
            .state()
            .chat_rooms
            .values()
            .filter(|room| filter.matches(room))
            .collect();

        match filter.order {
            ChatRoomOrder::Latest => rooms.sort_by(|a, b| b.id.cmp(&a.id)),
            ChatRoomOrder::Popularity => rooms.sort_by(|a, b| {
                b.current_user_count
                    .cmp(&a.current_user_count)
                    .then(a.id.cmp(&b.id))
            }),
        }

        let offset = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let listings = rooms
            .into_iter()
            .skip(offset)
            .take(filter.size as usize)
            .filter_map(|room| {
                let category = self.state().categories.get(&room.category_code)?.clone();
                Some(ChatRoomListing {
                    room: room.clone(),
                    category,
                    joined: self.is_participant(requester_user_id, room.id),
                })
            })
            .collect();

        Ok(listings)
    }
}

#[async_trait]
impl ChatRoomParticipantRepository for MemoryRepository<'_> {
    async fn save(
        &mut self,
        participant: &ChatRoomParticipant,
    ) -> Result<ChatRoomParticipant, AppError> {
        if !self.state().chat_rooms.contains_key(&participant.chat_room_id)
            || !self.state().users.contains_key(&participant.user_id)
        {
            return Err(AppError::NotFound(format!(
                "Chat room {} or user {} not found",
                participant.chat_room_id, participant.user_id
            )));
        }
        if self.is_participant(participant.user_id, participant.chat_room_id) {
            return Err(AppError::DuplicateMembership {
                user_id: participant.user_id,
                chat_room_id: participant.chat_room_id,
            });
        }

        self.state_mut()
            .participants
            .insert(participant.id, participant.clone());
        Ok(participant.clone())
    }

    async fn delete_by_user_and_room(
        &mut self,
        user_id: i64,
        chat_room_id: i64,
    ) -> Result<(), AppError> {
        let id = self
            .state()
            .participants
            .values()
            .find(|p| p.user_id == user_id && p.chat_room_id == chat_room_id)
            .map(|p| p.id)
            .ok_or(AppError::NotMember {
                user_id,
                chat_room_id,
            })?;

        self.state_mut().participants.remove(&id);
        Ok(())
    }

    async fn count_by_room(&mut self, chat_room_id: i64) -> Result<i64, AppError> {
        let count = self
            .state()
            .participants
            .values()
            .filter(|p| p.chat_room_id == chat_room_id)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl HostRepository for MemoryRepository<'_> {
    async fn save_host(&mut self, host: &Host) -> Result<Host, AppError> {
        if self.state().hosts.values().any(|h| h.user_id == host.user_id) {
            return Err(AppError::Conflict(format!(
                "User {} already has a host",
                host.user_id
            )));
        }
        self.state_mut().hosts.insert(host.id, host.clone());
        Ok(host.clone())
    }

    async fn save_follower(&mut self, follower: &Follower) -> Result<Follower, AppError> {
        if self
            .state()
            .followers
            .values()
            .any(|f| f.user_id == follower.user_id)
        {
            return Err(AppError::Conflict(format!(
                "User {} already has a follower",
                follower.user_id
            )));
        }
        self.state_mut().followers.insert(follower.id, follower.clone());
        Ok(follower.clone())
    }

    async fn find_host_by_id(&mut self, host_id: i64) -> Result<Option<Host>, AppError> {
        Ok(self.state().hosts.get(&host_id).cloned())
    }

    async fn find_host_by_user_id(&mut self, user_id: i64) -> Result<Option<Host>, AppError> {
        Ok(self
            .state()
            .hosts
            .values()
            .find(|h| h.user_id == user_id)
            .cloned())
    }

    async fn find_follower_by_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Option<Follower>, AppError> {
        Ok(self
            .state()
            .followers
            .values()
            .find(|f| f.user_id == user_id)
            .cloned())
    }

    async fn save_follow_status(
        &mut self,
        status: &HostFollowStatus,
    ) -> Result<HostFollowStatus, AppError> {
        if !self.state().hosts.contains_key(&status.host_id)
            || !self.state().followers.contains_key(&status.follower_id)
        {
            return Err(AppError::NotFound(format!(
                "Host {} or follower {} not found",
                status.host_id, status.follower_id
            )));
        }
        if self
            .state()
            .follow_statuses
            .values()
            .any(|s| s.host_id == status.host_id && s.follower_id == status.follower_id)
        {
            return Err(AppError::Conflict(format!(
                "Already following host {}",
                status.host_id
            )));
        }

        let status = self.follow_status_with_users(status);
        self.state_mut().follow_statuses.insert(status.id, status.clone());
        Ok(status)
    }

    async fn delete_follow_status(
        &mut self,
        host_id: i64,
        follower_id: i64,
    ) -> Result<bool, AppError> {
        let id = self
            .state()
            .follow_statuses
            .values()
            .find(|s| s.host_id == host_id && s.follower_id == follower_id)
            .map(|s| s.id);

        Ok(match id {
            Some(id) => self.state_mut().follow_statuses.remove(&id).is_some(),
            None => false,
        })
    }

    async fn exists_by_host_id_and_follower_user_id(
        &mut self,
        host_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let follower_id = match self.state().followers.values().find(|f| f.user_id == user_id) {
            Some(follower) => follower.id,
            None => return Ok(false),
        };
        Ok(self
            .state()
            .follow_statuses
            .values()
            .any(|s| s.host_id == host_id && s.follower_id == follower_id))
    }

    async fn find_by_follower_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<HostFollowStatus>, AppError> {
        Ok(self.sorted_statuses(|s| s.follower_user_id == user_id))
    }

    async fn find_by_host_user_id(
        &mut self,
        user_id: i64,
    ) -> Result<Vec<HostFollowStatus>, AppError> {
        Ok(self.sorted_statuses(|s| s.host_user_id == user_id))
    }
}
