// Ports for the users module: persistence plus the external people-lookup
// service. Adapters implement these; the service only sees the traits.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::users::core::model::{Passport, PersonInfo, User, UserFilter, UserPage, UserPatch};

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("person not found for passport")]
    NotFound,

    #[error("lookup service error: {0}")]
    Backend(String),
}

/// Fields persisted for a new user; the store generates the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub passport: String,
    pub name: String,
    pub surname: String,
    pub patronymic: Option<String>,
    pub address: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError>;

    /// Filtered page of users. `limit = 0` means no limit; an absent limit
    /// on the wire decodes to zero.
    async fn find(
        &self,
        filter: &UserFilter,
        limit: u64,
        offset: u64,
    ) -> Result<UserPage, UserStoreError>;

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), UserStoreError>;

    async fn delete(&self, id: Uuid) -> Result<(), UserStoreError>;
}

#[async_trait]
pub trait PeopleLookup: Send + Sync {
    async fn lookup(&self, passport: &Passport) -> Result<PersonInfo, LookupError>;
}
