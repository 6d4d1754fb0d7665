// User service: passport-keyed creation with external enrichment, plus the
// conventional filter/update/delete flows.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::modules::users::core::model::{
    Passport, PassportError, User, UserFilter, UserPage, UserPatch,
};
use crate::modules::users::ports::{LookupError, NewUser, PeopleLookup, UserStore, UserStoreError};

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    InvalidPassport(#[from] PassportError),

    #[error("user already exists")]
    AlreadyExists,

    #[error("nothing to change")]
    EmptyPatch,

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Store(#[from] UserStoreError),
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    people: Arc<dyn PeopleLookup>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, people: Arc<dyn PeopleLookup>) -> Self {
        Self { store, people }
    }

    /// Register a user by passport number: validate the format, refuse a
    /// duplicate, then enrich the record from the people-lookup service.
    pub async fn create_user(&self, passport_number: &str) -> Result<User, UserError> {
        let passport = Passport::parse(passport_number)?;
        let canonical = passport.to_string();

        let filter = UserFilter {
            passport: Some(canonical.clone()),
            ..UserFilter::default()
        };
        let existing = self.store.find(&filter, 1, 0).await?;
        if !existing.users.is_empty() {
            return Err(UserError::AlreadyExists);
        }

        debug!(passport = %canonical, "enriching new user");
        let info = self.people.lookup(&passport).await?;
        let user = self
            .store
            .create(NewUser {
                passport: canonical,
                name: info.name,
                surname: info.surname,
                patronymic: info.patronymic,
                address: info.address,
            })
            .await?;
        Ok(user)
    }

    pub async fn get_users(
        &self,
        filter: &UserFilter,
        limit: u64,
        offset: u64,
    ) -> Result<UserPage, UserError> {
        Ok(self.store.find(filter, limit, offset).await?)
    }

    pub async fn change_user(&self, id: Uuid, patch: &UserPatch) -> Result<(), UserError> {
        if patch.is_empty() {
            return Err(UserError::EmptyPatch);
        }
        if let Some(passport) = &patch.passport {
            Passport::parse(passport)?;
        }
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<(), UserError> {
        Ok(self.store.delete(id).await?)
    }
}
