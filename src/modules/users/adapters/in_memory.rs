// In memory implementations of the users ports for tests and local
// development.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::modules::users::core::model::{
    Passport, PersonInfo, User, UserFilter, UserPage, UserPatch,
};
use crate::modules::users::ports::{
    LookupError, NewUser, PeopleLookup, UserStore, UserStoreError,
};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: Mutex<Vec<User>>,
    offline: bool,
}

fn matches_substring(field: &str, wanted: &Option<String>) -> bool {
    match wanted {
        Some(needle) => field.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.offline = !self.offline;
    }

    fn check_online(&self) -> Result<(), UserStoreError> {
        if self.offline {
            return Err(UserStoreError::Backend("user store offline".into()));
        }
        Ok(())
    }

    fn matches(user: &User, filter: &UserFilter) -> bool {
        if let Some(id) = filter.id
            && user.id != id
        {
            return false;
        }
        let patronymic_matches = match (&filter.patronymic, &user.patronymic) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(needle), Some(field)) => matches_substring(field, &Some(needle.clone())),
        };
        matches_substring(&user.passport, &filter.passport)
            && matches_substring(&user.name, &filter.name)
            && matches_substring(&user.surname, &filter.surname)
            && matches_substring(&user.address, &filter.address)
            && patronymic_matches
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, UserStoreError> {
        self.check_online()?;
        let user = User {
            id: Uuid::now_v7(),
            passport: user.passport,
            name: user.name,
            surname: user.surname,
            patronymic: user.patronymic,
            address: user.address,
        };
        self.users.lock().await.push(user.clone());
        Ok(user)
    }

    async fn find(
        &self,
        filter: &UserFilter,
        limit: u64,
        offset: u64,
    ) -> Result<UserPage, UserStoreError> {
        self.check_online()?;
        let g = self.users.lock().await;
        let matched: Vec<&User> = g.iter().filter(|u| Self::matches(u, filter)).collect();
        let total = matched.len() as i64;
        let limit = if limit == 0 { usize::MAX } else { limit as usize };
        let users = matched
            .into_iter()
            .skip(offset as usize)
            .take(limit)
            .cloned()
            .collect();
        Ok(UserPage { users, total })
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), UserStoreError> {
        self.check_online()?;
        let mut g = self.users.lock().await;
        if let Some(user) = g.iter_mut().find(|u| u.id == id) {
            if let Some(passport) = &patch.passport {
                user.passport = passport.clone();
            }
            if let Some(name) = &patch.name {
                user.name = name.clone();
            }
            if let Some(surname) = &patch.surname {
                user.surname = surname.clone();
            }
            if let Some(patronymic) = &patch.patronymic {
                user.patronymic = Some(patronymic.clone());
            }
            if let Some(address) = &patch.address {
                user.address = address.clone();
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), UserStoreError> {
        self.check_online()?;
        self.users.lock().await.retain(|u| u.id != id);
        Ok(())
    }
}

/// Canned people-lookup for tests: always answers with the same person, or
/// always fails. Counts calls so tests can assert the boundary validation
/// short-circuits.
pub struct StubPeopleLookup {
    person: Option<PersonInfo>,
    calls: Arc<AtomicUsize>,
}

impl StubPeopleLookup {
    pub fn returning(person: PersonInfo) -> Self {
        Self {
            person: Some(person),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            person: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl PeopleLookup for StubPeopleLookup {
    async fn lookup(&self, _passport: &Passport) -> Result<PersonInfo, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.person
            .clone()
            .ok_or_else(|| LookupError::Backend("lookup service offline".into()))
    }
}
