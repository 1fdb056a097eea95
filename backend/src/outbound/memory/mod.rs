//! In-memory adapters backing the domain ports.
//!
//! Used when no database is configured (local development, handler tests).
//! All three repositories share one [`MemoryStore`] so ownership chains
//! behave exactly as they do against the relational schema.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::account::{CredentialRecord, NewAccount, Role};
use crate::domain::itinerary::{ItineraryBlock, ItineraryDay};
use crate::domain::ports::{
    ItineraryRepository, ItineraryRepositoryError, TripRepository, TripRepositoryError,
    UserRepository, UserRepositoryError,
};
use crate::domain::trip::Trip;

#[derive(Debug, Clone)]
struct StoredAccount {
    id: Uuid,
    email: String,
    phone: String,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<StoredAccount>,
    roles: HashMap<Uuid, Vec<Role>>,
    trips: HashMap<Uuid, Trip>,
    days: HashMap<Uuid, ItineraryDay>,
    blocks: HashMap<Uuid, ItineraryBlock>,
}

impl Inner {
    fn trip_owned_by(&self, trip_id: Uuid, user_id: Uuid) -> bool {
        self.trips
            .get(&trip_id)
            .is_some_and(|trip| trip.user_id == user_id)
    }

    fn day_owned_by(&self, day_id: Uuid, user_id: Uuid) -> Option<&ItineraryDay> {
        let day = self.days.get(&day_id)?;
        self.trip_owned_by(day.trip_id, user_id).then_some(day)
    }

    fn block_owned_by(&self, block_id: Uuid, user_id: Uuid) -> Option<&ItineraryBlock> {
        let block = self.blocks.get(&block_id)?;
        self.day_owned_by(block.itinerary_day_id, user_id)
            .map(|_| block)
    }
}

/// Shared backing store for the in-memory adapters.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Fresh, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&str) -> E) -> Result<MutexGuard<'_, Inner>, E> {
        self.inner
            .lock()
            .map_err(|_| poisoned("memory store mutex poisoned"))
    }
}

/// In-memory [`UserRepository`].
#[derive(Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    /// Adapter over a shared store.
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_with_role(
        &self,
        account: &NewAccount,
        role: Role,
    ) -> Result<(), UserRepositoryError> {
        let mut inner = self.store.lock(|message| UserRepositoryError::query(message))?;
        let duplicate = inner.accounts.iter().any(|existing| {
            existing.email == account.email.as_ref() || existing.phone == account.phone.as_ref()
        });
        if duplicate {
            return Err(UserRepositoryError::duplicate_identity(
                "email or phone already registered",
            ));
        }
        inner.accounts.push(StoredAccount {
            id: account.id,
            email: account.email.as_ref().to_owned(),
            phone: account.phone.as_ref().to_owned(),
            password_hash: account.password_hash.clone(),
        });
        inner.roles.insert(account.id, vec![role]);
        Ok(())
    }

    async fn find_credentials(
        &self,
        identifier: &str,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError> {
        let inner = self.store.lock(|message| UserRepositoryError::query(message))?;
        Ok(inner
            .accounts
            .iter()
            .find(|account| account.email == identifier || account.phone == identifier)
            .map(|account| CredentialRecord {
                user_id: account.id,
                email: account.email.clone(),
                password_hash: account.password_hash.clone(),
            }))
    }

    async fn roles_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, UserRepositoryError> {
        let inner = self.store.lock(|message| UserRepositoryError::query(message))?;
        Ok(inner.roles.get(&user_id).cloned().unwrap_or_default())
    }
}

/// In-memory [`TripRepository`].
#[derive(Clone)]
pub struct MemoryTripRepository {
    store: MemoryStore,
}

impl MemoryTripRepository {
    /// Adapter over a shared store.
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TripRepository for MemoryTripRepository {
    async fn insert(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut inner = self.store.lock(|message| TripRepositoryError::query(message))?;
        inner.trips.insert(trip.id, trip.clone());
        Ok(())
    }

    async fn list_for_owner(&self, user_id: Uuid) -> Result<Vec<Trip>, TripRepositoryError> {
        let inner = self.store.lock(|message| TripRepositoryError::query(message))?;
        let mut trips: Vec<Trip> = inner
            .trips
            .values()
            .filter(|trip| trip.user_id == user_id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(trips)
    }

    async fn find_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let inner = self.store.lock(|message| TripRepositoryError::query(message))?;
        Ok(inner
            .trips
            .get(&trip_id)
            .filter(|trip| trip.user_id == user_id)
            .cloned())
    }

    async fn update_for_owner(&self, trip: &Trip) -> Result<bool, TripRepositoryError> {
        let mut inner = self.store.lock(|message| TripRepositoryError::query(message))?;
        match inner.trips.get_mut(&trip.id) {
            Some(stored) if stored.user_id == trip.user_id => {
                *stored = trip.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, TripRepositoryError> {
        let mut inner = self.store.lock(|message| TripRepositoryError::query(message))?;
        if !inner.trip_owned_by(trip_id, user_id) {
            return Ok(false);
        }
        inner.trips.remove(&trip_id);
        let day_ids: Vec<Uuid> = inner
            .days
            .values()
            .filter(|day| day.trip_id == trip_id)
            .map(|day| day.id)
            .collect();
        inner.days.retain(|_, day| day.trip_id != trip_id);
        inner
            .blocks
            .retain(|_, block| !day_ids.contains(&block.itinerary_day_id));
        Ok(true)
    }
}

/// In-memory [`ItineraryRepository`].
#[derive(Clone)]
pub struct MemoryItineraryRepository {
    store: MemoryStore,
}

impl MemoryItineraryRepository {
    /// Adapter over a shared store.
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ItineraryRepository for MemoryItineraryRepository {
    async fn trip_exists_for_owner(
        &self,
        trip_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError> {
        let inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        Ok(inner.trip_owned_by(trip_id, user_id))
    }

    async fn insert_day(&self, day: &ItineraryDay) -> Result<(), ItineraryRepositoryError> {
        let mut inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        inner.days.insert(day.id, day.clone());
        Ok(())
    }

    async fn list_days_for_trip(
        &self,
        trip_id: Uuid,
    ) -> Result<Vec<ItineraryDay>, ItineraryRepositoryError> {
        let inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        let mut days: Vec<ItineraryDay> = inner
            .days
            .values()
            .filter(|day| day.trip_id == trip_id)
            .cloned()
            .collect();
        days.sort_by_key(|day| day.day_number);
        Ok(days)
    }

    async fn find_day_for_owner(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryDay>, ItineraryRepositoryError> {
        let inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        Ok(inner.day_owned_by(day_id, user_id).cloned())
    }

    async fn update_day(&self, day: &ItineraryDay) -> Result<bool, ItineraryRepositoryError> {
        let mut inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        match inner.days.get_mut(&day.id) {
            Some(stored) if stored.trip_id == day.trip_id => {
                *stored = day.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_day_for_owner(
        &self,
        day_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        if inner.day_owned_by(day_id, user_id).is_none() {
            return Ok(false);
        }
        inner.days.remove(&day_id);
        inner
            .blocks
            .retain(|_, block| block.itinerary_day_id != day_id);
        Ok(true)
    }

    async fn insert_block(&self, block: &ItineraryBlock) -> Result<(), ItineraryRepositoryError> {
        let mut inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        inner.blocks.insert(block.id, block.clone());
        Ok(())
    }

    async fn list_blocks_for_day(
        &self,
        day_id: Uuid,
    ) -> Result<Vec<ItineraryBlock>, ItineraryRepositoryError> {
        let inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        let mut blocks: Vec<ItineraryBlock> = inner
            .blocks
            .values()
            .filter(|block| block.itinerary_day_id == day_id)
            .cloned()
            .collect();
        blocks.sort_by_key(|block| block.start_time);
        Ok(blocks)
    }

    async fn find_block_for_owner(
        &self,
        block_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ItineraryBlock>, ItineraryRepositoryError> {
        let inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        Ok(inner.block_owned_by(block_id, user_id).cloned())
    }

    async fn update_block(
        &self,
        block: &ItineraryBlock,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        match inner.blocks.get_mut(&block.id) {
            Some(stored) if stored.itinerary_day_id == block.itinerary_day_id => {
                *stored = block.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_block_for_owner(
        &self,
        block_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, ItineraryRepositoryError> {
        let mut inner = self.store.lock(|message| ItineraryRepositoryError::query(message))?;
        if inner.block_owned_by(block_id, user_id).is_none() {
            return Ok(false);
        }
        inner.blocks.remove(&block_id);
        Ok(true)
    }
}
