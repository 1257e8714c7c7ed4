use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::models::property::{Property, PropertyCreate};
use crate::models::reservation::{Reservation, ReservationCreate};
use crate::models::user::{User, UserCreate};

/// Isolated `CatalogStore` for tests. Mirrors the Postgres schema rules that
/// handlers rely on: ascending ids, unique emails and cascading deletes.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    properties: BTreeMap<i64, Property>,
    reservations: BTreeMap<i64, Reservation>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Whether a user other than `except` already holds `email`.
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        let holder = self.users.values().find(|u| u.email == email);
        holder.is_some_and(|u| Some(u.id) != except)
    }
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a property under a fixed id, for tests that need known ids.
    pub async fn put_property(&self, property: Property) {
        let mut tables = self.inner.write().await;
        tables.next_id = tables.next_id.max(property.id);
        tables.properties.insert(property.id, property);
    }

    /// Inserts a user under a fixed id, for tests that need known ids.
    pub async fn put_user(&self, user: User) {
        let mut tables = self.inner.write().await;
        tables.next_id = tables.next_id.max(user.id);
        tables.users.insert(user.id, user);
    }
}

fn duplicate_email(email: &str) -> AppError {
    let message = format!("unique constraint violated for email {email}");
    AppError::Internal(anyhow::anyhow!(message))
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().cloned().collect())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &UserCreate) -> Result<User, AppError> {
        let mut tables = self.inner.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }
        let created = User {
            id: tables.allocate_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            interests: user.interests(),
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut tables = self.inner.write().await;
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(duplicate_email(&user.email));
        }
        let Some(existing) = tables.users.get_mut(&user.id) else {
            return Ok(None);
        };
        *existing = user.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        let removed = tables.users.remove(&id).is_some();
        if removed {
            tables.reservations.retain(|_, r| r.user_id != id);
        }
        Ok(removed)
    }

    async fn list_properties(&self) -> Result<Vec<Property>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.properties.values().cloned().collect())
    }

    async fn get_property(&self, id: i64) -> Result<Option<Property>, AppError> {
        Ok(self.inner.read().await.properties.get(&id).cloned())
    }

    async fn insert_property(&self, property: &PropertyCreate) -> Result<Property, AppError> {
        let mut tables = self.inner.write().await;
        let created = Property {
            id: tables.allocate_id(),
            name: property.name.clone(),
            address_line1: property.address_line1.clone(),
            address_line2: property.address_line2.clone(),
            city: property.city.clone(),
            state: property.state.clone(),
            zip_code: property.zip_code.clone(),
            country: property.country().to_string(),
            price_per_night: property.price_per_night,
            amenities: property.amenities(),
        };
        tables.properties.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_property(&self, property: &Property) -> Result<Option<Property>, AppError> {
        let mut tables = self.inner.write().await;
        let Some(existing) = tables.properties.get_mut(&property.id) else {
            return Ok(None);
        };
        *existing = property.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_property(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        let removed = tables.properties.remove(&id).is_some();
        if removed {
            tables.reservations.retain(|_, r| r.property_id != id);
        }
        Ok(removed)
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables.reservations.values().cloned().collect())
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, AppError> {
        Ok(self.inner.read().await.reservations.get(&id).cloned())
    }

    async fn insert_reservation(
        &self,
        reservation: &ReservationCreate,
        reservation_date: NaiveDate,
    ) -> Result<Reservation, AppError> {
        let mut tables = self.inner.write().await;
        let created = Reservation {
            id: tables.allocate_id(),
            user_id: reservation.user_id,
            property_id: reservation.property_id,
            check_in_date: reservation.check_in_date,
            check_out_date: reservation.check_out_date,
            reservation_date,
        };
        tables.reservations.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Option<Reservation>, AppError> {
        let mut tables = self.inner.write().await;
        let Some(existing) = tables.reservations.get_mut(&reservation.id) else {
            return Ok(None);
        };
        *existing = reservation.clone();
        Ok(Some(existing.clone()))
    }

    async fn delete_reservation(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        Ok(tables.reservations.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn add_user(store: &InMemoryCatalogStore, email: &str) -> Result<User, AppError> {
        let body = UserCreate {
            name: "Alice".to_string(),
            email: email.to_string(),
            interests: Some(vec![" hiking ".to_string()]),
        };
        store.insert_user(&body).await
    }

    #[tokio::test]
    async fn test_insert_assigns_ascending_ids() {
        let store = InMemoryCatalogStore::new();
        let a = add_user(&store, "a@example.com").await.unwrap();
        let b = add_user(&store, "b@example.com").await.unwrap();
        assert!(a.id < b.id);
        assert_eq!(a.interests, vec!["hiking"]);

        let users = store.list_users().await.unwrap();
        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = InMemoryCatalogStore::new();
        add_user(&store, "a@example.com").await.unwrap();
        assert!(add_user(&store, "a@example.com").await.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_row_is_none() {
        let store = InMemoryCatalogStore::new();
        let mut user = add_user(&store, "a@example.com").await.unwrap();
        user.id += 100;
        assert!(store.update_user(&user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_cascades_reservations() {
        let store = InMemoryCatalogStore::new();
        let user = add_user(&store, "a@example.com").await.unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let body = ReservationCreate {
            user_id: user.id,
            property_id: 99,
            check_in_date: date,
            check_out_date: date.succ_opt().unwrap(),
        };
        let reservation = store.insert_reservation(&body, date).await.unwrap();

        assert!(store.delete_user(user.id).await.unwrap());
        let remaining = store.get_reservation(reservation.id).await.unwrap();
        assert!(remaining.is_none());
        assert!(!store.delete_user(user.id).await.unwrap());
    }
}
