//! Catalog Store: persistence for users, properties and reservations.
//!
//! Handlers and the recommendation pipeline only see `CatalogStore`. It is
//! constructed once at startup and carried in `AppState` as
//! `Arc<dyn CatalogStore>`, so tests can hand in an isolated store.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::property::{Property, PropertyCreate};
use crate::models::reservation::{Reservation, ReservationCreate};
use crate::models::user::{User, UserCreate};

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod tags;

/// Read/write access to the booking catalog.
///
/// List operations return records in ascending id order. `update_*` returns
/// `None` when the record no longer exists; `delete_*` reports whether a record
/// was removed. Deleting a user or property also deletes its reservations.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn insert_user(&self, user: &UserCreate) -> Result<User, AppError>;
    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError>;
    async fn delete_user(&self, id: i64) -> Result<bool, AppError>;

    async fn list_properties(&self) -> Result<Vec<Property>, AppError>;
    async fn get_property(&self, id: i64) -> Result<Option<Property>, AppError>;
    async fn insert_property(&self, property: &PropertyCreate) -> Result<Property, AppError>;
    async fn update_property(&self, property: &Property) -> Result<Option<Property>, AppError>;
    async fn delete_property(&self, id: i64) -> Result<bool, AppError>;

    async fn list_reservations(&self) -> Result<Vec<Reservation>, AppError>;
    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, AppError>;
    async fn insert_reservation(
        &self,
        reservation: &ReservationCreate,
        reservation_date: NaiveDate,
    ) -> Result<Reservation, AppError>;
    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Option<Reservation>, AppError>;
    async fn delete_reservation(&self, id: i64) -> Result<bool, AppError>;
}
