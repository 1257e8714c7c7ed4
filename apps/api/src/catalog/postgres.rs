use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use crate::catalog::tags::join_tags;
use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::models::property::{Property, PropertyCreate, PropertyRow};
use crate::models::reservation::{Reservation, ReservationCreate};
use crate::models::user::{User, UserCreate, UserRow};

/// `CatalogStore` backed by PostgreSQL. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: &UserCreate) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (name, email, interests) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(join_tags(&user.interests()))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted user {}", row.id);
        Ok(row.into())
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "UPDATE users SET name = $1, email = $2, interests = $3 WHERE id = $4 RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(join_tags(&user.interests))
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_properties(&self) -> Result<Vec<Property>, AppError> {
        let rows = sqlx::query_as::<_, PropertyRow>("SELECT * FROM properties ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Property::from).collect())
    }

    async fn get_property(&self, id: i64) -> Result<Option<Property>, AppError> {
        let row = sqlx::query_as::<_, PropertyRow>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Property::from))
    }

    async fn insert_property(&self, property: &PropertyCreate) -> Result<Property, AppError> {
        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            INSERT INTO properties
                (name, address_line1, address_line2, city, state,
                 zip_code, country, price_per_night, amenities)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&property.name)
        .bind(&property.address_line1)
        .bind(&property.address_line2)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.zip_code)
        .bind(property.country())
        .bind(property.price_per_night)
        .bind(join_tags(&property.amenities()))
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted property {}", row.id);
        Ok(row.into())
    }

    async fn update_property(&self, property: &Property) -> Result<Option<Property>, AppError> {
        let row = sqlx::query_as::<_, PropertyRow>(
            r#"
            UPDATE properties
            SET name = $1, address_line1 = $2, address_line2 = $3, city = $4, state = $5,
                zip_code = $6, country = $7, price_per_night = $8, amenities = $9
            WHERE id = $10
            RETURNING *
            "#,
        )
        .bind(&property.name)
        .bind(&property.address_line1)
        .bind(&property.address_line2)
        .bind(&property.city)
        .bind(&property.state)
        .bind(&property.zip_code)
        .bind(&property.country)
        .bind(property.price_per_night)
        .bind(join_tags(&property.amenities))
        .bind(property.id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Property::from))
    }

    async fn delete_property(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_reservations(&self) -> Result<Vec<Reservation>, AppError> {
        Ok(
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get_reservation(&self, id: i64) -> Result<Option<Reservation>, AppError> {
        Ok(
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_reservation(
        &self,
        reservation: &ReservationCreate,
        reservation_date: NaiveDate,
    ) -> Result<Reservation, AppError> {
        let row = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations
                (user_id, property_id, check_in_date, check_out_date, reservation_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(reservation.user_id)
        .bind(reservation.property_id)
        .bind(reservation.check_in_date)
        .bind(reservation.check_out_date)
        .bind(reservation_date)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "Inserted reservation {} (user {}, property {})",
            row.id, row.user_id, row.property_id
        );
        Ok(row)
    }

    async fn update_reservation(
        &self,
        reservation: &Reservation,
    ) -> Result<Option<Reservation>, AppError> {
        Ok(sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET user_id = $1, property_id = $2, check_in_date = $3, check_out_date = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(reservation.user_id)
        .bind(reservation.property_id)
        .bind(reservation.check_in_date)
        .bind(reservation.check_out_date)
        .bind(reservation.id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_reservation(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
