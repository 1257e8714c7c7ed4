use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub property_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Server date at creation time.
    pub reservation_date: NaiveDate,
}

/// Body of `POST /reservations`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationCreate {
    pub user_id: i64,
    pub property_id: i64,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

/// Body of `PUT /reservations/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationPatch {
    pub user_id: Option<i64>,
    pub property_id: Option<i64>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
}

impl Reservation {
    /// Merges a patch into this reservation, returning the updated record.
    /// Date ordering is checked separately, on the merged result.
    pub fn apply(self, patch: ReservationPatch) -> Self {
        Self {
            id: self.id,
            user_id: patch.user_id.unwrap_or(self.user_id),
            property_id: patch.property_id.unwrap_or(self.property_id),
            check_in_date: patch.check_in_date.unwrap_or(self.check_in_date),
            check_out_date: patch.check_out_date.unwrap_or(self.check_out_date),
            reservation_date: self.reservation_date,
        }
    }
}

/// A stay must end strictly after it starts.
pub fn check_stay_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), AppError> {
    if check_in >= check_out {
        return Err(AppError::Validation(
            "check_out_date must be after check_in_date".to_string(),
        ));
    }
    Ok(())
}
