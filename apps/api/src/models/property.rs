use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::catalog::tags::{normalize_tags, split_tags};
use crate::errors::AppError;
use crate::models::validation::{check_length, check_positive_price};

pub const DEFAULT_COUNTRY: &str = "USA";

/// A `properties` row as stored. `amenities` is the comma-delimited column.
#[derive(Debug, Clone, FromRow)]
pub struct PropertyRow {
    pub id: i64,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub price_per_night: f64,
    pub amenities: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub price_per_night: f64,
    pub amenities: Vec<String>,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            country: row.country,
            price_per_night: row.price_per_night,
            amenities: split_tags(row.amenities.as_deref()),
        }
    }
}

/// Body of `POST /properties`.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyCreate {
    pub name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub country: Option<String>,
    pub price_per_night: f64,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

impl PropertyCreate {
    pub fn validate(&self) -> Result<(), AppError> {
        check_length("name", &self.name, 1, 255)?;
        check_length("address_line1", &self.address_line1, 1, 255)?;
        if let Some(line2) = &self.address_line2 {
            check_length("address_line2", line2, 0, 255)?;
        }
        check_length("city", &self.city, 1, 100)?;
        check_length("state", &self.state, 1, 100)?;
        check_length("zip_code", &self.zip_code, 1, 20)?;
        if let Some(country) = &self.country {
            check_length("country", country, 0, 100)?;
        }
        check_positive_price(self.price_per_night)
    }

    pub fn country(&self) -> &str {
        self.country.as_deref().unwrap_or(DEFAULT_COUNTRY)
    }

    pub fn amenities(&self) -> Vec<String> {
        self.amenities
            .as_deref()
            .map(normalize_tags)
            .unwrap_or_default()
    }
}

/// Body of `PUT /properties/:id`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub price_per_night: Option<f64>,
    pub amenities: Option<Vec<String>>,
}

impl PropertyPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("name", &self.name, 255),
            ("address_line1", &self.address_line1, 255),
            ("city", &self.city, 100),
            ("state", &self.state, 100),
            ("zip_code", &self.zip_code, 20),
        ];
        for (field, value, max) in required {
            if let Some(value) = value {
                check_length(field, value, 1, max)?;
            }
        }
        if let Some(line2) = &self.address_line2 {
            check_length("address_line2", line2, 0, 255)?;
        }
        if let Some(country) = &self.country {
            check_length("country", country, 0, 100)?;
        }
        if let Some(price) = self.price_per_night {
            check_positive_price(price)?;
        }
        Ok(())
    }
}

impl Property {
    /// Merges a patch into this property, returning the updated record.
    pub fn apply(self, patch: PropertyPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.unwrap_or(self.name),
            address_line1: patch.address_line1.unwrap_or(self.address_line1),
            address_line2: patch.address_line2.or(self.address_line2),
            city: patch.city.unwrap_or(self.city),
            state: patch.state.unwrap_or(self.state),
            zip_code: patch.zip_code.unwrap_or(self.zip_code),
            country: patch.country.unwrap_or(self.country),
            price_per_night: patch.price_per_night.unwrap_or(self.price_per_night),
            amenities: patch
                .amenities
                .map(|tags| normalize_tags(&tags))
                .unwrap_or(self.amenities),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cabin() -> Property {
        Property {
            id: 1,
            name: "Cozy Cabin".to_string(),
            address_line1: "123 Main St".to_string(),
            address_line2: Some("Unit 2".to_string()),
            city: "Denver".to_string(),
            state: "CO".to_string(),
            zip_code: "80202".to_string(),
            country: "USA".to_string(),
            price_per_night: 100.0,
            amenities: vec!["wifi".to_string(), "kitchen".to_string()],
        }
    }

    fn create_body() -> PropertyCreate {
        PropertyCreate {
            name: "Cozy Cabin".to_string(),
            address_line1: "123 Main St".to_string(),
            address_line2: None,
            city: "Denver".to_string(),
            state: "CO".to_string(),
            zip_code: "80202".to_string(),
            country: None,
            price_per_night: 100.0,
            amenities: Some(vec!["wifi".to_string(), " ".to_string()]),
        }
    }

    #[test]
    fn test_create_defaults() {
        let body = create_body();
        assert!(body.validate().is_ok());
        assert_eq!(body.country(), "USA");
        assert_eq!(body.amenities(), vec!["wifi"]);
    }

    #[test]
    fn test_create_rejects_non_positive_price() {
        let body = PropertyCreate {
            price_per_night: 0.0,
            ..create_body()
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_create_rejects_long_zip() {
        let body = PropertyCreate {
            zip_code: "1".repeat(21),
            ..create_body()
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_apply_patch_keeps_unset_fields() {
        let patch = PropertyPatch {
            name: Some("Villa".to_string()),
            amenities: Some(vec!["pool".to_string()]),
            ..Default::default()
        };
        let updated = cabin().apply(patch);
        assert_eq!(updated.name, "Villa");
        assert_eq!(updated.amenities, vec!["pool"]);
        assert_eq!(updated.address_line2.as_deref(), Some("Unit 2"));
        assert_eq!(updated.city, "Denver");
        assert_eq!(updated.price_per_night, 100.0);
    }

    #[test]
    fn test_patch_validation() {
        let blank_city = PropertyPatch {
            city: Some(String::new()),
            ..Default::default()
        };
        assert!(blank_city.validate().is_err());

        let negative = PropertyPatch {
            price_per_night: Some(-1.0),
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        assert!(PropertyPatch::default().validate().is_ok());
    }

    #[test]
    fn test_row_without_amenities() {
        let row = PropertyRow {
            id: 3,
            name: "Loft".to_string(),
            address_line1: "1 Side St".to_string(),
            address_line2: None,
            city: "Marfa".to_string(),
            state: "TX".to_string(),
            zip_code: "79843".to_string(),
            country: "USA".to_string(),
            price_per_night: 180.0,
            amenities: None,
        };
        assert!(Property::from(row).amenities.is_empty());
    }
}
