//! Address entity and lookup queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A Dutch postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i64,
    pub street_name: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub municipality: String,
    pub province: String,
    pub neighborhood: Option<String>,
    pub district: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// An address that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewAddress {
    pub street_name: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
    pub municipality: String,
    pub province: String,
    pub neighborhood: Option<String>,
    pub district: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl NewAddress {
    /// Attach the identity assigned by storage
    pub fn into_address(self, id: i64, created_at: DateTime<Utc>) -> Address {
        Address {
            id,
            street_name: self.street_name,
            house_number: self.house_number,
            postal_code: normalize_postal_code(&self.postal_code),
            city: self.city,
            municipality: self.municipality,
            province: self.province,
            neighborhood: self.neighborhood,
            district: self.district,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at,
        }
    }
}

/// Strip all whitespace and upper-case, so `1234 ab` and `1234AB` are the same code
pub fn normalize_postal_code(postal_code: &str) -> String {
    postal_code
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn require(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Lookup by postal code and house number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCodeQuery {
    pub postal_code: String,
    pub house_number: String,
}

impl PostalCodeQuery {
    pub fn new(postal_code: &str, house_number: &str) -> Result<Self, DomainError> {
        let postal_code = normalize_postal_code(&require("postalCode", postal_code)?);

        Ok(Self {
            postal_code,
            house_number: require("houseNumber", house_number)?,
        })
    }
}

/// Lookup by street name, house number and city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetQuery {
    pub street_name: String,
    pub house_number: String,
    pub city: String,
}

impl StreetQuery {
    pub fn new(street_name: &str, house_number: &str, city: &str) -> Result<Self, DomainError> {
        Ok(Self {
            street_name: require("streetName", street_name)?,
            house_number: require("houseNumber", house_number)?,
            city: require("city", city)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_postal_code() {
        assert_eq!(normalize_postal_code("1234AB"), "1234AB");
        assert_eq!(normalize_postal_code("1234 ab"), "1234AB");
        assert_eq!(normalize_postal_code(" 1234\tAb "), "1234AB");
    }

    #[test]
    fn test_postal_code_query() {
        let query = PostalCodeQuery::new(" 1011 ab ", " 12 ").unwrap();
        assert_eq!(query.postal_code, "1011AB");
        assert_eq!(query.house_number, "12");
    }

    #[test]
    fn test_postal_code_query_missing_fields() {
        let err = PostalCodeQuery::new("", "12").unwrap_err();
        assert_eq!(err.message(), "postalCode is required");

        let err = PostalCodeQuery::new("1011AB", "   ").unwrap_err();
        assert_eq!(err.message(), "houseNumber is required");
    }

    #[test]
    fn test_street_query() {
        let query = StreetQuery::new(" Kerkstraat ", "7", " Utrecht").unwrap();
        assert_eq!(query.street_name, "Kerkstraat");
        assert_eq!(query.city, "Utrecht");

        assert!(StreetQuery::new("Kerkstraat", "7", "").is_err());
    }

    #[test]
    fn test_address_serializes_camel_case() {
        let address = NewAddress {
            street_name: "Damrak".to_string(),
            house_number: "1".to_string(),
            postal_code: "1012 lg".to_string(),
            city: "Amsterdam".to_string(),
            municipality: "Amsterdam".to_string(),
            province: "Noord-Holland".to_string(),
            neighborhood: None,
            district: Some("Centrum".to_string()),
            latitude: 52.376,
            longitude: 4.896,
        }
        .into_address(1, Utc::now());

        assert_eq!(address.postal_code, "1012LG");

        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["streetName"], "Damrak");
        assert_eq!(json["postalCode"], "1012LG");
        assert!(json["neighborhood"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
