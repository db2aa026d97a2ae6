//! PostgreSQL address repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::address::{
    normalize_postal_code, Address, AddressRepository, NewAddress, PostalCodeQuery, StreetQuery,
};
use crate::domain::DomainError;

const ADDRESS_COLUMNS: &str = "id, street_name, house_number, postal_code, city, municipality, \
     province, neighborhood, district, latitude, longitude, created_at";

#[derive(Debug, Clone)]
pub struct PostgresAddressRepository {
    pool: PgPool,
}

impl PostgresAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PostgresAddressRepository {
    async fn find_by_postal_code(
        &self,
        query: &PostalCodeQuery,
    ) -> Result<Option<Address>, DomainError> {
        let sql = format!(
            "SELECT {} FROM addresses WHERE postal_code = $1 AND house_number = $2 \
             ORDER BY id LIMIT 1",
            ADDRESS_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&query.postal_code)
            .bind(&query.house_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to look up address: {}", e)))?;

        Ok(row.as_ref().map(row_to_address))
    }

    async fn find_by_street(&self, query: &StreetQuery) -> Result<Option<Address>, DomainError> {
        let sql = format!(
            "SELECT {} FROM addresses \
             WHERE street_name = $1 AND house_number = $2 AND city = $3 \
             ORDER BY id LIMIT 1",
            ADDRESS_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(&query.street_name)
            .bind(&query.house_number)
            .bind(&query.city)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to look up address: {}", e)))?;

        Ok(row.as_ref().map(row_to_address))
    }

    async fn insert_many(&self, addresses: Vec<NewAddress>) -> Result<usize, DomainError> {
        if addresses.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO addresses (street_name, house_number, postal_code, city, municipality, \
             province, neighborhood, district, latitude, longitude) ",
        );

        builder.push_values(addresses, |mut b, address| {
            b.push_bind(address.street_name)
                .push_bind(address.house_number)
                .push_bind(normalize_postal_code(&address.postal_code))
                .push_bind(address.city)
                .push_bind(address.municipality)
                .push_bind(address.province)
                .push_bind(address.neighborhood)
                .push_bind(address.district)
                .push_bind(address.latitude)
                .push_bind(address.longitude);
        });

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert addresses: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM addresses")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count addresses: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_address(row: &sqlx::postgres::PgRow) -> Address {
    Address {
        id: row.get("id"),
        street_name: row.get("street_name"),
        house_number: row.get("house_number"),
        postal_code: row.get("postal_code"),
        city: row.get("city"),
        municipality: row.get("municipality"),
        province: row.get("province"),
        neighborhood: row.get("neighborhood"),
        district: row.get("district"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        created_at: row.get("created_at"),
    }
}
