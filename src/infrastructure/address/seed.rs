//! Random Dutch sample addresses for development databases

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::domain::address::{AddressRepository, NewAddress};
use crate::domain::DomainError;

/// Addresses inserted per storage round-trip
pub const SEED_BATCH_SIZE: usize = 100;

const CITIES: &[(&str, &str)] = &[
    ("Amsterdam", "Noord-Holland"),
    ("Rotterdam", "Zuid-Holland"),
    ("Den Haag", "Zuid-Holland"),
    ("Utrecht", "Utrecht"),
    ("Eindhoven", "Noord-Brabant"),
    ("Groningen", "Groningen"),
    ("Tilburg", "Noord-Brabant"),
    ("Almere", "Flevoland"),
    ("Breda", "Noord-Brabant"),
    ("Nijmegen", "Gelderland"),
];

const STREETS: &[&str] = &[
    "Hoofdstraat",
    "Kerkstraat",
    "Schoolstraat",
    "Molenweg",
    "Dorpsstraat",
    "Stationsweg",
    "Julianalaan",
    "Wilhelminastraat",
    "Beatrixlaan",
    "Oranjelaan",
    "Marktplein",
    "Nieuwstraat",
    "Voorstraat",
    "Emmaweg",
    "Prins Bernhardstraat",
    "Koningsweg",
    "Industrieweg",
    "Parkweg",
    "Lindenlaan",
    "Eikenstraat",
];

const NEIGHBORHOODS: &[&str] = &[
    "Centrum",
    "Oud-West",
    "Noord",
    "Oost",
    "Zuid",
    "Nieuw-Zuid",
    "Westpoort",
    "Zuidoost",
    "Buitenveldert",
    "Slotervaart",
    "Overtoomse Veld",
    "De Pijp",
    "Rivierenbuurt",
    "Oud-Zuid",
    "Watergraafsmeer",
    "IJburg",
];

const MUNICIPALITIES: &[&str] = &[
    "Amsterdam",
    "Rotterdam",
    "Den Haag",
    "Utrecht",
    "Eindhoven",
    "Groningen",
    "Tilburg",
    "Almere",
    "Breda",
    "Nijmegen",
    "Enschede",
    "Apeldoorn",
    "Haarlem",
    "Arnhem",
    "Zaanstad",
    "Amersfoort",
];

const DISTRICTS: &[&str] = &[
    "Binnenstad",
    "Scheveningen",
    "Segbroek",
    "Loosduinen",
    "Escamp",
    "Laak",
    "Haagse Hout",
    "Centrum",
    "Noord",
    "Oost",
    "Zuid",
    "West",
];

// Bounding box of the Netherlands
const MIN_LAT: f64 = 50.75;
const MAX_LAT: f64 = 53.55;
const MIN_LNG: f64 = 3.35;
const MAX_LNG: f64 = 7.22;

/// Probability that the optional neighborhood / district fields are filled
const OPTIONAL_FIELD_PROBABILITY: f64 = 0.7;

/// Generates plausible random Dutch addresses
#[derive(Debug)]
pub struct AddressGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> AddressGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Four digits (1000-9999) followed by two capital letters
    pub fn postal_code(&mut self) -> String {
        let digits: u32 = self.rng.gen_range(1000..=9999);
        let first = char::from(self.rng.gen_range(b'A'..=b'Z'));
        let second = char::from(self.rng.gen_range(b'A'..=b'Z'));
        format!("{}{}{}", digits, first, second)
    }

    pub fn address(&mut self) -> NewAddress {
        let (city, province) = pick(&mut self.rng, CITIES).unwrap_or(("Amsterdam", "Noord-Holland"));
        let postal_code = self.postal_code();

        let neighborhood = if self.rng.gen_bool(OPTIONAL_FIELD_PROBABILITY) {
            pick(&mut self.rng, NEIGHBORHOODS).map(str::to_string)
        } else {
            None
        };
        let district = if self.rng.gen_bool(OPTIONAL_FIELD_PROBABILITY) {
            pick(&mut self.rng, DISTRICTS).map(str::to_string)
        } else {
            None
        };

        NewAddress {
            street_name: pick(&mut self.rng, STREETS).unwrap_or("Hoofdstraat").to_string(),
            house_number: self.rng.gen_range(1..=200u32).to_string(),
            postal_code,
            city: city.to_string(),
            municipality: pick(&mut self.rng, MUNICIPALITIES)
                .unwrap_or(city)
                .to_string(),
            province: province.to_string(),
            neighborhood,
            district,
            latitude: self.rng.gen_range(MIN_LAT..MAX_LAT),
            longitude: self.rng.gen_range(MIN_LNG..MAX_LNG),
        }
    }

    pub fn batch(&mut self, size: usize) -> Vec<NewAddress> {
        (0..size).map(|_| self.address()).collect()
    }
}

fn pick<R: Rng, T: Copy>(rng: &mut R, items: &[T]) -> Option<T> {
    items.choose(rng).copied()
}

/// Insert `count` random addresses in batches, returning how many were stored
pub async fn seed_addresses<R: Rng>(
    repository: &dyn AddressRepository,
    generator: &mut AddressGenerator<R>,
    count: usize,
) -> Result<usize, DomainError> {
    let batches = count.div_ceil(SEED_BATCH_SIZE);
    let mut inserted = 0;

    for batch_index in 0..batches {
        let size = SEED_BATCH_SIZE.min(count - batch_index * SEED_BATCH_SIZE);
        let batch = generator.batch(size);

        inserted += repository.insert_many(batch).await?;

        info!(
            batch = batch_index + 1,
            batches,
            inserted,
            "Seeded address batch"
        );
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::address::InMemoryAddressRepository;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generator() -> AddressGenerator<StdRng> {
        AddressGenerator::new(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_postal_code_format() {
        let mut generator = generator();

        for _ in 0..200 {
            let code = generator.postal_code();
            assert_eq!(code.len(), 6);

            let digits: u32 = code[..4].parse().unwrap();
            assert!((1000..=9999).contains(&digits));
            assert!(code[4..].chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_address_fields_within_bounds() {
        let mut generator = generator();

        for address in generator.batch(500) {
            let number: u32 = address.house_number.parse().unwrap();
            assert!((1..=200).contains(&number));

            assert!((MIN_LAT..MAX_LAT).contains(&address.latitude));
            assert!((MIN_LNG..MAX_LNG).contains(&address.longitude));

            assert!(STREETS.contains(&address.street_name.as_str()));
            assert!(MUNICIPALITIES.contains(&address.municipality.as_str()));
            assert!(CITIES
                .iter()
                .any(|(city, province)| *city == address.city && *province == address.province));
        }
    }

    #[test]
    fn test_optional_fields_are_mixed() {
        let mut generator = generator();
        let batch = generator.batch(500);

        let with_neighborhood = batch.iter().filter(|a| a.neighborhood.is_some()).count();
        let with_district = batch.iter().filter(|a| a.district.is_some()).count();

        // Expect roughly 70% with a wide tolerance
        assert!((250..450).contains(&with_neighborhood));
        assert!((250..450).contains(&with_district));
    }

    #[tokio::test]
    async fn test_seed_addresses_in_batches() {
        let repo = InMemoryAddressRepository::new();
        let mut generator = generator();

        let inserted = seed_addresses(&repo, &mut generator, 250).await.unwrap();

        assert_eq!(inserted, 250);
        assert_eq!(repo.count().await.unwrap(), 250);
    }

    #[tokio::test]
    async fn test_seed_zero_addresses() {
        let repo = InMemoryAddressRepository::new();
        let inserted = seed_addresses(&repo, &mut generator(), 0).await.unwrap();
        assert_eq!(inserted, 0);
    }
}
