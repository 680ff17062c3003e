//! Hatching new pets.

use chrono::{DateTime, Utc};
use pocketpet_types::{PetRecord, PetType};
use rand::Rng;
use tracing::info;

/// Name given to a pet when none is configured.
pub const DEFAULT_PET_NAME: &str = "Buddy";

/// Pick a species uniformly at random.
pub fn random_pet_type(rng: &mut impl Rng) -> PetType {
    let idx = rng.random_range(0..PetType::ALL.len());
    PetType::ALL.get(idx).copied().unwrap_or(PetType::Cat)
}

/// Hatch a fresh pet at `now` with a uniformly random species.
pub fn hatch(name: &str, now: DateTime<Utc>, rng: &mut impl Rng) -> PetRecord {
    let pet_type = random_pet_type(rng);
    info!(name, pet_type = ?pet_type, "Hatched new pet");
    PetRecord::new(name, pet_type, now)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn hatch_uses_name_and_time() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let pet = hatch("Mochi", now, &mut rng);
        assert_eq!(pet.name, "Mochi");
        assert_eq!(pet.birth_time, now);
        assert_eq!(pet.age, 0);
    }

    #[test]
    fn every_species_can_hatch() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        let seen: BTreeSet<PetType> = (0..200)
            .map(|_| hatch(DEFAULT_PET_NAME, now, &mut rng).pet_type)
            .collect();
        assert_eq!(seen.len(), PetType::ALL.len());
    }
}
