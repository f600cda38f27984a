//! Synthetic platform identity: serial, board serial, UUID and ROM.
//!
//! These values only need to look plausible to the firmware. They are drawn
//! from whatever [`Rng`] the caller passes so tests can seed them.

use rand::Rng;
use serde::Serialize;
use uuid::Builder;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const SERIAL_LEN: usize = 12;
pub const MLB_LEN: usize = 17;
pub const ROM_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformIdentity {
    pub serial: String,
    pub mlb: String,
    pub uuid: String,
    #[serde(skip)]
    pub rom: Vec<u8>,
}

fn random_chars<R: Rng + ?Sized>(rng: &mut R, n: usize) -> String {
    (0..n)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// `prefix` followed by nine random characters, or twelve without a prefix.
pub fn serial<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    if prefix.is_empty() {
        random_chars(rng, SERIAL_LEN)
    } else {
        format!("{prefix}{}", random_chars(rng, 9))
    }
}

pub fn mlb<R: Rng + ?Sized>(rng: &mut R) -> String {
    random_chars(rng, MLB_LEN)
}

/// Upper-case hyphenated version 4 UUID.
pub fn system_uuid<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.gen();
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string()
        .to_uppercase()
}

pub fn rom<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let bytes: [u8; ROM_LEN] = rng.gen();
    bytes.to_vec()
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, serial_prefix: &str) -> PlatformIdentity {
    PlatformIdentity {
        serial: serial(rng, serial_prefix),
        mlb: mlb(rng),
        uuid: system_uuid(rng),
        rom: rom(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn in_alphabet(s: &str) -> bool {
        s.bytes().all(|b| ALPHABET.contains(&b))
    }

    #[test]
    fn shapes() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate(&mut rng, "C02");
        assert_eq!(id.serial.len(), 12);
        assert!(id.serial.starts_with("C02"));
        assert!(in_alphabet(&id.serial));
        assert_eq!(id.mlb.len(), 17);
        assert!(in_alphabet(&id.mlb));
        assert_eq!(id.rom.len(), 6);

        let parsed = uuid::Uuid::parse_str(&id.uuid).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id.uuid, id.uuid.to_uppercase());
    }

    #[test]
    fn no_prefix_means_twelve_random_chars() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = serial(&mut rng, "");
        assert_eq!(s.len(), SERIAL_LEN);
        assert!(in_alphabet(&s));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = generate(&mut StdRng::seed_from_u64(42), "C02");
        let b = generate(&mut StdRng::seed_from_u64(42), "C02");
        assert_eq!(a, b);
    }
}
