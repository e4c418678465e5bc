//! Natural-key identity shared by every entity kind.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{GeoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Macroregion,
    State,
    Mesoregion,
    Microregion,
    Municipality,
}

impl EntityKind {
    fn tag(self) -> u8 {
        match self {
            EntityKind::Macroregion => 1,
            EntityKind::State => 2,
            EntityKind::Mesoregion => 3,
            EntityKind::Microregion => 4,
            EntityKind::Municipality => 5,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Macroregion => "macroregion",
            EntityKind::State => "state",
            EntityKind::Mesoregion => "mesoregion",
            EntityKind::Microregion => "microregion",
            EntityKind::Municipality => "municipality",
        };
        f.write_str(s)
    }
}

/// The caller-meaningful identifier of an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NaturalKey {
    Code(u32),
    Name(String),
}

impl fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NaturalKey::Code(code) => write!(f, "{code}"),
            NaturalKey::Name(name) => f.write_str(name),
        }
    }
}

pub trait GeoEntity {
    fn kind(&self) -> EntityKind;

    fn natural_key(&self) -> NaturalKey;

    /// Stable 64-bit hash of the natural key, identical across processes.
    fn key_hash(&self) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update([self.kind().tag()]);
        match self.natural_key() {
            NaturalKey::Code(code) => {
                hasher.update([b'c']);
                hasher.update(code.to_be_bytes());
            }
            NaturalKey::Name(name) => {
                hasher.update([b'n']);
                hasher.update(name.as_bytes());
            }
        }
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_be_bytes(head)
    }

    /// Equality across entity kinds. Comparing different kinds is an error.
    fn try_eq(&self, other: &dyn GeoEntity) -> Result<bool> {
        if self.kind() != other.kind() {
            return Err(GeoError::InvalidComparison {
                left: self.kind(),
                right: other.kind(),
            });
        }
        Ok(self.natural_key() == other.natural_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(EntityKind, NaturalKey);

    impl GeoEntity for Probe {
        fn kind(&self) -> EntityKind {
            self.0
        }

        fn natural_key(&self) -> NaturalKey {
            self.1.clone()
        }
    }

    #[test]
    fn test_key_hash_is_not_the_raw_key() {
        let probe = Probe(EntityKind::Macroregion, NaturalKey::Code(3));
        assert_ne!(probe.key_hash(), 3);
        assert_eq!(probe.key_hash(), Probe(EntityKind::Macroregion, NaturalKey::Code(3)).key_hash());
    }

    #[test]
    fn test_key_hash_is_type_consistent() {
        let code = Probe(EntityKind::Mesoregion, NaturalKey::Code(33));
        let name = Probe(EntityKind::Mesoregion, NaturalKey::Name("33".into()));
        assert_ne!(code.key_hash(), name.key_hash());

        let state = Probe(EntityKind::State, NaturalKey::Code(33));
        assert_ne!(code.key_hash(), state.key_hash());
    }

    #[test]
    fn test_try_eq_rejects_other_kinds() {
        let state = Probe(EntityKind::State, NaturalKey::Code(11));
        let city = Probe(EntityKind::Municipality, NaturalKey::Code(11));
        let err = state.try_eq(&city).unwrap_err();
        assert!(matches!(
            err,
            GeoError::InvalidComparison { left: EntityKind::State, right: EntityKind::Municipality }
        ));

        let same = Probe(EntityKind::State, NaturalKey::Code(11));
        assert!(state.try_eq(&same).unwrap());
    }
}
