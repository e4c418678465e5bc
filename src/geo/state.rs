//! States, identified by IBGE code or two-letter abbreviation.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::lazy::Memo;
use super::resolve::{exactly_one, Either};
use super::{EntityKind, GeoEntity, Macroregion, Mesoregion, Microregion, Municipality, NaturalKey};
use crate::error::{GeoError, Result};
use crate::store::{MesoregionFilter, SharedStore, StateFilter, StateRow};

/// Lookup key for [`State::lookup`]. Exactly one field must be set.
#[derive(Debug, Clone, Default)]
pub struct StateKey {
    pub code: Option<u32>,
    pub uf: Option<String>,
}

impl StateKey {
    pub fn code(code: u32) -> Self {
        Self {
            code: Some(code),
            uf: None,
        }
    }

    pub fn uf(uf: impl Into<String>) -> Self {
        Self {
            code: None,
            uf: Some(uf.into()),
        }
    }
}

#[derive(Clone)]
pub struct State {
    store: SharedStore,
    code: u32,
    name: String,
    uf: String,
    macroregion: Macroregion,
    mesoregions: Memo<Vec<Mesoregion>>,
    microregions: Memo<Vec<Microregion>>,
    municipalities: Memo<Vec<Municipality>>,
}

impl State {
    pub fn lookup(store: SharedStore, key: StateKey) -> Result<Self> {
        match exactly_one(EntityKind::State, "`code` or `uf`", key.code, key.uf)? {
            Either::Left(code) => Self::from_code(store, code),
            Either::Right(uf) => Self::from_uf(store, &uf),
        }
    }

    pub fn from_code(store: SharedStore, code: u32) -> Result<Self> {
        let row = store
            .states(&StateFilter::Code(code))?
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::not_found_with_hint(EntityKind::State, code, "Example: `11` (Rondônia)"))?;
        Self::from_row(store, row)
    }

    /// Look up by abbreviation, case-insensitively (`rj` finds `RJ`).
    pub fn from_uf(store: SharedStore, uf: &str) -> Result<Self> {
        let uf = normalize_uf(uf)?;
        let row = store
            .states(&StateFilter::Uf(uf.clone()))?
            .into_iter()
            .next()
            .ok_or_else(|| GeoError::not_found_with_hint(EntityKind::State, &uf, "Example: `RO` (Rondônia)"))?;
        Self::from_row(store, row)
    }

    pub(crate) fn from_row(store: SharedStore, row: StateRow) -> Result<Self> {
        let macroregion = Macroregion::from_code(store.clone(), row.macroregion)?;
        Ok(Self {
            store,
            code: row.id,
            name: row.name,
            uf: row.uf,
            macroregion,
            mesoregions: Memo::new(),
            microregions: Memo::new(),
            municipalities: Memo::new(),
        })
    }

    pub(crate) fn detached(&self) -> Self {
        Self {
            store: self.store.clone(),
            code: self.code,
            name: self.name.clone(),
            uf: self.uf.clone(),
            macroregion: self.macroregion.detached(),
            mesoregions: Memo::new(),
            microregions: Memo::new(),
            municipalities: Memo::new(),
        }
    }

    pub fn code(&self) -> u32 {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uf(&self) -> &str {
        &self.uf
    }

    pub fn macroregion(&self) -> &Macroregion {
        &self.macroregion
    }

    pub fn mesoregions(&self) -> Result<&[Mesoregion]> {
        let mesoregions = self.mesoregions.get_or_load("state.mesoregions", || {
            let rows = self.store.mesoregions(&MesoregionFilter::State(self.code))?;
            Ok(rows
                .into_iter()
                .map(|row| Mesoregion::from_row(self.store.clone(), row, Some(self.detached())))
                .collect())
        })?;
        Ok(mesoregions.as_slice())
    }

    /// Microregions of every mesoregion, in mesoregion order.
    pub fn microregions(&self) -> Result<&[Microregion]> {
        let microregions = self.microregions.get_or_load("state.microregions", || {
            let mut all = Vec::new();
            for mesoregion in self.mesoregions()? {
                all.extend(mesoregion.microregions()?.iter().cloned());
            }
            Ok(all)
        })?;
        Ok(microregions.as_slice())
    }

    /// Municipalities of every microregion, in microregion order.
    pub fn municipalities(&self) -> Result<&[Municipality]> {
        let municipalities = self.municipalities.get_or_load("state.municipalities", || {
            let mut all = Vec::new();
            for microregion in self.microregions()? {
                all.extend(microregion.municipalities()?.iter().cloned());
            }
            Ok(all)
        })?;
        Ok(municipalities.as_slice())
    }
}

fn normalize_uf(raw: &str) -> Result<String> {
    let uf = raw.trim().to_uppercase();
    if uf.len() != 2 || !uf.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(GeoError::invalid_format(EntityKind::State, raw, "UF must be two letters, e.g. `RO`"));
    }
    Ok(uf)
}

impl GeoEntity for State {
    fn kind(&self) -> EntityKind {
        EntityKind::State
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Code(self.code)
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for State {}

impl Hash for State {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("uf", &self.uf)
            .field("macroregion", &self.macroregion.code())
            .field("mesoregions_loaded", &self.mesoregions.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn store() -> SharedStore {
        let mut store = MemoryStore::new();
        store.states.push(StateRow {
            id: 11,
            name: "Rondônia".into(),
            macroregion: 1,
            uf: "RO".into(),
        });
        store.states.push(StateRow {
            id: 99,
            name: "Broken".into(),
            macroregion: 9,
            uf: "XX".into(),
        });
        Arc::new(store)
    }

    #[test]
    fn test_code_and_uf_agree() {
        let by_code = State::lookup(store(), StateKey::code(11)).unwrap();
        let by_uf = State::lookup(store(), StateKey::uf("ro")).unwrap();
        assert_eq!(by_code, by_uf);
        assert_eq!(by_uf.name(), "Rondônia");
        assert_eq!(by_uf.macroregion().name(), "Norte");
    }

    #[test]
    fn test_uf_format() {
        for bad in ["R", "RON", "R0", ""] {
            assert!(matches!(
                State::from_uf(store(), bad),
                Err(GeoError::InvalidFormat { entity: EntityKind::State, .. })
            ));
        }
    }

    #[test]
    fn test_not_found_and_bad_parent() {
        assert!(State::from_code(store(), 12).unwrap_err().is_not_found());
        assert!(State::from_uf(store(), "AC").unwrap_err().is_not_found());
        // a state row pointing at a macroregion outside the enumeration
        assert!(State::from_code(store(), 99).unwrap_err().is_not_found());
    }
}
