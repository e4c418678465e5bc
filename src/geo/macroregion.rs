//! Macroregions: the five fixed top-level regions.

use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::warn;

use super::lazy::Memo;
use super::resolve::{exactly_one, name_key, Either};
use super::{EntityKind, GeoEntity, Mesoregion, Microregion, NaturalKey, State};
use crate::error::{GeoError, Result};
use crate::store::{MacroregionFilter, SharedStore, StateFilter};

/// The closed enumeration of macroregions, by IBGE code.
pub const MACROREGIONS: [(u8, &str); 5] = [
    (1, "Norte"),
    (2, "Nordeste"),
    (3, "Centro-Oeste"),
    (4, "Sudeste"),
    (5, "Sul"),
];

const CODE_OPTIONS: &str =
    "Options: 1, 2, 3, 4 or 5 (Norte, Nordeste, Centro-Oeste, Sudeste or Sul, respectively)";
const NAME_OPTIONS: &str = "Options: Norte, Nordeste, Centro-Oeste, Sudeste or Sul";

/// Lookup key for [`Macroregion::lookup`]. Exactly one field must be set.
#[derive(Debug, Clone, Default)]
pub struct MacroregionKey {
    pub name: Option<String>,
    pub code: Option<u8>,
}

impl MacroregionKey {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            code: None,
        }
    }

    pub fn code(code: u8) -> Self {
        Self {
            name: None,
            code: Some(code),
        }
    }
}

#[derive(Clone)]
pub struct Macroregion {
    store: SharedStore,
    code: u8,
    name: &'static str,
    states: Memo<Vec<State>>,
    mesoregions: Memo<Vec<Mesoregion>>,
    microregions: Memo<Vec<Microregion>>,
}

impl Macroregion {
    pub fn lookup(store: SharedStore, key: MacroregionKey) -> Result<Self> {
        match exactly_one(EntityKind::Macroregion, "`name` or `code`", key.name, key.code)? {
            Either::Left(name) => Self::from_name(store, &name),
            Either::Right(code) => Self::from_code(store, code),
        }
    }

    pub fn from_code(store: SharedStore, code: u8) -> Result<Self> {
        let (code, name) = MACROREGIONS
            .iter()
            .copied()
            .find(|(c, _)| *c == code)
            .ok_or_else(|| GeoError::not_found_with_hint(EntityKind::Macroregion, code, CODE_OPTIONS))?;
        Ok(Self::build(store, code, name))
    }

    /// Match a name against the fixed enumeration after title-casing it.
    pub fn from_name(store: SharedStore, name: &str) -> Result<Self> {
        let name = title_case(&name_key(EntityKind::Macroregion, name)?);
        let (code, name) = MACROREGIONS
            .iter()
            .copied()
            .find(|(_, n)| *n == name)
            .ok_or_else(|| GeoError::not_found_with_hint(EntityKind::Macroregion, &name, NAME_OPTIONS))?;
        Ok(Self::build(store, code, name))
    }

    /// Every macroregion, straight from the enumeration.
    pub fn all(store: &SharedStore) -> Vec<Self> {
        MACROREGIONS
            .iter()
            .map(|(code, name)| Self::build(store.clone(), *code, *name))
            .collect()
    }

    /// Macroregions present in the store's `macroregions` record set.
    ///
    /// Rows whose code is outside the enumeration are skipped.
    pub fn catalog(store: &SharedStore) -> Result<Vec<Self>> {
        let rows = store.macroregions(&MacroregionFilter::All)?;
        let mut found = Vec::with_capacity(rows.len());
        for row in rows {
            match Self::from_code(store.clone(), row.id) {
                Ok(region) => found.push(region),
                Err(_) => warn!(code = row.id, name = %row.name, "skipping unknown macroregion row"),
            }
        }
        Ok(found)
    }

    fn build(store: SharedStore, code: u8, name: &'static str) -> Self {
        Self {
            store,
            code,
            name,
            states: Memo::new(),
            mesoregions: Memo::new(),
            microregions: Memo::new(),
        }
    }

    /// Same region with nothing loaded, used to seed back-references.
    pub(crate) fn detached(&self) -> Self {
        Self::build(self.store.clone(), self.code, self.name)
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn states(&self) -> Result<&[State]> {
        let states = self.states.get_or_load("macroregion.states", || {
            self.store
                .states(&StateFilter::Macroregion(self.code))?
                .into_iter()
                .map(|row| State::from_row(self.store.clone(), row))
                .collect()
        })?;
        Ok(states.as_slice())
    }

    /// Mesoregions of every state, in state order.
    pub fn mesoregions(&self) -> Result<&[Mesoregion]> {
        let mesoregions = self.mesoregions.get_or_load("macroregion.mesoregions", || {
            let mut all = Vec::new();
            for state in self.states()? {
                all.extend(state.mesoregions()?.iter().cloned());
            }
            Ok(all)
        })?;
        Ok(mesoregions.as_slice())
    }

    /// Microregions of every derived mesoregion, in mesoregion order.
    pub fn microregions(&self) -> Result<&[Microregion]> {
        let microregions = self.microregions.get_or_load("macroregion.microregions", || {
            let mut all = Vec::new();
            for mesoregion in self.mesoregions()? {
                all.extend(mesoregion.microregions()?.iter().cloned());
            }
            Ok(all)
        })?;
        Ok(microregions.as_slice())
    }
}

/// Uppercase the first letter of each word; words break at any non-letter.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

impl GeoEntity for Macroregion {
    fn kind(&self) -> EntityKind {
        EntityKind::Macroregion
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Code(u32::from(self.code))
    }
}

impl PartialEq for Macroregion {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Macroregion {}

impl Hash for Macroregion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for Macroregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Debug for Macroregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macroregion")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("states_loaded", &self.states.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn store() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn test_code_and_name_agree() {
        for (code, name) in MACROREGIONS {
            let by_code = Macroregion::from_code(store(), code).unwrap();
            assert_eq!(by_code.name(), name);
            let by_name = Macroregion::from_name(store(), name).unwrap();
            assert_eq!(by_name.code(), code);
            assert_eq!(by_code, by_name);
        }
    }

    #[test]
    fn test_name_is_title_cased() {
        assert_eq!(Macroregion::from_name(store(), "centro-oeste").unwrap().code(), 3);
        assert_eq!(Macroregion::from_name(store(), " SUDESTE ").unwrap().code(), 4);
        assert_eq!(title_case("cENTRO-oESTE"), "Centro-Oeste");
    }

    #[test]
    fn test_unknown_keys() {
        let err = Macroregion::from_code(store(), 6).unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Options: 1, 2, 3, 4 or 5"));
        assert!(Macroregion::from_name(store(), "Oeste").unwrap_err().is_not_found());
        assert!(Macroregion::from_code(store(), 0).is_err());
    }

    #[test]
    fn test_key_combination() {
        let both = MacroregionKey {
            name: Some("Sul".into()),
            code: Some(5),
        };
        assert!(matches!(
            Macroregion::lookup(store(), both),
            Err(GeoError::InvalidArgumentCombination { entity: EntityKind::Macroregion, .. })
        ));
        assert!(matches!(
            Macroregion::lookup(store(), MacroregionKey::default()),
            Err(GeoError::InvalidArgumentCombination { .. })
        ));
        assert_eq!(Macroregion::lookup(store(), MacroregionKey::name("sul")).unwrap().code(), 5);
    }

    #[test]
    fn test_all_lists_enumeration() {
        let names: Vec<String> = Macroregion::all(&store()).iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["Norte", "Nordeste", "Centro-Oeste", "Sudeste", "Sul"]);
    }
}
