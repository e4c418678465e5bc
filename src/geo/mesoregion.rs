//! Mesoregions, keyed by name.
//!
//! Names are expected to be unique nationally. When a bare name matches in
//! several states the lookup fails with `AmbiguousName` and the caller
//! narrows it with the owning state code.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::lazy::Memo;
use super::resolve::{name_key, unique};
use super::{EntityKind, GeoEntity, Macroregion, Microregion, Municipality, NaturalKey, State};
use crate::error::Result;
use crate::store::{MesoregionFilter, MesoregionRow, MicroregionFilter, SharedStore};

/// Lookup key for [`Mesoregion::lookup`].
#[derive(Debug, Clone, Default)]
pub struct MesoregionKey {
    pub name: String,
    /// IBGE code of the owning state
    pub state: Option<u32>,
}

impl MesoregionKey {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: None,
        }
    }

    pub fn in_state(mut self, state: u32) -> Self {
        self.state = Some(state);
        self
    }
}

#[derive(Clone)]
pub struct Mesoregion {
    store: SharedStore,
    name: String,
    geographic_id: u32,
    state_code: u32,
    state: Memo<State>,
    microregions: Memo<Vec<Microregion>>,
    municipalities: Memo<Vec<Municipality>>,
}

impl Mesoregion {
    pub fn lookup(store: SharedStore, key: MesoregionKey) -> Result<Self> {
        let name = name_key(EntityKind::Mesoregion, &key.name)?;
        let filter = match key.state {
            Some(state) => MesoregionFilter::NameInState {
                name: name.clone(),
                state,
            },
            None => MesoregionFilter::Name(name.clone()),
        };
        let rows = store.mesoregions(&filter)?;
        let row = unique(EntityKind::Mesoregion, &name, "state", rows, |r| r.state.to_string())?;
        Ok(Self::from_row(store, row, None))
    }

    pub fn from_name(store: SharedStore, name: &str) -> Result<Self> {
        Self::lookup(store, MesoregionKey::name(name))
    }

    /// Build from a row; `parent` seeds the state back-reference when known.
    pub(crate) fn from_row(store: SharedStore, row: MesoregionRow, parent: Option<State>) -> Self {
        Self {
            store,
            name: row.name,
            geographic_id: row.geographic_id,
            state_code: row.state,
            state: parent.map(Memo::preloaded).unwrap_or_default(),
            microregions: Memo::new(),
            municipalities: Memo::new(),
        }
    }

    pub(crate) fn detached(&self) -> Self {
        Self {
            store: self.store.clone(),
            name: self.name.clone(),
            geographic_id: self.geographic_id,
            state_code: self.state_code,
            state: self
                .state
                .get()
                .map(|s| Memo::preloaded(s.detached()))
                .unwrap_or_default(),
            microregions: Memo::new(),
            municipalities: Memo::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geographic_id(&self) -> u32 {
        self.geographic_id
    }

    /// IBGE code of the owning state, available without a query.
    pub fn state_code(&self) -> u32 {
        self.state_code
    }

    pub fn state(&self) -> Result<&State> {
        self.state
            .get_or_load("mesoregion.state", || State::from_code(self.store.clone(), self.state_code))
    }

    pub fn macroregion(&self) -> Result<&Macroregion> {
        Ok(self.state()?.macroregion())
    }

    /// Microregions whose code falls under this mesoregion's state.
    ///
    /// The store links microregions to mesoregions by name only, and a name
    /// can repeat across states.
    pub fn microregions(&self) -> Result<&[Microregion]> {
        let microregions = self.microregions.get_or_load("mesoregion.microregions", || {
            let rows = self
                .store
                .microregions(&MicroregionFilter::Mesoregion(self.name.clone()))?;
            Ok(rows
                .into_iter()
                .filter(|row| row.id / 1000 == self.state_code)
                .map(|row| Microregion::from_row(self.store.clone(), row, Some(self.detached())))
                .collect())
        })?;
        Ok(microregions.as_slice())
    }

    /// Municipalities of every microregion, in microregion order.
    pub fn municipalities(&self) -> Result<&[Municipality]> {
        let municipalities = self.municipalities.get_or_load("mesoregion.municipalities", || {
            let mut all = Vec::new();
            for microregion in self.microregions()? {
                all.extend(microregion.municipalities()?.iter().cloned());
            }
            Ok(all)
        })?;
        Ok(municipalities.as_slice())
    }
}

impl GeoEntity for Mesoregion {
    fn kind(&self) -> EntityKind {
        EntityKind::Mesoregion
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Name(self.name.clone())
    }
}

impl PartialEq for Mesoregion {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Mesoregion {}

impl Hash for Mesoregion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Mesoregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Mesoregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesoregion")
            .field("name", &self.name)
            .field("geographic_id", &self.geographic_id)
            .field("state", &self.state_code)
            .field("microregions_loaded", &self.microregions.is_loaded())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;
    use crate::store::{CityRow, MemoryStore, MicroregionRow, StateRow};
    use std::sync::Arc;

    fn store() -> SharedStore {
        let mut store = MemoryStore::new();
        for (id, name, macroregion, uf) in [
            (13, "Amazonas", 1, "AM"),
            (17, "Tocantins", 1, "TO"),
            (50, "Mato Grosso do Sul", 3, "MS"),
        ] {
            store.states.push(StateRow {
                id,
                name: name.into(),
                macroregion,
                uf: uf.into(),
            });
        }
        for (name, state, geographic_id) in [
            ("Centro Amazonense", 13, 1303),
            ("Sul Amazonense", 13, 1304),
            ("Centro Norte", 17, 1701),
            ("Centro Norte", 50, 5002),
        ] {
            store.mesoregions.push(MesoregionRow {
                name: name.into(),
                state,
                geographic_id,
            });
        }
        for (id, name) in [(17002, "Miracema do Tocantins"), (50004, "Campo Grande")] {
            store.microregions.push(MicroregionRow {
                id,
                name: name.into(),
                mesoregion: "Centro Norte".into(),
                geographic_id: id,
            });
        }
        store.cities.push(CityRow {
            id: 5002704,
            name: "Campo Grande".into(),
            microregion: 50004,
            latitude: -20.4486,
            longitude: -54.6295,
            timezone: "America/Campo_Grande".into(),
        });
        Arc::new(store)
    }

    fn names(microregions: &[Microregion]) -> Vec<&str> {
        microregions.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let meso = Mesoregion::from_name(store(), "centro AMAZONENSE").unwrap();
        assert_eq!(meso.name(), "Centro Amazonense");
        assert_eq!(meso.geographic_id(), 1303);
        assert_eq!(meso.state().unwrap().uf(), "AM");
        assert_eq!(meso.macroregion().unwrap().name(), "Norte");
    }

    #[test]
    fn test_not_found() {
        assert!(Mesoregion::from_name(store(), "Centro").unwrap_err().is_not_found());
        assert!(matches!(
            Mesoregion::from_name(store(), " "),
            Err(GeoError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_name_shared_by_two_states() {
        let err = Mesoregion::from_name(store(), "Centro Norte").unwrap_err();
        assert!(matches!(err, GeoError::AmbiguousName { entity: EntityKind::Mesoregion, .. }));
        assert_eq!(err.candidates(), ["17", "50"]);

        let scoped = Mesoregion::lookup(store(), MesoregionKey::name("Centro Norte").in_state(50)).unwrap();
        assert_eq!(scoped.geographic_id(), 5002);
    }

    #[test]
    fn test_shared_name_children_stay_in_their_state() {
        let store = store();
        let ms = Mesoregion::lookup(store.clone(), MesoregionKey::name("Centro Norte").in_state(50)).unwrap();
        assert_eq!(names(ms.microregions().unwrap()), ["Campo Grande"]);
        let codes: Vec<u32> = ms.municipalities().unwrap().iter().map(|c| c.code()).collect();
        assert_eq!(codes, [5002704]);

        let to = Mesoregion::lookup(store.clone(), MesoregionKey::name("Centro Norte").in_state(17)).unwrap();
        assert_eq!(names(to.microregions().unwrap()), ["Miracema do Tocantins"]);

        let state = State::from_code(store, 50).unwrap();
        assert_eq!(names(state.microregions().unwrap()), ["Campo Grande"]);
    }

    #[test]
    fn test_shared_name_parent_resolves_through_state() {
        let micro = Microregion::from_name(store(), "Campo Grande").unwrap();
        let meso = micro.mesoregion().unwrap();
        assert_eq!(meso.geographic_id(), 5002);
        assert_eq!(micro.state().unwrap().uf(), "MS");
        assert_eq!(micro.macroregion().unwrap().name(), "Centro-Oeste");
    }
}
