//! Microregions, keyed by name.
//!
//! The same microregion name can appear under several mesoregions, so a bare
//! name lookup may fail with `AmbiguousName`; retry with the mesoregion scope.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::lazy::Memo;
use super::resolve::{name_key, unique};
use super::{
    EntityKind, GeoEntity, Macroregion, Mesoregion, MesoregionKey, Municipality, NaturalKey, State,
};
use crate::error::Result;
use crate::store::{CityFilter, MicroregionFilter, MicroregionRow, SharedStore};

/// Lookup key for [`Microregion::lookup`].
#[derive(Debug, Clone, Default)]
pub struct MicroregionKey {
    pub name: String,
    /// Name of the owning mesoregion
    pub mesoregion: Option<String>,
}

impl MicroregionKey {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mesoregion: None,
        }
    }

    pub fn in_mesoregion(mut self, mesoregion: impl Into<String>) -> Self {
        self.mesoregion = Some(mesoregion.into());
        self
    }
}

#[derive(Clone)]
pub struct Microregion {
    store: SharedStore,
    id: u32,
    name: String,
    geographic_id: u32,
    mesoregion_name: String,
    mesoregion: Memo<Mesoregion>,
    municipalities: Memo<Vec<Municipality>>,
}

impl Microregion {
    pub fn lookup(store: SharedStore, key: MicroregionKey) -> Result<Self> {
        let name = name_key(EntityKind::Microregion, &key.name)?;
        let filter = match key.mesoregion {
            Some(mesoregion) => MicroregionFilter::NameInMesoregion {
                name: name.clone(),
                mesoregion: name_key(EntityKind::Mesoregion, &mesoregion)?,
            },
            None => MicroregionFilter::Name(name.clone()),
        };
        let rows = store.microregions(&filter)?;
        let row = unique(EntityKind::Microregion, &name, "mesoregion", rows, |r| {
            r.mesoregion.clone()
        })?;
        Ok(Self::from_row(store, row, None))
    }

    pub fn from_name(store: SharedStore, name: &str) -> Result<Self> {
        Self::lookup(store, MicroregionKey::name(name))
    }

    pub(crate) fn from_row(store: SharedStore, row: MicroregionRow, parent: Option<Mesoregion>) -> Self {
        Self {
            store,
            id: row.id,
            name: row.name,
            geographic_id: row.geographic_id,
            mesoregion_name: row.mesoregion,
            mesoregion: parent.map(Memo::preloaded).unwrap_or_default(),
            municipalities: Memo::new(),
        }
    }

    pub(crate) fn detached(&self) -> Self {
        Self {
            store: self.store.clone(),
            id: self.id,
            name: self.name.clone(),
            geographic_id: self.geographic_id,
            mesoregion_name: self.mesoregion_name.clone(),
            mesoregion: self
                .mesoregion
                .get()
                .map(|m| Memo::preloaded(m.detached()))
                .unwrap_or_default(),
            municipalities: Memo::new(),
        }
    }

    /// Row id in the store, referenced by municipalities.
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geographic_id(&self) -> u32 {
        self.geographic_id
    }

    pub fn mesoregion_name(&self) -> &str {
        &self.mesoregion_name
    }

    /// IBGE code of the owning state, the leading digits of the id.
    pub fn state_code(&self) -> u32 {
        self.id / 1000
    }

    /// Resolved within the owning state, since mesoregion names can repeat.
    pub fn mesoregion(&self) -> Result<&Mesoregion> {
        self.mesoregion.get_or_load("microregion.mesoregion", || {
            let key = MesoregionKey::name(self.mesoregion_name.as_str()).in_state(self.state_code());
            Mesoregion::lookup(self.store.clone(), key)
        })
    }

    pub fn state(&self) -> Result<&State> {
        self.mesoregion()?.state()
    }

    pub fn macroregion(&self) -> Result<&Macroregion> {
        Ok(self.state()?.macroregion())
    }

    pub fn municipalities(&self) -> Result<&[Municipality]> {
        let municipalities = self.municipalities.get_or_load("microregion.municipalities", || {
            let rows = self.store.cities(&CityFilter::Microregion(self.id))?;
            Ok(rows
                .into_iter()
                .map(|row| Municipality::from_row(self.store.clone(), row, Some(self.detached())))
                .collect())
        })?;
        Ok(municipalities.as_slice())
    }
}

impl GeoEntity for Microregion {
    fn kind(&self) -> EntityKind {
        EntityKind::Microregion
    }

    fn natural_key(&self) -> NaturalKey {
        NaturalKey::Name(self.name.clone())
    }
}

impl PartialEq for Microregion {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Microregion {}

impl Hash for Microregion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Microregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Microregion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Microregion")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mesoregion", &self.mesoregion_name)
            .field("municipalities_loaded", &self.municipalities.is_loaded())
            .finish_non_exhaustive()
    }
}
