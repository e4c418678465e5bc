//! Entry point owning the store handle.

use std::fmt;
use std::sync::Arc;

use crate::config::GeoConfig;
use crate::error::Result;
use crate::geo::{
    Macroregion, MacroregionKey, Mesoregion, MesoregionKey, Microregion, MicroregionKey,
    Municipality, State, StateKey,
};
use crate::store::{GeoStore, SharedStore};

/// Builds entities against one store.
///
/// ```no_run
/// use ibge::{Atlas, GeoConfig, StateKey};
///
/// let atlas = Atlas::open(&GeoConfig::from_env())?;
/// let rj = atlas.state(StateKey::uf("rj"))?;
/// for meso in rj.mesoregions()? {
///     println!("{} ({})", meso, meso.microregions()?.len());
/// }
/// # Ok::<(), ibge::GeoError>(())
/// ```
#[derive(Clone)]
pub struct Atlas {
    store: SharedStore,
}

impl Atlas {
    pub fn new(store: impl GeoStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn with_shared(store: SharedStore) -> Self {
        Self { store }
    }

    /// Open the SQLite store named by `config`.
    pub fn open(config: &GeoConfig) -> Result<Self> {
        Ok(Self::new(config.open_store()?))
    }

    pub fn from_env() -> Result<Self> {
        Self::open(&GeoConfig::from_env())
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn macroregion(&self, key: MacroregionKey) -> Result<Macroregion> {
        Macroregion::lookup(self.store.clone(), key)
    }

    /// All five macroregions, no query involved.
    pub fn macroregions(&self) -> Vec<Macroregion> {
        Macroregion::all(&self.store)
    }

    pub fn state(&self, key: StateKey) -> Result<State> {
        State::lookup(self.store.clone(), key)
    }

    pub fn mesoregion(&self, key: MesoregionKey) -> Result<Mesoregion> {
        Mesoregion::lookup(self.store.clone(), key)
    }

    pub fn microregion(&self, key: MicroregionKey) -> Result<Microregion> {
        Microregion::lookup(self.store.clone(), key)
    }

    pub fn municipality(&self, code: impl fmt::Display) -> Result<Municipality> {
        Municipality::new(self.store.clone(), code)
    }
}

impl fmt::Debug for Atlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atlas").finish_non_exhaustive()
    }
}
