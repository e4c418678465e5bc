//! Geographic Data Store Interface
//!
//! The entity graph consumes a single capability: run a read query against one
//! of five record sets and get back fully materialized rows. Implementations
//! hold no connection between calls.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;

/// Store handle shared by every entity built from it.
pub type SharedStore = Arc<dyn GeoStore>;

/// Row of `macroregions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroregionRow {
    pub id: u8,
    pub name: String,
}

/// Row of `states`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRow {
    pub id: u32,
    pub name: String,
    pub macroregion: u8,
    pub uf: String,
}

/// Row of `mesoregions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MesoregionRow {
    pub name: String,
    pub state: u32,
    pub geographic_id: u32,
}

/// Row of `microregions`. `mesoregion` references the owner by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroregionRow {
    pub id: u32,
    pub name: String,
    pub mesoregion: String,
    pub geographic_id: u32,
}

/// Row of `cities`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRow {
    pub id: u32,
    pub name: String,
    pub microregion: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MacroregionFilter {
    All,
    Code(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StateFilter {
    Code(u32),
    /// Exact, already uppercased abbreviation
    Uf(String),
    Macroregion(u8),
}

/// Name filters match case-insensitively (see [`fold_name`]).
#[derive(Debug, Clone, PartialEq)]
pub enum MesoregionFilter {
    Name(String),
    NameInState { name: String, state: u32 },
    State(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MicroregionFilter {
    Id(u32),
    Name(String),
    NameInMesoregion { name: String, mesoregion: String },
    Mesoregion(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CityFilter {
    Code(u32),
    Microregion(u32),
}

/// Read-only access to the geographic record sets.
///
/// Each call is one blocking round-trip. Rows come back in the store's
/// natural order.
pub trait GeoStore: Send + Sync {
    fn macroregions(&self, filter: &MacroregionFilter) -> Result<Vec<MacroregionRow>>;

    fn states(&self, filter: &StateFilter) -> Result<Vec<StateRow>>;

    fn mesoregions(&self, filter: &MesoregionFilter) -> Result<Vec<MesoregionRow>>;

    fn microregions(&self, filter: &MicroregionFilter) -> Result<Vec<MicroregionRow>>;

    fn cities(&self, filter: &CityFilter) -> Result<Vec<CityRow>>;
}

impl<S: GeoStore + ?Sized> GeoStore for Arc<S> {
    fn macroregions(&self, filter: &MacroregionFilter) -> Result<Vec<MacroregionRow>> {
        (**self).macroregions(filter)
    }

    fn states(&self, filter: &StateFilter) -> Result<Vec<StateRow>> {
        (**self).states(filter)
    }

    fn mesoregions(&self, filter: &MesoregionFilter) -> Result<Vec<MesoregionRow>> {
        (**self).mesoregions(filter)
    }

    fn microregions(&self, filter: &MicroregionFilter) -> Result<Vec<MicroregionRow>> {
        (**self).microregions(filter)
    }

    fn cities(&self, filter: &CityFilter) -> Result<Vec<CityRow>> {
        (**self).cities(filter)
    }
}

/// Case folding used for every name comparison.
///
/// Full Unicode lowercase, so `MÉDIO AMAZONAS` matches `Médio Amazonas`.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a == b || fold_name(a) == fold_name(b)
}
