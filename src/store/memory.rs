//! In-memory store
//!
//! Holds the five record sets as plain vectors. Used as a fixture store and
//! for embedding small extracts without a database file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    same_name, CityFilter, CityRow, GeoStore, MacroregionFilter, MacroregionRow, MesoregionFilter,
    MesoregionRow, MicroregionFilter, MicroregionRow, StateFilter, StateRow,
};
use crate::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    pub macroregions: Vec<MacroregionRow>,
    pub states: Vec<StateRow>,
    pub mesoregions: Vec<MesoregionRow>,
    pub microregions: Vec<MicroregionRow>,
    pub cities: Vec<CityRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a `.json`, `.yaml` or `.yml` extract.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            _ => Self::from_json_str(&text),
        }
    }
}

fn select<T: Clone>(rows: &[T], keep: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter().filter(|r| keep(r)).cloned().collect()
}

impl GeoStore for MemoryStore {
    fn macroregions(&self, filter: &MacroregionFilter) -> Result<Vec<MacroregionRow>> {
        Ok(select(&self.macroregions, |r| match filter {
            MacroregionFilter::All => true,
            MacroregionFilter::Code(code) => r.id == *code,
        }))
    }

    fn states(&self, filter: &StateFilter) -> Result<Vec<StateRow>> {
        Ok(select(&self.states, |r| match filter {
            StateFilter::Code(code) => r.id == *code,
            StateFilter::Uf(uf) => r.uf == *uf,
            StateFilter::Macroregion(code) => r.macroregion == *code,
        }))
    }

    fn mesoregions(&self, filter: &MesoregionFilter) -> Result<Vec<MesoregionRow>> {
        Ok(select(&self.mesoregions, |r| match filter {
            MesoregionFilter::Name(name) => same_name(&r.name, name),
            MesoregionFilter::NameInState { name, state } => r.state == *state && same_name(&r.name, name),
            MesoregionFilter::State(state) => r.state == *state,
        }))
    }

    fn microregions(&self, filter: &MicroregionFilter) -> Result<Vec<MicroregionRow>> {
        Ok(select(&self.microregions, |r| match filter {
            MicroregionFilter::Id(id) => r.id == *id,
            MicroregionFilter::Name(name) => same_name(&r.name, name),
            MicroregionFilter::NameInMesoregion { name, mesoregion } => {
                same_name(&r.name, name) && same_name(&r.mesoregion, mesoregion)
            }
            MicroregionFilter::Mesoregion(mesoregion) => r.mesoregion == *mesoregion,
        }))
    }

    fn cities(&self, filter: &CityFilter) -> Result<Vec<CityRow>> {
        Ok(select(&self.cities, |r| match filter {
            CityFilter::Code(code) => r.id == *code,
            CityFilter::Microregion(id) => r.microregion == *id,
        }))
    }
}
