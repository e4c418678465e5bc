//! Shared fixtures: a small IBGE extract in a temporary SQLite file and a
//! store wrapper that counts queries per record set.
#![allow(dead_code)]

use ibge::store::{
    CityFilter, CityRow, MacroregionFilter, MacroregionRow, MesoregionFilter, MesoregionRow,
    MicroregionFilter, MicroregionRow, StateFilter, StateRow,
};
use ibge::{GeoStore, Result, SharedStore, SqliteStore};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SCHEMA: &str = r#"
CREATE TABLE macroregions (id INTEGER, name VARCHAR);
CREATE TABLE states (id INTEGER, name VARCHAR, macroregion INTEGER, uf VARCHAR);
CREATE TABLE mesoregions (name VARCHAR, state INTEGER, geographic_id INTEGER);
CREATE TABLE microregions (id INTEGER, name VARCHAR, mesoregion VARCHAR, geographic_id INTEGER);
CREATE TABLE cities (
    id INTEGER, name VARCHAR, microregion INTEGER,
    latitude FLOAT, longitude FLOAT, timezone VARCHAR
);
"#;

const DATA: &str = r#"
INSERT INTO macroregions VALUES
    (1, 'Norte'), (2, 'Nordeste'), (3, 'Centro-Oeste'), (4, 'Sudeste'), (5, 'Sul');

INSERT INTO states VALUES
    (11, 'Rondônia', 1, 'RO'),
    (13, 'Amazonas', 1, 'AM'),
    (24, 'Rio Grande do Norte', 2, 'RN'),
    (25, 'Paraíba', 2, 'PB'),
    (33, 'Rio de Janeiro', 4, 'RJ'),
    (35, 'São Paulo', 4, 'SP');

INSERT INTO mesoregions VALUES
    ('Madeira-Guaporé', 11, 1101),
    ('Leste Rondoniense', 11, 1102),
    ('Centro Amazonense', 13, 1303),
    ('Sul Amazonense', 13, 1304),
    ('Leste Potiguar', 24, 2404),
    ('Mata Paraibana', 25, 2504),
    ('Noroeste Fluminense', 33, 3301),
    ('Metropolitana do Rio de Janeiro', 33, 3306),
    ('Metropolitana de São Paulo', 35, 3515);

INSERT INTO microregions VALUES
    (11001, 'Porto Velho', 'Madeira-Guaporé', 11001),
    (11002, 'Guajará-Mirim', 'Madeira-Guaporé', 11002),
    (11003, 'Ariquemes', 'Leste Rondoniense', 11003),
    (11004, 'Ji-Paraná', 'Leste Rondoniense', 11004),
    (13007, 'Manaus', 'Centro Amazonense', 13007),
    (13008, 'Rio Preto da Eva', 'Centro Amazonense', 13008),
    (13011, 'Madeira', 'Sul Amazonense', 13011),
    (24017, 'Natal', 'Leste Potiguar', 24017),
    (24018, 'Litoral Sul', 'Leste Potiguar', 24018),
    (25022, 'João Pessoa', 'Mata Paraibana', 25022),
    (25023, 'Litoral Sul', 'Mata Paraibana', 25023),
    (33001, 'Itaperuna', 'Noroeste Fluminense', 33001),
    (33018, 'Rio de Janeiro', 'Metropolitana do Rio de Janeiro', 33018),
    (35061, 'São Paulo', 'Metropolitana de São Paulo', 35061);

INSERT INTO cities VALUES
    (1100205, 'Porto Velho', 11001, -8.76077, -63.8999, 'America/Porto_Velho'),
    (1302603, 'Manaus', 13007, -3.11866, -60.0212, 'America/Manaus'),
    (2507507, 'João Pessoa', 25022, -7.11509, -34.8641, 'America/Fortaleza'),
    (3304557, 'Rio de Janeiro', 33018, -22.9129, -43.2003, 'America/Sao_Paulo'),
    (3303302, 'Niterói', 33018, -22.8832, -43.1034, 'America/Sao_Paulo');
"#;

/// Temporary database file, removed when dropped.
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("ibge.sqlite");
        let conn = Connection::open(&path).expect("create fixture database");
        conn.execute_batch(SCHEMA).expect("create schema");
        conn.execute_batch(DATA).expect("load fixture rows");
        Self { _dir: dir, path }
    }

    pub fn sqlite(&self) -> SqliteStore {
        SqliteStore::open(&self.path).expect("open fixture store")
    }

    pub fn shared(&self) -> SharedStore {
        Arc::new(self.sqlite())
    }

    /// A shared store plus the counter observing it.
    pub fn counted(&self) -> (Arc<CountingStore<SqliteStore>>, SharedStore) {
        let counting = Arc::new(CountingStore::new(self.sqlite()));
        let shared: SharedStore = counting.clone();
        (counting, shared)
    }
}

pub struct CountingStore<S> {
    inner: S,
    counts: Mutex<HashMap<&'static str, usize>>,
}

impl<S: GeoStore> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counts: Mutex::new(HashMap::new()),
        }
    }

    fn hit(&self, table: &'static str) {
        *self.counts.lock().unwrap().entry(table).or_insert(0) += 1;
    }

    pub fn count(&self, table: &str) -> usize {
        self.counts.lock().unwrap().get(table).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }
}

impl<S: GeoStore> GeoStore for CountingStore<S> {
    fn macroregions(&self, filter: &MacroregionFilter) -> Result<Vec<MacroregionRow>> {
        self.hit("macroregions");
        self.inner.macroregions(filter)
    }

    fn states(&self, filter: &StateFilter) -> Result<Vec<StateRow>> {
        self.hit("states");
        self.inner.states(filter)
    }

    fn mesoregions(&self, filter: &MesoregionFilter) -> Result<Vec<MesoregionRow>> {
        self.hit("mesoregions");
        self.inner.mesoregions(filter)
    }

    fn microregions(&self, filter: &MicroregionFilter) -> Result<Vec<MicroregionRow>> {
        self.hit("microregions");
        self.inner.microregions(filter)
    }

    fn cities(&self, filter: &CityFilter) -> Result<Vec<CityRow>> {
        self.hit("cities");
        self.inner.cities(filter)
    }
}
