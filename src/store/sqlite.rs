//! SQLite adapter for the geographic store.
//!
//! A read-only connection is opened for every query, one statement is run,
//! all rows are collected and the connection is dropped before returning.

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OpenFlags, Params, Row};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{
    fold_name, CityFilter, CityRow, GeoStore, MacroregionFilter, MacroregionRow, MesoregionFilter,
    MesoregionRow, MicroregionFilter, MicroregionRow, StateFilter, StateRow,
};
use crate::error::{GeoError, Result};

/// SQL function applying [`fold_name`] to a column.
const FOLD_FN: &str = "ibge_fold";

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Point at an existing database file. Fails if the file is missing.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let path = db_path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(GeoError::StoreUnavailable { path });
        }
        Ok(Self { db_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.create_scalar_function(
            FOLD_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: Option<String> = ctx.get(0)?;
                Ok(value.map(|v| fold_name(&v)))
            },
        )?;
        Ok(conn)
    }

    fn fetch<T, P, F>(&self, table: &'static str, filter: &dyn Debug, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, map)?
            .collect::<rusqlite::Result<Vec<T>>>()?;
        debug!(table, ?filter, rows = rows.len(), "store query");
        Ok(rows)
    }
}

fn macroregion_row(row: &Row<'_>) -> rusqlite::Result<MacroregionRow> {
    Ok(MacroregionRow {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn state_row(row: &Row<'_>) -> rusqlite::Result<StateRow> {
    Ok(StateRow {
        id: row.get("id")?,
        name: row.get("name")?,
        macroregion: row.get("macroregion")?,
        uf: row.get("uf")?,
    })
}

fn mesoregion_row(row: &Row<'_>) -> rusqlite::Result<MesoregionRow> {
    Ok(MesoregionRow {
        name: row.get("name")?,
        state: row.get("state")?,
        geographic_id: row.get("geographic_id")?,
    })
}

fn microregion_row(row: &Row<'_>) -> rusqlite::Result<MicroregionRow> {
    Ok(MicroregionRow {
        id: row.get("id")?,
        name: row.get("name")?,
        mesoregion: row.get("mesoregion")?,
        geographic_id: row.get("geographic_id")?,
    })
}

fn city_row(row: &Row<'_>) -> rusqlite::Result<CityRow> {
    Ok(CityRow {
        id: row.get("id")?,
        name: row.get("name")?,
        microregion: row.get("microregion")?,
        latitude: row.get("latitude")?,
        longitude: row.get("longitude")?,
        timezone: row.get("timezone")?,
    })
}

impl GeoStore for SqliteStore {
    fn macroregions(&self, filter: &MacroregionFilter) -> Result<Vec<MacroregionRow>> {
        match filter {
            MacroregionFilter::All => self.fetch(
                "macroregions",
                filter,
                "SELECT id, name FROM macroregions",
                params![],
                macroregion_row,
            ),
            MacroregionFilter::Code(code) => self.fetch(
                "macroregions",
                filter,
                "SELECT id, name FROM macroregions WHERE id = ?1",
                params![code],
                macroregion_row,
            ),
        }
    }

    fn states(&self, filter: &StateFilter) -> Result<Vec<StateRow>> {
        const SELECT: &str = "SELECT id, name, macroregion, uf FROM states";
        match filter {
            StateFilter::Code(code) => self.fetch(
                "states",
                filter,
                &format!("{SELECT} WHERE id = ?1"),
                params![code],
                state_row,
            ),
            StateFilter::Uf(uf) => self.fetch(
                "states",
                filter,
                &format!("{SELECT} WHERE uf = ?1"),
                params![uf],
                state_row,
            ),
            StateFilter::Macroregion(code) => self.fetch(
                "states",
                filter,
                &format!("{SELECT} WHERE macroregion = ?1"),
                params![code],
                state_row,
            ),
        }
    }

    fn mesoregions(&self, filter: &MesoregionFilter) -> Result<Vec<MesoregionRow>> {
        const SELECT: &str = "SELECT name, state, geographic_id FROM mesoregions";
        match filter {
            MesoregionFilter::Name(name) => {
                let folded = fold_name(name);
                self.fetch(
                    "mesoregions",
                    filter,
                    &format!("{SELECT} WHERE {FOLD_FN}(name) = ?1"),
                    params![folded],
                    mesoregion_row,
                )
            }
            MesoregionFilter::NameInState { name, state } => {
                let folded = fold_name(name);
                self.fetch(
                    "mesoregions",
                    filter,
                    &format!("{SELECT} WHERE {FOLD_FN}(name) = ?1 AND state = ?2"),
                    params![folded, state],
                    mesoregion_row,
                )
            }
            MesoregionFilter::State(state) => self.fetch(
                "mesoregions",
                filter,
                &format!("{SELECT} WHERE state = ?1"),
                params![state],
                mesoregion_row,
            ),
        }
    }

    fn microregions(&self, filter: &MicroregionFilter) -> Result<Vec<MicroregionRow>> {
        const SELECT: &str = "SELECT id, name, mesoregion, geographic_id FROM microregions";
        match filter {
            MicroregionFilter::Id(id) => self.fetch(
                "microregions",
                filter,
                &format!("{SELECT} WHERE id = ?1"),
                params![id],
                microregion_row,
            ),
            MicroregionFilter::Name(name) => {
                let folded = fold_name(name);
                self.fetch(
                    "microregions",
                    filter,
                    &format!("{SELECT} WHERE {FOLD_FN}(name) = ?1"),
                    params![folded],
                    microregion_row,
                )
            }
            MicroregionFilter::NameInMesoregion { name, mesoregion } => {
                let folded = fold_name(name);
                let folded_owner = fold_name(mesoregion);
                self.fetch(
                    "microregions",
                    filter,
                    &format!("{SELECT} WHERE {FOLD_FN}(name) = ?1 AND {FOLD_FN}(mesoregion) = ?2"),
                    params![folded, folded_owner],
                    microregion_row,
                )
            }
            MicroregionFilter::Mesoregion(mesoregion) => self.fetch(
                "microregions",
                filter,
                &format!("{SELECT} WHERE mesoregion = ?1"),
                params![mesoregion],
                microregion_row,
            ),
        }
    }

    fn cities(&self, filter: &CityFilter) -> Result<Vec<CityRow>> {
        const SELECT: &str =
            "SELECT id, name, microregion, latitude, longitude, timezone FROM cities";
        match filter {
            CityFilter::Code(code) => self.fetch(
                "cities",
                filter,
                &format!("{SELECT} WHERE id = ?1"),
                params![code],
                city_row,
            ),
            CityFilter::Microregion(id) => self.fetch(
                "cities",
                filter,
                &format!("{SELECT} WHERE microregion = ?1"),
                params![id],
                city_row,
            ),
        }
    }
}
