//! CSV export of produced variables.
//!
//! Buffers every value recorded during the run and writes one CSV file per
//! (class, unit, variable) into the output directory when the run
//! finalizes. Files are named `{class}{id}_{variable}.csv` and hold one
//! `time{colsep}value` line per produced value.

use catena_core::errors::CatenaResult;
use catena_core::observer::{Observer, ObserverContext};
use catena_core::signature::{ParameterRequest, Signature};
use indexmap::IndexMap;
use std::fs;

/// Column separator parameter.
pub const PARAM_COLSEP: &str = "colsep";

const DEFAULT_COLSEP: &str = ";";

/// Writes every variable of every unit to per-variable CSV files.
#[derive(Debug)]
pub struct CsvFilesObserver {
    colsep: String,
    buffers: IndexMap<String, String>,
}

impl CsvFilesObserver {
    pub fn new() -> Self {
        CsvFilesObserver {
            colsep: DEFAULT_COLSEP.to_string(),
            buffers: IndexMap::new(),
        }
    }

    /// Buffer the values produced exactly at the current index.
    fn record_latest(&mut self, ctx: &ObserverContext) {
        let index = ctx.status().current_index();
        let date = ctx.status().date_of(index).to_rfc3339();
        for unit in ctx.domain().units() {
            for (name, series) in unit.variables().iter() {
                let latest = match series.latest() {
                    Some(latest) if latest.index == index => latest,
                    _ => continue,
                };
                let file_name = format!("{}{}_{}.csv", unit.class(), unit.id(), name);
                let header = format!("time{}value\n", self.colsep);
                let line = format!("{}{}{}\n", date, self.colsep, latest.value);
                self.buffers.entry(file_name).or_insert(header).push_str(&line);
            }
        }
    }
}

impl Default for CsvFilesObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for CsvFilesObserver {
    fn signature(&self) -> Signature {
        Signature::new("export.vars.csv")
            .with_name("CSV files exporter")
            .uses_parameter(
                ParameterRequest::new(PARAM_COLSEP).with_description("column separator"),
            )
    }

    fn init_params(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        if let Some(sep) = ctx.parameter(PARAM_COLSEP) {
            self.colsep = sep.as_str().to_string();
        }
        Ok(())
    }

    fn on_initialized_run(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.record_latest(ctx);
        Ok(())
    }

    fn on_step_completed(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.record_latest(ctx);
        Ok(())
    }

    fn on_finalized_run(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        for (file_name, contents) in &self.buffers {
            let path = ctx.run_env().output_full_path(file_name);
            fs::write(&path, contents)
                .map_err(|e| ctx.raise_error(format!("cannot write '{}': {e}", path.display())))?;
        }
        Ok(())
    }
}
