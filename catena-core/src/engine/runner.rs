//! Engine struct and stage execution.

use crate::errors::{CatenaError, CatenaResult};
use crate::listener::RunListener;
use crate::logger::SimulationLogger;
use crate::model::ModelInstance;
use crate::monitoring::MonitoringInstance;
use crate::runenv::RunEnvironment;
use crate::spatial::SpatialDomain;
use crate::status::{SimulationStage, SimulationStatus, StageOutcome};
use std::fs;
use tracing::{debug, info};

use super::checks;

/// Name of the message log file written into the output directory.
pub const MESSAGES_FILE: &str = "messages.log";

/// Drives one simulation through its stages.
///
/// The engine borrows every part of the simulation for the duration of the
/// run; [`super::Simulation`] owns those parts and hands out engines. Each
/// stage method reports its outcome to the listener, grading the stage
/// WARNING when any warning was logged during it, and ERROR when it failed.
/// Failing stages also flush the message log to the output directory so the
/// context of the failure survives the aborted run.
pub struct Engine<'a> {
    model: &'a mut ModelInstance,
    monitoring: &'a mut MonitoringInstance,
    domain: &'a mut SpatialDomain,
    status: &'a mut SimulationStatus,
    logger: &'a mut SimulationLogger,
    run_env: &'a RunEnvironment,
    listener: &'a mut dyn RunListener,
}

fn prepare_output_dir(run_env: &RunEnvironment) -> CatenaResult<()> {
    let path = run_env.output_dir();
    if run_env.clear_output_dir() && path.is_dir() {
        fs::remove_dir_all(path).map_err(|source| CatenaError::OutputDirCreation {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(path).map_err(|source| CatenaError::OutputDirCreation {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

impl<'a> Engine<'a> {
    /// Set up an engine, preparing the output directory.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        model: &'a mut ModelInstance,
        monitoring: &'a mut MonitoringInstance,
        domain: &'a mut SpatialDomain,
        status: &'a mut SimulationStatus,
        logger: &'a mut SimulationLogger,
        run_env: &'a RunEnvironment,
        listener: &'a mut dyn RunListener,
    ) -> CatenaResult<Self> {
        prepare_output_dir(run_env)?;
        info!(
            begin = %status.begin_date(),
            end = %status.end_date(),
            delta_t = status.default_delta_t(),
            simulators = model.len(),
            observers = monitoring.len(),
            "simulation ready"
        );
        Ok(Engine {
            model,
            monitoring,
            domain,
            status,
            logger,
            run_env,
            listener,
        })
    }

    fn begin_stage(&mut self, stage: SimulationStage) {
        self.status.set_stage(stage);
        debug!(stage = %stage, "stage started");
        self.listener.on_stage_started(stage);
    }

    /// Grade and report a finished stage, consuming the warning flag. An
    /// error is logged and reported before being handed back to the caller.
    fn finish_stage(&mut self, stage: SimulationStage, result: CatenaResult<()>) -> CatenaResult<()> {
        match result {
            Ok(()) => {
                let outcome = if self.logger.take_warning_flag() {
                    StageOutcome::Warning
                } else {
                    StageOutcome::Ok
                };
                debug!(stage = %stage, outcome = %outcome, "stage completed");
                self.listener.on_stage_completed(stage, outcome);
                Ok(())
            }
            Err(error) => {
                self.logger.error("engine", error.to_string());
                self.listener.on_stage_completed(stage, StageOutcome::Error);
                let _ = self
                    .logger
                    .write_to(&self.run_env.output_full_path(MESSAGES_FILE));
                Err(error)
            }
        }
    }

    /// INITPARAMS: hand every simulator, then every observer, its
    /// parameters.
    pub fn init_params(&mut self) -> CatenaResult<()> {
        self.begin_stage(SimulationStage::InitParams);
        let result = self
            .model
            .call_init_params(self.domain, self.status, self.logger, self.run_env)
            .and_then(|()| {
                self.monitoring
                    .call_init_params(self.domain, self.status, self.logger, self.run_env)
            });
        self.finish_stage(SimulationStage::InitParams, result)
    }

    /// PREPAREDATA: let simulators prepare or derive their input data.
    pub fn prepare_data(&mut self) -> CatenaResult<()> {
        self.begin_stage(SimulationStage::PrepareData);
        let result = self
            .model
            .call_prepare_data(self.domain, self.status, self.logger, self.run_env);
        self.finish_stage(SimulationStage::PrepareData, result)
    }

    /// CHECKCONSISTENCY: validate every signature against the domain and
    /// the parameters, then run the components' own consistency hooks.
    pub fn check_consistency(&mut self) -> CatenaResult<()> {
        self.begin_stage(SimulationStage::CheckConsistency);
        let result = self.run_consistency_checks();
        self.finish_stage(SimulationStage::CheckConsistency, result)
    }

    fn run_consistency_checks(&mut self) -> CatenaResult<()> {
        if self.model.is_empty() {
            return Err(CatenaError::EmptyModel);
        }
        checks::check_extra_files(self.model, self.run_env)?;
        checks::check_model_consistency(self.model, self.domain)?;
        checks::check_attributes_consistency(self.model, self.domain)?;
        checks::check_parameters_consistency(self.model)?;
        self.model
            .call_check_consistency(self.domain, self.status, self.logger, self.run_env)?;
        self.monitoring
            .call_on_prepared(self.domain, self.status, self.logger, self.run_env)?;
        Ok(())
    }

    /// Run the stepped part of the lifecycle: INITIALIZERUN, the RUNSTEP
    /// loop, FINALIZERUN and POST.
    pub fn run(&mut self) -> CatenaResult<()> {
        self.begin_stage(SimulationStage::InitializeRun);
        let result = self.run_initialize();
        self.finish_stage(SimulationStage::InitializeRun, result)?;

        self.begin_stage(SimulationStage::RunStep);
        let result = self.run_steps();
        self.finish_stage(SimulationStage::RunStep, result)?;

        self.begin_stage(SimulationStage::FinalizeRun);
        let result = self
            .model
            .call_finalize_run(self.domain, self.status, self.logger, self.run_env)
            .and_then(|()| {
                self.monitoring
                    .call_on_finalized_run(self.domain, self.status, self.logger, self.run_env)
            });
        self.finish_stage(SimulationStage::FinalizeRun, result)?;

        // POST is a status state, not a reported stage: the listener only
        // ever sees the six stages from INITPARAMS to FINALIZERUN.
        self.status.set_stage(SimulationStage::Post);
        self.write_messages()?;

        info!(
            final_index = self.status.current_index().seconds(),
            warnings = self.logger.warning_count(),
            "run finished"
        );
        Ok(())
    }

    fn run_initialize(&mut self) -> CatenaResult<()> {
        checks::check_vars_production(self.domain, 0)?;
        self.model
            .call_initialize_run(self.domain, self.status, self.logger, self.run_env)?;
        self.monitoring
            .call_on_initialized_run(self.domain, self.status, self.logger, self.run_env)?;
        checks::check_vars_production(self.domain, 1)?;
        Ok(())
    }

    fn run_steps(&mut self) -> CatenaResult<()> {
        while let Some(next) = self.model.next_time_point() {
            self.status.set_current_index(next);
            self.model
                .process_next_time_point(self.domain, self.status, self.logger, self.run_env)?;
            self.monitoring
                .call_on_step_completed(self.domain, self.status, self.logger, self.run_env)?;
            self.listener.on_step_completed(next);
        }
        Ok(())
    }

    fn write_messages(&mut self) -> CatenaResult<()> {
        self.logger
            .write_to(&self.run_env.output_full_path(MESSAGES_FILE))?;
        Ok(())
    }
}
