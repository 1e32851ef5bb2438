//! Observer components.
//!
//! Observers watch a run without touching it: they get a read-only view
//! of the spatial domain after each engine stage or step and typically
//! export values or report progress. They have no access to the model's
//! global parameters, only their own set.

use crate::errors::{CatenaError, CatenaResult};
use crate::logger::SimulationLogger;
use crate::parameters::{resolve_required_parameter, ParamValue, ParameterSet, ParameterTree};
use crate::runenv::RunEnvironment;
use crate::signature::{ComponentId, Signature};
use crate::spatial::SpatialDomain;
use crate::status::SimulationStatus;
use std::fmt::Debug;

/// Everything an observer can reach during one hook call.
#[derive(Debug)]
pub struct ObserverContext<'a> {
    component: &'a ComponentId,
    parameters: &'a ParameterSet,
    domain: &'a SpatialDomain,
    status: &'a SimulationStatus,
    logger: &'a mut SimulationLogger,
    run_env: &'a RunEnvironment,
}

impl<'a> ObserverContext<'a> {
    pub(crate) fn new(
        component: &'a ComponentId,
        parameters: &'a ParameterSet,
        domain: &'a SpatialDomain,
        status: &'a SimulationStatus,
        logger: &'a mut SimulationLogger,
        run_env: &'a RunEnvironment,
    ) -> Self {
        ObserverContext {
            component,
            parameters,
            domain,
            status,
            logger,
            run_env,
        }
    }

    pub fn component_id(&self) -> &ComponentId {
        self.component
    }

    pub fn domain(&self) -> &SpatialDomain {
        self.domain
    }

    pub fn status(&self) -> &SimulationStatus {
        self.status
    }

    pub fn run_env(&self) -> &RunEnvironment {
        self.run_env
    }

    pub fn parameters(&self) -> &ParameterSet {
        self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }

    pub fn require_parameter(&self, name: &str) -> CatenaResult<&ParamValue> {
        resolve_required_parameter(self.parameters, None, name, self.component)
    }

    pub fn parameters_tree(&self) -> ParameterTree {
        ParameterTree::from_set(self.parameters)
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.logger.info(self.component.as_str(), message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.logger.warning(self.component.as_str(), message);
    }

    pub fn raise_error(&self, message: impl Into<String>) -> CatenaError {
        CatenaError::Component {
            component: self.component.clone(),
            message: message.into(),
        }
    }
}

/// A monitoring component fed by the engine as the run advances.
pub trait Observer: Debug {
    fn signature(&self) -> Signature;

    fn init_params(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        Ok(())
    }

    /// Called once the model passed its consistency checks.
    fn on_prepared(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        Ok(())
    }

    /// Called after all simulators initialized, with initial values stored.
    fn on_initialized_run(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        Ok(())
    }

    /// Called after each processed time point.
    fn on_step_completed(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        Ok(())
    }

    /// Called after all simulators finalized.
    fn on_finalized_run(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SchedulingConstraint;
    use chrono::{TimeZone, Utc};

    #[test]
    fn required_parameters_have_no_global_fallback() {
        let component = ComponentId::from("obs.test");
        let parameters = ParameterSet::new().with("format", "csv");
        let domain = SpatialDomain::new();
        let status = SimulationStatus::new(
            Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2001, 1, 2, 0, 0, 0).unwrap(),
            3600,
            SchedulingConstraint::None,
        )
        .unwrap();
        let mut logger = SimulationLogger::new();
        let run_env = RunEnvironment::new("in", "out");

        let ctx = ObserverContext::new(
            &component,
            &parameters,
            &domain,
            &status,
            &mut logger,
            &run_env,
        );
        assert_eq!(ctx.require_parameter("format").unwrap().as_str(), "csv");
        assert!(matches!(
            ctx.require_parameter("colsep"),
            Err(CatenaError::MissingParameter { .. })
        ));
    }
}
