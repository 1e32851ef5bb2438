//! Simulator components.
//!
//! A simulator implements the stage hooks the engine drives: parameter
//! initialization, data preparation, consistency checking, then the
//! initialize/run/finalize sequence. Each hook receives a
//! [`SimulatorContext`] scoped to the calling component, which is the only
//! handle to the spatial domain, the parameters and the logger.

use crate::errors::{CatenaError, CatenaResult};
use crate::logger::SimulationLogger;
use crate::parameters::{resolve_required_parameter, ParamValue, ParameterSet, ParameterTree};
use crate::runenv::RunEnvironment;
use crate::signature::{ComponentId, Signature};
use crate::spatial::SpatialDomain;
use crate::status::SimulationStatus;
use crate::time::SchedulingRequest;
use std::fmt::Debug;

/// Everything a simulator can reach during one hook call.
#[derive(Debug)]
pub struct SimulatorContext<'a> {
    component: &'a ComponentId,
    parameters: &'a ParameterSet,
    global_parameters: &'a ParameterSet,
    domain: &'a mut SpatialDomain,
    status: &'a SimulationStatus,
    logger: &'a mut SimulationLogger,
    run_env: &'a RunEnvironment,
}

impl<'a> SimulatorContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        component: &'a ComponentId,
        parameters: &'a ParameterSet,
        global_parameters: &'a ParameterSet,
        domain: &'a mut SpatialDomain,
        status: &'a SimulationStatus,
        logger: &'a mut SimulationLogger,
        run_env: &'a RunEnvironment,
    ) -> Self {
        SimulatorContext {
            component,
            parameters,
            global_parameters,
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

    pub fn domain_mut(&mut self) -> &mut SpatialDomain {
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

    /// Local parameter if set, otherwise the global one.
    pub fn parameter(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .get(name)
            .or_else(|| self.global_parameters.get(name))
    }

    /// Like [`Self::parameter`] but failing on absent or empty values. A
    /// parameter set locally to an empty string fails without falling back
    /// to the global set.
    pub fn require_parameter(&self, name: &str) -> CatenaResult<&ParamValue> {
        resolve_required_parameter(
            self.parameters,
            Some(self.global_parameters),
            name,
            self.component,
        )
    }

    /// Dot-structured view of the effective parameters, local entries
    /// overriding global ones.
    pub fn parameters_tree(&self) -> ParameterTree {
        let merged: ParameterSet = self
            .global_parameters
            .iter()
            .chain(self.parameters.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        ParameterTree::from_set(&merged)
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.logger.info(self.component.as_str(), message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.logger.warning(self.component.as_str(), message);
    }

    /// Build a component error carrying this component's id.
    pub fn raise_error(&self, message: impl Into<String>) -> CatenaError {
        CatenaError::Component {
            component: self.component.clone(),
            message: message.into(),
        }
    }
}

/// A simulation component producing or transforming variables.
///
/// Only [`Simulator::signature`] is mandatory. Stage hooks default to doing
/// nothing; the two stepped hooks default to requesting the default
/// delta-t, which keeps a plain component synchronous with the run clock.
pub trait Simulator: Debug {
    fn signature(&self) -> Signature;

    fn init_params(&mut self, _ctx: &mut SimulatorContext) -> CatenaResult<()> {
        Ok(())
    }

    fn prepare_data(&mut self, _ctx: &mut SimulatorContext) -> CatenaResult<()> {
        Ok(())
    }

    fn check_consistency(&mut self, _ctx: &mut SimulatorContext) -> CatenaResult<()> {
        Ok(())
    }

    fn initialize_run(&mut self, _ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn run_step(&mut self, _ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn finalize_run(&mut self, _ctx: &mut SimulatorContext) -> CatenaResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SchedulingConstraint;
    use chrono::TimeZone;
    use chrono::Utc;

    struct Fixture {
        component: ComponentId,
        parameters: ParameterSet,
        global_parameters: ParameterSet,
        domain: SpatialDomain,
        status: SimulationStatus,
        logger: SimulationLogger,
        run_env: RunEnvironment,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                component: ComponentId::from("sim.test"),
                parameters: ParameterSet::new().with("local", "1").with("both", "local"),
                global_parameters: ParameterSet::new()
                    .with("global", "2")
                    .with("both", "global"),
                domain: SpatialDomain::new(),
                status: SimulationStatus::new(
                    Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2001, 1, 2, 0, 0, 0).unwrap(),
                    3600,
                    SchedulingConstraint::None,
                )
                .unwrap(),
                logger: SimulationLogger::new(),
                run_env: RunEnvironment::new("in", "out"),
            }
        }

        fn context(&mut self) -> SimulatorContext<'_> {
            SimulatorContext::new(
                &self.component,
                &self.parameters,
                &self.global_parameters,
                &mut self.domain,
                &self.status,
                &mut self.logger,
                &self.run_env,
            )
        }
    }

    #[test]
    fn parameter_precedence() {
        let mut fixture = Fixture::new();
        let ctx = fixture.context();
        assert_eq!(ctx.parameter("local").unwrap().as_str(), "1");
        assert_eq!(ctx.parameter("global").unwrap().as_str(), "2");
        assert_eq!(ctx.parameter("both").unwrap().as_str(), "local");
        assert!(ctx.parameter("absent").is_none());
        assert!(ctx.require_parameter("absent").is_err());
    }

    #[test]
    fn tree_overlays_local_over_global() {
        let mut fixture = Fixture::new();
        let tree = fixture.context().parameters_tree();
        assert_eq!(tree.value("both").unwrap().as_str(), "local");
        assert_eq!(tree.value("global").unwrap().as_str(), "2");
    }

    #[test]
    fn logging_carries_sender() {
        let mut fixture = Fixture::new();
        let mut ctx = fixture.context();
        ctx.log_warning("storage below threshold");
        let err = ctx.raise_error("sim failed");
        assert!(matches!(
            err,
            CatenaError::Component { component, .. } if component.as_str() == "sim.test"
        ));
        assert_eq!(fixture.logger.entries().len(), 1);
        assert_eq!(fixture.logger.entries()[0].sender, "sim.test");
    }
}
