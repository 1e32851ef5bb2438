//! The monitoring instance.
//!
//! Holds the observers attached to a run. The engine feeds them after the
//! model at each stage, in registration order, stopping at the first error
//! like the model does.

use crate::errors::CatenaResult;
use crate::logger::SimulationLogger;
use crate::observer::{Observer, ObserverContext};
use crate::parameters::ParameterSet;
use crate::runenv::RunEnvironment;
use crate::signature::ComponentId;
use crate::spatial::SpatialDomain;
use crate::status::SimulationStatus;

#[derive(Debug)]
pub struct ObserverItem {
    id: ComponentId,
    parameters: ParameterSet,
    observer: Box<dyn Observer>,
}

impl ObserverItem {
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

/// The ordered set of observers attached to a run.
#[derive(Debug, Default)]
pub struct MonitoringInstance {
    items: Vec<ObserverItem>,
}

impl MonitoringInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(
        &mut self,
        id: impl Into<ComponentId>,
        observer: Box<dyn Observer>,
        parameters: ParameterSet,
    ) {
        self.items.push(ObserverItem {
            id: id.into(),
            parameters,
            observer,
        });
    }

    pub fn items(&self) -> &[ObserverItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn call_init_params(
        &mut self,
        domain: &SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx =
                ObserverContext::new(&item.id, &item.parameters, domain, status, logger, run_env);
            item.observer.init_params(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn call_on_prepared(
        &mut self,
        domain: &SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx =
                ObserverContext::new(&item.id, &item.parameters, domain, status, logger, run_env);
            item.observer.on_prepared(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn call_on_initialized_run(
        &mut self,
        domain: &SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx =
                ObserverContext::new(&item.id, &item.parameters, domain, status, logger, run_env);
            item.observer.on_initialized_run(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn call_on_step_completed(
        &mut self,
        domain: &SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx =
                ObserverContext::new(&item.id, &item.parameters, domain, status, logger, run_env);
            item.observer.on_step_completed(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn call_on_finalized_run(
        &mut self,
        domain: &SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx =
                ObserverContext::new(&item.id, &item.parameters, domain, status, logger, run_env);
            item.observer.on_finalized_run(&mut ctx)?;
        }
        Ok(())
    }
}
