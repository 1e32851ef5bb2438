//! The coupled model.
//!
//! A [`ModelInstance`] owns the ordered list of simulators with their
//! parameters, plus the time-point queue driving the stepped part of the
//! run. The engine drives every stage through the `call_*` methods; each
//! one iterates the simulators in registration order and stops at the
//! first error.

use crate::component::{Simulator, SimulatorContext};
use crate::errors::{CatenaError, CatenaResult};
use crate::logger::SimulationLogger;
use crate::parameters::{ParamValue, ParameterSet};
use crate::runenv::RunEnvironment;
use crate::signature::{ComponentId, Signature};
use crate::spatial::SpatialDomain;
use crate::status::{SchedulingConstraint, SimulationStatus};
use crate::time::{SchedulingRequest, TimeIndex};
use std::collections::BTreeMap;

/// One simulator slot in the model: its id, captured signature and local
/// parameters.
#[derive(Debug)]
pub struct ModelItem {
    id: ComponentId,
    signature: Signature,
    parameters: ParameterSet,
    simulator: Box<dyn Simulator>,
}

impl ModelItem {
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }
}

/// The ordered set of simulators coupled into one model.
#[derive(Debug, Default)]
pub struct ModelInstance {
    items: Vec<ModelItem>,
    global_parameters: ParameterSet,
    queue: BTreeMap<TimeIndex, Vec<usize>>,
}

impl ModelInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a simulator. Registration order is execution order within
    /// every stage and within every time point.
    pub fn add_simulator(
        &mut self,
        id: impl Into<ComponentId>,
        simulator: Box<dyn Simulator>,
        parameters: ParameterSet,
    ) {
        let signature = simulator.signature();
        self.items.push(ModelItem {
            id: id.into(),
            signature,
            parameters,
            simulator,
        });
    }

    pub fn set_global_parameter(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.global_parameters.insert(name, value);
    }

    /// Replace the whole global parameter set.
    pub fn set_global_parameters(&mut self, parameters: ParameterSet) {
        self.global_parameters = parameters;
    }

    pub fn global_parameters(&self) -> &ParameterSet {
        &self.global_parameters
    }

    pub fn items(&self) -> &[ModelItem] {
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
        domain: &mut SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx = SimulatorContext::new(
                &item.id,
                &item.parameters,
                &self.global_parameters,
                domain,
                status,
                logger,
                run_env,
            );
            item.simulator.init_params(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn call_prepare_data(
        &mut self,
        domain: &mut SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx = SimulatorContext::new(
                &item.id,
                &item.parameters,
                &self.global_parameters,
                domain,
                status,
                logger,
                run_env,
            );
            item.simulator.prepare_data(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn call_check_consistency(
        &mut self,
        domain: &mut SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx = SimulatorContext::new(
                &item.id,
                &item.parameters,
                &self.global_parameters,
                domain,
                status,
                logger,
                run_env,
            );
            item.simulator.check_consistency(&mut ctx)?;
        }
        Ok(())
    }

    /// Run every simulator's initialization and queue its first time point.
    pub(crate) fn call_initialize_run(
        &mut self,
        domain: &mut SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        self.queue.clear();
        for i in 0..self.items.len() {
            let request = {
                let item = &mut self.items[i];
                let mut ctx = SimulatorContext::new(
                    &item.id,
                    &item.parameters,
                    &self.global_parameters,
                    domain,
                    status,
                    logger,
                    run_env,
                );
                item.simulator.initialize_run(&mut ctx)?
            };
            self.schedule(i, TimeIndex::ZERO, request, status)?;
        }
        Ok(())
    }

    pub(crate) fn call_finalize_run(
        &mut self,
        domain: &mut SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        for item in &mut self.items {
            let mut ctx = SimulatorContext::new(
                &item.id,
                &item.parameters,
                &self.global_parameters,
                domain,
                status,
                logger,
                run_env,
            );
            item.simulator.finalize_run(&mut ctx)?;
        }
        Ok(())
    }

    pub(crate) fn has_time_point_to_process(&self) -> bool {
        !self.queue.is_empty()
    }

    pub(crate) fn next_time_point(&self) -> Option<TimeIndex> {
        self.queue.keys().next().copied()
    }

    /// Pop the earliest queued time point and run the simulators due at it,
    /// re-queueing each according to the request it returns.
    pub(crate) fn process_next_time_point(
        &mut self,
        domain: &mut SpatialDomain,
        status: &SimulationStatus,
        logger: &mut SimulationLogger,
        run_env: &RunEnvironment,
    ) -> CatenaResult<()> {
        let (index, mut due) = self.queue.pop_first().expect("no pending time point");
        debug_assert_eq!(index, status.current_index());
        due.sort_unstable();
        tracing::debug!(
            index = index.seconds(),
            simulators = due.len(),
            "processing time point"
        );
        for i in due {
            let request = {
                let item = &mut self.items[i];
                let mut ctx = SimulatorContext::new(
                    &item.id,
                    &item.parameters,
                    &self.global_parameters,
                    domain,
                    status,
                    logger,
                    run_env,
                );
                item.simulator.run_step(&mut ctx)?
            };
            self.schedule(i, index, request, status)?;
        }
        Ok(())
    }

    /// Resolve a scheduling request against the run constraint and queue
    /// the next execution of the simulator, if any.
    ///
    /// Targets past the end of the period are dropped, as are targets that
    /// would not advance past `from` (so a simulator already at the end
    /// requesting `AtTheEnd` simply stops).
    fn schedule(
        &mut self,
        item_index: usize,
        from: TimeIndex,
        request: SchedulingRequest,
        status: &SimulationStatus,
    ) -> CatenaResult<()> {
        if request == SchedulingRequest::Duration(0) {
            return Err(CatenaError::InvalidSchedulingRequest {
                component: self.items[item_index].id.clone(),
                details: "a duration of zero seconds never advances".to_string(),
            });
        }
        let request = match status.constraint() {
            SchedulingConstraint::None => request,
            SchedulingConstraint::DtChecked => match request {
                SchedulingRequest::DefaultDeltaT => request,
                SchedulingRequest::Duration(d) if d == status.default_delta_t() => request,
                other => {
                    return Err(CatenaError::InvalidSchedulingRequest {
                        component: self.items[item_index].id.clone(),
                        details: format!("{other:?} violates the dt-checked constraint"),
                    })
                }
            },
            SchedulingConstraint::DtForced => match request {
                SchedulingRequest::Never => SchedulingRequest::Never,
                _ => SchedulingRequest::DefaultDeltaT,
            },
        };

        let target = match request {
            SchedulingRequest::Never => return Ok(()),
            SchedulingRequest::DefaultDeltaT => from + status.default_delta_t(),
            SchedulingRequest::Duration(d) => from + d,
            SchedulingRequest::AtTheEnd => status.end_index(),
        };
        if target <= from || target > status.end_index() {
            return Ok(());
        }
        self.queue.entry(target).or_default().push(item_index);
        Ok(())
    }
}
