//! Simulation assembly.

use crate::component::Simulator;
use crate::config::RunConfig;
use crate::errors::{CatenaError, CatenaResult};
use crate::listener::RunListener;
use crate::logger::SimulationLogger;
use crate::model::ModelInstance;
use crate::monitoring::MonitoringInstance;
use crate::observer::Observer;
use crate::parameters::{ParamValue, ParameterSet};
use crate::runenv::RunEnvironment;
use crate::signature::ComponentId;
use crate::spatial::SpatialDomain;
use crate::status::SimulationStatus;
use std::mem;

use super::runner::Engine;

/// Collects the parts of a simulation before anything runs.
///
/// Simulators and observers execute in the order they are added. The
/// period (via status or config) and the run environment are mandatory;
/// everything else defaults to empty.
pub struct SimulationBuilder {
    simulators: Vec<(ComponentId, Box<dyn Simulator>, ParameterSet)>,
    observers: Vec<(ComponentId, Box<dyn Observer>, ParameterSet)>,
    global_parameters: ParameterSet,
    domain: SpatialDomain,
    status: Option<SimulationStatus>,
    run_env: Option<RunEnvironment>,
}

impl SimulationBuilder {
    pub fn new() -> Self {
        Self {
            simulators: vec![],
            observers: vec![],
            global_parameters: ParameterSet::new(),
            domain: SpatialDomain::new(),
            status: None,
            run_env: None,
        }
    }

    pub fn with_status(&mut self, status: SimulationStatus) -> &mut Self {
        self.status = Some(status);
        self
    }

    pub fn with_run_environment(&mut self, run_env: RunEnvironment) -> &mut Self {
        self.run_env = Some(run_env);
        self
    }

    /// Take period and paths from a parsed configuration file.
    pub fn with_config(&mut self, config: &RunConfig) -> CatenaResult<&mut Self> {
        self.status = Some(config.status()?);
        self.run_env = Some(config.run_environment());
        Ok(self)
    }

    pub fn with_domain(&mut self, domain: SpatialDomain) -> &mut Self {
        self.domain = domain;
        self
    }

    pub fn with_simulator(
        &mut self,
        id: impl Into<ComponentId>,
        simulator: Box<dyn Simulator>,
        parameters: ParameterSet,
    ) -> &mut Self {
        self.simulators.push((id.into(), simulator, parameters));
        self
    }

    pub fn with_observer(
        &mut self,
        id: impl Into<ComponentId>,
        observer: Box<dyn Observer>,
        parameters: ParameterSet,
    ) -> &mut Self {
        self.observers.push((id.into(), observer, parameters));
        self
    }

    pub fn with_global_parameter(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> &mut Self {
        self.global_parameters.insert(name, value);
        self
    }

    /// Assemble the simulation, draining the builder.
    pub fn build(&mut self) -> CatenaResult<Simulation> {
        let status = self.status.take().ok_or_else(|| CatenaError::Config {
            message: "no simulation period configured".to_string(),
        })?;
        let run_env = self.run_env.take().ok_or_else(|| CatenaError::Config {
            message: "no run environment configured".to_string(),
        })?;

        let mut model = ModelInstance::new();
        model.set_global_parameters(mem::take(&mut self.global_parameters));
        for (id, simulator, parameters) in self.simulators.drain(..) {
            model.add_simulator(id, simulator, parameters);
        }
        let mut monitoring = MonitoringInstance::new();
        for (id, observer, parameters) in self.observers.drain(..) {
            monitoring.add_observer(id, observer, parameters);
        }

        Ok(Simulation {
            model,
            monitoring,
            domain: mem::take(&mut self.domain),
            status,
            logger: SimulationLogger::new(),
            run_env,
        })
    }
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An assembled simulation, ready to run.
pub struct Simulation {
    model: ModelInstance,
    monitoring: MonitoringInstance,
    domain: SpatialDomain,
    status: SimulationStatus,
    logger: SimulationLogger,
    run_env: RunEnvironment,
}

impl Simulation {
    /// Run the full lifecycle, reporting progress to the listener.
    pub fn run(&mut self, listener: &mut dyn RunListener) -> CatenaResult<()> {
        let mut engine = self.engine(listener)?;
        engine.init_params()?;
        engine.prepare_data()?;
        engine.check_consistency()?;
        engine.run()
    }

    /// Borrow an engine to drive the stages one by one.
    pub fn engine<'a>(&'a mut self, listener: &'a mut dyn RunListener) -> CatenaResult<Engine<'a>> {
        Engine::new(
            &mut self.model,
            &mut self.monitoring,
            &mut self.domain,
            &mut self.status,
            &mut self.logger,
            &self.run_env,
            listener,
        )
    }

    pub fn model(&self) -> &ModelInstance {
        &self.model
    }

    pub fn domain(&self) -> &SpatialDomain {
        &self.domain
    }

    pub fn status(&self) -> &SimulationStatus {
        &self.status
    }

    pub fn logger(&self) -> &SimulationLogger {
        &self.logger
    }

    pub fn run_env(&self) -> &RunEnvironment {
        &self.run_env
    }
}
