#![allow(dead_code)]

use crate::component::{Simulator, SimulatorContext};
use crate::errors::CatenaResult;
use crate::listener::RunListener;
use crate::observer::{Observer, ObserverContext};
use crate::signature::{AttributeRequest, ParameterRequest, Signature, VariableRequest};
use crate::status::{SimulationStage, StageOutcome};
use crate::time::{SchedulingRequest, TimeIndex};
use crate::value::{Value, ValueType};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared call recorder for asserting hook ordering across components.
pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

pub(crate) fn new_call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

// ============================================================================
// Simulators
// ============================================================================

/// Produces a fixed double on every unit of a class, once at initialization
/// and once per step. The two flags exist to break the production invariant
/// on purpose.
#[derive(Debug)]
pub(crate) struct FixedProducer {
    pub class: String,
    pub name: String,
    pub value: f64,
    pub write_on_init: bool,
    pub write_on_check: bool,
}

impl FixedProducer {
    pub fn new(class: &str, name: &str, value: f64) -> Self {
        FixedProducer {
            class: class.to_string(),
            name: name.to_string(),
            value,
            write_on_init: true,
            write_on_check: false,
        }
    }

    fn write_all(&self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let index = ctx.status().current_index();
        let value = Value::Double(self.value);
        if let Some(units) = ctx.domain_mut().units_of_class_mut(&self.class) {
            for unit in units {
                unit.variables_mut().append(&self.name, index, value.clone())?;
            }
        }
        Ok(())
    }
}

impl Simulator for FixedProducer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.producer")
            .produces_variable(VariableRequest::typed(&self.name, &self.class, ValueType::Double))
    }

    fn check_consistency(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        if self.write_on_check {
            self.write_all(ctx)?;
        }
        Ok(())
    }

    fn initialize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        if self.write_on_init {
            self.write_all(ctx)?;
        }
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.write_all(ctx)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }
}

/// Declares a required variable and does nothing else.
#[derive(Debug)]
pub(crate) struct VariableRequirer {
    pub class: String,
    pub name: String,
    pub value_type: Option<ValueType>,
}

impl VariableRequirer {
    pub fn new(class: &str, name: &str) -> Self {
        VariableRequirer {
            class: class.to_string(),
            name: name.to_string(),
            value_type: None,
        }
    }

    pub fn typed(class: &str, name: &str, value_type: ValueType) -> Self {
        VariableRequirer {
            value_type: Some(value_type),
            ..VariableRequirer::new(class, name)
        }
    }
}

impl Simulator for VariableRequirer {
    fn signature(&self) -> Signature {
        let request = match self.value_type {
            Some(t) => VariableRequest::typed(&self.name, &self.class, t),
            None => VariableRequest::new(&self.name, &self.class),
        };
        Signature::new("fixture.requirer").requires_variable(request)
    }
}

/// Declares an updated variable and doubles the value already produced at
/// the current index.
#[derive(Debug)]
pub(crate) struct VariableUpdater {
    pub class: String,
    pub name: String,
}

impl VariableUpdater {
    pub fn new(class: &str, name: &str) -> Self {
        VariableUpdater {
            class: class.to_string(),
            name: name.to_string(),
        }
    }
}

impl Simulator for VariableUpdater {
    fn signature(&self) -> Signature {
        Signature::new("fixture.updater")
            .updates_variable(VariableRequest::new(&self.name, &self.class))
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        let index = ctx.status().current_index();
        if let Some(units) = ctx.domain_mut().units_of_class_mut(&self.class) {
            for unit in units {
                let current = unit
                    .variables()
                    .series(&self.name)
                    .and_then(|s| s.at(index))
                    .cloned();
                if let Some(Value::Double(v)) = current {
                    unit.variables_mut()
                        .update(&self.name, index, Value::Double(v * 2.0))?;
                }
            }
        }
        Ok(SchedulingRequest::DefaultDeltaT)
    }
}

/// Declares a produced attribute and fills it during its consistency hook.
#[derive(Debug)]
pub(crate) struct AttributeProducer {
    pub class: String,
    pub name: String,
    pub value: f64,
}

impl AttributeProducer {
    pub fn new(class: &str, name: &str, value: f64) -> Self {
        AttributeProducer {
            class: class.to_string(),
            name: name.to_string(),
            value,
        }
    }
}

impl Simulator for AttributeProducer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.attr-producer")
            .produces_attribute(AttributeRequest::new(&self.name, &self.class))
    }

    fn check_consistency(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let value = Value::Double(self.value);
        if let Some(units) = ctx.domain_mut().units_of_class_mut(&self.class) {
            for unit in units {
                unit.attributes_mut().set(&self.name, value.clone());
            }
        }
        Ok(())
    }
}

/// Declares a required attribute and does nothing else.
#[derive(Debug)]
pub(crate) struct AttributeRequirer {
    pub class: String,
    pub name: String,
}

impl AttributeRequirer {
    pub fn new(class: &str, name: &str) -> Self {
        AttributeRequirer {
            class: class.to_string(),
            name: name.to_string(),
        }
    }
}

impl Simulator for AttributeRequirer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.attr-requirer")
            .requires_attribute(AttributeRequest::new(&self.name, &self.class))
    }
}

/// Declares a required extra input file and does nothing else.
#[derive(Debug)]
pub(crate) struct ExtraFileRequirer {
    pub file_name: String,
}

impl ExtraFileRequirer {
    pub fn new(file_name: &str) -> Self {
        ExtraFileRequirer {
            file_name: file_name.to_string(),
        }
    }
}

impl Simulator for ExtraFileRequirer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.file-requirer").requires_extra_file(&self.file_name)
    }
}

/// Declares a required parameter and does nothing else.
#[derive(Debug)]
pub(crate) struct ParamRequirer {
    pub name: String,
}

impl ParamRequirer {
    pub fn new(name: &str) -> Self {
        ParamRequirer {
            name: name.to_string(),
        }
    }
}

impl Simulator for ParamRequirer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.param-requirer")
            .requires_parameter(ParameterRequest::new(&self.name))
    }
}

/// Records the value a parameter resolves to at INITPARAMS.
#[derive(Debug)]
pub(crate) struct ParamEcho {
    pub name: String,
    pub log: CallLog,
}

impl ParamEcho {
    pub fn new(name: &str, log: CallLog) -> Self {
        ParamEcho {
            name: name.to_string(),
            log,
        }
    }
}

impl Simulator for ParamEcho {
    fn signature(&self) -> Signature {
        Signature::new("fixture.param-echo").uses_parameter(ParameterRequest::new(&self.name))
    }

    fn init_params(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let seen = match ctx.parameter(&self.name) {
            Some(value) => format!("{}={}", self.name, value),
            None => format!("{}=<absent>", self.name),
        };
        self.log.borrow_mut().push(seen);
        Ok(())
    }
}

/// Logs a warning whenever the given stage's hook runs.
#[derive(Debug)]
pub(crate) struct WarningRaiser {
    pub warn_at: SimulationStage,
}

impl WarningRaiser {
    pub fn new(warn_at: SimulationStage) -> Self {
        WarningRaiser { warn_at }
    }

    fn maybe_warn(&self, ctx: &mut SimulatorContext, stage: SimulationStage) {
        if self.warn_at == stage {
            ctx.log_warning("deliberate warning");
        }
    }
}

impl Simulator for WarningRaiser {
    fn signature(&self) -> Signature {
        Signature::new("fixture.warner")
    }

    fn init_params(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.maybe_warn(ctx, SimulationStage::InitParams);
        Ok(())
    }

    fn prepare_data(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.maybe_warn(ctx, SimulationStage::PrepareData);
        Ok(())
    }

    fn check_consistency(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.maybe_warn(ctx, SimulationStage::CheckConsistency);
        Ok(())
    }

    fn initialize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.maybe_warn(ctx, SimulationStage::InitializeRun);
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.maybe_warn(ctx, SimulationStage::RunStep);
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn finalize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.maybe_warn(ctx, SimulationStage::FinalizeRun);
        Ok(())
    }
}

/// Fails at the given stage; for RUNSTEP optionally only at one index.
#[derive(Debug)]
pub(crate) struct FailingSimulator {
    pub fail_at: SimulationStage,
    pub fail_index: Option<TimeIndex>,
}

impl FailingSimulator {
    pub fn new(fail_at: SimulationStage) -> Self {
        FailingSimulator {
            fail_at,
            fail_index: None,
        }
    }

    pub fn at_index(fail_at: SimulationStage, index: TimeIndex) -> Self {
        FailingSimulator {
            fail_at,
            fail_index: Some(index),
        }
    }

    fn fail_if(&self, ctx: &SimulatorContext, stage: SimulationStage) -> CatenaResult<()> {
        if self.fail_at != stage {
            return Ok(());
        }
        if let Some(at) = self.fail_index {
            if ctx.status().current_index() != at {
                return Ok(());
            }
        }
        Err(ctx.raise_error("deliberate failure"))
    }
}

impl Simulator for FailingSimulator {
    fn signature(&self) -> Signature {
        Signature::new("fixture.failer")
    }

    fn init_params(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.fail_if(ctx, SimulationStage::InitParams)
    }

    fn prepare_data(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.fail_if(ctx, SimulationStage::PrepareData)
    }

    fn check_consistency(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.fail_if(ctx, SimulationStage::CheckConsistency)
    }

    fn initialize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.fail_if(ctx, SimulationStage::InitializeRun)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.fail_if(ctx, SimulationStage::RunStep)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn finalize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.fail_if(ctx, SimulationStage::FinalizeRun)
    }
}

/// Records every hook call as `id:hook@index` and answers scheduling with a
/// fixed request.
#[derive(Debug)]
pub(crate) struct StepTracer {
    pub log: CallLog,
    pub request: SchedulingRequest,
}

impl StepTracer {
    pub fn new(log: CallLog) -> Self {
        StepTracer {
            log,
            request: SchedulingRequest::DefaultDeltaT,
        }
    }

    pub fn with_request(log: CallLog, request: SchedulingRequest) -> Self {
        StepTracer { log, request }
    }

    fn record(&self, ctx: &SimulatorContext, hook: &str) {
        self.log.borrow_mut().push(format!(
            "{}:{}@{}",
            ctx.component_id(),
            hook,
            ctx.status().current_index()
        ));
    }
}

impl Simulator for StepTracer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.tracer")
    }

    fn init_params(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.record(ctx, "init_params");
        Ok(())
    }

    fn prepare_data(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.record(ctx, "prepare_data");
        Ok(())
    }

    fn check_consistency(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.record(ctx, "check_consistency");
        Ok(())
    }

    fn initialize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.record(ctx, "initialize_run");
        Ok(self.request)
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.record(ctx, "run_step");
        Ok(self.request)
    }

    fn finalize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        self.record(ctx, "finalize_run");
        Ok(())
    }
}

/// Sums the upstream `flow` values into an `outflow` on its own class,
/// exercising the connectivity graph.
#[derive(Debug)]
pub(crate) struct UpstreamSummer {
    pub class: String,
    pub upstream_class: String,
}

impl UpstreamSummer {
    pub fn new(class: &str, upstream_class: &str) -> Self {
        UpstreamSummer {
            class: class.to_string(),
            upstream_class: upstream_class.to_string(),
        }
    }

    fn write_sums(&self, ctx: &mut SimulatorContext) -> CatenaResult<()> {
        let index = ctx.status().current_index();
        let mut sums = Vec::new();
        {
            let domain = ctx.domain();
            if let Some(units) = domain.units_of_class(&self.class) {
                for unit in units {
                    let mut total = 0.0;
                    for (uclass, uid) in domain.from_units(&self.class, unit.id())? {
                        let upstream = domain
                            .unit(uclass, uid)
                            .and_then(|u| u.variables().series("flow"))
                            .and_then(|s| s.at(index));
                        if let Some(Value::Double(v)) = upstream {
                            total += v;
                        }
                    }
                    sums.push((unit.id(), total));
                }
            }
        }
        for (id, total) in sums {
            if let Some(unit) = ctx.domain_mut().unit_mut(&self.class, id) {
                unit.variables_mut()
                    .append("outflow", index, Value::Double(total))?;
            }
        }
        Ok(())
    }
}

impl Simulator for UpstreamSummer {
    fn signature(&self) -> Signature {
        Signature::new("fixture.summer")
            .requires_variable(VariableRequest::typed(
                "flow",
                &self.upstream_class,
                ValueType::Double,
            ))
            .produces_variable(VariableRequest::typed("outflow", &self.class, ValueType::Double))
    }

    fn initialize_run(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.write_sums(ctx)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }

    fn run_step(&mut self, ctx: &mut SimulatorContext) -> CatenaResult<SchedulingRequest> {
        self.write_sums(ctx)?;
        Ok(SchedulingRequest::DefaultDeltaT)
    }
}

// ============================================================================
// Observers and listeners
// ============================================================================

/// Records every observer hook call.
#[derive(Debug)]
pub(crate) struct CountingObserver {
    pub calls: CallLog,
}

impl CountingObserver {
    pub fn new(calls: CallLog) -> Self {
        CountingObserver { calls }
    }
}

impl Observer for CountingObserver {
    fn signature(&self) -> Signature {
        Signature::new("fixture.counter")
    }

    fn init_params(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.calls.borrow_mut().push("init_params".to_string());
        Ok(())
    }

    fn on_prepared(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.calls.borrow_mut().push("on_prepared".to_string());
        Ok(())
    }

    fn on_initialized_run(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.calls.borrow_mut().push("on_initialized_run".to_string());
        Ok(())
    }

    fn on_step_completed(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.calls
            .borrow_mut()
            .push(format!("on_step_completed@{}", ctx.status().current_index()));
        Ok(())
    }

    fn on_finalized_run(&mut self, _ctx: &mut ObserverContext) -> CatenaResult<()> {
        self.calls.borrow_mut().push("on_finalized_run".to_string());
        Ok(())
    }
}

/// Fails once the run reaches the given step.
#[derive(Debug)]
pub(crate) struct FailingObserver {
    pub fail_at_step: TimeIndex,
}

impl FailingObserver {
    pub fn new(fail_at_step: TimeIndex) -> Self {
        FailingObserver { fail_at_step }
    }
}

impl Observer for FailingObserver {
    fn signature(&self) -> Signature {
        Signature::new("fixture.failing-observer")
    }

    fn on_step_completed(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        if ctx.status().current_index() == self.fail_at_step {
            return Err(ctx.raise_error("observer failure"));
        }
        Ok(())
    }
}

/// Listener keeping every notification for later assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingListener {
    pub started: Vec<SimulationStage>,
    pub completed: Vec<(SimulationStage, StageOutcome)>,
    pub steps: Vec<TimeIndex>,
}

impl RunListener for RecordingListener {
    fn on_stage_started(&mut self, stage: SimulationStage) {
        self.started.push(stage);
    }

    fn on_stage_completed(&mut self, stage: SimulationStage, outcome: StageOutcome) {
        self.completed.push((stage, outcome));
    }

    fn on_step_completed(&mut self, index: TimeIndex) {
        self.steps.push(index);
    }
}
