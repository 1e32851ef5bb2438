//! Run progress reporting through tracing.

use catena_core::errors::CatenaResult;
use catena_core::observer::{Observer, ObserverContext};
use catena_core::signature::Signature;
use tracing::info;

/// Logs how far the run has advanced after each processed time point.
#[derive(Debug, Default)]
pub struct ProgressObserver;

impl Observer for ProgressObserver {
    fn signature(&self) -> Signature {
        Signature::new("report.progress").with_name("Progress reporter")
    }

    fn on_initialized_run(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        info!(
            begin = %ctx.status().begin_date(),
            end = %ctx.status().end_date(),
            "run initialized"
        );
        Ok(())
    }

    fn on_step_completed(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        let index = ctx.status().current_index();
        let percent = 100 * index.seconds() / ctx.status().end_index().seconds();
        info!(%index, percent, "step completed");
        Ok(())
    }

    fn on_finalized_run(&mut self, ctx: &mut ObserverContext) -> CatenaResult<()> {
        info!(index = %ctx.status().current_index(), "run finalized");
        Ok(())
    }
}
