//! Loop execution.
//!
//! Both loops re-evaluate their condition before every pass and run their
//! body through the dispatcher, so any command (loops included) may nest.
//! There is no iteration cap: a condition that never turns false never
//! terminates. Variables set inside a body stay bound after the loop.

use std::io::Write;

use tracing::trace;

use crate::dsl::{CountedLoop, SpinLoop};

use super::{evaluate_condition, Context, Engine, EngineError};

impl<W: Write> Engine<W> {
    /// init; while condition { body; iteration }
    pub(super) fn run_counted(
        &mut self,
        counted: &CountedLoop,
        ctx: &mut Context,
    ) -> Result<(), EngineError> {
        self.assign(&counted.init, ctx)?;
        let mut passes = 0usize;
        while evaluate_condition(&counted.condition, &ctx.vars)? {
            self.run_block(&counted.body, ctx)?;
            self.assign(&counted.iteration, ctx)?;
            passes += 1;
        }
        trace!(passes, "counted loop done");
        Ok(())
    }

    /// while condition { body }
    pub(super) fn run_spin(&mut self, spin: &SpinLoop, ctx: &mut Context) -> Result<(), EngineError> {
        let mut passes = 0usize;
        while evaluate_condition(&spin.condition, &ctx.vars)? {
            self.run_block(&spin.body, ctx)?;
            passes += 1;
        }
        trace!(passes, "spin loop done");
        Ok(())
    }
}
