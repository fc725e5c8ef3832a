//! Step definitions for filesystem assertion scenarios.

use cucumber::{gherkin::Step, given, then};

use crate::{error::StepResult, table, world::FileWorld};

#[given(regex = r"^(?:F|f)ile$")]
fn declare_file(world: &mut FileWorld, step: &Step) -> StepResult {
    let rows = table::from_step(step)?;
    world.probe_mut().declare(&rows);
    Ok(())
}

#[then("verify exist")]
fn verify_exist(world: &mut FileWorld) -> StepResult {
    world.probe().verify_exists()
}

#[then("verify read")]
fn verify_read(world: &mut FileWorld) -> StepResult {
    world.probe().verify_readable()
}

#[then("verify write")]
fn verify_write(world: &mut FileWorld) -> StepResult {
    world.probe().verify_writable()
}
