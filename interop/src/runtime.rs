use ledger_common::config::PLATFORM_NAME;
use log::info;

use crate::{
    context::InteropContext,
    error::InteropError,
    events::EventRecord,
    vm::Engine,
};

impl<'a> InteropContext<'a> {
    /// Timestamp of the block being processed, or of the chain tip when the
    /// execution is not tied to a block
    pub fn current_time(&self) -> Result<u32, InteropError> {
        if let Some(block) = self.block() {
            return Ok(block.timestamp);
        }
        let hash = self.ledger().current_block_hash()?;
        match self.ledger().get_header(&hash)? {
            Some(header) => Ok(header.timestamp),
            None => Err(InteropError::NotFound {
                kind: "header",
                id: hash.to_string(),
            }),
        }
    }
}

pub(crate) fn runtime_platform(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    engine.evaluation_stack_mut().push(PLATFORM_NAME);
    Ok(())
}

pub(crate) fn runtime_get_trigger(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    engine.evaluation_stack_mut().push(ctx.trigger().to_u8());
    Ok(())
}

pub(crate) fn runtime_get_time(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let time = ctx.current_time()?;
    engine.evaluation_stack_mut().push(time);
    Ok(())
}

pub(crate) fn runtime_notify(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let state = engine.evaluation_stack_mut().pop()?;
    let script_hash = engine.current_script_hash()?;
    info!("script {} notifies: {:?}", script_hash, state);
    ctx.emit(EventRecord::Notify { script_hash, state });
    Ok(())
}

pub(crate) fn runtime_log(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let bytes = engine.evaluation_stack_mut().pop_bytes()?;
    let script_hash = engine.current_script_hash()?;
    let message = String::from_utf8_lossy(&bytes).into_owned();
    info!("script {} logs: {:?}", script_hash, message);
    ctx.emit(EventRecord::Log { script_hash, message });
    Ok(())
}

// ===== ExecutionEngine =====

pub(crate) fn engine_get_script_container(ctx: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let container = ctx.container().ok_or(InteropError::MissingScriptContainer)?;
    engine.evaluation_stack_mut().push(container.to_stack_item());
    Ok(())
}

pub(crate) fn engine_get_executing_script_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let hash = engine.current_script_hash()?;
    engine.evaluation_stack_mut().push(hash.to_bytes().to_vec());
    Ok(())
}

pub(crate) fn engine_get_calling_script_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let hash = engine.calling_script_hash()?;
    engine.evaluation_stack_mut().push(hash.to_bytes().to_vec());
    Ok(())
}

pub(crate) fn engine_get_entry_script_hash(_: &mut InteropContext, engine: &mut Engine) -> Result<(), InteropError> {
    let hash = engine.entry_script_hash()?;
    engine.evaluation_stack_mut().push(hash.to_bytes().to_vec());
    Ok(())
}
