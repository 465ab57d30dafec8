//! Threads, sleeping and named locks.
//!
//! `thread_create` runs a user function on an OS thread against a deep
//! snapshot of the current state; the two never share a container
//! afterwards. Joining yields the thread's output. Named locks live in
//! [`SharedResources`](crate::concurrency::SharedResources) and are the
//! only state threads share; pairing `mutex_lock` with `mutex_unlock` is
//! the script's responsibility.

use std::thread;
use std::time::Duration;

use tl_ir::Token;

use super::functions::{invoke, resolve_callee};
use super::operand::{self, name};
use super::{Outcome, Site};
use crate::concurrency::ThreadSlot;
use crate::errors::{custom, usage, ExecError, ExecResult};
use crate::output::OutputLog;
use crate::{RuntimeState, Value};

/// `thread_create <function> [id_var]`: the new thread's id is stored in
/// `id_var`, or printed.
pub(crate) fn thread_create(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "thread_create <function> [id_variable]";
    let Some(function) = site.arg(0).and_then(Token::as_ident) else {
        state.report(usage("thread_create", USAGE));
        return Outcome::consumed(0);
    };

    let mut snapshot = state.snapshot();
    let spawned = resolve_callee(&snapshot, function).and_then(|callee| {
        let label = function.to_string();
        thread::Builder::new()
            .name(format!("tl-{function}"))
            .spawn(move || {
                tracing::trace!(function = %label, "thread started");
                if let Err(err) = invoke(&mut snapshot, &callee, Vec::new()) {
                    snapshot.report(err);
                }
                snapshot.take_output()
            })
            .map_err(|err| custom(format!("Cannot start thread: {err}")))
    });

    match spawned {
        Ok(handle) => {
            let id = state.threads.insert(handle);
            tracing::debug!(id, function, "thread spawned");
            Outcome::consumed(1 + site.deliver(state, 1, Value::Int(id)))
        }
        Err(err) => {
            state.report(err);
            Outcome::consumed(1 + usize::from(site.target(state, 1).is_some()))
        }
    }
}

/// Wait for thread `id` and return its output.
fn join(state: &mut RuntimeState, id: i64) -> ExecResult<OutputLog> {
    let slot = state
        .threads
        .slots
        .remove(&id)
        .ok_or(ExecError::UnknownThread { id })?;
    let output = match slot {
        ThreadSlot::Running(handle) => handle.join().map_err(|_| ExecError::ThreadPanicked { id })?,
        ThreadSlot::Finished(output) => output,
    };
    tracing::debug!(id, lines = output.len(), "thread joined");
    state
        .threads
        .slots
        .insert(id, ThreadSlot::Finished(output.clone()));
    Ok(output)
}

/// `thread_join <id> [target]`: the thread's output as one string in
/// `target`, or appended to this state's output.
pub(crate) fn thread_join(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    const USAGE: &str = "thread_join <id> [target]";
    let Some(id_tok) = site.arg(0) else {
        state.report(usage("thread_join", USAGE));
        return Outcome::consumed(0);
    };
    let target = site.target(state, 1);
    match operand::integer(state, id_tok).and_then(|id| join(state, id)) {
        Ok(output) => match target {
            Some(var) => state.assign(var, Value::Text(output.render())),
            None => state.output.append(output),
        },
        Err(err) => state.report(err),
    }
    Outcome::consumed(1 + usize::from(target.is_some()))
}

/// `thread_status <id> [target]`: `running` or `finished`.
pub(crate) fn thread_status(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.produce(state, 1, "thread_status", "thread_status <id> [target]", |state, args| {
        let id = operand::integer(state, &args[0])?;
        let status = match state.threads.slots.get(&id) {
            Some(ThreadSlot::Running(handle)) if !handle.is_finished() => "running",
            Some(_) => "finished",
            None => return Err(ExecError::UnknownThread { id }),
        };
        Ok(Value::text(status))
    })
}

/// `sleep <ms>` / `thread_sleep <ms>`: blocks only this interpreter.
pub(crate) fn sleep(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "sleep", "sleep <milliseconds>", |state, args| {
        let ms = operand::integer(state, &args[0])?;
        thread::sleep(Duration::from_millis(u64::try_from(ms).unwrap_or(0)));
        Ok(())
    })
}

pub(crate) fn mutex_create(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "mutex_create", "mutex_create <name>", |state, args| {
        let lock = name(&args[0], "mutex_create", "mutex_create <name>")?;
        state.shared.create_lock(lock);
        Ok(())
    })
}

pub(crate) fn mutex_lock(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "mutex_lock", "mutex_lock <name>", |state, args| {
        let lock = name(&args[0], "mutex_lock", "mutex_lock <name>")?;
        if !state.shared.lock(lock) {
            return Err(ExecError::UnknownMutex {
                name: lock.to_string(),
            });
        }
        Ok(())
    })
}

pub(crate) fn mutex_unlock(state: &mut RuntimeState, site: &Site<'_>) -> Outcome {
    site.fixed(state, 1, "mutex_unlock", "mutex_unlock <name>", |state, args| {
        let lock = name(&args[0], "mutex_unlock", "mutex_unlock <name>")?;
        if !state.shared.unlock(lock) {
            return Err(ExecError::UnknownMutex {
                name: lock.to_string(),
            });
        }
        Ok(())
    })
}
