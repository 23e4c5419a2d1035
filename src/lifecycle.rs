// This file is Copyright its original authors, visible in version control history.
//
// This file is licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. You may not use this file except in
// accordance with one or both of these licenses.

//! Start-once and stop-once coordination of the traffic shaper.

use crate::Error;

use tokio::sync::watch;

use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// The lifecycle state of a traffic shaper.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleState {
	/// Constructed but not started yet. Already accepting work.
	Created,
	/// Accepting work.
	Running,
	/// Shutdown has begun, waiting for outstanding work to finish.
	Stopping,
	/// Shut down. This state is terminal.
	Stopped,
}

struct GuardState {
	lifecycle: LifecycleState,
	outstanding_work: usize,
}

pub(crate) struct LifecycleGuard {
	state: Mutex<GuardState>,
	work_finished: Condvar,
	stop_sender: watch::Sender<bool>,
}

impl LifecycleGuard {
	pub(crate) fn new() -> Self {
		let state =
			Mutex::new(GuardState { lifecycle: LifecycleState::Created, outstanding_work: 0 });
		let (stop_sender, _) = watch::channel(false);
		Self { state, work_finished: Condvar::new(), stop_sender }
	}

	fn lock_state(&self) -> MutexGuard<'_, GuardState> {
		self.state.lock().unwrap_or_else(|e| e.into_inner())
	}

	pub(crate) fn state(&self) -> LifecycleState {
		self.lock_state().lifecycle
	}

	/// Transitions from `Created` to `Running`. Returns whether we transitioned.
	pub(crate) fn start(&self) -> bool {
		let mut state = self.lock_state();
		if state.lifecycle != LifecycleState::Created {
			return false;
		}
		state.lifecycle = LifecycleState::Running;
		true
	}

	/// Moves to `Stopping` and broadcasts the stop signal. Returns whether this call began the
	/// shutdown.
	pub(crate) fn begin_shutdown(&self) -> bool {
		let mut state = self.lock_state();
		match state.lifecycle {
			LifecycleState::Created | LifecycleState::Running => {},
			LifecycleState::Stopping | LifecycleState::Stopped => return false,
		}
		state.lifecycle = LifecycleState::Stopping;
		self.stop_sender.send_replace(true);
		true
	}

	/// Blocks until all outstanding work finished, then moves from `Stopping` to `Stopped`.
	///
	/// Must not be called while holding a [`WorkToken`] of this guard, as it would never return.
	pub(crate) fn wait_for_shutdown(&self) {
		let mut state = self.lock_state();
		while state.outstanding_work > 0 {
			state = self.work_finished.wait(state).unwrap_or_else(|e| e.into_inner());
		}
		if state.lifecycle == LifecycleState::Stopping {
			state.lifecycle = LifecycleState::Stopped;
		}
	}

	/// Registers a unit of outstanding work. Only possible until shutdown begins.
	pub(crate) fn enter(self: &Arc<Self>) -> Result<WorkToken, Error> {
		let mut state = self.lock_state();
		match state.lifecycle {
			LifecycleState::Created | LifecycleState::Running => {},
			LifecycleState::Stopping | LifecycleState::Stopped => return Err(Error::NotRunning),
		}
		state.outstanding_work += 1;
		Ok(WorkToken { guard: Arc::clone(self) })
	}

	pub(crate) fn stop_signal(&self) -> watch::Receiver<bool> {
		self.stop_sender.subscribe()
	}

	fn leave(&self) {
		let mut state = self.lock_state();
		state.outstanding_work -= 1;
		if state.outstanding_work == 0 {
			self.work_finished.notify_all();
		}
	}
}

/// Marks a unit of work that shutdown waits for. The work is considered finished once the token
/// is dropped.
#[must_use]
pub struct WorkToken {
	guard: Arc<LifecycleGuard>,
}

impl Drop for WorkToken {
	fn drop(&mut self) {
		self.guard.leave();
	}
}
