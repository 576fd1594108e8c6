//! # Flow State
//!
//! Holds the booking flow in progress, if any.
//!
//! ## Thread Safety
//! The flow is wrapped in `Arc<Mutex<T>>` so that overlapping events are
//! serialized: every command sees the snapshot left by the previous one.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  start ─────► Some(BookingFlow)                                         │
//! │                   │                                                     │
//! │                   ├── toggle_unit / set_quantity / ... (with_flow_mut)  │
//! │                   ├── view                             (with_flow)      │
//! │                   │                                                     │
//! │  confirm ─────────┤──► BookingPayload, flow ends ──► None               │
//! │  cancel  ─────────┘──► flow dropped              ──► None               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use wayfare_core::BookingFlow;

use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct FlowState {
    flow: Arc<Mutex<Option<BookingFlow>>>,
}

impl FlowState {
    pub fn new() -> Self {
        FlowState::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<BookingFlow>> {
        // The flow is replaced wholesale on every command, so a panic
        // mid-command cannot leave it half-updated.
        self.flow.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new flow, discarding any previous one.
    pub fn begin(&self, flow: BookingFlow) {
        *self.lock() = Some(flow);
    }

    /// Drops the active flow. Returns whether there was one.
    pub fn end(&self) -> bool {
        self.lock().take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Executes a function with read access to the active flow.
    pub fn with_flow<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&BookingFlow) -> Result<R, ApiError>,
    {
        let guard = self.lock();
        let flow = guard.as_ref().ok_or_else(ApiError::no_active_flow)?;
        f(flow)
    }

    /// Executes a function with write access to the active flow.
    ///
    /// The function works on a copy; the copy replaces the active flow
    /// only when it succeeds, so a rejected command leaves no trace.
    pub fn with_flow_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut BookingFlow) -> Result<R, ApiError>,
    {
        let mut guard = self.lock();
        let mut next = guard.as_ref().ok_or_else(ApiError::no_active_flow)?.clone();
        let result = f(&mut next)?;
        *guard = Some(next);
        Ok(result)
    }

    /// Runs `f` on the active flow and ends the flow if it succeeds.
    pub fn complete_with<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&BookingFlow) -> Result<R, ApiError>,
    {
        let mut guard = self.lock();
        let flow = guard.as_ref().ok_or_else(ApiError::no_active_flow)?;
        let result = f(flow)?;
        *guard = None;
        Ok(result)
    }
}
