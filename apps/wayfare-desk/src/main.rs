//! # Wayfare Desk Entry Point
//!
//! Runs the booking host on stdin/stdout.
//!
//! ## Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin  ──► {"command":"start","kind":"lodging"}                        │
//! │  stdout ◄── {"ok":{ ...FlowView... }}                                   │
//! │                                                                         │
//! │  stdin  ──► {"command":"toggle_unit","unit_id":"R99"}                   │
//! │  stdout ◄── {"error":{"code":"NOT_FOUND","message":"..."}}              │
//! │                                                                         │
//! │  stderr ◄── logs (tracing)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

fn main() -> ExitCode {
    match wayfare_desk::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wayfare-desk: {}", err);
            ExitCode::FAILURE
        }
    }
}
