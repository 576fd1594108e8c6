//! # Commands Module
//!
//! Every command the presentation layer can send.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (wire format + dispatch)
//! ├── flow.rs       ◄─── start, view, confirm, cancel
//! ├── selection.rs  ◄─── units, ticket quantities, guests, payment, dates
//! ├── browse.rs     ◄─── room type filter and paging
//! ├── discounts.rs  ◄─── manual discount and add-on toggles
//! └── config.rs     ◄─── configuration retrieval
//! ```
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Request (one line):                                                    │
//! │    {"command":"set_quantity","ticket_id":"adult","delta":1}             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  serde → Command::SetQuantity { ticket_id, delta }                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  dispatch() → selection::set_quantity(&app.flow, ...)                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Response (one line):                                                   │
//! │    {"ok":{...FlowView...}}  or  {"error":{"code":...,"message":...}}    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod browse;
pub mod config;
pub mod discounts;
pub mod flow;
pub mod selection;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use wayfare_core::{BookingKind, PaymentMethod};

use crate::error::ApiError;
use crate::state::AppState;

/// One request line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start {
        kind: BookingKind,
    },
    Search {
        /// Room type; absent or "any" means every type.
        #[serde(default)]
        unit_type: Option<String>,
        #[serde(default)]
        page: Option<usize>,
    },
    ToggleUnit {
        unit_id: String,
    },
    SetQuantity {
        ticket_id: String,
        delta: i64,
    },
    SetGuests {
        adults: u32,
        children: u32,
    },
    SetPaymentMethod {
        method: PaymentMethod,
    },
    SetStayWindow {
        /// `YYYY-MM-DD`; both absent clears the window.
        #[serde(default)]
        check_in: Option<String>,
        #[serde(default)]
        check_out: Option<String>,
    },
    ToggleAddOn {
        add_on_id: String,
    },
    ToggleDiscount {
        rule_id: String,
    },
    View,
    Confirm,
    Cancel,
    GetConfig,
}

/// One response line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    Ok(Value),
    Error(ApiError),
}

impl From<Result<Value, ApiError>> for Response {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(value) => Response::Ok(value),
            Err(err) => Response::Error(err),
        }
    }
}

/// Routes a command to its handler and serializes the result.
pub fn dispatch(app: &AppState, command: Command, now: DateTime<Utc>) -> Result<Value, ApiError> {
    debug!(?command, "dispatch");
    let value = match command {
        Command::Start { kind } => to_value(flow::start(app, kind, now)?)?,
        Command::View => to_value(flow::view(&app.flow, now)?)?,
        Command::Confirm => to_value(flow::confirm(app, now)?)?,
        Command::Cancel => to_value(flow::cancel(&app.flow))?,
        Command::Search { unit_type, page } => {
            to_value(browse::search(&app.flow, unit_type, page, now)?)?
        }
        Command::ToggleUnit { unit_id } => {
            to_value(selection::toggle_unit(&app.flow, &unit_id, now)?)?
        }
        Command::SetQuantity { ticket_id, delta } => {
            to_value(selection::set_quantity(&app.flow, &ticket_id, delta, now)?)?
        }
        Command::SetGuests { adults, children } => {
            to_value(selection::set_guests(&app.flow, adults, children, now)?)?
        }
        Command::SetPaymentMethod { method } => {
            to_value(selection::set_payment_method(&app.flow, method, now)?)?
        }
        Command::SetStayWindow {
            check_in,
            check_out,
        } => to_value(selection::set_stay_window(
            &app.flow,
            check_in.as_deref(),
            check_out.as_deref(),
            now,
        )?)?,
        Command::ToggleAddOn { add_on_id } => {
            to_value(discounts::toggle_add_on(&app.flow, &add_on_id, now)?)?
        }
        Command::ToggleDiscount { rule_id } => {
            to_value(discounts::toggle_discount(&app.flow, &rule_id, now)?)?
        }
        Command::GetConfig => to_value(config::get_config(&app.config))?,
    };
    Ok(value)
}

/// Parses and runs one input line. Never fails: errors become responses.
pub fn handle_line(app: &AppState, line: &str, now: DateTime<Utc>) -> Response {
    let result = serde_json::from_str::<Command>(line)
        .map_err(ApiError::from)
        .and_then(|command| dispatch(app, command, now));
    Response::from(result)
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("Response serialization failed: {}", e);
        ApiError::internal("Response serialization failed")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{CatalogState, ConfigState};

    fn app() -> AppState {
        AppState::new(ConfigState::default(), CatalogState::demo().unwrap())
    }

    fn ok(response: Response) -> Value {
        match response {
            Response::Ok(value) => value,
            Response::Error(err) => panic!("unexpected error: {}", err),
        }
    }

    fn err(response: Response) -> ApiError {
        match response {
            Response::Error(err) => err,
            Response::Ok(value) => panic!("unexpected success: {}", value),
        }
    }

    #[test]
    fn test_command_wire_format() {
        let command: Command =
            serde_json::from_str(r#"{"command":"set_guests","adults":2,"children":1}"#).unwrap();
        assert_eq!(
            command,
            Command::SetGuests {
                adults: 2,
                children: 1
            }
        );

        let command: Command = serde_json::from_str(r#"{"command":"search"}"#).unwrap();
        assert_eq!(
            command,
            Command::Search {
                unit_type: None,
                page: None
            }
        );
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let app = app();
        let error = err(handle_line(&app, r#"{"command":"teleport"}"#, Utc::now()));
        assert_eq!(error.code, ErrorCode::InvalidCommand);
    }

    #[test]
    fn test_flow_commands_require_start() {
        let app = app();
        let error = err(handle_line(&app, r#"{"command":"view"}"#, Utc::now()));
        assert_eq!(error.code, ErrorCode::NoActiveFlow);
    }

    #[test]
    fn test_ticketed_session() {
        let app = app();
        let now = Utc::now();

        let view = ok(handle_line(&app, r#"{"command":"start","kind":"ticketed"}"#, now));
        assert_eq!(view["kind"], "ticketed");

        let mut view = Value::Null;
        for _ in 0..5 {
            view = ok(handle_line(
                &app,
                r#"{"command":"set_quantity","ticket_id":"adult","delta":1}"#,
                now,
            ));
        }
        assert_eq!(view["selection"]["ticketQuantities"]["adult"], 5);
        assert_eq!(view["selection"]["adults"], 5);
        assert_eq!(view["discounts"][0]["code"], "GROUP5");
        assert_eq!(view["discounts"][0]["applied"], true);

        let payload = ok(handle_line(&app, r#"{"command":"confirm"}"#, now));
        assert_eq!(payload["kind"], "ticketed");
        assert!(payload["discountCodes"]
            .as_array()
            .unwrap()
            .contains(&Value::from("GROUP5")));
        assert!(!app.flow.is_active());
    }

    #[test]
    fn test_confirm_incomplete_keeps_flow() {
        let app = app();
        let now = Utc::now();
        ok(handle_line(&app, r#"{"command":"start","kind":"lodging"}"#, now));

        let error = err(handle_line(&app, r#"{"command":"confirm"}"#, now));
        assert_eq!(error.code, ErrorCode::IncompleteSelection);
        assert!(app.flow.is_active());

        let cancelled = ok(handle_line(&app, r#"{"command":"cancel"}"#, now));
        assert_eq!(cancelled["cancelled"], true);
        assert!(!app.flow.is_active());
    }

    #[test]
    fn test_get_config() {
        let app = app();
        let config = ok(handle_line(&app, r#"{"command":"get_config"}"#, Utc::now()));
        assert_eq!(config["currencyCode"], "VND");
        assert_eq!(config["pageSize"], 3);
    }
}
