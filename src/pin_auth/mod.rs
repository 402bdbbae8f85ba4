//! PinAuth - PIN lock state machine
//!
//! ## Responsibilities
//!
//! - Verify flow: entered PIN compared against the stored PIN, optionally
//!   preceded by a biometric attempt
//! - Register flow: enter, confirm, persist on match
//! - View-state emission for the dot-indicator UI, plus a one-shot success
//!   signal when the flow finishes
//!
//! The machine itself is pure: `(state, event) -> (new state, effects)`.
//! The session resolves the effects against the injected credential store
//! and biometric gate.

mod machine;
mod session;
mod types;

pub use machine::{Effect, PinMachine, Step};
pub use session::PinAuthSession;
pub use types::{AuthEvent, AuthMode, AuthSignal, AuthState, Prompt, ViewState};

/// PIN length; the flow submits automatically at the fourth digit.
pub const PIN_LENGTH: usize = 4;
