//! Pure PIN state machine
//!
//! Transitions never touch the store or the biometric hardware; those are
//! returned as `Effect`s for the session to resolve. Invalid (state, event)
//! combinations are contract violations and come back as
//! `Error::InvalidTransition`.

use super::types::{AuthEvent, AuthMode, AuthState, Prompt, ViewState};
use super::PIN_LENGTH;
use crate::biometric::BiometryKind;
use crate::error::{Error, Result};

/// Side effect the owner must resolve after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Compare against the stored PIN, then feed `resolve_check(matched)`
    CheckPin(String),
    /// Persist the confirmed PIN
    PersistPin(String),
    /// Run the biometric prompt, then feed `resolve_biometric(success)`
    RunBiometric,
}

/// Result of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Emitted when the visible state changed
    pub view: Option<ViewState>,
    pub effect: Effect,
    /// True on the transition into `Finished`; triggers the one-shot
    /// success signal
    pub finished: bool,
}

impl Step {
    fn none() -> Self {
        Self {
            view: None,
            effect: Effect::None,
            finished: false,
        }
    }

    fn view(view: ViewState) -> Self {
        Self {
            view: Some(view),
            effect: Effect::None,
            finished: false,
        }
    }
}

/// PIN entry/registration state machine
pub struct PinMachine {
    mode: AuthMode,
    biometry: BiometryKind,
    state: AuthState,
}

impl PinMachine {
    pub fn new(mode: AuthMode, biometry: BiometryKind) -> Self {
        Self {
            mode,
            biometry,
            state: AuthState::Idle,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Apply one input event
    pub fn handle(&mut self, event: AuthEvent) -> Result<Step> {
        match event {
            AuthEvent::Start => self.on_start(),
            AuthEvent::Digit(digit) => self.on_digit(digit),
            AuthEvent::Backspace => self.on_backspace(),
            AuthEvent::BiometricRequested => self.on_biometric_requested(),
        }
    }

    /// Outcome of a `CheckPin` effect (Verify mode)
    pub fn resolve_check(&mut self, matched: bool) -> Result<Step> {
        let submitted = matches!(
            (&self.mode, &self.state),
            (AuthMode::Verify, AuthState::InProgress { digits, .. }) if digits.len() == PIN_LENGTH
        );
        if !submitted {
            return Err(self.invalid("resolve_check"));
        }

        if matched {
            self.state = AuthState::Finished;
            Ok(Step {
                view: None,
                effect: Effect::None,
                finished: true,
            })
        } else {
            Ok(Step::view(self.reset_wrong()))
        }
    }

    /// Outcome of a `RunBiometric` effect
    pub fn resolve_biometric(&mut self, success: bool) -> Result<Step> {
        if self.state == AuthState::Finished {
            return Err(self.invalid("resolve_biometric"));
        }

        if success {
            self.state = AuthState::Finished;
            Ok(Step {
                view: None,
                effect: Effect::None,
                finished: true,
            })
        } else {
            // Fall back to manual entry; the specific failure stays with
            // the gate.
            self.state = AuthState::InProgress {
                prompt: Prompt::EnterPasscode,
                digits: Vec::new(),
            };
            Ok(Step::view(self.snapshot(Prompt::EnterPasscode, 0)))
        }
    }

    fn on_start(&mut self) -> Result<Step> {
        if self.state != AuthState::Idle {
            return Err(self.invalid("start"));
        }
        self.state = AuthState::InProgress {
            prompt: Prompt::EnterPasscode,
            digits: Vec::new(),
        };
        Ok(Step::view(self.snapshot(Prompt::EnterPasscode, 0)))
    }

    fn on_digit(&mut self, digit: u8) -> Result<Step> {
        if digit > 9 {
            return Err(Error::Validation(format!("digit out of range: {}", digit)));
        }

        match &mut self.state {
            AuthState::InProgress { prompt, digits } => {
                digits.push(digit);
                let prompt = *prompt;
                let count = digits.len();
                if count < PIN_LENGTH {
                    return Ok(Step::view(self.snapshot(prompt, count)));
                }

                match self.mode {
                    AuthMode::Verify => {
                        let entered = Self::join(digits);
                        Ok(Step {
                            view: Some(self.snapshot(prompt, PIN_LENGTH)),
                            effect: Effect::CheckPin(entered),
                            finished: false,
                        })
                    }
                    AuthMode::Register => {
                        let pending = digits.clone();
                        self.state = AuthState::Confirm {
                            pending,
                            digits: Vec::new(),
                        };
                        Ok(Step::view(self.snapshot(Prompt::ConfirmPasscode, 0)))
                    }
                }
            }
            AuthState::Confirm { pending, digits } => {
                digits.push(digit);
                let count = digits.len();
                if count < PIN_LENGTH {
                    return Ok(Step::view(self.snapshot(Prompt::ConfirmPasscode, count)));
                }

                if digits == pending {
                    let confirmed = Self::join(digits);
                    self.state = AuthState::Finished;
                    Ok(Step {
                        view: None,
                        effect: Effect::PersistPin(confirmed),
                        finished: true,
                    })
                } else {
                    // Mismatch discards the pending entry; the user starts
                    // over from the first entry.
                    Ok(Step::view(self.reset_wrong()))
                }
            }
            AuthState::Idle | AuthState::Finished => Err(self.invalid("digit")),
        }
    }

    fn on_backspace(&mut self) -> Result<Step> {
        match &mut self.state {
            AuthState::InProgress { prompt, digits } => {
                if digits.pop().is_none() {
                    return Ok(Step::none());
                }
                let prompt = *prompt;
                let count = digits.len();
                Ok(Step::view(self.snapshot(prompt, count)))
            }
            AuthState::Confirm { digits, .. } => {
                if digits.pop().is_none() {
                    return Ok(Step::none());
                }
                let count = digits.len();
                Ok(Step::view(self.snapshot(Prompt::ConfirmPasscode, count)))
            }
            AuthState::Idle | AuthState::Finished => Err(self.invalid("backspace")),
        }
    }

    fn on_biometric_requested(&mut self) -> Result<Step> {
        if self.state == AuthState::Finished {
            return Err(self.invalid("biometric_requested"));
        }
        Ok(Step {
            view: None,
            effect: Effect::RunBiometric,
            finished: false,
        })
    }

    fn reset_wrong(&mut self) -> ViewState {
        self.state = AuthState::InProgress {
            prompt: Prompt::WrongPasscode,
            digits: Vec::new(),
        };
        self.snapshot(Prompt::WrongPasscode, 0)
    }

    fn snapshot(&self, prompt: Prompt, filled_digits: usize) -> ViewState {
        ViewState {
            prompt,
            filled_digits,
            biometry: self.biometry,
        }
    }

    fn invalid(&self, event: &'static str) -> Error {
        Error::InvalidTransition {
            state: self.state.name(),
            event,
        }
    }

    fn join(digits: &[u8]) -> String {
        digits.iter().map(|d| char::from(b'0' + d)).collect()
    }
}
