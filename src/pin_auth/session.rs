//! PIN auth session
//!
//! Owns the pure machine and resolves its effects against the injected
//! credential store and biometric gate. One session per lock screen; the
//! owner feeds UI events in and consumes signals from the channel returned
//! at construction.

use super::machine::{Effect, PinMachine, Step};
use super::types::{AuthEvent, AuthMode, AuthSignal};
use crate::biometric::BiometricGate;
use crate::credential_store::CredentialStore;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Auth flow driver
pub struct PinAuthSession<S: CredentialStore, G: BiometricGate> {
    machine: PinMachine,
    store: Arc<S>,
    gate: G,
    signals: mpsc::UnboundedSender<AuthSignal>,
}

impl<S, G> PinAuthSession<S, G>
where
    S: CredentialStore,
    G: BiometricGate,
{
    /// Create a session and the signal channel its owner listens on.
    /// Biometric availability is probed once here and stamped into every
    /// view snapshot.
    pub fn new(
        mode: AuthMode,
        store: Arc<S>,
        gate: G,
    ) -> (Self, mpsc::UnboundedReceiver<AuthSignal>) {
        let (signals, receiver) = mpsc::unbounded_channel();
        let machine = PinMachine::new(mode, gate.availability());
        (
            Self {
                machine,
                store,
                gate,
                signals,
            },
            receiver,
        )
    }

    pub fn machine(&self) -> &PinMachine {
        &self.machine
    }

    /// Feed one UI event through the machine and resolve whatever effects
    /// it requests.
    pub async fn handle(&mut self, event: AuthEvent) -> Result<()> {
        let step = self.machine.handle(event)?;
        self.run(step).await
    }

    async fn run(&mut self, mut step: Step) -> Result<()> {
        loop {
            if let Some(view) = step.view.take() {
                let _ = self.signals.send(AuthSignal::View(view));
            }
            let finished = step.finished;

            let next = match step.effect {
                Effect::None => None,
                Effect::CheckPin(entered) => {
                    let matched = self.pin_matches(&entered);
                    Some(self.machine.resolve_check(matched)?)
                }
                Effect::PersistPin(pin) => {
                    if let Err(e) = self.store.set_pin(&pin) {
                        // Lock stays disabled; the flow still completes.
                        tracing::error!(error = %e, "Failed to persist PIN");
                    }
                    None
                }
                Effect::RunBiometric => {
                    let success = match self.gate.authenticate("Unlock the camera viewer").await
                    {
                        Ok(()) => true,
                        Err(failure) => {
                            tracing::debug!(
                                failure = %failure,
                                "Biometric attempt failed, falling back to PIN entry"
                            );
                            false
                        }
                    };
                    Some(self.machine.resolve_biometric(success)?)
                }
            };

            if finished {
                let _ = self.signals.send(AuthSignal::Success);
            }

            match next {
                Some(n) => step = n,
                None => return Ok(()),
            }
        }
    }

    /// A store that cannot produce a PIN means the lock is effectively
    /// disabled, so verification passes.
    fn pin_matches(&self, entered: &str) -> bool {
        match self.store.pin() {
            Ok(Some(stored)) => stored == entered,
            Ok(None) => {
                tracing::warn!("Verify flow ran with no stored PIN, treating lock as disabled");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Credential store read failed, treating lock as disabled");
                true
            }
        }
    }
}
