use super::error::WizardError;
use super::providers::WizardKind;
use super::state::{OperationOutcome, WizardState};
use super::steps::StepDefinitionSet;
use crate::gateway::{FederationConfig, FederationGateway, FederationRequest, ProviderKind};
use crate::shared::ids::{ProviderAlias, RealmName};
use crate::shared::logging::append_wizard_log;
use crate::shared::paths::StatePaths;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What the wizard is creating, and where.
#[derive(Debug, Clone, PartialEq)]
pub struct FederationTarget {
    pub realm: RealmName,
    pub alias: ProviderAlias,
    pub display_name: String,
    pub kind: ProviderKind,
    pub common_name: String,
    pub import_defaults: Option<FederationConfig>,
}

impl FederationTarget {
    pub fn for_kind(kind: WizardKind, realm: RealmName, alias: ProviderAlias) -> Self {
        Self {
            display_name: kind.display_name(&alias),
            kind: kind.protocol(),
            common_name: kind.common_name().to_string(),
            import_defaults: kind.import_defaults(),
            realm,
            alias,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub accepted: bool,
    pub message: String,
}

/// Single owner of a wizard session's state. Gateway calls run without the
/// state lock held, so `close()` stays responsive while a call is out; a
/// result arriving after close is discarded.
pub struct WizardEngine<G> {
    gateway: G,
    target: FederationTarget,
    slot: Mutex<Option<WizardState>>,
    log_paths: Option<StatePaths>,
}

impl<G: FederationGateway> WizardEngine<G> {
    pub fn new(steps: StepDefinitionSet, target: FederationTarget, gateway: G) -> Self {
        Self {
            gateway,
            target,
            slot: Mutex::new(Some(WizardState::new(steps))),
            log_paths: None,
        }
    }

    pub fn for_kind(
        kind: WizardKind,
        realm: RealmName,
        alias: ProviderAlias,
        gateway: G,
    ) -> Result<Self, WizardError> {
        let steps = kind.steps()?;
        Ok(Self::new(
            steps,
            FederationTarget::for_kind(kind, realm, alias),
            gateway,
        ))
    }

    pub fn with_log(mut self, paths: StatePaths) -> Self {
        self.log(
            &paths,
            "info",
            "wizard.open",
            format!(
                "alias={} kind={} realm={}",
                self.target.alias, self.target.kind, self.target.realm
            ),
        );
        self.log_paths = Some(paths);
        self
    }

    /// Pre-validated configuration, for wizards without a validation step.
    pub fn with_pending_config(self, config: FederationConfig) -> Self {
        if let Some(state) = self.lock().as_mut() {
            state.seed_pending_config(config);
        }
        self
    }

    pub fn target(&self) -> &FederationTarget {
        &self.target
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn snapshot(&self) -> Result<WizardState, WizardError> {
        self.lock().clone().ok_or(WizardError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    pub fn advance(&self, target: u32) -> Result<(), WizardError> {
        let result = self.with_state(|state| {
            let from = state.current_step_id();
            state.advance(target)?;
            Ok((from, state.high_water_step_id()))
        });
        match &result {
            Ok((from, high_water)) => self.emit(
                "info",
                "wizard.advance",
                format!("from={from} to={target} high_water={high_water}"),
            ),
            Err(err) => self.emit("warn", "wizard.advance_rejected", err.to_string()),
        }
        result.map(|_| ())
    }

    pub fn report_validity(&self, step: u32, valid: bool) -> Result<bool, WizardError> {
        let applied = self.with_state(|state| Ok(state.report_validity(step, valid)))?;
        if applied {
            self.emit("debug", "wizard.validity", format!("step={step} valid={valid}"));
        }
        Ok(applied)
    }

    /// Gateway faults never surface as errors here; they come back as a
    /// rejected report and leave the step invalid.
    pub fn submit_external_validation(&self, url: &str) -> Result<ValidationReport, WizardError> {
        let step = self.with_state(|state| state.begin_validation())?;

        let imported = self
            .gateway
            .import_from_url(url, self.target.kind, &self.target.realm)
            .map(|config| match &self.target.import_defaults {
                Some(defaults) => config.over(defaults),
                None => config,
            });

        let mut slot = self.lock();
        let Some(state) = slot.as_mut() else {
            drop(slot);
            self.emit("info", "wizard.discarded", format!("validation result for step {step}"));
            return Err(WizardError::Closed);
        };
        let report = match imported {
            Ok(config) => {
                let message = format!(
                    "Configuration successfully validated with {}. Continue to next step.",
                    self.target.common_name
                );
                state.complete_validation(step, Some(config), message.clone());
                ValidationReport {
                    accepted: true,
                    message,
                }
            }
            Err(fault) => {
                let message = format!(
                    "Configuration validation failed with {}. Check URL and try again.",
                    self.target.common_name
                );
                state.complete_validation(step, None, message.clone());
                drop(slot);
                self.emit(
                    "warn",
                    "wizard.validation_failed",
                    format!("step={step} url={url} fault={fault}"),
                );
                return Ok(ValidationReport {
                    accepted: false,
                    message,
                });
            }
        };
        drop(slot);
        self.emit(
            "info",
            "wizard.validation_succeeded",
            format!("step={step} url={url}"),
        );
        Ok(report)
    }

    pub fn finalize(&self) -> Result<OperationOutcome, WizardError> {
        let common_name = self.target.common_name.clone();
        let pending =
            self.with_state(|state| state.begin_finalize(format!("Creating {common_name}...")))?;
        self.emit(
            "info",
            "wizard.finalize_started",
            format!("alias={}", self.target.alias),
        );

        let result = match pending {
            Some(config) => {
                let request = FederationRequest {
                    alias: self.target.alias.clone(),
                    display_name: self.target.display_name.clone(),
                    kind: self.target.kind,
                    config,
                };
                self.gateway
                    .create(&request, &self.target.realm)
                    .map_err(|fault| fault.to_string())
            }
            None => Err("no validated federation configuration is available".to_string()),
        };

        let mut slot = self.lock();
        let Some(state) = slot.as_mut() else {
            drop(slot);
            self.emit(
                "info",
                "wizard.discarded",
                format!("finalize result for alias {}", self.target.alias),
            );
            return Err(WizardError::Closed);
        };
        let (level, event, detail) = match &result {
            Ok(ack) => {
                state.complete_finalize(
                    true,
                    format!("{common_name} created successfully. Click finish."),
                );
                (
                    "info",
                    "wizard.finalize_succeeded",
                    format!(
                        "alias={} location={}",
                        self.target.alias,
                        ack.location.as_deref().unwrap_or("-")
                    ),
                )
            }
            Err(reason) => {
                state.complete_finalize(false, format!("Error creating {common_name}: {reason}"));
                (
                    "warn",
                    "wizard.finalize_failed",
                    format!("alias={} reason={reason}", self.target.alias),
                )
            }
        };
        let outcome = state.outcome().clone();
        drop(slot);
        self.emit(level, event, detail);
        Ok(outcome)
    }

    /// Releases the session state. Returns `false` if it was already closed.
    pub fn close(&self) -> bool {
        let was_open = self.lock().take().is_some();
        if was_open {
            self.emit("info", "wizard.close", format!("alias={}", self.target.alias));
        }
        was_open
    }

    fn with_state<T>(
        &self,
        apply: impl FnOnce(&mut WizardState) -> Result<T, WizardError>,
    ) -> Result<T, WizardError> {
        let mut slot = self.lock();
        let state = slot.as_mut().ok_or(WizardError::Closed)?;
        apply(state)
    }

    fn lock(&self) -> MutexGuard<'_, Option<WizardState>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, level: &str, event: &str, message: String) {
        if let Some(paths) = &self.log_paths {
            self.log(paths, level, event, message);
        }
    }

    fn log(&self, paths: &StatePaths, level: &str, event: &str, message: String) {
        append_wizard_log(
            paths,
            level,
            event,
            &format!("[{}] {message}", self.target.alias),
        );
    }
}
