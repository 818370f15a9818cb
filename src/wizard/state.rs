use super::error::WizardError;
use super::steps::{StepDefinitionSet, StepDescriptor, StepKind};
use crate::gateway::FederationConfig;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    NotReached,
    Reached { valid: bool },
    Passed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeState {
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl OutcomeState {
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (OutcomeState::Idle, OutcomeState::InFlight)
                | (OutcomeState::InFlight, OutcomeState::Succeeded)
                | (OutcomeState::InFlight, OutcomeState::Failed)
                | (OutcomeState::Failed, OutcomeState::InFlight)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeState::Idle => "idle",
            OutcomeState::InFlight => "in_flight",
            OutcomeState::Succeeded => "succeeded",
            OutcomeState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OutcomeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub state: OutcomeState,
    pub message: String,
    pub resubmission_locked: bool,
}

impl Default for OperationOutcome {
    fn default() -> Self {
        Self {
            state: OutcomeState::Idle,
            message: String::new(),
            resubmission_locked: false,
        }
    }
}

impl OperationOutcome {
    fn transition(&mut self, next: OutcomeState, message: String) {
        debug_assert!(
            self.state.can_transition_to(next),
            "outcome transition {} -> {} is invalid",
            self.state,
            next
        );
        self.state = next;
        self.message = message;
        if next == OutcomeState::Succeeded {
            self.resubmission_locked = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExternalCall {
    Validation { step: u32 },
    Finalize,
}

/// Navigation and outcome state of one wizard session. Only the transition
/// methods below mutate it.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    steps: StepDefinitionSet,
    current: u32,
    high_water: u32,
    validity: BTreeMap<u32, bool>,
    outcome: OperationOutcome,
    pending_config: Option<FederationConfig>,
    validation_message: Option<String>,
    in_flight: Option<ExternalCall>,
}

impl WizardState {
    pub fn new(steps: StepDefinitionSet) -> Self {
        let first = steps.first_id();
        Self {
            steps,
            current: first,
            high_water: first,
            validity: BTreeMap::from([(first, false)]),
            outcome: OperationOutcome::default(),
            pending_config: None,
            validation_message: None,
            in_flight: None,
        }
    }

    pub fn steps(&self) -> &StepDefinitionSet {
        &self.steps
    }

    pub fn current_step_id(&self) -> u32 {
        self.current
    }

    pub fn current_step(&self) -> Option<&StepDescriptor> {
        self.steps.get(self.current)
    }

    pub fn high_water_step_id(&self) -> u32 {
        self.high_water
    }

    pub fn current_step_valid(&self) -> bool {
        self.validity.get(&self.current).copied().unwrap_or(false)
    }

    pub fn outcome(&self) -> &OperationOutcome {
        &self.outcome
    }

    pub fn pending_config(&self) -> Option<&FederationConfig> {
        self.pending_config.as_ref()
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation_message.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.current == self.steps.finish_id()
    }

    pub fn step_status(&self, id: u32) -> StepStatus {
        if id > self.high_water || !self.validity.contains_key(&id) {
            return StepStatus::NotReached;
        }
        if id < self.high_water {
            return StepStatus::Passed;
        }
        StepStatus::Reached {
            valid: self.validity.get(&id).copied().unwrap_or(false),
        }
    }

    pub(crate) fn seed_pending_config(&mut self, config: FederationConfig) {
        self.pending_config = Some(config);
    }

    pub fn advance(&mut self, target: u32) -> Result<(), WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::OperationInProgress {
                reason: "an external call is in flight",
            });
        }
        let known = self.steps.contains(target) || target == self.steps.finish_id();
        let revisit = known && target <= self.high_water;
        let forward =
            self.steps.next_id(self.current) == Some(target) && self.current_step_valid();
        if !revisit && !forward {
            return Err(WizardError::NavigationRejected {
                current: self.current,
                target,
                high_water: self.high_water,
            });
        }

        self.current = target;
        if target > self.high_water {
            self.high_water = target;
        }
        self.validity.entry(target).or_insert(false);
        Ok(())
    }

    /// Returns `false` when the report is stale (not for the current step)
    /// and was dropped.
    pub fn report_validity(&mut self, step: u32, valid: bool) -> bool {
        if step != self.current || !self.steps.contains(step) {
            return false;
        }
        self.validity.insert(step, valid);
        true
    }

    pub(crate) fn begin_validation(&mut self) -> Result<u32, WizardError> {
        let step = self.current;
        if self.current_step().map(|s| s.kind) != Some(StepKind::Validation) {
            return Err(WizardError::NotAtStep {
                operation: "submit_external_validation",
                step,
            });
        }
        if self.in_flight.is_some() {
            return Err(WizardError::OperationInProgress {
                reason: "an external call is in flight",
            });
        }
        self.in_flight = Some(ExternalCall::Validation { step });
        Ok(step)
    }

    pub(crate) fn complete_validation(
        &mut self,
        step: u32,
        config: Option<FederationConfig>,
        message: String,
    ) -> bool {
        if self.in_flight == Some(ExternalCall::Validation { step }) {
            self.in_flight = None;
        }
        let accepted = config.is_some();
        self.pending_config = config;
        self.validity.insert(step, accepted);
        self.validation_message = Some(message);
        accepted
    }

    pub(crate) fn begin_finalize(
        &mut self,
        message: String,
    ) -> Result<Option<FederationConfig>, WizardError> {
        // Duplicate submissions are rejected from any step.
        if self.outcome.resubmission_locked {
            return Err(WizardError::OperationInProgress {
                reason: "federation configuration was already created",
            });
        }
        if self.in_flight.is_some() || self.outcome.state == OutcomeState::InFlight {
            return Err(WizardError::OperationInProgress {
                reason: "an external call is in flight",
            });
        }
        if self.current != self.steps.confirmation_id() {
            return Err(WizardError::NotAtStep {
                operation: "finalize",
                step: self.current,
            });
        }
        self.in_flight = Some(ExternalCall::Finalize);
        self.outcome.transition(OutcomeState::InFlight, message);
        Ok(self.pending_config.clone())
    }

    pub(crate) fn complete_finalize(&mut self, succeeded: bool, message: String) {
        if self.in_flight == Some(ExternalCall::Finalize) {
            self.in_flight = None;
        }
        if succeeded {
            let confirmation = self.steps.confirmation_id();
            self.validity.insert(confirmation, true);
            self.high_water = self.high_water.max(self.steps.finish_id());
            self.outcome.transition(OutcomeState::Succeeded, message);
        } else {
            self.outcome.transition(OutcomeState::Failed, message);
        }
    }
}
