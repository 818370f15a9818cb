use super::engine::WizardEngine;
use super::error::WizardError;
use super::keys::WizardAction;
use super::state::WizardState;
use super::steps::StepKind;
use crate::gateway::FederationGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardExit {
    Finished,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DriverStep {
    pub feedback: Vec<String>,
    pub exit: Option<WizardExit>,
}

impl DriverStep {
    fn say(line: impl Into<String>) -> Self {
        Self {
            feedback: vec![line.into()],
            exit: None,
        }
    }

    fn exit(exit: WizardExit, line: impl Into<String>) -> Self {
        Self {
            feedback: vec![line.into()],
            exit: Some(exit),
        }
    }
}

pub fn describe_current_step(state: &WizardState) -> String {
    match state.current_step() {
        Some(step) => format!(
            "Step {}/{}: {}",
            step.id,
            state.steps().confirmation_id(),
            step.name
        ),
        None => "Finish".to_string(),
    }
}

/// Applies one operator action. Recoverable rejections become feedback
/// lines; only a closed session is returned as an error.
pub fn apply_wizard_action<G: FederationGateway>(
    engine: &WizardEngine<G>,
    action: WizardAction,
    metadata_url: Option<&str>,
) -> Result<DriverStep, WizardError> {
    let state = engine.snapshot()?;
    let current = state.current_step_id();
    let step = match action {
        WizardAction::Continue => continue_from(engine, &state)?,
        WizardAction::Back => {
            let hidden = state.current_step().is_some_and(|step| step.hide_back);
            match state.steps().previous_id(current) {
                Some(previous) if !hidden => navigate(engine, previous)?,
                _ => DriverStep::say("There is no previous step."),
            }
        }
        WizardAction::Validate => match metadata_url {
            None => DriverStep::say("No metadata URL provided; pass --metadata-url."),
            Some(url) => match engine.submit_external_validation(url) {
                Ok(report) => DriverStep::say(report.message),
                Err(err) if err.is_recoverable() => DriverStep::say(err.to_string()),
                Err(err) => return Err(err),
            },
        },
        WizardAction::Finalize => match engine.finalize() {
            Ok(outcome) => DriverStep::say(format!("Results: {}", outcome.message)),
            Err(err) if err.is_recoverable() => DriverStep::say(err.to_string()),
            Err(err) => return Err(err),
        },
        WizardAction::Close => {
            engine.close();
            DriverStep::exit(WizardExit::Canceled, "Wizard closed.")
        }
    };
    Ok(step)
}

fn continue_from<G: FederationGateway>(
    engine: &WizardEngine<G>,
    state: &WizardState,
) -> Result<DriverStep, WizardError> {
    let current = state.current_step_id();
    let finish = state.steps().finish_id();
    let Some(step) = state.current_step() else {
        engine.close();
        return Ok(DriverStep::exit(WizardExit::Finished, "Wizard finished."));
    };
    match step.kind {
        StepKind::Instruction => {
            engine.report_validity(current, true)?;
            match state.steps().next_id(current) {
                Some(next) => navigate(engine, next),
                None => Ok(DriverStep::say("There is no next step.")),
            }
        }
        StepKind::Validation => {
            if !state.current_step_valid() {
                return Ok(DriverStep::say(
                    "Validate the IdP metadata URL before continuing (press v).",
                ));
            }
            match state.steps().next_id(current) {
                Some(next) => navigate(engine, next),
                None => Ok(DriverStep::say("There is no next step.")),
            }
        }
        StepKind::Confirmation => {
            if state.high_water_step_id() < finish {
                return Ok(DriverStep::say(
                    "Create the federation before finishing (press f).",
                ));
            }
            match engine.advance(finish) {
                Ok(()) => {
                    engine.close();
                    Ok(DriverStep::exit(WizardExit::Finished, "Wizard finished."))
                }
                Err(err) if err.is_recoverable() => Ok(DriverStep::say(err.to_string())),
                Err(err) => Err(err),
            }
        }
    }
}

fn navigate<G: FederationGateway>(
    engine: &WizardEngine<G>,
    target: u32,
) -> Result<DriverStep, WizardError> {
    match engine.advance(target) {
        Ok(()) => Ok(DriverStep::say(describe_current_step(&engine.snapshot()?))),
        Err(err) if err.is_recoverable() => Ok(DriverStep::say(err.to_string())),
        Err(err) => Err(err),
    }
}
