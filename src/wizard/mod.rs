pub mod driver;
pub mod engine;
pub mod error;
pub mod keys;
pub mod providers;
pub mod state;
pub mod steps;

pub use driver::{apply_wizard_action, describe_current_step, DriverStep, WizardExit};
pub use engine::{FederationTarget, ValidationReport, WizardEngine};
pub use error::WizardError;
pub use keys::{parse_scripted_wizard_keys, wizard_action_from_key, WizardAction};
pub use providers::{WizardKind, ALL_WIZARD_KINDS};
pub use state::{OperationOutcome, OutcomeState, StepStatus, WizardState};
pub use steps::{StepDefinitionSet, StepDescriptor, StepKind};
