use super::error::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Operator follows instructions in the external IdP and confirms.
    Instruction,
    /// Operator input is checked through the federation gateway.
    Validation,
    /// Final step; creates the federation through the gateway.
    Confirmation,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instruction => "instruction",
            Self::Validation => "validation",
            Self::Confirmation => "confirmation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDescriptor {
    pub id: u32,
    pub name: String,
    pub kind: StepKind,
    pub hide_back: bool,
}

impl StepDescriptor {
    pub fn instruction(id: u32, name: &str) -> Self {
        Self::new(id, name, StepKind::Instruction)
    }

    pub fn validation(id: u32, name: &str) -> Self {
        Self::new(id, name, StepKind::Validation)
    }

    pub fn confirmation(id: u32, name: &str) -> Self {
        Self::new(id, name, StepKind::Confirmation)
    }

    fn new(id: u32, name: &str, kind: StepKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            hide_back: false,
        }
    }

    pub fn with_hidden_back(mut self) -> Self {
        self.hide_back = true;
        self
    }

    pub fn is_reachable(&self, high_water: u32) -> bool {
        self.id <= high_water
    }
}

/// Ordered step sequence, fixed for the lifetime of a wizard session. The
/// last descriptor is always the confirmation step; `finish_id` is the
/// pseudo-step one past it that only a successful finalize unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinitionSet {
    steps: Vec<StepDescriptor>,
}

impl StepDefinitionSet {
    pub fn new(steps: Vec<StepDescriptor>) -> Result<Self, WizardError> {
        let Some(last) = steps.last() else {
            return Err(WizardError::Configuration(
                "step sequence must not be empty".to_string(),
            ));
        };
        if last.kind != StepKind::Confirmation {
            return Err(WizardError::Configuration(format!(
                "last step `{}` must be a confirmation step",
                last.name
            )));
        }
        if last.id == u32::MAX {
            return Err(WizardError::Configuration(
                "confirmation step id leaves no room for the finish step".to_string(),
            ));
        }
        let mut previous = 0_u32;
        for step in &steps {
            if step.id == 0 {
                return Err(WizardError::Configuration(format!(
                    "step `{}` must have a positive id",
                    step.name
                )));
            }
            if step.id <= previous {
                return Err(WizardError::Configuration(format!(
                    "step ids must be strictly increasing; {} follows {}",
                    step.id, previous
                )));
            }
            if step.kind == StepKind::Confirmation && step.id != last.id {
                return Err(WizardError::Configuration(format!(
                    "confirmation step `{}` must be the last step",
                    step.name
                )));
            }
            previous = step.id;
        }
        Ok(Self { steps })
    }

    pub fn first_id(&self) -> u32 {
        self.steps[0].id
    }

    pub fn confirmation_id(&self) -> u32 {
        self.steps[self.steps.len() - 1].id
    }

    pub fn finish_id(&self) -> u32 {
        self.confirmation_id() + 1
    }

    pub fn get(&self, id: u32) -> Option<&StepDescriptor> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Successor of `id` in sequence order. The confirmation step has none.
    pub fn next_id(&self, id: u32) -> Option<u32> {
        let position = self.steps.iter().position(|step| step.id == id)?;
        self.steps.get(position + 1).map(|step| step.id)
    }

    pub fn previous_id(&self, id: u32) -> Option<u32> {
        let position = self.steps.iter().position(|step| step.id == id)?;
        position
            .checked_sub(1)
            .and_then(|prev| self.steps.get(prev))
            .map(|step| step.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepDescriptor> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
