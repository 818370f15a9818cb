use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Continue,
    Back,
    Validate,
    Finalize,
    Close,
}

impl WizardAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardAction::Continue => "continue",
            WizardAction::Back => "back",
            WizardAction::Validate => "validate",
            WizardAction::Finalize => "finalize",
            WizardAction::Close => "close",
        }
    }
}

pub fn wizard_action_from_key(key: KeyEvent) -> Option<WizardAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(WizardAction::Close);
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char('\n') | KeyCode::Char('\r') | KeyCode::Right => {
            Some(WizardAction::Continue)
        }
        KeyCode::Left | KeyCode::Backspace => Some(WizardAction::Back),
        KeyCode::Char('v') => Some(WizardAction::Validate),
        KeyCode::Char('f') => Some(WizardAction::Finalize),
        KeyCode::Esc | KeyCode::Char('q') => Some(WizardAction::Close),
        _ => None,
    }
}

pub fn parse_scripted_wizard_keys(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let mut keys = Vec::new();
    for token in raw.split(',') {
        let normalized = token.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            continue;
        }
        let key = match normalized.as_str() {
            "enter" => KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
            "back" | "left" => KeyEvent::new(KeyCode::Left, KeyModifiers::NONE),
            "v" => KeyEvent::new(KeyCode::Char('v'), KeyModifiers::NONE),
            "f" => KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE),
            "esc" => KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE),
            "ctrl-c" => KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            other => {
                return Err(format!(
                    "invalid IDP_WIZARD_SCRIPT_KEYS token `{other}`; valid tokens: enter,back,v,f,esc,ctrl-c"
                ));
            }
        };
        keys.push(key);
    }
    Ok(keys)
}
