use crate::access::{AccessDecision, AccessGate, AccessGuard};
use crate::app::command_handlers::access::render_report;
use crate::app::command_support::{
    access_token, ensure_state_root, load_claims, load_settings, map_config_err,
    session_credentials, split_flags, RecordedDenial, SCRIPT_KEYS_ENV,
};
use crate::config::Settings;
use crate::gateway::{
    generate_alias, okta_ldap_config, BrokerEndpoints, FederationGateway, KeycloakAdminClient,
};
use crate::shared::logging::now_secs;
use crate::shared::paths::StatePaths;
use crate::shared::receipts::{write_receipt, FederationReceipt};
use crate::wizard::{
    apply_wizard_action, describe_current_step, parse_scripted_wizard_keys,
    wizard_action_from_key, OutcomeState, WizardAction, WizardEngine, WizardExit, WizardKind,
};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Lines shown to the operator plus how the session ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardTranscript {
    pub lines: Vec<String>,
    pub exit: Option<WizardExit>,
    pub created: bool,
}

impl WizardTranscript {
    fn record(&mut self, action: WizardAction, lines: Vec<String>) {
        self.lines.push(format!("> {}", action.as_str()));
        self.lines.extend(lines);
    }
}

pub fn cmd_wizard(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_flags(args, &["--metadata-url", "--claims"])?;
    let [kind] = positional.as_slice() else {
        return Err("usage: wizard <kind> [--metadata-url <url>] [--claims <path>]".to_string());
    };
    let kind = WizardKind::parse(kind)?;
    let settings = load_settings()?;
    let paths = ensure_state_root()?;

    let claims = load_claims(flags.get("claims").map(String::as_str))?;
    let context = settings.access_context(claims).map_err(map_config_err)?;
    let gate = AccessGate::standard().map_err(|e| e.to_string())?;
    let report = gate.explain(&context);
    let signal = RecordedDenial::default();
    let decision = AccessGuard::new(gate)
        .with_log(paths.clone())
        .observe(&context, &signal);
    if decision != AccessDecision::Granted {
        let mut lines = vec![format!(
            "access denied; redirecting to the access-denied page for realm {}",
            context.target_realm
        )];
        lines.extend(render_report(&report));
        return Err(lines.join("\n"));
    }

    let token = access_token()?;
    let alias = generate_alias(kind.alias_preface())?;
    let client = KeycloakAdminClient::new(&settings.server_url, token, settings.request_timeout());
    let mut engine = WizardEngine::for_kind(kind, settings.realm.clone(), alias.clone(), client)
        .map_err(|e| e.to_string())?
        .with_log(paths.clone());
    if kind == WizardKind::OktaLdap {
        let customer = settings
            .okta
            .customer_identifier
            .as_deref()
            .ok_or_else(|| "okta.customer_identifier is required for okta-ldap".to_string())?;
        engine = engine.with_pending_config(okta_ldap_config(customer, &session_credentials()?));
    }

    let endpoints = BrokerEndpoints::new(
        &settings.server_url,
        &settings.realm,
        &settings.auth_realm,
        &alias,
        kind.protocol(),
    );
    let mut header = vec![
        format!("wizard={kind}"),
        format!("alias={alias}"),
        format!("realm={}", settings.realm),
        format!("access={decision}"),
    ];
    if kind.protocol().is_brokered() {
        header.push(format!("sso_url={}", endpoints.sso_url));
        header.push(format!("audience_uri={}", endpoints.audience_uri));
    }

    let metadata_url = flags.get("metadata-url").map(String::as_str);
    let transcript = match load_scripted_keys()? {
        Some(keys) => run_scripted_wizard(&engine, keys, metadata_url)?,
        None if is_interactive() => run_interactive_wizard(&engine, metadata_url, &header)?,
        None => {
            return Err(format!(
                "wizard needs an interactive terminal or {SCRIPT_KEYS_ENV}"
            ))
        }
    };

    let mut lines = header;
    lines.extend(transcript.lines.iter().cloned());
    if transcript.created {
        let receipt_path = record_receipt(&paths, &settings, kind, &engine, &endpoints)?;
        lines.push(format!("admin_link={}", endpoints.admin_link));
        lines.push(format!("receipt={}", receipt_path.display()));
    }
    match transcript.exit {
        Some(WizardExit::Finished) => {
            lines.push(kind.completion_message().to_string());
            lines.push("result=finished".to_string());
        }
        Some(WizardExit::Canceled) => lines.push("result=canceled".to_string()),
        None => {
            engine.close();
            return Err(format!(
                "{}\nscripted wizard did not terminate; end with enter at the confirmation step or esc",
                lines.join("\n")
            ));
        }
    }
    Ok(lines.join("\n"))
}

fn record_receipt<G: FederationGateway>(
    paths: &StatePaths,
    settings: &Settings,
    kind: WizardKind,
    engine: &WizardEngine<G>,
    endpoints: &BrokerEndpoints,
) -> Result<std::path::PathBuf, String> {
    let target = engine.target();
    let receipt = FederationReceipt {
        alias: target.alias.to_string(),
        wizard: kind.to_string(),
        provider: target.kind.to_string(),
        realm: settings.realm.to_string(),
        admin_link: endpoints.admin_link.clone(),
        created_at: now_secs(),
    };
    write_receipt(paths, &receipt).map_err(|e| e.to_string())
}

fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

fn load_scripted_keys() -> Result<Option<Vec<KeyEvent>>, String> {
    let Ok(raw) = std::env::var(SCRIPT_KEYS_ENV) else {
        return Ok(None);
    };
    parse_scripted_wizard_keys(&raw).map(Some)
}

/// Drives the engine with a fixed key sequence. Stops at the first exit.
pub fn run_scripted_wizard<G: FederationGateway>(
    engine: &WizardEngine<G>,
    keys: impl IntoIterator<Item = KeyEvent>,
    metadata_url: Option<&str>,
) -> Result<WizardTranscript, String> {
    let mut transcript = WizardTranscript::default();
    transcript
        .lines
        .push(describe_current_step(&engine.snapshot().map_err(|e| e.to_string())?));
    for key in keys {
        let Some(action) = wizard_action_from_key(key) else {
            continue;
        };
        if let Some(exit) = step_wizard(engine, action, metadata_url, &mut transcript)? {
            transcript.exit = Some(exit);
            break;
        }
    }
    Ok(transcript)
}

fn step_wizard<G: FederationGateway>(
    engine: &WizardEngine<G>,
    action: WizardAction,
    metadata_url: Option<&str>,
    transcript: &mut WizardTranscript,
) -> Result<Option<WizardExit>, String> {
    let step = apply_wizard_action(engine, action, metadata_url).map_err(|e| e.to_string())?;
    if action == WizardAction::Finalize {
        if let Ok(state) = engine.snapshot() {
            transcript.created |= state.outcome().state == OutcomeState::Succeeded;
        }
    }
    transcript.record(action, step.feedback);
    Ok(step.exit)
}

fn run_interactive_wizard<G: FederationGateway>(
    engine: &WizardEngine<G>,
    metadata_url: Option<&str>,
    header: &[String],
) -> Result<WizardTranscript, String> {
    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    let result = run_interactive_loop(engine, metadata_url, header, &mut stdout);
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    if result.is_err() {
        engine.close();
    }
    result
}

fn run_interactive_loop<G: FederationGateway>(
    engine: &WizardEngine<G>,
    metadata_url: Option<&str>,
    header: &[String],
    stdout: &mut io::Stdout,
) -> Result<WizardTranscript, String> {
    let mut transcript = WizardTranscript::default();
    let mut printed = 0;
    let mut banner = header.to_vec();
    banner.push("keys: enter continue, left back, v validate, f finalize, esc close".to_string());
    banner.push(describe_current_step(&engine.snapshot().map_err(|e| e.to_string())?));
    print_lines(stdout, &banner)?;
    loop {
        if !event::poll(Duration::from_millis(250))
            .map_err(|e| format!("failed to poll wizard input: {e}"))?
        {
            continue;
        }
        let ev = event::read().map_err(|e| format!("failed to read wizard input: {e}"))?;
        let Event::Key(key) = ev else {
            continue;
        };
        let Some(action) = wizard_action_from_key(key) else {
            continue;
        };
        let exit = step_wizard(engine, action, metadata_url, &mut transcript)?;
        print_lines(stdout, &transcript.lines[printed..])?;
        printed = transcript.lines.len();
        if let Some(exit) = exit {
            transcript.exit = Some(exit);
            return Ok(transcript);
        }
    }
}

fn print_lines(stdout: &mut io::Stdout, lines: &[String]) -> Result<(), String> {
    for line in lines {
        execute!(stdout, Print(format!("{line}\r\n")))
            .map_err(|e| format!("failed to write wizard output: {e}"))?;
    }
    Ok(())
}
