use crate::app::command_support::load_settings;
use crate::gateway::{generate_alias, BrokerEndpoints};
use crate::wizard::{WizardKind, ALL_WIZARD_KINDS};

pub fn cmd_providers(args: &[String]) -> Result<String, String> {
    if !args.is_empty() {
        return Err("usage: providers".to_string());
    }
    let mut lines = Vec::new();
    for kind in ALL_WIZARD_KINDS {
        let steps = kind.steps().map_err(|e| e.to_string())?;
        lines.push(format!(
            "{} ({}, {}): {} steps",
            kind,
            kind.common_name(),
            kind.protocol(),
            steps.len()
        ));
        for step in steps.iter() {
            lines.push(format!("  {}. {} [{}]", step.id, step.name, step.kind.as_str()));
        }
    }
    Ok(lines.join("\n"))
}

pub fn cmd_endpoints(args: &[String]) -> Result<String, String> {
    let [kind] = args else {
        return Err("usage: endpoints <kind>".to_string());
    };
    let kind = WizardKind::parse(kind)?;
    let settings = load_settings()?;
    let alias = generate_alias(kind.alias_preface())?;
    let endpoints = BrokerEndpoints::new(
        &settings.server_url,
        &settings.realm,
        &settings.auth_realm,
        &alias,
        kind.protocol(),
    );
    Ok(format!(
        "wizard={kind}\nalias={alias}\nsso_url={}\naudience_uri={}\nadmin_link={}",
        endpoints.sso_url, endpoints.audience_uri, endpoints.admin_link
    ))
}
