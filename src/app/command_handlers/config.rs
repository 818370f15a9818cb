use crate::access::TenancyMode;
use crate::app::command_support::{load_settings, map_config_err, split_flags};
use crate::config::{default_global_config_path, save_settings, Settings};
use crate::shared::ids::RealmName;

pub fn cmd_config(args: &[String]) -> Result<String, String> {
    match args.first().map(String::as_str) {
        Some("show") if args.len() == 1 => cmd_config_show(),
        Some("init") => cmd_config_init(&args[1..]),
        _ => Err(
            "usage: config show | config init <server_url> <realm> [--auth-realm <realm>] [--api-mode cloud|onprem] [--org <id>] [--okta-customer <id>] [--timeout <seconds>]"
                .to_string(),
        ),
    }
}

fn cmd_config_show() -> Result<String, String> {
    let path = default_global_config_path().map_err(map_config_err)?;
    let settings = load_settings()?;
    let body =
        serde_yaml::to_string(&settings).map_err(|e| format!("failed to encode settings: {e}"))?;
    Ok(format!("config={}\n{}", path.display(), body.trim_end()))
}

fn cmd_config_init(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_flags(
        args,
        &[
            "--auth-realm",
            "--api-mode",
            "--org",
            "--okta-customer",
            "--timeout",
        ],
    )?;
    let [server_url, realm] = positional.as_slice() else {
        return Err("usage: config init <server_url> <realm>".to_string());
    };

    let mut settings = Settings::new(server_url.trim(), RealmName::parse(realm)?);
    if let Some(auth_realm) = flags.get("auth-realm") {
        settings.auth_realm = RealmName::parse(auth_realm)?;
    }
    if let Some(mode) = flags.get("api-mode") {
        settings.api_mode = TenancyMode::parse(mode)?;
    }
    if let Some(org) = flags.get("org") {
        settings.current_org = Some(org.clone());
    }
    if let Some(customer) = flags.get("okta-customer") {
        settings.okta.customer_identifier = Some(customer.clone());
    }
    if let Some(timeout) = flags.get("timeout") {
        settings.request_timeout_seconds = timeout
            .parse()
            .map_err(|_| format!("invalid --timeout `{timeout}`"))?;
    }

    let path = save_settings(&settings).map_err(map_config_err)?;
    Ok(format!(
        "config saved\nconfig={}\nserver_url={}\nrealm={}\napi_mode={}",
        path.display(),
        settings.server_url,
        settings.realm,
        settings.api_mode
    ))
}
