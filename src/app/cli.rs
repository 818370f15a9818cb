#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Providers,
    Access,
    Wizard,
    Endpoints,
    Config,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "providers" => CliVerb::Providers,
        "access" => CliVerb::Access,
        "wizard" => CliVerb::Wizard,
        "endpoints" => CliVerb::Endpoints,
        "config" => CliVerb::Config,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  providers                            List wizard kinds and their steps".to_string(),
        "  access check [--claims <path>]       Evaluate the access gate with current settings"
            .to_string(),
        "  access roles <scope> <tier> [--in <client> | --org <org-id>] [--claims <path>]".to_string(),
        "                                       Print a required role set (organization|realm, admin|resource)"
            .to_string(),
        "  wizard <kind> [--metadata-url <url>] [--claims <path>]".to_string(),
        "                                       Run a federation wizard after the access check"
            .to_string(),
        "  endpoints <kind>                     Print service-provider values for a new alias"
            .to_string(),
        "  config show                          Print the resolved settings".to_string(),
        "  config init <server_url> <realm>     Write a settings file".to_string(),
        String::new(),
        "Environment:".to_string(),
        "  IDP_WIZARD_CONFIG                    Settings file path override".to_string(),
        "  IDP_WIZARD_ACCESS_TOKEN              Admin API bearer token".to_string(),
        "  IDP_WIZARD_TOKEN_CLAIMS              Parsed token claims JSON file".to_string(),
        "  IDP_WIZARD_SESSION_USERNAME/PASSWORD Session credentials for the Okta LDAP wizard"
            .to_string(),
        "  IDP_WIZARD_SCRIPT_KEYS               Comma-separated keys: enter,back,v,f,esc,ctrl-c"
            .to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
