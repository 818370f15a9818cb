use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod access;
pub mod config;
pub mod providers;
pub mod wizard;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Providers => providers::cmd_providers(&args[1..]),
        CliVerb::Access => access::cmd_access(&args[1..]),
        CliVerb::Wizard => wizard::cmd_wizard(&args[1..]),
        CliVerb::Endpoints => providers::cmd_endpoints(&args[1..]),
        CliVerb::Config => config::cmd_config(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
