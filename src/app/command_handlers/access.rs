use crate::access::{
    AccessGate, AccessGuard, AccessReport, ClaimSection, PrivilegeTier, RoleScope,
};
use crate::app::command_support::{
    ensure_state_root, load_claims, load_settings, map_config_err, split_flags, RecordedDenial,
};

pub fn cmd_access(args: &[String]) -> Result<String, String> {
    let Some(sub) = args.first() else {
        return Err(usage());
    };
    match sub.as_str() {
        "check" => cmd_access_check(&args[1..]),
        "roles" => cmd_access_roles(&args[1..]),
        _ => Err(usage()),
    }
}

fn usage() -> String {
    "usage: access check [--claims <path>] | access roles <scope> <tier> [--in <client> | --org <org-id>] [--claims <path>]"
        .to_string()
}

fn cmd_access_check(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_flags(args, &["--claims"])?;
    if !positional.is_empty() {
        return Err(usage());
    }
    let settings = load_settings()?;
    let paths = ensure_state_root()?;
    let claims = load_claims(flags.get("claims").map(String::as_str))?;
    let context = settings.access_context(claims).map_err(map_config_err)?;

    let gate = AccessGate::standard().map_err(|e| e.to_string())?;
    let report = gate.explain(&context);
    let signal = RecordedDenial::default();
    AccessGuard::new(gate).with_log(paths).observe(&context, &signal);

    let mut lines = render_report(&report);
    lines.insert(1, format!("mode={}", context.mode));
    if let Some(claims) = &context.claims {
        let scopes: Vec<&str> = claims.scope_names(ClaimSection::Client).collect();
        let orgs: Vec<&str> = claims.scope_names(ClaimSection::Organization).collect();
        lines.push(format!("claim_scopes={}", scopes.join(",")));
        lines.push(format!("claim_orgs={}", orgs.join(",")));
    }
    for realm in signal.redirects() {
        lines.push(format!("redirect=access-denied realm={realm}"));
    }
    Ok(lines.join("\n"))
}

pub(crate) fn render_report(report: &AccessReport) -> Vec<String> {
    vec![
        format!("decision={}", report.decision),
        format!("scope={}", report.scope.as_deref().unwrap_or("none")),
        format!("reason={}", report.reason),
        format!(
            "missing={}",
            if report.missing_roles.is_empty() {
                "none".to_string()
            } else {
                report.missing_roles.join(",")
            }
        ),
    ]
}

fn cmd_access_roles(args: &[String]) -> Result<String, String> {
    let (positional, flags) = split_flags(args, &["--in", "--org", "--claims"])?;
    if positional.len() != 2 {
        return Err(usage());
    }
    let gate = AccessGate::standard().map_err(|e| e.to_string())?;
    let required = gate
        .registry()
        .required_roles_by_name(&positional[0], &positional[1])
        .map_err(|e| e.to_string())?;

    let mut lines = vec![
        format!("scope={}", positional[0].trim().to_ascii_lowercase()),
        format!("tier={}", positional[1].trim().to_ascii_lowercase()),
        format!("roles={}", required.roles().join(",")),
    ];
    let target = match (flags.get("in"), flags.get("org")) {
        (Some(_), Some(_)) => return Err("--in and --org are mutually exclusive".to_string()),
        (Some(client), None) => Some((ClaimSection::Client, client)),
        (None, Some(org)) => Some((ClaimSection::Organization, org)),
        (None, None) => None,
    };
    if let Some((section, scope_name)) = target {
        let claims = load_claims(flags.get("claims").map(String::as_str))?.unwrap_or_default();
        let scope = RoleScope::parse(&positional[0]).map_err(|e| e.to_string())?;
        let tier = PrivilegeTier::parse(&positional[1]).map_err(|e| e.to_string())?;
        lines.push(format!(
            "satisfied_in_{section}_{scope_name}={}",
            gate.has_roles(&claims, scope, tier, section, scope_name)
        ));
    }
    Ok(lines.join("\n"))
}
