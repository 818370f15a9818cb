use super::gate::{AccessContext, AccessDecision, AccessGate};
use crate::shared::ids::RealmName;
use crate::shared::logging::append_access_log;
use crate::shared::paths::StatePaths;

/// Side effect invoked when access transitions into `Denied`.
pub trait DenialSignal {
    fn redirect_to_access_denied(&self, realm: &RealmName);
}

/// Caller-side holder of the last decision. Fires the denial signal once per
/// transition into `Denied`; repeated denials for the same state are silent.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    gate: AccessGate,
    last: AccessDecision,
    log_paths: Option<StatePaths>,
}

impl AccessGuard {
    pub fn new(gate: AccessGate) -> Self {
        Self {
            gate,
            last: AccessDecision::Unknown,
            log_paths: None,
        }
    }

    pub fn with_log(mut self, paths: StatePaths) -> Self {
        self.log_paths = Some(paths);
        self
    }

    pub fn decision(&self) -> AccessDecision {
        self.last
    }

    pub fn observe(&mut self, context: &AccessContext, signal: &dyn DenialSignal) -> AccessDecision {
        let report = self.gate.explain(context);
        if let Some(paths) = &self.log_paths {
            let scope = report.scope.as_deref().unwrap_or("-");
            append_access_log(
                paths,
                "info",
                "access.evaluated",
                &format!(
                    "decision={} mode={} scope={} reason={}",
                    report.decision, context.mode, scope, report.reason
                ),
            );
        }

        let previous = std::mem::replace(&mut self.last, report.decision);
        if report.decision == AccessDecision::Denied && previous != AccessDecision::Denied {
            if let Some(paths) = &self.log_paths {
                append_access_log(
                    paths,
                    "warn",
                    "access.denied_redirect",
                    &format!(
                        "realm={} missing={}",
                        context.target_realm,
                        report.missing_roles.join(",")
                    ),
                );
            }
            signal.redirect_to_access_denied(&context.target_realm);
        }
        report.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{OrgSelection, RoleClaims, TenancyMode, REALM_MANAGEMENT_SCOPE};
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingSignal {
        redirects: Cell<usize>,
    }

    impl DenialSignal for CountingSignal {
        fn redirect_to_access_denied(&self, _realm: &RealmName) {
            self.redirects.set(self.redirects.get() + 1);
        }
    }

    fn context(claims: Option<RoleClaims>, org: Option<OrgSelection>) -> AccessContext {
        AccessContext {
            mode: TenancyMode::OnPrem,
            current_org: org,
            home_realm: RealmName::parse("corp").expect("realm"),
            target_realm: RealmName::parse("corp").expect("realm"),
            claims,
        }
    }

    #[test]
    fn repeated_denial_redirects_once() {
        let mut guard = AccessGuard::new(AccessGate::standard().expect("gate"));
        let signal = CountingSignal::default();
        assert_eq!(guard.decision(), AccessDecision::Unknown);

        let denied = context(Some(RoleClaims::new()), None);
        assert_eq!(guard.observe(&denied, &signal), AccessDecision::Denied);
        assert_eq!(guard.observe(&denied, &signal), AccessDecision::Denied);
        assert_eq!(signal.redirects.get(), 1);
    }

    #[test]
    fn grant_rearms_the_redirect() {
        let mut guard = AccessGuard::new(AccessGate::standard().expect("gate"));
        let signal = CountingSignal::default();

        guard.observe(&context(None, None), &signal);
        guard.observe(&context(None, Some(OrgSelection::Global)), &signal);
        guard.observe(
            &context(
                Some(RoleClaims::new().with_scope(REALM_MANAGEMENT_SCOPE, ["view-realm"])),
                None,
            ),
            &signal,
        );
        assert_eq!(signal.redirects.get(), 2);
    }
}
