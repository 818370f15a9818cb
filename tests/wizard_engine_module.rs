use idp_wizard::gateway::{
    FederationAck, FederationConfig, FederationGateway, FederationRequest, GatewayFault,
    ProviderKind,
};
use idp_wizard::shared::ids::{ProviderAlias, RealmName};
use idp_wizard::shared::paths::StatePaths;
use idp_wizard::wizard::{
    FederationTarget, OutcomeState, StepDefinitionSet, StepDescriptor, WizardEngine, WizardError,
    WizardKind,
};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

/// Gateway with fixed import/create results.
struct ScriptedGateway {
    import: Result<FederationConfig, GatewayFault>,
    create: Result<FederationAck, GatewayFault>,
    creates: AtomicUsize,
    last_request: Mutex<Option<FederationRequest>>,
}

impl ScriptedGateway {
    fn accepting() -> Self {
        Self {
            import: Ok(FederationConfig::new().with("entityId", "https://idp.example.com")),
            create: Ok(FederationAck {
                location: Some("https://auth/admin/realms/corp/identity-provider/instances/x".to_string()),
            }),
            creates: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }
}

impl FederationGateway for ScriptedGateway {
    fn import_from_url(
        &self,
        _url: &str,
        _kind: ProviderKind,
        _realm: &RealmName,
    ) -> Result<FederationConfig, GatewayFault> {
        self.import.clone()
    }

    fn create(
        &self,
        request: &FederationRequest,
        _realm: &RealmName,
    ) -> Result<FederationAck, GatewayFault> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("lock") = Some(request.clone());
        self.create.clone()
    }
}

fn target() -> FederationTarget {
    FederationTarget::for_kind(
        WizardKind::OktaSaml,
        RealmName::parse("corp").expect("realm"),
        ProviderAlias::parse("okta-saml-123abc").expect("alias"),
    )
}

fn three_content_steps() -> StepDefinitionSet {
    StepDefinitionSet::new(vec![
        StepDescriptor::instruction(1, "Add a SAML Application"),
        StepDescriptor::instruction(2, "Enter Service Provider Details"),
        StepDescriptor::validation(3, "Upload IdP Information"),
        StepDescriptor::confirmation(4, "Confirmation"),
    ])
    .expect("steps")
}

fn engine_with(gateway: ScriptedGateway) -> WizardEngine<ScriptedGateway> {
    WizardEngine::new(three_content_steps(), target(), gateway)
}

fn walk_to_validation<G: FederationGateway>(engine: &WizardEngine<G>) {
    engine.report_validity(1, true).expect("open");
    engine.advance(2).expect("to 2");
    engine.report_validity(2, true).expect("open");
    engine.advance(3).expect("to 3");
}

#[test]
fn forward_navigation_requires_current_step_validity() {
    let engine = engine_with(ScriptedGateway::accepting());

    assert_eq!(engine.report_validity(1, true), Ok(true));
    engine.advance(2).expect("advance to 2");
    assert!(matches!(
        engine.advance(3),
        Err(WizardError::NavigationRejected {
            current: 2,
            target: 3,
            high_water: 2
        })
    ));

    engine.report_validity(2, true).expect("open");
    engine.advance(3).expect("advance to 3");
    assert_eq!(engine.snapshot().expect("open").high_water_step_id(), 3);
}

#[test]
fn high_water_never_decreases_on_back_navigation() {
    let engine = engine_with(ScriptedGateway::accepting());
    walk_to_validation(&engine);

    engine.advance(1).expect("back to 1");
    let state = engine.snapshot().expect("open");
    assert_eq!(state.current_step_id(), 1);
    assert_eq!(state.high_water_step_id(), 3);

    engine.advance(3).expect("jump back to reached step");
    assert_eq!(engine.snapshot().expect("open").current_step_id(), 3);
}

#[test]
fn skipping_ahead_is_rejected() {
    let engine = engine_with(ScriptedGateway::accepting());
    engine.report_validity(1, true).expect("open");
    assert!(matches!(
        engine.advance(3),
        Err(WizardError::NavigationRejected { .. })
    ));
    assert_eq!(engine.snapshot().expect("open").current_step_id(), 1);
}

#[test]
fn gateway_fault_on_validation_marks_step_invalid_without_touching_outcome() {
    let mut gateway = ScriptedGateway::accepting();
    gateway.import = Err(GatewayFault::Rejected {
        status: 400,
        body: "invalid metadata".to_string(),
    });
    let engine = engine_with(gateway);
    walk_to_validation(&engine);

    let report = engine
        .submit_external_validation("https://idp.example.com/bad")
        .expect("validation never errors on faults");
    assert!(!report.accepted);
    assert_eq!(
        report.message,
        "Configuration validation failed with Okta SAML IdP. Check URL and try again."
    );

    let state = engine.snapshot().expect("open");
    assert!(!state.current_step_valid());
    assert!(state.pending_config().is_none());
    assert_eq!(state.outcome().state, OutcomeState::Idle);
    assert!(matches!(
        engine.advance(4),
        Err(WizardError::NavigationRejected { .. })
    ));
}

#[test]
fn successful_finalize_locks_resubmission_and_opens_finish() {
    let engine = engine_with(ScriptedGateway::accepting());
    walk_to_validation(&engine);
    let report = engine
        .submit_external_validation("https://idp.example.com/metadata")
        .expect("validate");
    assert!(report.accepted);
    engine.advance(4).expect("to confirmation");

    let outcome = engine.finalize().expect("finalize");
    assert_eq!(outcome.state, OutcomeState::Succeeded);
    assert_eq!(
        outcome.message,
        "Okta SAML IdP created successfully. Click finish."
    );
    assert!(outcome.resubmission_locked);
    assert_eq!(engine.snapshot().expect("open").high_water_step_id(), 5);

    assert!(matches!(
        engine.finalize(),
        Err(WizardError::OperationInProgress { .. })
    ));
    assert_eq!(engine.gateway().creates.load(Ordering::SeqCst), 1);

    let request = engine
        .gateway()
        .last_request
        .lock()
        .expect("lock")
        .clone()
        .expect("request");
    assert_eq!(request.alias.as_str(), "okta-saml-123abc");
    assert_eq!(request.kind, ProviderKind::Saml);
    assert!(request.config.get("entityId").is_some());
    assert!(request.config.get("syncMode").is_some());

    engine.advance(5).expect("finish");
    assert!(engine.snapshot().expect("open").is_finished());
}

#[test]
fn finalize_after_success_is_a_duplicate_from_any_step() {
    let engine = engine_with(ScriptedGateway::accepting());
    walk_to_validation(&engine);
    engine
        .submit_external_validation("https://idp.example.com/metadata")
        .expect("validate");
    engine.advance(4).expect("to confirmation");
    assert_eq!(
        engine.finalize().expect("finalize").state,
        OutcomeState::Succeeded
    );

    engine.advance(1).expect("back to 1");
    assert!(matches!(
        engine.finalize(),
        Err(WizardError::OperationInProgress { .. })
    ));

    engine.advance(5).expect("finish");
    assert!(matches!(
        engine.finalize(),
        Err(WizardError::OperationInProgress { .. })
    ));
    assert_eq!(engine.gateway().creates.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_finalize_can_be_retried() {
    let mut gateway = ScriptedGateway::accepting();
    gateway.create = Err(GatewayFault::Timeout { seconds: 30 });
    let engine = engine_with(gateway);
    walk_to_validation(&engine);
    engine
        .submit_external_validation("https://idp.example.com/metadata")
        .expect("validate");
    engine.advance(4).expect("to confirmation");

    let outcome = engine.finalize().expect("finalize");
    assert_eq!(outcome.state, OutcomeState::Failed);
    assert!(outcome.message.starts_with("Error creating Okta SAML IdP:"));
    assert!(!outcome.resubmission_locked);
    assert!(matches!(
        engine.advance(5),
        Err(WizardError::NavigationRejected { .. })
    ));

    let again = engine.finalize().expect("retry");
    assert_eq!(again.state, OutcomeState::Failed);
    assert_eq!(engine.gateway().creates.load(Ordering::SeqCst), 2);
}

#[test]
fn finalize_is_only_available_at_confirmation() {
    let engine = engine_with(ScriptedGateway::accepting());
    assert!(matches!(
        engine.finalize(),
        Err(WizardError::NotAtStep {
            operation: "finalize",
            step: 1
        })
    ));
    assert!(matches!(
        engine.submit_external_validation("https://idp"),
        Err(WizardError::NotAtStep { .. })
    ));
}

/// Gateway whose calls block until the test releases them.
struct BlockingGateway {
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl BlockingGateway {
    fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let gateway = Self {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        (gateway, entered_rx, release_tx)
    }

    fn wait_for_release(&self) {
        let _ = self.entered.lock().expect("lock").send(());
        let _ = self.release.lock().expect("lock").recv();
    }
}

impl FederationGateway for BlockingGateway {
    fn import_from_url(
        &self,
        _url: &str,
        _kind: ProviderKind,
        _realm: &RealmName,
    ) -> Result<FederationConfig, GatewayFault> {
        self.wait_for_release();
        Ok(FederationConfig::new().with("entityId", "https://idp.example.com"))
    }

    fn create(
        &self,
        _request: &FederationRequest,
        _realm: &RealmName,
    ) -> Result<FederationAck, GatewayFault> {
        self.wait_for_release();
        Ok(FederationAck::default())
    }
}

#[test]
fn close_while_finalize_is_in_flight_discards_the_result() {
    let (gateway, entered_rx, release_tx) = BlockingGateway::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = StatePaths::new(dir.path());
    let steps = StepDefinitionSet::new(vec![
        StepDescriptor::instruction(1, "Enable LDAP Interface"),
        StepDescriptor::confirmation(2, "Confirmation"),
    ])
    .expect("steps");
    let engine = Arc::new(
        WizardEngine::new(steps, target(), gateway)
            .with_log(paths.clone())
            .with_pending_config(FederationConfig::new().with("enabled", "true")),
    );
    engine.report_validity(1, true).expect("open");
    engine.advance(2).expect("to confirmation");

    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.finalize())
    };
    entered_rx.recv().expect("create entered");

    let state = engine.snapshot().expect("still open");
    assert_eq!(state.outcome().state, OutcomeState::InFlight);
    assert!(matches!(
        engine.advance(1),
        Err(WizardError::OperationInProgress { .. })
    ));

    assert!(engine.close());
    release_tx.send(()).expect("release");
    assert_eq!(worker.join().expect("join"), Err(WizardError::Closed));
    assert!(engine.is_closed());

    let log = fs::read_to_string(paths.wizard_log_path()).expect("wizard log");
    assert!(log.contains("wizard.discarded"));
    assert!(!log.contains("wizard.finalize_succeeded"));
}

#[test]
fn close_while_validation_is_in_flight_discards_the_result() {
    let (gateway, entered_rx, release_tx) = BlockingGateway::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = StatePaths::new(dir.path());
    let engine = Arc::new(
        WizardEngine::new(three_content_steps(), target(), gateway).with_log(paths.clone()),
    );
    walk_to_validation(engine.as_ref());

    let worker = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.submit_external_validation("https://idp.example.com/metadata"))
    };
    entered_rx.recv().expect("import entered");

    assert!(matches!(
        engine.submit_external_validation("https://idp.example.com/metadata"),
        Err(WizardError::OperationInProgress { .. })
    ));
    assert!(matches!(
        engine.advance(2),
        Err(WizardError::OperationInProgress { .. })
    ));

    assert!(engine.close());
    release_tx.send(()).expect("release");
    assert_eq!(worker.join().expect("join"), Err(WizardError::Closed));
    assert!(engine.is_closed());
    assert!(matches!(engine.snapshot(), Err(WizardError::Closed)));

    let log = fs::read_to_string(paths.wizard_log_path()).expect("wizard log");
    assert!(log.contains("wizard.discarded"));
    assert!(log.contains("validation result for step 3"));
    assert!(!log.contains("wizard.validation_succeeded"));
}
