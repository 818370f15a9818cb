use idp_wizard::gateway::{
    FederationAck, FederationConfig, FederationGateway, FederationRequest, GatewayFault,
    ProviderKind,
};
use idp_wizard::shared::ids::{ProviderAlias, RealmName};
use idp_wizard::wizard::{
    apply_wizard_action, parse_scripted_wizard_keys, wizard_action_from_key, FederationTarget,
    StepDefinitionSet, StepDescriptor, WizardAction, WizardEngine, WizardExit, WizardKind,
};

struct FailingImportGateway;

impl FederationGateway for FailingImportGateway {
    fn import_from_url(
        &self,
        _url: &str,
        _kind: ProviderKind,
        _realm: &RealmName,
    ) -> Result<FederationConfig, GatewayFault> {
        Err(GatewayFault::Transport("connection refused".to_string()))
    }

    fn create(
        &self,
        _request: &FederationRequest,
        _realm: &RealmName,
    ) -> Result<FederationAck, GatewayFault> {
        Ok(FederationAck::default())
    }
}

fn onelogin_engine() -> WizardEngine<FailingImportGateway> {
    WizardEngine::for_kind(
        WizardKind::OneLoginSaml,
        RealmName::parse("corp").expect("realm"),
        ProviderAlias::parse("onelogin-saml-ffee00").expect("alias"),
        FailingImportGateway,
    )
    .expect("engine")
}

fn press(engine: &WizardEngine<FailingImportGateway>, action: WizardAction) -> Vec<String> {
    apply_wizard_action(engine, action, Some("https://idp.example.com/metadata"))
        .expect("driver step")
        .feedback
}

#[test]
fn continue_on_instruction_steps_confirms_and_advances() {
    let engine = onelogin_engine();
    assert_eq!(
        press(&engine, WizardAction::Continue),
        vec!["Step 2/5: Enter Service Provider Details".to_string()]
    );
    assert_eq!(
        press(&engine, WizardAction::Back),
        vec!["Step 1/5: Add the SAML Connector".to_string()]
    );
    assert_eq!(
        press(&engine, WizardAction::Back),
        vec!["There is no previous step.".to_string()]
    );
}

#[test]
fn validation_step_blocks_continue_until_metadata_is_accepted() {
    let engine = onelogin_engine();
    for _ in 0..3 {
        press(&engine, WizardAction::Continue);
    }
    assert_eq!(engine.snapshot().expect("open").current_step_id(), 4);

    let feedback = press(&engine, WizardAction::Validate);
    assert_eq!(
        feedback,
        vec![
            "Configuration validation failed with OneLogin SAML IdP. Check URL and try again."
                .to_string()
        ]
    );
    let feedback = press(&engine, WizardAction::Continue);
    assert!(feedback[0].contains("Validate the IdP metadata URL"));
    assert_eq!(engine.snapshot().expect("open").current_step_id(), 4);
}

#[test]
fn finalize_away_from_confirmation_is_reported_not_raised() {
    let engine = onelogin_engine();
    let feedback = press(&engine, WizardAction::Finalize);
    assert_eq!(
        feedback,
        vec!["`finalize` is not available at step 1".to_string()]
    );
    assert!(!engine.is_closed());
}

#[test]
fn close_exits_and_later_actions_report_closed() {
    let engine = onelogin_engine();
    let step = apply_wizard_action(&engine, WizardAction::Close, None).expect("close");
    assert_eq!(step.exit, Some(WizardExit::Canceled));
    assert!(engine.is_closed());
    assert!(apply_wizard_action(&engine, WizardAction::Continue, None).is_err());
}

#[test]
fn scripted_tokens_map_to_actions() {
    let actions: Vec<_> = parse_scripted_wizard_keys("enter, back ,v,f,esc,ctrl-c,")
        .expect("keys")
        .into_iter()
        .filter_map(wizard_action_from_key)
        .collect();
    assert_eq!(
        actions,
        vec![
            WizardAction::Continue,
            WizardAction::Back,
            WizardAction::Validate,
            WizardAction::Finalize,
            WizardAction::Close,
            WizardAction::Close,
        ]
    );
}

#[test]
fn hidden_back_keeps_operator_on_the_step() {
    let steps = StepDefinitionSet::new(vec![
        StepDescriptor::instruction(1, "Enable LDAP Interface"),
        StepDescriptor::instruction(2, "LDAP Authentication").with_hidden_back(),
        StepDescriptor::confirmation(3, "Confirmation"),
    ])
    .expect("steps");
    let engine = WizardEngine::new(
        steps,
        FederationTarget::for_kind(
            WizardKind::OktaLdap,
            RealmName::parse("corp").expect("realm"),
            ProviderAlias::parse("okta-ldap-010203").expect("alias"),
        ),
        FailingImportGateway,
    );

    press(&engine, WizardAction::Continue);
    assert_eq!(
        press(&engine, WizardAction::Back),
        vec!["There is no previous step.".to_string()]
    );
    assert_eq!(engine.snapshot().expect("open").current_step_id(), 2);
}
