//! Entry points auxiliares y variantes estrictas.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};
use tramite_core::{body_fn, check_fn, idempotency_fn, value_to_map, ActionResult, BodyOutcome,
                   CheckOutcome, Command, Component, Context, CoreCommandError, Message,
                   MessageSet, Params, StrictCallError};

#[derive(Debug)]
struct NameContract;

impl tramite_core::Contract for NameContract {
    fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        let mut errors = MessageSet::new();
        if params.get("name").is_none() {
            errors.push(Message::from_text("is missing").with_path("name"));
        }
        Ok(ActionResult::stage_with_errors(Component::Contract,
                                           params.clone(),
                                           context.clone(),
                                           errors))
    }
}

fn admin_policy() -> Arc<dyn tramite_core::Check> {
    check_fn("admin", &["admin"], |ctx| {
        match ctx.get("admin").and_then(Value::as_bool) {
            Some(true) => CheckOutcome::Pass,
            _ => CheckOutcome::Deny,
        }
    })
}

fn sample_command(body_ran: Arc<AtomicBool>) -> Command {
    Command::builder(body_fn(move |_, _| {
            body_ran.store(true, Ordering::SeqCst);
            BodyOutcome::Success(json!({}))
        }))
        .contract(Arc::new(NameContract))
        .policy(admin_policy())
        .precondition(check_fn("active", &["active"], |ctx| {
            match ctx.get("active").and_then(Value::as_bool) {
                Some(true) => CheckOutcome::Pass,
                _ => CheckOutcome::Fail(json!("not_active")),
            }
        }))
        .idempotency_check(idempotency_fn("always", |_, _| Some(json!({"skipped": true}))))
        .build()
        .unwrap()
}

fn good_ctx() -> Context {
    value_to_map(&json!({"admin": true, "active": true})).unwrap()
}

#[test]
fn validate_runs_gates_but_never_idempotency_nor_body() {
    let body_ran = Arc::new(AtomicBool::new(false));
    let cmd = sample_command(Arc::clone(&body_ran));
    let params = value_to_map(&json!({"name": "ada"})).unwrap();

    let res = cmd.validate(&params, &good_ctx()).unwrap();

    assert!(res.success());
    // con un check de idempotencia que siempre dispara, `call` hubiera
    // devuelto component=idempotency; validate ni lo mira
    assert_eq!(res.component(), Component::Contract);
    assert!(!body_ran.load(Ordering::SeqCst));
}

#[test]
fn validate_reports_policy_failures_over_contract_noise() {
    let cmd = sample_command(Arc::new(AtomicBool::new(false)));
    let ctx = value_to_map(&json!({"admin": false, "active": true})).unwrap();

    // params inválidos Y policy fallando: gana la policy
    let res = cmd.validate(&Params::new(), &ctx).unwrap();
    assert_eq!(res.component(), Component::Policies);
}

#[test]
fn callable_checks_policies_then_preconditions() {
    let cmd = sample_command(Arc::new(AtomicBool::new(false)));

    let denied = value_to_map(&json!({"admin": false, "active": false})).unwrap();
    let res = cmd.callable(&Params::new(), &denied).unwrap();
    // la policy corta primero
    assert_eq!(res.component(), Component::Policies);

    let inactive = value_to_map(&json!({"admin": true, "active": false})).unwrap();
    let res = cmd.callable(&Params::new(), &inactive).unwrap();
    assert_eq!(res.component(), Component::Preconditions);
    assert_eq!(res.messages().codes(), vec!["not_active"]);

    assert!(cmd.is_callable(&Params::new(), &good_ctx()).unwrap());
}

#[test]
fn allowed_and_possible_run_single_gates() {
    let cmd = sample_command(Arc::new(AtomicBool::new(false)));

    let inactive = value_to_map(&json!({"admin": true, "active": false})).unwrap();
    // allowed ignora precondiciones
    assert!(cmd.is_allowed(&Params::new(), &inactive).unwrap());
    assert!(!cmd.is_possible(&Params::new(), &inactive).unwrap());

    let denied = value_to_map(&json!({"admin": false, "active": true})).unwrap();
    assert!(!cmd.is_allowed(&Params::new(), &denied).unwrap());
    assert!(cmd.is_possible(&Params::new(), &denied).unwrap());
}

#[test]
fn is_valid_discards_the_result() {
    let cmd = sample_command(Arc::new(AtomicBool::new(false)));
    assert!(!cmd.is_valid(&Params::new(), &good_ctx()).unwrap());
    let params = value_to_map(&json!({"name": "ada"})).unwrap();
    assert!(cmd.is_valid(&params, &good_ctx()).unwrap());
}

#[test]
fn call_strict_converts_any_failure_into_an_error_with_the_result() {
    let cmd = Command::builder(body_fn(|_, _| BodyOutcome::Success(json!({}))))
        .policy(check_fn("deny", &[], |_| CheckOutcome::Deny))
        .build()
        .unwrap();

    let err = cmd.call_strict(&Params::new(), &Context::new()).unwrap_err();
    match &err {
        StrictCallError::Failed(res) => assert_eq!(res.component(), Component::Policies),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.result().is_some());
}

#[test]
fn call_strict_tolerant_accepts_gate_failures_but_not_body_failures() {
    let gated = Command::builder(body_fn(|_, _| BodyOutcome::Success(json!({}))))
        .policy(check_fn("deny", &[], |_| CheckOutcome::Deny))
        .build()
        .unwrap();
    // fallo de policy: condición esperada, vuelve como Ok
    let res = gated.call_strict_tolerant(&Params::new(), &Context::new()).unwrap();
    assert!(res.failure());
    assert_eq!(res.component(), Component::Policies);

    let broken = Command::builder(body_fn(|_, _| BodyOutcome::Failure(json!("boom"))))
        .no_policies()
        .build()
        .unwrap();
    let err = broken.call_strict_tolerant(&Params::new(), &Context::new()).unwrap_err();
    assert!(matches!(err, StrictCallError::Failed(_)));
}

#[test]
fn call_strict_passes_success_through() {
    let cmd = Command::builder(body_fn(|_, _| BodyOutcome::Success(json!({"ok": 1}))))
        .no_policies()
        .build()
        .unwrap();
    let res = cmd.call_strict(&Params::new(), &Context::new()).unwrap();
    assert_eq!(res.context().get("ok"), Some(&json!(1)));
}
