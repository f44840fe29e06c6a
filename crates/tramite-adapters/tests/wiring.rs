//! Cableado completo: core + adaptadores.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tramite_core::{body_fn, callback_fn, check_fn, value_to_map, ActionResult, BodyOutcome,
                   CheckOutcome, Command, Component, Context, Params, RenderOptions};
use tramite_adapters::{CollectingReporter, InMemoryUnitOfWork, KeyContract, TableResolver};

fn signup_contract() -> Arc<KeyContract> {
    Arc::new(KeyContract::new().require("email").lookup("account", |params| {
                                   params.get("email").map(|e| json!({"email": e, "active": true}))
                               }))
}

#[test]
fn fully_wired_command_commits_and_runs_callbacks() {
    let uow = Arc::new(InMemoryUnitOfWork::new());
    let errors = Arc::new(CollectingReporter::new());
    let saved = Arc::new(Mutex::new(Vec::<Value>::new()));

    let store = Arc::clone(&saved);
    let cmd = Command::builder(body_fn(move |_, ctx| {
                  let account = ctx.get("account").cloned().unwrap_or(Value::Null);
                  store.lock().unwrap().push(account.clone());
                  BodyOutcome::Success(json!({"saved": account}))
              }))
        .contract(signup_contract())
        .policy(check_fn("account_active", &["account"], |ctx| {
            match ctx.get("account").and_then(|a| a.get("active")).and_then(Value::as_bool) {
                Some(true) => CheckOutcome::Pass,
                _ => CheckOutcome::Deny,
            }
        }))
        .transaction(uow.clone())
        .after_commit(uow.clone())
        .error_reporter(errors.clone())
        .on_success(callback_fn("welcome_mail", |_| Ok(())))
        .build()
        .unwrap();

    let params = value_to_map(&json!({"email": "ada@example.com"})).unwrap();
    let res = cmd.call(&params, &Context::new()).unwrap();

    assert!(res.success());
    assert_eq!(res.component(), Component::Operation);
    assert_eq!(saved.lock().unwrap().len(), 1);
    assert_eq!(uow.commits(), 1);
    assert_eq!(uow.rollbacks(), 0);
    // sin transacción abierta al despachar, el callback corre en el acto
    assert_eq!(res.on_success().len(), 1);
    assert!(res.on_success()[0].success());
    assert!(errors.is_empty());
}

#[test]
fn missing_key_failure_renders_through_the_locale_table() {
    let cmd = Command::builder(body_fn(|_, _| BodyOutcome::Success(json!({}))))
        .contract(signup_contract())
        .no_policies()
        .resolver(Arc::new(TableResolver::new().entry("es", "missing", "es obligatorio")))
        .build()
        .unwrap();

    let res = cmd.call(&Params::new(), &Context::new()).unwrap();

    assert_eq!(res.component(), Component::Contract);
    let rendered = res.errors(&RenderOptions::locale("es"));
    assert_eq!(rendered[&Some("email".to_string())], vec!["es obligatorio".to_string()]);
    // el mismo resultado, con otras opciones, rinde distinto
    let plain = res.errors(&RenderOptions::default());
    assert_eq!(plain[&Some("email".to_string())], vec!["is missing".to_string()]);
}

#[test]
fn body_failure_rolls_back_and_routes_to_on_failure() {
    let uow = Arc::new(InMemoryUnitOfWork::new());
    let cmd = Command::builder(body_fn(|_, _| BodyOutcome::Failure(json!("charge_declined"))))
        .no_policies()
        .transaction(uow.clone())
        .after_commit(uow.clone())
        .on_failure(callback_fn("void_charge", |_| Ok(())))
        .build()
        .unwrap();

    let res = cmd.call(&Params::new(), &Context::new()).unwrap();

    assert!(res.failure());
    assert_eq!(uow.rollbacks(), 1);
    assert_eq!(uow.commits(), 0);
    assert_eq!(res.on_failure().len(), 1);
}

// Pipeline anidado sobre la misma unidad de trabajo: los callbacks del
// comando interno esperan al commit del bloque externo.
#[test]
fn inner_command_callbacks_defer_to_the_outermost_commit() {
    let uow = Arc::new(InMemoryUnitOfWork::new());
    let order = Arc::new(Mutex::new(Vec::<&'static str>::new()));
    let inner_result = Arc::new(Mutex::new(None::<ActionResult>));

    let log = Arc::clone(&order);
    let inner = Command::builder(body_fn(move |_, _| {
                    log.lock().unwrap().push("inner_body");
                    BodyOutcome::Success(json!({}))
                }))
        .no_policies()
        .transaction(uow.clone())
        .after_commit(uow.clone())
        .on_success({
            let log = Arc::clone(&order);
            callback_fn("inner_notify", move |_| {
                log.lock().unwrap().push("inner_callback");
                Ok(())
            })
        })
        .build()
        .unwrap();

    let inner = Arc::new(inner);
    let log = Arc::clone(&order);
    let inner_slot = Arc::clone(&inner_result);
    let outer = Command::builder(body_fn(move |_, _| {
                    log.lock().unwrap().push("outer_body_start");
                    match inner.call(&Params::new(), &Context::new()) {
                        Ok(res) => {
                            *inner_slot.lock().unwrap() = Some(res);
                        }
                        Err(_) => return BodyOutcome::Failure(json!("inner_failed")),
                    }
                    log.lock().unwrap().push("outer_body_end");
                    BodyOutcome::Success(json!({}))
                }))
        .no_policies()
        .transaction(uow.clone())
        .after_commit(uow.clone())
        .on_success({
            let log = Arc::clone(&order);
            callback_fn("outer_notify", move |_| {
                log.lock().unwrap().push("outer_callback");
                Ok(())
            })
        })
        .build()
        .unwrap();

    let res = outer.call(&Params::new(), &Context::new()).unwrap();

    assert!(res.success());
    assert_eq!(*order.lock().unwrap(),
               vec!["outer_body_start", "inner_body", "outer_body_end", "inner_callback",
                    "outer_callback"]);
    // el resultado interno se devolvió antes de que su hook corriera, así que
    // no llegó a registrar el callback
    let inner_res = inner_result.lock().unwrap().clone().unwrap();
    assert!(inner_res.on_success().is_empty());
    assert_eq!(uow.commits(), 2);
    assert_eq!(uow.pending_hooks(), 0);
}
