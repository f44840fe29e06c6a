//! Demo end-to-end: comando "activate user" cableado con los adaptadores.
//!
//! Recorre los caminos principales del pipeline: éxito con commit, input
//! inválido (con render localizado), autorización denegada, re-ejecución
//! idempotente y fallo del cuerpo con rollback.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tracing::info;

use tramite_adapters::{CollectingReporter, InMemoryUnitOfWork, KeyContract, TableResolver};
use tramite_core::{body_fn, callback_fn, check_fn, idempotency_fn, value_to_map, BodyOutcome,
                   CheckOutcome, Command, Component, Context, CoreCommandError, Params,
                   RenderOptions};

/// "Base de datos" del demo: usuarios por id.
#[derive(Debug, Default)]
struct UserStore {
    rows: Mutex<Vec<Value>>,
}

impl UserStore {
    fn find(&self, id: &Value) -> Option<Value> {
        self.rows.lock().unwrap().iter().find(|u| &u["id"] == id).cloned()
    }

    fn activate(&self, id: &Value) {
        for row in self.rows.lock().unwrap().iter_mut() {
            if &row["id"] == id {
                row["active"] = json!(true);
            }
        }
    }
}

fn activate_user_command(store: Arc<UserStore>,
                         uow: Arc<InMemoryUnitOfWork>,
                         info: Arc<CollectingReporter>)
                         -> Result<Command, CoreCommandError> {
    let lookup_store = Arc::clone(&store);
    let contract = KeyContract::new().require("user_id")
                                     .lookup("user", move |params| {
                                         params.get("user_id").and_then(|id| lookup_store.find(id))
                                     });

    let body_store = Arc::clone(&store);
    Command::builder(body_fn(move |params, ctx| {
            let Some(id) = params.get("user_id") else {
                return BodyOutcome::Failure(json!("user_gone"));
            };
            body_store.activate(id);
            let mut user = ctx.get("user").cloned().unwrap_or(Value::Null);
            user["active"] = json!(true);
            BodyOutcome::Success(json!({"user": user}))
        }))
        .contract(Arc::new(contract))
        .policy(check_fn("actor_is_admin", &["actor"], |ctx| {
            match ctx.get("actor").and_then(|a| a.get("admin")).and_then(Value::as_bool) {
                Some(true) => CheckOutcome::Pass,
                _ => CheckOutcome::Deny,
            }
        }))
        .precondition(check_fn("user_exists", &["user"], |ctx| {
            if ctx.get("user").is_some_and(|u| !u.is_null()) {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(json!("user_not_found"))
            }
        }))
        .idempotency_check(idempotency_fn("already_active", |_, ctx| {
            let active = ctx.get("user")
                            .and_then(|u| u.get("active"))
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
            active.then(|| json!({"already_active": true}))
        }))
        .on_success(callback_fn("welcome_mail", |res| {
            info!(user = %res.context()["user"]["email"], "welcome mail queued");
            Ok(())
        }))
        .transaction(uow.clone())
        .after_commit(uow)
        .info_reporter(info)
        .resolver(Arc::new(TableResolver::new().entry("es", "missing", "es obligatorio")
                                               .entry("es", "unauthorized", "no autorizado")))
        .build()
}

fn main() -> Result<(), CoreCommandError> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                             .init();

    let store = Arc::new(UserStore::default());
    store.rows.lock().unwrap().extend([json!({"id": 1, "email": "ada@example.com", "active": false}),
                                       json!({"id": 2, "email": "alan@example.com", "active": true})]);

    let uow = Arc::new(InMemoryUnitOfWork::new());
    let info = Arc::new(CollectingReporter::new());
    let cmd = activate_user_command(Arc::clone(&store), Arc::clone(&uow), Arc::clone(&info))?;

    let admin_ctx = value_to_map(&json!({"actor": {"name": "root", "admin": true}})).unwrap();

    // 1. camino feliz: usuario inactivo, actor admin
    let res = cmd.call(&value_to_map(&json!({"user_id": 1})).unwrap(), &admin_ctx)?;
    assert!(res.success());
    println!("[ok]      activated: {}", res.context()["user"]);
    println!("[ok]      commits so far: {}", uow.commits());

    // 2. input inválido: falta user_id; render normal y localizado
    let res = cmd.call(&Params::new(), &admin_ctx)?;
    assert_eq!(res.component(), Component::Contract);
    println!("[invalid] {:?}", res.errors(&RenderOptions::default()));
    println!("[invalid] {:?}", res.errors(&RenderOptions::locale("es")));

    // 3. actor sin permisos: la policy corta antes que todo lo demás
    let guest_ctx = value_to_map(&json!({"actor": {"name": "guest", "admin": false}})).unwrap();
    let res = cmd.call(&value_to_map(&json!({"user_id": 1})).unwrap(), &guest_ctx)?;
    assert_eq!(res.component(), Component::Policies);
    println!("[denied]  {:?}", res.errors(&RenderOptions::locale("es")));

    // 4. re-ejecución: el usuario 1 ya quedó activo, bypass idempotente
    let res = cmd.call(&value_to_map(&json!({"user_id": 1})).unwrap(), &admin_ctx)?;
    assert!(res.success());
    assert_eq!(res.component(), Component::Idempotency);
    println!("[bypass]  events: {:?}",
             info.events().iter().map(|(m, _)| m.clone()).collect::<Vec<_>>());

    // 5. usuario inexistente: la precondición lo reporta, sin tocar el store
    let res = cmd.call(&value_to_map(&json!({"user_id": 99})).unwrap(), &admin_ctx)?;
    assert_eq!(res.component(), Component::Preconditions);
    println!("[missing] {:?}", res.errors(&RenderOptions::default()));

    println!("[done]    commits={} rollbacks={}", uow.commits(), uow.rollbacks());
    Ok(())
}
