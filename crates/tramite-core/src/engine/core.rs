//! Máquina de estados del comando.
//!
//! Estados (= valores de `Component`), en orden estricto:
//! `contract → policies → idempotency → preconditions → operation →
//! (on_success | on_failure)`.
//!
//! Sutileza de orden ("callable-before-contract"): el contrato corre primero
//! porque es la única etapa que puebla contexto desde params. Pero si el
//! contrato FALLA no devolvemos ese fallo de inmediato: si las
//! policies/precondiciones son evaluables con el contexto que el contrato
//! alcanzó a poblar y TAMBIÉN fallan, ese fallo es más fundamental que un
//! error de forma del input y es el que se devuelve. Sólo si no son
//! evaluables (contexto insuficiente) o pasan, aflora el fallo del contrato.

use std::sync::{Arc, Mutex};

use tracing::debug;
use uuid::Uuid;

use crate::command::Command;
use crate::errors::{CoreCommandError, StrictCallError};
use crate::model::{ActionResult, CallbackRecord, Component, Context, Params, ResultPatch};
use crate::stage::{run_callbacks, Callback};

/// Veredicto de las etapas transaccionales. Separa el corte (sin callbacks)
/// de las salidas que despachan callbacks fuera de la transacción.
#[derive(Debug)]
pub enum PipelineVerdict {
    /// Fallo de contract/policies/preconditions: corta sin callbacks.
    Halted(ActionResult),
    /// Bypass de idempotencia: resultado exitoso, corren `on_success`.
    Bypassed(ActionResult),
    /// Cuerpo exitoso: la transacción commitea y corren `on_success`.
    Completed(ActionResult),
    /// Cuerpo fallido: la transacción no commitea y corren `on_failure`.
    BodyFailed(ActionResult),
}

#[derive(Debug, Clone, Copy)]
enum CallbackBranch {
    Success,
    Failure,
}

impl Command {
    /// Ejecuta el pipeline completo.
    ///
    /// Los pasos contract..operation corren dentro del transaction-wrapper
    /// inyectado; los callbacks corren afuera, después del commit (o del
    /// rollback, para `on_failure`). `Err(..)` sólo para errores de
    /// programador; todo lo demás es un `ActionResult`.
    pub fn call(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        let call_id = Uuid::new_v4();
        debug!(%call_id, "command call started");

        let verdict = {
            let mut runner = || self.run_staged(call_id, params, context);
            self.capabilities.transaction.call(&mut runner)
        }?;

        let resolved = match verdict {
            PipelineVerdict::Halted(res) => self.finalize(res),
            PipelineVerdict::Bypassed(res) | PipelineVerdict::Completed(res) => {
                self.dispatch_callbacks(self.finalize(res), CallbackBranch::Success)
            }
            PipelineVerdict::BodyFailed(res) => {
                self.dispatch_callbacks(self.finalize(res), CallbackBranch::Failure)
            }
        };

        debug!(%call_id,
               component = %resolved.component(),
               success = resolved.success(),
               "command call resolved");
        Ok(resolved)
    }

    /// Pasos 2–8 del pipeline (la parte transaccional).
    fn run_staged(&self,
                  call_id: Uuid,
                  params: &Params,
                  context: &Context)
                  -> Result<PipelineVerdict, CoreCommandError> {
        // 2. contrato: coerción de params + enriquecimiento de contexto
        let contract_res = self.contract.call(params, context)?;
        debug!(%call_id, stage = "contract", success = contract_res.success(), "stage finished");

        // 3. fallo de contrato + policies no evaluables ⇒ corta con el contrato
        if contract_res.failure() && !self.policies.evaluable(contract_res.context()) {
            return Ok(PipelineVerdict::Halted(contract_res));
        }

        // 4. policies (corren aunque el contrato haya fallado, si son
        // evaluables); su fallo enmascara al del contrato
        let policy_res = self.policies.call(contract_res.params(), contract_res.context())?;
        if policy_res.failure() {
            debug!(%call_id, stage = "policies", "halted");
            return Ok(PipelineVerdict::Halted(policy_res));
        }

        // 5. idempotencia: un disparo saltea el cuerpo con resultado exitoso
        if let Some(bypass) = self.idempotency.call(contract_res.params(),
                                                    contract_res.context(),
                                                    &*self.capabilities.info_reporter)?
        {
            debug!(%call_id, stage = "idempotency", "bypassed");
            return Ok(PipelineVerdict::Bypassed(bypass));
        }

        // 6. mismo tratamiento de evaluabilidad para precondiciones
        if contract_res.failure() && !self.preconditions.evaluable(contract_res.context()) {
            return Ok(PipelineVerdict::Halted(contract_res));
        }
        let pre_res = self.preconditions.call(contract_res.params(), contract_res.context())?;
        if pre_res.failure() {
            debug!(%call_id, stage = "preconditions", "halted");
            return Ok(PipelineVerdict::Halted(pre_res));
        }

        // 7. gates pasaron: el error de forma del input es la única
        // explicación restante
        if contract_res.failure() {
            return Ok(PipelineVerdict::Halted(contract_res));
        }

        // 8. cuerpo de la operación
        let body_res = self.operation.call(contract_res.params(), contract_res.context())?;
        debug!(%call_id, stage = "operation", success = body_res.success(), "stage finished");
        if body_res.failure() {
            Ok(PipelineVerdict::BodyFailed(body_res))
        } else {
            Ok(PipelineVerdict::Completed(body_res))
        }
    }

    /// contract + policies + preconditions, sin idempotencia/cuerpo y sin
    /// transacción. Misma regla de enmascaramiento que `call`.
    pub fn validate(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        let contract_res = self.contract.call(params, context)?;

        if contract_res.failure() && !self.policies.evaluable(contract_res.context()) {
            return Ok(self.finalize(contract_res));
        }
        let policy_res = self.policies.call(contract_res.params(), contract_res.context())?;
        if policy_res.failure() {
            return Ok(self.finalize(policy_res));
        }

        if contract_res.failure() && !self.preconditions.evaluable(contract_res.context()) {
            return Ok(self.finalize(contract_res));
        }
        let pre_res = self.preconditions.call(contract_res.params(), contract_res.context())?;
        if pre_res.failure() {
            return Ok(self.finalize(pre_res));
        }

        Ok(self.finalize(contract_res))
    }

    /// policies + preconditions sobre el contexto del caller, sin contrato.
    /// (El enmascaramiento no aplica: no hay fallo de contrato que tapar.)
    pub fn callable(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        let policy_res = self.policies.call(params, context)?;
        if policy_res.failure() {
            return Ok(self.finalize(policy_res));
        }
        let pre_res = self.preconditions.call(params, context)?;
        Ok(self.finalize(pre_res))
    }

    /// Sólo policies.
    pub fn allowed(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        Ok(self.finalize(self.policies.call(params, context)?))
    }

    /// Sólo preconditions.
    pub fn possible(&self, params: &Params, context: &Context) -> Result<ActionResult, CoreCommandError> {
        Ok(self.finalize(self.preconditions.call(params, context)?))
    }

    pub fn is_valid(&self, params: &Params, context: &Context) -> Result<bool, CoreCommandError> {
        Ok(self.validate(params, context)?.success())
    }

    pub fn is_callable(&self, params: &Params, context: &Context) -> Result<bool, CoreCommandError> {
        Ok(self.callable(params, context)?.success())
    }

    pub fn is_allowed(&self, params: &Params, context: &Context) -> Result<bool, CoreCommandError> {
        Ok(self.allowed(params, context)?.success())
    }

    pub fn is_possible(&self, params: &Params, context: &Context) -> Result<bool, CoreCommandError> {
        Ok(self.possible(params, context)?.success())
    }

    /// Variante estricta: cualquier resultado fallido se convierte en un
    /// error explícito que transporta el resultado completo.
    pub fn call_strict(&self, params: &Params, context: &Context) -> Result<ActionResult, StrictCallError> {
        let result = self.call(params, context)?;
        if result.failure() {
            return Err(StrictCallError::Failed(Box::new(result)));
        }
        Ok(result)
    }

    /// Variante estricta tolerante: los fallos de policy/precondición son
    /// condiciones esperadas de cara al usuario y vuelven como `Ok`; sólo
    /// contract/operation fallan como error.
    pub fn call_strict_tolerant(&self,
                                params: &Params,
                                context: &Context)
                                -> Result<ActionResult, StrictCallError> {
        let result = self.call(params, context)?;
        if result.failure()
           && !matches!(result.component(), Component::Policies | Component::Preconditions)
        {
            return Err(StrictCallError::Failed(Box::new(result)));
        }
        Ok(result)
    }

    fn finalize(&self, result: ActionResult) -> ActionResult {
        result.with_resolver(Arc::clone(&self.capabilities.resolver))
    }

    /// Despacha la rama de callbacks vía el scheduler after-commit. El hook
    /// es `'static`: un scheduler que difiere (transacción anidada) lo corre
    /// después del commit más externo, y en ese caso los registros no llegan
    /// a este resultado (ya se devolvió).
    fn dispatch_callbacks(&self, result: ActionResult, branch: CallbackBranch) -> ActionResult {
        let entries: Vec<Arc<dyn Callback>> = match branch {
            CallbackBranch::Success => self.on_success.clone(),
            CallbackBranch::Failure => self.on_failure.clone(),
        };
        if entries.is_empty() {
            return result;
        }

        let records: Arc<Mutex<Vec<CallbackRecord>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        let reporter = Arc::clone(&self.capabilities.error_reporter);
        let snapshot = result.clone();

        self.capabilities.after_commit.schedule(Box::new(move || {
            let ran = run_callbacks(&entries, &snapshot, &*reporter);
            sink.lock().expect("callback records lock").extend(ran);
        }));

        let collected: Vec<CallbackRecord> = {
            let mut guard = records.lock().expect("callback records lock");
            guard.drain(..).collect()
        };

        match branch {
            CallbackBranch::Success => result.merge(ResultPatch { on_success: Some(collected),
                                                                  ..Default::default() }),
            CallbackBranch::Failure => result.merge(ResultPatch { on_failure: Some(collected),
                                                                  ..Default::default() }),
        }
    }
}
