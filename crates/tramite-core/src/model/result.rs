//! `ActionResult`: el registro inmutable de resultado de una etapa o del
//! pipeline completo.
//!
//! Rol en el pipeline:
//! - Cada componente crea un resultado fresco; el orquestador enhebra
//!   params/contexto acumulados hacia adelante con `merge` (copy-with-override,
//!   nunca mutación).
//! - El resultado final es la única superficie pública que consumen las capas
//!   de presentación.
//! - Invariante: `success() == errors.is_empty()`, `failure() == !success()`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::component::Component;
use super::data::{Context, Params};
use crate::message::{DefaultResolver, MessageResolver, MessageSet, RenderOptions};

/// Resultado de una entrada de callback. Su fallo queda aislado: se registra
/// aquí y jamás contamina el set de errores del resultado principal.
#[derive(Debug, Clone)]
pub struct CallbackRecord {
    pub name: String,
    pub errors: MessageSet,
    pub ran_at: DateTime<Utc>,
}

impl CallbackRecord {
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ActionResult {
    component: Component,
    params: Params,
    context: Context,
    errors: MessageSet,
    on_success: Vec<CallbackRecord>,
    on_failure: Vec<CallbackRecord>,
    resolver: Arc<dyn MessageResolver>,
}

/// Overrides opcionales para `ActionResult::merge`. Campo `None` = conservar
/// el valor actual.
#[derive(Debug, Default)]
pub struct ResultPatch {
    pub component: Option<Component>,
    pub params: Option<Params>,
    pub context: Option<Context>,
    pub errors: Option<MessageSet>,
    pub on_success: Option<Vec<CallbackRecord>>,
    pub on_failure: Option<Vec<CallbackRecord>>,
}

impl ActionResult {
    /// Resultado exitoso de una etapa (sin errores, sin callbacks).
    pub fn stage(component: Component, params: Params, context: Context) -> Self {
        Self::stage_with_errors(component, params, context, MessageSet::new())
    }

    pub fn stage_with_errors(component: Component,
                             params: Params,
                             context: Context,
                             errors: MessageSet)
                             -> Self {
        Self { component,
               params,
               context,
               errors,
               on_success: Vec::new(),
               on_failure: Vec::new(),
               resolver: Arc::new(DefaultResolver) }
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Set crudo de mensajes (sin renderizar).
    pub fn messages(&self) -> &MessageSet {
        &self.errors
    }

    pub fn on_success(&self) -> &[CallbackRecord] {
        &self.on_success
    }

    pub fn on_failure(&self) -> &[CallbackRecord] {
        &self.on_failure
    }

    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failure(&self) -> bool {
        !self.success()
    }

    /// Renderizado lazy de errores con el resolver inyectado en el comando.
    /// El mismo resultado puede renderizarse varias veces con distintos ejes.
    pub fn errors(&self, options: &RenderOptions) -> IndexMap<Option<String>, Vec<String>> {
        self.errors.render(&*self.resolver, options)
    }

    /// Copia no destructiva con overrides. El receptor queda intacto.
    pub fn merge(&self, patch: ResultPatch) -> ActionResult {
        ActionResult { component: patch.component.unwrap_or(self.component),
                       params: patch.params.unwrap_or_else(|| self.params.clone()),
                       context: patch.context.unwrap_or_else(|| self.context.clone()),
                       errors: patch.errors.unwrap_or_else(|| self.errors.clone()),
                       on_success: patch.on_success.unwrap_or_else(|| self.on_success.clone()),
                       on_failure: patch.on_failure.unwrap_or_else(|| self.on_failure.clone()),
                       resolver: Arc::clone(&self.resolver) }
    }

    pub(crate) fn with_resolver(mut self, resolver: Arc<dyn MessageResolver>) -> Self {
        self.resolver = resolver;
        self
    }
}
