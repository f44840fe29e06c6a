//! Unidad de trabajo in-memory: transacción + cola after-commit.

use std::fmt;
use std::sync::{Arc, Mutex};

use tramite_core::{AfterCommit, PipelineVerdict, Transaction, TxBody};

type Hook = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct UowState {
    depth: usize,
    hooks: Vec<Hook>,
    commits: usize,
    rollbacks: usize,
}

/// Transacción simulada con semántica de anidamiento plano: sólo el commit
/// del bloque más externo drena la cola de hooks; un rollback en cualquier
/// nivel la descarta completa.
///
/// Un cuerpo que termina en `BodyFailed` (o con error de programador) hace
/// rollback del bloque. Pensada para tests y demos; una implementación real
/// delegaría en el driver de la base de datos.
pub struct InMemoryUnitOfWork {
    state: Arc<Mutex<UowState>>,
}

impl fmt::Debug for InMemoryUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().unwrap();
        f.debug_struct("InMemoryUnitOfWork")
         .field("depth", &state.depth)
         .field("pending_hooks", &state.hooks.len())
         .field("commits", &state.commits)
         .field("rollbacks", &state.rollbacks)
         .finish()
    }
}

impl InMemoryUnitOfWork {
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(UowState::default())) }
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }

    pub fn pending_hooks(&self) -> usize {
        self.state.lock().unwrap().hooks.len()
    }

    fn rolls_back(outcome: &TxBody) -> bool {
        !matches!(outcome,
                  Ok(PipelineVerdict::Halted(_)
                     | PipelineVerdict::Bypassed(_)
                     | PipelineVerdict::Completed(_)))
    }
}

impl Default for InMemoryUnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction for InMemoryUnitOfWork {
    fn call(&self, body: &mut dyn FnMut() -> TxBody) -> TxBody {
        self.state.lock().unwrap().depth += 1;
        let outcome = body();

        let ready = {
            let mut state = self.state.lock().unwrap();
            state.depth -= 1;
            if Self::rolls_back(&outcome) {
                state.rollbacks += 1;
                state.hooks.clear();
                Vec::new()
            } else {
                state.commits += 1;
                if state.depth == 0 {
                    std::mem::take(&mut state.hooks)
                } else {
                    // commit anidado: los hooks esperan al bloque externo
                    Vec::new()
                }
            }
        };

        // fuera del lock: un hook puede encolar otra unidad de trabajo
        for hook in ready {
            hook();
        }
        outcome
    }
}

impl AfterCommit for InMemoryUnitOfWork {
    fn schedule(&self, hook: Hook) {
        let immediate = {
            let mut state = self.state.lock().unwrap();
            if state.depth > 0 {
                state.hooks.push(hook);
                None
            } else {
                Some(hook)
            }
        };
        // sin transacción abierta no hay commit que esperar
        if let Some(hook) = immediate {
            hook();
        }
    }
}
