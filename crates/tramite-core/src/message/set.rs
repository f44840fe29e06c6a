//! Conjunto de mensajes normalizados, agrupables por path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::resolver::MessageResolver;
use super::types::{Message, RenderOptions};

/// Colección ordenada de `Message`. Vacío ⇔ éxito.
///
/// El set no renderiza nada al construirse: la agrupación por path y la
/// resolución de texto ocurren recién en `render(..)`, de modo que el mismo
/// resultado puede renderizarse varias veces con distintos ejes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageSet {
    entries: Vec<Message>,
}

impl MessageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(message: Message) -> Self {
        Self { entries: vec![message] }
    }

    pub fn from_messages(entries: Vec<Message>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    pub fn extend(&mut self, other: MessageSet) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Códigos presentes, en orden. Conveniencia para asserts y reporters.
    pub fn codes(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|m| m.code.as_deref())
            .collect()
    }

    /// Renderiza agrupando por path (orden de inserción). `None` agrupa los
    /// errores a nivel base.
    pub fn render(&self,
                  resolver: &dyn MessageResolver,
                  options: &RenderOptions)
                  -> IndexMap<Option<String>, Vec<String>> {
        let mut out: IndexMap<Option<String>, Vec<String>> = IndexMap::new();
        for message in &self.entries {
            out.entry(message.path.clone())
               .or_default()
               .push(resolver.resolve(message, options));
        }
        out
    }
}

impl FromIterator<Message> for MessageSet {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
