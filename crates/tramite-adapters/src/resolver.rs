//! Resolver por tablas de traducción, ejercitando el eje `locale`.

use std::collections::HashMap;

use tramite_core::message::resolver::{humanize, interpolate};
use tramite_core::{DefaultResolver, Message, MessageResolver, RenderOptions};

/// Resuelve códigos contra tablas `locale → código → plantilla`. Cuando no
/// hay locale pedido, tabla o entrada, cae al `DefaultResolver`.
#[derive(Debug, Default)]
pub struct TableResolver {
    tables: HashMap<String, HashMap<String, String>>,
}

impl TableResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra una plantilla para `(locale, code)`. Las plantillas admiten
    /// tokens `%{nombre}` igual que el resolver por defecto.
    pub fn entry(mut self,
                 locale: impl Into<String>,
                 code: impl Into<String>,
                 template: impl Into<String>)
                 -> Self {
        self.tables
            .entry(locale.into())
            .or_default()
            .insert(code.into(), template.into());
        self
    }
}

impl MessageResolver for TableResolver {
    fn resolve(&self, message: &Message, options: &RenderOptions) -> String {
        let template = options.locale
                              .as_ref()
                              .zip(message.code.as_ref())
                              .and_then(|(locale, code)| {
                                  self.tables.get(locale).and_then(|table| table.get(code))
                              });

        let Some(template) = template else {
            return DefaultResolver.resolve(message, options);
        };

        let text = interpolate(template, &message.tokens);
        if options.full {
            match &message.path {
                Some(path) => format!("{} {}", humanize(path), text),
                None => text,
            }
        } else {
            text
        }
    }
}
