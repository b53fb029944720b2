//! Metadado opcional: ausente, texto livre ou código numérico.

use crate::codes::WireCode;
use crate::error::Result;
use crate::wire::{Item, Writer};
use std::io::Write;
use tracing::trace;

/// Valor simples emitido para [`Shortcut::Absent`].
///
/// Não é o `null` (22) nem o `undefined` (23) do CBOR; mantido assim por
/// compatibilidade com os coletores existentes.
pub const ABSENT_SIMPLE: u8 = 0;

/// Usa o texto quando presente, senão o código numérico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut<'a, T> {
    Absent,
    Text(&'a str),
    Code(T),
}

impl<T> Default for Shortcut<'_, T> {
    fn default() -> Self {
        Shortcut::Absent
    }
}

impl<'a, T> From<&'a str> for Shortcut<'a, T> {
    fn from(text: &'a str) -> Self {
        Shortcut::Text(text)
    }
}

impl<'a, T: WireCode> Shortcut<'a, T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Shortcut::Absent)
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match *self {
            Shortcut::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<T> {
        match *self {
            Shortcut::Code(code) => Some(code),
            _ => None,
        }
    }

    /// Item CBOR equivalente a este valor.
    pub fn to_item(&self) -> Item<'a> {
        match *self {
            Shortcut::Absent => Item::Simple(ABSENT_SIMPLE),
            Shortcut::Text(text) => Item::Text(text),
            Shortcut::Code(code) => Item::Uint(u64::from(code.code())),
        }
    }

    /// Emite exatamente um item CBOR.
    pub fn encode<W: Write>(&self, w: &mut Writer<W>) -> Result<()> {
        match self {
            Shortcut::Absent => trace!("shortcut ausente"),
            Shortcut::Text(text) => trace!("shortcut texto ({} bytes)", text.len()),
            Shortcut::Code(code) => trace!("shortcut código {}", code.code()),
        }
        w.item(self.to_item())
    }
}
