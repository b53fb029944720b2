//! Mensagem de dados: um valor por canal a cada transmissão.
//!
//! ```text
//! [ {1: idx, 2: valor}, ... ]   ← exatamente um mapa por canal
//! ```

use crate::codes::{DataKey, WireCode};
use crate::device::{Device, Variable};
use crate::error::{EncodeError, Result};
use crate::wire::{ArrayWriter, Item};
use std::io::Write;
use tracing::debug;

fn key(key: DataKey) -> Item<'static> {
    Item::Uint(u64::from(key.code()))
}

/// Construtor de uma mensagem de dados com `expected` valores.
///
/// O cabeçalho do array é escrito na abertura; [`Packet::finish`] só
/// devolve o destino quando todos os valores foram adicionados.
pub struct Packet<W> {
    array: ArrayWriter<W>,
}

impl<W: Write> Packet<W> {
    /// Abre um pacote declarando exatamente `expected` valores.
    pub fn open(sink: W, expected: usize) -> Result<Self> {
        Ok(Self {
            array: ArrayWriter::open(sink, expected)?,
        })
    }

    /// Abre um pacote com um valor para cada canal registrado em `device`.
    pub fn for_device<const N: usize>(device: &Device<'_, N>, sink: W) -> Result<Self> {
        Self::open(sink, device.len())
    }

    /// Adiciona a leitura de um canal.
    pub fn add_value(&mut self, variable: &Variable<'_>, value: i32) -> Result<()> {
        if self.array.remaining() == 0 && !self.array.is_poisoned() {
            return Err(EncodeError::Overflow {
                capacity: self.array.declared(),
            });
        }
        self.array.push_map(&[
            (key(DataKey::ChannelId), Item::Uint(u64::from(variable.index()))),
            (key(DataKey::Value), Item::Int(i64::from(value))),
        ])
    }

    pub fn expected(&self) -> usize {
        self.array.declared()
    }

    pub fn emitted(&self) -> usize {
        self.array.emitted()
    }

    pub fn is_complete(&self) -> bool {
        self.array.remaining() == 0
    }

    /// Encerra a mensagem e devolve o destino.
    pub fn finish(self) -> Result<W> {
        let expected = self.array.declared();
        let emitted = self.array.emitted();
        if emitted < expected && !self.array.is_poisoned() {
            return Err(EncodeError::IncompletePacket { expected, emitted });
        }
        let sink = self.array.close()?;
        debug!("Pacote de dados finalizado: {emitted} valores");
        Ok(sink)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
