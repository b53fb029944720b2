//! Registro de canais do nó e mensagem de configuração.
//!
//! Formato da mensagem:
//!
//! ```text
//! [ {5: 1, "experimental": 1},                     ← cabeçalho do nó
//!   {5: 2, 1: idx, 2: grandeza, 3: unidade, 4: sensor},  ← um por canal
//!   ... ]
//! ```

use crate::codes::{
    ConfigKey, EXPERIMENTAL_KEY, EXPERIMENTAL_VERSION, ItemType, Quantity, Sensor, Unit, WireCode,
};
use crate::error::{EncodeError, Result};
use crate::shortcut::Shortcut;
use crate::wire::{ArrayWriter, Entry, Item};
use std::io::Write;
use tracing::debug;

fn key(key: ConfigKey) -> Item<'static> {
    Item::Uint(u64::from(key.code()))
}

fn item_type(kind: ItemType) -> Item<'static> {
    Item::Uint(u64::from(kind.code()))
}

/// Metadados de um canal de medição.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable<'a> {
    index: u8,
    quantity: Shortcut<'a, Quantity>,
    unit: Shortcut<'a, Unit>,
    sensor: Shortcut<'a, Sensor>,
}

impl<'a> Variable<'a> {
    fn new(index: u8) -> Self {
        Self {
            index,
            quantity: Shortcut::Absent,
            unit: Shortcut::Absent,
            sensor: Shortcut::Absent,
        }
    }

    pub fn set_quantity(&mut self, quantity: impl Into<Shortcut<'a, Quantity>>) -> &mut Self {
        self.quantity = quantity.into();
        self
    }

    pub fn set_unit(&mut self, unit: impl Into<Shortcut<'a, Unit>>) -> &mut Self {
        self.unit = unit.into();
        self
    }

    pub fn set_sensor(&mut self, sensor: impl Into<Shortcut<'a, Sensor>>) -> &mut Self {
        self.sensor = sensor.into();
        self
    }

    /// Identificador do canal, igual à ordem de registro.
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn quantity(&self) -> Shortcut<'a, Quantity> {
        self.quantity
    }

    pub fn unit(&self) -> Shortcut<'a, Unit> {
        self.unit
    }

    pub fn sensor(&self) -> Shortcut<'a, Sensor> {
        self.sensor
    }

    fn config_entries(&self) -> [Entry<'a>; 5] {
        [
            (key(ConfigKey::ItemType), item_type(ItemType::Channel)),
            (key(ConfigKey::ChannelId), Item::Uint(u64::from(self.index))),
            (key(ConfigKey::Quantity), self.quantity.to_item()),
            (key(ConfigKey::Unit), self.unit.to_item()),
            (key(ConfigKey::Sensor), self.sensor.to_item()),
        ]
    }
}

fn header_entries() -> [Entry<'static>; 2] {
    [
        (key(ConfigKey::ItemType), item_type(ItemType::Node)),
        (Item::Text(EXPERIMENTAL_KEY), Item::Uint(EXPERIMENTAL_VERSION)),
    ]
}

/// Registro de até `N` canais.
///
/// Depois da primeira renderização da configuração o esquema fica
/// congelado: novos registros retornam [`EncodeError::SchemaFrozen`].
#[derive(Debug, Clone)]
pub struct Device<'a, const N: usize> {
    variables: heapless::Vec<Variable<'a>, N>,
    finalized: bool,
}

impl<const N: usize> Default for Device<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const N: usize> Device<'a, N> {
    pub const fn new() -> Self {
        Self {
            variables: heapless::Vec::new(),
            finalized: false,
        }
    }

    /// Reserva o próximo canal e devolve-o para configuração.
    ///
    /// Em caso de erro o registro não é alterado.
    pub fn register_variable(&mut self) -> Result<&mut Variable<'a>> {
        if self.finalized {
            return Err(EncodeError::SchemaFrozen);
        }
        let capacity = N.min(usize::from(u8::MAX) + 1);
        let slot = self.variables.len();
        if slot >= capacity {
            return Err(EncodeError::CapacityExceeded { capacity });
        }
        let index = u8::try_from(slot).map_err(|_| EncodeError::CapacityExceeded { capacity })?;
        self.variables
            .push(Variable::new(index))
            .map_err(|_| EncodeError::CapacityExceeded { capacity })?;
        debug!("Canal {index} registrado");
        Ok(&mut self.variables[slot])
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn variables(&self) -> &[Variable<'a>] {
        &self.variables
    }

    pub fn variable(&self, index: u8) -> Option<&Variable<'a>> {
        self.variables.get(usize::from(index))
    }

    /// Escreve a mensagem de configuração e devolve o destino.
    ///
    /// Pode ser repetida (por exemplo num novo destino após falha), mas
    /// congela o esquema já na primeira chamada. Em caso de erro os bytes já
    /// escritos devem ser descartados.
    pub fn render_config<W: Write>(&mut self, sink: W) -> Result<W> {
        self.finalized = true;

        let mut array = ArrayWriter::open(sink, 1 + self.variables.len())?;
        array.push_map(&header_entries())?;
        for variable in &self.variables {
            array.push_map(&variable.config_entries())?;
        }
        let sink = array.close()?;

        debug!("Configuração renderizada: {} canais", self.variables.len());
        Ok(sink)
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
