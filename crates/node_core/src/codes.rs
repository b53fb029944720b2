//! Tabelas de códigos do protocolo.
//!
//! Cada variante carrega seu valor de fio como discriminante explícito.
//! A ordem de declaração nunca influencia os bytes gerados.

use crate::shortcut::Shortcut;
use serde::{Deserialize, Serialize};

/// Porta LoRaWAN das mensagens de configuração.
pub const CONFIG_PORT: u8 = 1;

/// Porta LoRaWAN das mensagens de dados.
pub const DATA_PORT: u8 = 2;

/// Maior payload de aplicação aceito pelo uplink LoRaWAN (EU868, DR5).
pub const LORA_MAX_PAYLOAD: usize = 222;

/// Chave textual do marcador de versão no mapa de cabeçalho.
pub const EXPERIMENTAL_KEY: &str = "experimental";

/// Valor associado a [`EXPERIMENTAL_KEY`].
pub const EXPERIMENTAL_VERSION: u64 = 1;

/// Enumeração com valor numérico estável no fio.
pub trait WireCode: Copy {
    fn code(self) -> u8;
}

macro_rules! wire_codes {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $code,)+
        }

        impl WireCode for $name {
            fn code(self) -> u8 {
                self as u8
            }
        }

        impl<'a> From<$name> for Shortcut<'a, $name> {
            fn from(code: $name) -> Self {
                Shortcut::Code(code)
            }
        }
    };
}

wire_codes! {
    /// Chaves dos mapas da mensagem de configuração.
    ConfigKey {
        ChannelId = 1,
        Quantity = 2,
        Unit = 3,
        Sensor = 4,
        ItemType = 5,
    }
}

wire_codes! {
    /// Tipo de item descrito por um mapa de configuração.
    ItemType {
        Node = 1,
        Channel = 2,
    }
}

wire_codes! {
    /// Grandeza medida por um canal.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    Quantity {
        Temperature = 1,
        Humidity = 2,
        Voltage = 3,
        AmbientLight = 4,
        Latitude = 5,
        Longitude = 6,
        ParticulateMatter = 7,
    }
}

wire_codes! {
    /// Unidade do valor reportado.
    // TODO: mV e outras escalas exigem um campo de codificação próprio no canal.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    Unit {
        DegreeCelsius = 1,
        PercentRelativeHumidity = 2,
        Volt = 3,
        UgPerCubicMeter = 4,
        Lux = 5,
        Degrees = 6,
    }
}

wire_codes! {
    /// Sensor físico que produz o valor.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    Sensor {
        Si7021 = 1,
    }
}

wire_codes! {
    /// Chaves dos mapas da mensagem de dados.
    DataKey {
        ChannelId = 1,
        Value = 2,
    }
}
