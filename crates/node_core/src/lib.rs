//! # Node Core
//!
//! Codificação CBOR das mensagens de um nó sensor de recursos limitados:
//! a mensagem de configuração (esquema dos canais, enviada no boot) e a
//! mensagem de dados (uma leitura por canal, a cada intervalo).
//!
//! Toda contagem declarada em cabeçalho de contêiner é derivada dos próprios
//! itens emitidos; uma divergência vira erro em vez de frame corrompido.
//!
//! ## Módulos
//! - [`codes`] – Constantes de fio (chaves, grandezas, unidades, sensores, portas)
//! - [`shortcut`] – Metadado opcional: ausente, texto ou código
//! - [`wire`] – Escrita CBOR com contagem conferida e buffer de capacidade fixa
//! - [`device`] – Registro de canais e mensagem de configuração
//! - [`packet`] – Mensagem de dados
//! - [`config`] – Configuração do nó via TOML
//! - [`error`] – Erros de codificação

pub mod codes;
pub mod config;
pub mod device;
pub mod error;
pub mod packet;
pub mod shortcut;
pub mod wire;

#[cfg(test)]
mod reference;

// Re-exports convenientes
pub use codes::{CONFIG_PORT, DATA_PORT, LORA_MAX_PAYLOAD, Quantity, Sensor, Unit};
pub use config::NodeConfig;
pub use device::{Device, Variable};
pub use error::EncodeError;
pub use packet::Packet;
pub use shortcut::Shortcut;
pub use wire::FrameBuffer;
