//! Configuração do nó via TOML.
//!
//! Descreve os canais que o nó reporta e o ritmo de envio. Cada descritor
//! de canal aceita um nome de código conhecido (`"temperature"`) ou um texto
//! livre, que vai para o fio como string.

use crate::codes::{Quantity, Sensor, Unit, WireCode};
use crate::device::Device;
use crate::error::EncodeError;
use crate::shortcut::Shortcut;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Descritor de um campo de canal: código conhecido ou texto livre.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Descriptor<T> {
    Code(T),
    Text(String),
}

impl<T: WireCode> Descriptor<T> {
    pub fn as_shortcut(&self) -> Shortcut<'_, T> {
        match self {
            Descriptor::Code(code) => Shortcut::Code(*code),
            Descriptor::Text(text) => Shortcut::Text(text),
        }
    }
}

fn shortcut<T: WireCode>(descriptor: &Option<Descriptor<T>>) -> Shortcut<'_, T> {
    descriptor
        .as_ref()
        .map_or(Shortcut::Absent, Descriptor::as_shortcut)
}

/// Configuração do envio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Intervalo entre pacotes de dados em segundos
    pub interval_secs: f64,
    /// Destino dos frames: "-" para stdout ou caminho de arquivo
    pub output: String,
    /// Número de ciclos de dados (0 = infinito)
    pub cycles: u64,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60.0,
            output: "-".into(),
            cycles: 0,
        }
    }
}

/// Um canal de medição.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Descriptor<Quantity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Descriptor<Unit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensor: Option<Descriptor<Sensor>>,
    /// Leitura base do simulador
    pub sample: i32,
    /// Amplitude da onda triangular somada à leitura base
    pub amplitude: i32,
}

/// Configuração raiz do nó.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub sender: SenderConfig,
    #[serde(rename = "channel")]
    pub channels: Vec<ChannelConfig>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            sender: SenderConfig::default(),
            channels: vec![
                ChannelConfig {
                    quantity: Some(Descriptor::Code(Quantity::Temperature)),
                    unit: Some(Descriptor::Code(Unit::DegreeCelsius)),
                    sensor: Some(Descriptor::Code(Sensor::Si7021)),
                    sample: 215,
                    amplitude: 10,
                },
                ChannelConfig {
                    quantity: Some(Descriptor::Code(Quantity::Humidity)),
                    unit: Some(Descriptor::Code(Unit::PercentRelativeHumidity)),
                    sensor: Some(Descriptor::Code(Sensor::Si7021)),
                    sample: 42,
                    amplitude: 3,
                },
            ],
        }
    }
}

impl NodeConfig {
    /// Carrega configuração de um arquivo TOML.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<NodeConfig>(&content) {
                    Ok(config) => {
                        info!("Configuração carregada de {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        warn!("Erro ao parsear {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    warn!("Erro ao ler {}: {}", path.display(), e);
                }
            }
        }

        info!("Usando configuração padrão");
        NodeConfig::default()
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        std::fs::write(path, content).map_err(|e| e.to_string())?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do node.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("node.toml")
    }

    /// Valida a configuração para um dispositivo de `capacity` canais.
    pub fn validate(&self, capacity: usize) -> Vec<String> {
        let mut errors = Vec::new();

        if self.sender.interval_secs < 0.1 || self.sender.interval_secs > 3600.0 {
            errors.push(format!(
                "Intervalo do sender inválido: {} (0.1–3600.0)",
                self.sender.interval_secs
            ));
        }
        if self.sender.output.trim().is_empty() {
            errors.push("Destino dos frames não pode ser vazio".into());
        }
        if self.channels.len() > capacity {
            errors.push(format!(
                "Canais demais: {} (máximo {capacity})",
                self.channels.len()
            ));
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if channel.amplitude < 0 {
                errors.push(format!("Canal {i}: amplitude negativa ({})", channel.amplitude));
            }
        }

        errors
    }

    /// Registra um canal por entrada `[[channel]]`, na ordem do arquivo.
    pub fn build_device<const N: usize>(&self) -> Result<Device<'_, N>, EncodeError> {
        let mut device = Device::new();
        for channel in &self.channels {
            device
                .register_variable()?
                .set_quantity(shortcut(&channel.quantity))
                .set_unit(shortcut(&channel.unit))
                .set_sensor(shortcut(&channel.sensor));
        }
        Ok(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = NodeConfig::default();
        let errors = config.validate(16);
        assert!(errors.is_empty(), "Erros: {:?}", errors);
    }

    #[test]
    fn roundtrip_toml() {
        let config = NodeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: NodeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.sender.output, parsed.sender.output);
        assert_eq!(parsed.channels.len(), 2);
        assert_eq!(
            parsed.channels[0].quantity,
            Some(Descriptor::Code(Quantity::Temperature))
        );
        assert_eq!(parsed.channels[1].sample, 42);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let partial = r#"
[sender]
cycles = 3
"#;
        let config: NodeConfig = toml::from_str(partial).unwrap();
        assert_eq!(config.sender.cycles, 3);
        // Demais campos com valor padrão
        assert_eq!(config.sender.interval_secs, 60.0);
        assert_eq!(config.channels.len(), 2);
    }

    #[test]
    fn unknown_names_become_text() {
        let source = r#"
[[channel]]
quantity = "voltage"
unit = "mV"

[[channel]]
quantity = "soil moisture"
sensor = "si7021"
"#;
        let config: NodeConfig = toml::from_str(source).unwrap();
        assert_eq!(config.channels[0].quantity, Some(Descriptor::Code(Quantity::Voltage)));
        assert_eq!(config.channels[0].unit, Some(Descriptor::Text("mV".into())));
        assert_eq!(config.channels[0].sensor, None);
        assert_eq!(
            config.channels[1].quantity,
            Some(Descriptor::Text("soil moisture".into()))
        );
        assert_eq!(config.channels[1].sensor, Some(Descriptor::Code(Sensor::Si7021)));
    }

    #[test]
    fn builds_device_in_file_order() {
        let source = r#"
[[channel]]
quantity = "temperature"

[[channel]]
unit = "lux"
"#;
        let config: NodeConfig = toml::from_str(source).unwrap();
        let device = config.build_device::<4>().unwrap();
        assert_eq!(device.len(), 2);

        let first = &device.variables()[0];
        assert_eq!(first.index(), 0);
        assert_eq!(first.quantity(), Shortcut::Code(Quantity::Temperature));
        assert!(first.unit().is_absent());

        let second = &device.variables()[1];
        assert_eq!(second.index(), 1);
        assert_eq!(second.unit(), Shortcut::Code(Unit::Lux));
    }

    #[test]
    fn too_many_channels_are_rejected() {
        let config = NodeConfig {
            channels: vec![ChannelConfig::default(); 3],
            ..NodeConfig::default()
        };
        assert_eq!(config.validate(2).len(), 1);
        assert!(matches!(
            config.build_device::<2>(),
            Err(EncodeError::CapacityExceeded { capacity: 2 })
        ));
    }
}
