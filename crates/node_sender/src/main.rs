//! # Node Sender
//!
//! Renderiza a mensagem de configuração do nó no boot e uma mensagem de
//! dados por intervalo. Cada frame sai como `<porta> <payload hex>`; o
//! transporte (rádio, serial) fica a cargo de quem consome a saída.
//!
//! ## Uso
//! ```bash
//! node_sender                 # node.toml ao lado do executável
//! node_sender ./campo.toml    # configuração explícita
//! ```

mod output;
mod sampler;

use node_core::codes::{CONFIG_PORT, DATA_PORT, LORA_MAX_PAYLOAD};
use node_core::{Device, EncodeError, FrameBuffer, NodeConfig, Packet};
use output::FrameOutput;
use sampler::Sampler;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Canais suportados pelo registro do nó.
const MAX_CHANNELS: usize = 16;

fn main() {
    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Carregar config ──
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(NodeConfig::default_path);
    let config = NodeConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    let errors = config.validate(MAX_CHANNELS);
    if !errors.is_empty() {
        for e in &errors {
            error!("Configuração inválida: {e}");
        }
        std::process::exit(1);
    }

    // ── Registro de canais ──
    let mut device = match config.build_device::<MAX_CHANNELS>() {
        Ok(device) => device,
        Err(e) => {
            error!("Falha ao registrar canais: {e}");
            std::process::exit(1);
        }
    };

    let mut out = match FrameOutput::open(&config.sender.output) {
        Ok(out) => out,
        Err(e) => {
            error!("Falha ao abrir saída {}: {e}", config.sender.output);
            std::process::exit(1);
        }
    };

    let sender_cfg = &config.sender;
    let interval = Duration::from_secs_f64(sender_cfg.interval_secs);

    // ── Banner ──
    eprintln!();
    eprintln!("══════════════════════════════════════════════");
    eprintln!("   📡 NODE SENDER – ATIVO");
    eprintln!("══════════════════════════════════════════════");
    eprintln!("  Canais:    {}", device.len());
    eprintln!("  Intervalo: {:.1}s", sender_cfg.interval_secs);
    eprintln!("  Saída:     {}", out.target());
    eprintln!("══════════════════════════════════════════════");
    eprintln!();

    // ── Mensagem de configuração ──
    let mut frame = FrameBuffer::<LORA_MAX_PAYLOAD>::new();
    if let Err(e) = device.render_config(&mut frame) {
        error!("Erro ao renderizar configuração: {e}");
        std::process::exit(1);
    }
    match out.emit(CONFIG_PORT, frame.as_slice()) {
        Ok(()) => info!("→ config: {} bytes, {} canais", frame.len(), device.len()),
        Err(e) => error!("Erro ao emitir configuração: {e}"),
    }

    // ── Loop principal ──
    let mut sampler = Sampler::new(&config.channels);
    let mut cycle: u64 = 0;
    loop {
        let cycle_start = Instant::now();

        let readings = sampler.next_readings();
        frame.clear();
        match render_data(&device, &readings, &mut frame) {
            Ok(_) => match out.emit(DATA_PORT, frame.as_slice()) {
                Ok(()) => info!("→ dados #{cycle}: {} bytes | {readings:?}", frame.len()),
                Err(e) => error!("Erro ao emitir dados: {e}"),
            },
            // Frame parcial nunca é emitido
            Err(e) => error!("Pacote #{cycle} descartado: {e}"),
        }

        cycle += 1;
        if sender_cfg.cycles != 0 && cycle >= sender_cfg.cycles {
            info!("{cycle} ciclos concluídos");
            break;
        }

        // Dormir pelo tempo restante do intervalo
        let elapsed = cycle_start.elapsed();
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }
    }
}

/// Monta a mensagem de dados com uma leitura por canal registrado.
fn render_data<W: Write, const N: usize>(
    device: &Device<'_, N>,
    readings: &[i32],
    sink: W,
) -> Result<W, EncodeError> {
    let mut packet = Packet::for_device(device, sink)?;
    for (variable, value) in device.variables().iter().zip(readings) {
        packet.add_value(variable, *value)?;
    }
    packet.finish()
}
