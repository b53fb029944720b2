//! Leituras simuladas por canal.
//!
//! Cada canal oscila numa onda triangular de quatro passos em torno da
//! leitura base: `base, base+a, base, base-a, ...`.

use node_core::config::ChannelConfig;

pub struct Sampler {
    channels: Vec<(i32, i32)>,
    step: u64,
}

impl Sampler {
    pub fn new(channels: &[ChannelConfig]) -> Self {
        Self {
            channels: channels.iter().map(|c| (c.sample, c.amplitude)).collect(),
            step: 0,
        }
    }

    /// Uma leitura por canal, na ordem de registro.
    pub fn next_readings(&mut self) -> Vec<i32> {
        let phase = self.step % 4;
        self.step += 1;
        self.channels
            .iter()
            .map(|&(base, amplitude)| match phase {
                1 => base.saturating_add(amplitude),
                3 => base.saturating_sub(amplitude),
                _ => base,
            })
            .collect()
    }
}
