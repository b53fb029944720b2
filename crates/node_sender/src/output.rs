//! Saída dos frames prontos: uma linha `<porta> <payload hex>` por frame.

use std::fs::File;
use std::io::{self, BufWriter, Write};

pub struct FrameOutput {
    inner: Box<dyn Write>,
    target: String,
}

impl FrameOutput {
    /// `"-"` escreve em stdout; qualquer outro valor é um caminho de arquivo.
    pub fn open(target: &str) -> io::Result<Self> {
        let inner: Box<dyn Write> = if target == "-" {
            Box::new(io::stdout())
        } else {
            Box::new(BufWriter::new(File::create(target)?))
        };
        Ok(Self::from_writer(inner, target))
    }

    pub fn from_writer(inner: Box<dyn Write>, target: &str) -> Self {
        Self {
            inner,
            target: target.to_owned(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn emit(&mut self, port: u8, payload: &[u8]) -> io::Result<()> {
        writeln!(self.inner, "{}", frame_line(port, payload))?;
        self.inner.flush()
    }
}

pub fn frame_line(port: u8, payload: &[u8]) -> String {
    format!("{port} {}", hex::encode(payload))
}
