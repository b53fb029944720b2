//! Escrita CBOR com contagem derivada.
//!
//! Todo contêiner CBOR declara quantos elementos carrega antes de
//! emiti-los. Aqui a contagem de um mapa é o tamanho do array de entradas
//! recebido, e a de um array é conferida item a item pelo [`ArrayWriter`]:
//! declarar N e emitir outra quantidade resulta em erro, nunca em bytes
//! corrompidos.
//!
//! Os primitivos de cabeçalho vêm de `ciborium-ll`.

use crate::error::{EncodeError, Result};
use ciborium_ll::{Encoder, Header};
use std::io::{self, Write};
use tracing::trace;

/// Item escalar CBOR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item<'a> {
    /// Inteiro sem sinal (tipo maior 0).
    Uint(u64),
    /// Inteiro com sinal; negativos usam o tipo maior 1.
    Int(i64),
    /// String de texto com tamanho definido.
    Text(&'a str),
    /// Valor simples (tipo maior 7).
    Simple(u8),
}

/// Par chave → valor de um mapa.
pub type Entry<'a> = (Item<'a>, Item<'a>);

/// Escritor de itens sobre um destino de bytes.
pub struct Writer<W> {
    sink: W,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Escreve um único item escalar.
    pub fn item(&mut self, item: Item<'_>) -> Result<()> {
        let mut enc = Encoder::from(&mut self.sink);
        match item {
            Item::Uint(v) => enc.push(Header::Positive(v))?,
            Item::Int(v) if v >= 0 => enc.push(Header::Positive(v as u64))?,
            // CBOR guarda -1 - v, que em complemento de dois é !v
            Item::Int(v) => enc.push(Header::Negative(!(v as u64)))?,
            Item::Text(s) => enc.text(s, None::<usize>)?,
            Item::Simple(code) => enc.push(Header::Simple(code))?,
        }
        Ok(())
    }

    /// Escreve um mapa declarando exatamente `N` entradas.
    pub fn map<const N: usize>(&mut self, entries: &[Entry<'_>; N]) -> Result<()> {
        Encoder::from(&mut self.sink).push(Header::Map(Some(N)))?;
        for (key, value) in entries {
            self.item(*key)?;
            self.item(*value)?;
        }
        Ok(())
    }

    fn array_header(&mut self, declared: usize) -> Result<()> {
        Encoder::from(&mut self.sink).push(Header::Array(Some(declared)))?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Array de mapas com contagem declarada e conferida.
///
/// Após a primeira falha do destino o escritor fica envenenado: qualquer
/// chamada seguinte retorna [`EncodeError::Aborted`] sem tocar no destino.
pub struct ArrayWriter<W> {
    writer: Writer<W>,
    declared: usize,
    emitted: usize,
    poisoned: bool,
}

impl<W: Write> ArrayWriter<W> {
    /// Escreve o cabeçalho do array declarando `declared` elementos.
    pub fn open(sink: W, declared: usize) -> Result<Self> {
        let mut writer = Writer::new(sink);
        writer.array_header(declared)?;
        trace!("Array aberto: {declared} itens declarados");
        Ok(Self {
            writer,
            declared,
            emitted: 0,
            poisoned: false,
        })
    }

    /// Emite um mapa como próximo elemento do array.
    pub fn push_map<const N: usize>(&mut self, entries: &[Entry<'_>; N]) -> Result<()> {
        if self.poisoned {
            return Err(EncodeError::Aborted);
        }
        if self.emitted == self.declared {
            return Err(EncodeError::SchemaMismatch {
                declared: self.declared,
                emitted: self.emitted + 1,
            });
        }
        if let Err(e) = self.writer.map(entries) {
            self.poisoned = true;
            return Err(e);
        }
        self.emitted += 1;
        Ok(())
    }

    pub fn declared(&self) -> usize {
        self.declared
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn remaining(&self) -> usize {
        self.declared - self.emitted
    }

    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Fecha o array e devolve o destino.
    ///
    /// Falha se a quantidade emitida difere da declarada.
    pub fn close(mut self) -> Result<W> {
        if self.poisoned {
            return Err(EncodeError::Aborted);
        }
        if self.emitted != self.declared {
            return Err(EncodeError::SchemaMismatch {
                declared: self.declared,
                emitted: self.emitted,
            });
        }
        self.writer.sink.flush()?;
        Ok(self.writer.into_inner())
    }
}

/// Destino de bytes com capacidade fixa, sem alocação.
///
/// Uma escrita que não cabe inteira é rejeitada; nada é truncado.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer<const N: usize> {
    bytes: heapless::Vec<u8, N>,
}

impl<const N: usize> FrameBuffer<N> {
    pub const fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Descarta o conteúdo, inclusive frames parciais.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl<const N: usize> Write for FrameBuffer<N> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.extend_from_slice(buf).map_err(|()| {
            io::Error::new(
                io::ErrorKind::WriteZero,
                format!("frame excede {} bytes", N),
            )
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(item: Item<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        Writer::new(&mut out).item(item).unwrap();
        out
    }

    #[test]
    fn scalar_headers() {
        assert_eq!(encode(Item::Uint(0)), [0x00]);
        assert_eq!(encode(Item::Uint(23)), [0x17]);
        assert_eq!(encode(Item::Uint(215)), [0x18, 0xd7]);
        assert_eq!(encode(Item::Int(42)), [0x18, 0x2a]);
        assert_eq!(encode(Item::Int(-1)), [0x20]);
        assert_eq!(encode(Item::Int(-5)), [0x24]);
        assert_eq!(encode(Item::Int(-500)), [0x39, 0x01, 0xf3]);
        assert_eq!(encode(Item::Int(i64::from(i32::MIN))), [0x3a, 0x7f, 0xff, 0xff, 0xff]);
        assert_eq!(encode(Item::Simple(0)), [0xe0]);
        assert_eq!(encode(Item::Text("ab")), [0x62, b'a', b'b']);
        assert_eq!(encode(Item::Text("")), [0x60]);
    }

    #[test]
    fn map_declares_entry_count() {
        let mut out = Vec::new();
        Writer::new(&mut out)
            .map(&[(Item::Uint(1), Item::Uint(2)), (Item::Text("k"), Item::Int(-1))])
            .unwrap();
        assert_eq!(out, [0xa2, 0x01, 0x02, 0x61, b'k', 0x20]);
    }

    #[test]
    fn array_rejects_excess_element() {
        let mut out = Vec::new();
        let mut array = ArrayWriter::open(&mut out, 1).unwrap();
        array.push_map(&[(Item::Uint(1), Item::Uint(1))]).unwrap();
        let err = array.push_map(&[(Item::Uint(1), Item::Uint(1))]).unwrap_err();
        assert!(matches!(
            err,
            EncodeError::SchemaMismatch { declared: 1, emitted: 2 }
        ));
        array.close().unwrap();
        assert_eq!(out, [0x81, 0xa1, 0x01, 0x01]);
    }

    #[test]
    fn array_rejects_missing_element() {
        let mut out = Vec::new();
        let array = ArrayWriter::open(&mut out, 2).unwrap();
        assert!(matches!(
            array.close(),
            Err(EncodeError::SchemaMismatch { declared: 2, emitted: 0 })
        ));
    }

    #[test]
    fn empty_array_closes() {
        let mut out = Vec::new();
        ArrayWriter::open(&mut out, 0).unwrap().close().unwrap();
        assert_eq!(out, [0x80]);
    }

    #[test]
    fn frame_buffer_rejects_overflow() {
        let mut frame = FrameBuffer::<4>::new();
        let mut array = ArrayWriter::open(&mut frame, 1).unwrap();
        let err = array
            .push_map(&[(Item::Text("longo"), Item::Uint(1))])
            .unwrap_err();
        assert!(matches!(err, EncodeError::Sink(_)));
        assert!(array.is_poisoned());
        assert!(matches!(
            array.push_map(&[(Item::Uint(1), Item::Uint(1))]),
            Err(EncodeError::Aborted)
        ));
        assert!(matches!(array.close(), Err(EncodeError::Aborted)));
        assert!(frame.len() <= frame.capacity());
    }

    #[test]
    fn frame_buffer_clear_discards_bytes() {
        let mut frame = FrameBuffer::<8>::new();
        frame.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(frame.as_slice(), [1, 2, 3]);
        frame.clear();
        assert!(frame.is_empty());
    }
}
