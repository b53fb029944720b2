//! Leitor CBOR mínimo usado só nos testes.
//!
//! Percorre os bytes sem depender do escritor e conta os elementos de cada
//! contêiner de fato presentes, de modo que valores simples (como o marcador
//! de ausência) continuam visíveis.

/// Árvore de itens lida de um frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Uint(u64),
    Neg(i128),
    Text(String),
    Simple(u8),
    Array(Vec<Node>),
    Map(Vec<(Node, Node)>),
}

impl Node {
    pub fn int(value: i64) -> Self {
        if value >= 0 {
            Node::Uint(value as u64)
        } else {
            Node::Neg(i128::from(value))
        }
    }

    pub fn text(value: &str) -> Self {
        Node::Text(value.to_owned())
    }
}

struct Cursor<'b> {
    bytes: &'b [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn byte(&mut self) -> u8 {
        let b = self.bytes[self.pos];
        self.pos += 1;
        b
    }

    fn argument(&mut self, info: u8) -> u64 {
        let width = match info {
            0..=23 => return u64::from(info),
            24 => 1,
            25 => 2,
            26 => 4,
            27 => 8,
            other => panic!("informação adicional não suportada: {other}"),
        };
        (0..width).fold(0u64, |acc, _| (acc << 8) | u64::from(self.byte()))
    }

    fn node(&mut self) -> Node {
        let initial = self.byte();
        let major = initial >> 5;
        let info = initial & 0x1f;
        match major {
            0 => Node::Uint(self.argument(info)),
            1 => Node::Neg(-1 - i128::from(self.argument(info))),
            3 => {
                let len = self.argument(info) as usize;
                let text = &self.bytes[self.pos..self.pos + len];
                self.pos += len;
                Node::Text(String::from_utf8(text.to_vec()).expect("texto UTF-8"))
            }
            4 => {
                let len = self.argument(info);
                Node::Array((0..len).map(|_| self.node()).collect())
            }
            5 => {
                let len = self.argument(info);
                Node::Map((0..len).map(|_| (self.node(), self.node())).collect())
            }
            7 if info < 24 => Node::Simple(info),
            other => panic!("tipo maior não suportado: {other}"),
        }
    }
}

/// Lê exatamente um item e exige que o frame termine nele.
pub fn read_frame(bytes: &[u8]) -> Node {
    let mut cursor = Cursor { bytes, pos: 0 };
    let node = cursor.node();
    assert_eq!(cursor.pos, bytes.len(), "bytes sobrando após o item");
    node
}
