//! Erros de codificação.
//!
//! Toda violação de contrato (capacidade, contagem de itens, destino) é
//! reportada na chamada que a causou. Nada é recuperado silenciosamente.

/// Erros ao montar mensagens de configuração ou de dados.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Capacidade esgotada: o dispositivo aceita no máximo {capacity} canais")]
    CapacityExceeded { capacity: usize },

    #[error("Contagem inconsistente: contêiner declarou {declared} itens, {emitted} emitidos")]
    SchemaMismatch { declared: usize, emitted: usize },

    #[error("Pacote cheio: {capacity} valores já adicionados")]
    Overflow { capacity: usize },

    #[error("Pacote incompleto: {emitted} de {expected} valores adicionados")]
    IncompletePacket { expected: usize, emitted: usize },

    #[error("Esquema já renderizado; novos canais não são aceitos")]
    SchemaFrozen,

    #[error("Mensagem abortada após falha anterior do destino")]
    Aborted,

    #[error("Erro ao escrever no destino: {0}")]
    Sink(#[from] std::io::Error),
}

pub type Result<T, E = EncodeError> = std::result::Result<T, E>;
