/*!
 * Tonscope Traits
 *
 * Traits comuns usados em toda a workspace Tonscope
 */

use crate::error::Result;
use crate::types::{Trace, TransactionHash};
use async_trait::async_trait;

/// Provedor de traces já decodificados
///
/// Implementado pelo colaborador que busca blocos e transações na rede,
/// decodifica os corpos via ABI e resolve as interfaces das contas.
#[async_trait]
pub trait TraceProvider: Send + Sync {
    /// Obtém o trace iniciado pela transação informada
    async fn get_trace(&self, hash: TransactionHash) -> Result<Trace>;
}
