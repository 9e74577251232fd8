/*!
 * Tonscope Core
 *
 * Tipos e utilitários compartilhados para a workspace Tonscope.
 * Define o contrato de entrada do motor de ações: transações já
 * decodificadas (ABI) organizadas em árvores de trace.
 */

pub mod abi;
pub mod error;
pub mod traits;
pub mod types;
pub mod utils;

// Re-exportações públicas
pub use error::{Error, Result};
pub use types::*;
