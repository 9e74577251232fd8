use serde::{Deserialize, Serialize};
use std::path::Path;
use tonscope_core::{Error, Result};

/// Grupos de padrões habilitados no catálogo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternDetectionConfig {
    /// Lances em leilões do Fragment
    pub detect_auctions: bool,
    /// Transferência e compra de NFTs
    pub detect_nft: bool,
    /// Transferência e queima de jettons
    pub detect_jetton: bool,
    /// Whales, TF, Tonstakers e elector
    pub detect_staking: bool,
    pub detect_dns: bool,
    /// Swaps e liquidez em DEXes
    pub detect_dex: bool,
    pub detect_subscriptions: bool,
    pub detect_invoices: bool,
    pub detect_gas_relay: bool,
    /// Chamada genérica a contrato e transferência de TON
    pub detect_fallbacks: bool,
}

impl Default for PatternDetectionConfig {
    fn default() -> Self {
        Self {
            detect_auctions: true,
            detect_nft: true,
            detect_jetton: true,
            detect_staking: true,
            detect_dns: true,
            detect_dex: true,
            detect_subscriptions: true,
            detect_invoices: true,
            detect_gas_relay: true,
            detect_fallbacks: true,
        }
    }
}

/// Configuração do analisador de ações
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionsConfig {
    /// Profundidade máxima aceita para o trace de entrada
    pub max_depth: usize,
    /// Limite de reescritas por trace
    pub max_rewrites: usize,
    /// Timeout para obter o trace em milissegundos
    pub timeout_ms: u64,
    /// Habilita análise paralela de lotes
    pub enable_parallel: bool,
    pub pattern_detection: PatternDetectionConfig,
}

impl Default for ActionsConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_rewrites: 10_000,
            timeout_ms: 30000, // 30 segundos
            enable_parallel: true,
            pattern_detection: PatternDetectionConfig::default(),
        }
    }
}

impl ActionsConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| Error::DecodeError(format!("Configuração inválida: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::DecodeError(format!("Falha ao ler configuração {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }
}
