/*!
 * Tonscope Actions
 *
 * Reconhecimento de ações em traces TON. O trace decodificado é convertido
 * em uma árvore de bolhas, reescrita por um catálogo ordenado de padrões
 * declarativos ("straws") e achatada em uma lista de ações legíveis com o
 * fluxo de valores por conta.
 */

pub mod actions;
pub mod bubble;
pub mod config;
pub mod patterns;
pub mod straw;

use ethereum_types::H256;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tonscope_core::traits::TraceProvider;
use tonscope_core::{AccountId, Error, Result, Trace};
use tracing::{debug, info, warn};

// Re-exportações públicas
pub use actions::{collect_actions_and_value_flow, Action, ActionKind, ActionsList};
pub use bubble::{Bubble, BubbleInfo, ValueFlow};
pub use config::{ActionsConfig, PatternDetectionConfig};
pub use patterns::default_straws;
pub use straw::{merge_all_bubbles, Merger, Straw};

/// Classifica um trace com o catálogo informado, sem validação prévia
pub fn find_actions(trace: &Trace, straws: &[Box<dyn Merger>]) -> ActionsList {
    let mut bubble = Bubble::from_trace(trace);
    merge_all_bubbles(&mut bubble, straws, ActionsConfig::default().max_rewrites);
    collect_actions_and_value_flow(&bubble, None)
}

/// Resultado da análise de um trace obtido do provedor
#[derive(Debug, Clone, Serialize)]
pub struct TraceAnalysis {
    pub hash: H256,
    pub total_transactions: usize,
    #[serde(flatten)]
    pub actions: ActionsList,
}

/// Analisador de ações
pub struct ActionsAnalyzer {
    config: ActionsConfig,
    provider: Arc<dyn TraceProvider>,
    straws: Arc<Vec<Box<dyn Merger>>>,
}

impl ActionsAnalyzer {
    /// Cria um novo analisador com o catálogo padrão
    pub fn new(provider: Arc<dyn TraceProvider>, config: Option<ActionsConfig>) -> Self {
        let config = config.unwrap_or_default();
        let straws = Arc::new(default_straws(&config.pattern_detection));
        debug!(patterns = straws.len(), "catálogo de padrões carregado");

        Self {
            config,
            provider,
            straws,
        }
    }

    pub fn config(&self) -> &ActionsConfig {
        &self.config
    }

    /// Valida e classifica um trace já obtido
    pub fn analyze(&self, trace: &Trace) -> Result<ActionsList> {
        self.analyze_filtered(trace, None)
    }

    /// Como `analyze`, mantendo apenas as ações envolvendo `account`
    pub fn analyze_for_account(&self, trace: &Trace, account: &AccountId) -> Result<ActionsList> {
        self.analyze_filtered(trace, Some(account))
    }

    fn analyze_filtered(&self, trace: &Trace, account: Option<&AccountId>) -> Result<ActionsList> {
        trace.validate(self.config.max_depth)?;

        let mut bubble = Bubble::from_trace(trace);
        let rewrites = merge_all_bubbles(&mut bubble, &self.straws, self.config.max_rewrites);
        let actions = collect_actions_and_value_flow(&bubble, account);

        debug!(
            transactions = trace.total_transactions(),
            rewrites,
            actions = actions.actions.len(),
            "trace classificado"
        );
        Ok(actions)
    }

    /// Obtém o trace pelo hash e o classifica
    pub async fn analyze_transaction(&self, tx_hash: H256) -> Result<TraceAnalysis> {
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let trace = tokio::time::timeout(timeout, self.provider.get_trace(tx_hash))
            .await
            .map_err(|_| {
                Error::TimeoutError(format!(
                    "Trace {:?} não obtido em {} ms",
                    tx_hash, self.config.timeout_ms
                ))
            })??;

        info!(
            hash = ?tx_hash,
            transactions = trace.total_transactions(),
            "analisando trace"
        );

        let actions = self.analyze(&trace)?;
        Ok(TraceAnalysis {
            hash: tx_hash,
            total_transactions: trace.total_transactions(),
            actions,
        })
    }

    /// Analisa um lote de transações; falhas individuais são registradas e
    /// omitidas do resultado
    pub async fn analyze_batch(&self, tx_hashes: &[H256]) -> Result<Vec<TraceAnalysis>> {
        let mut results = Vec::with_capacity(tx_hashes.len());

        if self.config.enable_parallel {
            // Análise paralela
            let futures = tx_hashes
                .iter()
                .map(|&tx_hash| self.analyze_transaction(tx_hash));
            let analyses = futures::future::join_all(futures).await;

            for (tx_hash, analysis) in tx_hashes.iter().zip(analyses) {
                match analysis {
                    Ok(result) => results.push(result),
                    Err(e) => warn!(hash = ?tx_hash, error = %e, "erro ao analisar trace"),
                }
            }
        } else {
            // Análise sequencial
            for &tx_hash in tx_hashes {
                match self.analyze_transaction(tx_hash).await {
                    Ok(result) => results.push(result),
                    Err(e) => warn!(hash = ?tx_hash, error = %e, "erro ao analisar trace"),
                }
            }
        }

        Ok(results)
    }
}
