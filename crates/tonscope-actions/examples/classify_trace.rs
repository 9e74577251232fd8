use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use tonscope_actions::{ActionsAnalyzer, ActionsConfig};
use tonscope_core::traits::TraceProvider;
use tonscope_core::{Error, Result, Trace, TransactionHash};

/// Provedor que serve um único trace lido de arquivo
struct FileTraceProvider {
    trace: Trace,
}

#[async_trait]
impl TraceProvider for FileTraceProvider {
    async fn get_trace(&self, hash: TransactionHash) -> Result<Trace> {
        if hash == self.trace.transaction.hash {
            Ok(self.trace.clone())
        } else {
            Err(Error::NotFound(format!("Trace {:?}", hash)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Uso: {} <TRACE_JSON> [CONFIG_JSON]", args[0]);
        std::process::exit(1);
    }

    let raw = std::fs::read_to_string(&args[1])?;
    let trace: Trace = serde_json::from_str(&raw)?;
    let config = match args.get(2) {
        Some(path) => Some(ActionsConfig::from_file(path)?),
        None => None,
    };

    let root = trace.transaction.hash;
    let provider = Arc::new(FileTraceProvider { trace });
    let analyzer = ActionsAnalyzer::new(provider, config);

    let analysis = analyzer.analyze_transaction(root).await?;

    if analysis.actions.actions.is_empty() {
        println!("Nenhuma ação reconhecida para {root:?}");
    } else {
        println!("Ações reconhecidas para {root:?}:");
        for action in &analysis.actions.actions {
            println!("- {}", action.preview());
        }
    }
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
