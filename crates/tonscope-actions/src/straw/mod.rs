/*!
 * Motor de padrões ("straws")
 *
 * Um `Straw<T>` descreve como reconhecer uma interação de protocolo em uma
 * subárvore de bolhas e como reescrevê-la em uma única bolha do tipo `T`.
 */

pub mod checks;
mod driver;

pub use checks::BubbleCheck;
pub use driver::merge_all_bubbles;

use crate::bubble::{Bubble, BubbleInfo, ValueFlow};
use std::collections::BTreeSet;
use tonscope_core::Result;
use tracing::{debug, warn};

/// Extrai campos de um nó casado para a saída em construção
pub type Builder<T> = Box<dyn Fn(&mut T, &Bubble) -> Result<()> + Send + Sync>;

/// Correção do fluxo de valores aplicada após todos os builders
pub type ValueFlowUpdater<T> = Box<dyn Fn(&T, &mut ValueFlow) + Send + Sync>;

/// Padrão declarativo sobre a saída `T`
pub struct Straw<T> {
    pub name: &'static str,
    pub check_funcs: Vec<BubbleCheck>,
    pub builder: Option<Builder<T>>,
    pub value_flow_updater: Option<ValueFlowUpdater<T>>,
    pub single_child: Option<Box<Straw<T>>>,
    pub children: Vec<Straw<T>>,
    pub optional: bool,
}

/// Padrão aplicável pelo driver, independente do tipo de saída
pub trait Merger: Send + Sync {
    fn name(&self) -> &str;

    /// Tenta casar o padrão com `bubble` como raiz e reescrevê-la.
    /// Em caso de falha a árvore permanece intacta.
    fn merge(&self, bubble: &mut Bubble) -> bool;
}

/// Par (padrão, nó) que participou de um casamento
struct StrawMatch<'s, T> {
    straw: &'s Straw<T>,
    path: Vec<usize>,
}

impl<T> Default for Straw<T> {
    fn default() -> Self {
        Self {
            name: "",
            check_funcs: Vec::new(),
            builder: None,
            value_flow_updater: None,
            single_child: None,
            children: Vec::new(),
            optional: false,
        }
    }
}

impl<T> Straw<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Bubble) -> bool + Send + Sync + 'static,
    {
        self.check_funcs.push(Box::new(check));
        self
    }

    pub fn build<F>(mut self, builder: F) -> Self
    where
        F: Fn(&mut T, &Bubble) -> Result<()> + Send + Sync + 'static,
    {
        self.builder = Some(Box::new(builder));
        self
    }

    pub fn update_value_flow<F>(mut self, updater: F) -> Self
    where
        F: Fn(&T, &mut ValueFlow) + Send + Sync + 'static,
    {
        self.value_flow_updater = Some(Box::new(updater));
        self
    }

    pub fn single_child(mut self, straw: Straw<T>) -> Self {
        self.single_child = Some(Box::new(straw));
        self
    }

    pub fn child(mut self, straw: Straw<T>) -> Self {
        self.children.push(straw);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Casamento somente leitura. Em caso de sucesso retorna os pares
    /// participantes, raiz primeiro e descendentes em pré-ordem.
    fn find_match<'s>(&'s self, bubble: &Bubble, path: Vec<usize>) -> Option<Vec<StrawMatch<'s, T>>> {
        if !self.check_funcs.iter().all(|check| check(bubble)) {
            return None;
        }

        let mut matches = vec![StrawMatch {
            straw: self,
            path: path.clone(),
        }];

        if let Some(single) = &self.single_child {
            match Self::match_any_child(single, bubble, &path) {
                Some(found) => matches.extend(found),
                None if single.optional => {}
                None => return None,
            }
        }

        for straw in &self.children {
            match Self::match_any_child(straw, bubble, &path) {
                Some(found) => matches.extend(found),
                None if straw.optional => {}
                None => return None,
            }
        }

        Some(matches)
    }

    /// Primeiro filho, em ordem, casado pelo sub-padrão
    fn match_any_child<'s>(
        straw: &'s Straw<T>,
        bubble: &Bubble,
        path: &[usize],
    ) -> Option<Vec<StrawMatch<'s, T>>> {
        bubble.children.iter().enumerate().find_map(|(index, child)| {
            let mut child_path = path.to_vec();
            child_path.push(index);
            straw.find_match(child, child_path)
        })
    }
}

impl<T> Straw<T>
where
    T: Default + Into<BubbleInfo>,
{
    /// Casa e reescreve `bubble` no lugar
    pub fn merge_bubble(&self, bubble: &mut Bubble) -> bool {
        let matches = match self.find_match(bubble, Vec::new()) {
            Some(matches) => matches,
            None => return false,
        };

        // Builders do mais profundo para a raiz
        let mut info = T::default();
        for m in matches.iter().rev() {
            let builder = match &m.straw.builder {
                Some(builder) => builder,
                None => continue,
            };
            let node = match bubble.descendant(&m.path) {
                Some(node) => node,
                None => return false,
            };
            if let Err(e) = builder(&mut info, node) {
                warn!(
                    straw = self.name,
                    node = node.info.kind(),
                    error = %e,
                    "builder rejeitou o casamento"
                );
                return false;
            }
        }

        let matched: BTreeSet<Vec<usize>> = matches.iter().map(|m| m.path.clone()).collect();
        let root = std::mem::take(bubble);
        let mut merged = Bubble::default();
        absorb(root, Vec::new(), &matched, &mut merged);

        for m in matches.iter().rev() {
            if let Some(updater) = &m.straw.value_flow_updater {
                updater(&info, &mut merged.value_flow);
            }
        }

        merged.info = info.into();
        debug!(
            straw = self.name,
            nodes = matched.len(),
            accounts = merged.accounts.len(),
            "bolha reescrita"
        );
        *bubble = merged;
        true
    }
}

/// Incorpora um nó casado ao resultado; filhos não casados são promovidos
/// a filhos diretos do novo nó, em ordem de documento
fn absorb(node: Bubble, path: Vec<usize>, matched: &BTreeSet<Vec<usize>>, merged: &mut Bubble) {
    merged.accounts.extend(node.accounts);
    merged.value_flow.merge(&node.value_flow);
    merged.contract_deployments.extend(node.contract_deployments);
    merged.transactions.extend(node.transactions);

    for (index, child) in node.children.into_iter().enumerate() {
        let mut child_path = path.clone();
        child_path.push(index);
        if matched.contains(&child_path) {
            absorb(child, child_path, matched, merged);
        } else {
            merged.children.push(child);
        }
    }
}

impl<T> Merger for Straw<T>
where
    T: Default + Into<BubbleInfo> + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn merge(&self, bubble: &mut Bubble) -> bool {
        self.merge_bubble(bubble)
    }
}
