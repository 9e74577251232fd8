use super::Merger;
use crate::bubble::Bubble;
use tracing::{debug, warn};

/// Aplica o catálogo, em ordem, até o ponto fixo de cada padrão
///
/// Para cada padrão a árvore é varrida em profundidade, raiz primeiro.
/// Após cada reescrita a varredura recomeça da raiz com o mesmo padrão; o
/// próximo padrão só é tentado quando uma varredura completa não encontra
/// nada. `max_rewrites` limita o total de reescritas. Retorna o número de
/// reescritas aplicadas.
pub fn merge_all_bubbles(bubble: &mut Bubble, straws: &[Box<dyn Merger>], max_rewrites: usize) -> usize {
    let mut rewrites = 0;
    for straw in straws {
        loop {
            if rewrites >= max_rewrites {
                warn!(
                    straw = straw.name(),
                    max_rewrites, "limite de reescritas atingido, interrompendo"
                );
                return rewrites;
            }
            if !merge_first(bubble, straw.as_ref()) {
                break;
            }
            rewrites += 1;
        }
    }
    debug!(rewrites, bubbles = bubble.total_bubbles(), "catálogo aplicado");
    rewrites
}

/// Primeira reescrita bem-sucedida em pré-ordem
fn merge_first(bubble: &mut Bubble, straw: &dyn Merger) -> bool {
    if straw.merge(bubble) {
        return true;
    }
    bubble
        .children
        .iter_mut()
        .any(|child| merge_first(child, straw))
}
