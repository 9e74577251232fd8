use super::{Action, ActionsList, ContractDeployAction};
use crate::bubble::{Bubble, ValueFlow};
use tonscope_core::AccountId;

/// Achata a árvore reescrita em ações, em pré-ordem, e agrega o fluxo de
/// valores
///
/// Para cada nó são emitidas primeiro as implantações de contrato, depois a
/// ação do próprio nó e por fim as dos filhos. Com `for_account` apenas as
/// ações em que a conta é sujeito são mantidas; o fluxo de valores é sempre
/// o da árvore inteira.
pub fn collect_actions_and_value_flow(bubble: &Bubble, for_account: Option<&AccountId>) -> ActionsList {
    let mut actions = Vec::new();
    let value_flow = collect(bubble, for_account, &mut actions);
    ActionsList { actions, value_flow }
}

fn collect(bubble: &Bubble, for_account: Option<&AccountId>, actions: &mut Vec<Action>) -> ValueFlow {
    let keep = |action: &Action| for_account.map_or(true, |account| action.is_subject(account));

    for deployment in bubble.contract_deployments.values() {
        let action = Action::new(
            deployment.success,
            ContractDeployAction {
                address: deployment.address,
                interfaces: deployment.interfaces.clone(),
            },
        );
        if keep(&action) {
            actions.push(action);
        }
    }

    if let Some(action) = bubble.info.to_action() {
        if keep(&action) {
            actions.push(action);
        }
    }

    let mut value_flow = ValueFlow::new();
    for child in &bubble.children {
        value_flow.merge(&collect(child, for_account, actions));
    }
    value_flow.merge(&bubble.value_flow);
    value_flow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::{BubbleInfo, BubbleTx, ContractDeployment};

    fn acc(n: u64) -> AccountId {
        AccountId::from_low_u64(n)
    }

    fn transfer(from: u64, to: u64, children: Vec<Bubble>) -> Bubble {
        let mut tx = BubbleTx {
            input_from: Some(acc(from)),
            input_amount: 10,
            success: true,
            ..Default::default()
        };
        tx.account.address = acc(to);
        let mut bubble = Bubble {
            info: BubbleInfo::Tx(tx),
            children,
            ..Default::default()
        };
        bubble.value_flow.add_ton(acc(to), 10);
        bubble.value_flow.add_ton(acc(from), -10);
        bubble
    }

    #[test]
    fn emits_deployments_then_own_action_then_children() {
        let mut root = transfer(1, 2, vec![transfer(2, 3, vec![])]);
        root.contract_deployments.insert(
            acc(2),
            ContractDeployment {
                address: acc(2),
                interfaces: vec![],
                success: true,
            },
        );
        let list = collect_actions_and_value_flow(&root, None);
        let types: Vec<&str> = list.actions.iter().map(|a| a.action_type()).collect();
        assert_eq!(types, vec!["ContractDeploy", "TonTransfer", "TonTransfer"]);
        assert_eq!(list.value_flow.get(&acc(2)).unwrap().ton, 0);
        assert_eq!(list.value_flow.get(&acc(3)).unwrap().ton, 10);
    }

    #[test]
    fn filters_by_account() {
        let root = transfer(1, 2, vec![transfer(2, 3, vec![]), transfer(4, 5, vec![])]);
        let list = collect_actions_and_value_flow(&root, Some(&acc(3)));
        assert_eq!(list.actions.len(), 1);
        assert!(list.actions[0].is_subject(&acc(3)));
        assert_eq!(list.value_flow.accounts.len(), 5);
    }
}
