use super::{Account, Bubble, BubbleInfo, BubbleTx, ContractDeployment, ValueFlow};
use std::collections::{BTreeMap, BTreeSet};
use tonscope_core::{AccountStatus, Trace};

impl Bubble {
    /// Converte um trace em uma árvore de bolhas, uma por transação
    ///
    /// Nenhum padrão é aplicado aqui. O fluxo de valores de cada bolha é
    /// semeado com o valor recebido (creditado na conta e debitado do
    /// remetente, quando conhecido) e com as taxas da transação.
    pub fn from_trace(trace: &Trace) -> Bubble {
        let tx = &trace.transaction;
        let fee = tx.fees.total();

        let mut btx = BubbleTx {
            hash: tx.hash,
            success: tx.success,
            account: Account {
                address: tx.account,
                interfaces: tx.interfaces.clone(),
            },
            account_was_active: tx.orig_status == AccountStatus::Active,
            fee,
            additional_info: tx.additional_info.clone(),
            ..Default::default()
        };

        let mut accounts = BTreeSet::new();
        accounts.insert(tx.account);

        let mut value_flow = ValueFlow::new();
        value_flow.add_fee(tx.account, fee);

        if let Some(msg) = &tx.in_msg {
            btx.input_amount = msg.value;
            btx.input_from = msg.source;
            btx.bounce = msg.bounce;
            btx.bounced = msg.bounced;
            btx.external = msg.is_external;
            btx.op_code = msg.op_code;
            btx.decoded_body = msg.decoded_body.clone();
            btx.init = msg.has_init();

            value_flow.add_ton(tx.account, msg.value);
            if let Some(source) = msg.source {
                value_flow.add_ton(source, msg.value.saturating_neg());
            }
        }

        let mut contract_deployments = BTreeMap::new();
        if tx.is_deployment() {
            contract_deployments.insert(
                tx.account,
                ContractDeployment {
                    address: tx.account,
                    interfaces: tx.interfaces.clone(),
                    success: tx.success,
                },
            );
        }

        Bubble {
            info: BubbleInfo::Tx(btx),
            accounts,
            children: trace.children.iter().map(Bubble::from_trace).collect(),
            value_flow,
            contract_deployments,
            transactions: vec![tx.hash],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonscope_core::{AccountId, Fees, Message, Transaction};

    fn acc(n: u64) -> AccountId {
        AccountId::from_low_u64(n)
    }

    fn internal_tx(account: u64, from: u64, value: i64, fee: i64) -> Transaction {
        Transaction {
            account: acc(account),
            success: true,
            orig_status: AccountStatus::Active,
            end_status: AccountStatus::Active,
            in_msg: Some(Message {
                source: Some(acc(from)),
                destination: Some(acc(account)),
                value,
                ..Default::default()
            }),
            fees: Fees {
                compute: fee,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn seeds_value_flow_and_accounts() {
        let trace = Trace::new(internal_tx(2, 1, 1_000, 10));
        let bubble = Bubble::from_trace(&trace);

        // o remetente só aparece no fluxo de valores
        assert_eq!(bubble.accounts.iter().collect::<Vec<_>>(), vec![&acc(2)]);
        let recipient = bubble.value_flow.get(&acc(2)).unwrap();
        assert_eq!(recipient.ton, 990);
        assert_eq!(recipient.fees, 10);
        assert_eq!(bubble.value_flow.get(&acc(1)).unwrap().ton, -1_000);
        assert_eq!(bubble.value_flow.total_ton(), -10);

        let tx = bubble.tx().unwrap();
        assert_eq!(tx.input_amount, 1_000);
        assert_eq!(tx.input_from, Some(acc(1)));
        assert!(tx.account_was_active);
    }

    #[test]
    fn imports_children_in_order() {
        let trace = Trace::new(internal_tx(2, 1, 100, 1)).with_children(vec![
            Trace::new(internal_tx(3, 2, 50, 1)),
            Trace::new(internal_tx(4, 2, 20, 1)),
        ]);
        let bubble = Bubble::from_trace(&trace);
        assert_eq!(bubble.children.len(), 2);
        assert_eq!(bubble.children[0].tx().unwrap().account.address, acc(3));
        assert_eq!(bubble.children[1].tx().unwrap().account.address, acc(4));
        assert_eq!(bubble.total_bubbles(), 3);
    }

    #[test]
    fn records_contract_deployment() {
        let mut tx = internal_tx(5, 1, 100, 1);
        tx.orig_status = AccountStatus::Uninit;
        if let Some(msg) = tx.in_msg.as_mut() {
            msg.init = vec![0xb5, 0xee];
        }
        let bubble = Bubble::from_trace(&Trace::new(tx));
        assert!(bubble.contract_deployments.contains_key(&acc(5)));
        assert!(!bubble.tx().unwrap().account_was_active);
    }
}
