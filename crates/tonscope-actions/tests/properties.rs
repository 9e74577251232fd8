mod common;

use common::*;
use tonscope_actions::patterns::{whales_withdraw_immediately_straw, whales_withdraw_request_straw};
use tonscope_actions::{
    collect_actions_and_value_flow, default_straws, merge_all_bubbles, ActionKind, Bubble, Merger,
    PatternDetectionConfig,
};
use tonscope_core::{Interface, Trace};

fn scenarios() -> Vec<Trace> {
    vec![ton_transfer_trace(), jetton_transfer_trace(), unknown_opcode_trace()]
}

fn rewrite(trace: &Trace) -> Bubble {
    let straws = default_straws(&PatternDetectionConfig::default());
    let mut bubble = Bubble::from_trace(trace);
    merge_all_bubbles(&mut bubble, &straws, 10_000);
    bubble
}

#[test]
fn rewriting_is_idempotent() {
    let straws = default_straws(&PatternDetectionConfig::default());
    for trace in scenarios() {
        let mut bubble = rewrite(&trace);
        let first = bubble.clone();
        assert_eq!(merge_all_bubbles(&mut bubble, &straws, 10_000), 0);
        assert_eq!(bubble, first);
    }
}

#[test]
fn output_is_deterministic() {
    for trace in scenarios() {
        let a = serde_json::to_string(&collect_actions_and_value_flow(&rewrite(&trace), None)).unwrap();
        let b = serde_json::to_string(&collect_actions_and_value_flow(&rewrite(&trace), None)).unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn ton_is_conserved_up_to_fees() {
    for trace in scenarios() {
        let list = collect_actions_and_value_flow(&rewrite(&trace), None);
        let fees = total_fees(&trace);
        assert_eq!(list.value_flow.total_fees(), fees);
        assert_eq!(list.value_flow.total_ton(), -fees);
    }
}

#[test]
fn every_internal_transaction_gets_an_action() {
    // cadeia de chamadas desconhecidas entre contratos e carteiras
    let leaf = TxBuilder::new(5, acc(40))
        .internal(acc(30), 1)
        .opcode(0x1234)
        .interface(Interface::Wallet)
        .leaf();
    let middle = TxBuilder::new(4, acc(30))
        .internal(acc(20), 2)
        .opcode(0x5678)
        .trace(vec![leaf]);
    let sibling = TxBuilder::new(3, acc(50)).internal(acc(20), 3).failed().leaf();
    let first = TxBuilder::new(2, acc(20))
        .internal(acc(10), 4)
        .trace(vec![middle, sibling]);
    let trace = TxBuilder::new(1, acc(10)).external().trace(vec![first]);

    let list = collect_actions_and_value_flow(&rewrite(&trace), None);
    assert_eq!(list.actions.len(), trace.total_transactions() - 1);
    assert!(list
        .actions
        .iter()
        .all(|a| matches!(a.kind, ActionKind::TonTransfer(_) | ActionKind::SmartContractExec(_))));
    // remetente devolvível com computação abortada
    assert!(!list.actions[3].success);
}

fn whales_withdraw_trace() -> Trace {
    let payout = TxBuilder::new(3, acc(WALLET_A))
        .internal(acc(60), 10_000_000_000)
        .body(0x1, "WhalesNominatorsWithdrawUnownedResponse", serde_json::json!({}))
        .interface(Interface::Wallet)
        .leaf();
    let withdraw = TxBuilder::new(2, acc(60))
        .internal(acc(WALLET_A), 200_000_000)
        .body(0xda803efd, "WhalesNominatorsWithdraw", serde_json::json!({ "stake": 0 }))
        .interface(Interface::WhalesNominators)
        .trace(vec![payout]);
    TxBuilder::new(1, acc(WALLET_A)).external().trace(vec![withdraw])
}

#[test]
fn catalog_order_decides_overlapping_patterns() {
    let trace = whales_withdraw_trace();

    let default_order = collect_actions_and_value_flow(&rewrite(&trace), None);
    assert_eq!(default_order.actions.len(), 1);
    assert_eq!(default_order.actions[0].action_type(), "WithdrawStake");

    let reversed: Vec<Box<dyn Merger>> = vec![
        Box::new(whales_withdraw_request_straw()),
        Box::new(whales_withdraw_immediately_straw()),
    ];
    let mut bubble = Bubble::from_trace(&trace);
    merge_all_bubbles(&mut bubble, &reversed, 100);
    let list = collect_actions_and_value_flow(&bubble, None);
    assert_eq!(list.actions[0].action_type(), "WithdrawStakeRequest");
}
