//! Padrões de reserva: chamada genérica a contrato e transferência de TON

use crate::actions::{Action, SmartContractAction, TonTransferAction};
use crate::bubble::{Bubble, BubbleTx};
use crate::straw::{checks, Straw};
use tonscope_core::utils::format_opcode;
use tonscope_core::{AccountId, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleTonTransfer {
    pub sender: Option<AccountId>,
    pub recipient: AccountId,
    pub amount: i64,
    pub comment: Option<String>,
    pub encrypted_comment: bool,
    pub refund: bool,
    pub success: bool,
}

impl BubbleTonTransfer {
    pub fn from_tx(tx: &BubbleTx) -> Self {
        Self {
            sender: tx.input_from,
            recipient: tx.account.address,
            amount: tx.input_amount,
            comment: tx.comment(),
            encrypted_comment: tx.decoded_body.as_ref().map_or(false, |b| b.is_encrypted_comment()),
            refund: tx.bounced,
            // Mensagem não devolvível entrega o valor mesmo com a fase de
            // computação abortada
            success: tx.success || !tx.bounce,
        }
    }

    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            TonTransferAction {
                sender: self.sender.unwrap_or_default(),
                recipient: self.recipient,
                amount: self.amount,
                comment: self.comment.clone(),
                encrypted_comment: self.encrypted_comment,
                refund: self.refund,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleContractCall {
    pub executor: Option<AccountId>,
    pub contract: AccountId,
    pub ton_attached: i64,
    pub operation: String,
    pub payload: Option<serde_json::Value>,
    pub success: bool,
}

impl BubbleContractCall {
    pub fn from_tx(tx: &BubbleTx) -> Self {
        let operation = match (&tx.decoded_body, tx.op_code) {
            (Some(body), _) => body.operation.clone(),
            (None, Some(op_code)) => format_opcode(op_code),
            (None, None) => String::new(),
        };
        Self {
            executor: tx.input_from,
            contract: tx.account.address,
            ton_attached: tx.input_amount,
            operation,
            payload: tx.decoded_body.as_ref().map(|b| b.value.clone()),
            success: tx.success,
        }
    }

    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            SmartContractAction {
                executor: self.executor,
                contract: self.contract,
                ton_attached: self.ton_attached,
                operation: self.operation.clone(),
                payload: self.payload.clone(),
            },
        )
    }
}

fn is_contract_call(bubble: &Bubble) -> bool {
    bubble.tx().map_or(false, |tx| !tx.external && tx.is_contract_call())
}

pub fn contract_call_straw() -> Straw<BubbleContractCall> {
    Straw::new("contract_call")
        .check(is_contract_call)
        .build(|call: &mut BubbleContractCall, bubble: &Bubble| -> Result<()> {
            *call = BubbleContractCall::from_tx(bubble.require_tx()?);
            Ok(())
        })
}

pub fn ton_transfer_straw() -> Straw<BubbleTonTransfer> {
    Straw::new("ton_transfer")
        .check(checks::not_external)
        .build(|transfer: &mut BubbleTonTransfer, bubble: &Bubble| -> Result<()> {
            *transfer = BubbleTonTransfer::from_tx(bubble.require_tx()?);
            Ok(())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;
    use crate::bubble::BubbleInfo;
    use tonscope_core::DecodedBody;

    fn bubble(tx: BubbleTx) -> Bubble {
        Bubble {
            info: BubbleInfo::Tx(tx),
            ..Default::default()
        }
    }

    #[test]
    fn unbounceable_transfer_succeeds_despite_aborted_compute() {
        let tx = BubbleTx {
            input_from: Some(AccountId::from_low_u64(1)),
            input_amount: 5,
            success: false,
            bounce: false,
            ..Default::default()
        };
        assert!(BubbleTonTransfer::from_tx(&tx).success);

        let bounceable = BubbleTx { bounce: true, ..tx };
        assert!(!BubbleTonTransfer::from_tx(&bounceable).success);
    }

    #[test]
    fn contract_call_uses_opcode_when_body_unknown() {
        let tx = BubbleTx {
            op_code: Some(0xdeadbeef),
            account_was_active: true,
            success: true,
            ..Default::default()
        };
        let mut b = bubble(tx);
        assert!(contract_call_straw().merge_bubble(&mut b));
        match b.info.to_action().map(|a| a.kind) {
            Some(ActionKind::SmartContractExec(exec)) => assert_eq!(exec.operation, "0xdeadbeef"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ton_transfer_keeps_comment_and_skips_external() {
        let tx = BubbleTx {
            op_code: Some(0),
            decoded_body: Some(DecodedBody::text_comment("hello")),
            ..Default::default()
        };
        let mut b = bubble(tx);
        assert!(ton_transfer_straw().merge_bubble(&mut b));
        match &b.info {
            BubbleInfo::TonTransfer(t) => assert_eq!(t.comment.as_deref(), Some("hello")),
            other => panic!("unexpected {:?}", other.kind()),
        }

        let mut external = bubble(BubbleTx {
            external: true,
            ..Default::default()
        });
        assert!(!ton_transfer_straw().merge_bubble(&mut external));
    }
}
