//! Predicados reutilizáveis sobre bolhas

use crate::bubble::{Bubble, BubbleInfo, BubbleTx};
use tonscope_core::{abi::ops, Interface};

/// Predicado aplicado a uma bolha candidata
pub type BubbleCheck = Box<dyn Fn(&Bubble) -> bool + Send + Sync>;

fn with_tx(bubble: &Bubble, f: impl FnOnce(&BubbleTx) -> bool) -> bool {
    bubble.tx().map_or(false, f)
}

pub fn is_tx(bubble: &Bubble) -> bool {
    bubble.tx().is_some()
}

pub fn is_external(bubble: &Bubble) -> bool {
    with_tx(bubble, |tx| tx.external)
}

pub fn not_external(bubble: &Bubble) -> bool {
    with_tx(bubble, |tx| !tx.external)
}

pub fn is_bounced(bubble: &Bubble) -> bool {
    with_tx(bubble, |tx| tx.bounced)
}

pub fn is_success(bubble: &Bubble) -> bool {
    with_tx(bubble, |tx| tx.success)
}

/// Mensagem de entrada sem opcode (transferência simples sem corpo)
pub fn has_empty_body(bubble: &Bubble) -> bool {
    with_tx(bubble, |tx| tx.op_code.is_none() && tx.decoded_body.is_none())
}

pub fn is_jetton_transfer(bubble: &Bubble) -> bool {
    matches!(bubble.info, BubbleInfo::JettonTransfer(_))
}

pub fn is_nft_transfer(bubble: &Bubble) -> bool {
    matches!(bubble.info, BubbleInfo::NftTransfer(_))
}

pub fn has_operation(operation: &'static str) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| with_tx(bubble, |tx| tx.operation(operation))
}

pub fn has_opcode(op_code: u32) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| with_tx(bubble, |tx| tx.op_code == Some(op_code))
}

pub fn has_interface(interface: Interface) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| with_tx(bubble, |tx| tx.account.is(interface))
}

pub fn amount_at_least(min: i64) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| with_tx(bubble, |tx| tx.input_amount >= min)
}

pub fn amount_in_range(min: i64, max: i64) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| with_tx(bubble, |tx| tx.input_amount >= min && tx.input_amount <= max)
}

/// Comentário de texto exatamente igual ao informado
pub fn has_text_comment(text: &'static str) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| {
        with_tx(bubble, |tx| {
            tx.operation(ops::TEXT_COMMENT) && tx.comment().as_deref() == Some(text)
        })
    }
}

/// Transferência de jetton já reconhecida cujo payload encaminhado tem a
/// operação informada
pub fn jetton_transfer_with_payload(
    operation: &'static str,
) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static {
    move |bubble| match &bubble.info {
        BubbleInfo::JettonTransfer(t) => t.payload.as_ref().map_or(false, |p| p.is(operation)),
        _ => false,
    }
}

pub fn or<A, B>(a: A, b: B) -> impl Fn(&Bubble) -> bool + Send + Sync + 'static
where
    A: Fn(&Bubble) -> bool + Send + Sync + 'static,
    B: Fn(&Bubble) -> bool + Send + Sync + 'static,
{
    move |bubble| a(bubble) || b(bubble)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonscope_core::DecodedBody;

    fn tx_bubble(tx: BubbleTx) -> Bubble {
        Bubble {
            info: BubbleInfo::Tx(tx),
            ..Default::default()
        }
    }

    #[test]
    fn operation_and_interface_checks() {
        let mut tx = BubbleTx {
            op_code: Some(0x0f8a7ea5),
            decoded_body: Some(DecodedBody::new(ops::JETTON_TRANSFER, serde_json::Value::Null)),
            input_amount: 50,
            ..Default::default()
        };
        tx.account.interfaces.push(Interface::JettonWallet);
        let bubble = tx_bubble(tx);

        assert!(is_tx(&bubble));
        assert!(has_operation(ops::JETTON_TRANSFER)(&bubble));
        assert!(!has_operation(ops::JETTON_BURN)(&bubble));
        assert!(has_opcode(0x0f8a7ea5)(&bubble));
        assert!(has_interface(Interface::JettonWallet)(&bubble));
        assert!(!has_interface(Interface::Wallet)(&bubble));
        assert!(amount_at_least(50)(&bubble));
        assert!(!amount_in_range(60, 100)(&bubble));
        assert!(!has_empty_body(&bubble));
    }

    #[test]
    fn text_comment_and_or() {
        let bubble = tx_bubble(BubbleTx {
            op_code: Some(0),
            decoded_body: Some(DecodedBody::text_comment("d")),
            ..Default::default()
        });
        assert!(has_text_comment("d")(&bubble));
        assert!(!has_text_comment("w")(&bubble));
        let either = or(has_text_comment("w"), has_text_comment("d"));
        assert!(either(&bubble));
    }

    #[test]
    fn tx_checks_fail_on_rewritten_bubbles() {
        let bubble = Bubble {
            info: BubbleInfo::JettonTransfer(Default::default()),
            ..Default::default()
        };
        assert!(!is_tx(&bubble));
        assert!(!not_external(&bubble));
        assert!(is_jetton_transfer(&bubble));
    }
}
