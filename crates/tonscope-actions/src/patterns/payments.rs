//! Relay de gás (carteira v5) e pagamento de faturas

use crate::actions::{Action, GasRelayAction, InvoicePaymentAction};
use crate::bubble::Bubble;
use crate::straw::{checks, Straw};
use tonscope_core::abi::{ops, InvoicePayloadBody};
use tonscope_core::{AccountId, Error, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleGasRelay {
    pub relayer: AccountId,
    pub target: AccountId,
    pub amount: i64,
    pub success: bool,
}

impl BubbleGasRelay {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            GasRelayAction {
                relayer: self.relayer,
                target: self.target,
                amount: self.amount,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleInvoicePayment {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub invoice_id: String,
    pub jetton: Option<AccountId>,
    pub amount: u128,
    pub success: bool,
}

impl BubbleInvoicePayment {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            InvoicePaymentAction {
                sender: self.sender,
                recipient: self.recipient,
                invoice_id: self.invoice_id.clone(),
                jetton: self.jetton,
                amount: self.amount,
            },
        )
    }
}

/// Mensagem assinada entregue à carteira v5 por um relayer, que paga o gás.
/// Os filhos (as ações da carteira) não são consumidos.
pub fn gas_relay_straw() -> Straw<BubbleGasRelay> {
    Straw::new("gas_relay")
        .check(checks::not_external)
        .check(checks::has_operation(ops::WALLET_SIGNED_INTERNAL_V5R1))
        .build(|relay: &mut BubbleGasRelay, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            relay.relayer = tx.input_from.unwrap_or_default();
            relay.target = tx.account.address;
            relay.amount = tx.input_amount;
            relay.success = tx.success;
            Ok(())
        })
}

pub fn invoice_ton_straw() -> Straw<BubbleInvoicePayment> {
    Straw::new("invoice_ton")
        .check(checks::not_external)
        .check(checks::has_operation(ops::INVOICE_PAYLOAD))
        .build(|invoice: &mut BubbleInvoicePayment, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            let body: InvoicePayloadBody = tx.decode_body(ops::INVOICE_PAYLOAD)?;
            invoice.sender = tx.input_from.unwrap_or_default();
            invoice.recipient = tx.account.address;
            invoice.invoice_id = body.id;
            invoice.jetton = None;
            invoice.amount = u128::try_from(tx.input_amount).unwrap_or(0);
            invoice.success = tx.success || !tx.bounce;
            Ok(())
        })
}

pub fn invoice_jetton_straw() -> Straw<BubbleInvoicePayment> {
    Straw::new("invoice_jetton")
        .check(checks::jetton_transfer_with_payload(ops::INVOICE_PAYLOAD))
        .build(|invoice: &mut BubbleInvoicePayment, bubble: &Bubble| -> Result<()> {
            let transfer = bubble.require_jetton_transfer()?;
            let body: InvoicePayloadBody = transfer
                .payload
                .as_ref()
                .ok_or_else(|| Error::DecodeError("Fatura sem payload".to_string()))?
                .decode()?;
            invoice.sender = transfer.sender.unwrap_or_default();
            invoice.recipient = transfer.recipient.unwrap_or_default();
            invoice.invoice_id = body.id;
            invoice.jetton = transfer.master;
            invoice.amount = transfer.amount;
            invoice.success = transfer.success;
            Ok(())
        })
}
