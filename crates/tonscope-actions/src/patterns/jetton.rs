//! Transferências e queima de jettons (TEP-74)

use super::excess;
use crate::actions::{Action, JettonBurnAction, JettonTransferAction};
use crate::bubble::{Bubble, ValueFlow};
use crate::straw::{checks, Straw};
use tonscope_core::abi::{ops, JettonBurnMsgBody, JettonNotifyMsgBody, JettonTransferMsgBody};
use tonscope_core::{AccountId, DecodedBody, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleJettonTransfer {
    pub sender: Option<AccountId>,
    pub recipient: Option<AccountId>,
    pub senders_wallet: AccountId,
    pub recipients_wallet: AccountId,
    pub master: Option<AccountId>,
    pub amount: u128,
    /// Payload encaminhado ao destinatário (comentário, swap, fatura...)
    pub payload: Option<DecodedBody>,
    pub success: bool,
}

impl BubbleJettonTransfer {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            JettonTransferAction {
                sender: self.sender,
                recipient: self.recipient,
                senders_wallet: self.senders_wallet,
                recipients_wallet: self.recipients_wallet,
                jetton: self.master,
                amount: self.amount,
                comment: self.payload.as_ref().and_then(|p| p.comment()),
                encrypted_comment: self.payload.as_ref().map_or(false, |p| p.is_encrypted_comment()),
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleJettonBurn {
    pub sender: AccountId,
    pub senders_wallet: AccountId,
    pub master: Option<AccountId>,
    pub amount: u128,
    /// Master confirmou a queima
    pub confirmed: bool,
}

impl BubbleJettonBurn {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.confirmed,
            JettonBurnAction {
                sender: self.sender,
                senders_wallet: self.senders_wallet,
                jetton: self.master,
                amount: self.amount,
            },
        )
    }
}

/// Nó `JettonTransfer` na carteira do remetente
fn build_transfer_root(transfer: &mut BubbleJettonTransfer, bubble: &Bubble) -> Result<()> {
    let tx = bubble.require_tx()?;
    let body: JettonTransferMsgBody = tx.decode_body(ops::JETTON_TRANSFER)?;
    transfer.sender = tx.input_from;
    transfer.senders_wallet = tx.account.address;
    transfer.amount = body.amount;
    if transfer.recipient.is_none() {
        transfer.recipient = Some(body.destination);
    }
    if transfer.payload.is_none() {
        transfer.payload = body.forward_payload;
    }
    if transfer.master.is_none() {
        transfer.master = tx.jetton_master();
    }
    Ok(())
}

fn transfer_root(name: &'static str) -> Straw<BubbleJettonTransfer> {
    Straw::new(name)
        .check(checks::has_interface(Interface::JettonWallet))
        .check(checks::has_operation(ops::JETTON_TRANSFER))
        .build(build_transfer_root)
}

fn update_transfer_flow(transfer: &BubbleJettonTransfer, flow: &mut ValueFlow) {
    if !transfer.success {
        return;
    }
    let master = match transfer.master {
        Some(master) => master,
        None => return,
    };
    if let Some(sender) = transfer.sender {
        flow.sub_jettons(sender, master, transfer.amount);
    }
    if let Some(recipient) = transfer.recipient {
        flow.add_jettons(recipient, master, transfer.amount);
    }
}

/// Transferência completa: carteira do remetente, carteira do destinatário
/// e notificação opcional ao novo dono
pub fn jetton_transfer_classic_straw() -> Straw<BubbleJettonTransfer> {
    transfer_root("jetton_transfer")
        .single_child(
            Straw::new("jetton_internal_transfer")
                .check(checks::has_operation(ops::JETTON_INTERNAL_TRANSFER))
                .build(|transfer: &mut BubbleJettonTransfer, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    transfer.recipients_wallet = tx.account.address;
                    transfer.success = tx.success;
                    transfer.master = tx.jetton_master();
                    Ok(())
                })
                .single_child(
                    Straw::new("jetton_notify")
                        .check(checks::has_operation(ops::JETTON_NOTIFY))
                        .build(|transfer: &mut BubbleJettonTransfer, bubble: &Bubble| -> Result<()> {
                            let tx = bubble.require_tx()?;
                            let body: JettonNotifyMsgBody = tx.decode_body(ops::JETTON_NOTIFY)?;
                            transfer.recipient = Some(tx.account.address);
                            transfer.payload = body.forward_payload;
                            Ok(())
                        })
                        .optional(),
                )
                .child(excess()),
        )
        .update_value_flow(update_transfer_flow)
}

/// Transferência abortada antes de chegar à carteira do destinatário
pub fn jetton_transfer_minimal_straw() -> Straw<BubbleJettonTransfer> {
    transfer_root("jetton_transfer_minimal")
}

pub fn jetton_burn_straw() -> Straw<BubbleJettonBurn> {
    Straw::new("jetton_burn")
        .check(checks::has_interface(Interface::JettonWallet))
        .check(checks::has_operation(ops::JETTON_BURN))
        .build(|burn: &mut BubbleJettonBurn, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            let body: JettonBurnMsgBody = tx.decode_body(ops::JETTON_BURN)?;
            burn.sender = tx.input_from.unwrap_or_default();
            burn.senders_wallet = tx.account.address;
            burn.amount = body.amount;
            if burn.master.is_none() {
                burn.master = tx.jetton_master();
            }
            Ok(())
        })
        .single_child(
            Straw::new("jetton_burn_notification")
                .check(checks::has_operation(ops::JETTON_BURN_NOTIFICATION))
                .build(|burn: &mut BubbleJettonBurn, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    burn.confirmed = tx.success;
                    burn.master = Some(tx.account.address);
                    Ok(())
                })
                .child(excess())
                .optional(),
        )
        .update_value_flow(|burn: &BubbleJettonBurn, flow: &mut ValueFlow| {
            if let (true, Some(master)) = (burn.confirmed, burn.master) {
                flow.sub_jettons(burn.sender, master, burn.amount);
            }
        })
}
