//! Swaps e provisão de liquidez em DEXes (STON.fi v1, DeDust)

use crate::actions::{Action, Dex, JettonSwapAction, LiquidityDepositAction, SwapAsset};
use crate::bubble::{Bubble, BubbleInfo};
use crate::straw::{checks, Straw};
use tonscope_core::abi::{
    ops, DedustPayoutFromPoolMsgBody, DedustSwapExternalMsgBody, DedustSwapMsgBody,
    StonfiPaymentRequestMsgBody,
    StonfiSwapJettonPayload, STONFI_SWAP_OK,
};
use tonscope_core::{AccountId, Error, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleJettonSwap {
    pub dex: Dex,
    pub user: AccountId,
    pub router: AccountId,
    pub pool: AccountId,
    pub asset_in: SwapAsset,
    pub asset_out: SwapAsset,
    pub success: bool,
}

impl BubbleJettonSwap {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            JettonSwapAction {
                dex: self.dex,
                user: self.user,
                router: self.router,
                asset_in: self.asset_in.clone(),
                asset_out: self.asset_out.clone(),
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleLiquidityDeposit {
    pub dex: Dex,
    pub from: AccountId,
    pub pool: AccountId,
    pub tokens: Vec<SwapAsset>,
    pub success: bool,
}

impl BubbleLiquidityDeposit {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            LiquidityDepositAction {
                dex: self.dex,
                from: self.from,
                pool: self.pool,
                tokens: self.tokens.clone(),
            },
        )
    }
}

fn ton(amount: i64) -> SwapAsset {
    SwapAsset {
        jetton: None,
        amount: u128::try_from(amount).unwrap_or(0),
    }
}

fn is_internal_tx(bubble: &Bubble) -> bool {
    checks::not_external(bubble)
}

/// Saída do swap: transferência de jetton ou TON enviado diretamente
fn build_payout(swap: &mut BubbleJettonSwap, bubble: &Bubble) -> Result<()> {
    match &bubble.info {
        BubbleInfo::JettonTransfer(transfer) => {
            swap.asset_out = SwapAsset {
                jetton: transfer.master,
                amount: transfer.amount,
            };
            swap.success = transfer.success;
        }
        BubbleInfo::Tx(tx) => {
            swap.asset_out = ton(tx.input_amount);
            swap.success = tx.success;
        }
        other => {
            return Err(Error::ValidationError(format!(
                "Pagamento de swap inesperado: {}",
                other.kind()
            )))
        }
    }
    Ok(())
}

pub fn stonfi_swap_straw() -> Straw<BubbleJettonSwap> {
    Straw::new("stonfi_swap")
        .check(checks::jetton_transfer_with_payload(ops::STONFI_SWAP))
        .build(|swap: &mut BubbleJettonSwap, bubble: &Bubble| -> Result<()> {
            let transfer = bubble.require_jetton_transfer()?;
            let payload: StonfiSwapJettonPayload = transfer
                .payload
                .as_ref()
                .ok_or_else(|| Error::DecodeError("Swap STON.fi sem payload".to_string()))?
                .decode()?;
            swap.dex = Dex::Stonfi;
            swap.user = transfer.sender.unwrap_or(payload.to_address);
            swap.router = transfer.recipient.unwrap_or_default();
            swap.asset_in = SwapAsset {
                jetton: transfer.master,
                amount: transfer.amount,
            };
            swap.success = swap.success && transfer.success;
            Ok(())
        })
        .single_child(
            Straw::new("stonfi_swap_pool")
                .check(checks::has_operation(ops::STONFI_SWAP))
                .build(|swap: &mut BubbleJettonSwap, bubble: &Bubble| -> Result<()> {
                    swap.pool = bubble.require_tx()?.account.address;
                    Ok(())
                })
                .single_child(
                    Straw::new("stonfi_payment_request")
                        .check(checks::has_operation(ops::STONFI_PAYMENT_REQUEST))
                        .build(|swap: &mut BubbleJettonSwap, bubble: &Bubble| -> Result<()> {
                            let tx = bubble.require_tx()?;
                            let body: StonfiPaymentRequestMsgBody =
                                tx.decode_body(ops::STONFI_PAYMENT_REQUEST)?;
                            let swapped = body.exit_code == STONFI_SWAP_OK;
                            swap.success = swap.success && swapped && tx.success;
                            if !swapped {
                                // pagamento é o reembolso da entrada
                                swap.asset_out = SwapAsset::default();
                            } else if swap.asset_out.amount == 0 {
                                swap.asset_out.amount = body.amount0_out.max(body.amount1_out);
                            }
                            Ok(())
                        })
                        .single_child(
                            Straw::new("stonfi_payout")
                                .check(checks::or(checks::is_jetton_transfer, is_internal_tx))
                                .build(build_payout),
                        ),
                ),
        )
}

fn is_native_vault_swap(bubble: &Bubble) -> bool {
    checks::has_interface(Interface::DedustVault)(bubble) && checks::has_operation(ops::DEDUST_SWAP)(bubble)
}

pub fn dedust_swap_straw() -> Straw<BubbleJettonSwap> {
    Straw::new("dedust_swap")
        .check(checks::or(
            is_native_vault_swap,
            checks::jetton_transfer_with_payload(ops::DEDUST_SWAP),
        ))
        .build(|swap: &mut BubbleJettonSwap, bubble: &Bubble| -> Result<()> {
            swap.dex = Dex::Dedust;
            match &bubble.info {
                BubbleInfo::Tx(tx) => {
                    let body: DedustSwapMsgBody = tx.decode_body(ops::DEDUST_SWAP)?;
                    swap.user = tx.input_from.unwrap_or_default();
                    swap.router = tx.account.address;
                    // valor anexado inclui gás; preferir a quantia declarada
                    swap.asset_in = if swap.asset_in.amount > 0 {
                        SwapAsset {
                            jetton: None,
                            amount: swap.asset_in.amount,
                        }
                    } else if body.amount > 0 {
                        SwapAsset {
                            jetton: None,
                            amount: body.amount,
                        }
                    } else {
                        ton(tx.input_amount)
                    };
                }
                BubbleInfo::JettonTransfer(transfer) => {
                    swap.user = transfer.sender.unwrap_or_default();
                    swap.router = transfer.recipient.unwrap_or_default();
                    swap.asset_in = SwapAsset {
                        jetton: transfer.master,
                        amount: transfer.amount,
                    };
                    swap.success = swap.success && transfer.success;
                }
                other => {
                    return Err(Error::ValidationError(format!(
                        "Entrada de swap inesperada: {}",
                        other.kind()
                    )))
                }
            }
            Ok(())
        })
        .single_child(
            Straw::new("dedust_pool")
                .check(checks::has_operation(ops::DEDUST_SWAP_EXTERNAL))
                .build(|swap: &mut BubbleJettonSwap, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    let body: DedustSwapExternalMsgBody = tx.decode_body(ops::DEDUST_SWAP_EXTERNAL)?;
                    swap.pool = tx.account.address;
                    // quantia que de fato chegou ao pool
                    swap.asset_in.amount = body.amount;
                    swap.success = swap.success && tx.success;
                    Ok(())
                })
                .single_child(
                    Straw::new("dedust_vault_payout")
                        .check(checks::has_operation(ops::DEDUST_PAYOUT_FROM_POOL))
                        .build(|swap: &mut BubbleJettonSwap, bubble: &Bubble| -> Result<()> {
                            let tx = bubble.require_tx()?;
                            let body: DedustPayoutFromPoolMsgBody =
                                tx.decode_body(ops::DEDUST_PAYOUT_FROM_POOL)?;
                            if swap.asset_out.amount == 0 {
                                swap.asset_out.amount = body.amount;
                            }
                            Ok(())
                        })
                        .single_child(
                            Straw::new("dedust_payout")
                                .check(checks::or(
                                    checks::is_jetton_transfer,
                                    checks::has_operation(ops::DEDUST_PAYOUT),
                                ))
                                .build(build_payout),
                        ),
                ),
        )
}

pub fn stonfi_liquidity_deposit_straw() -> Straw<BubbleLiquidityDeposit> {
    Straw::new("stonfi_liquidity_deposit")
        .check(checks::jetton_transfer_with_payload(ops::STONFI_PROVIDE_LP))
        .build(|deposit: &mut BubbleLiquidityDeposit, bubble: &Bubble| -> Result<()> {
            let transfer = bubble.require_jetton_transfer()?;
            deposit.dex = Dex::Stonfi;
            deposit.from = transfer.sender.unwrap_or_default();
            deposit.tokens.push(SwapAsset {
                jetton: transfer.master,
                amount: transfer.amount,
            });
            deposit.success = deposit.success && transfer.success;
            Ok(())
        })
        .single_child(
            Straw::new("stonfi_provide_liquidity")
                .check(checks::has_operation(ops::STONFI_PROVIDE_LIQUIDITY))
                .build(|deposit: &mut BubbleLiquidityDeposit, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    deposit.pool = tx.account.address;
                    deposit.success = tx.success;
                    Ok(())
                })
                .single_child(
                    Straw::new("stonfi_add_liquidity")
                        .check(checks::has_operation(ops::STONFI_ADD_LIQUIDITY))
                        .optional(),
                ),
        )
}
