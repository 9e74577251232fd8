//! Staking: Whales, TF nominators, Tonstakers e depósitos no elector

use crate::actions::{
    Action, DepositStakeAction, ElectionsDepositStakeAction, ElectionsRecoverStakeAction,
    StakingImplementation, WithdrawStakeAction, WithdrawStakeRequestAction,
};
use crate::bubble::{Bubble, ValueFlow};
use crate::straw::{checks, Straw};
use tonscope_core::abi::{
    ops, JettonInternalTransferMsgBody, JettonMintMsgBody, WhalesNominatorsWithdrawMsgBody,
};
use tonscope_core::{AccountId, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleDepositStake {
    pub staker: AccountId,
    pub pool: AccountId,
    pub amount: i64,
    pub implementation: StakingImplementation,
    /// Jetton líquido emitido em troca do depósito (Tonstakers)
    pub liquid_jetton: Option<AccountId>,
    pub liquid_amount: u128,
    /// Destino do jetton líquido indicado na emissão; o staker quando ausente
    pub liquid_owner: Option<AccountId>,
    pub success: bool,
}

impl BubbleDepositStake {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            DepositStakeAction {
                staker: self.staker,
                pool: self.pool,
                amount: self.amount,
                implementation: self.implementation,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleWithdrawStake {
    pub staker: AccountId,
    pub pool: AccountId,
    pub amount: i64,
    pub implementation: StakingImplementation,
    pub success: bool,
}

impl BubbleWithdrawStake {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            WithdrawStakeAction {
                staker: self.staker,
                pool: self.pool,
                amount: self.amount,
                implementation: self.implementation,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleWithdrawStakeRequest {
    pub staker: AccountId,
    pub pool: AccountId,
    pub amount: Option<i64>,
    pub implementation: StakingImplementation,
    pub success: bool,
}

impl BubbleWithdrawStakeRequest {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            WithdrawStakeRequestAction {
                staker: self.staker,
                pool: self.pool,
                amount: self.amount,
                implementation: self.implementation,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleElectionsDepositStake {
    pub staker: AccountId,
    pub elector: AccountId,
    pub amount: i64,
    pub success: bool,
}

impl BubbleElectionsDepositStake {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            ElectionsDepositStakeAction {
                staker: self.staker,
                elector: self.elector,
                amount: self.amount,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleElectionsRecoverStake {
    pub staker: AccountId,
    pub elector: AccountId,
    pub amount: i64,
    pub success: bool,
}

impl BubbleElectionsRecoverStake {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            ElectionsRecoverStakeAction {
                staker: self.staker,
                elector: self.elector,
                amount: self.amount,
            },
        )
    }
}

pub fn whales_deposit_straw() -> Straw<BubbleDepositStake> {
    Straw::new("whales_deposit")
        .check(checks::has_interface(Interface::WhalesNominators))
        .check(checks::has_operation(ops::WHALES_NOMINATORS_DEPOSIT))
        .build(|deposit: &mut BubbleDepositStake, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            deposit.staker = tx.input_from.unwrap_or_default();
            deposit.pool = tx.account.address;
            deposit.amount = tx.input_amount;
            deposit.implementation = StakingImplementation::Whales;
            deposit.success = tx.success;
            Ok(())
        })
}

fn whales_withdraw_root<T>(name: &'static str) -> Straw<T> {
    Straw::new(name)
        .check(checks::has_interface(Interface::WhalesNominators))
        .check(checks::has_operation(ops::WHALES_NOMINATORS_WITHDRAW))
}

/// Pool com liquidez: o stake volta ao nominador na mesma cadeia
pub fn whales_withdraw_immediately_straw() -> Straw<BubbleWithdrawStake> {
    whales_withdraw_root("whales_withdraw_immediately")
        .build(|withdraw: &mut BubbleWithdrawStake, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            withdraw.staker = tx.input_from.unwrap_or_default();
            withdraw.pool = tx.account.address;
            withdraw.implementation = StakingImplementation::Whales;
            Ok(())
        })
        .single_child(
            Straw::new("whales_withdraw_payout")
                .check(checks::has_operation(ops::WHALES_NOMINATORS_WITHDRAW_RESPONSE))
                .build(|withdraw: &mut BubbleWithdrawStake, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    withdraw.amount = tx.input_amount;
                    withdraw.success = tx.success;
                    Ok(())
                }),
        )
}

/// Pedido registrado para o fim do ciclo de validação
pub fn whales_withdraw_request_straw() -> Straw<BubbleWithdrawStakeRequest> {
    whales_withdraw_root("whales_withdraw_request")
        .build(|request: &mut BubbleWithdrawStakeRequest, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            let body: WhalesNominatorsWithdrawMsgBody = tx.decode_body(ops::WHALES_NOMINATORS_WITHDRAW)?;
            request.staker = tx.input_from.unwrap_or_default();
            request.pool = tx.account.address;
            request.amount = if body.stake == 0 { None } else { Some(body.stake) };
            request.implementation = StakingImplementation::Whales;
            request.success = tx.success;
            Ok(())
        })
        .single_child(
            Straw::new("whales_withdraw_ack")
                .check(checks::is_tx)
                .check(|b: &Bubble| b.tx().map_or(false, |tx| tx.op_code.map_or(true, |op| op == 0)))
                .optional(),
        )
}

pub fn tf_deposit_straw() -> Straw<BubbleDepositStake> {
    Straw::new("tf_deposit")
        .check(checks::has_interface(Interface::TfNominator))
        .check(checks::has_text_comment("d"))
        .build(|deposit: &mut BubbleDepositStake, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            deposit.staker = tx.input_from.unwrap_or_default();
            deposit.pool = tx.account.address;
            deposit.amount = tx.input_amount;
            deposit.implementation = StakingImplementation::TF;
            deposit.success = tx.success;
            Ok(())
        })
}

pub fn tf_withdraw_request_straw() -> Straw<BubbleWithdrawStakeRequest> {
    Straw::new("tf_withdraw_request")
        .check(checks::has_interface(Interface::TfNominator))
        .check(checks::has_text_comment("w"))
        .build(|request: &mut BubbleWithdrawStakeRequest, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            request.staker = tx.input_from.unwrap_or_default();
            request.pool = tx.account.address;
            request.amount = None;
            request.implementation = StakingImplementation::TF;
            request.success = tx.success;
            Ok(())
        })
}

/// Depósito no pool Tonstakers com emissão opcional de tsTON
pub fn tonstakers_deposit_straw() -> Straw<BubbleDepositStake> {
    Straw::new("tonstakers_deposit")
        .check(checks::has_interface(Interface::TonstakersPool))
        .check(checks::has_operation(ops::TONSTAKERS_POOL_DEPOSIT))
        .build(|deposit: &mut BubbleDepositStake, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            deposit.staker = tx.input_from.unwrap_or_default();
            deposit.pool = tx.account.address;
            deposit.amount = tx.input_amount;
            deposit.implementation = StakingImplementation::LiquidTF;
            deposit.success = tx.success;
            Ok(())
        })
        .single_child(
            Straw::new("tonstakers_mint")
                .check(checks::has_operation(ops::JETTON_MINT))
                .build(|deposit: &mut BubbleDepositStake, bubble: &Bubble| -> Result<()> {
                    let body: JettonMintMsgBody = bubble.require_tx()?.decode_body(ops::JETTON_MINT)?;
                    deposit.liquid_owner = Some(body.to_address);
                    Ok(())
                })
                .single_child(
                    Straw::new("tonstakers_mint_transfer")
                        .check(checks::has_operation(ops::JETTON_INTERNAL_TRANSFER))
                        .build(|deposit: &mut BubbleDepositStake, bubble: &Bubble| -> Result<()> {
                            let tx = bubble.require_tx()?;
                            let body: JettonInternalTransferMsgBody =
                                tx.decode_body(ops::JETTON_INTERNAL_TRANSFER)?;
                            if tx.success {
                                deposit.liquid_jetton = tx.jetton_master();
                                deposit.liquid_amount = body.amount;
                            }
                            Ok(())
                        })
                        .optional(),
                )
                .optional(),
        )
        .update_value_flow(|deposit: &BubbleDepositStake, flow: &mut ValueFlow| {
            if let Some(master) = deposit.liquid_jetton {
                let owner = deposit.liquid_owner.unwrap_or(deposit.staker);
                flow.add_jettons(owner, master, deposit.liquid_amount);
            }
        })
}

pub fn elections_deposit_straw() -> Straw<BubbleElectionsDepositStake> {
    Straw::new("elections_deposit")
        .check(checks::has_interface(Interface::Elector))
        .check(checks::has_operation(ops::ELECTOR_NEW_STAKE))
        .build(|deposit: &mut BubbleElectionsDepositStake, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            deposit.staker = tx.input_from.unwrap_or_default();
            deposit.elector = tx.account.address;
            deposit.amount = tx.input_amount;
            deposit.success = tx.success;
            Ok(())
        })
        .single_child(
            Straw::new("elections_deposit_confirmation")
                .check(checks::has_operation(ops::ELECTOR_NEW_STAKE_CONFIRMATION))
                .optional(),
        )
}

pub fn elections_recover_straw() -> Straw<BubbleElectionsRecoverStake> {
    Straw::new("elections_recover")
        .check(checks::has_interface(Interface::Elector))
        .check(checks::has_operation(ops::ELECTOR_RECOVER_STAKE_REQUEST))
        .build(|recover: &mut BubbleElectionsRecoverStake, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            recover.staker = tx.input_from.unwrap_or_default();
            recover.elector = tx.account.address;
            Ok(())
        })
        .single_child(
            Straw::new("elections_recover_response")
                .check(checks::has_operation(ops::ELECTOR_RECOVER_STAKE_RESPONSE))
                .build(|recover: &mut BubbleElectionsRecoverStake, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    recover.amount = tx.input_amount;
                    recover.success = tx.success;
                    Ok(())
                }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::{BubbleInfo, BubbleTx};
    use serde_json::json;
    use tonscope_core::{AdditionalInfo, DecodedBody};

    fn acc(n: u64) -> AccountId {
        AccountId::from_low_u64(n)
    }

    fn node(
        account: u64,
        from: u64,
        amount: i64,
        interface: Option<Interface>,
        body: Option<DecodedBody>,
        children: Vec<Bubble>,
    ) -> Bubble {
        let mut tx = BubbleTx {
            input_from: Some(acc(from)),
            input_amount: amount,
            success: true,
            op_code: body.as_ref().map(|_| 1),
            decoded_body: body,
            ..Default::default()
        };
        tx.account.address = acc(account);
        tx.account.interfaces.extend(interface);
        Bubble {
            info: BubbleInfo::Tx(tx),
            children,
            ..Default::default()
        }
    }

    fn whales_withdraw(children: Vec<Bubble>) -> Bubble {
        node(
            10,
            1,
            200_000_000,
            Some(Interface::WhalesNominators),
            Some(DecodedBody::new(ops::WHALES_NOMINATORS_WITHDRAW, json!({ "stake": 0 }))),
            children,
        )
    }

    #[test]
    fn whales_immediate_withdraw_needs_payout() {
        let payout = node(
            1,
            10,
            50_000_000_000,
            None,
            Some(DecodedBody::new(ops::WHALES_NOMINATORS_WITHDRAW_RESPONSE, json!({}))),
            vec![],
        );
        let mut root = whales_withdraw(vec![payout]);
        assert!(whales_withdraw_immediately_straw().merge_bubble(&mut root));
        match &root.info {
            BubbleInfo::WithdrawStake(w) => {
                assert_eq!(w.amount, 50_000_000_000);
                assert_eq!(w.staker, acc(1));
            }
            other => panic!("unexpected {:?}", other.kind()),
        }

        let mut pending = whales_withdraw(vec![]);
        assert!(!whales_withdraw_immediately_straw().merge_bubble(&mut pending));
        assert!(whales_withdraw_request_straw().merge_bubble(&mut pending));
        match &pending.info {
            BubbleInfo::WithdrawStakeRequest(r) => assert_eq!(r.amount, None),
            other => panic!("unexpected {:?}", other.kind()),
        }
    }

    #[test]
    fn tf_comments_select_operation() {
        let mut deposit = node(
            20,
            1,
            10_000_000_000,
            Some(Interface::TfNominator),
            Some(DecodedBody::text_comment("d")),
            vec![],
        );
        assert!(!tf_withdraw_request_straw().merge_bubble(&mut deposit));
        assert!(tf_deposit_straw().merge_bubble(&mut deposit));
        assert!(matches!(deposit.info, BubbleInfo::DepositStake(_)));
    }

    #[test]
    fn tonstakers_deposit_credits_liquid_jetton() {
        let mut transfer = node(
            31,
            30,
            0,
            None,
            Some(DecodedBody::new(ops::JETTON_INTERNAL_TRANSFER, json!({ "amount": "990" }))),
            vec![],
        );
        if let BubbleInfo::Tx(tx) = &mut transfer.info {
            tx.additional_info = Some(AdditionalInfo {
                jetton_master: Some(acc(30)),
                nft_sale: None,
            });
        }
        let mint = node(
            30,
            20,
            0,
            None,
            Some(DecodedBody::new(
                ops::JETTON_MINT,
                json!({ "to_address": acc(1).to_string(), "amount": "990" }),
            )),
            vec![transfer],
        );
        let mut root = node(
            20,
            1,
            1_000,
            Some(Interface::TonstakersPool),
            Some(DecodedBody::new(ops::TONSTAKERS_POOL_DEPOSIT, json!({}))),
            vec![mint],
        );
        assert!(tonstakers_deposit_straw().merge_bubble(&mut root));
        assert_eq!(root.value_flow.get(&acc(1)).unwrap().jettons[&acc(30)], 990);
        assert!(root.children.is_empty());
    }

    #[test]
    fn tonstakers_credits_mint_destination() {
        let mut transfer = node(
            31,
            30,
            0,
            None,
            Some(DecodedBody::new(ops::JETTON_INTERNAL_TRANSFER, json!({ "amount": "500" }))),
            vec![],
        );
        if let BubbleInfo::Tx(tx) = &mut transfer.info {
            tx.additional_info = Some(AdditionalInfo {
                jetton_master: Some(acc(30)),
                nft_sale: None,
            });
        }
        let mint = node(
            30,
            20,
            0,
            None,
            Some(DecodedBody::new(
                ops::JETTON_MINT,
                json!({ "to_address": acc(7).to_string(), "amount": "500" }),
            )),
            vec![transfer],
        );
        let mut root = node(
            20,
            1,
            1_000,
            Some(Interface::TonstakersPool),
            Some(DecodedBody::new(ops::TONSTAKERS_POOL_DEPOSIT, json!({}))),
            vec![mint],
        );

        assert!(tonstakers_deposit_straw().merge_bubble(&mut root));
        assert_eq!(root.value_flow.get(&acc(7)).unwrap().jettons[&acc(30)], 500);
        assert!(root
            .value_flow
            .get(&acc(1))
            .map_or(true, |f| !f.jettons.contains_key(&acc(30))));
    }

    #[test]
    fn elections_recover_takes_amount_from_response() {
        let response = node(
            1,
            40,
            7_000,
            None,
            Some(DecodedBody::new(ops::ELECTOR_RECOVER_STAKE_RESPONSE, json!({}))),
            vec![],
        );
        let mut root = node(
            40,
            1,
            1,
            Some(Interface::Elector),
            Some(DecodedBody::new(ops::ELECTOR_RECOVER_STAKE_REQUEST, json!({}))),
            vec![response],
        );
        assert!(elections_recover_straw().merge_bubble(&mut root));
        match root.info.to_action().map(|a| (a.success, a.kind)) {
            Some((true, crate::actions::ActionKind::ElectionsRecoverStake(r))) => assert_eq!(r.amount, 7_000),
            other => panic!("unexpected {:?}", other),
        }
    }
}
