//! Assinaturas recorrentes via plugin de carteira v4

use crate::actions::{Action, SubscribeAction, UnSubscribeAction};
use crate::bubble::Bubble;
use crate::straw::{checks, Straw};
use tonscope_core::abi::ops;
use tonscope_core::{AccountId, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleSubscription {
    pub subscriber: AccountId,
    pub subscription: AccountId,
    pub beneficiary: AccountId,
    pub amount: i64,
    pub initial: bool,
    pub success: bool,
}

impl BubbleSubscription {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            SubscribeAction {
                subscriber: self.subscriber,
                subscription: self.subscription,
                beneficiary: self.beneficiary,
                amount: self.amount,
                initial: self.initial,
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleUnSubscription {
    pub subscriber: AccountId,
    pub subscription: AccountId,
    pub beneficiary: Option<AccountId>,
    pub success: bool,
}

impl BubbleUnSubscription {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            UnSubscribeAction {
                subscriber: self.subscriber,
                subscription: self.subscription,
                beneficiary: self.beneficiary,
            },
        )
    }
}

/// Plugin cobra a carteira, recebe o pagamento e repassa ao beneficiário.
/// Na primeira cobrança o plugin é implantado pela própria carteira.
pub fn subscription_straw() -> Straw<BubbleSubscription> {
    Straw::new("subscription")
        .check(checks::has_interface(Interface::SubscriptionV1))
        .build(|sub: &mut BubbleSubscription, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            sub.subscription = tx.account.address;
            sub.initial = tx.init;
            Ok(())
        })
        .single_child(
            Straw::new("subscription_payment_request")
                .check(checks::has_operation(ops::PAYMENT_REQUEST))
                .build(|sub: &mut BubbleSubscription, bubble: &Bubble| -> Result<()> {
                    sub.subscriber = bubble.require_tx()?.account.address;
                    Ok(())
                })
                .single_child(
                    Straw::new("subscription_payment")
                        .check(checks::has_operation(ops::PAYMENT_REQUEST_RESPONSE))
                        .build(|sub: &mut BubbleSubscription, bubble: &Bubble| -> Result<()> {
                            let tx = bubble.require_tx()?;
                            sub.amount = tx.input_amount;
                            sub.success = tx.success;
                            Ok(())
                        })
                        .single_child(
                            Straw::new("subscription_beneficiary")
                                .check(checks::has_operation(ops::SUBSCRIPTION_PAYMENT))
                                .build(|sub: &mut BubbleSubscription, bubble: &Bubble| -> Result<()> {
                                    sub.beneficiary = bubble.require_tx()?.account.address;
                                    Ok(())
                                })
                                .optional(),
                        ),
                ),
        )
}

pub fn unsubscribe_straw() -> Straw<BubbleUnSubscription> {
    Straw::new("unsubscribe")
        .check(checks::has_operation(ops::WALLET_PLUGIN_DESTRUCT))
        .build(|unsub: &mut BubbleUnSubscription, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            unsub.subscriber = tx.input_from.unwrap_or_default();
            unsub.subscription = tx.account.address;
            unsub.success = tx.success;
            Ok(())
        })
        .single_child(
            Straw::new("unsubscribe_response")
                .check(checks::has_operation(ops::WALLET_PLUGIN_DESTRUCT_RESPONSE))
                .optional(),
        )
}
