//! Comparação estrutural de ações contra um modelo parcial
//!
//! Campos zerados ou ausentes no modelo funcionam como curinga.

use super::*;

trait Wildcard {
    fn fits(&self, actual: &Self) -> bool;
}

impl Wildcard for AccountId {
    fn fits(&self, actual: &Self) -> bool {
        self.is_zero() || self == actual
    }
}

impl Wildcard for i64 {
    fn fits(&self, actual: &Self) -> bool {
        *self == 0 || self == actual
    }
}

impl Wildcard for u128 {
    fn fits(&self, actual: &Self) -> bool {
        *self == 0 || self == actual
    }
}

impl Wildcard for bool {
    fn fits(&self, actual: &Self) -> bool {
        !*self || *actual
    }
}

impl Wildcard for String {
    fn fits(&self, actual: &Self) -> bool {
        self.is_empty() || self == actual
    }
}

impl<T: PartialEq> Wildcard for Option<T> {
    fn fits(&self, actual: &Self) -> bool {
        self.is_none() || self == actual
    }
}

impl Wildcard for Vec<Interface> {
    fn fits(&self, actual: &Self) -> bool {
        self.iter().all(|i| actual.contains(i))
    }
}

impl Wildcard for SwapAsset {
    fn fits(&self, actual: &Self) -> bool {
        self.jetton.fits(&actual.jetton) && self.amount.fits(&actual.amount)
    }
}

impl Wildcard for Vec<SwapAsset> {
    fn fits(&self, actual: &Self) -> bool {
        self.iter().all(|t| actual.iter().any(|a| t.fits(a)))
    }
}

impl Action {
    /// Compatível com o modelo: mesmo tipo, e cada campo não nulo do modelo
    /// igual ao desta ação. `success = false` no modelo aceita qualquer
    /// resultado.
    pub fn matches_template(&self, template: &Action) -> bool {
        if !template.success.fits(&self.success) {
            return false;
        }
        match (&template.kind, &self.kind) {
            (ActionKind::TonTransfer(t), ActionKind::TonTransfer(a)) => {
                t.sender.fits(&a.sender)
                    && t.recipient.fits(&a.recipient)
                    && t.amount.fits(&a.amount)
                    && t.comment.fits(&a.comment)
                    && t.encrypted_comment.fits(&a.encrypted_comment)
                    && t.refund.fits(&a.refund)
            }
            (ActionKind::JettonTransfer(t), ActionKind::JettonTransfer(a)) => {
                t.sender.fits(&a.sender)
                    && t.recipient.fits(&a.recipient)
                    && t.senders_wallet.fits(&a.senders_wallet)
                    && t.recipients_wallet.fits(&a.recipients_wallet)
                    && t.jetton.fits(&a.jetton)
                    && t.amount.fits(&a.amount)
                    && t.comment.fits(&a.comment)
            }
            (ActionKind::JettonBurn(t), ActionKind::JettonBurn(a)) => {
                t.sender.fits(&a.sender)
                    && t.senders_wallet.fits(&a.senders_wallet)
                    && t.jetton.fits(&a.jetton)
                    && t.amount.fits(&a.amount)
            }
            (ActionKind::NftItemTransfer(t), ActionKind::NftItemTransfer(a)) => {
                t.sender.fits(&a.sender)
                    && t.recipient.fits(&a.recipient)
                    && t.nft.fits(&a.nft)
                    && t.comment.fits(&a.comment)
            }
            (ActionKind::NftPurchase(t), ActionKind::NftPurchase(a)) => {
                t.seller.fits(&a.seller)
                    && t.buyer.fits(&a.buyer)
                    && t.nft.fits(&a.nft)
                    && t.sale_contract.fits(&a.sale_contract)
                    && t.marketplace.fits(&a.marketplace)
                    && t.price.fits(&a.price)
            }
            (ActionKind::JettonSwap(t), ActionKind::JettonSwap(a)) => {
                t.dex == a.dex
                    && t.user.fits(&a.user)
                    && t.router.fits(&a.router)
                    && t.asset_in.fits(&a.asset_in)
                    && t.asset_out.fits(&a.asset_out)
            }
            (ActionKind::LiquidityDeposit(t), ActionKind::LiquidityDeposit(a)) => {
                t.dex == a.dex
                    && t.from.fits(&a.from)
                    && t.pool.fits(&a.pool)
                    && t.tokens.fits(&a.tokens)
            }
            (ActionKind::ContractDeploy(t), ActionKind::ContractDeploy(a)) => {
                t.address.fits(&a.address) && t.interfaces.fits(&a.interfaces)
            }
            (ActionKind::SmartContractExec(t), ActionKind::SmartContractExec(a)) => {
                t.executor.fits(&a.executor)
                    && t.contract.fits(&a.contract)
                    && t.ton_attached.fits(&a.ton_attached)
                    && t.operation.fits(&a.operation)
            }
            (ActionKind::Subscribe(t), ActionKind::Subscribe(a)) => {
                t.subscriber.fits(&a.subscriber)
                    && t.subscription.fits(&a.subscription)
                    && t.beneficiary.fits(&a.beneficiary)
                    && t.amount.fits(&a.amount)
                    && t.initial.fits(&a.initial)
            }
            (ActionKind::UnSubscribe(t), ActionKind::UnSubscribe(a)) => {
                t.subscriber.fits(&a.subscriber)
                    && t.subscription.fits(&a.subscription)
                    && t.beneficiary.fits(&a.beneficiary)
            }
            (ActionKind::DepositStake(t), ActionKind::DepositStake(a)) => {
                t.staker.fits(&a.staker)
                    && t.pool.fits(&a.pool)
                    && t.amount.fits(&a.amount)
                    && t.implementation == a.implementation
            }
            (ActionKind::WithdrawStake(t), ActionKind::WithdrawStake(a)) => {
                t.staker.fits(&a.staker)
                    && t.pool.fits(&a.pool)
                    && t.amount.fits(&a.amount)
                    && t.implementation == a.implementation
            }
            (ActionKind::WithdrawStakeRequest(t), ActionKind::WithdrawStakeRequest(a)) => {
                t.staker.fits(&a.staker)
                    && t.pool.fits(&a.pool)
                    && t.amount.fits(&a.amount)
                    && t.implementation == a.implementation
            }
            (ActionKind::ElectionsDepositStake(t), ActionKind::ElectionsDepositStake(a)) => {
                t.staker.fits(&a.staker) && t.elector.fits(&a.elector) && t.amount.fits(&a.amount)
            }
            (ActionKind::ElectionsRecoverStake(t), ActionKind::ElectionsRecoverStake(a)) => {
                t.staker.fits(&a.staker) && t.elector.fits(&a.elector) && t.amount.fits(&a.amount)
            }
            (ActionKind::AuctionBid(t), ActionKind::AuctionBid(a)) => {
                t.bidder.fits(&a.bidder)
                    && t.nft.fits(&a.nft)
                    && t.amount.fits(&a.amount)
                    && t.outbid.fits(&a.outbid)
            }
            (ActionKind::DnsRenew(t), ActionKind::DnsRenew(a)) => {
                t.renewer.fits(&a.renewer) && t.item.fits(&a.item)
            }
            (ActionKind::GasRelay(t), ActionKind::GasRelay(a)) => {
                t.relayer.fits(&a.relayer) && t.target.fits(&a.target) && t.amount.fits(&a.amount)
            }
            (ActionKind::InvoicePayment(t), ActionKind::InvoicePayment(a)) => {
                t.sender.fits(&a.sender)
                    && t.recipient.fits(&a.recipient)
                    && t.invoice_id.fits(&a.invoice_id)
                    && t.jetton.fits(&a.jetton)
                    && t.amount.fits(&a.amount)
            }
            _ => false,
        }
    }
}
