/*!
 * Catálogo de padrões de protocolo
 *
 * A ordem do catálogo é significativa: padrões mais específicos precedem
 * os mais genéricos, e os de reserva vêm por último.
 */

mod auction;
mod dex;
mod dns;
mod fallback;
mod jetton;
mod nft;
mod payments;
mod staking;
mod subscription;

pub use auction::*;
pub use dex::*;
pub use dns::*;
pub use fallback::*;
pub use jetton::*;
pub use nft::*;
pub use payments::*;
pub use staking::*;
pub use subscription::*;

use crate::config::PatternDetectionConfig;
use crate::straw::{checks, Merger, Straw};
use tonscope_core::abi::ops;

/// Devolução opcional do excedente de gás
pub(crate) fn excess<T>() -> Straw<T> {
    Straw::new("excess")
        .check(checks::is_tx)
        .check(checks::has_operation(ops::EXCESS))
        .optional()
}

/// Catálogo padrão, em ordem de precedência
pub fn default_straws(config: &PatternDetectionConfig) -> Vec<Box<dyn Merger>> {
    let mut straws: Vec<Box<dyn Merger>> = Vec::new();

    if config.detect_auctions {
        straws.push(Box::new(fragment_bid_straw()));
    }

    if config.detect_nft {
        straws.push(Box::new(nft_transfer_straw()));
        straws.push(Box::new(nft_purchase_straw()));
    }

    if config.detect_jetton {
        straws.push(Box::new(jetton_transfer_classic_straw()));
        straws.push(Box::new(jetton_transfer_minimal_straw()));
        straws.push(Box::new(jetton_burn_straw()));
    }

    if config.detect_staking {
        // saque imediato antes do pedido: o pedido aceita resposta opcional
        straws.push(Box::new(whales_withdraw_immediately_straw()));
        straws.push(Box::new(whales_withdraw_request_straw()));
        straws.push(Box::new(whales_deposit_straw()));
        straws.push(Box::new(tf_deposit_straw()));
        straws.push(Box::new(tf_withdraw_request_straw()));
        straws.push(Box::new(tonstakers_deposit_straw()));
        straws.push(Box::new(elections_deposit_straw()));
        straws.push(Box::new(elections_recover_straw()));
    }

    if config.detect_dns {
        straws.push(Box::new(dns_renew_straw()));
    }

    if config.detect_dex {
        straws.push(Box::new(stonfi_swap_straw()));
        straws.push(Box::new(dedust_swap_straw()));
        straws.push(Box::new(stonfi_liquidity_deposit_straw()));
    }

    if config.detect_subscriptions {
        straws.push(Box::new(subscription_straw()));
        straws.push(Box::new(unsubscribe_straw()));
    }

    if config.detect_invoices {
        straws.push(Box::new(invoice_ton_straw()));
        straws.push(Box::new(invoice_jetton_straw()));
    }

    if config.detect_gas_relay {
        straws.push(Box::new(gas_relay_straw()));
    }

    if config.detect_fallbacks {
        straws.push(Box::new(contract_call_straw()));
        straws.push(Box::new(ton_transfer_straw()));
    }

    straws
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(straws: &[Box<dyn Merger>]) -> Vec<String> {
        straws.iter().map(|s| s.name().to_string()).collect()
    }

    #[test]
    fn catalog_order() {
        let straws = default_straws(&PatternDetectionConfig::default());
        let names = names(&straws);
        let position = |name: &str| names.iter().position(|n| n == name).unwrap();

        assert_eq!(names.first().map(String::as_str), Some("fragment_bid"));
        assert_eq!(names.last().map(String::as_str), Some("ton_transfer"));
        assert!(position("nft_transfer") < position("nft_purchase"));
        assert!(position("jetton_transfer") < position("stonfi_swap"));
        assert!(position("whales_withdraw_immediately") < position("whales_withdraw_request"));
        assert!(position("contract_call") < position("ton_transfer"));
    }

    #[test]
    fn disabled_groups_are_skipped() {
        let config = PatternDetectionConfig {
            detect_dex: false,
            detect_fallbacks: false,
            ..Default::default()
        };
        let names = names(&default_straws(&config));
        assert!(!names.iter().any(|n| n.starts_with("stonfi") || n.starts_with("dedust")));
        assert!(!names.iter().any(|n| n == "ton_transfer"));
    }
}
