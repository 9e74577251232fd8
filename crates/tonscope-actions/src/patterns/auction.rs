//! Lances em leilões do Fragment (teleitems)

use crate::actions::{Action, AuctionBidAction};
use crate::bubble::Bubble;
use crate::straw::{checks, Straw};
use tonscope_core::abi::ops;
use tonscope_core::{AccountId, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleAuctionBid {
    pub bidder: AccountId,
    pub nft: AccountId,
    pub amount: i64,
    pub outbid: Option<AccountId>,
    pub success: bool,
}

impl BubbleAuctionBid {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            AuctionBidAction {
                bidder: self.bidder,
                nft: self.nft,
                amount: self.amount,
                outbid: self.outbid,
            },
        )
    }
}

/// Lance é uma transferência simples (sem corpo ou com comentário)
fn is_plain_transfer(bubble: &Bubble) -> bool {
    bubble.tx().map_or(false, |tx| tx.op_code.map_or(true, |op| op == 0))
}

pub fn fragment_bid_straw() -> Straw<BubbleAuctionBid> {
    Straw::new("fragment_bid")
        .check(checks::has_interface(Interface::Teleitem))
        .check(checks::not_external)
        .check(checks::amount_at_least(1))
        .check(is_plain_transfer)
        .build(|bid: &mut BubbleAuctionBid, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            bid.bidder = tx.input_from.unwrap_or_default();
            bid.nft = tx.account.address;
            bid.amount = tx.input_amount;
            bid.success = tx.success;
            Ok(())
        })
        .single_child(
            Straw::new("fragment_outbid_refund")
                .check(checks::has_operation(ops::TELEITEM_OUTBID_NOTIFICATION))
                .build(|bid: &mut BubbleAuctionBid, bubble: &Bubble| -> Result<()> {
                    bid.outbid = Some(bubble.require_tx()?.account.address);
                    Ok(())
                })
                .optional(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::{BubbleInfo, BubbleTx};
    use tonscope_core::DecodedBody;

    fn acc(n: u64) -> AccountId {
        AccountId::from_low_u64(n)
    }

    #[test]
    fn bid_with_refund_to_previous_bidder() {
        let mut refund_tx = BubbleTx {
            input_from: Some(acc(40)),
            input_amount: 100,
            decoded_body: Some(DecodedBody::new(ops::TELEITEM_OUTBID_NOTIFICATION, serde_json::Value::Null)),
            ..Default::default()
        };
        refund_tx.account.address = acc(9);
        let mut bid_tx = BubbleTx {
            input_from: Some(acc(1)),
            input_amount: 150,
            success: true,
            ..Default::default()
        };
        bid_tx.account.address = acc(40);
        bid_tx.account.interfaces.push(Interface::Teleitem);

        let mut root = Bubble {
            info: BubbleInfo::Tx(bid_tx),
            children: vec![Bubble {
                info: BubbleInfo::Tx(refund_tx),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(fragment_bid_straw().merge_bubble(&mut root));
        match &root.info {
            BubbleInfo::AuctionBid(bid) => {
                assert_eq!(bid.bidder, acc(1));
                assert_eq!(bid.amount, 150);
                assert_eq!(bid.outbid, Some(acc(9)));
            }
            other => panic!("unexpected {:?}", other.kind()),
        }
        assert!(root.children.is_empty());
    }
}
