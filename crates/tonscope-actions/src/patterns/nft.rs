//! Transferência e compra de NFTs (TEP-62)

use super::excess;
use crate::actions::{Action, NftItemTransferAction, NftPurchaseAction};
use crate::bubble::{Bubble, BubbleInfo, ValueFlow};
use crate::straw::{checks, Straw};
use tonscope_core::abi::{ops, NftOwnershipAssignedMsgBody, NftTransferMsgBody};
use tonscope_core::{AccountId, DecodedBody, Error, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleNftTransfer {
    pub sender: Option<AccountId>,
    pub recipient: Option<AccountId>,
    /// Endereço do item
    pub account: AccountId,
    pub payload: Option<DecodedBody>,
    pub success: bool,
}

impl BubbleNftTransfer {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            NftItemTransferAction {
                sender: self.sender,
                recipient: self.recipient,
                nft: self.account,
                comment: self.payload.as_ref().and_then(|p| p.comment()),
                encrypted_comment: self.payload.as_ref().map_or(false, |p| p.is_encrypted_comment()),
            },
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleNftPurchase {
    pub seller: AccountId,
    pub buyer: AccountId,
    pub nft: AccountId,
    pub sale_contract: AccountId,
    pub marketplace: Option<AccountId>,
    pub price: i64,
    pub success: bool,
}

impl BubbleNftPurchase {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            NftPurchaseAction {
                seller: self.seller,
                buyer: self.buyer,
                nft: self.nft,
                sale_contract: self.sale_contract,
                marketplace: self.marketplace,
                price: self.price,
            },
        )
    }
}

/// Itens do Fragment e domínios `.ton` também são itens NFT
fn is_nft_item(bubble: &Bubble) -> bool {
    [Interface::NftItem, Interface::Teleitem, Interface::DnsItem]
        .into_iter()
        .any(|interface| checks::has_interface(interface)(bubble))
}

pub fn nft_transfer_straw() -> Straw<BubbleNftTransfer> {
    Straw::new("nft_transfer")
        .check(is_nft_item)
        .check(checks::has_operation(ops::NFT_TRANSFER))
        .build(|transfer: &mut BubbleNftTransfer, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            let body: NftTransferMsgBody = tx.decode_body(ops::NFT_TRANSFER)?;
            transfer.sender = tx.input_from;
            transfer.account = tx.account.address;
            transfer.success = tx.success;
            if transfer.recipient.is_none() {
                transfer.recipient = Some(body.new_owner);
            }
            if transfer.payload.is_none() {
                transfer.payload = body.forward_payload;
            }
            Ok(())
        })
        .single_child(
            Straw::new("nft_ownership_assigned")
                .check(checks::has_operation(ops::NFT_OWNERSHIP_ASSIGNED))
                .build(|transfer: &mut BubbleNftTransfer, bubble: &Bubble| -> Result<()> {
                    let tx = bubble.require_tx()?;
                    let body: NftOwnershipAssignedMsgBody =
                        tx.decode_body(ops::NFT_OWNERSHIP_ASSIGNED)?;
                    transfer.recipient = Some(tx.account.address);
                    transfer.payload = body.forward_payload;
                    Ok(())
                })
                .optional(),
        )
        .child(excess())
        .update_value_flow(|transfer: &BubbleNftTransfer, flow: &mut ValueFlow| {
            if !transfer.success {
                return;
            }
            if let Some(sender) = transfer.sender {
                flow.remove_nft(sender);
            }
            if let Some(recipient) = transfer.recipient {
                flow.add_nft(recipient);
            }
        })
}

/// Contrato de venda recebe o pagamento e repassa o item ao comprador
pub fn nft_purchase_straw() -> Straw<BubbleNftPurchase> {
    Straw::new("nft_purchase")
        .check(checks::has_interface(Interface::NftSale))
        .check(checks::not_external)
        .build(|purchase: &mut BubbleNftPurchase, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            let sale = tx
                .additional_info
                .as_ref()
                .and_then(|info| info.nft_sale.as_ref())
                .ok_or_else(|| {
                    Error::ValidationError(format!(
                        "Contrato de venda {} sem dados de venda",
                        tx.account.address
                    ))
                })?;
            let sold_by_contract = bubble.children.iter().any(|child| match &child.info {
                BubbleInfo::NftTransfer(t) => t.sender == Some(tx.account.address),
                _ => false,
            });
            if !sold_by_contract {
                return Err(Error::ValidationError(format!(
                    "Item não transferido pelo contrato de venda {}",
                    tx.account.address
                )));
            }
            purchase.sale_contract = tx.account.address;
            purchase.seller = sale.owner.unwrap_or_default();
            purchase.marketplace = Some(sale.marketplace);
            purchase.price = sale.price;
            if purchase.buyer.is_zero() {
                purchase.buyer = tx.input_from.unwrap_or_default();
            }
            Ok(())
        })
        .single_child(
            Straw::new("nft_purchase_transfer")
                .check(checks::is_nft_transfer)
                .build(|purchase: &mut BubbleNftPurchase, bubble: &Bubble| -> Result<()> {
                    let transfer = bubble.require_nft_transfer()?;
                    purchase.nft = transfer.account;
                    purchase.success = transfer.success;
                    if let Some(new_owner) = transfer.recipient {
                        purchase.buyer = new_owner;
                    }
                    Ok(())
                }),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::BubbleTx;
    use serde_json::json;
    use tonscope_core::{AdditionalInfo, NftSaleInfo};

    fn acc(n: u64) -> AccountId {
        AccountId::from_low_u64(n)
    }

    fn tx(account: u64, from: u64, body: Option<DecodedBody>, children: Vec<Bubble>) -> Bubble {
        let mut tx = BubbleTx {
            input_from: Some(acc(from)),
            success: true,
            decoded_body: body,
            ..Default::default()
        };
        tx.account.address = acc(account);
        Bubble {
            info: BubbleInfo::Tx(tx),
            children,
            ..Default::default()
        }
    }

    fn transfer_tree(owner: u64, new_owner: u64) -> Bubble {
        let assigned = tx(
            new_owner,
            50,
            Some(DecodedBody::new(
                ops::NFT_OWNERSHIP_ASSIGNED,
                json!({ "prev_owner": acc(owner).to_string() }),
            )),
            vec![],
        );
        let mut item = tx(
            50,
            owner,
            Some(DecodedBody::new(
                ops::NFT_TRANSFER,
                json!({ "new_owner": acc(new_owner).to_string() }),
            )),
            vec![assigned],
        );
        if let BubbleInfo::Tx(t) = &mut item.info {
            t.account.interfaces.push(Interface::NftItem);
        }
        item
    }

    #[test]
    fn transfer_moves_item_between_owners() {
        let mut root = transfer_tree(1, 2);
        assert!(nft_transfer_straw().merge_bubble(&mut root));
        let transfer = root.require_nft_transfer().unwrap();
        assert_eq!(transfer.account, acc(50));
        assert_eq!(transfer.recipient, Some(acc(2)));
        assert_eq!(root.value_flow.get(&acc(1)).unwrap().nfts.removed, 1);
        assert_eq!(root.value_flow.get(&acc(2)).unwrap().nfts.added, 1);
    }

    #[test]
    fn transfer_requires_nft_item() {
        let mut root = transfer_tree(1, 2);
        if let BubbleInfo::Tx(t) = &mut root.info {
            t.account.interfaces = vec![Interface::JettonWallet];
        }
        assert!(!nft_transfer_straw().merge_bubble(&mut root));

        if let BubbleInfo::Tx(t) = &mut root.info {
            t.account.interfaces = vec![Interface::DnsItem];
        }
        assert!(nft_transfer_straw().merge_bubble(&mut root));
    }

    #[test]
    fn purchase_wraps_transfer_from_sale_contract() {
        let mut item = transfer_tree(30, 2);
        assert!(nft_transfer_straw().merge_bubble(&mut item));

        let mut sale = tx(30, 2, None, vec![item]);
        if let BubbleInfo::Tx(t) = &mut sale.info {
            t.input_amount = 5_000_000_000;
            t.account.interfaces.push(Interface::NftSale);
            t.additional_info = Some(AdditionalInfo {
                jetton_master: None,
                nft_sale: Some(NftSaleInfo {
                    nft: acc(50),
                    owner: Some(acc(7)),
                    marketplace: acc(8),
                    price: 5_000_000_000,
                }),
            });
        }

        assert!(nft_purchase_straw().merge_bubble(&mut sale));
        match &sale.info {
            BubbleInfo::NftPurchase(p) => {
                assert_eq!(p.seller, acc(7));
                assert_eq!(p.buyer, acc(2));
                assert_eq!(p.nft, acc(50));
                assert_eq!(p.price, 5_000_000_000);
                assert!(p.success);
            }
            other => panic!("unexpected {:?}", other.kind()),
        }
    }

    #[test]
    fn purchase_rejects_transfer_from_other_sender() {
        let mut item = transfer_tree(31, 2);
        assert!(nft_transfer_straw().merge_bubble(&mut item));
        let mut sale = tx(30, 2, None, vec![item]);
        if let BubbleInfo::Tx(t) = &mut sale.info {
            t.account.interfaces.push(Interface::NftSale);
            t.additional_info = Some(AdditionalInfo {
                jetton_master: None,
                nft_sale: Some(NftSaleInfo {
                    nft: acc(50),
                    owner: None,
                    marketplace: acc(8),
                    price: 1,
                }),
            });
        }
        assert!(!nft_purchase_straw().merge_bubble(&mut sale));
    }
}
