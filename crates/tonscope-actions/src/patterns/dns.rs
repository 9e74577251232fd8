use crate::actions::{Action, DnsRenewAction};
use crate::bubble::Bubble;
use crate::straw::{checks, Straw};
use tonscope_core::abi::{ops, ChangeDnsRecordMsgBody};
use tonscope_core::{AccountId, Interface, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleDnsRenew {
    pub renewer: AccountId,
    pub item: AccountId,
    pub success: bool,
}

impl BubbleDnsRenew {
    pub fn to_action(&self) -> Action {
        Action::new(
            self.success,
            DnsRenewAction {
                renewer: self.renewer,
                item: self.item,
            },
        )
    }
}

fn is_renew(bubble: &Bubble) -> bool {
    bubble
        .tx()
        .and_then(|tx| tx.decode_body::<ChangeDnsRecordMsgBody>(ops::CHANGE_DNS_RECORD).ok())
        .map_or(false, |body| body.is_renew())
}

/// `ChangeDnsRecord` com chave zerada e sem valor
pub fn dns_renew_straw() -> Straw<BubbleDnsRenew> {
    Straw::new("dns_renew")
        .check(checks::has_interface(Interface::DnsItem))
        .check(checks::has_operation(ops::CHANGE_DNS_RECORD))
        .check(is_renew)
        .build(|renew: &mut BubbleDnsRenew, bubble: &Bubble| -> Result<()> {
            let tx = bubble.require_tx()?;
            renew.renewer = tx.input_from.unwrap_or_default();
            renew.item = tx.account.address;
            renew.success = tx.success;
            Ok(())
        })
}
