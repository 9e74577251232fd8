/*!
 * Tonscope ABI
 *
 * Nomes de operação e payloads tipados produzidos pelo decodificador ABI
 * externo. O motor de ações nunca decodifica células binárias: apenas
 * converte o JSON já decodificado nestas estruturas.
 */

use crate::types::{AccountId, DecodedBody};
use crate::utils::amount;
use serde::Deserialize;

/// Nomes de operação, como entregues pelo decodificador
pub mod ops {
    pub const TEXT_COMMENT: &str = "TextComment";
    pub const ENCRYPTED_TEXT_COMMENT: &str = "EncryptedTextComment";
    pub const EXCESS: &str = "Excess";

    pub const JETTON_TRANSFER: &str = "JettonTransfer";
    pub const JETTON_INTERNAL_TRANSFER: &str = "JettonInternalTransfer";
    pub const JETTON_NOTIFY: &str = "JettonNotify";
    pub const JETTON_BURN: &str = "JettonBurn";
    pub const JETTON_BURN_NOTIFICATION: &str = "JettonBurnNotification";
    pub const JETTON_MINT: &str = "JettonMint";

    pub const NFT_TRANSFER: &str = "NftTransfer";
    pub const NFT_OWNERSHIP_ASSIGNED: &str = "NftOwnershipAssigned";
    pub const TELEITEM_OUTBID_NOTIFICATION: &str = "TeleitemOutbidNotification";
    pub const CHANGE_DNS_RECORD: &str = "ChangeDnsRecord";

    pub const STONFI_SWAP: &str = "StonfiSwap";
    pub const STONFI_PAYMENT_REQUEST: &str = "StonfiPaymentRequest";
    pub const STONFI_PROVIDE_LP: &str = "StonfiProvideLp";
    pub const STONFI_PROVIDE_LIQUIDITY: &str = "StonfiProvideLiquidity";
    pub const STONFI_ADD_LIQUIDITY: &str = "StonfiAddLiquidity";
    pub const DEDUST_SWAP: &str = "DedustSwap";
    pub const DEDUST_SWAP_EXTERNAL: &str = "DedustSwapExternal";
    pub const DEDUST_PAYOUT_FROM_POOL: &str = "DedustPayoutFromPool";
    pub const DEDUST_PAYOUT: &str = "DedustPayout";

    pub const TONSTAKERS_POOL_DEPOSIT: &str = "TonstakersPoolDeposit";
    pub const WHALES_NOMINATORS_DEPOSIT: &str = "WhalesNominatorsDeposit";
    pub const WHALES_NOMINATORS_WITHDRAW: &str = "WhalesNominatorsWithdraw";
    pub const WHALES_NOMINATORS_WITHDRAW_RESPONSE: &str = "WhalesNominatorsWithdrawUnownedResponse";
    pub const ELECTOR_NEW_STAKE: &str = "ElectorNewStake";
    pub const ELECTOR_NEW_STAKE_CONFIRMATION: &str = "ElectorNewStakeConfirmation";
    pub const ELECTOR_RECOVER_STAKE_REQUEST: &str = "ElectorRecoverStakeRequest";
    pub const ELECTOR_RECOVER_STAKE_RESPONSE: &str = "ElectorRecoverStakeResponse";

    pub const PAYMENT_REQUEST: &str = "PaymentRequest";
    pub const PAYMENT_REQUEST_RESPONSE: &str = "PaymentRequestResponse";
    pub const SUBSCRIPTION_PAYMENT: &str = "SubscriptionPayment";
    pub const WALLET_PLUGIN_DESTRUCT: &str = "WalletPluginDestruct";
    pub const WALLET_PLUGIN_DESTRUCT_RESPONSE: &str = "WalletPluginDestructResponse";

    pub const WALLET_SIGNED_INTERNAL_V5R1: &str = "WalletSignedInternalV5R1";
    pub const INVOICE_PAYLOAD: &str = "InvoicePayload";
}

/// Código de saída do STON.fi para swaps concluídos
pub const STONFI_SWAP_OK: u32 = 0xc643_70e5;

#[derive(Debug, Clone, Deserialize)]
pub struct JettonTransferMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(with = "amount")]
    pub amount: u128,
    pub destination: AccountId,
    #[serde(default)]
    pub response_destination: Option<AccountId>,
    #[serde(default)]
    pub forward_ton_amount: i64,
    #[serde(default)]
    pub forward_payload: Option<DecodedBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JettonInternalTransferMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(with = "amount")]
    pub amount: u128,
    #[serde(default)]
    pub from: Option<AccountId>,
    #[serde(default)]
    pub response_address: Option<AccountId>,
    #[serde(default)]
    pub forward_ton_amount: i64,
    #[serde(default)]
    pub forward_payload: Option<DecodedBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JettonNotifyMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(with = "amount")]
    pub amount: u128,
    pub sender: AccountId,
    #[serde(default)]
    pub forward_payload: Option<DecodedBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JettonBurnMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(with = "amount")]
    pub amount: u128,
    #[serde(default)]
    pub response_destination: Option<AccountId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JettonMintMsgBody {
    #[serde(default)]
    pub query_id: u64,
    pub to_address: AccountId,
    #[serde(with = "amount")]
    pub amount: u128,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftTransferMsgBody {
    #[serde(default)]
    pub query_id: u64,
    pub new_owner: AccountId,
    #[serde(default)]
    pub response_destination: Option<AccountId>,
    #[serde(default)]
    pub forward_amount: i64,
    #[serde(default)]
    pub forward_payload: Option<DecodedBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NftOwnershipAssignedMsgBody {
    #[serde(default)]
    pub query_id: u64,
    pub prev_owner: AccountId,
    #[serde(default)]
    pub forward_payload: Option<DecodedBody>,
}

/// Payload encaminhado em uma transferência de jetton para o router STON.fi
#[derive(Debug, Clone, Deserialize)]
pub struct StonfiSwapJettonPayload {
    pub token_wallet: AccountId,
    #[serde(with = "amount")]
    pub min_out: u128,
    pub to_address: AccountId,
    #[serde(default)]
    pub referral_address: Option<AccountId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StonfiPaymentRequestMsgBody {
    #[serde(default)]
    pub query_id: u64,
    pub owner: AccountId,
    pub exit_code: u32,
    #[serde(with = "amount")]
    pub amount0_out: u128,
    pub token0_address: AccountId,
    #[serde(with = "amount")]
    pub amount1_out: u128,
    pub token1_address: AccountId,
}

/// Corpo `DedustSwap`, usado tanto na mensagem ao vault nativo quanto
/// como payload encaminhado por uma transferência de jetton
#[derive(Debug, Clone, Deserialize)]
pub struct DedustSwapMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(default, with = "amount")]
    pub amount: u128,
    pub pool: AccountId,
    #[serde(default, with = "amount")]
    pub limit: u128,
    #[serde(default)]
    pub recipient: Option<AccountId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DedustSwapExternalMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(with = "amount")]
    pub amount: u128,
    pub sender: AccountId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DedustPayoutFromPoolMsgBody {
    #[serde(default)]
    pub query_id: u64,
    #[serde(with = "amount")]
    pub amount: u128,
    pub recipient: AccountId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhalesNominatorsWithdrawMsgBody {
    #[serde(default)]
    pub query_id: u64,
    /// Zero significa retirar todo o stake
    #[serde(default)]
    pub stake: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeDnsRecordMsgBody {
    #[serde(default)]
    pub query_id: u64,
    /// Chave do registro em hexadecimal
    pub key: String,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

impl ChangeDnsRecordMsgBody {
    /// Chave zerada sem valor: renovação do domínio
    pub fn is_renew(&self) -> bool {
        self.value.is_none() && self.key.trim_start_matches("0x").chars().all(|c| c == '0')
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoicePayloadBody {
    pub id: String,
}
