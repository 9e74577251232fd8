/*!
 * Ações expostas ao usuário
 *
 * Representação estável (tag `type`) das interações reconhecidas em um
 * trace, acompanhada do fluxo de valores agregado.
 */

mod collector;
mod template;

pub use collector::collect_actions_and_value_flow;

use crate::bubble::ValueFlow;
use serde::Serialize;
use tonscope_core::utils::{amount, format_nanoton};
use tonscope_core::{AccountId, Interface};

/// Ação reconhecida com o resultado da execução
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub success: bool,
    #[serde(flatten)]
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ActionKind {
    TonTransfer(TonTransferAction),
    JettonTransfer(JettonTransferAction),
    JettonBurn(JettonBurnAction),
    NftItemTransfer(NftItemTransferAction),
    NftPurchase(NftPurchaseAction),
    JettonSwap(JettonSwapAction),
    LiquidityDeposit(LiquidityDepositAction),
    ContractDeploy(ContractDeployAction),
    SmartContractExec(SmartContractAction),
    Subscribe(SubscribeAction),
    UnSubscribe(UnSubscribeAction),
    DepositStake(DepositStakeAction),
    WithdrawStake(WithdrawStakeAction),
    WithdrawStakeRequest(WithdrawStakeRequestAction),
    ElectionsDepositStake(ElectionsDepositStakeAction),
    ElectionsRecoverStake(ElectionsRecoverStakeAction),
    AuctionBid(AuctionBidAction),
    DnsRenew(DnsRenewAction),
    GasRelay(GasRelayAction),
    InvoicePayment(InvoicePaymentAction),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TonTransferAction {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub amount: i64,
    pub comment: Option<String>,
    pub encrypted_comment: bool,
    /// Mensagem devolvida (bounce) ao remetente original
    pub refund: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JettonTransferAction {
    pub sender: Option<AccountId>,
    pub recipient: Option<AccountId>,
    pub senders_wallet: AccountId,
    pub recipients_wallet: AccountId,
    /// Master do jetton, quando resolvido
    pub jetton: Option<AccountId>,
    #[serde(with = "amount")]
    pub amount: u128,
    pub comment: Option<String>,
    pub encrypted_comment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JettonBurnAction {
    pub sender: AccountId,
    pub senders_wallet: AccountId,
    pub jetton: Option<AccountId>,
    #[serde(with = "amount")]
    pub amount: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NftItemTransferAction {
    pub sender: Option<AccountId>,
    pub recipient: Option<AccountId>,
    pub nft: AccountId,
    pub comment: Option<String>,
    pub encrypted_comment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NftPurchaseAction {
    pub seller: AccountId,
    pub buyer: AccountId,
    pub nft: AccountId,
    pub sale_contract: AccountId,
    pub marketplace: Option<AccountId>,
    pub price: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Dex {
    #[default]
    Stonfi,
    Dedust,
}

/// Lado de um swap: TON nativo (`jetton` ausente) ou jetton
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwapAsset {
    pub jetton: Option<AccountId>,
    #[serde(with = "amount")]
    pub amount: u128,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JettonSwapAction {
    pub dex: Dex,
    pub user: AccountId,
    pub router: AccountId,
    pub asset_in: SwapAsset,
    pub asset_out: SwapAsset,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiquidityDepositAction {
    pub dex: Dex,
    pub from: AccountId,
    pub pool: AccountId,
    pub tokens: Vec<SwapAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractDeployAction {
    pub address: AccountId,
    pub interfaces: Vec<Interface>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmartContractAction {
    pub executor: Option<AccountId>,
    pub contract: AccountId,
    pub ton_attached: i64,
    pub operation: String,
    pub payload: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscribeAction {
    pub subscriber: AccountId,
    pub subscription: AccountId,
    pub beneficiary: AccountId,
    pub amount: i64,
    /// Primeira cobrança, feita junto com a implantação do plugin
    pub initial: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnSubscribeAction {
    pub subscriber: AccountId,
    pub subscription: AccountId,
    pub beneficiary: Option<AccountId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StakingImplementation {
    #[default]
    Whales,
    TF,
    LiquidTF,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepositStakeAction {
    pub staker: AccountId,
    pub pool: AccountId,
    pub amount: i64,
    pub implementation: StakingImplementation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WithdrawStakeAction {
    pub staker: AccountId,
    pub pool: AccountId,
    pub amount: i64,
    pub implementation: StakingImplementation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WithdrawStakeRequestAction {
    pub staker: AccountId,
    pub pool: AccountId,
    /// Ausente quando o pedido é de todo o stake
    pub amount: Option<i64>,
    pub implementation: StakingImplementation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElectionsDepositStakeAction {
    pub staker: AccountId,
    pub elector: AccountId,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElectionsRecoverStakeAction {
    pub staker: AccountId,
    pub elector: AccountId,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuctionBidAction {
    pub bidder: AccountId,
    pub nft: AccountId,
    pub amount: i64,
    /// Lance anterior devolvido a este endereço
    pub outbid: Option<AccountId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DnsRenewAction {
    pub renewer: AccountId,
    pub item: AccountId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GasRelayAction {
    pub relayer: AccountId,
    pub target: AccountId,
    pub amount: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InvoicePaymentAction {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub invoice_id: String,
    /// Pagamento em jetton quando presente, senão em TON
    pub jetton: Option<AccountId>,
    #[serde(with = "amount")]
    pub amount: u128,
}

/// Resultado da classificação de um trace
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionsList {
    pub actions: Vec<Action>,
    pub value_flow: ValueFlow,
}

impl ActionsList {
    /// Alguma ação compatível com o modelo informado
    pub fn contains_like(&self, template: &Action) -> bool {
        self.actions.iter().any(|a| a.matches_template(template))
    }
}

impl Action {
    pub fn new(success: bool, kind: impl Into<ActionKind>) -> Self {
        Self {
            success,
            kind: kind.into(),
        }
    }

    /// Tag estável usada na serialização
    pub fn action_type(&self) -> &'static str {
        match &self.kind {
            ActionKind::TonTransfer(_) => "TonTransfer",
            ActionKind::JettonTransfer(_) => "JettonTransfer",
            ActionKind::JettonBurn(_) => "JettonBurn",
            ActionKind::NftItemTransfer(_) => "NftItemTransfer",
            ActionKind::NftPurchase(_) => "NftPurchase",
            ActionKind::JettonSwap(_) => "JettonSwap",
            ActionKind::LiquidityDeposit(_) => "LiquidityDeposit",
            ActionKind::ContractDeploy(_) => "ContractDeploy",
            ActionKind::SmartContractExec(_) => "SmartContractExec",
            ActionKind::Subscribe(_) => "Subscribe",
            ActionKind::UnSubscribe(_) => "UnSubscribe",
            ActionKind::DepositStake(_) => "DepositStake",
            ActionKind::WithdrawStake(_) => "WithdrawStake",
            ActionKind::WithdrawStakeRequest(_) => "WithdrawStakeRequest",
            ActionKind::ElectionsDepositStake(_) => "ElectionsDepositStake",
            ActionKind::ElectionsRecoverStake(_) => "ElectionsRecoverStake",
            ActionKind::AuctionBid(_) => "AuctionBid",
            ActionKind::DnsRenew(_) => "DnsRenew",
            ActionKind::GasRelay(_) => "GasRelay",
            ActionKind::InvoicePayment(_) => "InvoicePayment",
        }
    }

    /// Contas diretamente envolvidas na ação
    pub fn subjects(&self) -> Vec<AccountId> {
        let mut subjects = match &self.kind {
            ActionKind::TonTransfer(a) => vec![a.sender, a.recipient],
            ActionKind::JettonTransfer(a) => {
                let mut v: Vec<AccountId> = a.sender.into_iter().chain(a.recipient).collect();
                v.push(a.senders_wallet);
                v.push(a.recipients_wallet);
                v
            }
            ActionKind::JettonBurn(a) => vec![a.sender, a.senders_wallet],
            ActionKind::NftItemTransfer(a) => {
                let mut v: Vec<AccountId> = a.sender.into_iter().chain(a.recipient).collect();
                v.push(a.nft);
                v
            }
            ActionKind::NftPurchase(a) => vec![a.seller, a.buyer, a.nft],
            ActionKind::JettonSwap(a) => vec![a.user, a.router],
            ActionKind::LiquidityDeposit(a) => vec![a.from, a.pool],
            ActionKind::ContractDeploy(a) => vec![a.address],
            ActionKind::SmartContractExec(a) => {
                let mut v: Vec<AccountId> = a.executor.into_iter().collect();
                v.push(a.contract);
                v
            }
            ActionKind::Subscribe(a) => vec![a.subscriber, a.subscription, a.beneficiary],
            ActionKind::UnSubscribe(a) => {
                let mut v = vec![a.subscriber, a.subscription];
                v.extend(a.beneficiary);
                v
            }
            ActionKind::DepositStake(a) => vec![a.staker, a.pool],
            ActionKind::WithdrawStake(a) => vec![a.staker, a.pool],
            ActionKind::WithdrawStakeRequest(a) => vec![a.staker, a.pool],
            ActionKind::ElectionsDepositStake(a) => vec![a.staker, a.elector],
            ActionKind::ElectionsRecoverStake(a) => vec![a.staker, a.elector],
            ActionKind::AuctionBid(a) => {
                let mut v = vec![a.bidder, a.nft];
                v.extend(a.outbid);
                v
            }
            ActionKind::DnsRenew(a) => vec![a.renewer, a.item],
            ActionKind::GasRelay(a) => vec![a.relayer, a.target],
            ActionKind::InvoicePayment(a) => vec![a.sender, a.recipient],
        };
        subjects.sort();
        subjects.dedup();
        subjects
    }

    pub fn is_subject(&self, account: &AccountId) -> bool {
        self.subjects().contains(account)
    }

    /// Resumo legível em uma linha
    pub fn preview(&self) -> String {
        let body = match &self.kind {
            ActionKind::TonTransfer(a) => format!(
                "Transferência de {} TON de {} para {}",
                format_nanoton(a.amount),
                a.sender,
                a.recipient
            ),
            ActionKind::JettonTransfer(a) => format!(
                "Transferência de {} jettons {} de {} para {}",
                a.amount,
                optional(&a.jetton),
                optional(&a.sender),
                optional(&a.recipient)
            ),
            ActionKind::JettonBurn(a) => {
                format!("Queima de {} jettons {} por {}", a.amount, optional(&a.jetton), a.sender)
            }
            ActionKind::NftItemTransfer(a) => format!(
                "Transferência do NFT {} de {} para {}",
                a.nft,
                optional(&a.sender),
                optional(&a.recipient)
            ),
            ActionKind::NftPurchase(a) => format!(
                "Compra do NFT {} por {} TON ({} -> {})",
                a.nft,
                format_nanoton(a.price),
                a.seller,
                a.buyer
            ),
            ActionKind::JettonSwap(a) => format!(
                "Swap {:?}: {} {} por {} {}",
                a.dex,
                a.asset_in.amount,
                asset_name(&a.asset_in),
                a.asset_out.amount,
                asset_name(&a.asset_out)
            ),
            ActionKind::LiquidityDeposit(a) => {
                format!("Depósito de liquidez {:?} no pool {} por {}", a.dex, a.pool, a.from)
            }
            ActionKind::ContractDeploy(a) => format!("Implantação do contrato {}", a.address),
            ActionKind::SmartContractExec(a) => format!(
                "Execução de {} em {} com {} TON",
                a.operation,
                a.contract,
                format_nanoton(a.ton_attached)
            ),
            ActionKind::Subscribe(a) => format!(
                "Assinatura {} de {} para {}: {} TON",
                a.subscription,
                a.subscriber,
                a.beneficiary,
                format_nanoton(a.amount)
            ),
            ActionKind::UnSubscribe(a) => {
                format!("Cancelamento da assinatura {} por {}", a.subscription, a.subscriber)
            }
            ActionKind::DepositStake(a) => format!(
                "Depósito de {} TON em stake {:?} no pool {}",
                format_nanoton(a.amount),
                a.implementation,
                a.pool
            ),
            ActionKind::WithdrawStake(a) => format!(
                "Retirada de {} TON do pool {:?} {}",
                format_nanoton(a.amount),
                a.implementation,
                a.pool
            ),
            ActionKind::WithdrawStakeRequest(a) => format!(
                "Pedido de retirada de {} do pool {:?} {}",
                a.amount.map_or_else(|| "todo o stake".to_string(), |v| format!("{} TON", format_nanoton(v))),
                a.implementation,
                a.pool
            ),
            ActionKind::ElectionsDepositStake(a) => format!(
                "Depósito de {} TON nas eleições por {}",
                format_nanoton(a.amount),
                a.staker
            ),
            ActionKind::ElectionsRecoverStake(a) => format!(
                "Recuperação de {} TON das eleições por {}",
                format_nanoton(a.amount),
                a.staker
            ),
            ActionKind::AuctionBid(a) => format!(
                "Lance de {} TON no item {} por {}",
                format_nanoton(a.amount),
                a.nft,
                a.bidder
            ),
            ActionKind::DnsRenew(a) => format!("Renovação do domínio {} por {}", a.item, a.renewer),
            ActionKind::GasRelay(a) => format!(
                "Relay de gás por {} para {} ({} TON)",
                a.relayer,
                a.target,
                format_nanoton(a.amount)
            ),
            ActionKind::InvoicePayment(a) => format!(
                "Pagamento da fatura {} de {} para {}: {} {}",
                a.invoice_id,
                a.sender,
                a.recipient,
                a.amount,
                optional(&a.jetton)
            ),
        };
        if self.success {
            body
        } else {
            format!("{} [falhou]", body)
        }
    }
}

fn optional(account: &Option<AccountId>) -> String {
    account.map_or_else(|| "?".to_string(), |a| a.to_string())
}

fn asset_name(asset: &SwapAsset) -> String {
    asset.jetton.map_or_else(|| "TON".to_string(), |j| j.to_string())
}

macro_rules! impl_into_kind {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ActionKind {
                fn from(value: $ty) -> Self {
                    ActionKind::$variant(value)
                }
            }
        )*
    };
}

impl_into_kind! {
    TonTransfer => TonTransferAction,
    JettonTransfer => JettonTransferAction,
    JettonBurn => JettonBurnAction,
    NftItemTransfer => NftItemTransferAction,
    NftPurchase => NftPurchaseAction,
    JettonSwap => JettonSwapAction,
    LiquidityDeposit => LiquidityDepositAction,
    ContractDeploy => ContractDeployAction,
    SmartContractExec => SmartContractAction,
    Subscribe => SubscribeAction,
    UnSubscribe => UnSubscribeAction,
    DepositStake => DepositStakeAction,
    WithdrawStake => WithdrawStakeAction,
    WithdrawStakeRequest => WithdrawStakeRequestAction,
    ElectionsDepositStake => ElectionsDepositStakeAction,
    ElectionsRecoverStake => ElectionsRecoverStakeAction,
    AuctionBid => AuctionBidAction,
    DnsRenew => DnsRenewAction,
    GasRelay => GasRelayAction,
    InvoicePayment => InvoicePaymentAction,
}
