/*!
 * Modelo de trabalho do motor: árvore mutável de bolhas
 *
 * Cada bolha começa como uma transação bruta e é reescrita no lugar pelos
 * padrões do catálogo, absorvendo contas, fluxo de valores e filhos dos nós
 * consumidos.
 */

mod importer;
mod value_flow;

pub use value_flow::{AccountValueFlow, NftFlow, ValueFlow};

use crate::actions::Action;
use crate::patterns::{
    BubbleAuctionBid, BubbleContractCall, BubbleDepositStake, BubbleDnsRenew,
    BubbleElectionsDepositStake, BubbleElectionsRecoverStake, BubbleGasRelay, BubbleInvoicePayment,
    BubbleJettonBurn, BubbleJettonSwap, BubbleJettonTransfer, BubbleLiquidityDeposit,
    BubbleNftPurchase, BubbleNftTransfer, BubbleSubscription, BubbleTonTransfer,
    BubbleUnSubscription, BubbleWithdrawStake, BubbleWithdrawStakeRequest,
};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use tonscope_core::{abi::ops, AccountId, AdditionalInfo, DecodedBody, Error, Interface, Result, TransactionHash};

/// Conta participante com as interfaces resolvidas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub address: AccountId,
    pub interfaces: Vec<Interface>,
}

impl Account {
    pub fn is(&self, interface: Interface) -> bool {
        self.interfaces.contains(&interface)
    }
}

/// Contrato implantado dentro da subárvore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractDeployment {
    pub address: AccountId,
    pub interfaces: Vec<Interface>,
    pub success: bool,
}

/// Transação bruta, ainda não explicada por nenhum padrão
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleTx {
    pub hash: TransactionHash,
    pub success: bool,
    pub account: Account,
    pub input_amount: i64,
    pub input_from: Option<AccountId>,
    pub bounce: bool,
    pub bounced: bool,
    pub external: bool,
    pub op_code: Option<u32>,
    pub decoded_body: Option<DecodedBody>,
    pub init: bool,
    /// Estado da conta já era ativo antes da transação
    pub account_was_active: bool,
    pub fee: i64,
    pub additional_info: Option<AdditionalInfo>,
}

impl BubbleTx {
    pub fn operation(&self, name: &str) -> bool {
        self.decoded_body.as_ref().map_or(false, |b| b.is(name))
    }

    /// Decodifica o corpo de entrada, exigindo a operação informada
    pub fn decode_body<T: DeserializeOwned>(&self, operation: &str) -> Result<T> {
        match &self.decoded_body {
            Some(body) if body.is(operation) => body.decode(),
            Some(body) => Err(Error::DecodeError(format!(
                "Esperado corpo {}, encontrado {}",
                operation, body.operation
            ))),
            None => Err(Error::DecodeError(format!(
                "Transação {:x} sem corpo decodificado",
                self.hash
            ))),
        }
    }

    pub fn jetton_master(&self) -> Option<AccountId> {
        self.additional_info.as_ref().and_then(|i| i.jetton_master)
    }

    /// Comentário de texto anexado à mensagem de entrada
    pub fn comment(&self) -> Option<String> {
        self.decoded_body.as_ref().and_then(|b| b.comment())
    }

    /// Chamada a contrato não reconhecida: opcode não nulo em conta já
    /// ativa que não é uma carteira
    pub fn is_contract_call(&self) -> bool {
        let op_code = match self.op_code {
            Some(op) => op,
            None => return false,
        };
        op_code != 0
            && !self.operation(ops::ENCRYPTED_TEXT_COMMENT)
            && self.account_was_active
            && !self.account.is(Interface::Wallet)
    }

    /// Ação de reserva para transações não reconhecidas
    pub fn to_action(&self) -> Option<Action> {
        if self.external {
            return None;
        }
        if self.is_contract_call() {
            return Some(BubbleContractCall::from_tx(self).to_action());
        }
        Some(BubbleTonTransfer::from_tx(self).to_action())
    }
}

/// Conteúdo de uma bolha: transação bruta ou saída de um padrão
#[derive(Debug, Clone, PartialEq)]
pub enum BubbleInfo {
    Tx(BubbleTx),
    TonTransfer(BubbleTonTransfer),
    ContractCall(BubbleContractCall),
    JettonTransfer(BubbleJettonTransfer),
    JettonBurn(BubbleJettonBurn),
    NftTransfer(BubbleNftTransfer),
    NftPurchase(BubbleNftPurchase),
    JettonSwap(BubbleJettonSwap),
    LiquidityDeposit(BubbleLiquidityDeposit),
    DepositStake(BubbleDepositStake),
    WithdrawStake(BubbleWithdrawStake),
    WithdrawStakeRequest(BubbleWithdrawStakeRequest),
    ElectionsDepositStake(BubbleElectionsDepositStake),
    ElectionsRecoverStake(BubbleElectionsRecoverStake),
    Subscription(BubbleSubscription),
    UnSubscription(BubbleUnSubscription),
    AuctionBid(BubbleAuctionBid),
    DnsRenew(BubbleDnsRenew),
    GasRelay(BubbleGasRelay),
    InvoicePayment(BubbleInvoicePayment),
}

impl Default for BubbleInfo {
    fn default() -> Self {
        BubbleInfo::Tx(BubbleTx::default())
    }
}

macro_rules! impl_into_info {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for BubbleInfo {
                fn from(value: $ty) -> Self {
                    BubbleInfo::$variant(value)
                }
            }
        )*
    };
}

impl_into_info! {
    Tx => BubbleTx,
    TonTransfer => BubbleTonTransfer,
    ContractCall => BubbleContractCall,
    JettonTransfer => BubbleJettonTransfer,
    JettonBurn => BubbleJettonBurn,
    NftTransfer => BubbleNftTransfer,
    NftPurchase => BubbleNftPurchase,
    JettonSwap => BubbleJettonSwap,
    LiquidityDeposit => BubbleLiquidityDeposit,
    DepositStake => BubbleDepositStake,
    WithdrawStake => BubbleWithdrawStake,
    WithdrawStakeRequest => BubbleWithdrawStakeRequest,
    ElectionsDepositStake => BubbleElectionsDepositStake,
    ElectionsRecoverStake => BubbleElectionsRecoverStake,
    Subscription => BubbleSubscription,
    UnSubscription => BubbleUnSubscription,
    AuctionBid => BubbleAuctionBid,
    DnsRenew => BubbleDnsRenew,
    GasRelay => BubbleGasRelay,
    InvoicePayment => BubbleInvoicePayment,
}

impl BubbleInfo {
    /// Converte o conteúdo na ação exposta ao usuário, se houver
    pub fn to_action(&self) -> Option<Action> {
        match self {
            BubbleInfo::Tx(tx) => tx.to_action(),
            BubbleInfo::TonTransfer(b) => Some(b.to_action()),
            BubbleInfo::ContractCall(b) => Some(b.to_action()),
            BubbleInfo::JettonTransfer(b) => Some(b.to_action()),
            BubbleInfo::JettonBurn(b) => Some(b.to_action()),
            BubbleInfo::NftTransfer(b) => Some(b.to_action()),
            BubbleInfo::NftPurchase(b) => Some(b.to_action()),
            BubbleInfo::JettonSwap(b) => Some(b.to_action()),
            BubbleInfo::LiquidityDeposit(b) => Some(b.to_action()),
            BubbleInfo::DepositStake(b) => Some(b.to_action()),
            BubbleInfo::WithdrawStake(b) => Some(b.to_action()),
            BubbleInfo::WithdrawStakeRequest(b) => Some(b.to_action()),
            BubbleInfo::ElectionsDepositStake(b) => Some(b.to_action()),
            BubbleInfo::ElectionsRecoverStake(b) => Some(b.to_action()),
            BubbleInfo::Subscription(b) => Some(b.to_action()),
            BubbleInfo::UnSubscription(b) => Some(b.to_action()),
            BubbleInfo::AuctionBid(b) => Some(b.to_action()),
            BubbleInfo::DnsRenew(b) => Some(b.to_action()),
            BubbleInfo::GasRelay(b) => Some(b.to_action()),
            BubbleInfo::InvoicePayment(b) => Some(b.to_action()),
        }
    }

    /// Nome curto da variante, usado em logs
    pub fn kind(&self) -> &'static str {
        match self {
            BubbleInfo::Tx(_) => "Tx",
            BubbleInfo::TonTransfer(_) => "TonTransfer",
            BubbleInfo::ContractCall(_) => "ContractCall",
            BubbleInfo::JettonTransfer(_) => "JettonTransfer",
            BubbleInfo::JettonBurn(_) => "JettonBurn",
            BubbleInfo::NftTransfer(_) => "NftTransfer",
            BubbleInfo::NftPurchase(_) => "NftPurchase",
            BubbleInfo::JettonSwap(_) => "JettonSwap",
            BubbleInfo::LiquidityDeposit(_) => "LiquidityDeposit",
            BubbleInfo::DepositStake(_) => "DepositStake",
            BubbleInfo::WithdrawStake(_) => "WithdrawStake",
            BubbleInfo::WithdrawStakeRequest(_) => "WithdrawStakeRequest",
            BubbleInfo::ElectionsDepositStake(_) => "ElectionsDepositStake",
            BubbleInfo::ElectionsRecoverStake(_) => "ElectionsRecoverStake",
            BubbleInfo::Subscription(_) => "Subscription",
            BubbleInfo::UnSubscription(_) => "UnSubscription",
            BubbleInfo::AuctionBid(_) => "AuctionBid",
            BubbleInfo::DnsRenew(_) => "DnsRenew",
            BubbleInfo::GasRelay(_) => "GasRelay",
            BubbleInfo::InvoicePayment(_) => "InvoicePayment",
        }
    }
}

/// Nó de trabalho do motor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bubble {
    pub info: BubbleInfo,
    pub accounts: BTreeSet<AccountId>,
    pub children: Vec<Bubble>,
    pub value_flow: ValueFlow,
    pub contract_deployments: BTreeMap<AccountId, ContractDeployment>,
    /// Hashes de todas as transações absorvidas por esta bolha
    pub transactions: Vec<TransactionHash>,
}

impl Bubble {
    pub fn tx(&self) -> Option<&BubbleTx> {
        match &self.info {
            BubbleInfo::Tx(tx) => Some(tx),
            _ => None,
        }
    }

    /// Transação bruta; erro quando a bolha já foi reescrita
    pub fn require_tx(&self) -> Result<&BubbleTx> {
        self.tx().ok_or_else(|| self.unexpected("Tx"))
    }

    pub fn require_jetton_transfer(&self) -> Result<&BubbleJettonTransfer> {
        match &self.info {
            BubbleInfo::JettonTransfer(t) => Ok(t),
            _ => Err(self.unexpected("JettonTransfer")),
        }
    }

    pub fn require_nft_transfer(&self) -> Result<&BubbleNftTransfer> {
        match &self.info {
            BubbleInfo::NftTransfer(t) => Ok(t),
            _ => Err(self.unexpected("NftTransfer")),
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        Error::ValidationError(format!(
            "Esperada bolha {}, encontrada {}",
            expected,
            self.info.kind()
        ))
    }

    /// Descendente identificado pelo caminho de índices a partir deste nó
    pub fn descendant(&self, path: &[usize]) -> Option<&Bubble> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.children.get(*first)?.descendant(rest),
        }
    }

    /// Percorre a árvore em pré-ordem
    pub fn traverse_preorder<F>(&self, mut f: F)
    where
        F: FnMut(&Bubble),
    {
        self.traverse_preorder_node(&mut f);
    }

    fn traverse_preorder_node<F>(&self, f: &mut F)
    where
        F: FnMut(&Bubble),
    {
        f(self);
        for child in &self.children {
            child.traverse_preorder_node(f);
        }
    }

    /// Conta o número total de bolhas na árvore
    pub fn total_bubbles(&self) -> usize {
        let mut count = 0;
        self.traverse_preorder(|_| count += 1);
        count
    }

    /// Profundidade máxima a partir deste nó
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionKind;

    fn leaf(n: u64) -> Bubble {
        let mut bubble = Bubble::default();
        bubble.accounts.insert(AccountId::from_low_u64(n));
        bubble
    }

    #[test]
    fn descendant_and_traversal() {
        let mut root = leaf(1);
        let mut middle = leaf(2);
        middle.children.push(leaf(3));
        root.children.push(middle);
        root.children.push(leaf(4));

        assert_eq!(root.total_bubbles(), 4);
        assert_eq!(root.max_depth(), 2);
        let found = root.descendant(&[0, 0]).unwrap();
        assert!(found.accounts.contains(&AccountId::from_low_u64(3)));
        assert!(root.descendant(&[1, 0]).is_none());

        let mut order = Vec::new();
        root.traverse_preorder(|b| order.push(*b.accounts.iter().next().unwrap()));
        let expected: Vec<AccountId> = [1, 2, 3, 4].iter().map(|n| AccountId::from_low_u64(*n)).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn require_helpers_report_kind() {
        let bubble = Bubble::default();
        assert!(bubble.require_tx().is_ok());
        let err = bubble.require_jetton_transfer().unwrap_err();
        assert!(err.to_string().contains("Tx"));
    }

    #[test]
    fn contract_call_criteria() {
        let mut tx = BubbleTx {
            op_code: Some(0xdeadbeef),
            account_was_active: true,
            ..Default::default()
        };
        assert!(tx.is_contract_call());
        tx.account.interfaces.push(Interface::Wallet);
        assert!(!tx.is_contract_call());
        tx.account.interfaces.clear();
        tx.account_was_active = false;
        assert!(!tx.is_contract_call());
        tx.account_was_active = true;
        tx.op_code = Some(0);
        assert!(!tx.is_contract_call());
    }

    #[test]
    fn external_tx_has_no_action() {
        let tx = BubbleTx {
            external: true,
            ..Default::default()
        };
        assert!(tx.to_action().is_none());
        let info = BubbleInfo::Tx(BubbleTx::default());
        let action = info.to_action().unwrap();
        assert!(matches!(action.kind, ActionKind::TonTransfer(_)));
    }
}
