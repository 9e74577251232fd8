/*!
 * Tonscope Types
 *
 * Tipos de entrada do motor de ações: contas, mensagens, transações e traces
 */

use crate::error::{Error, Result};
use crate::utils;
use ethereum_types::H256;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Alias para hash de transação
pub type TransactionHash = H256;

/// Identificador de conta: workchain + hash de 256 bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId {
    pub workchain: i32,
    pub address: H256,
}

impl AccountId {
    pub fn new(workchain: i32, address: H256) -> Self {
        Self { workchain, address }
    }

    /// Conta na workchain básica com os últimos 8 bytes definidos por `n`
    pub fn from_low_u64(n: u64) -> Self {
        Self::new(0, H256::from_low_u64_be(n))
    }

    /// Conta zerada, usada como curinga em comparações parciais
    pub fn is_zero(&self) -> bool {
        self.workchain == 0 && self.address.is_zero()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:x}", self.workchain, self.address)
    }
}

impl FromStr for AccountId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (workchain, hash) = s
            .split_once(':')
            .ok_or_else(|| Error::DecodeError(format!("Endereço sem workchain: {}", s)))?;
        let workchain = workchain
            .parse::<i32>()
            .map_err(|_| Error::DecodeError(format!("Workchain inválida: {}", s)))?;
        let bytes = hex::decode(hash)
            .map_err(|_| Error::DecodeError(format!("Endereço inválido: {}", s)))?;
        if bytes.len() != 32 {
            return Err(Error::DecodeError(format!("Endereço com tamanho inválido: {}", s)));
        }
        Ok(Self::new(workchain, H256::from_slice(&bytes)))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Capacidade (interface) implementada por uma conta, resolvida externamente
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interface {
    Wallet,
    WalletV4,
    WalletV5,
    JettonWallet,
    JettonMaster,
    NftItem,
    NftCollection,
    NftSale,
    Teleitem,
    DnsItem,
    StonfiPool,
    StonfiRouter,
    StonfiLpAccount,
    DedustVault,
    DedustPool,
    TonstakersPool,
    TfNominator,
    WhalesNominators,
    Elector,
    SubscriptionV1,
}

/// Estado de uma conta antes ou depois da transação
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Nonexist,
    Uninit,
    Active,
    Frozen,
}

/// Corpo de mensagem já decodificado via ABI: operação + payload tipado em JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedBody {
    pub operation: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl DecodedBody {
    pub fn new(operation: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            operation: operation.into(),
            value,
        }
    }

    /// Corpo de comentário de texto simples
    pub fn text_comment(text: impl Into<String>) -> Self {
        Self::new(
            crate::abi::ops::TEXT_COMMENT,
            serde_json::json!({ "text": text.into() }),
        )
    }

    pub fn is(&self, operation: &str) -> bool {
        self.operation == operation
    }

    /// Converte o payload para a estrutura tipada da operação
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.value).map_err(|e| {
            Error::DecodeError(format!("Corpo {} inválido: {}", self.operation, e))
        })
    }

    /// Texto do comentário, quando o corpo é um comentário simples
    pub fn comment(&self) -> Option<String> {
        if !self.is(crate::abi::ops::TEXT_COMMENT) {
            return None;
        }
        self.value
            .get("text")
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
    }

    pub fn is_encrypted_comment(&self) -> bool {
        self.is(crate::abi::ops::ENCRYPTED_TEXT_COMMENT)
    }
}

/// Mensagem (interna ou externa)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Origem; ausente para mensagens externas
    #[serde(default)]
    pub source: Option<AccountId>,
    #[serde(default)]
    pub destination: Option<AccountId>,
    /// Valor em nanotons
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub bounce: bool,
    #[serde(default)]
    pub bounced: bool,
    #[serde(default, rename = "external")]
    pub is_external: bool,
    #[serde(default)]
    pub op_code: Option<u32>,
    #[serde(default)]
    pub decoded_body: Option<DecodedBody>,
    /// Código de inicialização anexado (StateInit)
    #[serde(default, with = "utils::hex_bytes")]
    pub init: Vec<u8>,
}

impl Message {
    pub fn has_init(&self) -> bool {
        !self.init.is_empty()
    }

    pub fn operation(&self) -> Option<&str> {
        self.decoded_body.as_ref().map(|b| b.operation.as_str())
    }
}

/// Taxas cobradas pela transação, em nanotons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fees {
    #[serde(default)]
    pub compute: i64,
    #[serde(default)]
    pub storage: i64,
    #[serde(default)]
    pub deposit: i64,
}

impl Fees {
    /// Soma das taxas, saturada em `i64::MAX`
    pub fn total(&self) -> i64 {
        self.compute
            .saturating_add(self.storage)
            .saturating_add(self.deposit)
    }

    /// Soma das taxas; `None` se alguma componente for negativa ou a soma
    /// não couber em `i64`
    pub fn checked_total(&self) -> Option<i64> {
        if self.compute < 0 || self.storage < 0 || self.deposit < 0 {
            return None;
        }
        self.compute
            .checked_add(self.storage)?
            .checked_add(self.deposit)
    }
}

/// Dados de um contrato de venda de NFT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftSaleInfo {
    pub nft: AccountId,
    #[serde(default)]
    pub owner: Option<AccountId>,
    pub marketplace: AccountId,
    pub price: i64,
}

/// Informações adicionais resolvidas pelo colaborador antes do motor rodar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalInfo {
    /// Master do jetton, quando a conta é uma jetton wallet
    #[serde(default)]
    pub jetton_master: Option<AccountId>,
    #[serde(default)]
    pub nft_sale: Option<NftSaleInfo>,
}

/// Transação já decodificada
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: TransactionHash,
    #[serde(default)]
    pub lt: u64,
    #[serde(default)]
    pub utime: i64,
    pub account: AccountId,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    pub success: bool,
    #[serde(default)]
    pub orig_status: AccountStatus,
    #[serde(default)]
    pub end_status: AccountStatus,
    #[serde(default)]
    pub in_msg: Option<Message>,
    #[serde(default)]
    pub out_msgs: Vec<Message>,
    #[serde(default)]
    pub fees: Fees,
    #[serde(default)]
    pub additional_info: Option<AdditionalInfo>,
}

impl Transaction {
    pub fn implements(&self, interface: Interface) -> bool {
        self.interfaces.contains(&interface)
    }

    /// Acumula valor recebido e taxas em `volume`, rejeitando quantias
    /// negativas ou que estourem `i64`
    fn check_amounts(&self, volume: &mut i64) -> Result<()> {
        let fees = self.fees.checked_total().ok_or_else(|| {
            Error::ValidationError(format!("Taxas inválidas na transação {:x}", self.hash))
        })?;
        let value = self.in_msg.as_ref().map_or(0, |m| m.value);
        if value < 0 {
            return Err(Error::ValidationError(format!(
                "Valor negativo na transação {:x}",
                self.hash
            )));
        }
        *volume = volume
            .checked_add(value)
            .and_then(|v| v.checked_add(value))
            .and_then(|v| v.checked_add(fees))
            .ok_or_else(|| {
                Error::ValidationError(format!(
                    "Valores do trace excedem o limite na transação {:x}",
                    self.hash
                ))
            })?;
        Ok(())
    }

    /// A conta foi implantada por esta transação
    pub fn is_deployment(&self) -> bool {
        let has_init = self.in_msg.as_ref().map_or(false, |m| m.has_init());
        has_init
            && self.orig_status != AccountStatus::Active
            && self.end_status == AccountStatus::Active
    }
}

/// Árvore de transações disparadas a partir de uma mensagem inicial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub transaction: Transaction,
    #[serde(default)]
    pub children: Vec<Trace>,
}

impl Trace {
    pub fn new(transaction: Transaction) -> Self {
        Self {
            transaction,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Trace>) -> Self {
        self.children = children;
        self
    }

    /// Conta o número total de transações na árvore
    pub fn total_transactions(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.total_transactions())
            .sum::<usize>()
    }

    /// Profundidade máxima (a raiz tem profundidade zero)
    pub fn max_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Valida a estrutura do trace antes da análise
    ///
    /// Cada filho precisa ter sido disparado por uma mensagem interna
    /// enviada pela conta do pai.
    ///
    /// Valores e taxas precisam ser não negativos, e o volume total do trace
    /// (cada valor conta duas vezes, crédito e débito) precisa caber em `i64`.
    pub fn validate(&self, max_depth: usize) -> Result<()> {
        let mut volume = 0i64;
        self.validate_node(0, max_depth, &mut volume)
    }

    fn validate_node(&self, depth: usize, max_depth: usize, volume: &mut i64) -> Result<()> {
        if depth > max_depth {
            return Err(Error::ValidationError(format!(
                "Trace excede a profundidade máxima de {}",
                max_depth
            )));
        }
        self.transaction.check_amounts(volume)?;
        let parent = self.transaction.account;
        for child in &self.children {
            let msg = child.transaction.in_msg.as_ref().ok_or_else(|| {
                Error::ValidationError(format!(
                    "Transação filha {:x} sem mensagem de entrada",
                    child.transaction.hash
                ))
            })?;
            if msg.is_external {
                return Err(Error::ValidationError(format!(
                    "Transação filha {:x} disparada por mensagem externa",
                    child.transaction.hash
                )));
            }
            if msg.source != Some(parent) {
                return Err(Error::ValidationError(format!(
                    "Transação filha {:x} não foi enviada por {}",
                    child.transaction.hash, parent
                )));
            }
            child.validate_node(depth + 1, max_depth, volume)?;
        }
        Ok(())
    }
}
