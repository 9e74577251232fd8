use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tonscope_core::AccountId;

/// Fluxo líquido de ativos por conta implicado por uma (sub)árvore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValueFlow {
    pub accounts: BTreeMap<AccountId, AccountValueFlow>,
}

/// Variação de ativos de uma única conta
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountValueFlow {
    /// Variação líquida em nanotons, já descontadas as taxas
    pub ton: i64,
    /// Taxas pagas pela conta
    pub fees: i64,
    /// Variação por master de jetton
    #[serde(serialize_with = "serialize_jettons")]
    pub jettons: BTreeMap<AccountId, i128>,
    pub nfts: NftFlow,
}

/// Contadores de NFTs recebidos e enviados
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NftFlow {
    pub added: i64,
    pub removed: i64,
}

fn serialize_jettons<S: Serializer>(
    jettons: &BTreeMap<AccountId, i128>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(jettons.iter().map(|(master, qty)| (master, qty.to_string())))
}

impl AccountValueFlow {
    fn merge(&mut self, other: &AccountValueFlow) {
        self.ton = self.ton.saturating_add(other.ton);
        self.fees = self.fees.saturating_add(other.fees);
        self.nfts.added += other.nfts.added;
        self.nfts.removed += other.nfts.removed;
        for (master, qty) in &other.jettons {
            add_jetton_entry(&mut self.jettons, *master, *qty);
        }
    }
}

fn add_jetton_entry(jettons: &mut BTreeMap<AccountId, i128>, master: AccountId, qty: i128) {
    let entry = jettons.entry(master).or_insert(0);
    *entry = entry.saturating_add(qty);
    if *entry == 0 {
        jettons.remove(&master);
    }
}

impl ValueFlow {
    pub fn new() -> Self {
        Self::default()
    }

    fn account_mut(&mut self, account: AccountId) -> &mut AccountValueFlow {
        self.accounts.entry(account).or_default()
    }

    pub fn get(&self, account: &AccountId) -> Option<&AccountValueFlow> {
        self.accounts.get(account)
    }

    pub fn add_ton(&mut self, account: AccountId, amount: i64) {
        let flow = self.account_mut(account);
        flow.ton = flow.ton.saturating_add(amount);
    }

    /// Registra taxa paga: debita o saldo em TON e acumula em `fees`
    pub fn add_fee(&mut self, account: AccountId, fee: i64) {
        let flow = self.account_mut(account);
        flow.ton = flow.ton.saturating_sub(fee);
        flow.fees = flow.fees.saturating_add(fee);
    }

    pub fn add_jettons(&mut self, account: AccountId, master: AccountId, amount: u128) {
        let qty = i128::try_from(amount).unwrap_or(i128::MAX);
        add_jetton_entry(&mut self.account_mut(account).jettons, master, qty);
    }

    pub fn sub_jettons(&mut self, account: AccountId, master: AccountId, amount: u128) {
        let qty = i128::try_from(amount).unwrap_or(i128::MAX);
        add_jetton_entry(&mut self.account_mut(account).jettons, master, -qty);
    }

    pub fn add_nft(&mut self, account: AccountId) {
        self.account_mut(account).nfts.added += 1;
    }

    pub fn remove_nft(&mut self, account: AccountId) {
        self.account_mut(account).nfts.removed += 1;
    }

    /// Soma outro fluxo a este; operação comutativa e associativa
    pub fn merge(&mut self, other: &ValueFlow) {
        for (account, flow) in &other.accounts {
            self.account_mut(*account).merge(flow);
        }
    }

    /// Soma das variações em TON de todas as contas
    pub fn total_ton(&self) -> i64 {
        self.accounts.values().map(|f| f.ton).sum()
    }

    pub fn total_fees(&self) -> i64 {
        self.accounts.values().map(|f| f.fees).sum()
    }

    /// Soma das variações de um jetton em todas as contas
    pub fn total_jettons(&self, master: &AccountId) -> i128 {
        self.accounts
            .values()
            .filter_map(|f| f.jettons.get(master))
            .sum()
    }
}
