#![allow(dead_code)]

use ethereum_types::H256;
use serde_json::Value;
use tonscope_core::{
    AccountId, AccountStatus, AdditionalInfo, DecodedBody, Fees, Interface, Message, Trace,
    Transaction,
};

pub fn acc(n: u64) -> AccountId {
    AccountId::from_low_u64(n)
}

pub fn hash(n: u64) -> H256 {
    H256::from_low_u64_be(n)
}

/// Construtor de transações para fixtures
pub struct TxBuilder {
    tx: Transaction,
}

impl TxBuilder {
    pub fn new(id: u64, account: AccountId) -> Self {
        Self {
            tx: Transaction {
                hash: hash(id),
                lt: id,
                account,
                success: true,
                orig_status: AccountStatus::Active,
                end_status: AccountStatus::Active,
                ..Default::default()
            },
        }
    }

    /// Mensagem externa sem valor
    pub fn external(mut self) -> Self {
        self.tx.in_msg = Some(Message {
            destination: Some(self.tx.account),
            is_external: true,
            ..Default::default()
        });
        self
    }

    pub fn internal(mut self, from: AccountId, value: i64) -> Self {
        self.tx.in_msg = Some(Message {
            source: Some(from),
            destination: Some(self.tx.account),
            value,
            bounce: true,
            ..Default::default()
        });
        self
    }

    fn msg(&mut self) -> &mut Message {
        self.tx.in_msg.get_or_insert_with(Message::default)
    }

    pub fn bounce(mut self, bounce: bool) -> Self {
        self.msg().bounce = bounce;
        self
    }

    pub fn body(mut self, op_code: u32, operation: &str, value: Value) -> Self {
        let msg = self.msg();
        msg.op_code = Some(op_code);
        msg.decoded_body = Some(DecodedBody::new(operation, value));
        self
    }

    pub fn opcode(mut self, op_code: u32) -> Self {
        self.msg().op_code = Some(op_code);
        self
    }

    pub fn comment(mut self, text: &str) -> Self {
        let msg = self.msg();
        msg.op_code = Some(0);
        msg.decoded_body = Some(DecodedBody::text_comment(text));
        self
    }

    pub fn interface(mut self, interface: Interface) -> Self {
        self.tx.interfaces.push(interface);
        self
    }

    pub fn fee(mut self, compute: i64) -> Self {
        self.tx.fees = Fees {
            compute,
            ..Default::default()
        };
        self
    }

    pub fn jetton_master(mut self, master: AccountId) -> Self {
        self.tx
            .additional_info
            .get_or_insert_with(AdditionalInfo::default)
            .jetton_master = Some(master);
        self
    }

    pub fn failed(mut self) -> Self {
        self.tx.success = false;
        self
    }

    /// Conta implantada por esta mensagem
    pub fn deploy(mut self) -> Self {
        self.tx.orig_status = AccountStatus::Uninit;
        self.msg().init = vec![0xb5, 0xee, 0x9c, 0x72];
        self
    }

    pub fn build(self) -> Transaction {
        self.tx
    }

    pub fn leaf(self) -> Trace {
        Trace::new(self.tx)
    }

    pub fn trace(self, children: Vec<Trace>) -> Trace {
        Trace::new(self.tx).with_children(children)
    }
}

pub const WALLET_A: u64 = 1;
pub const WALLET_B: u64 = 2;
pub const JETTON_WALLET_A: u64 = 11;
pub const JETTON_WALLET_B: u64 = 12;
pub const JETTON_MASTER: u64 = 99;

/// Carteira A envia 1 TON com comentário para B
pub fn ton_transfer_trace() -> Trace {
    TxBuilder::new(1, acc(WALLET_A))
        .external()
        .interface(Interface::Wallet)
        .fee(10)
        .trace(vec![TxBuilder::new(2, acc(WALLET_B))
            .internal(acc(WALLET_A), 1_000_000_000)
            .comment("obrigado")
            .interface(Interface::Wallet)
            .fee(5)
            .leaf()])
}

/// Transferência de 700 unidades de jetton de A para B com notificação e
/// devolução do excedente
pub fn jetton_transfer_trace() -> Trace {
    let notify = TxBuilder::new(14, acc(WALLET_B))
        .internal(acc(JETTON_WALLET_B), 1)
        .body(
            0x7362d09c,
            "JettonNotify",
            serde_json::json!({
                "amount": "700",
                "sender": acc(WALLET_A).to_string(),
                "forward_payload": { "operation": "TextComment", "value": { "text": "pagamento" } },
            }),
        )
        .interface(Interface::Wallet)
        .fee(3)
        .leaf();
    let excess = TxBuilder::new(15, acc(WALLET_A))
        .internal(acc(JETTON_WALLET_B), 40_000_000)
        .body(0xd53276db, "Excess", serde_json::json!({}))
        .interface(Interface::Wallet)
        .fee(3)
        .leaf();
    let internal = TxBuilder::new(13, acc(JETTON_WALLET_B))
        .internal(acc(JETTON_WALLET_A), 45_000_000)
        .body(0x178d4519, "JettonInternalTransfer", serde_json::json!({ "amount": "700" }))
        .interface(Interface::JettonWallet)
        .jetton_master(acc(JETTON_MASTER))
        .fee(4)
        .trace(vec![notify, excess]);
    let transfer = TxBuilder::new(12, acc(JETTON_WALLET_A))
        .internal(acc(WALLET_A), 50_000_000)
        .body(
            0x0f8a7ea5,
            "JettonTransfer",
            serde_json::json!({
                "amount": "700",
                "destination": acc(WALLET_B).to_string(),
                "response_destination": acc(WALLET_A).to_string(),
                "forward_ton_amount": 1,
            }),
        )
        .interface(Interface::JettonWallet)
        .jetton_master(acc(JETTON_MASTER))
        .fee(6)
        .trace(vec![internal]);
    TxBuilder::new(11, acc(WALLET_A))
        .external()
        .interface(Interface::Wallet)
        .fee(10)
        .trace(vec![transfer])
}

/// Transferência de jetton de A para B em dois saltos, sem notificação:
/// o destinatário só aparece no corpo da `JettonTransfer`
pub fn jetton_two_hop_trace() -> Trace {
    let internal = TxBuilder::new(33, acc(JETTON_WALLET_B))
        .internal(acc(JETTON_WALLET_A), 45_000_000)
        .body(0x178d4519, "JettonInternalTransfer", serde_json::json!({ "amount": "700" }))
        .interface(Interface::JettonWallet)
        .jetton_master(acc(JETTON_MASTER))
        .fee(4)
        .leaf();
    let transfer = TxBuilder::new(32, acc(JETTON_WALLET_A))
        .internal(acc(WALLET_A), 50_000_000)
        .body(
            0x0f8a7ea5,
            "JettonTransfer",
            serde_json::json!({
                "amount": "700",
                "destination": acc(WALLET_B).to_string(),
                "response_destination": acc(WALLET_A).to_string(),
            }),
        )
        .interface(Interface::JettonWallet)
        .jetton_master(acc(JETTON_MASTER))
        .fee(6)
        .trace(vec![internal]);
    TxBuilder::new(31, acc(WALLET_A))
        .external()
        .interface(Interface::Wallet)
        .fee(10)
        .trace(vec![transfer])
}

/// Carteira A chama um contrato com opcode desconhecido
pub fn unknown_opcode_trace() -> Trace {
    TxBuilder::new(21, acc(WALLET_A))
        .external()
        .interface(Interface::Wallet)
        .fee(10)
        .trace(vec![TxBuilder::new(22, acc(500))
            .internal(acc(WALLET_A), 200_000_000)
            .opcode(0xdeadbeef)
            .fee(7)
            .leaf()])
}

/// Soma das taxas de todas as transações
pub fn total_fees(trace: &Trace) -> i64 {
    trace.transaction.fees.total() + trace.children.iter().map(total_fees).sum::<i64>()
}
