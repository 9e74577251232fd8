/*!
 * Tonscope Utils
 *
 * Utilitários comuns usados em toda a workspace Tonscope
 */

/// Formata um opcode de 32 bits para exibição
pub fn format_opcode(op_code: u32) -> String {
    format!("0x{:08x}", op_code)
}

/// Formata um valor em nanotons como TON
pub fn format_nanoton(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}", sign, format_token_amount(amount.unsigned_abs() as u128, 9))
}

/// Formata um valor com decimais para exibição
pub fn format_token_amount(amount: u128, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let divisor = 10u128.pow(decimals as u32);
    let integer_part = amount / divisor;
    let fractional_part = amount % divisor;

    // Parte fracionária com zeros à esquerda
    let mut fractional = format!("{:0width$}", fractional_part, width = decimals as usize);

    // Remove zeros à direita
    while fractional.ends_with('0') {
        fractional.pop();
    }

    if fractional.is_empty() {
        integer_part.to_string()
    } else {
        format!("{}.{}", integer_part, fractional)
    }
}

/// Serde para quantidades de jetton: aceita string decimal ou número,
/// serializa sempre como string
pub mod amount {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(text) => text
                .parse::<u128>()
                .map_err(|_| de::Error::custom(format!("Quantidade inválida: {}", text))),
            RawAmount::Number(n) => Ok(n as u128),
        }
    }
}

/// Serde para bytes representados como string hexadecimal
pub mod hex_bytes {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw.trim_start_matches("0x")).map_err(de::Error::custom)
    }
}
