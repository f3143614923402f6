//! Bank link (`/bank/caixa`) wire types. Field names follow the upstream
//! Berlin Group payloads, so several come in camelCase.

use crate::shared::format::{deserialize_f64, deserialize_opt_f64, deserialize_text};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BankStatus {
    #[serde(default)]
    pub linked: bool,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub demo: bool,
    #[serde(default)]
    pub last_sync: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(deserialize_with = "deserialize_text")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iban: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub currency: String,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub balance: Option<f64>,
}

impl BankAccount {
    /// "Cuenta nómina · EUR · Saldo: 1520.30"
    pub fn option_label(&self) -> String {
        let name = self
            .name
            .as_deref()
            .or(self.iban.as_deref())
            .unwrap_or(self.id.as_str());
        let saldo = self.balance.map(|b| format!("{:.2}", b)).unwrap_or_default();
        format!("{} · {} · Saldo: {}", name, self.currency, saldo)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<BankAccount>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    #[serde(default)]
    pub booking_date: Option<String>,
    #[serde(default)]
    pub value_date: Option<String>,
    #[serde(default)]
    pub remittance_information_unstructured: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub currency: String,
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub balance_after_tx: Option<f64>,
}

impl BankTransaction {
    pub fn fecha(&self) -> &str {
        self.booking_date
            .as_deref()
            .or(self.value_date.as_deref())
            .unwrap_or("")
    }

    pub fn concepto(&self) -> &str {
        self.remittance_information_unstructured
            .as_deref()
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    pub fn is_debit(&self) -> bool {
        self.amount < 0.0
    }

    pub fn importe_label(&self) -> String {
        format!("{:.2} {}", self.amount, self.currency)
    }

    pub fn saldo_label(&self) -> String {
        self.balance_after_tx
            .map(|b| format!("{:.2} {}", b, self.currency))
            .unwrap_or_else(|| "—".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<BankTransaction>,
}

/// `POST /bank/caixa/link`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkResponse {
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Query string of `GET /bank/caixa/transactions`; empty dates are omitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionsQuery {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

fn non_empty(raw: &str) -> Option<String> {
    let v = raw.trim();
    (!v.is_empty()).then(|| v.to_string())
}

pub fn transactions_query(account_id: &str, from: &str, to: &str) -> TransactionsQuery {
    TransactionsQuery {
        account_id: account_id.to_string(),
        from: non_empty(from),
        to: non_empty(to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_fallbacks() {
        let t: BankTransaction = serde_json::from_value(json!({
            "valueDate": "2024-05-03",
            "description": "Recibo luz",
            "amount": "-61.20",
            "currency": "EUR"
        }))
        .unwrap();
        assert_eq!(t.fecha(), "2024-05-03");
        assert_eq!(t.concepto(), "Recibo luz");
        assert!(t.is_debit());
        assert_eq!(t.importe_label(), "-61.20 EUR");
        assert_eq!(t.saldo_label(), "—");
    }

    #[test]
    fn test_account_label_and_query() {
        let a: BankAccount = serde_json::from_value(json!({
            "id": 7, "iban": "ES00 1234", "currency": "EUR", "balance": 1520.3
        }))
        .unwrap();
        assert_eq!(a.id, "7");
        assert_eq!(a.option_label(), "ES00 1234 · EUR · Saldo: 1520.30");
        assert_eq!(
            transactions_query("7", "", " 2024-05-31 "),
            TransactionsQuery {
                account_id: "7".into(),
                from: None,
                to: Some("2024-05-31".into()),
            }
        );
    }
}
