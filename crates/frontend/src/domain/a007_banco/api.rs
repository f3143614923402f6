use crate::shared::api_utils::{get_json, get_json_query, post_empty};
use contracts::domain::a007_banco::aggregate::{
    transactions_query, AccountsResponse, BankAccount, BankStatus, BankTransaction, LinkResponse,
    TransactionsResponse,
};
use contracts::shared::error::ApiError;

const BASE: &str = "bank/caixa";

pub async fn fetch_status() -> Result<BankStatus, ApiError> {
    get_json(&format!("{BASE}/status")).await
}

pub async fn fetch_accounts() -> Result<Vec<BankAccount>, ApiError> {
    get_json::<AccountsResponse>(&format!("{BASE}/accounts"))
        .await
        .map(|r| r.accounts)
}

pub async fn fetch_transactions(account_id: &str, from: &str, to: &str) -> Result<Vec<BankTransaction>, ApiError> {
    get_json_query::<_, TransactionsResponse>(
        &format!("{BASE}/transactions"),
        &transactions_query(account_id, from, to),
    )
    .await
    .map(|r| r.transactions)
}

pub async fn start_link() -> Result<LinkResponse, ApiError> {
    post_empty(&format!("{BASE}/link")).await
}

pub async fn sync() -> Result<serde_json::Value, ApiError> {
    post_empty(&format!("{BASE}/sync")).await
}
