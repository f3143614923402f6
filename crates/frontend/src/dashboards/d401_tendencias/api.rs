use crate::shared::api_utils::{download_pdf, get_json_query, post_json, with_query};
use contracts::dashboards::d401_tendencias::dto::{AnalyticsQuery, CompareResponse, SummaryResponse};
use contracts::shared::ai::{AiAnswer, AskRequest, ChatRequest};
use contracts::shared::error::ApiError;

pub async fn fetch_summary(query: &AnalyticsQuery) -> Result<SummaryResponse, ApiError> {
    get_json_query("analytics/summary", query).await
}

pub async fn fetch_compare(query: &AnalyticsQuery) -> Result<CompareResponse, ApiError> {
    get_json_query("analytics/compare", query).await
}

/// Download the PDF report of the range, with or without the comparison section
pub async fn export_pdf(query: &AnalyticsQuery, include_compare: bool) -> Result<(), ApiError> {
    let filename = query.pdf_filename();
    let path = with_query("analytics/export/pdf", &query.clone().with_compare(include_compare))?;
    download_pdf(&path, &filename).await
}

/// Question answered with the metrics of the given range
pub async fn ask(request: &AskRequest) -> Result<String, ApiError> {
    post_json::<_, AiAnswer>("ai/ask", request).await.map(|a| a.text())
}

/// Free conversation; the request carries the recent history
pub async fn chat(request: &ChatRequest) -> Result<String, ApiError> {
    post_json::<_, AiAnswer>("ai/chat", request).await.map(|a| a.text())
}
