use crate::shared::format::{deserialize_f64, deserialize_opt_f64, deserialize_text, format_eur, format_pct};
use serde::{Deserialize, Serialize};

/// Rows of the "Top productos" table
pub const TOP_PRODUCTS_LIMIT: usize = 10;
/// Rows of the "Ventas por día" table
pub const SALES_DAYS_LIMIT: usize = 14;
/// Quick range presets, in days
pub const RANGE_PRESETS: [u32; 3] = [7, 30, 90];

pub const NO_REPORT: &str = "(sin informe)";

/// Query of `/analytics/summary`, `/analytics/compare` and `/analytics/export/pdf`.
/// Empty dates are left out so the backend picks its default range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_compare: Option<bool>,
}

impl AnalyticsQuery {
    pub fn range(from: &str, to: &str) -> Self {
        let opt = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
        Self {
            date_from: opt(from),
            date_to: opt(to),
            include_compare: None,
        }
    }

    pub fn with_compare(mut self, include: bool) -> Self {
        self.include_compare = Some(include);
        self
    }

    /// `tendencias_{from|auto}_{to|auto}.pdf`
    pub fn pdf_filename(&self) -> String {
        format!(
            "tendencias_{}_{}.pdf",
            self.date_from.as_deref().unwrap_or("auto"),
            self.date_to.as_deref().unwrap_or("auto")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsRange {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub from: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub orders: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub aov: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub avg_per_customer: f64,
}

impl Averages {
    /// KPI cards: (label, formatted value)
    pub fn kpis(&self) -> [(&'static str, String); 4] {
        [
            ("Ingresos", format_eur(self.revenue)),
            ("Pedidos", format!("{}", self.orders)),
            ("AOV", format_eur(self.aov)),
            ("Gasto medio/cliente", format_eur(self.avg_per_customer)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub qty: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DaySales {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub orders: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(default)]
    pub range: MetricsRange,
    #[serde(default)]
    pub averages: Averages,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub sales_by_day: Vec<DaySales>,
}

impl Metrics {
    pub fn top(&self) -> &[TopProduct] {
        &self.top_products[..self.top_products.len().min(TOP_PRODUCTS_LIMIT)]
    }

    /// Last days of the series, in backend order
    pub fn recent_days(&self) -> &[DaySales] {
        let start = self.sales_by_day.len().saturating_sub(SALES_DAYS_LIMIT);
        &self.sales_by_day[start..]
    }
}

/// `GET /analytics/summary`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub metrics: Metrics,
    #[serde(default)]
    pub ai_report: Option<String>,
}

impl SummaryResponse {
    pub fn report_text(&self) -> &str {
        self.ai_report
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or(NO_REPORT)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DeltaEntry {
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub current: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub previous: f64,
    #[serde(default, deserialize_with = "deserialize_f64")]
    pub diff: f64,
    /// Null when the previous period is zero
    #[serde(default, deserialize_with = "deserialize_opt_f64")]
    pub pct: Option<f64>,
}

impl DeltaEntry {
    /// Actual, Anterior, Δ and % cells
    pub fn cells(&self, money: bool) -> [String; 4] {
        let fmt = |v: f64| if money { format_eur(v) } else { format!("{}", v) };
        [
            fmt(self.current),
            fmt(self.previous),
            fmt(self.diff),
            format_pct(self.pct),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default)]
    pub revenue: DeltaEntry,
    #[serde(default)]
    pub orders: DeltaEntry,
    #[serde(default)]
    pub aov: DeltaEntry,
}

impl Delta {
    /// Table rows: (label, entry, money formatted)
    pub fn rows(&self) -> [(&'static str, &DeltaEntry, bool); 3] {
        [
            ("Ingresos", &self.revenue, true),
            ("Pedidos", &self.orders, false),
            ("AOV", &self.aov, true),
        ]
    }
}

/// `GET /analytics/compare`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompareResponse {
    #[serde(default)]
    pub delta: Option<Delta>,
    #[serde(default)]
    pub ai_compare_report: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_lenient() {
        let s: SummaryResponse = serde_json::from_value(json!({
            "metrics": {
                "range": {"from": "2024-05-01", "to": "2024-05-31"},
                "averages": {"revenue": "1200.5", "orders": 4, "aov": 300.125},
                "top_products": (0..12).map(|i| json!({"product_id": i, "name": format!("P{}", i), "qty": 1, "revenue": 10})).collect::<Vec<_>>(),
                "sales_by_day": (1..=20).map(|d| json!({"date": format!("2024-05-{:02}", d), "orders": 1, "revenue": 50})).collect::<Vec<_>>()
            },
            "ai_report": ""
        }))
        .unwrap();
        assert_eq!(s.metrics.averages.revenue, 1200.5);
        assert_eq!(s.metrics.averages.avg_per_customer, 0.0);
        assert_eq!(s.metrics.top().len(), TOP_PRODUCTS_LIMIT);
        assert_eq!(s.metrics.recent_days().len(), SALES_DAYS_LIMIT);
        assert_eq!(s.metrics.recent_days()[0].date, "2024-05-07");
        assert_eq!(s.report_text(), NO_REPORT);
        assert_eq!(s.metrics.averages.kpis()[1].1, "4");
    }

    #[test]
    fn test_compare_rows() {
        let c: CompareResponse = serde_json::from_value(json!({
            "delta": {
                "revenue": {"current": 1500, "previous": 1000, "diff": 500, "pct": 50.0},
                "orders": {"current": 3, "previous": 0, "diff": 3, "pct": null}
            },
            "ai_compare_report": "Crece"
        }))
        .unwrap();
        let delta = c.delta.unwrap();
        let rows = delta.rows();
        assert_eq!(rows[0].1.cells(rows[0].2)[3], "+50.0%");
        assert_eq!(rows[1].1.cells(false), ["3", "0", "3", "—"].map(String::from));
        assert_eq!(rows[2].1, &DeltaEntry::default());
    }

    #[test]
    fn test_query_and_filename() {
        let q = AnalyticsQuery::range("2024-05-01", " ");
        assert_eq!(q.pdf_filename(), "tendencias_2024-05-01_auto.pdf");
        let body = serde_json::to_value(q.with_compare(true)).unwrap();
        assert_eq!(body, json!({"date_from": "2024-05-01", "include_compare": true}));
    }
}
