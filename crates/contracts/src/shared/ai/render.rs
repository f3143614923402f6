//! Turns raw assistant text into renderable pieces.
//!
//! Assistant answers may embed chart definitions as JSON (either a fenced
//! ```` ```json ```` block or a bare `{"charts": [...]}` object) and markdown
//! tables. Charts are lifted out of the text; what remains is split into
//! plain text and table blocks.

use crate::shared::format::safe_number;
use serde_json::Value;

pub const CHART_FALLBACK_TITLE: &str = "Gráfico";
pub const CHART_UNREADABLE: &str = "Gráfico no interpretable (config incompleta).";

const INLINE_MARKER: &str = "{\"charts\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// Chart definition as produced by the assistant
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// None when labels or datasets are missing
    pub data: Option<ChartData>,
}

impl ChartSpec {
    pub fn from_value(value: &Value) -> Self {
        let kind = match value.get("type").and_then(Value::as_str) {
            Some(t) if t.eq_ignore_ascii_case("line") => ChartKind::Line,
            _ => ChartKind::Bar,
        };

        let title = value
            .pointer("/options/title/text")
            .and_then(non_empty_str)
            .or_else(|| value.get("title").and_then(non_empty_str))
            .unwrap_or(CHART_FALLBACK_TITLE)
            .to_string();

        let data = value.get("data").and_then(|data| {
            let labels = data.get("labels")?.as_array()?;
            let datasets = data.get("datasets")?.as_array()?;
            Some(ChartData {
                labels: labels.iter().map(value_text).collect(),
                datasets: datasets
                    .iter()
                    .enumerate()
                    .map(|(i, ds)| ChartDataset {
                        label: ds
                            .get("label")
                            .and_then(non_empty_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| format!("Serie {}", i + 1)),
                        data: ds
                            .get("data")
                            .and_then(Value::as_array)
                            .map(|points| points.iter().map(safe_number).collect())
                            .unwrap_or_default(),
                    })
                    .collect(),
            })
        });

        Self { kind, title, data }
    }

    /// Drawable when `labels` and `datasets` were both arrays, even empty ones
    pub fn is_renderable(&self) -> bool {
        self.data.is_some()
    }
}

fn non_empty_str(v: &Value) -> Option<&str> {
    v.as_str().filter(|s| !s.is_empty())
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Remove `,` used as thousands separator: a comma preceded by a digit and
/// followed by exactly three digits and a non-digit.
fn strip_thousands(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ',' && i > 0 && chars[i - 1].is_ascii_digit() {
            let group = chars.get(i + 1..i + 4);
            let after = chars.get(i + 4);
            let is_separator = group.map_or(false, |g| g.iter().all(char::is_ascii_digit))
                && after.map_or(false, |a| !a.is_ascii_digit());
            if is_separator {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Parse a charts object out of a candidate snippet. Currency signs and
/// thousands separators are only stripped when the strict parse fails.
/// Returns an empty list when the snippet is not a JSON object with a
/// `charts` array.
pub fn try_parse_charts_json(raw: &str) -> Vec<ChartSpec> {
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(s), Some(e)) if e > s => (s, e),
        _ => return Vec::new(),
    };
    let candidate = &raw[start..=end];
    let parsed = serde_json::from_str::<Value>(candidate).or_else(|_| {
        let cleaned: String = candidate.chars().filter(|c| *c != '$' && *c != '€').collect();
        serde_json::from_str::<Value>(&strip_thousands(&cleaned))
    });

    match parsed {
        Ok(obj) => obj
            .get("charts")
            .and_then(Value::as_array)
            .map(|charts| charts.iter().map(ChartSpec::from_value).collect())
            .unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

/// Byte range of the first ```` ```json ... ``` ```` fence and its body
fn find_json_fence(text: &str) -> Option<(usize, usize, &str)> {
    let lower = text.to_ascii_lowercase();
    let open = lower.find("```json")?;
    let body_start = open + "```json".len();
    let close_rel = text[body_start..].find("```")?;
    let body_end = body_start + close_rel;
    Some((open, body_end + 3, text[body_start..body_end].trim()))
}

/// Pull chart definitions out of an answer, returning the remaining text.
pub fn extract_charts(raw: &str) -> (String, Vec<ChartSpec>) {
    let mut text = raw.to_string();
    let mut charts = Vec::new();

    if let Some((start, end, body)) = find_json_fence(&text) {
        let parsed = try_parse_charts_json(body);
        if !parsed.is_empty() {
            charts.extend(parsed);
            text = format!("{}{}", &text[..start], &text[end..]).trim().to_string();
        }
    }

    if let Some(idx) = text.find(INLINE_MARKER) {
        let parsed = try_parse_charts_json(text[idx..].trim());
        if !parsed.is_empty() {
            charts.extend(parsed);
            text = text[..idx].trim().to_string();
        }
    }

    (text, charts)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkdownTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageBlock {
    Text(String),
    Table(MarkdownTable),
}

/// Separator line: `|---|---|` with optional outer pipes, at least two columns
fn is_separator(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact.strip_prefix('|').unwrap_or(&compact);
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    let cells: Vec<&str> = inner.split('|').collect();
    cells.len() >= 2 && cells.iter().all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-'))
}

fn looks_like_table_header(line: &str, next: Option<&str>) -> bool {
    line.contains('|') && next.map_or(false, is_separator)
}

fn split_row(line: &str) -> Vec<String> {
    let t = line.trim();
    let t = t.strip_prefix('|').unwrap_or(t);
    let t = t.strip_suffix('|').unwrap_or(t);
    t.split('|').map(|c| c.trim().to_string()).collect()
}

fn parse_table(lines: &[&str]) -> MarkdownTable {
    let clean: Vec<&str> = lines.iter().copied().filter(|l| !l.trim().is_empty()).collect();
    if clean.len() < 2 {
        return MarkdownTable::default();
    }
    let headers = split_row(clean[0]);
    let width = headers.len();
    let rows = clean[2..]
        .iter()
        .map(|line| {
            let mut cells = split_row(line);
            cells.resize(width, String::new());
            cells
        })
        .collect();
    MarkdownTable { headers, rows }
}

/// Split text into plain and table blocks
pub fn parse_markdown_tables(text: &str) -> Vec<MessageBlock> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut buf: Vec<&str> = Vec::new();

    let flush = |buf: &mut Vec<&str>, blocks: &mut Vec<MessageBlock>| {
        if !buf.is_empty() {
            blocks.push(MessageBlock::Text(buf.join("\n").trim_end().to_string()));
            buf.clear();
        }
    };

    let mut i = 0;
    while i < lines.len() {
        if looks_like_table_header(lines[i], lines.get(i + 1).copied()) {
            flush(&mut buf, &mut blocks);
            let start = i;
            i += 2;
            while i < lines.len() && lines[i].contains('|') {
                i += 1;
            }
            blocks.push(MessageBlock::Table(parse_table(&lines[start..i])));
        } else {
            buf.push(lines[i]);
            i += 1;
        }
    }
    flush(&mut buf, &mut blocks);

    if blocks.is_empty() {
        blocks.push(MessageBlock::Text(text.to_string()));
    }
    blocks
}

/// Fully rendered assistant message
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub blocks: Vec<MessageBlock>,
    pub charts: Vec<ChartSpec>,
}

pub fn render_message(raw: &str) -> RenderedMessage {
    let (text, charts) = extract_charts(raw);
    RenderedMessage {
        blocks: parse_markdown_tables(&text),
        charts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FENCED: &str = "Ventas del mes:\n```JSON\n{\"charts\":[{\"type\":\"line\",\"title\":\"Evolución\",\"data\":{\"labels\":[\"ene\",\"feb\"],\"datasets\":[{\"label\":\"Ingresos\",\"data\":[100,250]}]}}]}\n```\nFin.";

    #[test]
    fn test_fenced_block() {
        let (text, charts) = extract_charts(FENCED);
        assert_eq!(text, "Ventas del mes:\n\nFin.");
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].kind, ChartKind::Line);
        assert_eq!(charts[0].title, "Evolución");
        let data = charts[0].data.as_ref().unwrap();
        assert_eq!(data.labels, vec!["ene", "feb"]);
        assert_eq!(data.datasets[0].data, vec![100.0, 250.0]);
    }

    #[test]
    fn test_inline_object_truncates_text() {
        let raw = "Resumen corto. {\"charts\":[{\"type\":\"bar\",\"options\":{\"title\":{\"text\":\"Top\"}},\"data\":{\"labels\":[\"Sofá\"],\"datasets\":[{\"data\":[3]}]}}]}";
        let (text, charts) = extract_charts(raw);
        assert_eq!(text, "Resumen corto.");
        assert_eq!(charts[0].kind, ChartKind::Bar);
        assert_eq!(charts[0].title, "Top");
        assert_eq!(charts[0].data.as_ref().unwrap().datasets[0].label, "Serie 1");
    }

    #[test]
    fn test_malformed_json_leaves_text() {
        let raw = "Mira:\n```json\n{\"charts\": [ {\"type\": \n```";
        let (text, charts) = extract_charts(raw);
        assert!(charts.is_empty());
        assert_eq!(text, raw);

        let no_array = "{\"charts\": 5}";
        assert_eq!(extract_charts(no_array), (no_array.to_string(), vec![]));
    }

    #[test]
    fn test_currency_and_thousands_cleanup() {
        let raw = "{\"charts\":[{\"data\":{\"labels\":[\"A\",\"B\"],\"datasets\":[{\"label\":\"€\",\"data\":[18,285.41, $1,234,567]}]}}]}";
        let charts = try_parse_charts_json(raw);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, CHART_FALLBACK_TITLE);
        assert_eq!(
            charts[0].data.as_ref().unwrap().datasets[0].data,
            vec![18285.41, 1234567.0]
        );
        assert_eq!(strip_thousands("[1,2,3]"), "[1,2,3]");
    }

    #[test]
    fn test_well_formed_numbers_are_kept() {
        let raw = "x\n```json\n{\"charts\":[{\"type\":\"bar\",\"data\":{\"labels\":[\"a\",\"b\",\"c\"],\"datasets\":[{\"label\":\"$ ventas\",\"data\":[100,250,999]}]}}]}\n```";
        let (text, charts) = extract_charts(raw);
        assert_eq!(text, "x");
        let data = charts[0].data.as_ref().unwrap();
        assert_eq!(data.datasets[0].data, vec![100.0, 250.0, 999.0]);
        assert_eq!(data.datasets[0].label, "$ ventas");
    }

    #[test]
    fn test_incomplete_chart() {
        let charts = try_parse_charts_json("{\"charts\":[{\"type\":\"line\"}]}");
        assert_eq!(charts.len(), 1);
        assert!(!charts[0].is_renderable());

        let empty = try_parse_charts_json("{\"charts\":[{\"data\":{\"labels\":[],\"datasets\":[]}}]}");
        assert!(empty[0].is_renderable());
        assert!(empty[0].data.as_ref().unwrap().labels.is_empty());
    }

    #[test]
    fn test_markdown_table_blocks() {
        let text = "Top productos:\n| Producto | Uds |\n|---|---|\n| Sofá | 3 |\n| Mesa |\nGracias";
        let blocks = parse_markdown_tables(text);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], MessageBlock::Text("Top productos:".into()));
        match &blocks[1] {
            MessageBlock::Table(t) => {
                assert_eq!(t.headers, vec!["Producto", "Uds"]);
                assert_eq!(t.rows[1], vec!["Mesa".to_string(), String::new()]);
            }
            other => panic!("expected table, got {:?}", other),
        }
        assert_eq!(blocks[2], MessageBlock::Text("Gracias".into()));
    }

    #[test]
    fn test_separator_rules() {
        assert!(is_separator("| --- | --- |"));
        assert!(is_separator("---|---"));
        assert!(!is_separator("|---|"));
        assert!(!is_separator("|:--|--:|"));
        assert_eq!(parse_markdown_tables(""), vec![MessageBlock::Text(String::new())]);
    }

    #[test]
    fn test_render_message() {
        let rendered = render_message(FENCED);
        assert_eq!(rendered.charts.len(), 1);
        assert_eq!(
            rendered.blocks,
            vec![MessageBlock::Text("Ventas del mes:\n\nFin.".into())]
        );
    }
}
