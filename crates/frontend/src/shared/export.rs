//! CSV export of list views and browser downloads of generated files.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Rows that can be written to a CSV export
pub trait CsvExportable {
    fn headers() -> Vec<&'static str>;

    fn to_csv_row(&self) -> Vec<String>;
}

/// Build the CSV text: BOM so spreadsheet apps detect UTF-8, `;` separators
pub fn build_csv<T: CsvExportable>(data: &[T]) -> String {
    let mut csv = String::from('\u{FEFF}');
    csv.push_str(&T::headers().join(";"));
    csv.push('\n');
    for item in data {
        let row: Vec<String> = item.to_csv_row().iter().map(|c| escape_csv_cell(c)).collect();
        csv.push_str(&row.join(";"));
        csv.push('\n');
    }
    csv
}

/// Write `data` as CSV and start the download
pub fn export_csv<T: CsvExportable>(data: &[T], filename: &str) -> Result<(), String> {
    if data.is_empty() {
        return Err("No hay datos para exportar".to_string());
    }
    let blob = create_csv_blob(&build_csv(data))?;
    download_blob(&blob, filename)
}

fn escape_csv_cell(cell: &str) -> String {
    if cell.contains(';') || cell.contains('"') || cell.contains('\n') || cell.contains('\r') {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn create_csv_blob(content: &str) -> Result<Blob, String> {
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&parts, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Save a blob through a temporary `<a download>` element
pub fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;
    anchor.click();
    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;
    log::debug!("downloaded {}", filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row(&'static str, f64);

    impl CsvExportable for Row {
        fn headers() -> Vec<&'static str> {
            vec!["Concepto", "Importe"]
        }

        fn to_csv_row(&self) -> Vec<String> {
            vec![self.0.to_string(), format!("{:.2}", self.1)]
        }
    }

    #[test]
    fn test_build_csv_escapes_cells() {
        let csv = build_csv(&[Row("Mesa; roble", 10.0), Row("Silla \"Oslo\"", 2.5)]);
        let lines: Vec<&str> = csv.trim_start_matches('\u{FEFF}').lines().collect();
        assert_eq!(lines[0], "Concepto;Importe");
        assert_eq!(lines[1], "\"Mesa; roble\";10.00");
        assert_eq!(lines[2], "\"Silla \"\"Oslo\"\"\";2.50");
    }
}
