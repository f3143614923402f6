use crate::domain::a004_albaran::api::fetch_albaranes;
use crate::domain::a005_movimiento::api::fetch_movimientos;
use chrono::NaiveDate;
use contracts::dashboards::d400_resumen::ResumenDashboard;
use contracts::shared::error::ApiError;

/// Both lists are required; the figures are computed here, not by the backend
pub async fn fetch_resumen(today: NaiveDate) -> Result<ResumenDashboard, ApiError> {
    let movimientos = fetch_movimientos().await?;
    let albaranes = fetch_albaranes().await?;
    Ok(ResumenDashboard::build(&movimientos, &albaranes, today))
}
