//! Transport board: warehouse, pending and one lane per truck.
//!
//! The server owns route membership. A drop only decides which endpoint to
//! call; the page reloads every list after any successful action.

use crate::domain::a004_albaran::aggregate::Albaran;
use crate::domain::a006_transporte::aggregate::{
    AlbaranIdsRequest, AsignarRequest, CamionRuta, RutasResponse,
};
use crate::domain::ids::{AlbaranId, CamionId};
use crate::shared::format::round2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lane {
    Almacen,
    Pendiente,
    Camion(CamionId),
}

impl Lane {
    /// Stable key used in the drag payload and as DOM id
    pub fn code(&self) -> String {
        match self {
            Lane::Almacen => "almacen".to_string(),
            Lane::Pendiente => "pendiente".to_string(),
            Lane::Camion(id) => format!("camion:{}", id),
        }
    }

    pub fn from_code(code: &str) -> Option<Lane> {
        match code {
            "almacen" => Some(Lane::Almacen),
            "pendiente" => Some(Lane::Pendiente),
            other => other
                .strip_prefix("camion:")
                .and_then(CamionId::parse)
                .map(Lane::Camion),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Lane::Almacen => "Almacén".to_string(),
            Lane::Pendiente => "Pendiente (sin camión)".to_string(),
            Lane::Camion(id) => format!("Camión {}", id),
        }
    }

    pub fn camion_id(&self) -> Option<CamionId> {
        match self {
            Lane::Camion(id) => Some(*id),
            _ => None,
        }
    }
}

impl TryFrom<String> for Lane {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Lane::from_code(&code).ok_or_else(|| format!("carril desconocido: {}", code))
    }
}

impl From<Lane> for String {
    fn from(lane: Lane) -> Self {
        lane.code()
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title())
    }
}

/// Carried in the `DataTransfer` as `application/json`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub albaran_id: AlbaranId,
    pub origin: Lane,
}

impl DragPayload {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Endpoint call decided by a drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardAction {
    Asignar {
        camion_id: CamionId,
        albaran_id: AlbaranId,
    },
    Quitar {
        albaran_id: AlbaranId,
    },
    MarcarPendiente {
        albaran_id: AlbaranId,
    },
}

/// JSON body of a board action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoardRequest {
    Asignar(AsignarRequest),
    Ids(AlbaranIdsRequest),
}

impl BoardAction {
    /// Path relative to the API base
    pub fn endpoint(&self) -> &'static str {
        match self {
            BoardAction::Asignar { .. } => "transporte/ruta/asignar",
            BoardAction::Quitar { .. } => "transporte/ruta/quitar",
            BoardAction::MarcarPendiente { .. } => "transporte/ruta/pendiente",
        }
    }

    pub fn request(&self) -> BoardRequest {
        match *self {
            BoardAction::Asignar {
                camion_id,
                albaran_id,
            } => BoardRequest::Asignar(AsignarRequest {
                camion_id,
                albaran_ids: vec![albaran_id],
            }),
            BoardAction::Quitar { albaran_id } | BoardAction::MarcarPendiente { albaran_id } => {
                BoardRequest::Ids(AlbaranIdsRequest {
                    albaran_ids: vec![albaran_id],
                })
            }
        }
    }

    /// Log line / toast text
    pub fn describe(&self) -> String {
        match self {
            BoardAction::Asignar {
                camion_id,
                albaran_id,
            } => format!("Albarán #{} asignado al camión {}", albaran_id, camion_id),
            BoardAction::Quitar { albaran_id } => {
                format!("Albarán #{} devuelto al almacén", albaran_id)
            }
            BoardAction::MarcarPendiente { albaran_id } => {
                format!("Albarán #{} pendiente de camión", albaran_id)
            }
        }
    }
}

/// Decide the action for dropping `payload` on `destination`.
/// Dropping on the origin lane does nothing.
pub fn resolve_drop(payload: &DragPayload, destination: Lane) -> Option<BoardAction> {
    let albaran_id = payload.albaran_id;
    if payload.origin == destination {
        return None;
    }
    match destination {
        Lane::Camion(camion_id) => Some(BoardAction::Asignar {
            camion_id,
            albaran_id,
        }),
        Lane::Almacen => Some(BoardAction::Quitar { albaran_id }),
        Lane::Pendiente => Some(BoardAction::MarcarPendiente { albaran_id }),
    }
}

/// Truck ids remembered in browser storage
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TruckPrefs {
    /// Trucks added by hand that the server does not know yet
    #[serde(default)]
    pub extra: BTreeSet<CamionId>,
    /// Empty trucks removed from view
    #[serde(default)]
    pub hidden: BTreeSet<CamionId>,
}

impl TruckPrefs {
    /// Remember `max(known) + 1` and return it. Hidden ids count as known,
    /// so a removed truck number is never handed out again.
    pub fn add_truck(&mut self, server: &[CamionId]) -> CamionId {
        let max = server
            .iter()
            .chain(self.extra.iter())
            .chain(self.hidden.iter())
            .map(CamionId::value)
            .max()
            .unwrap_or(0);
        let id = CamionId(max + 1);
        self.extra.insert(id);
        id
    }

    pub fn hide(&mut self, id: CamionId) {
        self.hidden.insert(id);
        self.extra.remove(&id);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardLane {
    pub lane: Lane,
    pub albaranes: Vec<Albaran>,
}

impl BoardLane {
    pub fn total(&self) -> f64 {
        round2(self.albaranes.iter().map(|a| a.total).sum())
    }
}

/// Lanes in display order: Almacén, Pendiente, then trucks by id.
///
/// Trucks are the server trucks plus `prefs.extra`, minus `prefs.hidden`.
/// A hidden truck that has orders is shown anyway.
pub fn build_lanes(almacen: &[Albaran], rutas: &RutasResponse, prefs: &TruckPrefs) -> Vec<BoardLane> {
    let mut trucks: BTreeMap<CamionId, Vec<Albaran>> = BTreeMap::new();
    for id in &prefs.extra {
        trucks.entry(*id).or_default();
    }
    for camion in &rutas.camiones {
        trucks
            .entry(camion.camion_id)
            .or_default()
            .extend(camion.albaranes.iter().cloned());
    }

    let mut lanes = vec![
        BoardLane {
            lane: Lane::Almacen,
            albaranes: almacen.to_vec(),
        },
        BoardLane {
            lane: Lane::Pendiente,
            albaranes: rutas.sin_camion.clone(),
        },
    ];
    lanes.extend(
        trucks
            .into_iter()
            .filter(|(id, albaranes)| !prefs.hidden.contains(id) || !albaranes.is_empty())
            .map(|(id, albaranes)| BoardLane {
                lane: Lane::Camion(id),
                albaranes,
            }),
    );
    lanes
}

/// Only empty truck lanes can be removed from view
pub fn can_remove_truck(lane: &BoardLane) -> bool {
    matches!(lane.lane, Lane::Camion(_)) && lane.albaranes.is_empty()
}

/// Group the flat `GET /transporte/ruta` listing into the `rutas` shape
pub fn group_flat_routes(flat: &[Albaran]) -> RutasResponse {
    let mut grouped: BTreeMap<CamionId, Vec<Albaran>> = BTreeMap::new();
    let mut sin_camion = Vec::new();
    for albaran in flat {
        match albaran.camion_id {
            Some(id) => grouped.entry(id).or_default().push(albaran.clone()),
            None => sin_camion.push(albaran.clone()),
        }
    }
    RutasResponse {
        camiones: grouped
            .into_iter()
            .map(|(camion_id, albaranes)| CamionRuta {
                camion_id,
                albaranes,
            })
            .collect(),
        sin_camion,
    }
}

/// Fee shown before accepting a route, rounded to cents
pub fn settlement_preview(total: f64, fee_percent: f64) -> f64 {
    round2(total * fee_percent / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::ClienteId;

    fn alb(id: i64, total: f64, camion: Option<i64>) -> Albaran {
        Albaran {
            id: AlbaranId(id),
            cliente_id: ClienteId(1),
            total,
            camion_id: camion.map(CamionId),
            ..Default::default()
        }
    }

    fn payload(id: i64, origin: Lane) -> DragPayload {
        DragPayload {
            albaran_id: AlbaranId(id),
            origin,
        }
    }

    #[test]
    fn test_drop_resolution_table() {
        let t1 = Lane::Camion(CamionId(1));
        let t2 = Lane::Camion(CamionId(2));
        let id = AlbaranId(9);

        assert_eq!(resolve_drop(&payload(9, Lane::Almacen), Lane::Almacen), None);
        assert_eq!(resolve_drop(&payload(9, t1), t1), None);
        assert_eq!(resolve_drop(&payload(9, Lane::Pendiente), Lane::Pendiente), None);

        for origin in [Lane::Almacen, Lane::Pendiente, t1] {
            assert_eq!(
                resolve_drop(&payload(9, origin), t2),
                Some(BoardAction::Asignar { camion_id: CamionId(2), albaran_id: id })
            );
        }
        for origin in [Lane::Pendiente, t1] {
            assert_eq!(
                resolve_drop(&payload(9, origin), Lane::Almacen),
                Some(BoardAction::Quitar { albaran_id: id })
            );
        }
        for origin in [Lane::Almacen, t1] {
            assert_eq!(
                resolve_drop(&payload(9, origin), Lane::Pendiente),
                Some(BoardAction::MarcarPendiente { albaran_id: id })
            );
        }
    }

    #[test]
    fn test_action_requests() {
        let a = BoardAction::Asignar { camion_id: CamionId(4), albaran_id: AlbaranId(7) };
        assert_eq!(a.endpoint(), "transporte/ruta/asignar");
        assert_eq!(
            serde_json::to_value(a.request()).unwrap(),
            serde_json::json!({"camion_id": 4, "albaran_ids": [7]})
        );
        let q = BoardAction::Quitar { albaran_id: AlbaranId(7) };
        assert_eq!(
            serde_json::to_value(q.request()).unwrap(),
            serde_json::json!({"albaran_ids": [7]})
        );
    }

    #[test]
    fn test_payload_json() {
        let p = payload(3, Lane::Camion(CamionId(12)));
        let raw = p.to_json().unwrap();
        assert_eq!(raw, r#"{"albaran_id":3,"origin":"camion:12"}"#);
        assert_eq!(DragPayload::from_json(&raw), Some(p));
        assert_eq!(DragPayload::from_json(r#"{"albaran_id":3,"origin":"tejado"}"#), None);
    }

    #[test]
    fn test_lanes_with_extra_and_hidden_trucks() {
        let rutas = RutasResponse {
            camiones: vec![
                CamionRuta { camion_id: CamionId(3), albaranes: vec![alb(30, 100.0, Some(3))] },
                CamionRuta { camion_id: CamionId(1), albaranes: vec![alb(10, 50.0, Some(1))] },
            ],
            sin_camion: vec![alb(20, 10.0, None)],
        };
        let prefs = TruckPrefs {
            extra: [CamionId(5), CamionId(2)].into_iter().collect(),
            hidden: [CamionId(2), CamionId(3)].into_iter().collect(),
        };
        let lanes = build_lanes(&[alb(40, 5.0, None)], &rutas, &prefs);
        let order: Vec<Lane> = lanes.iter().map(|l| l.lane).collect();
        // 2 is hidden and empty, 3 is hidden but loaded
        assert_eq!(
            order,
            vec![
                Lane::Almacen,
                Lane::Pendiente,
                Lane::Camion(CamionId(1)),
                Lane::Camion(CamionId(3)),
                Lane::Camion(CamionId(5)),
            ]
        );
        assert!(!can_remove_truck(&lanes[3]));
        assert!(can_remove_truck(&lanes[4]));
        assert!(!can_remove_truck(&lanes[0]));
    }

    #[test]
    fn test_add_and_hide_trucks() {
        let mut prefs = TruckPrefs::default();
        assert_eq!(prefs.add_truck(&[]), CamionId(1));
        assert_eq!(prefs.add_truck(&[CamionId(4)]), CamionId(5));
        prefs.hide(CamionId(5));
        assert!(!prefs.extra.contains(&CamionId(5)));
        assert_eq!(prefs.add_truck(&[CamionId(4)]), CamionId(6));
    }

    #[test]
    fn test_group_flat_routes() {
        let flat = vec![alb(1, 0.0, Some(2)), alb(2, 0.0, None), alb(3, 0.0, Some(1)), alb(4, 0.0, Some(2))];
        let rutas = group_flat_routes(&flat);
        let trucks: Vec<(i64, Vec<i64>)> = rutas
            .camiones
            .iter()
            .map(|c| (c.camion_id.value(), c.albaranes.iter().map(|a| a.id.value()).collect()))
            .collect();
        assert_eq!(trucks, vec![(1, vec![3]), (2, vec![1, 4])]);
        assert_eq!(rutas.sin_camion.len(), 1);
    }

    #[test]
    fn test_settlement_preview() {
        assert_eq!(settlement_preview(1000.0, 7.0), 70.0);
        assert_eq!(settlement_preview(1234.56, 7.0), 86.42);
        assert_eq!(settlement_preview(0.0, 7.0), 0.0);
    }
}
