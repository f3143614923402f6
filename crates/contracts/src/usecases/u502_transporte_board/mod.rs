pub mod board;

pub use board::{
    build_lanes, can_remove_truck, group_flat_routes, resolve_drop, settlement_preview,
    BoardAction, BoardLane, BoardRequest, DragPayload, Lane, TruckPrefs,
};

use crate::usecases::common::UseCaseMetadata;

pub struct TransporteBoard;

impl UseCaseMetadata for TransporteBoard {
    fn usecase_index() -> &'static str {
        "u502"
    }

    fn usecase_name() -> &'static str {
        "transporte_board"
    }

    fn display_name() -> &'static str {
        "Transporte"
    }

    fn description() -> &'static str {
        "Reparto de albaranes entre almacén, pendientes y camiones"
    }
}
