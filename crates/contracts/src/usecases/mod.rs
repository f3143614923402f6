pub mod common;

pub mod u501_nueva_venta;
pub mod u502_transporte_board;
