pub mod u501_nueva_venta {
    pub mod api;
    pub mod view;

    pub use view::NuevaVentaView;
}

pub mod u502_transporte_board {
    pub mod view;

    pub use view::TransporteBoardView;
}
