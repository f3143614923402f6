pub mod d400_resumen;
pub mod d401_tendencias;
