pub mod a001_cliente;
pub mod a002_proveedor;
pub mod a003_producto;
pub mod a004_albaran;
pub mod a005_movimiento;
pub mod a006_transporte;
pub mod a007_banco;
