pub mod fechas;
