pub mod asistencia;
pub mod empleado;
pub mod exportar;
