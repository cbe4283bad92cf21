pub mod asistencia;
pub mod empleado;
