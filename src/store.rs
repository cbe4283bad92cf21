//! Persistence boundary. The registration workflow and the HTTP handlers talk
//! to this trait; the MySQL implementation lives in `db.rs`.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::asistencia::{Asistencia, NuevaAsistencia, TipoAsistencia};
use crate::model::empleado::Empleado;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the insert. For attendance rows this
    /// is the (dni, fecha, tipo) key acting as the final backstop against the
    /// check-then-insert race; for employees it is the dni key.
    #[error("registro duplicado")]
    Duplicado,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AsistenciaStore: Send + Sync {
    async fn buscar_empleado(&self, dni: &str) -> Result<Option<Empleado>, StoreError>;

    async fn insertar_empleado(
        &self,
        dni: &str,
        nombre: &str,
        cargo: &str,
    ) -> Result<Empleado, StoreError>;

    /// Roster ordered by nombre ascending.
    async fn listar_empleados(&self) -> Result<Vec<Empleado>, StoreError>;

    /// Event kinds already recorded for the employee on the given date.
    async fn tipos_del_dia(
        &self,
        dni: &str,
        fecha: NaiveDate,
    ) -> Result<HashSet<TipoAsistencia>, StoreError>;

    async fn insertar_asistencia(&self, nueva: NuevaAsistencia)
        -> Result<Asistencia, StoreError>;

    /// Records with fecha in [desde, hasta], ordered by (fecha, hora) ascending.
    async fn listar_asistencias(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<Asistencia>, StoreError>;
}
