use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::asistencia::{Asistencia, NuevaAsistencia, TipoAsistencia};
use crate::model::empleado::Empleado;
use crate::store::{AsistenciaStore, StoreError};

pub async fn init_db(database_url: &str) -> MySqlPool {
    MySqlPool::connect(database_url)
        .await
        .expect("Failed to connect to database")
}

/// MySQL-backed store. Uniqueness of (dni, fecha, tipo) and of dni is
/// enforced by the schema (see migrations); SQLSTATE 23000 is translated to
/// `StoreError::Duplicado`.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("23000") {
            return StoreError::Duplicado;
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl AsistenciaStore for MySqlStore {
    async fn buscar_empleado(&self, dni: &str) -> Result<Option<Empleado>, StoreError> {
        let empleado = sqlx::query_as::<_, Empleado>(
            r#"
            SELECT id, dni, nombre, cargo, created_at
            FROM empleados
            WHERE dni = ?
            "#,
        )
        .bind(dni)
        .fetch_optional(&self.pool)
        .await?;

        Ok(empleado)
    }

    async fn insertar_empleado(
        &self,
        dni: &str,
        nombre: &str,
        cargo: &str,
    ) -> Result<Empleado, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO empleados (dni, nombre, cargo)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(dni)
        .bind(nombre)
        .bind(cargo)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        // MySQL has no RETURNING; read the row back for id/created_at.
        let empleado = sqlx::query_as::<_, Empleado>(
            r#"
            SELECT id, dni, nombre, cargo, created_at
            FROM empleados
            WHERE dni = ?
            "#,
        )
        .bind(dni)
        .fetch_one(&self.pool)
        .await?;

        Ok(empleado)
    }

    async fn listar_empleados(&self) -> Result<Vec<Empleado>, StoreError> {
        let empleados = sqlx::query_as::<_, Empleado>(
            r#"
            SELECT id, dni, nombre, cargo, created_at
            FROM empleados
            ORDER BY nombre ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(empleados)
    }

    async fn tipos_del_dia(
        &self,
        dni: &str,
        fecha: NaiveDate,
    ) -> Result<HashSet<TipoAsistencia>, StoreError> {
        let tipos = sqlx::query_scalar::<_, TipoAsistencia>(
            r#"
            SELECT tipo FROM asistencias
            WHERE dni = ? AND fecha = ?
            "#,
        )
        .bind(dni)
        .bind(fecha)
        .fetch_all(&self.pool)
        .await?;

        Ok(tipos.into_iter().collect())
    }

    async fn insertar_asistencia(
        &self,
        nueva: NuevaAsistencia,
    ) -> Result<Asistencia, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO asistencias
                (empleado_id, dni, nombre, fecha, hora, tipo, latitud, longitud)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(nueva.empleado_id)
        .bind(&nueva.dni)
        .bind(&nueva.nombre)
        .bind(nueva.fecha)
        .bind(nueva.hora)
        .bind(nueva.tipo)
        .bind(nueva.latitud)
        .bind(nueva.longitud)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        let asistencia = sqlx::query_as::<_, Asistencia>(
            r#"
            SELECT id, empleado_id, dni, nombre, fecha, hora, tipo,
                   latitud, longitud, created_at
            FROM asistencias
            WHERE id = ?
            "#,
        )
        .bind(result.last_insert_id())
        .fetch_one(&self.pool)
        .await?;

        Ok(asistencia)
    }

    async fn listar_asistencias(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<Asistencia>, StoreError> {
        let asistencias = sqlx::query_as::<_, Asistencia>(
            r#"
            SELECT id, empleado_id, dni, nombre, fecha, hora, tipo,
                   latitud, longitud, created_at
            FROM asistencias
            WHERE fecha BETWEEN ? AND ?
            ORDER BY fecha ASC, hora ASC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;

        Ok(asistencias)
    }
}
