use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::error;
use utoipa::IntoParams;

use crate::config::Config;
use crate::db::MySqlStore;
use crate::models::ApiResponse;
use crate::registro::{RegistroAsistenciaPayload, RegistroError, registrar_asistencia};
use crate::store::AsistenciaStore;
use crate::utils::fechas::rango_mes;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConsultaMensual {
    /// Month number, 1-12
    pub mes: Option<u32>,
    /// Four-digit year
    pub anio: Option<i32>,
}

/// Register one attendance event
#[utoipa::path(
    post,
    path = "/api/asistencia",
    request_body = RegistroAsistenciaPayload,
    responses(
        (status = 200, description = "Attendance registered", body = Object, example = json!({
            "success": true,
            "data": {
                "id": 1, "empleado_id": 7, "dni": "12345678", "nombre": "JUAN PEREZ",
                "fecha": "2025-02-03", "hora": "08:01:22", "tipo": "entrada",
                "latitud": -12.0464, "longitud": -77.0428
            }
        })),
        (status = 400, description = "Missing fields, invalid kind or sequence violation", body = Object, example = json!({
            "success": false, "error": "Debes registrar \"Entrada\" primero."
        })),
        (status = 403, description = "Outside the warehouse geofence", body = Object, example = json!({
            "success": false, "error": "No estás dentro del rango del almacén. Distancia: 512m (máximo: 100m)"
        })),
        (status = 404, description = "Unknown DNI", body = Object),
        (status = 409, description = "Already registered today", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Asistencia"
)]
pub async fn registrar(
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
    payload: web::Json<RegistroAsistenciaPayload>,
) -> actix_web::Result<impl Responder> {
    let geocerca = config.geocerca();

    match registrar_asistencia(store.get_ref(), &geocerca, &payload).await {
        Ok(asistencia) => Ok(HttpResponse::Ok().json(ApiResponse::ok(asistencia))),
        Err(err) => Ok(respuesta_de_error(err)),
    }
}

/// Maps each workflow outcome to the status the original check-in flow used.
fn respuesta_de_error(err: RegistroError) -> HttpResponse {
    let envelope = ApiResponse::<()>::error(err.to_string());
    match err {
        RegistroError::CamposFaltantes
        | RegistroError::TipoInvalido
        | RegistroError::FaltaPrevio(_) => HttpResponse::BadRequest().json(envelope),
        RegistroError::FueraDeRango { .. } => HttpResponse::Forbidden().json(envelope),
        RegistroError::EmpleadoDesconocido => HttpResponse::NotFound().json(envelope),
        RegistroError::YaRegistrado(_) => HttpResponse::Conflict().json(envelope),
        RegistroError::Almacenamiento(e) => {
            error!(error = %e, "Failed to register attendance");
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Error al registrar asistencia"))
        }
    }
}

/// Monthly attendance listing
#[utoipa::path(
    get,
    path = "/api/asistencia",
    params(ConsultaMensual),
    responses(
        (status = 200, description = "Records for the month, ordered by fecha then hora", body = Object),
        (status = 400, description = "Missing or invalid mes/anio", body = Object, example = json!({
            "success": false, "error": "Se requieren mes y año"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Asistencia"
)]
pub async fn listar(
    store: web::Data<MySqlStore>,
    query: web::Query<ConsultaMensual>,
) -> actix_web::Result<impl Responder> {
    let (Some(mes), Some(anio)) = (query.mes, query.anio) else {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Se requieren mes y año")));
    };

    let Some((desde, hasta)) = rango_mes(anio, mes) else {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::<()>::error("Mes o año no válido"))
        );
    };

    match store.listar_asistencias(desde, hasta).await {
        Ok(asistencias) => Ok(HttpResponse::Ok().json(ApiResponse::ok(asistencias))),
        Err(e) => {
            error!(error = %e, mes, anio, "Failed to fetch attendance records");
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Error al obtener asistencias")))
        }
    }
}
