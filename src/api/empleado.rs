use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::error;
use utoipa::ToSchema;

use crate::db::MySqlStore;
use crate::model::empleado::dni_valido;
use crate::models::ApiResponse;
use crate::store::{AsistenciaStore, StoreError};

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmpleadoPayload {
    #[schema(example = "12345678")]
    pub dni: Option<String>,
    #[schema(example = "Juan Perez")]
    pub nombre: Option<String>,
    #[schema(example = "Operario")]
    pub cargo: Option<String>,
}

/// Register an employee
#[utoipa::path(
    post,
    path = "/api/empleados",
    request_body = EmpleadoPayload,
    responses(
        (status = 200, description = "Employee created", body = Object, example = json!({
            "success": true,
            "data": {"id": 7, "dni": "12345678", "nombre": "JUAN PEREZ", "cargo": "Operario"}
        })),
        (status = 400, description = "Missing fields or malformed DNI", body = Object, example = json!({
            "success": false, "error": "El DNI debe tener 8 dígitos"
        })),
        (status = 409, description = "DNI already registered", body = Object, example = json!({
            "success": false, "error": "Ya existe un empleado con ese DNI"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Empleados"
)]
pub async fn crear(
    store: web::Data<MySqlStore>,
    payload: web::Json<EmpleadoPayload>,
) -> actix_web::Result<impl Responder> {
    let (Some(dni), Some(nombre), Some(cargo)) = (
        payload.dni.as_deref().filter(|s| !s.is_empty()),
        payload.nombre.as_deref().filter(|s| !s.is_empty()),
        payload.cargo.as_deref().filter(|s| !s.is_empty()),
    ) else {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Todos los campos son requeridos")));
    };

    if !dni_valido(dni) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("El DNI debe tener 8 dígitos")));
    }

    // Names are stored uppercase so roster and records read uniformly.
    match store
        .insertar_empleado(dni, &nombre.to_uppercase(), cargo)
        .await
    {
        Ok(empleado) => Ok(HttpResponse::Ok().json(ApiResponse::ok(empleado))),
        Err(StoreError::Duplicado) => Ok(HttpResponse::Conflict()
            .json(ApiResponse::<()>::error("Ya existe un empleado con ese DNI"))),
        Err(e) => {
            error!(error = %e, dni, "Failed to create employee");
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Error al registrar empleado")))
        }
    }
}

/// Roster listing, ordered by name
#[utoipa::path(
    get,
    path = "/api/empleados",
    responses(
        (status = 200, description = "Employees ordered by nombre", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Empleados"
)]
pub async fn listar(store: web::Data<MySqlStore>) -> actix_web::Result<impl Responder> {
    match store.listar_empleados().await {
        Ok(empleados) => Ok(HttpResponse::Ok().json(ApiResponse::ok(empleados))),
        Err(e) => {
            error!(error = %e, "Failed to list employees");
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Error al obtener empleados")))
        }
    }
}
