use actix_web::{HttpResponse, Responder, web};
use tracing::error;

use crate::api::asistencia::ConsultaMensual;
use crate::db::MySqlStore;
use crate::model::asistencia::Asistencia;
use crate::models::ApiResponse;
use crate::store::AsistenciaStore;
use crate::utils::fechas::{nombre_mes, rango_mes};

/// Fixed column layout expected by the administrators' spreadsheet.
fn generar_csv(registros: &[Asistencia]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "DNI", "Nombre", "Fecha", "Hora", "Tipo", "Latitud", "Longitud",
    ])?;

    for r in registros {
        writer.write_record(&[
            r.dni.clone(),
            r.nombre.clone(),
            r.fecha.format("%Y-%m-%d").to_string(),
            r.hora.format("%H:%M:%S").to_string(),
            r.tipo.etiqueta().to_string(),
            r.latitud.to_string(),
            r.longitud.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Monthly spreadsheet export
#[utoipa::path(
    get,
    path = "/api/asistencia/exportar",
    params(ConsultaMensual),
    responses(
        (status = 200, description = "CSV attachment with the month's records",
         content_type = "text/csv"),
        (status = 400, description = "Missing or invalid mes/anio", body = Object),
        (status = 500, description = "Internal server error")
    ),
    tag = "Asistencia"
)]
pub async fn exportar(
    store: web::Data<MySqlStore>,
    query: web::Query<ConsultaMensual>,
) -> actix_web::Result<impl Responder> {
    let (Some(mes), Some(anio)) = (query.mes, query.anio) else {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("Se requieren mes y año")));
    };

    let (Some((desde, hasta)), Some(mes_nombre)) = (rango_mes(anio, mes), nombre_mes(mes))
    else {
        return Ok(
            HttpResponse::BadRequest().json(ApiResponse::<()>::error("Mes o año no válido"))
        );
    };

    let registros = match store.listar_asistencias(desde, hasta).await {
        Ok(registros) => registros,
        Err(e) => {
            error!(error = %e, mes, anio, "Failed to fetch records for export");
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Error al generar el archivo")));
        }
    };

    let cuerpo = match generar_csv(&registros) {
        Ok(cuerpo) => cuerpo,
        Err(e) => {
            error!(error = %e, "Failed to serialize export");
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Error al generar el archivo")));
        }
    };

    let filename = format!("asistencia_{mes_nombre}_{anio}.csv");
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(cuerpo))
}
