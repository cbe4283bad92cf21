use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// The four daily attendance events, in the order they must be registered.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    sqlx::Type,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TipoAsistencia {
    Entrada,
    SalidaAlmuerzo,
    EntradaAlmuerzo,
    Salida,
}

impl TipoAsistencia {
    /// Human-readable label shown in error messages and the export.
    pub fn etiqueta(&self) -> &'static str {
        match self {
            TipoAsistencia::Entrada => "Entrada",
            TipoAsistencia::SalidaAlmuerzo => "Salida Almuerzo",
            TipoAsistencia::EntradaAlmuerzo => "Entrada Almuerzo",
            TipoAsistencia::Salida => "Salida",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "empleado_id": 7,
        "dni": "12345678",
        "nombre": "JUAN PEREZ",
        "fecha": "2025-02-03",
        "hora": "08:01:22",
        "tipo": "entrada",
        "latitud": -12.0464,
        "longitud": -77.0428,
        "created_at": "2025-02-03T13:01:22Z"
    })
)]
pub struct Asistencia {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub empleado_id: u64,

    #[schema(example = "12345678")]
    pub dni: String,

    /// Denormalized copy of the employee name at registration time. Kept on
    /// the record so historical rows do not change if the roster entry is
    /// later corrected.
    #[schema(example = "JUAN PEREZ")]
    pub nombre: String,

    #[schema(example = "2025-02-03", value_type = String, format = "date")]
    pub fecha: NaiveDate,

    #[schema(example = "08:01:22", value_type = String)]
    pub hora: NaiveTime,

    #[schema(example = "entrada")]
    pub tipo: TipoAsistencia,

    #[schema(example = -12.0464)]
    pub latitud: f64,

    #[schema(example = -77.0428)]
    pub longitud: f64,

    #[schema(example = "2025-02-03T13:01:22Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Row handed to the store for insertion; the store assigns id/created_at.
#[derive(Debug, Clone)]
pub struct NuevaAsistencia {
    pub empleado_id: u64,
    pub dni: String,
    pub nombre: String,
    pub fecha: NaiveDate,
    pub hora: NaiveTime,
    pub tipo: TipoAsistencia,
    pub latitud: f64,
    pub longitud: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tipo_round_trips_wire_values() {
        for (tipo, wire) in [
            (TipoAsistencia::Entrada, "entrada"),
            (TipoAsistencia::SalidaAlmuerzo, "salida_almuerzo"),
            (TipoAsistencia::EntradaAlmuerzo, "entrada_almuerzo"),
            (TipoAsistencia::Salida, "salida"),
        ] {
            assert_eq!(tipo.to_string(), wire);
            assert_eq!(wire.parse::<TipoAsistencia>().unwrap(), tipo);
        }
    }

    #[test]
    fn tipo_rejects_unknown_value() {
        assert!("almuerzo".parse::<TipoAsistencia>().is_err());
    }

    #[test]
    fn etiquetas() {
        assert_eq!(TipoAsistencia::SalidaAlmuerzo.etiqueta(), "Salida Almuerzo");
        assert_eq!(TipoAsistencia::Salida.etiqueta(), "Salida");
    }
}
