use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DNI_LARGO: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "dni": "12345678",
        "nombre": "JUAN PEREZ",
        "cargo": "Operario",
        "created_at": "2025-01-15T14:30:00Z"
    })
)]
pub struct Empleado {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = "12345678")]
    pub dni: String,

    #[schema(example = "JUAN PEREZ")]
    pub nombre: String,

    #[schema(example = "Operario")]
    pub cargo: String,

    #[schema(example = "2025-01-15T14:30:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A DNI is exactly eight ASCII digits.
pub fn dni_valido(dni: &str) -> bool {
    dni.len() == DNI_LARGO && dni.bytes().all(|b| b.is_ascii_digit())
}
