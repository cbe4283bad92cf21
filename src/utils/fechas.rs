use chrono::{DateTime, FixedOffset, Months, NaiveDate, Utc};

/// America/Lima is UTC-5 year-round (Peru does not observe DST), so a fixed
/// offset is sufficient.
const LIMA_OFFSET_SEGUNDOS: i32 = -5 * 3600;

pub const MESES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Server-side clock in the warehouse timezone. Registration always uses this,
/// never a client-supplied timestamp.
pub fn ahora_lima() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(LIMA_OFFSET_SEGUNDOS).expect("offset fijo válido");
    Utc::now().with_timezone(&offset)
}

/// First and last day of a calendar month, or None if mes/anio do not name a
/// real month.
pub fn rango_mes(anio: i32, mes: u32) -> Option<(NaiveDate, NaiveDate)> {
    let primero = NaiveDate::from_ymd_opt(anio, mes, 1)?;
    let ultimo = primero.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((primero, ultimo))
}

/// "Febrero", given fecha 2025-02-xx.
pub fn nombre_mes(mes: u32) -> Option<&'static str> {
    MESES.get((mes as usize).checked_sub(1)?).copied()
}
