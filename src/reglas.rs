//! Sequential ordering rule for the four daily attendance events.

use std::collections::HashSet;

use crate::model::asistencia::TipoAsistencia;

/// Required predecessor for each event kind. `entrada` opens the day and has
/// none; every other kind requires the previous one to exist for the same
/// employee and date.
pub fn predecesor_requerido(tipo: TipoAsistencia) -> Option<TipoAsistencia> {
    match tipo {
        TipoAsistencia::Entrada => None,
        TipoAsistencia::SalidaAlmuerzo => Some(TipoAsistencia::Entrada),
        TipoAsistencia::EntradaAlmuerzo => Some(TipoAsistencia::SalidaAlmuerzo),
        TipoAsistencia::Salida => Some(TipoAsistencia::EntradaAlmuerzo),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluacionSecuencia {
    Ok,
    YaRegistrado,
    FaltaPredecesor(TipoAsistencia),
}

/// Checks a candidate kind against the set of kinds already recorded for the
/// employee on the current date. Pure lookup, no cross-day state.
pub fn evaluar_secuencia(
    tipo: TipoAsistencia,
    registrados_hoy: &HashSet<TipoAsistencia>,
) -> EvaluacionSecuencia {
    if registrados_hoy.contains(&tipo) {
        return EvaluacionSecuencia::YaRegistrado;
    }

    match predecesor_requerido(tipo) {
        Some(previo) if !registrados_hoy.contains(&previo) => {
            EvaluacionSecuencia::FaltaPredecesor(previo)
        }
        _ => EvaluacionSecuencia::Ok,
    }
}
