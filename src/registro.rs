//! Attendance registration workflow: input validation, geofence check,
//! employee lookup, duplicate/order check, insert. The order of the checks is
//! observable through the returned error and must not change.

use chrono::Timelike;
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::geo::Geocerca;
use crate::model::asistencia::{Asistencia, NuevaAsistencia, TipoAsistencia};
use crate::reglas::{EvaluacionSecuencia, evaluar_secuencia};
use crate::store::{AsistenciaStore, StoreError};
use crate::utils::fechas::ahora_lima;

/// Raw request body. Fields are optional so that a missing field is reported
/// as "Faltan campos requeridos" instead of a deserialization error, matching
/// the precedence of the checks below.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistroAsistenciaPayload {
    #[schema(example = "12345678")]
    pub dni: Option<String>,
    #[schema(example = "entrada")]
    pub tipo: Option<String>,
    #[schema(example = -12.0464)]
    pub latitud: Option<f64>,
    #[schema(example = -77.0428)]
    pub longitud: Option<f64>,
}

#[derive(Debug, Error)]
pub enum RegistroError {
    #[error("Faltan campos requeridos")]
    CamposFaltantes,

    #[error("Tipo de asistencia no válido")]
    TipoInvalido,

    #[error(
        "No estás dentro del rango del almacén. Distancia: {distancia}m (máximo: {maximo}m)"
    )]
    FueraDeRango { distancia: i64, maximo: u32 },

    #[error("DNI no registrado. Contacte al administrador.")]
    EmpleadoDesconocido,

    #[error("Ya registraste tu {} hoy.", .0.etiqueta())]
    YaRegistrado(TipoAsistencia),

    #[error("Debes registrar \"{}\" primero.", .0.etiqueta())]
    FaltaPrevio(TipoAsistencia),

    #[error("Error al registrar asistencia")]
    Almacenamiento(#[from] StoreError),
}

pub async fn registrar_asistencia<S: AsistenciaStore + ?Sized>(
    store: &S,
    geocerca: &Geocerca,
    payload: &RegistroAsistenciaPayload,
) -> Result<Asistencia, RegistroError> {
    // 1. Required fields.
    let dni = payload
        .dni
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or(RegistroError::CamposFaltantes)?;
    let tipo_crudo = payload
        .tipo
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(RegistroError::CamposFaltantes)?;
    let latitud = payload.latitud.ok_or(RegistroError::CamposFaltantes)?;
    let longitud = payload.longitud.ok_or(RegistroError::CamposFaltantes)?;

    // 2. Recognized event kind.
    let tipo: TipoAsistencia = tipo_crudo
        .parse()
        .map_err(|_| RegistroError::TipoInvalido)?;

    // 3. Inside the warehouse perimeter.
    let ubicacion = geocerca.evaluar(latitud, longitud);
    if !ubicacion.dentro_de_rango {
        return Err(RegistroError::FueraDeRango {
            distancia: ubicacion.distancia_metros,
            maximo: geocerca.radio_maximo_metros,
        });
    }

    // 4. Known employee.
    let empleado = store
        .buscar_empleado(dni)
        .await?
        .ok_or(RegistroError::EmpleadoDesconocido)?;

    // 5/6. Duplicate and ordering checks against today's records. Date and
    // time come from the server clock so a device clock cannot spoof them.
    let ahora = ahora_lima();
    let fecha = ahora.date_naive();
    let hora = ahora.time().with_nanosecond(0).unwrap_or_else(|| ahora.time());

    let registrados = store.tipos_del_dia(dni, fecha).await?;
    match evaluar_secuencia(tipo, &registrados) {
        EvaluacionSecuencia::YaRegistrado => return Err(RegistroError::YaRegistrado(tipo)),
        EvaluacionSecuencia::FaltaPredecesor(previo) => {
            return Err(RegistroError::FaltaPrevio(previo));
        }
        EvaluacionSecuencia::Ok => {}
    }

    // 7. Insert, with the employee name denormalized onto the record. A
    // concurrent request may have slipped past the check above; the unique
    // key on (dni, fecha, tipo) turns that into a duplicate report.
    match store
        .insertar_asistencia(NuevaAsistencia {
            empleado_id: empleado.id,
            dni: dni.to_string(),
            nombre: empleado.nombre,
            fecha,
            hora,
            tipo,
            latitud,
            longitud,
        })
        .await
    {
        Ok(asistencia) => Ok(asistencia),
        Err(StoreError::Duplicado) => Err(RegistroError::YaRegistrado(tipo)),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::empleado::Empleado;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// In-memory stand-in for the database, with the same uniqueness
    /// behavior on (dni, fecha, tipo) and on dni.
    #[derive(Default)]
    struct StoreEnMemoria {
        empleados: Mutex<Vec<Empleado>>,
        asistencias: Mutex<Vec<Asistencia>>,
    }

    impl StoreEnMemoria {
        fn con_empleado(dni: &str, nombre: &str) -> Self {
            let store = Self::default();
            store.empleados.lock().unwrap().push(Empleado {
                id: 1,
                dni: dni.to_string(),
                nombre: nombre.to_string(),
                cargo: "Operario".to_string(),
                created_at: None,
            });
            store
        }
    }

    #[async_trait]
    impl AsistenciaStore for StoreEnMemoria {
        async fn buscar_empleado(&self, dni: &str) -> Result<Option<Empleado>, StoreError> {
            Ok(self
                .empleados
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.dni == dni)
                .cloned())
        }

        async fn insertar_empleado(
            &self,
            dni: &str,
            nombre: &str,
            cargo: &str,
        ) -> Result<Empleado, StoreError> {
            let mut empleados = self.empleados.lock().unwrap();
            if empleados.iter().any(|e| e.dni == dni) {
                return Err(StoreError::Duplicado);
            }
            let empleado = Empleado {
                id: empleados.len() as u64 + 1,
                dni: dni.to_string(),
                nombre: nombre.to_string(),
                cargo: cargo.to_string(),
                created_at: None,
            };
            empleados.push(empleado.clone());
            Ok(empleado)
        }

        async fn listar_empleados(&self) -> Result<Vec<Empleado>, StoreError> {
            let mut empleados = self.empleados.lock().unwrap().clone();
            empleados.sort_by(|a, b| a.nombre.cmp(&b.nombre));
            Ok(empleados)
        }

        async fn tipos_del_dia(
            &self,
            dni: &str,
            fecha: NaiveDate,
        ) -> Result<HashSet<TipoAsistencia>, StoreError> {
            Ok(self
                .asistencias
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.dni == dni && a.fecha == fecha)
                .map(|a| a.tipo)
                .collect())
        }

        async fn insertar_asistencia(
            &self,
            nueva: NuevaAsistencia,
        ) -> Result<Asistencia, StoreError> {
            let mut asistencias = self.asistencias.lock().unwrap();
            if asistencias
                .iter()
                .any(|a| a.dni == nueva.dni && a.fecha == nueva.fecha && a.tipo == nueva.tipo)
            {
                return Err(StoreError::Duplicado);
            }
            let asistencia = Asistencia {
                id: asistencias.len() as u64 + 1,
                empleado_id: nueva.empleado_id,
                dni: nueva.dni,
                nombre: nueva.nombre,
                fecha: nueva.fecha,
                hora: nueva.hora,
                tipo: nueva.tipo,
                latitud: nueva.latitud,
                longitud: nueva.longitud,
                created_at: None,
            };
            asistencias.push(asistencia.clone());
            Ok(asistencia)
        }

        async fn listar_asistencias(
            &self,
            desde: NaiveDate,
            hasta: NaiveDate,
        ) -> Result<Vec<Asistencia>, StoreError> {
            let mut filas: Vec<Asistencia> = self
                .asistencias
                .lock()
                .unwrap()
                .iter()
                .filter(|a| a.fecha >= desde && a.fecha <= hasta)
                .cloned()
                .collect();
            filas.sort_by(|a, b| (a.fecha, a.hora).cmp(&(b.fecha, b.hora)));
            Ok(filas)
        }
    }

    const DNI: &str = "12345678";

    fn geocerca() -> Geocerca {
        Geocerca {
            latitud: -12.0464,
            longitud: -77.0428,
            radio_maximo_metros: 100,
        }
    }

    fn payload(tipo: &str) -> RegistroAsistenciaPayload {
        RegistroAsistenciaPayload {
            dni: Some(DNI.to_string()),
            tipo: Some(tipo.to_string()),
            latitud: Some(-12.0464),
            longitud: Some(-77.0428),
        }
    }

    #[actix_web::test]
    async fn entrada_exitosa_con_nombre_denormalizado() {
        let store = StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ");
        let registro = registrar_asistencia(&store, &geocerca(), &payload("entrada"))
            .await
            .unwrap();
        assert_eq!(registro.dni, DNI);
        assert_eq!(registro.nombre, "JUAN PEREZ");
        assert_eq!(registro.tipo, TipoAsistencia::Entrada);
        assert_eq!(registro.latitud, -12.0464);
    }

    #[actix_web::test]
    async fn repetir_entrada_es_duplicado() {
        let store = StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ");
        registrar_asistencia(&store, &geocerca(), &payload("entrada"))
            .await
            .unwrap();
        let err = registrar_asistencia(&store, &geocerca(), &payload("entrada"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistroError::YaRegistrado(TipoAsistencia::Entrada)
        ));
        assert_eq!(err.to_string(), "Ya registraste tu Entrada hoy.");
    }

    #[actix_web::test]
    async fn salida_almuerzo_sin_entrada_nombra_el_previo() {
        let store = StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ");
        let err = registrar_asistencia(&store, &geocerca(), &payload("salida_almuerzo"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistroError::FaltaPrevio(TipoAsistencia::Entrada)
        ));
        assert_eq!(err.to_string(), "Debes registrar \"Entrada\" primero.");
    }

    #[actix_web::test]
    async fn dia_completo_en_orden() {
        let store = StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ");
        for tipo in ["entrada", "salida_almuerzo", "entrada_almuerzo", "salida"] {
            registrar_asistencia(&store, &geocerca(), &payload(tipo))
                .await
                .unwrap();
        }
        assert_eq!(store.asistencias.lock().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn dni_desconocido_con_gps_valido() {
        let store = StoreEnMemoria::default();
        let err = registrar_asistencia(&store, &geocerca(), &payload("entrada"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistroError::EmpleadoDesconocido));
    }

    #[actix_web::test]
    async fn campos_faltantes() {
        let store = StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ");
        let mut p = payload("entrada");
        p.latitud = None;
        let err = registrar_asistencia(&store, &geocerca(), &p)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistroError::CamposFaltantes));

        let mut p = payload("entrada");
        p.dni = Some(String::new());
        let err = registrar_asistencia(&store, &geocerca(), &p)
            .await
            .unwrap_err();
        assert!(matches!(err, RegistroError::CamposFaltantes));
    }

    #[actix_web::test]
    async fn tipo_no_reconocido() {
        let store = StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ");
        let err = registrar_asistencia(&store, &geocerca(), &payload("almuerzo"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistroError::TipoInvalido));
    }

    #[actix_web::test]
    async fn fuera_de_rango_antes_que_dni_desconocido() {
        // Empty roster: the geofence check still fires first.
        let store = StoreEnMemoria::default();
        let lejos = RegistroAsistenciaPayload {
            dni: Some(DNI.to_string()),
            tipo: Some("entrada".to_string()),
            latitud: Some(-12.5),
            longitud: Some(-77.0428),
        };
        let err = registrar_asistencia(&store, &geocerca(), &lejos)
            .await
            .unwrap_err();
        match err {
            RegistroError::FueraDeRango { distancia, maximo } => {
                assert!(distancia > 100);
                assert_eq!(maximo, 100);
            }
            otro => panic!("se esperaba FueraDeRango, fue {otro:?}"),
        }
    }

    #[actix_web::test]
    async fn duplicado_en_el_insert_tambien_se_reporta() {
        // Simulates losing the race: the kind is absent from tipos_del_dia
        // but the insert hits the unique key.
        struct StoreConCarrera(StoreEnMemoria);

        #[async_trait]
        impl AsistenciaStore for StoreConCarrera {
            async fn buscar_empleado(&self, dni: &str) -> Result<Option<Empleado>, StoreError> {
                self.0.buscar_empleado(dni).await
            }
            async fn insertar_empleado(
                &self,
                dni: &str,
                nombre: &str,
                cargo: &str,
            ) -> Result<Empleado, StoreError> {
                self.0.insertar_empleado(dni, nombre, cargo).await
            }
            async fn listar_empleados(&self) -> Result<Vec<Empleado>, StoreError> {
                self.0.listar_empleados().await
            }
            async fn tipos_del_dia(
                &self,
                _dni: &str,
                _fecha: NaiveDate,
            ) -> Result<HashSet<TipoAsistencia>, StoreError> {
                Ok(HashSet::new())
            }
            async fn insertar_asistencia(
                &self,
                _nueva: NuevaAsistencia,
            ) -> Result<Asistencia, StoreError> {
                Err(StoreError::Duplicado)
            }
            async fn listar_asistencias(
                &self,
                desde: NaiveDate,
                hasta: NaiveDate,
            ) -> Result<Vec<Asistencia>, StoreError> {
                self.0.listar_asistencias(desde, hasta).await
            }
        }

        let store = StoreConCarrera(StoreEnMemoria::con_empleado(DNI, "JUAN PEREZ"));
        let err = registrar_asistencia(&store, &geocerca(), &payload("entrada"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistroError::YaRegistrado(TipoAsistencia::Entrada)
        ));
    }
}
