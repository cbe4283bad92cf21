use crate::api::empleado::EmpleadoPayload;
use crate::model::asistencia::{Asistencia, TipoAsistencia};
use crate::model::empleado::Empleado;
use crate::registro::RegistroAsistenciaPayload;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Asistencia Almacén API",
        version = "1.0.0",
        description = r#"
## Warehouse attendance tracking

Employees scan a fixed QR code, enter their DNI, allow geolocation and register
one of four sequential daily events: **entrada → salida_almuerzo →
entrada_almuerzo → salida**.

### Rules enforced on registration
- Coordinates must fall inside the warehouse geofence (haversine distance
  against the configured reference point).
- The DNI must belong to a registered employee.
- Each event can be registered once per day, and only after its predecessor.
- Date and time are taken from the server clock (America/Lima), never from
  the device.

### Administration
- Monthly listing and CSV export of attendance records.
- Employee roster registration and listing.

### Response format
Every JSON endpoint wraps its result in `{"success": bool, "data"?, "error"?}`.
"#,
    ),
    paths(
        crate::api::asistencia::registrar,
        crate::api::asistencia::listar,
        crate::api::exportar::exportar,

        crate::api::empleado::crear,
        crate::api::empleado::listar,
    ),
    components(
        schemas(
            Asistencia,
            TipoAsistencia,
            RegistroAsistenciaPayload,
            Empleado,
            EmpleadoPayload,
        )
    ),
    tags(
        (name = "Asistencia", description = "Attendance registration, listing and export"),
        (name = "Empleados", description = "Employee roster APIs"),
    )
)]
pub struct ApiDoc;
