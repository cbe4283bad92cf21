//! Geofence evaluation for the warehouse perimeter.

/// Spherical Earth approximation, in meters.
const RADIO_TIERRA_METROS: f64 = 6_371_000.0;

/// Fixed reference point plus allowed radius, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct Geocerca {
    pub latitud: f64,
    pub longitud: f64,
    pub radio_maximo_metros: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct EvaluacionGeocerca {
    pub dentro_de_rango: bool,
    pub distancia_metros: i64,
}

/// Great-circle distance between two coordinates using the haversine formula.
pub fn distancia_metros(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    RADIO_TIERRA_METROS * c
}

impl Geocerca {
    /// Distance is rounded to the nearest whole meter; in range iff it does
    /// not exceed the configured radius.
    pub fn evaluar(&self, latitud: f64, longitud: f64) -> EvaluacionGeocerca {
        let distancia =
            distancia_metros(latitud, longitud, self.latitud, self.longitud).round() as i64;
        EvaluacionGeocerca {
            dentro_de_rango: distancia <= self.radio_maximo_metros as i64,
            distancia_metros: distancia,
        }
    }
}
