use std::env;

use dotenvy::dotenv;

use crate::geo::Geocerca;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,

    // Warehouse geofence
    pub almacen_latitud: f64,
    pub almacen_longitud: f64,
    pub radio_maximo_metros: u32,

    // Rate limiting
    pub rate_registro_per_min: u32,
    pub rate_consulta_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),

            almacen_latitud: env::var("ALMACEN_LATITUD")
                .expect("ALMACEN_LATITUD must be set")
                .parse()
                .expect("ALMACEN_LATITUD must be a number"),
            almacen_longitud: env::var("ALMACEN_LONGITUD")
                .expect("ALMACEN_LONGITUD must be set")
                .parse()
                .expect("ALMACEN_LONGITUD must be a number"),
            radio_maximo_metros: env::var("RADIO_MAXIMO_METROS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap(),

            rate_registro_per_min: env::var("RATE_REGISTRO_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_consulta_per_min: env::var("RATE_CONSULTA_PER_MIN")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }

    pub fn geocerca(&self) -> Geocerca {
        Geocerca {
            latitud: self.almacen_latitud,
            longitud: self.almacen_longitud,
            radio_maximo_metros: self.radio_maximo_metros,
        }
    }
}
