use crate::{
    api::{asistencia, empleado, exportar},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let registro_limiter = Arc::new(build_limiter(config.rate_registro_per_min));
    let consulta_limiter = Arc::new(build_limiter(config.rate_consulta_per_min));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/asistencia")
                    // /asistencia
                    .service(
                        web::resource("")
                            .wrap(registro_limiter.clone())
                            .route(web::post().to(asistencia::registrar))
                            .route(web::get().to(asistencia::listar)),
                    )
                    // /asistencia/exportar
                    .service(
                        web::resource("/exportar")
                            .wrap(consulta_limiter.clone())
                            .route(web::get().to(exportar::exportar)),
                    ),
            )
            .service(
                web::scope("/empleados")
                    // /empleados
                    .service(
                        web::resource("")
                            .wrap(consulta_limiter)
                            .route(web::post().to(empleado::crear))
                            .route(web::get().to(empleado::listar)),
                    ),
            ),
    );
}
