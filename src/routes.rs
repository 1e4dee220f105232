use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{middleware, web, App, Error};

use crate::config::CorsPolicy;
use crate::handlers::{self, AppState};

/// Builds the application with the routes, CORS policy and shared state.
pub fn build_app(
    state: web::Data<AppState>,
    cors: CorsPolicy,
    allowed_origin: &str,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let api_cors = cors.api_cors(allowed_origin);
    let allowed_origin = allowed_origin.to_owned();

    App::new()
        .app_data(state)
        .wrap(cors.app_cors())
        .wrap(middleware::Logger::default())
        .service(web::resource("/api").to(handlers::redirect_to_api_root))
        .service(
            web::scope("/api")
                .wrap(api_cors)
                .wrap_fn(move |mut req, srv| {
                    if !cors.is_open() {
                        drop_foreign_origin(&mut req, &allowed_origin);
                    }
                    srv.call(req)
                })
                .service(web::resource("/").route(web::get().to(handlers::get_example)))
                .service(
                    web::resource("/upload_image").route(web::post().to(handlers::upload_image)),
                )
                .service(
                    web::resource("/post_example").route(web::post().to(handlers::post_example)),
                ),
        )
        .service(web::resource("/").route(web::get().to(handlers::serve_interface)))
        .default_service(web::route().to(handlers::not_found))
}

/// Requests from other origins are served without CORS headers instead of
/// being rejected, so same-origin pages keep working.
fn drop_foreign_origin(req: &mut ServiceRequest, allowed_origin: &str) {
    let foreign = req
        .headers()
        .get(header::ORIGIN)
        .map(|origin| origin.as_bytes() != allowed_origin.as_bytes())
        .unwrap_or(false);

    if foreign {
        req.headers_mut().remove(header::ORIGIN);
    }
}
