use crate::{
    api::{attendance, employee, leave_request, payroll, report},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-IP limiter allowing `requests_per_min` requests per minute with the
/// whole minute's budget available as burst.
pub fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap_or_else(GovernorConfig::default);
    Governor::new(&cfg)
}

/// Mounts the API under the configured prefix behind the rate limiter.
pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(build_limiter(config.rate_protected_per_min))
            .configure(api),
    );
}

/// Every API resource, relative to the prefix.
pub fn api(cfg: &mut web::ServiceConfig) {
    // malformed bodies and query strings get the usual {"message": ...} shape
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::bad_request(err.to_string()).into()),
    );

    cfg.service(
        web::scope("/attendance")
            // /attendance
            .service(
                web::resource("")
                    .route(web::get().to(attendance::list_attendance))
                    .route(web::post().to(attendance::create_attendance)),
            )
            .service(web::resource("/check-in").route(web::post().to(attendance::check_in)))
            .service(web::resource("/check-out").route(web::post().to(attendance::check_out)))
            // registered before /{id} so it is not taken for an id
            .service(web::resource("/summary").route(web::get().to(attendance::attendance_summary)))
            // /attendance/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(attendance::get_attendance))
                    .route(web::delete().to(attendance::delete_attendance)),
            )
            .service(web::resource("/{id}/status").route(web::put().to(attendance::correct_status))),
    )
    .service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::post().to(employee::create_employee))
                    .route(web::get().to(employee::list_employees)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::put().to(employee::update_employee))
                    .route(web::get().to(employee::get_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/leave")
            // /leave
            .service(
                web::resource("")
                    .route(web::get().to(leave_request::leave_list))
                    .route(web::post().to(leave_request::create_leave)),
            )
            // /leave/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(leave_request::get_leave))
                    .route(web::delete().to(leave_request::delete_leave)),
            )
            // /leave/{id}/approve
            .service(
                web::resource("/{id}/approve").route(web::put().to(leave_request::approve_leave)),
            )
            // /leave/{id}/reject
            .service(web::resource("/{id}/reject").route(web::put().to(leave_request::reject_leave))),
    )
    .service(
        web::scope("/payroll")
            // /payroll
            .service(
                web::resource("")
                    .route(web::post().to(payroll::create_payroll))
                    .route(web::get().to(payroll::list_payrolls)),
            )
            .service(web::resource("/process").route(web::post().to(payroll::process_payroll)))
            .service(web::resource("/totals").route(web::get().to(payroll::payroll_totals)))
            // /payroll/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(payroll::get_payroll))
                    .route(web::put().to(payroll::update_payroll))
                    .route(web::delete().to(payroll::delete_payroll)),
            ),
    )
    .service(
        web::scope("/reports")
            .service(web::resource("/dashboard").route(web::get().to(report::dashboard)))
            .service(
                web::resource("/attendance-trend").route(web::get().to(report::attendance_trend)),
            )
            .service(
                web::resource("/departments").route(web::get().to(report::department_distribution)),
            )
            .service(
                web::resource("/leave-types").route(web::get().to(report::leave_type_distribution)),
            )
            .service(web::resource("/payroll").route(web::get().to(report::monthly_payroll))),
    );
}
