/// API mounted under `/api` on empty in-memory stores, driven by the given
/// `ManualClock`.
macro_rules! test_app {
    ($clock:expr) => {{
        let state = actix_web::web::Data::new(hrm_portal::service::AppState::new(
            hrm_portal::store::Stores::in_memory(),
            std::sync::Arc::new($clock.clone()),
        ));
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(state)
                .service(actix_web::web::scope("/api").configure(hrm_portal::routes::api)),
        )
        .await
    }};
}
