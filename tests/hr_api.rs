#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use hrm_portal::clock::ManualClock;
use serde_json::{Value, json};

#[actix_web::test]
async fn employee_directory_crud_and_search() {
    let clock = ManualClock::at("2026-02-02", "10:00");
    let app = test_app!(clock);

    for (name, department) in [("Ana Silva", "Engineering"), ("Bob Stone", "Sales")] {
        let req = TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({
                "name": name,
                "email": format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
                "department": department,
                "designation": "Engineer",
                "join_date": "2025-06-01"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = TestRequest::get().uri("/api/employees?search=silva").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    let ana = page["data"][0].clone();
    assert!(ana["employee_code"].as_str().unwrap().starts_with("EMP"));
    assert_eq!(ana["status"], "active");

    let id = ana["id"].as_str().unwrap();
    let req = TestRequest::put()
        .uri(&format!("/api/employees/{}", id))
        .set_json(json!({ "status": "on-leave" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "on-leave");
    assert_eq!(updated["name"], "Ana Silva");

    let req = TestRequest::delete()
        .uri(&format!("/api/employees/{}", id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = TestRequest::get()
        .uri(&format!("/api/employees/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Employee not found" }));
}

#[actix_web::test]
async fn leave_is_decided_once() {
    let clock = ManualClock::at("2026-02-02", "10:00");
    let app = test_app!(clock);

    let req = TestRequest::post()
        .uri("/api/leave")
        .set_json(json!({
            "employee_id": "E1",
            "leave_type": "sick",
            "start_date": "2026-02-03",
            "end_date": "2026-02-04",
            "reason": "Flu"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let leave: Value = test::read_body_json(resp).await;
    assert_eq!(leave["status"], "pending");
    let id = leave["id"].as_str().unwrap();

    let req = TestRequest::put()
        .uri(&format!("/api/leave/{}/approve", id))
        .set_json(json!({ "approved_by": "HR Manager" }))
        .to_request();
    let approved: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approved_by"], "HR Manager");

    let req = TestRequest::put()
        .uri(&format!("/api/leave/{}/reject", id))
        .set_json(json!({ "approved_by": "HR Manager" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Leave request already processed" }));

    let req = TestRequest::get().uri("/api/leave?status=pending").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 0);
}

#[actix_web::test]
async fn payroll_process_update_and_totals() {
    let clock = ManualClock::at("2026-02-02", "10:00");
    let app = test_app!(clock);

    let req = TestRequest::post()
        .uri("/api/payroll/process")
        .set_json(json!({
            "employee_id": "E1",
            "month": "2026-01-15",
            "basic_salary": 50000.0,
            "allowances": { "hra": 5000.0, "transport": 1000.0 },
            "deductions": { "tax": 3000.0 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let payroll: Value = test::read_body_json(resp).await;
    assert_eq!(payroll["month"], "2026-01-01");
    assert_eq!(payroll["net_pay"], 53000.0);
    assert_eq!(payroll["status"], "processed");

    let req = TestRequest::put()
        .uri(&format!("/api/payroll/{}", payroll["id"].as_str().unwrap()))
        .set_json(json!({ "deductions": { "tax": 4000.0 }, "status": "paid" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["net_pay"], 52000.0);
    assert_eq!(updated["status"], "paid");

    let req = TestRequest::get().uri("/api/payroll/totals").to_request();
    let totals: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(totals[0]["month"], "2026-01-01");
    assert_eq!(totals[0]["gross_pay"], 56000.0);
    assert_eq!(totals[0]["net_pay"], 52000.0);

    let req = TestRequest::post()
        .uri("/api/payroll")
        .set_json(json!({ "employee_id": "E1", "month": "2026-01-01", "basic_salary": 1.0 }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn dashboard_reflects_todays_activity() {
    let clock = ManualClock::at("2026-02-02", "09:00");
    let app = test_app!(clock);

    let req = TestRequest::post()
        .uri("/api/attendance/check-in")
        .set_json(json!({ "employee_id": "E1" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::post()
        .uri("/api/attendance")
        .set_json(json!({ "employee_id": "E2", "date": "2026-02-02", "status": "absent" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = TestRequest::get().uri("/api/reports/dashboard").to_request();
    let dashboard: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        dashboard,
        json!({
            "total_employees": 0,
            "present_today": 1,
            "absent_today": 1,
            "pending_leaves": 0
        })
    );

    let req = TestRequest::get()
        .uri("/api/reports/attendance-trend?months=2")
        .to_request();
    let trend: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        trend,
        json!([
            { "month": "2026-01", "present": 0, "absent": 0, "rate": 0 },
            { "month": "2026-02", "present": 1, "absent": 1, "rate": 50 }
        ])
    );
}
