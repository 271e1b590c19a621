mod common;

use actix_web::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskdesk::models::DashboardStats;

use common::{create_task, get, init_app, register, state, update_task};

fn stats(body: Value) -> DashboardStats {
    serde_json::from_value(body).expect("dashboard stats")
}

#[test_log::test(actix_rt::test)]
async fn test_employee_stats_are_scoped() {
    let app = init_app(state()).await;
    let manager = register(&app, "manager@example.com", "manager").await;
    let employee = register(&app, "worker@example.com", "employee").await;
    let other = register(&app, "other@example.com", "employee").await;

    let mut ids = Vec::new();
    for title in ["one", "two", "three"] {
        let task = create_task(
            &app,
            &manager,
            json!({ "title": title, "assigned_to": employee.id() }),
        )
        .await;
        ids.push(task["id"].as_str().unwrap().to_string());
    }
    create_task(&app, &manager, json!({ "title": "theirs", "assigned_to": other.id() })).await;

    let (status, _) = update_task(&app, &employee, &ids[1], json!({ "status": "completed" })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = update_task(&app, &employee, &ids[2], json!({ "status": "in_progress" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, &employee, "/api/dashboard/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats(body),
        DashboardStats {
            total_employees: 1,
            total_tasks: 3,
            pending_tasks: 1,
            completed_tasks: 1,
            in_progress_tasks: 1,
            overdue_tasks: 0,
        }
    );
}

#[actix_rt::test]
async fn test_global_stats_for_managers_and_admins() {
    let app = init_app(state()).await;
    let admin = register(&app, "admin@example.com", "admin").await;
    let manager = register(&app, "manager@example.com", "manager").await;
    let employee = register(&app, "worker@example.com", "employee").await;

    create_task(&app, &manager, json!({ "title": "a", "assigned_to": employee.id() })).await;
    create_task(&app, &employee, json!({ "title": "b" })).await;

    for user in [&admin, &manager] {
        let (status, body) = get(&app, user, "/api/dashboard/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            stats(body),
            DashboardStats {
                total_employees: 3,
                total_tasks: 2,
                pending_tasks: 2,
                completed_tasks: 0,
                in_progress_tasks: 0,
                overdue_tasks: 0,
            }
        );
    }
}

#[actix_rt::test]
async fn test_overdue_excludes_completed_tasks() {
    let app = init_app(state()).await;
    let employee = register(&app, "late@example.com", "employee").await;
    let yesterday = (Utc::now() - Duration::days(1)).to_rfc3339();
    let next_week = (Utc::now() + Duration::days(7)).to_rfc3339();

    let late = create_task(
        &app,
        &employee,
        json!({ "title": "late", "assigned_to": employee.id(), "due_date": yesterday }),
    )
    .await;
    create_task(
        &app,
        &employee,
        json!({ "title": "fine", "assigned_to": employee.id(), "due_date": next_week }),
    )
    .await;

    let (_, body) = get(&app, &employee, "/api/dashboard/stats").await;
    assert_eq!(stats(body).overdue_tasks, 1);

    let (status, _) = update_task(
        &app,
        &employee,
        late["id"].as_str().unwrap(),
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&app, &employee, "/api/dashboard/stats").await;
    let after = stats(body);
    assert_eq!(after.overdue_tasks, 0);
    assert_eq!(after.completed_tasks, 1);
}

#[actix_rt::test]
async fn test_stats_require_a_token() {
    let app = init_app(state()).await;
    let req = actix_web::test::TestRequest::get()
        .uri("/api/dashboard/stats")
        .to_request();
    let (status, body) = common::send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
}
