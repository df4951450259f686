//! Login, logout and the /me echo, plus the full cookie-and-bearer flow.

use actix_web::cookie::Cookie;
use actix_web::cookie::time::Duration;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use minimall_admin_lib::api::configure_auth_routes;
use minimall_admin_lib::config::ADMIN_TOKEN_COOKIE;
use minimall_admin_lib::error::ErrorResponse;
use minimall_admin_lib::middleware::{AdminPageGate, ApiAuthGate};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_login_sets_session_cookie() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool_for_login(user_model_with_password(
                Some("admin"),
                "correct-horse",
            ))))
            .app_data(web::Data::new(test_config()))
            .service(web::scope("/api/admin/auth").configure(configure_auth_routes)),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/admin/auth/login")
        .set_json(serde_json::json!({
            "username": TEST_USERNAME,
            "password": "correct-horse",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);

    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == ADMIN_TOKEN_COOKIE)
        .expect("login should set the session cookie");
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    let body: serde_json::Value = test::read_body_json(res).await;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["username"], TEST_USERNAME);
    assert_eq!(body["user"]["role"], "admin");
}

/// Wrong password and unknown username produce byte-identical refusals.
#[actix_rt::test]
async fn test_login_failures_are_uniform() {
    let mut bodies = Vec::new();

    for pool in [
        pool_for_login(user_model_with_password(Some("admin"), "correct-horse")),
        pool_with_no_user(),
    ] {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(test_config()))
                .service(web::scope("/api/admin/auth").configure(configure_auth_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/auth/login")
            .set_json(serde_json::json!({
                "username": TEST_USERNAME,
                "password": "wrong-password",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: ErrorResponse = test::read_body_json(res).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0].message, "Invalid username or password");
    assert_eq!(bodies[0].error, bodies[1].error);
    assert_eq!(bodies[0].message, bodies[1].message);
}

#[actix_rt::test]
async fn test_logout_clears_cookie() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_config()))
            .service(web::scope("/api/admin/auth").configure(configure_auth_routes)),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/admin/auth/logout").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == ADMIN_TOKEN_COOKIE)
        .expect("logout should overwrite the session cookie");
    assert!(cookie.value().is_empty());
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

#[actix_rt::test]
async fn test_me_requires_token() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool_with_user(user_model(
                Some("admin"),
                Some("alice@example.com"),
            ))))
            .app_data(web::Data::new(test_config()))
            .service(web::scope("/api/admin/auth").configure(configure_auth_routes)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/admin/auth/me").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/admin/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token_for("admin"))))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "alice@example.com");
}

/// The token from a login works as a bearer credential on the API and as a
/// session cookie on admin pages.
#[actix_rt::test]
async fn test_login_token_opens_both_gates() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool_for_login_then_lookup(
                user_model_with_password(Some("admin"), "correct-horse"),
            )))
            .app_data(web::Data::new(test_config()))
            .service(web::scope("/api/admin/auth").configure(configure_auth_routes))
            .service(
                web::scope("/api/admin")
                    .wrap(ApiAuthGate)
                    .route("/whoami", web::get().to(whoami)),
            ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/admin/auth/login")
        .set_json(serde_json::json!({
            "username": TEST_USERNAME,
            "password": "correct-horse",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(res).await;
    let token = body["token"].as_str().expect("login body carries the token").to_string();

    let req = test::TestRequest::get()
        .uri("/api/admin/whoami")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK, "bearer side of the flow");

    let pages = test::init_service(
        App::new()
            .wrap(AdminPageGate)
            .app_data(web::Data::new(test_config()))
            .route("/admin/dashboard", web::get().to(admin_page)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token))
        .to_request();
    let res = test::call_service(&pages, req).await;
    assert_eq!(res.status(), StatusCode::OK, "cookie side of the flow");
}
