//! Admin page gate: session cookie checks and login redirects.

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use minimall_admin_lib::config::ADMIN_TOKEN_COOKIE;
use minimall_admin_lib::middleware::{AdminPageGate, ApiAuthGate};

use super::test_helpers::*;

fn location(res: &actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

macro_rules! page_app {
    () => {
        test::init_service(
            App::new()
                .wrap(AdminPageGate)
                .app_data(web::Data::new(test_config()))
                .route("/admin/dashboard", web::get().to(admin_page))
                .route("/admin/login", web::get().to(login_page))
                .route("/administrivia", web::get().to(home_page))
                .route("/", web::get().to(home_page)),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_guarded_page_without_session_redirects() {
    let app = page_app!();

    let req = test::TestRequest::get().uri("/admin/dashboard").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/admin/login");
}

#[actix_rt::test]
async fn test_login_page_is_exempt() {
    let app = page_app!();

    let req = test::TestRequest::get().uri("/admin/login").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_public_pages_untouched() {
    let app = page_app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_admin_session_passes() {
    let app = page_app!();

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token_for("admin")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}

/// The page gate accepts only the lowercase "admin" role, while the API
/// role gate also accepts "ADMIN" and "ADMINISTRATOR". A token carrying one
/// of the uppercase spellings opens API routes but not admin pages.
#[actix_rt::test]
async fn test_uppercase_roles_open_api_but_not_pages() {
    for role in ["ADMIN", "ADMINISTRATOR"] {
        let token = token_for(role);

        let pages = page_app!();
        let req = test::TestRequest::get()
            .uri("/admin/dashboard")
            .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token.clone()))
            .to_request();
        let res = test::call_service(&pages, req).await;
        assert_eq!(res.status(), StatusCode::FOUND, "role {:?} on pages", role);
        assert_eq!(location(&res), "/admin/login");

        let api = test::init_service(
            App::new()
                .app_data(web::Data::new(pool_with_user(user_model(Some(role), None))))
                .app_data(web::Data::new(test_config()))
                .service(
                    web::scope("/api/admin")
                        .wrap(ApiAuthGate)
                        .route("/whoami", web::get().to(whoami)),
                ),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/api/admin/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let res = test::call_service(&api, req).await;
        assert_eq!(res.status(), StatusCode::OK, "role {:?} on api", role);
    }
}

#[actix_rt::test]
async fn test_bad_cookies_redirect() {
    let foreign = foreign_token("admin");
    for value in ["garbage", foreign.as_str()] {
        let app = page_app!();

        let req = test::TestRequest::get()
            .uri("/admin/dashboard")
            .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, value.to_string()))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND, "cookie {:?}", value);
        assert_eq!(location(&res), "/admin/login");
    }
}

/// Prefix matching is literal, so "/administrivia" is treated as an admin
/// page too.
#[actix_rt::test]
async fn test_unrelated_admin_prefix_is_guarded() {
    let app = page_app!();

    let req = test::TestRequest::get().uri("/administrivia").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/admin/login");
}

/// Without configuration there is no signing secret, and the gate fails
/// closed even for a cookie that would otherwise verify.
#[actix_rt::test]
async fn test_missing_config_fails_closed() {
    let app = test::init_service(
        App::new()
            .wrap(AdminPageGate)
            .route("/admin/dashboard", web::get().to(admin_page)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/admin/dashboard")
        .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token_for("admin")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/admin/login");
}
