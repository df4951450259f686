//! The page gate in front of the SPA: static assets and the index fallback.

use std::fs;
use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};

use minimall_admin_lib::config::ADMIN_TOKEN_COOKIE;
use minimall_admin_lib::middleware::AdminPageGate;

use super::test_helpers::*;

const INDEX_HTML: &str = "<html><body>minimall admin</body></html>";
const APP_JS: &str = "console.log('minimall');";

fn static_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("create temp static dir");
    fs::write(dir.path().join("index.html"), INDEX_HTML).expect("write index.html");
    fs::create_dir(dir.path().join("assets")).expect("create assets dir");
    fs::write(dir.path().join("assets/app.js"), APP_JS).expect("write app.js");
    dir
}

async fn spa_fallback(static_dir: web::Data<PathBuf>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(static_dir.join("index.html"))?)
}

macro_rules! static_app {
    ($dir:expr) => {
        test::init_service(
            App::new()
                .wrap(AdminPageGate)
                .app_data(web::Data::new(test_config()))
                .app_data(web::Data::new($dir.path().to_path_buf()))
                .service(Files::new("/admin/assets", $dir.path().join("assets")).prefer_utf8(true))
                .default_service(web::to(spa_fallback)),
        )
        .await
    };
}

/// Bundled assets live under /admin and need a session like any other
/// admin page.
#[actix_rt::test]
async fn test_assets_require_session() {
    let dir = static_dir();
    let app = static_app!(dir);

    let req = test::TestRequest::get().uri("/admin/assets/app.js").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/admin/login")
    );
}

#[actix_rt::test]
async fn test_assets_serve_with_session() {
    let dir = static_dir();
    let app = static_app!(dir);

    let req = test::TestRequest::get()
        .uri("/admin/assets/app.js")
        .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token_for("admin")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body, APP_JS.as_bytes());
}

/// Any admin path without its own route falls back to the SPA index once
/// the session checks out.
#[actix_rt::test]
async fn test_admin_page_serves_index_with_session() {
    let dir = static_dir();
    let app = static_app!(dir);

    let req = test::TestRequest::get()
        .uri("/admin/products")
        .cookie(Cookie::new(ADMIN_TOKEN_COOKIE, token_for("admin")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body, INDEX_HTML.as_bytes());
}

/// The login page is reachable without a session; it is the redirect target.
#[actix_rt::test]
async fn test_login_page_serves_index_without_session() {
    let dir = static_dir();
    let app = static_app!(dir);

    let req = test::TestRequest::get().uri("/admin/login").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body, INDEX_HTML.as_bytes());
}

#[actix_rt::test]
async fn test_storefront_pages_bypass_gate() {
    let dir = static_dir();
    let app = static_app!(dir);

    let req = test::TestRequest::get().uri("/shop/checkout").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    assert_eq!(body, INDEX_HTML.as_bytes());
}
