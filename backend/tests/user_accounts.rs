//! Registration, login/logout, and user CRUD over the full app.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;

use backend::server::build_app;
use support::{InMemoryBoard, location, session_cookie, sign_in};

#[actix_web::test]
async fn registering_creates_a_user_and_redirects_to_the_index() {
    let board = InMemoryBoard::new();
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/create")
            .set_form([("username", "ada"), ("password", "secret")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/users");
    board.with(|state| {
        assert_eq!(state.users.len(), 1);
        let user = state.users.first().expect("one user");
        assert_eq!(user.username().as_ref(), "ada");
        // The credential is stored hashed, never as the submitted plaintext.
        assert_ne!(user.password_hash().as_str(), "secret");
    });

    let refreshed = session_cookie(&res);
    let index = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users")
            .cookie(refreshed)
            .to_request(),
    )
    .await;
    let body = test::read_body(index).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("flash-success"));
    assert!(body.contains("ada created successfully!"));
}

#[actix_web::test]
async fn registering_with_an_invalid_username_returns_to_the_form_with_a_flash() {
    let board = InMemoryBoard::new();
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/create")
            .set_form([("username", "ab"), ("password", "secret")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/users/new");
    board.with(|state| assert!(state.users.is_empty()));

    let refreshed = session_cookie(&res);
    let form = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/new")
            .cookie(refreshed)
            .to_request(),
    )
    .await;
    let body = test::read_body(form).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("flash-error"));
    assert!(body.contains("username must be at least"));
}

#[actix_web::test]
async fn logging_in_with_the_wrong_password_bounces_back_to_the_login_form() {
    let board = InMemoryBoard::new();
    board.seed_user("ada", "secret");
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/users/login")
            .set_form([("username", "ada"), ("password", "wrong")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/users/login");

    let refreshed = session_cookie(&res);
    let form = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/login")
            .cookie(refreshed)
            .to_request(),
    )
    .await;
    let body = test::read_body(form).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("invalid username or password"));
}

#[actix_web::test]
async fn logging_out_clears_the_signed_in_state() {
    let board = InMemoryBoard::new();
    board.seed_user("ada", "secret");
    let app = test::init_service(build_app(support::app_deps(&board))).await;
    let cookie = sign_in(&app, "ada", "secret").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/users/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let refreshed = session_cookie(&res);
    let home = test::call_service(
        &app,
        test::TestRequest::get().uri("/").cookie(refreshed).to_request(),
    )
    .await;
    let body = test::read_body(home).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("You have been logged out!"));
    assert!(!body.contains("Signed in as"));
}

#[actix_web::test]
async fn updating_a_user_redirects_to_the_detail_page() {
    let board = InMemoryBoard::new();
    let user = board.seed_user("ada", "secret");
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/users/{}/update?_method=PUT", user.id()))
            .set_form([("username", "ada_lovelace"), ("password", "rotated")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/users/{}", user.id()));
    board.with(|state| {
        let updated = state.users.first().expect("one user");
        assert_eq!(updated.username().as_ref(), "ada_lovelace");
        assert_eq!(updated.created_at(), user.created_at());
    });
}

#[actix_web::test]
async fn an_invalid_update_is_swallowed_and_the_redirect_still_happens() {
    let board = InMemoryBoard::new();
    let user = board.seed_user("ada", "secret");
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/users/{}/update?_method=PUT", user.id()))
            .set_form([("username", "ab"), ("password", "rotated")])
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/users/{}", user.id()));
    board.with(|state| {
        let unchanged = state.users.first().expect("one user");
        assert_eq!(unchanged.username().as_ref(), "ada");
    });
}

#[actix_web::test]
async fn deleting_a_user_redirects_to_the_index() {
    let board = InMemoryBoard::new();
    let user = board.seed_user("ada", "secret");
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/users/{}/delete?_method=DELETE", user.id()))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/users");
    board.with(|state| assert!(state.users.is_empty()));
}

#[actix_web::test]
async fn the_user_index_lists_registered_users() {
    let board = InMemoryBoard::new();
    board.seed_user("ada", "secret");
    board.seed_user("grace", "hopper");
    let app = test::init_service(build_app(support::app_deps(&board))).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/users").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = test::read_body(res).await;
    let body = std::str::from_utf8(&body).expect("utf8 body");
    assert!(body.contains("ada"));
    assert!(body.contains("grace"));
}
