use hyper::body::to_bytes;
use hyper::service::Service;
use hyper::{header, Body, Method, Request, Response, StatusCode};
use radixroute::Router;

async fn api(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("api")))
}

async fn login(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("login")))
}

async fn rotate(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("rotate")))
}

async fn teapot(_: Request<Body>) -> hyper::Result<Response<Body>> {
    Ok(Response::builder()
        .status(StatusCode::IM_A_TEAPOT)
        .body(Body::empty())
        .unwrap())
}

fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

async fn body(res: Response<Body>) -> String {
    let bytes = to_bytes(res.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn router() -> Router {
    Router::default()
        .get("/api", api)
        .post("/api/auth", login)
        .put("/api/auth", rotate)
}

#[tokio::test]
async fn dispatches_exact_matches() {
    let router = router();

    let res = router.serve(request(Method::GET, "/api")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body(res).await, "api");

    let res = router.serve(request(Method::POST, "/api/auth")).await.unwrap();
    assert_eq!(body(res).await, "login");

    let res = router.serve(request(Method::PUT, "/api/auth")).await.unwrap();
    assert_eq!(body(res).await, "rotate");
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let router = router();

    for path in &["/", "/ap", "/api/", "/api/auth/", "/API", "/api/authz"] {
        let res = router.serve(request(Method::GET, path)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
    }
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let router = router();

    let res = router.serve(request(Method::GET, "/api/auth")).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()[header::ALLOW], "POST, PUT, OPTIONS");
}

#[tokio::test]
async fn method_not_allowed_can_be_disabled() {
    let router = router().handle_method_not_allowed(false);

    let res = router.serve(request(Method::DELETE, "/api")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn custom_method_not_allowed() {
    let router = router().method_not_allowed(teapot);

    let res = router.serve(request(Method::DELETE, "/api")).await.unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn automatic_options() {
    let router = router();

    let res = router.serve(request(Method::OPTIONS, "/api/auth")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ALLOW], "POST, PUT, OPTIONS");

    let res = router.serve(request(Method::OPTIONS, "*")).await.unwrap();
    assert_eq!(res.headers()[header::ALLOW], "GET, POST, PUT, OPTIONS");

    let res = router.serve(request(Method::OPTIONS, "/nope")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn options_handlers() {
    let router = router().global_options(teapot);
    let res = router.serve(request(Method::OPTIONS, "/api")).await.unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);

    let router = router.options("/api", api);
    let res = router.serve(request(Method::OPTIONS, "/api")).await.unwrap();
    assert_eq!(body(res).await, "api");

    let router = Router::default().get("/api", api).handle_options(false);
    let res = router.serve(request(Method::OPTIONS, "/api")).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn custom_not_found() {
    let router = router().not_found(teapot);

    let res = router.serve(request(Method::GET, "/missing")).await.unwrap();
    assert_eq!(res.status(), StatusCode::IM_A_TEAPOT);
}

#[tokio::test]
async fn last_registration_wins() {
    let router = Router::default().get("/x", api).get("/x", login);

    let res = router.serve(request(Method::GET, "/x")).await.unwrap();
    assert_eq!(body(res).await, "login");
}

#[tokio::test]
async fn mounted_routes() {
    let auth = Router::default().post("/login", login).put("/rotate", rotate);
    let router = Router::default()
        .get("/api", api)
        .mount("/api/auth/", auth);

    let res = router
        .serve(request(Method::POST, "/api/auth/login"))
        .await
        .unwrap();
    assert_eq!(body(res).await, "login");

    let res = router
        .serve(request(Method::PUT, "/api/auth/rotate"))
        .await
        .unwrap();
    assert_eq!(body(res).await, "rotate");

    let routes = router.routes();
    let paths: Vec<&str> = routes.keys().copied().collect();
    assert_eq!(paths, ["/api", "/api/auth/login", "/api/auth/rotate"]);
}

#[tokio::test]
async fn serves_as_hyper_service() {
    let mut make_service = router().into_service();
    let mut service = make_service.call(()).await.unwrap();

    let res = service.call(request(Method::GET, "/api")).await.unwrap();
    assert_eq!(body(res).await, "api");

    let res = service.call(request(Method::GET, "/nope")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
