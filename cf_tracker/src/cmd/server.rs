use crate::{
    cmd::connect_store,
    config::AppConfig,
    modules::{
        handlers::{bookmark, get_config, liveness, problem, readiness, user, ConfigResponse},
        service::TrackerService,
    },
};
use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing, Router, Server,
};
use cf_tracker_libs::{CodeforcesClient, ContestData};
use clap::Args;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs, config: &AppConfig) -> Result<()> {
    tracing::info!("Open bookmark database {}", config.database_url);
    let store = connect_store(&config.database_url).await?;
    store.initialize().await.with_context(|| {
        let message = "failed to initialize bookmark schema";
        tracing::error!(message);
        message
    })?;

    let client = CodeforcesClient::new(&config.codeforces).with_context(|| {
        let message = "couldn't create Codeforces API client. check the value of CF_API_BASE_URL.";
        tracing::error!(message);
        message
    })?;
    let origins = config.origin_headers()?;

    let app = create_router(
        TrackerService::new(client, store),
        ConfigResponse {
            default_handle: config.default_handle.clone(),
        },
        origins,
    );
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::try_bind(&addr)
        .with_context(|| format!("failed to bind port {}", port))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server stopped with error")?;

    Ok(())
}

pub fn create_router<A: ContestData + 'static>(
    service: TrackerService<A>,
    config: ConfigResponse,
    origins: Vec<HeaderValue>,
) -> Router {
    Router::new()
        .route("/api/config", routing::get(get_config))
        .route("/api/user/:handle", routing::get(user::user_info::<A>))
        .route("/api/user/:handle/solved", routing::get(user::solved::<A>))
        .route(
            "/api/user/:handle/submissions",
            routing::get(user::submissions::<A>),
        )
        .route(
            "/api/user/:handle/unattempted",
            routing::get(user::unattempted::<A>),
        )
        .route("/api/friends", routing::get(user::friends::<A>))
        .route("/api/problems", routing::get(problem::list_problems::<A>))
        .route(
            "/api/problems/count",
            routing::get(problem::count_problems::<A>),
        )
        .route("/api/tags", routing::get(problem::tags::<A>))
        .route(
            "/api/bookmarks",
            routing::get(bookmark::list_bookmarks::<A>).post(bookmark::create_bookmark::<A>),
        )
        .route(
            "/api/bookmarks/:contest_id/:index",
            routing::delete(bookmark::delete_bookmark::<A>),
        )
        .route("/api/liveness", routing::get(liveness))
        .route("/api/readiness", routing::get(readiness::<A>))
        .layer(Extension(Arc::new(service)))
        .layer(Extension(Arc::new(config)))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers(vec![CONTENT_TYPE]),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown.");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::modules::testing::{memory_store, raw_problem, FakeCodeforces};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> Router {
        let api = FakeCodeforces::with_problems(vec![
            raw_problem(1, "A", Some(800), &["math"]),
            raw_problem(1, "B", Some(1200), &["dp"]),
            raw_problem(2, "A", None, &["greedy"]),
        ])
        .submit("alice", raw_problem(1, "A", Some(800), &["math"]), "OK")
        .submit("alice", raw_problem(1, "B", Some(1200), &["dp"]), "WRONG_ANSWER");

        create_router(
            TrackerService::new(api, memory_store().await),
            ConfigResponse {
                default_handle: String::from("tourist"),
            },
            vec![HeaderValue::from_static("http://localhost:5173")],
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn config_returns_default_handle() {
        let app = app().await;
        let (status, body) = send(&app, get("/api/config")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"default_handle": "tourist"}));
    }

    #[tokio::test]
    async fn problems_carry_status_flags() {
        let app = app().await;
        let (status, body) = send(&app, get("/api/problems?handle=alice")).await;

        assert_eq!(status, StatusCode::OK);
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["contest_id"], json!(1));
        assert_eq!(items[0]["index"], json!("A"));
        assert_eq!(items[0]["is_solved"], json!(true));
        assert_eq!(items[1]["is_solved"], json!(false));
        assert_eq!(items[2]["rating"], Value::Null);
        assert_eq!(items[0]["is_bookmarked"], json!(false));
    }

    #[tokio::test]
    async fn invalid_page_size_is_unprocessable() {
        let app = app().await;
        let (status, body) = send(&app, get("/api/problems?page_size=501")).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn count_and_tags() {
        let app = app().await;

        let (status, body) = send(&app, get("/api/problems/count?tags=math,dp&min_rating=800")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"count": 2}));

        let (status, body) = send(&app, get("/api/tags")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"tags": ["dp", "greedy", "math"]}));
    }

    #[tokio::test]
    async fn user_endpoints() {
        let app = app().await;

        let (status, body) = send(&app, get("/api/user/alice")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["handle"], json!("alice"));

        let (status, body) = send(&app, get("/api/user/alice/solved")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"solved": ["1_A"]}));

        let (status, body) = send(&app, get("/api/user/alice/submissions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["verdict"], json!("WRONG_ANSWER"));

        let (status, body) = send(&app, get("/api/user/alice/unattempted")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["contest_id"], json!(2));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let app = app().await;
        let (status, body) = send(&app, get("/api/user/nobody")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["detail"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn friends_without_credentials_are_empty() {
        let app = app().await;
        let (status, body) = send(&app, get("/api/friends?only_online=true")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"friends": []}));
    }

    #[tokio::test]
    async fn bookmark_lifecycle() {
        let app = app().await;
        let payload = json!({
            "contest_id": 1,
            "index": "B",
            "name": "Problem 1B",
            "rating": 1200,
            "tags": ["dp", "bitmasks"],
            "url": "https://codeforces.com/problemset/problem/1/B"
        });

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/bookmarks")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let (status, created) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["tags"], json!(["dp", "bitmasks"]));
        assert!(created["id"].is_i64());

        let (status, body) = send(&app, get("/api/bookmarks")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&app, get("/api/problems")).await;
        assert_eq!(body[1]["index"], json!("B"));
        assert_eq!(body[1]["is_bookmarked"], json!(true));

        let delete = || {
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/bookmarks/1/B")
                .body(Body::empty())
                .unwrap()
        };
        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "deleted"}));

        let (status, body) = send(&app, delete()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Bookmark not found"}));
    }

    #[tokio::test]
    async fn malformed_bookmark_is_unprocessable() {
        let app = app().await;

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/bookmarks")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"contest_id": 1}"#))
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/api/bookmarks/abc/A")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn health_checks() {
        let app = app().await;

        let (status, _) = send(&app, get("/api/liveness")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, get("/api/readiness")).await;
        assert_eq!(status, StatusCode::OK);
    }
}
