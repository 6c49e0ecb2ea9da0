//! Matchit routing configuration.

use std::fmt::Display;
use std::sync::Arc;

use book_store_core::config::BookStoreConfig;
use book_store_core::BookRepository;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handlers;
use crate::handlers::request_utils::decode_path_param;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Book persistence gateway
    pub repository: Arc<dyn BookRepository>,
    /// Store configuration
    pub config: Arc<BookStoreConfig>,
}

/// HTTP request router.
pub struct Router {
    inner: MatchitRouter<RouteHandler>,
    state: AppState,
}

impl Router {
    /// Creates a router serving the book endpoints.
    pub fn new(repository: Arc<dyn BookRepository>, config: Arc<BookStoreConfig>) -> Self {
        let mut router = MatchitRouter::new();

        router
            .insert("/book", RouteHandler::Books)
            .expect("Failed to insert /book route");
        router
            .insert("/book/{id}", RouteHandler::Book)
            .expect("Failed to insert /book/{id} route");

        Self {
            inner: router,
            state: AppState { repository, config },
        }
    }

    /// Routes a request and converts any routing error into its JSON
    /// error response.
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Bytes>
    where
        B: Body,
        B::Error: Display,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = self.route(req).await.unwrap_or_else(|err| {
            if matches!(err, RouterError::InternalError(_)) {
                tracing::error!("{} {} failed: {}", method, path, err);
            }
            Response::from(err)
        });
        tracing::debug!("{} {} -> {}", method, path, response.status());
        response
    }

    /// Routes an incoming request to the appropriate handler.
    pub async fn route<B>(&self, req: Request<B>) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Display,
    {
        let path = req.uri().path().to_string();

        let (handler, id) = match self.inner.at(&path) {
            Ok(matched) => (
                *matched.value,
                matched.params.get("id").map(decode_path_param).transpose()?,
            ),
            Err(_) => return Err(RouterError::NotFound(format!("No route found for {}", path))),
        };

        handler.handle(req, id, self.state.clone()).await
    }
}

/// Route handler selector.
#[derive(Debug, Clone, Copy)]
enum RouteHandler {
    Books,
    Book,
}

impl RouteHandler {
    /// Dispatches on method. `id` is the decoded `{id}` segment, if any.
    async fn handle<B>(
        self,
        req: Request<B>,
        id: Option<String>,
        state: AppState,
    ) -> Result<Response<Bytes>, RouterError>
    where
        B: Body,
        B::Error: Display,
    {
        match (self, id) {
            (RouteHandler::Books, _) => match *req.method() {
                Method::GET => handlers::list_books(state).await,
                Method::POST => handlers::create_book(req, state).await,
                _ => Err(RouterError::MethodNotAllowed),
            },
            (RouteHandler::Book, Some(id)) => match *req.method() {
                Method::GET => handlers::get_book(id, state).await,
                Method::PUT => handlers::update_book(id, req, state).await,
                Method::DELETE => handlers::delete_book(id, state).await,
                _ => Err(RouterError::MethodNotAllowed),
            },
            (RouteHandler::Book, None) => Err(RouterError::InternalError(
                "Route matched without an id".to_string(),
            )),
        }
    }
}

/// Router error type.
#[derive(Debug)]
pub enum RouterError {
    MethodNotAllowed,
    InternalError(String),
    Timeout,
    BadRequest(String),
    NotFound(String),
}

impl RouterError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RouterError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouterError::Timeout => StatusCode::REQUEST_TIMEOUT,
            RouterError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RouterError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouterError::MethodNotAllowed => write!(f, "Method Not Allowed"),
            RouterError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            RouterError::Timeout => write!(f, "Request Timeout"),
            RouterError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            RouterError::NotFound(msg) => write!(f, "Not Found: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {}

impl From<RouterError> for Response<Bytes> {
    fn from(err: RouterError) -> Self {
        let status = err.status();
        let message = match &err {
            RouterError::MethodNotAllowed | RouterError::Timeout => err.to_string(),
            RouterError::InternalError(msg)
            | RouterError::BadRequest(msg)
            | RouterError::NotFound(msg) => msg.clone(),
        };

        let error_response = handlers::error_response(status.as_u16(), message, None);
        let body = serde_json::to_vec(&error_response).unwrap_or_else(|e| {
            format!(
                "{{\"success\":false,\"error\":{{\"code\":\"500\",\"message\":\"Failed to serialize error: {}\"}}}}",
                e
            )
            .into_bytes()
        });

        Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Bytes::from(body))
            .unwrap_or_else(|_| {
                let mut fallback = Response::new(Bytes::from_static(b"Internal Server Error"));
                *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}
