//! Hyper server setup and request handling.

use std::convert::Infallible;
use std::future::Future;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming as IncomingBody};
use hyper::{Request, Response};
use hyper_util::rt::TokioExecutor;
use hyper_util::rt::TokioIo;
use hyper_util::server::conn::auto::Builder as ConnectionBuilder;
use tokio::net::TcpListener;

use crate::router::Router;

/// Pause after an accept failure that is not tied to a single connection.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// HTTP server for the book store API.
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
}

impl Server {
    /// Binds the listening socket. Port 0 picks a free port.
    pub async fn bind(addr: SocketAddr, router: Router) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            router: Arc::new(router),
        })
    }

    /// Address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.listener.local_addr()
    }

    /// Serves connections until the process exits.
    pub async fn serve(self) -> Result<(), std::io::Error> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serves connections until `signal` resolves.
    ///
    /// Connections already accepted keep running on their own tasks.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Server listening on http://{}", self.local_addr()?);
        tokio::pin!(signal);

        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut signal => {
                    tracing::info!("Shutdown signal received, no longer accepting connections");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        tracing::warn!("Failed to accept connection: {}", err);
                        if !is_connection_error(&err) {
                            // Out of descriptors or similar; give the process room to recover.
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                        continue;
                    }
                },
            };

            let io = TokioIo::new(stream);
            let router = Arc::clone(&self.router);

            tokio::task::spawn(async move {
                let builder = ConnectionBuilder::new(TokioExecutor::new());
                if let Err(err) = builder
                    .serve_connection(
                        io,
                        hyper::service::service_fn(move |req| handle_request(req, router.clone())),
                    )
                    .await
                {
                    tracing::warn!("Error serving connection from {}: {}", peer, err);
                }
            });
        }
    }
}

/// Errors that only affect the connection being accepted.
fn is_connection_error(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ConnectionRefused | ErrorKind::ConnectionAborted | ErrorKind::ConnectionReset
    )
}

/// Handles an incoming HTTP request.
async fn handle_request(
    req: Request<IncomingBody>,
    router: Arc<Router>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(router.handle(req).await.map(Full::new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Error;

    #[test]
    fn test_is_connection_error() {
        assert!(is_connection_error(&Error::from(ErrorKind::ConnectionAborted)));
        assert!(is_connection_error(&Error::from(ErrorKind::ConnectionReset)));
        // EMFILE surfaces as an uncategorized OS error
        assert!(!is_connection_error(&Error::from_raw_os_error(24)));
        assert!(!is_connection_error(&Error::from(ErrorKind::OutOfMemory)));
    }
}
