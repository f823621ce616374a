// Connection handling module
// Serves a single accepted connection on the calling task.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::handler;
use crate::logger;

/// Serve one connection to completion.
///
/// Keep-alive is disabled so a connection carries exactly one request; the
/// accept loop does not resume until the response has been written, which
/// keeps request handling strictly sequential.
pub async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, cfg: Arc<Config>) {
    let io = TokioIo::new(stream);

    let conn = http1::Builder::new().keep_alive(false).serve_connection(
        io,
        service_fn(move |req| {
            let cfg = Arc::clone(&cfg);
            async move { handler::handle_request(req, peer_addr, cfg).await }
        }),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}
