//! Connection handler
//!
//! One task per accepted connection. Frames are processed strictly one at a
//! time: read a request, dispatch it, write exactly one response. Transport
//! failures and malformed JSON end the connection; everything else becomes an
//! error response and the loop continues.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::BufReader;
use tokio::net::TcpStream;

use mural_core::{MuralError, MuralResult};
use mural_state::InsertOutcome;
use mural_wire::{parse_value, read_frame, write_frame, Request, Response};

use crate::Node;

/// Serve one connection until the peer closes it or it fails, then drop its
/// session.
pub async fn handle_connection(node: Arc<Node>, stream: TcpStream, addr: SocketAddr) {
    tracing::info!(%addr, "connection accepted");

    match serve(&node, stream, addr).await {
        Ok(()) => tracing::info!(%addr, "connection closed"),
        Err(e) => tracing::warn!(%addr, error = %e, "connection lost or sent invalid data"),
    }

    node.end_session(&addr);
}

async fn serve(node: &Node, stream: TcpStream, addr: SocketAddr) -> MuralResult<()> {
    let (read_half, mut writer) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let limit = node.config().max_frame_size;

    while let Some(frame) = read_frame(&mut reader, limit).await? {
        let response = respond(node, addr, &frame)?;
        write_frame(&mut writer, &response).await?;
    }
    Ok(())
}

/// Answer one raw frame.
///
/// Only a frame that is not JSON at all yields `Err`; the node being inactive
/// is checked first, so an inactive node answers even those.
pub fn respond(node: &Node, addr: SocketAddr, frame: &[u8]) -> MuralResult<Response> {
    if !node.is_active() {
        node.stats().requests_rejected_inactive.incr();
        return Ok(Response::from_error(&MuralError::NodeInactive));
    }

    let value = parse_value(frame)?;
    node.stats().requests_handled.incr();

    let response = match Request::from_value(value) {
        Ok(request) => dispatch(node, addr, request),
        Err(e) => {
            tracing::warn!(%addr, error = %e, "rejected request");
            Response::from_error(&e)
        }
    };
    Ok(response)
}

/// Route a decoded request to its action
pub fn dispatch(node: &Node, addr: SocketAddr, request: Request) -> Response {
    tracing::debug!(%addr, action = request.action(), "dispatching request");

    let result = match request {
        Request::Auth { user, pass } => node
            .authenticate(addr, &user, &pass)
            .map(|()| Response::ok("authentication successful")),
        Request::Publish { content } => node
            .publish(addr, content)
            .map(|_| Response::ok("message published")),
        Request::Fetch => Ok(Response::board(node.fetch())),
        Request::Sync { message_payload } => {
            node.accept_sync(message_payload).map(|outcome| match outcome {
                InsertOutcome::Inserted => Response::ok("post synchronized"),
                InsertOutcome::Duplicate => Response::ok("post already exists"),
            })
        }
        Request::SyncRequest { known_uids } => {
            Ok(Response::missing_posts(node.missing_posts(known_uids)))
        }
    };
    Response::from(result)
}
