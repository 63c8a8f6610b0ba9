//! Board client over one persistent connection
//!
//! A session lives only as long as its connection, so login and every later
//! publish must share the same socket.

use mural_core::{MuralResult, PeerAddr};
use mural_transport::Connection;
use mural_wire::{Request, Response};

pub struct BoardClient {
    conn: Connection,
    logged_in_as: Option<String>,
}

impl BoardClient {
    pub async fn connect(hub: &PeerAddr) -> MuralResult<Self> {
        let conn = Connection::connect(hub, None).await?;
        Ok(BoardClient {
            conn,
            logged_in_as: None,
        })
    }

    /// Identity of the last successful login on this connection
    pub fn logged_in_as(&self) -> Option<&str> {
        self.logged_in_as.as_deref()
    }

    pub async fn login(&mut self, user: &str, pass: &str) -> MuralResult<Response> {
        let resp = self
            .conn
            .request(&Request::Auth {
                user: user.to_string(),
                pass: pass.to_string(),
            })
            .await?;
        if resp.is_ok() {
            self.logged_in_as = Some(user.to_string());
        }
        Ok(resp)
    }

    pub async fn post(&mut self, content: &str) -> MuralResult<Response> {
        self.conn
            .request(&Request::Publish {
                content: content.to_string(),
            })
            .await
    }

    pub async fn read(&mut self) -> MuralResult<Response> {
        self.conn.request(&Request::Fetch).await
    }
}
