// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and handling
//! them without blocking shutdown. A connection is a session: the first
//! frame must be `Hello` carrying the caller's identity, which is resolved
//! against the user directory; every later request executes with that
//! actor's permissions.

mod query;

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixListener;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use lr_core::{Actor, Directory};
use lr_engine::{HistoryService, RouteOutcome, RoutingEngine};
use lr_storage::Store;
use lr_wire::{read_request, write_response, ProtocolError, Request, Response};

use crate::env::PROTOCOL_VERSION;
use crate::lifecycle::DaemonState;

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub engine: Arc<RoutingEngine>,
    pub history: Arc<HistoryService>,
    pub directory: Directory,
    pub store: Arc<Mutex<Store>>,
    pub start_time: Instant,
    pub shutdown: Arc<Notify>,
}

impl ListenCtx {
    pub fn from_daemon(daemon: &DaemonState) -> Self {
        Self {
            engine: Arc::clone(&daemon.engine),
            history: Arc::clone(&daemon.history),
            directory: daemon.pipeline.directory.clone(),
            store: Arc::clone(&daemon.store),
            start_time: daemon.start_time,
            shutdown: Arc::clone(&daemon.shutdown),
        }
    }
}

/// Listener task for accepting socket connections.
pub struct Listener {
    unix: UnixListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Listener {
    pub fn new(unix: UnixListener, ctx: Arc<ListenCtx>) -> Self {
        Self { unix, ctx }
    }

    /// Run the listener loop, spawning a task per connection.
    pub async fn run(self) {
        loop {
            match self.unix.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            warn!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => error!("Unix accept error: {}", e),
            }
        }
    }
}

/// Handle a single client session.
///
/// Generic over reader/writer types so tests can drive it over an
/// in-memory duplex stream.
pub async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // Session handshake: resolve the caller before anything else.
    let actor = match read_request(&mut reader).await? {
        Request::Hello { version, user } => {
            debug!(%version, %user, "hello");
            match ctx.directory.resolve(&user) {
                Some(actor) => {
                    let response = Response::Hello {
                        version: PROTOCOL_VERSION.to_string(),
                        full_name: actor.full_name.clone(),
                    };
                    write_response(&mut writer, &response).await?;
                    actor.clone()
                }
                None => {
                    let response = Response::Error { message: format!("unknown user: {user}") };
                    write_response(&mut writer, &response).await?;
                    return Ok(());
                }
            }
        }
        _ => {
            let response =
                Response::Error { message: "session must start with Hello".to_string() };
            write_response(&mut writer, &response).await?;
            return Ok(());
        }
    };

    loop {
        let request = match read_request(&mut reader).await {
            Ok(request) => request,
            // Client hung up between requests
            Err(ProtocolError::Io(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("Client disconnected");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        info!(request = ?request, user = %actor.user, "received request");
        let response = handle_request(request, &actor, ctx);
        debug!("Sending response: {:?}", response);
        write_response(&mut writer, &response).await?;

        if matches!(response, Response::ShuttingDown) {
            return Ok(());
        }
    }
}

/// Handle a single request and return a response.
///
/// Engine errors surface as `Response::Error` with the error's display
/// text; the session stays usable afterwards.
fn handle_request(request: Request, actor: &Actor, ctx: &ListenCtx) -> Response {
    let result = match request {
        Request::Ping => Ok(Response::Pong),

        // Repeated Hello on an established session just re-acknowledges.
        Request::Hello { .. } => Ok(Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
            full_name: actor.full_name.clone(),
        }),

        Request::CreateLead { lead_name } => ctx
            .engine
            .create_lead(&lead_name, actor)
            .map(|(lead, to)| Response::Routed { lead, to }),

        Request::MarkDone { lead } => {
            ctx.engine.mark_department_done(&lead, actor).map(|outcome| match outcome {
                RouteOutcome::Completed => Response::Completed,
                RouteOutcome::Moved { to } => Response::Moved { to },
            })
        }

        Request::SendBack { lead } => {
            ctx.engine.send_back_to_department(&lead, actor).map(|to| Response::Moved { to })
        }

        Request::Reject { lead } => {
            ctx.engine.reject_to_onboarding(&lead, actor).map(|to| Response::Moved { to })
        }

        Request::OverrideTransfer { lead, target_stage, notes } => ctx
            .engine
            .manager_override_transfer(&lead, actor, &target_stage, notes)
            .map(|to| Response::Moved { to }),

        Request::TransferTargets { current_department } => ctx
            .engine
            .transfer_targets(&current_department)
            .map(|stages| Response::TransferTargets { stages }),

        Request::LeadHistory { user } => ctx
            .history
            .my_lead_history(user.as_ref(), actor)
            .map(|view| Response::History { view: query::history_view(view) }),

        Request::DepartmentHistory { lead } => ctx.engine.lead_history(&lead).map(|entries| {
            Response::DepartmentHistory {
                entries: entries
                    .into_iter()
                    .map(|e| query::entry_detail(e, &ctx.directory))
                    .collect(),
            }
        }),

        Request::Status => Ok(query::handle_status(ctx)),

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Ok(Response::ShuttingDown)
        }
    };

    result.unwrap_or_else(|e| Response::Error { message: e.to_string() })
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
