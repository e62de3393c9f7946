// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs: a daemon started in a temp state dir, driven over its
//! Unix socket with the wire protocol.

use std::sync::Arc;

use tokio::net::UnixStream;

use lr_daemon::listener::ListenCtx;
use lr_daemon::{startup, Config, Listener};
use lr_wire::{HistoryViewDetail, Request, Response};

const PIPELINE: &str = r#"
[[stage]]
name = "Onboarding"
order = 0

[[stage]]
name = "Verification"
order = 1

[[stage]]
name = "Compliance"
order = 2
terminal = true

[policy]
reject = "restart"
override_access = "managers"

[[user]]
user = "root@example.com"
full_name = "Root Admin"
admin = true

[[user]]
user = "olive@example.com"
full_name = "Olive Onboarder"
departments = ["Onboarding"]

[[user]]
user = "vera@example.com"
full_name = "Vera Verifier"
departments = ["Verification"]

[[user]]
user = "mia@example.com"
full_name = "Mia Manager"
manages = ["Verification"]
"#;

struct Daemon {
    config: Config,
    // Holds the state-dir lock for the test's lifetime.
    _daemon: lr_daemon::DaemonState,
    _dir: tempfile::TempDir,
}

impl Daemon {
    /// Start a daemon in a fresh temp state dir and spawn its listener.
    fn launch() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::for_state_dir(dir.path().join("state"));
        std::fs::create_dir_all(&config.state_dir).expect("state dir");
        std::fs::write(&config.pipeline_path, PIPELINE).expect("pipeline");

        let result = startup(&config).expect("startup");
        let ctx = Arc::new(ListenCtx::from_daemon(&result.daemon));
        tokio::spawn(Listener::new(result.listener, ctx).run());

        Self { config, _daemon: result.daemon, _dir: dir }
    }

    async fn session(&self, user: &str) -> Session {
        let stream = UnixStream::connect(&self.config.socket_path)
            .await
            .expect("connect");
        let mut session = Session { stream };
        let hello = session
            .send(&Request::Hello { version: "specs".into(), user: user.into() })
            .await;
        assert!(
            matches!(hello, Response::Hello { .. }),
            "handshake failed: {:?}",
            hello
        );
        session
    }
}

struct Session {
    stream: UnixStream,
}

impl Session {
    async fn send(&mut self, request: &Request) -> Response {
        let payload = lr_wire::encode(request).expect("encode");
        lr_wire::write_message(&mut self.stream, &payload)
            .await
            .expect("write");
        let bytes = lr_wire::read_message(&mut self.stream).await.expect("read");
        lr_wire::decode(&bytes).expect("decode")
    }

    async fn create(&mut self, name: &str) -> lr_core::LeadId {
        match self.send(&Request::CreateLead { lead_name: name.into() }).await {
            Response::Routed { lead, .. } => lead,
            other => panic!("expected Routed, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn lead_lifecycle_over_the_socket() {
    let daemon = Daemon::launch();
    let mut olive = daemon.session("olive@example.com").await;
    let mut vera = daemon.session("vera@example.com").await;
    let mut root = daemon.session("root@example.com").await;

    let lead = olive.create("Acme Corp").await;

    // Forward through the pipeline
    let response = olive.send(&Request::MarkDone { lead: lead.clone() }).await;
    assert_eq!(response, Response::Moved { to: "Verification".into() });

    // Vera sends it back for rework, then forward again
    let response = vera.send(&Request::SendBack { lead: lead.clone() }).await;
    assert_eq!(response, Response::Moved { to: "Onboarding".into() });
    let response = olive.send(&Request::MarkDone { lead: lead.clone() }).await;
    assert_eq!(response, Response::Moved { to: "Verification".into() });
    let response = vera.send(&Request::MarkDone { lead: lead.clone() }).await;
    assert_eq!(response, Response::Moved { to: "Compliance".into() });

    // Terminal stage completes the lifecycle
    let response = root.send(&Request::MarkDone { lead: lead.clone() }).await;
    assert_eq!(response, Response::Completed);

    // Completed leads refuse further routing
    let response = root.send(&Request::MarkDone { lead: lead.clone() }).await;
    assert!(matches!(response, Response::Error { .. }));

    // History: Initial, Forward, Backward, Forward, Forward. Completion
    // appends no entry.
    let response = root.send(&Request::DepartmentHistory { lead }).await;
    match response {
        Response::DepartmentHistory { entries } => {
            assert_eq!(entries.len(), 5);
            let actions: Vec<String> = entries.iter().map(|e| e.action.to_string()).collect();
            assert_eq!(actions, ["initial", "forward", "backward", "forward", "forward"]);
        }
        other => panic!("expected DepartmentHistory, got {:?}", other),
    }
}

#[tokio::test]
async fn manager_override_and_permissions() {
    let daemon = Daemon::launch();
    let mut olive = daemon.session("olive@example.com").await;
    let mut mia = daemon.session("mia@example.com").await;

    let lead = olive.create("Globex").await;

    // A plain department user cannot override-transfer
    let response = olive
        .send(&Request::OverrideTransfer {
            lead: lead.clone(),
            target_stage: "Compliance".into(),
            notes: None,
        })
        .await;
    assert!(matches!(response, Response::Error { .. }));

    // A stage manager can
    let response = mia
        .send(&Request::OverrideTransfer {
            lead: lead.clone(),
            target_stage: "Compliance".into(),
            notes: Some("escalated".into()),
        })
        .await;
    assert_eq!(response, Response::Moved { to: "Compliance".into() });

    let response = mia.send(&Request::DepartmentHistory { lead }).await;
    match response {
        Response::DepartmentHistory { entries } => {
            let last = entries.last().expect("entries");
            assert_eq!(last.actor_name, "Mia Manager");
            assert_eq!(last.notes.as_deref(), Some("escalated"));
        }
        other => panic!("expected DepartmentHistory, got {:?}", other),
    }
}

#[tokio::test]
async fn reject_restarts_at_onboarding() {
    let daemon = Daemon::launch();
    let mut vera = daemon.session("vera@example.com").await;

    // Vera's lead starts in Verification; rejecting sends it to Onboarding
    let lead = vera.create("Initech").await;
    let response = vera.send(&Request::Reject { lead: lead.clone() }).await;
    assert_eq!(response, Response::Moved { to: "Onboarding".into() });

    // Rejecting again fails: it is already at the first stage
    let response = vera.send(&Request::Reject { lead }).await;
    assert!(matches!(response, Response::Error { .. }));
}

#[tokio::test]
async fn history_views_and_status() {
    let daemon = Daemon::launch();
    let mut olive = daemon.session("olive@example.com").await;
    let mut root = daemon.session("root@example.com").await;

    let lead = olive.create("Acme Corp").await;
    olive.create("Globex").await;

    // Personal view for olive: both leads
    let response = olive.send(&Request::LeadHistory { user: None }).await;
    match response {
        Response::History { view: HistoryViewDetail::Personal { leads, full_name, .. } } => {
            assert_eq!(full_name, "Olive Onboarder");
            assert_eq!(leads.len(), 2);
        }
        other => panic!("expected personal view, got {:?}", other),
    }

    // Complete one lead via override + mark done
    let response = root
        .send(&Request::OverrideTransfer {
            lead: lead.clone(),
            target_stage: "Compliance".into(),
            notes: None,
        })
        .await;
    assert_eq!(response, Response::Moved { to: "Compliance".into() });
    let response = root.send(&Request::MarkDone { lead }).await;
    assert_eq!(response, Response::Completed);

    // Global view for the admin: one completed lead
    let response = root.send(&Request::LeadHistory { user: None }).await;
    match response {
        Response::History { view: HistoryViewDetail::Global { leads, done_count, .. } } => {
            assert_eq!(leads.len(), 1);
            assert_eq!(done_count, 1);
        }
        other => panic!("expected global view, got {:?}", other),
    }

    let response = root.send(&Request::Status).await;
    match response {
        Response::Status { leads_total, leads_done, .. } => {
            assert_eq!(leads_total, 2);
            assert_eq!(leads_done, 1);
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn state_survives_daemon_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::for_state_dir(dir.path().join("state"));
    std::fs::create_dir_all(&config.state_dir).expect("state dir");
    std::fs::write(&config.pipeline_path, PIPELINE).expect("pipeline");

    {
        let result = startup(&config).expect("startup");
        let admin = result
            .daemon
            .pipeline
            .directory
            .resolve(&"root@example.com".into())
            .expect("admin")
            .clone();
        result.daemon.engine.create_lead("Acme Corp", &admin).expect("create");
        result.daemon.shutdown().expect("shutdown");
    }

    let result = startup(&config).expect("restart");
    assert_eq!(result.daemon.store.lock().state().leads().count(), 1);
}
