// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Builds wire DTOs from engine views and materialized state.

use lr_core::{DepartmentStatus, Directory, Lead, RoutingHistoryEntry};
use lr_engine::HistoryView;
use lr_wire::{
    GlobalLeadEntry, HistoryEntryDetail, HistoryViewDetail, LeadSummary, PersonalLeadEntry,
    Response,
};

use super::ListenCtx;

pub(super) fn lead_summary(lead: &Lead) -> LeadSummary {
    LeadSummary {
        id: lead.id.clone(),
        lead_name: lead.lead_name.clone(),
        current_department: lead.current_department.clone(),
        department_status: lead.department_status,
        modified_at_ms: lead.modified_at_ms,
    }
}

pub(super) fn entry_detail(entry: RoutingHistoryEntry, directory: &Directory) -> HistoryEntryDetail {
    HistoryEntryDetail {
        actor_name: directory.full_name(&entry.actor),
        department: entry.department,
        action: entry.action,
        actor: entry.actor,
        notes: entry.notes,
        acted_at_ms: entry.acted_at_ms,
    }
}

pub(super) fn history_view(view: HistoryView) -> HistoryViewDetail {
    match view {
        HistoryView::Personal { user, full_name, leads } => HistoryViewDetail::Personal {
            user,
            full_name,
            leads: leads
                .into_iter()
                .map(|l| PersonalLeadEntry {
                    lead: lead_summary(&l.lead),
                    action: l.user_action,
                    department: l.action_department,
                    acted_at_ms: l.action_at_ms,
                })
                .collect(),
        },
        HistoryView::Global { leads, done_count, rejected_count } => HistoryViewDetail::Global {
            leads: leads
                .into_iter()
                .map(|l| GlobalLeadEntry {
                    lead: lead_summary(&l.lead),
                    last_action: l.last_action,
                    last_handled_by: l.last_handled_by,
                    last_handled_by_name: l.last_handled_by_name,
                })
                .collect(),
            done_count,
            rejected_count,
        },
    }
}

pub(super) fn handle_status(ctx: &ListenCtx) -> Response {
    let snapshot = ctx.store.lock().snapshot();
    let leads_total = snapshot.leads().count();
    let leads_done = snapshot
        .leads()
        .filter(|l| l.department_status == DepartmentStatus::Done)
        .count();
    let leads_rejected = snapshot
        .leads()
        .filter(|l| l.department_status == DepartmentStatus::Rejected)
        .count();

    Response::Status {
        uptime_secs: ctx.start_time.elapsed().as_secs(),
        leads_total,
        leads_done,
        leads_rejected,
    }
}
