//! Worker loop: applies commands to a workspace one at a time

use crate::{LabelCommand, LabelUpdate, Workspace};
use label_sheets::{AutoAssignReport, LabelOptions, calculate_statistics};
use tokio::sync::mpsc;

/// Process commands until the sender side is dropped, then hand the
/// workspace back
pub async fn worker_task(
    mut workspace: Workspace,
    mut command_rx: mpsc::UnboundedReceiver<LabelCommand>,
    update_tx: mpsc::UnboundedSender<LabelUpdate>,
) -> Workspace {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut workspace, &update_tx).await;
    }
    workspace
}

async fn process_command(
    cmd: LabelCommand,
    workspace: &mut Workspace,
    update_tx: &mpsc::UnboundedSender<LabelUpdate>,
) {
    match cmd {
        LabelCommand::AddFiles { paths } => {
            let total = paths.len();
            for (current, path) in paths.into_iter().enumerate() {
                let _ = update_tx.send(LabelUpdate::Progress {
                    operation: "Loading files".to_string(),
                    current,
                    total,
                });
                let report = workspace.add_files(std::slice::from_ref(&path)).await;
                send_upload(report, workspace, update_tx);
            }
        }
        LabelCommand::AddBytes { name, bytes } => {
            let result = workspace.add_bytes(name.clone(), bytes).await;
            match result {
                Ok((id, report)) => {
                    let page_count = workspace.library().get(id).map_or(0, |doc| doc.page_count());
                    send_assigned(name, page_count, report, update_tx);
                }
                Err(e) => {
                    let _ = update_tx.send(LabelUpdate::FileRejected {
                        name,
                        message: e.to_string(),
                    });
                }
            }
        }
        LabelCommand::ClickSlot { coord } => {
            let outcome = workspace.session.click_slot(coord);
            let _ = update_tx.send(LabelUpdate::Clicked { outcome });
        }
        LabelCommand::DragSlot { from, to } => {
            let outcome = workspace.session.drag_swap(from, to);
            let _ = update_tx.send(LabelUpdate::Dragged { outcome });
        }
        LabelCommand::RemoveItem { id } => {
            if workspace.remove_item(id).is_some() {
                let _ = update_tx.send(LabelUpdate::SessionChanged);
            }
        }
        LabelCommand::AssignPending => {
            let report = workspace.session.auto_assign_pending();
            send_report(report, update_tx);
        }
        LabelCommand::AddSheet => match workspace.session.add_sheet() {
            Ok(_) => {
                let _ = update_tx.send(LabelUpdate::SessionChanged);
            }
            Err(e) => send_error(e, update_tx),
        },
        LabelCommand::SetStock { stock } => match workspace.session.set_stock(stock) {
            Ok(report) => send_report(report, update_tx),
            Err(e) => send_error(e, update_tx),
        },
        LabelCommand::ApplyPreset { preset } => {
            workspace.session.apply_preset(preset);
            let _ = update_tx.send(LabelUpdate::SessionChanged);
        }
        LabelCommand::SetSlotAdjustment { slot, adjustment } => {
            match workspace.session.set_slot_adjustment(slot, adjustment) {
                Ok(()) => {
                    let _ = update_tx.send(LabelUpdate::SessionChanged);
                }
                Err(e) => send_error(e, update_tx),
            }
        }
        LabelCommand::SetSheetOffset { x_mm, y_mm } => {
            workspace.session.set_sheet_offset(x_mm, y_mm);
            let _ = update_tx.send(LabelUpdate::SessionChanged);
        }
        LabelCommand::LoadConfig { path } => match LabelOptions::load(&path).await {
            Ok(options) => match workspace.session.set_options(options.clone()) {
                Ok(report) => {
                    let _ = update_tx.send(LabelUpdate::ConfigLoaded { options });
                    send_report(report, update_tx);
                }
                Err(e) => send_error(e, update_tx),
            },
            Err(e) => send_error(e, update_tx),
        },
        LabelCommand::SaveConfig { path } => match workspace.session.options().save(&path).await {
            Ok(()) => {
                let _ = update_tx.send(LabelUpdate::ConfigSaved { path });
            }
            Err(e) => send_error(e, update_tx),
        },
        LabelCommand::CalculateStats => {
            let stats = calculate_statistics(&workspace.session);
            let _ = update_tx.send(LabelUpdate::StatsCalculated { stats });
        }
        LabelCommand::Export { output_path } => {
            let _ = update_tx.send(LabelUpdate::ExportStarted);
            let result = match &output_path {
                Some(path) => workspace.export_to(path).await,
                None => workspace.export().await,
            };
            match result {
                Ok(artifact) => {
                    let _ = update_tx.send(LabelUpdate::ExportComplete {
                        generation: artifact.generation,
                        sheets: artifact.sheets,
                        size: artifact.bytes.len(),
                        path: output_path,
                    });
                }
                Err(e) => send_error(e, update_tx),
            }
        }
        LabelCommand::Clear => {
            workspace.clear();
            let _ = update_tx.send(LabelUpdate::SessionChanged);
        }
    }
}

fn send_upload(
    report: crate::UploadReport,
    workspace: &Workspace,
    update_tx: &mpsc::UnboundedSender<LabelUpdate>,
) {
    for (name, id, assigned) in report.added {
        let page_count = workspace.library().get(id).map_or(0, |doc| doc.page_count());
        send_assigned(name, page_count, assigned, update_tx);
    }
    for failure in report.failed {
        let _ = update_tx.send(LabelUpdate::FileRejected {
            name: failure.name,
            message: failure.error.to_string(),
        });
    }
}

fn send_assigned(
    name: String,
    page_count: usize,
    report: AutoAssignReport,
    update_tx: &mpsc::UnboundedSender<LabelUpdate>,
) {
    let unplaced = report.unplaced.clone();
    let _ = update_tx.send(LabelUpdate::FileAdded {
        name,
        page_count,
        report,
    });
    if !unplaced.is_empty() {
        let _ = update_tx.send(LabelUpdate::CapacityExhausted { unplaced });
    }
}

fn send_report(report: AutoAssignReport, update_tx: &mpsc::UnboundedSender<LabelUpdate>) {
    if !report.is_complete() {
        let _ = update_tx.send(LabelUpdate::CapacityExhausted {
            unplaced: report.unplaced,
        });
    }
    let _ = update_tx.send(LabelUpdate::SessionChanged);
}

fn send_error(e: impl std::fmt::Display, update_tx: &mpsc::UnboundedSender<LabelUpdate>) {
    let _ = update_tx.send(LabelUpdate::Error {
        message: e.to_string(),
    });
}
