//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::ConversionService;
use crossbeam_channel::{Receiver, Sender};
use shared::protocol::ConversionResult;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker: a dedicated thread owning a tokio runtime that
/// serves commands one at a time until the UI side hangs up.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    service: Arc<dyn ConversionService>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!("backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            while let Ok(cmd) = cmd_rx.recv() {
                let event = handle_command(service.as_ref(), cmd).await;
                // Blocking send: a dropped ConversionFinished would leave the UI loading forever.
                if ui_tx.send(event).is_err() {
                    break;
                }
            }
            tracing::info!("backend worker stopped");
        });
    })
}

pub async fn handle_command(service: &dyn ConversionService, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Convert { file } => {
            let result = match service.convert(&file).await {
                Ok(result) => result,
                Err(err) => {
                    tracing::warn!(
                        filename = %file.name,
                        timed_out = err.is_timeout(),
                        "conversion request failed: {err}"
                    );
                    ConversionResult::network_error()
                }
            };
            UiEvent::ConversionFinished(result)
        }
        BackendCommand::CheckHealth => match service.health().await {
            Ok(health) => UiEvent::ServiceStatus {
                reachable: true,
                message: format!("{} ({})", health.message, health.status),
            },
            Err(err) => {
                tracing::warn!("conversion service health check failed: {err}");
                UiEvent::ServiceStatus {
                    reachable: false,
                    message: format!("Conversion service unavailable: {err}"),
                }
            }
        },
    }
}
