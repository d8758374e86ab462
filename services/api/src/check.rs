use crate::infra::{FileCandidateLoader, TracingNotificationGateway};
use clap::Args;
use gift_entry::config::AppConfig;
use gift_entry::error::AppError;
use gift_entry::workflows::gift_entry::{
    GiftEntryConfig, GiftEntryError, GiftEntryService, Notification, RowFields,
    RowSubmissionRequest,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// JSON file holding a row submission request
    #[arg(long)]
    pub(crate) request: PathBuf,
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let raw = fs::read_to_string(&args.request)?;
    let request: RowSubmissionRequest = serde_json::from_str(&raw)?;

    let (decision, result, notifications) = check_request(request, config.gift_entry);
    println!("Decision: {decision}");

    match result {
        Ok(row) => {
            println!("{}", serde_json::to_string_pretty(&row)?);
            Ok(())
        }
        Err(err) => {
            for notification in notifications {
                if let Notification::Error { error_message, .. } = notification {
                    eprintln!("{error_message}");
                }
            }
            Err(err.into())
        }
    }
}

fn check_request(
    request: RowSubmissionRequest,
    config: GiftEntryConfig,
) -> (
    String,
    Result<RowFields, GiftEntryError>,
    Vec<Notification>,
) {
    let gateway = Arc::new(TracingNotificationGateway::default());
    let service = GiftEntryService::new(
        Arc::new(FileCandidateLoader::default()),
        gateway.clone(),
        config,
    );

    let (session, row) = request.into_session();
    let decision = service.decision(&session).summary();
    let result = service.prepare_row(&session, row);
    (decision, result, gateway.sent())
}
