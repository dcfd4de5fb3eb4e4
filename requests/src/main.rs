//! `access-admin`: list folder access requests, or act on one.
//!
//! ```text
//! access-admin                                   # list every request
//! access-admin approve <requestId>
//! access-admin reject <requestId>
//! access-admin delete <requestId>
//! access-admin grant <folderId> <employeeId> <reason...>
//! ```
//!
//! The bearer token is read from `ACCESS_API_TOKEN`. Transitions given on
//! the command line count as confirmed.

use anyhow::{bail, Context};
use folder_access_api::{AccessApiClient, CredentialSource, EnvCredential, RequestId};
use folder_access_core::environment::SystemClock;
use folder_access_requests::{
    AdminConfig, GrantField, NotificationKind, RequestsAction, RequestsEnvironment,
    RequestsReducer, RequestsState, Transition,
};
use folder_access_runtime::Store;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

enum Command {
    List,
    Transition {
        request_id: RequestId,
        transition: Transition,
    },
    Grant {
        folder_id: String,
        employee_id: String,
        reason: String,
    },
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [] => Ok(Command::List),
        [verb, request_id] if verb != "grant" => Ok(Command::Transition {
            request_id: RequestId::new(request_id.as_str()),
            transition: verb.parse().map_err(anyhow::Error::msg)?,
        }),
        [verb, folder_id, employee_id, reason @ ..] if verb == "grant" && !reason.is_empty() => {
            Ok(Command::Grant {
                folder_id: folder_id.clone(),
                employee_id: employee_id.clone(),
                reason: reason.join(" "),
            })
        },
        _ => bail!(
            "usage: access-admin [approve|reject|delete <requestId> | grant <folderId> <employeeId> <reason>]"
        ),
    }
}

fn init_tracing(config: &AdminConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.observability.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn actions_for(command: Command) -> Vec<RequestsAction> {
    match command {
        Command::List => Vec::new(),
        Command::Transition {
            request_id,
            transition,
        } => vec![
            RequestsAction::RequestTransition {
                request_id,
                transition,
            },
            RequestsAction::ConfirmTransition,
        ],
        Command::Grant {
            folder_id,
            employee_id,
            reason,
        } => vec![
            RequestsAction::OpenGrantForm,
            RequestsAction::UpdateGrantField {
                field: GrantField::Folder,
                value: folder_id,
            },
            RequestsAction::UpdateGrantField {
                field: GrantField::Employee,
                value: employee_id,
            },
            RequestsAction::UpdateGrantField {
                field: GrantField::Reason,
                value: reason,
            },
            RequestsAction::SubmitGrant,
        ],
    }
}

fn print_state(state: &RequestsState) {
    for notice in &state.notifications {
        let marker = match notice.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "!!",
        };
        println!("[{marker}] {} {}", notice.title, notice.message);
    }

    let counts = state.requests.counts();
    println!(
        "\n{} requests ({} pending, {} approved, {} rejected)",
        counts.total(),
        counts.pending,
        counts.approved,
        counts.rejected
    );
    for request in &state.requests {
        println!(
            "  {:<24} {:<20} {:<16} {:<9} {}  {}",
            request.request_id.as_str(),
            request.folder_name,
            request.employee_name(),
            request.status.as_str(),
            request
                .created_on()
                .map_or_else(|| "-".to_string(), |day| day.to_string()),
            request.reason
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let config = AdminConfig::from_env().context("invalid configuration")?;
    init_tracing(&config);

    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredential::default());
    if !credentials.has_token() {
        tracing::warn!("ACCESS_API_TOKEN is not set, the API will reject most calls");
    }

    let api = AccessApiClient::with_timeout(
        config.api.base_url.as_str(),
        Arc::clone(&credentials),
        config.api.timeout(),
    )?;
    let env = RequestsEnvironment::new(Arc::new(api), credentials, Arc::new(SystemClock));
    let store = Store::new(RequestsState::new(), RequestsReducer::new(), env);
    let settle = config.api.timeout() * 2;

    store.send(RequestsAction::Load).await?;
    store.wait_until_idle(settle).await?;

    for action in actions_for(command) {
        store.send(action).await?;
    }
    store.wait_until_idle(settle).await?;

    let failed = store
        .state(|state| {
            print_state(state);
            state.notifications.iter().any(|n| n.is_error())
        })
        .await;

    store.shutdown_default().await?;

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
