//! Command handlers

use tracing::{info, warn};

use crate::app::container::AppContainer;
use crate::cli::args::{IdentifyArgs, LookupArgs, RipArgs, StatusArgs};
use crate::domain::model::{DriveStatus, RunOutcome, TitleResolution};
use crate::error::{AutoripError, AutoripResult};

/// Full pipeline for the disc in `args.devpath`.
///
/// A drive that is not ready ends the command quietly; a run that hit a
/// fatal error is reported as a failed command after finalization.
pub async fn execute_rip_command(container: &dyn AppContainer, args: &RipArgs) -> AutoripResult<()> {
    let status = container.drive().status(&args.devpath).await?;
    if status != DriveStatus::Ready {
        info!(device = %args.devpath, status = status.as_str(), "Drive appears to be empty or is not ready. Exiting");
        return Ok(());
    }

    let disc = container
        .identify_interactor()
        .identify_or_unknown(&args.devpath)
        .await;
    let outcome = container.rip_interactor().execute(disc).await;
    println!("{}", format_outcome(&outcome));

    match outcome.fatal {
        Some(fatal) => Err(fatal.into()),
        None => Ok(()),
    }
}

/// Classify and resolve without ripping; prints the descriptor as JSON
pub async fn execute_identify_command(
    container: &dyn AppContainer,
    args: &IdentifyArgs,
) -> AutoripResult<()> {
    let status = container.drive().status(&args.devpath).await?;
    if status != DriveStatus::Ready {
        return Err(AutoripError::DriveNotReady {
            device: args.devpath.clone(),
            status: status.as_str().to_string(),
        });
    }

    let disc = container.identify_interactor().identify(&args.devpath).await?;
    println!("{}", serde_json::to_string_pretty(&disc)?);
    Ok(())
}

/// Resolve a label against the metadata service
pub async fn execute_lookup_command(container: &dyn AppContainer, args: &LookupArgs) -> AutoripResult<()> {
    let resolution = container.identify_interactor().lookup(&args.label).await;
    println!("{}", format_resolution(&args.label, &resolution));
    Ok(())
}

pub async fn execute_status_command(container: &dyn AppContainer, args: &StatusArgs) -> AutoripResult<()> {
    let status = container.drive().status(&args.devpath).await?;
    println!("{}: {}", args.devpath, status.as_str());
    Ok(())
}

pub fn format_resolution(label: &str, resolution: &TitleResolution) -> String {
    match resolution {
        TitleResolution::Resolved {
            query,
            matched,
            attempts,
        } => format!(
            "{} -> {} ({}) [{}] after {} queries (matched on {})",
            label,
            matched.title.as_deref().unwrap_or(query),
            matched.year,
            matched.category,
            attempts,
            query
        ),
        TitleResolution::Unresolved { attempts } => {
            format!("{} -> unresolved after {} queries", label, attempts)
        }
    }
}

pub fn format_outcome(outcome: &RunOutcome) -> String {
    let mut lines = vec![format!(
        "{} ({}): {}",
        outcome.device_path,
        outcome.disc_type.as_str(),
        if outcome.is_success() {
            "complete"
        } else if outcome.fatal.is_some() {
            "failed"
        } else {
            "completed with errors"
        }
    )];
    if let Some(strategy) = outcome.strategy {
        lines.push(format!("  strategy: {}", strategy));
    }
    if let Some(destination) = &outcome.destination {
        lines.push(format!("  destination: {}", destination.display()));
    }
    if let Some(placement) = &outcome.placement {
        lines.push(format!(
            "  placed: {} moved, {} skipped, {} failed",
            placement.moved.len(),
            placement.skipped.len(),
            placement.failed.len()
        ));
    }
    for error in &outcome.errors {
        lines.push(format!("  error: {}", error));
    }
    if let Some(fatal) = &outcome.fatal {
        warn!(error = %fatal, "Run ended early");
        lines.push(format!("  fatal: {}", fatal));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::model::{DiscType, RipStrategy, RunState, TitleMatch, VideoCategory};
    use std::path::PathBuf;

    fn outcome() -> RunOutcome {
        RunOutcome {
            device_path: "/dev/sr0".to_string(),
            disc_type: DiscType::Dvd,
            strategy: Some(RipStrategy::FullDiscMkv),
            states: vec![RunState::Classified, RunState::Finalized],
            errors: Vec::new(),
            fatal: None,
            placement: None,
            destination: Some(PathBuf::from("/media/Shrek (2001)")),
        }
    }

    #[test]
    fn test_format_successful_outcome() {
        let text = format_outcome(&outcome());
        assert!(text.starts_with("/dev/sr0 (dvd): complete"));
        assert!(text.contains("strategy: fullDiscMKV"));
        assert!(text.contains("destination: /media/Shrek (2001)"));
    }

    #[test]
    fn test_format_outcome_with_errors() {
        let mut partial = outcome();
        partial.errors.push("title_t01.mkv".to_string());
        assert!(format_outcome(&partial).contains("completed with errors"));

        let mut failed = outcome();
        failed.fatal = Some(DomainError::tool_start("makemkvcon", "executable not found"));
        let text = format_outcome(&failed);
        assert!(text.contains(": failed"));
        assert!(text.contains("fatal: "));
    }

    #[test]
    fn test_format_resolution() {
        let resolved = TitleResolution::Resolved {
            query: "The+Matrix".to_string(),
            matched: TitleMatch {
                title: Some("The Matrix".to_string()),
                year: "1999".to_string(),
                category: VideoCategory::Movie,
            },
            attempts: 2,
        };
        assert_eq!(
            format_resolution("THE_MATRIX-SE", &resolved),
            "THE_MATRIX-SE -> The Matrix (1999) [movie] after 2 queries (matched on The+Matrix)"
        );
        assert_eq!(
            format_resolution("X", &TitleResolution::Unresolved { attempts: 1 }),
            "X -> unresolved after 1 queries"
        );
    }
}
