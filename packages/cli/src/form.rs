//! The file-a-report flow.
//!
//! Mirrors the portal form: pick a category, describe the issue, acquire
//! a location (with manual override), optionally attach photo evidence,
//! then dispatch. Submission is blocked until category, description, and
//! coordinates are present, and a backend rejection leaves the draft
//! printed so nothing the citizen typed is lost.

use std::path::PathBuf;

use dialoguer::{Confirm, Input, Select};
use samadhan_cli_utils::MultiProgress;
use samadhan_client::ApiClient;
use samadhan_geo::GeoStatus;
use samadhan_geo::resolver::UnsupportedProvider;
use samadhan_geo::session::LocationSession;
use samadhan_report::dispatch::{DispatchError, Dispatcher};
use samadhan_report::ReportDraft;
use samadhan_report_models::{Coordinates, MAX_DESCRIPTION_LEN, ReportCategory};

/// Form fields supplied on the command line, skipping their prompts.
pub struct Prefill {
    pub category: Option<ReportCategory>,
    pub description: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub image: Option<PathBuf>,
    pub no_prompt: bool,
}

/// Runs the report form and submits the result.
pub async fn run(
    multi: &MultiProgress,
    client: &ApiClient,
    prefill: Prefill,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut draft = ReportDraft::new();

    draft.category = match prefill.category {
        Some(category) => Some(category),
        None if prefill.no_prompt => None,
        None => Some(pick_category()?),
    };

    draft.description = match prefill.description {
        Some(description) => description,
        None if prefill.no_prompt => String::new(),
        None => prompt_description()?,
    };

    // Location: a manual override counts as known; otherwise acquire,
    // fall back, and offer an adjustment.
    let mut session = LocationSession::new()?;
    if let Some(coords) = prefill.coordinates {
        let bar = samadhan_cli_utils::spinner(multi, "Resolving address...");
        session.set_coordinates(coords).await;
        bar.finish_and_clear();
    } else {
        let bar = samadhan_cli_utils::spinner(multi, "Acquiring location...");
        let status = session.acquire(&UnsupportedProvider).await;
        bar.finish_and_clear();

        if status == GeoStatus::Error {
            log::warn!("No device position available, using the fallback location");
        }

        if !prefill.no_prompt {
            offer_adjustment(multi, &mut session).await?;
        }
    }

    if let Some(coords) = session.coordinates() {
        println!("Location: {coords}");
    }
    if let Some(address) = session.address() {
        println!("Address:  {}", address.display_address);
    }

    draft.coordinates = session.coordinates();
    draft.address = session
        .address()
        .map(|address| address.display_address.clone());

    let image = match prefill.image {
        Some(path) => Some(path),
        None if prefill.no_prompt => None,
        None => prompt_image_path()?,
    };
    if let Some(path) = image {
        draft.attachment.attach_file(&path)?;
        if let Some(attachment) = draft.attachment.attachment() {
            println!("Attached: {}", attachment.preview_path().display());
        }
    }

    let mut dispatcher = Dispatcher::new();
    let bar = samadhan_cli_utils::spinner(multi, "Submitting report...");
    let result = dispatcher.submit(client, &draft).await;
    bar.finish_and_clear();

    match result {
        Ok(complaint) => {
            println!(
                "Report filed as #{} ({}), status {}.",
                complaint.id, complaint.category, complaint.status,
            );
            Ok(())
        }
        Err(DispatchError::Blocked(issues)) => {
            eprintln!("Report is incomplete:");
            for issue in issues {
                eprintln!("  - {issue}");
            }
            Err("report is incomplete".into())
        }
        Err(DispatchError::Api(e)) => {
            eprintln!("Submission failed: {e}");
            eprintln!("Your draft was not lost; re-run with the same details.");
            Err(e.into())
        }
    }
}

fn pick_category() -> Result<ReportCategory, dialoguer::Error> {
    let labels: Vec<&str> = ReportCategory::all()
        .iter()
        .map(|c| c.label())
        .collect();
    let idx = Select::new()
        .with_prompt("Category")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(ReportCategory::all()[idx])
}

fn prompt_description() -> Result<String, dialoguer::Error> {
    Input::new()
        .with_prompt("Describe the issue")
        .validate_with(|text: &String| {
            let len = text.trim().chars().count();
            if len == 0 {
                Err("describe the issue".to_string())
            } else if len > MAX_DESCRIPTION_LEN {
                Err(format!("{len} characters, maximum is {MAX_DESCRIPTION_LEN}"))
            } else {
                Ok(())
            }
        })
        .interact_text()
}

async fn offer_adjustment(
    multi: &MultiProgress,
    session: &mut LocationSession,
) -> Result<(), dialoguer::Error> {
    let adjust = Confirm::new()
        .with_prompt("Adjust the location manually?")
        .default(false)
        .interact()?;
    if !adjust {
        return Ok(());
    }

    let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
    let lng: f64 = Input::new().with_prompt("Longitude").interact_text()?;

    let bar = samadhan_cli_utils::spinner(multi, "Resolving address...");
    session.set_coordinates(Coordinates::new(lat, lng)).await;
    bar.finish_and_clear();
    Ok(())
}

fn prompt_image_path() -> Result<Option<PathBuf>, dialoguer::Error> {
    let attach = Confirm::new()
        .with_prompt("Attach an image?")
        .default(false)
        .interact()?;
    if !attach {
        return Ok(None);
    }

    let path: String = Input::new().with_prompt("Image path").interact_text()?;
    Ok(Some(PathBuf::from(path)))
}
