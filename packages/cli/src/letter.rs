//! Letter export for a filed complaint.
//!
//! Fetches the complaint, re-resolves its district and state from the
//! stored coordinates, and renders the formal municipal-office letter as
//! a PDF. A locally supplied image becomes the evidence page.

use std::path::PathBuf;

use samadhan_cli_utils::MultiProgress;
use samadhan_client::ApiClient;
use samadhan_geo::session::LocationSession;
use samadhan_letter::{ARTIFACT_FILE_NAME, LetterInput, compose, pdf};

/// Exports complaint `id` as a letter PDF.
pub async fn export(
    multi: &MultiProgress,
    client: &ApiClient,
    id: i64,
    output: Option<PathBuf>,
    image: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let complaint = client.get_report(id).await?;
    let citizen_name = client
        .current_claims()?
        .and_then(|claims| claims.full_name);

    // District and state come from reverse geocoding the stored
    // coordinates; the backend only keeps the display address. A
    // complaint without coordinates gets no location block at all.
    let coordinates = complaint.coordinates();
    let (district, state) = match coordinates {
        Some(coords) => {
            let bar = samadhan_cli_utils::spinner(multi, "Resolving address...");
            let mut session = LocationSession::new()?;
            session.set_coordinates(coords).await;
            bar.finish_and_clear();

            session.address().map_or_else(
                || (String::new(), String::new()),
                |address| (address.district.clone(), address.state.clone()),
            )
        }
        None => (String::new(), String::new()),
    };

    let letter = compose(&LetterInput {
        citizen_name: citizen_name.as_deref(),
        category: complaint.category,
        description: &complaint.description,
        district: &district,
        state: &state,
        coordinates,
        date: complaint.created_at.date_naive(),
    });

    let evidence = match image {
        Some(path) => Some(std::fs::read(path)?),
        None => None,
    };

    let path = output.unwrap_or_else(|| PathBuf::from(ARTIFACT_FILE_NAME));
    pdf::export(&path, &letter, evidence.as_deref())?;
    println!("Wrote {}.", path.display());
    Ok(())
}
