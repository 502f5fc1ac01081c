#![allow(clippy::module_name_repetitions)]

//! Interactive menu for the grievance portal client.
//!
//! Menu-driven interface using `dialoguer` for the common flows without
//! memorizing CLI flags. Actions are gated on the stored session: signed
//! out accounts only see sign-in and signup.

use dialoguer::{Input, Password, Select};
use samadhan_cli_utils::MultiProgress;
use samadhan_client::ApiClient;
use samadhan_report_models::{AnnouncementPriority, ReportStatus};

use crate::{form, letter, output};

/// Actions available once signed in.
enum Action {
    FileReport,
    ListReports,
    ShowReport,
    Announcements,
    ExportLetter,
    Triage,
    PostAnnouncement,
    Logout,
}

impl Action {
    const ALL: &[Self] = &[
        Self::FileReport,
        Self::ListReports,
        Self::ShowReport,
        Self::Announcements,
        Self::ExportLetter,
        Self::Triage,
        Self::PostAnnouncement,
        Self::Logout,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::FileReport => "File a report",
            Self::ListReports => "My reports",
            Self::ShowReport => "Show a report",
            Self::Announcements => "Announcements",
            Self::ExportLetter => "Export a letter PDF",
            Self::Triage => "Update a report status (district leaders)",
            Self::PostAnnouncement => "Publish an announcement (district leaders)",
            Self::Logout => "Sign out",
        }
    }
}

/// Runs the interactive menu.
///
/// # Errors
///
/// Returns an error if a prompt or the selected operation fails.
pub async fn run(
    multi: &MultiProgress,
    client: &ApiClient,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Samadhan Sethu");
    println!();

    let Some(claims) = client.current_claims()? else {
        return sign_in(client).await;
    };
    output::print_identity(&claims);

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Action::ALL[idx] {
        Action::FileReport => {
            form::run(
                multi,
                client,
                form::Prefill {
                    category: None,
                    description: None,
                    coordinates: None,
                    image: None,
                    no_prompt: false,
                },
            )
            .await?;
        }
        Action::ListReports => {
            let complaints = client.list_reports().await?;
            output::print_reports(&complaints);
        }
        Action::ShowReport => {
            let id: i64 = Input::new().with_prompt("Report id").interact_text()?;
            let complaint = client.get_report(id).await?;
            output::print_report(&complaint);
        }
        Action::Announcements => {
            let announcements = client.list_announcements().await?;
            output::print_announcements(&announcements);
        }
        Action::ExportLetter => {
            let id: i64 = Input::new().with_prompt("Report id").interact_text()?;
            letter::export(multi, client, id, None, None).await?;
        }
        Action::Triage => {
            let id: i64 = Input::new().with_prompt("Report id").interact_text()?;
            let complaint = client.get_report(id).await?;
            output::print_report(&complaint);

            let choices: Vec<ReportStatus> = ReportStatus::all()
                .iter()
                .copied()
                .filter(|next| complaint.status.can_transition_to(*next))
                .collect();
            if choices.is_empty() {
                println!("Report #{id} is {} and cannot change.", complaint.status);
                return Ok(());
            }

            let labels: Vec<String> = choices.iter().map(ToString::to_string).collect();
            let idx = Select::new()
                .with_prompt("New status")
                .items(&labels)
                .default(0)
                .interact()?;
            let updated = client.update_status(id, choices[idx]).await?;
            println!("Report #{} is now {}.", updated.id, updated.status);
        }
        Action::PostAnnouncement => {
            let title: String = Input::new().with_prompt("Title").interact_text()?;
            let description: String = Input::new().with_prompt("Description").interact_text()?;

            let priorities = AnnouncementPriority::all();
            let labels: Vec<String> = priorities.iter().map(ToString::to_string).collect();
            let idx = Select::new()
                .with_prompt("Priority")
                .items(&labels)
                .default(1)
                .interact()?;

            let created = client
                .post_announcement(&samadhan_client::announcements::NewAnnouncement {
                    title: &title,
                    description: &description,
                    priority: priorities[idx],
                })
                .await?;
            println!("Published announcement #{}.", created.id);
        }
        Action::Logout => {
            client.logout()?;
            println!("Signed out.");
        }
    }

    Ok(())
}

/// Sign-in prompt for a signed-out session.
async fn sign_in(client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    println!("Not signed in.");
    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&["Sign in", "Create an account"])
        .default(0)
        .interact()?;

    if idx == 1 {
        return crate::register(client).await;
    }

    let full_name: String = Input::new().with_prompt("Full name").interact_text()?;
    let password = Password::new().with_prompt("Password").interact()?;
    let claims = client.login(&full_name, &password).await?;
    output::print_identity(&claims);
    Ok(())
}
