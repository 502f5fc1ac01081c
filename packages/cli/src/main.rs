#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line client for the grievance portal.
//!
//! Citizens file geolocated, photo-backed complaints and track them;
//! district leaders triage statuses and publish announcements. Running
//! without a subcommand opens a `dialoguer`-driven menu.
//!
//! Uses `indicatif-log-bridge` (via [`samadhan_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and spinners never fight for the terminal.

mod form;
mod interactive;
mod letter;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use samadhan_client::ApiClient;
use samadhan_client::auth::{RegisterRequest, Role};
use samadhan_report_models::{AnnouncementPriority, ReportCategory, ReportStatus};

#[derive(Parser)]
#[command(name = "samadhan_cli", about = "Grievance portal client")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "SAMADHAN_API_URL", default_value = "http://127.0.0.1:8000")]
    api_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token pair
    Login {
        /// Account name (prompted when omitted)
        full_name: Option<String>,
    },
    /// Discard the stored session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Create a new account
    Register,
    /// Verify an Aadhaar number with its OTP
    VerifyAadhaar {
        /// 12-digit Aadhaar number
        aadhaar_number: String,
        /// One-time password
        #[arg(long)]
        otp: Option<String>,
    },
    /// File a new complaint
    File {
        /// Category: land, law, infra, or other (prompted when omitted)
        #[arg(long)]
        category: Option<ReportCategory>,
        /// Issue description (prompted when omitted)
        #[arg(long)]
        description: Option<String>,
        /// Manual latitude override
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        /// Manual longitude override
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        /// Path of a JPEG/PNG to attach as evidence
        #[arg(long)]
        image: Option<PathBuf>,
        /// Fail instead of prompting for missing required pieces
        #[arg(long)]
        no_prompt: bool,
    },
    /// List complaints visible to this account
    Reports,
    /// Show one complaint in full
    Show {
        /// Complaint id
        id: i64,
    },
    /// Move a complaint to a new status (district leaders)
    SetStatus {
        /// Complaint id
        id: i64,
        /// Target status: pending, `in_progress`, approved, or rejected
        status: ReportStatus,
    },
    /// List published announcements
    Announcements,
    /// Publish an announcement (district leaders)
    Announce {
        /// Headline
        title: String,
        /// Body text
        #[arg(long)]
        description: String,
        /// Priority: High, Medium, or Low
        #[arg(long, default_value = "Medium")]
        priority: AnnouncementPriority,
    },
    /// Export a filed complaint as a formal letter PDF
    Letter {
        /// Complaint id
        id: i64,
        /// Output path (defaults to `complaint_letter.pdf`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Local image to embed as the evidence page
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = samadhan_cli_utils::init_logger();
    let cli = Cli::parse();

    let client = ApiClient::new(&cli.api_url)?;

    let Some(command) = cli.command else {
        return interactive::run(&multi, &client).await;
    };

    match command {
        Commands::Login { full_name } => {
            let full_name = match full_name {
                Some(name) => name,
                None => Input::new().with_prompt("Full name").interact_text()?,
            };
            let password = Password::new().with_prompt("Password").interact()?;
            let claims = client.login(&full_name, &password).await?;
            output::print_identity(&claims);
        }
        Commands::Logout => {
            client.logout()?;
            println!("Signed out.");
        }
        Commands::Whoami => match client.current_claims()? {
            Some(claims) => output::print_identity(&claims),
            None => println!("Not signed in."),
        },
        Commands::Register => register(&client).await?,
        Commands::VerifyAadhaar {
            aadhaar_number,
            otp,
        } => {
            let otp = match otp {
                Some(otp) => otp,
                None => Input::new().with_prompt("OTP").interact_text()?,
            };
            client.verify_aadhaar(&aadhaar_number, &otp).await?;
            println!("Aadhaar verified.");
        }
        Commands::File {
            category,
            description,
            lat,
            lng,
            image,
            no_prompt,
        } => {
            let coordinates = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(samadhan_report_models::Coordinates::new(lat, lng)),
                _ => None,
            };
            form::run(
                &multi,
                &client,
                form::Prefill {
                    category,
                    description,
                    coordinates,
                    image,
                    no_prompt,
                },
            )
            .await?;
        }
        Commands::Reports => {
            let complaints = client.list_reports().await?;
            output::print_reports(&complaints);
        }
        Commands::Show { id } => {
            let complaint = client.get_report(id).await?;
            output::print_report(&complaint);
        }
        Commands::SetStatus { id, status } => {
            let updated = client.update_status(id, status).await?;
            println!("Report #{} is now {}.", updated.id, updated.status);
        }
        Commands::Announcements => {
            let announcements = client.list_announcements().await?;
            output::print_announcements(&announcements);
        }
        Commands::Announce {
            title,
            description,
            priority,
        } => {
            let created = client
                .post_announcement(&samadhan_client::announcements::NewAnnouncement {
                    title: &title,
                    description: &description,
                    priority,
                })
                .await?;
            println!("Published announcement #{}.", created.id);
        }
        Commands::Letter { id, output, image } => {
            letter::export(&multi, &client, id, output, image).await?;
        }
    }

    Ok(())
}

/// Prompts through the signup form and creates the account.
async fn register(client: &ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let full_name: String = Input::new().with_prompt("Full name").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let roles = [Role::Citizen, Role::DistrictLeader];
    let idx = dialoguer::Select::new()
        .with_prompt("Role")
        .items(&["Citizen", "District leader"])
        .default(0)
        .interact()?;

    let email: String = Input::new()
        .with_prompt("Email (blank to skip)")
        .allow_empty(true)
        .interact_text()?;
    let phone: String = Input::new()
        .with_prompt("Phone (blank to skip)")
        .allow_empty(true)
        .interact_text()?;
    let aadhaar: String = Input::new()
        .with_prompt("Aadhaar number (blank to skip)")
        .allow_empty(true)
        .interact_text()?;

    let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

    client
        .register(&RegisterRequest {
            full_name: full_name.clone(),
            password,
            role: roles[idx],
            email: non_empty(email),
            phone: non_empty(phone),
            aadhar_number: non_empty(aadhaar),
        })
        .await?;

    println!("Account created for {full_name}. Sign in with `samadhan_cli login`.");
    Ok(())
}
