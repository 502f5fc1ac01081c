//! Terminal rendering for complaints, announcements, and identity.

use samadhan_client::tokens::Claims;
use samadhan_report_models::{Announcement, Complaint};

/// Prints the signed-in identity line.
pub fn print_identity(claims: &Claims) {
    let name = claims.full_name.as_deref().unwrap_or("(unknown)");
    let role = claims.role.as_deref().unwrap_or("(unknown)");
    let verified = match claims.is_verified {
        Some(true) => "verified",
        Some(false) => "not verified",
        None => "verification unknown",
    };
    println!("{name} ({role}, {verified})");
}

/// Prints the complaints table.
pub fn print_reports(complaints: &[Complaint]) {
    if complaints.is_empty() {
        println!("No reports.");
        return;
    }

    println!("{:<6} {:<12} {:<12} {:<12} DESCRIPTION", "ID", "CATEGORY", "STATUS", "FILED");
    println!("{}", "-".repeat(72));
    for complaint in complaints {
        let mut description = complaint.description.clone();
        if description.chars().count() > 40 {
            description = description.chars().take(39).collect();
            description.push('…');
        }
        println!(
            "#{:<5} {:<12} {:<12} {:<12} {description}",
            complaint.id,
            complaint.category,
            complaint.status,
            complaint.created_at.format("%Y-%m-%d"),
        );
    }
}

/// Prints one complaint in full.
pub fn print_report(complaint: &Complaint) {
    println!("Report #{}", complaint.id);
    println!("  Category:    {}", complaint.category.label());
    println!("  Status:      {}", complaint.status);
    println!("  Filed:       {}", complaint.created_at.format("%Y-%m-%d %H:%M"));
    if let Some(citizen) = &complaint.citizen {
        println!("  Citizen:     {citizen}");
    }
    if let Some(coords) = complaint.coordinates() {
        println!("  Location:    {coords}");
    }
    if let Some(address) = &complaint.address {
        println!("  Address:     {address}");
    }
    if let Some(image) = &complaint.image {
        println!("  Evidence:    {image}");
    }
    println!("  Description: {}", complaint.description);
}

/// Prints the announcements feed.
pub fn print_announcements(announcements: &[Announcement]) {
    if announcements.is_empty() {
        println!("No announcements.");
        return;
    }

    for announcement in announcements {
        println!(
            "[{}] {} ({})",
            announcement.priority,
            announcement.title,
            announcement.date.format("%Y-%m-%d %H:%M"),
        );
        println!("    {}", announcement.description);
    }
}
