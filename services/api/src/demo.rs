use crate::infra::{
    InMemoryContentRepository, InMemoryDonationRepository, InMemoryEnrollmentRepository,
    InMemoryTrainingRepository,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use std::sync::Arc;

use hopebridge::error::AppError;
use hopebridge::moderation::donations::{DonationService, DonationSubmission, PaymentMethod};
use hopebridge::moderation::enrollments::{
    EnrollmentRequest, EnrollmentService, TrainingDraft, UserId,
};
use hopebridge::moderation::identity::CallerIdentity;
use hopebridge::moderation::lifecycle::{ListingFilter, ModerationDecision};
use hopebridge::moderation::publishing::{ContentDraft, ContentKind, PublishingService};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Campaign label used for the sample donation
    #[arg(long, default_value = "Winter Drive")]
    pub(crate) campaign: String,
    /// Print the donation ledger as CSV at the end of the run
    #[arg(long)]
    pub(crate) export_csv: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        campaign,
        export_csv,
    } = args;

    let admin = CallerIdentity::admin("demo-admin");
    let today = Local::now().date_naive();

    println!("Moderation workflow demo");

    let donations = DonationService::new(Arc::new(InMemoryDonationRepository::default()));

    println!("\nDonations");
    let donation = match donations.submit(DonationSubmission {
        donor: None,
        amount_cents: 5000,
        donated_on: today,
        method: PaymentMethod::Card,
        campaign,
        receipt_reference: None,
    }) {
        Ok(donation) => donation,
        Err(err) => {
            println!("  Submission rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Received {} for '{}' -> status {}",
        donation.id.0,
        donation.campaign,
        donation.status.label()
    );

    match donations.approve(&donation.id, &admin) {
        Ok(approved) => println!("- Approved by {} -> status {}", admin.id, approved.status.label()),
        Err(err) => println!("- Approval failed: {err}"),
    }
    match donations.approve(&donation.id, &admin) {
        Ok(_) => println!("- Unexpected second approval"),
        Err(err) => println!("- Second approval refused: {err}"),
    }

    let enrollments = EnrollmentService::new(
        Arc::new(InMemoryTrainingRepository::default()),
        Arc::new(InMemoryEnrollmentRepository::default()),
    );

    println!("\nEnrollments");
    let training = match enrollments.create_training(demo_training(today), &admin) {
        Ok(training) => training,
        Err(err) => {
            println!("  Training creation failed: {err}");
            return Ok(());
        }
    };
    println!("- Training '{}' open for applications", training.title);

    let request = EnrollmentRequest {
        user_id: UserId("demo-user".to_string()),
        training_id: training.id.clone(),
    };
    let enrollment = match enrollments.apply(request.clone()) {
        Ok(enrollment) => enrollment,
        Err(err) => {
            println!("  Application failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- {} applied -> status {}, payment {}",
        enrollment.user_id.0,
        enrollment.status.label(),
        enrollment.payment_status.label()
    );

    match enrollments.apply(request) {
        Ok(_) => println!("- Unexpected duplicate application"),
        Err(err) => println!("- Duplicate application refused: {err}"),
    }

    match enrollments.confirm_payment(&enrollment.id, Some("pi_demo".to_string())) {
        Ok(paid) => println!(
            "- Payment confirmed -> status {}, payment {}",
            paid.status.label(),
            paid.payment_status.label()
        ),
        Err(err) => println!("- Payment confirmation failed: {err}"),
    }

    match enrollments.update_status(&enrollment.id, ModerationDecision::Approve, &admin) {
        Ok(approved) => println!(
            "- Approved -> status {}, payment {}",
            approved.status.label(),
            approved.payment_status.label()
        ),
        Err(err) => println!("- Approval failed: {err}"),
    }

    let publishing = PublishingService::new(Arc::new(InMemoryContentRepository::default()));

    println!("\nContent");
    let item = match publishing.create(demo_content(), &admin) {
        Ok(item) => item,
        Err(err) => {
            println!("  Content creation failed: {err}");
            return Ok(());
        }
    };
    println!("- Drafted '{}' (published: {})", item.title, item.is_published);

    for _ in 0..2 {
        match publishing.toggle_publish(&item.id, &admin) {
            Ok(updated) => println!("- Toggled -> published: {}", updated.is_published),
            Err(err) => println!("- Toggle failed: {err}"),
        }
    }

    match donations.list(ListingFilter { pending_only: true }, &admin) {
        Ok(pending) => println!("\nPending donations after the run: {}", pending.len()),
        Err(err) => println!("\nPending listing failed: {err}"),
    }

    if export_csv {
        match donations.export(&admin) {
            Ok(csv) => println!("\nDonation ledger:\n{csv}"),
            Err(err) => println!("\nLedger export failed: {err}"),
        }
    }

    Ok(())
}

fn demo_training(today: NaiveDate) -> TrainingDraft {
    TrainingDraft {
        title: "Volunteer Orientation".to_string(),
        description: "Intro session for new volunteers.".to_string(),
        scheduled_on: today + chrono::Duration::days(21),
        price_cents: 0,
        image_reference: None,
        is_active: true,
    }
}

fn demo_content() -> ContentDraft {
    ContentDraft {
        kind: ContentKind::Post,
        title: "Demo Post".to_string(),
        summary: "A sample post for the CLI walkthrough.".to_string(),
        media_reference: None,
    }
}
