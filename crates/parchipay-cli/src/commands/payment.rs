use chrono::Local;
use clap::Subcommand;
use serde::Serialize;

use parchipay_core::reminder::{reminder_window, DueProximity};
use parchipay_core::service;
use parchipay_core::{Committee, Directory, PaymentStatus};

#[derive(Subcommand)]
pub enum PaymentAction {
    /// Per-member status for a committee's current cycle
    Status {
        /// Committee id (e.g. committee-1)
        committee: String,
    },
    /// Advance one member's marking: no record -> Paid, then
    /// Pending -> Paid -> Late -> Pending
    Mark {
        committee: String,
        /// Member user id
        member: String,
    },
}

#[derive(Serialize)]
struct PaymentRow {
    user_id: String,
    name: String,
    status: PaymentStatus,
    has_won: bool,
}

#[derive(Serialize)]
struct PaymentView {
    committee_id: String,
    cycle: u32,
    due_proximity: String,
    days_remaining: i64,
    members: Vec<PaymentRow>,
}

fn view(committee: &Committee) -> PaymentView {
    let cycle = committee.current_cycle();
    let window = reminder_window(committee.payment_due_day, Local::now().date_naive());
    PaymentView {
        committee_id: committee.id.clone(),
        cycle,
        due_proximity: match window.proximity {
            DueProximity::None => "none",
            DueProximity::Reminder => "reminder",
            DueProximity::Urgent => "urgent",
        }
        .to_string(),
        days_remaining: window.days_remaining,
        members: committee
            .members
            .iter()
            .map(|m| PaymentRow {
                user_id: m.user_id.clone(),
                name: m.name.clone(),
                status: m.payment_status_for(cycle),
                has_won: m.has_won,
            })
            .collect(),
    }
}

pub fn run(action: PaymentAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut dir = Directory::seeded();

    match action {
        PaymentAction::Status { committee } => {
            let committee = super::committee(&dir, &committee)?;
            println!("{}", serde_json::to_string_pretty(&view(committee))?);
        }
        PaymentAction::Mark { committee, member } => {
            let current = super::committee(&dir, &committee)?;
            let updated = service::cycle_payment_status(current, &member)?;
            dir.replace_committee(updated)?;
            let committee = super::committee(&dir, &committee)?;
            println!("{}", serde_json::to_string_pretty(&view(committee))?);
        }
    }
    Ok(())
}
