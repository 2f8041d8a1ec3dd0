use chrono::Local;
use clap::Subcommand;

use parchipay_core::reminder::ReminderScheduler;
use parchipay_core::storage::Config;
use parchipay_core::{Database, Directory};

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Run the reminder scheduler for a user (at most once per
    /// committee, month and offset, enforced by durable markers)
    Remind {
        /// Acting user id
        #[arg(long)]
        user: String,
    },
    /// List a user's notifications, most recent first
    List {
        #[arg(long)]
        user: String,
    },
    /// Unread notification count for a user
    Unread {
        #[arg(long)]
        user: String,
    },
    /// Mark all of a user's notifications read
    MarkRead {
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Directory::seeded();
    let db = Database::open()?;

    match action {
        NotifyAction::Remind { user } => {
            let config = Config::load()?;
            if !config.notifications.enabled {
                println!("notifications are disabled (profile set notifications.enabled true)");
                return Ok(());
            }

            let user = super::user(&dir, &user)?;
            let committees = dir.committees_for(user);
            let today = Local::now().date_naive();

            let fired = ReminderScheduler::new(&db).run(&committees, &user.id, today)?;
            if fired.is_empty() {
                println!("no reminders due");
                return Ok(());
            }

            let mut ledger = db.ledger()?;
            for intent in &fired {
                let notification = ledger.append(&intent.committee_id, &intent.message);
                println!("{}", serde_json::to_string_pretty(notification)?);
            }
            db.save_ledger(&ledger)?;
        }
        NotifyAction::List { user } => {
            let user = super::user(&dir, &user)?;
            let ids = dir.committee_ids_for(user);
            let ledger = db.ledger()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&ledger.for_committees(&ids))?
            );
        }
        NotifyAction::Unread { user } => {
            let user = super::user(&dir, &user)?;
            let ids = dir.committee_ids_for(user);
            let ledger = db.ledger()?;
            let read = db.read_set(&user.id)?;
            println!(
                "{}",
                serde_json::json!({ "unread": ledger.unread_count(&ids, &read) })
            );
        }
        NotifyAction::MarkRead { user } => {
            let user = super::user(&dir, &user)?;
            let ids = dir.committee_ids_for(user);
            let ledger = db.ledger()?;
            let mut read = db.read_set(&user.id)?;
            read.mark_all_read(ledger.for_committees(&ids));
            db.save_read_set(&user.id, &read)?;
            println!(
                "{}",
                serde_json::json!({ "read": read.len(), "unread": ledger.unread_count(&ids, &read) })
            );
        }
    }
    Ok(())
}
