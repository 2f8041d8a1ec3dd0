use clap::Subcommand;

use parchipay_core::collaborators::whatsapp;
use parchipay_core::Directory;

#[derive(Subcommand)]
pub enum WhatsappAction {
    /// Compose a group payment reminder and hand it off
    Remind {
        /// Committee id (e.g. committee-1)
        committee: String,
        /// Print only; skip the handoff
        #[arg(long)]
        no_share: bool,
    },
    /// Re-announce the latest committed draw
    Announce {
        committee: String,
        #[arg(long)]
        no_share: bool,
    },
}

pub fn run(action: WhatsappAction) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Directory::seeded();

    match action {
        WhatsappAction::Remind {
            committee,
            no_share,
        } => {
            let committee = super::committee(&dir, &committee)?;
            match whatsapp::payment_reminder(committee) {
                Some(message) => {
                    println!("{message}");
                    if !no_share {
                        whatsapp::share(&message);
                    }
                }
                None => println!("All eligible members have paid for this month!"),
            }
        }
        WhatsappAction::Announce {
            committee,
            no_share,
        } => {
            let committee = super::committee(&dir, &committee)?;
            let last = committee
                .draw_history
                .last()
                .ok_or("no draws have taken place yet")?;
            let winner = committee
                .member(&last.winner_id)
                .ok_or("draw winner is no longer a member")?;
            let message = whatsapp::winner_announcement(committee, winner);
            println!("{message}");
            if !no_share {
                whatsapp::share(&message);
            }
        }
    }
    Ok(())
}
