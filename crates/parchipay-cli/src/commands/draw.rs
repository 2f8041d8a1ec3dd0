use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;

use parchipay_core::collaborators::whatsapp;
use parchipay_core::model::Member;
use parchipay_core::service;
use parchipay_core::storage::Config;
use parchipay_core::{Database, Directory, DrawEngine, DrawPacing, DrawState, Event};

#[derive(Subcommand)]
pub enum DrawAction {
    /// Run the full draw lifecycle for a committee's current cycle
    Run {
        /// Committee id (e.g. committee-1)
        committee: String,
        /// Fixed seed for a reproducible reveal
        #[arg(long)]
        seed: Option<u64>,
        /// Skip the animation delays
        #[arg(long)]
        fast: bool,
        /// Do not hand the announcement off to WhatsApp
        #[arg(long)]
        no_share: bool,
    },
    /// Cross-committee draw history for a user, most recent first
    History {
        /// Acting user id
        #[arg(long)]
        user: String,
    },
}

#[derive(Serialize)]
struct HistoryRow {
    committee_id: String,
    committee_name: String,
    cycle: u32,
    winner_id: String,
    winner_name: String,
    timestamp: DateTime<Utc>,
}

pub fn run(action: DrawAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DrawAction::Run {
            committee,
            seed,
            fast,
            no_share,
        } => run_draw(&committee, seed, fast, no_share),
        DrawAction::History { user } => history(&user),
    }
}

fn run_draw(
    committee_id: &str,
    seed: Option<u64>,
    fast: bool,
    no_share: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dir = Directory::seeded();
    let committee = super::committee(&dir, committee_id)?.clone();

    // Fresh eligibility snapshot, taken at the moment of the attempt.
    let eligible: Vec<Member> = committee.eligible_for_draw().into_iter().cloned().collect();

    let pacing = if fast {
        DrawPacing {
            shuffle_ms: 0,
            hop_delay_ms: 0,
        }
    } else {
        Config::load()?.pacing()
    };
    let mut engine = match seed {
        Some(seed) => DrawEngine::with_seed(pacing, seed),
        None => DrawEngine::new(pacing),
    };

    let started = engine.start(committee.current_cycle(), eligible)?;
    println!("{}", serde_json::to_string_pretty(&started)?);

    let winner_id = loop {
        if let Some(event) = engine.tick() {
            println!("{}", serde_json::to_string_pretty(&event)?);
            if let Event::DrawFinished { winner_id, .. } = event {
                break winner_id;
            }
        }
        if engine.state() == DrawState::Shuffling || engine.state() == DrawState::Selecting {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
    };

    let updated = service::record_draw(&committee, &winner_id, Utc::now())?;
    dir.replace_committee(updated.clone())?;
    let winner = updated
        .member(&winner_id)
        .ok_or("draw winner is no longer a member")?;

    // Publish the outcome to the notification ledger.
    let db = Database::open()?;
    let mut ledger = db.ledger()?;
    ledger.append(
        &updated.id,
        &format!(
            "\u{1f389} Winner Announced! {} has won the draw for \"{}\".",
            winner.name, updated.name
        ),
    );
    db.save_ledger(&ledger)?;

    let message = whatsapp::winner_announcement(&updated, winner);
    println!("{message}");
    if !no_share {
        whatsapp::share(&message);
    }

    println!("{}", serde_json::to_string_pretty(&updated)?);
    Ok(())
}

fn history(user_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Directory::seeded();
    let user = super::user(&dir, user_id)?;

    let mut rows: Vec<HistoryRow> = dir
        .committees_for(user)
        .into_iter()
        .flat_map(|c| {
            c.draw_history.iter().map(|d| HistoryRow {
                committee_id: c.id.clone(),
                committee_name: c.name.clone(),
                cycle: d.cycle,
                winner_id: d.winner_id.clone(),
                winner_name: c.winner_name(d).unwrap_or("Unknown").to_string(),
                timestamp: d.timestamp,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
