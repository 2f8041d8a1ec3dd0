use chrono::Local;
use clap::Subcommand;
use serde::Serialize;

use parchipay_core::model::Member;
use parchipay_core::service::{self, CommitteeParams};
use parchipay_core::{Committee, Directory, Role};

#[derive(Subcommand)]
pub enum CommitteeAction {
    /// List the committees a user sees, with dashboard figures
    List {
        /// Acting user id (e.g. user-1)
        #[arg(long)]
        user: String,
    },
    /// Print one committee in full
    Show { id: String },
    /// Create a committee; the acting admin joins automatically
    Create {
        /// Acting admin user id
        #[arg(long)]
        user: String,
        #[arg(long)]
        name: String,
        /// Monthly contribution per member
        #[arg(long)]
        amount: u64,
        /// Lifetime in monthly cycles
        #[arg(long)]
        duration: u32,
        /// Member user id; repeat for each member
        #[arg(long = "member")]
        members: Vec<String>,
        /// Optional WhatsApp group invite link
        #[arg(long)]
        whatsapp: Option<String>,
    },
}

/// Dashboard row for one committee.
#[derive(Serialize)]
struct CommitteeSummary {
    id: String,
    name: String,
    total_members: u32,
    monthly_amount: u64,
    pool_amount: u64,
    current_cycle: u32,
    duration: u32,
    eligible_for_draw: usize,
    collected_this_cycle: u64,
    defaulters: usize,
}

impl CommitteeSummary {
    fn of(c: &Committee) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            total_members: c.total_members,
            monthly_amount: c.monthly_amount,
            pool_amount: c.pool_amount(),
            current_cycle: c.current_cycle(),
            duration: c.duration,
            eligible_for_draw: c.eligible_for_draw().len(),
            collected_this_cycle: c.collected_this_cycle(),
            defaulters: c.defaulters().len(),
        }
    }
}

pub fn run(action: CommitteeAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut dir = Directory::seeded();

    match action {
        CommitteeAction::List { user } => {
            let user = super::user(&dir, &user)?;
            let summaries: Vec<CommitteeSummary> = dir
                .committees_for(user)
                .into_iter()
                .map(CommitteeSummary::of)
                .collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        CommitteeAction::Show { id } => {
            let committee = super::committee(&dir, &id)?;
            println!("{}", serde_json::to_string_pretty(committee)?);
        }
        CommitteeAction::Create {
            user,
            name,
            amount,
            duration,
            members,
            whatsapp,
        } => {
            let admin = super::user(&dir, &user)?.clone();
            let selected: Vec<Member> = members
                .iter()
                .map(|id| -> Result<Member, Box<dyn std::error::Error>> {
                    let u = super::user(&dir, id)?;
                    if u.role == Role::Admin || u.id == admin.id {
                        return Err(format!("user '{id}' cannot be added as a member").into());
                    }
                    Ok(Member::from_user(u))
                })
                .collect::<Result<_, _>>()?;

            let committee = service::create_committee(
                CommitteeParams {
                    name,
                    monthly_amount: amount,
                    duration,
                    start_date: Local::now().date_naive(),
                    whatsapp_group_url: whatsapp,
                    members: selected,
                },
                &admin,
            );
            dir.add_committee(committee.clone());
            println!("{}", serde_json::to_string_pretty(&committee)?);
        }
    }
    Ok(())
}
