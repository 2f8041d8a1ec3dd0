use clap::Subcommand;

use parchipay_core::collaborators::RulesGenerator;
use parchipay_core::service;
use parchipay_core::Directory;

#[derive(Subcommand)]
pub enum RulesAction {
    /// Generate rules text for a committee and print the result
    Generate {
        /// Committee id (e.g. committee-1)
        committee: String,
    },
    /// Print a committee's current rules
    Show { committee: String },
    /// Store the Gemini API key in the OS keyring
    SetKey { key: String },
}

pub fn run(action: RulesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RulesAction::Generate { committee } => {
            let mut dir = Directory::seeded();
            let current = super::committee(&dir, &committee)?.clone();
            let text = RulesGenerator::new().generate(&current);
            let updated = service::set_rules(&current, text.clone());
            dir.replace_committee(updated)?;
            println!("{text}");
        }
        RulesAction::Show { committee } => {
            let dir = Directory::seeded();
            let committee = super::committee(&dir, &committee)?;
            match &committee.rules {
                Some(rules) => println!("{rules}"),
                None => println!("No rules have been set for this committee yet."),
            }
        }
        RulesAction::SetKey { key } => {
            RulesGenerator::new().set_credentials(&key)?;
            println!("API key stored");
        }
    }
    Ok(())
}
