use clap::Subcommand;

use parchipay_core::storage::Config;
use parchipay_core::Directory;

#[derive(Subcommand)]
pub enum ProfileAction {
    /// List the users available to act as (select one by id)
    Users,
    /// Show a user's details and current settings
    Show {
        /// Acting user id
        #[arg(long)]
        user: String,
    },
    /// Get a setting by dot-separated key (e.g. notifications.enabled)
    Get { key: String },
    /// Set a setting by dot-separated key
    Set { key: String, value: String },
}

pub fn run(action: ProfileAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProfileAction::Users => {
            let dir = Directory::seeded();
            println!("{}", serde_json::to_string_pretty(dir.users())?);
        }
        ProfileAction::Show { user } => {
            let dir = Directory::seeded();
            let user = super::user(&dir, &user)?;
            let config = Config::load()?;
            println!(
                "{}",
                serde_json::json!({
                    "user": user,
                    "settings": config,
                })
            );
        }
        ProfileAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ProfileAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}
