use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "parchipay-cli",
    version,
    about = "ParchiPay CLI -- committee management over the sample registry"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Committee listing and creation
    Committee {
        #[command(subcommand)]
        action: commands::committee::CommitteeAction,
    },
    /// Payment status views and marking
    Payment {
        #[command(subcommand)]
        action: commands::payment::PaymentAction,
    },
    /// Draw lifecycle and history
    Draw {
        #[command(subcommand)]
        action: commands::draw::DrawAction,
    },
    /// Notifications and reminders
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Committee rules generation
    Rules {
        #[command(subcommand)]
        action: commands::rules::RulesAction,
    },
    /// Profile and settings
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// WhatsApp message composition and handoff
    Whatsapp {
        #[command(subcommand)]
        action: commands::whatsapp::WhatsappAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Committee { action } => commands::committee::run(action),
        Commands::Payment { action } => commands::payment::run(action),
        Commands::Draw { action } => commands::draw::run(action),
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Rules { action } => commands::rules::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Whatsapp { action } => commands::whatsapp::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
