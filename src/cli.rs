use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "lazybooking", version, about = "Browse and order laundry services from the terminal")]
pub struct Args {
    /// Base URL of the booking backend (e.g., "https://laundry.example")
    #[arg(short, long)]
    pub api_url: Option<String>,

    /// Session file to read the logged-in customer from
    #[arg(short, long)]
    pub session: Option<PathBuf>,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,
}
