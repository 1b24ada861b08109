use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "layout-cli")]
#[command(about = "Management CLI for the layout control server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the running playlist
    Playlist,
    /// Show the initial and current configuration
    Config,
    /// Show recent errors
    Errors,
    /// Show the current layout
    Layout,
    /// Show per-client state
    Clients,
    /// Check server status
    Status,
    /// Advance to the next layout
    Skip,
    /// Queue a module to play next
    Play {
        /// Module name
        module: String,
    },
    /// Replace the running playlist with the contents of a file
    SetConfig {
        /// JSON playlist file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    // Redirects are reported, not followed.
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let url = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Playlist => client.get(format!("{}/api/playlist", url)).send().await?,
        Commands::Config => client.get(format!("{}/api/config", url)).send().await?,
        Commands::Errors => client.get(format!("{}/api/errors", url)).send().await?,
        Commands::Layout => client.get(format!("{}/api/layout", url)).send().await?,
        Commands::Clients => client.get(format!("{}/api/clients", url)).send().await?,
        Commands::Status => client.get(format!("{}/status", url)).send().await?,
        Commands::Skip => client.post(format!("{}/api/skip", url)).send().await?,
        Commands::Play { module } => {
            client
                .post(format!("{}/api/play", url))
                .query(&[("module", module)])
                .send()
                .await?
        }
        Commands::SetConfig { file } => {
            let config = std::fs::read_to_string(&file)?;
            client
                .post(format!("{}/api/config", url))
                .form(&[("config", config)])
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if status.is_redirection() {
        println!("OK ({})", status);
        return Ok(());
    }
    if !status.is_success() {
        eprintln!("Error: control API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("OK");
        return Ok(());
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
