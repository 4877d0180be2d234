// command line interface

use crate::config::{AiConfig, Config};
use crate::core::{EmotionRules, SelectorConfig, TemplatePick, DEFAULT_MODEL, PERSONA};
use crate::{Companion, Output};
use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "serena", about = "A companion to talk to, with encrypted local memory")]
struct Cli {
    /// encrypted conversation file
    #[arg(long, env = "SERENA_DATA_FILE", default_value = "chat_data.enc", global = true)]
    data_file: PathBuf,

    /// storage key file (keep it, the data is unreadable without it)
    #[arg(long, env = "SERENA_KEY_FILE", default_value = "secret.key", global = true)]
    key_file: PathBuf,

    /// whose conversation to use
    #[arg(long, short, env = "SERENA_USER", default_value = "default_user", global = true)]
    user: String,

    /// gemini api key (defaults to GEMINI_API_KEY or GOOGLE_API_KEY)
    #[arg(long, short = 'k', global = true)]
    api_key: Option<String>,

    /// gemini model name
    #[arg(long, short, default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// seconds to wait for a generated reply
    #[arg(long, default_value = "20", global = true)]
    timeout: u64,

    /// past exchanges sent along with each message
    #[arg(long, default_value = "8", global = true)]
    history_window: usize,

    /// never call the hosted model, always answer offline
    #[arg(long, global = true)]
    no_ai: bool,

    /// always use the first canned reply instead of a random one
    #[arg(long, global = true)]
    first_template: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// send one message and print the reply
    Say {
        /// the message
        #[arg(required = true)]
        message: Vec<String>,

        /// print {response, emotion, crisis} as json
        #[arg(long)]
        json: bool,
    },

    /// print the stored conversation
    History {
        /// print as json
        #[arg(long)]
        json: bool,
    },

    /// forget the stored conversation
    Clear {
        /// forget every user, not just the current one
        #[arg(long)]
        all: bool,
    },
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            data_file: self.data_file.clone(),
            key_file: self.key_file.clone(),
            user_id: self.user.clone(),
            ai: AiConfig {
                enabled: !self.no_ai,
                api_key: self.api_key.clone(),
                model: self.model.clone(),
                timeout: Duration::from_secs(self.timeout),
                base_url: None,
            },
            selector: SelectorConfig {
                rules: EmotionRules::default(),
                history_window: self.history_window,
                pick: if self.first_template {
                    TemplatePick::First
                } else {
                    TemplatePick::Random
                },
                persona: PERSONA.to_string(),
            },
        }
    }
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Some(command) => {
            init_logging();
            let companion = Companion::from_config(&config)?;
            run_command(&companion, command).await
        }

        // the tui draws its own log panel, so no stderr subscriber here
        None => {
            let companion = Companion::from_config(&config)?;
            Ok(crate::tui::run(companion).await?)
        }
    }
}

async fn run_command(companion: &Companion, command: Commands) -> Result<()> {
    match command {
        Commands::Say { message, json } => {
            let reply = companion.turn(&message.join(" ")).await?;
            if json {
                Output::reply_raw(&reply);
            } else {
                Output::reply(&reply);
            }
        }

        Commands::History { json } => {
            let history = companion.history();
            if json {
                Output::history_raw(&history);
            } else {
                Output::history(&history);
            }
        }

        Commands::Clear { all: true } => {
            companion.forget_everyone()?;
            println!("cleared all conversations");
        }

        Commands::Clear { all: false } => {
            if companion.forget()? {
                println!("cleared conversation for {}", companion.user_id());
            } else {
                println!("nothing stored for {}", companion.user_id());
            }
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // a second init (tests, embedding) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
