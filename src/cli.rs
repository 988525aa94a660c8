use std::env::{self, VarError};

use clap::Parser;

use crate::core::constants::{BASE_URL_ENV, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(name = "causerie")]
#[command(version)]
#[command(about = "A terminal chat client for OpenAI-compatible gateways")]
#[command(long_about = "Causerie is a full-screen terminal chat client that talks to an \
OpenAI-compatible chat gateway. Replies arrive in one piece, and the model and sampling \
temperature are managed from inside the session.\n\n\
Environment Variables:\n\
  CAUSERIE_BASE_URL  Chat gateway base URL (optional, defaults to http://127.0.0.1:3000)\n\
  RUST_LOG           Log filter for diagnostics written to stderr (optional)\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             List available commands\n\
  /model [id]       Show or switch the chat model\n\
  /temperature [t]  Show or set the sampling temperature\n\
  /settings         Open the settings panel")]
pub struct Args {
    #[arg(long, value_name = "URL", help = "Chat gateway base URL")]
    pub base_url: Option<String>,
}

impl Args {
    /// Flag beats environment beats the built-in default.
    pub fn resolve_base_url(&self) -> String {
        resolve_from(self.base_url.as_ref(), env::var(BASE_URL_ENV))
    }
}

fn resolve_from(flag: Option<&String>, env_value: Result<String, VarError>) -> String {
    if let Some(url) = flag {
        return url.clone();
    }
    match env_value {
        Ok(url) if !url.trim().is_empty() => url,
        _ => DEFAULT_BASE_URL.to_string(),
    }
}
