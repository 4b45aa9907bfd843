// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand};
use futures_util::StreamExt;
use tracing::{error, info, warn};

use botwire::params::{CopyMessageParams, GetUpdatesParams, SetWebhookParams};
use botwire::{Bot, BotConfig, UpdateStream};

#[derive(Parser)]
#[command(name = "botwire", version, about = "Bot API client and update listener")]
struct Cli {
    #[command(flatten)]
    config: BotConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print updates received via long polling.
    Updates {
        /// Long-poll timeout in seconds passed to `getUpdates`.
        #[arg(long, default_value_t = 30)]
        timeout: u32,
    },
    /// Copy every received message back to its chat.
    Echo {
        #[arg(long, default_value_t = 30)]
        timeout: u32,
    },
    /// Serve the webhook endpoint and print incoming updates.
    Webhook {
        /// Public URL to register with `setWebhook` before listening.
        #[arg(long)]
        public_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let bot = Bot::from_config(&cli.config)?;
    let me = bot.get_me().await?;
    info!(id = me.id, username = ?me.username, "authorized");

    match cli.command {
        Command::Updates { timeout } => {
            let updates = long_polling(&bot, timeout)?;
            print_updates(updates).await
        }
        Command::Echo { timeout } => {
            let updates = long_polling(&bot, timeout)?;
            echo(&bot, updates).await;
            Ok(())
        }
        Command::Webhook { public_url } => {
            if let Some(url) = public_url {
                bot.set_webhook(SetWebhookParams { url, ..Default::default() }).await?;
            }
            let updates = bot.updates_via_webhook(&cli.config.webhook_path)?;
            let addr = bot.start_listening_for_webhook(&cli.config.webhook_addr()).await?;
            info!(%addr, path = %cli.config.webhook_path, "waiting for updates");
            stop_on_ctrl_c(bot.clone());
            print_updates(updates).await
        }
    }
}

fn long_polling(bot: &Bot, timeout: u32) -> anyhow::Result<UpdateStream> {
    let params = GetUpdatesParams { timeout: Some(timeout), ..Default::default() };
    let updates = bot.updates_via_long_polling(Some(params))?;
    stop_on_ctrl_c(bot.clone());
    Ok(updates)
}

/// Fire the active source's stop signal on Ctrl-C.
fn stop_on_ctrl_c(bot: Bot) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(err = %e, "cannot listen for ctrl-c");
            return;
        }
        info!("stopping");
        bot.stop_long_polling();
        bot.stop_webhook();
    });
}

async fn print_updates(updates: UpdateStream) -> anyhow::Result<()> {
    let mut updates = std::pin::pin!(updates.into_stream());
    while let Some(update) = updates.next().await {
        println!("{}", serde_json::to_string(&update)?);
    }
    Ok(())
}

async fn echo(bot: &Bot, mut updates: UpdateStream) {
    while let Some(update) = updates.recv().await {
        let Some(message) = update.message else {
            continue;
        };
        let params = CopyMessageParams::new(message.chat.id, message.chat.id, message.message_id);
        match bot.copy_message(params).await {
            Ok(copied) => info!(chat_id = message.chat.id, message_id = copied.message_id, "echoed"),
            Err(e) => warn!(chat_id = message.chat.id, err = %e, "echo failed"),
        }
    }
}
