use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;

mod assistant;
mod bot;
mod cli;
mod config;
mod dates;
mod location;
mod nova;
mod options;
mod template;
mod weather;

#[tokio::main]
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::Cli::parse();

    let options = options::Options::load(args.options_file.as_deref()).await?;
    options.init_logging();

    let config = config::BotConfig::load(args.env_file.as_deref())?;

    let dataset_path = args.dataset.unwrap_or_else(|| options.nova.dataset.clone());
    let model_path = args.model.unwrap_or_else(|| options.nova.model.clone());

    let dataset = assistant::Dataset::load(&dataset_path).await?;
    let mut assistant: assistant::Assistant = assistant::Assistant::new(dataset, model_path);
    assistant.load_or_train(args.retrain).await?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.services.timeout_secs))
        .build()?;

    let nova = nova::Nova::new(nova::NovaData {
        config: config.clone(),
        assistant,
        client,
        services: options.services.clone(),
        location: options.location,
    });

    let mut bot = bot::Bot::new(bot::data::BotData {
        nova,
        trigger: options.nova.trigger.clone(),
        bot_nickname: config.twitch_bot_nickname,
        bot_token: config.twitch_bot_token,
    });
    bot.event_ready();
    bot.run(
        tokio::io::BufReader::new(tokio::io::stdin()),
        &mut bot::interface::ConsoleSpeaker,
    )
    .await?;

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
