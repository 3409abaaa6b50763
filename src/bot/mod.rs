use crate::nova::Nova;
use interface::Speaker;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub mod data;
pub mod interface;

#[derive(Debug)]
pub struct Bot {
    nova: Nova,
    trigger: String,
    nickname: Option<String>,
    has_token: bool,
}

impl Bot {
    pub fn new(data: data::BotData) -> Self {
        Self {
            nova: data.nova,
            trigger: data.trigger,
            nickname: data.bot_nickname,
            has_token: data.bot_token.is_some(),
        }
    }

    pub fn event_ready(&self) {
        match &self.nickname {
            Some(nickname) => tracing::info!("Logged in as | {nickname}"),
            None => tracing::info!("TWITCH_BOT_NICKNAME is not set, running anonymously"),
        }
        if let Some(birthday) = self.nova.streamer_birthday() {
            tracing::debug!("Streamer birthday is {birthday}");
        }
        if !self.has_token {
            tracing::debug!("TWITCH_BOT_TOKEN is not set");
        }
    }

    /// Handles one chat line. Lines without the trigger are not for Nova.
    pub async fn event_message(&mut self, message: &str, speaker: &mut impl Speaker) {
        let Some(request) = strip_trigger(message, &self.trigger) else {
            return;
        };
        if let Err(err) = self.nova.respond(&request, speaker).await {
            tracing::error!("{err}");
        }
    }

    /// Reads chat lines until the input is closed.
    pub async fn run<R: AsyncBufRead + Unpin>(
        &mut self,
        input: R,
        speaker: &mut impl Speaker,
    ) -> std::io::Result<()> {
        let mut lines = input.lines();
        loop {
            speaker.prompt();
            let Some(line) = lines.next_line().await? else {
                tracing::info!("Input closed, shutting down");
                return Ok(());
            };
            self.event_message(line.trim(), speaker).await;
        }
    }
}

/// Removes every occurrence of `trigger` from `message`. `None` when the
/// trigger is absent or nothing is left once it is removed.
pub fn strip_trigger(message: &str, trigger: &str) -> Option<String> {
    if trigger.is_empty() || !message.contains(trigger) {
        return None;
    }
    let request = message.replace(trigger, "");
    let request = request.trim();
    (!request.is_empty()).then(|| String::from(request))
}
