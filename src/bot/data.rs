#[derive(Debug)]
pub struct BotData {
    pub nova: crate::nova::Nova,
    pub trigger: String,
    pub bot_nickname: Option<String>,
    pub bot_token: Option<String>,
}
