use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "display this text.")]
    Help,
    #[command(description = "subscribe to announcements.")]
    Start,
    #[command(description = "send a message to every subscriber (admins only).")]
    Broadcast,
    #[command(description = "abort the broadcast being composed.")]
    Cancel,
}
