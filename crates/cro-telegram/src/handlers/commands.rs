use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

const START_TEXT: &str = "Hi! I'm your Crypto Oracle. Ask me things like:\n\
- \"What's Bitcoin worth?\"\n\
- \"Convert 0.5 ETH to USD\"\n\
- \"SOL price\"\n\n\
I'll give you quick, friendly answers!";

const HELP_TEXT: &str = "Just ask naturally! Examples:\n\
\"What's Ethereum worth?\"\n\
\"Convert 1 Bitcoin to US dollars\"\n\
\"Price of Solana\"\n\n\
I support: BTC, ETH, SOL, XRP, ADA, DOGE";

pub async fn handle_command(bot: Bot, msg: Message, _state: Arc<AppState>) -> ResponseResult<()> {
    let (cmd, _args) = parse_command(msg.text().unwrap_or(""));

    let reply = match cmd.as_str() {
        "start" => START_TEXT,
        "help" => HELP_TEXT,
        _ => "Unknown command. Try /help for examples.",
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

#[cfg(test)]
mod tests {
    use super::parse_command;

    #[test]
    fn commands_are_normalized() {
        assert_eq!(parse_command("/start"), ("start".to_string(), String::new()));
        assert_eq!(
            parse_command("/HELP@CryptoOracleBot now"),
            ("help".to_string(), "now".to_string())
        );
    }
}
