// output formatting - readable transcript or raw json

use crate::core::{Exchange, Reply};

pub struct Output;

impl Output {
    pub fn reply(reply: &Reply) {
        if reply.is_crisis {
            println!("[crisis] {}", reply.text);
        } else {
            println!("{}", reply.text);
        }
        println!("\n({}, {})", reply.emotion, source_label(reply));
    }

    // same shape the web client used to get back
    pub fn reply_raw(reply: &Reply) {
        let body = serde_json::json!({
            "response": reply.text,
            "emotion": reply.emotion,
            "crisis": reply.is_crisis,
        });
        println!("{body}");
    }

    pub fn history(history: &[Exchange]) {
        if history.is_empty() {
            println!("no conversation yet");
            return;
        }

        for exchange in history {
            let emotion = exchange
                .emotion
                .map(|e| format!(" [{e}]"))
                .unwrap_or_default();
            println!("{}{}", short_time(&exchange.timestamp), emotion);
            println!("  you:    {}", exchange.user_msg);
            println!("  serena: {}", exchange.bot_msg);
            println!();
        }
    }

    pub fn history_raw(history: &[Exchange]) {
        let body = serde_json::json!({ "history": history });
        println!("{body}");
    }
}

fn source_label(reply: &Reply) -> &'static str {
    match reply.source {
        crate::core::ReplySource::Crisis => "safety message",
        crate::core::ReplySource::Generated => "generated",
        crate::core::ReplySource::Template => "offline reply",
    }
}

// "2026-10-19T14:03:22.123+02:00" -> "2026-10-19 14:03"
fn short_time(timestamp: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => timestamp.to_string(),
    }
}
