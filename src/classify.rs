//! Bot/human classification from the request User-Agent.
//!
//! Link-preview crawlers get the static metadata document; human browsers
//! get redirected to the canonical page. Unknown or missing user agents
//! classify as human so a real visitor is never trapped on a metadata page.

/// Classification of the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Client {
    /// A link-preview or indexing crawler.
    Bot,
    /// Anything else, including missing/empty user agents.
    Human,
}

/// Known crawler signatures, matched case-insensitively as substrings.
const BOT_SIGNATURES: &[&str] = &[
    "facebookexternalhit",
    "facebookcatalog",
    "facebot",
    "twitterbot",
    "slackbot",
    "slack-imgproxy",
    "linkedinbot",
    "whatsapp",
    "telegrambot",
    "discordbot",
    "skypeuripreview",
    "googlebot",
    "bingbot",
    "yandexbot",
    "duckduckbot",
    "baiduspider",
    "pinterest",
    "pinterestbot",
    "redditbot",
    "vkshare",
    "applebot",
    "embedly",
    "quora link preview",
    "outbrain",
    "rogerbot",
    "showyoubot",
    "ia_archiver",
];

/// Classify a user-agent string.
///
/// Pure function; an empty string is a `Human`.
pub fn classify(user_agent: &str) -> Client {
    if user_agent.is_empty() {
        return Client::Human;
    }
    let lowered = user_agent.to_ascii_lowercase();
    if BOT_SIGNATURES.iter().any(|sig| lowered.contains(sig)) {
        Client::Bot
    } else {
        Client::Human
    }
}
