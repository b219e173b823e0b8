//! Service detection from OTP message bodies
//!
//! Ordered substring scan over a fixed keyword table; first match wins,
//! so more specific keywords must precede generic ones where overlaps
//! are possible. Unmatched bodies get the generic "Other" label.

/// Keyword → canonical service label, in match-priority order
const SERVICE_KEYWORDS: &[(&str, &str)] = &[
    ("whatsapp", "WhatsApp"),
    ("telegram", "Telegram"),
    ("facebook", "Facebook"),
    ("instagram", "Instagram"),
    ("tiktok", "TikTok"),
    ("youtube", "YouTube"),
    ("google", "Google"),
    ("netflix", "Netflix"),
    ("apple", "Apple"),
    ("amazon", "Amazon"),
    ("shopee", "Shopee"),
    ("lazada", "Lazada"),
    ("tokopedia", "Tokopedia"),
    ("gojek", "Gojek"),
    ("grab", "Grab"),
    ("uber", "Uber"),
    ("discord", "Discord"),
    ("twitter", "Twitter"),
    ("viber", "Viber"),
    ("wechat", "WeChat"),
    ("kakaotalk", "KakaoTalk"),
    ("imo", "IMO"),
    // "line" is last: it is a substring of common words ("online"),
    // so every more specific keyword must get its chance first.
    ("line", "LINE"),
];

/// Best-guess service label for a message body. Never fails.
pub fn resolve_service(message_body: &str) -> &'static str {
    let body = message_body.to_lowercase();
    for (keyword, label) in SERVICE_KEYWORDS {
        if body.contains(keyword) {
            return label;
        }
    }
    "Other"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_service() {
        assert_eq!(resolve_service("Your WhatsApp code is 123456"), "WhatsApp");
        assert_eq!(resolve_service("TELEGRAM login code: 9876"), "Telegram");
    }

    #[test]
    fn test_unknown_service() {
        assert_eq!(resolve_service("random text"), "Other");
        assert_eq!(resolve_service(""), "Other");
    }

    #[test]
    fn test_first_match_wins() {
        // Both keywords present; table order decides
        assert_eq!(
            resolve_service("Use WhatsApp or Telegram to continue"),
            "WhatsApp"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(resolve_service("GOOGLE verification 4242"), "Google");
    }
}
