//! Keyword-based category classification for monitoring messages

use tracing::debug;

use crate::core::models::Category;

/// Keyword table in priority order; the first category with any substring hit
/// wins. Keywords are matched against the lower-cased message, untokenized.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Error,
        &[
            "error", "failed", "failure", "exception", "crash", "critical",
            "timeout", "connection refused", "unavailable", "unreachable",
            "fatal", "abort", "panic", "segfault", "core dump", "stack trace",
        ],
    ),
    (
        Category::Security,
        &[
            "security", "unauthorized", "authentication", "permission",
            "denied", "blocked", "suspicious", "breach", "attack",
            "intrusion", "malware", "virus", "exploit", "vulnerability",
            "firewall", "access denied", "forbidden", "ssl", "certificate",
        ],
    ),
    (
        Category::Warning,
        &[
            "warning", "warn", "high", "low", "threshold", "exceeded",
            "approaching", "usage", "memory", "cpu", "disk", "performance",
            "degraded", "slow", "latency", "queue", "buffer", "limit",
        ],
    ),
    (
        Category::Info,
        &[
            "started", "completed", "finished", "success", "healthy",
            "backup", "maintenance", "update", "restart", "loaded",
            "initialized", "ready", "online", "connected", "synced",
            "deployed", "created", "deleted", "modified",
        ],
    ),
];

/// Classify a monitoring message into a severity category.
///
/// Case-insensitive, deterministic and total; messages matching no keyword
/// fall through to [`Category::General`].
pub fn classify(text: &str) -> Category {
    let text_lower = text.to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| text_lower.contains(keyword)) {
            debug!(%category, "message classified by keyword match");
            return *category;
        }
    }

    debug!("no keyword match, message classified as general");
    Category::General
}
