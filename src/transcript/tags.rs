use std::sync::LazyLock;

use regex::Regex;

/// Tags Claude Code injects into user turns that readers should not see.
const NOISE_TAGS: &[&str] = &[
    "system-reminder",
    "local-command-caveat",
    "command-name",
    "command-message",
    "command-args",
    "local-command-stdout",
];

/// One pattern per tag, applied in `NOISE_TAGS` order.
static NOISE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    NOISE_TAGS
        .iter()
        .map(|tag| Regex::new(&format!("(?s)<{tag}>.*?</{tag}>")).unwrap())
        .collect()
});

/// Remove injected tag spans (including their contents) and trim the result.
pub fn strip_system_tags(text: &str) -> String {
    let mut current = text.to_string();
    // A removal can splice a new span together; repeat until nothing matches.
    while NOISE_RES.iter().any(|re| re.is_match(&current)) {
        for re in NOISE_RES.iter() {
            current = re.replace_all(&current, "").into_owned();
        }
    }
    current.trim().to_string()
}
