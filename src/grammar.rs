//! Your/you're policing through the LanguageTool public API.

use serde::Deserialize;

use crate::store::RecordStore;

const API_URL: &str = "https://api.languagetoolplus.com/v2/check";

/// LanguageTool rules that flag your/you're mix-ups.
pub const TRACKED_RULES: [&str; 2] = ["YOUR_NN", "YOUR"];

#[derive(Deserialize)]
struct CheckResponse {
    matches: Vec<RuleMatch>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RuleMatch {
    pub message: String,
    pub rule: Rule,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Rule {
    pub id: String,
}

/// Cheap pre-filter so only candidate messages hit the API.
pub fn mentions_your(content: &str) -> bool {
    let content = content.to_lowercase();
    content.contains("your") || content.contains("you're")
}

pub fn tracked(matches: Vec<RuleMatch>) -> Vec<RuleMatch> {
    matches
        .into_iter()
        .filter(|m| TRACKED_RULES.contains(&m.rule.id.as_str()))
        .collect()
}

pub async fn check(client: &reqwest::Client, text: &str) -> Result<Vec<RuleMatch>, reqwest::Error> {
    let response: CheckResponse = client
        .post(API_URL)
        .form(&[("text", text), ("language", "en-US")])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(tracked(response.matches))
}

/// Adds `amount` to the user's error count and returns the new total.
pub fn increment(store: &mut RecordStore<u64>, user_id: u64, amount: u64) -> u64 {
    let count = store.get_or_default(&user_id.to_string());
    *count += amount;
    *count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_match(id: &str) -> RuleMatch {
        RuleMatch {
            message: format!("rule {id}"),
            rule: Rule { id: id.to_string() },
        }
    }

    #[test]
    fn test_mentions_your() {
        assert!(mentions_your("Your the best"));
        assert!(mentions_your("YOU'RE late"));
        assert!(!mentions_your("you are fine"));
    }

    #[test]
    fn test_tracked_keeps_only_your_rules() {
        let kept = tracked(vec![
            rule_match("YOUR_NN"),
            rule_match("MORFOLOGIK_RULE_EN_US"),
            rule_match("YOUR"),
        ]);
        let ids: Vec<&str> = kept.iter().map(|m| m.rule.id.as_str()).collect();
        assert_eq!(ids, ["YOUR_NN", "YOUR"]);
    }

    #[test]
    fn test_check_response_shape() {
        let raw = r#"{"software":{},"matches":[{"message":"Did you mean \"you're\"?","offset":0,"length":4,"rule":{"id":"YOUR_NN","description":"your/you're"}}]}"#;
        let parsed: CheckResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.matches[0].rule.id, "YOUR_NN");
    }

    #[test]
    fn test_increment_counts_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("grammar.json")).unwrap();
        assert_eq!(increment(&mut store, 5, 1), 1);
        assert_eq!(increment(&mut store, 5, 1), 2);
        assert_eq!(store.get("5"), Some(&2));
    }
}
