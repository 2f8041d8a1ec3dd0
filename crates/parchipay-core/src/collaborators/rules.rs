//! Rules text generation via the Gemini API.
//!
//! Degrades to fixed human-readable fallback strings when the key is
//! missing or the call fails -- nothing past this boundary ever errors.

use indoc::formatdoc;
use reqwest::Client;
use serde_json::json;

use crate::collaborators::keyring_store;
use crate::model::Committee;

const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Shown when no API key is stored.
pub const FALLBACK_NO_KEY: &str =
    "Gemini API key not configured. Store one with `parchipay-cli rules set-key`.";

/// Shown when the generation call fails for any reason.
pub const FALLBACK_ERROR: &str =
    "An error occurred while generating rules. Please try again.";

pub struct RulesGenerator {
    api_key: String,
}

impl Default for RulesGenerator {
    fn default() -> Self {
        Self {
            api_key: String::new(),
        }
    }
}

impl RulesGenerator {
    /// Load the stored API key from the OS keyring (empty string if absent).
    pub fn new() -> Self {
        let api_key = keyring_store::get("gemini_api_key")
            .ok()
            .flatten()
            .unwrap_or_default();
        Self { api_key }
    }

    /// Persist a user-provided API key to the OS keyring and update
    /// in-memory state.
    pub fn set_credentials(&mut self, api_key: &str) -> Result<(), Box<dyn std::error::Error>> {
        keyring_store::set("gemini_api_key", api_key)?;
        self.api_key = api_key.to_string();
        Ok(())
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Generate rules text for a committee.
    ///
    /// Always returns a displayable string; collaborator failures map to
    /// the fixed fallbacks and are reported on stderr.
    pub fn generate(&self, committee: &Committee) -> String {
        if !self.is_configured() {
            return FALLBACK_NO_KEY.to_string();
        }
        match self.request_rules(&prompt_for(committee)) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("rules generation failed: {e}");
                FALLBACK_ERROR.to_string()
            }
        }
    }

    fn request_rules(&self, prompt: &str) -> Result<String, Box<dyn std::error::Error>> {
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{GEMINI_MODEL}:generateContent?key={}",
            self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let client = Client::new();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let resp = rt.block_on(client.post(&url).json(&body).send())?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(format!("Gemini generateContent error: HTTP {status}").into());
        }

        let body: serde_json::Value = rt.block_on(resp.json())?;
        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.pointer("/content/parts/0/text"))
            .and_then(|t| t.as_str())
            .ok_or("Gemini response had no candidate text")?;
        Ok(text.trim().to_string())
    }
}

fn prompt_for(committee: &Committee) -> String {
    formatdoc! {"
        Generate a simple, clear set of rules for a friendly financial committee (chit fund) in India.
        The rules should be easy for anyone to understand.
        Keep it concise, under 100 words.

        Committee Details:
        - Name: {name}
        - Monthly Contribution: \u{20b9}{amount}
        - Number of Members: {members}
        - Duration: {duration} months

        Generate 3-4 bullet points covering payment deadlines, draw dates, and handling of late payments.
        The tone should be encouraging and community-focused.",
        name = committee.name,
        amount = committee.monthly_amount,
        members = committee.total_members,
        duration = committee.duration,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;

    #[test]
    fn unconfigured_generator_returns_fixed_fallback() {
        let generator = RulesGenerator::default();
        let dir = Directory::seeded();
        let text = generator.generate(dir.committee("committee-1").unwrap());
        assert_eq!(text, FALLBACK_NO_KEY);
    }

    #[test]
    fn prompt_carries_committee_parameters() {
        let dir = Directory::seeded();
        let prompt = prompt_for(dir.committee("committee-1").unwrap());
        assert!(prompt.contains("Office Friends Bachat"));
        assert!(prompt.contains("\u{20b9}5000"));
        assert!(prompt.contains("4 months"));
    }
}
