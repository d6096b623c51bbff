//! LLM prompt for narrative generation

use crate::config::NarratorConfig;
use crate::error::NarratorError;
use crate::types::NarrativeRequest;
use oox_domain::OrderElement;
use serde_json::{Map, Value};

/// Builds the single fixed narrative prompt
pub struct NarrativePromptBuilder<'a> {
    request: &'a NarrativeRequest,
    title_max_chars: usize,
    description_target_chars: usize,
}

impl<'a> NarrativePromptBuilder<'a> {
    /// Create a new prompt builder with default length limits
    pub fn new(request: &'a NarrativeRequest) -> Self {
        let defaults = NarratorConfig::default();
        Self {
            request,
            title_max_chars: defaults.title_max_chars,
            description_target_chars: defaults.description_target_chars,
        }
    }

    /// Take length limits from a configuration
    pub fn with_config(mut self, config: &NarratorConfig) -> Self {
        self.title_max_chars = config.title_max_chars;
        self.description_target_chars = config.description_target_chars;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> Result<String, NarratorError> {
        let order = serde_json::to_string(&order_json(&self.request.final_order))?;
        let health = serde_json::to_string(&map_json(
            self.request
                .health
                .iter()
                .map(|(code, status)| (code.as_str(), status.as_str())),
        ))?;
        let tiers = serde_json::to_string(&map_json(
            self.request
                .tiers
                .iter()
                .map(|(code, tier)| (code.as_str(), tier.as_str())),
        ))?;

        let mut prompt = String::new();

        // 1. Role
        prompt.push_str(ROLE_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Analysis data with legends
        prompt.push_str("## Analysis data\n");
        prompt.push_str(&format!("- **Function order**: {}\n", order));
        prompt.push_str(&format!(
            "- **Health**: {} (O=healthy, o=normal, x=unhealthy)\n",
            health
        ));
        prompt.push_str(&format!(
            "- **Hierarchy**: {} (Dominant=king, High=aide, Middle=citizen, Low=exile)\n\n",
            tiers
        ));

        // 3. Output rules
        prompt.push_str("## Output rules\n");
        prompt.push_str("- Output only the Markdown format below. No greetings.\n");
        prompt.push_str(&format!(
            "- The title is catchy and at most {} characters.\n",
            self.title_max_chars
        ));
        prompt.push_str(&format!(
            "- The description is about {} characters, in a warm tone speaking directly to the user.\n",
            self.description_target_chars
        ));
        prompt.push_str(OUTPUT_RULES);
        prompt.push_str("\n\n");

        // 4. Skeleton
        prompt.push_str(OUTPUT_SKELETON);

        Ok(prompt)
    }
}

/// `[code | [code, ...]]`
fn order_json(order: &[OrderElement]) -> Value {
    Value::Array(
        order
            .iter()
            .map(|element| match element {
                OrderElement::Single(code) => Value::String(code.to_string()),
                OrderElement::Block(codes) => Value::Array(
                    codes.iter().map(|c| Value::String(c.to_string())).collect(),
                ),
            })
            .collect(),
    )
}

fn map_json<'k>(entries: impl Iterator<Item = (&'k str, &'static str)>) -> Value {
    let map: Map<String, Value> = entries
        .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
        .collect();
    Value::Object(map)
}

const ROLE_INSTRUCTIONS: &str = r#"You are a personality analysis expert and also a poetic storyteller.
Using the analysis of this user's cognitive functions below, write a "title"
and a "description" that portray who this user is."#;

const OUTPUT_RULES: &str = "- Use the hierarchy (king, exile and so on) and health as metaphors to express the user's inner conflicts and strengths.";

const OUTPUT_SKELETON: &str = r#"# Title
(title here)

# Description
(description here)"#;

#[cfg(test)]
mod tests {
    use super::*;
    use oox_domain::{CategoryCode, HealthStatus, Tier};

    fn code(s: &str) -> CategoryCode {
        CategoryCode::new(s).unwrap()
    }

    fn request() -> NarrativeRequest {
        NarrativeRequest::new(vec![
            OrderElement::Single(code("Ni")),
            OrderElement::Block(vec![code("Fe"), code("Te")]),
        ])
        .with_health([(code("Ni"), HealthStatus::Healthy), (code("Fe"), HealthStatus::Unhealthy)])
        .with_tiers([(code("Ni"), Tier::Dominant), (code("Te"), Tier::Low)])
    }

    #[test]
    fn test_prompt_embeds_order_json() {
        let request = request();
        let prompt = NarrativePromptBuilder::new(&request).build().unwrap();
        assert!(prompt.contains(r#"["Ni",["Fe","Te"]]"#));
    }

    #[test]
    fn test_prompt_embeds_health_and_tiers() {
        let request = request();
        let prompt = NarrativePromptBuilder::new(&request).build().unwrap();
        assert!(prompt.contains(r#"{"Fe":"x","Ni":"O"}"#));
        assert!(prompt.contains(r#"{"Ni":"Dominant","Te":"Low"}"#));
        assert!(prompt.contains("O=healthy, o=normal, x=unhealthy"));
        assert!(prompt.contains("Dominant=king"));
    }

    #[test]
    fn test_prompt_ends_with_skeleton() {
        let request = request();
        let prompt = NarrativePromptBuilder::new(&request).build().unwrap();
        assert!(prompt.ends_with("# Description\n(description here)"));
        assert!(prompt.contains("# Title\n"));
    }

    #[test]
    fn test_prompt_uses_configured_limits() {
        let request = request();
        let config = NarratorConfig {
            title_max_chars: 15,
            description_target_chars: 500,
            ..Default::default()
        };
        let prompt = NarrativePromptBuilder::new(&request)
            .with_config(&config)
            .build()
            .unwrap();
        assert!(prompt.contains("at most 15 characters"));
        assert!(prompt.contains("about 500 characters"));
    }
}
