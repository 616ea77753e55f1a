use pactum_core::models::cost::ModelPricing;
use pactum_core::models::token_count::{TokenCount, TokenUsage};

/// Extract token counts from a Bedrock Converse response.
pub fn extract_token_usage(usage: &aws_sdk_bedrockruntime::types::TokenUsage) -> TokenCount {
    TokenCount {
        input: usage.input_tokens.max(0) as u64,
        output: usage.output_tokens.max(0) as u64,
    }
}

/// Calculate the cost for a token count given model pricing.
pub fn calculate_cost(tokens: TokenCount, pricing: &ModelPricing) -> TokenUsage {
    TokenUsage {
        tokens,
        cost_usd: pricing.estimate_cost(tokens),
    }
}

/// Token usage with cost, or zero cost for models without known pricing.
pub fn usage_for(model_id: &str, tokens: TokenCount) -> TokenUsage {
    match get_pricing(model_id) {
        Some(pricing) => calculate_cost(tokens, &pricing),
        None => TokenUsage {
            tokens,
            cost_usd: 0.0,
        },
    }
}

/// Known model pricing (per million tokens). Matches both Bedrock
/// inference profile IDs and bare Anthropic model names.
pub fn get_pricing(model_id: &str) -> Option<ModelPricing> {
    match model_id {
        id if id.contains("claude-opus-4") => Some(ModelPricing {
            input_per_million: 15.0,
            output_per_million: 75.0,
        }),
        id if id.contains("claude-sonnet-4") || id.contains("claude-3-7-sonnet") => {
            Some(ModelPricing {
                input_per_million: 3.0,
                output_per_million: 15.0,
            })
        }
        id if id.contains("claude-haiku") || id.contains("claude-3-5-haiku") => {
            Some(ModelPricing {
                input_per_million: 0.80,
                output_per_million: 4.0,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_matches_profiles_and_bare_names() {
        assert!(get_pricing("us.anthropic.claude-sonnet-4-20250514-v1:0").is_some());
        assert!(get_pricing("claude-sonnet-4-20250514").is_some());
        assert!(get_pricing("amazon.nova-pro-v1:0").is_none());
    }

    #[test]
    fn unknown_model_costs_nothing() {
        let usage = usage_for(
            "mystery-model",
            TokenCount {
                input: 10,
                output: 5,
            },
        );
        assert_eq!(usage.cost_usd, 0.0);
        assert_eq!(usage.tokens.total(), 15);
    }
}
