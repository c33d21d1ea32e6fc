//! Prompt templates for the shopping assistant chat loop

use crate::core::string::truncate;
use crate::product::entities::Product;

/// Context products listed in the prompt before the rest are elided
const MAX_CONTEXT_PRODUCTS: usize = 10;

/// Words that count as the reply acknowledging attached products
const PRODUCT_CUES: &[&str] = &["product", "item", "option", "result", "found", "listing"];

/// Templates for generating prompts and canned replies
pub struct PromptTemplate;

impl PromptTemplate {
    /// Default system prompt for the shopping assistant
    pub fn system() -> &'static str {
        r#"You are ShopWise, a helpful shopping assistant.
Use the available tools to search the product catalog, compare products, inspect details and analyze price history.
Prefer calling a tool over guessing: never invent products, prices or availability.
When tools return products, summarize the most relevant ones briefly and mention prices.
If a tool reports an error, explain the problem to the user in plain language and suggest what to try next."#
    }

    /// Append the caller's id so user-scoped tools can be called
    pub fn with_user(system_prompt: &str, user_id: &str) -> String {
        format!("{}\n\nThe current user's id is \"{}\".", system_prompt, user_id)
    }

    /// Prompt for the first model call of a run
    ///
    /// When the user is looking at products, a short summary of them is
    /// prepended so the model can resolve references like "this one".
    pub fn user_prompt(message: &str, context_products: &[Product]) -> String {
        if context_products.is_empty() {
            return message.to_string();
        }

        let mut prompt = String::from("Products the user is currently viewing:\n");
        for product in context_products.iter().take(MAX_CONTEXT_PRODUCTS) {
            prompt.push_str(&format!("- {}\n", truncate(&product.summary_line(), 160)));
        }
        if context_products.len() > MAX_CONTEXT_PRODUCTS {
            prompt.push_str(&format!(
                "- ...and {} more\n",
                context_products.len() - MAX_CONTEXT_PRODUCTS
            ));
        }
        prompt.push_str(&format!("\nUser message: {}", message));
        prompt
    }

    /// Prompt for every model call after tools have run
    pub fn narrate_tool_results() -> &'static str {
        "Using the tool results above, answer the user's last request in natural language. \
Call another tool only if the results are insufficient."
    }

    /// Fixed reply when no provider credentials are configured
    pub fn missing_credentials() -> &'static str {
        "The shopping assistant is not configured yet. Please set an API key for the language \
model provider (for example via SHOPWISE_LLM__API_KEY) and try again."
    }

    /// Generic reply when the run failed and nothing could be recovered
    pub fn apology() -> &'static str {
        "Sorry, I ran into a problem while processing your request. Please try again in a moment."
    }

    /// Reply when the run failed but a fallback search produced products
    pub fn apology_with_results(count: usize) -> String {
        format!(
            "Sorry, I had trouble completing your request, but I found {} that might match what you're looking for.",
            Self::count_products(count)
        )
    }

    /// Substituted when the iteration budget ran out with no model text
    pub fn tools_acknowledgement() -> &'static str {
        "I've processed your request using the available tools. Let me know if you'd like more detail on any of the results."
    }

    /// Synthesized reply when the model produced no text but products were found
    pub fn products_found(count: usize) -> String {
        format!("I found {} for you.", Self::count_products(count))
    }

    /// Appended when the reply does not acknowledge the attached products
    pub fn products_addendum(count: usize) -> String {
        format!("I've also attached {} below.", Self::count_products(count))
    }

    /// Whether `text` already refers to the attached products
    ///
    /// Matches generic cue words and any product title, case-insensitively.
    pub fn mentions_products(text: &str, products: &[Product]) -> bool {
        let lowered = text.to_lowercase();
        if PRODUCT_CUES.iter().any(|cue| lowered.contains(cue)) {
            return true;
        }
        products
            .iter()
            .any(|p| !p.title.is_empty() && lowered.contains(&p.title.to_lowercase()))
    }

    fn count_products(count: usize) -> String {
        if count == 1 {
            "1 product".to_string()
        } else {
            format!("{} products", count)
        }
    }
}
