//! Interview questions, input validators, and the welcome summary.

use std::sync::LazyLock;

use regex::Regex;

use super::state::OnboardingStep;
use crate::business::{BusinessDraft, business_type, category_option, persona_for};
use crate::error::TemplateError;
use crate::templates::fill;

/// Monthly price quoted in the welcome summary.
pub const POST_TRIAL_PRICE: &str = "₦20,000/month";

/// Prefix on a re-asked question after invalid input.
pub const INVALID_INPUT_PREFIX: &str = "❌ Invalid input. ";

const INVALID_BUSINESS_TYPE_PREFIX: &str = "❌ Please select a number from 1-10.\n\n";

const INVALID_HOURS_PREFIX: &str = "❌ Please select 1, 2, 3, or 4.\n\n";

/// Prefix when a corrupted state restarts the interview.
pub const RESTART_PREFIX: &str = "❌ Something went wrong. Let's start over.\n\n";

const BUSINESS_TYPE_QUESTION: &str = "Welcome to ODIA SmartBiz! 🎉\n\nI'll create your AI assistant in 60 seconds.\n\nWhat type of business do you run?\n\n1️⃣ Fashion/Boutique\n2️⃣ Restaurant/Food\n3️⃣ Pharmacy\n4️⃣ School\n5️⃣ Church\n6️⃣ Salon/Beauty\n7️⃣ Supermarket\n8️⃣ Electronics\n9️⃣ Real Estate\n🔟 Logistics\n\nReply with a number (1-10)";

const BUSINESS_NAME_QUESTION: &str = "Great choice! [BUSINESS_TYPE]\n\nWhat's your business name?\n\nExample: \"Mama Nkechi Boutique\" or \"Lagos Food Palace\"";

const PRODUCT_CATEGORY_QUESTION: &str = "Nice name! [BUSINESS_NAME]\n\nWhat do you mainly sell/offer?\n\nA. [CATEGORY_A]\nB. [CATEGORY_B]\nC. [CATEGORY_C]\nD. [CATEGORY_D]\nE. Everything/Mixed\n\nReply with letter (A-E)";

const DELIVERY_QUESTION: &str = "Perfect! [PRODUCT_CATEGORY]\n\nDo you offer delivery?\n\nY - Yes, we deliver\nN - No, pickup only\n\nReply Y or N";

const HOURS_QUESTION: &str = "Last question!\n\nWhat are your business hours?\n\n1. 8am - 6pm\n2. 9am - 8pm\n3. 10am - 10pm\n4. 24/7 online\n\nReply with number (1-4)";

const COMPLETION_MESSAGE: &str = "🚀 DONE! Your AI Assistant '[AI_NAME]' is ready!

✅ Business: [BUSINESS_NAME]
✅ Type: [BUSINESS_TYPE]
✅ Category: [PRODUCT_CATEGORY]
✅ Hours: [BUSINESS_HOURS]
✅ Delivery: [DELIVERY]

Your customers can now message this number!
📱 [ASSISTANT_NUMBER]

Try it - send 'Hi' to test [AI_NAME]

Your [TRIAL_DAYS]-day FREE trial starts now
After trial: [PRICE]

Commands:
PAUSE - Pause [AI_NAME]
RESUME - Resume [AI_NAME]
STATS - See today's statistics
HELP - Get support

Ready to share with customers? Send your first test message!";

static BUSINESS_TYPE_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9]|10)$").expect("business type regex"));
static CATEGORY_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[A-E]$").expect("category regex"));
static DELIVERY_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[YN]$").expect("delivery regex"));
static HOURS_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-4]$").expect("hours regex"));

/// Whether `input` is an acceptable answer for `step`.
pub fn is_valid_input(step: OnboardingStep, input: &str) -> bool {
    let input = input.trim();
    match step {
        OnboardingStep::BusinessType => BUSINESS_TYPE_INPUT.is_match(input),
        OnboardingStep::BusinessName => (2..=50).contains(&input.chars().count()),
        OnboardingStep::ProductCategory => CATEGORY_INPUT.is_match(input),
        OnboardingStep::Delivery => DELIVERY_INPUT.is_match(input),
        OnboardingStep::Hours => HOURS_INPUT.is_match(input),
    }
}

/// Rejection text placed before a re-asked question.
pub fn invalid_input_prefix(step: OnboardingStep) -> &'static str {
    match step {
        OnboardingStep::BusinessType => INVALID_BUSINESS_TYPE_PREFIX,
        OnboardingStep::Hours => INVALID_HOURS_PREFIX,
        _ => INVALID_INPUT_PREFIX,
    }
}

/// The first question, which needs no substitution.
pub fn business_type_question() -> &'static str {
    BUSINESS_TYPE_QUESTION
}

/// Step-2 question naming the chosen business type.
pub fn business_name_question(type_name: &str) -> Result<String, TemplateError> {
    fill(BUSINESS_NAME_QUESTION, &[("BUSINESS_TYPE", type_name)])
}

/// Step-3 question listing up to four categories for the business type.
pub fn product_category_question(
    type_code: &str,
    business_name: &str,
) -> Result<String, TemplateError> {
    let categories = business_type(type_code)
        .map(|t| t.categories)
        .unwrap_or_default();
    let options: Vec<String> = (0..4).map(|i| category_option(categories, i)).collect();
    fill(
        PRODUCT_CATEGORY_QUESTION,
        &[
            ("BUSINESS_NAME", business_name),
            ("CATEGORY_A", &options[0]),
            ("CATEGORY_B", &options[1]),
            ("CATEGORY_C", &options[2]),
            ("CATEGORY_D", &options[3]),
        ],
    )
}

/// Step-4 question echoing the chosen category.
pub fn delivery_question(category: &str) -> Result<String, TemplateError> {
    fill(DELIVERY_QUESTION, &[("PRODUCT_CATEGORY", category)])
}

/// The last question, which needs no substitution.
pub fn hours_question() -> &'static str {
    HOURS_QUESTION
}

/// Re-render the question for `step` from the answers collected so far.
pub fn question_for(
    step: OnboardingStep,
    business_type: Option<&str>,
    business_name: Option<&str>,
    category: Option<&str>,
) -> Result<String, TemplateError> {
    match step {
        OnboardingStep::BusinessType => Ok(business_type_question().to_string()),
        OnboardingStep::BusinessName => {
            let type_name = business_type
                .and_then(crate::business::business_type)
                .map(|t| t.name)
                .unwrap_or("");
            business_name_question(type_name)
        }
        OnboardingStep::ProductCategory => {
            product_category_question(business_type.unwrap_or(""), business_name.unwrap_or(""))
        }
        OnboardingStep::Delivery => delivery_question(category.unwrap_or("")),
        OnboardingStep::Hours => Ok(hours_question().to_string()),
    }
}

/// Welcome summary sent when the interview finishes.
pub fn completion_message(
    draft: &BusinessDraft,
    assistant_number: &str,
    trial_days: i64,
) -> Result<String, TemplateError> {
    let persona = persona_for(Some(&draft.business_type));
    let type_name = business_type(&draft.business_type)
        .map(|t| t.name)
        .unwrap_or(draft.business_type.as_str());
    let delivery = if draft.has_delivery { "Available" } else { "Pickup only" };
    let trial_days = trial_days.to_string();

    fill(
        COMPLETION_MESSAGE,
        &[
            ("AI_NAME", persona),
            ("BUSINESS_NAME", &draft.name),
            ("BUSINESS_TYPE", type_name),
            ("PRODUCT_CATEGORY", &draft.category),
            ("BUSINESS_HOURS", &draft.hours),
            ("DELIVERY", delivery),
            ("ASSISTANT_NUMBER", assistant_number),
            ("TRIAL_DAYS", &trial_days),
            ("PRICE", POST_TRIAL_PRICE),
        ],
    )
}

/// Progress line such as `📊 Setup Progress: 40% (2/5)`.
pub fn progress_message(step: u8) -> String {
    let total = OnboardingStep::COUNT as u32;
    let step = (step as u32).min(total);
    let percent = (step * 100 + total / 2) / total;
    format!("📊 Setup Progress: {percent}% ({step}/{total})")
}
