//! Canned-answer catalog, one template per business type.
//!
//! Only some business types ship a catalog; for the rest every customer
//! message goes to the language-model fallback.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// A keyword pattern and the reply variants it unlocks.
#[derive(Debug, Clone)]
pub struct QnaEntry {
    /// Case-insensitive alternation of keywords.
    pub pattern: Regex,
    /// Non-empty list of interchangeable replies.
    pub responses: Vec<&'static str>,
}

impl QnaEntry {
    /// Build an entry from a keyword alternation such as `"size|fit"`.
    pub fn new(keywords: &str, responses: Vec<&'static str>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(&format!("(?i){keywords}"))?,
            responses,
        })
    }
}

/// Fallback replies used when no catalog entry matches.
#[derive(Debug, Clone)]
pub struct DefaultResponses {
    /// May contain `[BUSINESS_NAME]`.
    pub greeting: &'static str,
    /// May contain `[BUSINESS_HOURS]`.
    pub hours: &'static str,
    pub delivery: &'static str,
    pub pricing: &'static str,
    pub orders: &'static str,
}

/// The canned-answer library for one business type.
#[derive(Debug, Clone)]
pub struct BusinessTemplate {
    /// Business type code this template serves.
    pub code: &'static str,
    /// Short machine name, e.g. `"fashion"`.
    pub kind: &'static str,
    pub name: &'static str,
    pub common_questions: Vec<QnaEntry>,
    pub defaults: DefaultResponses,
}

static CATALOG: LazyLock<HashMap<&'static str, BusinessTemplate>> = LazyLock::new(|| {
    [fashion(), restaurant(), pharmacy()]
        .into_iter()
        .map(|t| (t.code, t))
        .collect()
});

/// The template for a business type code, if one exists.
pub fn template_for(code: &str) -> Option<&'static BusinessTemplate> {
    CATALOG.get(code)
}

fn entry(keywords: &str, responses: Vec<&'static str>) -> QnaEntry {
    QnaEntry::new(keywords, responses).expect("catalog keyword pattern")
}

fn fashion() -> BusinessTemplate {
    BusinessTemplate {
        code: "1",
        kind: "fashion",
        name: "Fashion/Boutique",
        common_questions: vec![
            entry(
                "what do you have|what you sell|show me|catalogue",
                vec![
                    "We have beautiful women's clothing:\n\nDRESSES\n- Ankara dresses: ₦8,000 - ₦15,000\n- Office wears: ₦12,000 - ₦25,000\n- Casual gowns: ₦6,000 - ₦12,000\n\nTOPS & BLOUSES\n- Shirts: ₦4,000 - ₦8,000\n- Blouses: ₦5,000 - ₦10,000\n\nWould you like to see pictures or know about sizes?",
                    "Our latest collection includes:\n\n👗 DRESSES (₦6,000 - ₦25,000)\n👚 TOPS & BLOUSES (₦4,000 - ₦10,000)\n👖 TROUSERS & SKIRTS (₦5,000 - ₦12,000)\n👠 SHOES & ACCESSORIES (₦3,000 - ₦8,000)\n\nWhat style are you looking for?",
                ],
            ),
            entry(
                "size|fit|measurement",
                vec![
                    "We have sizes:\n\nSMALL (UK 8-10)\nMEDIUM (UK 12-14)\nLARGE (UK 16-18)\nXL (UK 20-22)\nXXL (UK 24-26)\n\nSend your measurements for perfect fit:\n- Bust: __ inches\n- Waist: __ inches\n- Hip: __ inches\n\nWhat size do you need?",
                    "Available sizes: S, M, L, XL, XXL\n\nFor perfect fit, please share:\n📏 Your measurements\n👗 Preferred style (fitted/loose)\n\nWhich item interests you?",
                ],
            ),
            entry(
                "price|how much|cost",
                vec![
                    "Our prices are very affordable:\n\n💰 BUDGET RANGE (₦3,000 - ₦8,000)\n💎 PREMIUM RANGE (₦8,000 - ₦25,000)\n\nBulk purchases get 10% discount (5+ items)\nPayment: Cash, Transfer, POS\n\nWhat's your budget range?",
                    "Prices vary by style:\n\nCasual wear: ₦3,000 - ₦8,000\nOffice wear: ₦8,000 - ₦15,000\nParty wear: ₦12,000 - ₦25,000\n\nSpecial offer: Buy 3, get 1 free!\nWhich category interests you?",
                ],
            ),
        ],
        defaults: DefaultResponses {
            greeting: "Welcome to [BUSINESS_NAME]! 👗\n\nWe sell beautiful women's clothing:\n- Latest fashion trends\n- Quality fabrics\n- Affordable prices\n- All sizes available\n\nHow can I help you today?",
            hours: "We're open [BUSINESS_HOURS] Monday to Saturday.\n\nSunday: Closed\n\nFor urgent orders, WhatsApp anytime!",
            delivery: "🚚 DELIVERY OPTIONS:\n\n✅ Lagos delivery: ₦1,000 (same day)\n✅ Other states: ₦2,500 (2-3 days)\n✅ Pickup available at our store\n\nFREE delivery for orders above ₦20,000!",
            pricing: "Our prices are fixed and very competitive.\n\nBut we offer:\n💰 Bulk discounts (5+ items)\n💰 Student discounts (with ID)\n💰 Return customer discounts\n\nPayment on delivery available!",
            orders: "To place your order:\n\n1️⃣ Tell me what you want\n2️⃣ Confirm your size\n3️⃣ Share delivery address\n4️⃣ Choose payment method\n\nI'll confirm total cost and delivery time!",
        },
    }
}

fn restaurant() -> BusinessTemplate {
    BusinessTemplate {
        code: "2",
        kind: "restaurant",
        name: "Restaurant/Food",
        common_questions: vec![
            entry(
                "menu|food|what do you serve",
                vec![
                    "🍽️ OUR MENU:\n\nRICE DISHES (₦800 - ₦2,500)\n- Jollof rice & chicken\n- Fried rice with fish\n- Coconut rice special\n\nSOUPS & SWALLOW (₦1,500 - ₦3,000)\n- Egusi, Okra, Bitter leaf\n- Fufu, Semo, Pounded yam\n\nGRILLS & PEPPERED (₦2,000 - ₦5,000)\n- Peppered chicken/fish\n- Suya, Asun, Croaker\n\nWhat would you like to order?",
                ],
            ),
            entry(
                "price|cost|how much",
                vec![
                    "💰 PRICE LIST:\n\n🍚 RICE DISHES: ₦800 - ₦2,500\n🍲 SOUPS: ₦1,500 - ₦3,000\n🍖 GRILLS: ₦2,000 - ₦5,000\n🥤 DRINKS: ₦200 - ₦500\n\nCombo deals available!\nMinimum order: ₦1,000\n\nWhat can I get you?",
                ],
            ),
        ],
        defaults: DefaultResponses {
            greeting: "Welcome to [BUSINESS_NAME]! 🍽️\n\nFresh, delicious Nigerian meals:\n- Rice dishes\n- Soups & swallow\n- Grilled specialties\n- Fast delivery\n\nWhat would you like to eat today?",
            hours: "⏰ OPENING HOURS:\n[BUSINESS_HOURS] Daily\n\n🚚 Delivery until 10pm\n📞 Call for late orders",
            delivery: "🚚 DELIVERY:\n\n✅ Within 5km: ₦500\n✅ 5-10km: ₦1,000\n✅ Above 10km: ₦1,500\n\nFREE delivery for orders ₦5,000+\nDelivery time: 30-45 minutes",
            pricing: "All prices are fixed.\n\nSpecial offers:\n🎉 Buy 2 get 1 free (drinks)\n🎉 Family pack discounts\n🎉 Bulk order discounts\n\nPayment: Cash, transfer, POS",
            orders: "To order:\n\n1️⃣ Choose your meal\n2️⃣ Add drinks/extras\n3️⃣ Confirm delivery address\n4️⃣ Choose payment method\n\nTotal cost and delivery time will be confirmed!",
        },
    }
}

fn pharmacy() -> BusinessTemplate {
    BusinessTemplate {
        code: "3",
        kind: "pharmacy",
        name: "Pharmacy",
        common_questions: vec![entry(
            "medicine|drug|medication",
            vec![
                "💊 WE HAVE:\n\nPRESCRIPTION DRUGS\n- All antibiotics\n- Blood pressure meds\n- Diabetes medication\n- Pain relievers\n\nOVER-THE-COUNTER\n- Vitamins & supplements\n- First aid supplies\n- Baby products\n- Personal care\n\nWhat do you need? Send prescription if required.",
            ],
        )],
        defaults: DefaultResponses {
            greeting: "Welcome to [BUSINESS_NAME] Pharmacy! 💊\n\nWe provide:\n- Prescription medications\n- Over-counter drugs\n- Health consultations\n- Fast delivery\n\nHow can I help with your health needs?",
            hours: "⏰ PHARMACY HOURS:\n[BUSINESS_HOURS]\n\n🚨 Emergency? Call us directly\n💊 Prescription orders anytime",
            delivery: "🚚 MEDICINE DELIVERY:\n\n✅ Same area: ₦300\n✅ Nearby areas: ₦500\n✅ Emergency delivery: ₦1,000\n\nFREE delivery for orders ₦3,000+",
            pricing: "Medicine prices are regulated.\n\nWe offer:\n💰 Generic alternatives\n💰 Senior citizen discounts\n💰 Bulk purchase discounts\n\nInsurance accepted!",
            orders: "To order medicine:\n\n1️⃣ Send prescription (if needed)\n2️⃣ Confirm medication details\n3️⃣ Share delivery address\n4️⃣ Choose payment method\n\nPharmacist will verify before delivery!",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::business_type;
    use crate::templates::placeholder::placeholders;

    #[test]
    fn catalog_covers_first_three_types() {
        for code in ["1", "2", "3"] {
            let template = template_for(code).unwrap();
            assert_eq!(template.code, code);
            assert_eq!(template.name, business_type(code).unwrap().name);
        }
        assert!(template_for("4").is_none());
        assert!(template_for("nope").is_none());
    }

    #[test]
    fn every_entry_has_replies() {
        for code in ["1", "2", "3"] {
            for qna in &template_for(code).unwrap().common_questions {
                assert!(!qna.responses.is_empty());
            }
        }
    }

    #[test]
    fn defaults_only_use_known_placeholders() {
        let known = ["BUSINESS_NAME", "BUSINESS_HOURS"];
        for code in ["1", "2", "3"] {
            let d = &template_for(code).unwrap().defaults;
            for text in [d.greeting, d.hours, d.delivery, d.pricing, d.orders] {
                for p in placeholders(text) {
                    assert!(known.contains(&p), "unexpected placeholder {p}");
                }
            }
        }
    }

    #[test]
    fn patterns_are_case_insensitive() {
        let fashion = template_for("1").unwrap();
        assert!(fashion.common_questions[1].pattern.is_match("What SIZE is this?"));
    }
}
