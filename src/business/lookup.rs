//! Immutable lookup tables keyed by the onboarding reply codes.
//!
//! Every lookup returns `Option`: malformed codes come straight from user
//! input and are never a reason to panic.

/// Persona used when a business type has no entry of its own.
pub const DEFAULT_PERSONA: &str = "Lexi";

/// Label for the catch-all product category (letter `E`).
pub const CATCH_ALL_CATEGORY: &str = "Everything/Mixed";

/// Static description of one business kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessTypeInfo {
    /// Reply code, `"1"` through `"10"`.
    pub code: &'static str,
    pub name: &'static str,
    /// Short assistant name shown to the owner.
    pub persona: &'static str,
    /// Up to four product categories offered as `A`..`D`.
    pub categories: &'static [&'static str],
}

static BUSINESS_TYPES: [BusinessTypeInfo; 10] = [
    BusinessTypeInfo {
        code: "1",
        name: "Fashion/Boutique",
        persona: "Lexi",
        categories: &["Women's clothing", "Men's clothing", "Children's clothing", "Shoes & Bags"],
    },
    BusinessTypeInfo {
        code: "2",
        name: "Restaurant/Food",
        persona: "Chef",
        categories: &["Nigerian dishes", "Continental food", "Fast food", "Drinks & snacks"],
    },
    BusinessTypeInfo {
        code: "3",
        name: "Pharmacy",
        persona: "Doc",
        categories: &[
            "Prescription drugs",
            "Over-counter meds",
            "Health supplements",
            "Medical supplies",
        ],
    },
    BusinessTypeInfo {
        code: "4",
        name: "School",
        persona: "Teach",
        categories: &[
            "Primary education",
            "Secondary education",
            "Vocational training",
            "Online courses",
        ],
    },
    BusinessTypeInfo {
        code: "5",
        name: "Church",
        persona: "Pastor",
        categories: &[
            "Religious services",
            "Events & weddings",
            "Counseling",
            "Community programs",
        ],
    },
    BusinessTypeInfo {
        code: "6",
        name: "Salon/Beauty",
        persona: "Style",
        categories: &["Hair styling", "Makeup & beauty", "Nail services", "Spa treatments"],
    },
    BusinessTypeInfo {
        code: "7",
        name: "Supermarket",
        persona: "Shop",
        categories: &["Groceries", "Electronics", "Household items", "Personal care"],
    },
    BusinessTypeInfo {
        code: "8",
        name: "Electronics",
        persona: "Tech",
        categories: &["Phones & tablets", "Computers", "Accessories", "Repairs"],
    },
    BusinessTypeInfo {
        code: "9",
        name: "Real Estate",
        persona: "Estate",
        categories: &["Property sales", "Rentals", "Land", "Commercial spaces"],
    },
    BusinessTypeInfo {
        code: "10",
        name: "Logistics",
        persona: "Swift",
        categories: &["Package delivery", "Moving services", "Courier", "Freight"],
    },
];

static HOURS_PRESETS: [(&str, &str); 4] = [
    ("1", "8am - 6pm"),
    ("2", "9am - 8pm"),
    ("3", "10am - 10pm"),
    ("4", "24/7 online"),
];

/// Look up a business type by its reply code.
pub fn business_type(code: &str) -> Option<&'static BusinessTypeInfo> {
    BUSINESS_TYPES.iter().find(|t| t.code == code)
}

/// All business types in menu order.
pub fn business_types() -> &'static [BusinessTypeInfo] {
    &BUSINESS_TYPES
}

/// Look up an operating-hours label by its reply code.
pub fn hours_preset(code: &str) -> Option<&'static str> {
    HOURS_PRESETS
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, label)| *label)
}

/// Persona for a business type, falling back to [`DEFAULT_PERSONA`].
pub fn persona_for(code: Option<&str>) -> &'static str {
    code.and_then(business_type)
        .map(|t| t.persona)
        .unwrap_or(DEFAULT_PERSONA)
}

/// Resolve a category letter against a type's category list.
///
/// `E` is always the catch-all. A letter beyond the list resolves to a
/// placeholder label such as `Option D`. Returns `None` only for letters
/// outside `A`..`E`.
pub fn resolve_category(categories: &[&str], letter: &str) -> Option<String> {
    let index = match letter.trim().to_uppercase().as_str() {
        "A" => 0,
        "B" => 1,
        "C" => 2,
        "D" => 3,
        "E" => return Some(CATCH_ALL_CATEGORY.to_string()),
        _ => return None,
    };
    Some(category_option(categories, index))
}

/// Category label at `index` for the step-3 menu, or `Option X` when absent.
pub fn category_option(categories: &[&str], index: usize) -> String {
    categories
        .get(index)
        .map(|c| (*c).to_string())
        .unwrap_or_else(|| format!("Option {}", (b'A' + index as u8) as char))
}
