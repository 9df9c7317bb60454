//! Keyword heuristics for components the price cache knows nothing about.
//!
//! Both tables are ordered and evaluated top to bottom; the first rule whose
//! token groups all match wins. Named SKUs sit above the family-level tokens
//! so that e.g. `"RTX 4090 graphics card"` is priced as a 4090 and not as a
//! generic GPU.

use crate::models::Category;

/// A rule matches when every group has at least one token in the name.
struct PriceRule {
    groups: &'static [&'static [&'static str]],
    price: f64,
}

const fn rule(groups: &'static [&'static [&'static str]], price: f64) -> PriceRule {
    PriceRule { groups, price }
}

const DDR: &[&str] = &["ddr5", "ddr4"];
const FLASH: &[&str] = &["ssd", "nvme"];
const PREMIUM_PSU_BRAND: &[&str] = &["corsair", "seasonic"];
const PSU_TOKEN: &[&str] = &["psu", "power"];
const CASE_TOKEN: &[&str] = &["case", "chassis"];
const COOLER_TOKEN: &[&str] = &["cooler", "heatsink"];

/// Price when no rule matches.
pub const DEFAULT_NEW_PRICE: f64 = 50.0;

static PRICE_RULES: &[PriceRule] = &[
    // GPUs by SKU
    rule(&[&["rtx 4090"]], 1800.0),
    rule(&[&["rtx 4080"]], 1200.0),
    rule(&[&["rtx 4070"]], 700.0),
    rule(&[&["rtx 4060"]], 320.0),
    rule(&[&["rtx 3090"]], 1000.0),
    rule(&[&["rtx 3080"]], 700.0),
    rule(&[&["rtx 3070"]], 500.0),
    rule(&[&["rtx 3060"]], 350.0),
    rule(&[&["rx 6800"]], 500.0),
    rule(&[&["rx 6700"]], 380.0),
    rule(&[&["rx 6600"]], 250.0),
    rule(&[&["rx 7900"]], 750.0),
    rule(&[&["rx 7800"]], 400.0),
    rule(&[&["gpu", "graphics", "gtx", "radeon"]], 400.0),
    // CPUs by model
    rule(&[&["ryzen 9 7950x"]], 500.0),
    rule(&[&["ryzen 9 7900x"]], 400.0),
    rule(&[&["ryzen 7 7700x"]], 300.0),
    rule(&[&["ryzen 5 7600x"]], 230.0),
    rule(&[&["i9-13900k"]], 580.0),
    rule(&[&["i7-13700k"]], 420.0),
    rule(&[&["i5-13600k"]], 280.0),
    rule(&[&["cpu", "processor", "ryzen", "core i"]], 250.0),
    // RAM
    rule(&[&["32gb"], DDR], 150.0),
    rule(&[&["16gb"], DDR], 80.0),
    rule(&[&["8gb"], DDR], 40.0),
    rule(&[&["ram", "memory", "ddr"]], 60.0),
    // Storage
    rule(&[&["2tb"], FLASH], 150.0),
    rule(&[&["1tb"], FLASH], 80.0),
    rule(&[&["500gb"], FLASH], 50.0),
    rule(&[&["ssd", "nvme", "storage"]], 70.0),
    rule(&[&["motherboard", "mobo", "x870", "z790"]], 250.0),
    // Power supplies only hold value from known brands
    rule(&[PREMIUM_PSU_BRAND, PSU_TOKEN, &["1000w"]], 180.0),
    rule(&[PREMIUM_PSU_BRAND, PSU_TOKEN, &["850w"]], 150.0),
    rule(&[PREMIUM_PSU_BRAND, PSU_TOKEN, &["750w"]], 120.0),
    rule(&[PREMIUM_PSU_BRAND, PSU_TOKEN], 100.0),
    rule(&[&["psu", "power supply"]], 0.0),
    // Cases
    rule(&[CASE_TOKEN, &["corsair", "nzxt", "lian li"]], 100.0),
    rule(&[CASE_TOKEN], 0.0),
    // Coolers
    rule(&[COOLER_TOKEN, &["corsair", "noctua"]], 80.0),
    rule(&[COOLER_TOKEN], 20.0),
];

static CATEGORY_RULES: &[(Category, &[&str])] = &[
    (Category::Gpu, &["gpu", "graphics", "rtx", "gtx", "radeon", "rx"]),
    (Category::Cpu, &["cpu", "processor", "ryzen", "core i", "i5", "i7", "i9"]),
    (Category::Ram, &["ram", "memory", "ddr4", "ddr5"]),
    (Category::Storage, &["ssd", "nvme", "hdd", "storage"]),
    (Category::Motherboard, &["motherboard", "mobo", "x870", "z790", "b650"]),
    (Category::Psu, &["psu", "power supply"]),
    (Category::Case, &["case", "chassis"]),
    (Category::Cooler, &["cooler", "heatsink"]),
];

impl PriceRule {
    fn matches(&self, name_lower: &str) -> bool {
        self.groups
            .iter()
            .all(|group| group.iter().any(|token| name_lower.contains(token)))
    }
}

/// Guess the new-condition price of a component from its name.
pub fn estimate_new_price(component_name: &str) -> f64 {
    let name_lower = component_name.to_lowercase();
    PRICE_RULES
        .iter()
        .find(|r| r.matches(&name_lower))
        .map(|r| r.price)
        .unwrap_or(DEFAULT_NEW_PRICE)
}

/// Classify a component by name. Anything unrecognized is [`Category::Other`].
pub fn categorize(component_name: &str) -> Category {
    let name_lower = component_name.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, tokens)| tokens.iter().any(|t| name_lower.contains(t)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// Category and new-price guess in one call.
pub fn estimate(component_name: &str) -> (Category, f64) {
    (categorize(component_name), estimate_new_price(component_name))
}
