//! Structured cocktail recommendation returned by the bartender agents.

use serde::{Deserialize, Serialize};

/// Alcohol strength of a recommended cocktail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholLevel {
    NonAlcoholic,
    Low,
    Medium,
    High,
}

impl AlcoholLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlcoholLevel::NonAlcoholic => "non-alcoholic",
            AlcoholLevel::Low => "low",
            AlcoholLevel::Medium => "medium",
            AlcoholLevel::High => "high",
        }
    }
}

/// Base spirit families the agents may recommend from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseSpirit {
    Vodka,
    Gin,
    Rum,
    Tequila,
    Whiskey,
    Brandy,
    Wine,
    Beer,
    None,
}

impl BaseSpirit {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseSpirit::Vodka => "vodka",
            BaseSpirit::Gin => "gin",
            BaseSpirit::Rum => "rum",
            BaseSpirit::Tequila => "tequila",
            BaseSpirit::Whiskey => "whiskey",
            BaseSpirit::Brandy => "brandy",
            BaseSpirit::Wine => "wine",
            BaseSpirit::Beer => "beer",
            BaseSpirit::None => "no base spirit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlavorProfile {
    Sweet,
    Sour,
    Bitter,
    Spicy,
    Fruity,
    Herbal,
    Floral,
    Smoky,
    Refreshing,
}

impl FlavorProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlavorProfile::Sweet => "sweet",
            FlavorProfile::Sour => "sour",
            FlavorProfile::Bitter => "bitter",
            FlavorProfile::Spicy => "spicy",
            FlavorProfile::Fruity => "fruity",
            FlavorProfile::Herbal => "herbal",
            FlavorProfile::Floral => "floral",
            FlavorProfile::Smoky => "smoky",
            FlavorProfile::Refreshing => "refreshing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitute: Option<String>,
    #[serde(default)]
    pub is_garnish: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_number: i32,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_required: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

/// Full recommendation, both presentation fields and preparation details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocktailRecommendation {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub match_reason: String,

    pub base_spirit: BaseSpirit,
    pub alcohol_level: AlcoholLevel,
    pub flavor_profiles: Vec<FlavorProfile>,

    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<Step>,
    pub tools: Vec<Tool>,
    pub serving_glass: String,
}

/// Top-level agent reply. `cocktail` stays empty while the agent is still
/// gathering preferences mid-conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BartenderResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cocktail: Option<CocktailRecommendation>,
}

impl CocktailRecommendation {
    /// Built-in recommendation used by the manual image-generation trigger.
    pub fn sample() -> Self {
        Self {
            name: "Cosmopolitan".to_string(),
            description: "A 1980s classic known for its pink hue and crisp \
                          sweet-and-sour balance."
                .to_string(),
            image_url: None,
            match_reason: "Bright, refreshing and celebratory; a safe crowd-pleaser."
                .to_string(),
            base_spirit: BaseSpirit::Vodka,
            alcohol_level: AlcoholLevel::Medium,
            flavor_profiles: vec![
                FlavorProfile::Fruity,
                FlavorProfile::Sweet,
                FlavorProfile::Sour,
                FlavorProfile::Refreshing,
            ],
            ingredients: vec![
                Ingredient {
                    name: "Vodka".to_string(),
                    amount: "45".to_string(),
                    unit: Some("ml".to_string()),
                    substitute: Some("Gin".to_string()),
                    is_garnish: false,
                },
                Ingredient {
                    name: "Cointreau".to_string(),
                    amount: "15".to_string(),
                    unit: Some("ml".to_string()),
                    substitute: Some("Any orange liqueur".to_string()),
                    is_garnish: false,
                },
                Ingredient {
                    name: "Cranberry juice".to_string(),
                    amount: "30".to_string(),
                    unit: Some("ml".to_string()),
                    substitute: Some("Grenadine".to_string()),
                    is_garnish: false,
                },
                Ingredient {
                    name: "Lime juice".to_string(),
                    amount: "15".to_string(),
                    unit: Some("ml".to_string()),
                    substitute: Some("Lemon juice".to_string()),
                    is_garnish: false,
                },
            ],
            steps: vec![
                Step {
                    step_number: 1,
                    description: "Pour all ingredients into a shaker.".to_string(),
                    tips: Some("Make sure the shaker is clean and dry.".to_string()),
                    time_required: None,
                },
                Step {
                    step_number: 2,
                    description: "Add ice and seal the shaker.".to_string(),
                    tips: Some("Plenty of ice chills the drink properly.".to_string()),
                    time_required: None,
                },
                Step {
                    step_number: 3,
                    description: "Shake hard for 10-15 seconds.".to_string(),
                    tips: None,
                    time_required: Some("15s".to_string()),
                },
                Step {
                    step_number: 4,
                    description: "Fine-strain into a chilled cocktail glass.".to_string(),
                    tips: Some("A fine strainer keeps out ice shards and pulp.".to_string()),
                    time_required: None,
                },
                Step {
                    step_number: 5,
                    description: "Garnish with an orange twist or lime wheel.".to_string(),
                    tips: None,
                    time_required: None,
                },
            ],
            tools: vec![
                Tool {
                    name: "Shaker".to_string(),
                    alternative: Some("Sealed glass jar".to_string()),
                },
                Tool {
                    name: "Fine strainer".to_string(),
                    alternative: Some("Kitchen sieve".to_string()),
                },
                Tool {
                    name: "Jigger".to_string(),
                    alternative: Some("Small measuring cup".to_string()),
                },
            ],
            serving_glass: "Cocktail glass".to_string(),
        }
    }
}
