pub mod cocktail;
pub mod session;

pub use cocktail::{
    AlcoholLevel, BartenderResponse, BaseSpirit, CocktailRecommendation, FlavorProfile,
    Ingredient, Step, Tool,
};
pub use session::SessionData;
