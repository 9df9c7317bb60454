pub mod analysis;
pub mod guess;
pub mod listing;
pub mod price;

pub use analysis::*;
pub use guess::*;
pub use listing::*;
pub use price::*;
