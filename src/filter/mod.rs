mod model;
mod translate;


pub use model::{Comparator, Filter, IsEmptyFilter, MatchFilter};
pub use translate::{Translation, translate};
