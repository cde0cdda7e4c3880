pub mod configure;
pub mod generate;
pub mod lookup;
pub mod recipe;
pub mod usage;
