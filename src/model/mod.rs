pub mod article;
pub mod feature;
pub mod identity;
pub mod translate;
