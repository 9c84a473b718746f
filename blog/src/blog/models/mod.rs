pub mod category;
pub mod post;
