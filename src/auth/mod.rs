pub mod middleware;
pub mod token;

pub use token::TokenManager;
