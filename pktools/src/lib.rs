pub mod decrypt;
pub mod inspect;
