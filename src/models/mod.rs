mod genre;
mod item;
mod user;

pub use genre::Genre;
pub use item::Item;
pub use user::User;
