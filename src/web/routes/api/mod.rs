pub mod health;
pub mod posts;
pub mod subscribe;
pub mod subscribers;

pub use health::health;
pub use posts::{post_create, post_fetch, posts_list};
pub use subscribe::subscribe;
pub use subscribers::subscribers;
