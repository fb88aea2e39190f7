pub mod media;
pub mod slug;
