mod load;
mod song;

pub use load::{load_likes, load_songs};
pub use song::{Lyrics, Song};
