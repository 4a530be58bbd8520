pub mod remote;
pub mod render;
pub mod types;

pub use remote::{ForwardOptions, Forwarder, Mailbox, Mutation};
pub use render::{RenderPreference, Renderer, TextRenderer};
pub use types::{Content, Cursor, Item, ItemFlags, Page};
