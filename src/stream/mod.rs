//! Streaming: session driver, mock generator and data-stream wire format.

pub mod mock;
pub mod presets;
pub mod session;
pub mod wire;

pub use mock::{
    DEFAULT_CHUNK_DELAY_MS, DEFAULT_INITIAL_DELAY_MS, DEFAULT_PROMPT_TOKENS, MockStream,
    MockStreamOptions, StreamChunk, tokenize,
};
pub use presets::{ChatMessage, MessagePart, Preset, last_user_message, reply_for};
pub use session::StreamSession;
pub use wire::{FinishInfo, Usage, WirePart};
