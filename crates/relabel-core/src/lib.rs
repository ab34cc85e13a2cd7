//! Domain core for the relabel annotation review client.
//!
//! This crate provides the synchronization and playback primitives:
//! - Row model and snapshot store with copy-on-replace semantics
//! - Single edit session isolated from background refreshes
//! - Pure effective-row merge of store and session for presentation
//! - Playback state machine for the one active audio track
//! - User-facing notices and the viewer error taxonomy
//!
//! Everything here is synchronous and IO-free; the network and audio
//! boundaries live in `relabel-client`.

pub mod error;
pub mod notify;
pub mod playback;
pub mod row;
pub mod session;
pub mod store;
pub mod view;

pub use error::{CommitError, FetchError, PlaybackError};
pub use notify::{Notice, NoticeLevel, NoticeQueue};
pub use playback::{PlaybackController, PlaybackState, Transport, TransportCommand};
pub use row::{Row, RowId, EDITABLE_FIELDS, FIELDS};
pub use session::{BeginOutcome, EditSession, Editor};
pub use store::RowStore;
pub use view::{effective_row, effective_rows};
