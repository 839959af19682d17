#![forbid(unsafe_code)]

//! Runtime: the section board and everything around the pure core.
//!
//! # Role in regroup
//! `regroup-runtime` wires one `regroup-core` pipeline per list into a
//! [`SectionBoard`] and adds the parts that touch the outside world:
//!
//! - **Persistence**: [`PersistenceBridge`] serializes commits through the
//!   [`RearrangeSections`] backend contract, with optimistic rollback.
//! - **Notices**: [`NoticeQueue`] collects user-facing warnings.
//! - **Rendering**: the [`RenderSection`] delegate and the drag overlay.
//! - **Configuration**: [`BoardConfig`], loadable from TOML/JSON with the
//!   `config` feature.
//!
//! # Logging
//! All events go through `tracing` with targets `regroup.board`,
//! `regroup.persist`, `regroup.drag` and `regroup.order`. Commits run inside
//! a `persist.commit` span.

pub mod board;
pub mod config;
pub mod error;
pub mod notice;
pub mod persistence;
pub mod render;

pub use board::{DropOutcome, SectionBoard, SyncOutcome};
pub use config::{BoardConfig, ConstraintPolicy, GesturePolicy, NoticePolicy};
pub use error::{ConfigError, PersistError};
pub use notice::{Notice, NoticeConfig, NoticeLevel, NoticeQueue, NoticeStats};
pub use persistence::{
    BridgeStats, CommitOutcome, CommitRequest, CommitTicket, PersistenceBridge, RearrangeSections,
    Settlement,
};
pub use render::{
    DragOverlay, RenderSection, RenderedGroup, RenderedSection, SectionView, render_groups,
    render_overlay,
};
