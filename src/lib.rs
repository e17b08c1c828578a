// Library exports for the CLI and tests
pub mod dimension;
pub mod error;
pub mod logging;
pub mod scale;
pub mod timefmt;
pub mod tooltip;
pub mod window;

pub use error::{ParseReason, TimestampError};
pub use timefmt::{convert, convert_hours, hours_since_epoch};
pub use tooltip::{render_tooltip, DisplaySink, Document, TOOLTIP_SELECTOR};
