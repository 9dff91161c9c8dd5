//! Timeline composition stages, leaf to root.
//!
//! Fragment assembly turns token sequences into per-fragment buffers; the
//! voice track builder concatenates them between lead-in/lead-out silence; the
//! background preparer shapes a bed to exactly the voice track's length; the
//! compositor overlays the two. Each stage owns its output buffer and hands it
//! to the next; the session module drives them in order.

pub mod background;
pub mod compose;
pub mod fragment;
pub mod voice;

pub use background::prepare_background;
pub use compose::compose;
pub use fragment::assemble;
pub use voice::build_voice_track;
