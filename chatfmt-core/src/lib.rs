pub mod clean;
pub mod error;
pub mod extract;
pub mod model;
pub mod render;
pub mod service;

pub use clean::clean_content;
pub use error::{ChatfmtError, Result};
pub use extract::extract_content;
pub use model::{
    CleanOptions, ConversionReport, DialogueEntry, FormattedDialogue, OutputFormat, OutputTarget,
    RenderOptions,
};
pub use render::{format_dialogue, render_entry};
pub use service::{
    convert_file, default_output_path, load_messages, parse_messages, resolve_output_target,
};
