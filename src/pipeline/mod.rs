//! Processing pipeline components.

mod coordinator;
mod processor;

pub use coordinator::{collect_input_files, is_image_file};
pub use processor::{analyze_image, process_file};
