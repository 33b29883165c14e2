// File: ./src/model/mod.rs
pub mod item;
pub mod matcher;
pub mod parser;
pub mod resolve;

pub use item::{
    Priority, Status, Task, TaskCreateRequest, TaskDetails, TaskImport, UnknownVariant, derive_status,
};
pub use matcher::TaskFilter;
pub use parser::{ExtractedDirectives, MIN_NAME_LEN, MacroError, extract_directives, parse_deadline};
pub use resolve::{Resolved, resolve};
