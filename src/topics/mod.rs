// Topic counting: keyword catalog, per-document rows, and the table.

pub mod catalog;
pub mod frequency;
pub mod table;

pub use catalog::{Topic, TopicCatalog};
pub use frequency::{build_row, count_occurrences, FrequencyRow, TopicRate};
pub use table::{build_table, DirectoryLoader, DocumentLoader, FrequencyTable};
