pub mod classify_batch;
pub mod classify_grid;
pub mod scan;

pub use classify_batch::{inspect_parallel, BatchReport};
pub use classify_grid::{classify, MUTANT_THRESHOLD};
pub use scan::{count_qualifying_runs, Direction, MIN_RUN_LEN};
